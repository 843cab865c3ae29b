//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate one manifest field (package name, scope or version)
    pub fn manifest_field() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9.+_-]{0,24}"
    }

    /// Generate a well-formed `<name> <scope> <version>` manifest line
    pub fn manifest_line() -> impl Strategy<Value = String> {
        (manifest_field(), manifest_scope(), manifest_field())
            .prop_map(|(name, scope, version)| format!("{name} {scope} {version}"))
    }

    /// Generate a package architecture or feed label
    pub fn manifest_scope() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("i586".to_string()),
            Just("qemux86".to_string()),
            Just("all".to_string()),
            Just("cortexa7t2hf-neon".to_string()),
            Just("aarch64".to_string()),
        ]
    }

    /// Generate a build number
    pub fn build_number() -> impl Strategy<Value = String> {
        (1u32..100_000).prop_map(|n| n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_manifest_field_generator(field in manifest_field()) {
            prop_assert!(!field.is_empty());
            prop_assert!(!field.contains(' '));
        }

        #[test]
        fn test_manifest_line_generator(line in manifest_line()) {
            prop_assert_eq!(line.split(' ').count(), 3);
        }

        #[test]
        fn test_build_number_generator(number in build_number()) {
            prop_assert!(number.parse::<u32>().is_ok());
        }
    }
}
