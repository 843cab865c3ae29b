//! Yocto image manifest parsing
//!
//! bitbake writes one `<image>.manifest` per image under the deploy images
//! directory. Each line names one installed package:
//!
//! ```text
//! <package-name> <scope> <version>
//! ```
//!
//! Lines are turned into [`Dependency`] records whose id is
//! `<package-name>:<version>`. Records are deduplicated by id across every
//! manifest found; the first occurrence wins and later scopes are dropped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use walkdir::WalkDir;

use crate::config::defaults;
use crate::core::bake_config::BakeConfiguration;
use crate::core::build_info::{Checksum, Dependency};
use crate::core::layout::TreeLayout;
use crate::error::ManifestError;

/// Find every `*.manifest` file under the images directory
///
/// Files are returned in walk order with entries sorted by name, so the
/// result is stable across runs. Finding none is an error.
pub fn locate(run_folder: &Path, layout: &TreeLayout) -> Result<Vec<PathBuf>, ManifestError> {
    let images_dir = layout.images_dir(run_folder);
    let mut manifests = Vec::new();

    for entry in WalkDir::new(&images_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ManifestError::Search {
            path: images_dir.clone(),
            error: e.to_string(),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        if is_manifest_name(&entry.file_name().to_string_lossy()) {
            manifests.push(entry.into_path());
        }
    }

    if manifests.is_empty() {
        return Err(ManifestError::NotFound { path: images_dir });
    }

    tracing::debug!("Found {} manifest file(s)", manifests.len());
    Ok(manifests)
}

/// Whether a base name matches `*.manifest`
fn is_manifest_name(name: &str) -> bool {
    name.ends_with(defaults::MANIFEST_SUFFIX)
}

/// Parse one manifest line into a dependency
///
/// The line is trimmed, then split on single spaces. Anything other than
/// exactly three fields yields `None`.
pub fn parse_line(line: &str) -> Option<Dependency> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split(' ').collect();
    let [name, scope, version] = fields.as_slice() else {
        return None;
    };

    let id = format!("{name}:{version}");
    Some(Dependency {
        checksum: Checksum {
            sha1: Some(sha1_hex(&id)),
            ..Checksum::default()
        },
        id,
        kind: defaults::OS_PACKAGE_TYPE.to_string(),
        scopes: vec![(*scope).to_string()],
    })
}

fn sha1_hex(value: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fold manifest content into an accumulated dependency list
///
/// Appends each well-formed line whose id is not already present and
/// returns the updated list. Malformed and blank lines are skipped.
pub fn parse_manifest_content(content: &str, mut dependencies: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen: HashSet<String> = dependencies.iter().map(|dep| dep.id.clone()).collect();

    for dependency in content.split('\n').filter_map(parse_line) {
        if seen.insert(dependency.id.clone()) {
            dependencies.push(dependency);
        }
    }

    dependencies
}

/// Collect the deduplicated dependencies of every manifest in the build tree
pub fn parse_dependencies_from_manifest(
    config: &BakeConfiguration,
    layout: &TreeLayout,
) -> Result<Vec<Dependency>, ManifestError> {
    let mut dependencies = Vec::new();

    for manifest in locate(&config.run_folder, layout)? {
        let content = std::fs::read_to_string(&manifest).map_err(|e| ManifestError::Read {
            path: manifest.clone(),
            error: e.to_string(),
        })?;

        let before = dependencies.len();
        dependencies = parse_manifest_content(&content, dependencies);
        tracing::debug!(
            "Parsed {}: {} new dependencies",
            manifest.display(),
            dependencies.len() - before
        );
    }

    tracing::info!("Collected {} dependencies from manifests", dependencies.len());
    Ok(dependencies)
}
