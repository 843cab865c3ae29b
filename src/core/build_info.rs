//! Build-info model
//!
//! The JSON shape Artifactory expects for a published build, plus the pure
//! assembly step that turns collected artifacts and parsed dependencies into
//! one record.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::defaults;
use crate::core::bake_config::BakeConfiguration;

/// Key of one build in the local build-info cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildIdentity {
    /// Build name
    pub name: String,
    /// Build number
    pub number: String,
    /// Artifactory project key, empty when unused
    pub project: String,
}

impl BuildIdentity {
    /// Identity without a project
    pub fn new(name: &str, number: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
            project: defaults::DEFAULT_PROJECT.to_string(),
        }
    }

    /// Stable directory-safe key derived from name, number and project
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        // Fields are NUL-terminated so `a_b/c` and `a/b_c` get different keys.
        for part in [&self.name, &self.number, &self.project] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

/// File checksums attached to artifacts and dependencies
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checksum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

/// A resolved package the build consumed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    /// `<package>:<version>`
    pub id: String,
    /// Always `os-package` for manifest entries
    #[serde(rename = "type")]
    pub kind: String,
    /// Architecture or feed label
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(flatten)]
    pub checksum: Checksum,
}

/// A file deployed to the repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    /// File name
    pub name: String,
    /// File extension, empty when there is none
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Path inside the repository
    pub path: String,
    /// Repository the file was deployed to
    #[serde(
        rename = "originalDeploymentRepo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_deployment_repo: Option<String>,
    #[serde(flatten)]
    pub checksum: Checksum,
}

/// A named group of artifacts and dependencies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Tool that produced the record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub version: String,
}

impl Agent {
    /// This tool
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One build record as published to Artifactory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub name: String,
    pub number: String,
    /// Not part of the JSON body; sent as a query parameter
    #[serde(skip)]
    pub project: String,
    pub started: String,
    pub agent: Agent,
    pub build_agent: Agent,
    pub modules: Vec<Module>,
}

/// Format a start time the way Artifactory expects it
pub fn format_started<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(defaults::BUILD_INFO_TIME_FORMAT).to_string()
}

/// Build the record for a finished run
///
/// Produces exactly one module carrying both lists verbatim.
pub fn assemble(
    config: &BakeConfiguration,
    artifacts: Vec<Artifact>,
    dependencies: Vec<Dependency>,
    started: &str,
) -> BuildInfo {
    let identity = config.build_identity();
    let module = Module {
        id: defaults::BUILD_MODULE_ID.to_string(),
        kind: defaults::BUILD_MODULE_TYPE.to_string(),
        artifacts,
        dependencies,
    };

    BuildInfo {
        version: defaults::BUILD_INFO_VERSION.to_string(),
        name: identity.name,
        number: identity.number,
        project: identity.project,
        started: started.to_string(),
        agent: Agent::current(),
        build_agent: Agent::current(),
        modules: vec![module],
    }
}
