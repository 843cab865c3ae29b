//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a temporary
//! Yocto build tree and in-memory stand-ins for the pipeline collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use yocto_bake::core::build_info::{Artifact, BuildIdentity, BuildInfo, Checksum};
use yocto_bake::core::connection::ServerDetails;
use yocto_bake::core::executor::{CommandExecutor, CommandStatus, ShellCommand};
use yocto_bake::core::gateway::{ArtifactGateway, UploadSpec, UploadSummary};
use yocto_bake::error::{BuildError, ConnectionError, GatewayError};

/// Manifest written into the images directory of a test tree
pub const SAMPLE_MANIFEST: &str = "base-files qemux86 3.0.14\nbase-passwd i586 3.5.29\n";

/// Image file written into the images directory of a test tree
pub const SAMPLE_IMAGE: &str = "build/tmp/deploy/images/qemux86/core-image-minimal-qemux86.ext4";

/// Test project context
///
/// Creates a temporary directory for a Yocto run folder plus separate
/// config and data directories for the binary under test.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Config and data directories
    pub home: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            home: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Config directory handed to the binary
    pub fn config_dir(&self) -> PathBuf {
        self.home.path().join("config")
    }

    /// Data directory handed to the binary
    pub fn data_dir(&self) -> PathBuf {
        self.home.path().join("data")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        write_file(self.dir.path(), name, content);
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Lay out a finished build: tmp output, lock files, images and manifest
    pub fn create_yocto_tree(&self) {
        self.create_file("build/conf/local.conf", "MACHINE = \"qemux86\"\n");
        self.create_file("build/tmp/work/i586-poky-linux/busybox/log.do_compile", "ok");
        self.create_file("build/tmp/deploy/rpm/i586/busybox-1.24.1-r0.i586.rpm", "rpm");
        self.create_file("build/bitbake.lock", "");
        self.create_file("build/hashserve.sock", "");
        for (path, content) in image_outputs() {
            self.create_file(&path, &content);
        }
    }

    /// Run the binary with this project's directories
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_yocto-bake"))
            .current_dir(self.path())
            .env("YOCTO_BAKE_CONFIG_DIR", self.config_dir())
            .env("YOCTO_BAKE_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute yocto-bake")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Files a successful bitbake run leaves in the images directory
pub fn image_outputs() -> Vec<(String, String)> {
    vec![
        (SAMPLE_IMAGE.to_string(), "ext4".to_string()),
        (
            "build/tmp/deploy/images/qemux86/core-image-minimal-qemux86.manifest".to_string(),
            SAMPLE_MANIFEST.to_string(),
        ),
    ]
}

/// A deployed artifact as the upload would record it
pub fn sample_artifact() -> Artifact {
    Artifact {
        name: "core-image-minimal-qemux86.ext4".to_string(),
        kind: "ext4".to_string(),
        path: "yocto-build:1/core-image-minimal-qemux86.ext4".to_string(),
        original_deployment_repo: Some("yocto".to_string()),
        checksum: Checksum {
            sha1: Some("a".repeat(40)),
            sha256: Some("b".repeat(64)),
            md5: None,
        },
    }
}

/// Ordered record of collaborator calls shared by the fakes
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// In-memory artifact gateway
pub struct FakeGateway {
    pub events: EventLog,
    pub server: Option<ServerDetails>,
    pub artifacts: Vec<Artifact>,
    /// Gateway call that fails: "clear", "upload", "save" or "publish"
    pub fail_on: Option<&'static str>,
    pub specs: Mutex<Vec<UploadSpec>>,
    /// Artifacts of every upload, keyed by the partial it reported
    pub partials: Mutex<HashMap<PathBuf, Vec<Artifact>>>,
    pub saved: Mutex<Option<BuildInfo>>,
}

impl FakeGateway {
    /// A configured gateway that deploys [`sample_artifact`]
    pub fn new(events: &EventLog) -> Self {
        Self {
            events: events.clone(),
            server: Some(ServerDetails {
                server_id: "main".to_string(),
                url: "https://acme.jfrog.io/artifactory".to_string(),
                ..ServerDetails::default()
            }),
            artifacts: vec![sample_artifact()],
            fail_on: None,
            specs: Mutex::new(Vec::new()),
            partials: Mutex::new(HashMap::new()),
            saved: Mutex::new(None),
        }
    }

    fn record(&self, event: &str) -> Result<(), GatewayError> {
        self.events.lock().unwrap().push(event.to_string());
        if self.fail_on == Some(event) {
            return Err(GatewayError::Http {
                url: format!("https://acme.jfrog.io/{event}"),
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

impl ArtifactGateway for FakeGateway {
    fn resolve_connection(&self, server_id: Option<&str>) -> Result<ServerDetails, ConnectionError> {
        self.events.lock().unwrap().push("resolve".to_string());
        let server = self.server.clone().ok_or(ConnectionError::NotConfigured)?;
        match server_id {
            Some(id) if id != server.server_id => Err(ConnectionError::ServerNotFound {
                server_id: id.to_string(),
            }),
            _ => Ok(server),
        }
    }

    async fn clear_build_info_cache(&self, _: &BuildIdentity) -> Result<(), GatewayError> {
        self.record("clear")?;
        self.partials.lock().unwrap().clear();
        Ok(())
    }

    async fn upload(
        &self,
        _: &ServerDetails,
        spec: &UploadSpec,
        _: &BuildIdentity,
    ) -> Result<UploadSummary, GatewayError> {
        self.record("upload")?;
        self.specs.lock().unwrap().push(spec.clone());
        let mut partials = self.partials.lock().unwrap();
        let partial = PathBuf::from(format!("partials/{:03}.json", partials.len()));
        partials.insert(partial.clone(), self.artifacts.clone());
        Ok(UploadSummary {
            files: self.artifacts.len(),
            folders: 0,
            partial,
        })
    }

    async fn deployed_artifacts(&self, partial: &Path) -> Result<Vec<Artifact>, GatewayError> {
        self.events.lock().unwrap().push("deployed".to_string());
        Ok(self
            .partials
            .lock()
            .unwrap()
            .get(partial)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_build_info(&self, info: &BuildInfo) -> Result<(), GatewayError> {
        self.record("save")?;
        *self.saved.lock().unwrap() = Some(info.clone());
        Ok(())
    }

    async fn publish_build_info(
        &self,
        _: &ServerDetails,
        build: &BuildIdentity,
    ) -> Result<(), GatewayError> {
        self.record("publish")?;
        match &*self.saved.lock().unwrap() {
            Some(info) if info.name == build.name && info.number == build.number => Ok(()),
            _ => Err(GatewayError::BuildInfoMissing {
                path: PathBuf::from(build.cache_key()),
            }),
        }
    }
}

/// Executor that writes canned outputs instead of running bitbake
pub struct FakeExecutor {
    pub events: EventLog,
    pub exit_code: Option<i32>,
    /// Files (relative to the working directory) created on every run
    pub outputs: Vec<(String, String)>,
    pub commands: Mutex<Vec<ShellCommand>>,
}

impl FakeExecutor {
    /// An executor whose builds succeed and produce [`image_outputs`]
    pub fn new(events: &EventLog) -> Self {
        Self {
            events: events.clone(),
            exit_code: Some(0),
            outputs: image_outputs(),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// An executor whose builds exit with `code`
    pub fn failing(events: &EventLog, code: i32) -> Self {
        Self {
            exit_code: Some(code),
            outputs: Vec::new(),
            ..Self::new(events)
        }
    }
}

impl CommandExecutor for FakeExecutor {
    async fn execute(&self, command: &ShellCommand) -> Result<CommandStatus, BuildError> {
        self.events.lock().unwrap().push("build".to_string());
        self.commands.lock().unwrap().push(command.clone());
        for (path, content) in &self.outputs {
            write_file(&command.working_dir, path, content);
        }
        Ok(CommandStatus {
            code: self.exit_code,
        })
    }
}
