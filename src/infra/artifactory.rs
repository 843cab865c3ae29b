//! Artifactory REST client
//!
//! Handles deploying files with checksum headers, parallel uploads, retry
//! with exponential backoff, remote folder creation and build-info publishing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use chrono::Utc;
use futures::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, RequestBuilder};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::defaults;
use crate::core::build_info::{Artifact, BuildIdentity, BuildInfo, Checksum};
use crate::core::connection::ServerDetails;
use crate::core::gateway::UploadSpec;
use crate::error::{FilesystemError, GatewayError};

/// Progress callback type for upload progress reporting (`files_done`, `files_total`)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Longest response body excerpt kept in errors
const BODY_EXCERPT: usize = 512;

/// Upper bound for the delay between attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Escaped in remote path segments; `:` stays readable in `<name>:<number>` folders
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':');

/// Escaped in matrix parameter and query values
const PROPERTY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Upload concurrency and retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTuning {
    /// Concurrent file transfers
    pub threads: usize,
    /// Attempts per file
    pub retries: u32,
    /// First backoff delay (in milliseconds)
    pub base_delay_ms: u64,
}

impl Default for UploadTuning {
    fn default() -> Self {
        Self {
            threads: defaults::UPLOAD_THREADS,
            retries: defaults::UPLOAD_RETRIES,
            base_delay_ms: defaults::UPLOAD_BASE_DELAY_MS,
        }
    }
}

/// One local file and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub local: PathBuf,
    /// Path inside the repository, without the repository name
    pub remote: String,
}

/// Everything an [`UploadSpec`] expands to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPlan {
    pub files: Vec<PlannedFile>,
    /// Remote folders for empty local directories, with trailing `/`
    pub folders: Vec<String>,
}

/// Result of a finished upload
#[derive(Debug, Clone, Default)]
pub struct UploadOutcome {
    /// Deployed files, sorted by path
    pub artifacts: Vec<Artifact>,
    /// Remote folders created
    pub folders: usize,
}

/// Expand an upload spec into files and folders
pub fn plan_upload(spec: &UploadSpec) -> Result<UploadPlan, FilesystemError> {
    let prefix = spec
        .target
        .split_once('/')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default();
    let max_depth = if spec.recursive { usize::MAX } else { 1 };

    let mut plan = UploadPlan::default();
    for entry in WalkDir::new(&spec.pattern)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| FilesystemError::ReadDir {
            path: spec.pattern.clone(),
            error: e.to_string(),
        })?;
        let path = entry.path();
        let remote_name = if spec.flat {
            entry.file_name().to_string_lossy().into_owned()
        } else {
            relative_remote_path(&spec.pattern, path)
        };

        if entry.file_type().is_dir() {
            if spec.include_dirs && is_empty_dir(path)? {
                plan.folders.push(format!("{prefix}{remote_name}/"));
            }
        } else {
            plan.files.push(PlannedFile {
                local: path.to_path_buf(),
                remote: format!("{prefix}{remote_name}"),
            });
        }
    }

    Ok(plan)
}

fn relative_remote_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_empty_dir(path: &Path) -> Result<bool, FilesystemError> {
    let mut entries = std::fs::read_dir(path).map_err(|e| FilesystemError::ReadDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(entries.next().is_none())
}

/// Compute SHA-1 and SHA-256 of a file without loading it into memory
pub async fn checksum_file(path: &Path) -> Result<Checksum, FilesystemError> {
    let read_error = |e: std::io::Error| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = tokio::fs::File::open(path).await.map_err(read_error)?;
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let read = file.read(&mut buffer).await.map_err(read_error)?;
        if read == 0 {
            break;
        }
        sha1.update(&buffer[..read]);
        sha256.update(&buffer[..read]);
    }

    Ok(Checksum {
        sha1: Some(hex::encode(sha1.finalize())),
        sha256: Some(hex::encode(sha256.finalize())),
        md5: None,
    })
}

/// Client for one Artifactory instance
#[derive(Clone)]
pub struct ArtifactoryClient {
    client: reqwest::Client,
    tuning: UploadTuning,
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for ArtifactoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactoryClient")
            .field("tuning", &self.tuning)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

impl ArtifactoryClient {
    /// Create a client with default tuning
    pub fn new() -> Self {
        Self::with_tuning(UploadTuning::default())
    }

    /// Create a client with custom settings
    pub fn with_tuning(tuning: UploadTuning) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            tuning,
            progress: None,
        }
    }

    /// Report per-file progress to a callback
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Get the tuning in use
    pub fn tuning(&self) -> UploadTuning {
        self.tuning
    }

    /// Upload everything an [`UploadSpec`] selects
    ///
    /// Files are transferred concurrently; any file still failing after all
    /// attempts fails the whole upload.
    pub async fn upload(
        &self,
        server: &ServerDetails,
        spec: &UploadSpec,
        build: &BuildIdentity,
    ) -> Result<UploadOutcome, GatewayError> {
        let plan = plan_upload(spec)?;
        let repo = spec.repo();
        let properties = build_properties(build, Utc::now().timestamp_millis());
        debug!(
            "Uploading {} files and {} folders from {} to {}",
            plan.files.len(),
            plan.folders.len(),
            spec.pattern.display(),
            spec.target
        );

        for folder in &plan.folders {
            let url = format!(
                "{}/{}/{}",
                server.base_url(),
                encode_path(repo),
                encode_path(folder)
            );
            self.with_retry(&url, || self.create_folder_once(server, &url))
                .await?;
        }

        let total = plan.files.len();
        let done = AtomicU32::new(0);
        let done = &done;
        let properties = properties.as_str();
        let results: Vec<Result<Artifact, GatewayError>> = futures::stream::iter(&plan.files)
            .map(move |file| async move {
                let result = self.upload_file(server, repo, file, properties).await;
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(progress) = &self.progress {
                    progress(u64::from(finished), total as u64);
                }
                result
            })
            .buffer_unordered(self.tuning.threads.max(1))
            .collect()
            .await;

        let mut artifacts = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => failures.push(e),
            }
        }

        if let Some(first) = failures.first() {
            return Err(GatewayError::UploadFailed {
                failed: failures.len(),
                total,
                first: first.to_string(),
            });
        }

        artifacts.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(UploadOutcome {
            artifacts,
            folders: plan.folders.len(),
        })
    }

    /// Deploy one file and describe it as an artifact
    async fn upload_file(
        &self,
        server: &ServerDetails,
        repo: &str,
        file: &PlannedFile,
        properties: &str,
    ) -> Result<Artifact, GatewayError> {
        let checksum = checksum_file(&file.local).await?;
        let url = format!(
            "{}/{}/{}{properties}",
            server.base_url(),
            encode_path(repo),
            encode_path(&file.remote)
        );

        self.with_retry(&url, || self.put_file_once(server, &url, &file.local, &checksum))
            .await?;

        let name = file
            .local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = file
            .local
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Artifact {
            name,
            kind,
            path: file.remote.clone(),
            original_deployment_repo: Some(repo.to_string()),
            checksum,
        })
    }

    /// Run a request until it succeeds or the attempts are used up
    async fn with_retry<F, Fut>(&self, url: &str, mut attempt: F) -> Result<(), GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<(), GatewayError>>,
    {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.tuning.base_delay_ms))
            .with_max_interval(MAX_RETRY_DELAY)
            .with_max_elapsed_time(None)
            .build();
        let max_attempts = self.tuning.retries.max(1);
        let attempts = AtomicU32::new(0);
        let attempts = &attempts;

        backoff::future::retry(policy, || {
            let request = attempt();
            async move {
                let current = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                request.await.map_err(|e| {
                    if current >= max_attempts {
                        backoff::Error::permanent(e)
                    } else {
                        warn!("Attempt {current}/{max_attempts} for {url} failed: {e}");
                        backoff::Error::transient(e)
                    }
                })
            }
        })
        .await
    }

    async fn put_file_once(
        &self,
        server: &ServerDetails,
        url: &str,
        path: &Path,
        checksum: &Checksum,
    ) -> Result<(), GatewayError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| FilesystemError::ReadFile {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        let mut request = self
            .client
            .put(url)
            .body(Body::wrap_stream(ReaderStream::new(file)));
        if let Some(sha1) = &checksum.sha1 {
            request = request.header("X-Checksum-Sha1", sha1);
        }
        if let Some(sha256) = &checksum.sha256 {
            request = request.header("X-Checksum-Sha256", sha256);
        }

        self.send(authorize(request, server), url).await
    }

    async fn create_folder_once(&self, server: &ServerDetails, url: &str) -> Result<(), GatewayError> {
        let request = self.client.put(url);
        self.send(authorize(request, server), url).await
    }

    /// Send a build-info record to `api/build`
    pub async fn publish_build_info(
        &self,
        server: &ServerDetails,
        info: &BuildInfo,
    ) -> Result<(), GatewayError> {
        let url = publish_url(server, &info.project);
        debug!("Publishing build-info {}/{} to {url}", info.name, info.number);

        let body = serde_json::to_vec(info).map_err(|e| GatewayError::Json {
            path: PathBuf::from(&url),
            error: e.to_string(),
        })?;
        let request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/vnd.org.jfrog.artifactory+json")
            .body(body);

        self.send(authorize(request, server), &url).await
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<(), GatewayError> {
        let response = request.send().await.map_err(|e| GatewayError::Network {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.chars().take(BODY_EXCERPT).collect(),
        })
    }
}

impl Default for ArtifactoryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Bearer token when present, otherwise basic auth when a user is set
fn authorize(request: RequestBuilder, server: &ServerDetails) -> RequestBuilder {
    match (&server.access_token, &server.user) {
        (Some(token), _) if !token.is_empty() => request.bearer_auth(token),
        (_, Some(user)) if !user.is_empty() => request.basic_auth(user, server.password.as_ref()),
        _ => request,
    }
}

/// Percent-encode each segment of a `/`-separated remote path
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Matrix parameters attaching a deployed file to its build
fn build_properties(build: &BuildIdentity, timestamp: i64) -> String {
    format!(
        ";build.name={};build.number={};build.timestamp={timestamp}",
        utf8_percent_encode(&build.name, PROPERTY_VALUE),
        utf8_percent_encode(&build.number, PROPERTY_VALUE)
    )
}

fn publish_url(server: &ServerDetails, project: &str) -> String {
    if project.is_empty() {
        format!("{}/api/build", server.base_url())
    } else {
        format!(
            "{}/api/build?project={}",
            server.base_url(),
            utf8_percent_encode(project, PROPERTY_VALUE)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bake_config::BakeConfiguration;
    use crate::core::build_info::assemble;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ============================================
    // Unit Tests - Upload planning
    // ============================================

    fn images_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        std::fs::create_dir_all(images.join("qemux86/empty")).unwrap();
        std::fs::write(images.join("qemux86/core-image-minimal.ext4"), b"ext4").unwrap();
        std::fs::write(images.join("qemux86/bzImage"), b"kernel").unwrap();
        dir
    }

    fn spec(pattern: &Path, flat: bool) -> UploadSpec {
        UploadSpec {
            pattern: pattern.to_path_buf(),
            target: "yocto/yocto-build:1/".to_string(),
            recursive: true,
            include_dirs: true,
            flat,
        }
    }

    fn fast_client() -> ArtifactoryClient {
        ArtifactoryClient::with_tuning(UploadTuning {
            threads: 4,
            retries: 3,
            base_delay_ms: 10,
        })
    }

    fn server(uri: &str) -> ServerDetails {
        ServerDetails {
            server_id: "main".to_string(),
            url: format!("{uri}/artifactory/"),
            user: Some("ci".to_string()),
            password: Some("secret".to_string()),
            access_token: None,
        }
    }

    #[test]
    fn test_plan_flat_drops_structure() {
        let dir = images_tree();
        let plan = plan_upload(&spec(&dir.path().join("images"), true)).unwrap();

        let remotes: Vec<&str> = plan.files.iter().map(|f| f.remote.as_str()).collect();
        assert_eq!(
            remotes,
            vec!["yocto-build:1/bzImage", "yocto-build:1/core-image-minimal.ext4"]
        );
        assert_eq!(plan.folders, vec!["yocto-build:1/empty/"]);
    }

    #[test]
    fn test_plan_preserves_structure() {
        let dir = images_tree();
        let plan = plan_upload(&spec(&dir.path().join("images"), false)).unwrap();

        let remotes: Vec<&str> = plan.files.iter().map(|f| f.remote.as_str()).collect();
        assert_eq!(
            remotes,
            vec![
                "yocto-build:1/qemux86/bzImage",
                "yocto-build:1/qemux86/core-image-minimal.ext4"
            ]
        );
        assert_eq!(plan.folders, vec!["yocto-build:1/qemux86/empty/"]);
    }

    #[test]
    fn test_plan_without_dirs_or_recursion() {
        let dir = images_tree();
        let mut upload = spec(&dir.path().join("images"), false);
        upload.include_dirs = false;
        upload.recursive = false;

        let plan = plan_upload(&upload).unwrap();

        assert!(plan.files.is_empty());
        assert!(plan.folders.is_empty());
    }

    #[tokio::test]
    async fn test_checksum_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hello.txt");
        std::fs::write(&file, b"hello world").unwrap();

        let checksum = checksum_file(&file).await.unwrap();

        assert_eq!(
            checksum.sha1.as_deref(),
            Some("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed")
        );
        assert_eq!(
            checksum.sha256.as_deref(),
            Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
        );
    }

    #[test]
    fn test_encode_path_escapes_each_segment() {
        assert_eq!(
            encode_path("yocto-build:1/qemux86/img#1 final.wic"),
            "yocto-build:1/qemux86/img%231%20final.wic"
        );
        assert_eq!(encode_path("yocto-build:1/empty/"), "yocto-build:1/empty/");
        assert_eq!(encode_path("a?b;c=d"), "a%3Fb%3Bc%3Dd");
    }

    #[test]
    fn test_build_properties_escape_values() {
        let build = BuildIdentity::new("nightly;x=y", "1/2");
        assert_eq!(
            build_properties(&build, 42),
            ";build.name=nightly%3Bx%3Dy;build.number=1%2F2;build.timestamp=42"
        );
    }

    #[test]
    fn test_publish_url() {
        let server = server("http://localhost");
        assert_eq!(publish_url(&server, ""), "http://localhost/artifactory/api/build");
        assert_eq!(
            publish_url(&server, "fw"),
            "http://localhost/artifactory/api/build?project=fw"
        );
    }

    // ============================================
    // Async Tests - Upload and publish
    // ============================================

    #[tokio::test]
    async fn test_upload_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/artifactory/yocto/yocto-build:1/[^/]+;build\.name=yocto-build;build\.number=1;build\.timestamp=\d+$"))
            .and(header_exists("X-Checksum-Sha1"))
            .and(header_exists("X-Checksum-Sha256"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/artifactory/yocto/yocto-build:1/empty/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = images_tree();
        let outcome = fast_client()
            .upload(
                &server(&mock_server.uri()),
                &spec(&dir.path().join("images"), true),
                &BuildIdentity::new("yocto-build", "1"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.folders, 1);
        assert_eq!(outcome.artifacts.len(), 2);
        let ext4 = &outcome.artifacts[1];
        assert_eq!(ext4.name, "core-image-minimal.ext4");
        assert_eq!(ext4.kind, "ext4");
        assert_eq!(ext4.path, "yocto-build:1/core-image-minimal.ext4");
        assert_eq!(ext4.original_deployment_repo.as_deref(), Some("yocto"));
        assert!(ext4.checksum.sha1.is_some());
        assert_eq!(outcome.artifacts[0].kind, "");
    }

    #[tokio::test]
    async fn test_upload_escapes_file_name_and_properties() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/artifactory/yocto/yocto-build:1/img%231\.wic;build\.name=nightly%3Bx%3Dy;build\.number=1;build\.timestamp=\d+$"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("img#1.wic"), b"wic").unwrap();

        let outcome = fast_client()
            .upload(
                &server(&mock_server.uri()),
                &spec(dir.path(), true),
                &BuildIdentity::new("nightly;x=y", "1"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.artifacts[0].name, "img#1.wic");
        assert_eq!(outcome.artifacts[0].path, "yocto-build:1/img#1.wic");
    }

    #[tokio::test]
    async fn test_upload_retry_on_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("image.wic"), b"wic").unwrap();

        let outcome = fast_client()
            .upload(
                &server(&mock_server.uri()),
                &spec(dir.path(), true),
                &BuildIdentity::new("yocto-build", "1"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_fails_after_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("image.wic"), b"wic").unwrap();

        let err = fast_client()
            .upload(
                &server(&mock_server.uri()),
                &spec(dir.path(), true),
                &BuildIdentity::new("yocto-build", "1"),
            )
            .await
            .unwrap_err();

        match err {
            GatewayError::UploadFailed { failed, total, first } => {
                assert_eq!((failed, total), (1, 1));
                assert!(first.contains("403"));
                assert!(first.contains("forbidden"));
            }
            e => panic!("Expected UploadFailed error, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_reports_progress() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        let dir = images_tree();
        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = seen.clone();
        let client = fast_client().with_progress(Arc::new(move |done, total| {
            assert!(done <= total);
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));

        client
            .upload(
                &server(&mock_server.uri()),
                &spec(&dir.path().join("images"), true),
                &BuildIdentity::new("yocto-build", "1"),
            )
            .await
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bearer_token_preferred() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("image.wic"), b"wic").unwrap();
        let mut details = server(&mock_server.uri());
        details.access_token = Some("tok-123".to_string());

        fast_client()
            .upload(
                &details,
                &spec(dir.path(), true),
                &BuildIdentity::new("yocto-build", "1"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_publish_build_info() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/artifactory/api/build"))
            .and(body_partial_json(serde_json::json!({
                "name": "yocto-build",
                "number": "1",
                "modules": [{ "id": "build" }]
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let info = assemble(
            &BakeConfiguration::new("core-image-minimal"),
            Vec::new(),
            Vec::new(),
            "2026-10-16T09:30:00.000+0000",
        );

        fast_client()
            .publish_build_info(&server(&mock_server.uri()), &info)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_publish_build_info_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/artifactory/api/build"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad build-info"))
            .mount(&mock_server)
            .await;

        let info = assemble(&BakeConfiguration::new("core-image-minimal"), Vec::new(), Vec::new(), "t");

        let err = fast_client()
            .publish_build_info(&server(&mock_server.uri()), &info)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Http { status: 400, ref body, .. } if body == "bad build-info"));
    }
}
