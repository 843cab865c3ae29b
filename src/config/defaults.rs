//! Default configuration values

/// Default build name
pub const DEFAULT_BUILD_NAME: &str = "yocto-build";

/// Default build number
pub const DEFAULT_BUILD_NUMBER: &str = "1";

/// Default target repository
pub const DEFAULT_REPO: &str = "yocto";

/// Default build-environment init script
pub const DEFAULT_BUILD_ENV: &str = "oe-init-build-env";

/// Module id used for the single build-info module
pub const BUILD_MODULE_ID: &str = "build";

/// Module type recorded in build-info
pub const BUILD_MODULE_TYPE: &str = "cpp";

/// Default build-info project (empty means no project)
pub const DEFAULT_PROJECT: &str = "";

/// Dependency type recorded for manifest packages
pub const OS_PACKAGE_TYPE: &str = "os-package";

/// Build tool temporary output, relative to the run folder
pub const TMP_DIRECTORY: &str = "build/tmp";

/// Build tool lock and socket files, relative to the run folder
pub const LOCK_FILES: &[&str] = &[
    "build/bitbake.lock",
    "build/bitbake.sock",
    "build/hashserve.sock",
];

/// Full deploy tree, relative to the run folder
pub const DEPLOY_DIRECTORY: &str = "build/tmp/deploy";

/// Images subtree, relative to the run folder
pub const IMAGES_DIRECTORY: &str = "build/tmp/deploy/images";

/// Manifest files are those whose base name matches `*.manifest`
pub const MANIFEST_SUFFIX: &str = ".manifest";

/// Number of concurrent uploads
pub const UPLOAD_THREADS: usize = 10;

/// Upload attempts per file
pub const UPLOAD_RETRIES: u32 = 5;

/// Base delay for upload backoff (in milliseconds)
pub const UPLOAD_BASE_DELAY_MS: u64 = 1000;

/// Build-info schema version sent to Artifactory
pub const BUILD_INFO_VERSION: &str = "1.0.1";

/// Build-info start time format
pub const BUILD_INFO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
