//! Centralized configuration values shared across the OpenSCAD conversion
//! pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// COMPILER INVOCATION
// =============================================================================

/// Program invoked to compile OpenSCAD sources into OFF meshes.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_COMPILER_PROGRAM;
/// assert_eq!(DEFAULT_COMPILER_PROGRAM, "openscad");
/// ```
pub const DEFAULT_COMPILER_PROGRAM: &str = "openscad";

/// Wall-clock budget for one compiler run, in seconds.
///
/// # Examples
/// ```
/// use config::constants::COMPILER_TIMEOUT_SECS;
/// assert_eq!(COMPILER_TIMEOUT_SECS, 30);
/// ```
pub const COMPILER_TIMEOUT_SECS: u64 = 30;

/// Largest source text accepted by the converter, in bytes.
///
/// # Examples
/// ```
/// use config::constants::MAX_SOURCE_BYTES;
/// assert_eq!(MAX_SOURCE_BYTES, 10 * 1024 * 1024);
/// ```
pub const MAX_SOURCE_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// SCRATCH FILES
// =============================================================================

/// Prefix of every scratch file created by the converter.
///
/// # Examples
/// ```
/// use config::constants::SCRATCH_FILE_PREFIX;
/// assert!(SCRATCH_FILE_PREFIX.ends_with('-'));
/// ```
pub const SCRATCH_FILE_PREFIX: &str = "scad2glb-";

/// Extension of the scratch file holding the OpenSCAD source.
pub const SOURCE_EXTENSION: &str = "scad";

/// Extension of the scratch file the compiler writes its mesh to.
pub const MESH_EXTENSION: &str = "off";

/// Number of random characters appended to every request id.
///
/// # Examples
/// ```
/// use config::constants::REQUEST_SUFFIX_LEN;
/// assert!(REQUEST_SUFFIX_LEN >= 6);
/// ```
pub const REQUEST_SUFFIX_LEN: usize = 8;

// =============================================================================
// COLORS & ASSET OUTPUT
// =============================================================================

/// Largest component value of an integer-encoded color.
///
/// # Examples
/// ```
/// use config::constants::COLOR_BYTE_MAX;
/// assert_eq!(128.0 / COLOR_BYTE_MAX, 128.0 / 255.0);
/// ```
pub const COLOR_BYTE_MAX: f32 = 255.0;

/// Base color of the material used when a mesh carries no colors.
///
/// Matches the face color OpenSCAD uses in its own preview.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_BASE_COLOR;
/// assert_eq!(DEFAULT_BASE_COLOR[3], 1.0);
/// ```
pub const DEFAULT_BASE_COLOR: [f32; 4] = [0.976, 0.843, 0.173, 1.0];

/// Value written to the `asset.generator` field of exported GLB files.
pub const GLB_GENERATOR: &str = "scad2glb";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable overriding the compiler program.
pub const ENV_COMPILER_PROGRAM: &str = "SCAD2GLB_OPENSCAD";
/// Environment variable overriding the compiler timeout (whole seconds).
pub const ENV_TIMEOUT_SECS: &str = "SCAD2GLB_TIMEOUT_SECS";
/// Environment variable overriding the scratch directory.
pub const ENV_SCRATCH_DIR: &str = "SCAD2GLB_SCRATCH_DIR";
/// Environment variable overriding the source size limit.
pub const ENV_MAX_SOURCE_BYTES: &str = "SCAD2GLB_MAX_SOURCE_BYTES";

// =============================================================================
// CONVERTER CONFIG
// =============================================================================

/// Settings for one converter instance.
///
/// The command line issued per request is
/// `program [extra_args...] -o <mesh.off> <source.scad>`.
///
/// # Examples
/// ```
/// use config::constants::ConverterConfig;
/// let config = ConverterConfig::default();
/// assert_eq!(config.program.to_str(), Some("openscad"));
/// assert_eq!(config.timeout.as_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Compiler executable (name resolved through `PATH`, or a path).
    pub program: PathBuf,
    /// Arguments placed before the `-o` output flag.
    pub extra_args: Vec<String>,
    /// Wall-clock limit for one compiler run.
    pub timeout: Duration,
    /// Directory receiving the per-request scratch files.
    pub scratch_dir: PathBuf,
    /// Largest accepted source text.
    pub max_source_bytes: usize,
}

impl ConverterConfig {
    /// Builds a configuration, rejecting values the converter cannot honor.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use config::constants::{ConfigError, ConverterConfig};
    ///
    /// let cfg = ConverterConfig::new("openscad", Duration::from_secs(5), std::env::temp_dir())
    ///     .expect("valid config");
    /// assert_eq!(cfg.timeout, Duration::from_secs(5));
    ///
    /// let err = ConverterConfig::new("openscad", Duration::ZERO, std::env::temp_dir()).unwrap_err();
    /// assert_eq!(err, ConfigError::InvalidTimeout(Duration::ZERO));
    /// ```
    pub fn new(
        program: impl Into<PathBuf>,
        timeout: Duration,
        scratch_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            program: program.into(),
            extra_args: Vec::new(),
            timeout,
            scratch_dir: scratch_dir.into(),
            max_source_bytes: MAX_SOURCE_BYTES,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads overrides from the `SCAD2GLB_*` environment variables on top of
    /// the defaults.
    ///
    /// # Examples
    /// ```
    /// use config::constants::ConverterConfig;
    /// let cfg = ConverterConfig::from_env().expect("defaults are valid");
    /// assert!(!cfg.program.as_os_str().is_empty());
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(program) = env::var(ENV_COMPILER_PROGRAM) {
            config.program = PathBuf::from(program);
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidVariable {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(dir) = env::var(ENV_SCRATCH_DIR) {
            config.scratch_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = env::var(ENV_MAX_SOURCE_BYTES) {
            config.max_source_bytes =
                raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidVariable {
                    name: ENV_MAX_SOURCE_BYTES,
                    value: raw.clone(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Replaces the compiler program.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Replaces the arguments placed before the output flag.
    ///
    /// # Examples
    /// ```
    /// use config::constants::ConverterConfig;
    /// let cfg = ConverterConfig::default().with_extra_args(["--backend=manifold"]);
    /// assert_eq!(cfg.extra_args, vec!["--backend=manifold".to_string()]);
    /// ```
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the compiler timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the scratch directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Replaces the source size limit.
    pub fn with_max_source_bytes(mut self, limit: usize) -> Self {
        self.max_source_bytes = limit;
        self
    }

    /// Checks every field against the converter's requirements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.as_os_str().is_empty() {
            return Err(ConfigError::EmptyProgram);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(self.timeout));
        }
        if self.max_source_bytes == 0 {
            return Err(ConfigError::InvalidSourceLimit(self.max_source_bytes));
        }
        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_COMPILER_PROGRAM),
            extra_args: Vec::new(),
            timeout: Duration::from_secs(COMPILER_TIMEOUT_SECS),
            scratch_dir: env::temp_dir(),
            max_source_bytes: MAX_SOURCE_BYTES,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the compiler program is an empty string.
    EmptyProgram,
    /// Raised when the compiler timeout is zero.
    InvalidTimeout(Duration),
    /// Raised when the source size limit is zero.
    InvalidSourceLimit(usize),
    /// Raised when an environment override cannot be parsed.
    InvalidVariable {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyProgram => write!(f, "compiler program must not be empty"),
            ConfigError::InvalidTimeout(value) => {
                write!(f, "compiler timeout must be positive: {value:?}")
            }
            ConfigError::InvalidSourceLimit(value) => {
                write!(f, "max_source_bytes must be positive: {value}")
            }
            ConfigError::InvalidVariable { name, value } => {
                write!(f, "invalid value for {name}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
