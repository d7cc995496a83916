//! Run configuration: load from YAML, merge with flag/environment overrides.
//!
//! Precedence, highest first: command-line flags (and their `ESINFO_*`
//! environment fallbacks), the YAML config file, built-in defaults.
//! The output format is validated here so an unusable run is rejected
//! before anything talks to the cluster.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::FamilyConvention;
use crate::connector::RetryConfig;
use crate::error::{EsinfoError, Result};

pub const DEFAULT_ENDPOINT: &str = "localhost:9200";
pub const DEFAULT_USERNAME: &str = "elastic";
pub const DEFAULT_PASSWORD: &str = "changeme";
pub const DEFAULT_FORMAT: &str = "csv";

/// Name of the config file searched for in the working and home directories.
pub const CONFIG_FILE_NAME: &str = "esinfo.yaml";

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// Report encoding.
///
/// Parsed only through [`FromStr`]; the config file carries the raw string
/// so flag and file values share one set of accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    /// File the report is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Csv => "indices.csv",
            OutputFormat::Json => "indices.json",
            OutputFormat::Yaml => "indices.yaml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Json => "JSON",
            OutputFormat::Yaml => "YAML",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EsinfoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "yml" | "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(EsinfoError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        })
    }
}

// ---------------------------------------------------------------------------
// ConnectionProfile
// ---------------------------------------------------------------------------

/// Everything needed to reach one cluster endpoint.
#[derive(Clone)]
pub struct ConnectionProfile {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// PEM bundle pinned as the trust root. Ignored when `trust_all` is set.
    pub ca_cert: Option<PathBuf>,
    /// Skip certificate verification entirely.
    pub trust_all: bool,
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ca_cert", &self.ca_cert)
            .field("trust_all", &self.trust_all)
            .finish()
    }
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            ca_cert: None,
            trust_all: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FileConfig
// ---------------------------------------------------------------------------

/// Contents of `esinfo.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cacert: Option<PathBuf>,
    #[serde(rename = "unsafe")]
    pub trust_all: Option<bool>,
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub strict: Option<bool>,
    pub retry: Option<RetryConfig>,
    pub convention: Option<FamilyConvention>,
}

impl FileConfig {
    /// Parse a config document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EsinfoError::Config(e.to_string()))
    }

    /// Load from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EsinfoError::Config(format!("Reading {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| EsinfoError::Config(format!("Parsing {}: {}", path.display(), e)))
    }

    /// Locate and load the config file.
    ///
    /// An explicit path must exist. Otherwise `esinfo.yaml` is looked up in
    /// `search_dirs` in order and the first hit wins; no hit means defaults.
    pub fn discover(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "Loading config file");
            return Self::load_from_file(path).map(Some);
        }

        for dir in search_dirs {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Loading config file");
                return Self::load_from_file(&candidate).map(Some);
            }
        }

        debug!("No config file found, using defaults");
        Ok(None)
    }

    /// Default search path: the working directory, then `$HOME`.
    pub fn default_search_dirs() -> Vec<PathBuf> {
        let mut dirs = vec![PathBuf::from(".")];
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home));
        }
        dirs
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cacert: Option<PathBuf>,
    pub trust_all: bool,
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub strict: bool,
    pub max_retries: Option<u32>,
}

/// Fully resolved, validated run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: ConnectionProfile,
    pub retry: RetryConfig,
    pub convention: FamilyConvention,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    /// Abort instead of emitting a report with an empty column on fetch failure.
    pub strict: bool,
}

impl Settings {
    /// Merge overrides over the file config over defaults.
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let format_raw = overrides
            .format
            .or(file.format)
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
        let format = format_raw.parse::<OutputFormat>()?;

        let profile = ConnectionProfile {
            endpoint: overrides
                .endpoint
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            username: overrides
                .username
                .or(file.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: overrides
                .password
                .or(file.password)
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            ca_cert: overrides.cacert.or(file.cacert).filter(|p| !p.as_os_str().is_empty()),
            trust_all: overrides.trust_all || file.trust_all.unwrap_or(false),
        };

        if profile.endpoint.trim().is_empty() {
            return Err(EsinfoError::Config("endpoint must not be empty".to_string()));
        }

        let mut retry = file.retry.unwrap_or_default();
        if let Some(max_retries) = overrides.max_retries {
            retry.max_retries = max_retries;
        }
        retry.validate()?;

        Ok(Self {
            profile,
            retry,
            convention: file.convention.unwrap_or_default(),
            format,
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            strict: overrides.strict || file.strict.unwrap_or(false),
        })
    }
}
