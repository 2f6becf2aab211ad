//! Optional `regxml.toml` configuration.
//!
//! Precedence is CLI flag, then configuration file, then built-in default.
//! Relative paths in the file are resolved against the file's directory.
//!
//! ```toml
//! input_dir = "input"
//! output_dir = "output"
//! log_file = "regxml.log"
//!
//! [schemas]
//! aif = "xsd/AIFMD_DATAIF_V1.2.xsd"
//! ofk = "xsd/OFK-K.2020-03.xsd"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use regxml_model::ReportType;

/// File name searched for in the input directory.
pub const CONFIG_FILE: &str = "regxml.toml";

/// Error log used when neither the CLI nor the file names one.
pub const DEFAULT_LOG_FILE: &str = "regxml.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub schemas: SchemaConfig,
}

/// XSD path per report type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    pub aif: Option<PathBuf>,
    pub aifm: Option<PathBuf>,
    pub ofk: Option<PathBuf>,
}

impl SchemaConfig {
    pub fn get(&self, report: ReportType) -> Option<&Path> {
        match report {
            ReportType::Aif => self.aif.as_deref(),
            ReportType::Aifm => self.aifm.as_deref(),
            ReportType::Ofk => self.ofk.as_deref(),
        }
    }
}

impl FileConfig {
    /// Parses configuration text; `path` is only used in errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Makes every relative path relative to `base`.
    #[must_use]
    pub fn rebased(mut self, base: &Path) -> Self {
        let rebase = |path: &mut Option<PathBuf>| {
            if let Some(value) = path.as_mut()
                && value.is_relative()
            {
                *value = base.join(&*value);
            }
        };
        rebase(&mut self.input_dir);
        rebase(&mut self.output_dir);
        rebase(&mut self.log_file);
        rebase(&mut self.schemas.aif);
        rebase(&mut self.schemas.aifm);
        rebase(&mut self.schemas.ofk);
        self
    }
}

/// Loads the explicit configuration file, or `regxml.toml` from
/// `search_dir` when it exists.
pub fn load_config(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<Option<FileConfig>, ConfigError> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = search_dir.join(CONFIG_FILE);
            if !candidate.is_file() {
                return Ok(None);
            }
            candidate
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let config = FileConfig::parse(&text, &path)?.rebased(base);
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(Some(config))
}

/// Paths given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub schema: Option<PathBuf>,
}

/// Fully resolved paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub schema: PathBuf,
}

impl Settings {
    /// Input defaults to `.`, output to the input directory and the schema
    /// to the registry's XSD name inside the input directory.
    pub fn resolve(
        report: ReportType,
        default_schema: &str,
        overrides: &Overrides,
        file: Option<&FileConfig>,
    ) -> Self {
        let input_dir = overrides
            .input_dir
            .clone()
            .or_else(|| file.and_then(|config| config.input_dir.clone()))
            .unwrap_or_else(|| PathBuf::from("."));
        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| file.and_then(|config| config.output_dir.clone()))
            .unwrap_or_else(|| input_dir.clone());
        let schema = overrides
            .schema
            .clone()
            .or_else(|| file.and_then(|config| config.schemas.get(report).map(Path::to_path_buf)))
            .unwrap_or_else(|| input_dir.join(default_schema));
        Self {
            input_dir,
            output_dir,
            schema,
        }
    }
}

/// CLI flag, then file, then [`DEFAULT_LOG_FILE`].
pub fn resolve_log_file(flag: Option<&Path>, file: Option<&FileConfig>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| file.and_then(|config| config.log_file.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}
