//! Configuration loading and project root resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (`--root`, `--config`)
//! 2. Environment variables (`PAWPRINT_ROOT`, `PAWPRINT_CONFIG` via clap)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! Every TOML field is optional. A project with no config file runs with the
//! defaults below, which match the CollectionBuilder repository layout.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the project root
pub const ROOT_ENV_VAR: &str = "PAWPRINT_ROOT";

/// Per-project config file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "pawprint.toml";

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Project root (optional)
    ///
    /// Used only when neither `--root` nor `PAWPRINT_ROOT` is given
    pub root_folder: Option<PathBuf>,

    pub logging: LoggingConfig,
    pub paths: PathsConfig,
    pub collection: CollectionConfig,
    pub geocode: GeocodeConfig,
    pub hooks: HooksConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Project file locations, relative to the project root unless absolute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub worklist: PathBuf,
    pub metadata_table: PathBuf,
    pub objects_dir: PathBuf,
    pub geo_cache: PathBuf,
    pub annotation_map: PathBuf,
    pub annotation_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            worklist: PathBuf::from("_data/paw_prints.csv"),
            metadata_table: PathBuf::from("_data/paw-print-repository.csv"),
            objects_dir: PathBuf::from("objects"),
            geo_cache: PathBuf::from("_data/geo_cache.json"),
            annotation_map: PathBuf::from("_data/annotation_map.csv"),
            annotation_dir: PathBuf::from("annotation"),
        }
    }
}

/// Naming and credit defaults for generated collection rows
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Object id prefix: `paw` gives `paw_001`, `paw_002`, ...
    pub id_prefix: String,

    /// Title prefix: `Paw Print` gives `Paw Print 1 (2023-04-15)`
    pub title_prefix: String,

    /// Creator used when an image carries no artist or by-line
    pub default_credit: Option<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_prefix: "paw".to_string(),
            title_prefix: "Paw Print".to_string(),
            default_credit: None,
        }
    }
}

/// Reverse geocoder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocodeConfig {
    /// When false only cached locations are used (offline mode)
    pub enabled: bool,

    /// Base URL of a Nominatim-compatible service
    pub base_url: String,

    /// User-Agent sent with every request (required by public Nominatim)
    pub user_agent: String,

    /// Minimum interval between requests
    pub rate_limit_ms: u64,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "pawprint/0.1.0 (paw-print collection builder)".to_string(),
            rate_limit_ms: 1000,
            timeout_secs: 30,
        }
    }
}

/// External commands run after a collection build
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Derivative (thumbnail/small image) generation command
    pub derivatives: Option<Vec<String>>,

    /// Deployment command
    pub deploy: Option<Vec<String>>,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            derivatives: Some(vec!["rake".to_string(), "generate_derivatives".to_string()]),
            deploy: None,
        }
    }
}

impl TomlConfig {
    /// Check values that serde cannot validate on its own
    pub fn validate(&self) -> Result<()> {
        if self.collection.id_prefix.trim().is_empty() {
            return Err(Error::Config("collection.id_prefix must not be empty".to_string()));
        }
        if self.geocode.enabled && self.geocode.base_url.trim().is_empty() {
            return Err(Error::Config(
                "geocode.base_url must be set when geocoding is enabled".to_string(),
            ));
        }
        if self.geocode.timeout_secs == 0 {
            return Err(Error::Config("geocode.timeout_secs must be at least 1".to_string()));
        }
        for (name, command) in [
            ("hooks.derivatives", &self.hooks.derivatives),
            ("hooks.deploy", &self.hooks.deploy),
        ] {
            if let Some(argv) = command {
                if argv.first().map_or(true, |program| program.trim().is_empty()) {
                    return Err(Error::Config(format!("{} must name a program", name)));
                }
            }
        }
        Ok(())
    }
}

/// Resolved absolute locations of every project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub worklist: PathBuf,
    pub metadata_table: PathBuf,
    pub objects_dir: PathBuf,
    pub geo_cache: PathBuf,
    pub annotation_map: PathBuf,
    pub annotation_dir: PathBuf,
}

impl ProjectPaths {
    /// Join configured paths onto the project root
    ///
    /// Absolute configured paths are kept as they are.
    pub fn new(root: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        let root = root.into();
        Self {
            worklist: root.join(&paths.worklist),
            metadata_table: root.join(&paths.metadata_table),
            objects_dir: root.join(&paths.objects_dir),
            geo_cache: root.join(&paths.geo_cache),
            annotation_map: root.join(&paths.annotation_map),
            annotation_dir: root.join(&paths.annotation_dir),
            root,
        }
    }
}

/// Project root resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. `root_folder` from the TOML config
/// 4. Current working directory
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> Result<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    if let Some(path) = &config.root_folder {
        return Ok(path.clone());
    }

    Ok(std::env::current_dir()?)
}

/// Find the config file to load
///
/// An explicit path must exist. Otherwise `pawprint.toml` in `root_hint` is
/// tried, then `<user config dir>/pawprint/config.toml`. `None` means run
/// with built-in defaults.
pub fn locate_config_file(explicit: Option<&Path>, root_hint: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let project_config = root_hint.join(CONFIG_FILE_NAME);
    if project_config.exists() {
        return Ok(Some(project_config));
    }

    let user_config = dirs::config_dir().map(|d| d.join("pawprint").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Read and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Everything a binary needs before it starts work
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub config: TomlConfig,
    pub paths: ProjectPaths,

    /// Config file that was loaded; `None` when running on defaults
    pub config_file: Option<PathBuf>,
}

/// Load configuration and resolve project paths in one step
///
/// The root used to look for `pawprint.toml` is the CLI/env root if given,
/// else the current directory. A relative `logging.file` is resolved against
/// the final project root. Nothing is logged here since tracing is
/// configured from the result.
pub fn bootstrap(cli_root: Option<&Path>, cli_config: Option<&Path>) -> Result<Bootstrap> {
    let root_hint = resolve_root_folder(cli_root, ROOT_ENV_VAR, &TomlConfig::default())?;

    let config_file = locate_config_file(cli_config, &root_hint)?;
    let mut config = match &config_file {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    let root = resolve_root_folder(cli_root, ROOT_ENV_VAR, &config)?;
    config.logging.file = config.logging.file.take().map(|file| root.join(file));
    let paths = ProjectPaths::new(root, &config.paths);

    Ok(Bootstrap {
        config,
        paths,
        config_file,
    })
}
