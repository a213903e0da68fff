//! Configuration loading and site root resolution
//!
//! Resolution priority for both the config file and the site root:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`GIJIE_CONFIG` / `GIJIE_ROOT`)
//! 3. Config file (`~/.config/gijie/config.toml` when present)
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; defaults are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::carousel::{CarouselTiming, MAX_CAROUSEL_ITEMS};
use crate::filter::{EmptySelection, FilterPolicy};
use crate::loader::DataSource;
use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "GIJIE_CONFIG";
/// Environment variable naming the site root
pub const ROOT_ENV_VAR: &str = "GIJIE_ROOT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PICKUP_SIZE: usize = 3;
const DEFAULT_AUTO_ADVANCE_MS: u64 = 5000;
const DEFAULT_RESUME_AFTER_MS: u64 = 8000;
const DEFAULT_SCROLL_SETTLE_MS: u64 = 150;

/// How missing character artwork is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// Check artwork files once at load time; missing ones render as "coming soon"
    #[default]
    Preflight,
    /// Emit an error-event swap to the placeholder; no existence check
    Fallback,
}

/// Config file contents; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub data_source: Option<String>,
    pub assets_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub filter: TomlFilterConfig,
    #[serde(default)]
    pub images: TomlImageConfig,
    #[serde(default)]
    pub pickup: TomlPickupConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlFilterConfig {
    pub series_empty: Option<EmptySelection>,
    pub arc_empty: Option<EmptySelection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlImageConfig {
    pub policy: Option<ImagePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPickupConfig {
    pub size: Option<usize>,
    pub auto_advance_ms: Option<u64>,
    pub resume_after_ms: Option<u64>,
    pub scroll_settle_ms: Option<u64>,
}

/// Pickup carousel settings
#[derive(Debug, Clone, PartialEq)]
pub struct PickupConfig {
    /// Number of highlighted characters (at most 3)
    pub size: usize,
    pub timing: CarouselTiming,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PICKUP_SIZE,
            timing: CarouselTiming {
                auto_advance: Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS),
                resume_after: Duration::from_millis(DEFAULT_RESUME_AFTER_MS),
                scroll_settle: Duration::from_millis(DEFAULT_SCROLL_SETTLE_MS),
            },
        }
    }
}

/// Resolved site configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub root_folder: PathBuf,
    pub bind_addr: String,
    pub data_source: DataSource,
    /// Directory that contains `images/`
    pub assets_dir: PathBuf,
    pub log_level: String,
    pub filter: FilterPolicy,
    pub image_policy: ImagePolicy,
    pub pickup: PickupConfig,
}

impl SiteConfig {
    /// Defaults for a site rooted at `root_folder`
    pub fn with_root(root_folder: impl Into<PathBuf>) -> Self {
        let root_folder = root_folder.into();
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_source: DataSource::Directory(root_folder.join("data")),
            assets_dir: root_folder.clone(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            filter: FilterPolicy::default(),
            image_policy: ImagePolicy::default(),
            pickup: PickupConfig::default(),
            root_folder,
        }
    }

    /// Apply config file values on top of root-based defaults
    pub fn from_toml(toml: TomlConfig, root_folder: PathBuf) -> Result<Self> {
        let mut config = Self::with_root(root_folder);

        if let Some(addr) = toml.bind_addr {
            config.bind_addr = addr;
        }
        if let Some(source) = toml.data_source {
            config.data_source = DataSource::parse(&source, &config.root_folder)?;
        }
        if let Some(dir) = toml.assets_dir {
            config.assets_dir = resolve_relative(&config.root_folder, &dir);
        }
        if let Some(level) = toml.log_level {
            config.log_level = level;
        }
        if let Some(policy) = toml.filter.series_empty {
            config.filter.series_empty = policy;
        }
        if let Some(policy) = toml.filter.arc_empty {
            config.filter.arc_empty = policy;
        }
        if let Some(policy) = toml.images.policy {
            config.image_policy = policy;
        }

        let pickup = toml.pickup;
        if let Some(size) = pickup.size {
            if size == 0 || size > MAX_CAROUSEL_ITEMS {
                return Err(Error::Config(format!(
                    "pickup.size must be between 1 and {}, got {}",
                    MAX_CAROUSEL_ITEMS, size
                )));
            }
            config.pickup.size = size;
        }
        if let Some(ms) = pickup.auto_advance_ms {
            config.pickup.timing.auto_advance = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = pickup.resume_after_ms {
            config.pickup.timing.resume_after = Duration::from_millis(ms);
        }
        if let Some(ms) = pickup.scroll_settle_ms {
            config.pickup.timing.scroll_settle = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Resolve and load the configuration
    ///
    /// `config_arg` and `root_arg` are command-line overrides. Also returns
    /// where the values came from, so the caller can log it once tracing is up.
    pub fn load(config_arg: Option<&Path>, root_arg: Option<&Path>) -> Result<(Self, ConfigOrigin)> {
        let (toml, origin) = match resolve_config_path(config_arg) {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(content) => (parse_toml(&content)?, ConfigOrigin::File(path)),
                Err(e) => (
                    TomlConfig::default(),
                    ConfigOrigin::Unreadable {
                        path,
                        error: Error::from(e),
                    },
                ),
            },
            None => (TomlConfig::default(), ConfigOrigin::Defaults),
        };

        let root = resolve_root_folder(root_arg, toml.root_folder.as_deref());
        Ok((Self::from_toml(toml, root)?, origin))
    }
}

/// Where the configuration values came from
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Read from this file
    File(PathBuf),
    /// The named file could not be read; defaults are in use
    Unreadable { path: PathBuf, error: Error },
    /// No config file was found
    Defaults,
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigOrigin::Unreadable { path, error } => warn!(
                "Config file {} not readable ({}), using defaults",
                path.display(),
                error
            ),
            ConfigOrigin::Defaults => info!("No config file found, using defaults"),
        }
    }
}

/// Parse config file contents
pub fn parse_toml(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Config file location: argument > `GIJIE_CONFIG` > user config dir (if the file exists)
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("gijie").join("config.toml"))
        .filter(|p| p.exists())
}

/// Site root: argument > `GIJIE_ROOT` > config file > current directory
pub fn resolve_root_folder(cli_arg: Option<&Path>, config_value: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = config_value {
        return path.to_path_buf();
    }

    PathBuf::from(".")
}

fn resolve_relative(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
