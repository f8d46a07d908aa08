//! # Store Configuration
//!
//! Configuration for the cart store: default currency, storage backend,
//! storage key and payload limit.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ARCA_DEFAULT_CURRENCY=USD                                          │
//! │     ARCA_STORAGE_BACKEND=memory                                        │
//! │     ARCA_STORAGE_DIR=/var/lib/elarca                                   │
//! │     ARCA_STORAGE_KEY=elarca-cart                                       │
//! │     ARCA_MAX_PAYLOAD_BYTES=524288                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart/cart.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.elarca.cart/cart.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     MXN, file backend in the platform data dir, 512 KiB limit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [cart]
//! default_currency = "MXN"
//! max_payload_bytes = 524288
//!
//! [storage]
//! backend = "file"      # file | memory
//! dir = "/var/lib/elarca"
//! key = "elarca-cart"
//! ```

use std::path::PathBuf;

use arca_core::validation::validate_storage_key;
use arca_core::CurrencyCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Key the cart payload is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "elarca-cart";

/// Default cap on the encoded payload (512 KiB).
///
/// Browser local storage typically allows ~5 MiB per origin shared by
/// everything on the site; the cart gets a tenth of it.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 512 * 1024;

// =============================================================================
// Storage Backend
// =============================================================================

/// Which [`CartStorage`](crate::storage::CartStorage) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON file under the storage directory; survives restarts.
    #[default]
    File,

    /// Process memory only; nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Cart behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Currency a fresh (or unreadable) cart starts in.
    #[serde(default)]
    pub default_currency: CurrencyCode,

    /// Payloads above this size are not written; the cart keeps working in
    /// memory.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            default_currency: CurrencyCode::default(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

/// Persistence medium settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Fixed key the cart payload is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            dir: None,
            key: default_storage_key(),
        }
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        validate_storage_key(&self.storage.key)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        if self.cart.max_payload_bytes == 0 {
            return Err(StoreError::InvalidConfig(
                "max_payload_bytes must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `ARCA_*` overrides read through `var`.
    ///
    /// `load` passes the process environment; tests pass a map.
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = var("ARCA_DEFAULT_CURRENCY") {
            match CurrencyCode::parse(&code) {
                Ok(currency) => {
                    debug!(currency = %currency, "Overriding default currency from environment");
                    self.cart.default_currency = currency;
                }
                Err(e) => warn!(error = %e, "Ignoring ARCA_DEFAULT_CURRENCY"),
            }
        }

        if let Some(backend) = var("ARCA_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(e) => warn!(error = %e, "Ignoring ARCA_STORAGE_BACKEND"),
            }
        }

        if let Some(dir) = var("ARCA_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = var("ARCA_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Some(limit) = var("ARCA_MAX_PAYLOAD_BYTES") {
            match limit.parse::<usize>() {
                Ok(bytes) => self.cart.max_payload_bytes = bytes,
                Err(_) => warn!(value = %limit, "Ignoring ARCA_MAX_PAYLOAD_BYTES"),
            }
        }
    }

    /// Directory the file backend writes to: the configured one, else the
    /// platform data directory.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(|| {
            directories::ProjectDirs::from("com", "elarca", "cart")
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "elarca", "cart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}
