use std::path::Path;
use std::sync::Arc;

use lacquer_core::settings::ChromaDefaults;
use lacquer_store::{MemoryStore, SessionContext, SettingsStore};
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level viewer session configuration loaded from `lacquer.toml`.
///
/// ```toml
/// [session]
/// context = "model-7"
/// user = "alice"
///
/// [store]
/// type = "rest"
/// base_url = "https://db.example.com/rest/v1"
/// timeout_ms = 5000
///
/// [chroma]
/// tolerance = 0.2
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub session: SessionContext,
    #[serde(default)]
    pub store: StoreConfig,
    /// Chroma parameters seeded into baseline-derived drafts.
    #[serde(default)]
    pub chroma: ChromaDefaults,
    #[serde(default)]
    pub shader: ShaderConfig,
}

/// Settings store backend selection.
///
/// The `type` field selects the backend: `"memory"` (default) or `"rest"`.
/// REST stores use the `base_url`, `table`, and `timeout_ms` fields.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `"memory"` (default) or `"rest"`.
    #[serde(default = "default_store_type")]
    pub r#type: String,
    // REST-specific fields (ignored for memory stores).
    pub base_url: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            r#type: default_store_type(),
            base_url: None,
            table: default_table(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_store_type() -> String {
    "memory".into()
}

fn default_table() -> String {
    "material_settings".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Shader patching options.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ShaderConfig {
    /// Parse and validate every patched fragment shader.
    #[serde(default)]
    pub validate: bool,
}

/// Load a session config from a TOML file.
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the settings store a config selects.
pub fn build_store(config: &SessionConfig) -> Result<Arc<dyn SettingsStore>, ConfigError> {
    match config.store.r#type.as_str() {
        "memory" => {
            log::info!("Settings store: in-memory ({})", config.session.context);
            Ok(Arc::new(
                MemoryStore::new().with_context(config.session.clone()),
            ))
        }
        #[cfg(feature = "rest")]
        "rest" => {
            let base_url = config
                .store
                .base_url
                .clone()
                .ok_or(ConfigError::MissingBaseUrl)?;
            let rest = lacquer_store::RestConfig::new(base_url)
                .with_table(config.store.table.clone())
                .with_timeout(std::time::Duration::from_millis(config.store.timeout_ms));
            Ok(Arc::new(lacquer_store::RestStore::new(
                rest,
                config.session.clone(),
            )))
        }
        other => Err(ConfigError::UnsupportedStore(other.to_string())),
    }
}

/// Load a session config, falling back to an in-memory store if the file
/// doesn't exist or selects a store that can't be built.
pub fn load_or_default(path: &Path) -> (SessionConfig, Arc<dyn SettingsStore>) {
    let config = match load_config(path) {
        Ok(config) => {
            log::info!(
                "Loaded session config: context {} ({} store)",
                config.session.context,
                config.store.r#type
            );
            config
        }
        Err(e) => {
            log::warn!("No session config ({e}), using defaults");
            SessionConfig::default()
        }
    };

    match build_store(&config) {
        Ok(store) => (config, store),
        Err(e) => {
            log::error!("Failed to build settings store: {e}; falling back to memory");
            let store: Arc<dyn SettingsStore> =
                Arc::new(MemoryStore::new().with_context(config.session.clone()));
            (config, store)
        }
    }
}
