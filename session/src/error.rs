use std::path::PathBuf;

use lacquer_core::material::MaterialKey;
use lacquer_graphics::OverrideError;
use lacquer_store::StoreError;
use thiserror::Error;

use crate::state::SessionState;

/// Errors returned by the draft session controller.
///
/// Store failures during a save are reported here after the controller
/// has already recorded them (status message, draft kept, state `Dirty`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no material key is selected")]
    NoActiveKey,
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
    #[error("unknown material key: {0}")]
    UnknownKey(MaterialKey),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Override(#[from] OverrideError),
}

/// Errors raised while loading a session config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("store type \"rest\" requires base_url")]
    MissingBaseUrl,
    #[error("store type \"{0}\" is not available in this build")]
    UnsupportedStore(String),
}
