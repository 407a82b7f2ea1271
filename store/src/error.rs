use lacquer_core::material::MaterialKey;
use lacquer_core::settings::MaterialSettings;
use thiserror::Error;

/// Errors that can occur during remote settings store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No row exists for the key, but the write required one.
    #[error("no settings row for {0}")]
    NotFound(MaterialKey),
    /// The expected revision did not match the stored one.
    ///
    /// Carries the row as currently stored so the caller can offer a pull.
    #[error("revision conflict: server is at revision {server_revision}")]
    Conflict {
        server_settings: Box<MaterialSettings>,
        server_revision: u64,
    },
    /// Network, auth or server failure. The write was not applied.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The store returned a row that does not decode.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    pub(crate) fn conflict(server_settings: MaterialSettings) -> Self {
        Self::Conflict {
            server_revision: server_settings.revision,
            server_settings: Box::new(server_settings),
        }
    }

    /// Whether the error is a transient failure worth retrying later.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidRecord(err.to_string())
    }
}
