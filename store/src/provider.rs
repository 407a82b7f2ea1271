use std::future::Future;
use std::pin::Pin;

use lacquer_core::material::MaterialKey;
use lacquer_core::settings::MaterialSettings;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// A boxed, `Send` future returning a `Result`.
///
/// All [`SettingsStore`] methods return this type. The futures are
/// `Send + 'static`, so a caller can keep several in flight and resolve
/// them in any order.
pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send>>;

/// A stored settings row with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedSettings {
    pub settings: MaterialSettings,
    pub revision: u64,
}

impl VersionedSettings {
    pub fn new(settings: MaterialSettings) -> Self {
        Self {
            revision: settings.revision,
            settings,
        }
    }
}

/// Who is talking to the store, and on behalf of which document.
///
/// Rows are addressed by `(context, material key)`. The token is passed
/// through as-is; acquiring or refreshing it is the host's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Document or model the rows belong to.
    pub context: String,
    /// Recorded as `updated_by` on writes.
    #[serde(default)]
    pub user: Option<String>,
    /// Bearer token for authenticated backends.
    #[serde(default)]
    pub token: Option<String>,
}

impl SessionContext {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            user: None,
            token: None,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Trait for revisioned settings store backends.
///
/// Revisions start at `1` for the first write of a row and strictly
/// increase on every write. The returned futures do not drive themselves;
/// the caller awaits them on whatever executor it runs.
///
/// # Conditional writes
///
/// `expected_revision` selects the precondition of [`save`](Self::save):
///
/// | `expected_revision` | Row absent | Row at `r` |
/// |---|---|---|
/// | `Some(0)` | created at `1` | `Conflict` |
/// | `Some(e)`, `e > 0` | `NotFound` | `r + 1` if `e == r`, else `Conflict` |
/// | `None` | created at `1` | `r + 1` |
///
/// A rejected write leaves the stored row unchanged.
pub trait SettingsStore: Send + Sync + 'static {
    /// The context rows are read from and written to.
    fn context(&self) -> &SessionContext;

    /// Fetch the latest row for `key`, `None` if it was never written.
    fn get_latest(&self, key: &MaterialKey) -> StoreFuture<Option<VersionedSettings>>;

    /// Write `settings` under `key`, returning the new revision.
    fn save(
        &self,
        key: &MaterialKey,
        settings: MaterialSettings,
        expected_revision: Option<u64>,
    ) -> StoreFuture<u64>;
}
