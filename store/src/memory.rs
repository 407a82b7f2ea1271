use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use lacquer_core::material::MaterialKey;
use lacquer_core::settings::MaterialSettings;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::provider::{SessionContext, SettingsStore, StoreFuture, VersionedSettings};

type RowKey = (String, MaterialKey);

/// In-memory settings store for tests, demos and offline viewers.
///
/// Clones share the same rows, so two sessions holding clones of one
/// store observe each other's writes exactly like two clients of a real
/// remote store. Use [`with_context`](Self::with_context) on a clone to
/// act as a different user on the same rows.
///
/// # Example
///
/// ```ignore
/// let store = MemoryStore::new();
/// let alice = store.clone().with_context(SessionContext::new("model-7").with_user("alice"));
/// let bob = store.with_context(SessionContext::new("model-7").with_user("bob"));
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    rows: Arc<RwLock<HashMap<RowKey, MaterialSettings>>>,
    offline: Arc<AtomicBool>,
    context: SessionContext,
}

impl MemoryStore {
    /// Create an empty store in the default context.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            offline: Arc::new(AtomicBool::new(false)),
            context: SessionContext::default(),
        }
    }

    /// Use `context` for every subsequent read and write.
    #[must_use]
    pub fn with_context(mut self, context: SessionContext) -> Self {
        self.context = context;
        self
    }

    /// Insert a row as-is, keeping its revision.
    ///
    /// Overwrites any existing row for the same key.
    pub fn insert(&self, settings: MaterialSettings) {
        let key = (self.context.context.clone(), settings.material_key.clone());
        self.rows.write().insert(key, settings);
    }

    /// The stored row for `key`, if any.
    pub fn row(&self, key: &MaterialKey) -> Option<MaterialSettings> {
        self.rows
            .read()
            .get(&(self.context.context.clone(), key.clone()))
            .cloned()
    }

    /// Delete the row for `key`, as another client or an admin would.
    pub fn remove(&self, key: &MaterialKey) -> Option<MaterialSettings> {
        self.rows
            .write()
            .remove(&(self.context.context.clone(), key.clone()))
    }

    /// Number of rows across every context.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Simulate an unreachable store. Shared by all clones.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(offline: &AtomicBool) -> Result<(), StoreError> {
        if offline.load(Ordering::SeqCst) {
            Err(StoreError::Transport("store is unreachable".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("context", &self.context.context)
            .field("rows", &self.len())
            .finish()
    }
}

impl SettingsStore for MemoryStore {
    fn context(&self) -> &SessionContext {
        &self.context
    }

    fn get_latest(&self, key: &MaterialKey) -> StoreFuture<Option<VersionedSettings>> {
        let rows = self.rows.clone();
        let offline = self.offline.clone();
        let row_key = (self.context.context.clone(), key.clone());
        Box::pin(async move {
            Self::check_online(&offline)?;
            Ok(rows.read().get(&row_key).cloned().map(VersionedSettings::new))
        })
    }

    fn save(
        &self,
        key: &MaterialKey,
        mut settings: MaterialSettings,
        expected_revision: Option<u64>,
    ) -> StoreFuture<u64> {
        let rows = self.rows.clone();
        let offline = self.offline.clone();
        let user = self.context.user.clone();
        let row_key = (self.context.context.clone(), key.clone());
        Box::pin(async move {
            Self::check_online(&offline)?;

            let mut rows = rows.write();
            let current = rows.get(&row_key);
            let revision = match (expected_revision, current) {
                (None, current) => current.map_or(0, |row| row.revision) + 1,
                (Some(0), None) => 1,
                (Some(_), None) => return Err(StoreError::NotFound(row_key.1)),
                (Some(expected), Some(row)) if row.revision == expected => expected + 1,
                (Some(_), Some(row)) => return Err(StoreError::conflict(row.clone())),
            };

            settings.material_key = row_key.1.clone();
            settings.revision = revision;
            settings.updated_at = now_millis();
            settings.updated_by = user;
            log::debug!("Stored {} at revision {revision}", row_key.1);
            rows.insert(row_key, settings);
            Ok(revision)
        })
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
