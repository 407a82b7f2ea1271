use std::time::Duration;

use lacquer_core::material::MaterialKey;
use lacquer_core::settings::MaterialSettings;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::memory::now_millis;
use crate::provider::{SessionContext, SettingsStore, StoreFuture, VersionedSettings};

/// Attempts of the fetch-then-write loop behind an unconditional save.
const FORCE_ATTEMPTS: usize = 3;

/// Connection settings of a [`RestStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RestConfig {
    /// Base URL of the REST endpoint, e.g. `https://db.example.com/rest/v1`.
    pub base_url: String,
    /// Table holding one row per `(context, material_key)`.
    pub table: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table: "material_settings".into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

/// Wire form of a row: the settings record plus its context column.
#[derive(Debug, Serialize, Deserialize)]
struct Row {
    context: String,
    #[serde(flatten)]
    settings: MaterialSettings,
}

/// Settings store backed by a PostgREST-style HTTP table.
///
/// Conditional writes map onto filtered requests:
///
/// - first write: `POST` insert; a unique-key violation (`409`) means
///   someone else created the row first,
/// - revisioned write: `PATCH ...&revision=eq.{expected}`; an empty result
///   means the precondition failed,
/// - in both cases the current row is fetched to build the conflict.
///
/// All I/O is blocking (`ureq`) inside the returned futures, so callers on
/// a UI thread should run them on a worker. The configured timeout bounds
/// every request.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    context: SessionContext,
}

impl RestStore {
    pub fn new(config: RestConfig, context: SessionContext) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        log::info!("Settings store at {}", config.endpoint());
        Self {
            client: Client {
                agent,
                endpoint: config.endpoint(),
                context: context.clone(),
            },
            context,
        }
    }
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("endpoint", &self.client.endpoint)
            .field("context", &self.context.context)
            .finish()
    }
}

impl SettingsStore for RestStore {
    fn context(&self) -> &SessionContext {
        &self.context
    }

    fn get_latest(&self, key: &MaterialKey) -> StoreFuture<Option<VersionedSettings>> {
        let client = self.client.clone();
        let key = key.clone();
        Box::pin(async move { client.fetch(&key) })
    }

    fn save(
        &self,
        key: &MaterialKey,
        settings: MaterialSettings,
        expected_revision: Option<u64>,
    ) -> StoreFuture<u64> {
        let client = self.client.clone();
        let key = key.clone();
        Box::pin(async move {
            match expected_revision {
                Some(expected) => client.conditional_save(&key, settings, expected),
                None => client.force_save(&key, settings),
            }
        })
    }
}

/// The blocking half, cloned into every future.
#[derive(Clone)]
struct Client {
    agent: ureq::Agent,
    endpoint: String,
    context: SessionContext,
}

impl Client {
    fn request(&self, method: &str, key: &MaterialKey) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, &self.endpoint)
            .query("context", &format!("eq.{}", self.context.context))
            .query("material_key", &format!("eq.{key}"))
            .set("Accept", "application/json");
        if let Some(token) = &self.context.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }

    fn fetch(&self, key: &MaterialKey) -> Result<Option<VersionedSettings>, StoreError> {
        let response = self
            .request("GET", key)
            .query("limit", "1")
            .call()
            .map_err(transport)?;
        let rows = read_rows(response)?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| VersionedSettings::new(row.settings)))
    }

    fn conditional_save(
        &self,
        key: &MaterialKey,
        settings: MaterialSettings,
        expected: u64,
    ) -> Result<u64, StoreError> {
        let row = self.row(key, settings, expected + 1);

        if expected == 0 {
            let mut request = self
                .agent
                .post(&self.endpoint)
                .set("Prefer", "return=representation");
            if let Some(token) = &self.context.token {
                request = request.set("Authorization", &format!("Bearer {token}"));
            }
            return match request.send_json(&row) {
                Ok(_) => Ok(1),
                Err(ureq::Error::Status(409, _)) => Err(self.rejected(key)),
                Err(err) => Err(transport(err)),
            };
        }

        let response = self
            .request("PATCH", key)
            .query("revision", &format!("eq.{expected}"))
            .set("Prefer", "return=representation")
            .send_json(&row)
            .map_err(transport)?;
        if read_rows(response)?.is_empty() {
            return Err(self.rejected(key));
        }
        Ok(expected + 1)
    }

    fn force_save(&self, key: &MaterialKey, settings: MaterialSettings) -> Result<u64, StoreError> {
        let mut last = None;
        for _ in 0..FORCE_ATTEMPTS {
            let current = self.fetch(key)?.map_or(0, |latest| latest.revision);
            match self.conditional_save(key, settings.clone(), current) {
                Err(err @ (StoreError::Conflict { .. } | StoreError::NotFound(_))) => {
                    log::debug!("Forced save of {key} raced another writer, retrying");
                    last = Some(err);
                }
                other => return other,
            }
        }
        Err(last.unwrap_or_else(|| StoreError::Transport("forced save gave up".into())))
    }

    /// Build the error for a write whose precondition failed.
    fn rejected(&self, key: &MaterialKey) -> StoreError {
        match self.fetch(key) {
            Ok(Some(latest)) => StoreError::conflict(latest.settings),
            Ok(None) => StoreError::NotFound(key.clone()),
            Err(err) => err,
        }
    }

    fn row(&self, key: &MaterialKey, mut settings: MaterialSettings, revision: u64) -> Row {
        settings.material_key = key.clone();
        settings.revision = revision;
        settings.updated_at = now_millis();
        settings.updated_by = self.context.user.clone();
        Row {
            context: self.context.context.clone(),
            settings,
        }
    }
}

fn read_rows(response: ureq::Response) -> Result<Vec<Row>, StoreError> {
    let body = response.into_string().map_err(|e| StoreError::Transport(e.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

fn transport(err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(code, response) => {
            StoreError::Transport(format!("HTTP {code} from {}", response.get_url()))
        }
        ureq::Error::Transport(t) => StoreError::Transport(t.to_string()),
    }
}
