//! One viewer's override session: its index plus its draft controller.
//!
//! Several viewers can coexist; each owns its own [`MaterialIndex`] and
//! [`DraftSessionController`] and shares nothing but, optionally, a store.

use std::sync::Arc;

use lacquer_core::material::MaterialKey;
use lacquer_core::scene::SceneProvider;
use lacquer_core::settings::{ChromaDefaults, SettingsDelta};
use lacquer_graphics::{MaterialIndex, OverrideInjector, SceneReady};
use lacquer_store::{SettingsStore, StoreError, VersionedSettings};

use crate::config::{SessionConfig, build_store};
use crate::controller::{
    ConflictChoice, DraftSessionController, LoadOutcome, LoadRequest, LoadTicket, SaveOutcome,
    SaveRequest, SaveTicket,
};
use crate::error::{ConfigError, SessionError};
use crate::events::SessionEvent;
use crate::state::SessionState;

/// Index and draft controller of one viewer, wired to scene reloads.
pub struct ViewerSession {
    index: MaterialIndex,
    controller: DraftSessionController,
}

impl ViewerSession {
    /// Create a session writing to `store` with the standard injector.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            index: MaterialIndex::new(),
            controller: DraftSessionController::new(store),
        }
    }

    /// Create a session from a loaded config.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let store = build_store(config)?;
        let injector = OverrideInjector::with_standard_library().with_validation(config.shader.validate);
        Ok(Self {
            index: MaterialIndex::with_injector(injector),
            controller: DraftSessionController::new(store).with_chroma_defaults(config.chroma),
        })
    }

    #[must_use]
    pub fn with_chroma_defaults(mut self, chroma: ChromaDefaults) -> Self {
        self.controller = self.controller.with_chroma_defaults(chroma);
        self
    }

    pub fn index(&self) -> &MaterialIndex {
        &self.index
    }

    pub fn controller(&self) -> &DraftSessionController {
        &self.controller
    }

    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    // --- Scene lifecycle ---

    /// Re-index after the scene was (re)loaded.
    ///
    /// The current draft is discarded, even if the new scene has a material
    /// with the same name. Returns the new scene generation.
    pub fn scene_loaded(&mut self, provider: &dyn SceneProvider) -> u64 {
        self.controller.scene_reloaded();
        let generation = self.index.rebuild(provider);
        let keys = self.index.keys();
        self.controller.emit(SessionEvent::KeysPopulated(keys));
        generation
    }

    /// Resolves once a scene has been indexed.
    pub fn ready(&self) -> SceneReady {
        self.index.ready()
    }

    pub fn keys(&self) -> Vec<MaterialKey> {
        self.index.keys()
    }

    // --- Controller forwarding ---

    pub fn select(&mut self, key: &MaterialKey) -> Result<LoadRequest, SessionError> {
        self.controller.select(&self.index, key)
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<VersionedSettings>, StoreError>,
    ) -> LoadOutcome {
        self.controller.complete_load(&self.index, ticket, result)
    }

    pub async fn load(&mut self, key: &MaterialKey) -> Result<LoadOutcome, SessionError> {
        self.controller.load(&self.index, key).await
    }

    pub fn edit(&mut self, delta: &SettingsDelta) -> Result<(), SessionError> {
        self.controller.edit(&self.index, delta)
    }

    pub fn load_defaults(&mut self) -> Result<(), SessionError> {
        self.controller.load_defaults(&self.index)
    }

    pub fn reset_to_baseline(&mut self) -> Result<(), SessionError> {
        self.controller.reset_to_baseline(&self.index)
    }

    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        self.controller.begin_save()
    }

    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<u64, StoreError>,
    ) -> Result<SaveOutcome, SessionError> {
        self.controller.complete_save(ticket, result)
    }

    pub fn follow_up_save(&mut self) -> Option<SaveRequest> {
        self.controller.follow_up_save()
    }

    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        self.controller.save().await
    }

    pub fn resolve_conflict(
        &mut self,
        choice: ConflictChoice,
    ) -> Result<Option<SaveRequest>, SessionError> {
        self.controller.resolve_conflict(&self.index, choice)
    }

    // --- Reset ---

    /// Restore every indexed instance to its baseline.
    ///
    /// The active draft, if any, follows its key back to the defaults.
    pub fn reset_all(&mut self) {
        self.index.reset_all();
        if self.controller.state().accepts_edits() {
            if let Err(err) = self.controller.reset_to_baseline(&self.index) {
                log::warn!("Resetting the active draft failed: {err}");
            }
        }
    }

    /// Restore one key's instances to their baseline.
    ///
    /// For the active key the draft follows, as with
    /// [`reset_to_baseline`](Self::reset_to_baseline).
    pub fn reset_one(&mut self, key: &MaterialKey) -> Result<usize, SessionError> {
        if self.controller.draft().is_some_and(|draft| &draft.key == key)
            && self.controller.state().accepts_edits()
        {
            self.controller.reset_to_baseline(&self.index)?;
            return Ok(self.index.instances(key).map_or(0, <[_]>::len));
        }
        Ok(self.index.reset_one(key)?)
    }

    // --- Events ---

    /// Take every pending UI event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.controller.events_mut().drain()
    }
}

impl std::fmt::Debug for ViewerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("index", &self.index)
            .field("controller", &self.controller)
            .finish()
    }
}
