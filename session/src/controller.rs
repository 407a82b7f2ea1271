//! Draft session controller.
//!
//! Owns the draft of the active material key and drives it through
//! [`SessionState`]. Store operations are split into two phases so that a
//! single-threaded host can keep several of them in flight:
//!
//! ```ignore
//! let LoadRequest { ticket, future } = controller.select(&index, &key)?;
//! // ... the user may select another key before this resolves ...
//! controller.complete_load(&index, ticket, future.await);
//! ```
//!
//! Every request carries the [`SelectionToken`] current when it was issued.
//! A response whose token is no longer current is dropped on arrival, so a
//! slow fetch for one key can never overwrite the state of a newer
//! selection.

use std::sync::Arc;

use lacquer_core::material::MaterialKey;
use lacquer_core::settings::{ChromaDefaults, MaterialSettings, SettingsDelta};
use lacquer_graphics::{MaterialIndex, apply_override, apply_settings};
use lacquer_store::{SettingsStore, StoreError, StoreFuture, VersionedSettings};

use crate::error::SessionError;
use crate::events::{EventQueue, SessionEvent};
use crate::state::SessionState;

/// Monotonic guard identifying one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SelectionToken(u64);

impl SelectionToken {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Identifies an issued load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: SelectionToken,
    pub key: MaterialKey,
}

/// A load to await and hand back to [`DraftSessionController::complete_load`].
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub future: StoreFuture<Option<VersionedSettings>>,
}

/// Identifies an issued save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub token: SelectionToken,
    pub key: MaterialKey,
    /// Precondition sent with the write; `None` for a forced write.
    pub expected_revision: Option<u64>,
}

/// A save to await and hand back to [`DraftSessionController::complete_save`].
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub future: StoreFuture<u64>,
}

/// How a load response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored record was applied.
    Loaded { revision: u64 },
    /// No usable record; baseline defaults were applied.
    Defaults,
    /// A newer selection superseded this load; nothing changed.
    Superseded,
}

/// How a save response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored at `revision`. With `follow_up`, edits arrived while saving
    /// and [`DraftSessionController::follow_up_save`] has the next write.
    Saved { revision: u64, follow_up: bool },
    /// Rejected; the session waits for [`ConflictChoice`].
    Conflict { server_revision: u64 },
    /// The selection changed while saving; the session was not touched.
    Detached,
}

/// The user's answer to a rejected save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Replace the draft with the server's row, discarding local edits.
    Pull,
    /// Overwrite the server's row unconditionally.
    Force,
}

/// The server side of a rejected save.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictInfo {
    pub server_settings: MaterialSettings,
    pub server_revision: u64,
}

/// Candidate settings of the active key.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub key: MaterialKey,
    pub settings: MaterialSettings,
    /// Revision the draft is based on; `0` if the key has no row yet.
    pub loaded_revision: u64,
}

/// Owns the draft of the active key and its synchronization with a store.
///
/// One controller per viewer; it is the only writer of the overrides of the
/// instances it is handed, so no locking beyond the instance locks exists.
pub struct DraftSessionController {
    store: Arc<dyn SettingsStore>,
    chroma: ChromaDefaults,
    state: SessionState,
    token: SelectionToken,
    selected: Option<MaterialKey>,
    draft: Option<Draft>,
    conflict: Option<ConflictInfo>,
    /// Edits arrived while a save was in flight.
    edited_while_saving: bool,
    /// A save completed with pending edits and a follow-up is owed.
    follow_up_due: bool,
    events: EventQueue<SessionEvent>,
}

impl DraftSessionController {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            chroma: ChromaDefaults::default(),
            state: SessionState::Idle,
            token: SelectionToken::default(),
            selected: None,
            draft: None,
            conflict: None,
            edited_while_saving: false,
            follow_up_due: false,
            events: EventQueue::new(),
        }
    }

    /// Chroma parameters seeded into baseline-derived drafts.
    #[must_use]
    pub fn with_chroma_defaults(mut self, chroma: ChromaDefaults) -> Self {
        self.chroma = chroma;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection_token(&self) -> SelectionToken {
        self.token
    }

    /// The selected key, set from the moment a load is issued.
    pub fn active_key(&self) -> Option<&MaterialKey> {
        self.selected.as_ref()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn loaded_revision(&self) -> Option<u64> {
        self.draft.as_ref().map(|draft| draft.loaded_revision)
    }

    pub fn conflict(&self) -> Option<&ConflictInfo> {
        self.conflict.as_ref()
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    pub fn events(&self) -> &EventQueue<SessionEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<SessionEvent> {
        &mut self.events
    }

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.events.send(event);
    }

    // --- Selection ---

    /// Select `key` and issue the fetch of its latest settings.
    ///
    /// Any draft of the previous key is discarded, not saved.
    pub fn select(
        &mut self,
        index: &MaterialIndex,
        key: &MaterialKey,
    ) -> Result<LoadRequest, SessionError> {
        if !index.contains(key) {
            return Err(SessionError::UnknownKey(key.clone()));
        }

        self.token = self.token.next();
        self.selected = Some(key.clone());
        self.discard_draft();
        self.set_state(SessionState::Loading);
        log::debug!("Selecting {key} (token {})", self.token.0);

        Ok(LoadRequest {
            ticket: LoadTicket {
                token: self.token,
                key: key.clone(),
            },
            future: self.store.get_latest(key),
        })
    }

    /// Hand back the response of a load issued by [`select`](Self::select).
    pub fn complete_load(
        &mut self,
        index: &MaterialIndex,
        ticket: LoadTicket,
        result: Result<Option<VersionedSettings>, StoreError>,
    ) -> LoadOutcome {
        if ticket.token != self.token || self.state != SessionState::Loading {
            log::debug!("Dropping superseded load of {}", ticket.key);
            return LoadOutcome::Superseded;
        }
        let key = ticket.key;

        let (settings, outcome) = match result {
            Ok(Some(latest)) => {
                let revision = latest.revision;
                let mut settings = latest.settings;
                settings.material_key = key.clone();
                settings.revision = revision;
                (settings, LoadOutcome::Loaded { revision })
            }
            Ok(None) | Err(StoreError::NotFound(_)) => {
                match self.defaults(index, &key) {
                    Some(settings) => (settings, LoadOutcome::Defaults),
                    None => return self.lost_key(&key),
                }
            }
            Err(err) => {
                log::warn!("Loading settings for {key} failed: {err}");
                self.emit(SessionEvent::Status(format!(
                    "Could not load saved settings for {key}; showing defaults"
                )));
                match self.defaults(index, &key) {
                    Some(settings) => (settings, LoadOutcome::Defaults),
                    None => return self.lost_key(&key),
                }
            }
        };

        if let Err(err) = apply_settings(index, &settings) {
            log::warn!("Applying settings for {key} failed: {err}");
        }
        self.draft = Some(Draft {
            key: key.clone(),
            loaded_revision: settings.revision,
            settings: settings.clone(),
        });
        self.emit(SessionEvent::SettingsChanged { key, settings });
        self.set_state(SessionState::Ready);
        outcome
    }

    /// The key vanished from the index while its load was in flight.
    fn lost_key(&mut self, key: &MaterialKey) -> LoadOutcome {
        log::warn!("{key} is no longer indexed; dropping its load");
        self.selected = None;
        self.set_state(SessionState::Idle);
        LoadOutcome::Superseded
    }

    /// Select and load in one step.
    pub async fn load(
        &mut self,
        index: &MaterialIndex,
        key: &MaterialKey,
    ) -> Result<LoadOutcome, SessionError> {
        let LoadRequest { ticket, future } = self.select(index, key)?;
        let result = future.await;
        Ok(self.complete_load(index, ticket, result))
    }

    // --- Editing ---

    /// Merge `delta` into the draft and render it immediately.
    pub fn edit(&mut self, index: &MaterialIndex, delta: &SettingsDelta) -> Result<(), SessionError> {
        self.check_editable("edit")?;
        let delta = delta.sanitized();
        let Some(draft) = self.draft.as_mut() else {
            return Err(SessionError::NoActiveKey);
        };

        apply_override(index, &draft.key, &delta)?;
        draft.settings.apply_delta(&delta);
        let event = SessionEvent::SettingsChanged {
            key: draft.key.clone(),
            settings: draft.settings.clone(),
        };
        self.emit(event);
        self.mark_dirty();
        Ok(())
    }

    /// Replace the draft with baseline-derived values.
    ///
    /// The remote row is untouched until the next save.
    pub fn load_defaults(&mut self, index: &MaterialIndex) -> Result<(), SessionError> {
        self.check_editable("load defaults")?;
        let key = self.draft_key()?;
        let defaults = self
            .defaults(index, &key)
            .ok_or_else(|| SessionError::UnknownKey(key.clone()))?;
        apply_settings(index, &defaults)?;
        self.replace_draft_settings(defaults);
        Ok(())
    }

    /// Restore the active key's instances to their baseline.
    ///
    /// Unlike [`load_defaults`](Self::load_defaults) the instances are
    /// restored exactly, including uniforms. The draft follows and becomes
    /// dirty.
    pub fn reset_to_baseline(&mut self, index: &MaterialIndex) -> Result<(), SessionError> {
        self.check_editable("reset")?;
        let key = self.draft_key()?;
        let defaults = self
            .defaults(index, &key)
            .ok_or_else(|| SessionError::UnknownKey(key.clone()))?;
        index.reset_one(&key)?;
        self.replace_draft_settings(defaults);
        Ok(())
    }

    fn replace_draft_settings(&mut self, mut settings: MaterialSettings) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        settings.revision = draft.loaded_revision;
        draft.settings = settings;
        let event = SessionEvent::SettingsChanged {
            key: draft.key.clone(),
            settings: draft.settings.clone(),
        };
        self.emit(event);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        if self.state == SessionState::Saving {
            self.edited_while_saving = true;
        } else {
            self.set_state(SessionState::Dirty);
        }
    }

    // --- Saving ---

    /// Issue a write of the draft, conditional on its loaded revision.
    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        if !self.state.can_save() {
            return Err(self.invalid("save"));
        }
        let draft = self.draft.as_ref().ok_or(SessionError::NoActiveKey)?;
        let (key, settings) = (draft.key.clone(), draft.settings.clone());
        let expected = Some(draft.loaded_revision);
        let request = self.issue_save(key, settings, expected);
        self.set_state(SessionState::Saving);
        Ok(request)
    }

    fn issue_save(
        &mut self,
        key: MaterialKey,
        settings: MaterialSettings,
        expected_revision: Option<u64>,
    ) -> SaveRequest {
        self.follow_up_due = false;
        self.edited_while_saving = false;
        log::debug!("Saving {key} (expected revision {expected_revision:?})");
        SaveRequest {
            future: self.store.save(&key, settings, expected_revision),
            ticket: SaveTicket {
                token: self.token,
                key,
                expected_revision,
            },
        }
    }

    /// Hand back the response of a save.
    ///
    /// Store failures other than a conflict keep the draft, return the
    /// session to `Dirty` and are reported both as a status event and as
    /// the returned error.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<u64, StoreError>,
    ) -> Result<SaveOutcome, SessionError> {
        if ticket.token != self.token || self.state != SessionState::Saving {
            log::debug!("Save of {} finished after the selection changed", ticket.key);
            return Ok(SaveOutcome::Detached);
        }
        let key = ticket.key;

        match result {
            Ok(revision) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.loaded_revision = revision;
                    draft.settings.revision = revision;
                }
                self.conflict = None;
                self.emit(SessionEvent::Status(format!("Saved {key} (revision {revision})")));

                let follow_up = std::mem::take(&mut self.edited_while_saving);
                self.follow_up_due = follow_up;
                self.set_state(if follow_up {
                    SessionState::Dirty
                } else {
                    SessionState::Ready
                });
                Ok(SaveOutcome::Saved {
                    revision,
                    follow_up,
                })
            }
            Err(StoreError::Conflict {
                server_settings,
                server_revision,
            }) => {
                log::info!("Save of {key} rejected: server is at revision {server_revision}");
                let server_settings = *server_settings;
                self.emit(SessionEvent::Conflict {
                    key,
                    server_settings: server_settings.clone(),
                    server_revision,
                });
                self.conflict = Some(ConflictInfo {
                    server_settings,
                    server_revision,
                });
                self.edited_while_saving = false;
                self.set_state(SessionState::Conflict);
                Ok(SaveOutcome::Conflict { server_revision })
            }
            Err(err) => {
                log::warn!("Save of {key} failed: {err}");
                if matches!(err, StoreError::NotFound(_)) {
                    // The row was deleted remotely; the next save creates it.
                    if let Some(draft) = self.draft.as_mut() {
                        draft.loaded_revision = 0;
                    }
                }
                self.emit(SessionEvent::Status(format!("Could not save {key}: {err}")));
                self.edited_while_saving = false;
                self.set_state(SessionState::Dirty);
                Err(SessionError::Store(err))
            }
        }
    }

    /// The follow-up write owed after edits arrived during a save.
    pub fn follow_up_save(&mut self) -> Option<SaveRequest> {
        if !self.follow_up_due {
            return None;
        }
        self.follow_up_due = false;
        self.begin_save().ok()
    }

    /// Begin and complete a save in one step, including follow-ups.
    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        let SaveRequest { ticket, future } = self.begin_save()?;
        let mut outcome = self.complete_save(ticket, future.await)?;
        while let SaveOutcome::Saved { follow_up: true, .. } = outcome {
            let Some(SaveRequest { ticket, future }) = self.follow_up_save() else {
                break;
            };
            outcome = self.complete_save(ticket, future.await)?;
        }
        Ok(outcome)
    }

    // --- Conflicts ---

    /// Resolve a rejected save.
    ///
    /// [`Pull`](ConflictChoice::Pull) applies the server's row and returns
    /// `None`. [`Force`](ConflictChoice::Force) returns the unconditional
    /// write to await and hand to [`complete_save`](Self::complete_save).
    pub fn resolve_conflict(
        &mut self,
        index: &MaterialIndex,
        choice: ConflictChoice,
    ) -> Result<Option<SaveRequest>, SessionError> {
        if self.state != SessionState::Conflict {
            return Err(self.invalid("resolve a conflict"));
        }
        let (key, settings) = match &self.draft {
            Some(draft) => (draft.key.clone(), draft.settings.clone()),
            None => return Err(SessionError::NoActiveKey),
        };
        let Some(conflict) = self.conflict.take() else {
            return Err(self.invalid("resolve a conflict"));
        };

        match choice {
            ConflictChoice::Pull => {
                let mut pulled = conflict.server_settings;
                pulled.material_key = key.clone();
                pulled.revision = conflict.server_revision;
                apply_settings(index, &pulled)?;
                if let Some(draft) = self.draft.as_mut() {
                    draft.settings = pulled.clone();
                    draft.loaded_revision = conflict.server_revision;
                }
                log::info!("Pulled {key} at revision {}", conflict.server_revision);
                self.emit(SessionEvent::SettingsChanged {
                    key,
                    settings: pulled,
                });
                self.set_state(SessionState::Ready);
                Ok(None)
            }
            ConflictChoice::Force => {
                log::info!("Overwriting {key} over revision {}", conflict.server_revision);
                let request = self.issue_save(key, settings, None);
                self.set_state(SessionState::Saving);
                Ok(Some(request))
            }
        }
    }

    // --- Scene lifecycle ---

    /// Forget the selection and draft after the scene was reloaded.
    ///
    /// In-flight loads and saves are detached by the token bump.
    pub fn scene_reloaded(&mut self) {
        self.token = self.token.next();
        self.selected = None;
        self.discard_draft();
        self.set_state(SessionState::Idle);
    }

    fn discard_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            if self.state == SessionState::Dirty {
                log::debug!("Discarding unsaved draft of {}", draft.key);
            }
        }
        self.conflict = None;
        self.edited_while_saving = false;
        self.follow_up_due = false;
    }

    // --- Helpers ---

    fn defaults(&self, index: &MaterialIndex, key: &MaterialKey) -> Option<MaterialSettings> {
        index
            .baseline(key)
            .map(|baseline| MaterialSettings::from_baseline(key.clone(), baseline, &self.chroma))
    }

    fn draft_key(&self) -> Result<MaterialKey, SessionError> {
        self.draft
            .as_ref()
            .map(|draft| draft.key.clone())
            .ok_or(SessionError::NoActiveKey)
    }

    fn check_editable(&self, action: &'static str) -> Result<(), SessionError> {
        if self.draft.is_none() && matches!(self.state, SessionState::Idle) {
            return Err(SessionError::NoActiveKey);
        }
        if !self.state.accepts_edits() {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            action,
            state: self.state,
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.events.send(SessionEvent::StateChanged(state));
        }
    }
}

impl std::fmt::Debug for DraftSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftSessionController")
            .field("state", &self.state)
            .field("token", &self.token)
            .field("selected", &self.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacquer_core::material::{CpuMaterial, RenderMaterial, SharedMaterial, share};
    use lacquer_core::scene::{Scene, SceneNode};
    use lacquer_store::MemoryStore;

    static_assertions::assert_impl_all!(DraftSessionController: Send);

    const FRAGMENT: &str = "#include <override_pars_fragment>\nvoid main() {\n#include <override_fragment>\n}\n";

    fn setup() -> (MaterialIndex, SharedMaterial, MemoryStore, DraftSessionController) {
        let glass = share(
            CpuMaterial::new()
                .with_name("Glass_01")
                .with_fragment_source(FRAGMENT),
        );
        let wood = share(
            CpuMaterial::new()
                .with_name("Wood_02")
                .with_fragment_source(FRAGMENT),
        );
        let scene = Scene::new()
            .with_materials(vec![glass.clone(), wood])
            .with_nodes(vec![SceneNode::new().with_materials(vec![0, 1])]);
        let mut index = MaterialIndex::new();
        index.rebuild(&scene);

        let store = MemoryStore::new();
        let controller = DraftSessionController::new(Arc::new(store.clone()));
        (index, glass, store, controller)
    }

    fn load(controller: &mut DraftSessionController, index: &MaterialIndex, key: &str) -> LoadOutcome {
        let LoadRequest { ticket, future } = controller.select(index, &key.into()).unwrap();
        controller.complete_load(index, ticket, pollster::block_on(future))
    }

    #[test]
    fn unknown_key_cannot_be_selected() {
        let (index, _, _, mut controller) = setup();
        let result = controller.select(&index, &"Nope".into());
        assert!(matches!(result, Err(SessionError::UnknownKey(_))));
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn edit_before_selection_fails() {
        let (index, _, _, mut controller) = setup();
        let result = controller.edit(&index, &SettingsDelta::new().opacity(0.5));
        assert_eq!(result, Err(SessionError::NoActiveKey));
    }

    #[test]
    fn select_loads_defaults_and_edit_renders() {
        let (index, glass, _, mut controller) = setup();
        assert_eq!(load(&mut controller, &index, "Glass_01"), LoadOutcome::Defaults);
        assert_eq!(controller.state(), SessionState::Ready);
        assert_eq!(controller.loaded_revision(), Some(0));

        controller
            .edit(&index, &SettingsDelta::new().opacity(0.4))
            .unwrap();
        assert_eq!(controller.state(), SessionState::Dirty);
        assert_eq!(glass.read().opacity(), 0.4);
        assert!(glass.read().transparent());
    }

    #[test]
    fn save_while_saving_is_rejected() {
        let (index, _, _, mut controller) = setup();
        load(&mut controller, &index, "Glass_01");
        let _request = controller.begin_save().unwrap();
        assert!(matches!(
            controller.begin_save(),
            Err(SessionError::InvalidState { state: SessionState::Saving, .. })
        ));
    }

    #[test]
    fn edits_while_saving_owe_a_follow_up() {
        let (index, _, store, mut controller) = setup();
        load(&mut controller, &index, "Glass_01");
        controller.edit(&index, &SettingsDelta::new().opacity(0.7)).unwrap();

        let SaveRequest { ticket, future } = controller.begin_save().unwrap();
        controller.edit(&index, &SettingsDelta::new().opacity(0.3)).unwrap();
        assert_eq!(controller.state(), SessionState::Saving);

        let outcome = controller.complete_save(ticket, pollster::block_on(future)).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved { revision: 1, follow_up: true });
        assert_eq!(controller.state(), SessionState::Dirty);

        let SaveRequest { ticket, future } = controller.follow_up_save().unwrap();
        assert_eq!(ticket.expected_revision, Some(1));
        let outcome = controller.complete_save(ticket, pollster::block_on(future)).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved { revision: 2, follow_up: false });
        assert_eq!(store.row(&"Glass_01".into()).unwrap().opacity, 0.3);
        assert!(controller.follow_up_save().is_none());
    }

    #[test]
    fn load_defaults_marks_dirty_without_writing() {
        let (index, glass, store, mut controller) = setup();
        load(&mut controller, &index, "Glass_01");
        controller.edit(&index, &SettingsDelta::new().opacity(0.2)).unwrap();
        pollster::block_on(controller.save()).unwrap();

        controller.load_defaults(&index).unwrap();
        assert_eq!(controller.state(), SessionState::Dirty);
        assert_eq!(glass.read().opacity(), 1.0);
        assert_eq!(controller.draft().unwrap().settings.opacity, 1.0);
        assert_eq!(store.row(&"Glass_01".into()).unwrap().opacity, 0.2);
    }

    #[test]
    fn reset_to_baseline_restores_instances() {
        let (index, glass, _, mut controller) = setup();
        load(&mut controller, &index, "Glass_01");
        controller
            .edit(&index, &SettingsDelta::new().unlit_like(true).double_sided(true))
            .unwrap();

        controller.reset_to_baseline(&index).unwrap();
        let m = glass.read();
        assert!(!m.override_uniforms().unlit);
        assert!(m.tone_mapped());
        assert!(!controller.draft().unwrap().settings.unlit_like);
    }

    #[test]
    fn scene_reload_detaches_in_flight_load() {
        let (index, _, _, mut controller) = setup();
        let LoadRequest { ticket, future } = controller.select(&index, &"Glass_01".into()).unwrap();
        controller.scene_reloaded();

        let outcome = controller.complete_load(&index, ticket, pollster::block_on(future));
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.draft().is_none());
    }

    #[test]
    fn resolve_without_conflict_is_invalid() {
        let (index, _, _, mut controller) = setup();
        load(&mut controller, &index, "Glass_01");
        assert!(matches!(
            controller.resolve_conflict(&index, ConflictChoice::Pull),
            Err(SessionError::InvalidState { .. })
        ));
    }
}
