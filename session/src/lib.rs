//! # Lacquer Session
//!
//! Draft/commit session around the override engine:
//!
//! - [`DraftSessionController`] - Draft of the active key, selection race guard
//!   and the `Idle → Loading → Ready → Dirty → Saving → (Ready | Conflict)` machine
//! - [`ViewerSession`] - One viewer's index and controller, wired to scene reloads
//! - [`SessionEvent`] - Key list, form binding, status and conflict notifications
//! - [`SessionConfig`] - TOML configuration selecting the settings store
//!
//! ## Example
//!
//! ```ignore
//! use lacquer_session::{ViewerSession, ConflictChoice, init_logging, load_or_default};
//!
//! init_logging();
//! let (config, _) = load_or_default(Path::new("lacquer.toml"));
//! let mut viewer = ViewerSession::from_config(&config)?;
//! viewer.scene_loaded(&scene);
//!
//! viewer.load(&"Glass_01".into()).await?;
//! viewer.edit(&SettingsDelta::new().opacity(0.4))?;
//! if let SaveOutcome::Conflict { .. } = viewer.save().await? {
//!     viewer.resolve_conflict(ConflictChoice::Pull)?;
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
mod logging;
pub mod state;
pub mod viewer;

pub use config::{SessionConfig, ShaderConfig, StoreConfig, build_store, load_config, load_or_default};
pub use controller::{
    ConflictChoice, ConflictInfo, Draft, DraftSessionController, LoadOutcome, LoadRequest,
    LoadTicket, SaveOutcome, SaveRequest, SaveTicket, SelectionToken,
};
pub use error::{ConfigError, SessionError};
pub use events::{EventQueue, SessionEvent};
pub use logging::init_logging;
pub use state::SessionState;
pub use viewer::ViewerSession;

/// Session library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the session version once at startup.
pub fn init() {
    log::info!("Lacquer Session v{} initialized", VERSION);
}
