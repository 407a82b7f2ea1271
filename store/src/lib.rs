//! Revisioned settings store client for Lacquer.
//!
//! Persists one [`MaterialSettings`](lacquer_core::settings::MaterialSettings)
//! row per `(context, material key)` through the [`SettingsStore`] trait,
//! with optimistic concurrency: every write names the revision it was based
//! on and is rejected outright if the row moved on in the meantime.
//!
//! # Architecture
//!
//! Store operations return boxed futures (`Pin<Box<dyn Future + Send>>`).
//! They are not self-driving; the session awaits them on its own loop, and
//! a synchronous caller blocks on them with any executor:
//!
//! ```ignore
//! let latest = store.get_latest(&"Glass_01".into()).await?;
//! let revision = pollster::block_on(store.save(&key, settings, Some(latest_revision)))?;
//! ```
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process rows shared across clones, for tests and offline viewers
//! - [`RestStore`] - PostgREST-style HTTP table (requires `rest` feature)
//!
//! Custom backends implement [`SettingsStore`] and honor its conditional
//! write table.

mod error;
mod memory;
mod provider;
#[cfg(feature = "rest")]
mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use provider::{SessionContext, SettingsStore, StoreFuture, VersionedSettings};
#[cfg(feature = "rest")]
pub use rest::{RestConfig, RestStore};
