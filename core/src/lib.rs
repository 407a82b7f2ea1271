//! # Lacquer Core
//!
//! Data model shared by every Lacquer crate:
//!
//! - [`material`] - material keys, baseline snapshots, override uniforms and
//!   the [`RenderMaterial`](material::RenderMaterial) backend interface
//! - [`scene`] - scene graph types and the [`SceneProvider`](scene::SceneProvider)
//!   traversal interface
//! - [`settings`] - the persisted settings record and partial deltas
//! - [`chroma`] - CPU reference of the override fragment logic

pub mod chroma;
pub mod material;
pub mod scene;
pub mod settings;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core version once at startup.
pub fn init() {
    log::info!("Lacquer Core v{} initialized", VERSION);
}
