//! # Lacquer Graphics
//!
//! Per-material override engine on top of a backend's material instances.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`MaterialIndex`] - Name to instances map with baseline capture, rebuilt per scene load
//! - [`OverrideInjector`] - One-time fragment shader patch adding unlit and chroma-key paths
//! - [`apply_override`] - The single code path applying settings to instances
//! - [`SceneReady`] - Future resolving when a scene generation has been indexed
//!
//! ## Example
//!
//! ```ignore
//! use lacquer_graphics::{MaterialIndex, apply_override};
//! use lacquer_core::settings::SettingsDelta;
//!
//! let mut index = MaterialIndex::new();
//! index.rebuild(&scene);
//! apply_override(&index, &"Glass_01".into(), &SettingsDelta::new().opacity(0.4))?;
//! ```

pub mod error;
pub mod index;
pub mod overrides;
pub mod ready;
pub mod shader;

// Re-export main types for convenience
pub use error::OverrideError;
pub use index::{ExcludedInstance, IndexedInstance, MaterialIndex};
pub use overrides::{apply_override, apply_settings};
pub use ready::{ReadySignal, SceneReady};
pub use shader::{OverrideInjector, ShaderLibrary};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the graphics version once at startup.
pub fn init() {
    log::info!("Lacquer Graphics v{} initialized", VERSION);
}
