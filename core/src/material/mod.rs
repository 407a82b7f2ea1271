//! Material-side data model for the override engine.
//!
//! - [`MaterialKey`] - stable identifier of a surface group
//! - [`RenderMaterial`] - interface every rendering backend implements for
//!   its live material objects
//! - [`SharedMaterial`] - a material instance shared between scene nodes
//! - [`BaselineSnapshot`] - immutable render state captured at index time
//! - [`OverrideUniforms`] - live shader parameters of the override patch
//! - [`CpuMaterial`] - backend-neutral material used by tests and CPU previews
//!
//! # Shared instances
//!
//! Two scene nodes that reference the same material object hold clones of
//! the same [`SharedMaterial`] `Arc`. Any override written through one of
//! them is visible through all of them.

mod cpu;
mod key;
mod types;

pub use cpu::CpuMaterial;
pub use key::{MaterialKey, is_selectable_name};
pub use types::{
    BaselineSnapshot, CullMode, OverrideUniformData, OverrideUniforms, RenderMaterial,
    SharedMaterial, share,
};
