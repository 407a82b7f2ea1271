//! Scene graph types and the traversal interface consumed by the index.
//!
//! - [`Scene`] - A loaded scene with nodes and shared material instances
//! - [`SceneNode`] - A node in the scene tree
//! - [`SceneProvider`] - Traversal primitive yielding renderable materials

mod provider;
mod types;

pub use provider::SceneProvider;
pub use types::{Scene, SceneNode};
