use crate::material::SharedMaterial;

/// Traversal primitive over a loaded scene.
///
/// Implemented by every scene representation the override engine can index.
/// The visitor is called once per (node, material) reference, in traversal
/// order; a material shared by several nodes is visited several times and
/// the index deduplicates by identity.
pub trait SceneProvider {
    /// Visit every material referenced by a renderable node.
    fn visit_materials(&self, visitor: &mut dyn FnMut(&SharedMaterial));
}
