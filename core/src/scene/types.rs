//! Scene graph data types.

use crate::material::SharedMaterial;

use super::provider::SceneProvider;

/// A node in a scene graph tree.
///
/// Material references are indices into the owning [`Scene`]'s
/// [`materials`](Scene::materials). Two nodes holding the same index share
/// one material instance.
#[derive(Debug, Default)]
pub struct SceneNode {
    /// Node name, if any.
    pub name: Option<String>,
    /// Indices into [`Scene::materials`]. Empty for non-renderable nodes.
    pub materials: Vec<usize>,
    /// Child nodes forming the sub-tree.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the material indices.
    #[must_use]
    pub fn with_materials(mut self, materials: Vec<usize>) -> Self {
        self.materials = materials;
        self
    }

    /// Set the child nodes.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node draws anything.
    pub fn is_renderable(&self) -> bool {
        !self.materials.is_empty()
    }
}

/// A loaded scene: a forest of nodes plus the material instances they use.
#[derive(Debug, Default)]
pub struct Scene {
    /// Scene name, if any.
    pub name: Option<String>,
    /// Root nodes of the scene.
    pub nodes: Vec<SceneNode>,
    /// All material instances referenced by nodes in this scene.
    pub materials: Vec<SharedMaterial>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scene name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the root nodes.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<SceneNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Set the material instances.
    #[must_use]
    pub fn with_materials(mut self, materials: Vec<SharedMaterial>) -> Self {
        self.materials = materials;
        self
    }

    fn visit_node(&self, node: &SceneNode, visitor: &mut dyn FnMut(&SharedMaterial)) {
        for &index in &node.materials {
            match self.materials.get(index) {
                Some(material) => visitor(material),
                None => log::warn!(
                    "Node {:?} references missing material #{index}",
                    node.name.as_deref().unwrap_or("<unnamed>")
                ),
            }
        }
        for child in &node.children {
            self.visit_node(child, visitor);
        }
    }
}

impl SceneProvider for Scene {
    fn visit_materials(&self, visitor: &mut dyn FnMut(&SharedMaterial)) {
        for node in &self.nodes {
            self.visit_node(node, visitor);
        }
    }
}
