//! Common utilities for index integration tests.

#![allow(dead_code)]

use lacquer_core::material::{CpuMaterial, SharedMaterial, share};
use lacquer_core::scene::{Scene, SceneNode};

/// Minimal fragment shader exposing both override hooks.
pub const HOOKED_FRAGMENT: &str = r#"#version 450
#include <override_pars_fragment>

layout(location = 0) out vec4 out_color;

layout(std140, set = 1, binding = 0) uniform MaterialParams {
    vec4 base_color;
    float opacity;
} material;

void main() {
    vec4 diffuse_color = vec4(material.base_color.rgb, material.base_color.a * material.opacity);
    out_color = vec4(diffuse_color.rgb * 0.8, diffuse_color.a);
#include <override_fragment>
}
"#;

/// A patchable material with the given name.
pub fn hooked(name: &str) -> SharedMaterial {
    share(
        CpuMaterial::new()
            .with_name(name)
            .with_fragment_source(HOOKED_FRAGMENT),
    )
}

/// A named material whose backend exposes no fragment hook.
pub fn legacy(name: &str) -> SharedMaterial {
    share(CpuMaterial::new().with_name(name))
}

/// One node per material slot, grouped under a root node.
pub fn flat_scene(materials: Vec<SharedMaterial>) -> Scene {
    let children = (0..materials.len())
        .map(|i| SceneNode::new().with_name(format!("mesh_{i}")).with_materials(vec![i]))
        .collect();
    Scene::new()
        .with_name("test")
        .with_materials(materials)
        .with_nodes(vec![SceneNode::new().with_name("root").with_children(children)])
}
