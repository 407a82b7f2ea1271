use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lacquer_core::material::{CpuMaterial, SharedMaterial, share};
use lacquer_core::scene::{Scene, SceneNode};
use lacquer_core::settings::SettingsDelta;
use lacquer_graphics::{MaterialIndex, OverrideInjector, apply_override};

const FRAGMENT: &str = r#"#version 450
#include <override_pars_fragment>
layout(location = 0) out vec4 out_color;
void main() {
    vec4 diffuse_color = vec4(1.0);
    out_color = diffuse_color;
#include <override_fragment>
}
"#;

/// Scene with `keys` names, each shared by `per_key` distinct instances.
fn scene(keys: usize, per_key: usize) -> Scene {
    let materials: Vec<SharedMaterial> = (0..keys)
        .flat_map(|k| {
            (0..per_key).map(move |_| {
                share(
                    CpuMaterial::new()
                        .with_name(format!("Material_{k:03}"))
                        .with_fragment_source(FRAGMENT),
                )
            })
        })
        .collect();
    let nodes = (0..materials.len())
        .map(|i| SceneNode::new().with_materials(vec![i]))
        .collect();
    Scene::new().with_materials(materials).with_nodes(nodes)
}

// ---------------------------------------------------------------------------
// Shader injection
// ---------------------------------------------------------------------------

fn bench_inject(c: &mut Criterion) {
    let injector = OverrideInjector::with_standard_library();
    c.bench_function("override_inject_fragment", |b| {
        b.iter(|| black_box(injector.inject("Glass_01", black_box(FRAGMENT))));
    });
}

// ---------------------------------------------------------------------------
// Index rebuild
// ---------------------------------------------------------------------------

fn bench_rebuild(c: &mut Criterion) {
    c.bench_function("index_rebuild_64_keys_x4", |b| {
        b.iter_with_setup(
            || scene(64, 4),
            |scene| {
                let mut index = MaterialIndex::new();
                black_box(index.rebuild(&scene));
            },
        );
    });
}

// ---------------------------------------------------------------------------
// Live preview path
// ---------------------------------------------------------------------------

fn bench_apply_override(c: &mut Criterion) {
    let scene = scene(16, 8);
    let mut index = MaterialIndex::new();
    index.rebuild(&scene);
    let key = "Material_007".into();
    let delta = SettingsDelta::new()
        .opacity(0.5)
        .chroma_enable(true)
        .chroma_tolerance(0.2);

    c.bench_function("apply_override_8_instances", |b| {
        b.iter(|| black_box(apply_override(&index, &key, black_box(&delta))));
    });
}

criterion_group!(benches, bench_inject, bench_rebuild, bench_apply_override);
criterion_main!(benches);
