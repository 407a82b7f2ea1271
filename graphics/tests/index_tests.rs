//! Integration tests for indexing, patching and applying overrides.

mod common;

use std::sync::Arc;

use common::{HOOKED_FRAGMENT, flat_scene, hooked, legacy};
use lacquer_core::chroma::FragmentOutput;
use lacquer_core::material::{CpuMaterial, CullMode, MaterialKey, SharedMaterial};
use lacquer_core::settings::SettingsDelta;
use lacquer_graphics::{MaterialIndex, OverrideError, apply_override};
use parking_lot::RwLock;

#[test]
fn shared_instance_collapses_to_one_entry() {
    let shared = hooked("Glass_01");
    let scene = flat_scene(vec![shared.clone(), shared.clone(), hooked("Wood_02")]);

    let mut index = MaterialIndex::new();
    index.rebuild(&scene);

    assert_eq!(
        index.keys(),
        vec![MaterialKey::new("Glass_01"), MaterialKey::new("Wood_02")]
    );
    assert_eq!(index.instances(&"Glass_01".into()).unwrap().len(), 1);
    assert_eq!(index.instance_count(), 2);
}

#[test]
fn instance_without_hook_is_excluded() {
    let scene = flat_scene(vec![hooked("Glass_01"), legacy("Legacy_03")]);

    let mut index = MaterialIndex::new();
    index.rebuild(&scene);

    assert!(!index.contains(&"Legacy_03".into()));
    assert_eq!(index.excluded().len(), 1);
    assert_eq!(index.excluded()[0].name, "Legacy_03");
    assert!(matches!(
        index.excluded()[0].error,
        OverrideError::ShaderPatchFailure { .. }
    ));
}

#[test]
fn reset_one_leaves_other_keys_alone() {
    let glass = hooked("Glass_01");
    let wood = hooked("Wood_02");
    let mut index = MaterialIndex::new();
    index.rebuild(&flat_scene(vec![glass.clone(), wood.clone()]));

    let delta = SettingsDelta::new().opacity(0.25).double_sided(true);
    apply_override(&index, &"Glass_01".into(), &delta).unwrap();
    apply_override(&index, &"Wood_02".into(), &delta).unwrap();

    assert_eq!(index.reset_one(&"Glass_01".into()), Ok(1));
    assert_eq!(glass.read().opacity(), 1.0);
    assert_eq!(glass.read().cull_mode(), CullMode::Back);
    assert_eq!(wood.read().opacity(), 0.25);
    assert_eq!(wood.read().cull_mode(), CullMode::None);

    index.reset_all();
    assert_eq!(wood.read().opacity(), 1.0);
}

#[test]
fn chroma_key_matte_through_index() {
    let green = Arc::new(RwLock::new(
        CpuMaterial::new()
            .with_name("Screen_04")
            .with_base_color([0.0, 1.0, 0.0, 1.0])
            .with_fragment_source(HOOKED_FRAGMENT),
    ));
    let red = Arc::new(RwLock::new(
        CpuMaterial::new()
            .with_name("Screen_04")
            .with_base_color([1.0, 0.0, 0.0, 1.0])
            .with_fragment_source(HOOKED_FRAGMENT),
    ));
    let shared: Vec<SharedMaterial> = vec![green.clone(), red.clone()];

    let mut index = MaterialIndex::new();
    index.rebuild(&flat_scene(shared));

    let delta = SettingsDelta::new()
        .chroma_enable(true)
        .chroma_color([0.0, 1.0, 0.0])
        .chroma_tolerance(0.3)
        .chroma_feather(0.1);
    assert_eq!(apply_override(&index, &"Screen_04".into(), &delta), Ok(2));

    assert_eq!(green.read().shade([0.5, 0.5, 0.5]), FragmentOutput::Discard);
    assert_eq!(
        red.read().shade([0.5, 0.5, 0.5]),
        FragmentOutput::Color([0.5, 0.5, 0.5, 1.0])
    );
}

#[test]
fn rebuild_discards_previous_scene() {
    let mut index = MaterialIndex::new();
    index.rebuild(&flat_scene(vec![hooked("Glass_01")]));
    index.rebuild(&flat_scene(vec![hooked("Wood_02")]));

    assert_eq!(index.keys(), vec![MaterialKey::new("Wood_02")]);
    assert_eq!(index.generation(), 2);
    assert_eq!(pollster::block_on(index.ready()), 2);
}
