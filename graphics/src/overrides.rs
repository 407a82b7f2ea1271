//! Applying override settings to indexed instances.
//!
//! [`apply_override`] is the single path through which both live edits and
//! freshly fetched records reach the instances, so the visible state
//! always matches the last settings given for a key.

use lacquer_core::material::{BaselineSnapshot, CullMode, MaterialKey, RenderMaterial};
use lacquer_core::settings::{MaterialSettings, SettingsDelta};

use crate::error::OverrideError;
use crate::index::MaterialIndex;

/// Merge `delta` into every instance indexed under `key`.
///
/// Values are sanitized first; fields that do not survive sanitizing are
/// left unchanged. Returns the number of instances touched.
pub fn apply_override(
    index: &MaterialIndex,
    key: &MaterialKey,
    delta: &SettingsDelta,
) -> Result<usize, OverrideError> {
    let instances = index
        .instances(key)
        .ok_or_else(|| OverrideError::UnknownKey(key.clone()))?;
    let delta = delta.sanitized();

    for instance in instances {
        let mut material = instance.material.write();
        apply_to_instance(&mut *material, &instance.baseline, &delta);
    }

    log::trace!("Applied {delta:?} to {key} ({} instances)", instances.len());
    Ok(instances.len())
}

/// Apply a full settings record, e.g. one just fetched from the store.
pub fn apply_settings(
    index: &MaterialIndex,
    settings: &MaterialSettings,
) -> Result<usize, OverrideError> {
    apply_override(index, &settings.material_key, &SettingsDelta::from(settings))
}

fn apply_to_instance(
    material: &mut dyn RenderMaterial,
    baseline: &BaselineSnapshot,
    delta: &SettingsDelta,
) {
    if let Some(opacity) = delta.opacity {
        material.set_opacity(opacity);
    }
    if let Some(double_sided) = delta.double_sided {
        material.set_cull_mode(match (double_sided, baseline.cull_mode) {
            (true, _) => CullMode::None,
            // Single-sided: keep the baseline's culled face.
            (false, CullMode::None) => CullMode::Back,
            (false, baseline) => baseline,
        });
    }
    if let Some(unlit) = delta.unlit_like {
        material.override_uniforms_mut().unlit = unlit;
        // Unlit output bypasses tone mapping.
        material.set_tone_mapped(!unlit && baseline.tone_mapped);
    }

    let uniforms = material.override_uniforms_mut();
    if let Some(enabled) = delta.chroma_enable {
        uniforms.chroma_enable = enabled;
    }
    if let Some(color) = delta.chroma_color {
        uniforms.chroma_color = color;
    }
    if let Some(tolerance) = delta.chroma_tolerance {
        uniforms.chroma_tolerance = tolerance;
    }
    if let Some(feather) = delta.chroma_feather {
        uniforms.chroma_feather = feather;
    }

    if delta.opacity.is_some() || delta.chroma_enable.is_some() {
        let blended = material.opacity() < 1.0 || material.override_uniforms().chroma_enable;
        material.set_transparent(blended || baseline.transparent);
        material.set_depth_write(if blended { false } else { baseline.depth_write });
    }
}
