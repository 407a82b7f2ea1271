//! Backend material interface and the state captured around it.

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use parking_lot::RwLock;

/// Which faces a material rasterizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Back faces are culled; only front faces render.
    #[default]
    Back,
    /// Front faces are culled; only back faces render.
    Front,
    /// Nothing is culled; both faces render.
    None,
}

/// Live parameters of the override fragment patch.
///
/// Attached to an instance when its fragment stage is patched and always
/// present afterwards. [`INERT`](Self::INERT) leaves the original shading
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverrideUniforms {
    /// Emit the pre-lit diffuse color instead of the lit result.
    pub unlit: bool,
    /// Enable color-key alpha matting.
    pub chroma_enable: bool,
    /// Key color, linear RGB in `[0, 1]`.
    pub chroma_color: [f32; 3],
    /// Distance from the key color at which alpha reaches one half.
    pub chroma_tolerance: f32,
    /// Half-width of the soft band around the tolerance.
    pub chroma_feather: f32,
}

impl OverrideUniforms {
    /// All effects disabled, every parameter zeroed.
    pub const INERT: Self = Self {
        unlit: false,
        chroma_enable: false,
        chroma_color: [0.0; 3],
        chroma_tolerance: 0.0,
        chroma_feather: 0.0,
    };

    /// Pack into the std140 layout of the `OverrideParams` uniform block.
    pub fn to_gpu(&self) -> OverrideUniformData {
        OverrideUniformData {
            chroma_color: self.chroma_color,
            unlit: if self.unlit { 1.0 } else { 0.0 },
            chroma_enable: if self.chroma_enable { 1.0 } else { 0.0 },
            chroma_tolerance: self.chroma_tolerance,
            chroma_feather: self.chroma_feather,
            _padding: 0.0,
        }
    }
}

/// GPU layout of [`OverrideUniforms`] (std140, 32 bytes).
///
/// Flags are stored as floats and compared against `0.5` in the shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverrideUniformData {
    pub chroma_color: [f32; 3],
    pub unlit: f32,
    pub chroma_enable: f32,
    pub chroma_tolerance: f32,
    pub chroma_feather: f32,
    pub _padding: f32,
}

/// A live render-material object owned by a rendering backend.
///
/// Every backend implements all methods; the fragment hook is the only
/// capability that may be missing, signalled by
/// [`fragment_source`](Self::fragment_source) returning `None`. The index
/// checks it once at patch time.
pub trait RenderMaterial: fmt::Debug + Send + Sync {
    /// Material name as authored in the source asset.
    fn name(&self) -> Option<&str>;

    /// Material opacity in `[0, 1]`.
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);

    fn cull_mode(&self) -> CullMode;
    fn set_cull_mode(&mut self, mode: CullMode);

    /// Whether the output passes through the tone mapping stage.
    fn tone_mapped(&self) -> bool;
    fn set_tone_mapped(&mut self, tone_mapped: bool);

    fn depth_write(&self) -> bool;
    fn set_depth_write(&mut self, enabled: bool);

    fn depth_test(&self) -> bool;
    fn set_depth_test(&mut self, enabled: bool);

    /// Whether the material renders in the blended (sorted) pass.
    fn transparent(&self) -> bool;
    fn set_transparent(&mut self, transparent: bool);

    /// Fragment stage source, or `None` if the backend exposes no hook.
    fn fragment_source(&self) -> Option<&str>;

    /// Whether the override patch has been installed.
    fn is_patched(&self) -> bool;

    /// Replace the fragment source with its patched form.
    ///
    /// Marks the instance patched and attaches inert override uniforms.
    fn install_fragment_patch(&mut self, source: String);

    fn override_uniforms(&self) -> &OverrideUniforms;
    fn override_uniforms_mut(&mut self) -> &mut OverrideUniforms;
}

/// A material instance shared by every scene node that references it.
pub type SharedMaterial = Arc<RwLock<dyn RenderMaterial>>;

/// Wrap a backend material for sharing between scene nodes.
pub fn share<M: RenderMaterial + 'static>(material: M) -> SharedMaterial {
    Arc::new(RwLock::new(material))
}

/// Render state captured per instance when a scene is indexed.
///
/// Never modified for the lifetime of a scene generation; the only target
/// of a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineSnapshot {
    pub opacity: f32,
    pub cull_mode: CullMode,
    pub tone_mapped: bool,
    pub depth_write: bool,
    pub depth_test: bool,
    pub transparent: bool,
}

impl BaselineSnapshot {
    /// Capture the current render state of a material.
    pub fn capture(material: &dyn RenderMaterial) -> Self {
        Self {
            opacity: material.opacity(),
            cull_mode: material.cull_mode(),
            tone_mapped: material.tone_mapped(),
            depth_write: material.depth_write(),
            depth_test: material.depth_test(),
            transparent: material.transparent(),
        }
    }

    /// Restore the captured state and zero the override uniforms.
    pub fn restore(&self, material: &mut dyn RenderMaterial) {
        material.set_opacity(self.opacity);
        material.set_cull_mode(self.cull_mode);
        material.set_tone_mapped(self.tone_mapped);
        material.set_depth_write(self.depth_write);
        material.set_depth_test(self.depth_test);
        material.set_transparent(self.transparent);
        *material.override_uniforms_mut() = OverrideUniforms::INERT;
    }

    /// Whether both faces render in the baseline state.
    pub fn double_sided(&self) -> bool {
        self.cull_mode == CullMode::None
    }
}
