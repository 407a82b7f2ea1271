//! Backend-neutral material implementation.

use crate::chroma::{FragmentOutput, shade_fragment};

use super::types::{CullMode, OverrideUniforms, RenderMaterial};

/// CPU-side material with the full [`RenderMaterial`] surface.
///
/// Used by headless viewers, CPU previews and tests. Pipeline-affecting
/// changes (culling, blending, depth) bump [`pipeline_version`](Self::pipeline_version)
/// so a renderer knows when to rebuild its pipeline state.
///
/// # Example
///
/// ```ignore
/// use lacquer_core::material::*;
///
/// let glass = share(
///     CpuMaterial::new()
///         .with_name("Glass_01")
///         .with_base_color([0.8, 0.9, 1.0, 1.0])
///         .with_fragment_source(GLASS_FRAGMENT),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CpuMaterial {
    name: Option<String>,
    base_color: [f32; 4],
    opacity: f32,
    cull_mode: CullMode,
    tone_mapped: bool,
    depth_write: bool,
    depth_test: bool,
    transparent: bool,
    fragment_source: Option<String>,
    patched: bool,
    uniforms: OverrideUniforms,
    pipeline_version: u64,
}

impl CpuMaterial {
    /// Creates an opaque, single-sided white material without a fragment hook.
    pub fn new() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
            cull_mode: CullMode::Back,
            tone_mapped: true,
            depth_write: true,
            depth_test: true,
            transparent: false,
            fragment_source: None,
            patched: false,
            uniforms: OverrideUniforms::INERT,
            pipeline_version: 0,
        }
    }

    /// Set the material name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the base (diffuse) color, linear RGBA.
    #[must_use]
    pub fn with_base_color(mut self, color: [f32; 4]) -> Self {
        self.base_color = color;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    #[must_use]
    pub fn with_tone_mapped(mut self, tone_mapped: bool) -> Self {
        self.tone_mapped = tone_mapped;
        self
    }

    #[must_use]
    pub fn with_depth_write(mut self, enabled: bool) -> Self {
        self.depth_write = enabled;
        self
    }

    #[must_use]
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Attach the fragment stage source that the override patch hooks into.
    #[must_use]
    pub fn with_fragment_source(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = Some(source.into());
        self
    }

    pub fn base_color(&self) -> [f32; 4] {
        self.base_color
    }

    /// Incremented whenever culling, blending or depth state changes.
    pub fn pipeline_version(&self) -> u64 {
        self.pipeline_version
    }

    /// Shade one fragment of this material on the CPU.
    ///
    /// `lit_rgb` is the lighting result for the fragment; the pre-lit
    /// diffuse color is the base color with the material opacity applied.
    pub fn shade(&self, lit_rgb: [f32; 3]) -> FragmentOutput {
        let [r, g, b, a] = self.base_color;
        let diffuse = [r, g, b, a * self.opacity];
        let lit = [lit_rgb[0], lit_rgb[1], lit_rgb[2], diffuse[3]];
        shade_fragment(&self.uniforms, lit, diffuse)
    }

    fn touch_pipeline(&mut self) {
        self.pipeline_version += 1;
    }
}

impl Default for CpuMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderMaterial for CpuMaterial {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        if self.cull_mode != mode {
            self.cull_mode = mode;
            self.touch_pipeline();
        }
    }

    fn tone_mapped(&self) -> bool {
        self.tone_mapped
    }

    fn set_tone_mapped(&mut self, tone_mapped: bool) {
        self.tone_mapped = tone_mapped;
    }

    fn depth_write(&self) -> bool {
        self.depth_write
    }

    fn set_depth_write(&mut self, enabled: bool) {
        if self.depth_write != enabled {
            self.depth_write = enabled;
            self.touch_pipeline();
        }
    }

    fn depth_test(&self) -> bool {
        self.depth_test
    }

    fn set_depth_test(&mut self, enabled: bool) {
        if self.depth_test != enabled {
            self.depth_test = enabled;
            self.touch_pipeline();
        }
    }

    fn transparent(&self) -> bool {
        self.transparent
    }

    fn set_transparent(&mut self, transparent: bool) {
        if self.transparent != transparent {
            self.transparent = transparent;
            self.touch_pipeline();
        }
    }

    fn fragment_source(&self) -> Option<&str> {
        self.fragment_source.as_deref()
    }

    fn is_patched(&self) -> bool {
        self.patched
    }

    fn install_fragment_patch(&mut self, source: String) {
        self.fragment_source = Some(source);
        self.patched = true;
        self.uniforms = OverrideUniforms::INERT;
    }

    fn override_uniforms(&self) -> &OverrideUniforms {
        &self.uniforms
    }

    fn override_uniforms_mut(&mut self) -> &mut OverrideUniforms {
        &mut self.uniforms
    }
}
