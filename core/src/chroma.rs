//! CPU reference of the override fragment logic.
//!
//! Mirrors `override_fragment.glsl` exactly, so previews, tests and
//! offline tools agree with what the GPU renders.

use crate::material::OverrideUniforms;

/// Result of shading a single fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentOutput {
    /// The fragment was discarded: no color, no depth write.
    Discard,
    /// Final RGBA color.
    Color([f32; 4]),
}

/// GLSL `smoothstep` (Hermite interpolation between two edges).
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Euclidean distance between two RGB colors.
pub fn color_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Edges of the soft band: `(max(tolerance - feather, 0), tolerance + feather)`.
///
/// The lower edge never goes negative, so the key color itself is always cut
/// even when the feather is wider than the tolerance.
pub fn chroma_band(uniforms: &OverrideUniforms) -> (f32, f32) {
    (
        (uniforms.chroma_tolerance - uniforms.chroma_feather).max(0.0),
        uniforms.chroma_tolerance + uniforms.chroma_feather,
    )
}

/// Alpha multiplier of the color-key matte for a diffuse color.
///
/// Returns `0.0` inside the cut region (`d <= max(tolerance - feather, 0)`), `1.0`
/// outside the band (`d >= tolerance + feather`) and a smoothstep across
/// the band in between. Always `1.0` when chroma keying is disabled.
pub fn chroma_key_alpha(diffuse_rgb: [f32; 3], uniforms: &OverrideUniforms) -> f32 {
    if !uniforms.chroma_enable {
        return 1.0;
    }
    let distance = color_distance(diffuse_rgb, uniforms.chroma_color);
    let (lower, upper) = chroma_band(uniforms);
    if distance <= lower {
        0.0
    } else if distance >= upper {
        1.0
    } else {
        smoothstep(lower, upper, distance)
    }
}

/// Apply the override patch to one fragment.
///
/// `lit` is the color the unpatched shader produced; `diffuse` is the
/// pre-lit diffuse color with the material opacity already in its alpha.
pub fn shade_fragment(
    uniforms: &OverrideUniforms,
    lit: [f32; 4],
    diffuse: [f32; 4],
) -> FragmentOutput {
    let mut color = if uniforms.unlit { diffuse } else { lit };

    if uniforms.chroma_enable {
        let rgb = [diffuse[0], diffuse[1], diffuse[2]];
        let distance = color_distance(rgb, uniforms.chroma_color);
        if distance <= chroma_band(uniforms).0 {
            return FragmentOutput::Discard;
        }
        color[3] *= chroma_key_alpha(rgb, uniforms);
    }

    FragmentOutput::Color(color)
}
