//! The persisted settings record and partial updates to it.
//!
//! [`MaterialSettings`] is the unit of remote persistence: one row per
//! (context, material key). [`SettingsDelta`] is the partial form used for
//! live edits; a full record converts into a delta that touches every field.

use serde::{Deserialize, Serialize};

use crate::material::{BaselineSnapshot, MaterialKey};

/// Chroma-key parameters used when a draft is derived from a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaDefaults {
    pub color: [f32; 3],
    pub tolerance: f32,
    pub feather: f32,
}

impl Default for ChromaDefaults {
    fn default() -> Self {
        Self {
            color: [0.0, 1.0, 0.0],
            tolerance: 0.15,
            feather: 0.05,
        }
    }
}

/// Visual override settings of one material key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSettings {
    pub material_key: MaterialKey,
    pub opacity: f32,
    pub double_sided: bool,
    pub unlit_like: bool,
    pub chroma_enable: bool,
    pub chroma_color: [f32; 3],
    pub chroma_tolerance: f32,
    pub chroma_feather: f32,
    /// Store revision this record was read at; `0` if never persisted.
    #[serde(default)]
    pub revision: u64,
    /// Milliseconds since the Unix epoch of the last write.
    #[serde(default)]
    pub updated_at: u64,
    /// Identity of the last writer.
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl MaterialSettings {
    /// Settings reproducing the baseline look of a material.
    ///
    /// Overrides start disabled; chroma parameters come from `chroma` so
    /// that enabling the key produces a sensible matte straight away.
    pub fn from_baseline(
        key: MaterialKey,
        baseline: &BaselineSnapshot,
        chroma: &ChromaDefaults,
    ) -> Self {
        Self {
            material_key: key,
            opacity: baseline.opacity,
            double_sided: baseline.double_sided(),
            unlit_like: false,
            chroma_enable: false,
            chroma_color: chroma.color,
            chroma_tolerance: chroma.tolerance,
            chroma_feather: chroma.feather,
            revision: 0,
            updated_at: 0,
            updated_by: None,
        }
    }

    /// Merge the fields present in `delta`.
    pub fn apply_delta(&mut self, delta: &SettingsDelta) {
        if let Some(v) = delta.opacity {
            self.opacity = v;
        }
        if let Some(v) = delta.double_sided {
            self.double_sided = v;
        }
        if let Some(v) = delta.unlit_like {
            self.unlit_like = v;
        }
        if let Some(v) = delta.chroma_enable {
            self.chroma_enable = v;
        }
        if let Some(v) = delta.chroma_color {
            self.chroma_color = v;
        }
        if let Some(v) = delta.chroma_tolerance {
            self.chroma_tolerance = v;
        }
        if let Some(v) = delta.chroma_feather {
            self.chroma_feather = v;
        }
    }

    /// Whether the visible fields match, ignoring persistence metadata.
    pub fn same_visual(&self, other: &Self) -> bool {
        SettingsDelta::from(self) == SettingsDelta::from(other)
    }

    /// Whether blending must be enabled to render these settings.
    pub fn needs_blending(&self) -> bool {
        self.opacity < 1.0 || self.chroma_enable
    }
}

/// A partial settings update. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_sided: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlit_like: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_tolerance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma_feather: Option<f32>,
}

impl SettingsDelta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = Some(double_sided);
        self
    }

    #[must_use]
    pub fn unlit_like(mut self, unlit: bool) -> Self {
        self.unlit_like = Some(unlit);
        self
    }

    #[must_use]
    pub fn chroma_enable(mut self, enabled: bool) -> Self {
        self.chroma_enable = Some(enabled);
        self
    }

    #[must_use]
    pub fn chroma_color(mut self, color: [f32; 3]) -> Self {
        self.chroma_color = Some(color);
        self
    }

    #[must_use]
    pub fn chroma_tolerance(mut self, tolerance: f32) -> Self {
        self.chroma_tolerance = Some(tolerance);
        self
    }

    #[must_use]
    pub fn chroma_feather(mut self, feather: f32) -> Self {
        self.chroma_feather = Some(feather);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Clamp values into their valid ranges and drop non-finite numbers.
    ///
    /// Opacity and color channels are clamped to `[0, 1]`, tolerance and
    /// feather to `>= 0`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            opacity: self.opacity.and_then(|v| finite(v).map(|v| v.clamp(0.0, 1.0))),
            double_sided: self.double_sided,
            unlit_like: self.unlit_like,
            chroma_enable: self.chroma_enable,
            chroma_color: self.chroma_color.and_then(|[r, g, b]| {
                Some([
                    finite(r)?.clamp(0.0, 1.0),
                    finite(g)?.clamp(0.0, 1.0),
                    finite(b)?.clamp(0.0, 1.0),
                ])
            }),
            chroma_tolerance: self.chroma_tolerance.and_then(|v| finite(v).map(|v| v.max(0.0))),
            chroma_feather: self.chroma_feather.and_then(|v| finite(v).map(|v| v.max(0.0))),
        }
    }
}

fn finite(value: f32) -> Option<f32> {
    value.is_finite().then_some(value)
}

impl From<&MaterialSettings> for SettingsDelta {
    fn from(settings: &MaterialSettings) -> Self {
        Self {
            opacity: Some(settings.opacity),
            double_sided: Some(settings.double_sided),
            unlit_like: Some(settings.unlit_like),
            chroma_enable: Some(settings.chroma_enable),
            chroma_color: Some(settings.chroma_color),
            chroma_tolerance: Some(settings.chroma_tolerance),
            chroma_feather: Some(settings.chroma_feather),
        }
    }
}
