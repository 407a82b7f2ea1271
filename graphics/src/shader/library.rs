//! Built-in override shader chunks.
//!
//! The chunks are stored as `.glsl` files in `shaders/library/` and replace
//! the hook directives of a patchable fragment shader:
//!
//! | Hook directive | Chunk | Scope |
//! |----------------|-------|-------|
//! | `#include <override_pars_fragment>` | `override_pars_fragment.glsl` | global |
//! | `#include <override_fragment>` | `override_fragment.glsl` | end of `main` |
//!
//! # Hook contract
//!
//! ```glsl
//! #version 450
//! #include <override_pars_fragment>
//!
//! layout(location = 0) out vec4 out_color;
//!
//! void main() {
//!     vec4 diffuse_color = ...;     // pre-lit color, opacity in alpha
//!     out_color = ...;              // lit, tone-mapped result
//! #include <override_fragment>
//! }
//! ```

/// Uniform block declaring the live override parameters.
const OVERRIDE_PARS_FRAGMENT: &str = include_str!("../../shaders/library/override_pars_fragment.glsl");

/// Unlit and chroma-key logic applied to `out_color`.
const OVERRIDE_FRAGMENT: &str = include_str!("../../shaders/library/override_fragment.glsl");

/// Hook path of the uniform declarations chunk.
pub const PARS_HOOK: &str = "override_pars_fragment";

/// Hook path of the fragment logic chunk.
pub const FRAGMENT_HOOK: &str = "override_fragment";

/// Collection of shader chunks that can be injected at hook directives.
pub struct ShaderLibrary {
    modules: Vec<(&'static str, &'static str)>,
}

impl ShaderLibrary {
    /// The standard override chunks.
    pub fn standard() -> Self {
        Self {
            modules: vec![
                (PARS_HOOK, OVERRIDE_PARS_FRAGMENT),
                (FRAGMENT_HOOK, OVERRIDE_FRAGMENT),
            ],
        }
    }

    /// Create an empty shader library.
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Get an iterator over all modules (hook path, source).
    pub fn modules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.modules.iter().copied()
    }

    /// Add a custom chunk to the library.
    pub fn with_module(mut self, name: &'static str, source: &'static str) -> Self {
        self.modules.push((name, source));
        self
    }
}
