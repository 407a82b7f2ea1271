//! Fragment shader override injection.
//!
//! Patchable fragment shaders expose two hook directives (see
//! [`library`]). The [`OverrideInjector`] replaces them with the override
//! chunks, adding an unlit path and a color-key alpha matte that are driven
//! entirely by uniforms, so toggling them never recompiles the shader.
//!
//! # Example
//!
//! ```ignore
//! use lacquer_graphics::shader::OverrideInjector;
//!
//! let injector = OverrideInjector::with_standard_library();
//! let patched = injector.inject("Glass_01", glass_fragment_source)?;
//! ```

pub mod library;

use std::collections::{HashMap, HashSet};

use lacquer_core::material::RenderMaterial;

use crate::error::OverrideError;

pub use library::{FRAGMENT_HOOK, PARS_HOOK, ShaderLibrary};

/// Injects the override chunks into fragment shaders.
///
/// Resolution is line based: a line holding `#include <hook>` or
/// `#include "hook"` for a registered hook is replaced by the chunk source.
/// Includes the injector does not know about are left for the backend's own
/// preprocessor.
pub struct OverrideInjector {
    /// Registered chunk sources: hook path -> source text.
    includes: HashMap<String, String>,
    /// Hooks a shader must expose to be patchable.
    required_hooks: Vec<String>,
    /// Parse and validate patched output before installing it.
    validate: bool,
}

impl Default for OverrideInjector {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

impl OverrideInjector {
    /// Create an injector with no chunks and no required hooks.
    pub fn new() -> Self {
        Self {
            includes: HashMap::new(),
            required_hooks: Vec::new(),
            validate: false,
        }
    }

    /// Create an injector with the standard override chunks.
    pub fn with_standard_library() -> Self {
        let mut injector = Self::new();
        injector.add_library(&ShaderLibrary::standard());
        injector.required_hooks = vec![PARS_HOOK.to_string(), FRAGMENT_HOOK.to_string()];
        injector
    }

    /// Enable naga validation of every patched shader.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Add a shader library to the injector.
    pub fn add_library(&mut self, library: &ShaderLibrary) {
        for (path, source) in library.modules() {
            self.register_include(path, source);
        }
    }

    /// Register a single chunk under a hook path.
    pub fn register_include(&mut self, path: &str, source: &str) {
        self.includes.insert(path.to_string(), source.to_string());
    }

    /// Whether `source` carries every required hook directive.
    pub fn has_hooks(&self, source: &str) -> bool {
        self.missing_hook(source).is_none()
    }

    fn missing_hook(&self, source: &str) -> Option<&str> {
        let present: HashSet<&str> = source
            .lines()
            .filter_map(|line| parse_include_directive(line.trim()))
            .collect();
        self.required_hooks
            .iter()
            .map(String::as_str)
            .find(|hook| !present.contains(hook))
    }

    /// Return `source` with every registered hook replaced by its chunk.
    ///
    /// `material` names the shader's owner in error messages.
    pub fn inject(&self, material: &str, source: &str) -> Result<String, OverrideError> {
        if let Some(hook) = self.missing_hook(source) {
            return Err(OverrideError::patch_failure(
                material,
                format!("fragment shader has no #include <{hook}> hook"),
            ));
        }

        let mut included = HashSet::new();
        let patched = self.resolve_includes(source, &mut included);

        if self.validate {
            self.validate(&patched)?;
        }
        Ok(patched)
    }

    /// Patch a material's fragment stage once.
    ///
    /// Returns `Ok(false)` if the material was already patched. On error
    /// the material is left untouched.
    pub fn patch(&self, material: &mut dyn RenderMaterial) -> Result<bool, OverrideError> {
        if material.is_patched() {
            return Ok(false);
        }
        let name = material.name().unwrap_or("<unnamed>").to_string();
        let source = material.fragment_source().ok_or_else(|| {
            OverrideError::patch_failure(&name, "backend exposes no fragment stage hook")
        })?;
        let patched = self.inject(&name, source)?;
        material.install_fragment_patch(patched);
        log::debug!("Patched fragment stage of {name}");
        Ok(true)
    }

    /// Parse a patched fragment shader with naga and validate the module.
    #[cfg(feature = "validate")]
    pub fn validate(&self, source: &str) -> Result<(), OverrideError> {
        let options = naga::front::glsl::Options {
            stage: naga::ShaderStage::Fragment,
            defines: naga::FastHashMap::default(),
        };

        let mut frontend = naga::front::glsl::Frontend::default();
        let module = frontend.parse(&options, source).map_err(|errors| {
            OverrideError::ShaderValidation(format!("GLSL parse error:\n{errors}"))
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| OverrideError::ShaderValidation(format!("Validation error: {e}")))?;
        Ok(())
    }

    /// Without naga every shader is accepted as-is.
    #[cfg(not(feature = "validate"))]
    pub fn validate(&self, _source: &str) -> Result<(), OverrideError> {
        Ok(())
    }

    /// Replace registered hook directives, recursively.
    fn resolve_includes(&self, source: &str, included: &mut HashSet<String>) -> String {
        let mut result = String::with_capacity(source.len());

        for line in source.lines() {
            let trimmed = line.trim();
            match parse_include_directive(trimmed)
                .and_then(|path| self.includes.get(path).map(|chunk| (path, chunk)))
            {
                Some((path, chunk)) => {
                    // Skip if already included (prevent double-inclusion)
                    if !included.insert(path.to_string()) {
                        continue;
                    }
                    let resolved = self.resolve_includes(chunk, included);
                    result.push_str(&resolved);
                    result.push('\n');
                }
                None => {
                    result.push_str(line);
                    result.push('\n');
                }
            }
        }

        result
    }
}

/// Parse a `#include "path"` directive, returning the path if found.
fn parse_include_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("#include")?;
    let rest = rest.trim();
    // Support both #include "path" and #include <path>
    if let Some(inner) = rest.strip_prefix('"') {
        inner.strip_suffix('"')
    } else if let Some(inner) = rest.strip_prefix('<') {
        inner.strip_suffix('>')
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacquer_core::material::{CpuMaterial, OverrideUniforms};

    const HOOKED_FRAGMENT: &str = r#"#version 450
#include <override_pars_fragment>

layout(location = 0) out vec4 out_color;

layout(std140, set = 1, binding = 0) uniform MaterialParams {
    vec4 base_color;
    float opacity;
} material;

void main() {
    vec4 diffuse_color = vec4(material.base_color.rgb, material.base_color.a * material.opacity);
    vec3 lit = diffuse_color.rgb * 0.8;
    out_color = vec4(lit, diffuse_color.a);
#include <override_fragment>
}
"#;

    #[test]
    fn test_parse_include_directive() {
        assert_eq!(
            parse_include_directive(r#"#include "foo/bar.glsl""#),
            Some("foo/bar.glsl")
        );
        assert_eq!(
            parse_include_directive("#include <override_fragment>"),
            Some("override_fragment")
        );
        assert_eq!(parse_include_directive("#define FOO"), None);
        assert_eq!(parse_include_directive("// comment"), None);
    }

    #[test]
    fn test_hook_detection() {
        let injector = OverrideInjector::with_standard_library();
        assert!(injector.has_hooks(HOOKED_FRAGMENT));
        assert!(!injector.has_hooks("void main() {}"));
        assert!(!injector.has_hooks("#include <override_pars_fragment>\nvoid main() {}"));
    }

    #[test]
    fn test_inject_replaces_hooks() {
        let injector = OverrideInjector::with_standard_library();
        let patched = injector.inject("Glass_01", HOOKED_FRAGMENT).unwrap();
        assert!(!patched.contains("#include <override"));
        assert!(patched.contains("uniform OverrideParams"));
        assert!(patched.contains("discard;"));
    }

    #[test]
    fn test_missing_hook_is_patch_failure() {
        let injector = OverrideInjector::with_standard_library();
        let err = injector.inject("Plain", "void main() {}").unwrap_err();
        assert!(matches!(err, OverrideError::ShaderPatchFailure { .. }));
    }

    #[test]
    fn test_unknown_includes_pass_through() {
        let injector = OverrideInjector::with_standard_library();
        let source = format!("#include <lights_pars>\n{HOOKED_FRAGMENT}");
        let patched = injector.inject("Glass_01", &source).unwrap();
        assert!(patched.contains("#include <lights_pars>"));
    }

    #[test]
    fn test_patch_is_applied_once() {
        let injector = OverrideInjector::with_standard_library();
        let mut material = CpuMaterial::new()
            .with_name("Glass_01")
            .with_fragment_source(HOOKED_FRAGMENT);

        assert!(injector.patch(&mut material).unwrap());
        let first = material.fragment_source().unwrap().to_string();
        material.override_uniforms_mut().unlit = true;

        assert!(!injector.patch(&mut material).unwrap());
        assert_eq!(material.fragment_source().unwrap(), first);
        // A second patch must not reset live uniforms.
        assert!(material.override_uniforms().unlit);
    }

    #[test]
    fn test_patch_without_hook_leaves_material_untouched() {
        let injector = OverrideInjector::with_standard_library();
        let mut material = CpuMaterial::new().with_name("Legacy");
        assert!(injector.patch(&mut material).is_err());
        assert!(!material.is_patched());
        assert_eq!(*material.override_uniforms(), OverrideUniforms::INERT);
    }

    #[cfg(feature = "validate")]
    #[test]
    fn test_patched_shader_validates() {
        let injector = OverrideInjector::with_standard_library().with_validation(true);
        let result = injector.inject("Glass_01", HOOKED_FRAGMENT);
        assert!(result.is_ok(), "Validation failed: {:?}", result.err());
    }

    #[cfg(feature = "validate")]
    #[test]
    fn test_invalid_shader_fails_validation() {
        let injector = OverrideInjector::with_standard_library().with_validation(true);
        let source = "#include <override_pars_fragment>\nvoid main() {\n#include <override_fragment>\n}\n";
        let result = injector.inject("Broken", source);
        assert!(matches!(result, Err(OverrideError::ShaderValidation(_))));
    }
}
