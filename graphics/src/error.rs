//! Override engine error types.

use lacquer_core::material::MaterialKey;
use thiserror::Error;

/// Errors raised by the index, the shader injector and override application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// No indexed material carries this key.
    #[error("unknown material key: {0}")]
    UnknownKey(MaterialKey),
    /// The instance cannot be patched; it is excluded from the index.
    #[error("shader patch failed for {material}: {reason}")]
    ShaderPatchFailure {
        /// Name of the offending material.
        material: String,
        /// What was missing or wrong.
        reason: String,
    },
    /// The patched shader did not parse or validate.
    #[error("shader validation failed: {0}")]
    ShaderValidation(String),
}

impl OverrideError {
    pub(crate) fn patch_failure(material: &str, reason: impl Into<String>) -> Self {
        Self::ShaderPatchFailure {
            material: material.to_string(),
            reason: reason.into(),
        }
    }
}
