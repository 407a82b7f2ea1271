use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Names reserved by loaders for their fallback material.
const DEFAULT_MATERIAL_NAMES: [&str; 2] = ["default", "__default"];

/// Stable string identifier for a group of material instances.
///
/// Keys come from material names. Every instance carrying the same name is
/// treated as a single override target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialKey(String);

impl MaterialKey {
    /// Creates a key from a material name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MaterialKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for MaterialKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MaterialKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a material name may become a selectable [`MaterialKey`].
///
/// Unnamed materials, blank names and the loader default material are
/// never indexed.
pub fn is_selectable_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && !DEFAULT_MATERIAL_NAMES
            .iter()
            .any(|reserved| trimmed.eq_ignore_ascii_case(reserved))
}
