//! Scene material index and baseline capture.
//!
//! The [`MaterialIndex`] maps every selectable [`MaterialKey`] to the live
//! instances carrying that name. It is rebuilt wholesale whenever a scene
//! is (re)loaded:
//!
//! 1. instances left over from the previous generation are reset,
//! 2. the scene is traversed once and each distinct instance is visited
//!    exactly once (shared instances collapse by pointer identity),
//! 3. a [`BaselineSnapshot`] is captured **before** the fragment patch,
//! 4. the instance is patched; instances without a usable fragment hook
//!    are excluded and logged, never aborting the rebuild,
//! 5. the readiness signal fires with the new generation.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use lacquer_core::material::{
    BaselineSnapshot, MaterialKey, SharedMaterial, is_selectable_name,
};
use lacquer_core::scene::SceneProvider;

use crate::error::OverrideError;
use crate::ready::{ReadySignal, SceneReady};
use crate::shader::OverrideInjector;

/// A patched instance with the state captured before patching.
#[derive(Debug, Clone)]
pub struct IndexedInstance {
    pub material: SharedMaterial,
    pub baseline: BaselineSnapshot,
}

/// An instance that could not be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedInstance {
    pub name: String,
    pub error: OverrideError,
}

/// Name → instances map for one viewer.
///
/// Owned by a single viewer session; several viewers each hold their own
/// index and never share state.
pub struct MaterialIndex {
    injector: OverrideInjector,
    entries: BTreeMap<MaterialKey, Vec<IndexedInstance>>,
    excluded: Vec<ExcludedInstance>,
    generation: u64,
    ready: ReadySignal,
}

impl Default for MaterialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialIndex {
    /// Create an empty index using the standard override injector.
    pub fn new() -> Self {
        Self::with_injector(OverrideInjector::with_standard_library())
    }

    /// Create an empty index with a custom injector.
    pub fn with_injector(injector: OverrideInjector) -> Self {
        Self {
            injector,
            entries: BTreeMap::new(),
            excluded: Vec::new(),
            generation: 0,
            ready: ReadySignal::new(),
        }
    }

    /// Rebuild the index from a freshly loaded scene.
    ///
    /// Returns the new scene generation.
    pub fn rebuild(&mut self, provider: &dyn SceneProvider) -> u64 {
        // Surviving instances must not carry overrides into the new baseline.
        self.reset_all();
        self.entries.clear();
        self.excluded.clear();

        let injector = &self.injector;
        let entries = &mut self.entries;
        let excluded = &mut self.excluded;
        let mut seen = HashSet::new();

        provider.visit_materials(&mut |material| {
            if !seen.insert(Arc::as_ptr(material) as *const () as usize) {
                return;
            }

            let mut guard = material.write();
            let Some(name) = guard
                .name()
                .filter(|name| is_selectable_name(name))
                .map(str::to_owned)
            else {
                return;
            };

            let baseline = BaselineSnapshot::capture(&*guard);
            if let Err(error) = injector.patch(&mut *guard) {
                log::warn!("Excluding material {name}: {error}");
                excluded.push(ExcludedInstance { name, error });
                return;
            }
            drop(guard);

            entries
                .entry(MaterialKey::new(name))
                .or_default()
                .push(IndexedInstance {
                    material: Arc::clone(material),
                    baseline,
                });
        });

        self.generation += 1;
        log::info!(
            "Indexed scene generation {}: {} keys, {} instances, {} excluded",
            self.generation,
            self.entries.len(),
            self.instance_count(),
            self.excluded.len()
        );
        self.ready.fire(self.generation);
        self.generation
    }

    /// Selectable keys in sorted order.
    pub fn keys(&self) -> Vec<MaterialKey> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, key: &MaterialKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Instances indexed under `key`.
    pub fn instances(&self, key: &MaterialKey) -> Option<&[IndexedInstance]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Baseline used to derive default settings for `key`.
    ///
    /// Taken from the first instance in traversal order.
    pub fn baseline(&self, key: &MaterialKey) -> Option<&BaselineSnapshot> {
        self.entries
            .get(key)
            .and_then(|instances| instances.first())
            .map(|instance| &instance.baseline)
    }

    /// Instances dropped during the last rebuild.
    pub fn excluded(&self) -> &[ExcludedInstance] {
        &self.excluded
    }

    /// Total number of distinct indexed instances.
    pub fn instance_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current scene generation, `0` before the first rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves once at least one scene has been indexed.
    pub fn ready(&self) -> SceneReady {
        self.ready.wait_for(self.generation.max(1))
    }

    /// Resolves once a scene newer than the current one has been indexed.
    pub fn next_ready(&self) -> SceneReady {
        self.ready.wait_for(self.generation + 1)
    }

    /// Handle to the readiness signal, for waiting from other owners.
    pub fn ready_signal(&self) -> ReadySignal {
        self.ready.clone()
    }

    /// Restore every instance of `key` to its baseline.
    ///
    /// Returns the number of instances reset.
    pub fn reset_one(&self, key: &MaterialKey) -> Result<usize, OverrideError> {
        let instances = self
            .entries
            .get(key)
            .ok_or_else(|| OverrideError::UnknownKey(key.clone()))?;
        for instance in instances {
            instance.baseline.restore(&mut *instance.material.write());
        }
        log::debug!("Reset {key} to baseline ({} instances)", instances.len());
        Ok(instances.len())
    }

    /// Restore every indexed instance to its baseline.
    pub fn reset_all(&self) {
        for instance in self.entries.values().flatten() {
            instance.baseline.restore(&mut *instance.material.write());
        }
    }
}

impl std::fmt::Debug for MaterialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialIndex")
            .field("generation", &self.generation)
            .field("key_count", &self.entries.len())
            .field("excluded_count", &self.excluded.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacquer_core::material::{CpuMaterial, CullMode, RenderMaterial, share};
    use lacquer_core::scene::{Scene, SceneNode};

    static_assertions::assert_impl_all!(MaterialIndex: Send, Sync);

    const FRAGMENT: &str = "#include <override_pars_fragment>\nvoid main() {\n#include <override_fragment>\n}\n";

    fn hooked(name: &str) -> CpuMaterial {
        CpuMaterial::new()
            .with_name(name)
            .with_fragment_source(FRAGMENT)
    }

    #[test]
    fn rebuild_indexes_named_instances() {
        let scene = Scene::new()
            .with_materials(vec![
                share(hooked("Glass_01")),
                share(hooked("")),
                share(CpuMaterial::new().with_fragment_source(FRAGMENT)),
                share(hooked("Default")),
            ])
            .with_nodes(vec![SceneNode::new().with_materials(vec![0, 1, 2, 3])]);

        let mut index = MaterialIndex::new();
        assert_eq!(index.rebuild(&scene), 1);
        assert_eq!(index.keys(), vec![MaterialKey::new("Glass_01")]);
        assert!(index.excluded().is_empty());
    }

    #[test]
    fn baseline_is_captured_before_patch() {
        let material = share(hooked("Glass_01").with_opacity(0.7));
        let scene = Scene::new()
            .with_materials(vec![material.clone()])
            .with_nodes(vec![SceneNode::new().with_materials(vec![0])]);

        let mut index = MaterialIndex::new();
        index.rebuild(&scene);
        assert!(material.read().is_patched());
        assert_eq!(index.baseline(&"Glass_01".into()).unwrap().opacity, 0.7);
    }

    #[test]
    fn rebuild_resets_surviving_instances() {
        let material = share(hooked("Glass_01"));
        let scene = Scene::new()
            .with_materials(vec![material.clone()])
            .with_nodes(vec![SceneNode::new().with_materials(vec![0])]);

        let mut index = MaterialIndex::new();
        index.rebuild(&scene);
        material.write().set_opacity(0.2);
        material.write().set_cull_mode(CullMode::None);

        index.rebuild(&scene);
        let baseline = index.baseline(&"Glass_01".into()).unwrap();
        assert_eq!(baseline.opacity, 1.0);
        assert_eq!(baseline.cull_mode, CullMode::Back);
        assert_eq!(index.generation(), 2);
    }

    #[test]
    fn unknown_key_reset_fails() {
        let index = MaterialIndex::new();
        assert_eq!(
            index.reset_one(&"Nope".into()),
            Err(OverrideError::UnknownKey("Nope".into()))
        );
    }

    #[test]
    fn ready_resolves_after_rebuild() {
        let mut index = MaterialIndex::new();
        let signal = index.ready_signal();
        index.rebuild(&Scene::new());
        assert_eq!(pollster::block_on(signal.wait_for(1)), 1);
        assert_eq!(pollster::block_on(index.ready()), 1);
    }
}
