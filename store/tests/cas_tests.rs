//! Compare-and-swap behavior shared by every client of one store.

use std::sync::Arc;

use lacquer_core::material::{BaselineSnapshot, CullMode, MaterialKey};
use lacquer_core::settings::{ChromaDefaults, MaterialSettings};
use lacquer_store::{MemoryStore, SessionContext, SettingsStore, StoreError};

fn record(key: &str, opacity: f32) -> MaterialSettings {
    let baseline = BaselineSnapshot {
        opacity: 1.0,
        cull_mode: CullMode::Back,
        tone_mapped: true,
        depth_write: true,
        depth_test: true,
        transparent: false,
    };
    let mut settings =
        MaterialSettings::from_baseline(key.into(), &baseline, &ChromaDefaults::default());
    settings.opacity = opacity;
    settings
}

fn two_clients() -> (Arc<dyn SettingsStore>, Arc<dyn SettingsStore>, MemoryStore) {
    let shared = MemoryStore::new();
    let a = shared
        .clone()
        .with_context(SessionContext::new("model-7").with_user("alice"));
    let b = shared
        .clone()
        .with_context(SessionContext::new("model-7").with_user("bob"));
    let inspect = shared.with_context(SessionContext::new("model-7"));
    (Arc::new(a), Arc::new(b), inspect)
}

#[test]
fn revisions_strictly_increase() {
    let (a, _, _) = two_clients();
    let key = MaterialKey::new("Glass_01");

    let mut expected = 0;
    for opacity in [0.9, 0.8, 0.7] {
        let revision = pollster::block_on(a.save(&key, record("Glass_01", opacity), Some(expected))).unwrap();
        assert!(revision > expected);
        expected = revision;
    }
    assert_eq!(expected, 3);
}

#[test]
fn concurrent_writers_at_same_revision() {
    let (a, b, inspect) = two_clients();
    let key = MaterialKey::new("Wood_02");
    let mut seed = record("Wood_02", 1.0);
    seed.revision = 3;
    inspect.insert(seed);

    assert_eq!(pollster::block_on(a.save(&key, record("Wood_02", 0.9), Some(3))), Ok(4));

    let err = pollster::block_on(b.save(&key, record("Wood_02", 0.5), Some(3))).unwrap_err();
    let (server_settings, server_revision) = match err {
        StoreError::Conflict {
            server_settings,
            server_revision,
        } => (server_settings, server_revision),
        other => panic!("expected conflict, got {other:?}"),
    };
    assert_eq!(server_revision, 4);
    assert_eq!(server_settings.opacity, 0.9);
    assert_eq!(server_settings.updated_by.as_deref(), Some("alice"));

    // The rejected write left the row untouched.
    let row = inspect.row(&key).unwrap();
    assert_eq!(row.opacity, 0.9);
    assert_eq!(row.revision, 4);
}

#[test]
fn two_first_writes_race() {
    let (a, b, _) = two_clients();
    let key = MaterialKey::new("Glass_01");

    assert_eq!(pollster::block_on(a.save(&key, record("Glass_01", 0.4), Some(0))), Ok(1));
    let err = pollster::block_on(b.save(&key, record("Glass_01", 0.6), Some(0))).unwrap_err();
    assert!(matches!(err, StoreError::Conflict { server_revision: 1, .. }));
}

#[test]
fn error_messages() {
    assert_eq!(
        StoreError::NotFound("Glass_01".into()).to_string(),
        "no settings row for Glass_01"
    );
    assert_eq!(
        StoreError::Transport("timed out".into()).to_string(),
        "transport failure: timed out"
    );
    assert!(StoreError::Transport(String::new()).is_transport());
}
