use super::*;

fn temp_token_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("session-store-{}-{name}", std::process::id())).join("token")
}

struct BrokenBackend;

impl TokenBackend for BrokenBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }

    fn save(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }

    fn remove(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
}

// =============================================================================
// SessionStore
// =============================================================================

#[test]
fn empty_store_has_no_token() {
    let store = SessionStore::in_memory();
    assert_eq!(store.get(), None);
    assert!(!store.has_token());
    assert_eq!(store.epoch(), 0);
}

#[test]
fn set_then_clear() {
    let store = SessionStore::in_memory();
    store.set("tok-1");
    assert_eq!(store.get().as_deref(), Some("tok-1"));
    store.clear();
    assert_eq!(store.get(), None);
}

#[test]
fn every_write_bumps_epoch() {
    let store = SessionStore::in_memory();
    store.set("a");
    store.set("b");
    store.clear();
    store.clear();
    assert_eq!(store.epoch(), 4);
}

#[test]
fn token_is_opaque() {
    let store = SessionStore::in_memory();
    store.set("not a jwt at all");
    assert_eq!(store.get().as_deref(), Some("not a jwt at all"));
}

#[test]
fn shared_backend_survives_reload() {
    let backend = Arc::new(MemoryBackend::default());
    let first = SessionStore::new(backend.clone());
    first.set("persisted");
    drop(first);

    let reloaded = SessionStore::new(backend.clone());
    assert_eq!(reloaded.get().as_deref(), Some("persisted"));
    reloaded.clear();
    assert_eq!(backend.load().unwrap(), None);
}

#[test]
fn broken_backend_degrades_to_memory() {
    let store = SessionStore::new(BrokenBackend);
    assert_eq!(store.get(), None);
    store.set("still-usable");
    assert_eq!(store.get().as_deref(), Some("still-usable"));
    store.clear();
    assert!(!store.has_token());
}

// =============================================================================
// FileBackend
// =============================================================================

#[test]
fn file_backend_round_trips_and_trims() {
    let path = temp_token_path("roundtrip");
    let backend = FileBackend::new(&path);
    assert_eq!(backend.load().unwrap(), None);

    backend.save("abc.def").unwrap();
    assert_eq!(backend.load().unwrap().as_deref(), Some("abc.def"));

    std::fs::write(&path, "  spaced\n").unwrap();
    assert_eq!(backend.load().unwrap().as_deref(), Some("spaced"));

    backend.remove().unwrap();
    backend.remove().unwrap();
    assert_eq!(backend.load().unwrap(), None);
}

#[test]
fn file_backend_blank_file_is_no_token() {
    let path = temp_token_path("blank");
    let backend = FileBackend::new(&path);
    backend.save("").unwrap();
    assert_eq!(backend.load().unwrap(), None);
    backend.remove().unwrap();
}

#[test]
fn store_over_file_backend_restores_on_restart() {
    let path = temp_token_path("restart");
    SessionStore::new(FileBackend::new(&path)).set("from-last-run");
    let store = SessionStore::new(FileBackend::new(&path));
    assert_eq!(store.get().as_deref(), Some("from-last-run"));
    store.clear();
    assert!(!path.exists());
}

#[test]
fn clear_runs_listeners_after_token_is_gone() {
    let store = Arc::new(SessionStore::in_memory());
    store.set("abc");
    let observed = Arc::new(Mutex::new(Vec::new()));

    let seen = observed.clone();
    let weak = Arc::downgrade(&store);
    store.on_clear(move || {
        let has_token = weak.upgrade().is_some_and(|s| s.has_token());
        seen.lock().unwrap().push(has_token);
    });

    store.set("def");
    assert!(observed.lock().unwrap().is_empty());
    store.clear();
    store.clear();
    assert_eq!(*observed.lock().unwrap(), vec![false, false]);
}
