use super::*;

#[test]
fn load_empty_storage() {
    assert_eq!(load(&MemoryStorage::new()), Persisted::Empty);
}

#[test]
fn load_token_without_kind_is_empty() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "t1");
    assert_eq!(load(&storage), Persisted::Empty);
}

#[test]
fn save_then_load() {
    let storage = MemoryStorage::new();
    save(&storage, "t1", UserKind::Individual);
    assert_eq!(storage.get(USER_TYPE_KEY).as_deref(), Some("user"));
    assert_eq!(load(&storage), Persisted::Session { token: "t1".to_owned(), kind: UserKind::Individual });
}

#[test]
fn unknown_kind_is_corrupt() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "t1");
    storage.set(USER_TYPE_KEY, "admin");
    assert_eq!(load(&storage), Persisted::Corrupt);
}

#[test]
fn clear_removes_only_session_keys() {
    let storage = MemoryStorage::new();
    save(&storage, "t1", UserKind::Fiduciary);
    storage.set("theme", "dark");
    clear(&storage);
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(USER_TYPE_KEY), None);
    assert_eq!(storage.get("theme").as_deref(), Some("dark"));
}

#[test]
fn clones_share_entries() {
    let storage = MemoryStorage::new();
    let view = storage.clone();
    storage.set(TOKEN_KEY, "t1");
    assert_eq!(view.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert!(!view.is_empty());
}
