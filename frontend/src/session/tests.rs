use super::*;
use panoptic_shared::Role;
use std::collections::HashMap;
use std::sync::Mutex;

// =========================================================
// Mock Storage
// =========================================================

/// In-memory storage with an operation log to verify persistence calls
struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    log: Mutex<Vec<String>>,
}

impl MemoryStorage {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    fn seed(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn log_entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.log.lock().unwrap().push(format!("read:{}", key));
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.log.lock().unwrap().push(format!("write:{}", key));
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.log.lock().unwrap().push(format!("delete:{}", key));
        self.entries.lock().unwrap().remove(key).is_some()
    }
}

fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        display_name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Role::Admin,
        created_at: None,
        last_login: None,
    }
}

/// The core invariant: the flag always mirrors credential presence
fn assert_invariant(session: &Session) {
    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.is_authenticated,
        snapshot.user.is_some() && snapshot.token.is_some()
    );
}

// =========================================================
// Session operations
// =========================================================

#[test]
fn login_sets_authenticated_with_both_credentials() {
    let mut session = Session::default();
    assert_invariant(&session);

    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");

    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(session.token(), Some("tok"));
    assert_invariant(&session);
}

#[test]
fn login_rejects_missing_credentials() {
    let mut session = Session::default();

    assert_eq!(
        session.login(sample_user("u1"), "  ".to_string()),
        Err(SessionError::MissingCredentials)
    );
    assert_eq!(
        session.login(sample_user(""), "tok".to_string()),
        Err(SessionError::MissingCredentials)
    );

    // State untouched by a rejected call
    assert_eq!(session, Session::default());
    assert_invariant(&session);
}

#[test]
fn logout_is_idempotent() {
    let mut session = Session::default();
    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");

    session.logout();
    let once = session.snapshot();
    session.logout();
    let twice = session.snapshot();

    assert_eq!(once, twice);
    assert!(!twice.is_authenticated);
    assert_invariant(&session);
}

#[test]
fn update_user_without_session_is_noop() {
    let mut session = Session::default();
    session.update_user(&UserPatch {
        display_name: Some("Eve".to_string()),
        ..UserPatch::default()
    });
    assert_eq!(session, Session::default());
    assert_invariant(&session);
}

#[test]
fn update_user_merges_partial_fields() {
    let mut session = Session::default();
    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");

    session.update_user(&UserPatch {
        display_name: Some("Grace".to_string()),
        ..UserPatch::default()
    });

    let user = session.user().expect("still logged in").clone();
    assert_eq!(user.display_name, "Grace");
    // Unset patch fields preserve existing values
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, Role::Admin);
    // Auth state untouched
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok"));
    assert_invariant(&session);
}

// =========================================================
// Persistence
// =========================================================

#[test]
fn persist_roundtrip_restores_session() {
    let storage = MemoryStorage::new();
    let mut session = Session::default();
    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");

    persist(&storage, &session);
    let restored = rehydrate(&storage);

    assert_eq!(restored, session);
    assert!(restored.is_authenticated());
    assert_invariant(&restored);
}

#[test]
fn authenticated_flag_is_never_persisted() {
    let storage = MemoryStorage::new();
    let mut session = Session::default();
    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");
    persist(&storage, &session);

    let raw = storage.raw(STORAGE_SESSION_KEY).expect("record written");
    assert!(!raw.contains("is_authenticated"));
}

#[test]
fn persist_after_logout_deletes_the_record() {
    let storage = MemoryStorage::new();
    let mut session = Session::default();
    session
        .login(sample_user("u1"), "tok".to_string())
        .expect("login should succeed");
    persist(&storage, &session);

    session.logout();
    persist(&storage, &session);

    assert_eq!(storage.raw(STORAGE_SESSION_KEY), None);
    assert_eq!(
        storage.log_entries(),
        vec![
            format!("write:{}", STORAGE_SESSION_KEY),
            format!("delete:{}", STORAGE_SESSION_KEY),
        ]
    );
}

#[test]
fn rehydrate_absent_record_starts_logged_out() {
    let storage = MemoryStorage::new();
    let session = rehydrate(&storage);
    assert_eq!(session, Session::default());
    assert_invariant(&session);
}

#[test]
fn rehydrate_malformed_record_degrades_to_logged_out() {
    // Truncated JSON, wrong shape, and empty credential fields
    for bad in [
        "{\"user\": {\"id\": \"u1\"",
        "42",
        "{\"token\": \"tok\"}",
        "{\"user\":{\"id\":\"\",\"display_name\":\"\",\"email\":\"\",\"role\":\"viewer\"},\"token\":\"tok\"}",
        "{\"user\":{\"id\":\"u1\",\"display_name\":\"\",\"email\":\"\",\"role\":\"viewer\"},\"token\":\"\"}",
    ] {
        let storage = MemoryStorage::new().seed(STORAGE_SESSION_KEY, bad);
        let session = rehydrate(&storage);
        assert!(!session.is_authenticated(), "input: {}", bad);
        assert_eq!(session, Session::default(), "input: {}", bad);
    }
}
