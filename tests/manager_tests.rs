//! Integration tests for vault lifecycle, authentication, and encrypted records.

use passlock::crypto::KdfParams;
use passlock::{PassLockError, VaultManager, VaultStore};
use tempfile::TempDir;

/// Cheap Argon2 parameters so the suite stays fast.
const FAST: KdfParams = KdfParams {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
    output_len: 64,
};

/// Helper: a manager over a fresh temp dir.
fn manager() -> (TempDir, VaultManager) {
    let dir = TempDir::new().expect("create temp dir");
    let manager = VaultManager::new(VaultStore::new(dir.path()), FAST);
    (dir, manager)
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[test]
fn correct_password_opens_a_session() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();

    let session = mgr.authenticate("work", b"correct-horse").unwrap();
    assert_eq!(session.vault_name(), "work");
}

#[test]
fn wrong_password_is_denied() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();

    let attempts: [&[u8]; 4] = [b"wrong", b"", b"correct-horse ", b"Correct-horse"];
    for attempt in attempts {
        let err = mgr.authenticate("work", attempt).err().unwrap();
        assert!(matches!(err, PassLockError::AuthenticationDenied));
    }
}

#[test]
fn missing_vault_is_reported_as_not_found() {
    let (_dir, mgr) = manager();
    let err = mgr.authenticate("ghost", b"anything").err().unwrap();
    assert!(matches!(err, PassLockError::VaultNotFound(ref n) if n == "ghost"));
}

#[test]
fn login_failures_share_a_public_message() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();

    let missing = mgr.authenticate("ghost", b"pw").err().unwrap();
    let wrong = mgr.authenticate("work", b"pw").err().unwrap();
    assert_eq!(missing.public_message(), wrong.public_message());
}

#[test]
fn password_is_never_stored() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();

    let raw = std::fs::read(mgr.store().vault_path("work")).unwrap();
    assert!(!raw
        .windows(b"correct-horse".len())
        .any(|w| w == b"correct-horse"));
}

#[test]
fn each_vault_gets_its_own_salt() {
    let (_dir, mgr) = manager();
    mgr.create_vault("a", b"same-password").unwrap();
    mgr.create_vault("b", b"same-password").unwrap();

    let store = mgr.store();
    assert_ne!(store.get_salt("a").unwrap(), store.get_salt("b").unwrap());
    assert_ne!(store.get_auth_tag("a").unwrap(), store.get_auth_tag("b").unwrap());
}

#[test]
fn stored_params_win_over_manager_params() {
    let dir = TempDir::new().unwrap();
    let creator = VaultManager::new(VaultStore::new(dir.path()), FAST);
    creator.create_vault("work", b"correct-horse").unwrap();

    let stronger = KdfParams {
        memory_kib: 16_384,
        iterations: 2,
        ..FAST
    };
    let reader = VaultManager::new(VaultStore::new(dir.path()), stronger);
    reader.authenticate("work", b"correct-horse").unwrap();

    let stored = reader.store().get_kdf_params("work").unwrap();
    assert_eq!(stored.memory_kib, FAST.memory_kib);
    assert_eq!(stored.iterations, FAST.iterations);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_list_delete() {
    let (_dir, mgr) = manager();
    mgr.create_vault("personal", b"pw-one").unwrap();
    mgr.create_vault("work", b"pw-two").unwrap();

    let names: Vec<String> = mgr.list_vaults().unwrap().into_iter().collect();
    assert_eq!(names, vec!["personal".to_string(), "work".to_string()]);

    mgr.delete_vault("work").unwrap();
    let names: Vec<String> = mgr.list_vaults().unwrap().into_iter().collect();
    assert_eq!(names, vec!["personal".to_string()]);

    assert!(matches!(
        mgr.authenticate("work", b"pw-two"),
        Err(PassLockError::VaultNotFound(_))
    ));
    assert!(matches!(
        mgr.delete_vault("work"),
        Err(PassLockError::VaultNotFound(_))
    ));
}

#[test]
fn duplicate_vault_is_rejected_and_original_password_kept() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"first").unwrap();

    let err = mgr.create_vault("work", b"second").err().unwrap();
    assert!(matches!(err, PassLockError::VaultAlreadyExists(_)));

    mgr.authenticate("work", b"first").unwrap();
    assert!(matches!(
        mgr.authenticate("work", b"second"),
        Err(PassLockError::AuthenticationDenied)
    ));
}

#[test]
fn invalid_vault_name_is_rejected() {
    let (_dir, mgr) = manager();
    let err = mgr.create_vault("../etc", b"pw").err().unwrap();
    assert!(matches!(err, PassLockError::InvalidVaultName { .. }));
}

#[test]
fn recreated_vault_starts_empty_with_new_password() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"old-password").unwrap();
    {
        let mut session = mgr.authenticate("work", b"old-password").unwrap();
        session
            .records()
            .add_record("svc", "user", "secret", None)
            .unwrap();
    }
    mgr.delete_vault("work").unwrap();

    mgr.create_vault("work", b"new-password").unwrap();
    assert!(matches!(
        mgr.authenticate("work", b"old-password"),
        Err(PassLockError::AuthenticationDenied)
    ));
    let mut session = mgr.authenticate("work", b"new-password").unwrap();
    assert!(session.records().list_all().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn add_then_get_round_trips() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let mut records = session.records();

    let added = records
        .add_record("github.com", "alice", "s3cr3t!", None)
        .unwrap();
    assert!(added.id > 0);
    assert_eq!(added.secret.as_str(), "s3cr3t!");

    let fetched = records.get_record(added.id).unwrap();
    assert_eq!(fetched.id, added.id);
    assert_eq!(fetched.service, "github.com");
    assert_eq!(fetched.username, "alice");
    assert_eq!(fetched.secret.as_str(), "s3cr3t!");
    assert!(fetched.notes.is_none());
    assert_eq!(fetched.created_at, added.created_at);
}

#[test]
fn full_scenario_across_sessions() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();

    let id = {
        let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
        session
            .records()
            .add_record("github.com", "alice", "s3cr3t!", Some("2fa: app"))
            .unwrap()
            .id
    };

    // A fresh session re-derives the key from the password.
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let records = session.records();
    let entry = records.get_record(id).unwrap();
    assert_eq!(entry.secret.as_str(), "s3cr3t!");
    assert_eq!(entry.notes.as_deref().map(|n| n.as_str()), Some("2fa: app"));

    let by_service = records.list_by_service("github.com").unwrap();
    assert_eq!(by_service.len(), 1);
    assert_eq!(by_service[0].username, "alice");
}

#[test]
fn secrets_are_not_stored_in_plaintext() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let id = session
        .records()
        .add_record("svc", "user", "plaintext-marker", Some("notes-marker"))
        .unwrap()
        .id;

    let handle = mgr.store().open("work").unwrap();
    let stored = handle.get_record(id).unwrap();
    for blob in [&stored.encrypted_secret, stored.encrypted_notes.as_ref().unwrap()] {
        assert!(!blob.windows(6).any(|w| w == b"marker"));
    }
}

#[test]
fn list_filters_by_exact_service_in_insertion_order() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let mut records = session.records();

    records.add_record("github.com", "alice", "a", None).unwrap();
    records.add_record("gitlab.com", "bob", "b", None).unwrap();
    records.add_record("github.com", "carol", "c", None).unwrap();

    let users: Vec<String> = records
        .list_by_service("github.com")
        .unwrap()
        .into_iter()
        .map(|e| e.username)
        .collect();
    assert_eq!(users, vec!["alice".to_string(), "carol".to_string()]);

    let all: Vec<String> = records
        .list_all()
        .unwrap()
        .iter()
        .map(|e| e.secret.to_string())
        .collect();
    assert_eq!(all, vec!["a", "b", "c"]);

    assert!(records.list_by_service("nothing.example").unwrap().is_empty());
}

#[test]
fn empty_and_unicode_values_survive() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let mut records = session.records();

    let empty = records.add_record("svc", "user", "", Some("")).unwrap();
    let fancy = records
        .add_record("bücher.example", "zoë", "pässwörd 🔑", None)
        .unwrap();

    let e = records.get_record(empty.id).unwrap();
    assert_eq!(e.secret.as_str(), "");
    assert_eq!(e.notes.as_deref().map(|n| n.as_str()), Some(""));

    let f = records.get_record(fancy.id).unwrap();
    assert_eq!(f.service, "bücher.example");
    assert_eq!(f.secret.as_str(), "pässwörd 🔑");
}

#[test]
fn delete_and_clear() {
    let (_dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let mut records = session.records();

    let a = records.add_record("a", "u", "1", None).unwrap();
    let b = records.add_record("b", "u", "2", None).unwrap();

    records.delete_record(a.id).unwrap();
    records.delete_record(a.id).unwrap();
    assert!(matches!(
        records.get_record(a.id),
        Err(PassLockError::RecordNotFound(id)) if id == a.id
    ));
    assert_eq!(records.get_record(b.id).unwrap().secret.as_str(), "2");

    records.clear_vault().unwrap();
    assert!(records.list_all().unwrap().is_empty());
    drop(session);

    // The password still works after clearing.
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let c = session.records().add_record("c", "u", "3", None).unwrap();
    assert!(c.id > b.id);
}

#[test]
fn sessions_are_scoped_to_their_vault() {
    let (_dir, mgr) = manager();
    mgr.create_vault("a", b"password-a").unwrap();
    mgr.create_vault("b", b"password-b").unwrap();

    let mut a = mgr.authenticate("a", b"password-a").unwrap();
    let mut b = mgr.authenticate("b", b"password-b").unwrap();

    let rec = a
        .records()
        .add_record("shared.example", "alice", "only-in-a", None)
        .unwrap();

    assert!(b.records().list_all().unwrap().is_empty());
    assert!(matches!(
        b.records().get_record(rec.id),
        Err(PassLockError::RecordNotFound(_))
    ));
}

#[test]
fn tampered_ciphertext_is_reported_as_corrupt() {
    let (dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let good = session.records().add_record("svc", "ok", "fine", None).unwrap();
    let bad = session.records().add_record("svc", "bad", "victim", None).unwrap();

    let conn = rusqlite::Connection::open(dir.path().join("work.sqlite")).unwrap();
    conn.execute(
        "UPDATE records SET secret = zeroblob(40) WHERE id = ?1",
        [bad.id],
    )
    .unwrap();
    drop(conn);

    let records = session.records();
    assert_eq!(records.get_record(good.id).unwrap().secret.as_str(), "fine");
    assert!(matches!(
        records.get_record(bad.id),
        Err(PassLockError::RecordCorruptOrWrongKey(id)) if id == bad.id
    ));
    assert!(matches!(
        records.list_all(),
        Err(PassLockError::RecordCorruptOrWrongKey(_))
    ));
}

#[test]
fn truncated_ciphertext_is_reported_as_corrupt() {
    let (dir, mgr) = manager();
    mgr.create_vault("work", b"correct-horse").unwrap();
    let mut session = mgr.authenticate("work", b"correct-horse").unwrap();
    let rec = session.records().add_record("svc", "u", "x", None).unwrap();

    let conn = rusqlite::Connection::open(dir.path().join("work.sqlite")).unwrap();
    conn.execute("UPDATE records SET secret = x'0102' WHERE id = ?1", [rec.id])
        .unwrap();
    drop(conn);

    assert!(matches!(
        session.records().get_record(rec.id),
        Err(PassLockError::RecordCorruptOrWrongKey(_))
    ));
}
