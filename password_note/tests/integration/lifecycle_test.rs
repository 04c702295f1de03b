// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Facade lifecycle tests: initialize, lock/unlock, wrong password,
//! reset, and the create/read acceptance path.

use std::collections::HashMap;
use std::sync::Arc;

use password_note::infrastructure::repositories::{MemoryBlobStore, MemoryRemoteStore};
use password_note::InitializeOptions;
use password_note_domain::entities::RecordDraft;
use password_note_domain::VaultError;

use crate::common;

fn draft(title: &str, username: &str, password: &str) -> RecordDraft {
    RecordDraft {
        title: title.to_string(),
        values: HashMap::from([
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]),
        labels: vec![],
        local_only: false,
    }
}

#[tokio::test]
async fn test_create_and_read_record() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;

    let template = vault.create_template("Login", common::login_fields()).await.unwrap();
    let record = vault
        .create_record(template, draft("Example", "alice", "pw"))
        .await
        .unwrap();

    let decrypted = vault.get_record(&record).unwrap().expect("record exists");
    assert_eq!(decrypted.title, "Example");
    assert!(decrypted
        .fields
        .iter()
        .any(|f| f.name == "username" && f.value == "alice"));
    assert!(decrypted.fields.iter().any(|f| f.name == "password" && f.value == "pw"));
}

#[tokio::test]
async fn test_lock_blocks_reads_and_authenticate_restores_them() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    let template = vault.create_template("Login", common::login_fields()).await.unwrap();
    let record = vault
        .create_record(template, draft("Example", "alice", "pw"))
        .await
        .unwrap();

    vault.lock();
    assert!(!vault.is_unlocked());
    assert_eq!(vault.get_record(&record).unwrap_err(), VaultError::Locked);

    let outcome = vault.authenticate(common::MASTER_PASSWORD).await;
    assert!(outcome.success, "authenticate failed: {:?}", outcome.error);
    assert!(vault.is_unlocked());

    let decrypted = vault.get_record(&record).unwrap().expect("record exists");
    assert!(decrypted
        .fields
        .iter()
        .any(|f| f.name == "username" && f.value == "alice"));
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    vault.lock();

    let outcome = vault.authenticate("nope").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(VaultError::InvalidCredentials));
    assert!(!vault.is_unlocked());
}

#[tokio::test]
async fn test_weak_password_rejected_at_initialize_only() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::memory_facade(remote);

    let err = vault
        .initialize(InitializeOptions::with_password("password"))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::WeakPassword(_)));
    assert!(!vault.is_initialized().await.unwrap());
}

#[tokio::test]
async fn test_apis_fail_before_initialize() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let vault = common::memory_facade(remote);
    assert_eq!(vault.get_record_list().unwrap_err(), VaultError::NotInitialized);
    assert_eq!(vault.export_vault().unwrap_err(), VaultError::NotInitialized);
}

#[tokio::test]
async fn test_initialize_over_existing_persistence_requires_authenticate() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = Arc::new(MemoryBlobStore::new());

    let mut first = common::memory_facade_with_store(store.clone(), remote.clone());
    first
        .initialize(InitializeOptions::with_password(common::MASTER_PASSWORD))
        .await
        .unwrap();
    let template = first.create_template("Login", common::login_fields()).await.unwrap();
    first
        .create_record(template, draft("Example", "alice", "pw"))
        .await
        .unwrap();

    // Second handle over the same storage: initialize only marks it
    // locked, even with a different (ignored) password.
    let mut second = common::memory_facade_with_store(store, remote);
    second
        .initialize(InitializeOptions::with_password(common::MASTER_PASSWORD))
        .await
        .unwrap();
    assert!(!second.is_unlocked());
    assert_eq!(second.get_record_list().unwrap_err(), VaultError::Locked);

    let outcome = second.authenticate(common::MASTER_PASSWORD).await;
    assert!(outcome.success);
    assert_eq!(second.get_record_list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_wipes_persistence_and_state() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    assert!(vault.is_initialized().await.unwrap());

    vault.reset().await.unwrap();
    assert!(!vault.is_initialized().await.unwrap());
    assert!(!vault.is_unlocked());
    assert_eq!(vault.get_record_list().unwrap_err(), VaultError::NotInitialized);
}

#[tokio::test]
async fn test_export_contains_no_plaintext() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    let template = vault.create_template("Login", common::login_fields()).await.unwrap();
    vault
        .create_record(template, draft("Example", "alice-plaintext", "pw-plaintext"))
        .await
        .unwrap();

    let exported = vault.export_vault().unwrap();
    assert!(exported.contains("records"));
    assert!(!exported.contains("alice-plaintext"));
    assert!(!exported.contains("pw-plaintext"));
    assert!(!exported.contains("Example"));
}

#[tokio::test]
async fn test_password_complexity_check_is_stateless() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let vault = common::memory_facade(remote);
    assert!(!vault.check_password_complexity("abc").is_acceptable());
    assert!(vault.check_password_complexity(common::MASTER_PASSWORD).is_acceptable());
}
