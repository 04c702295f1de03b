// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! KDF rotation tests: the atomic re-encryption walk, its failure
//! policy, and post-rotation authentication.

use std::collections::HashMap;
use std::sync::Arc;

use password_note::infrastructure::crypto::SystemRandomSource;
use password_note::infrastructure::repositories::{MemoryBlobStore, MemoryRemoteStore};
use password_note::{InitializeOptions, VaultFacade};
use password_note_domain::entities::RecordDraft;
use password_note_domain::value_objects::kdf_config::Argon2idParams;
use password_note_domain::value_objects::{KdfConfig, RecordId};
use password_note_domain::VaultError;

use crate::common;

fn fresh_config() -> KdfConfig {
    KdfConfig::generate(&SystemRandomSource::new()).expect("fresh config")
}

async fn vault_with_record() -> (VaultFacade, RecordId, Arc<MemoryBlobStore>) {
    let remote = Arc::new(MemoryRemoteStore::new());
    let store = Arc::new(MemoryBlobStore::new());
    let mut vault = common::memory_facade_with_store(store.clone(), remote);
    vault
        .initialize(InitializeOptions::with_password(common::MASTER_PASSWORD))
        .await
        .unwrap();
    let template = vault.create_template("Login", common::login_fields()).await.unwrap();
    let record = vault
        .create_record(
            template,
            RecordDraft {
                title: "Example".to_string(),
                values: HashMap::from([
                    ("username".to_string(), "alice".to_string()),
                    ("password".to_string(), "pw".to_string()),
                ]),
                labels: vec![],
                local_only: false,
            },
        )
        .await
        .unwrap();
    (vault, record, store)
}

fn assert_plaintexts_intact(vault: &VaultFacade, record: &RecordId) {
    let decrypted = vault.get_record(record).unwrap().expect("record exists");
    assert!(decrypted.fields.iter().any(|f| f.name == "username" && f.value == "alice"));
    assert!(decrypted.fields.iter().any(|f| f.name == "password" && f.value == "pw"));
}

#[tokio::test]
async fn test_rotation_preserves_every_plaintext() {
    let (mut vault, record, _) = vault_with_record().await;
    let label = vault.create_label("Work").await.unwrap();

    vault
        .update_kdf_config(fresh_config(), common::MASTER_PASSWORD)
        .await
        .unwrap();

    assert_plaintexts_intact(&vault, &record);
    assert_eq!(vault.get_label(&label).unwrap().unwrap().name, "Work");
    assert_eq!(vault.get_template_list().unwrap().len(), 1);
}

#[tokio::test]
async fn test_authentication_works_after_rotation() {
    let (mut vault, record, _) = vault_with_record().await;
    vault
        .update_kdf_config(fresh_config(), common::MASTER_PASSWORD)
        .await
        .unwrap();

    vault.lock();
    let outcome = vault.authenticate(common::MASTER_PASSWORD).await;
    assert!(outcome.success, "authenticate failed: {:?}", outcome.error);
    assert_plaintexts_intact(&vault, &record);
}

#[tokio::test]
async fn test_identical_configuration_rejected() {
    let (mut vault, _, _) = vault_with_record().await;
    let exported = vault.export_vault().unwrap();
    let current: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let same: KdfConfig = serde_json::from_value(current["kdf"].clone()).unwrap();

    let err = vault.update_kdf_config(same, common::MASTER_PASSWORD).await.unwrap_err();
    assert!(matches!(err, VaultError::KdfValidation(_)));
}

#[tokio::test]
async fn test_wrong_password_aborts_rotation_untouched() {
    let (mut vault, record, _) = vault_with_record().await;
    let before = vault.export_vault().unwrap();

    let err = vault.update_kdf_config(fresh_config(), "nope").await.unwrap_err();
    assert_eq!(err, VaultError::InvalidCredentials);

    // both memory and persisted state are unchanged
    assert_eq!(vault.export_vault().unwrap(), before);
    assert_plaintexts_intact(&vault, &record);
    vault.lock();
    assert!(vault.authenticate(common::MASTER_PASSWORD).await.success);
}

#[tokio::test]
async fn test_invalid_new_configuration_rejected() {
    let (mut vault, _, _) = vault_with_record().await;
    let KdfConfig::Argon2id(mut params) = fresh_config();
    params.opslimit = 99;
    let err = vault
        .update_kdf_config(KdfConfig::Argon2id(params), common::MASTER_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::KdfValidation(_)));
}

#[tokio::test]
async fn test_rotation_validates_salt_length() {
    let (mut vault, _, _) = vault_with_record().await;
    let config = KdfConfig::Argon2id(Argon2idParams {
        salt: "c2hvcnQ=".to_string(), // "short"
        key_length: 32,
        opslimit: 3,
        memlimit: 64 * 1024 * 1024,
    });
    let err = vault
        .update_kdf_config(config, common::MASTER_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::KdfValidation(_)));
}

#[tokio::test]
async fn test_webdav_config_survives_rotation() {
    let (mut vault, _, _) = vault_with_record().await;
    vault.configure_webdav(&common::webdav_config()).await.unwrap();

    vault
        .update_kdf_config(fresh_config(), common::MASTER_PASSWORD)
        .await
        .unwrap();

    let restored = vault.get_webdav_config().unwrap().expect("config kept");
    assert_eq!(restored, common::webdav_config());
}

#[tokio::test]
async fn test_rotation_persists_across_reopen() {
    let (mut vault, record, store) = vault_with_record().await;
    vault
        .update_kdf_config(fresh_config(), common::MASTER_PASSWORD)
        .await
        .unwrap();
    drop(vault);

    // a fresh handle over the same storage unlocks with the same
    // password under the rotated configuration
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut reopened = common::memory_facade_with_store(store, remote);
    reopened
        .initialize(InitializeOptions::with_password(common::MASTER_PASSWORD))
        .await
        .unwrap();
    assert!(reopened.authenticate(common::MASTER_PASSWORD).await.success);
    assert_plaintexts_intact(&reopened, &record);
}
