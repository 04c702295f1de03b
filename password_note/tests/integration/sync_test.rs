// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Two-client sync tests over a shared in-memory remote: tombstone
//! propagation, local-only filtering, divergent-KDF alignment, and
//! convergence of live record sets.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use password_note::infrastructure::repositories::MemoryRemoteStore;
use password_note::{InitializeOptions, VaultFacade};
use password_note_domain::entities::{RecordDraft, WebDavConfig};
use password_note_domain::VaultError;
use password_note_domain::RemoteVaultStore;

use crate::common;

const VAULT_PATH: &str = "/password-note/vault.json";

fn draft(title: &str, username: &str) -> RecordDraft {
    RecordDraft {
        title: title.to_string(),
        values: HashMap::from([
            ("username".to_string(), username.to_string()),
            ("password".to_string(), "pw".to_string()),
        ]),
        labels: vec![],
        local_only: false,
    }
}

fn local_only_draft(title: &str) -> RecordDraft {
    RecordDraft {
        local_only: true,
        ..draft(title, "local-user")
    }
}

/// Client A with a template, one record, and the remote configured.
async fn client_a(remote: Arc<MemoryRemoteStore>) -> VaultFacade {
    let mut a = common::initialized_facade(remote).await;
    let template = a.create_template("Login", common::login_fields()).await.unwrap();
    a.create_record(template, draft("Shared", "alice")).await.unwrap();
    a.configure_webdav(&common::webdav_config()).await.unwrap();
    a
}

/// Client B adopting the remote vault during initialization, which is
/// how a second device ends up sharing the first one's KDF.
async fn client_b_adopting(remote: Arc<MemoryRemoteStore>) -> VaultFacade {
    let mut b = common::memory_facade(remote);
    b.initialize(InitializeOptions {
        master_password: common::MASTER_PASSWORD.to_string(),
        webdav: Some(common::webdav_config()),
        pull_remote_vault: true,
    })
    .await
    .unwrap();
    assert!(b.is_unlocked());
    b
}

fn live_titles(vault: &VaultFacade) -> BTreeSet<String> {
    vault
        .get_record_list()
        .unwrap()
        .into_iter()
        .map(|entry| entry.title)
        .collect()
}

#[tokio::test]
async fn test_initial_push_writes_filtered_vault() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;

    let outcome = a.push(None).await;
    assert!(outcome.success, "push failed: {:?}", outcome.error);
    assert_eq!(outcome.records_pushed, 1);
    assert_eq!(outcome.conflicts_resolved, 0);
    assert!(remote.exists(VAULT_PATH).await.unwrap());
}

#[tokio::test]
async fn test_remote_blob_contains_no_plaintext() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    a.push(None).await;

    let blob = remote.get(VAULT_PATH).await.unwrap().unwrap();
    let text = String::from_utf8(blob).unwrap();
    assert!(!text.contains("alice"));
    assert!(!text.contains("Shared"));
    assert!(text.contains("ChaCha20-Poly1305-IETF"));
}

#[tokio::test]
async fn test_adoption_gives_second_client_the_records() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    assert!(a.push(None).await.success);

    let b = client_b_adopting(remote).await;
    assert_eq!(live_titles(&b), BTreeSet::from(["Shared".to_string()]));
}

#[tokio::test]
async fn test_tombstone_propagates_through_sync() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    assert!(a.push(None).await.success);
    let mut b = client_b_adopting(remote).await;
    let record = b.get_record_list().unwrap()[0].id;

    // A deletes and pushes the stone
    a.delete_record(&record).await.unwrap();
    let push = a.push(None).await;
    assert!(push.success);
    assert_eq!(push.conflicts_resolved, 1);

    // B pulls: the newer tombstone wins over its live copy
    let pull = b.pull(None).await;
    assert!(pull.success, "pull failed: {:?}", pull.error);
    assert!(pull.vault_updated);
    assert_eq!(pull.conflicts_resolved, 1);
    assert!(b.get_record(&record).unwrap().is_none());
    assert!(live_titles(&b).is_empty());
}

#[tokio::test]
async fn test_newer_edit_wins_over_both_directions() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    assert!(a.push(None).await.success);
    let mut b = client_b_adopting(remote).await;
    let record = b.get_record_list().unwrap()[0].id;

    // B edits after A's push; B pushes; A pulls the newer version
    b.update_record(
        &record,
        password_note_domain::entities::RecordPatch {
            title: Some("Shared v2".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(b.push(None).await.success);

    let pull = a.pull(None).await;
    assert!(pull.success);
    assert!(pull.vault_updated);
    assert_eq!(live_titles(&a), BTreeSet::from(["Shared v2".to_string()]));
}

#[tokio::test]
async fn test_local_only_records_never_reach_the_remote() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    let template = a.get_template_list().unwrap()[0].0;
    let private = a.create_record(template, local_only_draft("Private")).await.unwrap();

    assert!(a.push(None).await.success);
    let blob = String::from_utf8(remote.get(VAULT_PATH).await.unwrap().unwrap()).unwrap();
    assert!(!blob.contains(&private.to_string()));

    // ...and survive a pull untouched
    let pull = a.pull(None).await;
    assert!(pull.success);
    let decrypted = a.get_record(&private).unwrap().expect("local-only record kept");
    assert_eq!(decrypted.title, "Private");
    assert!(decrypted.local_only);

    // the other client never sees it
    let b = client_b_adopting(remote).await;
    assert_eq!(live_titles(&b), BTreeSet::from(["Shared".to_string()]));
}

#[tokio::test]
async fn test_pull_without_remote_is_a_clean_no_op() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote).await;
    let pull = a.pull(None).await;
    assert!(pull.success);
    assert!(!pull.vault_updated);
    assert_eq!(pull.records_pulled, 0);
}

#[tokio::test]
async fn test_divergent_kdf_pull_requires_password() {
    let remote = Arc::new(MemoryRemoteStore::new());

    // B seeds the remote under its own KDF
    let mut b = common::initialized_facade(remote.clone()).await;
    let template = b.create_template("Login", common::login_fields()).await.unwrap();
    b.create_record(template, draft("From B", "bob")).await.unwrap();
    b.configure_webdav(&common::webdav_config()).await.unwrap();
    assert!(b.push(None).await.success);
    let remote_kdf: serde_json::Value =
        serde_json::from_slice(&remote.get(VAULT_PATH).await.unwrap().unwrap()).unwrap();

    // A initialized independently: different salt, incompatible KDF
    let mut a = client_a(remote).await;

    let pull = a.pull(None).await;
    assert!(!pull.success);
    assert!(pull.password_required);

    let pull = a.pull(Some(common::MASTER_PASSWORD)).await;
    assert!(pull.success, "pull failed: {:?}", pull.error);
    assert!(pull.kdf_updated);
    let observed = serde_json::to_value(pull.remote_kdf.as_ref().unwrap()).unwrap();
    assert_eq!(observed, remote_kdf["kdf"]);

    // every pulled record decrypts under A's key
    assert!(live_titles(&a).contains("From B"));
    let pulled = a.get_record_list().unwrap();
    let from_b = pulled.iter().find(|e| e.title == "From B").unwrap();
    let decrypted = a.get_record(&from_b.id).unwrap().unwrap();
    assert!(decrypted.fields.iter().any(|f| f.name == "username" && f.value == "bob"));
}

#[tokio::test]
async fn test_divergent_kdf_push_adopts_remote_kdf() {
    let remote = Arc::new(MemoryRemoteStore::new());

    // B seeds the remote
    let mut b = common::initialized_facade(remote.clone()).await;
    let template = b.create_template("Login", common::login_fields()).await.unwrap();
    b.create_record(template, draft("From B", "bob")).await.unwrap();
    b.configure_webdav(&common::webdav_config()).await.unwrap();
    assert!(b.push(None).await.success);

    // A pushes its own records against the drifted remote
    let mut a = client_a(remote.clone()).await;
    let push = a.push(None).await;
    assert!(!push.success);
    assert!(push.password_required);

    let push = a.push(Some(common::MASTER_PASSWORD)).await;
    assert!(push.success, "push failed: {:?}", push.error);
    assert!(push.records_pushed >= 1);

    // the merged blob kept B's KDF, so B pulls without a password
    let pull = b.pull(None).await;
    assert!(pull.success, "pull failed: {:?}", pull.error);
    assert!(live_titles(&b).contains("Shared"));
    assert!(live_titles(&b).contains("From B"));
}

#[tokio::test]
async fn test_divergent_kdf_with_wrong_password_fails() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut b = common::initialized_facade(remote.clone()).await;
    b.configure_webdav(&common::webdav_config()).await.unwrap();
    assert!(b.push(None).await.success);

    let mut a = client_a(remote).await;
    let pull = a.pull(Some("nope")).await;
    assert!(!pull.success);
    assert_eq!(pull.error, Some(VaultError::InvalidCredentials));
}

#[tokio::test]
async fn test_two_clients_converge_on_shared_records() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    assert!(a.push(None).await.success);
    let mut b = client_b_adopting(remote).await;

    // concurrent additions on both sides
    let template_a = a.get_template_list().unwrap()[0].0;
    let template_b = b.get_template_list().unwrap()[0].0;
    a.create_record(template_a, draft("Only A", "alice")).await.unwrap();
    b.create_record(template_b, draft("Only B", "bob")).await.unwrap();

    assert!(a.push(None).await.success);
    assert!(b.push(None).await.success); // merges A's push
    assert!(a.pull(None).await.success);
    assert!(b.pull(None).await.success);

    let expected = BTreeSet::from(["Shared".to_string(), "Only A".to_string(), "Only B".to_string()]);
    assert_eq!(live_titles(&a), expected);
    assert_eq!(live_titles(&b), expected);
}

#[tokio::test]
async fn test_sync_without_configuration_fails_cleanly() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    let push = vault.push(None).await;
    assert!(!push.success);
    assert!(matches!(push.error, Some(VaultError::RemoteUnreachable(_))));
}

#[tokio::test]
async fn test_transport_failure_surfaces_as_push_failure() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    remote.set_offline(true);

    let push = a.push(None).await;
    assert!(!push.success);
    assert!(matches!(push.error, Some(VaultError::RemoteUnreachable(_))));

    remote.set_offline(false);
    assert!(a.push(None).await.success);
}

#[tokio::test]
async fn test_initialize_falls_back_to_local_when_remote_unreachable() {
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_offline(true);

    let mut vault = common::memory_facade(remote.clone());
    vault
        .initialize(InitializeOptions {
            master_password: common::MASTER_PASSWORD.to_string(),
            webdav: Some(common::webdav_config()),
            pull_remote_vault: true,
        })
        .await
        .unwrap();
    assert!(vault.is_unlocked());
    assert!(vault.is_initialized().await.unwrap());
}

#[tokio::test]
async fn test_initialize_adoption_with_wrong_password_is_rejected() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote.clone()).await;
    assert!(a.push(None).await.success);

    let mut b = common::memory_facade(remote);
    let err = b
        .initialize(InitializeOptions {
            master_password: "Another-Strong-Passphrase-77".to_string(),
            webdav: Some(common::webdav_config()),
            pull_remote_vault: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err, VaultError::InvalidCredentials);
}

#[tokio::test]
async fn test_sync_status_reflects_activity() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut a = client_a(remote).await;

    let status = a.get_sync_status().unwrap();
    assert!(status.configured);
    assert_eq!(status.remote_path.as_deref(), Some(VAULT_PATH));
    assert!(status.last_push.is_none());

    assert!(a.push(None).await.success);
    let status = a.get_sync_status().unwrap();
    assert!(status.last_push.is_some());
    assert!(status.last_pull.is_none());
}

#[tokio::test]
async fn test_webdav_config_custody() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    assert!(vault.get_webdav_config().unwrap().is_none());

    vault.configure_webdav(&common::webdav_config()).await.unwrap();
    assert_eq!(vault.get_webdav_config().unwrap(), Some(common::webdav_config()));

    let restored: WebDavConfig = vault.get_webdav_config().unwrap().unwrap();
    assert_eq!(restored.password, "app-password");

    vault.clear_webdav_config().await.unwrap();
    assert!(vault.get_webdav_config().unwrap().is_none());
    assert!(!vault.get_sync_status().unwrap().configured);
}
