// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Encrypted CRUD tests: partial updates, tombstones, template and label
//! lifecycles, and the reference-integrity rules between them.

use std::collections::HashMap;
use std::sync::Arc;

use password_note::infrastructure::repositories::MemoryRemoteStore;
use password_note::VaultFacade;
use password_note_domain::entities::{RecordDraft, RecordPatch};
use password_note_domain::value_objects::{FieldId, TemplateId};
use password_note_domain::{FieldKind, TemplateField, VaultError};

use crate::common;

async fn facade_with_login_template() -> (VaultFacade, TemplateId) {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    let template = vault.create_template("Login", common::login_fields()).await.unwrap();
    (vault, template)
}

fn draft(title: &str) -> RecordDraft {
    RecordDraft {
        title: title.to_string(),
        values: HashMap::from([
            ("username".to_string(), "alice".to_string()),
            ("password".to_string(), "pw".to_string()),
        ]),
        labels: vec![],
        local_only: false,
    }
}

#[tokio::test]
async fn test_update_mutates_only_supplied_parts() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault.create_record(template, draft("Example")).await.unwrap();

    // title only
    vault
        .update_record(
            &record,
            RecordPatch {
                title: Some("Renamed".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap();
    let decrypted = vault.get_record(&record).unwrap().unwrap();
    assert_eq!(decrypted.title, "Renamed");
    assert!(decrypted.fields.iter().any(|f| f.name == "username" && f.value == "alice"));

    // one field only
    vault
        .update_record(
            &record,
            RecordPatch {
                values: Some(HashMap::from([("password".to_string(), "rotated".to_string())])),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap();
    let decrypted = vault.get_record(&record).unwrap().unwrap();
    assert_eq!(decrypted.title, "Renamed");
    assert!(decrypted.fields.iter().any(|f| f.name == "username" && f.value == "alice"));
    assert!(decrypted.fields.iter().any(|f| f.name == "password" && f.value == "rotated"));
}

#[tokio::test]
async fn test_update_bumps_last_modified() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault.create_record(template, draft("Example")).await.unwrap();
    let created_at = vault.get_record(&record).unwrap().unwrap().last_modified;

    vault
        .update_record(
            &record,
            RecordPatch {
                title: Some("Renamed".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap();
    let updated_at = vault.get_record(&record).unwrap().unwrap().last_modified;
    assert!(updated_at >= created_at);
}

#[tokio::test]
async fn test_unknown_field_names_are_dropped() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault
        .create_record(
            template,
            RecordDraft {
                title: "Example".to_string(),
                values: HashMap::from([
                    ("username".to_string(), "alice".to_string()),
                    ("no-such-field".to_string(), "ignored".to_string()),
                ]),
                labels: vec![],
                local_only: false,
            },
        )
        .await
        .unwrap();

    let decrypted = vault.get_record(&record).unwrap().unwrap();
    assert_eq!(decrypted.fields.len(), 1);
    assert_eq!(decrypted.fields[0].name, "username");
}

#[tokio::test]
async fn test_delete_is_a_tombstone() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault.create_record(template, draft("Example")).await.unwrap();

    vault.delete_record(&record).await.unwrap();
    assert!(vault.get_record(&record).unwrap().is_none());
    assert!(vault.get_record_list().unwrap().is_empty());

    // the tombstone stays in the wire form so sync can propagate it
    let exported = vault.export_vault().unwrap();
    let json: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let entry = &json["records"][record.to_string()];
    assert_eq!(entry["deleted"], true);
    assert!(entry.get("title").is_none());
}

#[tokio::test]
async fn test_deleted_record_cannot_be_updated() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault.create_record(template, draft("Example")).await.unwrap();
    vault.delete_record(&record).await.unwrap();

    let err = vault
        .update_record(
            &record,
            RecordPatch {
                title: Some("zombie".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::RecordNotFound(_)));
}

#[tokio::test]
async fn test_create_against_missing_template_fails() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let mut vault = common::initialized_facade(remote).await;
    let err = vault.create_record(TemplateId::new(), draft("Example")).await.unwrap_err();
    assert!(matches!(err, VaultError::TemplateNotFound(_)));
}

#[tokio::test]
async fn test_label_lifecycle() {
    let (mut vault, template) = facade_with_login_template().await;

    let work = vault.create_label("Work").await.unwrap();
    let home = vault.create_label("Home").await.unwrap();
    assert_eq!(vault.get_label_list().unwrap().len(), 2);

    let mut record_draft = draft("Example");
    record_draft.labels = vec![work, home];
    let record = vault.create_record(template, record_draft).await.unwrap();
    assert_eq!(vault.get_record(&record).unwrap().unwrap().labels.len(), 2);

    vault.update_label(&work, "Office").await.unwrap();
    assert_eq!(vault.get_label(&work).unwrap().unwrap().name, "Office");

    // deleting a label leaves referencing records readable
    vault.delete_label(&home).await.unwrap();
    assert!(vault.get_label(&home).unwrap().is_none());
    assert_eq!(vault.get_label_list().unwrap().len(), 1);
    assert!(vault.get_record(&record).unwrap().is_some());
}

#[tokio::test]
async fn test_unknown_label_ids_dropped_on_create() {
    let (mut vault, template) = facade_with_login_template().await;
    let known = vault.create_label("Known").await.unwrap();

    let mut record_draft = draft("Example");
    record_draft.labels = vec![known, password_note_domain::value_objects::LabelId::new()];
    let record = vault.create_record(template, record_draft).await.unwrap();

    let labels = vault.get_record(&record).unwrap().unwrap().labels;
    assert_eq!(labels, vec![known]);
}

#[tokio::test]
async fn test_template_lifecycle_and_in_use_guard() {
    let (mut vault, template) = facade_with_login_template().await;
    let record = vault.create_record(template, draft("Example")).await.unwrap();

    // referenced by a live record: refuse deletion
    let err = vault.delete_template(&template).await.unwrap_err();
    assert!(matches!(err, VaultError::TemplateInUse(_)));

    // tombstoning the record unblocks the template
    vault.delete_record(&record).await.unwrap();
    vault.delete_template(&template).await.unwrap();
    assert!(vault.get_template(&template).unwrap().is_none());
    assert!(vault.get_template_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_template_schema() {
    let (mut vault, template) = facade_with_login_template().await;
    let mut fields = common::login_fields();
    fields.push(TemplateField {
        id: FieldId::new("f3").unwrap(),
        name: "otp-url".to_string(),
        kind: FieldKind::Url,
        optional: true,
    });
    vault.update_template(&template, "Login v2", fields).await.unwrap();

    let updated = vault.get_template(&template).unwrap().unwrap();
    assert_eq!(updated.name, "Login v2");
    assert_eq!(updated.fields.len(), 3);

    // records can immediately use the new field
    let record = vault
        .create_record(
            template,
            RecordDraft {
                title: "With OTP".to_string(),
                values: HashMap::from([("otp-url".to_string(), "otpauth://totp/x".to_string())]),
                labels: vec![],
                local_only: false,
            },
        )
        .await
        .unwrap();
    let decrypted = vault.get_record(&record).unwrap().unwrap();
    assert!(decrypted.fields.iter().any(|f| f.kind == FieldKind::Url));
}

#[tokio::test]
async fn test_record_list_returns_decrypted_titles() {
    let (mut vault, template) = facade_with_login_template().await;
    vault.create_record(template, draft("First")).await.unwrap();
    vault.create_record(template, draft("Second")).await.unwrap();

    let titles: Vec<String> = vault.get_record_list().unwrap().into_iter().map(|e| e.title).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"First".to_string()));
    assert!(titles.contains(&"Second".to_string()));
}
