// /////////////////////////////////////////////////////////////////////////////
// Password Note
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # WebDAV Remote Store
//!
//! [`RemoteVaultStore`] over plain WebDAV verbs: the whole remote
//! protocol is one JSON blob at a configured path, so GET/PUT/DELETE plus
//! MKCOL for the parent collections and HEAD for existence cover it.
//!
//! Cross-origin permission pre-flight is a concern of the embedding
//! transport, not of this adapter. Every transport-level failure maps to
//! `RemoteUnreachable` with the status or error text; response bodies are
//! never included in errors.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use password_note_domain::entities::WebDavConfig;
use password_note_domain::repositories::{RemoteStoreFactory, RemoteVaultStore};
use password_note_domain::VaultError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// WebDAV-backed remote blob store.
pub struct WebDavStore {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl WebDavStore {
    pub fn new(config: &WebDavConfig) -> Result<Self, VaultError> {
        if config.is_empty() {
            return Err(VaultError::remote_unreachable("WebDAV is not configured"));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VaultError::internal(format!("http client construction failed: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.username.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Lightweight connection test: an OPTIONS request against the base
    /// collection. Auth failures and server errors are reported; 404 is
    /// fine (the collection may not exist until the first push).
    pub async fn probe(&self) -> Result<(), VaultError> {
        let response = self
            .authed(self.client.request(Method::OPTIONS, &self.base_url))
            .send()
            .await
            .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(VaultError::remote_unreachable(format!(
                "authentication rejected (status {})",
                status.as_u16()
            )));
        }
        if status.is_server_error() {
            return Err(VaultError::remote_unreachable(format!("server error (status {})", status.as_u16())));
        }
        Ok(())
    }

    fn unexpected(op: &str, status: StatusCode) -> VaultError {
        VaultError::remote_unreachable(format!("{} failed with status {}", op, status.as_u16()))
    }
}

#[async_trait]
impl RemoteVaultStore for WebDavStore {
    async fn exists(&self, path: &str) -> Result<bool, VaultError> {
        let response = self
            .authed(self.client.head(self.url_for(path)))
            .send()
            .await
            .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(Self::unexpected("HEAD", status)),
        }
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, VaultError> {
        let response = self
            .authed(self.client.get(self.url_for(path)))
            .send()
            .await
            .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
                Ok(Some(bytes.to_vec()))
            }
            status => Err(Self::unexpected("GET", status)),
        }
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), VaultError> {
        let response = self
            .authed(self.client.put(self.url_for(path)).body(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::unexpected("PUT", status))
        }
    }

    async fn mkdir_parents(&self, path: &str) -> Result<(), VaultError> {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();
        // every segment except the blob name itself is a collection
        let mut collection = String::new();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            collection.push('/');
            collection.push_str(segment);
            let method = Method::from_bytes(b"MKCOL")
                .map_err(|e| VaultError::internal(format!("MKCOL method construction failed: {}", e)))?;
            let response = self
                .authed(self.client.request(method, self.url_for(&collection)))
                .send()
                .await
                .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
            match response.status() {
                // 405: the collection already exists
                StatusCode::METHOD_NOT_ALLOWED => {}
                status if status.is_success() => {}
                status => return Err(Self::unexpected("MKCOL", status)),
            }
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), VaultError> {
        let response = self
            .authed(self.client.delete(self.url_for(path)))
            .send()
            .await
            .map_err(|e| VaultError::remote_unreachable(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(Self::unexpected("DELETE", status)),
        }
    }
}

/// Production factory: one fresh `WebDavStore` per configuration.
pub struct WebDavStoreFactory;

impl WebDavStoreFactory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebDavStoreFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStoreFactory for WebDavStoreFactory {
    fn open(&self, config: &WebDavConfig) -> Result<Arc<dyn RemoteVaultStore>, VaultError> {
        Ok(Arc::new(WebDavStore::new(config)?))
    }
}
