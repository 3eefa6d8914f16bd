//! Remote object-store client.
//!
//! Speaks the content-addressed record protocol over HTTP: records are
//! arbitrary JSON payloads owned by a public key, addressed by a
//! server-assigned record id plus a client-chosen hash (we use the contract
//! uuid). Every call is signed with the keypair handed to it - the client
//! holds no ambient identity, so two concurrent calls for different
//! contracts can never sign under each other's keys.
//!
//! Failures are classified, never propagated raw: the replicated store
//! treats all of them as recoverable.

use crate::domain::errors::RemoteStoreError;
use crate::domain::time;
use crate::ports::outbound::RemoteObjectStore;
use async_trait::async_trait;
use covenant_crypto::Keypair;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record envelope sent on create/update/delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordEnvelope<'a> {
    timestamp: String,
    hash: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a serde_json::Value>,
    pub_key: String,
    signature: String,
}

/// Every remote response carries the same envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordResponse {
    success: bool,
    #[serde(default)]
    record_id: Option<String>,
    #[serde(default)]
    payload: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the remote object store.
pub struct CosClient {
    http: reqwest::Client,
    base_url: String,
}

impl CosClient {
    /// Build a client against `base_url` with bounded call duration.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteStoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| RemoteStoreError::Unavailable(e.to_string()))?;

        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sign the canonical record message `timestamp || pubKey || hash`.
    fn signed_envelope<'a>(
        keypair: &Keypair,
        hash: &'a str,
        payload: Option<&'a serde_json::Value>,
    ) -> RecordEnvelope<'a> {
        let timestamp = time::epoch_millis();
        let pub_key = keypair.public_key_hex();
        let signature = keypair.sign(&format!("{timestamp}{pub_key}{hash}"));
        RecordEnvelope {
            timestamp,
            hash,
            payload,
            pub_key,
            signature,
        }
    }

    fn classify_transport(err: reqwest::Error) -> RemoteStoreError {
        if err.is_connect() || err.is_timeout() {
            RemoteStoreError::Unavailable(err.to_string())
        } else {
            RemoteStoreError::Unavailable(format!("transport error: {err}"))
        }
    }

    fn classify_status(status: StatusCode, body: &RecordResponse) -> Option<RemoteStoreError> {
        let detail = || {
            body.error
                .clone()
                .unwrap_or_else(|| status.as_u16().to_string())
        };
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Some(RemoteStoreError::AuthFailed(detail()))
        } else if status == StatusCode::NOT_FOUND {
            Some(RemoteStoreError::NotFound(detail()))
        } else if !status.is_success() || !body.success {
            Some(RemoteStoreError::Unavailable(detail()))
        } else {
            None
        }
    }

    async fn parse(response: reqwest::Response) -> Result<RecordResponse, RemoteStoreError> {
        let status = response.status();
        let body: RecordResponse = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::Unavailable(format!("malformed response: {e}")))?;
        match Self::classify_status(status, &body) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}

#[async_trait]
impl RemoteObjectStore for CosClient {
    async fn create_record(
        &self,
        hash: &str,
        payload: &serde_json::Value,
        keypair: &Keypair,
    ) -> Result<String, RemoteStoreError> {
        let envelope = Self::signed_envelope(keypair, hash, Some(payload));
        let response = self
            .http
            .put(format!("{}/record", self.base_url))
            .json(&envelope)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        let body = Self::parse(response).await?;
        body.record_id
            .ok_or_else(|| RemoteStoreError::Unavailable("create returned no record id".into()))
    }

    async fn update_record(
        &self,
        record_id: &str,
        hash: &str,
        payload: &serde_json::Value,
        keypair: &Keypair,
    ) -> Result<(), RemoteStoreError> {
        let envelope = Self::signed_envelope(keypair, hash, Some(payload));
        let response = self
            .http
            .put(format!("{}/record/{record_id}", self.base_url))
            .json(&envelope)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        Self::parse(response).await.map(|_| ())
    }

    async fn fetch_record(
        &self,
        record_id: &str,
        hash: &str,
        keypair: &Keypair,
    ) -> Result<serde_json::Value, RemoteStoreError> {
        let envelope = Self::signed_envelope(keypair, hash, None);
        let response = self
            .http
            .get(format!("{}/record/{record_id}", self.base_url))
            .query(&[
                ("timestamp", envelope.timestamp.as_str()),
                ("hash", hash),
                ("pubKey", envelope.pub_key.as_str()),
                ("signature", envelope.signature.as_str()),
            ])
            .send()
            .await
            .map_err(Self::classify_transport)?;

        let body = Self::parse(response).await?;
        body.payload
            .ok_or_else(|| RemoteStoreError::Unavailable("fetch returned no payload".into()))
    }

    async fn delete_record(
        &self,
        record_id: &str,
        hash: &str,
        keypair: &Keypair,
    ) -> Result<(), RemoteStoreError> {
        let envelope = Self::signed_envelope(keypair, hash, None);
        let response = self
            .http
            .delete(format!("{}/record/{record_id}", self.base_url))
            .json(&envelope)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        Self::parse(response).await.map(|_| ())
    }
}
