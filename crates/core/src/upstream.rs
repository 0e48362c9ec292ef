//! Client for the upstream disclosure registry.
//!
//! Two calls matter: `v1/auth` trades the hashed password for a JWT, and
//! `v1/messages` lists disclosures for one participant, 20 per page.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{PageMode, UpstreamConfig, DEMO_LOGIN};
use crate::credential::HashedCredential;
use crate::model::{MessageRecord, WatchKey};

const AUTH_PATH: &str = "v1/auth";
const MESSAGES_PATH: &str = "v1/messages";

/// Page size requested from the listing endpoint.
pub const PAGE_LIMIT: u64 = 20;

/// Disclosure categories requested on every listing call.
pub const MESSAGE_TYPES: [&str; 6] = [
    "CreditorIntentionGoToCourt",
    "DebtorIntentionGoToCourt",
    "AppearanceOfBankruptcySigns",
    "BankruptcyArticle8",
    "BankruptcyArticle9",
    "DebtorBankruptcyCourtNotification",
];

/// Upstream call failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Authentication failed: transport error, non-2xx, or no `jwt` in the body.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Transport-level failure on a listing call.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Listing call answered with a non-2xx status.
    #[error("upstream returned {status} for {url}")]
    Status {
        /// Response status.
        status: reqwest::StatusCode,
        /// Requested URL.
        url: String,
    },
    /// Listing body did not match the expected shape.
    #[error("decode upstream response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Short-lived JWT returned by the auth endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    login: &'a str,
    password_hash: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    jwt: String,
}

#[derive(Deserialize)]
struct MessagePage {
    total: u64,
    #[serde(default)]
    messages: Vec<UpstreamMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamMessage {
    guid: String,
    message_type: UpstreamMessageType,
    date_publish: String,
}

#[derive(Deserialize)]
struct UpstreamMessageType {
    description: String,
}

impl From<UpstreamMessage> for MessageRecord {
    fn from(m: UpstreamMessage) -> Self {
        Self {
            guid: m.guid,
            description: m.message_type.description,
            date: m.date_publish,
        }
    }
}

/// HTTP client bound to one resolved upstream environment.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Wraps an existing `reqwest` client.
    pub fn new(http: reqwest::Client, config: UpstreamConfig) -> Self {
        Self { http, config }
    }

    /// Resolved configuration this client talks to.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Exchanges the hashed credential for a bearer token.
    pub async fn authenticate(
        &self,
        credential: &HashedCredential,
    ) -> Result<BearerToken, UpstreamError> {
        let url = self.config.endpoint(AUTH_PATH);
        let resp = self
            .http
            .post(&url)
            .json(&AuthRequest {
                login: DEMO_LOGIN,
                password_hash: credential.as_str(),
            })
            .send()
            .await
            .map_err(|e| UpstreamError::Auth(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Auth(format!("status {status}")));
        }

        let body: AuthResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Auth(format!("malformed response: {e}")))?;
        Ok(BearerToken(body.jwt))
    }

    /// Lists disclosure messages for `key`, starting at offset 0.
    ///
    /// In [`PageMode::Exhaustive`] paging continues until `total` records are
    /// collected or a short/empty page arrives; [`PageMode::FirstPage`] stops
    /// after the first non-empty page.
    pub async fn fetch_messages(
        &self,
        token: &BearerToken,
        key: &WatchKey,
    ) -> Result<Vec<MessageRecord>, UpstreamError> {
        let url = self.config.endpoint(MESSAGES_PATH);
        let mut offset = 0;
        let mut all = Vec::new();

        loop {
            let page = self.fetch_page(&url, token, key, offset).await?;
            if page.total == 0 {
                break;
            }

            let received = page.messages.len() as u64;
            all.extend(page.messages.into_iter().map(MessageRecord::from));
            tracing::debug!(offset, received, total = page.total, "message page received");

            let done = self.config.page_mode == PageMode::FirstPage
                || received < PAGE_LIMIT
                || all.len() as u64 >= page.total;
            if done {
                break;
            }
            offset += PAGE_LIMIT;
        }

        Ok(all)
    }

    async fn fetch_page(
        &self,
        url: &str,
        token: &BearerToken,
        key: &WatchKey,
        offset: u64,
    ) -> Result<MessagePage, UpstreamError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .query(&page_query(key, offset))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)
    }
}

fn page_query(key: &WatchKey, offset: u64) -> Vec<(&'static str, String)> {
    let mut q: Vec<(&'static str, String)> = MESSAGE_TYPES
        .iter()
        .map(|t| ("messageTypes", t.to_string()))
        .collect();
    q.push(("participant.type", key.participant_type.clone()));
    q.push(("participant.code", key.participant_code.to_string()));
    q.push(("limit", PAGE_LIMIT.to_string()));
    q.push(("offset", offset.to_string()));
    q
}
