//! Resolved upstream configuration.
//!
//! Built once at startup from the login/password pair and handed to the
//! [`crate::Watchdesk`]; nothing here reads process state on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credential::{derive, HashedCredential};

/// Login that selects the upstream demo environment.
pub const DEMO_LOGIN: &str = "demo";

/// Base URL of the upstream demo environment.
pub const DEMO_BASE_URL: &str =
    "https://services.fedresurs.ru/SignificantEvents/MessagesServiceDemo2";

/// Base URL of the upstream production environment.
pub const PRODUCTION_BASE_URL: &str =
    "https://services.fedresurs.ru/SignificantEvents/MessagesService2";

/// How the synchronizer walks the upstream message listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageMode {
    /// Follow offsets until `total` messages have been collected.
    #[default]
    Exhaustive,
    /// Stop after the first non-empty page.
    FirstPage,
}

/// What a fetch that found nothing resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyPolicy {
    /// Fail with [`crate::WorkflowError::NoMessagesFound`].
    #[default]
    Error,
    /// Succeed with an empty list.
    EmptyOk,
}

/// Configuration problems detected while resolving [`UpstreamConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No upstream password was provided.
    #[error("upstream password is not configured")]
    MissingPassword,
    /// No upstream login was provided.
    #[error("upstream login is not configured")]
    MissingLogin,
}

/// Everything the upstream client needs, resolved once.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL without trailing slash; endpoints are joined onto it.
    pub base_url: String,
    /// Hashed password sent on authentication.
    pub credential: HashedCredential,
    /// Pagination behavior.
    pub page_mode: PageMode,
    /// Empty-result behavior.
    pub empty_policy: EmptyPolicy,
}

impl UpstreamConfig {
    /// Resolves the environment from `login` and hashes `password`.
    ///
    /// `base_url_override` replaces the environment selection when set.
    pub fn resolve(
        login: Option<&str>,
        password: Option<&str>,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let login = login.filter(|l| !l.is_empty()).ok_or(ConfigError::MissingLogin)?;
        let password = password.ok_or(ConfigError::MissingPassword)?;

        let base_url = match base_url_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => base_url_for_login(login).to_string(),
        };

        Ok(Self {
            base_url,
            credential: derive(password),
            page_mode: PageMode::default(),
            empty_policy: EmptyPolicy::default(),
        })
    }

    /// Sets the pagination mode.
    pub fn with_page_mode(mut self, page_mode: PageMode) -> Self {
        self.page_mode = page_mode;
        self
    }

    /// Sets the empty-result policy.
    pub fn with_empty_policy(mut self, empty_policy: EmptyPolicy) -> Self {
        self.empty_policy = empty_policy;
        self
    }

    /// Full URL for an endpoint path such as `v1/auth`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path.trim_matches('/'))
    }
}

/// Demo login talks to the demo environment, everything else to production.
pub fn base_url_for_login(login: &str) -> &'static str {
    if login == DEMO_LOGIN {
        DEMO_BASE_URL
    } else {
        PRODUCTION_BASE_URL
    }
}
