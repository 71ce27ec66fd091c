// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST listing.
//!
//! ```text
//! GET {api_url}/users/{user}/repos?per_page={n}   (user percent-encoded)
//!   User-Agent: ghdesk/<version>
//!   Accept: application/vnd.github+json
//!   Authorization: token <t>   (when configured)
//!
//! 2xx + [ {name, ssh_url}, ... ] --> Vec<RepositoryEntry>
//! bad api_url                    --> SourceError::InvalidApiUrl
//! non-2xx                        --> NetworkError::HttpError { status, url, body }
//! not JSON                       --> SourceError::Json
//! JSON, not an array             --> SourceError::UnexpectedPayload
//! ```

use async_trait::async_trait;
use reqwest::{Client, Url};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

use super::{RepoSource, RepositoryEntry};
use crate::config::types::GithubConfig;
use crate::error::{NetworkError, SourceError};

/// `User-Agent` sent with every request.
#[must_use]
pub fn user_agent() -> String {
    format!("ghdesk/{}", env!("CARGO_PKG_VERSION"))
}

/// Global HTTP client, reused across searches.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(user_agent())
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Lists repositories through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: Client,
    api_url: String,
    per_page: u32,
    token: Option<String>,
}

impl RestSource {
    #[must_use]
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            client: global_client().clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            token: config.token().map(str::to_string),
        }
    }

    /// Builds the listing URL; the username becomes one encoded path segment.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidApiUrl`] when `api_url` does not parse
    /// or cannot take a path.
    pub fn repos_url(&self, username: &str) -> Result<Url, SourceError> {
        let invalid = |message: String| SourceError::InvalidApiUrl {
            url: self.api_url.clone(),
            message,
        };
        let mut url = Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl RepoSource for RestSource {
    async fn list(&self, username: &str) -> Result<Vec<RepositoryEntry>, SourceError> {
        let url = self.repos_url(username)?;
        debug!(%url, authenticated = self.token.is_some(), "listing repositories");

        let mut request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent())
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await.map_err(NetworkError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: url.into(),
                body: body.trim().to_string(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(NetworkError::from)?;
        let repos = parse_repo_list(&body, url.as_str())?;
        debug!(count = repos.len(), "repositories listed");
        Ok(repos)
    }
}

/// Extracts `name` and `ssh_url` from a REST response body, in order.
///
/// # Errors
///
/// Returns [`SourceError::Json`] for invalid JSON and
/// [`SourceError::UnexpectedPayload`] when the JSON is not an array.
pub fn parse_repo_list(body: &[u8], origin: &str) -> Result<Vec<RepositoryEntry>, SourceError> {
    let value: Value = serde_json::from_slice(body).map_err(|source| SourceError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(SourceError::UnexpectedPayload {
            origin: origin.to_string(),
            found: json_kind(&value).to_string(),
        });
    };

    Ok(items
        .iter()
        .map(|item| {
            let field = |key: &str| {
                item.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            RepositoryEntry::new(field("name"), Some(field("ssh_url")))
        })
        .collect())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
