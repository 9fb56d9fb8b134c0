//! # Gitignore Template Lookup
//!
//! Collaborator supplying `.gitignore` content for materialization. The
//! query is a comma-separated list of template names (e.g. `rust,vim`)
//! resolved through the gitignore.io API into a single concatenated
//! template. Purely a lookup, no caching.

use crate::error::{Error, Result};

/// Base URL of the gitignore.io API.
pub const DEFAULT_BASE_URL: &str = "https://www.toptal.com/developers/gitignore/api";

/// Sentinel configuration value disabling gitignore synthesis.
pub const NO_GITIGNORE: &str = "none";

/// A resolved gitignore template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitignoreTemplate {
    /// The query the template was built from, e.g. `rust,vim`.
    pub query: String,
    /// The template body.
    pub content: String,
}

/// Client for the gitignore template API.
pub struct GitignoreClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl GitignoreClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Use a different API endpoint. Primarily for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a comma-separated template query into gitignore content.
    pub fn get(&self, query: &str) -> Result<GitignoreTemplate> {
        let url = format!("{}/{}", self.base_url, query);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, "skelly")
            .send()
            .map_err(|err| Error::Http {
                url: url.clone(),
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Http {
                url,
                message: format!("unexpected status {}", response.status()),
            });
        }

        let content = response.text().map_err(|err| Error::Http {
            url,
            message: err.to_string(),
        })?;

        Ok(GitignoreTemplate {
            query: query.to_string(),
            content,
        })
    }
}

impl Default for GitignoreClient {
    fn default() -> Self {
        Self::new()
    }
}
