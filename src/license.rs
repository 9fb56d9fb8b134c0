//! # License Lookup
//!
//! Collaborator supplying open source license texts for the `LICENSE` file
//! synthesized during materialization. This is purely a lookup against the
//! GitHub licenses API; the core does no caching of its own.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Base URL of the GitHub API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Sentinel configuration value disabling license synthesis.
pub const NO_LICENSE: &str = "none";

/// An open source license as returned by the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct License {
    /// Lowercase identifier, e.g. `mit`.
    pub key: String,
    /// Human-readable name, e.g. `MIT License`.
    pub name: String,
    /// Full license text.
    pub body: String,
}

/// Client for the license API.
pub struct LicenseClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl LicenseClient {
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

    /// Look up a license by its key, e.g. `mit` or `apache-2.0`.
    pub fn get(&self, name: &str) -> Result<License> {
        let url = format!("{}/licenses/{}", self.base_url, name);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, "skelly")
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
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

        response.json().map_err(|err| Error::Http {
            url,
            message: err.to_string(),
        })
    }
}

impl Default for LicenseClient {
    fn default() -> Self {
        Self::new()
    }
}
