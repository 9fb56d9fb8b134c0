//! # Repository References
//!
//! A [`RepoRef`] describes where a skeleton repository lives: either a local
//! directory or a remote git repository pinned to a revision. Refs are
//! created by parsing a user-supplied locator string and are immutable
//! afterwards.
//!
//! Remote refs carry a deterministic local cache path computed from
//! `(host, repository path, revision)`: identical inputs always resolve to
//! the identical path under the cache root, which makes the on-disk cache
//! content-addressable by source identity. The layout is
//! `<cacheRoot>/<host>/<urlPath>@<escapedRevision>`.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Revision assumed for remote repositories when the locator does not carry
/// a `revision` query parameter.
pub const DEFAULT_REVISION: &str = "master";

/// Reference to a local or remote skeleton repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Optional local name for the repository, e.g. the key it is
    /// configured under.
    pub name: String,
    /// URL of the remote repository. Empty for local repositories.
    pub url: String,
    /// Path to the repository on the local filesystem. For remote
    /// repositories this is the deterministic cache location.
    pub path: PathBuf,
    /// Revision of the remote repository to check out. `None` for local
    /// repositories.
    pub revision: Option<String>,
}

impl RepoRef {
    /// Parse a locator string into a repository reference.
    ///
    /// A locator without a host component is treated as a local filesystem
    /// path (a leading `~` is expanded to the home directory). Anything
    /// else is treated as a remote git URL with an optional `revision`
    /// query parameter, defaulting to [`DEFAULT_REVISION`]. The query is
    /// stripped from the canonical URL.
    ///
    /// `cache_root` anchors the cache path computed for remote refs; the
    /// filesystem is not touched.
    pub fn parse(locator: &str, cache_root: &Path) -> Result<RepoRef> {
        match Url::parse(locator) {
            Ok(url) if url.has_host() => Self::parse_remote(url, cache_root),
            Ok(url) => Ok(Self::local(expand_home(url.path()))),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::local(expand_home(locator))),
            Err(err) => Err(Error::InvalidLocator {
                locator: locator.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn parse_remote(mut url: Url, cache_root: &Path) -> Result<RepoRef> {
        let query = url.query().unwrap_or_default();
        let pairs = parse_query(query)?;

        let revision = pairs
            .into_iter()
            .find(|(key, value)| key == "revision" && !value.is_empty())
            .map(|(_, value)| value)
            .unwrap_or_else(|| DEFAULT_REVISION.to_string());

        // The query only transports the revision and must not end up in the
        // canonical repository URL.
        url.set_query(None);

        let host = match url.port() {
            Some(port) => format!("{}_{}", url.host_str().unwrap_or_default(), port),
            None => url.host_str().unwrap_or_default().to_string(),
        };

        let path = cache_root.join(host).join(format!(
            "{}@{}",
            url.path().trim_start_matches('/'),
            escape_revision(&revision)
        ));

        Ok(RepoRef {
            name: String::new(),
            url: url.to_string(),
            path,
            revision: Some(revision),
        })
    }

    fn local(path: PathBuf) -> RepoRef {
        RepoRef {
            name: String::new(),
            url: String::new(),
            path,
            revision: None,
        }
    }

    /// True if the ref describes a remote repository.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty()
    }

    /// Name to present to the user: the configured name if there is one,
    /// the locator otherwise.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.to_string()
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            return write!(f, "{}", self.path.display());
        }

        match &self.revision {
            Some(revision) => write!(f, "{}?revision={}", self.url, revision),
            None => write!(f, "{}", self.url),
        }
    }
}

fn expand_home(path: impl AsRef<str>) -> PathBuf {
    let path = path.as_ref();

    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }

    PathBuf::from(path)
}

/// Parse a raw query string into key/value pairs.
///
/// The `url` crate accepts any query losslessly, so malformed
/// percent-encoding is validated by hand here to surface it as
/// [`Error::InvalidQuery`].
fn parse_query(query: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();

    for part in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        pairs.push((decode_component(query, key)?, decode_component(query, value)?));
    }

    Ok(pairs)
}

fn decode_component(query: &str, component: &str) -> Result<String> {
    let bytes = component.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok());
                match hex {
                    Some(byte) => {
                        decoded.push(byte);
                        i += 3;
                    }
                    None => {
                        return Err(Error::InvalidQuery {
                            query: query.to_string(),
                            message: format!("invalid percent-encoding in {:?}", component),
                        })
                    }
                }
            }
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8(decoded).map_err(|_| Error::InvalidQuery {
        query: query.to_string(),
        message: format!("component {:?} is not valid UTF-8", component),
    })
}

/// Escape a revision for use in a cache directory name.
///
/// Everything outside `[A-Za-z0-9._-]` is percent-encoded so that revisions
/// like `feature/foo` stay unambiguous and filesystem-safe.
fn escape_revision(revision: &str) -> String {
    let mut escaped = String::with_capacity(revision.len());

    for byte in revision.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' => {
                escaped.push(byte as char)
            }
            _ => escaped.push_str(&format!("%{:02X}", byte)),
        }
    }

    escaped
}
