//! Destination parsing for upload targets

use crate::error::{Error, Result};
use url::Url;

/// An upload destination: a container plus an optional object name prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Container receiving the objects
    pub container: String,
    /// Prefix prepended to every object name, empty for none
    pub prefix: String,
}

impl Destination {
    /// Parse a destination string.
    ///
    /// Accepts `az://container/prefix` and the bare `container/prefix`
    /// form. The prefix part is optional in both.
    pub fn parse(s: &str) -> Result<Self> {
        if s.contains("://") {
            return Self::parse_az(s);
        }

        // Bare form: container[/prefix]
        let (container, prefix) = match s.split_once('/') {
            Some((c, p)) => (c.to_string(), p.trim_end_matches('/').to_string()),
            None => (s.to_string(), String::new()),
        };

        if container.is_empty() {
            return Err(Error::InvalidUri {
                uri: s.to_string(),
                reason: "missing container name".to_string(),
            });
        }

        Ok(Self { container, prefix })
    }

    fn parse_az(s: &str) -> Result<Self> {
        let scheme = s.split("://").next().unwrap_or_default();
        if !matches!(scheme.to_lowercase().as_str(), "az" | "azure") {
            return Err(Error::InvalidUri {
                uri: s.to_string(),
                reason: format!("unsupported scheme '{}', expected az://", scheme),
            });
        }

        let url = Url::parse(s).map_err(|e| Error::InvalidUri {
            uri: s.to_string(),
            reason: e.to_string(),
        })?;

        // url parses an empty authority as Some(""), so filter that out too.
        let container = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidUri {
                uri: s.to_string(),
                reason: "missing container name".to_string(),
            })?
            .to_string();

        let prefix = url.path().trim_matches('/').to_string();

        Ok(Self { container, prefix })
    }

    /// Build the full object name for a relative file name
    pub fn join(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), name)
        }
    }

    /// Convert back to a URI string
    pub fn to_uri(&self) -> String {
        if self.prefix.is_empty() {
            format!("az://{}", self.container)
        } else {
            format!("az://{}/{}", self.container, self.prefix)
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}
