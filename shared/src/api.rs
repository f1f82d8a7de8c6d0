//! URL construction for the read-only events API.
//!
//! Endpoints:
//! - `GET {base}/user_ids`
//! - `GET {base}/users/{user_id}/addresses`
//! - `GET {base}/addresses/{address_id}/events`
//! - `GET {base}{event.url}` for event details

use url::Url;

use crate::capabilities::FetchError;
use crate::model::{AddressId, EventRecord, UserId};

pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    url: Url,
}

impl ApiBase {
    pub fn parse(base: &str) -> Result<Self, FetchError> {
        let url = validate(base)?;
        Ok(Self { url })
    }

    pub fn user_ids(&self) -> Result<String, FetchError> {
        self.with_segments(&["user_ids"])
    }

    pub fn user_addresses(&self, user_id: &UserId) -> Result<String, FetchError> {
        self.with_segments(&["users", user_id.as_str(), "addresses"])
    }

    pub fn address_events(&self, address_id: &AddressId) -> Result<String, FetchError> {
        self.with_segments(&["addresses", address_id.as_str(), "events"])
    }

    /// Details live at a server-supplied path which is appended to the base
    /// verbatim, so a base with a path prefix keeps it.
    pub fn event_details(&self, event: &EventRecord) -> Result<String, FetchError> {
        let base = self.url.as_str().trim_end_matches('/');
        let path = event.url.as_str();
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        validate(&joined).map(String::from)
    }

    fn with_segments(&self, segments: &[&str]) -> Result<String, FetchError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl {
                url: truncate_url(self.url.as_str()),
                reason: "base URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }
}

fn validate(raw: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: truncate_url(raw),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(invalid(format!(
            "URL exceeds maximum length of {MAX_URL_LENGTH} bytes"
        )));
    }

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(invalid(format!(
            "invalid scheme '{scheme}', only 'http' and 'https' are allowed"
        )));
    }

    if parsed.host_str().is_none() {
        return Err(invalid("URL must have a host".to_string()));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("credentials in URL are not allowed".to_string()));
    }

    Ok(parsed)
}

fn truncate_url(url: &str) -> String {
    if url.len() <= 100 {
        url.to_string()
    } else {
        let cut = (0..=100).rev().find(|&i| url.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &url[..cut])
    }
}
