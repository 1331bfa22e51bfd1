//! Header composition for outbound requests
//!
//! Pure functions only; no I/O. Header names are matched case-insensitively
//! through a lower-to-proper-case table, and caller-supplied overrides are
//! merged last so they win on conflict.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-AgentOps-Api-Key";
/// Header carrying the parent project key
pub const PARENT_KEY_HEADER: &str = "X-AgentOps-Parent-Key";

const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
const DEFAULT_ACCEPT: &str = "*/*";

/// Map a header name to its canonical proper-case spelling.
///
/// Unknown names pass through unchanged.
fn canonical(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "content-type" => "Content-Type",
        "accept" => "Accept",
        "x-agentops-api-key" => API_KEY_HEADER,
        "x-agentops-parent-key" => PARENT_KEY_HEADER,
        "authorization" => "Authorization",
        _ => name,
    }
}

/// Compose the full header set for one request.
///
/// Merge order: JSON defaults, API key, parent key, bearer token, then
/// caller overrides last. Overrides are applied in sorted key order, so if
/// the map carries the same header under several casings the entry with the
/// lexicographically greatest key wins.
pub fn compose(
    api_key: Option<&str>,
    parent_key: Option<&str>,
    jwt: Option<&str>,
    extra: Option<&HashMap<String, String>>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    insert(&mut headers, "Content-Type", DEFAULT_CONTENT_TYPE)?;
    insert(&mut headers, "Accept", DEFAULT_ACCEPT)?;

    if let Some(key) = api_key {
        insert(&mut headers, API_KEY_HEADER, key)?;
    }

    if let Some(key) = parent_key {
        insert(&mut headers, PARENT_KEY_HEADER, key)?;
    }

    if let Some(token) = jwt {
        insert(&mut headers, "Authorization", &format!("Bearer {}", token))?;
    }

    if let Some(extra) = extra {
        // HashMap iteration order is arbitrary; sort so a conflict between
        // two casings of the same header resolves the same way every time
        let mut extra: Vec<_> = extra.iter().collect();
        extra.sort();
        for (name, value) in extra {
            insert(&mut headers, canonical(name), value)?;
        }
    }

    Ok(headers)
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::Config(format!("invalid value for header {}: {}", name, e)))?;
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::Config(format!("invalid header name {:?}: {}", name, e)))?;
    // HeaderMap::insert replaces any existing value, so later sources win
    headers.insert(name, value);
    Ok(())
}
