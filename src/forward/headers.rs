//! `X-Forwarded-For` handling and hop-by-hop stripping.
//!
//! [`append_forwarded_for`] is the only header change the forwarder
//! makes: it adds the peer address as a new entry and leaves every
//! existing entry, including earlier `X-Forwarded-For` hops, in place.
//! [`forwarded_chain`] reads the chain back for consumers. The hop-by-hop
//! helpers are used by the upstream relay on the wire, never by the
//! forwarder itself.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::RegionNearbyError;

/// The de facto forwarded-for header. `http` stores names lowercase.
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Copy of `original` with `remote_host` appended under `X-Forwarded-For`.
///
/// Existing values are neither merged nor rewritten: a comma-joined line
/// stays one entry and repeated entries stay repeated, with the new hop
/// last. `remote_host` is used verbatim.
pub fn append_forwarded_for(
    original: &HeaderMap,
    remote_host: &str,
) -> Result<HeaderMap, RegionNearbyError> {
    let value = HeaderValue::from_str(remote_host)
        .map_err(|_| RegionNearbyError::InvalidRemoteHost(remote_host.to_string()))?;

    let mut headers = original.clone();
    headers.append(X_FORWARDED_FOR, value);
    Ok(headers)
}

/// Every `X-Forwarded-For` hop in order, across repeated entries and
/// comma-joined lines. Entries that are not valid UTF-8 are skipped.
#[must_use]
pub fn forwarded_chain(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(String::from)
        .collect()
}

/// Strip hop-by-hop headers before a request goes out on the wire.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Strip hop-by-hop headers and `content-length` from an upstream response.
///
/// The body has already been fully collected, so the origin's framing
/// headers no longer apply. Axum sets `content-length` from the bytes.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    strip_hop_by_hop(headers);
    headers.remove(hyper::header::CONTENT_LENGTH);
}
