//! Client address extraction and normalization
//!
//! Addresses are compared as strings, so both the client address and every
//! allow-list entry pass through [`normalize_address`] before comparison.

use axum::http::{HeaderMap, HeaderName};
use std::net::{IpAddr, SocketAddr};

/// IPv4 loopback literal that every loopback form normalizes to
pub const LOOPBACK: &str = "127.0.0.1";

const MAPPED_PREFIX: &str = "::ffff:";

/// Canonicalize an address string for equality comparison.
///
/// Trims whitespace, strips IPv4-mapped IPv6 prefixes (`::ffff:10.0.0.1`),
/// and maps IPv6 loopback to [`LOOPBACK`]. Anything that parses as an IP
/// address is rendered in canonical form; other strings (device identifiers)
/// are kept as-is after trimming.
///
/// A leading `::ffff:` is stripped whether or not the remainder happens to
/// spell a valid IPv6 tail: `::ffff:abc` and `::ffff:laptop` both lose it.
///
/// Idempotent: `normalize_address(&normalize_address(x)) == normalize_address(x)`.
pub fn normalize_address(raw: &str) -> String {
    let mut addr = raw.trim().to_string();
    loop {
        if let Ok(ip) = addr.parse::<IpAddr>() {
            addr = canonical_ip(ip);
        }
        // Mapped addresses canonicalize to IPv4 above; a prefix still present
        // sits on a device identifier or a doubled prefix.
        match strip_mapped_prefix(&addr) {
            Some(rest) => addr = rest.trim().to_string(),
            None => return addr,
        }
    }
}

fn canonical_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V6(v6) if v6.is_loopback() => LOOPBACK.to_string(),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
        IpAddr::V4(v4) => v4.to_string(),
    }
}

fn strip_mapped_prefix(addr: &str) -> Option<&str> {
    let head = addr.get(..MAPPED_PREFIX.len())?;
    if head.eq_ignore_ascii_case(MAPPED_PREFIX) {
        Some(&addr[MAPPED_PREFIX.len()..])
    } else {
        None
    }
}

/// Pick the raw (un-normalized) client address for a request.
///
/// Prefers the first entry of the forwarding header, falls back to the
/// transport peer, and finally to an empty string. A header that is present
/// but blank counts as absent. Bytes that are not valid UTF-8 are replaced
/// rather than dropped, so an opaque header never falls through to the peer.
pub fn extract_client_address(
    headers: &HeaderMap,
    forwarded_header: &HeaderName,
    peer: Option<SocketAddr>,
) -> String {
    let forwarded = headers.get(forwarded_header).and_then(|value| {
        let decoded = String::from_utf8_lossy(value.as_bytes());
        decoded
            .split(',')
            .next()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
    });

    match (forwarded, peer) {
        (Some(value), _) => value,
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn xff() -> HeaderName {
        HeaderName::from_static("x-forwarded-for")
    }

    #[rstest]
    #[case("10.0.0.5", "10.0.0.5")]
    #[case("  10.0.0.5\t", "10.0.0.5")]
    #[case("::ffff:10.0.0.9", "10.0.0.9")]
    #[case("::FFFF:10.0.0.9", "10.0.0.9")]
    #[case("::ffff:a00:9", "10.0.0.9")]
    #[case("::1", "127.0.0.1")]
    #[case("0:0:0:0:0:0:0:1", "127.0.0.1")]
    #[case("::ffff:127.0.0.1", "127.0.0.1")]
    #[case("2001:DB8::1", "2001:db8::1")]
    #[case("fe80::1", "fe80::1")]
    #[case("office-laptop-7", "office-laptop-7")]
    #[case("::ffff:laptop", "laptop")]
    #[case("::ffff:abc", "abc")]
    #[case("0:0:0:0:0:0:ffff:abc", "abc")]
    #[case("", "")]
    #[case("   ", "")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(raw), expected);
    }

    #[rstest]
    #[case("::ffff:::ffff:10.0.0.1")]
    #[case(" ::ffff: 10.0.0.1 ")]
    #[case("::1")]
    #[case("2001:0db8:0000::0001")]
    #[case("device-A")]
    #[case("::ffff:")]
    #[case("::ffff:abc")]
    #[case("0:0:0:0:0:0:ffff:abc")]
    fn test_normalize_idempotent(#[case] raw: &str) {
        let once = normalize_address(raw);
        assert_eq!(normalize_address(&once), once);
    }

    #[test]
    fn test_extract_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert(xff(), HeaderValue::from_static("10.0.0.5"));
        let peer = Some(SocketAddr::from(([192, 168, 1, 1], 4000)));

        assert_eq!(extract_client_address(&headers, &xff(), peer), "10.0.0.5");
    }

    #[test]
    fn test_extract_uses_first_proxy_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            xff(),
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1, 10.0.0.2"),
        );

        assert_eq!(extract_client_address(&headers, &xff(), None), "203.0.113.7");
    }

    #[test]
    fn test_extract_blank_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(xff(), HeaderValue::from_static("   "));
        let peer = Some(SocketAddr::from(([192, 168, 1, 1], 4000)));

        assert_eq!(extract_client_address(&headers, &xff(), peer), "192.168.1.1");
    }

    #[test]
    fn test_extract_non_utf8_header_does_not_fall_back() {
        let mut headers = HeaderMap::new();
        headers.insert(xff(), HeaderValue::from_bytes(b"\xff, 10.0.0.1").unwrap());
        let peer = Some(SocketAddr::from(([127, 0, 0, 1], 4000)));

        assert_eq!(extract_client_address(&headers, &xff(), peer), "\u{FFFD}");
    }

    #[test]
    fn test_extract_without_sources_is_empty() {
        assert_eq!(extract_client_address(&HeaderMap::new(), &xff(), None), "");
    }

    #[test]
    fn test_extract_respects_configured_header() {
        let mut headers = HeaderMap::new();
        headers.insert(xff(), HeaderValue::from_static("10.0.0.5"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.6"));
        let real_ip = HeaderName::from_static("x-real-ip");

        assert_eq!(extract_client_address(&headers, &real_ip, None), "10.0.0.6");
    }
}
