//! Client IP resolution behind reverse proxies.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Proxy headers consulted in priority order.
const PROXY_HEADERS: [&str; 5] = [
    "client-ip",
    "x-forwarded-for",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
];

/// Resolve the client IP from proxy headers, falling back to the socket
/// address, then to `"unknown"`.
///
/// Headers may carry a comma-separated chain; the first entry that parses as
/// an IP address wins. Entries that do not parse are skipped rather than
/// trusted.
pub fn resolve_client_ip(headers: &HeaderMap, socket_addr: Option<SocketAddr>) -> String {
    for header in PROXY_HEADERS {
        let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        for candidate in value.split(',') {
            let candidate = candidate.trim();
            if candidate.parse::<IpAddr>().is_ok() {
                return candidate.to_string();
            }
        }
    }

    match socket_addr {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn forwarded_chain_takes_the_first_valid_entry() {
        let headers = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(resolve_client_ip(&headers, None), "203.0.113.7");
    }

    #[test]
    fn header_priority_is_respected() {
        let headers = headers(&[
            ("x-forwarded-for", "10.0.0.2"),
            ("client-ip", "203.0.113.7"),
        ]);
        assert_eq!(resolve_client_ip(&headers, None), "203.0.113.7");
    }

    #[test]
    fn unparsable_entries_are_skipped() {
        let headers = headers(&[("x-forwarded-for", "not-an-ip, 198.51.100.4")]);
        assert_eq!(resolve_client_ip(&headers, None), "198.51.100.4");
    }

    #[test]
    fn socket_address_is_the_fallback() {
        let addr: SocketAddr = "192.0.2.1:443".parse().unwrap();
        assert_eq!(
            resolve_client_ip(&HeaderMap::new(), Some(addr)),
            "192.0.2.1"
        );
    }

    #[test]
    fn unknown_when_nothing_is_available() {
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn ipv6_addresses_are_accepted() {
        let headers = headers(&[("x-forwarded-for", "2001:db8::1")]);
        assert_eq!(resolve_client_ip(&headers, None), "2001:db8::1");
    }
}
