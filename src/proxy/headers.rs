//! Header handling for forwarded requests and relayed responses.

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderValue};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that apply to a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn remove_hop_headers(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in listed {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Prepare inbound request headers for the backend.
///
/// Strips hop-by-hop headers (keeping `TE: trailers`), points `Host` at the
/// target and appends the client address to `X-Forwarded-For`.
pub fn prepare_request_headers(
    headers: &mut HeaderMap,
    host: &HeaderValue,
    client_ip: Option<IpAddr>,
) -> Result<(), axum::http::Error> {
    let wants_trailers = headers
        .get_all(header::TE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("trailers"));

    remove_hop_headers(headers);

    if wants_trailers {
        headers.insert(header::TE, HeaderValue::from_static("trailers"));
    }

    headers.insert(header::HOST, host.clone());

    if let Some(ip) = client_ip {
        let ip = ip.to_string();
        // Earlier hops may arrive as separate header lines; fold them into one.
        let mut chain: Vec<&[u8]> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .map(HeaderValue::as_bytes)
            .collect();
        chain.push(ip.as_bytes());

        let forwarded = HeaderValue::from_bytes(&chain.join(&b", "[..]))?;
        headers.insert(X_FORWARDED_FOR, forwarded);
    }

    Ok(())
}
