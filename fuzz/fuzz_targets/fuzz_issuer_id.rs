//! Fuzz testing for client IP resolution and issuer ID derivation.
//!
//! Ensures that for arbitrary header bytes and strings:
//!
//! - `resolve_client_ip` never panics and only returns parseable IP literals
//! - `IssuerId::derive` never panics and always keeps the version/variant bits
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_issuer_id -- -max_total_time=60
//! ```

#![no_main]

use std::net::IpAddr;

use arbitrary::Arbitrary;
use axum::http::{HeaderMap, HeaderValue};
use issuer_id::IssuerId;
use issuer_id::middleware::{IpSource, resolve_client_ip};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    true_client_ip: Option<Vec<u8>>,
    forwarded_for: Option<Vec<u8>>,
    real_ip: Option<Vec<u8>>,
    text: String,
}

fuzz_target!(|input: Input| {
    let mut headers = HeaderMap::new();
    let values = [
        (IpSource::TrueClientIp, input.true_client_ip),
        (IpSource::ForwardedFor, input.forwarded_for),
        (IpSource::RealIp, input.real_ip),
    ];
    for (source, bytes) in values {
        // Bytes that are not a legal header value never reach a server.
        if let Some(value) = bytes.and_then(|b| HeaderValue::from_bytes(&b).ok()) {
            headers.insert(source.header_name(), value);
        }
    }

    if let Some(ip) = resolve_client_ip(&headers) {
        assert_eq!(ip.as_str().parse::<IpAddr>().ok(), Some(ip.addr()));
    }

    let id = IssuerId::derive(&input.text);
    let bytes = id.as_uuid().as_bytes();
    assert_eq!(bytes[6] >> 4, 0x5);
    assert_eq!(bytes[8] >> 6, 0b10);
});
