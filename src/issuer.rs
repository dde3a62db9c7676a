//! Deterministic, hash-derived issuer identifiers.
//!
//! An [`IssuerId`] is a 128-bit value shaped like a version 5 UUID. It is
//! derived from the client IP string with SHA-1:
//!
//! ```text
//! "8.8.8.8" ──SHA-1──▶ 20 bytes ──take 16──▶ patch version/variant ──▶ 53a636be-fcd6-5304-9a0e-ae5fbc440165
//! ```
//!
//! Unlike [`Uuid::new_v5`], no namespace is hashed in front of the input, so
//! the output is NOT interchangeable with RFC 4122 name-based UUIDs. Existing
//! identifiers depend on this exact derivation; do not swap it for `new_v5`.
//!
//! The mapping is one-way. It is meant for non-adversarial correlation of
//! requests, not as an authenticated identity.

use std::fmt;

use serde::Serialize;
use sha1::{Digest, Sha1};
use uuid::Uuid;

/// Textual form of [`IssuerId::SENTINEL`].
pub const SENTINEL_ISSUER_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Pseudo-anonymous identifier attached to a request.
///
/// Either derived from a client IP via [`IssuerId::derive`], or the all-zero
/// [`IssuerId::SENTINEL`] meaning "no attribution available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IssuerId(Uuid);

impl IssuerId {
    /// The all-zero identifier used when no client IP could be resolved.
    pub const SENTINEL: Self = Self(Uuid::nil());

    /// Derive the identifier for `input`.
    ///
    /// Pure function: the same input always yields the same identifier.
    pub fn derive(input: &str) -> Self {
        let digest = Sha1::digest(input.as_bytes());

        let mut bytes = [0u8; 16];
        for (dst, src) in bytes.iter_mut().zip(digest.iter()) {
            *dst = *src;
        }

        // Version nibble: 0101.
        bytes[6] = (bytes[6] & 0x0f) | 0x50;
        // Variant bits: 10xx.
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        Self(Uuid::from_bytes(bytes))
    }

    /// Whether this is the "no attribution" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IssuerId {
    fn default() -> Self {
        Self::SENTINEL
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Uuid's Display is the lowercase hyphenated form.
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<IssuerId> for String {
    fn from(id: IssuerId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_value() {
        assert_eq!(
            IssuerId::derive("8.8.8.8").to_string(),
            "53a636be-fcd6-5304-9a0e-ae5fbc440165"
        );
    }

    #[test]
    fn test_neighbouring_ip_differs() {
        let a = IssuerId::derive("8.8.8.8");
        let b = IssuerId::derive("8.8.8.9");

        assert_ne!(a, b);
        assert_eq!(b.to_string(), "7368a24a-c5fc-58dd-82a6-64b2c469d2b2");
    }

    #[test]
    fn test_derive_is_deterministic() {
        for input in ["203.0.113.5", "2001:db8::1", "::1", "x"] {
            assert_eq!(IssuerId::derive(input), IssuerId::derive(input));
        }
    }

    #[test]
    fn test_version_and_variant_bits() {
        for input in ["8.8.8.8", "10.0.0.1", "fe80::1", "255.255.255.255"] {
            let id = IssuerId::derive(input);
            let bytes = id.as_uuid().as_bytes();

            assert_eq!(bytes[6] >> 4, 0x5, "version nibble for {input}");
            assert_eq!(bytes[8] >> 6, 0b10, "variant bits for {input}");
            assert_eq!(id.as_uuid().get_version_num(), 5);
            assert_eq!(id.as_uuid().get_variant(), uuid::Variant::RFC4122);
        }
    }

    #[test]
    fn test_not_namespace_v5() {
        // A namespaced v5 over the same input must not match.
        let namespaced = Uuid::new_v5(&Uuid::nil(), b"8.8.8.8");
        assert_ne!(*IssuerId::derive("8.8.8.8").as_uuid(), namespaced);
    }

    #[test]
    fn test_canonical_text_form() {
        let text = IssuerId::derive("192.168.1.1").to_string();

        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        let groups: Vec<usize> = text.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
    }

    #[test]
    fn test_sentinel() {
        assert!(IssuerId::SENTINEL.is_sentinel());
        assert!(IssuerId::default().is_sentinel());
        assert!(!IssuerId::derive("8.8.8.8").is_sentinel());
        assert_eq!(IssuerId::SENTINEL.to_string(), SENTINEL_ISSUER_ID);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&IssuerId::derive("8.8.8.8")).unwrap();
        assert_eq!(json, "\"53a636be-fcd6-5304-9a0e-ae5fbc440165\"");
    }
}
