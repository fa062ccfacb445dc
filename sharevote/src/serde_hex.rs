// Digests and nonces travel as lower-case hex strings, matching what
// browsers produce from `crypto.subtle.digest`.
use crate::NONCE_LEN;
use std::borrow::Cow;
use std::convert::TryInto;

pub use hex_buffer_serde::Hex;

// a single-purpose type for use in `#[serde(with)]`
pub enum DigestHex {}

impl Hex<[u8; 32]> for DigestHex {
    type Error = String;

    fn create_bytes(digest: &[u8; 32]) -> Cow<[u8]> {
        Cow::from(&digest[..])
    }

    fn from_bytes(bytes: &[u8]) -> Result<[u8; 32], String> {
        bytes
            .try_into()
            .map_err(|_| format!("expected 32 bytes, found {}", bytes.len()))
    }
}

// a single-purpose type for use in `#[serde(with)]`
pub enum NonceHex {}

impl Hex<[u8; NONCE_LEN]> for NonceHex {
    type Error = String;

    fn create_bytes(nonce: &[u8; NONCE_LEN]) -> Cow<[u8]> {
        Cow::from(&nonce[..])
    }

    fn from_bytes(bytes: &[u8]) -> Result<[u8; NONCE_LEN], String> {
        bytes
            .try_into()
            .map_err(|_| format!("expected {} bytes, found {}", NONCE_LEN, bytes.len()))
    }
}

/// Decode a hex digest string, as used by `FromStr` impls
pub fn parse_digest(s: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(s).map_err(|e| format!("{}", e))?;
    DigestHex::from_bytes(&bytes)
}
