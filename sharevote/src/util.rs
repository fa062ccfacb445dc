use digest::Digest;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// SHA-256 over the concatenation of `parts`
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut digest = [0; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Returns the unix timestamp in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Deserialize a unix timestamp given either as integer seconds or as
/// fractional seconds (`time.time()` style); fractions are truncated.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative unix timestamp in seconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            if v < 0 {
                return Err(E::invalid_value(Unexpected::Signed(v), &self));
            }
            Ok(v as u64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
            if !v.is_finite() || v < 0.0 || v >= u64::MAX as f64 {
                return Err(E::invalid_value(Unexpected::Float(v), &self));
            }
            Ok(v.trunc() as u64)
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "deserialize_timestamp")]
        ts: u64,
    }

    fn stamp(json: &str) -> Result<u64, serde_json::Error> {
        serde_json::from_str::<Stamped>(json).map(|s| s.ts)
    }

    #[test]
    fn test_timestamp_integer_and_float() {
        assert_eq!(stamp(r#"{"ts":1700000000}"#).unwrap(), 1_700_000_000);
        assert_eq!(stamp(r#"{"ts":1700000000.25}"#).unwrap(), 1_700_000_000);
        assert_eq!(stamp(r#"{"ts":0.9}"#).unwrap(), 0);
    }

    #[test]
    fn test_timestamp_rejects_negative_and_strings() {
        assert!(stamp(r#"{"ts":-1}"#).is_err());
        assert!(stamp(r#"{"ts":-0.5}"#).is_err());
        assert!(stamp(r#"{"ts":"yesterday"}"#).is_err());
    }
}
