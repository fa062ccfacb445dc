//! Tamper-evidence tag over a whole ballot.
//!
//! `proof = SHA-256(s_0 | s_1 | ... | s_{n-1})` over the decimal share values.
//! This lets anyone holding the claimed shares confirm they were not altered
//! after submission. It says nothing about whether the shares encode 0 or 1.

use crate::*;
use std::fmt;
use std::str::FromStr;

/// Separator between share values in the hashed encoding
pub const PROOF_SEPARATOR: &str = "|";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(#[serde(with = "DigestHex")] [u8; 32]);

impl Proof {
    /// Prove a share set produced by the splitter
    pub fn prove(shares: &ShareSet) -> Self {
        Proof::over_values(&shares.to_values())
    }

    /// Prove raw share values exactly as they appear in a submission
    pub fn over_values(values: &[u64]) -> Self {
        let encoded = canonical_encoding(values);
        Proof(sha256(&[encoded.as_bytes()]))
    }

    /// Whether this proof was computed over `values`, in this order
    pub fn verify(&self, values: &[u64]) -> bool {
        Proof::over_values(values) == *self
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Proof {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Proof(parse_digest(s)?))
    }
}

/// Decimal values joined with [`PROOF_SEPARATOR`]
pub fn canonical_encoding(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(PROOF_SEPARATOR)
}
