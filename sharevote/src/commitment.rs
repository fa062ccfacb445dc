//! Hash commitments to individual shares.
//!
//! `commit(share, nonce) = SHA-256(decimal(share) || hex(nonce))`. The digest is
//! binding through SHA-256 collision resistance and hides the share for as long
//! as the nonce stays with the voter. Only the digest goes on the bulletin
//! board; the voter keeps the [`Opening`] and may later hand it to the authority
//! holding the share.

use crate::*;
use std::fmt;
use std::str::FromStr;

/// Length of a commitment nonce in bytes
pub const NONCE_LEN: usize = 16;

/// A one-time random nonce
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(#[serde(with = "NonceHex")] [u8; NONCE_LEN]);

impl Nonce {
    /// Draw a fresh nonce. Never reuse a nonce across shares or ballots.
    pub fn generate(source: &mut impl ElementSource) -> Self {
        let mut bytes = [0; NONCE_LEN];
        source.fill_bytes(&mut bytes);
        Nonce(bytes)
    }

    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Nonce(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A SHA-256 commitment to one share
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(#[serde(with = "DigestHex")] [u8; 32]);

impl Commitment {
    pub fn commit(share: FieldElement, nonce: &Nonce) -> Self {
        let share = share.to_string();
        let nonce = nonce.to_string();
        Commitment(sha256(&[share.as_bytes(), nonce.as_bytes()]))
    }

    /// Check that `share` and `nonce` open this commitment
    pub fn verify(&self, share: FieldElement, nonce: &Nonce) -> bool {
        Commitment::commit(share, nonce) == *self
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Commitment(parse_digest(s)?))
    }
}

/// What the voter keeps in order to open a commitment later
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub share: FieldElement,
    pub nonce: Nonce,
}

impl Opening {
    pub fn commitment(&self) -> Commitment {
        Commitment::commit(self.share, &self.nonce)
    }
}

/// Commit to every share with its own fresh nonce
pub fn commit_shares(
    shares: &ShareSet,
    source: &mut impl ElementSource,
) -> (Vec<Commitment>, Vec<Opening>) {
    let mut commits = Vec::with_capacity(shares.len());
    let mut openings = Vec::with_capacity(shares.len());

    for share in shares.shares() {
        let opening = Opening {
            share: *share,
            nonce: Nonce::generate(source),
        };
        commits.push(opening.commitment());
        openings.push(opening);
    }

    (commits, openings)
}

/// Check each commitment against the opening at the same position
pub fn verify_openings(
    commits: &[Commitment],
    openings: &[Opening],
) -> Result<(), ValidationError> {
    if commits.len() != openings.len() {
        return Err(ValidationError::WrongNumberOfCommitments {
            expected: openings.len(),
            found: commits.len(),
        });
    }
    for (i, (commit, opening)) in commits.iter().zip(openings).enumerate() {
        if !commit.verify(opening.share, &opening.nonce) {
            return Err(ValidationError::CommitmentMismatch(i));
        }
    }
    Ok(())
}
