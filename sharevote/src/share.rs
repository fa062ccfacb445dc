//! Additive secret sharing of votes.

use crate::*;

/// A yes/no vote expressed as a field element
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Vote(bool);

impl Vote {
    pub const NO: Vote = Vote(false);
    pub const YES: Vote = Vote(true);

    pub fn new(value: u64) -> Result<Self, ValidationError> {
        match value {
            0 => Ok(Vote::NO),
            1 => Ok(Vote::YES),
            other => Err(ValidationError::InvalidVote(other)),
        }
    }

    pub fn value(self) -> u64 {
        self.0 as u64
    }

    pub fn to_element(self, field: &Field) -> FieldElement {
        field.reduce(self.value())
    }
}

impl std::convert::TryFrom<u64> for Vote {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Vote::new(value)
    }
}

impl From<Vote> for u64 {
    fn from(vote: Vote) -> u64 {
        vote.value()
    }
}

impl From<bool> for Vote {
    fn from(yes: bool) -> Self {
        Vote(yes)
    }
}

/// The N additive shares of one secret, in authority order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareSet(Vec<FieldElement>);

impl ShareSet {
    pub fn shares(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The share held by authority `index`
    pub fn get(&self, index: usize) -> Option<FieldElement> {
        self.0.get(index).copied()
    }

    /// Sum of all shares mod P
    pub fn reconstruct(&self, field: &Field) -> FieldElement {
        field.sum(self.0.iter().copied())
    }

    /// Raw integer values, as they travel in a submission
    pub fn to_values(&self) -> Vec<u64> {
        self.0.iter().map(|s| s.value()).collect()
    }

    pub fn into_inner(self) -> Vec<FieldElement> {
        self.0
    }
}

impl From<Vec<FieldElement>> for ShareSet {
    fn from(shares: Vec<FieldElement>) -> Self {
        ShareSet(shares)
    }
}

/// Split `secret` into `n` shares that sum to it mod P.
///
/// The first `n - 1` shares are drawn uniformly; the last is `secret - sum`.
/// `secret` is reduced first, so any u64 may be passed. `n` must be at least 1.
pub fn split_secret(
    field: &Field,
    secret: u64,
    n: usize,
    source: &mut impl ElementSource,
) -> ShareSet {
    let secret = field.reduce(secret);

    let mut shares = Vec::with_capacity(n);
    for _ in 1..n {
        shares.push(source.draw(field));
    }
    let partial = field.sum(shares.iter().copied());
    shares.push(field.sub(secret, partial));

    ShareSet(shares)
}

/// Split a vote into one share per authority.
///
/// Re-checks the reconstruction before returning; a mismatch is an internal
/// error and the share set must not be published.
pub fn split_vote(
    params: &ProtocolParams,
    vote: Vote,
    source: &mut impl ElementSource,
) -> Result<ShareSet, Error> {
    let field = &params.field;
    let shares = split_secret(field, vote.value(), params.authorities, source);

    let expected = vote.to_element(field);
    let found = shares.reconstruct(field);
    if shares.len() != params.authorities || found != expected {
        return Err(Error::ArithmeticInvariant { expected, found });
    }

    Ok(shares)
}
