use crate::*;

use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("sharevote: share set does not sum to its vote (expected {expected}, found {found})")]
    ArithmeticInvariant {
        expected: FieldElement,
        found: FieldElement,
    },

    #[error("sharevote: invalid field modulus {0} - must be at least 2")]
    InvalidModulus(u64),

    #[error("sharevote: invalid number of authorities {0} - must be at least 1")]
    InvalidAuthorityCount(usize),

    #[error("sharevote: invalid configuration value for {name}: {value}")]
    Config { name: &'static str, value: String },

    #[error("sharevote: JSON error: {0}")]
    JSON(#[from] serde_json::Error),

    #[error("sharevote: I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sharevote: {0}")]
    Validation(#[from] ValidationError),
}

/// Ballot and record validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sharevote validation: vote must be 0 or 1, got {0}")]
    InvalidVote(u64),

    #[error("sharevote validation: missing token")]
    MissingToken,

    #[error("sharevote validation: missing voter id")]
    MissingVoterId,

    #[error("sharevote validation: wrong number of shares: expected {expected}, found {found}")]
    WrongNumberOfShares { expected: usize, found: usize },

    #[error(
        "sharevote validation: wrong number of commitments: expected {expected}, found {found}"
    )]
    WrongNumberOfCommitments { expected: usize, found: usize },

    #[error("sharevote validation: share {index} is outside the field: {value}")]
    ShareOutOfRange { index: usize, value: u64 },

    #[error("sharevote validation: missing proof")]
    MissingProof,

    #[error("sharevote validation: proof does not match shares")]
    ProofMismatch,

    #[error("sharevote validation: commitment {0} does not open to its share")]
    CommitmentMismatch(usize),

    #[error("sharevote validation: token unknown to election authority")]
    TokenUnknown,

    #[error("sharevote validation: token already used")]
    TokenAlreadyUsed,

    #[error("sharevote validation: token does not match voter id")]
    TokenVoterMismatch,

    #[error("sharevote validation: a token was already issued to this voter")]
    TokenAlreadyIssued,

    #[error("sharevote validation: token signature is invalid")]
    TokenBadSignature,

    #[error("sharevote validation: token expired (issued {age} seconds ago)")]
    TokenExpired { age: u64 },

    #[error(
        "sharevote validation: published tally (total {published}) does not match reconstruction (total {reconstructed})"
    )]
    TallyMismatch {
        published: FieldElement,
        reconstructed: FieldElement,
    },

    #[error("sharevote validation: no published tally on the bulletin board")]
    NoPublishedTally,
}
