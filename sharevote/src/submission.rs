//! Client-side ballot preparation and the submission payload.

use crate::record::check_ballot;
use crate::*;

/// The payload a voter's client sends to the submission endpoint.
///
/// Commitment nonces are deliberately absent; see [`PreparedBallot::openings`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoteSubmission {
    pub token: Token,
    pub voter_id: String,
    pub shares: Vec<u64>,
    pub commits: Vec<Commitment>,
    pub proof: Proof,
}

impl VoteSubmission {
    /// Check the payload before it is accepted onto the bulletin board
    pub fn validate(&self, params: &ProtocolParams) -> Result<ShareSet, ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::MissingToken);
        }
        if self.voter_id.is_empty() {
            return Err(ValidationError::MissingVoterId);
        }
        check_ballot(params, &self.shares, &self.commits, Some(&self.proof))
    }

    /// The `vote_submitted` record for this payload
    pub fn into_record(self, timestamp: u64) -> BulletinRecord {
        BulletinRecord::VoteSubmitted(VoteSubmitted {
            voter_id: self.voter_id,
            token: self.token,
            shares: self.shares,
            commits: self.commits,
            proof: Some(self.proof),
            timestamp,
        })
    }
}

/// A ballot ready to submit, plus the secrets the voter keeps
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PreparedBallot {
    pub submission: VoteSubmission,

    /// One opening per share. These never leave the voter's client unless the
    /// voter chooses to open a commitment to an authority.
    pub openings: Vec<Opening>,
}

/// Split, commit and prove one vote.
///
/// Inputs are validated before any randomness is consumed. The share set is
/// checked against the vote once more after commitment; on mismatch nothing is
/// returned.
pub fn prepare_ballot(
    params: &ProtocolParams,
    token: &str,
    voter_id: &str,
    vote: u64,
    source: &mut impl ElementSource,
) -> Result<PreparedBallot, Error> {
    if token.is_empty() {
        return Err(ValidationError::MissingToken.into());
    }
    if voter_id.is_empty() {
        return Err(ValidationError::MissingVoterId.into());
    }
    let vote = Vote::new(vote)?;

    let shares = split_vote(params, vote, source)?;
    let (commits, openings) = commit_shares(&shares, source);
    let proof = Proof::prove(&shares);

    let expected = vote.to_element(&params.field);
    let found = shares.reconstruct(&params.field);
    if found != expected {
        return Err(Error::ArithmeticInvariant { expected, found });
    }

    debug!(
        "sharevote: prepared ballot for voter {} with {} shares",
        voter_id,
        shares.len()
    );

    Ok(PreparedBallot {
        submission: VoteSubmission {
            token: token.to_owned(),
            voter_id: voter_id.to_owned(),
            shares: shares.to_values(),
            commits,
            proof,
        },
        openings,
    })
}
