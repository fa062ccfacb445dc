use crate::*;

/// An in-memory election: a token authority, a bulletin board and the
/// protocol parameters they share.
pub struct Election<A: TokenAuthority> {
    params: ProtocolParams,
    authority: A,
    board: SharedBoard,
}

impl<A: TokenAuthority> Election<A> {
    pub fn new(params: ProtocolParams, authority: A) -> Self {
        Election {
            params,
            authority,
            board: SharedBoard::default(),
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// A handle to the board; clones share the same records
    pub fn board(&self) -> SharedBoard {
        self.board.clone()
    }

    /// Issue a token and record the issuance publicly
    pub fn issue_token(&mut self, voter_id: &str) -> Result<Token, Error> {
        let token = self.authority.issue_token(voter_id)?;
        self.board.append(BulletinRecord::TokenIssued(TokenIssued {
            voter_id: voter_id.to_owned(),
            token: token.clone(),
            timestamp: unix_timestamp(),
        }));
        info!("sharevote: issued token to voter {}", voter_id);
        Ok(token)
    }

    /// Accept a ballot onto the board.
    ///
    /// The payload is validated before the token is redeemed, so a malformed
    /// submission can be corrected and resent with the same token.
    pub fn submit(&mut self, submission: VoteSubmission) -> Result<(), Error> {
        submission.validate(&self.params)?;
        self.authority
            .redeem(&submission.token, &submission.voter_id)?;

        info!("sharevote: accepted ballot from voter {}", submission.voter_id);
        self.board.append(submission.into_record(unix_timestamp()));
        Ok(())
    }

    /// Reconstruct the tally from the current board and publish it.
    ///
    /// The tally covers exactly the records that precede it on the board.
    pub fn publish_tally(&mut self) -> VerificationResult {
        let reconstructor = Reconstructor::new(self.params);
        let result = self.board.append_from(|records| {
            let result = reconstructor.reconstruct(records);
            (result.to_record(unix_timestamp()), result)
        });
        info!(
            "sharevote: published tally {} over {} ballots",
            result.total, result.counted
        );
        result
    }

    /// Check the published tally against the board, as any observer would
    pub fn verify(&self) -> Result<VerificationResult, ValidationError> {
        Reconstructor::new(self.params).audit(&self.board.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn test_rejected_submission_keeps_token() {
        let params = ProtocolParams::default();
        let mut election = Election::new(params, MemTokenAuthority::new());
        let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(1));

        let token = election.issue_token("alice").unwrap();
        let ballot = prepare_ballot(&params, &token, "alice", 1, &mut source).unwrap();

        let mut broken = ballot.submission.clone();
        broken.shares.pop();
        assert!(election.submit(broken).is_err());

        election.submit(ballot.submission.clone()).unwrap();
        assert!(matches!(
            election.submit(ballot.submission),
            Err(Error::Validation(ValidationError::TokenAlreadyUsed))
        ));
        assert_eq!(election.board().len(), 2);
    }

    #[test]
    fn test_late_ballot_keeps_published_tally_valid() {
        let params = ProtocolParams::default();
        let mut election = Election::new(params, MemTokenAuthority::new());
        let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(3));

        let token = election.issue_token("alice").unwrap();
        let ballot = prepare_ballot(&params, &token, "alice", 1, &mut source).unwrap();
        election.submit(ballot.submission).unwrap();
        assert_eq!(election.publish_tally().total.value(), 1);

        let token = election.issue_token("bob").unwrap();
        let ballot = prepare_ballot(&params, &token, "bob", 1, &mut source).unwrap();
        election.submit(ballot.submission).unwrap();

        let verified = election.verify().unwrap();
        assert_eq!(verified.total.value(), 1);
        assert_eq!(verified.counted, 1);

        assert_eq!(election.publish_tally().total.value(), 2);
        assert_eq!(election.verify().unwrap().total.value(), 2);
    }

    #[test]
    fn test_submit_with_wrong_voter() {
        let params = ProtocolParams::default();
        let mut election = Election::new(params, MemTokenAuthority::new());
        let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(2));

        let token = election.issue_token("alice").unwrap();
        let ballot = prepare_ballot(&params, &token, "bob", 0, &mut source).unwrap();
        assert!(matches!(
            election.submit(ballot.submission),
            Err(Error::Validation(ValidationError::TokenVoterMismatch))
        ));
    }
}
