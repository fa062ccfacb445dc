//! Public reconstruction of the tally from bulletin board records.
//!
//! Each authority `i` sums the `i`-th share of every valid ballot; the total is
//! the sum of those local sums. Because every share set sums to its vote, the
//! total equals the number of yes votes mod P regardless of record order.
//! Anyone holding the records can run this, not only the tally operator.

use crate::*;

/// A `vote_submitted` record that was left out of the tally
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Index of the record on the board
    pub position: usize,
    pub voter_id: String,
    pub reason: String,
}

/// The outcome of reconstructing a tally
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub total: FieldElement,
    pub local_sums: Vec<FieldElement>,
    /// Number of ballots included in the sums
    pub counted: usize,
    pub rejected: Vec<RejectedRecord>,
    pub explanation: String,
}

impl VerificationResult {
    /// True when no ballot had to be discarded
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Compare against a published tally
    pub fn matches(&self, published: &TallyPublished) -> bool {
        self.total == published.total && self.local_sums == published.local_sums
    }

    /// The `tally_published` record for this result
    pub fn to_record(&self, timestamp: u64) -> BulletinRecord {
        BulletinRecord::TallyPublished(TallyPublished {
            local_sums: self.local_sums.clone(),
            total: self.total,
            timestamp,
        })
    }
}

/// Something that occupies one position on a board: either a parsed record or
/// an entry that failed to parse.
pub trait BoardItem {
    fn as_record(&self) -> Result<&BulletinRecord, &MalformedRecord>;
}

impl BoardItem for BulletinRecord {
    fn as_record(&self) -> Result<&BulletinRecord, &MalformedRecord> {
        Ok(self)
    }
}

impl BoardItem for BoardEntry {
    fn as_record(&self) -> Result<&BulletinRecord, &MalformedRecord> {
        match self {
            BoardEntry::Record(record) => Ok(record),
            BoardEntry::Malformed(bad) => Err(bad),
        }
    }
}

/// Recomputes per-authority sums and the total from a fixed set of records
#[derive(Copy, Clone, Debug)]
pub struct Reconstructor {
    params: ProtocolParams,
}

impl Reconstructor {
    pub fn new(params: ProtocolParams) -> Self {
        Reconstructor { params }
    }

    /// Reconstruct the tally from `records`.
    ///
    /// Records other than `vote_submitted` are ignored. A vote record with the
    /// wrong number of shares or commitments, a share outside the field, or a
    /// missing or mismatched proof is skipped and listed in `rejected`; it never
    /// contributes to any sum.
    pub fn reconstruct(&self, records: &[BulletinRecord]) -> VerificationResult {
        self.tally(records)
    }

    /// Like [`Reconstructor::reconstruct`], for a board parsed with
    /// [`parse_board`]. A `vote_submitted` entry that did not parse is rejected
    /// at its position; other unparseable entries are ignored.
    pub fn reconstruct_entries(&self, entries: &[BoardEntry]) -> VerificationResult {
        self.tally(entries)
    }

    /// Reconstruct and compare with the last `tally_published` record.
    ///
    /// Only the records before that tally are counted, so ballots appended
    /// after publication do not invalidate it.
    pub fn audit(
        &self,
        records: &[BulletinRecord],
    ) -> Result<VerificationResult, ValidationError> {
        self.audit_items(records)
    }

    /// Like [`Reconstructor::audit`], for a board parsed with [`parse_board`]
    pub fn audit_entries(
        &self,
        entries: &[BoardEntry],
    ) -> Result<VerificationResult, ValidationError> {
        self.audit_items(entries)
    }

    fn tally<E: BoardItem>(&self, items: &[E]) -> VerificationResult {
        let field = &self.params.field;
        let n = self.params.authorities;

        let mut local_sums = vec![FieldElement::ZERO; n];
        let mut counted = 0;
        let mut rejected = Vec::new();

        for (position, item) in items.iter().enumerate() {
            let vote = match item.as_record() {
                Ok(BulletinRecord::VoteSubmitted(vote)) => vote,
                Ok(_) => continue,
                Err(bad) if bad.is_vote() => {
                    let voter_id = bad.voter_id.clone().unwrap_or_default();
                    warn!(
                        "sharevote: skipping unparseable record {} from voter {}: {}",
                        position, voter_id, bad.reason
                    );
                    rejected.push(RejectedRecord {
                        position,
                        voter_id,
                        reason: format!("unparseable record: {}", bad.reason),
                    });
                    continue;
                }
                Err(bad) => {
                    warn!(
                        "sharevote: ignoring unparseable record {}: {}",
                        position, bad.reason
                    );
                    continue;
                }
            };

            match vote.validated_shares(&self.params) {
                Ok(shares) => {
                    for (sum, share) in local_sums.iter_mut().zip(shares.shares()) {
                        *sum = field.add(*sum, *share);
                    }
                    counted += 1;
                }
                Err(e) => {
                    warn!(
                        "sharevote: skipping record {} from voter {}: {}",
                        position, vote.voter_id, e
                    );
                    rejected.push(RejectedRecord {
                        position,
                        voter_id: vote.voter_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let total = field.sum(local_sums.iter().copied());
        let explanation = self.explain(&local_sums, total, counted, &rejected);

        VerificationResult {
            total,
            local_sums,
            counted,
            rejected,
            explanation,
        }
    }

    fn audit_items<E: BoardItem>(
        &self,
        items: &[E],
    ) -> Result<VerificationResult, ValidationError> {
        let (position, published) = items
            .iter()
            .enumerate()
            .rev()
            .find_map(|(position, item)| match item.as_record() {
                Ok(BulletinRecord::TallyPublished(tally)) => Some((position, tally)),
                _ => None,
            })
            .ok_or(ValidationError::NoPublishedTally)?;

        let result = self.tally(&items[..position]);

        if !result.matches(published) {
            warn!(
                "sharevote: published total {} does not match reconstructed total {}",
                published.total, result.total
            );
            return Err(ValidationError::TallyMismatch {
                published: published.total,
                reconstructed: result.total,
            });
        }

        Ok(result)
    }

    fn explain(
        &self,
        local_sums: &[FieldElement],
        total: FieldElement,
        counted: usize,
        rejected: &[RejectedRecord],
    ) -> String {
        let modulus = self.params.field.modulus();
        let mut text = format!(
            "Counted {} vote_submitted record(s). For each authority i in 0..{}, \
             local_sum[i] = sum of shares[i] over counted records mod {}. ",
            counted,
            local_sums.len(),
            modulus
        );

        let sums: Vec<String> = local_sums.iter().map(|s| s.to_string()).collect();
        text.push_str(&format!(
            "total = ({}) mod {} = {}. ",
            sums.join(" + "),
            modulus,
            total
        ));

        if rejected.is_empty() {
            text.push_str("No records were rejected.");
        } else {
            let positions: Vec<String> = rejected.iter().map(|r| r.position.to_string()).collect();
            text.push_str(&format!(
                "{} record(s) were rejected and excluded from every sum (board positions {}).",
                rejected.len(),
                positions.join(", ")
            ));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn cast(params: &ProtocolParams, votes: &[u64], seed: u64) -> Vec<BulletinRecord> {
        let mut source = RngSource::new(ChaCha20Rng::seed_from_u64(seed));
        votes
            .iter()
            .enumerate()
            .map(|(i, vote)| {
                let voter = format!("voter-{}", i);
                let token = format!("token-{}", i);
                prepare_ballot(params, &token, &voter, *vote, &mut source)
                    .unwrap()
                    .submission
                    .into_record(i as u64)
            })
            .collect()
    }

    #[test]
    fn test_four_voters() {
        let params = ProtocolParams::default();
        let records = cast(&params, &[1, 0, 1, 1], 1);
        let result = Reconstructor::new(params).reconstruct(&records);

        assert_eq!(result.total.value(), 3);
        assert_eq!(result.local_sums.len(), 3);
        assert_eq!(params.field.sum(result.local_sums.iter().copied()).value(), 3);
        assert_eq!(result.counted, 4);
        assert!(result.is_clean());
        assert!(result.explanation.contains("Counted 4"));
    }

    #[test]
    fn test_empty_board() {
        let params = ProtocolParams::default();
        let result = Reconstructor::new(params).reconstruct(&[]);
        assert_eq!(result.total, FieldElement::ZERO);
        assert_eq!(result.local_sums, vec![FieldElement::ZERO; 3]);
        assert_eq!(result.counted, 0);
    }

    #[test]
    fn test_linearity() {
        let params = ProtocolParams::default();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        for round in 0..20 {
            let votes: Vec<u64> = (0..25).map(|_| rand::Rng::gen_range(&mut rng, 0, 2)).collect();
            let expected: u64 = votes.iter().sum();
            let records = cast(&params, &votes, round);
            let result = Reconstructor::new(params).reconstruct(&records);
            assert_eq!(result.total.value(), expected);
        }
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let params = ProtocolParams::default();
        let mut records = cast(&params, &[1, 1, 0, 1, 0, 0, 1], 2);
        let reconstructor = Reconstructor::new(params);
        let first = reconstructor.reconstruct(&records);
        assert_eq!(first, reconstructor.reconstruct(&records));

        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..10 {
            records.shuffle(&mut rng);
            let shuffled = reconstructor.reconstruct(&records);
            assert_eq!(shuffled.total, first.total);
            assert_eq!(shuffled.local_sums, first.local_sums);
        }
    }

    #[test]
    fn test_ignores_other_record_types() {
        let params = ProtocolParams::default();
        let mut records = cast(&params, &[1, 1], 4);
        records.insert(
            0,
            BulletinRecord::TokenIssued(TokenIssued {
                voter_id: "voter-0".to_owned(),
                token: "token-0".to_owned(),
                timestamp: 0,
            }),
        );
        let result = Reconstructor::new(params).reconstruct(&records);
        assert_eq!(result.total.value(), 2);
        assert!(result.is_clean());
    }

    #[test]
    fn test_malformed_records_are_skipped_and_reported() {
        let params = ProtocolParams::default();
        let mut records = cast(&params, &[1, 0, 1], 5);

        // Wrong share count
        if let BulletinRecord::VoteSubmitted(vote) = &mut records[0] {
            vote.shares.pop();
        }
        // Share outside the field, with a proof that matches it
        if let BulletinRecord::VoteSubmitted(vote) = &mut records[1] {
            vote.shares[2] = MERSENNE_61 + 1;
            vote.proof = Some(Proof::over_values(&vote.shares));
        }
        let good = cast(&params, &[1], 6).pop().unwrap();
        records.push(good);

        let result = Reconstructor::new(params).reconstruct(&records);
        assert_eq!(result.counted, 2);
        assert_eq!(result.total.value(), 2);
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(result.rejected[0].position, 0);
        assert_eq!(result.rejected[1].position, 1);
        assert!(result.rejected[1].reason.contains("outside the field"));
        assert!(result.explanation.contains("2 record(s) were rejected"));
    }

    #[test]
    fn test_tampered_share_is_rejected() {
        let params = ProtocolParams::default();
        let mut records = cast(&params, &[1, 1], 7);
        if let BulletinRecord::VoteSubmitted(vote) = &mut records[1] {
            vote.shares[0] = params
                .field
                .add(params.field.reduce(vote.shares[0]), FieldElement::ONE)
                .value();
        }
        let result = Reconstructor::new(params).reconstruct(&records);
        assert_eq!(result.total.value(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(
            result.rejected[0].reason,
            ValidationError::ProofMismatch.to_string()
        );
    }

    #[test]
    fn test_audit() {
        let params = ProtocolParams::default();
        let reconstructor = Reconstructor::new(params);
        let mut records = cast(&params, &[1, 0, 1], 9);

        assert_eq!(
            reconstructor.audit(&records),
            Err(ValidationError::NoPublishedTally)
        );

        let result = reconstructor.reconstruct(&records);
        records.push(result.to_record(100));
        assert_eq!(reconstructor.audit(&records).unwrap().total.value(), 2);

        records.push(BulletinRecord::TallyPublished(TallyPublished {
            local_sums: result.local_sums.clone(),
            total: params.field.reduce(5),
            timestamp: 101,
        }));
        assert!(matches!(
            reconstructor.audit(&records),
            Err(ValidationError::TallyMismatch { .. })
        ));
    }

    #[test]
    fn test_audit_ignores_ballots_after_the_tally() {
        let params = ProtocolParams::default();
        let reconstructor = Reconstructor::new(params);
        let mut records = cast(&params, &[1, 1], 11);
        let published = reconstructor.reconstruct(&records);
        records.push(published.to_record(50));
        records.extend(cast(&params, &[1, 0, 1], 12));

        let audited = reconstructor.audit(&records).unwrap();
        assert_eq!(audited.total.value(), 2);
        assert_eq!(audited.counted, 2);
        assert_eq!(reconstructor.reconstruct(&records).total.value(), 4);
    }

    #[test]
    fn test_unparseable_entries() {
        let params = ProtocolParams::default();
        let reconstructor = Reconstructor::new(params);
        let mut values: Vec<serde_json::Value> = cast(&params, &[1, 1, 0], 13)
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        values[1]["shares"][0] = serde_json::json!(-1);
        values.push(serde_json::json!({"type": "tally_published", "total": "x"}));
        values.push(serde_json::json!({"type": "something_else"}));

        let bytes = serde_json::to_vec(&values).unwrap();
        let entries = parse_board(&bytes).unwrap();
        let result = reconstructor.reconstruct_entries(&entries);

        assert_eq!(result.counted, 2);
        assert_eq!(result.total.value(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].position, 1);
        assert_eq!(result.rejected[0].voter_id, "voter-1");
        assert!(result.rejected[0].reason.starts_with("unparseable record"));

        // A broken tally record does not count as published
        assert_eq!(
            reconstructor.audit_entries(&entries),
            Err(ValidationError::NoPublishedTally)
        );
    }

    #[test]
    fn test_toy_field_wraps() {
        // With P = 3, four yes votes reconstruct to 4 mod 3
        let params = ProtocolParams::new(3, 3).unwrap();
        let records = cast(&params, &[1, 1, 1, 1], 10);
        let result = Reconstructor::new(params).reconstruct(&records);
        assert_eq!(result.total.value(), 1);
    }
}
