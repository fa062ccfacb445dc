use crate::*;
use std::path::Path;

/// A one-time voting token issued by the election authority
pub type Token = String;

/// One immutable entry on the bulletin board
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum BulletinRecord {
    TokenIssued(TokenIssued),
    VoteSubmitted(VoteSubmitted),
    TallyPublished(TallyPublished),
}

impl BulletinRecord {
    /// The record type, as it appears in the `type` field
    pub fn record_type(&self) -> &'static str {
        match self {
            BulletinRecord::TokenIssued(_) => "token_issued",
            BulletinRecord::VoteSubmitted(_) => "vote_submitted",
            BulletinRecord::TallyPublished(_) => "tally_published",
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            BulletinRecord::TokenIssued(r) => r.timestamp,
            BulletinRecord::VoteSubmitted(r) => r.timestamp,
            BulletinRecord::TallyPublished(r) => r.timestamp,
        }
    }

    pub fn voter_id(&self) -> Option<&str> {
        match self {
            BulletinRecord::TokenIssued(r) => Some(&r.voter_id),
            BulletinRecord::VoteSubmitted(r) => Some(&r.voter_id),
            BulletinRecord::TallyPublished(_) => None,
        }
    }

    /// Parse a JSON array of records, failing on the first malformed one
    pub fn list_from_json(bytes: &[u8]) -> Result<Vec<BulletinRecord>, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A board entry that did not parse as a [`BulletinRecord`]
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedRecord {
    pub record_type: Option<String>,
    pub voter_id: Option<String>,
    pub reason: String,
    pub raw: serde_json::Value,
}

impl MalformedRecord {
    /// Whether the entry claims to be a ballot
    pub fn is_vote(&self) -> bool {
        self.record_type.as_deref() == Some("vote_submitted")
    }
}

/// One position on a published board, parsed or not
#[derive(Clone, Debug, PartialEq)]
pub enum BoardEntry {
    Record(BulletinRecord),
    Malformed(MalformedRecord),
}

impl BoardEntry {
    /// Parse one JSON value; a bad entry is kept rather than failing the board
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value::<BulletinRecord>(value.clone()) {
            Ok(record) => BoardEntry::Record(record),
            Err(e) => {
                let field = |name: &str| {
                    value
                        .get(name)
                        .and_then(|v| v.as_str())
                        .map(str::to_owned)
                };
                BoardEntry::Malformed(MalformedRecord {
                    record_type: field("type"),
                    voter_id: field("voter_id"),
                    reason: e.to_string(),
                    raw: value,
                })
            }
        }
    }

    pub fn record(&self) -> Option<&BulletinRecord> {
        match self {
            BoardEntry::Record(record) => Some(record),
            BoardEntry::Malformed(_) => None,
        }
    }
}

/// Parse a published board entry by entry.
///
/// Only a document that is not a JSON array is an error; individual entries
/// that fail to parse come back as [`BoardEntry::Malformed`] at their position.
pub fn parse_board(bytes: &[u8]) -> Result<Vec<BoardEntry>, Error> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    Ok(values.into_iter().map(BoardEntry::from_value).collect())
}

/// Read and parse a board file
pub fn load_board<P: AsRef<Path>>(path: P) -> Result<Vec<BoardEntry>, Error> {
    let bytes = std::fs::read(path)?;
    parse_board(&bytes)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenIssued {
    pub voter_id: String,
    pub token: Token,
    #[serde(alias = "ts", deserialize_with = "deserialize_timestamp")]
    pub timestamp: u64,
}

/// A submitted ballot.
///
/// Shares are kept as raw integers so that a malformed record still parses and
/// can be reported by the reconstructor instead of failing the whole board.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoteSubmitted {
    pub voter_id: String,
    pub token: Token,
    #[serde(default)]
    pub shares: Vec<u64>,
    #[serde(default)]
    pub commits: Vec<Commitment>,
    #[serde(default)]
    pub proof: Option<Proof>,
    #[serde(alias = "ts", deserialize_with = "deserialize_timestamp")]
    pub timestamp: u64,
}

impl VoteSubmitted {
    /// Check the record's shape and return its shares as field elements
    pub fn validated_shares(&self, params: &ProtocolParams) -> Result<ShareSet, ValidationError> {
        check_ballot(params, &self.shares, &self.commits, self.proof.as_ref())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TallyPublished {
    pub local_sums: Vec<FieldElement>,
    pub total: FieldElement,
    #[serde(alias = "ts", deserialize_with = "deserialize_timestamp")]
    pub timestamp: u64,
}

/// Shared shape check for submissions and stored records: exactly N shares and
/// N commitments, every share already in the field, and a proof over the shares.
pub(crate) fn check_ballot(
    params: &ProtocolParams,
    shares: &[u64],
    commits: &[Commitment],
    proof: Option<&Proof>,
) -> Result<ShareSet, ValidationError> {
    let n = params.authorities;
    if shares.len() != n {
        return Err(ValidationError::WrongNumberOfShares {
            expected: n,
            found: shares.len(),
        });
    }
    if commits.len() != n {
        return Err(ValidationError::WrongNumberOfCommitments {
            expected: n,
            found: commits.len(),
        });
    }

    let mut elements = Vec::with_capacity(n);
    for (index, value) in shares.iter().enumerate() {
        let element = params
            .field
            .element(*value)
            .ok_or(ValidationError::ShareOutOfRange {
                index,
                value: *value,
            })?;
        elements.push(element);
    }

    let proof = proof.ok_or(ValidationError::MissingProof)?;
    if !proof.verify(shares) {
        return Err(ValidationError::ProofMismatch);
    }

    Ok(ShareSet::from(elements))
}
