use crate::*;
use digest::generic_array::GenericArray;
use hmac::{Hmac, Mac, NewMac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::collections::{HashMap, HashSet};

type HmacSha256 = Hmac<Sha256>;

/// Length of a demo token's random part, in bytes
pub const TOKEN_LEN: usize = 8;

/// Length of the token signing key: one SHA-256 block
pub const TOKEN_KEY_LEN: usize = 64;

/// How long an issued token stays redeemable, in seconds
pub const DEFAULT_MAX_AGE: u64 = 24 * 60 * 60;

/// The election authority's token interface.
///
/// A real authority authenticates voters before issuing and enforces one-time
/// use. The protocol core only relies on `redeem` refusing a token twice.
pub trait TokenAuthority {
    /// Issue a fresh one-time token to `voter_id`
    fn issue_token(&mut self, voter_id: &str) -> Result<Token, ValidationError>;

    /// Consume `token` on behalf of `voter_id`
    fn redeem(&mut self, token: &str, voter_id: &str) -> Result<(), ValidationError>;
}

#[derive(Clone, Debug)]
struct IssuedToken {
    voter_id: String,
    used: bool,
}

/// An in-memory token registry for simulations and tests.
///
/// Tokens have the form `voter_id:issued_at:nonce.signature`, where the
/// signature is HMAC-SHA256 over everything before the last `.`. Each voter
/// gets at most one token, and a token is only redeemable for `max_age`
/// seconds after issuance. Tokens are not blind-signed, so the authority can
/// link a ballot to its voter.
#[derive(Clone)]
pub struct MemTokenAuthority {
    key: [u8; TOKEN_KEY_LEN],
    max_age: u64,
    issued: HashMap<Token, IssuedToken>,
    voters: HashSet<String>,
}

impl MemTokenAuthority {
    /// An authority with a random signing key and a 24 hour token lifetime
    pub fn new() -> Self {
        let mut key = [0; TOKEN_KEY_LEN];
        OsRng {}.fill_bytes(&mut key);
        MemTokenAuthority::with_key(key, DEFAULT_MAX_AGE)
    }

    pub fn with_key(key: [u8; TOKEN_KEY_LEN], max_age: u64) -> Self {
        MemTokenAuthority {
            key,
            max_age,
            issued: HashMap::new(),
            voters: HashSet::new(),
        }
    }

    /// Whether `token` was issued and has not been redeemed
    pub fn is_unused(&self, token: &str) -> bool {
        self.issued.get(token).map(|t| !t.used).unwrap_or(false)
    }

    /// Issue a token stamped with `now` (unix seconds)
    pub fn issue_token_at(&mut self, voter_id: &str, now: u64) -> Result<Token, ValidationError> {
        if voter_id.is_empty() {
            return Err(ValidationError::MissingVoterId);
        }
        if self.voters.contains(voter_id) {
            return Err(ValidationError::TokenAlreadyIssued);
        }

        let mut nonce = [0; TOKEN_LEN];
        OsRng {}.fill_bytes(&mut nonce);
        let payload = format!("{}:{}:{}", voter_id, now, hex::encode(nonce));
        let signature = self.mac(&payload).finalize().into_bytes();
        let token = format!("{}.{}", payload, hex::encode(signature));

        self.voters.insert(voter_id.to_owned());
        self.issued.insert(
            token.clone(),
            IssuedToken {
                voter_id: voter_id.to_owned(),
                used: false,
            },
        );
        Ok(token)
    }

    /// Redeem a token as of `now` (unix seconds)
    pub fn redeem_at(
        &mut self,
        token: &str,
        voter_id: &str,
        now: u64,
    ) -> Result<(), ValidationError> {
        if token.is_empty() {
            return Err(ValidationError::MissingToken);
        }

        let issued_at = self.unsign(token)?;
        let age = now.saturating_sub(issued_at);
        if age > self.max_age {
            return Err(ValidationError::TokenExpired { age });
        }

        let issued = self
            .issued
            .get_mut(token)
            .ok_or(ValidationError::TokenUnknown)?;

        if issued.used {
            return Err(ValidationError::TokenAlreadyUsed);
        }
        if issued.voter_id != voter_id {
            return Err(ValidationError::TokenVoterMismatch);
        }

        issued.used = true;
        Ok(())
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new(GenericArray::from_slice(&self.key));
        mac.update(payload.as_bytes());
        mac
    }

    /// Check the signature and return the issuance time
    fn unsign(&self, token: &str) -> Result<u64, ValidationError> {
        let mut parts = token.rsplitn(2, '.');
        let signature = parts.next().ok_or(ValidationError::TokenBadSignature)?;
        let payload = parts.next().ok_or(ValidationError::TokenBadSignature)?;
        let signature = hex::decode(signature).map_err(|_| ValidationError::TokenBadSignature)?;

        self.mac(payload)
            .verify(&signature)
            .map_err(|_| ValidationError::TokenBadSignature)?;

        // voter_id:issued_at:nonce, where the voter id may itself contain ':'
        payload
            .rsplitn(3, ':')
            .nth(1)
            .and_then(|issued_at| issued_at.parse().ok())
            .ok_or(ValidationError::TokenBadSignature)
    }
}

impl Default for MemTokenAuthority {
    fn default() -> Self {
        MemTokenAuthority::new()
    }
}

impl TokenAuthority for MemTokenAuthority {
    fn issue_token(&mut self, voter_id: &str) -> Result<Token, ValidationError> {
        self.issue_token_at(voter_id, unix_timestamp())
    }

    fn redeem(&mut self, token: &str, voter_id: &str) -> Result<(), ValidationError> {
        self.redeem_at(token, voter_id, unix_timestamp())
    }
}
