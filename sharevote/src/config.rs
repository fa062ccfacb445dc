use crate::*;
use std::env::var;

/// Number of authorities holding one share of every ballot
pub const DEFAULT_AUTHORITIES: usize = 3;

/// Public protocol parameters. Every implementation must agree on these.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProtocolParams {
    pub field: Field,
    pub authorities: usize,
}

impl ProtocolParams {
    pub fn new(modulus: u64, authorities: usize) -> Result<Self, Error> {
        if authorities == 0 {
            return Err(Error::InvalidAuthorityCount(authorities));
        }
        Ok(ProtocolParams {
            field: Field::new(modulus)?,
            authorities,
        })
    }

    /// Read `SHAREVOTE_MODULUS` and `SHAREVOTE_AUTHORITIES`, falling back to the
    /// protocol defaults for whichever is unset.
    pub fn from_env() -> Result<Self, Error> {
        let modulus: u64 = match var("SHAREVOTE_MODULUS") {
            Ok(val) => val.trim().parse().map_err(|_| Error::Config {
                name: "SHAREVOTE_MODULUS",
                value: val.clone(),
            })?,
            Err(_e) => MERSENNE_61,
        };

        let authorities: usize = match var("SHAREVOTE_AUTHORITIES") {
            Ok(val) => val.trim().parse().map_err(|_| Error::Config {
                name: "SHAREVOTE_AUTHORITIES",
                value: val.clone(),
            })?,
            Err(_e) => DEFAULT_AUTHORITIES,
        };

        ProtocolParams::new(modulus, authorities)
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        ProtocolParams {
            field: Field::mersenne61(),
            authorities: DEFAULT_AUTHORITIES,
        }
    }
}
