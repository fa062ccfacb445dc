#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod authority;
mod board;
mod commitment;
mod config;
mod election;
mod error;
mod field;
mod proof;
mod random;
mod record;
mod serde_hex;
mod share;
mod submission;
mod tally;
mod util;

pub use authority::*;
pub use board::*;
pub use commitment::*;
pub use config::*;
pub use election::*;
pub use error::*;
pub use field::*;
pub use proof::*;
pub use random::*;
pub use record::*;
pub use serde_hex::*;
pub use share::*;
pub use submission::*;
pub use tally::*;
pub use util::*;

#[cfg(test)]
mod tests;
