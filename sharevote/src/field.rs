//! Modular arithmetic over a prime field.
//!
//! The protocol field is Z/P with P = 2^61 - 1. The modulus lives in a [`Field`]
//! value rather than a global so that tests can run over small toy primes.
//! Elements are stored as `u64` and every sum is taken in `u128` before reduction,
//! so no operation depends on integer wraparound.

use crate::*;
use std::fmt;

/// The Mersenne prime 2^61 - 1
pub const MERSENNE_61: u64 = (1 << 61) - 1;

/// An integer in `[0, P)` for the field that produced it
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FieldElement(u64);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(0);
    pub const ONE: FieldElement = FieldElement(1);

    /// The canonical integer value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FieldElement> for u64 {
    fn from(element: FieldElement) -> u64 {
        element.0
    }
}

/// A prime field Z/P
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    modulus: u64,
}

impl Field {
    /// Create a field with the given modulus.
    ///
    /// Primality is not checked; additive sharing only needs the modulus to hold
    /// both vote values, so anything below 2 is rejected.
    pub fn new(modulus: u64) -> Result<Self, Error> {
        if modulus < 2 {
            return Err(Error::InvalidModulus(modulus));
        }
        Ok(Field { modulus })
    }

    /// The protocol field, P = 2^61 - 1
    pub fn mersenne61() -> Self {
        Field {
            modulus: MERSENNE_61,
        }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Whether `x` is already a canonical element
    pub fn contains(&self, x: u64) -> bool {
        x < self.modulus
    }

    /// Accept `x` only if it is canonical. Used for externally supplied values
    /// that must be rejected rather than coerced.
    pub fn element(&self, x: u64) -> Option<FieldElement> {
        if self.contains(x) {
            Some(FieldElement(x))
        } else {
            None
        }
    }

    /// x mod P
    pub fn reduce(&self, x: u64) -> FieldElement {
        FieldElement(x % self.modulus)
    }

    /// x mod P, for inputs wider than 64 bits
    pub fn reduce_wide(&self, x: u128) -> FieldElement {
        FieldElement((x % self.modulus as u128) as u64)
    }

    /// (a + b) mod P
    pub fn add(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        self.reduce_wide(a.0 as u128 + b.0 as u128)
    }

    /// (a - b + P) mod P
    pub fn sub(&self, a: FieldElement, b: FieldElement) -> FieldElement {
        let m = self.modulus as u128;
        let a = a.0 as u128 % m;
        let b = b.0 as u128 % m;
        self.reduce_wide(a + m - b)
    }

    /// -a mod P
    pub fn neg(&self, a: FieldElement) -> FieldElement {
        self.sub(FieldElement::ZERO, a)
    }

    /// Sum of all elements mod P
    pub fn sum<I>(&self, elements: I) -> FieldElement
    where
        I: IntoIterator<Item = FieldElement>,
    {
        elements
            .into_iter()
            .fold(FieldElement::ZERO, |acc, e| self.add(acc, e))
    }
}

impl Default for Field {
    fn default() -> Self {
        Field::mersenne61()
    }
}
