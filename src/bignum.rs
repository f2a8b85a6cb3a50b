//! # Bignum — Capacity-Bounded Unsigned Big Integer
//!
//! The arithmetic core of the Perrin search. Each accumulator is a
//! little-endian vector of `u32` limbs that only ever grows, by at most one
//! limb per addition, up to a configured ceiling.
//!
//! Only two operations are needed by the recurrence:
//!
//! 1. **In-place addition** of another `BigUnsigned` (ripple-carry, one `u64`
//!    intermediate per limb).
//! 2. **Remainder by a single word** (`rem_u32`), computed by Horner
//!    reduction from the most significant limb down, so no big-by-big
//!    division is ever performed.
//!
//! ## Capacity
//!
//! The limb vector grows on demand but never beyond `capacity` limbs. An
//! addition whose final carry would need limb number `capacity + 1` fails
//! with [`CapacityError`]; this is the search's only terminal condition
//! besides reaching the table limit. After a failed addition the low limbs
//! hold the sum modulo 2^(32·capacity) and the value must not be used again.
//!
//! ## Complexity
//!
//! Addition is O(max(len_a, len_b)); `rem_u32` is O(len) with one 64-bit
//! division per limb. P(n) grows by log2(1.3247) ≈ 0.405 bits per step, so
//! the limb count at index n is roughly n / 79.

use rug::integer::Order;
use rug::Integer;
use std::fmt;
use thiserror::Error;

use crate::error::{SearchError, SearchResult};

/// Limbs reserved up front; further growth doubles as usual.
const INITIAL_RESERVE: usize = 64;

/// An addition needed more limbs than the accumulator may hold.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("carry would exceed {capacity} limbs")]
pub struct CapacityError {
    pub capacity: usize,
}

#[derive(Clone, Debug)]
pub struct BigUnsigned {
    limbs: Vec<u32>,
    capacity: usize,
}

impl BigUnsigned {
    /// Create a one-limb value that may grow to at most `capacity` limbs.
    pub fn new(initial: u32, capacity: usize) -> SearchResult<Self> {
        if capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "big integer capacity must be at least one limb".into(),
            ));
        }
        let mut limbs = Vec::with_capacity(capacity.min(INITIAL_RESERVE));
        limbs.push(initial);
        Ok(BigUnsigned { limbs, capacity })
    }

    /// Index of the most significant limb in use (logical length − 1).
    #[inline]
    pub fn highest_used(&self) -> usize {
        self.limbs.len() - 1
    }

    #[inline]
    pub fn limb_count(&self) -> usize {
        self.limbs.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read-only view of the limbs, least significant first.
    #[inline]
    pub fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Number of bits needed to represent the value (0 for zero).
    pub fn significant_bits(&self) -> u64 {
        match self.limbs.iter().rposition(|&l| l != 0) {
            Some(top) => top as u64 * 32 + (32 - self.limbs[top].leading_zeros()) as u64,
            None => 0,
        }
    }

    /// `self += other`. `other` is only read.
    ///
    /// Limbs missing on the shorter side read as zero. A final carry appends
    /// one new most-significant limb, which fails if the capacity is already
    /// used up.
    pub fn add_assign_checked(&mut self, other: &BigUnsigned) -> Result<(), CapacityError> {
        let span = self.limbs.len().max(other.limbs.len());
        if span > self.capacity {
            return Err(CapacityError {
                capacity: self.capacity,
            });
        }
        if self.limbs.len() < span {
            self.limbs.resize(span, 0);
        }

        let (low, high) = self.limbs.split_at_mut(other.limbs.len());
        let mut carry = 0u64;
        for (a, &b) in low.iter_mut().zip(&other.limbs) {
            let t = *a as u64 + b as u64 + carry;
            *a = t as u32;
            carry = t >> 32;
        }
        for a in high {
            if carry == 0 {
                break;
            }
            let t = *a as u64 + carry;
            *a = t as u32;
            carry = t >> 32;
        }

        if carry != 0 {
            if self.limbs.len() >= self.capacity {
                return Err(CapacityError {
                    capacity: self.capacity,
                });
            }
            self.limbs.push(carry as u32);
        }
        Ok(())
    }

    /// Remainder of `self / divisor`, leaving `self` untouched.
    ///
    /// Horner reduction from the top limb: `r = (r · 2^32 + limb) mod d`.
    /// Since `r < d < 2^32` the intermediate always fits in a `u64`.
    pub fn rem_u32(&self, divisor: u32) -> SearchResult<u32> {
        if divisor == 0 {
            return Err(SearchError::ZeroDivisor);
        }
        let d = divisor as u64;
        let r = self
            .limbs
            .iter()
            .rev()
            .fold(0u64, |r, &limb| ((r << 32) | limb as u64) % d);
        Ok(r as u32)
    }

    /// Exact value as a GMP integer.
    pub fn to_integer(&self) -> Integer {
        Integer::from_digits(&self.limbs, Order::Lsf)
    }
}

impl fmt::Display for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_integer())
    }
}
