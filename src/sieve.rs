//! # Sieve — Eratosthenes Ground-Truth Primality Table
//!
//! The Perrin search needs an exact answer to "is n prime?" for every index
//! it visits, so it builds a single bit table over [0, N] before the first
//! recurrence step and queries it in O(1) afterwards.
//!
//! ## Layout
//!
//! Bit `i` lives in word `i / 64`, position `i % 64`. A **set** bit means
//! `i` is known composite; a clear bit in [2, N] means `i` is prime. Bits 0
//! and 1 are never set and are outside the query domain.
//!
//! ## Algorithm
//!
//! Classic sieve of Eratosthenes: for every unmarked i ≤ ⌊√N⌋, strike the
//! multiples of i. Striking starts at i² because every smaller multiple has
//! a prime factor below i and is already marked, so the table is identical to
//! the one obtained by striking from 2i. O(N log log N) time, N/8 bytes.
//!
//! The parallel build sieves the base primes ≤ √N first and then strikes
//! word-aligned segments of the remaining range independently with rayon.
//! Segments never share a word, so no synchronisation is needed and the
//! result is bit-identical to the sequential build.

use rayon::prelude::*;

use crate::error::{SearchError, SearchResult};

/// Default upper bound of the table (and therefore of the search).
pub const DEFAULT_LIMIT: u64 = 28_000_000;

/// Words per parallel segment (4096 words = 262 144 candidates, 32 KiB).
const SEGMENT_WORDS: usize = 4096;

/// Packed bit array of composite marks.
///
/// Bits past `len` in the last word stay clear, so `count_ones` counts only
/// real candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeBits {
    words: Vec<u64>,
    len: usize,
}

impl CompositeBits {
    /// `len` bits, all clear (nothing marked composite yet).
    pub fn new_all_clear(len: usize) -> Self {
        CompositeBits {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(
            index < self.len,
            "CompositeBits index out of bounds: {} >= {}",
            index,
            self.len
        );
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Primality table over [0, limit].
#[derive(Clone, Debug)]
pub struct PrimeTable {
    bits: CompositeBits,
    limit: u64,
}

impl PrimeTable {
    /// Sequential sieve of Eratosthenes over [0, limit].
    pub fn build(limit: u64) -> Self {
        let mut bits = CompositeBits::new_all_clear(limit as usize + 1);
        let root = limit.isqrt();
        for i in 2..=root {
            if bits.get(i as usize) {
                continue;
            }
            let mut j = i * i;
            while j <= limit {
                bits.set(j as usize);
                j += i;
            }
        }
        PrimeTable { bits, limit }
    }

    /// Segmented parallel build. Produces exactly the table of [`build`](Self::build).
    pub fn build_parallel(limit: u64) -> Self {
        let root = limit.isqrt();
        let base_primes: Vec<u64> = PrimeTable::build(root).primes().collect();

        let len = limit as usize + 1;
        let mut bits = CompositeBits::new_all_clear(len);
        bits.words
            .par_chunks_mut(SEGMENT_WORDS)
            .enumerate()
            .for_each(|(seg, chunk)| {
                let lo = (seg * SEGMENT_WORDS * 64) as u64;
                let hi = (lo + chunk.len() as u64 * 64 - 1).min(limit);
                for &p in &base_primes {
                    let first = (p * p).max(lo.div_ceil(p) * p);
                    let mut j = first;
                    while j <= hi {
                        let off = (j - lo) as usize;
                        chunk[off / 64] |= 1u64 << (off % 64);
                        j += p;
                    }
                }
            });
        PrimeTable { bits, limit }
    }

    /// Build sequentially or in parallel segments.
    pub fn build_with(limit: u64, parallel: bool) -> Self {
        if parallel {
            PrimeTable::build_parallel(limit)
        } else {
            PrimeTable::build(limit)
        }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// True iff `x` is prime. `x` must lie in [2, limit].
    #[inline]
    pub fn is_prime(&self, x: u64) -> SearchResult<bool> {
        if x < 2 || x > self.limit {
            return Err(SearchError::OutOfRange {
                value: x,
                limit: self.limit,
            });
        }
        Ok(!self.bits.get(x as usize))
    }

    /// Number of primes in [2, limit].
    pub fn prime_count(&self) -> u64 {
        if self.limit < 2 {
            return 0;
        }
        (self.limit - 1) - self.bits.count_ones() as u64
    }

    /// Primes in ascending order.
    pub fn primes(&self) -> impl Iterator<Item = u64> + '_ {
        (2..=self.limit).filter(move |&i| !self.bits.get(i as usize))
    }
}
