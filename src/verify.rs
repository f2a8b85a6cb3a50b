//! # Verify — Independent Re-Check of Search Findings
//!
//! Every finding the driver produces is re-derived here by methods that share
//! no code with the rolling accumulators, so a bug in the limb arithmetic or
//! in the slot rotation cannot confirm its own output.
//!
//! ## Tiers
//!
//! 1. **Exact** (index ≤ [`EXACT_TIER_LIMIT`]): P(n) is rebuilt with GMP
//!    integers and tested for divisibility by n directly.
//! 2. **Matrix** (any index): P(n) mod n via fast exponentiation of the 3×3
//!    companion matrix of P(k) = P(k−2) + P(k−3), O(log n) multiplications
//!    with `u128` intermediates.
//!
//! Independently of the Perrin residue, the primality claim is re-checked
//! with GMP's Miller–Rabin so that the sieve is cross-examined as well.

use rug::integer::IsPrime;
use rug::Integer;

use crate::perrin::{Finding, FindingKind};

/// Largest index for which the exact GMP recomputation is used.
pub const EXACT_TIER_LIMIT: u64 = 20_000;

/// Miller–Rabin rounds for the primality cross-check.
const MR_ROUNDS: u32 = 25;

type Mat3 = [[u64; 3]; 3];

/// Companion matrix: (P(k), P(k+1), P(k+2)) → (P(k+1), P(k+2), P(k) + P(k+1)).
const COMPANION: Mat3 = [[0, 1, 0], [0, 0, 1], [1, 1, 0]];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Verified { tier: u8 },
    Failed { reason: String },
}

impl VerifyResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyResult::Verified { .. })
    }
}

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (a as u128 * b as u128 % m as u128) as u64
}

#[inline]
fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 + b as u128) % m as u128) as u64
}

fn mat_mul(a: &Mat3, b: &Mat3, m: u64) -> Mat3 {
    let mut out = [[0u64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let mut acc = 0u64;
            for k in 0..3 {
                acc = add_mod(acc, mul_mod(a[i][k], b[k][j], m), m);
            }
            out[i][j] = acc;
        }
    }
    out
}

fn mat_pow(mut base: Mat3, mut exp: u64, m: u64) -> Mat3 {
    let mut result = [[1 % m, 0, 0], [0, 1 % m, 0], [0, 0, 1 % m]];
    while exp > 0 {
        if exp & 1 == 1 {
            result = mat_mul(&result, &base, m);
        }
        exp >>= 1;
        if exp > 0 {
            base = mat_mul(&base, &base, m);
        }
    }
    result
}

/// P(index) mod `modulus` for the sequence seeded with P(0), P(1), P(2) = `seeds`.
pub fn perrin_residue(seeds: [u32; 3], index: u64, modulus: u64) -> u64 {
    assert!(modulus > 0, "perrin_residue requires a nonzero modulus");
    let power = mat_pow(COMPANION, index, modulus);
    let s = seeds.map(|v| v as u64 % modulus);
    let mut acc = 0u64;
    for (k, &sk) in s.iter().enumerate() {
        acc = add_mod(acc, mul_mod(power[0][k], sk, modulus), modulus);
    }
    acc
}

/// Exact P(index) with GMP integers.
pub fn perrin_exact(seeds: [u32; 3], index: u64) -> Integer {
    let [a, b, c] = seeds;
    let mut window = [Integer::from(a), Integer::from(b), Integer::from(c)];
    if index < 3 {
        return window[index as usize].clone();
    }
    for k in 3..=index {
        let slot = (k % 3) as usize;
        let addend = window[(slot + 1) % 3].clone();
        window[slot] += addend;
    }
    window[(index % 3) as usize].clone()
}

/// Re-check a finding: its divisibility claim and its primality claim.
pub fn verify_finding(finding: &Finding, seeds: [u32; 3]) -> VerifyResult {
    let n = finding.index;
    if n < 2 {
        return VerifyResult::Failed {
            reason: format!("index {} is outside the search domain", n),
        };
    }

    let (divides, tier) = if n <= EXACT_TIER_LIMIT {
        (perrin_exact(seeds, n).is_divisible_u(n as u32), 1)
    } else {
        (perrin_residue(seeds, n, n) == 0, 2)
    };
    let probably_prime = Integer::from(n).is_probably_prime(MR_ROUNDS) != IsPrime::No;

    match finding.kind {
        FindingKind::Pseudoprime if !divides => VerifyResult::Failed {
            reason: format!("P({}) is not divisible by {}", n, n),
        },
        FindingKind::Pseudoprime if probably_prime => VerifyResult::Failed {
            reason: format!("{} is prime, not a pseudoprime", n),
        },
        FindingKind::Anomaly if divides => VerifyResult::Failed {
            reason: format!("P({}) is divisible by {}", n, n),
        },
        FindingKind::Anomaly if !probably_prime => VerifyResult::Failed {
            reason: format!("{} is composite", n),
        },
        _ => VerifyResult::Verified { tier },
    }
}
