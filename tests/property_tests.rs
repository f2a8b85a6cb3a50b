//! Property-based tests for the arithmetic core.
//!
//! Every property compares the crate against an independent reference:
//! GMP (`rug::Integer`) for big-integer values, trial division for primality,
//! and the companion-matrix residue for the rotation.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

use perrin_hunter::perrin::{PerrinWindow, PERRIN_SEEDS};
use perrin_hunter::verify::{perrin_exact, perrin_residue};
use perrin_hunter::{BigUnsigned, PrimeTable};
use proptest::prelude::*;
use rug::Integer;

fn is_prime_trial(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

proptest! {
    /// One-limb addition agrees with u64 addition, including the carry limb.
    #[test]
    fn prop_add_single_limb(a in any::<u32>(), b in any::<u32>()) {
        let mut x = BigUnsigned::new(a, 4).unwrap();
        x.add_assign_checked(&BigUnsigned::new(b, 4).unwrap()).unwrap();
        let sum = a as u64 + b as u64;
        prop_assert_eq!(x.to_integer(), Integer::from(sum));
        prop_assert_eq!(x.highest_used(), usize::from(sum > u32::MAX as u64));
    }

    /// Values grown by a random sequence of cross-additions match GMP, and so
    /// do their remainders for arbitrary nonzero divisors.
    #[test]
    fn prop_grown_value_and_rem_match_gmp(
        a0 in any::<u32>(),
        b0 in any::<u32>(),
        ops in proptest::collection::vec(any::<bool>(), 1..300),
        divisors in proptest::collection::vec(1u32.., 1..8),
    ) {
        let mut a = BigUnsigned::new(a0, 4096).unwrap();
        let mut b = BigUnsigned::new(b0, 4096).unwrap();
        let mut ra = Integer::from(a0);
        let mut rb = Integer::from(b0);
        for op in ops {
            if op {
                a.add_assign_checked(&b).unwrap();
                ra += &rb;
            } else {
                b.add_assign_checked(&a).unwrap();
                rb += &ra;
            }
        }
        prop_assert_eq!(a.to_integer(), ra.clone());
        prop_assert_eq!(b.to_integer(), rb);
        for d in divisors {
            prop_assert_eq!(a.rem_u32(d).unwrap(), ra.mod_u(d));
        }
    }

    /// significant_bits agrees with GMP after repeated doubling.
    #[test]
    fn prop_significant_bits_match_gmp(a in any::<u32>(), doublings in 0u32..200) {
        let mut x = BigUnsigned::new(a, 64).unwrap();
        for _ in 0..doublings {
            let copy = x.clone();
            x.add_assign_checked(&copy).unwrap();
        }
        let reference = Integer::from(a) << doublings;
        prop_assert_eq!(x.to_integer(), reference.clone());
        prop_assert_eq!(x.significant_bits(), reference.significant_bits() as u64);
    }

    /// The table agrees with trial division everywhere in its domain.
    #[test]
    fn prop_table_matches_trial_division(limit in 2u64..5000, probe in 0u64..5000) {
        let table = PrimeTable::build(limit);
        let x = probe % (limit - 1) + 2;
        prop_assert_eq!(table.is_prime(x).unwrap(), is_prime_trial(x));
    }

    /// The parallel build equals the sequential build.
    #[test]
    fn prop_parallel_table_matches(limit in 2u64..600_000) {
        let seq = PrimeTable::build(limit);
        let par = PrimeTable::build_parallel(limit);
        prop_assert_eq!(seq.prime_count(), par.prime_count());
    }

    /// The window rotation reproduces P(n) for arbitrary seeds.
    #[test]
    fn prop_window_matches_matrix_residue(
        seeds in any::<[u32; 3]>(),
        steps in 1u64..600,
        modulus in 1u64..u32::MAX as u64,
    ) {
        let mut window = PerrinWindow::new(seeds, 1024).unwrap();
        for _ in 0..steps {
            window.advance().unwrap();
        }
        let n = window.next_index() - 1;
        let exact = perrin_exact(seeds, n);
        prop_assert_eq!(window.latest().to_integer(), exact.clone());
        prop_assert_eq!(
            window.latest().rem_u32(modulus as u32).unwrap() as u64,
            perrin_residue(seeds, n, modulus)
        );
    }

    /// Every prime divides its Perrin number.
    #[test]
    fn prop_primes_divide_perrin(start in 2u64..2_000_000) {
        let p = (start..).find(|&n| is_prime_trial(n)).unwrap();
        prop_assert_eq!(perrin_residue(PERRIN_SEEDS, p, p), 0);
    }
}
