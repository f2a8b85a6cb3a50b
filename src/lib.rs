pub mod bignum;
pub mod config;
pub mod error;
pub mod perrin;
pub mod progress;
pub mod report;
pub mod sieve;
pub mod verify;

pub use bignum::BigUnsigned;
pub use error::{SearchError, SearchResult};
pub use perrin::{Finding, FindingKind, PerrinSearch, SearchOutcome, StopReason};
pub use sieve::PrimeTable;

/// Estimate decimal digit count from bit length, avoiding a decimal conversion.
pub fn estimate_digits(bits: u64) -> u64 {
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}
