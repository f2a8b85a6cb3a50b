//! # Perrin — Rolling Recurrence and Pseudoprime Search Driver
//!
//! Walks the Perrin sequence P(k) = P(k−2) + P(k−3) one index at a time and
//! compares the Perrin divisibility test n | P(n) with the ground-truth
//! [`PrimeTable`]. Disagreements are findings:
//!
//! - **Pseudoprime**: n | P(n) but n is composite (first one: 271441).
//! - **Anomaly**: n ∤ P(n) but n is prime. Every prime divides its Perrin
//!   number, so this never fires unless the arithmetic is broken.
//!
//! ## Slot Rotation
//!
//! Only the last three terms are kept, in a fixed 3-slot array. When P(n) is
//! computed, slot `n % 3` holds P(n−3) and slot `(n+1) % 3` holds P(n−2), so
//! one in-place addition `slots[n % 3] += slots[(n + 1) % 3]` turns the
//! oldest term into the newest. The slots are never reordered.
//!
//! ## Termination
//!
//! The search stops after index `limit` (stop index `limit + 1`) or at the
//! first index whose addition would exceed the accumulator capacity (stop
//! index = that index). Both are normal outcomes, reported in
//! [`SearchOutcome`].

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bignum::BigUnsigned;
use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::progress::Progress;
use crate::report::FindingSink;
use crate::sieve::PrimeTable;
use crate::verify;

/// P(0), P(1), P(2) of the Perrin sequence.
pub const PERRIN_SEEDS: [u32; 3] = [3, 0, 2];

/// First index computed by the recurrence.
pub const FIRST_INDEX: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Composite n with n | P(n).
    Pseudoprime,
    /// Prime n with n ∤ P(n).
    Anomaly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub index: u64,
    pub kind: FindingKind,
    /// `highest_used` of the accumulator holding P(index).
    pub highest_used: usize,
    /// Bit length of P(index).
    pub bits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    LimitReached,
    CapacityExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub stopped_at: u64,
    pub reason: StopReason,
    pub tested: u64,
    pub pseudoprimes: Vec<u64>,
    pub anomalies: Vec<u64>,
    /// Largest `highest_used` among the three accumulators at the stop.
    pub highest_used: usize,
}

/// Slot holding P(index) once it has been computed.
#[inline]
pub fn slot_for(index: u64) -> usize {
    (index % 3) as usize
}

/// Split the slot array into the accumulator to advance and its addend.
fn target_and_addend(
    slots: &mut [BigUnsigned; 3],
    target: usize,
    addend: usize,
) -> (&mut BigUnsigned, &BigUnsigned) {
    debug_assert_ne!(target, addend);
    if target < addend {
        let (lo, hi) = slots.split_at_mut(addend);
        (&mut lo[target], &hi[0])
    } else {
        let (lo, hi) = slots.split_at_mut(target);
        (&mut hi[0], &lo[addend])
    }
}

/// The three most recent Perrin terms.
#[derive(Clone, Debug)]
pub struct PerrinWindow {
    slots: [BigUnsigned; 3],
    next_index: u64,
}

impl PerrinWindow {
    pub fn new(seeds: [u32; 3], capacity: usize) -> SearchResult<Self> {
        let [a, b, c] = seeds;
        Ok(PerrinWindow {
            slots: [
                BigUnsigned::new(a, capacity)?,
                BigUnsigned::new(b, capacity)?,
                BigUnsigned::new(c, capacity)?,
            ],
            next_index: FIRST_INDEX,
        })
    }

    /// Index of the term the next [`advance`](Self::advance) computes.
    #[inline]
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// The most recently computed term, P(next_index − 1).
    pub fn latest(&self) -> &BigUnsigned {
        &self.slots[slot_for(self.next_index - 1)]
    }

    pub fn slots(&self) -> &[BigUnsigned; 3] {
        &self.slots
    }

    /// Compute P(n) for n = `next_index` in place and return it.
    ///
    /// On capacity exhaustion the index is not advanced and the window must
    /// not be advanced again.
    pub fn advance(&mut self) -> SearchResult<&BigUnsigned> {
        let n = self.next_index;
        let target = slot_for(n);
        let addend = slot_for(n + 1);
        let (acc, older) = target_and_addend(&mut self.slots, target, addend);
        acc.add_assign_checked(older)
            .map_err(|e| SearchError::CapacityExhausted {
                capacity: e.capacity,
                index: n,
            })?;
        self.next_index = n + 1;
        Ok(&self.slots[target])
    }
}

/// One search session: the prime table, the window and the options that
/// shape reporting.
pub struct PerrinSearch {
    table: PrimeTable,
    window: PerrinWindow,
    seeds: [u32; 3],
    verify: bool,
}

impl PerrinSearch {
    /// Build the prime table for `config.limit` and seed the window.
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        config.validate()?;
        let table = PrimeTable::build_with(config.limit, config.parallel_sieve);
        let mut search = PerrinSearch::with_table(table, config.capacity, config.seeds)?;
        search.verify = config.verify;
        Ok(search)
    }

    /// Session over an already built table. Verification is off.
    pub fn with_table(table: PrimeTable, capacity: usize, seeds: [u32; 3]) -> SearchResult<Self> {
        Ok(PerrinSearch {
            table,
            window: PerrinWindow::new(seeds, capacity)?,
            seeds,
            verify: false,
        })
    }

    pub fn set_verify(&mut self, verify: bool) {
        self.verify = verify;
    }

    pub fn window(&self) -> &PerrinWindow {
        &self.window
    }

    pub fn limit(&self) -> u64 {
        self.table.limit()
    }

    /// Advance to the next index and classify it.
    ///
    /// Returns `Ok(None)` when the Perrin test and the table agree.
    pub fn step(&mut self) -> SearchResult<Option<Finding>> {
        let n = self.window.next_index();
        let divisor = u32::try_from(n).map_err(|_| SearchError::OutOfRange {
            value: n,
            limit: u32::MAX as u64,
        })?;
        let is_prime = self.table.is_prime(n)?;

        let term = self.window.advance()?;
        let divides = term.rem_u32(divisor)? == 0;

        let kind = match (divides, is_prime) {
            (true, false) => FindingKind::Pseudoprime,
            (false, true) => FindingKind::Anomaly,
            _ => return Ok(None),
        };
        Ok(Some(Finding {
            index: n,
            kind,
            highest_used: term.highest_used(),
            bits: term.significant_bits(),
        }))
    }

    /// Run until the table limit or capacity exhaustion, reporting every
    /// finding to `sink`.
    pub fn run(&mut self, sink: &mut dyn FindingSink, progress: &mut Progress) -> Result<SearchOutcome> {
        let limit = self.limit();
        let mut pseudoprimes = Vec::new();
        let mut anomalies = Vec::new();
        let mut tested = 0u64;

        let reason = loop {
            let n = self.window.next_index();
            if n > limit {
                break StopReason::LimitReached;
            }
            match self.step() {
                Ok(None) => {}
                Ok(Some(finding)) => {
                    let verification = self
                        .verify
                        .then(|| verify::verify_finding(&finding, self.seeds));
                    match &verification {
                        Some(verify::VerifyResult::Failed { reason }) => {
                            warn!(index = finding.index, %reason, "finding failed independent verification");
                        }
                        Some(verify::VerifyResult::Verified { tier }) => {
                            debug!(index = finding.index, tier, "finding verified");
                        }
                        None => {}
                    }
                    match finding.kind {
                        FindingKind::Pseudoprime => {
                            info!(index = finding.index, bits = finding.bits, "Perrin pseudoprime");
                            pseudoprimes.push(finding.index);
                        }
                        FindingKind::Anomaly => {
                            warn!(index = finding.index, "prime failed the Perrin test");
                            anomalies.push(finding.index);
                        }
                    }
                    progress.found += 1;
                    sink.record(&finding, verification.as_ref())?;
                }
                Err(SearchError::CapacityExhausted { capacity, index }) => {
                    warn!(index, capacity, "accumulator capacity exhausted");
                    break StopReason::CapacityExhausted;
                }
                Err(e) => return Err(e.into()),
            }
            tested += 1;
            progress.record(n, self.window.latest().significant_bits());
        };

        sink.finish()?;
        Ok(SearchOutcome {
            stopped_at: self.window.next_index(),
            reason,
            tested,
            pseudoprimes,
            anomalies,
            highest_used: self
                .window
                .slots()
                .iter()
                .map(BigUnsigned::highest_used)
                .max()
                .unwrap_or(0),
        })
    }
}
