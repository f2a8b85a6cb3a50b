//! # Progress — Periodic Search Status Logging
//!
//! Counters owned by the search loop plus an interval check that emits a
//! `search progress` log line. The check reads the clock only once every
//! [`CHECK_EVERY`] recorded indices, so calling [`Progress::record`] on every
//! step costs a counter increment and a mask test.

use std::time::{Duration, Instant};
use tracing::info;

use crate::estimate_digits;

/// Indices between clock reads (power of two).
const CHECK_EVERY: u64 = 4096;

pub struct Progress {
    pub tested: u64,
    pub found: u64,
    current_index: u64,
    current_bits: u64,
    start: Instant,
    last_report: Instant,
    interval: Option<Duration>,
}

impl Progress {
    /// Report every `interval`; a zero interval disables periodic reports.
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Progress {
            tested: 0,
            found: 0,
            current_index: 0,
            current_bits: 0,
            start: now,
            last_report: now,
            interval: (!interval.is_zero()).then_some(interval),
        }
    }

    pub fn disabled() -> Self {
        Progress::new(Duration::ZERO)
    }

    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    /// Record one tested index and the bit length of its Perrin number.
    #[inline]
    pub fn record(&mut self, index: u64, bits: u64) {
        self.tested += 1;
        self.current_index = index;
        self.current_bits = bits;
        if self.tested & (CHECK_EVERY - 1) != 0 {
            return;
        }
        if let Some(interval) = self.interval {
            if self.last_report.elapsed() >= interval {
                self.print_status();
                self.last_report = Instant::now();
            }
        }
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let rate = if elapsed.as_secs() > 0 {
            self.tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            index = self.current_index,
            digits = estimate_digits(self.current_bits),
            tested = self.tested,
            rate = format_args!("{:.2}", rate),
            found = self.found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "search progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let p = Progress::disabled();
        assert_eq!(p.tested, 0);
        assert_eq!(p.found, 0);
        assert_eq!(p.current_index(), 0);
        assert!(p.interval.is_none());
    }

    #[test]
    fn record_updates_counters() {
        let mut p = Progress::disabled();
        for n in 3..=10_000u64 {
            p.record(n, n / 2);
        }
        assert_eq!(p.tested, 9998);
        assert_eq!(p.current_index(), 10_000);
        assert_eq!(p.current_bits, 5000);
    }

    #[test]
    fn report_timestamp_moves_only_after_interval() {
        let mut p = Progress::new(Duration::from_millis(1));
        let first = p.last_report;
        std::thread::sleep(Duration::from_millis(5));
        for n in 0..CHECK_EVERY {
            p.record(n, 1);
        }
        assert!(p.last_report > first);

        let mut slow = Progress::new(Duration::from_secs(3600));
        let before = slow.last_report;
        for n in 0..CHECK_EVERY {
            slow.record(n, 1);
        }
        assert_eq!(slow.last_report, before);
    }

    #[test]
    fn print_status_with_zero_elapsed() {
        let p = Progress::new(Duration::from_secs(30));
        p.print_status();
    }
}
