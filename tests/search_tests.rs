//! End-to-end searches through the library API.
//!
//! These runs exercise the full pipeline (table build, rotation, remainders,
//! classification, sinks) over ranges where the answer is known:
//!
//! - no Perrin pseudoprime exists below 271441 (OEIS A013998);
//! - 271441 = 521² is the first one;
//! - every prime divides its Perrin number, so no anomaly may ever appear.

use perrin_hunter::config::SearchConfig;
use perrin_hunter::perrin::PERRIN_SEEDS;
use perrin_hunter::progress::Progress;
use perrin_hunter::report::{CollectSink, TextSink};
use perrin_hunter::verify::VerifyResult;
use perrin_hunter::{FindingKind, PerrinSearch, PrimeTable, StopReason};

fn run(limit: u64, capacity: usize) -> (perrin_hunter::SearchOutcome, CollectSink) {
    let config = SearchConfig {
        limit,
        capacity,
        ..SearchConfig::default()
    };
    let mut search = PerrinSearch::new(&config).unwrap();
    let mut sink = CollectSink::default();
    let outcome = search.run(&mut sink, &mut Progress::disabled()).unwrap();
    (outcome, sink)
}

#[test]
fn no_pseudoprimes_below_1000() {
    let (outcome, sink) = run(1000, 64);
    assert_eq!(outcome.reason, StopReason::LimitReached);
    assert_eq!(outcome.stopped_at, 1001);
    assert!(outcome.pseudoprimes.is_empty());
    assert!(outcome.anomalies.is_empty());
    assert!(sink.findings.is_empty());
}

#[test]
fn finds_271441_and_nothing_else() {
    let (outcome, sink) = run(271_441, 8192);
    assert_eq!(outcome.reason, StopReason::LimitReached);
    assert_eq!(outcome.stopped_at, 271_442);
    assert_eq!(outcome.pseudoprimes, vec![271_441]);
    assert!(outcome.anomalies.is_empty());

    assert_eq!(sink.findings.len(), 1);
    let (finding, verification) = &sink.findings[0];
    assert_eq!(finding.index, 271_441);
    assert_eq!(finding.kind, FindingKind::Pseudoprime);
    // P(271441) has 110120 bits: 3442 limbs
    assert_eq!(finding.highest_used, 3441);
    assert_eq!(finding.bits, 110_120);
    assert_eq!(verification, &Some(VerifyResult::Verified { tier: 2 }));
}

#[test]
fn text_output_for_first_pseudoprime() {
    let table = PrimeTable::build_parallel(271_441);
    let mut search = PerrinSearch::with_table(table, 8192, PERRIN_SEEDS).unwrap();
    let mut sink = TextSink::new(Vec::new());
    let outcome = search.run(&mut sink, &mut Progress::disabled()).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "271441 is NOT prime number");
    assert_eq!(lines[1], "maxdigit is 3441");
    assert_eq!(outcome.pseudoprimes, vec![271_441]);
}

#[test]
fn text_output_for_anomalies() {
    // With seeds 1, 1, 1 the primes 3..13 fail the divisibility test and
    // 9 | S(9) = 9 passes it
    let table = PrimeTable::build(13);
    let mut search = PerrinSearch::with_table(table, 16, [1, 1, 1]).unwrap();
    let mut sink = TextSink::new(Vec::new());
    let outcome = search.run(&mut sink, &mut Progress::disabled()).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        text,
        "3 is prime number\nmaxdigit is 0\n\
         5 is prime number\nmaxdigit is 0\n\
         7 is prime number\nmaxdigit is 0\n\
         9 is NOT prime number\nmaxdigit is 0\n\
         11 is prime number\nmaxdigit is 0\n\
         13 is prime number\nmaxdigit is 0\n"
    );
    assert_eq!(outcome.anomalies, vec![3, 5, 7, 11, 13]);
    assert_eq!(outcome.pseudoprimes, vec![9]);
}

#[test]
fn sequential_and_parallel_tables_agree_on_outcome() {
    let seq = PrimeTable::build(20_000);
    let par = PrimeTable::build_parallel(20_000);
    let outcome = |table| {
        PerrinSearch::with_table(table, 512, PERRIN_SEEDS)
            .unwrap()
            .run(&mut CollectSink::default(), &mut Progress::disabled())
            .unwrap()
    };
    assert_eq!(outcome(seq), outcome(par));
}

#[test]
fn tiny_capacity_stops_deterministically() {
    let (first, sink) = run(10_000, 4);
    assert_eq!(first.reason, StopReason::CapacityExhausted);
    // P(316) is the first term needing a fifth limb
    assert_eq!(first.stopped_at, 316);
    assert_eq!(first.tested, 313);
    assert!(sink.finished);

    let (second, _) = run(10_000, 4);
    assert_eq!(first, second);
}

#[test]
fn capacity_large_enough_never_stops_early() {
    // P(5000) has 2029 bits: exactly 64 limbs
    let (outcome, _) = run(5000, 64);
    assert_eq!(outcome.reason, StopReason::LimitReached);
    assert_eq!(outcome.highest_used, 63);
}
