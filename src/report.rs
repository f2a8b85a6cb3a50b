//! # Report — Finding Sinks
//!
//! The driver hands every finding to a [`FindingSink`]. Standard output
//! carries nothing else, so a run can be piped straight into other tools.
//!
//! - [`TextSink`]: two lines per finding, `"<n> is NOT prime number"` (or
//!   `"<n> is prime number"` for an anomaly) followed by `"maxdigit is <d>"`.
//! - [`JsonSink`]: one JSON object per line with the verification result and
//!   a UTC timestamp.
//! - [`CollectSink`]: keeps findings in memory (tests, library callers).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::estimate_digits;
use crate::perrin::{Finding, FindingKind};
use crate::verify::VerifyResult;

pub trait FindingSink {
    fn record(&mut self, finding: &Finding, verification: Option<&VerifyResult>) -> Result<()>;

    /// Called once when the search stops.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Plain-text lines on any writer.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        TextSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FindingSink for TextSink<W> {
    fn record(&mut self, finding: &Finding, _verification: Option<&VerifyResult>) -> Result<()> {
        let verdict = match finding.kind {
            FindingKind::Pseudoprime => "is NOT prime number",
            FindingKind::Anomaly => "is prime number",
        };
        writeln!(self.out, "{} {}", finding.index, verdict).context("writing finding")?;
        writeln!(self.out, "maxdigit is {}", finding.highest_used).context("writing finding")?;
        self.out.flush().context("flushing finding output")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("flushing finding output")
    }
}

/// One serialized finding in the JSON lines output.
#[derive(Debug, Serialize)]
pub struct FindingRecord {
    pub n: u64,
    pub kind: FindingKind,
    pub highest_limb: usize,
    pub bits: u64,
    pub digits: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
    pub found_at: DateTime<Utc>,
}

impl FindingRecord {
    pub fn new(finding: &Finding, verification: Option<&VerifyResult>) -> Self {
        let detail = verification.map(|v| match v {
            VerifyResult::Verified { tier } => format!("tier {}", tier),
            VerifyResult::Failed { reason } => reason.clone(),
        });
        FindingRecord {
            n: finding.index,
            kind: finding.kind,
            highest_limb: finding.highest_used,
            bits: finding.bits,
            digits: estimate_digits(finding.bits),
            verified: verification.map(VerifyResult::is_verified),
            verification: detail,
            found_at: Utc::now(),
        }
    }
}

/// JSON lines on any writer.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        JsonSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FindingSink for JsonSink<W> {
    fn record(&mut self, finding: &Finding, verification: Option<&VerifyResult>) -> Result<()> {
        let record = FindingRecord::new(finding, verification);
        serde_json::to_writer(&mut self.out, &record).context("serializing finding")?;
        writeln!(self.out).context("writing finding")?;
        self.out.flush().context("flushing finding output")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("flushing finding output")
    }
}

#[derive(Debug, Default)]
pub struct CollectSink {
    pub findings: Vec<(Finding, Option<VerifyResult>)>,
    pub finished: bool,
}

impl FindingSink for CollectSink {
    fn record(&mut self, finding: &Finding, verification: Option<&VerifyResult>) -> Result<()> {
        self.findings.push((finding.clone(), verification.cloned()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
