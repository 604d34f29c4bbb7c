//! Confidence scoring.
//!
//! The score is a weighted ratio over the per-node classification
//! distribution. The exact weights are calibration, not contract; what is
//! contractual is monotonicity (adding a blocking annotation never raises
//! the score) and the rough targets: clean conversions score ≥ 90, inputs
//! dominated by unconvertible constructs ≤ 50.

use hamlet_frameworks::{EmitTrace, NodeClass};

const WARNED_WEIGHT: f64 = 0.85;

/// Classification counts for one file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub mapped: usize,
    pub warned: usize,
    pub unconvertible: usize,
}

impl Classification {
    pub fn from_trace(trace: &EmitTrace) -> Self {
        let mut out = Classification::default();
        for record in &trace.records {
            match record.class {
                NodeClass::Mapped => out.mapped += 1,
                NodeClass::Warned => out.warned += 1,
                NodeClass::Unconvertible => out.unconvertible += 1,
            }
        }
        out
    }

    pub fn total(&self) -> usize {
        self.mapped + self.warned + self.unconvertible
    }
}

/// Score a classification distribution into [0, 100]. An empty
/// distribution (nothing to convert) scores 100.
pub fn score(classification: &Classification) -> u8 {
    let total = classification.total();
    if total == 0 {
        return 100;
    }
    let weighted = classification.mapped as f64 + WARNED_WEIGHT * classification.warned as f64;
    (100.0 * weighted / total as f64).round() as u8
}
