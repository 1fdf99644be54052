//! Summary statistics for the prices read off a chart.
//!
//! The chart legend shows a handful of labels (typically current, highest and
//! lowest). Which label is which is not recoverable from OCR text alone, so the
//! summary is derived from the sorted values with a fixed rule:
//!
//! - one value: every statistic is that value
//! - two values: current and average are both the midpoint of max and min
//! - three or more: current is the second-smallest value, average is the
//!   midpoint of max and min

use anyhow::{anyhow, Result};
use serde::Serialize;

/// Derived price statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSummary {
    pub highest: f64,
    pub lowest: f64,
    pub current: f64,
    pub average: f64,
}

impl PriceSummary {
    /// Derive the summary from extracted values.
    ///
    /// Values are sorted internally, so callers may pass them in any order.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        match sorted.as_slice() {
            [] => Err(anyhow!("No price values to summarize")),
            [only] => Ok(PriceSummary {
                highest: *only,
                lowest: *only,
                current: *only,
                average: *only,
            }),
            [low, high] => {
                let mid = midpoint(*low, *high);
                Ok(PriceSummary {
                    highest: *high,
                    lowest: *low,
                    current: mid,
                    average: mid,
                })
            }
            [low, second, .., high] => Ok(PriceSummary {
                highest: *high,
                lowest: *low,
                current: *second,
                average: midpoint(*low, *high),
            }),
        }
    }
}

fn midpoint(low: f64, high: f64) -> f64 {
    (high + low) / 2.0
}
