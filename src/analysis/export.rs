//! Output record and JSON export.

use super::statistics::PriceSummary;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One extraction result, as printed on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRecord {
    pub asin: String,
    pub highest: f64,
    pub lowest: f64,
    pub current: f64,
    pub average: f64,
    /// UTC, ISO-8601 with a trailing `Z`
    pub fetched_at: String,
}

impl PriceRecord {
    pub fn new(asin: &str, summary: PriceSummary, fetched_at: DateTime<Utc>) -> Self {
        PriceRecord {
            asin: asin.to_string(),
            highest: summary.highest,
            lowest: summary.lowest,
            current: summary.current,
            average: summary.average,
            fetched_at: format_timestamp(fetched_at),
        }
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize price record")
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
///
/// The fractional part is left out entirely on a whole second.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    if ts.timestamp_subsec_micros() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

/// Export the record to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(record: &PriceRecord, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(record).context("Failed to serialize price record to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
