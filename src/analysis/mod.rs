//! Price statistics and output.
//!
//! This module provides:
//! - Summary statistic derivation from extracted chart values
//! - The output record and its JSON export

pub mod export;
pub mod statistics;

pub use export::{export_to_json, PriceRecord};
pub use statistics::PriceSummary;

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::chart;
use crate::config::ExtractorConfig;

/// Runs the full pipeline: fetch chart, OCR, parse, summarize.
pub fn compute_price_record(
    asin: &str,
    config: &ExtractorConfig,
    debug_dir: Option<&Path>,
) -> Result<PriceRecord> {
    let values = chart::extract_chart_values(asin, config, debug_dir)?;
    let summary = PriceSummary::from_values(&values)?;

    info!(
        "ASIN {}: highest={} lowest={} current={} average={}",
        asin, summary.highest, summary.lowest, summary.current, summary.average
    );

    Ok(PriceRecord::new(asin, summary, Utc::now()))
}
