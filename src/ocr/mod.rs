pub mod engine;
pub mod extract;
pub mod preprocess;
pub mod setup;

pub use engine::recognize_text;
pub use extract::extract_prices;
pub use preprocess::preprocess_chart;

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ExtractorConfig;

/// High-level function: chart image → sorted price values.
///
/// Preprocesses the legend strip, runs OCR on it, and parses every
/// currency-like token. An empty result is not an error here; the caller
/// decides whether to try another chart.
pub fn ocr_chart(
    img: &DynamicImage,
    config: &ExtractorConfig,
    debug_path: Option<&Path>,
) -> Result<Vec<f64>> {
    let preprocessed = preprocess_chart(img, config)?;

    if let Some(path) = debug_path {
        preprocessed
            .save(path)
            .with_context(|| format!("Failed to save debug image: {}", path.display()))?;
        info!("Saved preprocessed chart to {}", path.display());
    }

    let text = recognize_text(&preprocessed, config)?;
    debug!("OCR text: {:?}", text);

    let values = extract_prices(&text)?;
    debug!("Parsed values: {:?}", values);

    Ok(values)
}
