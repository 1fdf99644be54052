//! Extractor configuration.
//!
//! Every parameter of the pipeline (chart source, crop region, filter sizes,
//! OCR options) lives here. Values come from a JSON file when one is given or
//! found next to the executable; missing fields fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Complete extractor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Scheme and host of the chart service
    pub chart_base_url: String,
    /// Marketplace path segment ("us", "uk", "de", ...)
    pub locale: String,
    /// Chart kinds tried in order ("amazon" = sold by Amazon, "new" = 3rd party new)
    pub chart_kinds: Vec<String>,
    /// Time period shown on the chart
    pub time_period: String,
    /// Requested chart width in pixels
    pub chart_width: u32,
    /// Requested chart height; the service accepts fractional values
    pub chart_height: f32,
    /// User-Agent header sent with chart requests
    pub user_agent: String,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Width of the right-hand strip holding the price labels
    pub crop_width: u32,
    /// Integer upscale applied before filtering
    pub upscale_factor: u32,
    /// Median filter radius (1 = 3x3 window)
    pub median_radius: u32,
    /// Pixels below this become black, the rest white
    pub binarize_threshold: u8,
    /// Characters Tesseract may emit
    pub char_whitelist: String,
    /// Tesseract page segmentation mode
    pub page_segmentation_mode: u8,
    /// Explicit Tesseract executable, skips auto-detection
    pub tesseract_path: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            chart_base_url: "https://charts.camelcamelcamel.com".to_string(),
            locale: "us".to_string(),
            chart_kinds: vec!["amazon".to_string(), "new".to_string()],
            time_period: "6m".to_string(),
            chart_width: 953,
            chart_height: 494.5,
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout_secs: 10,
            crop_width: 300,
            upscale_factor: 3,
            median_radius: 1,
            binarize_threshold: 200,
            char_whitelist: "0123456789.,$".to_string(),
            page_segmentation_mode: 6,
            tesseract_path: None,
        }
    }
}

impl ExtractorConfig {
    /// Reads and parses a config file. Errors if the file is missing or malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Loads the configuration.
///
/// An explicit path must load successfully. Without one, `config.json` next to
/// the executable is used when present and valid; otherwise defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ExtractorConfig> {
    if let Some(path) = explicit {
        let config = ExtractorConfig::from_file(path)?;
        info!("Config loaded from {}", path.display());
        return Ok(config);
    }

    let config_path = crate::paths::get_default_config_path();
    if !config_path.exists() {
        info!("No config.json found. Using default config.");
        return Ok(ExtractorConfig::default());
    }

    match ExtractorConfig::from_file(&config_path) {
        Ok(config) => {
            info!("Config loaded from {}", config_path.display());
            Ok(config)
        }
        Err(e) => {
            warn!("{:#}. Using defaults.", e);
            Ok(ExtractorConfig::default())
        }
    }
}
