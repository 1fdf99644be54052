//! Chart download.
//!
//! Builds the candidate chart URLs for an ASIN and fetches them over blocking
//! HTTP. Candidates are tried in order until one yields recognizable prices.

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::ocr;

/// Returns the candidate chart URLs for an ASIN, in the order they are tried.
pub fn chart_urls(asin: &str, config: &ExtractorConfig) -> Vec<String> {
    let base = config.chart_base_url.trim_end_matches('/');
    config
        .chart_kinds
        .iter()
        .map(|kind| {
            format!(
                "{}/{}/{}/{}.png?force=1&zero=0&w={}&h={}&desired=false&legend=1&ilt=1&tp={}&fo=0&lang=en",
                base,
                config.locale,
                asin,
                kind,
                config.chart_width,
                config.chart_height,
                config.time_period
            )
        })
        .collect()
}

/// Builds the HTTP client used for chart requests.
pub fn build_client(config: &ExtractorConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")
}

/// Downloads a single chart.
///
/// Returns `Ok(None)` when the server answers with anything other than
/// `200 OK` or the body is not labelled as an image. Transport and decode
/// failures are errors.
pub fn fetch_chart(client: &Client, url: &str) -> Result<Option<DynamicImage>> {
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Request failed: {}", url))?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!("Chart rejected: HTTP {} for {}", status, url);
        return Ok(None);
    }

    let is_image = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("image"));
    if !is_image {
        debug!("Chart rejected: non-image content type for {}", url);
        return Ok(None);
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read response body: {}", url))?;
    let img = image::load_from_memory(&bytes).context("Failed to decode chart image")?;

    debug!(
        "Chart downloaded: {}x{} ({} bytes)",
        img.width(),
        img.height(),
        bytes.len()
    );

    Ok(Some(img))
}

/// Tries each candidate chart in turn and returns the sorted prices from the
/// first one that yields any.
///
/// A candidate answering with a non-200 status or a non-image body is
/// skipped, as is one whose OCR text holds no prices. Transport, decode and
/// OCR failures abort the whole run.
pub fn extract_chart_values(
    asin: &str,
    config: &ExtractorConfig,
    debug_dir: Option<&Path>,
) -> Result<Vec<f64>> {
    let client = build_client(config)?;

    for (idx, url) in chart_urls(asin, config).iter().enumerate() {
        info!("Fetching chart {}: {}", idx + 1, url);

        let Some(img) = fetch_chart(&client, url)? else {
            info!("Chart {} skipped", idx + 1);
            continue;
        };

        let debug_path = debug_dir.map(|dir| dir.join(format!("{}_chart{}.png", asin, idx + 1)));
        let values = ocr::ocr_chart(&img, config, debug_path.as_deref())?;
        if !values.is_empty() {
            info!("Chart {} yielded {} values", idx + 1, values.len());
            return Ok(values);
        }

        info!("Chart {} yielded no values", idx + 1);
    }

    Err(anyhow!("Unable to extract values for ASIN {}", asin))
}
