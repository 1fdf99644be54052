use anyhow::{anyhow, Context, Result};
use image::GrayImage;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::ExtractorConfig;

/// Builds the Tesseract argument list for reading `input` to stdout.
fn tesseract_args(
    input: &Path,
    tessdata_dir: Option<&Path>,
    config: &ExtractorConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.into(), "stdout".into()];

    if let Some(dir) = tessdata_dir {
        args.push("--tessdata-dir".into());
        args.push(dir.into());
    }

    args.push("--psm".into());
    args.push(config.page_segmentation_mode.to_string().into());
    args.push("-c".into());
    args.push(format!("tessedit_char_whitelist={}", config.char_whitelist).into());

    args
}

/// Runs Tesseract on a preprocessed image and returns the raw recognized text.
///
/// Recognition is restricted to the configured character whitelist.
pub fn recognize_text(img: &GrayImage, config: &ExtractorConfig) -> Result<String> {
    let tesseract_exe = find_tesseract_executable(config)?;
    let tessdata_dir = find_tessdata_dir();

    // Save image to temporary file
    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())
        .context("Failed to write OCR input image")?;

    let args = tesseract_args(temp_input.path(), tessdata_dir.as_deref(), config);
    debug!("Running {} {:?}", tesseract_exe.display(), args);

    let output = Command::new(&tesseract_exe)
        .args(&args)
        .output()
        .with_context(|| format!("Failed to run Tesseract: {}", tesseract_exe.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("Tesseract failed: {}", stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
