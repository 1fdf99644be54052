use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::paths::get_tesseract_dir;

/// Environment variable naming an explicit Tesseract executable.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

const COMMON_PATHS: [&str; 4] = [
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

fn local_executable_name() -> &'static str {
    if cfg!(windows) {
        "tesseract.exe"
    } else {
        "tesseract"
    }
}

/// Returns true if `exe --version` runs successfully.
fn responds_to_version(exe: &Path) -> bool {
    Command::new(exe)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Finds the Tesseract executable.
///
/// Checks, in order: the config override, `TESSERACT_CMD`, our local data
/// directory, the system `PATH`, then common install locations.
pub fn find_tesseract_executable(config: &ExtractorConfig) -> Result<PathBuf> {
    if let Some(path) = &config.tesseract_path {
        debug!("Using configured Tesseract: {}", path.display());
        return Ok(path.clone());
    }

    if let Ok(cmd) = std::env::var(TESSERACT_CMD_ENV) {
        if !cmd.trim().is_empty() {
            debug!("Using Tesseract from {}: {}", TESSERACT_CMD_ENV, cmd);
            return Ok(PathBuf::from(cmd));
        }
    }

    let local_exe = get_tesseract_dir().join(local_executable_name());
    if local_exe.exists() {
        return Ok(local_exe);
    }

    let on_path = PathBuf::from("tesseract");
    if responds_to_version(&on_path) {
        return Ok(on_path);
    }

    for path in &COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR, add it to PATH, or set {}.",
        TESSERACT_CMD_ENV
    ))
}

/// Finds a tessdata directory containing `eng.traineddata`.
///
/// Returns `None` when nothing explicit is found, in which case Tesseract
/// falls back to its compiled-in location.
pub fn find_tessdata_dir() -> Option<PathBuf> {
    let local_tessdata = get_tesseract_dir().join("tessdata");
    if local_tessdata.join("eng.traineddata").exists() {
        return Some(local_tessdata);
    }

    let prefix = PathBuf::from(std::env::var_os("TESSDATA_PREFIX")?);
    [prefix.clone(), prefix.join("tessdata")]
        .into_iter()
        .find(|p| p.join("eng.traineddata").exists())
}
