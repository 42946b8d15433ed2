//! Default on-disk locations.
//!
//! | OS    | Output directory                  |
//! |-------|-----------------------------------|
//! | Linux | `~/.story/geth/guardian`          |
//! | macOS | `~/Library/Story/geth/guardian`   |
//!
//! Any other OS is rejected at startup.

use std::path::{Path, PathBuf};

use guardian_domain::constants::REPORT_FILENAME;
use guardian_domain::{GuardianError, Result};

/// Default output directory for the running OS.
///
/// # Errors
/// `GuardianError::UnsupportedPlatform` off Linux and macOS;
/// `GuardianError::Config` if the home directory cannot be determined.
pub fn default_output_dir() -> Result<PathBuf> {
    let relative = relative_output_dir(std::env::consts::OS)?;
    let home = dirs::home_dir()
        .ok_or_else(|| GuardianError::Config("cannot determine the home directory".into()))?;
    Ok(home.join(relative))
}

/// Default location of the accumulated report file.
///
/// # Errors
/// Same as [`default_output_dir`].
pub fn default_report_path() -> Result<PathBuf> {
    Ok(report_path_in(&default_output_dir()?))
}

pub fn report_path_in(dir: &Path) -> PathBuf {
    dir.join(REPORT_FILENAME)
}

/// Output directory relative to the home directory on `os`, as named by
/// `std::env::consts::OS`.
///
/// # Errors
/// `GuardianError::UnsupportedPlatform` for anything but `linux` and `macos`.
pub fn relative_output_dir(os: &str) -> Result<PathBuf> {
    match os {
        "linux" => Ok([".story", "geth", "guardian"].iter().collect()),
        "macos" => Ok(["Library", "Story", "geth", "guardian"].iter().collect()),
        other => Err(GuardianError::UnsupportedPlatform(other.to_string())),
    }
}
