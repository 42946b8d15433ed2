//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use guardian_domain::{Result, SyncSettings};
use guardian_infra::paths;

/// Daily bloom filter sync agent for Story Guardian.
///
/// Credentials are read from CIPHEROWL_CLIENT_ID and CIPHEROWL_CLIENT_SECRET
/// (a .env file in the working directory is honoured).
#[derive(Debug, Parser)]
#[command(name = "story-guardian")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the bloom filter is written to
    /// [default: ~/.story/geth/guardian on Linux, ~/Library/Story/geth/guardian on macOS]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report file uploaded (and then removed) each cycle when uploads are enabled
    #[arg(long, value_name = "PATH")]
    pub report_file: Option<PathBuf>,

    /// Upload the report file every cycle (also CIPHEROWL_UPLOAD_ENABLED)
    #[arg(long)]
    pub enable_upload: bool,

    /// Run one sync cycle immediately and exit
    #[arg(long)]
    pub run_now: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Resolve paths and toggles into the scheduler's settings.
    ///
    /// # Errors
    /// `UnsupportedPlatform` when a default path is needed on an OS without
    /// one.
    pub fn sync_settings(&self, upload_from_env: bool) -> Result<SyncSettings> {
        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => paths::default_output_dir()?,
        };
        let report_path = match &self.report_file {
            Some(path) => path.clone(),
            None => paths::default_report_path()?,
        };

        let settings = SyncSettings::new(output_dir, report_path)
            .with_upload_enabled(self.enable_upload || upload_from_env);
        settings.validate()?;
        Ok(settings)
    }
}
