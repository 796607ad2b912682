use std::path::PathBuf;

use clap::Parser;

use crate::refresh::{BUTTON_LOCK_SECS, REFRESH_INTERVAL_SECS};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Root of the price documents: a directory or an http(s) base URL.
    /// `prices.json` and `history/<MATERIAL>.json` are read below it.
    #[arg(short, long, default_value = "data")]
    pub source: String,

    /// Seconds between automatic refreshes.
    #[arg(long, default_value_t = REFRESH_INTERVAL_SECS, value_parser = clap::value_parser!(u32).range(1..))]
    pub refresh_interval: u32,

    /// Seconds the refresh key stays locked after a manual refresh.
    #[arg(long, default_value_t = BUTTON_LOCK_SECS, value_parser = clap::value_parser!(u32).range(1..))]
    pub button_lock: u32,

    /// Log file; defaults to the platform cache directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("mc-prices")
                .join("mc-prices.log")
        })
    }
}
