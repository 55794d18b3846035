use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "reviewfeed",
    version,
    about = "Page through user reviews and load their images",
    long_about = None
)]
pub struct CliArgs {
    /// Reviews source: an http(s) endpoint or a JSON file path.
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Image memory budget in MiB.
    #[arg(long, value_name = "MIB")]
    pub cost_limit_mib: Option<u64>,

    /// Image request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Reviews requested per page.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Stop after this many pages.
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Rows visible at once.
    #[arg(long)]
    pub visible_rows: Option<usize>,
}
