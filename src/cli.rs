use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "calendar", version, about = "Terminal calendar with daily notes")]
pub struct Cli {
    /// Date to open: YYYY-MM-DD, DAY, MONTH, DAY MONTH or DAY MONTH YEAR
    #[arg(value_name = "DATE")]
    pub date: Vec<String>,
    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print the note path for the date and exit
    #[arg(long, conflicts_with = "show")]
    pub path: bool,
    /// Print the note for the date and exit
    #[arg(long)]
    pub show: bool,
}
