use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "wallpaper", version, about = "Harvest wallpapers from listing feeds into resolution buckets")]
pub struct Cli {
    /// Path to the RON configuration file.
    #[arg(long, global = true, default_value = "wallpaper.ron")]
    pub config: PathBuf,

    /// Working directory; overrides `<storage>/wallpaper-server`.
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one page per collection, download, classify and save state (default).
    Run,
    /// Show the stored cursor and end-of-feed flag of every collection.
    Status,
    /// Forget stored state so collections start again from the head of their feed.
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Collections to reset.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub collections: Vec<String>,

    /// Reset every collection.
    #[arg(long)]
    pub all: bool,
}
