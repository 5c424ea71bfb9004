use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::source::Encoding;

/// Copy or move your latest screenshots.
#[derive(Parser, Debug)]
#[command(name = "shot")]
#[command(version, about = "Copy or move your latest screenshots", long_about = None)]
pub struct Args {
    /// Source directory. Defaults to the system screenshot location
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Destination file or directory. Defaults to the current directory
    #[arg(long)]
    pub dst: Option<PathBuf>,

    /// Move the files instead of copying them
    #[arg(long)]
    pub mv: bool,

    /// File to start at. 1 = latest file, 2 = second latest
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub start: i64,

    /// Number of files to copy or move
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub num: i64,

    /// Answer yes to all prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Toggle color output
    #[arg(long, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
    pub color: Option<bool>,

    /// Disable color output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Print less to the console
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Show the equivalent shell command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Show the full error on failure
    #[arg(long)]
    pub debug: bool,

    /// How to decode the output of the screenshot location query
    #[arg(long, value_enum, default_value_t = Encoding::Utf8)]
    pub encoding: Encoding,
}
