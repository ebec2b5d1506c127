use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::types::{HintEncoding, ParseErrorPolicy, ResolveMode};

pub const DEFAULT_WINNERS_DIRECTORY: &str = "winner";
pub const DEFAULT_OUTPUT_FILE: &str = "ioccc_winners.sqlite";

#[derive(Parser, Debug, serde::Serialize)]
#[command(
    name = "ioccc-db",
    version,
    about = "Build an SQLite database of IOCCC winning entries",
    long_about = "Walks a checkout of https://github.com/ioccc-src/winner.git, pairs every winning \
                  program with its hint file and spoiler line, and stores them in the `winners` \
                  table of an SQLite database."
)]
pub struct Cli {
    /// IOCCC winners directory, a clone of https://github.com/ioccc-src/winner.git
    #[arg(
        long = "ioccc-winners-directory",
        visible_alias = "winners",
        value_name = "PATH",
        default_value = DEFAULT_WINNERS_DIRECTORY
    )]
    pub ioccc_winners_directory: PathBuf,

    /// Path to the output db
    #[arg(long = "output-file", short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Overrides output-file if it already exists
    #[arg(long = "force")]
    pub force: bool,

    /// Spoilers file (defaults to <winners directory>/all/summary.txt)
    #[arg(long = "spoilers", value_name = "PATH")]
    pub spoilers: Option<PathBuf>,

    /// Write entries as they are found (stream) or deduplicated by year and name (indexed)
    #[arg(long = "mode", value_enum, default_value_t = ResolveMode::Indexed)]
    pub mode: ResolveMode,

    /// Abort or skip on malformed spoiler lines and directories without a year
    #[arg(long = "on-parse-error", value_enum, default_value_t = ParseErrorPolicy::Abort)]
    pub on_parse_error: ParseErrorPolicy,

    /// Text encoding accepted for hint files
    #[arg(long = "hint-encoding", value_enum, default_value_t = HintEncoding::Utf8)]
    pub hint_encoding: HintEncoding,

    /// Print the import summary as JSON on stdout
    #[arg(long = "json")]
    pub json: bool,

    /// Verbose mode (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
