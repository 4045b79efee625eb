//! Command line options.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", about, version)]
pub struct Opts {
    /// Lookup table mapping destination port and protocol to a tag.
    /// CSV with one header row followed by `dstport,protocol,tag` rows.
    #[arg(long, env = "FLOWTAG_LOOKUP", default_value = "lookup.csv")]
    pub lookup: PathBuf,

    /// Flow log to classify. Plain text, one whitespace-delimited record
    /// per line.
    #[arg(long, env = "FLOWTAG_FLOW_LOG", default_value = "logs.txt")]
    pub flow_log: PathBuf,

    /// Where to write the two-section count report.
    #[arg(long, env = "FLOWTAG_OUTPUT", default_value = "output.csv")]
    pub output: PathBuf,

    /// Enable more detailed internal logging. Repeat to increase level. Overridden by `--quiet`.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further. Overrides `--verbose`.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl Opts {
    pub const fn log_level(&self) -> &'static str {
        match self.quiet {
            0 => match self.verbose {
                0 => "info",
                1 => "debug",
                2..=255 => "trace",
            },
            1 => "warn",
            2 => "error",
            3..=255 => "off",
        }
    }
}
