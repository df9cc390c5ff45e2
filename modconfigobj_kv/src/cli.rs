use clap::Parser;
use std::path::PathBuf;

/// Print every key of a nested-section configuration file as `section.key=value`
#[derive(Debug, Parser)]
#[command(name = "modconfigobj-kv", version, about)]
pub struct Cli {
    /// Configuration file to read
    pub file: PathBuf,

    /// Dump raw tokens instead of key/value lines
    #[arg(long, conflicts_with = "json")]
    pub tokens: bool,

    /// Dump raw tokens as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the run should print on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    KeyValue,
    Tokens,
    Json,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.tokens {
            OutputMode::Tokens
        } else {
            OutputMode::KeyValue
        }
    }
}
