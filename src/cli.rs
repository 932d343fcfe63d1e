use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "second_eig",
    about = "Read a square matrix from stdin and print the real part of its second-largest eigenvalue",
    version
)]
pub struct SecondEigCli {
    /// Pretty, source-annotated diagnostics for malformed input
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue)]
    pub pretty_errors: bool,

    /// Trace each pipeline stage on stderr. Env SECOND_EIG_DEBUG=1 also works.
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Path to config (TOML); default: ~/.second_eig/config.toml
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print with N fractional digits instead of the shortest round-trip form
    #[arg(long = "precision", value_name = "N")]
    pub precision: Option<usize>,
}
