//! second_eig: print the real part of the second-largest eigenvalue of a matrix on stdin.

use anyhow::Context;
use clap::Parser; // trait import enables SecondEigCli::parse()
use std::io;

use second_eig::cli::SecondEigCli;
use second_eig::commands::second;
use second_eig::config::load_settings;
use second_eig::core::{diagnostics, matrix_reader};

fn main() -> anyhow::Result<()> {
    let args = SecondEigCli::parse();

    let mut settings = load_settings(&args.config)?;
    settings.apply_cli(&args);

    let source = matrix_reader::read_source(io::stdin().lock()).context("failed to read matrix from stdin")?;

    let stdout = io::stdout();
    match second::run(&source, stdout.lock(), &settings) {
        Ok(_) => Ok(()),
        Err(e) => {
            if args.pretty_errors {
                if let Some(span) = e.span() {
                    diagnostics::print_error("<stdin>", &source, &e.title(), span);
                    std::process::exit(1);
                }
            }
            Err(e).context("could not compute the second-largest eigenvalue")
        }
    }
}
