//! The whole tool: parse → eigenvalues → second largest → one line of output.

use std::io::Write;

use crate::config::Settings;
use crate::core::diagnostics::trace;
use crate::core::eigen::eigenvalues;
use crate::core::error::EigError;
use crate::core::matrix_reader::parse_matrix;
use crate::core::select::{format_real, second_largest};

/// Runs the pipeline over already-read input text and writes the result line to `out`.
/// Nothing is written unless every stage succeeds. Returns the printed value.
pub fn run(source: &str, mut out: impl Write, settings: &Settings) -> Result<f64, EigError> {
    let matrix = parse_matrix(source, &settings.input)?;
    trace(settings.debug, format!("parsed {}x{} matrix", matrix.nrows(), matrix.ncols()));

    let values = eigenvalues(&matrix, &settings.solver)?;
    trace(
        settings.debug,
        format!(
            "eigenvalues: [{}]",
            values.iter().map(|z| z.to_string()).collect::<Vec<_>>().join(", ")
        ),
    );

    let chosen = second_largest(&values)?;
    trace(settings.debug, format!("second largest: {}", chosen));

    writeln!(out, "{}", format_real(chosen.re, settings.output.precision))?;
    Ok(chosen.re)
}
