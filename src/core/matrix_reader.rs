//! Whitespace-delimited text → dense `f64` matrix.
//!
//! Rows are newline-separated, columns are runs of whitespace. Everything from the
//! comment marker to the end of a line is dropped and blank lines are skipped, so
//! line numbers in errors always refer to physical input lines.

use nalgebra::DMatrix;
use serde::Deserialize;
use std::io::Read;

use crate::core::error::EigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderOptions {
    /// Comment marker; empty disables comment stripping.
    pub comments: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { comments: "#".to_string() }
    }
}

pub fn read_source(mut input: impl Read) -> Result<String, EigError> {
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn read_matrix(input: impl Read, opts: &ReaderOptions) -> Result<DMatrix<f64>, EigError> {
    let source = read_source(input)?;
    parse_matrix(&source, opts)
}

/// Parses a square matrix.
pub fn parse_matrix(text: &str, opts: &ReaderOptions) -> Result<DMatrix<f64>, EigError> {
    let matrix = parse_rows(text, opts)?;
    ensure_square(&matrix)?;
    Ok(matrix)
}

/// Parses a rectangular matrix; rows must agree on their column count.
pub fn parse_rows(text: &str, opts: &ReaderOptions) -> Result<DMatrix<f64>, EigError> {
    let mut data = Vec::new();
    let mut nrows = 0;
    let mut ncols: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw, &opts.comments);

        let mut count = 0;
        for (col, token) in tokens(line) {
            let value = token.parse::<f64>().map_err(|_| EigError::Parse {
                token: token.to_string(),
                line: line_no,
                col,
            })?;
            data.push(value);
            count += 1;
        }
        if count == 0 {
            continue;
        }

        match ncols {
            None => ncols = Some(count),
            Some(expected) if expected != count => {
                return Err(EigError::shape_at(
                    line_no,
                    format!("expected {} columns, found {}", expected, count),
                ));
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.ok_or_else(|| EigError::shape("empty matrix"))?;
    Ok(DMatrix::from_row_slice(nrows, ncols, &data))
}

pub fn ensure_square(matrix: &DMatrix<f64>) -> Result<(), EigError> {
    if matrix.nrows() != matrix.ncols() {
        return Err(EigError::shape(format!(
            "matrix is not square ({}x{})",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    Ok(())
}

fn strip_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return line;
    }
    match line.find(marker) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Whitespace-separated tokens with their 1-based character column.
fn tokens(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<(usize, usize)> = None; // (byte offset, column)

    for (col, (byte, ch)) in line.char_indices().enumerate() {
        match (ch.is_whitespace(), start) {
            (true, Some((from, c))) => {
                out.push((c, &line[from..byte]));
                start = None;
            }
            (false, None) => start = Some((byte, col + 1)),
            _ => {}
        }
    }
    if let Some((from, c)) = start {
        out.push((c, &line[from..]));
    }
    out
}
