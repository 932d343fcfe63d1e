// src/core/diagnostics.rs
//! Colored, line-annotated diagnostics for matrix input, plus the `[debug]` stage trace.

use colored::Colorize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length; 0 = to the end of the line
}

impl Span {
    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }

    pub fn whole_line(line: usize) -> Self {
        Self { line, col: 1, len: 0 }
    }
}

/// Renders the diagnostic block without printing it.
pub fn render_error(filename: &str, source: &str, title: &str, span: Span) -> String {
    let (ln, col) = (span.line, span.col);
    let line_text = nth_line(source, ln).unwrap_or_default();

    let ln_str = format!("{:>4}", ln);
    let width = if span.len == 0 {
        line_text.trim_end().chars().count().saturating_sub(col.saturating_sub(1))
    } else {
        span.len
    };
    let underline = " ".repeat(col.saturating_sub(1)) + &"^".repeat(width.max(1));

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "error:".bright_red().bold(), title.bright_white()));
    out.push_str(&format!(
        "{} {}\n",
        "-->".bright_blue(),
        format!("{}:{}:{}", filename, ln, col).bright_white()
    ));
    out.push_str(&format!(" {} {}\n", ln_str.dimmed(), "|".dimmed()));
    out.push_str(&format!("{} {} {}\n", ln_str.dimmed(), "|".dimmed(), line_text));
    out.push_str(&format!(
        " {} {} {}\n",
        " ".repeat(ln_str.len()).dimmed(),
        "|".dimmed(),
        underline.bright_red()
    ));
    out
}

pub fn print_error(filename: &str, source: &str, title: &str, span: Span) {
    eprintln!("{}", render_error(filename, source, title, span));
}

/// One-line stage trace on stderr.
pub fn trace(enabled: bool, msg: impl Display) {
    if enabled {
        eprintln!("{} {}", "[debug]".dimmed(), msg);
    }
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}
