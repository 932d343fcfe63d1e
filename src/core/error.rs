use std::fmt;

use crate::core::diagnostics::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum EigError {
    /// A token that is not a floating-point literal (1-based line/column).
    Parse { token: String, line: usize, col: usize },
    /// Ragged rows, empty input or a non-square matrix.
    Shape { line: Option<usize>, message: String },
    Convergence(String),
    Index { needed: usize, available: usize },
    Io(String),
    Config(String),
}

impl fmt::Display for EigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EigError::Parse { line, col, .. } => write!(f, "Parse Error: {} at {}:{}", self.title(), line, col),
            EigError::Shape { line: Some(line), message } => write!(f, "Shape Error: {} (line {})", message, line),
            EigError::Shape { line: None, message } => write!(f, "Shape Error: {}", message),
            EigError::Convergence(msg) => write!(f, "Convergence Error: {}", msg),
            EigError::Index { .. } => write!(f, "Index Error: {}", self.title()),
            EigError::Io(msg) => write!(f, "IO Error: {}", msg),
            EigError::Config(msg) => write!(f, "Config Error: {}", msg),
        }
    }
}

impl std::error::Error for EigError {}

impl From<std::io::Error> for EigError {
    fn from(err: std::io::Error) -> Self {
        EigError::Io(err.to_string())
    }
}

impl EigError {
    pub fn shape(message: impl Into<String>) -> Self {
        EigError::Shape { line: None, message: message.into() }
    }

    pub fn shape_at(line: usize, message: impl Into<String>) -> Self {
        EigError::Shape { line: Some(line), message: message.into() }
    }

    pub fn convergence(message: impl Into<String>) -> Self {
        EigError::Convergence(message.into())
    }

    /// Message without the error kind or location, used as a diagnostic headline.
    pub fn title(&self) -> String {
        match self {
            EigError::Parse { token, .. } => format!("invalid float literal '{}'", token),
            EigError::Shape { message, .. } => message.clone(),
            EigError::Convergence(msg) | EigError::Io(msg) | EigError::Config(msg) => msg.clone(),
            EigError::Index { needed, available } => {
                format!("need at least {} eigenvalues, got {}", needed, available)
            }
        }
    }

    /// Location in the input text, when the error points at one.
    pub fn span(&self) -> Option<Span> {
        match self {
            EigError::Parse { token, line, col } => Some(Span {
                line: *line,
                col: *col,
                len: token.chars().count(),
            }),
            EigError::Shape { line: Some(line), .. } => Some(Span::whole_line(*line)),
            _ => None,
        }
    }
}
