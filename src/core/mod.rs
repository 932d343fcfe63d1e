//! Matrix reading, eigenvalue solving and selection.
pub mod diagnostics;
pub mod eigen;
pub mod error;
pub mod matrix_reader;
pub mod select;
