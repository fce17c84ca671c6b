//! Source location tracking.

use std::path::{Path, PathBuf};

/// A location in a template file.
#[derive(Debug, Clone)]
pub struct Span {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(file: &Path, line: usize, column: usize) -> Self {
        Self {
            file: file.to_path_buf(),
            line,
            column,
        }
    }
}
