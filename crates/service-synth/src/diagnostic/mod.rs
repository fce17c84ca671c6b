//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::SynthError;
pub use span::Span;
