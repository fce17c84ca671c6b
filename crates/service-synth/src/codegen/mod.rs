//! TypeScript code generation.

pub mod printer;

pub use printer::{render, render_expr};
