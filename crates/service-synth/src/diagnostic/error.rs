//! Synthesis error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while synthesizing an entity's service modules.
///
/// Every variant is scoped to a single entity: a failure aborts that entity's
/// synthesis and leaves other entities untouched.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum SynthError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to read file '{path}': {message}")]
    #[diagnostic(code(service_synth::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Template Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(service_synth::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse template: {}", path.display())]
    #[diagnostic(code(service_synth::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    #[error("Syntax error: {message}")]
    #[diagnostic(code(service_synth::parse::syntax_error))]
    SyntaxError {
        message: String,
        file: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("Unsupported syntax '{kind}' in template {}:{line}:{column}", file.display())]
    #[diagnostic(
        code(service_synth::parse::unsupported_syntax),
        help("Templates may only use classes, methods, imports, declarations and plain expressions")
    )]
    UnsupportedSyntax {
        kind: String,
        file: PathBuf,
        line: usize,
        column: usize,
    },

    // =========================================================================
    // Template Structure Errors
    // =========================================================================
    #[error("Template has no class named '{class}'")]
    #[diagnostic(
        code(service_synth::template::target_not_found),
        help("The template must declare the target class using the SERVICE or SERVICE_BASE placeholder")
    )]
    TargetNotFound {
        class: String,
    },

    #[error("Class '{class}' is missing required member: {member}")]
    #[diagnostic(code(service_synth::template::member_not_found))]
    MemberNotFound {
        class: String,
        member: String,
    },

    #[error("Template '{template}' uses placeholder '{placeholder}' but no replacement was provided")]
    #[diagnostic(code(service_synth::template::unmapped_placeholder))]
    UnmappedRequiredPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("Placeholder '{placeholder}' is used as {position} and can only be replaced by an identifier")]
    #[diagnostic(code(service_synth::template::invalid_replacement))]
    InvalidReplacement {
        placeholder: String,
        position: String,
    },

    // =========================================================================
    // Path Errors
    // =========================================================================
    #[error("Cannot compute import path from '{}' to '{}'", from.display(), to.display())]
    #[diagnostic(
        code(service_synth::path::resolution_failed),
        help("Both module paths must be relative to the same root, or both absolute")
    )]
    PathResolutionFailure {
        from: PathBuf,
        to: PathBuf,
    },

    // =========================================================================
    // Entity Errors
    // =========================================================================
    #[error("Invalid entity definition '{}': {message}", path.display())]
    #[diagnostic(code(service_synth::entity::invalid))]
    InvalidEntity {
        path: PathBuf,
        message: String,
    },
}

impl SynthError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a member-not-found error.
    pub fn missing_member(class: impl Into<String>, member: impl Into<String>) -> Self {
        Self::MemberNotFound {
            class: class.into(),
            member: member.into(),
        }
    }

    /// True for errors caused by a template that does not follow the template contract.
    pub fn is_template_malformed(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound { .. }
                | Self::MemberNotFound { .. }
                | Self::UnsupportedSyntax { .. }
                | Self::SyntaxError { .. }
        )
    }
}
