//! Advisory messages produced while compiling a translation table.
//!
//! Diagnostics are plain values returned next to the data they describe.
//! Nothing in this crate prints them; the caller decides how to report.

use std::fmt::{Display, Formatter};

/// How serious a diagnostic is. Neither level changes the outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What part of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A subtree of the input directory could not be listed.
    Discovery,
    /// A CSV file could not be read or decoded.
    Unreadable,
    /// A CSV file had no usable header row.
    MissingHeader,
    /// A single row failed structural parsing.
    RowParse,
    /// A row had no usable `key` cell.
    MissingKey,
    /// The same (language, key) pair was given two different values.
    ValueConflict,
    /// Two keys collided while nesting (`a.b` vs `a.b.c`).
    TreeConflict,
    /// An output file could not be rendered or written.
    WriteFailed,
    /// No language columns were found in any CSV.
    NoLanguages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    /// Prefixes the message with a location or language label.
    pub fn with_context(mut self, context: impl Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Returns `true` when any diagnostic is error-level.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}
