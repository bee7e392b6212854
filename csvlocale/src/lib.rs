#![forbid(unsafe_code)]
//! Compile directory trees of CSV translation tables into per-language i18n files.
//!
//! Each CSV under the input root has a `key` column plus one column per
//! language. A file's path becomes a dotted namespace for its keys, so
//! `auth/login.csv` with the row `submit,Submit` defines `auth.login.submit`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use csvlocale::{OutputMode, RunOptions, run};
//!
//! let options = RunOptions::new("locales", "src/i18n").with_mode(OutputMode::Nested);
//! let report = run(&options)?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Output modes
//!
//! - **Flat**: `<lang>.ts` exporting `{ "full.key": "value" }` plus a `key.ts`
//!   registry mapping every key to itself.
//! - **Nested**: `<lang>.json` where each dot-segment is one level of nesting.

pub mod diagnostics;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod formats;
pub mod key;
pub mod pipeline;
pub mod table;
pub mod traits;
pub mod tree;

// Re-export most used types for easy consumption
pub use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Severity},
    discovery::discover,
    emit::{ModuleExtension, OutputMode},
    error::Error,
    pipeline::{RunOptions, RunReport, compile, run},
    table::{TableBuilder, TranslationTable},
    tree::{KeyTree, build_tree},
};
