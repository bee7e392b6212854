//! The aggregated translation table and the builder that folds sheets into it.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    formats::{RowWarning, Sheet},
    key::{qualify, row_key},
};

/// Every translation of one run, keyed by language and then by fully qualified key.
///
/// `keys` is the registry of all keys seen on a valid row, whether or not any
/// language translated them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationTable {
    /// All language columns found in any sheet.
    pub languages: BTreeSet<String>,
    pub translations: BTreeMap<String, BTreeMap<String, String>>,
    pub keys: BTreeSet<String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the flat key → value map of a language, if it has any value.
    pub fn language(&self, language: &str) -> Option<&BTreeMap<String, String>> {
        self.translations.get(language)
    }

    /// Gets one translation.
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        self.language(language)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Returns `true` when no key was registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Single-owner accumulator for one run.
///
/// Sheets must be added in discovery order: a later value for the same
/// (language, key) pair replaces an earlier one.
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: TranslationTable,
    diagnostics: Vec<Diagnostic>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one parsed sheet into the table.
    ///
    /// # Parameters
    /// - `source`: Display name of the file, used in diagnostics.
    /// - `namespace`: Dotted prefix derived from the file's path.
    /// - `sheet`: The parsed file.
    pub fn add_sheet(&mut self, source: &str, namespace: &str, sheet: &Sheet) {
        let mut warnings = sheet.warnings.iter().peekable();

        let languages: Vec<&str> = sheet.languages().collect();
        self.table
            .languages
            .extend(languages.iter().map(|l| l.to_string()));

        let key_column = sheet.key_column();
        for row in &sheet.rows {
            while let Some(warning) = warnings.next_if(|w| w.line < row.line) {
                self.push_row_warning(source, warning);
            }

            let Some(key) = row_key(row, key_column) else {
                self.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::MissingKey,
                        "row skipped: missing or blank key",
                    )
                    .with_context(format!("{}:{}", source, row.line)),
                );
                continue;
            };

            let full_key = qualify(namespace, key);
            for language in &languages {
                if let Some(value) = row.get(language) {
                    self.insert(language, &full_key, value, source, row.line);
                }
            }
            self.table.keys.insert(full_key);
        }
        for warning in warnings {
            self.push_row_warning(source, warning);
        }

        tracing::debug!(
            source,
            rows = sheet.rows.len(),
            languages = languages.len(),
            "merged sheet"
        );
    }

    fn push_row_warning(&mut self, source: &str, warning: &RowWarning) {
        self.diagnostics.push(
            Diagnostic::warning(DiagnosticKind::RowParse, &warning.message)
                .with_context(format!("{}:{}", source, warning.line)),
        );
    }

    fn insert(&mut self, language: &str, key: &str, value: &str, source: &str, line: usize) {
        let entries = self
            .table
            .translations
            .entry(language.to_string())
            .or_default();

        match entries.get_mut(key) {
            Some(existing) if existing.as_str() == value => {}
            Some(existing) => {
                self.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::ValueConflict,
                        format!(
                            "{:?} value for {:?} overwritten: {:?} -> {:?}",
                            language, key, existing, value
                        ),
                    )
                    .with_context(format!("{}:{}", source, line)),
                );
                *existing = value.to_string();
            }
            None => {
                entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Records a diagnostic that concerns the run rather than one sheet.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Consumes the builder, returning the table and every diagnostic in the order produced.
    pub fn finish(self) -> (TranslationTable, Vec<Diagnostic>) {
        (self.table, self.diagnostics)
    }
}
