//! One full run: discover, parse, aggregate, emit.
//!
//! Every run starts from an empty table; nothing is carried over between runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    discovery::discover,
    emit::{ModuleExtension, OutputMode, render_outputs, write_outputs},
    error::Error,
    formats::Sheet,
    key::namespace_for,
    table::{TableBuilder, TranslationTable},
    traits::Parser,
};

/// Options for [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Root directory scanned for CSV files.
    pub input: PathBuf,
    /// Directory receiving the generated files. Created on demand.
    pub output: PathBuf,
    pub mode: OutputMode,
    /// Extension of the modules written in flat mode.
    pub module_extension: ModuleExtension,
    /// When non-empty, only these languages get a file.
    pub include_languages: Vec<String>,
    /// Languages that never get a file.
    pub exclude_languages: Vec<String>,
}

impl RunOptions {
    /// Creates options with flat mode, `.ts` modules and no language filter.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        RunOptions {
            input: input.into(),
            output: output.into(),
            mode: OutputMode::default(),
            module_extension: ModuleExtension::default(),
            include_languages: Vec::new(),
            exclude_languages: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_module_extension(mut self, extension: ModuleExtension) -> Self {
        self.module_extension = extension;
        self
    }

    pub fn with_include_languages(mut self, languages: Vec<String>) -> Self {
        self.include_languages = languages;
        self
    }

    pub fn with_exclude_languages(mut self, languages: Vec<String>) -> Self {
        self.exclude_languages = languages;
        self
    }

    /// Applies the include/exclude filters to the discovered languages.
    pub fn select_languages(&self, table: &TranslationTable) -> Vec<String> {
        table
            .languages
            .iter()
            .filter(|lang| {
                self.include_languages.is_empty() || self.include_languages.contains(lang)
            })
            .filter(|lang| !self.exclude_languages.contains(lang))
            .cloned()
            .collect()
    }
}

/// Summary of a finished run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of CSV files discovered.
    pub files: usize,
    /// Languages considered for output, after filtering.
    pub languages: Vec<String>,
    /// Size of the key registry.
    pub keys: usize,
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of folding a sequence of files into a table.
#[derive(Debug, Default)]
pub struct Compilation {
    pub table: TranslationTable,
    pub diagnostics: Vec<Diagnostic>,
    pub files: usize,
}

/// Folds discovered files into a table, in the order given.
///
/// Unreadable files and files without a header are skipped with an error
/// diagnostic; walk failures become warnings. Nothing is written.
pub fn compile<I>(root: &Path, files: I) -> Compilation
where
    I: IntoIterator<Item = Result<PathBuf, Error>>,
{
    let mut builder = TableBuilder::new();
    let mut count = 0;

    for item in files {
        let path = match item {
            Ok(path) => path,
            Err(e) => {
                builder.push_diagnostic(Diagnostic::warning(
                    DiagnosticKind::Discovery,
                    format!("skipping part of the input tree: {}", e),
                ));
                continue;
            }
        };
        count += 1;

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let source = relative.to_string_lossy().replace('\\', "/");
        match Sheet::read_from(&path) {
            Ok(sheet) => builder.add_sheet(&source, &namespace_for(relative), &sheet),
            Err(Error::MissingHeader(reason)) => builder.push_diagnostic(
                Diagnostic::error(
                    DiagnosticKind::MissingHeader,
                    format!("file skipped: {}", reason),
                )
                .with_context(&source),
            ),
            Err(e) => builder.push_diagnostic(
                Diagnostic::error(DiagnosticKind::Unreadable, format!("file skipped: {}", e))
                    .with_context(&source),
            ),
        }
    }

    let (table, diagnostics) = builder.finish();
    Compilation {
        table,
        diagnostics,
        files: count,
    }
}

/// Runs the whole pipeline once.
///
/// # Errors
///
/// Returns [`Error::InputRoot`] when the input directory is not accessible and
/// [`Error::OutputRoot`] when the output directory cannot be created. Every
/// other problem is reported in [`RunReport::diagnostics`].
pub fn run(options: &RunOptions) -> Result<RunReport, Error> {
    let files = discover(&options.input)?;
    let Compilation {
        table,
        mut diagnostics,
        files,
    } = compile(&options.input, files);

    let mut report = RunReport {
        files,
        keys: table.keys.len(),
        ..RunReport::default()
    };

    if table.languages.is_empty() {
        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::NoLanguages,
            format!(
                "no language columns found under {}; nothing written",
                options.input.display()
            ),
        ));
        report.diagnostics = diagnostics;
        return Ok(report);
    }

    report.languages = options.select_languages(&table);
    let (outputs, render_diagnostics) = render_outputs(
        &table,
        &report.languages,
        options.mode,
        options.module_extension,
    );
    diagnostics.extend(render_diagnostics);

    if !outputs.is_empty() {
        fs::create_dir_all(&options.output).map_err(|source| Error::OutputRoot {
            path: options.output.clone(),
            source,
        })?;
        let emission = write_outputs(&options.output, &outputs);
        report.written = emission.written;
        diagnostics.extend(emission.diagnostics);
    }

    tracing::debug!(
        files = report.files,
        keys = report.keys,
        written = report.written.len(),
        "run finished"
    );
    report.diagnostics = diagnostics;
    Ok(report)
}
