use csvlocale::{Diagnostic, RunReport, Severity};

/// Log target shared by every per-file diagnostic.
pub const DIAGNOSTIC_TARGET: &str = "csvlocale::diagnostic";

/// Logs each diagnostic at the level matching its severity.
pub fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                target: DIAGNOSTIC_TARGET,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                target: DIAGNOSTIC_TARGET,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// One-line summary printed after each run.
pub fn summary(report: &RunReport) -> String {
    let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) = report
        .diagnostics
        .iter()
        .partition(|d| d.severity == Severity::Error);

    format!(
        "{} csv file(s), {} language(s), {} key(s); wrote {} file(s) ({} warning(s), {} error(s))",
        report.files,
        report.languages.len(),
        report.keys,
        report.written.len(),
        warnings.len(),
        errors.len()
    )
}
