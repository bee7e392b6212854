//! Output shapes and the files they produce.
//!
//! Rendering is pure: [`render_outputs`] turns a table into file bodies and
//! diagnostics. [`write_outputs`] is the only function here that touches the
//! file system.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
    io::Write,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    error::Error,
    table::TranslationTable,
    traits::Render,
    tree::{KeyTree, build_tree},
};

/// File stem of the key registry written in flat mode.
pub const REGISTRY_FILE_STEM: &str = "key";

const BANNER: &str = "// Generated by csvlocale. Do not edit by hand.";

/// Which shape the per-language files take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One flat `key → value` module per language plus a key registry module.
    #[default]
    Flat,
    /// One nested JSON document per language.
    Nested,
}

/// Accepts `flat`/`a` and `nested`/`b`, case-insensitively.
impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "a" => Ok(OutputMode::Flat),
            "nested" | "b" => Ok(OutputMode::Nested),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Flat => write!(f, "flat"),
            OutputMode::Nested => write!(f, "nested"),
        }
    }
}

/// File extension of the modules written in flat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleExtension {
    #[default]
    Ts,
    Js,
}

impl ModuleExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleExtension::Ts => "ts",
            ModuleExtension::Js => "js",
        }
    }
}

impl FromStr for ModuleExtension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ts" => Ok(ModuleExtension::Ts),
            "js" => Ok(ModuleExtension::Js),
            _ => Err(Error::validation_error(format!(
                "unsupported module extension `{}` (expected ts or js)",
                s
            ))),
        }
    }
}

impl Display for ModuleExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module exporting one flat object as its default export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatModule {
    pub entries: BTreeMap<String, String>,
}

impl FlatModule {
    /// The identity map over every registered key.
    pub fn registry(keys: &BTreeSet<String>) -> Self {
        FlatModule {
            entries: keys.iter().map(|k| (k.clone(), k.clone())).collect(),
        }
    }
}

impl Render for FlatModule {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writeln!(writer, "{}", BANNER)?;
        write!(writer, "export default ")?;
        serde_json::to_writer_pretty(&mut writer, &self.entries)?;
        writeln!(writer, ";")?;
        Ok(())
    }
}

/// A JSON document holding one language's key tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedDocument {
    pub tree: KeyTree,
}

impl Render for NestedDocument {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.tree)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// One rendered file, ready to be written under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub contents: String,
}

/// Renders every file of a run.
///
/// Languages without any value produce no file; the registry is skipped when
/// no key was registered.
pub fn render_outputs(
    table: &TranslationTable,
    languages: &[String],
    mode: OutputMode,
    extension: ModuleExtension,
) -> (Vec<OutputFile>, Vec<Diagnostic>) {
    let mut files = Vec::new();
    let mut diagnostics = Vec::new();

    for language in languages {
        let Some(entries) = table.language(language).filter(|e| !e.is_empty()) else {
            continue;
        };
        if !is_plain_file_stem(language) {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::WriteFailed,
                format!(
                    "language {:?} skipped: not usable as a file name in the output directory",
                    language
                ),
            ));
            continue;
        }

        let (file_name, rendered) = match mode {
            OutputMode::Flat => {
                let module = FlatModule {
                    entries: entries.clone(),
                };
                (format!("{}.{}", language, extension), module.render())
            }
            OutputMode::Nested => {
                let (tree, conflicts) =
                    build_tree(entries.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                diagnostics.extend(conflicts.into_iter().map(|d| d.with_context(language)));
                (
                    format!("{}.json", language),
                    NestedDocument { tree }.render(),
                )
            }
        };
        push_rendered(&mut files, &mut diagnostics, file_name, rendered);
    }

    if mode == OutputMode::Flat && !table.keys.is_empty() {
        let file_name = format!("{}.{}", REGISTRY_FILE_STEM, extension);
        let rendered = FlatModule::registry(&table.keys).render();
        push_rendered(&mut files, &mut diagnostics, file_name, rendered);
    }

    (files, diagnostics)
}

/// A language may only name a file directly inside the output directory.
fn is_plain_file_stem(language: &str) -> bool {
    let mut components = Path::new(language).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => name == language,
        _ => false,
    }
}

fn push_rendered(
    files: &mut Vec<OutputFile>,
    diagnostics: &mut Vec<Diagnostic>,
    file_name: String,
    rendered: Result<String, Error>,
) {
    match rendered {
        Ok(contents) => files.push(OutputFile {
            file_name,
            contents,
        }),
        Err(e) => diagnostics.push(Diagnostic::error(
            DiagnosticKind::WriteFailed,
            format!("cannot render {}: {}", file_name, e),
        )),
    }
}

/// What [`write_outputs`] managed to do.
#[derive(Debug, Default)]
pub struct Emission {
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Writes each file under `dir`. A failed write is reported and the others still happen.
pub fn write_outputs(dir: &Path, files: &[OutputFile]) -> Emission {
    let mut emission = Emission::default();
    for file in files {
        let path = dir.join(&file.file_name);
        match std::fs::write(&path, &file.contents) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "wrote output file");
                emission.written.push(path);
            }
            Err(e) => emission.diagnostics.push(Diagnostic::error(
                DiagnosticKind::WriteFailed,
                format!("cannot write {}: {}", path.display(), e),
            )),
        }
    }
    emission
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::formats::Sheet;
    use crate::table::TableBuilder;
    use crate::traits::Parser;
    use indoc::indoc;
    use tempfile::TempDir;

    fn table(sheets: &[(&str, &str)]) -> TranslationTable {
        let mut builder = TableBuilder::new();
        for (namespace, content) in sheets {
            builder.add_sheet(namespace, namespace, &Sheet::from_str(content).unwrap());
        }
        builder.finish().0
    }

    fn languages(table: &TranslationTable) -> Vec<String> {
        table.languages.iter().cloned().collect()
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!("flat".parse::<OutputMode>().unwrap(), OutputMode::Flat);
        assert_eq!("A".parse::<OutputMode>().unwrap(), OutputMode::Flat);
        assert_eq!("Nested".parse::<OutputMode>().unwrap(), OutputMode::Nested);
        assert_eq!("b".parse::<OutputMode>().unwrap(), OutputMode::Nested);
        assert!(matches!(
            "tree".parse::<OutputMode>(),
            Err(Error::UnknownMode(_))
        ));
        assert_eq!(OutputMode::Nested.to_string(), "nested");
    }

    #[test]
    fn test_module_extension_from_str() {
        assert_eq!("ts".parse::<ModuleExtension>().unwrap(), ModuleExtension::Ts);
        assert_eq!(".JS".parse::<ModuleExtension>().unwrap(), ModuleExtension::Js);
        assert!("mjs".parse::<ModuleExtension>().is_err());
    }

    #[test]
    fn test_flat_module_rendering() {
        let module = FlatModule {
            entries: [("common.greeting".to_string(), "Hello".to_string())].into(),
        };
        let expected = indoc! {r#"
            // Generated by csvlocale. Do not edit by hand.
            export default {
              "common.greeting": "Hello"
            };
        "#};
        assert_eq!(module.render().unwrap(), expected);
    }

    #[test]
    fn test_flat_mode_writes_languages_and_registry() {
        let table = table(&[("common", "key,en,ja\ngreeting,Hello,こんにちは\n")]);
        let (files, diagnostics) = render_outputs(
            &table,
            &languages(&table),
            OutputMode::Flat,
            ModuleExtension::Ts,
        );

        assert!(diagnostics.is_empty());
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["en.ts", "ja.ts", "key.ts"]);
        assert!(files[1].contents.contains(r#""common.greeting": "こんにちは""#));
        assert!(
            files[2]
                .contents
                .contains(r#""common.greeting": "common.greeting""#)
        );
    }

    #[test]
    fn test_language_without_values_gets_no_file() {
        let table = table(&[("common", "key,en,fr\ngreeting,Hello,\n")]);
        let (files, _) = render_outputs(
            &table,
            &languages(&table),
            OutputMode::Flat,
            ModuleExtension::Js,
        );

        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["en.js", "key.js"]);
    }

    #[test]
    fn test_nested_mode_writes_json_without_registry() {
        let table = table(&[
            ("common", "key,en\ngreeting,Hello\n"),
            ("auth.login", "key,en\nsubmit,Submit\n"),
        ]);
        let (files, diagnostics) = render_outputs(
            &table,
            &languages(&table),
            OutputMode::Nested,
            ModuleExtension::Ts,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "en.json");
        let value: serde_json::Value = serde_json::from_str(&files[0].contents).unwrap();
        assert_eq!(value["auth"]["login"]["submit"], "Submit");
        assert_eq!(value["common"]["greeting"], "Hello");
        assert!(files[0].contents.ends_with("}\n"));
    }

    #[test]
    fn test_nested_mode_reports_tree_conflicts_per_language() {
        let table = table(&[("", "key,en\na.b,Short\na.b.c,Long\n")]);
        let (files, diagnostics) = render_outputs(
            &table,
            &languages(&table),
            OutputMode::Nested,
            ModuleExtension::Ts,
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::TreeConflict);
        assert!(diagnostics[0].message.starts_with("en: "));
        let value: serde_json::Value = serde_json::from_str(&files[0].contents).unwrap();
        assert_eq!(value["a"]["b"], "Short");
    }

    #[test]
    fn test_language_that_is_not_a_plain_file_name_is_skipped() {
        let table = table(&[("", "key,en,../x,a/b,..\ngreeting,Hello,Up,Nested,Dots\n")]);
        let (files, diagnostics) = render_outputs(
            &table,
            &languages(&table),
            OutputMode::Flat,
            ModuleExtension::Ts,
        );

        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["en.ts", "key.ts"]);
        assert_eq!(diagnostics.len(), 3);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.kind == DiagnosticKind::WriteFailed && d.severity == Severity::Error)
        );
        assert!(diagnostics.iter().any(|d| d.message.contains("\"../x\"")));
        assert!(diagnostics.iter().any(|d| d.message.contains("\"a/b\"")));
    }

    #[test]
    fn test_plain_file_stem() {
        assert!(is_plain_file_stem("en"));
        assert!(is_plain_file_stem("zh-Hant"));
        assert!(!is_plain_file_stem("../x"));
        assert!(!is_plain_file_stem("a/b"));
        assert!(!is_plain_file_stem("a/"));
        assert!(!is_plain_file_stem("."));
        assert!(!is_plain_file_stem("/abs"));
        assert!(!is_plain_file_stem(""));
    }

    #[test]
    fn test_write_outputs_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            OutputFile {
                file_name: "missing/en.ts".to_string(),
                contents: "x".to_string(),
            },
            OutputFile {
                file_name: "fr.ts".to_string(),
                contents: "y".to_string(),
            },
        ];

        let emission = write_outputs(dir.path(), &files);
        assert_eq!(emission.written, vec![dir.path().join("fr.ts")]);
        assert_eq!(emission.diagnostics.len(), 1);
        assert_eq!(emission.diagnostics[0].kind, DiagnosticKind::WriteFailed);
        assert_eq!(std::fs::read_to_string(dir.path().join("fr.ts")).unwrap(), "y");
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = TranslationTable::new();
        let (files, diagnostics) =
            render_outputs(&table, &[], OutputMode::Flat, ModuleExtension::Ts);
        assert!(files.is_empty());
        assert!(diagnostics.is_empty());
    }
}
