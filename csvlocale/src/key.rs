//! Fully qualified key derivation.
//!
//! A file at `auth/login.csv` gets the namespace `auth.login`; its row key
//! `submit` becomes `auth.login.submit`.

use std::path::Path;

use crate::formats::Row;

/// Derives the dotted namespace for a file path relative to the input root.
pub fn namespace_for(relative: &Path) -> String {
    let normalized = relative.to_string_lossy().replace('\\', "/");
    strip_csv_suffix(&normalized).replace('/', ".")
}

fn strip_csv_suffix(path: &str) -> &str {
    let split = path.len().saturating_sub(4);
    match path.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(".csv") => &path[..split],
        _ => path,
    }
}

/// Joins a namespace and a row key. An empty namespace leaves the key as is.
pub fn qualify(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", namespace, key)
    }
}

/// Returns the row's key cell unless it is missing or blank.
pub fn row_key<'a>(row: &'a Row, key_column: Option<&str>) -> Option<&'a str> {
    key_column
        .and_then(|column| row.get(column))
        .filter(|key| !key.trim().is_empty())
}
