//! Lazy discovery of CSV files under an input root.
//!
//! Files come out depth-first with each directory's entries sorted by name.
//! That order is the processing order, and so decides which file wins a
//! value conflict.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ignore::{Walk, WalkBuilder};

use crate::error::Error;

/// Returns `true` when the path has a `.csv` extension, in any case.
pub fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Iterator over the CSV files of one input tree.
///
/// An unreadable subdirectory yields one `Err` item and the walk goes on with
/// its siblings.
pub struct CsvFiles {
    walk: Walk,
}

impl Iterator for CsvFiles {
    type Item = Result<PathBuf, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walk.next()? {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && has_csv_extension(entry.path()) {
                        tracing::trace!(path = %entry.path().display(), "discovered CSV file");
                        return Some(Ok(entry.into_path()));
                    }
                }
                Err(e) => return Some(Err(Error::Walk(e))),
            }
        }
    }
}

/// Starts walking `root`.
///
/// Fails with [`Error::InputRoot`] when `root` is missing, is not a directory
/// or cannot be listed. Nothing is read until the iterator is advanced, and a
/// fresh call restarts the walk.
pub fn discover<P: AsRef<Path>>(root: P) -> Result<CsvFiles, Error> {
    let root = root.as_ref();
    let input_root = |source: io::Error| Error::InputRoot {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(input_root)?;
    if !metadata.is_dir() {
        return Err(input_root(io::Error::other("not a directory")));
    }
    fs::read_dir(root).map_err(input_root)?;

    let walk = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();
    Ok(CsvFiles { walk })
}
