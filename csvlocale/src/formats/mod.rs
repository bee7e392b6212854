//! Input formats understood by csvlocale.

pub mod csv;

pub use csv::{KEY_COLUMN, Row, RowWarning, Sheet};
