//! Tabular data.
//!
//! A [`Table`] is written as one `<Row>` element per row, each holding one
//! element per column. Column names are data, so they are key-escaped and
//! never re-cased. A `None` cell is a null value.

use crate::de::Deserializer;
use crate::dom::Element;
use crate::error::Result;
use crate::shape::TypeInfo;
use crate::value::{View, Xmlize};

/// Tag of each row element.
pub const ROW_TAG: &str = "Row";

/// Rows of nullable text cells under named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Column names in order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order. Every row has one cell per column.
    #[inline]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a column, adding it if missing.
    ///
    /// Existing rows get a null cell for a new column.
    pub fn column_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.columns.iter().position(|c| c == name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Appends a row, padding missing cells with nulls and dropping surplus ones.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut row: Vec<_> = cells.into_iter().take(self.columns.len()).collect();
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Returns a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

impl Xmlize for Table {
    fn type_info() -> TypeInfo {
        TypeInfo::Table
    }

    fn view(&self) -> View<'_> {
        View::Table(self)
    }

    fn read(node: &Element, de: &Deserializer<'_>) -> Result<Self> {
        de.read_table(node)
    }
}
