use serde::{Deserialize, Serialize};

/// A single spreadsheet cell: text, a number, or nothing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from a raw field the way a spreadsheet loader would.
    ///
    /// A field only becomes a number when its display text round-trips
    /// exactly, so codes such as `007` stay text.
    #[must_use]
    pub fn from_field(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && format_number(n) == raw => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        #[allow(clippy::cast_precision_loss)] // distances and counts are small
        Self::Number(n as f64)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Integral values print without a fractional part (`12`, not `12.0`)
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = n as i64;
        whole.to_string()
    } else {
        n.to_string()
    }
}

/// One row of a dataset. Column meaning is positional.
pub type Record = Vec<Cell>;

/// A table as handed over by the loader: the first row is the header,
/// every following row is a data record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Build a dataset from string rows, header first
    #[must_use]
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::from_field(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Total row count, header included
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn header(&self) -> Option<&Record> {
        self.rows.first()
    }

    /// Data records, header excluded
    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        self.rows.get_mut(1..).unwrap_or(&mut [])
    }

    /// Remove and return the header row. The dataset shrinks by one row.
    pub fn take_header(&mut self) -> Option<Record> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.rows.remove(0))
        }
    }
}

/// Display text of the cell at `index`, empty when the column is absent
#[must_use]
pub fn cell_text(record: &[Cell], index: usize) -> String {
    record.get(index).map(ToString::to_string).unwrap_or_default()
}
