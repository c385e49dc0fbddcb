//! Untyped spreadsheet rows as they come out of a reader, before normalization.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A single spreadsheet cell value.
///
/// Date cells are carried as their serial number, which is how the legacy sheets store them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Returns true for `Empty` and for text that is only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// The cell rendered as trimmed text, or `None` if it is empty. Whole numbers render without a
    /// fractional part, so a numeric folio `1234.0` becomes `"1234"`.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text().unwrap_or_default())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// A column label as it appears in the sheet, for example `CODIGO ` or `Monto IVA`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl Header {
    /// The label in canonical form: trimmed, uppercased, underscores read as spaces and runs of
    /// whitespace collapsed to one space. `"tipo_comp "` and `"TIPO  COMP"` both become
    /// `"TIPO COMP"`.
    pub fn canonical(&self) -> String {
        canonical(&self.0)
    }

    /// True if this header names the same column as `label` once both are canonicalized.
    pub fn matches(&self, label: &str) -> bool {
        self.canonical() == canonical(label)
    }
}

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

pub(crate) fn canonical(label: &str) -> String {
    label
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One spreadsheet row keyed by column label. Cells keep their column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(Header, Cell)>,
}

impl RawRow {
    /// Builds a row from `(label, value)` pairs.
    pub fn new<H, C, I>(cells: I) -> Self
    where
        H: Into<Header>,
        C: Into<Cell>,
        I: IntoIterator<Item = (H, C)>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(h, c)| (h.into(), c.into()))
                .collect(),
        }
    }

    /// Zips a header row with a value row. Missing trailing values become `Cell::Empty` and values
    /// beyond the last header are dropped.
    pub fn from_headers(headers: &[Header], values: Vec<Cell>) -> Self {
        let mut values = values.into_iter();
        Self {
            cells: headers
                .iter()
                .map(|h| (h.clone(), values.next().unwrap_or_default()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if every cell in the row is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, c)| c.is_empty())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&Header, &Cell)> {
        self.cells.iter().map(|(h, c)| (h, c))
    }

    /// Returns the first non-empty cell whose header matches one of `aliases`, trying the aliases
    /// in order.
    pub fn lookup(&self, aliases: &[&str]) -> Option<&Cell> {
        aliases.iter().find_map(|alias| {
            let wanted = canonical(alias);
            self.cells
                .iter()
                .find(|(h, c)| h.canonical() == wanted && !c.is_empty())
                .map(|(_, c)| c)
        })
    }
}
