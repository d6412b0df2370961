use crate::error::{PlotError, Result};
use crate::time;
use serde_json::Value;
use std::fmt;

/// One field of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Parse a raw text field: blank fields are missing, numeric fields
    /// become numbers, everything else is kept as text.
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Key used when the cell is treated as a category.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Cell::Number(v as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Build a numeric column.
pub fn numbers(values: &[f64]) -> Vec<Cell> {
    values.iter().map(|v| Cell::Number(*v)).collect()
}

/// Build a text column.
pub fn labels(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|s| Cell::Text(s.to_string())).collect()
}

fn default_index(rows: usize) -> Vec<Cell> {
    (0..rows).map(|i| Cell::Number(i as f64)).collect()
}

/// In-memory table: named columns of equal length plus an ordered row index.
///
/// The index defaults to `0..n` and can be replaced by one of the columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSource {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
    index: Vec<Cell>,
    index_name: Option<String>,
}

impl DataSource {
    /// Table with no rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs. All columns must have the
    /// same length and names must be unique.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut cols: Vec<Vec<Cell>> = Vec::new();

        for (name, values) in columns {
            let name = name.into();
            if let Some(first) = cols.first() {
                if values.len() != first.len() {
                    return Err(PlotError::config(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        values.len(),
                        first.len()
                    )));
                }
            }
            if names.contains(&name) {
                return Err(PlotError::config(format!("duplicate column '{}'", name)));
            }
            names.push(name);
            cols.push(values);
        }

        let rows = cols.first().map_or(0, |c| c.len());
        Ok(DataSource {
            names,
            columns: cols,
            index: default_index(rows),
            index_name: None,
        })
    }

    /// Build a table from a header line and string records, parsing each
    /// field with [`Cell::parse`].
    pub fn from_records(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); headers.len()];

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(PlotError::load(format!(
                    "row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
            for (col, field) in columns.iter_mut().zip(row) {
                col.push(Cell::parse(field));
            }
        }

        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// Create a table from a JSON array of objects. Column names are taken
    /// from the first object; an empty array yields an empty table.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| PlotError::load("Input data must be a JSON array of objects"))?;

        let Some(first) = array.first() else {
            return Ok(Self::empty());
        };

        let first_obj = first
            .as_object()
            .ok_or_else(|| PlotError::load("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(array.len()); headers.len()];
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| PlotError::load("Items in array must be objects"))?;

            for (header, col) in headers.iter().zip(columns.iter_mut()) {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => Cell::parse(s),
                    Some(Value::Number(n)) => n.as_f64().map_or(Cell::Missing, Cell::Number),
                    Some(Value::Bool(b)) => Cell::Text(b.to_string()),
                    Some(Value::Null) | None => Cell::Missing,
                    _ => {
                        return Err(PlotError::load(format!(
                            "Unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                col.push(cell);
            }
        }

        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    // Exact match first, then ASCII case-insensitive.
    fn position(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .or_else(|| self.names.iter().position(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    pub fn index(&self) -> &[Cell] {
        &self.index
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Use the values of `name` as the row index. The column itself stays
    /// selectable.
    pub fn set_index(mut self, name: &str) -> Result<Self> {
        let pos = self
            .position(name)
            .ok_or_else(|| PlotError::selection(format!("index column '{}' not found", name)))?;
        self.index = self.columns[pos].clone();
        self.index_name = Some(self.names[pos].clone());
        Ok(self)
    }

    /// Index the rows by date and time read from `names`. One column holds
    /// full timestamps; several are joined with spaces first (a date column
    /// and a time column). The index becomes seconds since the epoch and is
    /// named `datetime`.
    pub fn set_time_index(mut self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err(PlotError::config("a time index needs at least one column"));
        }
        let columns = names
            .iter()
            .map(|name| {
                self.column(name).ok_or_else(|| {
                    PlotError::selection(format!("time index column '{}' not found", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut index = Vec::with_capacity(self.len());
        for row in 0..self.len() {
            let cells: Vec<&Cell> = columns.iter().map(|column| &column[row]).collect();
            if cells.iter().any(|cell| cell.is_missing()) {
                index.push(Cell::Missing);
                continue;
            }
            let text = cells.iter().map(|cell| cell.label()).collect::<Vec<_>>().join(" ");
            let seconds = time::parse_datetime(&text).ok_or_else(|| {
                PlotError::load(format!("row {}: cannot read '{}' as a date", row + 1, text))
            })?;
            index.push(Cell::Number(seconds));
        }

        self.index = index;
        self.index_name = Some("datetime".to_string());
        Ok(self)
    }

    /// Keep the rows for which `keep(row)` holds.
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        let pick = |values: &Vec<Cell>| -> Vec<Cell> {
            rows.iter().map(|&i| values[i].clone()).collect()
        };

        DataSource {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| pick(c)).collect(),
            index: pick(&self.index),
            index_name: self.index_name.clone(),
        }
    }

    /// Stack tables vertically. Columns are the sorted union of all column
    /// names; cells absent from a table are missing.
    pub fn concat(tables: &[DataSource]) -> Result<DataSource> {
        let mut names: Vec<String> = tables
            .iter()
            .flat_map(|t| t.names.iter().cloned())
            .collect();
        names.sort();
        names.dedup();

        let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
        let mut index = Vec::new();

        for table in tables {
            for (name, col) in names.iter().zip(columns.iter_mut()) {
                match table.names.iter().position(|n| n == name) {
                    Some(pos) => col.extend(table.columns[pos].iter().cloned()),
                    None => col.extend(std::iter::repeat(Cell::Missing).take(table.len())),
                }
            }
            index.extend(table.index.iter().cloned());
        }

        Ok(DataSource {
            names,
            columns,
            index,
            index_name: tables.first().and_then(|t| t.index_name.clone()),
        })
    }
}
