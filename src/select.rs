//! Selector resolution against a data source.

use crate::data::{Cell, DataSource};
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use log::warn;

/// What to do when a selector names a column the table does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingColumn {
    /// Fail with a selection error.
    #[default]
    Error,
    /// Fall back to the row index and log a warning.
    UseIndex,
}

/// A named sequence of cells taken from a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail unless the series holds one value per row of `data`.
    pub fn aligned_with(self, data: &DataSource, role: &str) -> Result<Series> {
        if self.len() == data.len() {
            Ok(self)
        } else {
            Err(PlotError::selection(format!(
                "'{}' selected {} values for a table of {} rows",
                role,
                self.len(),
                data.len()
            )))
        }
    }

    /// Numeric view of the series; missing cells become NaN.
    pub fn numbers(&self) -> Result<Vec<f64>> {
        self.values
            .iter()
            .map(|cell| match cell {
                Cell::Number(v) => Ok(*v),
                Cell::Missing => Ok(f64::NAN),
                Cell::Text(s) => Err(PlotError::selection(format!(
                    "column '{}' holds non-numeric value '{}'",
                    self.name, s
                ))),
            })
            .collect()
    }

    /// Category keys of the series.
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(Cell::label).collect()
    }
}

/// Outcome of resolving a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Series(Series),
    Literal(OptionValue),
}

impl Resolved {
    pub fn series(&self) -> Option<&Series> {
        match self {
            Resolved::Series(s) => Some(s),
            Resolved::Literal(_) => None,
        }
    }

    /// Name of the selected column, if any.
    pub fn name(&self) -> Option<&str> {
        self.series().map(|s| s.name.as_str())
    }

    /// Numeric values: the series itself, or a literal number or list of
    /// numbers passed through unchanged.
    pub fn numbers(&self) -> Result<Vec<f64>> {
        match self {
            Resolved::Series(series) => series.numbers(),
            Resolved::Literal(OptionValue::Number(v)) => Ok(vec![*v]),
            Resolved::Literal(OptionValue::List(items)) => items
                .iter()
                .map(|item| {
                    item.as_f64().ok_or_else(|| {
                        PlotError::selection(format!("expected a number, got {:?}", item))
                    })
                })
                .collect(),
            Resolved::Literal(other) => Err(PlotError::selection(format!(
                "cannot use {:?} as numeric data",
                other
            ))),
        }
    }
}

fn index_series(data: &DataSource) -> Series {
    Series {
        name: data.index_name().unwrap_or("index").to_string(),
        values: data.index().to_vec(),
    }
}

/// Resolve `selector` against `data`.
///
/// `Null`, `"index"` and `""` select the row index, a function is called
/// with the table, a column name selects that column, and any other value
/// is passed through as a literal.
pub fn resolve(data: &DataSource, selector: &OptionValue, missing: MissingColumn) -> Result<Resolved> {
    match selector {
        OptionValue::Null => Ok(Resolved::Series(index_series(data))),
        OptionValue::Text(name) if name.is_empty() || name == "index" => {
            Ok(Resolved::Series(index_series(data)))
        }
        OptionValue::Text(name) => match data.column(name) {
            Some(values) => Ok(Resolved::Series(Series {
                name: name.clone(),
                values: values.to_vec(),
            })),
            None => match missing {
                MissingColumn::Error => Err(PlotError::selection(format!(
                    "column '{}' not found (available: {})",
                    name,
                    data.column_names().join(", ")
                ))),
                MissingColumn::UseIndex => {
                    warn!("column '{}' not found, selecting the row index instead", name);
                    Ok(Resolved::Series(index_series(data)))
                }
            },
        },
        OptionValue::Func(f) => {
            let values = f(data);
            if values.len() != data.len() {
                warn!(
                    "selector function returned {} values for a table of {} rows",
                    values.len(),
                    data.len()
                );
            }
            Ok(Resolved::Series(Series {
                name: String::new(),
                values,
            }))
        }
        literal => Ok(Resolved::Literal(literal.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{labels, numbers};
    use crate::option::list;

    fn make_data() -> DataSource {
        DataSource::from_columns(vec![
            ("x", numbers(&[0.0, 1.0, 2.0])),
            ("y", numbers(&[0.0, 1.0, 4.0])),
            ("name", labels(&["a", "b", "c"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_column() {
        let data = make_data();
        let resolved = resolve(&data, &"y".into(), MissingColumn::Error).unwrap();
        assert_eq!(resolved.name(), Some("y"));
        assert_eq!(resolved.numbers().unwrap(), vec![0.0, 1.0, 4.0]);
    }

    #[test]
    fn test_resolve_index() {
        let data = make_data();
        for selector in [OptionValue::Null, "index".into(), "".into()] {
            let resolved = resolve(&data, &selector, MissingColumn::Error).unwrap();
            assert_eq!(resolved.numbers().unwrap(), vec![0.0, 1.0, 2.0]);
            assert_eq!(resolved.name(), Some("index"));
        }
    }

    #[test]
    fn test_resolve_function() {
        let data = make_data();
        let doubled = OptionValue::func(|d: &DataSource| {
            d.column("x")
                .unwrap_or_default()
                .iter()
                .map(|c| Cell::Number(c.as_f64().unwrap_or(0.0) * 2.0))
                .collect()
        });
        let resolved = resolve(&data, &doubled, MissingColumn::Error).unwrap();
        assert_eq!(resolved.numbers().unwrap(), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_aligned_with_rejects_short_series() {
        let data = make_data();
        let short = OptionValue::func(|_: &DataSource| numbers(&[1.0]));
        let Resolved::Series(series) = resolve(&data, &short, MissingColumn::Error).unwrap() else {
            panic!("function selectors resolve to a series");
        };
        assert!(matches!(series.aligned_with(&data, "y"), Err(PlotError::Selection(_))));

        let full = resolve(&data, &"x".into(), MissingColumn::Error).unwrap();
        let Resolved::Series(series) = full else {
            panic!("column selectors resolve to a series");
        };
        assert_eq!(series.aligned_with(&data, "x").unwrap().len(), 3);
    }

    #[test]
    fn test_resolve_literal_passthrough() {
        let data = make_data();
        let positions = list([5.0, 6.0]);
        let resolved = resolve(&data, &positions, MissingColumn::Error).unwrap();
        assert_eq!(resolved, Resolved::Literal(positions));
        assert_eq!(resolved.numbers().unwrap(), vec![5.0, 6.0]);

        let scalar = resolve(&data, &3.into(), MissingColumn::Error).unwrap();
        assert_eq!(scalar.numbers().unwrap(), vec![3.0]);
    }

    #[test]
    fn test_missing_column_strict() {
        let data = make_data();
        let err = resolve(&data, &"z".into(), MissingColumn::Error).unwrap_err();
        assert!(err.to_string().contains("column 'z' not found"));
    }

    #[test]
    fn test_missing_column_falls_back_to_index() {
        let data = make_data();
        let resolved = resolve(&data, &"z".into(), MissingColumn::UseIndex).unwrap();
        assert_eq!(resolved.numbers().unwrap(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_non_numeric_series() {
        let data = make_data();
        let resolved = resolve(&data, &"name".into(), MissingColumn::Error).unwrap();
        assert!(resolved.numbers().is_err());
        assert_eq!(resolved.series().unwrap().labels(), vec!["a", "b", "c"]);
    }
}
