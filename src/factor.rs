//! Categorical grouping for bar, box and violin actions.

use crate::data::Cell;
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use crate::select::Series;
use crate::stats::percentile;
use std::cmp::Ordering;

fn option_label(value: &OptionValue) -> Option<String> {
    match value {
        OptionValue::Text(s) => Some(s.clone()),
        OptionValue::Number(v) => Some(Cell::Number(*v).label()),
        OptionValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Category order of a factor: the explicit list when one is given,
/// otherwise the distinct non-missing values in first-seen order.
pub fn categories(factor: &Series, explicit: Option<&[OptionValue]>) -> Vec<String> {
    if let Some(items) = explicit {
        return items.iter().filter_map(option_label).collect();
    }

    let mut seen: Vec<String> = Vec::new();
    for cell in factor.values.iter().filter(|c| !c.is_missing()) {
        let label = cell.label();
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

/// Row numbers belonging to each category, in category order. Rows whose
/// value is not listed are left out.
pub fn group_rows(factor: &Series, categories: &[String]) -> Vec<Vec<usize>> {
    let labels = factor.labels();
    categories
        .iter()
        .map(|cat| {
            labels
                .iter()
                .enumerate()
                .filter(|(_, label)| *label == cat)
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

/// Rows that match both a category of `a` and a category of `b`.
pub fn group_rows_by_pair(
    a: &Series,
    a_categories: &[String],
    b: &Series,
    b_categories: &[String],
) -> Vec<Vec<Vec<usize>>> {
    let a_rows = group_rows(a, a_categories);
    let b_labels = b.labels();
    b_categories
        .iter()
        .map(|b_cat| {
            a_rows
                .iter()
                .map(|rows| {
                    rows.iter()
                        .copied()
                        .filter(|&i| b_labels.get(i) == Some(b_cat))
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Reduction applied to the rows of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agg {
    Sum,
    Mean,
    Median,
    Min,
    Max,
    Count,
}

impl Agg {
    pub fn parse(name: &str) -> Result<Agg> {
        match name {
            "sum" => Ok(Agg::Sum),
            "mean" => Ok(Agg::Mean),
            "median" => Ok(Agg::Median),
            "min" => Ok(Agg::Min),
            "max" => Ok(Agg::Max),
            "count" => Ok(Agg::Count),
            other => Err(PlotError::config(format!("unknown aggregate '{}'", other))),
        }
    }

    /// Reduce the finite values; an empty group yields 0.
    pub fn apply(&self, values: &[f64]) -> f64 {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return 0.0;
        }
        match self {
            Agg::Sum => finite.iter().sum(),
            Agg::Mean => finite.iter().sum::<f64>() / finite.len() as f64,
            Agg::Median => {
                finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                percentile(&finite, 0.5)
            }
            Agg::Min => finite.iter().copied().fold(f64::INFINITY, f64::min),
            Agg::Max => finite.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Agg::Count => finite.len() as f64,
        }
    }
}

/// Aggregate `values` over each group of row numbers. Row numbers past
/// the end of `values` are skipped.
pub fn aggregate(values: &[f64], groups: &[Vec<usize>], agg: Agg) -> Vec<f64> {
    groups
        .iter()
        .map(|rows| {
            let picked: Vec<f64> = rows.iter().filter_map(|&i| values.get(i).copied()).collect();
            agg.apply(&picked)
        })
        .collect()
}

/// Scale each category so its layers sum to 1.
pub fn normalize(layers: &mut [Vec<f64>]) {
    let Some(width) = layers.first().map(Vec::len) else {
        return;
    };
    for cat in 0..width {
        let total: f64 = layers.iter().map(|layer| layer[cat]).sum();
        if total != 0.0 {
            for layer in layers.iter_mut() {
                layer[cat] /= total;
            }
        }
    }
}

/// Running offsets for stacked layers: the bottom of layer `i` at each
/// category is the sum of layers `0..i` there.
pub fn stack_offsets(layers: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = layers.first().map_or(0, Vec::len);
    let mut running = vec![0.0; width];
    layers
        .iter()
        .map(|layer| {
            let bottoms = running.clone();
            for (acc, v) in running.iter_mut().zip(layer) {
                if v.is_finite() {
                    *acc += v;
                }
            }
            bottoms
        })
        .collect()
}
