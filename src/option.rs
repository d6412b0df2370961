//! Option values, layered merging and per-series flattening.
//!
//! Vectorization is explicit: only [`OptionValue::Each`] is spread across
//! series. A [`OptionValue::List`] is always a single value (a limit pair,
//! a list of column names to stack, a colour cycle).

use crate::data::{Cell, DataSource};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Keyword options, ordered by key.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Pure selector computing a series from a table.
pub type SelectorFn = Arc<dyn Fn(&DataSource) -> Vec<Cell> + Send + Sync>;

#[derive(Clone)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A single list-valued argument.
    List(Vec<OptionValue>),
    Map(OptionMap),
    /// One value per series.
    Each(Vec<OptionValue>),
    Func(SelectorFn),
}

impl OptionValue {
    /// Wrap a selector function.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&DataSource) -> Vec<Cell> + Send + Sync + 'static,
    {
        OptionValue::Func(Arc::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, OptionValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OptionMap> {
        match self {
            OptionValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Null => write!(f, "Null"),
            OptionValue::Bool(b) => write!(f, "Bool({})", b),
            OptionValue::Number(v) => write!(f, "Number({})", v),
            OptionValue::Text(s) => write!(f, "Text({:?})", s),
            OptionValue::List(items) => f.debug_tuple("List").field(items).finish(),
            OptionValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            OptionValue::Each(items) => f.debug_tuple("Each").field(items).finish(),
            OptionValue::Func(_) => write!(f, "Func(<fn>)"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        use OptionValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (List(a), List(b)) | (Each(a), Each(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Func(a), Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Number(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Number(v as f64)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(map: OptionMap) -> Self {
        OptionValue::Map(map)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(OptionValue::Null, Into::into)
    }
}

/// Per-series vector: `each(["y", "z"])` draws one series per element.
pub fn each<I, T>(items: I) -> OptionValue
where
    I: IntoIterator<Item = T>,
    T: Into<OptionValue>,
{
    OptionValue::Each(items.into_iter().map(Into::into).collect())
}

/// List-valued single argument, e.g. `list([0.0, 10.0])` for a limit.
pub fn list<I, T>(items: I) -> OptionValue
where
    I: IntoIterator<Item = T>,
    T: Into<OptionValue>,
{
    OptionValue::List(items.into_iter().map(Into::into).collect())
}

/// Build an option map from key/value pairs.
pub fn options<I, K>(items: I) -> OptionMap
where
    I: IntoIterator<Item = (K, OptionValue)>,
    K: Into<String>,
{
    items.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Layer `over` on top of `target`: later wins key by key, and when both
/// sides hold a map the two maps are merged one level deep.
pub fn merge_into(target: &mut OptionMap, over: &OptionMap) {
    for (key, value) in over {
        match (target.get_mut(key), value) {
            (Some(OptionValue::Map(inner)), OptionValue::Map(update)) => {
                for (k, v) in update {
                    inner.insert(k.clone(), v.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge layers in increasing precedence.
pub fn merged<'a, I>(layers: I) -> OptionMap
where
    I: IntoIterator<Item = &'a OptionMap>,
{
    let mut result = OptionMap::new();
    for layer in layers {
        merge_into(&mut result, layer);
    }
    result
}

/// Spread an option map into one map per series.
///
/// Scalars are broadcast; `Each` vectors are zipped and shorter ones are
/// padded by repeating their last element. The result has as many entries
/// as the longest vector, and at least one. An empty `Each` counts as
/// absent and its key is left out of every entry.
pub fn flatten(options: &OptionMap) -> Vec<OptionMap> {
    let length = options
        .values()
        .filter_map(|v| match v {
            OptionValue::Each(items) => Some(items.len()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        .max(1);

    (0..length)
        .map(|i| {
            options
                .iter()
                .filter_map(|(key, value)| {
                    let picked = match value {
                        OptionValue::Each(items) => items.get(i).or_else(|| items.last())?,
                        scalar => scalar,
                    };
                    Some((key.clone(), picked.clone()))
                })
                .collect()
        })
        .collect()
}
