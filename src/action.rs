//! Plot-action factory.
//!
//! A [`PlotAction`] pairs a draw primitive with the names of its positional
//! arguments and its recognized keyword table. Building a figure element is
//! two-staged: [`PlotAction::preset`] fixes preset-time options once, then
//! [`Preset::apply`] binds a data source and per-call options and returns
//! an [`Action`] holding one draw step per flattened series.

use crate::data::DataSource;
use crate::error::{PlotError, Result};
use crate::option::{flatten, merged, OptionMap, OptionValue};
use crate::select::{resolve, MissingColumn, Resolved, Series};
use crate::surface::Surface;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// One deferred draw operation.
pub type Draw = Box<dyn Fn(&mut dyn Surface) -> Result<()> + Send + Sync>;

/// Turns one resolved call into a draw step.
pub type Primitive = fn(&Call<'_>) -> Result<Draw>;

static NULL: OptionValue = OptionValue::Null;

/// How positional values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Args {
    /// Resolved against the data source as selectors.
    Selected,
    /// Passed through as literal values.
    Literal,
}

/// A positional argument after resolution.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: &'static str,
    pub value: Resolved,
    /// Whether the caller supplied a non-null value for this argument.
    pub given: bool,
}

/// Everything a primitive sees for one series.
#[derive(Debug)]
pub struct Call<'a> {
    pub action: &'static str,
    pub data: &'a DataSource,
    pub args: Vec<Arg>,
    /// Recognized keyword options, with defaults filled in.
    pub kwargs: OptionMap,
    pub missing: MissingColumn,
}

impl<'a> Call<'a> {
    pub fn arg(&self, name: &str) -> Result<&Resolved> {
        self.args
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
            .ok_or_else(|| {
                PlotError::config(format!("'{}' has no argument '{}'", self.action, name))
            })
    }

    pub fn given(&self, name: &str) -> bool {
        self.args.iter().any(|a| a.name == name && a.given)
    }

    pub fn numbers(&self, name: &str) -> Result<Vec<f64>> {
        self.arg(name)?.numbers()
    }

    /// The argument as a column with one value per row. Literals and
    /// selector functions of the wrong length are selection errors.
    pub fn row_series(&self, name: &str) -> Result<Series> {
        match self.arg(name)? {
            Resolved::Series(series) => series.clone().aligned_with(self.data, name),
            Resolved::Literal(other) => Err(PlotError::selection(format!(
                "'{}' needs a column for '{}', got {:?}",
                self.action, name, other
            ))),
        }
    }

    /// One series per column: a single column, or a list of column names
    /// resolved one by one.
    pub fn series_list(&self, name: &str) -> Result<Vec<Series>> {
        match self.arg(name)? {
            Resolved::Series(series) => Ok(vec![series.clone()]),
            Resolved::Literal(OptionValue::List(items)) => items
                .iter()
                .map(|item| -> Result<Series> {
                    match resolve(self.data, item, self.missing)? {
                        Resolved::Series(series) => Ok(series),
                        Resolved::Literal(other) => Err(PlotError::selection(format!(
                            "'{}' expects column names in '{}', got {:?}",
                            self.action, name, other
                        ))),
                    }
                })
                .collect(),
            Resolved::Literal(other) => Err(PlotError::selection(format!(
                "'{}' expects a column or a list of columns for '{}', got {:?}",
                self.action, name, other
            ))),
        }
    }

    pub fn kw(&self, key: &str) -> &OptionValue {
        self.kwargs.get(key).unwrap_or(&NULL)
    }

    pub fn kw_f64(&self, key: &str) -> Option<f64> {
        self.kw(key).as_f64()
    }

    pub fn kw_bool(&self, key: &str) -> Option<bool> {
        self.kw(key).as_bool()
    }

    pub fn kw_str(&self, key: &str) -> Option<&str> {
        self.kw(key).as_str()
    }

    /// Keyword options handed to the surface.
    pub fn style(&self) -> OptionMap {
        self.kwargs.clone()
    }

    /// Keyword options minus the keys consumed by the primitive itself.
    pub fn style_without(&self, keys: &[&str]) -> OptionMap {
        self.kwargs
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Keyword options restricted to `keys`.
    pub fn style_only(&self, keys: &[&str]) -> OptionMap {
        self.kwargs
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Composed draw steps, applied left to right.
#[derive(Default)]
pub struct Action {
    steps: Vec<Draw>,
}

impl Action {
    /// Action that leaves the surface untouched.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append the steps of `next` after those of `self`.
    pub fn then(mut self, next: Action) -> Action {
        self.steps.extend(next.steps);
        self
    }

    /// Apply every step in order; the first failure aborts the rest.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        for step in &self.steps {
            step(surface)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("steps", &self.steps.len()).finish()
    }
}

/// A draw primitive with its argument names and recognized options.
#[derive(Clone)]
pub struct PlotAction {
    name: &'static str,
    primitive: Primitive,
    positional: &'static [&'static str],
    args: Args,
    defaults: Arc<OptionMap>,
    skip_empty: bool,
}

impl PlotAction {
    pub fn new(
        name: &'static str,
        primitive: Primitive,
        positional: &'static [&'static str],
        defaults: OptionMap,
    ) -> Self {
        PlotAction {
            name,
            primitive,
            positional,
            args: Args::Selected,
            defaults: Arc::new(defaults),
            skip_empty: true,
        }
    }

    /// Pass positional values through instead of selecting them.
    pub fn literal(mut self) -> Self {
        self.args = Args::Literal;
        self
    }

    /// Run even when the data source is empty. Used by axes-style setters,
    /// which never read rows.
    pub fn always(mut self) -> Self {
        self.skip_empty = false;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn positional(&self) -> &'static [&'static str] {
        self.positional
    }

    pub fn defaults(&self) -> &OptionMap {
        &self.defaults
    }

    /// First stage: fix preset-time options.
    pub fn preset(&self, style: OptionMap) -> Preset {
        Preset {
            action: self.clone(),
            style,
            missing: MissingColumn::default(),
        }
    }

    /// Shorthand for `preset(empty).apply(data, option)`.
    pub fn apply(&self, data: &DataSource, option: &OptionMap) -> Result<Action> {
        self.preset(OptionMap::new()).apply(data, option)
    }
}

impl fmt::Debug for PlotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotAction")
            .field("name", &self.name)
            .field("positional", &self.positional)
            .field("args", &self.args)
            .field("skip_empty", &self.skip_empty)
            .finish()
    }
}

/// A plot action with its preset-time options fixed.
#[derive(Clone, Debug)]
pub struct Preset {
    action: PlotAction,
    style: OptionMap,
    missing: MissingColumn,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        self.action.name
    }

    pub fn style(&self) -> &OptionMap {
        &self.style
    }

    /// Policy for selectors naming absent columns.
    pub fn with_missing_column(mut self, policy: MissingColumn) -> Self {
        self.missing = policy;
        self
    }

    /// Second stage: bind data and per-call options.
    pub fn apply(&self, data: &DataSource, option: &OptionMap) -> Result<Action> {
        self.apply_with(data, option, &OptionMap::new())
    }

    /// Like [`Preset::apply`] with call-time keyword options layered on top.
    ///
    /// Precedence, lowest first: defaults, preset, `option`, `kwargs`.
    pub fn apply_with(
        &self,
        data: &DataSource,
        option: &OptionMap,
        kwargs: &OptionMap,
    ) -> Result<Action> {
        let action = &self.action;
        if action.skip_empty && data.is_empty() {
            debug!("{}: empty data source, nothing to draw", action.name);
            return Ok(Action::identity());
        }

        let defaults: &OptionMap = &action.defaults;
        let options = merged([defaults, &self.style, option, kwargs]);
        let entries = flatten(&options);

        let mut steps = Vec::with_capacity(entries.len());
        for entry in &entries {
            let args = action
                .positional
                .iter()
                .map(|&name| -> Result<Arg> {
                    let selector = entry.get(name).cloned().unwrap_or(OptionValue::Null);
                    let given = !selector.is_null();
                    let value = match action.args {
                        Args::Selected => resolve(data, &selector, self.missing)?,
                        Args::Literal => Resolved::Literal(selector),
                    };
                    Ok(Arg { name, value, given })
                })
                .collect::<Result<Vec<_>>>()?;

            let kwargs = defaults
                .iter()
                .map(|(key, default)| (key.clone(), entry.get(key).unwrap_or(default).clone()))
                .collect();

            let call = Call {
                action: action.name,
                data,
                args,
                kwargs,
                missing: self.missing,
            };
            steps.push((action.primitive)(&call)?);
        }

        debug!("{}: {} draw step(s)", action.name, steps.len());
        Ok(Action { steps })
    }
}
