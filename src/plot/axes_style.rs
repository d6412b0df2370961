//! Axes-level setters. They never read rows, so they run on empty data.

use super::{noop, without_nulls};
use crate::action::{Call, Draw, PlotAction};
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use crate::style::{self, Family};
use crate::surface::{Axis, AxisScale, Surface};
use crate::time;
use log::warn;

fn cycler_plotter(call: &Call) -> Result<Draw> {
    let colors: Vec<String> = match call.kw("cycler") {
        OptionValue::Null => return Ok(noop()),
        OptionValue::List(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    PlotError::config(format!("cycler entries must be colours, got {:?}", item))
                })
            })
            .collect::<Result<_>>()?,
        other => {
            return Err(PlotError::config(format!(
                "cycler must be a list of colours, got {:?}",
                other
            )))
        }
    };

    Ok(Box::new(move |surface: &mut dyn Surface| {
        surface.set_prop_cycle(colors.clone())
    }))
}

fn scale_of(call: &Call, key: &str) -> Result<Option<AxisScale>> {
    match call.kw(key) {
        OptionValue::Null => Ok(None),
        OptionValue::Text(name) => AxisScale::parse(name).map(Some),
        other => Err(PlotError::config(format!("'{}' must be a string, got {:?}", key, other))),
    }
}

fn scale_plotter(call: &Call) -> Result<Draw> {
    let xscale = scale_of(call, "xscale")?;
    let yscale = scale_of(call, "yscale")?;

    Ok(Box::new(move |surface: &mut dyn Surface| {
        if let Some(scale) = xscale {
            surface.set_scale(Axis::X, scale)?;
        }
        if let Some(scale) = yscale {
            surface.set_scale(Axis::Y, scale)?;
        }
        Ok(())
    }))
}

fn tick_plotter(call: &Call) -> Result<Draw> {
    let axis = Axis::parse(call.kw_str("axis").unwrap_or("both"))?;
    let style = without_nulls(call.style_without(&["axis"]));

    Ok(Box::new(move |surface: &mut dyn Surface| surface.tick_params(axis, &style)))
}

fn min_max(values: &[f64]) -> Result<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let bounds = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    });
    bounds.ok_or_else(|| PlotError::selection("no finite values to derive limits from"))
}

/// Shared by the x and y limit setters.
///
/// Explicit bounds are forced. An unspecified bound comes from the selected
/// series when one was given, otherwise from the surface's current limit,
/// so successive calls only fill the slots they leave open.
fn limit_plotter(call: &Call, axis: Axis) -> Result<Draw> {
    let (key, selector) = match axis {
        Axis::Y => ("ylim", "y"),
        _ => ("xlim", "x"),
    };

    let requested = match call.kw(key) {
        OptionValue::Null => None,
        OptionValue::List(items) => {
            let bound = |i: usize| items.get(i).map_or(Ok(None), time::limit_bound);
            Some((bound(0)?, bound(1)?))
        }
        other => {
            return Err(PlotError::config(format!(
                "'{}' must be a pair of bounds, got {:?}",
                key, other
            )))
        }
    };

    if requested.is_none() && !call.given(selector) {
        return Ok(noop());
    }

    let fitted = if call.given(selector) {
        match call.numbers(selector).and_then(|values| min_max(&values)) {
            Ok(bounds) => Some(bounds),
            Err(e) => {
                warn!("{}: cannot derive limits from '{}': {}", call.action, selector, e);
                None
            }
        }
    } else {
        None
    };
    let (lower, upper) = requested.unwrap_or((None, None));

    Ok(Box::new(move |surface: &mut dyn Surface| {
        let current = match axis {
            Axis::Y => surface.ylim(),
            _ => surface.xlim(),
        };
        let lo = lower.or(fitted.map(|b| b.0)).unwrap_or(current.0);
        let hi = upper.or(fitted.map(|b| b.1)).unwrap_or(current.1);
        match axis {
            Axis::Y => surface.set_ylim(lo, hi),
            _ => surface.set_xlim(lo, hi),
        }
    }))
}

fn xlim_plotter(call: &Call) -> Result<Draw> {
    limit_plotter(call, Axis::X)
}

fn ylim_plotter(call: &Call) -> Result<Draw> {
    limit_plotter(call, Axis::Y)
}

fn label_plotter(call: &Call) -> Result<Draw> {
    let xlabel = call.kw_str("xlabel").map(str::to_string);
    let ylabel = call.kw_str("ylabel").map(str::to_string);
    let style = without_nulls(call.style_without(&["xlabel", "ylabel"]));

    Ok(Box::new(move |surface: &mut dyn Surface| {
        if let Some(text) = &xlabel {
            surface.set_label(Axis::X, text, &style)?;
        }
        if let Some(text) = &ylabel {
            surface.set_label(Axis::Y, text, &style)?;
        }
        Ok(())
    }))
}

fn grid_plotter(call: &Call) -> Result<Draw> {
    let style = without_nulls(call.style());
    Ok(Box::new(move |surface: &mut dyn Surface| surface.grid(&style)))
}

fn title_plotter(call: &Call) -> Result<Draw> {
    let Some(title) = call.kw_str("title").map(str::to_string) else {
        return Ok(noop());
    };
    let style = without_nulls(call.style_without(&["title"]));

    Ok(Box::new(move |surface: &mut dyn Surface| surface.set_title(&title, &style)))
}

/// Replace the colour cycle with the `cycler` list.
pub fn set_cycler() -> PlotAction {
    PlotAction::new(
        "set_cycler",
        cycler_plotter,
        &[],
        style::defaults(Family::Cycler).clone(),
    )
    .literal()
    .always()
}

/// Apply `xscale` / `yscale` ("linear" or "log").
pub fn axis_scale() -> PlotAction {
    PlotAction::new("axis_scale", scale_plotter, &[], style::defaults(Family::Scale).clone())
        .literal()
        .always()
}

/// Tick parameters for `axis` ("x", "y" or "both").
pub fn set_tick_parameters() -> PlotAction {
    PlotAction::new(
        "set_tick_parameters",
        tick_plotter,
        &[],
        style::defaults(Family::Tick).clone(),
    )
    .literal()
    .always()
}

/// X limits from `xlim` and/or the selected `x` series.
pub fn set_xlim() -> PlotAction {
    PlotAction::new(
        "set_xlim",
        xlim_plotter,
        &["x"],
        style::extended(Family::Limit, &[]),
    )
    .always()
}

/// Y limits from `ylim` and/or the selected `y` series.
pub fn set_ylim() -> PlotAction {
    PlotAction::new(
        "set_ylim",
        ylim_plotter,
        &["y"],
        style::extended(Family::Limit, &[]),
    )
    .always()
}

/// Axis labels from `xlabel` / `ylabel`; absent labels are left alone.
pub fn set_label() -> PlotAction {
    PlotAction::new(
        "set_label",
        label_plotter,
        &[],
        style::extended(
            Family::Label,
            &[("xlabel", OptionValue::Null), ("ylabel", OptionValue::Null)],
        ),
    )
    .literal()
    .always()
}

pub fn set_grid() -> PlotAction {
    PlotAction::new("set_grid", grid_plotter, &[], style::defaults(Family::Grid).clone())
        .literal()
        .always()
}

pub fn set_title() -> PlotAction {
    PlotAction::new(
        "set_title",
        title_plotter,
        &[],
        style::extended(Family::Title, &[("title", OptionValue::Null)]),
    )
    .literal()
    .always()
}
