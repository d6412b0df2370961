use crate::action::{Call, Draw, PlotAction};
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use crate::style::{self, Family};
use crate::surface::Surface;

fn baseline(call: &Call, key: &str) -> Result<f64> {
    match call.kw(key) {
        OptionValue::Null => Ok(0.0),
        OptionValue::Number(v) => Ok(*v),
        other => Err(PlotError::config(format!("'{}' must be a number, got {:?}", key, other))),
    }
}

fn vlines_plotter(call: &Call) -> Result<Draw> {
    let x = call.numbers("x")?;
    let ymax = call.numbers("y")?;
    let ymin = vec![baseline(call, "lower")?; x.len()];
    let style = call.style_without(&["lower"]);

    Ok(Box::new(move |surface: &mut dyn Surface| {
        surface.vlines(&x, &ymin, &ymax, &style)
    }))
}

fn hlines_plotter(call: &Call) -> Result<Draw> {
    let y = call.numbers("y")?;
    let xmax = call.numbers("x")?;
    let xmin = vec![baseline(call, "left")?; y.len()];
    let style = call.style_without(&["left"]);

    Ok(Box::new(move |surface: &mut dyn Surface| {
        surface.hlines(&y, &xmin, &xmax, &style)
    }))
}

/// Vertical segments from `lower` (default 0) up to `y` at each `x`.
pub fn vlines() -> PlotAction {
    PlotAction::new(
        "vlines",
        vlines_plotter,
        &["x", "y"],
        style::extended(Family::Rule, &[("lower", OptionValue::Number(0.0))]),
    )
}

/// Horizontal segments from `left` (default 0) out to `x` at each `y`.
pub fn hlines() -> PlotAction {
    PlotAction::new(
        "hlines",
        hlines_plotter,
        &["x", "y"],
        style::extended(Family::Rule, &[("left", OptionValue::Number(0.0))]),
    )
}
