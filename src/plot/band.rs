use crate::action::{Call, Draw, PlotAction};
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use crate::style::{self, Family};
use crate::surface::Surface;
use log::warn;

const RULE_KEYS: &[&str] = &["color", "linestyle", "linewidth", "alpha"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Band {
    Nothing,
    Rule(f64),
    Span(f64, f64),
}

fn band_position(call: &Call, key: &str) -> Result<Band> {
    let number = |item: &OptionValue| {
        item.as_f64().ok_or_else(|| {
            PlotError::config(format!("'{}' expects numeric positions, got {:?}", key, item))
        })
    };

    match call.kw(key) {
        OptionValue::Null => Ok(Band::Nothing),
        OptionValue::Number(v) => Ok(Band::Rule(*v)),
        OptionValue::List(items) => match items.as_slice() {
            [] => {
                warn!("{}: '{}' must hold at least one position", call.action, key);
                Ok(Band::Nothing)
            }
            [single] => Ok(Band::Rule(number(single)?)),
            [lo, hi, ..] => Ok(Band::Span(number(lo)?, number(hi)?)),
        },
        other => Err(PlotError::config(format!(
            "'{}' must be a number or a pair, got {:?}",
            key, other
        ))),
    }
}

fn xband_plotter(call: &Call) -> Result<Draw> {
    let band = band_position(call, "ypos")?;
    let rule_style = call.style_only(RULE_KEYS);
    let span_style = call.style_without(&["ypos"]);

    Ok(Box::new(move |surface: &mut dyn Surface| match band {
        Band::Nothing => Ok(()),
        Band::Rule(y) => surface.axhline(y, &rule_style),
        Band::Span(y0, y1) => surface.axhspan(y0, y1, &span_style),
    }))
}

fn yband_plotter(call: &Call) -> Result<Draw> {
    let band = band_position(call, "xpos")?;
    let rule_style = call.style_only(RULE_KEYS);
    let span_style = call.style_without(&["xpos"]);

    Ok(Box::new(move |surface: &mut dyn Surface| match band {
        Band::Nothing => Ok(()),
        Band::Rule(x) => surface.axvline(x, &rule_style),
        Band::Span(x0, x1) => surface.axvspan(x0, x1, &span_style),
    }))
}

/// Horizontal band across the axes between `ypos[0]` and `ypos[1]`, or a
/// horizontal rule when `ypos` is a single number.
pub fn xband() -> PlotAction {
    PlotAction::new(
        "xband",
        xband_plotter,
        &[],
        style::extended(Family::Fill, &[("ypos", OptionValue::Null)]),
    )
    .literal()
}

/// Vertical band between `xpos[0]` and `xpos[1]`, or a vertical rule.
pub fn yband() -> PlotAction {
    PlotAction::new(
        "yband",
        yband_plotter,
        &[],
        style::extended(Family::Fill, &[("xpos", OptionValue::Null)]),
    )
    .literal()
}
