use crate::action::{Call, Draw, PlotAction};
use crate::data::Cell;
use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use crate::select::Resolved;
use crate::style::{self, Family};
use crate::surface::Surface;

fn coordinate(call: &Call, name: &str) -> Result<f64> {
    call.numbers(name)?
        .first()
        .copied()
        .ok_or_else(|| PlotError::config(format!("'text' needs a value for '{}'", name)))
}

fn text_plotter(call: &Call) -> Result<Draw> {
    let x = coordinate(call, "x")?;
    let y = coordinate(call, "y")?;
    let text = match call.arg("text")? {
        Resolved::Literal(OptionValue::Text(s)) => s.clone(),
        Resolved::Literal(OptionValue::Number(v)) => Cell::Number(*v).label(),
        other => {
            return Err(PlotError::config(format!(
                "'text' needs a string for 'text', got {:?}",
                other
            )))
        }
    };
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.text(x, y, &text, &style)))
}

/// Annotation at a fixed data position.
pub fn text() -> PlotAction {
    PlotAction::new(
        "text",
        text_plotter,
        &["x", "y", "text"],
        style::defaults(Family::Text).clone(),
    )
    .literal()
}
