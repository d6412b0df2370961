use crate::action::{Call, Draw, PlotAction};
use crate::error::{PlotError, Result};
use crate::style::{self, Family};
use crate::surface::Surface;

fn fill_plotter(call: &Call) -> Result<Draw> {
    let x = call.numbers("x")?;
    let y = call.numbers("y")?;
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.fill(&x, &y, &style)))
}

fn fill_between_plotter(call: &Call) -> Result<Draw> {
    let x = call.numbers("x")?;
    let y = call.numbers("y")?;

    // Second boundary: a column, a constant, or the zero baseline
    let y2 = if call.given("y2") {
        match call.numbers("y2")?.as_slice() {
            [constant] => vec![*constant; x.len()],
            values if values.len() == x.len() => values.to_vec(),
            values => {
                return Err(PlotError::selection(format!(
                    "'y2' has {} values, expected 1 or {}",
                    values.len(),
                    x.len()
                )))
            }
        }
    } else {
        vec![0.0; x.len()]
    };
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| {
        surface.fill_between(&x, &y, &y2, &style)
    }))
}

/// Closed polygon through `(x, y)`.
pub fn fill() -> PlotAction {
    PlotAction::new("fill", fill_plotter, &["x", "y"], style::defaults(Family::Fill).clone())
}

/// Area between `y` and `y2` (default 0).
pub fn fill_between() -> PlotAction {
    PlotAction::new(
        "fill_between",
        fill_between_plotter,
        &["x", "y", "y2"],
        style::defaults(Family::Fill).clone(),
    )
}
