use crate::action::{Call, Draw, PlotAction};
use crate::error::Result;
use crate::style::{self, Family};
use crate::surface::Surface;

fn line_plotter(call: &Call) -> Result<Draw> {
    let x = call.numbers("x")?;
    let y = call.numbers("y")?;
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.line(&x, &y, &style)))
}

/// Polyline through the selected `x` and `y` series.
pub fn line() -> PlotAction {
    PlotAction::new(
        "line",
        line_plotter,
        &["x", "y"],
        style::defaults(Family::Line).clone(),
    )
}
