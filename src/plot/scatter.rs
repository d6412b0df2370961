use crate::action::{Call, Draw, PlotAction};
use crate::error::Result;
use crate::style::{self, Family};
use crate::surface::{Points, Surface};

fn scatter_plotter(call: &Call) -> Result<Draw> {
    // Optional per-point colour values and marker sizes
    let values = if call.given("c_name") {
        Some(call.numbers("c_name")?)
    } else {
        None
    };
    let sizes = if call.given("s_name") {
        Some(call.numbers("s_name")?)
    } else {
        None
    };

    let points = Points {
        x: call.numbers("x")?,
        y: call.numbers("y")?,
        sizes,
        values,
    };
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.scatter(&points, &style)))
}

/// Point cloud; `c_name` and `s_name` select colour and size columns.
pub fn scatter() -> PlotAction {
    PlotAction::new(
        "scatter",
        scatter_plotter,
        &["x", "y", "c_name", "s_name"],
        style::defaults(Family::Scatter).clone(),
    )
}
