use crate::action::{Call, Draw, PlotAction};
use crate::error::Result;
use crate::style::{self, Family};
use crate::surface::Surface;

fn hist_plotter(call: &Call) -> Result<Draw> {
    let values: Vec<f64> = call
        .numbers("y")?
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.hist(&values, &style)))
}

/// Histogram of the selected series; missing values are skipped.
pub fn hist() -> PlotAction {
    PlotAction::new("hist", hist_plotter, &["y"], style::defaults(Family::Hist).clone())
}
