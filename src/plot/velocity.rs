use crate::action::{Call, Draw, PlotAction};
use crate::error::{PlotError, Result};
use crate::style::{self, Family};
use crate::surface::{Arrows, Surface};

fn velocity_plotter(call: &Call) -> Result<Draw> {
    let x = call.numbers("x")?;
    let u = call.numbers("ex")?;
    let v = call.numbers("ey")?;
    if u.len() != x.len() || v.len() != x.len() {
        return Err(PlotError::selection(format!(
            "'velocity' needs as many components as positions, got x {}, ex {}, ey {}",
            x.len(),
            u.len(),
            v.len()
        )));
    }
    let arrows = Arrows {
        y: vec![0.0; x.len()],
        u,
        v,
        x,
    };
    let style = call.style();

    Ok(Box::new(move |surface: &mut dyn Surface| surface.quiver(&arrows, &style)))
}

/// Vector glyphs `(ex, ey)` anchored on the zero line at each `x`.
pub fn velocity() -> PlotAction {
    PlotAction::new(
        "velocity",
        velocity_plotter,
        &["x", "ex", "ey"],
        style::defaults(Family::Velocity).clone(),
    )
}
