use crate::action::{Call, Draw, PlotAction};
use crate::error::Result;
use crate::factor;
use crate::option::{OptionMap, OptionValue};
use crate::style::{self, Family};
use crate::surface::{Groups, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Box,
    Violin,
}

fn finite(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().filter(|v| v.is_finite()).collect()
}

fn positions(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

/// One group per selected column.
fn column_groups(call: &Call) -> Result<Groups> {
    let columns = call.series_list("y")?;
    let values = columns
        .iter()
        .map(|c| c.numbers().map(finite))
        .collect::<Result<Vec<_>>>()?;

    Ok(Groups {
        labels: columns.into_iter().map(|c| c.name).collect(),
        positions: positions(values.len()),
        values,
    })
}

/// One group per category of the factor `x`.
fn factor_groups(call: &Call) -> Result<Groups> {
    let factor_column = call.row_series("x")?;
    let values = call.row_series("y")?.numbers()?;

    let categories = factor::categories(&factor_column, call.kw("xfactor").as_list());
    let grouped: Vec<Vec<f64>> = factor::group_rows(&factor_column, &categories)
        .iter()
        .map(|rows| finite(rows.iter().filter_map(|&i| values.get(i).copied()).collect()))
        .collect();

    Ok(Groups {
        positions: positions(grouped.len()),
        labels: categories,
        values: grouped,
    })
}

fn glyph_draw(glyph: Glyph, groups: Groups, style: OptionMap) -> Draw {
    Box::new(move |surface: &mut dyn Surface| match glyph {
        Glyph::Box => surface.boxplot(&groups, &style),
        Glyph::Violin => surface.violin(&groups, &style),
    })
}

fn box_plotter(call: &Call) -> Result<Draw> {
    Ok(glyph_draw(Glyph::Box, column_groups(call)?, call.style()))
}

fn factor_box_plotter(call: &Call) -> Result<Draw> {
    Ok(glyph_draw(Glyph::Box, factor_groups(call)?, call.style_without(&["xfactor"])))
}

fn violin_plotter(call: &Call) -> Result<Draw> {
    Ok(glyph_draw(Glyph::Violin, column_groups(call)?, call.style()))
}

fn factor_violin_plotter(call: &Call) -> Result<Draw> {
    Ok(glyph_draw(Glyph::Violin, factor_groups(call)?, call.style_without(&["xfactor"])))
}

fn with_factor(family: Family) -> OptionMap {
    style::extended(family, &[("xfactor", OptionValue::Null)])
}

/// Box-and-whisker per column of `y` (a column or a list of columns).
pub fn box_plot() -> PlotAction {
    PlotAction::new("box", box_plotter, &["y"], style::defaults(Family::Box).clone())
}

/// Box-and-whisker of `y` per category of `x`.
pub fn factor_box() -> PlotAction {
    PlotAction::new("factor_box", factor_box_plotter, &["x", "y"], with_factor(Family::Box))
}

/// Violin per column of `y`.
pub fn violin() -> PlotAction {
    PlotAction::new("violin", violin_plotter, &["y"], style::defaults(Family::Violin).clone())
}

/// Violin of `y` per category of `x`.
pub fn factor_violin() -> PlotAction {
    PlotAction::new(
        "factor_violin",
        factor_violin_plotter,
        &["x", "y"],
        with_factor(Family::Violin),
    )
}
