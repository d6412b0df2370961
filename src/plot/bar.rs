use crate::action::{Call, Draw, PlotAction};
use crate::error::Result;
use crate::factor::{self, Agg};
use crate::option::{OptionMap, OptionValue};
use crate::select::Resolved;
use crate::style::{self, Family};
use crate::surface::{Bars, Surface};

// Options consumed here rather than passed to the surface
const BAR_KEYS: &[&str] = &["xfactor", "yfactor", "agg", "norm", "vert", "legend", "color"];

/// Colour of stacked layer `i`: a fixed colour, the i-th entry of a colour
/// list, or the next colour of the surface cycle.
fn layer_color(colors: &OptionValue, i: usize, surface: &mut dyn Surface) -> OptionValue {
    match colors {
        OptionValue::Text(_) => colors.clone(),
        OptionValue::List(items) if !items.is_empty() => {
            items.get(i).or_else(|| items.last()).cloned().unwrap_or(OptionValue::Null)
        }
        _ => OptionValue::Text(surface.next_color()),
    }
}

/// Stack `layers` (one value per category each) and build the draw step.
fn stacked_bars(
    call: &Call,
    categories: Vec<String>,
    names: Vec<String>,
    mut layers: Vec<Vec<f64>>,
) -> Result<Draw> {
    if call.kw_bool("norm").unwrap_or(false) {
        factor::normalize(&mut layers);
    }
    let offsets = factor::stack_offsets(&layers);

    let horizontal = !call.kw_bool("vert").unwrap_or(true);
    let width = call.kw_f64("width").unwrap_or(0.8);
    let positions: Vec<f64> = (0..categories.len()).map(|i| i as f64).collect();

    let series: Vec<Bars> = layers
        .into_iter()
        .zip(offsets)
        .zip(names)
        .map(|((heights, bottoms), name)| Bars {
            positions: positions.clone(),
            heights,
            bottoms,
            width,
            horizontal,
            tick_labels: categories.clone(),
            label: Some(name),
        })
        .collect();

    let legend = call.kw_bool("legend").unwrap_or(true) && series.len() > 1;
    let colors = call.kw("color").clone();
    let style = call.style_without(BAR_KEYS);

    Ok(Box::new(move |surface: &mut dyn Surface| {
        for (i, bars) in series.iter().enumerate() {
            let mut layer_style = style.clone();
            layer_style.insert("color".to_string(), layer_color(&colors, i, surface));
            surface.bar(bars, &layer_style)?;
        }
        if legend {
            surface.legend(&OptionMap::new())?;
        }
        Ok(())
    }))
}

fn bar_plotter(call: &Call) -> Result<Draw> {
    let factor = call.row_series("x")?;
    let columns = call
        .series_list("y")?
        .into_iter()
        .map(|column| column.aligned_with(call.data, "y"))
        .collect::<Result<Vec<_>>>()?;
    let agg = Agg::parse(call.kw_str("agg").unwrap_or("sum"))?;

    let categories = factor::categories(&factor, call.kw("xfactor").as_list());
    let groups = factor::group_rows(&factor, &categories);

    let layers = columns
        .iter()
        .map(|column| -> Result<Vec<f64>> {
            Ok(factor::aggregate(&column.numbers()?, &groups, agg))
        })
        .collect::<Result<Vec<_>>>()?;
    let names = columns.into_iter().map(|c| c.name).collect();

    stacked_bars(call, categories, names, layers)
}

fn factor_bar_plotter(call: &Call) -> Result<Draw> {
    // A list of value columns stacks them like `bar`
    if let Resolved::Literal(OptionValue::List(_)) = call.arg("y")? {
        return bar_plotter(call);
    }

    let x_factor = call.row_series("x")?;
    let y_factor = call.row_series("y")?;

    let x_categories = factor::categories(&x_factor, call.kw("xfactor").as_list());
    let y_categories = factor::categories(&y_factor, call.kw("yfactor").as_list());
    let groups = factor::group_rows_by_pair(&x_factor, &x_categories, &y_factor, &y_categories);

    // Aggregate a value column when one is given, otherwise count rows
    let layers: Vec<Vec<f64>> = if call.given("value") {
        let values = call.row_series("value")?.numbers()?;
        let agg = Agg::parse(call.kw_str("agg").unwrap_or("sum"))?;
        groups
            .iter()
            .map(|layer| factor::aggregate(&values, layer, agg))
            .collect()
    } else {
        groups
            .iter()
            .map(|layer| layer.iter().map(|rows| rows.len() as f64).collect())
            .collect()
    };

    stacked_bars(call, x_categories, y_categories, layers)
}

fn bar_options() -> OptionMap {
    style::extended(
        Family::Bar,
        &[
            ("xfactor", OptionValue::Null),
            ("agg", OptionValue::from("sum")),
            ("norm", OptionValue::Bool(false)),
            ("vert", OptionValue::Bool(true)),
            ("legend", OptionValue::Bool(true)),
        ],
    )
}

/// Bars of `y` aggregated per category of the factor `x`. A list of columns
/// for `y` stacks one layer per column.
pub fn bar() -> PlotAction {
    PlotAction::new("bar", bar_plotter, &["x", "y"], bar_options())
}

/// Bars per category of `x`, stacked by the categories of `y`. Heights count
/// rows, or aggregate the `value` column when it is given.
pub fn factor_bar() -> PlotAction {
    let mut defaults = bar_options();
    defaults.insert("yfactor".to_string(), OptionValue::Null);
    PlotAction::new("factor_bar", factor_bar_plotter, &["x", "y", "value"], defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{labels, numbers, DataSource};
    use crate::error::PlotError;
    use crate::option::{list, options};
    use crate::surface::{DrawCall, RecordingSurface};

    fn make_data() -> DataSource {
        DataSource::from_columns(vec![
            ("site", labels(&["X", "Y", "X", "Y"])),
            ("kind", labels(&["p", "p", "q", "p"])),
            ("a", numbers(&[1.0, 2.0, 3.0, 4.0])),
            ("b", numbers(&[10.0, 20.0, 30.0, 40.0])),
        ])
        .unwrap()
    }

    fn drawn_bars(surface: &RecordingSurface) -> Vec<Bars> {
        surface
            .calls()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Bar { bars, .. } => Some(bars.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bar_sums_per_category() {
        let mut surface = RecordingSurface::new();
        bar()
            .apply(&make_data(), &options([("x", "site".into()), ("y", "a".into())]))
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].tick_labels, vec!["X", "Y"]);
        assert_eq!(bars[0].heights, vec![4.0, 6.0]);
        assert!(surface.state().legend.is_none());
    }

    #[test]
    fn test_bar_stacks_column_list() {
        let mut surface = RecordingSurface::new();
        bar()
            .apply(
                &make_data(),
                &options([("x", "site".into()), ("y", list(["a", "b"]))]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars.len(), 2);
        // top of the second layer is a + b at each category
        assert_eq!(bars[1].bottoms, vec![4.0, 6.0]);
        assert_eq!(bars[1].tops(), vec![44.0, 66.0]);
        assert!(surface.state().legend.is_some());
    }

    #[test]
    fn test_bar_mean_normalized_horizontal() {
        let mut surface = RecordingSurface::new();
        bar()
            .apply(
                &make_data(),
                &options([
                    ("x", "site".into()),
                    ("y", list(["a", "a"])),
                    ("agg", "mean".into()),
                    ("norm", true.into()),
                    ("vert", false.into()),
                ]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert!(bars[0].horizontal);
        assert_eq!(bars[0].heights, vec![0.5, 0.5]);
        assert_eq!(bars[1].tops(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_bar_layer_colors() {
        let mut surface = RecordingSurface::new();
        bar()
            .apply(
                &make_data(),
                &options([
                    ("x", "site".into()),
                    ("y", list(["a", "b"])),
                    ("color", list(["red", "blue"])),
                ]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let colors: Vec<OptionValue> = surface
            .calls()
            .iter()
            .map(|c| c.style()["color"].clone())
            .collect();
        assert_eq!(colors, vec![OptionValue::from("red"), OptionValue::from("blue")]);
    }

    #[test]
    fn test_bar_explicit_categories() {
        let mut surface = RecordingSurface::new();
        bar()
            .apply(
                &make_data(),
                &options([
                    ("x", "site".into()),
                    ("y", "a".into()),
                    ("xfactor", list(["Y", "Z"])),
                ]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars[0].tick_labels, vec!["Y", "Z"]);
        assert_eq!(bars[0].heights, vec![6.0, 0.0]);
    }

    #[test]
    fn test_factor_bar_counts() {
        let mut surface = RecordingSurface::new();
        factor_bar()
            .apply(&make_data(), &options([("x", "site".into()), ("y", "kind".into())]))
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label.as_deref(), Some("p"));
        assert_eq!(bars[0].heights, vec![1.0, 2.0]);
        assert_eq!(bars[1].heights, vec![1.0, 0.0]);
        assert_eq!(bars[1].bottoms, vec![1.0, 2.0]);
    }

    #[test]
    fn test_factor_bar_value_column() {
        let mut surface = RecordingSurface::new();
        factor_bar()
            .apply(
                &make_data(),
                &options([("x", "site".into()), ("y", "kind".into()), ("value", "b".into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars[0].heights, vec![10.0, 60.0]);
        assert_eq!(bars[1].heights, vec![30.0, 0.0]);
    }

    #[test]
    fn test_bar_rejects_literal_factor() {
        let result = bar().apply(&make_data(), &options([("x", 1.into()), ("y", "a".into())]));
        assert!(matches!(result, Err(PlotError::Selection(_))));
    }

    #[test]
    fn test_factor_bar_literal_value_is_selection_error() {
        let result = factor_bar().apply(
            &make_data(),
            &options([("x", "site".into()), ("y", "kind".into()), ("value", 2.0.into())]),
        );
        assert!(matches!(result, Err(PlotError::Selection(_))));
    }

    #[test]
    fn test_bar_short_function_column_is_selection_error() {
        let short = OptionValue::func(|_: &DataSource| numbers(&[1.0, 2.0]));
        let result = bar().apply(&make_data(), &options([("x", "site".into()), ("y", short)]));
        assert!(matches!(result, Err(PlotError::Selection(_))));
    }

    #[test]
    fn test_factor_bar_column_list_stacks_like_bar() {
        let mut surface = RecordingSurface::new();
        factor_bar()
            .apply(
                &make_data(),
                &options([("x", "site".into()), ("y", list(["a", "b"]))]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();

        let bars = drawn_bars(&surface);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label.as_deref(), Some("a"));
        assert_eq!(bars[1].tops(), vec![44.0, 66.0]);
    }
}
