//! Concrete plot actions built on the plot-action factory.

mod axes_style;
mod band;
mod bar;
mod boxplot;
mod fill;
mod hist;
mod line;
mod scatter;
mod text;
mod velocity;
mod vhlines;

pub use axes_style::{
    axis_scale, set_cycler, set_grid, set_label, set_tick_parameters, set_title, set_xlim,
    set_ylim,
};
pub use band::{xband, yband};
pub use bar::{bar, factor_bar};
pub use boxplot::{box_plot, factor_box, factor_violin, violin};
pub use fill::{fill, fill_between};
pub use hist::hist;
pub use line::line;
pub use scatter::scatter;
pub use text::text;
pub use velocity::velocity;
pub use vhlines::{hlines, vlines};

use crate::action::{Draw, PlotAction};
use crate::option::{OptionMap, OptionValue};
use crate::surface::Surface;

/// Names accepted by [`lookup`].
pub const NAMES: &[&str] = &[
    "line",
    "scatter",
    "fill",
    "fill_between",
    "xband",
    "yband",
    "vlines",
    "hlines",
    "bar",
    "factor_bar",
    "box",
    "factor_box",
    "violin",
    "factor_violin",
    "hist",
    "velocity",
    "text",
    "set_cycler",
    "axis_scale",
    "set_tick_parameters",
    "set_xlim",
    "set_ylim",
    "set_label",
    "set_grid",
    "set_title",
];

/// Plot action registered under `name`.
pub fn lookup(name: &str) -> Option<PlotAction> {
    let action = match name {
        "line" => line(),
        "scatter" => scatter(),
        "fill" => fill(),
        "fill_between" => fill_between(),
        "xband" => xband(),
        "yband" => yband(),
        "vlines" => vlines(),
        "hlines" => hlines(),
        "bar" => bar(),
        "factor_bar" => factor_bar(),
        "box" => box_plot(),
        "factor_box" => factor_box(),
        "violin" => violin(),
        "factor_violin" => factor_violin(),
        "hist" => hist(),
        "velocity" | "quiver" => velocity(),
        "text" => text(),
        "set_cycler" => set_cycler(),
        "axis_scale" => axis_scale(),
        "set_tick_parameters" => set_tick_parameters(),
        "set_xlim" => set_xlim(),
        "set_ylim" => set_ylim(),
        "set_label" => set_label(),
        "set_grid" => set_grid(),
        "set_title" => set_title(),
        _ => return None,
    };
    Some(action)
}

pub(crate) fn noop() -> Draw {
    Box::new(|_: &mut dyn Surface| Ok(()))
}

pub(crate) fn without_nulls(style: OptionMap) -> OptionMap {
    style
        .into_iter()
        .filter(|(_, v)| !matches!(v, OptionValue::Null))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{numbers, DataSource};
    use crate::option::{each, list, options};
    use crate::surface::{DrawCall, RecordingSurface};

    fn make_data() -> DataSource {
        DataSource::from_columns(vec![
            ("x", numbers(&[0.0, 1.0, 2.0])),
            ("y", numbers(&[0.0, 1.0, 4.0])),
            ("z", numbers(&[2.0, 2.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_every_name() {
        for name in NAMES {
            let action = lookup(name).unwrap_or_else(|| panic!("{} not registered", name));
            if *name != "box" {
                assert_eq!(action.name(), *name);
            }
        }
        assert!(lookup("pie").is_none());
    }

    #[test]
    fn test_every_chart_primitive_skips_empty_data() {
        let empty = DataSource::empty();
        for name in NAMES.iter().filter(|n| !n.starts_with("set_") && **n != "axis_scale") {
            let action = lookup(name).unwrap();
            let built = action.apply(&empty, &options([("y", "missing".into())])).unwrap();
            let mut surface = RecordingSurface::new();
            built.draw(&mut surface).unwrap();
            assert_eq!(surface, RecordingSurface::new(), "{} drew on empty data", name);
        }
    }

    #[test]
    fn test_scatter_then_line_order() {
        let data = make_data();
        let option = options([("x", "x".into()), ("y", "y".into())]);
        let composed = scatter()
            .apply(&data, &option)
            .unwrap()
            .then(line().apply(&data, &option).unwrap());

        let mut surface = RecordingSurface::new();
        composed.draw(&mut surface).unwrap();

        assert_eq!(surface.kinds(), vec!["scatter", "line"]);
        match &surface.calls()[0] {
            DrawCall::Scatter { points, .. } => {
                assert_eq!(points.x, vec![0.0, 1.0, 2.0]);
                assert_eq!(points.y, vec![0.0, 1.0, 4.0]);
            }
            other => panic!("unexpected call {:?}", other),
        }
        match &surface.calls()[1] {
            DrawCall::Line { x, y, .. } => {
                assert_eq!(x, &vec![0.0, 1.0, 2.0]);
                assert_eq!(y, &vec![0.0, 1.0, 4.0]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_vectorized_line_styling() {
        let data = make_data();
        let action = line()
            .preset(options([("color", each(["red", "blue"]))]))
            .apply(&data, &options([("x", "x".into()), ("y", each(["y", "z"]))]))
            .unwrap();
        assert_eq!(action.len(), 2);

        let mut surface = RecordingSurface::new();
        action.draw(&mut surface).unwrap();
        let drawn: Vec<(Vec<f64>, OptionValue)> = surface
            .calls()
            .iter()
            .map(|call| match call {
                DrawCall::Line { y, style, .. } => (y.clone(), style["color"].clone()),
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(
            drawn,
            vec![
                (vec![0.0, 1.0, 4.0], OptionValue::from("red")),
                (vec![2.0, 2.0, 2.0], OptionValue::from("blue")),
            ]
        );
    }

    #[test]
    fn test_scatter_colour_and_size_columns() {
        let data = make_data();
        let mut surface = RecordingSurface::new();
        scatter()
            .apply(
                &data,
                &options([("x", "x".into()), ("y", "y".into()), ("s_name", "z".into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        match &surface.calls()[0] {
            DrawCall::Scatter { points, .. } => {
                assert_eq!(points.sizes, Some(vec![2.0, 2.0, 2.0]));
                assert!(points.values.is_none());
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_fill_between_constant_baseline() {
        let data = make_data();
        let mut surface = RecordingSurface::new();
        fill_between()
            .apply(
                &data,
                &options([("x", "x".into()), ("y", "y".into()), ("y2", 1.into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        match &surface.calls()[0] {
            DrawCall::FillBetween { y2, style, .. } => {
                assert_eq!(y2, &vec![1.0, 1.0, 1.0]);
                assert_eq!(style["color"], OptionValue::from("green"));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_bands() {
        let data = make_data();
        let mut surface = RecordingSurface::new();
        xband()
            .apply(&data, &options([("ypos", each([list([1.0, 2.0]), 3.into()]))]))
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        yband()
            .apply(&data, &options([("xpos", list(Vec::<f64>::new()))]))
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        assert_eq!(surface.kinds(), vec!["axhspan", "axhline"]);
        assert!(!surface.calls()[1].style().contains_key("hatch"));
    }

    #[test]
    fn test_vlines_from_lower() {
        let data = make_data();
        let mut surface = RecordingSurface::new();
        vlines()
            .apply(
                &data,
                &options([("x", "x".into()), ("y", "y".into()), ("lower", (-1).into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        match &surface.calls()[0] {
            DrawCall::VLines { ymin, ymax, .. } => {
                assert_eq!(ymin, &vec![-1.0, -1.0, -1.0]);
                assert_eq!(ymax, &vec![0.0, 1.0, 4.0]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_velocity_component_count_mismatch() {
        let result = velocity().apply(
            &make_data(),
            &options([("x", "x".into()), ("ex", 1.into()), ("ey", "y".into())]),
        );
        assert!(matches!(result, Err(crate::error::PlotError::Selection(_))));
    }

    #[test]
    fn test_velocity_and_text() {
        let data = make_data();
        let mut surface = RecordingSurface::new();
        velocity()
            .apply(
                &data,
                &options([("x", "x".into()), ("ex", "z".into()), ("ey", "y".into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        text()
            .apply(
                &data,
                &options([("x", 1.into()), ("y", 2.into()), ("text", "peak".into())]),
            )
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        assert_eq!(surface.kinds(), vec!["quiver", "text"]);
        match &surface.calls()[1] {
            DrawCall::Text { x, y, text, .. } => {
                assert_eq!((*x, *y), (1.0, 2.0));
                assert_eq!(text, "peak");
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_hist_skips_missing() {
        let data = DataSource::from_columns(vec![("v", numbers(&[1.0, f64::NAN, 2.0]))]).unwrap();
        let mut surface = RecordingSurface::new();
        hist()
            .apply(&data, &options([("y", "v".into()), ("bins", 4.into())]))
            .unwrap()
            .draw(&mut surface)
            .unwrap();
        match &surface.calls()[0] {
            DrawCall::Hist { values, style } => {
                assert_eq!(values, &vec![1.0, 2.0]);
                assert_eq!(style["bins"], OptionValue::Number(4.0));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }
}
