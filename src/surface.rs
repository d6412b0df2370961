//! The drawing surface capability and an in-memory recording implementation.
//!
//! Every primitive receives the keyword table of its style family; the
//! surface decides how to interpret it. [`RecordingSurface`] keeps each
//! call together with the axes state so a figure can be inspected in tests
//! or rasterized later by [`crate::render`].

use crate::color::DEFAULT_CYCLE;
use crate::error::{PlotError, Result};
use crate::option::OptionMap;
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Both,
}

impl Axis {
    pub fn parse(name: &str) -> Result<Axis> {
        match name {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "both" => Ok(Axis::Both),
            other => Err(PlotError::config(format!("unknown axis '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

impl AxisScale {
    pub fn parse(name: &str) -> Result<AxisScale> {
        match name {
            "linear" => Ok(AxisScale::Linear),
            "log" => Ok(AxisScale::Log),
            other => Err(PlotError::config(format!("unknown axis scale '{}'", other))),
        }
    }
}

/// Scatter input. `sizes` and `values` are optional per-point marker sizes
/// and colour values.
#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub sizes: Option<Vec<f64>>,
    pub values: Option<Vec<f64>>,
}

/// One bar series. Bars start at `bottoms` and extend by `heights`; for
/// horizontal bars positions run along y and heights along x.
#[derive(Debug, Clone, PartialEq)]
pub struct Bars {
    pub positions: Vec<f64>,
    pub heights: Vec<f64>,
    pub bottoms: Vec<f64>,
    pub width: f64,
    pub horizontal: bool,
    pub tick_labels: Vec<String>,
    pub label: Option<String>,
}

impl Bars {
    /// End of each bar (`bottom + height`).
    pub fn tops(&self) -> Vec<f64> {
        self.bottoms
            .iter()
            .zip(&self.heights)
            .map(|(b, h)| b + h)
            .collect()
    }
}

/// Samples grouped by category, drawn side by side (box and violin).
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub positions: Vec<f64>,
}

/// Vector glyphs anchored at `(x, y)` with components `(u, v)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrows {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

/// Operations a plot action may perform on an axes-like target.
pub trait Surface {
    fn line(&mut self, x: &[f64], y: &[f64], style: &OptionMap) -> Result<()>;
    fn scatter(&mut self, points: &Points, style: &OptionMap) -> Result<()>;
    /// Filled polygon.
    fn fill(&mut self, x: &[f64], y: &[f64], style: &OptionMap) -> Result<()>;
    fn fill_between(&mut self, x: &[f64], y1: &[f64], y2: &[f64], style: &OptionMap) -> Result<()>;
    fn vlines(&mut self, x: &[f64], ymin: &[f64], ymax: &[f64], style: &OptionMap) -> Result<()>;
    fn hlines(&mut self, y: &[f64], xmin: &[f64], xmax: &[f64], style: &OptionMap) -> Result<()>;
    /// Vertical rule spanning the whole axes.
    fn axvline(&mut self, x: f64, style: &OptionMap) -> Result<()>;
    fn axhline(&mut self, y: f64, style: &OptionMap) -> Result<()>;
    /// Vertical band spanning the whole axes height.
    fn axvspan(&mut self, x0: f64, x1: f64, style: &OptionMap) -> Result<()>;
    fn axhspan(&mut self, y0: f64, y1: f64, style: &OptionMap) -> Result<()>;
    fn bar(&mut self, bars: &Bars, style: &OptionMap) -> Result<()>;
    fn boxplot(&mut self, groups: &Groups, style: &OptionMap) -> Result<()>;
    fn violin(&mut self, groups: &Groups, style: &OptionMap) -> Result<()>;
    fn hist(&mut self, values: &[f64], style: &OptionMap) -> Result<()>;
    fn quiver(&mut self, arrows: &Arrows, style: &OptionMap) -> Result<()>;
    fn text(&mut self, x: f64, y: f64, text: &str, style: &OptionMap) -> Result<()>;

    /// Current x limits, explicit or autoscaled from the data drawn so far.
    fn xlim(&self) -> (f64, f64);
    fn set_xlim(&mut self, lo: f64, hi: f64) -> Result<()>;
    fn ylim(&self) -> (f64, f64);
    fn set_ylim(&mut self, lo: f64, hi: f64) -> Result<()>;

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) -> Result<()>;
    fn tick_params(&mut self, axis: Axis, style: &OptionMap) -> Result<()>;
    fn set_label(&mut self, axis: Axis, text: &str, style: &OptionMap) -> Result<()>;
    fn grid(&mut self, style: &OptionMap) -> Result<()>;
    fn legend(&mut self, style: &OptionMap) -> Result<()>;
    fn set_title(&mut self, title: &str, style: &OptionMap) -> Result<()>;

    /// Replace the colour cycle used for series without an explicit colour.
    fn set_prop_cycle(&mut self, colors: Vec<String>) -> Result<()>;
    fn next_color(&mut self) -> String;

    /// Secondary axes sharing the x axis of `self`.
    fn twin(&self) -> Self
    where
        Self: Sized;
}

/// A primitive call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line { x: Vec<f64>, y: Vec<f64>, style: OptionMap },
    Scatter { points: Points, style: OptionMap },
    Fill { x: Vec<f64>, y: Vec<f64>, style: OptionMap },
    FillBetween { x: Vec<f64>, y1: Vec<f64>, y2: Vec<f64>, style: OptionMap },
    VLines { x: Vec<f64>, ymin: Vec<f64>, ymax: Vec<f64>, style: OptionMap },
    HLines { y: Vec<f64>, xmin: Vec<f64>, xmax: Vec<f64>, style: OptionMap },
    AxVLine { x: f64, style: OptionMap },
    AxHLine { y: f64, style: OptionMap },
    AxVSpan { x0: f64, x1: f64, style: OptionMap },
    AxHSpan { y0: f64, y1: f64, style: OptionMap },
    Bar { bars: Bars, style: OptionMap },
    Box { groups: Groups, style: OptionMap },
    Violin { groups: Groups, style: OptionMap },
    Hist { values: Vec<f64>, style: OptionMap },
    Quiver { arrows: Arrows, style: OptionMap },
    Text { x: f64, y: f64, text: String, style: OptionMap },
}

impl DrawCall {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCall::Line { .. } => "line",
            DrawCall::Scatter { .. } => "scatter",
            DrawCall::Fill { .. } => "fill",
            DrawCall::FillBetween { .. } => "fill_between",
            DrawCall::VLines { .. } => "vlines",
            DrawCall::HLines { .. } => "hlines",
            DrawCall::AxVLine { .. } => "axvline",
            DrawCall::AxHLine { .. } => "axhline",
            DrawCall::AxVSpan { .. } => "axvspan",
            DrawCall::AxHSpan { .. } => "axhspan",
            DrawCall::Bar { .. } => "bar",
            DrawCall::Box { .. } => "boxplot",
            DrawCall::Violin { .. } => "violin",
            DrawCall::Hist { .. } => "hist",
            DrawCall::Quiver { .. } => "quiver",
            DrawCall::Text { .. } => "text",
        }
    }

    pub fn style(&self) -> &OptionMap {
        match self {
            DrawCall::Line { style, .. }
            | DrawCall::Scatter { style, .. }
            | DrawCall::Fill { style, .. }
            | DrawCall::FillBetween { style, .. }
            | DrawCall::VLines { style, .. }
            | DrawCall::HLines { style, .. }
            | DrawCall::AxVLine { style, .. }
            | DrawCall::AxHLine { style, .. }
            | DrawCall::AxVSpan { style, .. }
            | DrawCall::AxHSpan { style, .. }
            | DrawCall::Bar { style, .. }
            | DrawCall::Box { style, .. }
            | DrawCall::Violin { style, .. }
            | DrawCall::Hist { style, .. }
            | DrawCall::Quiver { style, .. }
            | DrawCall::Text { style, .. } => style,
        }
    }
}

/// Axes-level settings recorded by [`RecordingSurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxesState {
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xscale: AxisScale,
    pub yscale: AxisScale,
    pub xlabel: Option<(String, OptionMap)>,
    pub ylabel: Option<(String, OptionMap)>,
    /// Tick parameter calls in the order they were made.
    pub ticks: Vec<(Axis, OptionMap)>,
    pub grid: Option<OptionMap>,
    pub legend: Option<OptionMap>,
    pub title: Option<(String, OptionMap)>,
    pub cycle: Vec<String>,
}

/// Running min/max of finite values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Extent(Option<(f64, f64)>);

impl Extent {
    fn include(&mut self, values: &[f64]) {
        for &v in values.iter().filter(|v| v.is_finite()) {
            self.0 = Some(match self.0 {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }

    // 5% padding, or +-1 around a single value.
    fn padded(&self) -> (f64, f64) {
        match self.0 {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
            Some((lo, hi)) => {
                let padding = (hi - lo) * 0.05;
                (lo - padding, hi + padding)
            }
        }
    }
}

/// In-memory surface recording every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    state: AxesState,
    x_extent: Extent,
    y_extent: Extent,
    cycle_pos: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn state(&self) -> &AxesState {
        &self.state
    }

    /// Kinds of the recorded calls, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls.iter().map(DrawCall::kind).collect()
    }

    fn record(&mut self, call: DrawCall, xs: &[f64], ys: &[f64]) {
        self.x_extent.include(xs);
        self.y_extent.include(ys);
        self.calls.push(call);
    }
}

fn check_lengths(primitive: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(PlotError::draw(
            primitive,
            format!("series lengths differ ({} vs {})", a.len(), b.len()),
        ));
    }
    Ok(())
}

fn check_limits(lo: f64, hi: f64) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(PlotError::draw("limits", format!("limits must be finite, got ({}, {})", lo, hi)));
    }
    Ok(())
}

fn group_extent(groups: &Groups) -> (Vec<f64>, Vec<f64>) {
    let xs = groups
        .positions
        .iter()
        .flat_map(|p| [p - 0.5, p + 0.5])
        .collect();
    let ys = groups.values.iter().flatten().copied().collect();
    (xs, ys)
}

impl Surface for RecordingSurface {
    fn line(&mut self, x: &[f64], y: &[f64], style: &OptionMap) -> Result<()> {
        check_lengths("line", x, y)?;
        let call = DrawCall::Line { x: x.to_vec(), y: y.to_vec(), style: style.clone() };
        self.record(call, x, y);
        Ok(())
    }

    fn scatter(&mut self, points: &Points, style: &OptionMap) -> Result<()> {
        check_lengths("scatter", &points.x, &points.y)?;
        let call = DrawCall::Scatter { points: points.clone(), style: style.clone() };
        self.record(call, &points.x, &points.y);
        Ok(())
    }

    fn fill(&mut self, x: &[f64], y: &[f64], style: &OptionMap) -> Result<()> {
        check_lengths("fill", x, y)?;
        let call = DrawCall::Fill { x: x.to_vec(), y: y.to_vec(), style: style.clone() };
        self.record(call, x, y);
        Ok(())
    }

    fn fill_between(&mut self, x: &[f64], y1: &[f64], y2: &[f64], style: &OptionMap) -> Result<()> {
        check_lengths("fill_between", x, y1)?;
        check_lengths("fill_between", x, y2)?;
        let ys: Vec<f64> = y1.iter().chain(y2).copied().collect();
        let call = DrawCall::FillBetween {
            x: x.to_vec(),
            y1: y1.to_vec(),
            y2: y2.to_vec(),
            style: style.clone(),
        };
        self.record(call, x, &ys);
        Ok(())
    }

    fn vlines(&mut self, x: &[f64], ymin: &[f64], ymax: &[f64], style: &OptionMap) -> Result<()> {
        check_lengths("vlines", x, ymin)?;
        check_lengths("vlines", x, ymax)?;
        let ys: Vec<f64> = ymin.iter().chain(ymax).copied().collect();
        let call = DrawCall::VLines {
            x: x.to_vec(),
            ymin: ymin.to_vec(),
            ymax: ymax.to_vec(),
            style: style.clone(),
        };
        self.record(call, x, &ys);
        Ok(())
    }

    fn hlines(&mut self, y: &[f64], xmin: &[f64], xmax: &[f64], style: &OptionMap) -> Result<()> {
        check_lengths("hlines", y, xmin)?;
        check_lengths("hlines", y, xmax)?;
        let xs: Vec<f64> = xmin.iter().chain(xmax).copied().collect();
        let call = DrawCall::HLines {
            y: y.to_vec(),
            xmin: xmin.to_vec(),
            xmax: xmax.to_vec(),
            style: style.clone(),
        };
        self.record(call, &xs, y);
        Ok(())
    }

    fn axvline(&mut self, x: f64, style: &OptionMap) -> Result<()> {
        self.record(DrawCall::AxVLine { x, style: style.clone() }, &[x], &[]);
        Ok(())
    }

    fn axhline(&mut self, y: f64, style: &OptionMap) -> Result<()> {
        self.record(DrawCall::AxHLine { y, style: style.clone() }, &[], &[y]);
        Ok(())
    }

    fn axvspan(&mut self, x0: f64, x1: f64, style: &OptionMap) -> Result<()> {
        self.record(DrawCall::AxVSpan { x0, x1, style: style.clone() }, &[x0, x1], &[]);
        Ok(())
    }

    fn axhspan(&mut self, y0: f64, y1: f64, style: &OptionMap) -> Result<()> {
        self.record(DrawCall::AxHSpan { y0, y1, style: style.clone() }, &[], &[y0, y1]);
        Ok(())
    }

    fn bar(&mut self, bars: &Bars, style: &OptionMap) -> Result<()> {
        check_lengths("bar", &bars.positions, &bars.heights)?;
        check_lengths("bar", &bars.positions, &bars.bottoms)?;
        let half = bars.width / 2.0;
        let along: Vec<f64> = bars
            .positions
            .iter()
            .flat_map(|p| [p - half, p + half])
            .collect();
        let across: Vec<f64> = bars.bottoms.iter().copied().chain(bars.tops()).collect();
        let call = DrawCall::Bar { bars: bars.clone(), style: style.clone() };
        if bars.horizontal {
            self.record(call, &across, &along);
        } else {
            self.record(call, &along, &across);
        }
        Ok(())
    }

    fn boxplot(&mut self, groups: &Groups, style: &OptionMap) -> Result<()> {
        let (xs, ys) = group_extent(groups);
        self.record(DrawCall::Box { groups: groups.clone(), style: style.clone() }, &xs, &ys);
        Ok(())
    }

    fn violin(&mut self, groups: &Groups, style: &OptionMap) -> Result<()> {
        let (xs, ys) = group_extent(groups);
        self.record(DrawCall::Violin { groups: groups.clone(), style: style.clone() }, &xs, &ys);
        Ok(())
    }

    fn hist(&mut self, values: &[f64], style: &OptionMap) -> Result<()> {
        let bins = style.get("bins").and_then(|b| b.as_f64()).unwrap_or(10.0).max(1.0) as usize;
        let histogram = stats::histogram(values, bins);
        let xs: Vec<f64> = histogram.edges.clone();
        let ys: Vec<f64> = std::iter::once(0.0).chain(histogram.counts.iter().copied()).collect();
        self.record(DrawCall::Hist { values: values.to_vec(), style: style.clone() }, &xs, &ys);
        Ok(())
    }

    fn quiver(&mut self, arrows: &Arrows, style: &OptionMap) -> Result<()> {
        check_lengths("quiver", &arrows.x, &arrows.y)?;
        check_lengths("quiver", &arrows.x, &arrows.u)?;
        check_lengths("quiver", &arrows.x, &arrows.v)?;
        let xs = arrows.x.clone();
        let ys: Vec<f64> = arrows
            .y
            .iter()
            .zip(&arrows.v)
            .flat_map(|(y, v)| [*y, y + v])
            .collect();
        self.record(DrawCall::Quiver { arrows: arrows.clone(), style: style.clone() }, &xs, &ys);
        Ok(())
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: &OptionMap) -> Result<()> {
        let call = DrawCall::Text { x, y, text: text.to_string(), style: style.clone() };
        self.record(call, &[x], &[y]);
        Ok(())
    }

    fn xlim(&self) -> (f64, f64) {
        self.state.xlim.unwrap_or_else(|| self.x_extent.padded())
    }

    fn set_xlim(&mut self, lo: f64, hi: f64) -> Result<()> {
        check_limits(lo, hi)?;
        self.state.xlim = Some((lo, hi));
        Ok(())
    }

    fn ylim(&self) -> (f64, f64) {
        self.state.ylim.unwrap_or_else(|| self.y_extent.padded())
    }

    fn set_ylim(&mut self, lo: f64, hi: f64) -> Result<()> {
        check_limits(lo, hi)?;
        self.state.ylim = Some((lo, hi));
        Ok(())
    }

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) -> Result<()> {
        match axis {
            Axis::X => self.state.xscale = scale,
            Axis::Y => self.state.yscale = scale,
            Axis::Both => {
                self.state.xscale = scale;
                self.state.yscale = scale;
            }
        }
        Ok(())
    }

    fn tick_params(&mut self, axis: Axis, style: &OptionMap) -> Result<()> {
        self.state.ticks.push((axis, style.clone()));
        Ok(())
    }

    fn set_label(&mut self, axis: Axis, text: &str, style: &OptionMap) -> Result<()> {
        let label = Some((text.to_string(), style.clone()));
        match axis {
            Axis::X => self.state.xlabel = label,
            Axis::Y => self.state.ylabel = label,
            Axis::Both => {
                return Err(PlotError::draw("label", "a label belongs to a single axis"))
            }
        }
        Ok(())
    }

    fn grid(&mut self, style: &OptionMap) -> Result<()> {
        self.state.grid = Some(style.clone());
        Ok(())
    }

    fn legend(&mut self, style: &OptionMap) -> Result<()> {
        self.state.legend = Some(style.clone());
        Ok(())
    }

    fn set_title(&mut self, title: &str, style: &OptionMap) -> Result<()> {
        self.state.title = Some((title.to_string(), style.clone()));
        Ok(())
    }

    fn set_prop_cycle(&mut self, colors: Vec<String>) -> Result<()> {
        if colors.is_empty() {
            return Err(PlotError::draw("cycler", "colour cycle must not be empty"));
        }
        self.state.cycle = colors;
        self.cycle_pos = 0;
        Ok(())
    }

    fn next_color(&mut self) -> String {
        let color = if self.state.cycle.is_empty() {
            DEFAULT_CYCLE[self.cycle_pos % DEFAULT_CYCLE.len()].to_string()
        } else {
            self.state.cycle[self.cycle_pos % self.state.cycle.len()].clone()
        };
        self.cycle_pos += 1;
        color
    }

    fn twin(&self) -> Self {
        RecordingSurface {
            state: AxesState {
                xlim: self.state.xlim,
                xscale: self.state.xscale,
                ..AxesState::default()
            },
            x_extent: self.x_extent,
            ..RecordingSurface::default()
        }
    }
}
