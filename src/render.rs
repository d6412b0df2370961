//! Rasterizes recorded surfaces into PNG or SVG bytes with plotters.

use crate::color::parse_color;
use crate::option::{OptionMap, OptionValue};
use crate::stats;
use crate::time;
use crate::subplot::Rendered;
use crate::surface::{Axis, AxisScale, DrawCall, RecordingSurface, Surface};
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FALLBACK_COLOR: RGBColor = RGBColor(0x21, 0x96, 0xf3);

fn number(style: &OptionMap, key: &str, default: f64) -> f64 {
    style.get(key).and_then(OptionValue::as_f64).unwrap_or(default)
}

fn flag(style: &OptionMap, key: &str, default: bool) -> bool {
    style.get(key).and_then(OptionValue::as_bool).unwrap_or(default)
}

fn color(style: &OptionMap, key: &str) -> RGBAColor {
    let base = style
        .get(key)
        .and_then(OptionValue::as_str)
        .and_then(parse_color)
        .unwrap_or(FALLBACK_COLOR);
    base.mix(number(style, "alpha", 1.0).clamp(0.0, 1.0))
}

fn label(style: &OptionMap) -> Option<String> {
    style.get("label").and_then(OptionValue::as_str).map(str::to_string)
}

fn stroke(style: &OptionMap) -> ShapeStyle {
    let width = number(style, "linewidth", 1.0).max(1.0).round() as u32;
    color(style, "color").stroke_width(width)
}

// Blue to red ramp for scatter colour values.
fn ramp(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(mix(0x21, 0xf4), mix(0x96, 0x43), mix(0xf3, 0x36))
}

fn short(v: f64) -> String {
    let s = format!("{:.4}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn project(v: f64, log: bool) -> f64 {
    match (log, v > 0.0) {
        (false, _) => v,
        (true, true) => v.log10(),
        (true, false) => f64::NAN,
    }
}

fn axis_range(lim: (f64, f64), log: bool) -> Range<f64> {
    let (lo, hi) = if log {
        let hi = lim.1.max(f64::MIN_POSITIVE);
        let lo = if lim.0 > 0.0 { lim.0 } else { hi / 1000.0 };
        (lo.log10(), hi.log10())
    } else {
        lim
    };
    if lo < hi {
        lo..hi
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

/// Data-to-chart coordinate mapping of one axes.
struct View {
    x: Range<f64>,
    y: Range<f64>,
    xlog: bool,
    ylog: bool,
}

impl View {
    fn of(surface: &RecordingSurface) -> Self {
        let state = surface.state();
        let xlog = state.xscale == AxisScale::Log;
        let ylog = state.yscale == AxisScale::Log;
        View {
            x: axis_range(surface.xlim(), xlog),
            y: axis_range(surface.ylim(), ylog),
            xlog,
            ylog,
        }
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (project(x, self.xlog), project(y, self.ylog))
    }

    /// Like [`View::point`], but values outside a log domain snap to the
    /// axis start. Used for rectangle corners.
    fn corner(&self, x: f64, y: f64) -> (f64, f64) {
        let (px, py) = self.point(x, y);
        (
            if px.is_finite() { px } else { self.x.start },
            if py.is_finite() { py } else { self.y.start },
        )
    }

    /// Polyline pieces, broken wherever a point is not finite.
    fn segments(&self, x: &[f64], y: &[f64]) -> Vec<Vec<(f64, f64)>> {
        let mut pieces = vec![Vec::new()];
        for (&xi, &yi) in x.iter().zip(y) {
            let p = self.point(xi, yi);
            if p.0.is_finite() && p.1.is_finite() {
                if let Some(last) = pieces.last_mut() {
                    last.push(p);
                }
            } else if pieces.last().is_some_and(|last| !last.is_empty()) {
                pieces.push(Vec::new());
            }
        }
        pieces.retain(|p| !p.is_empty());
        pieces
    }
}

/// Category labels by axis position, taken from bar and group glyphs.
fn category_ticks(surface: &RecordingSurface, axis: Axis) -> Vec<(f64, String)> {
    let mut ticks = Vec::new();
    for call in surface.calls() {
        let (positions, labels, on_x) = match call {
            DrawCall::Bar { bars, .. } => (&bars.positions, &bars.tick_labels, !bars.horizontal),
            DrawCall::Box { groups, style } | DrawCall::Violin { groups, style } => {
                (&groups.positions, &groups.labels, flag(style, "vert", true))
            }
            _ => continue,
        };
        if on_x == (axis == Axis::X) {
            ticks.extend(positions.iter().copied().zip(labels.iter().cloned()));
        }
    }
    ticks
}

/// strftime pattern of the last tick call on `axis` that set one.
fn time_format(surface: &RecordingSurface, axis: Axis) -> Option<String> {
    surface
        .state()
        .ticks
        .iter()
        .rev()
        .filter(|(on, _)| *on == axis || *on == Axis::Both)
        .find_map(|(_, style)| style.get("format").and_then(OptionValue::as_str))
        .map(str::to_string)
}

fn tick_label(v: f64, log: bool, ticks: &[(f64, String)], time_format: Option<&str>) -> String {
    if !ticks.is_empty() {
        return ticks
            .iter()
            .find(|(p, _)| (p - v).abs() < 1e-6)
            .map(|(_, l)| l.clone())
            .unwrap_or_default();
    }
    if let Some(pattern) = time_format {
        let seconds = if log { 10f64.powf(v) } else { v };
        if let Some(text) = time::format_timestamp(seconds, pattern) {
            return text;
        }
    }
    if log {
        short(10f64.powf(v))
    } else {
        short(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Single,
    Primary,
    Secondary,
}

fn draw_axes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    surface: &RecordingSurface,
    title: Option<&(String, OptionMap)>,
    layout: Layout,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let view = View::of(surface);
    let state = surface.state();

    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    match layout {
        Layout::Single => {
            builder.x_label_area_size(40).y_label_area_size(50);
        }
        Layout::Primary => {
            builder.x_label_area_size(40).y_label_area_size(50).margin_right(60);
        }
        Layout::Secondary => {
            builder.margin_bottom(50).margin_left(60).right_y_label_area_size(50);
        }
    }
    if let Some((text, style)) = title {
        builder.caption(text.as_str(), ("sans-serif", number(style, "fontsize", 16.0)));
    }
    let mut chart = builder
        .build_cartesian_2d(view.x.clone(), view.y.clone())
        .context("Failed to build chart")?;

    let label_size = state
        .ticks
        .iter()
        .rev()
        .find_map(|(_, style)| style.get("labelsize").and_then(OptionValue::as_f64))
        .unwrap_or(12.0);
    let x_ticks = category_ticks(surface, Axis::X);
    let y_ticks = category_ticks(surface, Axis::Y);
    let x_time = time_format(surface, Axis::X);
    let y_time = time_format(surface, Axis::Y);
    let x_format = |v: &f64| tick_label(*v, view.xlog, &x_ticks, x_time.as_deref());
    let y_format = |v: &f64| tick_label(*v, view.ylog, &y_ticks, y_time.as_deref());

    let mut mesh = chart.configure_mesh();
    mesh.label_style(("sans-serif", label_size))
        .x_label_formatter(&x_format)
        .y_label_formatter(&y_format);
    if !x_ticks.is_empty() {
        mesh.x_labels(x_ticks.len() * 2 + 1);
    }
    for (axis_label, horizontal) in [(&state.xlabel, true), (&state.ylabel, false)] {
        if let Some((text, style)) = axis_label {
            mesh.axis_desc_style(("sans-serif", number(style, "fontsize", 16.0)));
            if horizontal {
                mesh.x_desc(text.as_str());
            } else {
                mesh.y_desc(text.as_str());
            }
        }
    }
    match &state.grid {
        Some(grid) if layout != Layout::Secondary && flag(grid, "visible", true) => {
            let grid_color = color(grid, "color");
            mesh.bold_line_style(&grid_color.mix(0.4))
                .light_line_style(&WHITE.mix(0.0));
        }
        _ => {
            mesh.disable_mesh();
        }
    }
    mesh.draw().context("Failed to draw mesh")?;

    for call in surface.calls() {
        draw_call(&mut chart, call, &view).with_context(|| format!("Failed to draw {}", call.kind()))?;
    }

    if state.legend.is_some() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .context("Failed to draw legend")?;
    }
    Ok(())
}

fn draw_call<DB: DrawingBackend>(chart: &mut Chart<DB>, call: &DrawCall, view: &View) -> Result<()>
where
    DB::ErrorType: 'static,
{
    match call {
        DrawCall::Line { x, y, style } => {
            let line = stroke(style);
            let anno = chart.draw_series(
                view.segments(x, y)
                    .into_iter()
                    .map(|piece| PathElement::new(piece, line)),
            )?;
            if let Some(text) = label(style) {
                anno.label(text)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
            }
        }
        DrawCall::Scatter { points, style } => {
            let base = color(style, "color");
            let s = number(style, "s", 2.0);
            let range = points.values.as_ref().map(|values| {
                let lo = values.iter().copied().filter(|v| v.is_finite()).fold(f64::INFINITY, f64::min);
                let hi = values.iter().copied().filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
                (lo, if hi > lo { hi - lo } else { 1.0 })
            });
            let glyphs = points.x.iter().zip(&points.y).enumerate().filter_map(|(i, (&x, &y))| {
                let p = view.point(x, y);
                if !(p.0.is_finite() && p.1.is_finite()) {
                    return None;
                }
                let size = points.sizes.as_ref().and_then(|s| s.get(i)).copied().unwrap_or(s);
                let radius = (size.max(0.0).sqrt() * 2.0).max(1.0).round() as i32;
                let fill = match (&points.values, range) {
                    (Some(values), Some((lo, span))) => {
                        let v = values.get(i).copied().unwrap_or(f64::NAN);
                        ramp((v - lo) / span).mix(base.3)
                    }
                    _ => base,
                };
                Some(Circle::new(p, radius, fill.filled()))
            });
            let anno = chart.draw_series(glyphs)?;
            if let Some(text) = label(style) {
                anno.label(text).legend(move |(x, y)| Circle::new((x, y), 3, base.filled()));
            }
        }
        DrawCall::Fill { x, y, style } => {
            let points: Vec<(f64, f64)> = x.iter().zip(y).map(|(&a, &b)| view.corner(a, b)).collect();
            chart.draw_series(std::iter::once(Polygon::new(points, color(style, "color").filled())))?;
        }
        DrawCall::FillBetween { x, y1, y2, style } => {
            let upper = x.iter().zip(y1).map(|(&a, &b)| view.corner(a, b));
            let lower = x.iter().zip(y2).rev().map(|(&a, &b)| view.corner(a, b));
            let points: Vec<(f64, f64)> = upper.chain(lower).collect();
            let fill = color(style, "color");
            let anno = chart.draw_series(std::iter::once(Polygon::new(points, fill.filled())))?;
            if let Some(text) = label(style) {
                anno.label(text)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], fill.filled()));
            }
        }
        DrawCall::VLines { x, ymin, ymax, style } => {
            let line = stroke(style);
            chart.draw_series(x.iter().zip(ymin.iter().zip(ymax)).map(|(&xi, (&lo, &hi))| {
                PathElement::new(vec![view.corner(xi, lo), view.corner(xi, hi)], line)
            }))?;
        }
        DrawCall::HLines { y, xmin, xmax, style } => {
            let line = stroke(style);
            chart.draw_series(y.iter().zip(xmin.iter().zip(xmax)).map(|(&yi, (&lo, &hi))| {
                PathElement::new(vec![view.corner(lo, yi), view.corner(hi, yi)], line)
            }))?;
        }
        DrawCall::AxVLine { x, style } => {
            let px = project(*x, view.xlog);
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(px, view.y.start), (px, view.y.end)],
                stroke(style),
            )))?;
        }
        DrawCall::AxHLine { y, style } => {
            let py = project(*y, view.ylog);
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(view.x.start, py), (view.x.end, py)],
                stroke(style),
            )))?;
        }
        DrawCall::AxVSpan { x0, x1, style } => {
            let (a, _) = view.corner(*x0, 1.0);
            let (b, _) = view.corner(*x1, 1.0);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(a, view.y.start), (b, view.y.end)],
                color(style, "color").filled(),
            )))?;
        }
        DrawCall::AxHSpan { y0, y1, style } => {
            let (_, a) = view.corner(1.0, *y0);
            let (_, b) = view.corner(1.0, *y1);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(view.x.start, a), (view.x.end, b)],
                color(style, "color").filled(),
            )))?;
        }
        DrawCall::Bar { bars, style } => {
            let fill = color(style, "color");
            let half = bars.width / 2.0;
            let tops = bars.tops();
            let rects = bars.positions.iter().zip(bars.bottoms.iter().zip(&tops)).map(|(&p, (&lo, &hi))| {
                let corners = if bars.horizontal {
                    [view.corner(lo, p - half), view.corner(hi, p + half)]
                } else {
                    [view.corner(p - half, lo), view.corner(p + half, hi)]
                };
                Rectangle::new(corners, fill.filled())
            });
            let anno = chart.draw_series(rects)?;
            if let Some(text) = &bars.label {
                anno.label(text.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], fill.filled()));
            }
        }
        DrawCall::Box { groups, style } => {
            let vert = flag(style, "vert", true);
            let half = number(style, "widths", 0.5) / 2.0;
            let whis = number(style, "whis", 1.5);
            let line = stroke(style);
            let at = |pos: f64, value: f64| {
                if vert {
                    view.corner(pos, value)
                } else {
                    view.corner(value, pos)
                }
            };
            for (&pos, values) in groups.positions.iter().zip(&groups.values) {
                let Some(stat) = stats::box_stat(values, whis) else {
                    continue;
                };
                chart.draw_series(std::iter::once(Rectangle::new(
                    [at(pos - half, stat.q1), at(pos + half, stat.q3)],
                    line,
                )))?;
                chart.draw_series(
                    [
                        vec![at(pos - half, stat.median), at(pos + half, stat.median)],
                        vec![at(pos, stat.q1), at(pos, stat.lower_whisker)],
                        vec![at(pos, stat.q3), at(pos, stat.upper_whisker)],
                        vec![at(pos - half / 2.0, stat.lower_whisker), at(pos + half / 2.0, stat.lower_whisker)],
                        vec![at(pos - half / 2.0, stat.upper_whisker), at(pos + half / 2.0, stat.upper_whisker)],
                    ]
                    .into_iter()
                    .map(|points| PathElement::new(points, line)),
                )?;
                if flag(style, "showfliers", true) {
                    chart.draw_series(
                        stat.outliers
                            .iter()
                            .map(|&v| Circle::new(at(pos, v), 3, line.color.stroke_width(1))),
                    )?;
                }
            }
        }
        DrawCall::Violin { groups, style } => {
            let vert = flag(style, "vert", true);
            let half = number(style, "widths", 0.5) / 2.0;
            let fill = color(style, "color");
            let at = |pos: f64, value: f64| {
                if vert {
                    view.corner(pos, value)
                } else {
                    view.corner(value, pos)
                }
            };
            for (&pos, values) in groups.positions.iter().zip(&groups.values) {
                let curve = stats::kde(values);
                if curve.grid.is_empty() {
                    continue;
                }
                let right = curve.grid.iter().zip(&curve.density).map(|(&v, &d)| at(pos + d * half, v));
                let left = curve.grid.iter().zip(&curve.density).rev().map(|(&v, &d)| at(pos - d * half, v));
                let outline: Vec<(f64, f64)> = right.chain(left).collect();
                chart.draw_series(std::iter::once(Polygon::new(outline, fill.filled())))?;
            }
        }
        DrawCall::Hist { values, style } => {
            let bins = number(style, "bins", 10.0).max(1.0) as usize;
            let hist = stats::histogram(values, bins);
            let total: f64 = hist.counts.iter().sum();
            let mut heights = hist.counts.clone();
            if flag(style, "cumulative", false) {
                let mut running = 0.0;
                for h in heights.iter_mut() {
                    running += *h;
                    *h = running;
                }
            }
            if flag(style, "density", false) && total > 0.0 {
                for (h, edge) in heights.iter_mut().zip(hist.edges.windows(2)) {
                    *h /= total * (edge[1] - edge[0]);
                }
            }
            let fill = color(style, "color");
            let anno = chart.draw_series(heights.iter().zip(hist.edges.windows(2)).map(|(&h, edge)| {
                Rectangle::new([view.corner(edge[0], 0.0), view.corner(edge[1], h)], fill.filled())
            }))?;
            if let Some(text) = label(style) {
                anno.label(text)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 20, y + 4)], fill.filled()));
            }
        }
        DrawCall::Quiver { arrows, style } => {
            let scale = number(style, "scale", 1.0);
            let k = if scale != 0.0 { 1.0 / scale } else { 1.0 };
            let line = color(style, "color").stroke_width(1);
            let shafts = arrows
                .x
                .iter()
                .zip(&arrows.y)
                .zip(arrows.u.iter().zip(&arrows.v))
                .map(|((&x, &y), (&u, &v))| {
                    let tail = view.corner(x, y);
                    let head = view.corner(x + u * k, y + v * k);
                    PathElement::new(vec![tail, head], line)
                });
            chart.draw_series(shafts)?;
        }
        DrawCall::Text { x, y, text, style } => {
            let fill = color(style, "color");
            let font = ("sans-serif", number(style, "fontsize", 12.0)).into_font().color(&fill);
            chart.draw_series(std::iter::once(Text::new(text.clone(), view.corner(*x, *y), font)))?;
        }
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Rendered<RecordingSurface>) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let title = panel.primary.state().title.as_ref();
    match &panel.secondary {
        None => draw_axes(area, &panel.primary, title, Layout::Single),
        Some(secondary) => {
            draw_axes(area, &panel.primary, title, Layout::Primary)?;
            draw_axes(area, secondary, title, Layout::Secondary)
        }
    }
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[Rendered<RecordingSurface>],
    columns: usize,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;
    let columns = columns.clamp(1, panels.len().max(1));
    let rows = panels.len().div_ceil(columns);
    for (area, panel) in root.split_evenly((rows, columns)).iter().zip(panels) {
        draw_panel(area, panel)?;
    }
    Ok(())
}

/// Draw `panels` row by row in a grid of `columns` and encode the result
/// in the requested format.
pub fn to_image(
    panels: &[Rendered<RecordingSurface>],
    columns: usize,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    if panels.is_empty() {
        anyhow::bail!("Nothing to render: the figure has no subplots");
    }
    let (width, height) = (options.width, options.height);

    match options.format {
        OutputFormat::Png => {
            let mut buffer = vec![0u8; (width * height * 3) as usize];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                draw_grid(&root, panels, columns)?;
                root.present().context("Failed to present drawing")?;
            }

            let mut png_bytes = Vec::new();
            image::codecs::png::PngEncoder::new(&mut png_bytes)
                .write_image(&buffer, width, height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
            Ok(png_bytes)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw_grid(&root, panels, columns)?;
                root.present().context("Failed to present drawing")?;
            }
            Ok(svg.into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{labels, numbers, DataSource};
    use crate::option::{list, options};
    use crate::plot;
    use crate::subplot::{Registration, Subplot};

    fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
    }

    fn panel() -> Rendered<RecordingSurface> {
        let data = DataSource::from_columns(vec![
            ("t", numbers(&[1.0, 2.0, 3.0, 4.0])),
            ("v", numbers(&[2.0, 4.0, 3.0, 5.0])),
            ("site", labels(&["a", "b", "a", "b"])),
        ])
        .unwrap();
        Subplot::default()
            .register(
                Registration::new(data.clone())
                    .plot(plot::line().preset(options([("label", "v".into())])))
                    .plot(plot::scatter().preset(OptionMap::new()))
                    .x("t")
                    .y("v")
                    .ylabel("Value"),
            )
            .register(
                Registration::new(data)
                    .plot(plot::bar().preset(OptionMap::new()))
                    .x("site")
                    .y(list(["v", "t"]))
                    .second_axis(),
            )
            .set_title("Smoke")
            .render(RecordingSurface::new())
            .unwrap()
    }

    #[test]
    fn test_png_output() {
        let bytes = to_image(&[panel(), panel()], 2, &RenderOptions::default()).unwrap();
        assert!(is_valid_png(&bytes));
    }

    #[test]
    fn test_svg_output() {
        let options = RenderOptions {
            format: OutputFormat::Svg,
            ..RenderOptions::default()
        };
        let bytes = to_image(&[panel()], 1, &options).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains("<svg"));
    }

    #[test]
    fn test_no_panels() {
        assert!(to_image(&[], 1, &RenderOptions::default()).is_err());
    }

    #[test]
    fn test_segments_break_on_nan() {
        let view = View::of(&RecordingSurface::new());
        let pieces = view.segments(&[0.0, 1.0, 2.0, 3.0], &[1.0, f64::NAN, 2.0, 3.0]);
        assert_eq!(pieces, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
    }

    #[test]
    fn test_log_range() {
        let range = axis_range((1.0, 100.0), true);
        assert_eq!(range, 0.0..2.0);
        assert_eq!(tick_label(2.0, true, &[], None), "100");
    }

    #[test]
    fn test_category_tick_labels() {
        let ticks = vec![(0.0, "a".to_string()), (1.0, "b".to_string())];
        assert_eq!(tick_label(1.0, false, &ticks, None), "b");
        assert_eq!(tick_label(0.5, false, &ticks, Some("%m/%d")), "");
    }

    #[test]
    fn test_time_tick_labels() {
        let mut surface = RecordingSurface::new();
        surface.tick_params(Axis::Both, &options([("labelsize", 10.into())])).unwrap();
        surface.tick_params(Axis::X, &options([("format", "%m/%d %H".into())])).unwrap();
        assert_eq!(time_format(&surface, Axis::X).as_deref(), Some("%m/%d %H"));
        assert_eq!(time_format(&surface, Axis::Y), None);

        let t = time::parse_datetime("2018/08/10 06:00:00").unwrap();
        assert_eq!(tick_label(t, false, &[], Some("%m/%d %H")), "08/10 06");
        assert_eq!(tick_label(1.5, false, &[], Some("%Q")), "1.5");
    }

    #[test]
    fn test_time_subplot_png_output() {
        let data = DataSource::from_columns(vec![
            ("when", labels(&["2018/08/10 00:00", "2018/08/11 00:00", "2018/08/12 00:00"])),
            ("level", numbers(&[1.0, 3.0, 2.0])),
        ])
        .unwrap();
        let rendered = Subplot::time(crate::AxesStyle::default())
            .register(
                Registration::new(data)
                    .index("when")
                    .plot(plot::line().preset(OptionMap::new()))
                    .y("level"),
            )
            .render(RecordingSurface::new())
            .unwrap();
        let bytes = to_image(&[rendered], 1, &RenderOptions::default()).unwrap();
        assert!(is_valid_png(&bytes));
    }
}
