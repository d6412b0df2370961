//! Logical subplot: data registrations plus a layered axes style.
//!
//! Rendering applies, in order: the colour cycler, every primary entry,
//! then axis scale, tick parameters (both, x, y), x and y limits, labels,
//! grid and title. Entries flagged for the secondary axis are drawn on a
//! twin surface with the merged secondary style.
//!
//! A time subplot ([`Subplot::time`]) indexes its entries by date and labels
//! x ticks with the `xFmt` pattern.

use crate::action::{PlotAction, Preset};
use crate::axes::AxesStyle;
use crate::data::DataSource;
use crate::error::{PlotError, Result};
use crate::loader::{transformer, DataLoader, DataRef, DefaultLoader, FixtureLoader, Transformer};
use crate::option::{list, merge_into, options, OptionMap, OptionValue};
use crate::plot;
use crate::select::{resolve, MissingColumn, Resolved};
use crate::surface::Surface;
use crate::time;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Surfaces produced by rendering a subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<S> {
    pub primary: S,
    /// Twin axes, present when at least one entry targets them.
    pub secondary: Option<S>,
}

#[derive(Clone)]
struct Entry {
    data: DataRef,
    meta: OptionMap,
    presets: Vec<Preset>,
    option: OptionMap,
    transformers: Vec<Transformer>,
    second_axis: bool,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("data", &self.data)
            .field("meta", &self.meta)
            .field("presets", &self.presets.iter().map(Preset::name).collect::<Vec<_>>())
            .field("option", &self.option)
            .field("transformers", &self.transformers.len())
            .field("second_axis", &self.second_axis)
            .finish()
    }
}

/// One data registration and the axes-style update it carries.
#[derive(Debug, Clone)]
pub struct Registration {
    entry: Entry,
    style: AxesStyle,
}

impl Registration {
    pub fn new(data: impl Into<DataRef>) -> Self {
        Registration {
            entry: Entry {
                data: data.into(),
                meta: OptionMap::new(),
                presets: Vec::new(),
                option: OptionMap::new(),
                transformers: Vec::new(),
                second_axis: false,
            },
            style: AxesStyle::empty(),
        }
    }

    /// Load metadata handed to the data loader.
    pub fn meta(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.entry.meta.insert(key.to_string(), value.into());
        self
    }

    /// Lines to skip before the header line of delimited files.
    pub fn header(self, lines: usize) -> Self {
        self.meta("header", lines as f64)
    }

    /// Column used as the row index.
    pub fn index(self, column: &str) -> Self {
        self.meta("index", column)
    }

    /// Index rows by the date and time read from `columns`.
    pub fn time_index<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OptionValue>,
    {
        self.meta("time_index", list(columns))
    }

    pub fn plot(mut self, preset: Preset) -> Self {
        self.entry.presets.push(preset);
        self
    }

    pub fn plots(mut self, presets: impl IntoIterator<Item = Preset>) -> Self {
        self.entry.presets.extend(presets);
        self
    }

    /// Per-call option shared by every preset of the entry.
    pub fn option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.entry.option.insert(key.to_string(), value.into());
        self
    }

    pub fn options(mut self, map: &OptionMap) -> Self {
        merge_into(&mut self.entry.option, map);
        self
    }

    pub fn x(self, selector: impl Into<OptionValue>) -> Self {
        self.option("x", selector)
    }

    pub fn y(self, selector: impl Into<OptionValue>) -> Self {
        self.option("y", selector)
    }

    pub fn xlim(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        self.style.xlim = list([lo, hi]);
        self
    }

    /// X limits where each bound is a number, a date string such as
    /// `"2018/08/10 00:00:00"`, or null for an open bound.
    pub fn xlim_bounds(mut self, lo: impl Into<OptionValue>, hi: impl Into<OptionValue>) -> Self {
        self.style.xlim = OptionValue::List(vec![lo.into(), hi.into()]);
        self
    }

    pub fn ylim(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        self.style.ylim = list([lo, hi]);
        self
    }

    pub fn xscale(mut self, scale: &str) -> Self {
        self.style.scale.insert("xscale".to_string(), scale.into());
        self
    }

    pub fn yscale(mut self, scale: &str) -> Self {
        self.style.scale.insert("yscale".to_string(), scale.into());
        self
    }

    pub fn xlabel(mut self, text: &str) -> Self {
        self.style.label.insert("xlabel".to_string(), text.into());
        self
    }

    pub fn ylabel(mut self, text: &str) -> Self {
        self.style.label.insert("ylabel".to_string(), text.into());
        self
    }

    pub fn tick(mut self, map: &OptionMap) -> Self {
        merge_into(&mut self.style.tick, map);
        self
    }

    pub fn xtick(mut self, map: &OptionMap) -> Self {
        merge_into(&mut self.style.xtick, map);
        self
    }

    pub fn ytick(mut self, map: &OptionMap) -> Self {
        merge_into(&mut self.style.ytick, map);
        self
    }

    pub fn grid(mut self, map: &OptionMap) -> Self {
        merge_into(&mut self.style.grid, map);
        self
    }

    pub fn cycler<I, T>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionValue>,
    {
        self.style.cycler = list(colors);
        self
    }

    /// Merge a whole style update.
    pub fn style(mut self, update: &AxesStyle) -> Self {
        self.style.merge(update);
        self
    }

    pub fn transformer(mut self, transform: Transformer) -> Self {
        self.entry.transformers.push(transform);
        self
    }

    /// Draw this entry on the twin axes. Its style update goes to the
    /// secondary diff.
    pub fn second_axis(mut self) -> Self {
        self.entry.second_axis = true;
        self
    }
}

/// A logical subplot.
#[derive(Debug, Clone)]
pub struct Subplot {
    style: AxesStyle,
    secondary: AxesStyle,
    entries: Vec<Entry>,
    title: Option<String>,
    clip_to_xlim: bool,
    test_mode: bool,
    time_axis: bool,
    loader: Arc<dyn DataLoader>,
}

impl Default for Subplot {
    fn default() -> Self {
        Subplot::new(AxesStyle::default())
    }
}

fn apply_setter(action: PlotAction, option: OptionMap, surface: &mut dyn Surface) -> Result<()> {
    action.apply(&DataSource::empty(), &option)?.draw(surface)
}

/// Rows whose `x` value lies inside the limit pair. Bounds left `Null` are
/// open.
fn xlim_clip(xlim: &OptionValue, selector: OptionValue) -> Result<Option<Transformer>> {
    let Some(bounds) = xlim.as_list() else {
        return Ok(None);
    };
    let bound = |i: usize| bounds.get(i).map_or(Ok(None), time::limit_bound);
    let (lo, hi) = (bound(0)?, bound(1)?);
    if lo.is_none() && hi.is_none() {
        return Ok(None);
    }

    Ok(Some(transformer(move |data: DataSource| {
        let x = match resolve(&data, &selector, MissingColumn::Error)? {
            Resolved::Series(series) => series.aligned_with(&data, "x")?.numbers()?,
            Resolved::Literal(other) => {
                return Err(PlotError::selection(format!(
                    "clipping to the x-limit needs an x column, got {:?}",
                    other
                )))
            }
        };
        Ok(data.filter(|i| {
            x.get(i).is_some_and(|&v| {
                v.is_finite() && lo.map_or(true, |lo| v >= lo) && hi.map_or(true, |hi| v <= hi)
            })
        }))
    })))
}

impl Subplot {
    pub fn new(style: AxesStyle) -> Self {
        Subplot {
            style,
            secondary: AxesStyle::empty(),
            entries: Vec::new(),
            title: None,
            clip_to_xlim: false,
            test_mode: false,
            time_axis: false,
            loader: Arc::new(DefaultLoader),
        }
    }

    /// Subplot whose x axis is time. Entry indexes are read as dates, x
    /// limits may be date strings and x ticks are labelled with the `xFmt`
    /// strftime pattern (`%m/%d` unless the style sets one).
    pub fn time(mut style: AxesStyle) -> Self {
        style
            .style
            .entry("xFmt".to_string())
            .or_insert_with(|| time::DEFAULT_X_FORMAT.into());
        Subplot {
            time_axis: true,
            ..Subplot::new(style)
        }
    }

    pub fn is_time(&self) -> bool {
        self.time_axis
    }

    pub fn register(mut self, registration: Registration) -> Self {
        let Registration { entry, style } = registration;
        if entry.second_axis {
            self.secondary.merge(&style);
        } else {
            self.style.merge(&style);
        }
        self.entries.push(entry);
        self
    }

    /// Alias of [`Subplot::register`].
    pub fn add(self, registration: Registration) -> Self {
        self.register(registration)
    }

    /// Copy of this subplot with `style` merged into the primary style and
    /// `options[i]` merged into the option map of entry `i`.
    pub fn tee(&self, style: &AxesStyle, options: &[OptionMap]) -> Subplot {
        let mut copy = self.clone();
        copy.style.merge(style);
        for (entry, over) in copy.entries.iter_mut().zip(options) {
            merge_into(&mut entry.option, over);
        }
        copy
    }

    pub fn set_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Drop rows outside the x limit before drawing.
    pub fn clip_to_xlim(mut self, enabled: bool) -> Self {
        self.clip_to_xlim = enabled;
        self
    }

    pub fn with_loader(mut self, loader: impl DataLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Preview mode: every entry draws the fixture table with `y = "y"`.
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    pub fn style(&self) -> &AxesStyle {
        &self.style
    }

    /// Primary style merged with the secondary diff.
    pub fn secondary_style(&self) -> AxesStyle {
        self.style.merged(&self.secondary)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render<S: Surface>(&self, mut surface: S) -> Result<Rendered<S>> {
        self.draw_axes(&mut surface, &self.style, false)?;
        if let Some(title) = &self.title {
            let mut option = self.style.title.clone();
            option.insert("title".to_string(), title.as_str().into());
            apply_setter(plot::set_title(), option, &mut surface)?;
        }

        let secondary = if self.entries.iter().any(|e| e.second_axis) {
            let mut twin = surface.twin();
            self.draw_axes(&mut twin, &self.secondary_style(), true)?;
            Some(twin)
        } else {
            None
        };

        Ok(Rendered {
            primary: surface,
            secondary,
        })
    }

    fn draw_axes(&self, surface: &mut dyn Surface, style: &AxesStyle, secondary: bool) -> Result<()> {
        apply_setter(plot::set_cycler(), options([("cycler", style.cycler.clone())]), surface)?;

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.second_axis == secondary {
                self.draw_entry(entry, style, surface)
                    .map_err(|e| e.at_entry(index))?;
            }
        }

        apply_setter(plot::axis_scale(), style.scale.clone(), surface)?;
        for axis in ["both", "x", "y"] {
            let mut option = style.tick_options(axis);
            if axis == "x" && self.time_axis {
                if let Some(format) = style.style.get("xFmt") {
                    option.insert("format".to_string(), format.clone());
                }
            }
            apply_setter(plot::set_tick_parameters(), option, surface)?;
        }
        apply_setter(plot::set_xlim(), options([("xlim", style.xlim.clone())]), surface)?;
        apply_setter(plot::set_ylim(), options([("ylim", style.ylim.clone())]), surface)?;
        apply_setter(plot::set_label(), style.label.clone(), surface)?;
        apply_setter(plot::set_grid(), style.grid.clone(), surface)
    }

    // Time subplots read the entry index as dates.
    fn load_meta(&self, entry: &Entry) -> OptionMap {
        let mut meta = entry.meta.clone();
        if self.time_axis && !meta.contains_key("time_index") {
            if let Some(index) = meta.remove("index") {
                meta.insert("time_index".to_string(), index);
            }
        }
        meta
    }

    fn draw_entry(&self, entry: &Entry, style: &AxesStyle, surface: &mut dyn Surface) -> Result<()> {
        let (data, option) = if self.test_mode {
            let mut option = entry.option.clone();
            option.insert("y".to_string(), "y".into());
            (FixtureLoader.load(&entry.data, &entry.meta, &[])?, option)
        } else {
            let mut transformers = Vec::with_capacity(entry.transformers.len() + 1);
            if self.clip_to_xlim {
                let selector = entry.option.get("x").cloned().unwrap_or(OptionValue::Null);
                transformers.extend(xlim_clip(&style.xlim, selector)?);
            }
            transformers.extend(entry.transformers.iter().cloned());
            let data = self.loader.load(&entry.data, &self.load_meta(entry), &transformers)?;
            (data, entry.option.clone())
        };

        if data.is_empty() {
            debug!("no rows for {:?}, skipping", entry.data);
            return Ok(());
        }

        for preset in &entry.presets {
            preset.apply(&data, &option)?.draw(surface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{numbers, DataSource};
    use crate::error::PlotError;
    use crate::option::each;
    use crate::surface::{Axis, AxisScale, DrawCall, RecordingSurface};

    fn make_data() -> DataSource {
        DataSource::from_columns(vec![
            ("t", numbers(&[0.0, 1.0, 2.0, 3.0])),
            ("temp", numbers(&[10.0, 12.0, 11.0, 13.0])),
            ("sal", numbers(&[30.0, 31.0, 32.0, 33.0])),
        ])
        .unwrap()
    }

    fn line() -> Preset {
        plot::line().preset(OptionMap::new())
    }

    #[test]
    fn test_render_order() {
        let subplot = Subplot::default().register(
            Registration::new(make_data())
                .plots([plot::scatter().preset(OptionMap::new()), line()])
                .x("t")
                .y("temp")
                .ylabel("Temperature")
                .yscale("log"),
        );

        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        let surface = &rendered.primary;
        assert!(rendered.secondary.is_none());
        assert_eq!(surface.kinds(), vec!["scatter", "line"]);

        let state = surface.state();
        assert_eq!(state.yscale, AxisScale::Log);
        let axes: Vec<Axis> = state.ticks.iter().map(|(axis, _)| *axis).collect();
        assert_eq!(axes, vec![Axis::Both, Axis::X, Axis::Y]);
        assert_eq!(state.ticks[0].1["labelsize"], OptionValue::Number(14.0));
        assert_eq!(state.ylabel.as_ref().unwrap().0, "Temperature");
        assert!(state.xlabel.is_none());
        assert!(state.grid.is_some());
        assert!(state.title.is_none());
    }

    #[test]
    fn test_entries_in_insertion_order() {
        let data = make_data();
        let subplot = Subplot::default()
            .register(Registration::new(data.clone()).plot(line()).x("t").y("temp"))
            .add(
                Registration::new(data)
                    .plot(plot::fill_between().preset(OptionMap::new()))
                    .x("t")
                    .y("sal"),
            );
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        assert_eq!(rendered.primary.kinds(), vec!["line", "fill_between"]);
    }

    #[test]
    fn test_secondary_axis_split() {
        let data = make_data();
        let subplot = Subplot::default()
            .register(
                Registration::new(data.clone())
                    .plot(line())
                    .x("t")
                    .y("temp")
                    .xlim(Some(0.0), Some(3.0))
                    .ylim(Some(0.0), Some(20.0)),
            )
            .register(
                Registration::new(data)
                    .plot(line())
                    .x("t")
                    .y("sal")
                    .ylim(Some(25.0), Some(35.0))
                    .ylabel("Salinity")
                    .second_axis(),
            );

        assert_eq!(subplot.style().ylim, list([0.0, 20.0]));
        assert_eq!(subplot.secondary_style().ylim, list([25.0, 35.0]));

        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        let secondary = rendered.secondary.unwrap();
        assert_eq!(rendered.primary.calls().len(), 1);
        assert_eq!(secondary.calls().len(), 1);
        match &secondary.calls()[0] {
            DrawCall::Line { y, .. } => assert_eq!(y, &vec![30.0, 31.0, 32.0, 33.0]),
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(rendered.primary.ylim(), (0.0, 20.0));
        assert_eq!(secondary.ylim(), (25.0, 35.0));
        assert_eq!(secondary.xlim(), (0.0, 3.0));
        assert_eq!(secondary.state().ylabel.as_ref().unwrap().0, "Salinity");
        assert!(rendered.primary.state().ylabel.is_none());
    }

    #[test]
    fn test_errors_name_entry() {
        let data = make_data();
        let subplot = Subplot::default()
            .register(Registration::new(data.clone()).plot(line()).x("t").y("temp"))
            .register(Registration::new(data).plot(line()).x("t").y("depth"));

        match subplot.render(RecordingSurface::new()) {
            Err(PlotError::Entry { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, PlotError::Selection(_)));
            }
            other => panic!("expected entry error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_data_still_styles_axes() {
        let subplot = Subplot::default()
            .register(
                Registration::new(DataSource::empty())
                    .plot(line())
                    .y("temp")
                    .xlim(Some(1.0), Some(2.0)),
            )
            .set_title("Empty");
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        assert!(rendered.primary.calls().is_empty());
        assert_eq!(rendered.primary.xlim(), (1.0, 2.0));
        assert_eq!(rendered.primary.state().title.as_ref().unwrap().0, "Empty");
    }

    #[test]
    fn test_clip_to_xlim() {
        let subplot = Subplot::default()
            .register(
                Registration::new(make_data())
                    .plot(line())
                    .x("t")
                    .y("temp")
                    .xlim(Some(1.0), None),
            )
            .clip_to_xlim(true);
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        match &rendered.primary.calls()[0] {
            DrawCall::Line { x, .. } => assert_eq!(x, &vec![1.0, 2.0, 3.0]),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_clip_to_xlim_rejects_misaligned_x() {
        let short = OptionValue::func(|_: &DataSource| numbers(&[0.0]));
        for x in [short, OptionValue::Number(1.0)] {
            let subplot = Subplot::default()
                .register(
                    Registration::new(make_data())
                        .plot(line())
                        .x(x)
                        .y("temp")
                        .xlim(Some(1.0), None),
                )
                .clip_to_xlim(true);
            let result = subplot.render(RecordingSurface::new());
            assert!(matches!(
                result,
                Err(PlotError::Entry { index: 0, ref source }) if matches!(**source, PlotError::Selection(_))
            ));
        }
    }

    #[test]
    fn test_transformers_run_in_order() {
        let double = transformer(|data: DataSource| {
            let temp = data.column("temp").map(|c| c.to_vec()).unwrap_or_default();
            let doubled = temp.iter().map(|c| c.as_f64().unwrap_or(f64::NAN) * 2.0).collect::<Vec<_>>();
            DataSource::from_columns(vec![("temp", numbers(&doubled))])
        });
        let head = transformer(|data: DataSource| Ok(data.filter(|i| i < 2)));

        let subplot = Subplot::default().register(
            Registration::new(make_data())
                .plot(line())
                .y("temp")
                .transformer(double)
                .transformer(head),
        );
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        match &rendered.primary.calls()[0] {
            DrawCall::Line { y, .. } => assert_eq!(y, &vec![20.0, 24.0]),
            other => panic!("unexpected call {:?}", other),
        }
    }

    fn tide_log() -> DataSource {
        DataSource::from_columns(vec![
            (
                "when",
                crate::data::labels(&["2018/08/09 18:00", "2018/08/10 00:00", "2018/08/10 06:00"]),
            ),
            ("level", numbers(&[1.2, 1.5, 1.1])),
        ])
        .unwrap()
    }

    #[test]
    fn test_time_subplot_indexes_by_date() {
        let subplot = Subplot::time(AxesStyle::default())
            .register(
                Registration::new(tide_log())
                    .index("when")
                    .plot(line())
                    .y("level")
                    .xlim_bounds("2018/08/10", OptionValue::Null),
            )
            .clip_to_xlim(true);
        assert!(subplot.is_time());
        assert_eq!(subplot.style().style["xFmt"], OptionValue::from("%m/%d"));

        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        let midnight = time::parse_datetime("2018-08-10").unwrap();
        match &rendered.primary.calls()[0] {
            DrawCall::Line { x, y, .. } => {
                assert_eq!(x, &vec![midnight, midnight + 21_600.0]);
                assert_eq!(y, &vec![1.5, 1.1]);
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(rendered.primary.state().xlim.map(|(lo, _)| lo), Some(midnight));

        let x_format = rendered
            .primary
            .state()
            .ticks
            .iter()
            .find(|(axis, _)| *axis == Axis::X)
            .and_then(|(_, style)| style.get("format").cloned());
        assert_eq!(x_format, Some(OptionValue::from("%m/%d")));
    }

    #[test]
    fn test_time_subplot_keeps_explicit_format() {
        let style = AxesStyle::from_options(&options([("xFmt", "%H:%M".into())])).unwrap();
        let subplot = Subplot::time(style)
            .register(Registration::new(tide_log()).time_index(["when"]).plot(line()).y("level"));
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        let formats: Vec<_> = rendered
            .primary
            .state()
            .ticks
            .iter()
            .filter_map(|(_, style)| style.get("format"))
            .collect();
        assert_eq!(formats, vec![&OptionValue::from("%H:%M")]);
    }

    #[test]
    fn test_plain_subplot_ignores_x_format() {
        let style = AxesStyle::from_options(&options([("xFmt", "%H:%M".into())])).unwrap();
        let rendered = Subplot::new(style)
            .register(Registration::new(make_data()).plot(line()).x("t").y("temp"))
            .render(RecordingSurface::new())
            .unwrap();
        let ticks = &rendered.primary.state().ticks;
        assert!(ticks.iter().all(|(_, style)| !style.contains_key("format")));
    }

    #[test]
    fn test_bad_date_limit_is_configuration_error() {
        let subplot = Subplot::time(AxesStyle::default())
            .register(
                Registration::new(tide_log())
                    .index("when")
                    .plot(line())
                    .y("level")
                    .xlim_bounds("someday", OptionValue::Null),
            )
            .clip_to_xlim(true);
        assert!(matches!(
            subplot.render(RecordingSurface::new()),
            Err(PlotError::Entry { ref source, .. }) if matches!(**source, PlotError::Configuration(_))
        ));
    }

    #[test]
    fn test_test_mode_uses_fixture() {
        let subplot = Subplot::default()
            .register(Registration::new("no/such/file.csv").plot(line()).x("x").y("salinity"))
            .test_mode(true);
        let rendered = subplot.render(RecordingSurface::new()).unwrap();
        match &rendered.primary.calls()[0] {
            DrawCall::Line { y, .. } => assert_eq!(y, &vec![0.0, 0.5, 1.0]),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_tee_overrides() {
        let original = Subplot::default().register(
            Registration::new(make_data())
                .plot(line())
                .x("t")
                .y(each(["temp"])),
        );
        let mut style = AxesStyle::empty();
        style.label.insert("xlabel".to_string(), "Time".into());
        let copy = original.tee(&style, &[options([("y", "sal".into())])]);

        assert_eq!(copy.len(), 1);
        assert!(!original.style().label.contains_key("xlabel"));
        let rendered = copy.render(RecordingSurface::new()).unwrap();
        match &rendered.primary.calls()[0] {
            DrawCall::Line { y, .. } => assert_eq!(y, &vec![30.0, 31.0, 32.0, 33.0]),
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(rendered.primary.state().xlabel.as_ref().unwrap().0, "Time");
    }

    #[test]
    fn test_render_is_repeatable() {
        let subplot = Subplot::default()
            .register(
                Registration::new(make_data())
                    .plot(line())
                    .x("t")
                    .y("temp")
                    .cycler(["red", "blue"]),
            )
            .set_title("Run");
        let first = subplot.render(RecordingSurface::new()).unwrap();
        let second = subplot.render(RecordingSurface::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.primary.state().cycle, vec!["red", "blue"]);
    }
}
