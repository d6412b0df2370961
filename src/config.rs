//! JSON figure description.
//!
//! ```json
//! {
//!   "columns": 2,
//!   "render": { "width": 1200, "height": 500, "type": "png" },
//!   "subplots": [
//!     {
//!       "title": "Temperature",
//!       "style": { "grid": { "linestyle": "--" } },
//!       "entries": [
//!         {
//!           "data": "weather.csv",
//!           "plot": ["scatter()", "line(color: \"red\")"],
//!           "y": "temp",
//!           "ylim": [0, null]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Option values are plain JSON; an object of the single key `each`
//! holding an array is a per-series vector.

use crate::axes::AxesStyle;
use crate::data::DataSource;
use crate::figure::{Figure, Identifier};
use crate::loader::DataRef;
use crate::option::{list, OptionMap, OptionValue};
use crate::parser::{parse_calls, parse_value};
use crate::select::MissingColumn;
use crate::subplot::{Registration, Subplot};
use crate::surface::RecordingSurface;
use crate::RenderOptions;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct FigureConfig {
    #[serde(default)]
    pub render: RenderOptions,
    /// Panels per row of the output grid.
    #[serde(default = "default_columns")]
    pub columns: usize,
    pub subplots: Vec<SubplotConfig>,
    /// Axes style applied over every subplot's own style.
    #[serde(skip)]
    pub style_overrides: OptionMap,
}

fn default_columns() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubplotConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Axes style options, see [`AxesStyle::update`].
    #[serde(default)]
    pub style: Map<String, Value>,
    #[serde(default)]
    pub clip_to_xlim: bool,
    /// Time x axis: entry indexes are dates, see [`Subplot::time`].
    #[serde(default)]
    pub time: bool,
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DataConfig {
    Path(String),
    Paths(Vec<String>),
    Records { records: Vec<Value> },
    Fixture { fixture: bool },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColumnsConfig {
    One(String),
    Many(Vec<String>),
}

impl ColumnsConfig {
    fn to_option(&self) -> OptionValue {
        match self {
            ColumnsConfig::One(column) => column.as_str().into(),
            ColumnsConfig::Many(columns) => list(columns.iter().map(String::as_str)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlotConfig {
    One(String),
    Many(Vec<String>),
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig::Many(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub header: Option<usize>,
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Encoding label such as `"shift_jis"`; detected when absent.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Index column. Time subplots read it as dates and accept a date
    /// column plus a time column.
    #[serde(default)]
    pub index: Option<ColumnsConfig>,
    /// Date column, or date and time columns, indexing the rows.
    #[serde(default)]
    pub time_index: Option<ColumnsConfig>,
    /// Call syntax, e.g. `line(color: "red") | scatter()`.
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub option: Map<String, Value>,
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    /// Bounds are numbers, date strings or null.
    #[serde(default)]
    pub xlim: Option<[Value; 2]>,
    #[serde(default)]
    pub ylim: Option<[Option<f64>; 2]>,
    #[serde(default)]
    pub xscale: Option<String>,
    #[serde(default)]
    pub yscale: Option<String>,
    #[serde(default)]
    pub xlabel: Option<String>,
    #[serde(default)]
    pub ylabel: Option<String>,
    /// Further axes style options carried by this entry.
    #[serde(default)]
    pub style: Map<String, Value>,
    /// Select the row index when a named column is absent.
    #[serde(default)]
    pub index_fallback: bool,
    #[serde(default)]
    pub second_axis: bool,
}

/// Convert a JSON value to an option value.
pub fn option_from_json(value: &Value) -> OptionValue {
    match value {
        Value::Null => OptionValue::Null,
        Value::Bool(b) => OptionValue::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(OptionValue::Null, OptionValue::Number),
        Value::String(s) => OptionValue::Text(s.clone()),
        Value::Array(items) => OptionValue::List(items.iter().map(option_from_json).collect()),
        Value::Object(map) => match (map.len(), map.get("each")) {
            (1, Some(Value::Array(items))) => {
                OptionValue::Each(items.iter().map(option_from_json).collect())
            }
            _ => OptionValue::Map(options_from_json(map)),
        },
    }
}

pub fn options_from_json(map: &Map<String, Value>) -> OptionMap {
    map.iter()
        .map(|(key, value)| (key.clone(), option_from_json(value)))
        .collect()
}

impl FigureConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read figure description {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid figure description {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: FigureConfig = serde_json::from_str(text).context("Failed to parse JSON")?;
        Ok(config)
    }

    /// Record a `key=value` axes style override. The value uses the call
    /// syntax of plot options, e.g. `xlim=[0, 10]` or `xFmt="%H:%M"`.
    pub fn override_style(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Style override '{}' is not key=value", assignment))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Style override '{}' has no key", assignment);
        }
        let value =
            parse_value(value).with_context(|| format!("Invalid value for style '{}'", key))?;
        self.style_overrides.insert(key.to_string(), value);
        Ok(())
    }

    /// Build every subplot. Relative data paths are resolved against
    /// `base_dir`. In preview mode each subplot draws the fixture table.
    pub fn figure(&self, base_dir: &Path, preview: bool) -> Result<Figure<RecordingSurface>> {
        let overrides = AxesStyle::update(&self.style_overrides).context("Invalid style override")?;
        let mut figure = Figure::new();
        for (position, subplot) in self.subplots.iter().enumerate() {
            let built = subplot
                .build(base_dir)
                .with_context(|| format!("Subplot {}", position))?
                .tee(&overrides, &[])
                .test_mode(preview);
            let identifier = subplot.id.as_deref().map(Identifier::from);
            figure.add_subplot(built, identifier)?;
        }
        debug!("built figure with {} subplots", figure.len());
        Ok(figure)
    }
}

impl SubplotConfig {
    pub fn build(&self, base_dir: &Path) -> Result<Subplot> {
        let style = AxesStyle::from_options(&options_from_json(&self.style))?;
        let subplot = if self.time {
            Subplot::time(style)
        } else {
            Subplot::new(style)
        };
        let mut subplot = subplot.clip_to_xlim(self.clip_to_xlim);
        if let Some(title) = &self.title {
            subplot = subplot.set_title(title);
        }
        for (index, entry) in self.entries.iter().enumerate() {
            let registration = entry
                .registration(base_dir)
                .with_context(|| format!("Entry {}", index))?;
            subplot = subplot.register(registration);
        }
        Ok(subplot)
    }
}

impl DataConfig {
    fn data_ref(&self, base_dir: &Path) -> Result<DataRef> {
        let resolve = |path: &String| -> PathBuf { base_dir.join(path) };
        Ok(match self {
            DataConfig::Path(path) => DataRef::from(resolve(path)),
            DataConfig::Paths(paths) => DataRef::from(paths.iter().map(resolve).collect::<Vec<_>>()),
            DataConfig::Records { records } => {
                DataRef::from(DataSource::from_json(&Value::Array(records.clone()))?)
            }
            DataConfig::Fixture { .. } => DataRef::Fixture,
        })
    }
}

impl EntryConfig {
    pub fn registration(&self, base_dir: &Path) -> Result<Registration> {
        let mut registration = Registration::new(self.data.data_ref(base_dir)?);

        if let Some(lines) = self.header {
            registration = registration.header(lines);
        }
        if let Some(delimiter) = &self.delimiter {
            registration = registration.meta("delimiter", delimiter.as_str());
        }
        if let Some(encoding) = &self.encoding {
            registration = registration.meta("encoding", encoding.as_str());
        }
        if let Some(index) = &self.index {
            registration = registration.meta("index", index.to_option());
        }
        if let Some(columns) = &self.time_index {
            registration = registration.meta("time_index", columns.to_option());
        }

        let calls = match &self.plot {
            PlotConfig::One(chain) => vec![chain.clone()],
            PlotConfig::Many(calls) => calls.clone(),
        };
        for chain in &calls {
            let presets =
                parse_calls(chain).with_context(|| format!("Invalid plot call '{}'", chain))?;
            let policy = if self.index_fallback {
                MissingColumn::UseIndex
            } else {
                MissingColumn::Error
            };
            registration =
                registration.plots(presets.into_iter().map(|p| p.with_missing_column(policy)));
        }

        registration = registration.options(&options_from_json(&self.option));
        if let Some(x) = &self.x {
            registration = registration.x(option_from_json(x));
        }
        if let Some(y) = &self.y {
            registration = registration.y(option_from_json(y));
        }

        if let Some([lo, hi]) = &self.xlim {
            registration = registration.xlim_bounds(option_from_json(lo), option_from_json(hi));
        }
        if let Some([lo, hi]) = self.ylim {
            registration = registration.ylim(lo, hi);
        }
        if let Some(scale) = &self.xscale {
            registration = registration.xscale(scale);
        }
        if let Some(scale) = &self.yscale {
            registration = registration.yscale(scale);
        }
        if let Some(text) = &self.xlabel {
            registration = registration.xlabel(text);
        }
        if let Some(text) = &self.ylabel {
            registration = registration.ylabel(text);
        }
        if !self.style.is_empty() {
            registration = registration.style(&AxesStyle::update(&options_from_json(&self.style))?);
        }
        if self.second_axis {
            registration = registration.second_axis();
        }
        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::each;
    use crate::OutputFormat;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_option_from_json() {
        let value: Value = serde_json::json!({
            "color": {"each": ["red", "blue"]},
            "lw": 2,
            "pad": [1, null],
            "font": {"size": 10}
        });
        let map = option_from_json(&value);
        let map = map.as_map().unwrap();
        assert_eq!(map["color"], each(["red", "blue"]));
        assert_eq!(map["lw"], OptionValue::Number(2.0));
        assert_eq!(
            map["pad"],
            OptionValue::List(vec![OptionValue::Number(1.0), OptionValue::Null])
        );
        assert_eq!(map["font"].as_map().unwrap()["size"], OptionValue::Number(10.0));
    }

    #[test]
    fn test_defaults() {
        let config = FigureConfig::from_json_str(r#"{"subplots": []}"#).unwrap();
        assert_eq!(config.columns, 1);
        assert_eq!(config.render.width, 800);
        assert!(matches!(config.render.format, OutputFormat::Png));
    }

    #[test]
    fn test_data_variants() {
        let config = FigureConfig::from_json_str(
            r#"{"subplots": [{"entries": [
                {"data": "a.csv"},
                {"data": ["a.csv", "b.csv"]},
                {"data": {"records": [{"x": 1}]}},
                {"data": {"fixture": true}}
            ]}]}"#,
        )
        .unwrap();
        let entries = &config.subplots[0].entries;
        assert!(matches!(entries[0].data, DataConfig::Path(_)));
        assert!(matches!(entries[1].data, DataConfig::Paths(ref p) if p.len() == 2));
        assert!(matches!(entries[2].data, DataConfig::Records { .. }));
        assert!(matches!(entries[3].data, DataConfig::Fixture { .. }));
    }

    #[test]
    fn test_unknown_entry_field_rejected() {
        let result = FigureConfig::from_json_str(
            r#"{"subplots": [{"entries": [{"data": "a.csv", "colour": "red"}]}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_renders_records() {
        let config = FigureConfig::from_json_str(
            r#"{"subplots": [{
                "id": "main",
                "title": "Demo",
                "entries": [{
                    "data": {"records": [{"t": 0, "v": 1}, {"t": 1, "v": 3}]},
                    "plot": "scatter() | line(color: \"red\")",
                    "x": "t",
                    "y": "v",
                    "ylim": [0, null],
                    "xlabel": "time"
                }]
            }]}"#,
        )
        .unwrap();
        let figure = config.figure(Path::new("."), false).unwrap();
        assert_eq!(figure.identifiers(), vec![&Identifier::from("main")]);

        let rendered = figure.render_ordered(vec![RecordingSurface::new()]).unwrap();
        let surface = &rendered[0].1.primary;
        assert_eq!(&surface.kinds()[..2], &["scatter", "line"]);
        assert_eq!(surface.state().title.as_ref().map(|(t, _)| t.as_str()), Some("Demo"));
        assert_eq!(surface.state().ylim.map(|(lo, _)| lo), Some(0.0));
    }

    #[test]
    fn test_relative_paths_resolved() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(dir.path().join("data.csv")).unwrap();
        writeln!(file, "x,y\n1,2\n2,4").unwrap();

        let config = FigureConfig::from_json_str(
            r#"{"subplots": [{"entries": [
                {"data": "data.csv", "plot": ["line()"], "x": "x", "y": "y"}
            ]}]}"#,
        )
        .unwrap();
        let figure = config.figure(dir.path(), false).unwrap();
        let rendered = figure.render_ordered(vec![RecordingSurface::new()]).unwrap();
        assert_eq!(rendered[0].1.primary.kinds()[0], "line");
    }

    #[test]
    fn test_time_subplot_from_json() {
        let config = FigureConfig::from_json_str(
            r#"{"subplots": [{
                "time": true,
                "clip_to_xlim": true,
                "entries": [{
                    "data": {"records": [
                        {"day": "2018/08/09", "clock": "12:00:00", "sal": 30},
                        {"day": "2018/08/10", "clock": "12:00:00", "sal": 31}
                    ]},
                    "time_index": ["day", "clock"],
                    "plot": "line()",
                    "y": "sal",
                    "xlim": ["2018/08/10 00:00:00", null]
                }]
            }]}"#,
        )
        .unwrap();
        let figure = config.figure(Path::new("."), false).unwrap();
        let rendered = figure.render_ordered(vec![RecordingSurface::new()]).unwrap();
        let surface = &rendered[0].1.primary;

        let noon = crate::time::parse_datetime("2018/08/10 12:00:00").unwrap();
        match &surface.calls()[0] {
            crate::surface::DrawCall::Line { x, .. } => assert_eq!(x, &vec![noon]),
            other => panic!("unexpected call {:?}", other),
        }
        assert!(surface
            .state()
            .ticks
            .iter()
            .any(|(_, style)| style.get("format") == Some(&OptionValue::from("%m/%d"))));
    }

    #[test]
    fn test_style_override() {
        let mut config = FigureConfig::from_json_str(
            r#"{"subplots": [
                {"entries": [{"data": {"fixture": true}, "plot": "line()", "y": "y"}]},
                {"style": {"ylim": [5, 6]}, "entries": []}
            ]}"#,
        )
        .unwrap();
        config.override_style("ylim=[0, 2]").unwrap();
        config.override_style(" grid = {color: \"black\"}").unwrap();
        assert_eq!(config.style_overrides["ylim"], OptionValue::List(vec![0.into(), 2.into()]));

        let figure = config.figure(Path::new("."), false).unwrap();
        let rendered = figure
            .render_ordered(vec![RecordingSurface::new(), RecordingSurface::new()])
            .unwrap();
        for (_, panel) in &rendered {
            assert_eq!(panel.primary.state().ylim, Some((0.0, 2.0)));
            let grid = panel.primary.state().grid.as_ref().unwrap();
            assert_eq!(grid["color"], OptionValue::from("black"));
        }

        assert!(config.override_style("ylim").is_err());
        assert!(config.override_style("=[1]").is_err());
        assert!(config.override_style("ylim=[0,").is_err());
    }

    #[test]
    fn test_bad_call_reports_context() {
        let config = FigureConfig::from_json_str(
            r#"{"subplots": [{"entries": [{"data": {"fixture": true}, "plot": ["pie()"]}]}]}"#,
        )
        .unwrap();
        let err = config.figure(Path::new("."), false).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Subplot 0"));
        assert!(message.contains("pie"));
    }
}
