//! Data loaders turning a subplot's data reference into a [`DataSource`].
//!
//! Load metadata keys: `header` (lines skipped before the header line),
//! `delimiter` (a single character), `encoding` (label of the file
//! encoding, detected when absent), `index` (column used as the row index)
//! and `time_index` (one or more columns read as dates, see
//! [`DataSource::set_time_index`]).

use crate::data::{Cell, DataSource};
use crate::error::{PlotError, Result};
use crate::option::{OptionMap, OptionValue};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, SHIFT_JIS};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Row-level transformation applied after loading.
pub type Transformer = Arc<dyn Fn(DataSource) -> Result<DataSource> + Send + Sync>;

/// Wrap a closure as a [`Transformer`].
pub fn transformer<F>(f: F) -> Transformer
where
    F: Fn(DataSource) -> Result<DataSource> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where the rows of a subplot entry come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataRef {
    /// An already materialized table.
    Table(Arc<DataSource>),
    /// Column name to values.
    Mapping(Vec<(String, Vec<Cell>)>),
    /// Delimited text files, concatenated in order.
    Paths(Vec<PathBuf>),
    /// The fixed preview table of [`FixtureLoader`].
    Fixture,
}

impl From<DataSource> for DataRef {
    fn from(data: DataSource) -> Self {
        DataRef::Table(Arc::new(data))
    }
}

impl From<Arc<DataSource>> for DataRef {
    fn from(data: Arc<DataSource>) -> Self {
        DataRef::Table(data)
    }
}

impl From<&str> for DataRef {
    fn from(path: &str) -> Self {
        DataRef::Paths(vec![PathBuf::from(path)])
    }
}

impl From<PathBuf> for DataRef {
    fn from(path: PathBuf) -> Self {
        DataRef::Paths(vec![path])
    }
}

impl From<Vec<PathBuf>> for DataRef {
    fn from(paths: Vec<PathBuf>) -> Self {
        DataRef::Paths(paths)
    }
}

/// Materializes a [`DataRef`].
pub trait DataLoader: Send + Sync {
    /// Load `source`, set the index named in `meta`, then run
    /// `transformers` in order.
    fn load(
        &self,
        source: &DataRef,
        meta: &OptionMap,
        transformers: &[Transformer],
    ) -> Result<DataSource>;
}

fn index_column(meta: &OptionMap) -> Result<Option<&str>> {
    match meta.get("index") {
        None | Some(OptionValue::Null) => Ok(None),
        Some(OptionValue::Text(name)) => Ok(Some(name.as_str())),
        Some(other) => Err(PlotError::config(format!(
            "'index' must be a column name, got {:?}",
            other
        ))),
    }
}

fn time_index_columns(meta: &OptionMap) -> Result<Vec<&str>> {
    let invalid = |value: &OptionValue| {
        PlotError::config(format!(
            "'time_index' must be a column name or a list of them, got {:?}",
            value
        ))
    };
    match meta.get("time_index") {
        None | Some(OptionValue::Null) => Ok(Vec::new()),
        Some(OptionValue::Text(name)) => Ok(vec![name.as_str()]),
        Some(OptionValue::List(items)) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| invalid(item)))
            .collect(),
        Some(other) => Err(invalid(other)),
    }
}

fn assemble(data: DataSource, meta: &OptionMap, transformers: &[Transformer]) -> Result<DataSource> {
    let mut data = match index_column(meta)? {
        Some(name) => data.set_index(name)?,
        None => data,
    };
    let time_columns = time_index_columns(meta)?;
    if !time_columns.is_empty() {
        data = data.set_time_index(&time_columns)?;
    }
    for transform in transformers {
        data = transform(data)?;
    }
    Ok(data)
}

fn unexpected(loader: &str, source: &DataRef) -> PlotError {
    PlotError::load(format!("{} cannot load {:?}", loader, source))
}

/// Loads [`DataRef::Table`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLoader;

impl DataLoader for TableLoader {
    fn load(
        &self,
        source: &DataRef,
        meta: &OptionMap,
        transformers: &[Transformer],
    ) -> Result<DataSource> {
        match source {
            DataRef::Table(data) => assemble(data.as_ref().clone(), meta, transformers),
            other => Err(unexpected("TableLoader", other)),
        }
    }
}

/// Loads [`DataRef::Mapping`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingLoader;

impl DataLoader for MappingLoader {
    fn load(
        &self,
        source: &DataRef,
        meta: &OptionMap,
        transformers: &[Transformer],
    ) -> Result<DataSource> {
        match source {
            DataRef::Mapping(columns) => {
                let data = DataSource::from_columns(columns.iter().cloned())?;
                assemble(data, meta, transformers)
            }
            other => Err(unexpected("MappingLoader", other)),
        }
    }
}

/// Loads [`DataRef::Paths`] as delimited text. Each file is read, indexed
/// and transformed on its own before the results are concatenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLoader;

impl CsvLoader {
    fn delimiter(path: &Path, meta: &OptionMap) -> Result<u8> {
        match meta.get("delimiter") {
            None | Some(OptionValue::Null) => {
                let tsv = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
                Ok(if tsv { b'\t' } else { b',' })
            }
            Some(OptionValue::Text(s)) if s.len() == 1 => Ok(s.as_bytes()[0]),
            Some(other) => Err(PlotError::config(format!(
                "'delimiter' must be a single character, got {:?}",
                other
            ))),
        }
    }

    fn header(meta: &OptionMap) -> Result<usize> {
        match meta.get("header") {
            None | Some(OptionValue::Null) => Ok(0),
            Some(value) => value
                .as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as usize)
                .ok_or_else(|| {
                    PlotError::config(format!("'header' must be a line count, got {:?}", value))
                }),
        }
    }

    /// Text of a file. An `encoding` label in `meta` is used as given.
    /// Otherwise valid UTF-8 is kept, anything else goes through detection
    /// and Shift-JIS is used when the guess does not decode cleanly.
    pub fn decode(bytes: &[u8], meta: &OptionMap) -> Result<String> {
        let forced = match meta.get("encoding") {
            None | Some(OptionValue::Null) => None,
            Some(OptionValue::Text(label)) => Some(
                Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| PlotError::config(format!("unknown encoding '{}'", label)))?,
            ),
            Some(other) => {
                return Err(PlotError::config(format!(
                    "'encoding' must be an encoding label, got {:?}",
                    other
                )))
            }
        };

        let encoding = match forced {
            Some(encoding) => encoding,
            None => {
                if let Ok(text) = std::str::from_utf8(bytes) {
                    return Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string());
                }
                let mut detector = EncodingDetector::new();
                detector.feed(bytes, true);
                detector.guess(None, false)
            }
        };

        let (text, used, malformed) = encoding.decode(bytes);
        if malformed && forced.is_none() && used != SHIFT_JIS {
            debug!("{} guess did not decode cleanly, using Shift_JIS", used.name());
            let (text, _, _) = SHIFT_JIS.decode(bytes);
            return Ok(text.into_owned());
        }
        if malformed {
            warn!("replaced malformed {} sequences", used.name());
        }
        debug!("decoded input as {}", used.name());
        Ok(text.into_owned())
    }

    /// Read one file, skipping `header` lines before the header line.
    pub fn read_file(path: &Path, meta: &OptionMap) -> Result<DataSource> {
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ["csv", "tsv", "txt"].iter().any(|ok| e.eq_ignore_ascii_case(ok)));
        if !supported {
            return Err(PlotError::load(format!("unsupported file type: {}", path.display())));
        }

        let bytes =
            fs::read(path).map_err(|e| PlotError::load(format!("{}: {}", path.display(), e)))?;
        let text = Self::decode(&bytes, meta)?;
        let body: String = text.split_inclusive('\n').skip(Self::header(meta)?).collect();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(Self::delimiter(path, meta)?)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        debug!("read {} rows from {}", rows.len(), path.display());
        DataSource::from_records(headers, rows)
    }
}

impl DataLoader for CsvLoader {
    fn load(
        &self,
        source: &DataRef,
        meta: &OptionMap,
        transformers: &[Transformer],
    ) -> Result<DataSource> {
        let DataRef::Paths(paths) = source else {
            return Err(unexpected("CsvLoader", source));
        };

        let tables = paths
            .iter()
            .map(|path| assemble(Self::read_file(path, meta)?, meta, transformers))
            .collect::<Result<Vec<_>>>()?;

        match tables.len() {
            0 => Ok(DataSource::empty()),
            1 => Ok(tables.into_iter().next().unwrap_or_default()),
            n => {
                info!("concatenating {} files", n);
                DataSource::concat(&tables)
            }
        }
    }
}

/// Ignores the source and yields a three-row `x`/`y` table. Used for
/// preview renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLoader;

impl FixtureLoader {
    pub fn table() -> Result<DataSource> {
        DataSource::from_columns(vec![
            ("x", vec![Cell::Number(0.0), Cell::Number(0.5), Cell::Number(1.0)]),
            ("y", vec![Cell::Number(0.0), Cell::Number(0.5), Cell::Number(1.0)]),
        ])
    }
}

impl DataLoader for FixtureLoader {
    fn load(&self, _: &DataRef, _: &OptionMap, _: &[Transformer]) -> Result<DataSource> {
        Self::table()
    }
}

/// Dispatches on the kind of data reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoader;

impl DataLoader for DefaultLoader {
    fn load(
        &self,
        source: &DataRef,
        meta: &OptionMap,
        transformers: &[Transformer],
    ) -> Result<DataSource> {
        match source {
            DataRef::Table(_) => TableLoader.load(source, meta, transformers),
            DataRef::Mapping(_) => MappingLoader.load(source, meta, transformers),
            DataRef::Paths(_) => CsvLoader.load(source, meta, transformers),
            DataRef::Fixture => FixtureLoader.load(source, meta, transformers),
        }
    }
}

impl fmt::Debug for dyn DataLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataLoader")
    }
}
