//! Error types shared by the plot-action engine, subplots and loaders.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors raised while building or applying plot actions.
///
/// Empty data is never an error: actions built over an empty table are
/// identity no-ops.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Inconsistent sizes or option values supplied by the caller, e.g. a
    /// slot list whose length differs from the number of subplots.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A selector could not be resolved against the data source, or the
    /// selected values have the wrong shape.
    #[error("Selection error: {0}")]
    Selection(String),

    /// The drawing surface rejected a primitive call.
    #[error("Draw error in '{primitive}': {message}")]
    Draw { primitive: String, message: String },

    /// The data loader failed to materialize a source.
    #[error("Load error: {0}")]
    Load(String),

    /// Attribution wrapper naming the subplot entry that failed.
    #[error("entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<PlotError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PlotError {
    pub fn config(message: impl Into<String>) -> Self {
        PlotError::Configuration(message.into())
    }

    pub fn selection(message: impl Into<String>) -> Self {
        PlotError::Selection(message.into())
    }

    pub fn draw(primitive: &str, message: impl Into<String>) -> Self {
        PlotError::Draw {
            primitive: primitive.to_string(),
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        PlotError::Load(message.into())
    }

    /// Wrap this error with the index of the subplot entry that raised it.
    pub fn at_entry(self, index: usize) -> Self {
        PlotError::Entry {
            index,
            source: Box::new(self),
        }
    }
}
