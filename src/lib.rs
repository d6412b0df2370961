// Library exports for plotdeck

pub mod action;
pub mod axes;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod factor;
pub mod figure;
pub mod loader;
pub mod option;
pub mod parser;
pub mod plot;
pub mod render;
pub mod select;
pub mod stats;
pub mod style;
pub mod subplot;
pub mod surface;
pub mod time;

pub use action::{Action, PlotAction, Preset};
pub use axes::AxesStyle;
pub use data::{Cell, DataSource};
pub use error::{PlotError, Result};
pub use figure::{Figure, Identifier, Renderable};
pub use loader::{DataLoader, DataRef};
pub use option::{each, list, options, OptionMap, OptionValue};
pub use subplot::{Registration, Rendered, Subplot};
pub use surface::{RecordingSurface, Surface};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: OutputFormat::Png,
        }
    }
}
