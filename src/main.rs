use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use plotdeck::config::FigureConfig;
use plotdeck::render;
use plotdeck::surface::RecordingSurface;
use plotdeck::OutputFormat;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "plotdeck")]
#[command(about = "Render figures described in JSON to PNG or SVG", long_about = None)]
struct Args {
    /// Figure description (JSON)
    figure: PathBuf,
    /// Output file; the image is written to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Override the output format of the description
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Override the number of panels per row
    #[arg(long)]
    columns: Option<usize>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Draw the built-in fixture table instead of the configured data
    #[arg(long)]
    preview: bool,
    /// Axes style override for every subplot, e.g. `--style 'ylim=[0, 10]'`
    #[arg(long = "style", value_name = "KEY=VALUE")]
    styles: Vec<String>,
    /// Log verbosity level
    #[arg(long, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.to_level_filter())
        .format_module_path(false)
        .init();

    let mut config = FigureConfig::from_path(&args.figure)?;
    if let Some(format) = args.format {
        config.render.format = format;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    for assignment in &args.styles {
        config.override_style(assignment)?;
    }
    let columns = args.columns.unwrap_or(config.columns);

    let base_dir = args.figure.parent().unwrap_or(Path::new("."));
    let figure = config
        .figure(base_dir, args.preview)
        .context("Failed to build figure")?;

    let slots = (0..figure.len()).map(|_| RecordingSurface::new()).collect();
    let panels: Vec<_> = figure
        .render_ordered(slots)
        .context("Failed to render figure")?
        .into_iter()
        .map(|(_, rendered)| rendered)
        .collect();

    let bytes = render::to_image(&panels, columns, &config.render)
        .context("Failed to rasterize figure")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write image to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
