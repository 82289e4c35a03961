//! CLI argument definitions and the render command

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sankey_core::{load, render_svg, Config, Theme};

const PROMPT: &str = "Enter the name of the file: ";

#[derive(Parser, Debug)]
#[command(name = "sankey")]
#[command(version, about = "Render a single-source Sankey diagram file as SVG on stdout")]
pub struct Cli {
    /// Diagram file to render; asked for interactively when omitted
    pub file: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Color theme (default, paper, dark, plain)
    #[arg(short, long, default_value = "default")]
    pub theme: String,

    /// Log level filter (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Failures that stop the program before anything is rendered
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("A file with that name does not exist.")]
    FileNotFound,
    #[error("An error occurred while opening the file.")]
    Unreadable(#[source] io::Error),
    #[error("No file name was entered.")]
    MissingFileName,
    #[error("unknown theme `{name}` (available: {available})")]
    UnknownTheme { name: String, available: String },
    #[error("canvas size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

impl Cli {
    fn config(&self) -> Result<Config, ConfigurationError> {
        let valid = |side: f64| side.is_finite() && side > 0.0;
        if !(valid(self.width) && valid(self.height)) {
            return Err(ConfigurationError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let theme = Theme::by_name(&self.theme).ok_or_else(|| ConfigurationError::UnknownTheme {
            name: self.theme.clone(),
            available: Theme::available_themes().join(", "),
        })?;
        Ok(Config::default()
            .with_theme(theme)
            .with_size(self.width, self.height))
    }
}

/// Load the diagram named on the command line (or at the prompt) and write
/// its SVG rendering to `out`
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = cli.config()?;

    let path = match &cli.file {
        Some(path) => path.clone(),
        None => {
            // stdout carries the SVG document
            let stdin = io::stdin();
            let stderr = io::stderr();
            prompt_file_name(stdin.lock(), stderr.lock())?
        }
    };

    let file = open(&path)?;
    let spec = load(BufReader::new(file), &config.theme)
        .with_context(|| format!("could not load {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        destinations = spec.destinations.len(),
        total_flow = spec.total_flow(),
        "rendering diagram"
    );

    let svg = render_svg(&spec, &config);
    out.write_all(svg.as_bytes())
        .context("failed to write SVG output")?;
    out.flush().context("failed to write SVG output")?;
    Ok(())
}

/// Ask for a file name on `output` and read one line from `input`
pub fn prompt_file_name<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<PathBuf, ConfigurationError> {
    write!(output, "{}", PROMPT)
        .and_then(|_| output.flush())
        .map_err(ConfigurationError::Unreadable)?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(ConfigurationError::Unreadable)?;

    let name = line.trim();
    if name.is_empty() {
        return Err(ConfigurationError::MissingFileName);
    }
    Ok(PathBuf::from(name))
}

fn open(path: &Path) -> Result<File, ConfigurationError> {
    File::open(path).map_err(|source| {
        tracing::debug!(path = %path.display(), error = %source, "failed to open diagram file");
        match source.kind() {
            io::ErrorKind::NotFound => ConfigurationError::FileNotFound,
            _ => ConfigurationError::Unreadable(source),
        }
    })
}
