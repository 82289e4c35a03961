//! WebAssembly bindings for sankey-core

use sankey_core::{Config, Theme};
use wasm_bindgen::prelude::*;

/// Render a Sankey diagram to SVG
///
/// # Arguments
/// * `input` - The diagram source (title line, source line, destination lines)
///
/// # Returns
/// The rendered SVG as a string, or an error message
#[wasm_bindgen]
pub fn render(input: &str) -> Result<String, String> {
    render_with_config(input, Config::default())
}

/// Render a Sankey diagram to SVG with a specific theme
///
/// # Arguments
/// * `input` - The diagram source
/// * `theme_name` - The name of the theme to use (e.g., "paper", "dark", "plain")
///
/// # Returns
/// The rendered SVG as a string, or an error message
#[wasm_bindgen]
pub fn render_with_theme(input: &str, theme_name: &str) -> Result<String, String> {
    let theme = Theme::by_name(theme_name).unwrap_or_else(Theme::default);
    render_with_config(input, Config::default().with_theme(theme))
}

/// Render a Sankey diagram onto a canvas of the given size
#[wasm_bindgen]
pub fn render_sized(input: &str, width: f64, height: f64) -> Result<String, String> {
    let valid = |side: f64| side.is_finite() && side > 0.0;
    if !(valid(width) && valid(height)) {
        return Err(format!(
            "canvas size must be positive and finite, got {}x{}",
            width, height
        ));
    }
    render_with_config(input, Config::default().with_size(width, height))
}

/// Get a list of available theme names
#[wasm_bindgen]
pub fn available_themes() -> Vec<String> {
    Theme::available_themes()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parse a Sankey diagram and return its JSON representation
///
/// # Returns
/// `{"title", "source": {"label", "color"}, "destinations": [{"label", "flow", "color"}]}`,
/// or an error message
#[wasm_bindgen]
pub fn parse_to_json(input: &str) -> Result<String, String> {
    let spec = sankey_core::parse(input).map_err(|e| e.to_string())?;
    serde_json::to_string(&spec).map_err(|e| e.to_string())
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn render_with_config(input: &str, config: Config) -> Result<String, String> {
    let spec = sankey_core::parse_with_theme(input, &config.theme).map_err(|e| e.to_string())?;
    Ok(sankey_core::render_svg(&spec, &config))
}
