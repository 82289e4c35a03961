//! Theme definitions for Sankey diagrams

use crate::canvas::Color;
use crate::model::Rgb;

/// Palette slot used for the source bar when its record has no color.
///
/// Destinations without a color take palette entries starting right after
/// this slot, so they never repeat the default source color.
pub const DEFAULT_SOURCE_COLOR_PALETTE_INDEX: usize = 1;

/// Fallback colors, in assignment order
const STANDARD_PALETTE: [(u8, u8, u8); 21] = [
    (230, 25, 75),
    (60, 180, 75),
    (255, 225, 25),
    (0, 130, 200),
    (245, 130, 48),
    (145, 30, 180),
    (70, 240, 240),
    (240, 50, 230),
    (210, 245, 60),
    (250, 190, 190),
    (0, 128, 128),
    (230, 190, 255),
    (170, 110, 40),
    (255, 250, 200),
    (128, 0, 0),
    (170, 255, 195),
    (128, 128, 0),
    (255, 215, 180),
    (0, 0, 128),
    (128, 128, 128),
    (255, 255, 255),
];

const GRAYSCALE_PALETTE: [(u8, u8, u8); 12] = [
    (40, 40, 40),
    (90, 90, 90),
    (120, 120, 120),
    (150, 150, 150),
    (180, 180, 180),
    (60, 60, 60),
    (105, 105, 105),
    (135, 135, 135),
    (165, 165, 165),
    (195, 195, 195),
    (75, 75, 75),
    (210, 210, 210),
];

/// Theme colors and fonts
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Canvas background
    pub background: Color,
    /// Stroke color for bar and band outlines
    pub border_color: Color,
    /// Title and label color
    pub text_color: Color,
    /// Font family
    pub font_family: String,
    /// Fallback node colors
    pub palette: Vec<Rgb>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Light gray canvas, black outlines, the 21-color standard palette
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            background: Color::LIGHT_GRAY,
            border_color: Color::BLACK,
            text_color: Color::BLACK,
            font_family: "Calibri, sans-serif".to_string(),
            palette: STANDARD_PALETTE.iter().copied().map(Rgb::from).collect(),
        }
    }

    /// White canvas with the standard palette
    pub fn paper() -> Self {
        Self {
            name: "paper".to_string(),
            background: Color::WHITE,
            border_color: Color::new(51, 51, 51),
            text_color: Color::new(33, 33, 33),
            font_family: "sans-serif".to_string(),
            palette: STANDARD_PALETTE.iter().copied().map(Rgb::from).collect(),
        }
    }

    /// Dark canvas, light outlines
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color::new(26, 26, 46),
            border_color: Color::new(224, 224, 224),
            text_color: Color::new(240, 240, 240),
            font_family: "sans-serif".to_string(),
            palette: STANDARD_PALETTE.iter().copied().map(Rgb::from).collect(),
        }
    }

    /// Grayscale palette for print
    pub fn plain() -> Self {
        Self {
            name: "plain".to_string(),
            background: Color::WHITE,
            border_color: Color::BLACK,
            text_color: Color::BLACK,
            font_family: "serif".to_string(),
            palette: GRAYSCALE_PALETTE.iter().copied().map(Rgb::from).collect(),
        }
    }

    /// Color given to a source record without one.
    ///
    /// Falls back to black for a custom palette too short to hold the slot.
    pub fn default_source_color(&self) -> Rgb {
        self.palette_color(DEFAULT_SOURCE_COLOR_PALETTE_INDEX)
            .unwrap_or(Rgb::new(0.0, 0.0, 0.0))
    }

    /// Palette entry for the `position`-th destination record (0-based).
    ///
    /// Returns `None` once the palette runs out; there is no wrap-around.
    pub fn destination_color(&self, position: usize) -> Option<Rgb> {
        self.palette_color(position + DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 1)
    }

    pub fn palette_color(&self, index: usize) -> Option<Rgb> {
        self.palette.get(index).copied()
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "paper" | "white" => Some(Self::paper()),
            "dark" | "night" => Some(Self::dark()),
            "plain" | "monochrome" | "grayscale" => Some(Self::plain()),
            _ => None,
        }
    }

    /// List all available theme names
    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "paper", "dark", "plain"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_color_is_second_palette_entry() {
        let theme = Theme::default();
        assert_eq!(theme.default_source_color(), Rgb::new(60.0, 180.0, 75.0));
    }

    #[test]
    fn test_destination_colors_start_after_source_slot() {
        let theme = Theme::default();
        assert_eq!(theme.destination_color(0), Some(Rgb::new(255.0, 225.0, 25.0)));
        assert_eq!(theme.destination_color(1), Some(Rgb::new(0.0, 130.0, 200.0)));
        assert_eq!(theme.destination_color(18), Some(Rgb::new(255.0, 255.0, 255.0)));
        assert_eq!(theme.destination_color(19), None);
    }

    #[test]
    fn test_by_name() {
        for name in Theme::available_themes() {
            let theme = Theme::by_name(name).unwrap();
            assert_eq!(theme.name, name);
            assert!(theme.palette.len() > DEFAULT_SOURCE_COLOR_PALETTE_INDEX + 1);
        }
        assert_eq!(Theme::by_name("GRAYSCALE").map(|t| t.name), Some("plain".to_string()));
        assert!(Theme::by_name("neon").is_none());
    }
}
