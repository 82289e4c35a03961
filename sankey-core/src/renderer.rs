//! Layout and rendering for single-source Sankey diagrams

use std::f64::consts::{FRAC_PI_2, PI};

use crate::canvas::{Anchor, Canvas, Color, TextStyle};
use crate::model::{DiagramSpec, Rgb};
use crate::svg::SvgCanvas;
use crate::theme::Theme;

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Canvas width used by [`render_svg`]
    pub width: f64,
    /// Canvas height used by [`render_svg`]
    pub height: f64,
    /// Distance from the left edge to the source label, and from the right
    /// edge to the destination bars
    pub padding_x: f64,
    /// Space kept free above the first and below the last destination bar
    pub padding_y: f64,
    /// Gap between a bar and its label
    pub spacing_x: f64,
    /// Vertical gap between destination bars
    pub spacing_y: f64,
    /// Width of every bar
    pub bar_width: f64,
    /// Baseline of the title, measured from the top
    pub title_y: f64,
    pub title_font_size: f64,
    pub label_font_size: f64,
    /// Theme for colors and fonts
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding_x: 150.0,
            padding_y: 75.0,
            spacing_x: 10.0,
            spacing_y: 10.0,
            bar_width: 25.0,
            title_y: 35.0,
            title_font_size: 20.0,
            label_font_size: 12.0,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Set the theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the canvas size used by [`render_svg`]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// An axis-aligned bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bar {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Vertical placement of one band.
///
/// The band leaves the source bar with its top edge at `source_y` and
/// arrives at the destination bar with its top edge at `target_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub source_y: f64,
    pub target_y: f64,
    pub thickness: f64,
}

impl Band {
    /// Top edge of the band at `column` out of `columns`
    pub fn top_at(&self, column: f64, columns: f64) -> f64 {
        self.source_y - band_offset(column, columns, self.source_y - self.target_y)
    }
}

/// Ease-in/ease-out vertical offset of a band.
///
/// Zero at `x = 0`, half of `delta` at the midpoint and approaching `delta`
/// as `x` reaches `range_width`.
pub fn band_offset(x: f64, range_width: f64, delta: f64) -> f64 {
    ((x / range_width * PI - FRAC_PI_2).sin() + 1.0) / 2.0 * delta
}

/// Geometry of a whole diagram on a canvas of a given size
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub total_flow: f64,
    /// Pixels per unit of flow
    pub scale: f64,
    pub source: Bar,
    /// One bar per destination, in stacking order
    pub destinations: Vec<Bar>,
    /// One band per destination, in stacking order
    pub bands: Vec<Band>,
    /// Whole-pixel columns between the source bar and the destination bars
    pub band_width: usize,
}

impl Layout {
    pub fn compute(spec: &DiagramSpec, width: f64, height: f64, config: &Config) -> Layout {
        let count = spec.destinations.len() as f64;
        let total_flow = spec.total_flow();
        let reserved = 2.0 * config.padding_y + count * config.spacing_y;
        let available = height - reserved;
        if available <= 0.0 {
            tracing::warn!(
                height,
                reserved,
                destinations = spec.destinations.len(),
                "no vertical space left for bars; diagram will render inverted"
            );
        }
        let scale = available / total_flow;

        let source_height = total_flow * scale;
        let source = Bar {
            x: config.padding_x + config.spacing_x,
            y: (height - source_height) / 2.0,
            width: config.bar_width,
            height: source_height,
        };

        let dest_x = width - config.padding_x;
        let mut source_cursor = source.y;
        let mut dest_cursor = config.padding_y;
        let mut destinations = Vec::with_capacity(spec.destinations.len());
        let mut bands = Vec::with_capacity(spec.destinations.len());

        for node in &spec.destinations {
            let bar = Bar {
                x: dest_x,
                y: dest_cursor,
                width: config.bar_width,
                height: node.flow * scale,
            };
            bands.push(Band {
                source_y: source_cursor,
                target_y: dest_cursor,
                thickness: bar.height,
            });
            destinations.push(bar);

            source_cursor += bar.height;
            dest_cursor += bar.height + config.spacing_y;
        }

        let band_width = (dest_x - source.right()).floor().max(0.0) as usize;

        Layout {
            total_flow,
            scale,
            source,
            destinations,
            bands,
            band_width,
        }
    }
}

/// Render a diagram with the default config
pub fn render<C: Canvas + ?Sized>(spec: &DiagramSpec, canvas: &mut C) {
    render_with_config(spec, canvas, &Config::default());
}

/// Render a diagram onto `canvas`.
///
/// Expects a loader-validated spec: at least one destination and a positive
/// total flow.
pub fn render_with_config<C: Canvas + ?Sized>(spec: &DiagramSpec, canvas: &mut C, config: &Config) {
    let width = canvas.width();
    let layout = Layout::compute(spec, width, canvas.height(), config);
    tracing::debug!(
        total_flow = layout.total_flow,
        scale = layout.scale,
        destinations = layout.destinations.len(),
        band_width = layout.band_width,
        "computed sankey layout"
    );

    let theme = &config.theme;
    let border = theme.border_color;
    let label_style = |anchor| TextStyle {
        anchor,
        font_size: config.label_font_size,
        color: theme.text_color,
    };

    let source = layout.source;
    canvas.fill_rect(
        source.x,
        source.y,
        source.width,
        source.height,
        spec.source.color.to_color(),
    );
    // right edge faces the bands
    canvas.draw_line(source.x, source.y, source.right(), source.y, border);
    canvas.draw_line(source.x, source.y, source.x, source.bottom(), border);
    canvas.draw_line(source.x, source.bottom(), source.right(), source.bottom(), border);

    canvas.draw_text(
        width / 2.0,
        config.title_y,
        &spec.title,
        &TextStyle {
            anchor: Anchor::Center,
            font_size: config.title_font_size,
            color: theme.text_color,
        },
    );
    canvas.draw_text(
        config.padding_x,
        source.center_y(),
        &spec.source.label,
        &label_style(Anchor::East),
    );

    let nodes = spec.destinations.iter();
    for ((node, bar), band) in nodes.zip(&layout.destinations).zip(&layout.bands) {
        canvas.fill_rect(bar.x, bar.y, bar.width, bar.height, node.color.to_color());

        tracing::trace!(label = %node.label, ?band, "drawing band");
        draw_band(
            canvas,
            band,
            source.right(),
            layout.band_width,
            spec.source.color,
            node.color,
            border,
        );

        canvas.draw_text(
            bar.right() + config.spacing_x,
            bar.center_y(),
            &node.label,
            &label_style(Anchor::West),
        );

        // left edge faces the bands
        canvas.draw_line(bar.x, bar.y, bar.right(), bar.y, border);
        canvas.draw_line(bar.right(), bar.y, bar.right(), bar.bottom(), border);
        canvas.draw_line(bar.x, bar.bottom(), bar.right(), bar.bottom(), border);
    }
}

/// Draw one band column by column, left to right
fn draw_band<C: Canvas + ?Sized>(
    canvas: &mut C,
    band: &Band,
    left: f64,
    columns: usize,
    from: Rgb,
    to: Rgb,
    border: Color,
) {
    let range = columns as f64;
    for column in 0..columns {
        let offset = column as f64;
        let x = left + offset;
        let top = band.top_at(offset, range);
        let bottom = top + band.thickness;

        canvas.draw_line(x, top, x, bottom, from.lerp(to, offset / range).to_color());
        canvas.draw_line(x, top, x + 1.0, top, border);
        canvas.draw_line(x, bottom, x + 1.0, bottom, border);
    }
}

/// Render a diagram to an SVG document sized from `config`
pub fn render_svg(spec: &DiagramSpec, config: &Config) -> String {
    let mut canvas =
        SvgCanvas::with_theme(config.width, config.height, &config.theme).with_title(&spec.title);
    render_with_config(spec, &mut canvas, config);
    canvas.finish()
}
