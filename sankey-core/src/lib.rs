//! sankey-core: loader, layout engine and renderer for single-source Sankey diagrams
//!
//! # Example
//!
//! ```
//! use sankey_core::{parse, render_svg, Config};
//!
//! let input = "\
//! Monthly budget
//! Income
//! Rent,1200
//! Groceries,450
//! Savings,300,0,128,128
//! ";
//!
//! let spec = parse(input).unwrap();
//! let svg = render_svg(&spec, &Config::default());
//! println!("{}", svg);
//! ```
//!
//! # Custom drawing surfaces
//!
//! ```
//! use sankey_core::{parse, render, RecordingCanvas};
//!
//! let spec = parse("Title\nSource\nA,1\nB,2").unwrap();
//! let mut canvas = RecordingCanvas::new(800.0, 600.0);
//! render(&spec, &mut canvas);
//! assert!(!canvas.commands.is_empty());
//! ```

pub mod canvas;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod svg;
pub mod theme;

pub use canvas::{Anchor, Canvas, Color, DrawCommand, RecordingCanvas, TextStyle};
pub use model::*;
pub use parser::{load, parse, parse_with_theme, ParseError};
pub use renderer::{
    band_offset, render, render_svg, render_with_config, Band, Bar, Config, Layout,
};
pub use svg::SvgCanvas;
pub use theme::{Theme, DEFAULT_SOURCE_COLOR_PALETTE_INDEX};
