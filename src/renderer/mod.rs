//! SVG map surface
//!
//! [`SvgSurface`] implements [`crate::map::MapSurface`] by keeping markers and
//! the legend in memory and rendering them over a projected graticule on
//! demand. It is the surface used by the command line tool and by export.

pub mod config;
pub mod surface;
pub mod svg;

pub use config::SvgConfig;
pub use surface::{Palette, SvgSurface, SvgSurfaceFactory};
pub use svg::{text_width, SvgBuilder, TextAnchor};
