//! Itinerary export as a standalone SVG image
//!
//! The exported document is the current map surface with an optional listing
//! of the selection drawn beside it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::map::legend_lines;
use crate::point::Point;
use crate::renderer::{text_width, SvgBuilder, SvgSurface, TextAnchor};

/// Configuration for [`export_svg`]
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Draw the selection listing beside the map
    pub listing: bool,
    /// Width of the listing column in pixels
    pub listing_width: f64,
    /// Heading of the listing
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            listing: true,
            listing_width: 280.0,
            title: "Itinerary".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, listing: bool) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_listing_width(mut self, width: f64) -> Self {
        self.listing_width = width;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

const LISTING_PADDING: f64 = 12.0;

/// Render `surface` plus the selection listing as one SVG document.
///
/// The listing is left out when disabled or when the selection is empty.
pub fn export_svg(surface: &SvgSurface, selection: &[Point], config: &ExportConfig) -> String {
    let mut builder = SvgBuilder::new(surface.svg_config().clone());
    let viewport = surface.viewport();
    surface.draw(&mut builder, 0.0, 0.0);

    let with_listing = config.listing && !selection.is_empty();
    let width = if with_listing {
        draw_listing(&mut builder, selection, config, viewport.width, viewport.height);
        viewport.width + config.listing_width
    } else {
        viewport.width
    };
    builder.build(width, viewport.height)
}

fn draw_listing(
    builder: &mut SvgBuilder,
    selection: &[Point],
    config: &ExportConfig,
    x0: f64,
    height: f64,
) {
    let font = builder.config().font_size;
    let line_height = font * 1.5;
    let text_max = (config.listing_width - 2.0 * LISTING_PADDING).max(font);
    let x = x0 + LISTING_PADDING;

    builder.start_group(Some("listing"), "listing", None);
    builder.add_rect(None, x0, 0.0, config.listing_width, height, "panel", "");

    let mut y = LISTING_PADDING + line_height;
    for line in wrap_text(&config.title, text_max, font) {
        builder.add_text(&line, x, y, TextAnchor::Start, "listing-title");
        y += line_height;
    }
    y += line_height / 2.0;

    for entry in legend_lines(selection) {
        for line in wrap_text(&entry, text_max, font) {
            builder.add_text(&line, x, y, TextAnchor::Start, "text");
            y += line_height;
        }
    }
    builder.end_group();
}

/// Break `text` into lines no wider than `max_width`.
///
/// Lines are broken between any two characters, which suits CJK names that
/// have no spaces. A single character wider than `max_width` still gets a line
/// of its own.
pub fn wrap_text(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for c in text.chars() {
        let mut candidate = line.clone();
        candidate.push(c);
        if text_width(&candidate, font_size) > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line.push(c);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Encode an SVG document as a `data:` URI for download links
pub fn to_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::map::{Camera, MapConfig};
    use crate::renderer::SvgConfig;

    fn surface() -> SvgSurface {
        SvgSurface::new(
            SvgConfig::default().with_viewport(400.0, 300.0),
            &MapConfig::default(),
            Camera::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_wrap_text_breaks_between_characters() {
        // 10px font: CJK chars are 10 wide
        assert_eq!(
            wrap_text("宇治橋の上で", 30.0, 10.0),
            vec!["宇治橋".to_string(), "の上で".to_string()]
        );
    }

    #[test]
    fn test_wrap_text_short_and_empty() {
        assert_eq!(wrap_text("abc", 100.0, 10.0), vec!["abc".to_string()]);
        assert!(wrap_text("", 100.0, 10.0).is_empty());
    }

    #[test]
    fn test_wrap_text_overwide_character_keeps_own_line() {
        assert_eq!(
            wrap_text("東京", 5.0, 10.0),
            vec!["東".to_string(), "京".to_string()]
        );
    }

    #[test]
    fn test_export_with_listing_widens_document() {
        let selection = vec![Point::new("a", "Uji Bridge", 34.89, 135.8)];
        let svg = export_svg(&surface(), &selection, &ExportConfig::default());
        assert!(svg.contains(r#"width="680" height="300""#));
        assert!(svg.contains(r#"<g id="listing""#));
        assert!(svg.contains("1：Uji Bridge"));
        assert!(svg.contains(">Itinerary<"));
    }

    #[test]
    fn test_export_without_listing() {
        let selection = vec![Point::new("a", "Uji Bridge", 34.89, 135.8)];
        let config = ExportConfig::default().with_listing(false);
        let svg = export_svg(&surface(), &selection, &config);
        assert!(svg.contains(r#"width="400" height="300""#));
        assert!(!svg.contains("listing"));
    }

    #[test]
    fn test_empty_selection_has_no_listing() {
        let svg = export_svg(&surface(), &[], &ExportConfig::default());
        assert!(!svg.contains(r#"id="listing""#));
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }
}
