//! Incremental SVG document builder

use super::SvgConfig;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Add a CSS rule block
    pub fn add_style(&mut self, css: impl Into<String>) {
        self.styles.push(css.into());
    }

    /// Class name with the configured prefix applied
    pub fn class(&self, name: &str) -> String {
        format!("{}{}", self.config.class_prefix.as_deref().unwrap_or_default(), name)
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn id_attr(id: Option<&str>) -> String {
        id.map(|i| format!(r#" id="{}""#, escape_xml(i)))
            .unwrap_or_default()
    }

    /// Add a rectangle element
    #[allow(clippy::too_many_arguments)]
    pub fn add_rect(
        &mut self,
        id: Option<&str>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        class: &str,
        styles: &str,
    ) {
        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            Self::id_attr(id),
            self.class(class),
            fmt_num(x),
            fmt_num(y),
            fmt_num(w),
            fmt_num(h),
            styles
        ));
    }

    /// Add a circle element
    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64, class: &str, styles: &str) {
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            self.class(class),
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(r),
            styles
        ));
    }

    /// Add a line element
    pub fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, class: &str) {
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            self.indent_str(),
            self.class(class),
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x2),
            fmt_num(y2)
        ));
    }

    /// Add a path element
    pub fn add_path(&mut self, d: &str, class: &str, styles: &str) {
        self.elements.push(format!(
            r#"{}<path class="{}" d="{}"{}/>"#,
            self.indent_str(),
            self.class(class),
            d,
            styles
        ));
    }

    /// Add a text element
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, anchor: TextAnchor, class: &str) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}">{}</text>"#,
            self.indent_str(),
            self.class(class),
            fmt_num(x),
            fmt_num(y),
            anchor.as_str(),
            escape_xml(text)
        ));
    }

    /// Open a group element, optionally with a tooltip title
    pub fn start_group(&mut self, id: Option<&str>, class: &str, title: Option<&str>) {
        self.elements.push(format!(
            r#"{}<g{} class="{}">"#,
            self.indent_str(),
            Self::id_attr(id),
            self.class(class)
        ));
        self.indent += 1;
        if let Some(title) = title {
            self.elements.push(format!(
                "{}<title>{}</title>",
                self.indent_str(),
                escape_xml(title)
            ));
        }
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, width: f64, height: f64) -> String {
        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(width),
            h = fmt_num(height)
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Approximate rendered width of `text` at `font_size`.
///
/// CJK and full-width characters count as one em, everything else as 0.6 em.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars()
        .map(|c| if is_wide(c) { font_size } else { font_size * 0.6 })
        .sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}

/// Format a coordinate with at most two decimals and no trailing zeros
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
