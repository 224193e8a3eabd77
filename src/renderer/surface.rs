//! In-memory map surface rendered to SVG

use std::collections::BTreeMap;

use crate::map::{
    Camera, GeoBounds, Language, LegendId, LegendPosition, LegendSpec, MapConfig, MapError,
    MapSurface, MarkerId, MarkerKind, MarkerSpec, SurfaceFactory, Viewport,
};
use crate::point::LatLon;

use super::svg::{fmt_num, text_width, SvgBuilder, TextAnchor};
use super::SvgConfig;

/// Height of the status bar at the top of the map
const STATUS_BAR_HEIGHT: f64 = 24.0;

/// Margin between the legend box and the map edge
const LEGEND_MARGIN: f64 = 10.0;

/// Graticule steps in degrees, coarsest first
const GRID_STEPS: [f64; 9] = [30.0, 10.0, 5.0, 2.0, 1.0, 0.5, 0.1, 0.05, 0.01];

/// Minimum on-screen distance between graticule lines
const MIN_GRID_SPACING: f64 = 80.0;

/// Colors derived from the base style identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub land: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub panel: &'static str,
    pub candidate: &'static str,
    pub selected: &'static str,
}

impl Palette {
    const STREETS: Palette = Palette {
        land: "#f2efe9",
        grid: "#d6d0c4",
        text: "#333333",
        panel: "#ffffff",
        candidate: "#e53935",
        selected: "#1e88e5",
    };

    const LIGHT: Palette = Palette {
        land: "#fafafa",
        grid: "#e0e0e0",
        text: "#333333",
        panel: "#ffffff",
        candidate: "#e53935",
        selected: "#1e88e5",
    };

    const DARK: Palette = Palette {
        land: "#2b2b2b",
        grid: "#444444",
        text: "#eeeeee",
        panel: "#1a1a1a",
        candidate: "#ff7043",
        selected: "#64b5f6",
    };

    const OUTDOORS: Palette = Palette {
        land: "#e8f0dc",
        grid: "#c5d3b1",
        text: "#2e3b1f",
        panel: "#ffffff",
        candidate: "#d84315",
        selected: "#1565c0",
    };

    /// Pick a palette from a style identifier such as
    /// `mapbox://styles/mapbox/dark-v10`. Unknown styles use the street palette.
    pub fn for_style(style: &str) -> Self {
        let name = style.rsplit('/').next().unwrap_or(style);
        if name.starts_with("dark") || name.starts_with("navigation-night") {
            Self::DARK
        } else if name.starts_with("light") {
            Self::LIGHT
        } else if name.starts_with("outdoors") || name.starts_with("satellite") {
            Self::OUTDOORS
        } else {
            Self::STREETS
        }
    }
}

/// A map surface that keeps its content in memory and renders it as SVG
#[derive(Debug, Clone)]
pub struct SvgSurface {
    config: SvgConfig,
    style: String,
    language: Language,
    palette: Palette,
    camera: Camera,
    next_handle: u64,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    legend: Option<(LegendId, LegendSpec)>,
}

impl SvgSurface {
    pub fn new(config: SvgConfig, map: &MapConfig, camera: Camera) -> Result<Self, MapError> {
        let viewport = config.viewport;
        if !viewport.is_valid() {
            return Err(MapError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if map.style.trim().is_empty() {
            return Err(MapError::InvalidStyle {
                style: map.style.clone(),
                reason: "style identifier is empty".to_string(),
            });
        }
        Ok(Self {
            palette: Palette::for_style(&map.style),
            style: map.style.clone(),
            language: map.language,
            config,
            camera,
            next_handle: 0,
            markers: BTreeMap::new(),
            legend: None,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn svg_config(&self) -> &SvgConfig {
        &self.config
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Markers currently on the surface, in the order they were added
    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &MarkerSpec)> {
        self.markers.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn legend(&self) -> Option<&LegendSpec> {
        self.legend.as_ref().map(|(_, spec)| spec)
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Render the whole surface as a standalone SVG document
    pub fn render(&self) -> String {
        let mut builder = SvgBuilder::new(self.config.clone());
        self.draw(&mut builder, 0.0, 0.0);
        let viewport = self.viewport();
        builder.build(viewport.width, viewport.height)
    }

    /// Draw the surface into `builder` with its top-left corner at `(x, y)`
    pub fn draw(&self, builder: &mut SvgBuilder, x: f64, y: f64) {
        let viewport = self.viewport();
        let palette = self.palette;
        let font = builder.config().font_size;

        builder.add_style(format!(
            ".{land} {{ fill: {}; }} .{grid} {{ stroke: {}; stroke-width: 1; }} \
             .{text} {{ fill: {}; font-size: {}px; font-family: sans-serif; }} \
             .{panel} {{ fill: {}; fill-opacity: 0.9; stroke: {}; }}",
            palette.land,
            palette.grid,
            palette.text,
            fmt_num(font),
            palette.panel,
            palette.grid,
            land = builder.class("land"),
            grid = builder.class("grid"),
            text = builder.class("text"),
            panel = builder.class("panel"),
        ));

        builder.start_group(Some("map"), "map", None);
        builder.add_rect(None, x, y, viewport.width, viewport.height, "land", "");
        self.draw_graticule(builder, x, y);

        for (id, marker) in &self.markers {
            self.draw_marker(builder, *id, marker, x, y);
        }

        self.draw_status(builder, x, y);
        if let Some((_, legend)) = &self.legend {
            self.draw_legend(builder, legend, x, y);
        }
        builder.end_group();
    }

    fn draw_graticule(&self, builder: &mut SvgBuilder, x0: f64, y0: f64) {
        let viewport = self.viewport();
        let camera = self.camera;
        let degree_px = {
            let (a, _) = camera.project(LatLon::new(camera.center.lat, 0.0), viewport);
            let (b, _) = camera.project(LatLon::new(camera.center.lat, 1.0), viewport);
            (b - a).abs()
        };
        let step = GRID_STEPS
            .iter()
            .rev()
            .copied()
            .find(|s| s * degree_px >= MIN_GRID_SPACING)
            .unwrap_or(GRID_STEPS[0]);

        let (west, north) = self.unproject(0.0, 0.0);
        let (east, south) = self.unproject(viewport.width, viewport.height);

        let mut lon = (west / step).ceil() * step;
        while lon <= east {
            let (sx, _) = camera.project(LatLon::new(camera.center.lat, lon), viewport);
            builder.add_line(x0 + sx, y0, x0 + sx, y0 + viewport.height, "grid");
            lon += step;
        }
        let mut lat = (south / step).ceil() * step;
        while lat <= north {
            let (_, sy) = camera.project(LatLon::new(lat, camera.center.lon), viewport);
            builder.add_line(x0, y0 + sy, x0 + viewport.width, y0 + sy, "grid");
            lat += step;
        }
    }

    /// Screen position back to (lon, lat)
    fn unproject(&self, sx: f64, sy: f64) -> (f64, f64) {
        use crate::map::camera::{inverse_mercator_y, mercator_x, mercator_y, TILE_SIZE};
        let viewport = self.viewport();
        let scale = TILE_SIZE * 2f64.powf(self.camera.zoom);
        let mx = mercator_x(self.camera.center.lon) + (sx - viewport.width / 2.0) / scale;
        let my = mercator_y(self.camera.center.lat) + (sy - viewport.height / 2.0) / scale;
        (mx * 360.0 - 180.0, inverse_mercator_y(my))
    }

    fn draw_marker(&self, builder: &mut SvgBuilder, id: MarkerId, marker: &MarkerSpec, x0: f64, y0: f64) {
        let (sx, sy) = self.camera.project(marker.position, self.viewport());
        let (px, py) = (x0 + sx, y0 + sy);
        let title = marker.popup.lines().join("\n");
        let element_id = format!("marker-{}", id.0);

        match marker.kind {
            MarkerKind::Candidate => {
                builder.start_group(Some(&element_id), "candidate", Some(&title));
                let d = format!(
                    "M{},{} l-8,-14 a9,9 0 1 1 16,0 z",
                    fmt_num(px),
                    fmt_num(py)
                );
                builder.add_path(&d, "pin", &format!(r#" fill="{}""#, self.palette.candidate));
                builder.add_circle(px, py - 17.0, 3.5, "pin-dot", r##" fill="#ffffff""##);
            }
            MarkerKind::Selected { number } => {
                builder.start_group(Some(&element_id), "selected", Some(&title));
                builder.add_circle(
                    px,
                    py,
                    11.0,
                    "badge",
                    &format!(r##" fill="{}" stroke="#ffffff" stroke-width="2""##, self.palette.selected),
                );
                builder.add_text(&number.to_string(), px, py + 4.5, TextAnchor::Middle, "badge-number");
            }
        }
        builder.end_group();
    }

    fn draw_status(&self, builder: &mut SvgBuilder, x0: f64, y0: f64) {
        let viewport = self.viewport();
        builder.add_rect(None, x0, y0, viewport.width, STATUS_BAR_HEIGHT, "panel", "");
        let status = format!("{} | Language: {}", self.camera.describe(), self.language);
        builder.add_text(&status, x0 + 8.0, y0 + 16.0, TextAnchor::Start, "text");
    }

    fn draw_legend(&self, builder: &mut SvgBuilder, legend: &LegendSpec, x0: f64, y0: f64) {
        let viewport = self.viewport();
        let font = builder.config().font_size;
        let line_height = font * 1.5;
        let padding = 8.0;
        let width = legend
            .lines
            .iter()
            .map(|l| text_width(l, font))
            .fold(0.0, f64::max)
            + 2.0 * padding;
        let height = legend.lines.len() as f64 * line_height + 2.0 * padding;

        let left = x0 + LEGEND_MARGIN;
        let right = x0 + viewport.width - LEGEND_MARGIN - width;
        let top = y0 + STATUS_BAR_HEIGHT + LEGEND_MARGIN;
        let bottom = y0 + viewport.height - LEGEND_MARGIN - height;
        let (lx, ly) = match legend.position {
            LegendPosition::TopLeft => (left, top),
            LegendPosition::BottomLeft => (left, bottom),
            LegendPosition::TopRight => (right, top),
            LegendPosition::BottomRight | LegendPosition::Hidden => (right, bottom),
        };

        builder.start_group(Some("legend"), "legend", None);
        builder.add_rect(None, lx, ly, width, height, "panel", r#" rx="4""#);
        for (i, line) in legend.lines.iter().enumerate() {
            let baseline = ly + padding + (i as f64 + 0.75) * line_height;
            builder.add_text(line, lx + padding, baseline, TextAnchor::Start, "text");
        }
        builder.end_group();
    }
}

impl MapSurface for SvgSurface {
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_handle());
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    fn add_legend(&mut self, legend: LegendSpec) -> LegendId {
        let id = LegendId(self.next_handle());
        self.legend = Some((id, legend));
        id
    }

    fn remove_legend(&mut self, id: LegendId) -> bool {
        match &self.legend {
            Some((current, _)) if *current == id => {
                self.legend = None;
                true
            }
            _ => false,
        }
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64, max_zoom: f64) -> Camera {
        self.camera = Camera::fit(&bounds, self.viewport(), padding, max_zoom);
        self.camera
    }
}

/// Creates [`SvgSurface`]s with a fixed SVG configuration
#[derive(Debug, Clone, Default)]
pub struct SvgSurfaceFactory {
    pub config: SvgConfig,
}

impl SvgSurfaceFactory {
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }
}

impl SurfaceFactory for SvgSurfaceFactory {
    type Surface = SvgSurface;

    fn create(&mut self, config: &MapConfig, camera: Camera) -> Result<SvgSurface, MapError> {
        SvgSurface::new(self.config.clone(), config, camera)
    }
}
