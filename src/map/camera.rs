//! Camera, viewport and Web Mercator helpers

use std::f64::consts::PI;

use crate::point::LatLon;

/// Side length of a world tile at zoom 0, in pixels
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator projection
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Size of the rendered map region in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 720.0)
    }
}

/// Current map framing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LatLon,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: LatLon::new(39.0, 140.0),
            zoom: 4.5,
        }
    }
}

impl Camera {
    pub fn new(center: LatLon, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Status line shown under the map
    pub fn describe(&self) -> String {
        format!(
            "Longitude: {:.4} | Latitude: {:.4} | Zoom: {:.2}",
            self.center.lon, self.center.lat, self.zoom
        )
    }

    fn scale(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Screen position of a coordinate, origin at the top-left of the viewport
    pub fn project(&self, pos: LatLon, viewport: Viewport) -> (f64, f64) {
        let scale = self.scale();
        let x = (mercator_x(pos.lon) - mercator_x(self.center.lon)) * scale + viewport.width / 2.0;
        let y = (mercator_y(pos.lat) - mercator_y(self.center.lat)) * scale + viewport.height / 2.0;
        (x, y)
    }

    /// Camera that frames `bounds` inside `viewport`, keeping `padding` pixels
    /// free on every side. Degenerate bounds (a single location) use `max_zoom`.
    pub fn fit(bounds: &GeoBounds, viewport: Viewport, padding: f64, max_zoom: f64) -> Self {
        // NaN collapses to 0
        let max_zoom = max_zoom.max(0.0);
        let padding = padding.max(0.0);
        let west = mercator_x(bounds.west);
        let east = mercator_x(bounds.east);
        let north = mercator_y(bounds.north);
        let south = mercator_y(bounds.south);

        let center = LatLon::new(
            inverse_mercator_y((north + south) / 2.0),
            (bounds.west + bounds.east) / 2.0,
        );

        let avail_w = (viewport.width - 2.0 * padding).max(1.0);
        let avail_h = (viewport.height - 2.0 * padding).max(1.0);
        let span_x = (east - west).abs() * TILE_SIZE;
        let span_y = (south - north).abs() * TILE_SIZE;

        let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
            max_zoom
        } else {
            let ratio_x = if span_x > f64::EPSILON {
                avail_w / span_x
            } else {
                f64::INFINITY
            };
            let ratio_y = if span_y > f64::EPSILON {
                avail_h / span_y
            } else {
                f64::INFINITY
            };
            ratio_x.min(ratio_y).log2().max(0.0).min(max_zoom)
        };

        Self { center, zoom }
    }
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Zero-sized box around one location
    pub fn around(pos: LatLon) -> Self {
        Self {
            south: pos.lat,
            west: pos.lon,
            north: pos.lat,
            east: pos.lon,
        }
    }

    /// Expand this box to include a location
    pub fn expand_to_include(&self, pos: LatLon) -> Self {
        Self {
            south: self.south.min(pos.lat),
            west: self.west.min(pos.lon),
            north: self.north.max(pos.lat),
            east: self.east.max(pos.lon),
        }
    }

    /// Smallest box containing every location, or None for an empty input
    pub fn enclosing(positions: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = Self::around(iter.next()?);
        Some(iter.fold(first, |acc, pos| acc.expand_to_include(pos)))
    }

    pub fn contains(&self, pos: LatLon) -> bool {
        pos.lat >= self.south
            && pos.lat <= self.north
            && pos.lon >= self.west
            && pos.lon <= self.east
    }
}

/// Longitude to normalized mercator x in [0, 1]
pub fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Latitude to normalized mercator y in [0, 1], north at 0
pub fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

/// Inverse of [`mercator_y`]
pub fn inverse_mercator_y(y: f64) -> f64 {
    let n = PI * (1.0 - 2.0 * y);
    n.sinh().atan().to_degrees()
}
