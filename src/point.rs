//! Pilgrimage point model
//!
//! A [`Point`] is a real-world location tied to a scene of a title. Points are
//! compared by their [`PointId`] everywhere in the crate, never by value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity key of a point, assigned by the source service or synthesized
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub String);

impl PointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Geographic coordinates in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A pilgrimage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: PointId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    position: LatLon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    episode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    season: Option<String>,
}

impl Point {
    /// Create a point with the required attributes.
    ///
    /// Coordinates are expected to be finite; this is not checked.
    pub fn new(id: impl Into<PointId>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: None,
            position: LatLon::new(lat, lon),
            thumbnail: None,
            episode: None,
            season: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_episode(mut self, episode: impl Into<String>) -> Self {
        self.episode = Some(episode.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn id(&self) -> &PointId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn position(&self) -> LatLon {
        self.position
    }

    pub fn latitude(&self) -> f64 {
        self.position.lat
    }

    pub fn longitude(&self) -> f64 {
        self.position.lon
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn episode(&self) -> Option<&str> {
        self.episode.as_deref()
    }

    pub fn season(&self) -> Option<&str> {
        self.season.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    /// Re-geocode the point
    pub fn set_coordinates(&mut self, lat: f64, lon: f64) {
        self.position = LatLon::new(lat, lon);
    }

    /// One-line description used by listings and trace output
    pub fn summary(&self) -> String {
        match &self.group {
            Some(group) => format!(
                "{} [{}] ({}, {})",
                self.name, group, self.position.lat, self.position.lon
            ),
            None => format!("{} ({}, {})", self.name, self.position.lat, self.position.lon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default_to_none() {
        let p = Point::new("1", "Station", 35.0, 139.0);
        assert_eq!(p.group(), None);
        assert_eq!(p.thumbnail(), None);
        assert_eq!(p.episode(), None);
        assert_eq!(p.season(), None);
    }

    #[test]
    fn test_setters() {
        let mut p = Point::new("1", "Station", 35.0, 139.0).with_group("Show");
        p.set_name("Bridge");
        p.set_group(None);
        p.set_coordinates(36.5, 138.25);
        assert_eq!(p.name(), "Bridge");
        assert_eq!(p.group(), None);
        assert_eq!(p.position(), LatLon::new(36.5, 138.25));
        assert_eq!(p.id().as_str(), "1");
    }

    #[test]
    fn test_summary() {
        let p = Point::new("1", "Station", 35.5, 139.25).with_group("Show");
        assert_eq!(p.summary(), "Station [Show] (35.5, 139.25)");
        let p = Point::new("2", "Shrine", 35.0, 139.0);
        assert_eq!(p.summary(), "Shrine (35, 139)");
    }

    #[test]
    fn test_serde_skips_missing_optionals() {
        let p = Point::new("7", "Shrine", 35.0, 139.0).with_episode("3");
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("thumbnail"));
        assert!(json.contains(r#""episode":"3""#));
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_non_finite_coordinates_detected() {
        assert!(LatLon::new(1.0, 2.0).is_finite());
        assert!(!LatLon::new(f64::NAN, 2.0).is_finite());
        assert!(!LatLon::new(1.0, f64::INFINITY).is_finite());
    }
}
