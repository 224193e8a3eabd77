//! Pilgrimage point lookup against the Anitabi API

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::point::Point;

use super::FetchError;

/// Default endpoint of the Anitabi API
pub const DEFAULT_POINTS_URL: &str = "https://api.anitabi.cn";

/// A service that lists the points of a title
pub trait PointLookup {
    /// Points for `title_id`, labelled with `group` when given
    fn points(&self, title_id: u64, group: Option<&str>) -> Result<Vec<Point>, FetchError>;
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(default)]
    id: Option<Value>,
    name: String,
    #[serde(default)]
    geo: Option<Vec<Option<f64>>>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    ep: Option<Value>,
    #[serde(default)]
    s: Option<Value>,
}

/// Render a JSON scalar as a tag; null, empty strings and containers give None
fn scalar_tag(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a point list body.
///
/// Entries without an id get `"{title_id}-{index}"`. Entries without two
/// finite coordinates are skipped.
pub fn parse_points_response(
    body: &str,
    title_id: u64,
    group: Option<&str>,
) -> Result<Vec<Point>, FetchError> {
    let raw: Vec<RawPoint> =
        serde_json::from_str(body).map_err(|e| FetchError::decode("point lookup", e))?;

    let mut points = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let (lat, lon) = match entry.geo.as_deref() {
            Some([Some(lat), Some(lon), ..]) if lat.is_finite() && lon.is_finite() => (*lat, *lon),
            _ => {
                warn!(title_id, name = %entry.name, "skipping point without coordinates");
                continue;
            }
        };
        let id = scalar_tag(entry.id).unwrap_or_else(|| format!("{}-{}", title_id, index));

        let mut point = Point::new(id, entry.name, lat, lon);
        if let Some(group) = group {
            point = point.with_group(group);
        }
        if let Some(image) = entry.image.filter(|i| !i.is_empty()) {
            point = point.with_thumbnail(image);
        }
        if let Some(ep) = scalar_tag(entry.ep) {
            point = point.with_episode(ep);
        }
        if let Some(s) = scalar_tag(entry.s) {
            point = point.with_season(s);
        }
        points.push(point);
    }
    Ok(points)
}

/// Blocking client for `GET {base}/bangumi/{id}/points/detail`
#[derive(Debug, Clone)]
pub struct AnitabiClient {
    client: Client,
    base_url: Url,
}

impl AnitabiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            FetchError::invalid_request(format!("bad points URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn points_url(&self, title_id: u64) -> Result<Url, FetchError> {
        let id = title_id.to_string();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::invalid_request("points URL cannot be a base"))?
            .pop_if_empty()
            .extend(["bangumi", id.as_str(), "points", "detail"]);
        Ok(url)
    }
}

impl PointLookup for AnitabiClient {
    fn points(&self, title_id: u64, group: Option<&str>) -> Result<Vec<Point>, FetchError> {
        let url = self.points_url(title_id)?;
        debug!(%url, "fetching points");
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        parse_points_response(&body, title_id, group)
    }
}

/// Fetch the points of the selected title.
///
/// Nothing is requested without a selected title; failures are logged and
/// yield no points.
pub fn fetch_points(
    service: &dyn PointLookup,
    title_id: Option<u64>,
    group: Option<&str>,
) -> Vec<Point> {
    let Some(title_id) = title_id else {
        return Vec::new();
    };
    match service.points(title_id, group) {
        Ok(points) => points,
        Err(e) => {
            warn!(title_id, error = %e, "point lookup failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_parse_points_response() {
        let body = r#"[
            {"id": "abc", "name": "宇治橋", "geo": [34.8917, 135.8075],
             "image": "https://image.anitabi.cn/points/a.jpg", "ep": 1, "s": 120},
            {"name": "No id", "geo": [35.0, 135.0], "ep": "", "image": ""},
            {"id": "bad", "name": "No geo"},
            {"id": 9, "name": "Null geo", "geo": [null, 135.0]}
        ]"#;
        let points = parse_points_response(body, 115908, Some("吹响吧！上低音号")).unwrap();
        assert_eq!(points.len(), 2);

        let first = &points[0];
        assert_eq!(first.id().as_str(), "abc");
        assert_eq!(first.name(), "宇治橋");
        assert!((first.latitude() - 34.8917).abs() < 1e-9);
        assert!((first.longitude() - 135.8075).abs() < 1e-9);
        assert_eq!(first.group(), Some("吹响吧！上低音号"));
        assert_eq!(first.thumbnail(), Some("https://image.anitabi.cn/points/a.jpg"));
        assert_eq!(first.episode(), Some("1"));
        assert_eq!(first.season(), Some("120"));

        let second = &points[1];
        assert_eq!(second.id().as_str(), "115908-1");
        assert_eq!(second.episode(), None);
        assert_eq!(second.thumbnail(), None);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_points_response(r#"{"error": "nope"}"#, 1, None),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn test_points_url() {
        let client = AnitabiClient::new("https://api.anitabi.cn", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.points_url(115908).unwrap().as_str(),
            "https://api.anitabi.cn/bangumi/115908/points/detail"
        );
    }

    struct Counting(Cell<usize>);

    impl PointLookup for Counting {
        fn points(&self, _title_id: u64, _group: Option<&str>) -> Result<Vec<Point>, FetchError> {
            self.0.set(self.0.get() + 1);
            Err(FetchError::invalid_request("offline"))
        }
    }

    #[test]
    fn test_fetch_without_title_is_noop() {
        let service = Counting(Cell::new(0));
        assert!(fetch_points(&service, None, None).is_empty());
        assert_eq!(service.0.get(), 0);
    }

    #[test]
    fn test_fetch_failure_yields_no_points() {
        let service = Counting(Cell::new(0));
        assert!(fetch_points(&service, Some(1), None).is_empty());
        assert_eq!(service.0.get(), 1);
    }
}
