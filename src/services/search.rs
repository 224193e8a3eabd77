//! Title search against the Bangumi subject search API

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::FetchError;

/// Default endpoint of the Bangumi API
pub const DEFAULT_SEARCH_URL: &str = "https://api.bgm.tv";

/// Subject type for animation in the Bangumi API
const ANIME_SUBJECT_TYPE: &str = "2";

/// One title returned by a search
#[derive(Debug, Clone, PartialEq)]
pub struct TitleHit {
    pub id: u64,
    pub name: String,
    pub name_localized: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl TitleHit {
    /// Localized name followed by the original in parentheses, or just the
    /// original name
    pub fn display_name(&self) -> String {
        match &self.name_localized {
            Some(local) => format!("{} ({})", local, self.name),
            None => self.name.clone(),
        }
    }

    /// Name used to label the points of this title
    pub fn group_label(&self) -> &str {
        self.name_localized.as_deref().unwrap_or(&self.name)
    }
}

/// A service that finds titles by keyword
pub trait TitleSearch {
    fn search(&self, keyword: &str) -> Result<Vec<TitleHit>, FetchError>;
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    list: Option<Vec<RawHit>>,
}

#[derive(Deserialize)]
struct RawHit {
    id: u64,
    name: String,
    #[serde(default)]
    name_cn: Option<String>,
    #[serde(default)]
    images: Option<RawImages>,
}

#[derive(Deserialize)]
struct RawImages {
    #[serde(default)]
    grid: Option<String>,
}

/// Parse a search response body. A response without a result list (the API
/// answers "not found" that way) yields no hits.
pub fn parse_search_response(body: &str) -> Result<Vec<TitleHit>, FetchError> {
    let raw: RawSearchResponse =
        serde_json::from_str(body).map_err(|e| FetchError::decode("title search", e))?;
    Ok(raw
        .list
        .unwrap_or_default()
        .into_iter()
        .map(|hit| TitleHit {
            id: hit.id,
            name: hit.name,
            name_localized: hit.name_cn.filter(|n| !n.trim().is_empty()),
            thumbnail_url: hit.images.and_then(|i| i.grid).filter(|g| !g.is_empty()),
        })
        .collect())
}

/// Blocking client for `GET {base}/search/subject/{keyword}?type=2`
#[derive(Debug, Clone)]
pub struct BangumiClient {
    client: Client,
    base_url: Url,
}

impl BangumiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            FetchError::invalid_request(format!("bad search URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::invalid_request("search URL cannot be a base"))?
            .pop_if_empty()
            .extend(["search", "subject", keyword]);
        url.query_pairs_mut().append_pair("type", ANIME_SUBJECT_TYPE);
        Ok(url)
    }
}

impl TitleSearch for BangumiClient {
    fn search(&self, keyword: &str) -> Result<Vec<TitleHit>, FetchError> {
        let url = self.search_url(keyword)?;
        debug!(%url, "searching titles");
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        parse_search_response(&body)
    }
}

/// Run a search, treating blank keywords and failures as "no results".
pub fn search_titles(service: &dyn TitleSearch, keyword: &str) -> Vec<TitleHit> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    match service.search(keyword) {
        Ok(hits) => hits,
        Err(e) => {
            warn!(keyword, error = %e, "title search failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Canned {
        calls: Cell<usize>,
        fail: bool,
    }

    impl TitleSearch for Canned {
        fn search(&self, keyword: &str) -> Result<Vec<TitleHit>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(FetchError::invalid_request("offline"));
            }
            Ok(vec![TitleHit {
                id: 1,
                name: keyword.to_string(),
                name_localized: None,
                thumbnail_url: None,
            }])
        }
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "results": 2,
            "list": [
                {"id": 115908, "name": "響け！ユーフォニアム", "name_cn": "吹响吧！上低音号",
                 "images": {"grid": "https://lain.bgm.tv/pic/cover/g/a.jpg"}},
                {"id": 7, "name": "Plain", "name_cn": "", "images": null}
            ]
        }"#;
        let hits = parse_search_response(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].display_name(), "吹响吧！上低音号 (響け！ユーフォニアム)");
        assert_eq!(hits[0].group_label(), "吹响吧！上低音号");
        assert_eq!(
            hits[0].thumbnail_url.as_deref(),
            Some("https://lain.bgm.tv/pic/cover/g/a.jpg")
        );
        assert_eq!(hits[1].name_localized, None);
        assert_eq!(hits[1].display_name(), "Plain");
    }

    #[test]
    fn test_parse_not_found_response() {
        let body = r#"{"request": "/search/subject/zzz", "code": 404, "error": "Not Found"}"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        assert!(matches!(
            parse_search_response("<html>"),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn test_blank_keyword_skips_request() {
        let service = Canned {
            calls: Cell::new(0),
            fail: false,
        };
        assert!(search_titles(&service, "   ").is_empty());
        assert_eq!(service.calls.get(), 0);
        assert_eq!(search_titles(&service, " k-on ").len(), 1);
        assert_eq!(service.calls.get(), 1);
    }

    #[test]
    fn test_failure_yields_empty_results() {
        let service = Canned {
            calls: Cell::new(0),
            fail: true,
        };
        assert!(search_titles(&service, "k-on").is_empty());
    }

    #[test]
    fn test_search_url_encodes_keyword() {
        let client = BangumiClient::new("https://api.bgm.tv/", Duration::from_secs(5)).unwrap();
        let url = client.search_url("青春 ブタ野郎").unwrap();
        assert!(url.as_str().starts_with("https://api.bgm.tv/search/subject/"));
        assert!(url.as_str().ends_with("?type=2"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(
            BangumiClient::new("not a url", Duration::from_secs(5)),
            Err(FetchError::InvalidRequest { .. })
        ));
    }
}
