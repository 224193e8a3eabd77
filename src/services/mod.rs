//! Clients for the title search and point lookup services
//!
//! Both services are reached over HTTP through blocking `reqwest` clients
//! behind the [`TitleSearch`] and [`PointLookup`] traits. Failures are never
//! fatal to the planner: they are logged and turned into empty results.

pub mod debounce;
pub mod error;
pub mod points;
pub mod search;

pub use debounce::{Debouncer, RequestTicket, RequestTracker, SearchBox, SearchRequest};
pub use error::FetchError;
pub use points::{fetch_points, parse_points_response, AnitabiClient, PointLookup};
pub use search::{parse_search_response, search_titles, BangumiClient, TitleHit, TitleSearch};
