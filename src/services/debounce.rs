//! Debounced search input and superseding of in-flight requests
//!
//! Time is passed in by the caller, so the host event loop decides when to
//! poll and tests can step the clock explicitly.

use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Fires once after input has been quiet for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)schedule the pending action `delay` after `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending action
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Ticket identifying an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Hands out increasing tickets and accepts only the newest response
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Whether a response for `ticket` is still wanted
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// A search to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub ticket: RequestTicket,
}

/// Search input state: the current keyword, the debounce timer and the
/// request tracker.
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    keyword: String,
    debouncer: Debouncer,
    tracker: RequestTracker,
}

impl SearchBox {
    pub fn new(delay: Duration) -> Self {
        Self {
            keyword: String::new(),
            debouncer: Debouncer::new(delay),
            tracker: RequestTracker::new(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The keyword changed; restart the debounce timer
    pub fn on_input(&mut self, keyword: impl Into<String>, now: Instant) {
        self.keyword = keyword.into();
        self.debouncer.schedule(now);
    }

    /// Explicit submit (enter key or button): skip the debounce
    pub fn submit(&mut self) -> Option<SearchRequest> {
        self.debouncer.cancel();
        self.request()
    }

    /// Called from the event loop; yields a request once the input is quiet
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.debouncer.poll(now) {
            self.request()
        } else {
            None
        }
    }

    fn request(&mut self) -> Option<SearchRequest> {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(SearchRequest {
            keyword: keyword.to_string(),
            ticket: self.tracker.issue(),
        })
    }

    /// Whether the response to `request` should still be shown
    pub fn accepts(&self, request: &SearchRequest) -> bool {
        self.tracker.is_current(request.ticket)
    }
}
