//! Tracks whether the user has recently moved the map or clicked a marker

use std::time::{Duration, Instant};

/// Default quiet period after which camera auto-fit resumes
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Suppresses camera auto-fit for a short window after each user interaction.
///
/// Every interaction restarts the window. Expiry only re-enables fitting; it
/// never moves the camera on its own.
#[derive(Debug, Clone)]
pub struct InteractionGuard {
    cooldown: Duration,
    last: Option<Instant>,
}

impl Default for InteractionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl InteractionGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    /// Record a user interaction at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Whether the user interacted within the cooldown window before `now`
    pub fn is_active(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.saturating_duration_since(last) < self.cooldown,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
