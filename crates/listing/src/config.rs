use std::time::Duration;

/// Configuration for the listing reconciler.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Number of historical rows fetched as backfill.
    pub historical_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            historical_limit: 100,
        }
    }
}

/// Configuration for the pause policy.
#[derive(Debug, Clone)]
pub struct PauseConfig {
    /// Delay between the pointer leaving a list and the list going live.
    pub unpause_delay: Duration,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            unpause_delay: Duration::from_millis(100),
        }
    }
}
