//! Drives the delayed unpause of each listing category.

use crate::config::PauseConfig;
use crate::pause::{PauseMode, PausePolicy};
use mooner_domain::{ListingCategory, ListingEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// One [`PausePolicy`] per category, with pointer-leave unpauses run on a
/// timer.
pub struct PauseController {
    policies: HashMap<ListingCategory, Arc<Mutex<PausePolicy>>>,
    config: PauseConfig,
}

impl PauseController {
    #[must_use]
    pub fn new(config: PauseConfig, hover_capable: bool) -> Self {
        let policies = ListingCategory::ALL
            .iter()
            .map(|&category| (category, Arc::new(Mutex::new(PausePolicy::new(hover_capable)))))
            .collect();
        Self { policies, config }
    }

    fn policy(&self, category: ListingCategory) -> &Arc<Mutex<PausePolicy>> {
        &self.policies[&category]
    }

    pub async fn mode(&self, category: ListingCategory) -> PauseMode {
        self.policy(category).lock().await.mode()
    }

    pub async fn pointer_enter(
        &self,
        category: ListingCategory,
        query_ok: bool,
        live: &[ListingEntry],
    ) {
        self.policy(category)
            .lock()
            .await
            .pointer_enter(query_ok, live);
    }

    /// Schedules the unpause. The returned task resolves to whether the
    /// listing went live; a re-entry before the delay elapses makes it a
    /// no-op.
    pub async fn pointer_leave(&self, category: ListingCategory) -> Option<JoinHandle<bool>> {
        let policy = self.policy(category).clone();
        let ticket = policy.lock().await.pointer_leave()?;
        let delay = self.config.unpause_delay;

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let fired = policy.lock().await.fire(ticket);
            debug!(category = ?category, fired, "Unpause timer elapsed");
            fired
        }))
    }

    /// Pause without a pointer event, e.g. when a row is clicked.
    pub async fn pause(&self, category: ListingCategory, live: &[ListingEntry]) {
        self.policy(category).lock().await.pause(live);
    }

    pub async fn scroll(&self, category: ListingCategory, top: f64, live: &[ListingEntry]) {
        self.policy(category).lock().await.scroll(top, live);
    }

    pub async fn refresh(&self, category: ListingCategory, live: &[ListingEntry]) {
        self.policy(category).lock().await.refresh_snapshot(live);
    }

    pub async fn view(&self, category: ListingCategory, live: &[ListingEntry]) -> Vec<ListingEntry> {
        self.policy(category).lock().await.view(live)
    }

    pub async fn reset(&self, category: ListingCategory) {
        self.policy(category).lock().await.reset();
    }
}

impl Default for PauseController {
    fn default() -> Self {
        Self::new(PauseConfig::default(), true)
    }
}
