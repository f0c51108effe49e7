//! Row-order freezing while the user interacts with a listing.
//!
//! A listing refreshes every few seconds. While it is paused the rows that
//! were visible when the pause began keep their positions; their data keeps
//! updating from the live feed and tokens that arrived since are shown ahead
//! of them.

use mooner_domain::ListingEntry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseMode {
    Live,
    Paused,
}

/// Rows captured when the listing paused, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PausedSnapshot {
    pub captured: Vec<ListingEntry>,
}

/// A scheduled unpause. Only the most recently issued ticket can fire; any
/// pointer-enter, pause or unpause in between cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct UnpauseTicket {
    id: u64,
}

#[derive(Debug)]
pub struct PausePolicy {
    hover_capable: bool,
    mode: PauseMode,
    snapshot: Option<PausedSnapshot>,
    pointer_inside: bool,
    pending: Option<u64>,
    issued: u64,
}

impl PausePolicy {
    /// `hover_capable` is false on touch-primary layouts, where pauses come
    /// from scrolling instead of the pointer.
    #[must_use]
    pub fn new(hover_capable: bool) -> Self {
        Self {
            hover_capable,
            mode: PauseMode::Live,
            snapshot: None,
            pointer_inside: false,
            pending: None,
            issued: 0,
        }
    }

    pub fn mode(&self) -> PauseMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.mode == PauseMode::Paused
    }

    pub fn snapshot(&self) -> Option<&PausedSnapshot> {
        self.snapshot.as_ref()
    }

    /// Pauses, capturing `live` only when coming from `Live`.
    pub fn pause(&mut self, live: &[ListingEntry]) {
        self.pending = None;
        if self.mode == PauseMode::Paused {
            return;
        }
        debug!(rows = live.len(), "Pausing listing");
        self.mode = PauseMode::Paused;
        self.snapshot = Some(PausedSnapshot {
            captured: live.to_vec(),
        });
    }

    /// Goes live immediately and drops the snapshot.
    pub fn unpause(&mut self) {
        self.pending = None;
        if self.mode == PauseMode::Live {
            return;
        }
        debug!("Resuming listing");
        self.mode = PauseMode::Live;
        self.snapshot = None;
    }

    /// Pointer entered the listing. Pauses when the layout supports hover
    /// and the data query last succeeded; always cancels a pending unpause.
    pub fn pointer_enter(&mut self, query_ok: bool, live: &[ListingEntry]) {
        self.pointer_inside = true;
        self.pending = None;
        if self.hover_capable && query_ok {
            self.pause(live);
        }
    }

    /// Pointer left the listing. Returns the ticket to fire once the unpause
    /// delay has elapsed, or `None` when there is nothing to unpause. Touch
    /// layouts only leave a pause by scrolling.
    pub fn pointer_leave(&mut self) -> Option<UnpauseTicket> {
        self.pointer_inside = false;
        if !self.hover_capable || self.mode == PauseMode::Live {
            return None;
        }
        self.issued += 1;
        self.pending = Some(self.issued);
        Some(UnpauseTicket { id: self.issued })
    }

    /// Completes a delayed unpause. Returns whether the listing went live.
    pub fn fire(&mut self, ticket: UnpauseTicket) -> bool {
        if self.pending != Some(ticket.id) || self.pointer_inside {
            return false;
        }
        self.unpause();
        true
    }

    /// Touch layouts: `top` is the listing's top edge relative to the
    /// viewport top.
    pub fn scroll(&mut self, top: f64, live: &[ListingEntry]) {
        if top <= 0.0 {
            self.pause(live);
        } else {
            self.unpause();
        }
    }

    /// Replaces captured rows with their live versions, keeping positions.
    pub fn refresh_snapshot(&mut self, live: &[ListingEntry]) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            let by_id = index(live);
            for row in &mut snapshot.captured {
                if let Some(fresh) = by_id.get(row.token_id.as_str()) {
                    row.clone_from(fresh);
                }
            }
        }
    }

    /// Rows to display given the current live rows.
    pub fn view(&self, live: &[ListingEntry]) -> Vec<ListingEntry> {
        let Some(snapshot) = self.snapshot.as_ref().filter(|_| self.is_paused()) else {
            return live.to_vec();
        };

        let captured: HashSet<&str> = snapshot
            .captured
            .iter()
            .map(|e| e.token_id.as_str())
            .collect();
        let by_id = index(live);

        let arrivals = live
            .iter()
            .filter(|e| !captured.contains(e.token_id.as_str()))
            .cloned();
        let frozen = snapshot.captured.iter().map(|row| {
            by_id
                .get(row.token_id.as_str())
                .map_or_else(|| row.clone(), |fresh| (*fresh).clone())
        });
        arrivals.chain(frozen).collect()
    }

    /// Back to `Live` with the pointer outside.
    pub fn reset(&mut self) {
        self.unpause();
        self.pointer_inside = false;
    }
}

fn index(entries: &[ListingEntry]) -> HashMap<&str, &ListingEntry> {
    let mut by_id = HashMap::with_capacity(entries.len());
    for entry in entries {
        by_id.entry(entry.token_id.as_str()).or_insert(entry);
    }
    by_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooner_domain::SourceOrigin;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn row(id: &str, price: Decimal) -> ListingEntry {
        ListingEntry::new(id, id, SourceOrigin::LiveFeed).with_price(price)
    }

    fn ids(entries: &[ListingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.token_id.as_str()).collect()
    }

    #[test]
    fn test_hover_pause_captures_once() {
        let mut policy = PausePolicy::new(true);
        let first = vec![row("A", dec!(1)), row("B", dec!(2))];
        policy.pointer_enter(true, &first);
        assert!(policy.is_paused());

        let later = vec![row("B", dec!(5)), row("A", dec!(1))];
        policy.pause(&later);
        policy.pointer_enter(true, &later);

        assert_eq!(ids(&policy.snapshot().unwrap().captured), vec!["A", "B"]);
    }

    #[test]
    fn test_no_pause_without_hover_or_data() {
        let mut touch = PausePolicy::new(false);
        touch.pointer_enter(true, &[row("A", dec!(1))]);
        assert_eq!(touch.mode(), PauseMode::Live);

        let mut loading = PausePolicy::new(true);
        loading.pointer_enter(false, &[row("A", dec!(1))]);
        assert_eq!(loading.mode(), PauseMode::Live);
    }

    #[test]
    fn test_new_arrival_shown_first() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1)), row("B", dec!(2))]);

        let live = vec![row("C", dec!(3)), row("B", dec!(2.5)), row("A", dec!(1.1))];
        let view = policy.view(&live);

        assert_eq!(ids(&view), vec!["C", "A", "B"]);
        assert_eq!(view[1].price_usd, Some(dec!(1.1)));
        assert_eq!(view[2].price_usd, Some(dec!(2.5)));
    }

    #[test]
    fn test_rows_gone_from_feed_stay_stale() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1)), row("B", dec!(2))]);

        let view = policy.view(&[row("B", dec!(3))]);

        assert_eq!(ids(&view), vec!["A", "B"]);
        assert_eq!(view[0].price_usd, Some(dec!(1)));
    }

    #[test]
    fn test_live_view_passes_through() {
        let policy = PausePolicy::new(true);
        let live = vec![row("B", dec!(1)), row("A", dec!(1))];
        assert_eq!(policy.view(&live), live);
    }

    #[test]
    fn test_leave_then_fire_unpauses() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1))]);

        let ticket = policy.pointer_leave().unwrap();
        assert!(policy.is_paused());
        assert!(policy.fire(ticket));
        assert_eq!(policy.mode(), PauseMode::Live);
        assert!(policy.snapshot().is_none());
    }

    #[test]
    fn test_reenter_cancels_pending_unpause() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1))]);

        let ticket = policy.pointer_leave().unwrap();
        policy.pointer_enter(true, &[row("Z", dec!(1))]);

        assert!(!policy.fire(ticket));
        assert!(policy.is_paused());
        assert_eq!(ids(&policy.snapshot().unwrap().captured), vec!["A"]);
    }

    #[test]
    fn test_only_latest_ticket_fires() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1))]);

        let stale = policy.pointer_leave().unwrap();
        policy.pointer_enter(true, &[]);
        let current = policy.pointer_leave().unwrap();

        assert!(!policy.fire(stale));
        assert!(policy.fire(current));
    }

    #[test]
    fn test_leave_while_live_schedules_nothing() {
        let mut policy = PausePolicy::new(true);
        assert!(policy.pointer_leave().is_none());
    }

    #[test]
    fn test_scroll_trigger_zone() {
        let mut policy = PausePolicy::new(false);
        policy.scroll(-10.0, &[row("A", dec!(1))]);
        assert!(policy.is_paused());

        policy.scroll(0.0, &[row("B", dec!(1))]);
        assert_eq!(ids(&policy.snapshot().unwrap().captured), vec!["A"]);

        policy.scroll(40.0, &[]);
        assert_eq!(policy.mode(), PauseMode::Live);
    }

    #[test]
    fn test_pointer_leave_ignored_on_touch_layout() {
        let mut policy = PausePolicy::new(false);
        policy.scroll(-10.0, &[row("A", dec!(1))]);

        assert!(policy.pointer_leave().is_none());
        assert!(policy.is_paused());

        policy.scroll(5.0, &[]);
        assert_eq!(policy.mode(), PauseMode::Live);
    }

    #[test]
    fn test_refresh_snapshot_keeps_positions() {
        let mut policy = PausePolicy::new(true);
        policy.pointer_enter(true, &[row("A", dec!(1)), row("B", dec!(2))]);

        policy.refresh_snapshot(&[row("B", dec!(7)), row("C", dec!(1))]);

        let captured = &policy.snapshot().unwrap().captured;
        assert_eq!(ids(captured), vec!["A", "B"]);
        assert_eq!(captured[1].price_usd, Some(dec!(7)));
    }
}
