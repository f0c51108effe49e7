//! Legacy/regular pool labels.
//!
//! The live feed does not expose a pool's config key, so the label is derived
//! from the creation timestamp: pools created before the cutoff are legacy.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolLabel {
    Legacy,
    Regular,
}

impl PoolLabel {
    pub fn text(&self) -> &'static str {
        match self {
            PoolLabel::Legacy => "Legacy",
            PoolLabel::Regular => "V2",
        }
    }
}

/// Label configuration. Labels are enabled only when both config keys and
/// the cutoff are present.
#[derive(Debug, Clone, Default)]
pub struct LabelConfig {
    pub legacy_pool_config: Option<String>,
    pub regular_pool_config: Option<String>,
    pub legacy_cutoff: Option<DateTime<Utc>>,
}

impl LabelConfig {
    pub fn is_enabled(&self) -> bool {
        self.legacy_pool_config.is_some()
            && self.regular_pool_config.is_some()
            && self.legacy_cutoff.is_some()
    }

    /// Label for a pool created at `created_at`, or `None` when either the
    /// timestamp or the cutoff is unknown.
    pub fn label(&self, created_at: Option<DateTime<Utc>>) -> Option<PoolLabel> {
        let created_at = created_at?;
        let cutoff = self.legacy_cutoff?;
        if created_at < cutoff {
            Some(PoolLabel::Legacy)
        } else {
            Some(PoolLabel::Regular)
        }
    }
}
