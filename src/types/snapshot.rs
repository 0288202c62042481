//! Behavior and scroll snapshots
//!
//! - BehaviorSnapshot: seed material for content generation
//! - ScrollSnapshot: derived feature vector for churn scoring
//!
//! Both are built fresh per event and never persisted by this engine.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, TierWeights};

/// Coarse time-of-day bucket (4 buckets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeBucket {
    /// 00:00 - 05:59
    Night,
    /// 06:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Afternoon,
    /// 18:00 - 23:59
    Evening,
}

impl TimeBucket {
    /// Bucket for an hour of day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            0..=5 => TimeBucket::Night,
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            _ => TimeBucket::Evening,
        }
    }

    /// Stable discriminant for hashing
    pub fn ordinal(&self) -> u64 {
        match self {
            TimeBucket::Night => 0,
            TimeBucket::Morning => 1,
            TimeBucket::Afternoon => 2,
            TimeBucket::Evening => 3,
        }
    }
}

/// Point-in-time record of user behavior, the sole seed material for
/// content generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    /// Total item views this session
    pub total_views: u64,
    /// Distinct items viewed this session
    pub unique_views: u64,
    /// Elapsed active-scroll time (seconds)
    pub active_secs: f64,
    /// Elapsed session time (seconds)
    pub session_secs: f64,
    /// Current scroll position (slot index)
    pub scroll_position: u64,
    /// Time-of-day bucket
    pub time_bucket: TimeBucket,
    /// Current rarity distribution weights
    pub weights: TierWeights,
    /// Identity of the unlock that triggered this snapshot, if any
    pub trigger: Option<ItemId>,
}

/// Derived feature vector for churn scoring
///
/// Recomputed on every visibility event; superseded immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSnapshot {
    /// Total item views this session
    pub total_views: u64,
    /// Identities unlocked so far
    pub unlocked_count: u64,
    /// Views elapsed since the most recent unlock
    pub views_since_unlock: u64,
    /// Instantaneous velocity, items/sec over the trailing window
    pub velocity: f64,
    /// Least-squares slope of the velocity window
    pub trend: f64,
    /// Unlocks per view, [0, 1]
    pub unlock_density: f64,
    /// Drought normalized against its saturation point, [0, 1]
    pub reward_drought: f64,
    /// Elapsed session time (seconds)
    pub session_secs: f64,
    /// Elapsed active-scroll time (seconds)
    pub active_secs: f64,
}

/// Prior-session aggregate counts
///
/// Owned and persisted by an external collaborator; consumed here only as
/// constructor input for a landing-screen baseline. Opaque integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorStats {
    pub total_views: u64,
    pub unique_views: u64,
}

// =============================================================================
// TESTS
// =============================================================================
