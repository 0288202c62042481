//! Churn predictor: behavior snapshot → disengagement probability
//!
//! The predictor is a pure, total scoring function behind a trait so a
//! learned model can replace the reference heuristic without touching any
//! caller. Every implementation must return a value in [0,1] for every
//! valid snapshot; a failing predictor is a wiring error, not a runtime
//! condition.

use crate::types::ScrollSnapshot;
use crate::{
    CHURN_CAP_FATIGUE, CHURN_CAP_TREND, CHURN_PENALTY_SHALLOW, CHURN_PENALTY_STALL,
    CHURN_TREND_SCALE, CHURN_WEIGHT_DROUGHT, DROUGHT_SATURATION_VIEWS, FATIGUE_GRACE_SECS,
    FATIGUE_PER_MINUTE, STALL_VELOCITY,
};

/// Pluggable churn scoring contract
pub trait ChurnModel {
    /// Probability in [0,1] that the user is about to disengage
    fn churn_probability(&self, snapshot: &ScrollSnapshot) -> f64;
}

/// Reference heuristic: an additive risk budget with independently capped
/// terms, clamped to [0,1]
#[derive(Debug, Default, Clone)]
pub struct HeuristicChurnModel;

impl HeuristicChurnModel {
    /// Create the reference heuristic
    pub fn new() -> Self {
        Self
    }

    /// Reward drought: saturates at 15 views without an unlock
    fn drought_term(&self, snapshot: &ScrollSnapshot) -> f64 {
        (snapshot.views_since_unlock as f64 / DROUGHT_SATURATION_VIEWS).min(1.0)
            * CHURN_WEIGHT_DROUGHT
    }

    /// Slowing scroll: only negative slopes carry risk
    fn trend_term(&self, snapshot: &ScrollSnapshot) -> f64 {
        if snapshot.trend < 0.0 {
            (snapshot.trend.abs() * CHURN_TREND_SCALE).min(CHURN_CAP_TREND)
        } else {
            0.0
        }
    }

    /// Session fatigue: accrues per session minute once past the grace period
    fn fatigue_term(&self, snapshot: &ScrollSnapshot) -> f64 {
        if snapshot.session_secs <= FATIGUE_GRACE_SECS {
            return 0.0;
        }
        let minutes = snapshot.session_secs / 60.0;
        (minutes * FATIGUE_PER_MINUTE).min(CHURN_CAP_FATIGUE)
    }

    /// Shallow engagement: lots of scrolling, almost nothing unlocked
    fn shallow_term(&self, snapshot: &ScrollSnapshot) -> f64 {
        if snapshot.unlocked_count < 3 && snapshot.total_views > 20 {
            CHURN_PENALTY_SHALLOW
        } else {
            0.0
        }
    }

    /// Near-stalled absolute velocity
    fn stall_term(&self, snapshot: &ScrollSnapshot) -> f64 {
        if snapshot.velocity < STALL_VELOCITY && snapshot.total_views > 10 {
            CHURN_PENALTY_STALL
        } else {
            0.0
        }
    }
}

impl ChurnModel for HeuristicChurnModel {
    fn churn_probability(&self, snapshot: &ScrollSnapshot) -> f64 {
        let score = self.drought_term(snapshot)
            + self.trend_term(snapshot)
            + self.fatigue_term(snapshot)
            + self.shallow_term(snapshot)
            + self.stall_term(snapshot);
        score.clamp(0.0, 1.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
