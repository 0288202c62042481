//! Tier weight tuple and the cumulative roll

use serde::{Deserialize, Serialize};

use crate::types::Tier;

/// Content class a feed slot resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotClass {
    /// Discovery placeholder
    Mono,
    /// Concrete item of the given tier
    Tiered(Tier),
}

/// Probability weights over the four content classes
///
/// Invariant: each weight ≥ 0 and the four sum to 1.0 within floating-point
/// tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    pub mono: f64,
    pub common: f64,
    pub rare: f64,
    pub special: f64,
}

impl TierWeights {
    /// All weight on discovery placeholders
    pub fn mono_only() -> Self {
        Self {
            mono: 1.0,
            common: 0.0,
            rare: 0.0,
            special: 0.0,
        }
    }

    /// Sum of the four weights
    pub fn sum(&self) -> f64 {
        self.mono + self.common + self.rare + self.special
    }

    /// Does this tuple satisfy the normalization invariant?
    pub fn is_normalized(&self) -> bool {
        self.mono >= 0.0
            && self.common >= 0.0
            && self.rare >= 0.0
            && self.special >= 0.0
            && (self.sum() - 1.0).abs() <= 1e-9
    }

    /// Resolve a uniform roll in [0,1) to a content class
    ///
    /// Cumulative comparison in mono → common → rare → special order over
    /// half-open intervals; the order is significant for reproducibility.
    pub fn pick(&self, roll: f64) -> SlotClass {
        let mut acc = self.mono;
        if roll < acc {
            return SlotClass::Mono;
        }
        acc += self.common;
        if roll < acc {
            return SlotClass::Tiered(Tier::Common);
        }
        acc += self.rare;
        if roll < acc {
            return SlotClass::Tiered(Tier::Rare);
        }
        SlotClass::Tiered(Tier::Special)
    }
}

// =============================================================================
// TESTS
// =============================================================================
