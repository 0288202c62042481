//! Rarity distribution sampler: progress-gated tier weights and catalog
//! selection
//!
//! Weight policy, piecewise over unique items seen:
//! - below 10: 100% discovery placeholders
//! - 10..40: common ramps linearly 0.25 → 0.85, mono takes the remainder
//! - at/after 40 with commons incomplete: lockout band, 100% common
//! - rare opens only when every static common is unlocked AND a 15-view
//!   buffer has elapsed since that completion; ramps 0.05 → 0.25, plateaus
//! - special opens only when every static rare is unlocked; ramps
//!   0.02 → 0.10; generated specials get a constant 0.05 floor beforehand
//!
//! Selection within a tier prefers locked identities with a decaying
//! novelty chance, resamples unlocked otherwise, and never schedules two
//! first sightings back to back in the same tier.

use crate::core::{CatalogStore, SeededRng};
use crate::types::{FeedSlot, SlotClass, Tier, TierWeights, UnlockSet};
use crate::{
    COMMON_RAMP_CEILING, COMMON_RAMP_FLOOR, COMMON_RAMP_SPAN, GENERATED_SPECIAL_FLOOR,
    MONO_ONLY_BELOW, NOVELTY_BASE, NOVELTY_DECAY, NOVELTY_FLOOR, RARE_GATE_BUFFER_VIEWS,
    RARE_RAMP_FLOOR, RARE_RAMP_PLATEAU, RARE_RAMP_SPAN, SPECIAL_RAMP_FLOOR,
    SPECIAL_RAMP_PLATEAU, SPECIAL_RAMP_SPAN,
};

/// Unlock-progress inputs to the weight function
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlockProgress {
    /// Distinct slots revealed so far (placeholders included)
    pub unique_seen: u64,
    /// Every static common identity is unlocked
    pub commons_complete: bool,
    /// Views elapsed since common-tier completion
    pub views_since_commons_complete: u64,
    /// Every static rare identity is unlocked
    pub rares_complete: bool,
    /// Views elapsed since rare-tier completion
    pub views_since_rares_complete: u64,
    /// Any procedurally generated special exists
    pub has_generated_specials: bool,
}

/// Progress-gated tier sampler with anti-repeat selection state
#[derive(Debug, Default)]
pub struct RaritySampler {
    /// Tier whose next selection must avoid a first sighting
    suppress_next: Option<Tier>,
}

impl RaritySampler {
    /// Create a new sampler
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the tier weight tuple for the given progress
    ///
    /// Always returns a normalized tuple (sum 1.0, all components ≥ 0).
    pub fn weights(&self, progress: &UnlockProgress) -> TierWeights {
        let unique = progress.unique_seen;

        if unique < MONO_ONLY_BELOW {
            return TierWeights::mono_only();
        }

        let ramp_end = MONO_ONLY_BELOW + COMMON_RAMP_SPAN;
        if unique < ramp_end {
            let t = (unique - MONO_ONLY_BELOW) as f64 / COMMON_RAMP_SPAN as f64;
            let common = COMMON_RAMP_FLOOR + t * (COMMON_RAMP_CEILING - COMMON_RAMP_FLOOR);
            return TierWeights {
                mono: 1.0 - common,
                common,
                rare: 0.0,
                special: 0.0,
            };
        }

        // Lockout band: the full common catalog must be seen before any
        // rare appears, and the buffer holds rares back a little longer.
        let rare_open = progress.commons_complete
            && progress.views_since_commons_complete >= RARE_GATE_BUFFER_VIEWS;
        if !rare_open {
            let special = if progress.has_generated_specials {
                GENERATED_SPECIAL_FLOOR
            } else {
                0.0
            };
            return TierWeights {
                mono: 0.0,
                common: 1.0 - special,
                rare: 0.0,
                special,
            };
        }

        let rare_views = progress
            .views_since_commons_complete
            .saturating_sub(RARE_GATE_BUFFER_VIEWS);
        let rare_t = (rare_views as f64 / RARE_RAMP_SPAN as f64).min(1.0);
        let rare = RARE_RAMP_FLOOR + rare_t * (RARE_RAMP_PLATEAU - RARE_RAMP_FLOOR);

        let special = if progress.rares_complete {
            let special_t =
                (progress.views_since_rares_complete as f64 / SPECIAL_RAMP_SPAN as f64).min(1.0);
            SPECIAL_RAMP_FLOOR + special_t * (SPECIAL_RAMP_PLATEAU - SPECIAL_RAMP_FLOOR)
        } else if progress.has_generated_specials {
            GENERATED_SPECIAL_FLOOR
        } else {
            0.0
        };

        TierWeights {
            mono: 0.0,
            common: 1.0 - rare - special,
            rare,
            special,
        }
    }

    /// Roll one feed slot: tier by cumulative roll, then a concrete pick
    pub fn roll_slot(
        &mut self,
        progress: &UnlockProgress,
        catalog: &CatalogStore,
        unlocks: &UnlockSet,
        current_view: u64,
        rng: &mut SeededRng,
    ) -> FeedSlot {
        let weights = self.weights(progress);
        match weights.pick(rng.next_f64()) {
            SlotClass::Mono => FeedSlot::Discovery {
                shade: rng.next_f64(),
            },
            SlotClass::Tiered(tier) => {
                self.select_item(tier, catalog, unlocks, current_view, rng)
            }
        }
    }

    /// Pick a concrete item from a tier
    ///
    /// Locked identities win with a novelty chance that decays as the tier
    /// fills in; boosted (freshly generated) locked items take priority.
    /// An exhausted tier falls back to a placeholder.
    pub fn select_item(
        &mut self,
        tier: Tier,
        catalog: &CatalogStore,
        unlocks: &UnlockSet,
        current_view: u64,
        rng: &mut SeededRng,
    ) -> FeedSlot {
        let candidates = catalog.tier_items(tier);
        if candidates.is_empty() {
            return FeedSlot::Discovery {
                shade: rng.next_f64(),
            };
        }

        let locked: Vec<_> = candidates
            .iter()
            .filter(|item| !unlocks.contains(item.id))
            .collect();
        let unlocked: Vec<_> = candidates
            .iter()
            .filter(|item| unlocks.contains(item.id))
            .collect();

        let unlocked_fraction = unlocked.len() as f64 / candidates.len() as f64;
        let novelty_chance =
            (NOVELTY_BASE - NOVELTY_DECAY * unlocked_fraction).max(NOVELTY_FLOOR);

        let suppressed = self.suppress_next == Some(tier);
        if suppressed {
            self.suppress_next = None;
        }

        if !locked.is_empty() && !suppressed && rng.next_f64() < novelty_chance {
            // First sighting scheduled: the next pick in this tier resamples
            // from unlocked identities
            self.suppress_next = Some(tier);

            let boosted: Vec<_> = locked
                .iter()
                .filter(|item| catalog.is_boosted(item.id, current_view))
                .copied()
                .collect();
            let pool = if boosted.is_empty() { &locked } else { &boosted };
            return FeedSlot::Content(rng.pick(pool).id);
        }

        if !unlocked.is_empty() {
            return FeedSlot::Content(rng.pick(&unlocked).id);
        }
        if !locked.is_empty() {
            return FeedSlot::Content(rng.pick(&locked).id);
        }
        FeedSlot::Discovery {
            shade: rng.next_f64(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
