//! Intervention scheduler: thresholds churn, enforces the cooldown, picks
//! intervention kinds, and injects rewards into upcoming feed slots
//!
//! The cooldown marker advances the moment an intervention is chosen, not
//! when its effects complete, so a reward being injected can never
//! re-trigger the scheduler.

use std::collections::HashSet;

use crate::core::{CatalogStore, SeededRng};
use crate::types::{
    FeedSlot, InterventionDecision, InterventionKind, ItemId, SchedulerPhase, Tier, UnlockSet,
};
use crate::{CHURN_THRESHOLD, CHURN_THRESHOLD_FULL, INJECTION_LOOKAHEAD, INTERVENTION_COOLDOWN_VIEWS};

/// Churn-gated intervention state machine
#[derive(Debug)]
pub struct InterventionScheduler {
    phase: SchedulerPhase,
    /// View count at the most recent intervention; only moves forward
    last_intervention_view: Option<u64>,
}

impl Default for InterventionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl InterventionScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self {
            phase: SchedulerPhase::Idle,
            last_intervention_view: None,
        }
    }

    /// Current phase (terminal phase of the last evaluation until the next)
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// View count of the last intervention, if any
    pub fn last_intervention_view(&self) -> Option<u64> {
        self.last_intervention_view
    }

    /// Evaluate one visibility event
    ///
    /// Idle → Evaluating → (NoAction | Intervening). On triggering, the
    /// cooldown marker advances to `total_views` immediately.
    pub fn evaluate(
        &mut self,
        churn: f64,
        total_views: u64,
        rng: &mut SeededRng,
    ) -> InterventionDecision {
        self.phase = SchedulerPhase::Evaluating;

        let cooldown_passed = self
            .last_intervention_view
            .map(|v| total_views.saturating_sub(v) >= INTERVENTION_COOLDOWN_VIEWS)
            .unwrap_or(true);

        if churn < CHURN_THRESHOLD || !cooldown_passed {
            self.phase = SchedulerPhase::NoAction;
            return InterventionDecision::no_action(churn, cooldown_passed);
        }

        self.phase = SchedulerPhase::Intervening;
        if self.last_intervention_view.map_or(true, |v| total_views > v) {
            self.last_intervention_view = Some(total_views);
        }

        let mut kinds = vec![InterventionKind::InjectReward];
        if churn >= CHURN_THRESHOLD_FULL {
            kinds.push(InterventionKind::Haptic);
            kinds.push(InterventionKind::Sound);
            kinds.push(InterventionKind::SocialProof);
        } else {
            kinds.push(InterventionKind::Haptic);
            if rng.next_bool() {
                kinds.push(InterventionKind::SocialProof);
            }
        }

        InterventionDecision {
            churn,
            cooldown_passed,
            kinds,
        }
    }

    /// Return to idle between events
    pub fn settle(&mut self) {
        self.phase = SchedulerPhase::Idle;
    }

    /// Inject a locked reward into one of the next few upcoming slots
    ///
    /// Scans `INJECTION_LOOKAHEAD` slots past `current_index`, replaces the
    /// first unseen placeholder/Common slot with a random locked Rare
    /// (locked Special as fallback), and stops. Slots already holding a
    /// Rare or Special are never overwritten, and neither is anything the
    /// user has already seen. With no eligible slot or no locked reward
    /// the intervention degrades to its non-content effects.
    pub fn inject_reward(
        &self,
        feed: &mut [FeedSlot],
        current_index: usize,
        seen_slots: &HashSet<usize>,
        catalog: &CatalogStore,
        unlocks: &UnlockSet,
        rng: &mut SeededRng,
    ) -> Option<ItemId> {
        let reward = self.pick_locked_reward(catalog, unlocks, rng)?;

        let start = current_index + 1;
        let end = (start + INJECTION_LOOKAHEAD).min(feed.len());
        for index in start..end {
            if seen_slots.contains(&index) {
                continue;
            }
            let eligible = match &feed[index] {
                FeedSlot::Discovery { .. } => true,
                FeedSlot::Content(id) => catalog
                    .item(*id)
                    .map(|item| item.tier == Tier::Common)
                    .unwrap_or(false),
            };
            if eligible {
                feed[index] = FeedSlot::Content(reward);
                return Some(reward);
            }
        }
        None
    }

    /// Random not-yet-unlocked Rare, falling back to a locked Special
    fn pick_locked_reward(
        &self,
        catalog: &CatalogStore,
        unlocks: &UnlockSet,
        rng: &mut SeededRng,
    ) -> Option<ItemId> {
        for tier in [Tier::Rare, Tier::Special] {
            let locked: Vec<_> = catalog
                .tier_items(tier)
                .iter()
                .filter(|item| !unlocks.contains(item.id))
                .collect();
            if !locked.is_empty() {
                return Some(rng.pick(&locked).id);
            }
        }
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_no_action() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        let decision = scheduler.evaluate(0.54, 100, &mut rng);
        assert!(!decision.triggered());
        assert!(decision.cooldown_passed);
        assert_eq!(scheduler.phase(), SchedulerPhase::NoAction);
    }

    #[test]
    fn test_trigger_at_threshold() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        let decision = scheduler.evaluate(0.55, 100, &mut rng);
        assert!(decision.triggered());
        assert!(decision.kinds.contains(&InterventionKind::InjectReward));
        assert_eq!(scheduler.last_intervention_view(), Some(100));
    }

    #[test]
    fn test_cooldown_blocks_second_trigger() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        assert!(scheduler.evaluate(0.9, 100, &mut rng).triggered());

        // 5 views later: qualifying churn but inside the cooldown
        let decision = scheduler.evaluate(0.9, 105, &mut rng);
        assert!(!decision.triggered());
        assert!(!decision.cooldown_passed);

        // 13 views after the trigger: allowed again
        assert!(scheduler.evaluate(0.9, 113, &mut rng).triggered());
    }

    #[test]
    fn test_cooldown_marker_only_advances() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        scheduler.evaluate(0.9, 100, &mut rng);
        scheduler.evaluate(0.9, 120, &mut rng);
        assert_eq!(scheduler.last_intervention_view(), Some(120));
    }

    #[test]
    fn test_full_set_above_upper_bound() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        let decision = scheduler.evaluate(0.75, 50, &mut rng);
        for kind in [
            InterventionKind::InjectReward,
            InterventionKind::Haptic,
            InterventionKind::Sound,
            InterventionKind::SocialProof,
        ] {
            assert!(decision.kinds.contains(&kind), "missing {:?}", kind);
        }
    }

    #[test]
    fn test_reduced_set_between_bounds() {
        let mut scheduler = InterventionScheduler::new();
        let mut rng = SeededRng::new(1);

        let decision = scheduler.evaluate(0.60, 50, &mut rng);
        assert!(decision.kinds.contains(&InterventionKind::InjectReward));
        assert!(decision.kinds.contains(&InterventionKind::Haptic));
        assert!(!decision.kinds.contains(&InterventionKind::Sound));
    }

    #[test]
    fn test_injection_replaces_first_eligible_slot() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let unlocks = UnlockSet::new();
        let mut rng = SeededRng::new(2);

        let rare_id = catalog.tier_items(Tier::Rare)[0].id;
        let mut feed = vec![
            FeedSlot::Discovery { shade: 0.1 }, // current position
            FeedSlot::Content(rare_id),         // ineligible: already rare
            FeedSlot::Discovery { shade: 0.2 }, // first eligible
            FeedSlot::Discovery { shade: 0.3 },
        ];

        let injected = scheduler.inject_reward(&mut feed, 0, &HashSet::new(), &catalog, &unlocks, &mut rng);
        assert!(injected.is_some());

        // The rare slot was untouched; the injection landed at index 2
        assert_eq!(feed[1], FeedSlot::Content(rare_id));
        match feed[2] {
            FeedSlot::Content(id) => {
                let item = catalog.item(id).unwrap();
                assert!(item.tier >= Tier::Rare);
            }
            FeedSlot::Discovery { .. } => panic!("injection missed"),
        }
        assert_eq!(feed[3], FeedSlot::Discovery { shade: 0.3 });
    }

    #[test]
    fn test_injection_never_overwrites_rare_or_special() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let unlocks = UnlockSet::new();
        let mut rng = SeededRng::new(3);

        let rare_id = catalog.tier_items(Tier::Rare)[0].id;
        let special_id = catalog.tier_items(Tier::Special)[0].id;
        let mut feed = vec![
            FeedSlot::Discovery { shade: 0.0 },
            FeedSlot::Content(rare_id),
            FeedSlot::Content(special_id),
            FeedSlot::Content(rare_id),
        ];

        let injected = scheduler.inject_reward(&mut feed, 0, &HashSet::new(), &catalog, &unlocks, &mut rng);
        assert_eq!(injected, None);
        assert_eq!(feed[1], FeedSlot::Content(rare_id));
        assert_eq!(feed[2], FeedSlot::Content(special_id));
        assert_eq!(feed[3], FeedSlot::Content(rare_id));
    }

    #[test]
    fn test_injection_skips_seen_slots() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let unlocks = UnlockSet::new();
        let mut rng = SeededRng::new(7);

        // The user scrolled past slots 1 and 2 already
        let seen: HashSet<usize> = [0, 1, 2].into_iter().collect();
        let mut feed = vec![FeedSlot::Discovery { shade: 0.0 }; 5];

        let injected = scheduler.inject_reward(&mut feed, 0, &seen, &catalog, &unlocks, &mut rng);
        assert!(injected.is_some());
        assert!(feed[1].is_discovery());
        assert!(feed[2].is_discovery());
        assert!(!feed[3].is_discovery());
    }

    #[test]
    fn test_injection_stops_after_one_replacement() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let unlocks = UnlockSet::new();
        let mut rng = SeededRng::new(4);

        let mut feed = vec![
            FeedSlot::Discovery { shade: 0.0 },
            FeedSlot::Discovery { shade: 0.1 },
            FeedSlot::Discovery { shade: 0.2 },
            FeedSlot::Discovery { shade: 0.3 },
        ];

        scheduler.inject_reward(&mut feed, 0, &HashSet::new(), &catalog, &unlocks, &mut rng);
        let replaced = feed
            .iter()
            .filter(|slot| !slot.is_discovery())
            .count();
        assert_eq!(replaced, 1);
    }

    #[test]
    fn test_injection_degrades_without_locked_rewards() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let mut unlocks = UnlockSet::new();
        for tier in [Tier::Rare, Tier::Special] {
            for item in catalog.tier_items(tier) {
                unlocks.insert(item.id);
            }
        }
        let mut rng = SeededRng::new(5);

        let mut feed = vec![FeedSlot::Discovery { shade: 0.0 }; 4];
        let injected = scheduler.inject_reward(&mut feed, 0, &HashSet::new(), &catalog, &unlocks, &mut rng);
        assert_eq!(injected, None);
        assert!(feed.iter().all(|slot| slot.is_discovery()));
    }

    #[test]
    fn test_injection_prefers_locked_rare_over_special() {
        let scheduler = InterventionScheduler::new();
        let catalog = CatalogStore::new();
        let unlocks = UnlockSet::new();
        let mut rng = SeededRng::new(6);

        let mut feed = vec![FeedSlot::Discovery { shade: 0.0 }; 4];
        let injected = scheduler
            .inject_reward(&mut feed, 0, &HashSet::new(), &catalog, &unlocks, &mut rng)
            .unwrap();
        assert_eq!(catalog.item(injected).unwrap().tier, Tier::Rare);
    }
}
