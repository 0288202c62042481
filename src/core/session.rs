//! Feed session: the single-threaded event path tying every component
//! together
//!
//! One visibility event is processed to completion before the next is
//! accepted: tracker update → unlock bookkeeping → snapshot → churn score
//! → scheduler → optional generation. All state is per session; nothing
//! here is shared across sessions.

use chrono::{Local, Timelike};
use serde::Serialize;
use std::collections::HashSet;

use crate::core::{
    behavior_seed, generate_batch, CatalogStore, ChurnModel, HeuristicChurnModel,
    InterventionScheduler, RaritySampler, RollingTracker, SeededRng, UnlockProgress,
};
use crate::types::{
    BehaviorSnapshot, EngineEvent, FeedSlot, InterventionKind, ItemId, PriorStats, SchedulerPhase,
    ScrollSnapshot, Tier, TierWeights, TimeBucket, UnlockSet,
};
use crate::{ACTIVE_GAP_CAP_SECS, DROUGHT_SATURATION_VIEWS, INJECTION_LOOKAHEAD};

/// Collaborator interested in engine output events
///
/// Haptics, audio, shimmer cues, and toast rendering all live behind this;
/// the engine itself renders and plays nothing.
pub trait EventSink {
    fn on_event(&mut self, event: &EngineEvent);
}

/// Per-session wiring inputs
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Time-of-day bucket the session runs in
    pub time_bucket: TimeBucket,
    /// Prior-session aggregates (landing-screen baseline), opaque here
    pub prior: PriorStats,
    /// Seed for the session's sampling stream
    pub rng_seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_bucket: TimeBucket::from_hour(Local::now().hour()),
            prior: PriorStats::default(),
            rng_seed: 0x5EED_F00D,
        }
    }
}

/// Outcome of one visibility event
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutcome {
    /// Slot the event landed on
    pub slot_index: usize,
    /// Churn probability scored this event
    pub churn: f64,
    /// Terminal scheduler phase
    pub phase: SchedulerPhase,
    /// Identity unlocked by this event, if any
    pub unlocked: Option<ItemId>,
    /// Events emitted while processing
    pub events: Vec<EngineEvent>,
}

/// One user's engagement session
pub struct FeedSession {
    config: SessionConfig,
    catalog: CatalogStore,
    unlocks: UnlockSet,
    feed: Vec<FeedSlot>,
    tracker: RollingTracker,
    sampler: RaritySampler,
    scheduler: InterventionScheduler,
    model: Box<dyn ChurnModel>,
    rng: SeededRng,
    sinks: Vec<Box<dyn EventSink>>,

    seen_slots: HashSet<usize>,
    total_views: u64,
    unique_views: u64,
    views_since_unlock: u64,
    scroll_position: u64,
    session_start: Option<f64>,
    last_event_at: Option<f64>,
    active_secs: f64,
    commons_complete_at: Option<u64>,
    rares_complete_at: Option<u64>,
}

impl FeedSession {
    /// Create a session with an explicit churn model
    pub fn new(config: SessionConfig, model: Box<dyn ChurnModel>) -> Self {
        Self {
            rng: SeededRng::new(config.rng_seed),
            config,
            catalog: CatalogStore::new(),
            unlocks: UnlockSet::new(),
            feed: Vec::new(),
            tracker: RollingTracker::new(),
            sampler: RaritySampler::new(),
            scheduler: InterventionScheduler::new(),
            model,
            sinks: Vec::new(),
            seen_slots: HashSet::new(),
            total_views: 0,
            unique_views: 0,
            views_since_unlock: 0,
            scroll_position: 0,
            session_start: None,
            last_event_at: None,
            active_secs: 0.0,
            commons_complete_at: None,
            rares_complete_at: None,
        }
    }

    /// Create a session wired to the reference heuristic
    pub fn with_heuristic(config: SessionConfig) -> Self {
        Self::new(config, Box::new(HeuristicChurnModel::new()))
    }

    /// Register an output-event collaborator
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Lazily materialize feed slots through `ahead_of_index` plus the
    /// injection lookahead
    ///
    /// Idempotent; safe to call every tick.
    pub fn ensure_slots_generated(&mut self, ahead_of_index: usize) {
        let target = ahead_of_index + 1 + INJECTION_LOOKAHEAD;
        while self.feed.len() < target {
            let progress = self.progress();
            let slot = self.sampler.roll_slot(
                &progress,
                &self.catalog,
                &self.unlocks,
                self.total_views,
                &mut self.rng,
            );
            self.feed.push(slot);
        }
    }

    /// Process one "item became visible" event
    ///
    /// The sole entry point driving tracker updates, churn scoring, and
    /// gating. `now_secs` is read once by the caller and reused for the
    /// whole event.
    pub fn on_item_visible(&mut self, slot_index: usize, now_secs: f64) -> ViewOutcome {
        self.ensure_slots_generated(slot_index);

        // Clock bookkeeping
        let start = *self.session_start.get_or_insert(now_secs);
        let session_secs = (now_secs - start).max(0.0);
        if let Some(last) = self.last_event_at {
            let gap = (now_secs - last).max(0.0);
            self.active_secs += gap.min(ACTIVE_GAP_CAP_SECS);
        }
        self.last_event_at = Some(now_secs);

        self.tracker.record(now_secs);
        self.total_views += 1;
        self.scroll_position = slot_index as u64;

        // Unlock bookkeeping
        let mut events = Vec::new();
        let unlocked = self.reveal_slot(slot_index);
        match unlocked {
            Some(id) => {
                self.views_since_unlock = 0;
                if let Some(Tier::Special) = self.catalog.item(id).map(|item| item.tier) {
                    events.push(self.run_generation(id, session_secs));
                }
            }
            None => self.views_since_unlock += 1,
        }
        self.refresh_completion_marks();

        // Score and schedule
        let snapshot = self.scroll_snapshot(session_secs);
        let churn = self.model.churn_probability(&snapshot).clamp(0.0, 1.0);
        let mut decision = self
            .scheduler
            .evaluate(churn, self.total_views, &mut self.rng);

        if decision.kinds.contains(&InterventionKind::InjectReward) {
            let injected = self.scheduler.inject_reward(
                &mut self.feed,
                slot_index,
                &self.seen_slots,
                &self.catalog,
                &self.unlocks,
                &mut self.rng,
            );
            if injected.is_none() {
                // Degrade to non-content effects only
                decision.kinds.retain(|k| *k != InterventionKind::InjectReward);
            }
        }

        let phase = self.scheduler.phase();
        if decision.triggered() {
            events.push(EngineEvent::InterventionFired { decision });
        }
        self.scheduler.settle();

        for event in &events {
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }

        ViewOutcome {
            slot_index,
            churn,
            phase,
            unlocked,
            events,
        }
    }

    /// Reveal a slot, returning the identity it unlocked (first sighting)
    ///
    /// A discovery placeholder counts toward unique views on its first
    /// reveal; an item counts once, when it enters the unlock set.
    fn reveal_slot(&mut self, slot_index: usize) -> Option<ItemId> {
        let first_reveal = self.seen_slots.insert(slot_index);
        let slot = self.feed.get(slot_index).copied()?;
        match slot {
            FeedSlot::Discovery { .. } => {
                if first_reveal {
                    self.unique_views += 1;
                }
                None
            }
            FeedSlot::Content(id) => {
                if self.unlocks.insert(id) {
                    self.unique_views += 1;
                    Some(id)
                } else {
                    None
                }
            }
        }
    }

    /// Run the generation pipeline for a special-tier unlock
    fn run_generation(&mut self, trigger: ItemId, session_secs: f64) -> EngineEvent {
        let snapshot = BehaviorSnapshot {
            total_views: self.total_views,
            unique_views: self.unique_views,
            active_secs: self.active_secs,
            session_secs,
            scroll_position: self.scroll_position,
            time_bucket: self.config.time_bucket,
            weights: self.sampler.weights(&self.progress()),
            trigger: Some(trigger),
        };
        let seed = behavior_seed(&snapshot);
        let batch = generate_batch(seed, trigger);
        self.catalog.absorb_batch(&batch, self.total_views);
        EngineEvent::BatchInjected {
            record: batch.record(),
        }
    }

    /// Record tier-completion view counts once their gates close
    fn refresh_completion_marks(&mut self) {
        if self.commons_complete_at.is_none() {
            let ids = self.catalog.static_tier_ids(Tier::Common);
            if self.unlocks.contains_all(ids.iter()) {
                self.commons_complete_at = Some(self.total_views);
            }
        }
        if self.rares_complete_at.is_none() {
            let ids = self.catalog.static_tier_ids(Tier::Rare);
            if self.unlocks.contains_all(ids.iter()) {
                self.rares_complete_at = Some(self.total_views);
            }
        }
    }

    /// Current unlock-progress inputs for the sampler
    fn progress(&self) -> UnlockProgress {
        UnlockProgress {
            unique_seen: self.unique_views,
            commons_complete: self.commons_complete_at.is_some(),
            views_since_commons_complete: self
                .commons_complete_at
                .map(|v| self.total_views.saturating_sub(v))
                .unwrap_or(0),
            rares_complete: self.rares_complete_at.is_some(),
            views_since_rares_complete: self
                .rares_complete_at
                .map(|v| self.total_views.saturating_sub(v))
                .unwrap_or(0),
            has_generated_specials: self.catalog.has_generated_specials(),
        }
    }

    /// Build the churn feature vector for this event
    fn scroll_snapshot(&self, session_secs: f64) -> ScrollSnapshot {
        let unlocked_count = self.unlocks.len() as u64;
        ScrollSnapshot {
            total_views: self.total_views,
            unlocked_count,
            views_since_unlock: self.views_since_unlock,
            velocity: self.tracker.velocity(),
            trend: self.tracker.trend(),
            unlock_density: if self.total_views > 0 {
                unlocked_count as f64 / self.total_views as f64
            } else {
                0.0
            },
            reward_drought: (self.views_since_unlock as f64 / DROUGHT_SATURATION_VIEWS).min(1.0),
            session_secs,
            active_secs: self.active_secs,
        }
    }

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    /// Landing-screen baseline from the prior session
    pub fn baseline(&self) -> PriorStats {
        self.config.prior
    }

    /// Total views this session
    pub fn total_views(&self) -> u64 {
        self.total_views
    }

    /// Unique reveals this session
    pub fn unique_views(&self) -> u64 {
        self.unique_views
    }

    /// Identities unlocked so far
    pub fn unlocked_count(&self) -> usize {
        self.unlocks.len()
    }

    /// Materialized feed length
    pub fn feed_len(&self) -> usize {
        self.feed.len()
    }

    /// Inspect a feed slot
    pub fn slot(&self, index: usize) -> Option<FeedSlot> {
        self.feed.get(index).copied()
    }

    /// The session's catalog store
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Current distribution weights
    pub fn current_weights(&self) -> TierWeights {
        self.sampler.weights(&self.progress())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> FeedSession {
        FeedSession::with_heuristic(SessionConfig {
            time_bucket: TimeBucket::Afternoon,
            prior: PriorStats::default(),
            rng_seed: 42,
        })
    }

    #[test]
    fn test_ensure_slots_is_idempotent() {
        let mut s = session();
        s.ensure_slots_generated(10);
        let len = s.feed_len();
        assert!(len >= 11);

        s.ensure_slots_generated(10);
        s.ensure_slots_generated(5);
        assert_eq!(s.feed_len(), len);
    }

    #[test]
    fn test_early_feed_is_all_discovery() {
        let mut s = session();
        s.ensure_slots_generated(8);
        for i in 0..=8 {
            assert!(s.slot(i).unwrap().is_discovery(), "slot {} not discovery", i);
        }
    }

    #[test]
    fn test_views_accumulate() {
        let mut s = session();
        for i in 0..5 {
            s.on_item_visible(i, i as f64 * 0.5);
        }
        assert_eq!(s.total_views(), 5);
        assert_eq!(s.unique_views(), 5);
    }

    #[test]
    fn test_revisit_does_not_recount_unique() {
        let mut s = session();
        s.on_item_visible(0, 0.0);
        s.on_item_visible(0, 1.0);
        assert_eq!(s.total_views(), 2);
        assert_eq!(s.unique_views(), 1);
    }

    #[test]
    fn test_churn_always_bounded() {
        let mut s = session();
        let mut t = 0.0;
        for i in 0..300 {
            // Erratic pacing, including long stalls
            t += if i % 17 == 0 { 30.0 } else { 0.4 };
            let outcome = s.on_item_visible(i, t);
            assert!(
                (0.0..=1.0).contains(&outcome.churn),
                "churn out of range at view {}: {}",
                i,
                outcome.churn
            );
        }
    }

    #[test]
    fn test_commons_eventually_complete_and_rares_follow() {
        let mut s = session();
        let mut t = 0.0;
        let mut saw_rare_before_completion = false;
        for i in 0..2000 {
            t += 0.5;
            s.on_item_visible(i, t);
            if s.commons_complete_at.is_none() {
                let statics = s.catalog.static_tier_ids(Tier::Rare);
                if statics.iter().any(|id| s.unlocks.contains(*id)) {
                    saw_rare_before_completion = true;
                }
            }
        }
        assert!(s.commons_complete_at.is_some(), "commons never completed");
        assert!(!saw_rare_before_completion, "rare leaked before common completion");
    }

    #[test]
    fn test_interventions_respect_cooldown() {
        let mut s = session();
        let mut t = 0.0;
        let mut fired_views: Vec<u64> = Vec::new();
        for i in 0..1500 {
            // Slow crawl keeps churn high
            t += 6.0;
            let outcome = s.on_item_visible(i, t);
            if outcome
                .events
                .iter()
                .any(|e| matches!(e, EngineEvent::InterventionFired { .. }))
            {
                fired_views.push(s.total_views());
            }
        }
        for pair in fired_views.windows(2) {
            assert!(
                pair[1] - pair[0] >= crate::INTERVENTION_COOLDOWN_VIEWS,
                "interventions too close: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_special_unlock_triggers_generation() {
        let mut s = session();
        // Place a special directly in the path
        s.ensure_slots_generated(0);
        let special = s.catalog.tier_items(Tier::Special)[0].id;
        s.feed[0] = FeedSlot::Content(special);

        let outcome = s.on_item_visible(0, 0.0);
        assert_eq!(outcome.unlocked, Some(special));
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::BatchInjected { .. })));
        assert!(s.catalog().has_generated_specials());
    }

    #[test]
    fn test_sinks_receive_events() {
        struct Recorder(Rc<RefCell<Vec<EngineEvent>>>);
        impl EventSink for Recorder {
            fn on_event(&mut self, event: &EngineEvent) {
                self.0.borrow_mut().push(event.clone());
            }
        }

        let mut s = session();
        let log = Rc::new(RefCell::new(Vec::new()));
        s.subscribe(Box::new(Recorder(Rc::clone(&log))));

        s.ensure_slots_generated(0);
        let special = s.catalog.tier_items(Tier::Special)[0].id;
        s.feed[0] = FeedSlot::Content(special);
        s.on_item_visible(0, 0.0);

        assert!(!log.borrow().is_empty());
    }

    #[test]
    fn test_baseline_passthrough() {
        let prior = PriorStats {
            total_views: 900,
            unique_views: 340,
        };
        let s = FeedSession::with_heuristic(SessionConfig {
            time_bucket: TimeBucket::Night,
            prior,
            rng_seed: 1,
        });
        assert_eq!(s.baseline(), prior);
    }

    #[test]
    fn test_injected_rewards_never_displace_rares() {
        let mut s = session();
        let mut t = 0.0;
        // Drive far enough that injections and rare slots coexist
        for i in 0..1200 {
            t += 4.0;
            let before: Vec<(usize, FeedSlot)> = (i + 1..s.feed_len())
                .filter_map(|idx| s.slot(idx).map(|slot| (idx, slot)))
                .filter(|(_, slot)| match slot {
                    FeedSlot::Content(id) => s
                        .catalog()
                        .item(*id)
                        .map(|item| item.tier >= Tier::Rare)
                        .unwrap_or(false),
                    FeedSlot::Discovery { .. } => false,
                })
                .collect();

            s.on_item_visible(i, t);

            for (idx, slot) in before {
                assert_eq!(s.slot(idx).unwrap(), slot, "rare slot {} rewritten", idx);
            }
        }
    }
}
