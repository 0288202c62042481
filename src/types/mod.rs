//! Core types for Feedpulse

mod batch;
mod decision;
mod feed;
mod item;
mod snapshot;
mod weights;

pub use batch::{BatchRecord, GeneratedBatch};
pub use decision::{EngineEvent, InterventionDecision, InterventionKind, SchedulerPhase};
pub use feed::{FeedSlot, UnlockSet};
pub use item::{Item, ItemId, ItemStyle, PatternFamily, Tier};
pub use snapshot::{BehaviorSnapshot, PriorStats, ScrollSnapshot, TimeBucket};
pub use weights::{SlotClass, TierWeights};
