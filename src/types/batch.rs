//! Generated batch and its durable record
//!
//! The item list is fully derivable from the seed, so only the metadata
//! (seed, trigger, timestamp) ever needs a persisted representation. The
//! record type is what an external storage collaborator serializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Item, ItemId};

/// Output of one content-generator invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBatch {
    /// Seed the batch was derived from
    pub seed: u64,
    /// Identity of the unlock that triggered generation
    pub trigger: ItemId,
    /// When the batch was created
    pub created_at: DateTime<Utc>,
    /// Ordered items: 6 Common, then 3 Rare, then 1 Special
    pub items: Vec<Item>,
}

impl GeneratedBatch {
    /// Durable metadata-only record for this batch
    pub fn record(&self) -> BatchRecord {
        BatchRecord {
            seed: self.seed,
            trigger: self.trigger,
            created_at: self.created_at,
        }
    }
}

/// Durable batch metadata: everything needed to re-derive the item list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub seed: u64,
    pub trigger: ItemId,
    pub created_at: DateTime<Utc>,
}
