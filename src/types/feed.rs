//! Feed slots and the cumulative unlock set

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

/// One position in the infinite feed
///
/// Slots are materialized lazily ahead of the scroll position. A slot may be
/// overwritten exactly once, by the intervention scheduler, and only while it
/// is unseen and holds a placeholder or Common item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeedSlot {
    /// Discovery placeholder with a scalar shade value
    Discovery { shade: f64 },
    /// Reference to a concrete item
    Content(ItemId),
}

impl FeedSlot {
    /// Is this a discovery placeholder?
    pub fn is_discovery(&self) -> bool {
        matches!(self, FeedSlot::Discovery { .. })
    }

    /// Get the referenced item id, if any
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            FeedSlot::Discovery { .. } => None,
            FeedSlot::Content(id) => Some(*id),
        }
    }
}

/// The set of item identities the user has ever encountered
///
/// Grows monotonically; never shrinks. Drives both rarity gating and the
/// churn drought signal.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UnlockSet {
    ids: HashSet<ItemId>,
}

impl UnlockSet {
    /// Create an empty unlock set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identity; returns true if it was not yet unlocked
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    /// Has this identity been encountered?
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of unlocked identities
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Are all of the given identities unlocked?
    ///
    /// True for an empty input: a vacuous tier holds nothing back.
    pub fn contains_all<'a>(&self, ids: impl IntoIterator<Item = &'a ItemId>) -> bool {
        ids.into_iter().all(|id| self.ids.contains(id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
