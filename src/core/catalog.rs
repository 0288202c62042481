//! Item catalogs: static tiers, generated-name word lists, and the
//! session-owned catalog store
//!
//! The static tables below are immutable data; all mutable catalog state
//! (procedurally generated items, boost anchors) lives in `CatalogStore`,
//! which is constructed per session and dependency-injected.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::types::{GeneratedBatch, Item, ItemId, ItemStyle, PatternFamily, Tier};
use crate::BOOST_WINDOW_VIEWS;

// =============================================================================
// NAME WORD LISTS - 50 x 50 = 2500 combinations
// =============================================================================

pub static NAME_ADJECTIVES: &[&str] = &[
    "Quiet", "Gilded", "Velvet", "Drifting", "Luminous", "Misty", "Frosted", "Hollow",
    "Winding", "Pale", "Vivid", "Dusky", "Silvered", "Brisk", "Mellow", "Faded",
    "Radiant", "Shaded", "Crimson", "Sable", "Tidal", "Ashen", "Blazing", "Calm",
    "Dappled", "Echoing", "Feathered", "Glassy", "Humming", "Inky", "Jagged", "Kindled",
    "Lunar", "Marbled", "Nocturnal", "Opal", "Painted", "Quivering", "Rippled", "Solar",
    "Tangled", "Umber", "Veiled", "Wandering", "Woven", "Azure", "Burnished", "Clouded",
    "Distant", "Emerald",
];

pub static NAME_NOUNS: &[&str] = &[
    "Meadow", "Harbor", "Ember", "Summit", "Hollow", "Lantern", "Drift", "Grove",
    "Prism", "Tide", "Canyon", "Beacon", "Thicket", "Mirage", "Cascade", "Aurora",
    "Dune", "Fjord", "Glacier", "Haven", "Isle", "Junction", "Knoll", "Lagoon",
    "Monolith", "Nebula", "Oasis", "Pinnacle", "Quarry", "Ridge", "Sanctum", "Terrace",
    "Undertow", "Vale", "Willow", "Zenith", "Atrium", "Bluff", "Cove", "Delta",
    "Estuary", "Fountain", "Garden", "Horizon", "Inlet", "Jetty", "Kiln", "Lighthouse",
    "Marsh", "Nook",
];

// =============================================================================
// STATIC CATALOGS - stable order matters: selection candidate lists derive
// from these, and unlock pacing depends on their sizes
// =============================================================================

fn catalog_item(tier: Tier, index: u64, name: &str, hue: f64, sat: f64, bri: f64) -> Item {
    Item::new(
        ItemId::catalog(tier, index),
        name,
        tier,
        ItemStyle::solid(hue, sat, bri),
    )
}

lazy_static! {
    /// 16 baseline commons
    pub static ref COMMON_CATALOG: Vec<Item> = vec![
        catalog_item(Tier::Common, 0, "Slate", 0.58, 0.18, 0.62),
        catalog_item(Tier::Common, 1, "Clay", 0.06, 0.48, 0.70),
        catalog_item(Tier::Common, 2, "Moss", 0.28, 0.42, 0.55),
        catalog_item(Tier::Common, 3, "Fern", 0.33, 0.50, 0.60),
        catalog_item(Tier::Common, 4, "Sand", 0.11, 0.30, 0.85),
        catalog_item(Tier::Common, 5, "Tide", 0.52, 0.45, 0.68),
        catalog_item(Tier::Common, 6, "Peach", 0.05, 0.38, 0.92),
        catalog_item(Tier::Common, 7, "Plum", 0.79, 0.40, 0.58),
        catalog_item(Tier::Common, 8, "Rust", 0.03, 0.62, 0.64),
        catalog_item(Tier::Common, 9, "Sage", 0.24, 0.26, 0.72),
        catalog_item(Tier::Common, 10, "Dawn", 0.08, 0.35, 0.90),
        catalog_item(Tier::Common, 11, "Dusk", 0.66, 0.38, 0.52),
        catalog_item(Tier::Common, 12, "Coal", 0.60, 0.10, 0.30),
        catalog_item(Tier::Common, 13, "Snow", 0.55, 0.04, 0.96),
        catalog_item(Tier::Common, 14, "Reed", 0.20, 0.34, 0.66),
        catalog_item(Tier::Common, 15, "Bloom", 0.90, 0.44, 0.82),
    ];

    /// 8 rares
    pub static ref RARE_CATALOG: Vec<Item> = vec![
        catalog_item(Tier::Rare, 0, "Gilded Harbor", 0.12, 0.72, 0.88),
        catalog_item(Tier::Rare, 1, "Velvet Aurora", 0.76, 0.68, 0.75),
        catalog_item(Tier::Rare, 2, "Inky Lagoon", 0.61, 0.80, 0.45),
        catalog_item(Tier::Rare, 3, "Lunar Cascade", 0.56, 0.25, 0.95),
        catalog_item(Tier::Rare, 4, "Burnished Summit", 0.07, 0.78, 0.80),
        catalog_item(Tier::Rare, 5, "Misty Fjord", 0.48, 0.35, 0.78),
        catalog_item(Tier::Rare, 6, "Crimson Nebula", 0.98, 0.82, 0.70),
        catalog_item(Tier::Rare, 7, "Opal Grove", 0.38, 0.30, 0.90),
    ];

    /// 4 specials, each with a distinct pattern family
    pub static ref SPECIAL_CATALOG: Vec<Item> = vec![
        Item::new(
            ItemId::catalog(Tier::Special, 0),
            "Prismatic Zenith",
            Tier::Special,
            ItemStyle { hue: 0.83, saturation: 0.85, brightness: 0.92, pattern: PatternFamily::Striped },
        ),
        Item::new(
            ItemId::catalog(Tier::Special, 1),
            "Glyphwoven Sanctum",
            Tier::Special,
            ItemStyle { hue: 0.14, saturation: 0.75, brightness: 0.85, pattern: PatternFamily::GlyphTiled },
        ),
        Item::new(
            ItemId::catalog(Tier::Special, 2),
            "Dotted Mirage",
            Tier::Special,
            ItemStyle { hue: 0.50, saturation: 0.70, brightness: 0.90, pattern: PatternFamily::Dotted },
        ),
        Item::new(
            ItemId::catalog(Tier::Special, 3),
            "Iconic Beacon",
            Tier::Special,
            ItemStyle { hue: 0.02, saturation: 0.88, brightness: 0.78, pattern: PatternFamily::Iconographic },
        ),
    ];
}

// =============================================================================
// CATALOG STORE
// =============================================================================

/// Per-session item catalog: the static tiers plus whatever the generator
/// has produced this session
#[derive(Debug, Clone)]
pub struct CatalogStore {
    commons: Vec<Item>,
    rares: Vec<Item>,
    specials: Vec<Item>,
    /// View count at which each generated item was created (boost anchor)
    generated_at: HashMap<ItemId, u64>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create a store seeded with the static catalogs
    pub fn new() -> Self {
        Self {
            commons: COMMON_CATALOG.clone(),
            rares: RARE_CATALOG.clone(),
            specials: SPECIAL_CATALOG.clone(),
            generated_at: HashMap::new(),
        }
    }

    /// All items of a tier, static entries first, in stable order
    pub fn tier_items(&self, tier: Tier) -> &[Item] {
        match tier {
            Tier::Common => &self.commons,
            Tier::Rare => &self.rares,
            Tier::Special => &self.specials,
        }
    }

    /// Identities of the static (pre-generated) portion of a tier
    ///
    /// Gating completeness is judged against these: generated items extend
    /// a tier but never hold its gate open.
    pub fn static_tier_ids(&self, tier: Tier) -> Vec<ItemId> {
        let source: &Vec<Item> = match tier {
            Tier::Common => &COMMON_CATALOG,
            Tier::Rare => &RARE_CATALOG,
            Tier::Special => &SPECIAL_CATALOG,
        };
        source.iter().map(|item| item.id).collect()
    }

    /// Look up an item by identity
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.commons
            .iter()
            .chain(self.rares.iter())
            .chain(self.specials.iter())
            .find(|item| item.id == id)
    }

    /// Absorb a generated batch, recording each item's creation view
    pub fn absorb_batch(&mut self, batch: &GeneratedBatch, at_view: u64) {
        for item in &batch.items {
            if self.generated_at.contains_key(&item.id) || self.item(item.id).is_some() {
                continue;
            }
            self.generated_at.insert(item.id, at_view);
            match item.tier {
                Tier::Common => self.commons.push(item.clone()),
                Tier::Rare => self.rares.push(item.clone()),
                Tier::Special => self.specials.push(item.clone()),
            }
        }
    }

    /// Does any generated special exist yet?
    pub fn has_generated_specials(&self) -> bool {
        self.specials.iter().any(|item| item.id.is_generated())
    }

    /// Is this item inside its post-generation boost window?
    pub fn is_boosted(&self, id: ItemId, current_view: u64) -> bool {
        self.generated_at
            .get(&id)
            .map(|created| current_view.saturating_sub(*created) < BOOST_WINDOW_VIEWS)
            .unwrap_or(false)
    }

    /// Total item count across tiers
    pub fn len(&self) -> usize {
        self.commons.len() + self.rares.len() + self.specials.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
