//! Content generator: deterministic, thematically coherent item batches
//!
//! One PRNG stream per seed. The batch-level anchors (hue, saturation
//! center, brightness center, hue spread) are drawn first and shared by
//! every item, which is what gives a batch its coherent mood. Draw order
//! is fixed; same seed ⇒ bit-identical items on every platform.

use chrono::Utc;

use crate::core::catalog::{NAME_ADJECTIVES, NAME_NOUNS};
use crate::core::SeededRng;
use crate::types::{BatchRecord, GeneratedBatch, Item, ItemId, ItemStyle, PatternFamily, Tier};
use crate::{
    BATCH_COMMON, BATCH_RARE, BATCH_SPECIAL, BRIGHTNESS_CENTER_MAX, BRIGHTNESS_CENTER_MIN,
    BRIGHTNESS_JITTER, HUE_SPREAD_MAX, HUE_SPREAD_MIN, SATURATION_CENTER_MAX,
    SATURATION_CENTER_MIN, SATURATION_JITTER,
};

/// Batch-wide style anchors
struct BatchMood {
    hue: f64,
    saturation: f64,
    brightness: f64,
    spread: f64,
}

/// Derive the item list for a seed
///
/// Pure: the durable `BatchRecord` holds only the seed, and this function
/// reconstructs the same items from it every time.
pub fn derive_items(seed: u64) -> Vec<Item> {
    let mut rng = SeededRng::new(seed);

    let mood = BatchMood {
        hue: rng.next_f64(),
        saturation: rng.range_f64(SATURATION_CENTER_MIN, SATURATION_CENTER_MAX),
        brightness: rng.range_f64(BRIGHTNESS_CENTER_MIN, BRIGHTNESS_CENTER_MAX),
        spread: rng.range_f64(HUE_SPREAD_MIN, HUE_SPREAD_MAX),
    };

    let mut items = Vec::with_capacity(BATCH_COMMON + BATCH_RARE + BATCH_SPECIAL);
    let mut index = 0u64;

    for _ in 0..BATCH_COMMON {
        items.push(next_item(seed, &mut index, &mut rng, &mood, Tier::Common));
    }
    for _ in 0..BATCH_RARE {
        items.push(next_item(seed, &mut index, &mut rng, &mood, Tier::Rare));
    }
    for _ in 0..BATCH_SPECIAL {
        items.push(next_item(seed, &mut index, &mut rng, &mood, Tier::Special));
    }

    items
}

/// Generate a full batch for a triggering unlock, stamped now
pub fn generate_batch(seed: u64, trigger: ItemId) -> GeneratedBatch {
    GeneratedBatch {
        seed,
        trigger,
        created_at: Utc::now(),
        items: derive_items(seed),
    }
}

/// Reconstruct a batch from its durable record
pub fn rederive(record: &BatchRecord) -> GeneratedBatch {
    GeneratedBatch {
        seed: record.seed,
        trigger: record.trigger,
        created_at: record.created_at,
        items: derive_items(record.seed),
    }
}

fn next_item(
    seed: u64,
    index: &mut u64,
    rng: &mut SeededRng,
    mood: &BatchMood,
    tier: Tier,
) -> Item {
    // Adjective space first, then noun space
    let adjective = *rng.pick(NAME_ADJECTIVES);
    let noun = *rng.pick(NAME_NOUNS);

    let hue_offset = rng.range_f64(-mood.spread, mood.spread);
    let sat_jitter = rng.range_f64(-SATURATION_JITTER, SATURATION_JITTER);
    let bri_jitter = rng.range_f64(-BRIGHTNESS_JITTER, BRIGHTNESS_JITTER);

    let pattern = if tier == Tier::Special {
        *rng.pick(&PatternFamily::SPECIAL_FAMILIES)
    } else {
        PatternFamily::Solid
    };

    let style = ItemStyle {
        hue: (mood.hue + hue_offset).rem_euclid(1.0),
        saturation: (mood.saturation + sat_jitter).clamp(0.0, 1.0),
        brightness: (mood.brightness + bri_jitter).clamp(0.0, 1.0),
        pattern,
    };

    let item = Item::new(
        ItemId::generated(seed, *index),
        format!("{} {}", adjective, noun),
        tier,
        style,
    );
    *index += 1;
    item
}

// =============================================================================
// TESTS
// =============================================================================
