//! Item model: identity, tier, and the opaque visual style payload

use serde::{Deserialize, Serialize};

/// Content rarity class, ordered Common < Rare < Special
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Baseline catalog content
    Common,
    /// Gated behind full common exposure
    Rare,
    /// Gated behind full rare exposure
    Special,
}

impl Tier {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Tier::Common => "\x1b[37m",  // White
            Tier::Rare => "\x1b[36m",    // Cyan
            Tier::Special => "\x1b[35m", // Magenta
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Common => "COMMON",
            Tier::Rare => "RARE",
            Tier::Special => "SPECIAL",
        };
        write!(f, "{}", name)
    }
}

/// Stable 64-bit item identity, usable as a map key
///
/// Catalog items carry a tier tag in the top byte; generated items set the
/// top bit so the two namespaces can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Identity for a static catalog entry
    pub fn catalog(tier: Tier, index: u64) -> Self {
        let tag: u64 = match tier {
            Tier::Common => 0x01,
            Tier::Rare => 0x02,
            Tier::Special => 0x03,
        };
        ItemId((tag << 56) | index)
    }

    /// Identity for a procedurally generated item, derived from its batch
    /// seed and position so re-derivation yields the same id
    pub fn generated(seed: u64, index: u64) -> Self {
        let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        ItemId(z | 0x8000_0000_0000_0000)
    }

    /// Was this id minted by the generator?
    pub fn is_generated(&self) -> bool {
        self.0 & 0x8000_0000_0000_0000 != 0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Pattern families available to special items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternFamily {
    Solid,
    Striped,
    Dotted,
    Iconographic,
    GlyphTiled,
}

impl PatternFamily {
    /// Families the generator may assign to a special item
    pub const SPECIAL_FAMILIES: [PatternFamily; 4] = [
        PatternFamily::Striped,
        PatternFamily::Dotted,
        PatternFamily::Iconographic,
        PatternFamily::GlyphTiled,
    ];
}

impl std::fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternFamily::Solid => "solid",
            PatternFamily::Striped => "striped",
            PatternFamily::Dotted => "dotted",
            PatternFamily::Iconographic => "iconographic",
            PatternFamily::GlyphTiled => "glyph-tiled",
        };
        write!(f, "{}", name)
    }
}

/// Visual style descriptor
///
/// Opaque to the engine: produced by the generator, handed through to the
/// presentation layer, never interpreted on the event path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Hue as a fraction of the full circle, [0, 1)
    pub hue: f64,
    /// Saturation, [0, 1]
    pub saturation: f64,
    /// Brightness, [0, 1]
    pub brightness: f64,
    /// Surface pattern
    pub pattern: PatternFamily,
}

impl ItemStyle {
    /// Flat style with the given HSB components
    pub fn solid(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue,
            saturation,
            brightness,
            pattern: PatternFamily::Solid,
        }
    }

    /// Convert to 8-bit RGB (presentation helper, HSB → RGB)
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = (self.hue.rem_euclid(1.0)) * 6.0;
        let s = self.saturation.clamp(0.0, 1.0);
        let v = self.brightness.clamp(0.0, 1.0);
        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match i as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        (
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

/// An immutable content item
///
/// Created once, statically cataloged or procedurally generated, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Rarity class
    pub tier: Tier,
    /// Opaque visual payload
    pub style: ItemStyle,
}

impl Item {
    /// Create a new item
    pub fn new(id: ItemId, name: impl Into<String>, tier: Tier, style: ItemStyle) -> Self {
        Self {
            id,
            name: name.into(),
            tier,
            style,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Common < Tier::Rare);
        assert!(Tier::Rare < Tier::Special);
    }

    #[test]
    fn test_catalog_ids_distinct_across_tiers() {
        let a = ItemId::catalog(Tier::Common, 3);
        let b = ItemId::catalog(Tier::Rare, 3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_id_deterministic() {
        let a = ItemId::generated(0xDEAD_BEEF, 4);
        let b = ItemId::generated(0xDEAD_BEEF, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_id_namespace_disjoint_from_catalog() {
        let gen = ItemId::generated(42, 0);
        assert!(gen.is_generated());
        assert!(!ItemId::catalog(Tier::Special, 0).is_generated());
    }

    #[test]
    fn test_style_to_rgb_extremes() {
        let white = ItemStyle::solid(0.0, 0.0, 1.0);
        assert_eq!(white.to_rgb(), (255, 255, 255));

        let black = ItemStyle::solid(0.5, 1.0, 0.0);
        assert_eq!(black.to_rgb(), (0, 0, 0));

        let red = ItemStyle::solid(0.0, 1.0, 1.0);
        assert_eq!(red.to_rgb(), (255, 0, 0));
    }
}
