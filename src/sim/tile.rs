//! Brick tiles: colors, strength/score tables, and downgrade order
//!
//! Color order is a gameplay invariant: a hit replaces a tile with the next
//! weaker color, so `RANK` is the single source of truth for "weaker".

/// Tile colors, weakest destructible first. `Grey` is the indestructible
/// sentinel and takes no part in the downgrade chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Green,
    Blue,
    Yellow,
    Purple,
    Red,
    Grey,
}

impl TileColor {
    /// Destructible colors ordered weakest to strongest.
    pub const RANK: [TileColor; 5] = [
        TileColor::Green,
        TileColor::Blue,
        TileColor::Yellow,
        TileColor::Purple,
        TileColor::Red,
    ];

    /// Hits remaining for a fresh tile of this color. The sentinel is
    /// negative: inert, never removed.
    pub fn strength(self) -> i8 {
        match self {
            TileColor::Green => 1,
            TileColor::Blue => 2,
            TileColor::Yellow => 3,
            TileColor::Purple => 4,
            TileColor::Red => 5,
            TileColor::Grey => -1,
        }
    }

    /// Points awarded when a tile of this color takes a hit.
    pub fn score(self) -> u64 {
        match self {
            TileColor::Green => 20,
            TileColor::Blue => 23,
            TileColor::Yellow => 29,
            TileColor::Purple => 38,
            TileColor::Red => 50,
            TileColor::Grey => 0,
        }
    }

    /// Next weaker color in `RANK`, or `None` when no weaker color exists
    /// (the tile is removed instead of downgraded).
    pub fn weaker(self) -> Option<TileColor> {
        let index = Self::RANK.iter().position(|&c| c == self)?;
        index.checked_sub(1).map(|i| Self::RANK[i])
    }
}

/// Cosmetic skin, no gameplay effect. Survives downgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileVariant {
    #[default]
    Normal,
    Glossy,
}

/// A single brick in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub color: TileColor,
    pub variant: TileVariant,
    /// Hits remaining; negative means indestructible.
    pub strength: i8,
}

impl Tile {
    pub fn new(color: TileColor, variant: TileVariant) -> Self {
        Self {
            color,
            variant,
            strength: color.strength(),
        }
    }

    pub fn is_destructible(&self) -> bool {
        self.strength > 0
    }

    /// Replacement after a hit: the next weaker color with the same variant,
    /// or `None` when the tile leaves the grid.
    pub fn downgraded(&self) -> Option<Tile> {
        self.color.weaker().map(|c| Tile::new(c, self.variant))
    }
}
