//! Sparse destructible brick grid
//!
//! Cells are keyed by integer grid coordinate; absence means destroyed or
//! never populated. Broad-phase queries scan only the 3x3 neighborhood of the
//! query center, so lookup cost is independent of how many tiles remain.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use rand::Rng;

use super::collision::Rect;
use super::status::{GamePhase, GameStatus, InvalidTransitionError};
use super::tile::{Tile, TileColor, TileVariant};

/// Scan order for the broad-phase neighborhood. Fixed: it is the tie-break
/// order when several cells overlap the query rect.
const NEIGHBOR_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 0),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

/// Result of a tile hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Indestructible sentinel (or empty cell): no score, nothing removed.
    /// The ball still bounces.
    Inert,
    /// Tile replaced with its next weaker color.
    Downgraded { color: TileColor, scored: u64 },
    /// Tile removed from the grid.
    Destroyed {
        color: TileColor,
        scored: u64,
        /// True when this removal emptied the grid of destructible tiles;
        /// the `LevelCleared` transition has already been requested.
        level_cleared: bool,
    },
}

/// The destructible brick layout for one level.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_size: Vec2,
    tiles: HashMap<IVec2, Tile>,
    /// Present keys in insertion order. Not gameplay-significant, but keeps
    /// iteration deterministic for rendering and tests.
    order: Vec<IVec2>,
}

impl TileGrid {
    pub fn new(cols: u32, rows: u32, tile_size: Vec2) -> Self {
        Self {
            cols,
            rows,
            tile_size,
            tiles: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.order.clear();
    }

    /// Place a tile. The coordinate must be inside the grid dimensions.
    pub fn insert(&mut self, pos: IVec2, tile: Tile) {
        assert!(
            pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.cols && (pos.y as u32) < self.rows,
            "tile coordinate {pos} outside {}x{} grid",
            self.cols,
            self.rows
        );
        if self.tiles.insert(pos, tile).is_none() {
            self.order.push(pos);
        }
    }

    pub fn get(&self, pos: IVec2) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Discard the current layout and populate each cell independently with
    /// the configured probability, colors drawn uniformly from the
    /// destructible ranks. Intentionally irregular per session.
    pub fn generate_random(&mut self, fill_probability: f32, rng: &mut impl Rng) {
        self.clear();
        for x in 0..self.cols as i32 {
            for y in 0..self.rows as i32 {
                if rng.random::<f32>() >= fill_probability {
                    continue;
                }
                let color = TileColor::RANK[rng.random_range(0..TileColor::RANK.len())];
                let variant = if rng.random_bool(0.2) {
                    TileVariant::Glossy
                } else {
                    TileVariant::Normal
                };
                self.insert(IVec2::new(x, y), Tile::new(color, variant));
            }
        }
        log::debug!(
            "generated {} tiles over {}x{} grid",
            self.order.len(),
            self.cols,
            self.rows
        );
    }

    /// Pixel rectangle of a grid cell.
    pub fn cell_rect(&self, pos: IVec2) -> Rect {
        Rect::new(
            Vec2::new(pos.x as f32 * self.tile_size.x, pos.y as f32 * self.tile_size.y),
            self.tile_size,
        )
    }

    /// Present tiles whose cell rectangle intersects `rect`, scanning only
    /// the 3x3 neighborhood of the cell containing the rect's center.
    /// Returned in the fixed neighborhood scan order.
    pub fn tiles_overlapping(&self, rect: &Rect) -> Vec<IVec2> {
        let center = rect.center();
        let cell = IVec2::new(
            (center.x / self.tile_size.x).floor() as i32,
            (center.y / self.tile_size.y).floor() as i32,
        );

        let mut hits = Vec::new();
        for offset in NEIGHBOR_OFFSETS {
            let pos = cell + offset;
            if self.tiles.contains_key(&pos) && self.cell_rect(pos).intersects(rect) {
                hits.push(pos);
            }
        }
        hits
    }

    /// Resolve a hit on the tile at `pos`.
    ///
    /// Destructible tiles award their current color's score, then downgrade
    /// to the next weaker color or leave the grid. Removing the last
    /// destructible tile requests the `LevelCleared` transition, exactly
    /// once. Sentinel tiles absorb the hit with no effect.
    pub fn trigger_hit(
        &mut self,
        pos: IVec2,
        status: &mut GameStatus,
    ) -> Result<HitOutcome, InvalidTransitionError> {
        let Some(tile) = self.tiles.get(&pos).copied() else {
            return Ok(HitOutcome::Inert);
        };
        if !tile.is_destructible() {
            return Ok(HitOutcome::Inert);
        }

        let scored = tile.color.score();
        status.add_score(scored);

        if let Some(next) = tile.downgraded() {
            self.tiles.insert(pos, next);
            return Ok(HitOutcome::Downgraded {
                color: tile.color,
                scored,
            });
        }

        self.tiles.remove(&pos);
        self.order.retain(|&p| p != pos);

        let level_cleared = self.remaining_destructible() == 0;
        if level_cleared {
            status.request_transition(GamePhase::LevelCleared)?;
        }

        Ok(HitOutcome::Destroyed {
            color: tile.color,
            scored,
            level_cleared,
        })
    }

    /// Count of tiles that still need to be destroyed to clear the level.
    pub fn remaining_destructible(&self) -> usize {
        self.tiles.values().filter(|t| t.is_destructible()).count()
    }

    /// Present tiles in insertion order.
    pub fn tile_list(&self) -> impl Iterator<Item = (IVec2, &Tile)> {
        self.order.iter().map(|&pos| (pos, &self.tiles[&pos]))
    }
}
