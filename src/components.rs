#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since grid dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow precision loss when converting rolls to jelly indices since the grid of outcomes is tiny
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::Fall;
use crate::game::{
    BOMB_CUTOFF, BRICK_CUTOFF, GRID_COLS, GRID_ROWS, SPAWN_COL, STAR_CUTOFF,
};
use crate::rng::LcgRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BlockKind {
    GreenJelly,
    RedJelly,
    BlueJelly,
    Star,
    Bomb,
    Brick,
}

impl BlockKind {
    /// The three jelly kinds match by identity; everything else is special.
    #[must_use]
    pub fn is_jelly(self) -> bool {
        matches!(
            self,
            BlockKind::GreenJelly | BlockKind::RedJelly | BlockKind::BlueJelly
        )
    }

    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, BlockKind::Star | BlockKind::Bomb | BlockKind::Brick)
    }

    /// Uniform draw over the three jelly kinds. Consumes one roll.
    pub fn draw_jelly(rng: &mut LcgRng) -> Self {
        match (rng.next_f64() * 3.0) as usize {
            0 => BlockKind::GreenJelly,
            1 => BlockKind::RedJelly,
            _ => BlockKind::BlueJelly,
        }
    }

    /// Full generation table: one roll decides special-or-not, and a miss
    /// falls through to a second roll for the jelly kind. The draw order is
    /// part of the replay contract.
    pub fn draw(rng: &mut LcgRng) -> Self {
        let r = rng.next_f64();
        if r < BOMB_CUTOFF {
            BlockKind::Bomb
        } else if r < BRICK_CUTOFF {
            BlockKind::Brick
        } else if r < STAR_CUTOFF {
            BlockKind::Star
        } else {
            Self::draw_jelly(rng)
        }
    }
}

/// Draw both cells of a pair, independently.
pub fn draw_pair_cells(rng: &mut LcgRng) -> [BlockKind; 2] {
    let a = BlockKind::draw(rng);
    let b = BlockKind::draw(rng);
    [a, b]
}

/// One occupied grid slot. `cracked` is only meaningful for bricks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub kind: BlockKind,
    pub cracked: bool,
}

impl Cell {
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            cracked: false,
        }
    }

    #[must_use]
    pub fn cracked_brick() -> Self {
        Self {
            kind: BlockKind::Brick,
            cracked: true,
        }
    }
}

/// Position of one half of a falling pair; `index` selects the cell from
/// `FallingPair::cells`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCell {
    pub x: i32,
    pub y: i32,
    pub index: usize,
}

/// The active falling piece: two cells, a pivot, and a rotation state.
///
/// The pivot (cell 0) stays fixed; the partner cycles clockwise around it:
/// rotation 0 puts it to the right, 1 below, 2 to the left, 3 above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPair {
    pub cells: [BlockKind; 2],
    pub x: i32,
    pub y: i32,
    pub rotation: u8,
}

impl FallingPair {
    /// A freshly spawned pair sits at the spawn columns in rotation 0.
    #[must_use]
    pub fn spawn(cells: [BlockKind; 2]) -> Self {
        Self {
            cells,
            x: SPAWN_COL,
            y: 0,
            rotation: 0,
        }
    }

    #[must_use]
    pub fn positions(&self) -> [PairCell; 2] {
        let pivot = PairCell {
            x: self.x,
            y: self.y,
            index: 0,
        };
        let (dx, dy) = match self.rotation {
            0 => (1, 0),
            1 => (0, 1),
            2 => (-1, 0),
            _ => (0, -1),
        };
        let partner = PairCell {
            x: self.x + dx,
            y: self.y + dy,
            index: 1,
        };
        [pivot, partner]
    }

    #[must_use]
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}

/// Result of one single-row gravity pass.
#[derive(Debug, Clone, Default)]
pub struct GravityStep {
    pub moved: bool,
    pub falls: Vec<Fall>,
}

/// The play grid. Cells are indexed `[x][y]` with y growing downward.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Option<Cell>>>,
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![None; height]; width],
        }
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Every position in-bounds and empty.
    #[must_use]
    pub fn can_place(&self, positions: &[PairCell]) -> bool {
        positions
            .iter()
            .all(|p| self.in_bounds(p.x, p.y) && self.cells[p.x as usize][p.y as usize].is_none())
    }

    #[must_use]
    pub fn can_move(&self, pair: &FallingPair, dx: i32, dy: i32) -> bool {
        self.can_place(&pair.offset(dx, dy).positions())
    }

    /// Move the pair if the destination is valid; an illegal move returns the
    /// pair unchanged rather than an error.
    #[must_use]
    pub fn try_move(&self, pair: &FallingPair, dx: i32, dy: i32) -> FallingPair {
        if self.can_move(pair, dx, dy) {
            pair.offset(dx, dy)
        } else {
            *pair
        }
    }

    /// Advance the rotation by one step if the single candidate placement is
    /// valid. No wall-kick search.
    #[must_use]
    pub fn try_rotate(&self, pair: &FallingPair) -> FallingPair {
        let candidate = pair.rotated();
        if self.can_place(&candidate.positions()) {
            candidate
        } else {
            *pair
        }
    }

    /// Where the pair would land if dropped straight down.
    #[must_use]
    pub fn ghost_positions(&self, pair: &FallingPair) -> [PairCell; 2] {
        let mut ghost = *pair;
        while self.can_move(&ghost, 0, 1) {
            ghost = ghost.offset(0, 1);
        }
        ghost.positions()
    }

    /// Write both pair cells into the grid at their current positions.
    pub fn lock_pair(&mut self, pair: &FallingPair) {
        for p in pair.positions() {
            if self.in_bounds(p.x, p.y) {
                self.cells[p.x as usize][p.y as usize] = Some(Cell::new(pair.cells[p.index]));
            }
        }
    }

    /// One settling pass: every cell with an empty slot directly below moves
    /// down exactly one row. Columns are scanned bottom-to-top so a floating
    /// stack shifts as a unit. Repeated calls settle the grid incrementally,
    /// which is what lets the scheduler animate gravity.
    pub fn gravity_step(&mut self) -> GravityStep {
        let mut step = GravityStep::default();
        for x in 0..self.width {
            for y in (0..self.height - 1).rev() {
                if self.cells[x][y].is_some() && self.cells[x][y + 1].is_none() {
                    self.cells[x][y + 1] = self.cells[x][y].take();
                    step.falls.push(Fall {
                        x,
                        from_y: y,
                        to_y: y + 1,
                    });
                    step.moved = true;
                }
            }
        }
        step
    }

    /// Contiguous occupied run from the bottom of column `x`.
    #[must_use]
    pub fn column_fill(&self, x: usize) -> usize {
        let mut height = 0;
        for y in (0..self.height).rev() {
            if self.cells[x][y].is_some() {
                height += 1;
            } else {
                break;
            }
        }
        height
    }

    /// Copy of the grid with the falling pair written in, for display.
    #[must_use]
    pub fn overlay_pair(&self, pair: Option<&FallingPair>) -> Vec<Vec<Option<Cell>>> {
        let mut cells = self.cells.clone();
        if let Some(pair) = pair {
            for p in pair.positions() {
                if self.in_bounds(p.x, p.y) {
                    cells[p.x as usize][p.y as usize] = Some(Cell::new(pair.cells[p.index]));
                }
            }
        }
        cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GRID_COLS, GRID_ROWS)
    }
}

/// The pair currently in flight, if any.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActivePair(pub Option<FallingPair>);

/// Session RNG plus the seed it was created from.
#[derive(Resource, Debug, Clone)]
pub struct PieceRng {
    pub seed: u32,
    pub rng: LcgRng,
}

impl PieceRng {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: LcgRng::new(seed),
        }
    }
}

/// What the next tick will do. Exactly one phase is active at a time.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Gravity,
    Matching { chain: u32 },
    Clearing { chain: u32 },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Falling
    }
}

/// Bookkeeping for one resolution sequence (lock through final settle).
///
/// `pending` holds the post-clear grid built during `Matching` and applied
/// during `Clearing`; keeping it as a separate buffer means the pre-clear
/// grid the renderer is animating is never aliased with the cleared one.
#[derive(Resource, Debug, Clone, Default)]
pub struct ChainState {
    pub total_stars: u32,
    pub chain_count: u32,
    pub pending: Option<Vec<Vec<Option<Cell>>>>,
}

impl ChainState {
    pub fn reset(&mut self) {
        self.total_stars = 0;
        self.chain_count = 0;
        self.pending = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Endless,
    Challenge,
    TimeAttack,
}

/// Session-level game state.
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    /// Cumulative score.
    pub score: u32,
    /// Stars scored by the resolution that completed this tick, zero otherwise.
    pub scored_stars: u32,
    /// Chain count of the most recently completed resolution.
    pub chains: u32,
    pub next: [BlockKind; 2],
    pub hold: Option<[BlockKind; 2]>,
    pub can_hold: bool,
    pub game_over: bool,
    pub mode: GameMode,
}

impl GameState {
    #[must_use]
    pub fn new(next: [BlockKind; 2], mode: GameMode) -> Self {
        Self {
            score: 0,
            scored_stars: 0,
            chains: 0,
            next,
            hold: None,
            can_hold: true,
            game_over: false,
            mode,
        }
    }
}
