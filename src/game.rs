#![warn(clippy::all, clippy::pedantic)]

// Grid dimensions; row 0 is the top (spawn row)
pub const GRID_COLS: usize = 8;
pub const GRID_ROWS: usize = 12;

// The pair spawns with its pivot in this column and the partner one to the
// right (rotation 0), i.e. in columns 2 and 3
pub const SPAWN_COL: i32 = 2;

// Simulation timing
pub const TICK_INTERVAL_MS: u64 = 450;

// Piece generation, cumulative cutoffs on a single [0,1) roll.
// A miss falls through to a second roll that picks one of the three jellies.
pub const BOMB_CUTOFF: f64 = 0.03;
pub const BRICK_CUTOFF: f64 = 0.06;
pub const STAR_CUTOFF: f64 = 0.16;

// Chance that a resolution with no chain raises a single hand row (endless mode)
pub const HAND_ROW_CHANCE: f64 = 0.10;

// Single hand row content, cumulative cutoffs; the remainder stays empty
pub const HAND_STAR_CUTOFF: f64 = 0.15;
pub const HAND_JELLY_CUTOFF: f64 = 0.45;
pub const HAND_BRICK_CUTOFF: f64 = 0.50;

// Challenge-mode hand row content, cumulative cutoffs; no empty cells
pub const FULL_HAND_STAR_CUTOFF: f64 = 0.30;
pub const FULL_HAND_JELLY_CUTOFF: f64 = 0.90;

// Challenge-mode raise cadence: starts slow, accelerates down to a floor
pub const HAND_INTERVAL_START_MS: u64 = 10_000;
pub const HAND_INTERVAL_STEP_MS: u64 = 500;
pub const HAND_INTERVAL_MIN_MS: u64 = 3_000;

// Time attack session length
pub const TIME_ATTACK_SECS: u64 = 180;

// Bonus stars always land in this many of the least-filled columns
pub const BONUS_STAR_COLUMNS: usize = 2;

// Scoring: cleared stars and eliminated cracked bricks are worth one point
// each, jellies are worth nothing
pub const STAR_POINTS: u32 = 1;
