//! The engine's outward-facing event stream.
//!
//! Every tick appends zero or more events to the [`EventQueue`]; the consumer
//! drains the queue once per tick and animates from it. The enum is closed —
//! one variant per event kind, each carrying only the fields it needs — so a
//! renderer never has to shape-check payloads at runtime.

use bevy_ecs::prelude::*;

use crate::components::BlockKind;

/// A cell captured before it is cleared, with enough information to animate
/// its removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    pub x: usize,
    pub y: usize,
    pub kind: BlockKind,
    pub cracked: bool,
}

/// One cell shifting down a single row during a gravity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub x: usize,
    pub from_y: usize,
    pub to_y: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The falling pair locked into the grid.
    Lock { positions: Vec<(usize, usize)> },
    /// Cells about to disappear; the grid returned alongside this event is
    /// still the pre-clear grid so the renderer can flash them.
    Clear {
        positions: Vec<(usize, usize)>,
        cells: Vec<CellInfo>,
        chain: u32,
    },
    /// A sandwiched bomb pulled these whole rows into the clear.
    Bomb {
        rows: Vec<usize>,
        cells: Vec<CellInfo>,
        chain: u32,
    },
    /// One settling pass moved these cells.
    GravityFall { falls: Vec<Fall>, chain: u32 },
    /// Cells swept by a hard drop, for trail effects.
    HardDropTrail { positions: Vec<(usize, usize)> },
}

/// Ordered event buffer for the current tick, drained by the consumer.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventQueue(pub Vec<GameEvent>);
