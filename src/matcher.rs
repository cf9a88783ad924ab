#![warn(clippy::all, clippy::pedantic)]

//! Match detection and resolution.
//!
//! Two passes over a grid snapshot: a 4-connected cluster pass over jelly
//! cells, then a "sandwich" pass that scans straight runs of special cells
//! bounded by same-kind jellies. Sandwiched specials classify as: star →
//! cleared, bomb → its whole row cleared, brick → cracked on the first hit
//! and eliminated once already cracked. Scans run in fixed row-major /
//! column-major order and all sets are ordered, so identical input always
//! produces identical output.

use std::collections::BTreeSet;

use crate::components::{BlockKind, Board, Cell};
use crate::events::CellInfo;
use crate::game::BONUS_STAR_COLUMNS;

/// Everything one resolution step decided, as ordered position sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub clear_set: BTreeSet<(usize, usize)>,
    pub bomb_rows: BTreeSet<usize>,
    pub bricks_to_crack: BTreeSet<(usize, usize)>,
    pub bricks_to_eliminate: BTreeSet<(usize, usize)>,
}

impl MatchOutcome {
    /// True when this step clears, cracks or eliminates anything.
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.clear_set.is_empty()
            || !self.bricks_to_crack.is_empty()
            || !self.bricks_to_eliminate.is_empty()
    }

    /// Points for this step: one per cleared star, one per eliminated brick.
    #[must_use]
    pub fn scored_stars(&self, board: &Board) -> u32 {
        let mut stars = 0;
        for &(x, y) in &self.clear_set {
            if let Some(cell) = board.cells[x][y] {
                if cell.kind == BlockKind::Star {
                    stars += 1;
                }
            }
        }
        stars + u32::try_from(self.bricks_to_eliminate.len()).unwrap_or(u32::MAX)
    }

    /// All positions removed by this step, ordered.
    #[must_use]
    pub fn cleared_positions(&self) -> Vec<(usize, usize)> {
        let mut positions: BTreeSet<(usize, usize)> = self.clear_set.clone();
        positions.extend(self.bricks_to_eliminate.iter().copied());
        positions.into_iter().collect()
    }

    /// Pre-clear cell info for every removed cell, for animation.
    #[must_use]
    pub fn cleared_cells(&self, board: &Board) -> Vec<CellInfo> {
        self.cleared_positions()
            .into_iter()
            .filter_map(|(x, y)| {
                board.cells[x][y].map(|cell| CellInfo {
                    x,
                    y,
                    kind: cell.kind,
                    cracked: cell.cracked,
                })
            })
            .collect()
    }

    /// Pre-clear cell info for every occupied cell in a bombed row.
    #[must_use]
    pub fn bombed_cells(&self, board: &Board) -> Vec<CellInfo> {
        let mut cells = Vec::new();
        for &row in &self.bomb_rows {
            for x in 0..board.width {
                if let Some(cell) = board.cells[x][row] {
                    cells.push(CellInfo {
                        x,
                        y: row,
                        kind: cell.kind,
                        cracked: cell.cracked,
                    });
                }
            }
        }
        cells
    }
}

/// One sandwiched special cell, pending classification.
struct SandwichedSpecial {
    x: usize,
    y: usize,
    kind: BlockKind,
    cracked: bool,
}

fn classify_specials(specials: &[SandwichedSpecial], outcome: &mut MatchOutcome) {
    for special in specials {
        match special.kind {
            BlockKind::Bomb => {
                outcome.bomb_rows.insert(special.y);
            }
            BlockKind::Brick => {
                if special.cracked {
                    outcome.bricks_to_eliminate.insert((special.x, special.y));
                } else {
                    outcome.bricks_to_crack.insert((special.x, special.y));
                }
            }
            BlockKind::Star => {
                outcome.clear_set.insert((special.x, special.y));
            }
            _ => {}
        }
    }
}

/// Run both detection passes over a grid snapshot.
#[must_use]
pub fn detect_matches(board: &Board) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    // Cluster pass: flood fill over identical jelly kinds, 4-connected.
    // Any cluster of two or more clears.
    let mut visited = vec![vec![false; board.height]; board.width];
    for y in 0..board.height {
        for x in 0..board.width {
            let Some(cell) = board.cells[x][y] else {
                continue;
            };
            if !cell.kind.is_jelly() || visited[x][y] {
                continue;
            }

            let mut cluster = Vec::new();
            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                if visited[cx][cy] {
                    continue;
                }
                match board.cells[cx][cy] {
                    Some(c) if c.kind == cell.kind => {}
                    _ => continue,
                }
                visited[cx][cy] = true;
                cluster.push((cx, cy));

                if cx + 1 < board.width {
                    stack.push((cx + 1, cy));
                }
                if cx > 0 {
                    stack.push((cx - 1, cy));
                }
                if cy + 1 < board.height {
                    stack.push((cx, cy + 1));
                }
                if cy > 0 {
                    stack.push((cx, cy - 1));
                }
            }

            if cluster.len() >= 2 {
                outcome.clear_set.extend(cluster);
            }
        }
    }

    // Sandwich pass, horizontal: from every jelly, scan right through
    // consecutive specials and require a same-kind jelly at the far end.
    for y in 0..board.height {
        for x in 0..board.width.saturating_sub(1) {
            let Some(left) = board.cells[x][y] else {
                continue;
            };
            if !left.kind.is_jelly() {
                continue;
            }

            let mut specials = Vec::new();
            let mut scan_x = x + 1;
            while scan_x < board.width {
                match board.cells[scan_x][y] {
                    Some(cell) if cell.kind.is_special() => {
                        specials.push(SandwichedSpecial {
                            x: scan_x,
                            y,
                            kind: cell.kind,
                            cracked: cell.cracked,
                        });
                        scan_x += 1;
                    }
                    _ => break,
                }
            }

            if specials.is_empty() || scan_x >= board.width {
                continue;
            }
            match board.cells[scan_x][y] {
                Some(right) if right.kind == left.kind => {
                    outcome.clear_set.insert((x, y));
                    outcome.clear_set.insert((scan_x, y));
                    classify_specials(&specials, &mut outcome);
                }
                _ => {}
            }
        }
    }

    // Sandwich pass, vertical: same scan, downward.
    for x in 0..board.width {
        for y in 0..board.height.saturating_sub(1) {
            let Some(top) = board.cells[x][y] else {
                continue;
            };
            if !top.kind.is_jelly() {
                continue;
            }

            let mut specials = Vec::new();
            let mut scan_y = y + 1;
            while scan_y < board.height {
                match board.cells[x][scan_y] {
                    Some(cell) if cell.kind.is_special() => {
                        specials.push(SandwichedSpecial {
                            x,
                            y: scan_y,
                            kind: cell.kind,
                            cracked: cell.cracked,
                        });
                        scan_y += 1;
                    }
                    _ => break,
                }
            }

            if specials.is_empty() || scan_y >= board.height {
                continue;
            }
            match board.cells[x][scan_y] {
                Some(bottom) if bottom.kind == top.kind => {
                    outcome.clear_set.insert((x, y));
                    outcome.clear_set.insert((x, scan_y));
                    classify_specials(&specials, &mut outcome);
                }
                _ => {}
            }
        }
    }

    // A triggered bomb pulls its entire row into the clear set, occupied or
    // not; this can cascade the row into the same resolution step.
    let bomb_rows: Vec<usize> = outcome.bomb_rows.iter().copied().collect();
    for row in bomb_rows {
        for x in 0..board.width {
            outcome.clear_set.insert((x, row));
        }
    }

    outcome
}

/// Build the post-clear grid for an outcome without touching the live board:
/// crack the first-hit bricks in place, then remove everything cleared or
/// eliminated.
#[must_use]
pub fn apply_outcome(board: &Board, outcome: &MatchOutcome) -> Vec<Vec<Option<Cell>>> {
    let mut cells = board.cells.clone();
    for &(x, y) in &outcome.bricks_to_crack {
        if cells[x][y].is_some() {
            cells[x][y] = Some(Cell::cracked_brick());
        }
    }
    for (x, y) in outcome.cleared_positions() {
        cells[x][y] = None;
    }
    cells
}

/// The `count` columns with the shortest contiguous fill from the bottom,
/// ties broken by lower column index.
#[must_use]
pub fn least_filled_columns(board: &Board, count: usize) -> Vec<usize> {
    let mut heights: Vec<(usize, usize)> = (0..board.width)
        .map(|x| (board.column_fill(x), x))
        .collect();
    heights.sort_unstable();
    heights.into_iter().take(count).map(|(_, x)| x).collect()
}

/// Bonus stars awarded for finishing a chain of the given depth.
#[must_use]
pub fn bonus_star_count(chain: u32) -> u32 {
    match chain {
        0 | 1 => 0,
        2 => 2,
        3 => 4,
        4 => 5,
        5 => 6,
        _ => 12,
    }
}

/// Drop `count` bonus stars into the two least-filled columns, split evenly
/// with the remainder going to the first. Stars land on the lowest empty
/// slot of each column; gravity settles them on the following phase.
pub fn drop_bonus_stars(board: &mut Board, count: u32) {
    if count == 0 {
        return;
    }

    let columns = least_filled_columns(board, BONUS_STAR_COLUMNS);
    let per_column = count / 2;
    let remainder = count % 2;

    for (idx, &x) in columns.iter().enumerate() {
        let stars = per_column + if idx == 0 { remainder } else { 0 };
        for _ in 0..stars {
            for y in (0..board.height).rev() {
                if board.cells[x][y].is_none() {
                    board.cells[x][y] = Some(Cell::new(BlockKind::Star));
                    break;
                }
            }
        }
    }
}
