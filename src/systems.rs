use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    ActivePair, BlockKind, Board, Cell, ChainState, FallingPair, GameMode, GameState, PieceRng,
    Phase, draw_pair_cells,
};
use crate::events::{EventQueue, GameEvent};
use crate::game::{
    FULL_HAND_JELLY_CUTOFF, FULL_HAND_STAR_CUTOFF, HAND_BRICK_CUTOFF, HAND_JELLY_CUTOFF,
    HAND_ROW_CHANCE, HAND_STAR_CUTOFF,
};
use crate::matcher;
use crate::rng::LcgRng;

/// Advance the simulation by exactly one unit of work, dispatched on the
/// current phase. Every mutation of the game world happens inside a tick or
/// inside one of the player-action functions below; both run on the same
/// logical thread, so each call is atomic.
pub fn tick(world: &mut World) {
    if world.resource::<GameState>().game_over {
        return;
    }
    world.resource_mut::<GameState>().scored_stars = 0;

    let phase = *world.resource::<Phase>();
    match phase {
        Phase::Falling => falling_tick(world),
        Phase::Gravity => gravity_tick(world),
        Phase::Matching { chain } => matching_tick(world, chain),
        Phase::Clearing { chain } => clearing_tick(world, chain),
    }
}

/// Spawn the previewed pair at the spawn columns. A blocked spawn ends the
/// game; the preview is only consumed on success.
pub fn spawn_pair(world: &mut World) {
    let next = world.resource::<GameState>().next;
    let pair = FallingPair::spawn(next);

    if !world.resource::<Board>().can_place(&pair.positions()) {
        info!("spawn columns blocked, game over");
        world.resource_mut::<GameState>().game_over = true;
        return;
    }

    let new_next = {
        let mut piece_rng = world.resource_mut::<PieceRng>();
        draw_pair_cells(&mut piece_rng.rng)
    };
    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.next = new_next;
        game_state.can_hold = true;
    }
    world.resource_mut::<ActivePair>().0 = Some(pair);
    debug!("spawned pair {:?}", next);
}

fn falling_tick(world: &mut World) {
    let active = world.resource::<ActivePair>().0;
    let Some(pair) = active else {
        spawn_pair(world);
        return;
    };

    if world.resource::<Board>().can_move(&pair, 0, 1) {
        trace!("pair fell to y {}", pair.y + 1);
        world.resource_mut::<ActivePair>().0 = Some(pair.offset(0, 1));
    } else {
        lock_pair(world, &pair);
    }
}

fn lock_pair(world: &mut World, pair: &FallingPair) {
    world.resource_mut::<Board>().lock_pair(pair);

    let positions = pair
        .positions()
        .iter()
        .map(|p| (p.x as usize, p.y as usize))
        .collect();
    world
        .resource_mut::<EventQueue>()
        .0
        .push(GameEvent::Lock { positions });

    world.resource_mut::<ActivePair>().0 = None;
    *world.resource_mut::<Phase>() = Phase::Gravity;
    debug!("locked pair at ({}, {})", pair.x, pair.y);
}

fn gravity_tick(world: &mut World) {
    let step = world.resource_mut::<Board>().gravity_step();
    if step.moved {
        let chain = world.resource::<ChainState>().chain_count;
        world
            .resource_mut::<EventQueue>()
            .0
            .push(GameEvent::GravityFall {
                falls: step.falls,
                chain,
            });
    } else {
        let next_chain = world.resource::<ChainState>().chain_count + 1;
        *world.resource_mut::<Phase>() = Phase::Matching { chain: next_chain };
    }
}

fn matching_tick(world: &mut World, chain: u32) {
    let board = world.resource::<Board>().clone();
    let outcome = matcher::detect_matches(&board);

    if outcome.has_work() {
        let stars = outcome.scored_stars(&board);
        let pending = matcher::apply_outcome(&board, &outcome);
        debug!(
            "chain {chain}: {} cells clearing, {} bricks cracking, {stars} stars",
            outcome.clear_set.len(),
            outcome.bricks_to_crack.len()
        );

        {
            let mut chain_state = world.resource_mut::<ChainState>();
            chain_state.total_stars += stars;
            chain_state.chain_count = chain;
            chain_state.pending = Some(pending);
        }
        {
            let mut events = world.resource_mut::<EventQueue>();
            events.0.push(GameEvent::Clear {
                positions: outcome.cleared_positions(),
                cells: outcome.cleared_cells(&board),
                chain,
            });
            if !outcome.bomb_rows.is_empty() {
                events.0.push(GameEvent::Bomb {
                    rows: outcome.bomb_rows.iter().copied().collect(),
                    cells: outcome.bombed_cells(&board),
                    chain,
                });
            }
        }
        *world.resource_mut::<Phase>() = Phase::Clearing { chain };
        return;
    }

    // Nothing left to clear: the resolution sequence is over. Publish the
    // accumulated score, reset the chain bookkeeping and hand the grid back
    // to the player.
    let (total_stars, chain_count) = {
        let chain_state = world.resource::<ChainState>();
        (chain_state.total_stars, chain_state.chain_count)
    };
    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.scored_stars = total_stars;
        game_state.chains = chain_count;
        game_state.score += total_stars;
    }
    world.resource_mut::<ChainState>().reset();
    *world.resource_mut::<Phase>() = Phase::Falling;

    if chain_count > 0 {
        info!("resolved {chain_count} chain(s) for {total_stars} stars");
        return;
    }

    // Chain-free resolutions in endless mode may raise a hand row.
    if world.resource::<GameState>().mode == GameMode::Endless {
        let roll = world.resource_mut::<PieceRng>().rng.next_f64();
        if roll < HAND_ROW_CHANCE {
            raise_hand_row(world);
        }
    }
}

fn clearing_tick(world: &mut World, chain: u32) {
    // The stashed post-clear grid becomes visible only now, after the
    // renderer has had its animation window.
    let pending = world.resource_mut::<ChainState>().pending.take();
    if let Some(cells) = pending {
        world.resource_mut::<Board>().cells = cells;
    }

    let bonus = matcher::bonus_star_count(chain);
    if bonus > 0 {
        debug!("chain {chain} drops {bonus} bonus stars");
        let mut board = world.resource_mut::<Board>();
        matcher::drop_bonus_stars(&mut board, bonus);
    }

    *world.resource_mut::<Phase>() = Phase::Gravity;
}

/// Shift the pair horizontally or down by one. Illegal moves are ignored.
pub fn move_active(world: &mut World, dx: i32, dy: i32) {
    if world.resource::<GameState>().game_over {
        return;
    }
    let active = world.resource::<ActivePair>().0;
    let Some(pair) = active else {
        return;
    };
    let moved = world.resource::<Board>().try_move(&pair, dx, dy);
    world.resource_mut::<ActivePair>().0 = Some(moved);
}

/// Rotate the pair clockwise by one step. Illegal rotations are ignored.
pub fn rotate_active(world: &mut World) {
    if world.resource::<GameState>().game_over {
        return;
    }
    let active = world.resource::<ActivePair>().0;
    let Some(pair) = active else {
        return;
    };
    let rotated = world.resource::<Board>().try_rotate(&pair);
    world.resource_mut::<ActivePair>().0 = Some(rotated);
}

/// Swap the active pair with the held one, or store it and bring in the
/// preview. Usable once per spawn; a swap whose incoming pair would not fit
/// at the spawn position is rejected silently.
pub fn hold_swap(world: &mut World) {
    {
        let game_state = world.resource::<GameState>();
        if game_state.game_over || !game_state.can_hold {
            return;
        }
    }
    let active = world.resource::<ActivePair>().0;
    let Some(pair) = active else {
        return;
    };

    let held = world.resource::<GameState>().hold;
    if let Some(held_cells) = held {
        let incoming = FallingPair::spawn(held_cells);
        if !world.resource::<Board>().can_place(&incoming.positions()) {
            return;
        }
        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.hold = Some(pair.cells);
            game_state.can_hold = false;
        }
        world.resource_mut::<ActivePair>().0 = Some(incoming);
        debug!("hold swap: {:?} in, {:?} out", held_cells, pair.cells);
    } else {
        let next = world.resource::<GameState>().next;
        let incoming = FallingPair::spawn(next);
        if !world.resource::<Board>().can_place(&incoming.positions()) {
            return;
        }
        let new_next = {
            let mut piece_rng = world.resource_mut::<PieceRng>();
            draw_pair_cells(&mut piece_rng.rng)
        };
        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.hold = Some(pair.cells);
            game_state.next = new_next;
            game_state.can_hold = false;
        }
        world.resource_mut::<ActivePair>().0 = Some(incoming);
        debug!("hold store: {:?}", pair.cells);
    }
}

/// Drop the pair to its maximum legal depth, then run one ordinary tick so
/// the usual lock path takes over. No separate resolution code path.
pub fn hard_drop(world: &mut World) {
    if world.resource::<GameState>().game_over {
        return;
    }
    let active = world.resource::<ActivePair>().0;
    let Some(mut pair) = active else {
        return;
    };

    let start_y = pair.y;
    {
        let board = world.resource::<Board>();
        while board.can_move(&pair, 0, 1) {
            pair = pair.offset(0, 1);
        }
    }

    if pair.y > start_y {
        let mut trail = Vec::new();
        for y in start_y..=pair.y {
            let at = FallingPair { y, ..pair };
            for p in at.positions() {
                trail.push((p.x as usize, p.y as usize));
            }
        }
        debug!("hard drop from y {start_y} to y {}", pair.y);
        world
            .resource_mut::<EventQueue>()
            .0
            .push(GameEvent::HardDropTrail { positions: trail });
    }

    world.resource_mut::<ActivePair>().0 = Some(pair);
    tick(world);
}

fn single_hand_row(rng: &mut LcgRng, width: usize) -> Vec<Option<Cell>> {
    (0..width)
        .map(|_| {
            let r = rng.next_f64();
            if r < HAND_STAR_CUTOFF {
                Some(Cell::new(BlockKind::Star))
            } else if r < HAND_JELLY_CUTOFF {
                Some(Cell::new(BlockKind::draw_jelly(rng)))
            } else if r < HAND_BRICK_CUTOFF {
                Some(Cell::new(BlockKind::Brick))
            } else {
                None
            }
        })
        .collect()
}

fn full_hand_row(rng: &mut LcgRng, width: usize) -> Vec<Option<Cell>> {
    (0..width)
        .map(|_| {
            let r = rng.next_f64();
            if r < FULL_HAND_STAR_CUTOFF {
                Some(Cell::new(BlockKind::Star))
            } else if r < FULL_HAND_JELLY_CUTOFF {
                Some(Cell::new(BlockKind::draw_jelly(rng)))
            } else {
                Some(Cell::new(BlockKind::Brick))
            }
        })
        .collect()
}

/// Shift the grid up and inject rows at the bottom, top row of `rows` first.
/// A non-empty cell pushed into row 0 ends the game; otherwise the active
/// pair is nudged upward if the shifted stack overlaps it.
fn raise_rows(world: &mut World, rows: &[Vec<Option<Cell>>]) {
    let overflow = {
        let mut board = world.resource_mut::<Board>();
        let (width, height) = (board.width, board.height);
        let k = rows.len();
        for x in 0..width {
            for y in 0..height - k {
                board.cells[x][y] = board.cells[x][y + k];
            }
            for (i, row) in rows.iter().enumerate() {
                board.cells[x][height - k + i] = row[x];
            }
        }
        (0..width).any(|x| board.cells[x][0].is_some())
    };

    if overflow {
        info!("hand row pushed the stack past the top, game over");
        world.resource_mut::<GameState>().game_over = true;
        return;
    }

    let active = world.resource::<ActivePair>().0;
    let Some(pair) = active else {
        return;
    };
    let board = world.resource::<Board>().clone();
    if board.can_place(&pair.positions()) {
        return;
    }
    for dy in 1..=2 {
        let lifted = pair.offset(0, -dy);
        if board.can_place(&lifted.positions()) {
            world.resource_mut::<ActivePair>().0 = Some(lifted);
            return;
        }
    }
    info!("stack reached the falling pair, game over");
    world.resource_mut::<GameState>().game_over = true;
}

/// Single procedurally generated row from the bottom (endless mode).
pub fn raise_hand_row(world: &mut World) {
    if world.resource::<GameState>().game_over {
        return;
    }
    info!("raising a hand row");
    let width = world.resource::<Board>().width;
    let row = {
        let mut piece_rng = world.resource_mut::<PieceRng>();
        single_hand_row(&mut piece_rng.rng, width)
    };
    raise_rows(world, &[row]);
}

/// Challenge-mode raise: a full brick row plus a dense random row.
pub fn raise_full_hand_rows(world: &mut World) {
    if world.resource::<GameState>().game_over {
        return;
    }
    info!("raising challenge hand rows");
    let width = world.resource::<Board>().width;
    let bottom = {
        let mut piece_rng = world.resource_mut::<PieceRng>();
        full_hand_row(&mut piece_rng.rng, width)
    };
    let brick_row: Vec<Option<Cell>> = (0..width)
        .map(|_| Some(Cell::new(BlockKind::Brick)))
        .collect();
    raise_rows(world, &[brick_row, bottom]);
}
