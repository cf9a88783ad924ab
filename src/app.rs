#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;

use crate::components::{
    ActivePair, BlockKind, Board, Cell, ChainState, GameMode, GameState, PieceRng, Phase,
    draw_pair_cells,
};
use crate::events::{EventQueue, GameEvent};
use crate::systems;

/// Everything a renderer needs from one tick, copied out of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Grid with the falling pair overlaid, indexed `[x][y]`.
    pub grid: Vec<Vec<Option<Cell>>>,
    /// Landing positions of the active pair, empty when none is falling.
    pub ghost: Vec<(i32, i32)>,
    pub next: [BlockKind; 2],
    pub hold: Option<[BlockKind; 2]>,
    pub can_hold: bool,
    pub phase: Phase,
    pub score: u32,
    /// Stars scored by a resolution that completed this tick.
    pub scored_stars: u32,
    pub chains: u32,
    pub game_over: bool,
    pub seed: u32,
}

/// One game session: owns the world, exposes the player-facing control
/// surface, and hands out state snapshots and the event stream.
///
/// All methods must be called from the thread that drives the scheduler;
/// each one is a complete read-modify-write, so ticks and player actions
/// never interleave.
pub struct App {
    pub world: World,
}

impl App {
    #[must_use]
    pub fn new(seed: u32, mode: GameMode) -> Self {
        let mut world = World::new();

        let mut piece_rng = PieceRng::new(seed);
        let next = draw_pair_cells(&mut piece_rng.rng);

        world.insert_resource(Board::default());
        world.insert_resource(ActivePair::default());
        world.insert_resource(ChainState::default());
        world.insert_resource(EventQueue::default());
        world.insert_resource(Phase::default());
        world.insert_resource(GameState::new(next, mode));
        world.insert_resource(piece_rng);

        Self { world }
    }

    /// New session with a seed drawn from process entropy.
    #[must_use]
    pub fn from_entropy(mode: GameMode) -> Self {
        Self::new(fastrand::u32(..), mode)
    }

    /// Discard the session and start over. `None` draws a fresh seed;
    /// passing the old seed replays the identical piece sequence.
    pub fn restart(&mut self, seed: Option<u32>) {
        let mode = self.world.resource::<GameState>().mode;
        let seed = seed.unwrap_or_else(|| fastrand::u32(..));
        *self = Self::new(seed, mode);
    }

    /// Advance the simulation one step. Normally driven by the scheduler.
    pub fn tick(&mut self) {
        systems::tick(&mut self.world);
    }

    pub fn move_left(&mut self) {
        systems::move_active(&mut self.world, -1, 0);
    }

    pub fn move_right(&mut self) {
        systems::move_active(&mut self.world, 1, 0);
    }

    pub fn soft_drop(&mut self) {
        systems::move_active(&mut self.world, 0, 1);
    }

    pub fn rotate(&mut self) {
        systems::rotate_active(&mut self.world);
    }

    pub fn hold_swap(&mut self) {
        systems::hold_swap(&mut self.world);
    }

    pub fn hard_drop(&mut self) {
        systems::hard_drop(&mut self.world);
    }

    /// Take every event emitted since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.resource_mut::<EventQueue>().0)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let board = self.world.resource::<Board>();
        let active = self.world.resource::<ActivePair>().0;
        let game_state = self.world.resource::<GameState>();
        let chain_state = self.world.resource::<ChainState>();

        let ghost = active.map_or_else(Vec::new, |pair| {
            board
                .ghost_positions(&pair)
                .iter()
                .map(|p| (p.x, p.y))
                .collect()
        });

        Snapshot {
            grid: board.overlay_pair(active.as_ref()),
            ghost,
            next: game_state.next,
            hold: game_state.hold,
            can_hold: game_state.can_hold,
            phase: *self.world.resource::<Phase>(),
            score: game_state.score,
            scored_stars: game_state.scored_stars,
            chains: if chain_state.chain_count > 0 {
                chain_state.chain_count
            } else {
                game_state.chains
            },
            game_over: game_state.game_over,
            seed: self.world.resource::<PieceRng>().seed,
        }
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.world.resource::<GameState>().game_over
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        *self.world.resource::<Phase>()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.world.resource::<GameState>().score
    }

    #[must_use]
    pub fn seed(&self) -> u32 {
        self.world.resource::<PieceRng>().seed
    }
}
