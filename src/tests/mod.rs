#![warn(clippy::all, clippy::pedantic)]

pub mod components_tests;
pub mod config_loader_tests;
pub mod rng_tests;

// Import test utilities
#[cfg(test)]
pub mod test_utils {
    use bevy_ecs::prelude::*;

    use crate::app::App;
    use crate::components::{BlockKind, Board, Cell, GameMode, Phase};

    // Helper function to create a fully initialized test world
    #[must_use]
    pub fn create_test_world(seed: u32) -> World {
        App::new(seed, GameMode::Endless).world
    }

    // Helper to place a single block on the board
    pub fn place(board: &mut Board, x: usize, y: usize, kind: BlockKind) {
        board.cells[x][y] = Some(Cell::new(kind));
    }

    // Helper to place an already-cracked brick
    pub fn place_cracked(board: &mut Board, x: usize, y: usize) {
        board.cells[x][y] = Some(Cell::cracked_brick());
    }

    // Run ticks until the engine is back in the falling phase, with a cap so
    // a broken state machine fails the test instead of hanging it
    pub fn tick_until_falling(world: &mut World, max_ticks: usize) -> usize {
        for i in 0..max_ticks {
            if *world.resource::<Phase>() == Phase::Falling {
                return i;
            }
            crate::systems::tick(world);
        }
        panic!("engine did not return to the falling phase in {max_ticks} ticks");
    }
}
