#![warn(clippy::all, clippy::pedantic)]

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info};

use fallingpairs::Time;
use fallingpairs::app::App;
use fallingpairs::config::{CONFIG, Config};
use fallingpairs::scheduler::{ClearingToken, Scheduler};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("starting fallingpairs");

    if Config::force_reload() {
        info!("configuration loaded");
    } else {
        error!("failed to load configuration, continuing with defaults");
    }

    let (mode, config_seed, tick_ms) = {
        let config = CONFIG.read().unwrap();
        (config.game.mode, config.game.seed, config.game.tick_ms)
    };

    // An explicit seed in the environment wins over the config file
    let env_seed = match std::env::var("FALLINGPAIRS_SEED") {
        Ok(value) => Some(
            value
                .parse::<u32>()
                .context("FALLINGPAIRS_SEED must be a u32")?,
        ),
        Err(_) => None,
    };

    let mut app = match env_seed.or(config_seed) {
        Some(seed) => App::new(seed, mode),
        None => App::from_entropy(mode),
    };
    info!("session seed {} ({mode:?})", app.seed());

    let mut scheduler = Scheduler::with_tick_interval(mode, Duration::from_millis(tick_ms));
    let ack_tx = scheduler.ack_sender();

    // Stand-in renderer: hold each clear on screen for a fixed beat, then
    // acknowledge over the channel so the scheduler resumes.
    let clear_hold = Duration::from_millis(300);
    let mut clearing_since: Option<(ClearingToken, Instant)> = None;

    let mut time = Time::new();
    loop {
        thread::sleep(Duration::from_millis(16));
        time.update();

        // Aimless inputs so the demo exercises the whole control surface
        if fastrand::f32() < 0.08 {
            match fastrand::u8(0..6) {
                0 => app.move_left(),
                1 => app.move_right(),
                2 => app.soft_drop(),
                3 => app.rotate(),
                4 => app.hold_swap(),
                _ => app.hard_drop(),
            }
        }

        scheduler.advance(&mut app, time.delta());

        for event in app.drain_events() {
            info!("event: {event:?}");
        }

        match (scheduler.pending_token(), clearing_since) {
            (Some(token), Some((held, since))) if held == token => {
                if since.elapsed() >= clear_hold {
                    let _ = ack_tx.send(token);
                    clearing_since = None;
                }
            }
            (Some(token), _) => clearing_since = Some((token, Instant::now())),
            (None, _) => clearing_since = None,
        }

        if app.game_over() {
            let snapshot = app.snapshot();
            info!(
                "game over: final score {}, seed {}",
                snapshot.score, snapshot.seed
            );
            break;
        }
    }

    Ok(())
}
