//! Fixed-step tick scheduling and the clearing-phase handshake.
//!
//! The scheduler owns no timing source of its own: the embedding layer calls
//! [`Scheduler::advance`] with elapsed wall-clock time (typically once per
//! frame) and the scheduler converts that into discrete engine ticks. When a
//! tick enters the `Clearing` phase the scheduler freezes and issues a
//! [`ClearingToken`]; the renderer presents the clear animation and then
//! acknowledges the token — directly or over the channel returned by
//! [`Scheduler::ack_sender`] — which resumes ticking with one immediate tick
//! out of `Clearing`. Stale or duplicate tokens are ignored, so a second
//! clear can never start animating before the first was acknowledged.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, info};

use crate::app::App;
use crate::components::{GameMode, GameState, Phase};
use crate::game::{
    HAND_INTERVAL_MIN_MS, HAND_INTERVAL_START_MS, HAND_INTERVAL_STEP_MS, TICK_INTERVAL_MS,
    TIME_ATTACK_SECS,
};
use crate::systems;

/// Monotonically increasing identifier for one clearing freeze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClearingToken(pub u64);

pub struct Scheduler {
    tick_interval: Duration,
    accumulator: Duration,
    awaiting: Option<ClearingToken>,
    issued: u64,
    ack_tx: Sender<ClearingToken>,
    ack_rx: Receiver<ClearingToken>,
    mode: GameMode,
    hand_timer: Duration,
    hand_interval: Duration,
    hand_pending: bool,
    time_left: Option<Duration>,
}

impl Scheduler {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self::with_tick_interval(mode, Duration::from_millis(TICK_INTERVAL_MS))
    }

    #[must_use]
    pub fn with_tick_interval(mode: GameMode, tick_interval: Duration) -> Self {
        let (ack_tx, ack_rx) = bounded(16);
        Self {
            tick_interval,
            accumulator: Duration::ZERO,
            awaiting: None,
            issued: 0,
            ack_tx,
            ack_rx,
            mode,
            hand_timer: Duration::ZERO,
            hand_interval: Duration::from_millis(HAND_INTERVAL_START_MS),
            hand_pending: false,
            time_left: (mode == GameMode::TimeAttack)
                .then(|| Duration::from_secs(TIME_ATTACK_SECS)),
        }
    }

    /// Feed elapsed wall-clock time and run as many ticks as the fixed step
    /// allows. The accumulator is clamped to one interval, so a long pause
    /// is discarded instead of fast-forwarded.
    pub fn advance(&mut self, app: &mut App, elapsed: Duration) {
        self.drain_acks(app);
        if app.game_over() {
            return;
        }

        if self.awaiting.is_some() {
            // Frozen for the clear animation; drop the backlog so resuming
            // does not replay it.
            self.accumulator = Duration::ZERO;
            return;
        }

        self.update_timers(app, elapsed);
        if app.game_over() {
            return;
        }
        self.try_hand_raise(app);

        self.accumulator = (self.accumulator + elapsed).min(self.tick_interval);
        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            self.run_tick(app);
            if self.awaiting.is_some() || app.game_over() {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
    }

    /// Acknowledge the outstanding clearing token. On a match the freeze
    /// lifts and one tick runs immediately, leaving `Clearing`; anything
    /// else is a stale or duplicate ack and is ignored.
    pub fn acknowledge(&mut self, app: &mut App, token: ClearingToken) -> bool {
        match self.awaiting {
            Some(expected) if expected == token => {
                debug!("clearing {token:?} acknowledged, resuming");
                self.awaiting = None;
                self.run_tick(app);
                true
            }
            _ => {
                debug!("ignoring stale clearing ack {token:?}");
                false
            }
        }
    }

    /// Sender half of the acknowledgment channel, for a renderer running
    /// somewhere the scheduler is not directly reachable from.
    #[must_use]
    pub fn ack_sender(&self) -> Sender<ClearingToken> {
        self.ack_tx.clone()
    }

    /// The token the scheduler is currently frozen on, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<ClearingToken> {
        self.awaiting
    }

    /// Remaining session time in time-attack mode.
    #[must_use]
    pub fn time_left(&self) -> Option<Duration> {
        self.time_left
    }

    /// Current challenge-mode raise interval.
    #[must_use]
    pub fn hand_interval(&self) -> Duration {
        self.hand_interval
    }

    /// Clear accumulated time, freeze state and timers for a fresh session.
    /// The token counter is not reset, so acks from a previous session stay
    /// stale forever.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.awaiting = None;
        self.hand_timer = Duration::ZERO;
        self.hand_interval = Duration::from_millis(HAND_INTERVAL_START_MS);
        self.hand_pending = false;
        self.time_left =
            (self.mode == GameMode::TimeAttack).then(|| Duration::from_secs(TIME_ATTACK_SECS));
    }

    fn drain_acks(&mut self, app: &mut App) {
        while let Ok(token) = self.ack_rx.try_recv() {
            self.acknowledge(app, token);
        }
    }

    fn update_timers(&mut self, app: &mut App, elapsed: Duration) {
        match self.mode {
            GameMode::TimeAttack => {
                if let Some(left) = self.time_left {
                    let left = left.saturating_sub(elapsed);
                    self.time_left = Some(left);
                    if left.is_zero() {
                        info!("time attack expired");
                        app.world.resource_mut::<GameState>().game_over = true;
                    }
                }
            }
            GameMode::Challenge => {
                self.hand_timer += elapsed;
                if self.hand_timer >= self.hand_interval {
                    self.hand_timer = Duration::ZERO;
                    self.hand_pending = true;
                    // Raises come faster over time, down to a floor.
                    let next_ms = (self.hand_interval.as_millis() as u64)
                        .saturating_sub(HAND_INTERVAL_STEP_MS)
                        .max(HAND_INTERVAL_MIN_MS);
                    self.hand_interval = Duration::from_millis(next_ms);
                }
            }
            GameMode::Endless => {}
        }
    }

    /// A pending challenge raise waits for the engine to be back in
    /// `Falling`: raising mid-resolution would invalidate the stashed
    /// post-clear grid.
    fn try_hand_raise(&mut self, app: &mut App) {
        if self.hand_pending && app.phase() == Phase::Falling {
            self.hand_pending = false;
            systems::raise_full_hand_rows(&mut app.world);
        }
    }

    fn run_tick(&mut self, app: &mut App) {
        let before = app.phase();
        systems::tick(&mut app.world);
        let after = app.phase();

        if matches!(after, Phase::Clearing { .. }) && !matches!(before, Phase::Clearing { .. }) {
            self.issued += 1;
            let token = ClearingToken(self.issued);
            self.awaiting = Some(token);
            debug!("entered clearing, issued {token:?}");
        }
    }
}
