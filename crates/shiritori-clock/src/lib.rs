//! Per-turn countdown for Shiritori.
//!
//! Every turn gets its own [`TurnClock`]: a small Tokio task that ticks
//! once per `tick_interval`, reports the seconds left, and raises
//! [`ClockSignal::Expired`] exactly once when the count reaches zero.
//!
//! # Ownership
//!
//! The engine owns the live clock and is the only one that starts or
//! cancels it. Starting the next turn always cancels the previous clock
//! first, so two countdowns never run side by side.
//!
//! # Epoch tagging
//!
//! Each clock is armed for one [`TurnEpoch`] and stamps every signal with
//! it. A signal already sitting in the channel when its clock is cancelled
//! still carries the old epoch, which is how the receiver tells it apart
//! from the live turn:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         Some(signal) = clock_rx.recv() => {
//!             if signal.epoch() != game.epoch() {
//!                 continue; // stale
//!             }
//!             /* handle tick or expiry */
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use shiritori_protocol::TurnEpoch;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a turn clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// Length of one turn in whole seconds.
    pub turn_seconds: u32,
    /// Time between two ticks. One second unless a test wants it faster.
    pub tick_interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 15,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl ClockConfig {
    /// Longest turn the clock accepts.
    pub const MAX_TURN_SECONDS: u32 = 300;

    /// Config for a turn of `turn_seconds` with one-second ticks.
    pub fn with_seconds(turn_seconds: u32) -> Self {
        Self {
            turn_seconds,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TurnClock::start`]. Rules:
    /// - `turn_seconds` clamped to `1..=MAX_TURN_SECONDS`.
    /// - a zero `tick_interval` becomes one second.
    pub fn validated(mut self) -> Self {
        let clamped = self.turn_seconds.clamp(1, Self::MAX_TURN_SECONDS);
        if clamped != self.turn_seconds {
            warn!(
                turn_seconds = self.turn_seconds,
                clamped, "turn_seconds out of range, clamping"
            );
            self.turn_seconds = clamped;
        }
        if self.tick_interval.is_zero() {
            warn!("tick_interval is zero, using one second");
            self.tick_interval = Duration::from_secs(1);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// What a running clock reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    /// One tick elapsed; `seconds_left` is always at least 1.
    Tick {
        epoch: TurnEpoch,
        seconds_left: u32,
    },
    /// The countdown reached zero. Sent once, after which the clock stops.
    Expired { epoch: TurnEpoch },
}

impl ClockSignal {
    /// The turn this signal belongs to.
    pub fn epoch(&self) -> TurnEpoch {
        match self {
            Self::Tick { epoch, .. } | Self::Expired { epoch } => *epoch,
        }
    }
}

// ---------------------------------------------------------------------------
// Countdown (pure state machine)
// ---------------------------------------------------------------------------

/// Lifecycle of a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Running,
    Expired,
}

/// Result of a single [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Remaining(u32),
    Expired,
}

/// The counting part of a turn clock, free of any timer.
///
/// Never decrements below zero and reports expiry exactly once; every
/// tick after expiry is ignored.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    state: CountdownState,
}

impl Countdown {
    /// A running countdown starting at `seconds`.
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            state: CountdownState::Running,
        }
    }

    /// Advance by one tick. Returns `None` once the countdown has stopped.
    pub fn tick(&mut self) -> Option<CountdownStep> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            Some(CountdownStep::Expired)
        } else {
            Some(CountdownStep::Remaining(self.remaining))
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }
}

// ---------------------------------------------------------------------------
// TurnClock
// ---------------------------------------------------------------------------

/// Handle to the countdown task for one turn.
///
/// Dropping the handle cancels the clock.
pub struct TurnClock {
    epoch: TurnEpoch,
    task: JoinHandle<()>,
    cancelled: bool,
}

impl TurnClock {
    /// Arm a fresh countdown for `epoch` and start ticking.
    ///
    /// Signals are delivered on `signals`. The clock stops on its own
    /// after [`ClockSignal::Expired`] or when the receiver is dropped.
    pub fn start(
        config: ClockConfig,
        epoch: TurnEpoch,
        signals: mpsc::UnboundedSender<ClockSignal>,
    ) -> Self {
        let config = config.validated();

        debug!(
            %epoch,
            turn_seconds = config.turn_seconds,
            "turn clock started"
        );

        let task = tokio::spawn(run_countdown(
            epoch,
            config.turn_seconds,
            config.tick_interval,
            signals,
        ));

        Self {
            epoch,
            task,
            cancelled: false,
        }
    }

    /// Stop ticking immediately. Idempotent; cancelling a clock that
    /// already expired or was already cancelled does nothing.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if !self.task.is_finished() {
            self.task.abort();
            debug!(epoch = %self.epoch, "turn clock cancelled");
        }
    }

    /// The epoch this clock was armed for.
    pub fn epoch(&self) -> TurnEpoch {
        self.epoch
    }
}

impl Drop for TurnClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_countdown(
    epoch: TurnEpoch,
    turn_seconds: u32,
    interval: Duration,
    signals: mpsc::UnboundedSender<ClockSignal>,
) {
    let mut countdown = Countdown::new(turn_seconds);
    let mut next = Instant::now() + interval;

    loop {
        time::sleep_until(next).await;

        let late_by = Instant::now().saturating_duration_since(next);
        if late_by > interval / 10 {
            warn!(
                %epoch,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "turn clock tick fired late"
            );
        }
        // Keep the fixed cadence so a late wake-up doesn't stretch the turn.
        next += interval;

        let signal = match countdown.tick() {
            Some(CountdownStep::Remaining(seconds_left)) => {
                trace!(%epoch, seconds_left, "turn clock tick");
                ClockSignal::Tick {
                    epoch,
                    seconds_left,
                }
            }
            Some(CountdownStep::Expired) => {
                debug!(%epoch, "turn clock expired");
                ClockSignal::Expired { epoch }
            }
            None => break,
        };

        if signals.send(signal).is_err() {
            debug!(
                %epoch,
                seconds_left = countdown.remaining(),
                "clock receiver gone, stopping"
            );
            break;
        }
        if countdown.state() == CountdownState::Expired {
            break;
        }
    }
}
