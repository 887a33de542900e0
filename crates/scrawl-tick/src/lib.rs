//! Phase countdown timer for Scrawl rooms.
//!
//! Each room has exactly one [`RoundTimer`]. Arming it for a phase replaces
//! whatever countdown was running, so a stale deadline can never fire into
//! a phase the room has already left.
//!
//! # Integration
//!
//! The timer is designed to sit inside a room actor's `tokio::select!` loop,
//! which makes every tick just another serialized operation on the room:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         event = timer.wait_for_tick() => {
//!             if event.expired {
//!                 machine.on_timer_expired(event.phase);
//!             } else {
//!                 machine.on_timer_tick(event.phase, event.remaining);
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! When nothing is armed, [`RoundTimer::wait_for_tick`] pends forever and
//! `select!` simply keeps serving the other branches.

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// What a countdown is counting down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPhase {
    /// The drawer has this long to pick a word before one is picked for them.
    WordSelection,
    /// The drawing window; expiry ends the round.
    Drawing,
    /// Pause after the word is revealed.
    RoundEndPause,
    /// Pause on the final leaderboard before the room returns to the lobby.
    GameOverPause,
}

impl TimerPhase {
    /// Whether clients see this countdown as `timer_update` messages.
    ///
    /// The two pauses are server-side only.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::WordSelection | Self::Drawing)
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WordSelection => "word_selection",
            Self::Drawing => "drawing",
            Self::RoundEndPause => "round_end_pause",
            Self::GameOverPause => "game_over_pause",
        })
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timer configuration.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Length of one countdown step. Default: one second.
    pub tick_interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl TimerConfig {
    /// Shortest accepted interval.
    pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`RoundTimer::new`].
    pub fn validated(mut self) -> Self {
        if self.tick_interval < Self::MIN_TICK_INTERVAL {
            warn!(
                interval_ms = self.tick_interval.as_millis() as u64,
                "tick_interval below minimum, clamping"
            );
            self.tick_interval = Self::MIN_TICK_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One countdown step, returned by [`RoundTimer::wait_for_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    /// The phase the countdown was armed for.
    pub phase: TimerPhase,
    /// Steps left after this one. `0` on the final event.
    pub remaining: u32,
    /// `true` on the final event; the timer is idle afterwards.
    pub expired: bool,
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Countdown {
    phase: TimerPhase,
    remaining: u32,
    next_deadline: Instant,
}

/// A single, re-armable countdown.
///
/// Deadlines advance by exactly one interval from the previous deadline,
/// not from the moment the actor got around to polling, so a busy room
/// does not drift. A wake-up later than a tenth of an interval is logged as
/// an overrun.
#[derive(Debug)]
pub struct RoundTimer {
    config: TimerConfig,
    active: Option<Countdown>,
    ticks_fired: u64,
    overruns: u64,
}

impl RoundTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config: config.validated(),
            active: None,
            ticks_fired: 0,
            overruns: 0,
        }
    }

    /// Starts a countdown of `steps` intervals for `phase`, replacing any
    /// countdown already running.
    ///
    /// Arming with `0` steps expires on the next poll.
    pub fn arm(&mut self, phase: TimerPhase, steps: u32) {
        if let Some(prev) = self.active {
            debug!(
                previous = %prev.phase,
                remaining = prev.remaining,
                "replacing running countdown"
            );
        }
        let now = Instant::now();
        let next_deadline = if steps == 0 {
            now
        } else {
            now + self.config.tick_interval
        };
        self.active = Some(Countdown {
            phase,
            remaining: steps,
            next_deadline,
        });
        debug!(%phase, steps, "countdown armed");
    }

    /// Stops the running countdown, if any.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.active.take() {
            debug!(phase = %prev.phase, remaining = prev.remaining, "countdown cancelled");
        }
    }

    /// Waits for the next countdown step.
    ///
    /// Pends forever while idle. Cancel-safe: dropping the future before it
    /// resolves leaves the countdown untouched.
    pub async fn wait_for_tick(&mut self) -> TimerEvent {
        let Some(countdown) = self.active else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(countdown.next_deadline).await;

        let now = Instant::now();
        let interval = self.config.tick_interval;
        let late_by = now.saturating_duration_since(countdown.next_deadline);
        if late_by > interval / 10 {
            self.overruns += 1;
            warn!(
                phase = %countdown.phase,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "countdown tick overrun"
            );
        }

        let remaining = countdown.remaining.saturating_sub(1);
        let expired = remaining == 0;
        self.ticks_fired += 1;
        self.active = if expired {
            None
        } else {
            Some(Countdown {
                phase: countdown.phase,
                remaining,
                next_deadline: countdown.next_deadline + interval,
            })
        };

        trace!(phase = %countdown.phase, remaining, expired, "countdown tick");

        TimerEvent {
            phase: countdown.phase,
            remaining,
            expired,
        }
    }

    /// The phase currently counting down, if any.
    pub fn phase(&self) -> Option<TimerPhase> {
        self.active.map(|c| c.phase)
    }

    /// Steps left in the running countdown, if any.
    pub fn remaining(&self) -> Option<u32> {
        self.active.map(|c| c.remaining)
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Total countdown steps delivered since creation.
    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// Total late wake-ups since creation.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
