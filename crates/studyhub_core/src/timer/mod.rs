//! Pomodoro timer state machine.
//!
//! # Responsibility
//! - Own mode, remaining countdown and running state for the pomodoro tool.
//! - Advance the countdown once per elapsed second while running.
//! - Persist mode and remaining time across reloads; `running` is not
//!   persisted, so a reloaded timer always starts paused.
//!
//! # Invariants
//! - `remaining_seconds` never underflows; tick application stops at zero.
//! - A completed countdown switches to the next mode in the cycle and leaves
//!   the machine paused: the user must press start again. Auto-starting the
//!   next session is deliberately not done (see DESIGN.md).
//! - Pausing or changing mode discards the tick anchor, so a stale anchor can
//!   never apply a late tick on top of newer state.

use crate::cell::PersistedCell;
use crate::store::{keys, StoreAdapter};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

const WORK_SECONDS: u32 = 25 * 60;
const SHORT_BREAK_SECONDS: u32 = 5 * 60;
const LONG_BREAK_SECONDS: u32 = 15 * 60;

/// Pomodoro phase.
///
/// Persisted under `pomodoro-mode` using the camelCase tokens shared with
/// the front-end storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Fixed countdown length of this phase, in seconds.
    pub fn full_duration_seconds(self) -> u32 {
        match self {
            Self::Work => WORK_SECONDS,
            Self::ShortBreak => SHORT_BREAK_SECONDS,
            Self::LongBreak => LONG_BREAK_SECONDS,
        }
    }
}

/// Break alternation policy applied after each completed work session.
///
/// Every `long_break_interval`-th completed work session earns a long break;
/// all other work sessions earn a short one. Breaks always cycle back to
/// work. An interval of 0 is treated as 1 (every break long).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPolicy {
    pub long_break_interval: u32,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            long_break_interval: 4,
        }
    }
}

impl BreakPolicy {
    /// Picks the break mode earned by the `completed_work_sessions`-th
    /// finished work session (1-based count).
    fn break_after(self, completed_work_sessions: u32) -> Mode {
        let interval = self.long_break_interval.max(1);
        if completed_work_sessions % interval == 0 {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        }
    }
}

/// Countdown state machine for the pomodoro tool.
///
/// The machine is pull-driven: an embedding event loop calls [`poll`] on
/// whatever cadence it likes, and the machine applies however many whole
/// seconds elapsed since the last accounting. The anchor only advances by the
/// seconds actually consumed, so sub-second remainders accumulate instead of
/// being lost and cumulative drift stays below one tick.
///
/// [`poll`]: PomodoroTimer::poll
pub struct PomodoroTimer {
    mode: Mode,
    remaining_seconds: u32,
    running: bool,
    completed_work_sessions: u32,
    policy: BreakPolicy,
    clock: Rc<dyn Clock>,
    anchor_ms: Option<u64>,
    alert: Option<Box<dyn FnMut(Mode)>>,
    minutes_cell: PersistedCell<u32>,
    seconds_cell: PersistedCell<u32>,
    mode_cell: PersistedCell<Mode>,
}

impl PomodoroTimer {
    /// Builds a timer over the persisted `pomodoro-*` keys.
    ///
    /// Mode and remaining time are restored from the store; a missing or
    /// corrupt entry falls back to a fresh work session. The restored timer
    /// is always paused. A restored remaining time is clamped into
    /// `[1, full_duration]` so the machine never wakes up already expired.
    pub fn new(store: Rc<StoreAdapter>, clock: Rc<dyn Clock>, policy: BreakPolicy) -> Self {
        let mode_cell = PersistedCell::new(Rc::clone(&store), keys::POMODORO_MODE, Mode::Work);
        let mode = mode_cell.get();
        let full = mode.full_duration_seconds();

        let minutes_cell =
            PersistedCell::new(Rc::clone(&store), keys::POMODORO_MINUTES, full / 60);
        let seconds_cell = PersistedCell::new(store, keys::POMODORO_SECONDS, full % 60);

        let restored = minutes_cell
            .get()
            .saturating_mul(60)
            .saturating_add(seconds_cell.get());
        let remaining_seconds = restored.clamp(1, full);

        Self {
            mode,
            remaining_seconds,
            running: false,
            completed_work_sessions: 0,
            policy,
            clock,
            anchor_ms: None,
            alert: None,
            minutes_cell,
            seconds_cell,
            mode_cell,
        }
    }

    /// Registers the completion alert invoked with each finished mode.
    pub fn set_alert(&mut self, alert: impl FnMut(Mode) + 'static) {
        self.alert = Some(Box::new(alert));
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    /// Elapsed fraction of the current phase, clamped to `[0, 1]`.
    ///
    /// Derived on demand for display; never stored.
    pub fn progress_fraction(&self) -> f64 {
        let full = f64::from(self.mode.full_duration_seconds());
        let elapsed = full - f64::from(self.remaining_seconds);
        (elapsed / full).clamp(0.0, 1.0)
    }

    /// Starts the countdown; no-op when already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.anchor_ms = Some(self.clock.now_ms());
        debug!(
            "event=timer_start module=timer status=ok mode={:?} remaining_s={}",
            self.mode, self.remaining_seconds
        );
    }

    /// Pauses the countdown; no-op when already paused.
    ///
    /// Discards the tick anchor, so seconds elapsed before the pause but not
    /// yet polled are dropped rather than applied late.
    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.anchor_ms = None;
        debug!(
            "event=timer_pause module=timer status=ok mode={:?} remaining_s={}",
            self.mode, self.remaining_seconds
        );
    }

    /// Restores the full duration of the current mode and pauses.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.mode.full_duration_seconds();
        self.running = false;
        self.anchor_ms = None;
        self.persist_remaining();
        debug!(
            "event=timer_reset module=timer status=ok mode={:?}",
            self.mode
        );
    }

    /// Switches to `mode` at its full duration and pauses. Valid from any
    /// state.
    pub fn change_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining_seconds = mode.full_duration_seconds();
        self.running = false;
        self.anchor_ms = None;
        self.mode_cell.set(mode);
        self.persist_remaining();
        debug!("event=timer_mode module=timer status=ok mode={mode:?}");
    }

    /// Applies the whole seconds elapsed since the last accounting and
    /// returns how many ticks ran.
    ///
    /// While paused this is a no-op. A clock observed running backwards
    /// degrades the timer to paused (countdown unavailable) and is reported
    /// through the returned tick count of zero plus a logged warning.
    pub fn poll(&mut self) -> u32 {
        if !self.running {
            return 0;
        }
        let Some(anchor_ms) = self.anchor_ms else {
            return 0;
        };

        let now_ms = self.clock.now_ms();
        if now_ms < anchor_ms {
            warn!(
                "event=timer_poll module=timer status=degraded anchor_ms={anchor_ms} now_ms={now_ms}"
            );
            self.running = false;
            self.anchor_ms = None;
            return 0;
        }

        let elapsed_seconds = ((now_ms - anchor_ms) / 1000) as u32;
        let mut applied = 0;
        for _ in 0..elapsed_seconds {
            if !self.running {
                // Completion pauses the machine; the remainder of the elapsed
                // window must not bleed into the next mode.
                break;
            }
            self.tick();
            applied += 1;
        }

        if self.running {
            self.anchor_ms = Some(anchor_ms + u64::from(applied) * 1000);
        }
        applied
    }

    /// One one-second advancement. Only reachable while running.
    fn tick(&mut self) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            self.persist_remaining();
            return;
        }

        let finished = self.mode;
        if finished == Mode::Work {
            self.completed_work_sessions += 1;
        }
        if let Some(alert) = self.alert.as_mut() {
            alert(finished);
        }

        let next = match finished {
            Mode::Work => self.policy.break_after(self.completed_work_sessions),
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        };
        // change_mode leaves the machine paused: no auto-start.
        self.change_mode(next);
        info!(
            "event=timer_complete module=timer status=ok finished={finished:?} next={next:?} work_sessions={}",
            self.completed_work_sessions
        );
    }

    fn persist_remaining(&self) {
        self.minutes_cell.set(self.remaining_seconds / 60);
        self.seconds_cell.set(self.remaining_seconds % 60);
    }
}
