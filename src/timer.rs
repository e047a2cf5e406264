/// Timer module for a single processing stage
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::calculator::{Process, ProcessStage};
use crate::error::{Error, Result};
use crate::format::MINUTE;

pub const TICK: Duration = Duration::from_millis(1000);

const POUR_DURATION: u64 = 10;
const AGITATE_DURATION: u64 = 10;
const DRAIN_LEAD: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    Pour,
    Agitate,
    Drain,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "",
            Action::Pour => "Pour",
            Action::Agitate => "Agitate",
            Action::Drain => "Drain",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the instruction for the user from the time spent in a stage.
///
/// Drain overrides everything in the last ten seconds. Otherwise the first
/// ten seconds are for pouring, followed by ten seconds of agitation, then a
/// ten second agitation burst at the start of every following minute.
pub fn compute_action(elapsed: u64, duration: u64) -> Action {
    if duration.saturating_sub(elapsed) <= DRAIN_LEAD {
        return Action::Drain;
    }

    if elapsed < POUR_DURATION {
        return Action::Pour;
    }

    if elapsed < MINUTE {
        if elapsed < POUR_DURATION + AGITATE_DURATION {
            return Action::Agitate;
        }
        return Action::None;
    }

    if elapsed % MINUTE < AGITATE_DURATION {
        return Action::Agitate;
    }

    Action::None
}

/// Result of one processed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub elapsed: u64,
    /// Set when the action changed to a non-empty value.
    pub cue: Option<Action>,
    /// Delay before the next tick, `None` once the stage is finished.
    pub next_delay: Option<Duration>,
}

/// Count-up state machine for one stage: Idle, then Running, then Finished.
#[derive(Debug, Clone)]
pub struct StageTimer {
    process: Process,
    duration: u64,
    stage: Stage,
    elapsed: u64,
    action: Action,
    started_at: Option<Instant>,
    pending: Option<Duration>,
    failed: bool,
    cancelled: bool,
}

impl StageTimer {
    pub fn new(stage: ProcessStage) -> Self {
        Self {
            process: stage.process,
            duration: stage.duration,
            stage: Stage::Idle,
            elapsed: 0,
            action: Action::None,
            started_at: None,
            pending: None,
            failed: false,
            cancelled: false,
        }
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// True when a running timer was torn down before reaching its duration.
    /// Such a timer stays Running with nothing scheduled and never ticks again.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The delay of the single scheduled tick, if any.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending
    }

    /// Fraction of the stage completed, between 0 and 1.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        self.elapsed as f64 / self.duration as f64
    }

    /// Starts counting. Returns the cue for the initial action, if any.
    ///
    /// A zero-length stage finishes immediately without scheduling a tick.
    pub fn start(&mut self, now: Instant) -> Result<Option<Action>> {
        if self.stage != Stage::Idle {
            return Err(Error::InvalidState(format!(
                "{} timer can only be started once",
                self.process
            )));
        }

        self.started_at = Some(now);
        self.stage = Stage::Running;
        self.elapsed = 0;
        debug!("{} started for {}s", self.process, self.duration);

        let cue = self.update_action();
        if self.elapsed >= self.duration {
            self.stage = Stage::Finished;
        } else {
            self.pending = Some(TICK);
        }
        Ok(cue)
    }

    /// Advances by exactly one second and schedules the next tick, correcting
    /// for the drift between wall-clock time and counted seconds.
    pub fn tick(&mut self, now: Instant) -> Result<Tick> {
        let (Some(started_at), Some(_)) = (self.started_at, self.pending.take()) else {
            return Err(Error::InvalidState(format!(
                "{} timer has no pending tick",
                self.process
            )));
        };

        self.elapsed += 1;
        let cue = self.update_action();

        if self.elapsed >= self.duration {
            self.stage = Stage::Finished;
            debug!("{} finished after {}s", self.process, self.elapsed);
            return Ok(Tick {
                elapsed: self.elapsed,
                cue,
                next_delay: None,
            });
        }

        let wall_ms = now.saturating_duration_since(started_at).as_millis() as i128;
        let drift_ms = wall_ms - i128::from(self.elapsed) * 1000;
        let delay_ms = (TICK.as_millis() as i128 - drift_ms).max(0);
        let delay = Duration::from_millis(delay_ms as u64);
        trace!(
            "{} tick {}: drift {}ms, next in {}ms",
            self.process, self.elapsed, drift_ms, delay_ms
        );

        self.pending = Some(delay);
        Ok(Tick {
            elapsed: self.elapsed,
            cue,
            next_delay: Some(delay),
        })
    }

    /// Cancels any pending tick. Safe to call repeatedly in any stage.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            self.cancelled = true;
            debug!("{} timer cancelled at {}s", self.process, self.elapsed);
        }
    }

    /// Stops the timer after a scheduling failure.
    pub fn fail(&mut self) {
        self.pending = None;
        self.stage = Stage::Finished;
        self.failed = true;
    }

    fn update_action(&mut self) -> Option<Action> {
        let new_action = compute_action(self.elapsed, self.duration);
        if new_action == self.action {
            return None;
        }

        self.action = new_action;
        if new_action.is_none() {
            None
        } else {
            Some(new_action)
        }
    }
}
