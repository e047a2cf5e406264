//! Drives a [`StageTimer`] in real time.
//!
//! The timer only computes delays; a [`Ticker`] waits them out one at a time
//! and a [`StageListener`] observes every transition. Swapping the ticker is
//! how tests run a full stage without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::timer::{Action, StageTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Elapsed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Cancelled,
}

/// Source of time and of the single pending wait.
pub trait Ticker {
    fn now(&self) -> Instant;

    /// Blocks until `delay` has passed or the wait is cancelled.
    fn wait(&mut self, delay: Duration) -> Result<Wait>;
}

/// Observer for a running stage.
pub trait StageListener {
    fn on_start(&mut self, _timer: &StageTimer) {}

    fn on_tick(&mut self, timer: &StageTimer);

    /// Called when the action changes to a non-empty value.
    fn on_cue(&mut self, _action: Action) {}

    fn on_finished(&mut self, _timer: &StageTimer) {}
}

/// Sleeps on the current thread, polling a cancel flag between slices.
pub struct ThreadTicker {
    cancel: Arc<AtomicBool>,
    slice: Duration,
}

impl ThreadTicker {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self {
            cancel,
            slice: Duration::from_millis(50),
        }
    }
}

impl Ticker for ThreadTicker {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wait(&mut self, delay: Duration) -> Result<Wait> {
        let deadline = Instant::now()
            .checked_add(delay)
            .ok_or_else(|| Error::Scheduling(format!("cannot schedule tick in {:?}", delay)))?;

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Ok(Wait::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(Wait::Elapsed);
            }
            thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// Runs one stage from Idle to Finished, or until cancelled.
///
/// A failed wait is fatal to the timer: it is marked failed and finished
/// before the error is returned.
pub fn run_stage<T, L>(timer: &mut StageTimer, ticker: &mut T, listener: &mut L) -> Result<StageOutcome>
where
    T: Ticker,
    L: StageListener,
{
    let cue = timer.start(ticker.now())?;
    info!("Starting {} ({}s)", timer.process(), timer.duration());
    listener.on_start(timer);
    if let Some(action) = cue {
        listener.on_cue(action);
    }
    listener.on_tick(timer);

    while let Some(delay) = timer.pending_delay() {
        match ticker.wait(delay) {
            Ok(Wait::Elapsed) => {}
            Ok(Wait::Cancelled) => {
                timer.reset();
                info!("{} cancelled at {}s", timer.process(), timer.elapsed());
                return Ok(StageOutcome::Cancelled);
            }
            Err(err) => {
                warn!("{} stopped: {}", timer.process(), err);
                timer.fail();
                listener.on_finished(timer);
                return Err(err);
            }
        }

        let tick = timer.tick(ticker.now())?;
        if let Some(action) = tick.cue {
            listener.on_cue(action);
        }
        listener.on_tick(timer);
    }

    info!("{} complete", timer.process());
    listener.on_finished(timer);
    Ok(StageOutcome::Completed)
}
