//! Interrupt handling while a stage is running.
//!
//! Ctrl-C during a running stage first prints a warning; a second Ctrl-C
//! cancels the stage. Outside a running stage it exits straight away.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Exit,
    Warn,
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct UnloadGuard {
    armed: Arc<AtomicBool>,
    warned: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl UnloadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag observed by the ticker of the running stage.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn arm(&self) {
        self.warned.store(false, Ordering::SeqCst);
        self.cancel.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
        self.warned.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    pub fn on_interrupt(&self) -> Interrupt {
        if !self.is_armed() {
            return Interrupt::Exit;
        }
        if !self.warned.swap(true, Ordering::SeqCst) {
            return Interrupt::Warn;
        }
        self.cancel.store(true, Ordering::SeqCst);
        Interrupt::Cancel
    }
}
