/// Keeps the machine awake while a stage runs
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

use crate::hooks::{active_command, spawn_hook};

/// Holds a platform sleep inhibitor; released on drop.
#[derive(Debug)]
pub struct KeepAwake {
    child: Option<Child>,
}

impl KeepAwake {
    /// Best-effort acquisition. A configured hook replaces the platform default.
    pub fn acquire(hook: &Option<String>) -> Self {
        let child = match active_command(hook) {
            Some(command) => spawn_hook(command, &[]),
            None => spawn_platform_inhibitor(),
        };
        if child.is_some() {
            debug!("Keep-awake acquired");
        }
        Self { child }
    }

    /// A guard that holds nothing.
    pub fn none() -> Self {
        Self { child: None }
    }

    pub fn is_held(&self) -> bool {
        self.child.is_some()
    }

    pub fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            debug!("Keep-awake released");
        }
    }
}

impl Drop for KeepAwake {
    fn drop(&mut self) {
        self.release();
    }
}

fn spawn_platform_inhibitor() -> Option<Child> {
    let mut cmd = if cfg!(target_os = "macos") {
        let mut cmd = Command::new("caffeinate");
        cmd.arg("-dims");
        cmd
    } else if cfg!(target_os = "linux") {
        let mut cmd = Command::new("systemd-inhibit");
        cmd.args([
            "--what=idle:sleep",
            "--who=filmdev",
            "--why=Developing film",
            "sleep",
            "infinity",
        ]);
        cmd
    } else {
        return None;
    };

    match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => Some(child),
        Err(err) => {
            warn!("Could not keep the system awake: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let mut guard = KeepAwake::none();
        assert!(!guard.is_held());
        guard.release();
        guard.release();
    }

    #[cfg(unix)]
    #[test]
    fn hook_is_held_until_released() {
        let mut guard = KeepAwake::acquire(&Some("sleep 30".to_string()));
        assert!(guard.is_held());
        guard.release();
        assert!(!guard.is_held());
    }
}
