/// User-configured shell hooks
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

/// Returns the command to run, or `None` for missing, empty or commented-out hooks.
pub fn active_command(hook: &Option<String>) -> Option<&str> {
    let command = hook.as_deref()?.trim();
    if command.is_empty() {
        debug!("Hook is empty");
        return None;
    }
    if command.starts_with('#') {
        debug!("Hook is commented out: {}", command);
        return None;
    }
    Some(command)
}

/// Spawns `sh -c <command>` with the given environment. Failures are logged.
pub fn spawn_hook(command: &str, env: &[(&str, &str)]) -> Option<Child> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());
    for (key, value) in env {
        cmd.env(key, value);
    }

    match cmd.spawn() {
        Ok(child) => Some(child),
        Err(err) => {
            warn!("Failed to run hook '{}': {}", command, err);
            None
        }
    }
}

/// Runs a hook in the background without waiting for it.
pub fn execute_hook(hook: &Option<String>, env: &[(&str, &str)]) {
    let Some(command) = active_command(hook) else {
        return;
    };
    if let Some(mut child) = spawn_hook(command, env) {
        // Reap on a side thread so the timer never blocks on a hook.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_missing_empty_and_commented_hooks() {
        assert_eq!(active_command(&None), None);
        assert_eq!(active_command(&Some("   ".to_string())), None);
        assert_eq!(active_command(&Some("# afplay ~/music/develop.mp3".to_string())), None);
    }

    #[test]
    fn trims_active_hooks() {
        let hook = Some("  say drain \n".to_string());
        assert_eq!(active_command(&hook), Some("say drain"));
    }

    #[cfg(unix)]
    #[test]
    fn hook_sees_environment() {
        let mut child = spawn_hook("test \"$FILMDEV_PROCESS\" = Fix", &[("FILMDEV_PROCESS", "Fix")])
            .expect("sh should be available");
        assert!(child.wait().unwrap().success());
    }
}
