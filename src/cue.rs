/// Audible cues for action changes
use std::io::Write;
use std::process::Command;
use std::thread;

use log::{debug, warn};

use crate::hooks::{active_command, spawn_hook};
use crate::timer::Action;

const MACOS_SOUNDS: [&str; 3] = [
    "/System/Library/Sounds/Ping.aiff",
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Pop.aiff",
];

const LINUX_SOUNDS: [&str; 3] = [
    "/usr/share/sounds/freedesktop/stereo/bell.oga",
    "/usr/share/sounds/sound-icons/bell.wav",
    "/usr/share/sounds/alsa/Front_Left.wav",
];

/// Playback handle shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct CuePlayer {
    enabled: bool,
    hook: Option<String>,
}

impl CuePlayer {
    pub fn new(enabled: bool, hook: Option<String>) -> Self {
        Self { enabled, hook }
    }

    pub fn disabled() -> Self {
        Self::new(false, None)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Plays a short sound for `action` without blocking the caller.
    pub fn play(&self, action: Action) {
        if !self.enabled || action.is_none() {
            return;
        }

        if let Some(command) = active_command(&self.hook) {
            if let Some(mut child) = spawn_hook(command, &[("FILMDEV_ACTION", action.as_str())]) {
                thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            return;
        }

        thread::spawn(system_beep);
    }
}

fn play_first(player: &str, sounds: &[&str]) -> bool {
    for sound_path in sounds {
        match Command::new(player).arg(sound_path).status() {
            Ok(status) if status.success() => return true,
            Ok(_) => debug!("{} could not play {}", player, sound_path),
            // Player missing, no point trying the other files.
            Err(_) => return false,
        }
    }
    false
}

fn system_beep() {
    let sound_played = if cfg!(target_os = "macos") {
        play_first("afplay", &MACOS_SOUNDS)
    } else if cfg!(target_os = "linux") {
        play_first("paplay", &LINUX_SOUNDS) || play_first("aplay", &LINUX_SOUNDS)
    } else {
        false
    };

    if !sound_played {
        let mut stdout = std::io::stdout();
        if let Err(err) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!("Could not ring terminal bell: {}", err);
        }
    }
}
