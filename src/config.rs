/// Configuration module for default timings and hooks
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calculator::BASE_TEMPERATURE;
use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    pub hooks: Hooks,
}

/// Values used when a timing flag is not given on the command line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub develop_minutes: f64,
    pub temperature: f64,
    pub stop_seconds: f64,
    pub fix_minutes: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            develop_minutes: 17.0,
            temperature: BASE_TEMPERATURE,
            stop_seconds: 20.0,
            fix_minutes: 5.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Hooks {
    pub stage_start: Option<String>,
    pub stage_end: Option<String>,
    /// Replaces the built-in sound; receives `FILMDEV_ACTION`.
    pub cue: Option<String>,
    /// Replaces the platform sleep inhibitor.
    pub keep_awake: Option<String>,
}

impl Config {
    /// Config written on first run, with every hook commented out.
    pub fn starter() -> Self {
        Self {
            defaults: Defaults::default(),
            hooks: Hooks {
                stage_start: Some("# afplay ~/music/darkroom.mp3 &".to_string()),
                stage_end: Some("# pkill afplay".to_string()),
                cue: Some("# say \"$FILMDEV_ACTION\"".to_string()),
                keep_awake: Some("# caffeinate -dims".to_string()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("filmdev")
            .join("config.json")
    } else {
        PathBuf::from("filmdev-config.json")
    }
}

/// Loads the config, creating a starter file when none exists.
///
/// An unreadable or malformed file is reported and replaced by defaults in
/// memory; the file itself is left untouched.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        let starter = Config::starter();
        match starter.write_to(path) {
            Ok(()) => debug!("Wrote starter config to {}", path.display()),
            Err(err) => warn!("Could not write starter config: {}", err),
        }
        return starter;
    }

    match Config::from_file(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            warn!("{}; using defaults", err);
            Config::default()
        }
    }
}
