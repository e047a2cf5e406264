use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use filmdev::config::Defaults;
use filmdev::{Result, StageSequence, compute_stages};

/// Darkroom timer for the Develop, Stop and Fix stages of film processing
#[derive(Parser)]
#[command(version, about, name = "filmdev")]
pub struct Args {
    /// Path to the config file. Defaults to ~/.config/filmdev/config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute stage durations and run the timers
    Start {
        #[command(flatten)]
        timings: Timings,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Start each stage without waiting for Enter
        #[arg(long)]
        auto: bool,

        /// Disable sound cues
        #[arg(long)]
        no_sound: bool,

        /// Do not keep the system awake while a stage runs
        #[arg(long)]
        no_keep_awake: bool,
    },
    /// Print the stage durations without running them
    Plan {
        #[command(flatten)]
        timings: Timings,

        /// Print the stages as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Timing inputs; missing values come from the config defaults.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Timings {
    /// Developing time in minutes at 20C
    #[arg(short, long)]
    pub develop: Option<f64>,

    /// Developer temperature in Celsius
    #[arg(short, long, allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Stop bath time in seconds
    #[arg(short, long)]
    pub stop: Option<f64>,

    /// Fixing time in minutes
    #[arg(short, long)]
    pub fix: Option<f64>,
}

impl Timings {
    pub fn compute(&self, defaults: &Defaults) -> Result<StageSequence> {
        compute_stages(
            self.develop.unwrap_or(defaults.develop_minutes),
            self.temperature.unwrap_or(defaults.temperature),
            self.stop.unwrap_or(defaults.stop_seconds),
            self.fix.unwrap_or(defaults.fix_minutes),
        )
    }
}
