mod args;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use args::{Args, Commands, Timings};
use filmdev::awake::KeepAwake;
use filmdev::config::{Config, default_config_path, load_config};
use filmdev::cue::CuePlayer;
use filmdev::driver::{StageOutcome, ThreadTicker, run_stage};
use filmdev::guard::{Interrupt, UnloadGuard};
use filmdev::hooks::execute_hook;
use filmdev::render::{TerminalView, render_sequence};
use filmdev::{Session, StageSequence, StageTimer, format_duration};

struct RunOptions {
    auto: bool,
    keep_awake: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { config, command } = Args::parse();
    let config_path = config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path);

    match command {
        Commands::Plan { timings, json } => {
            let sequence = compute(&timings, &config)?;
            if json {
                let json = serde_json::to_string_pretty(&sequence)
                    .context("Failed to serialize stages")?;
                println!("{}", json);
                return Ok(());
            }
            println!("{}", render_sequence(&sequence));
            println!("Total: {}", format_duration(sequence.total_seconds()));
            Ok(())
        }
        Commands::Start {
            timings,
            yes,
            auto,
            no_sound,
            no_keep_awake,
        } => {
            let sequence = compute(&timings, &config)?;
            println!("{}", render_sequence(&sequence));

            if !yes && !confirm("Start? [Y/n] ")? {
                println!("Discarded.");
                return Ok(());
            }

            let guard = UnloadGuard::new();
            let handler_guard = guard.clone();
            ctrlc::set_handler(move || match handler_guard.on_interrupt() {
                Interrupt::Exit => {
                    println!("\n🛑 Interrupted!");
                    std::process::exit(130);
                }
                Interrupt::Warn => {
                    eprintln!("\n⚠️  A stage is still running. Press Ctrl-C again to abort.");
                }
                Interrupt::Cancel => {}
            })
            .context("Error setting Ctrl-C handler")?;

            // One playback handle for the whole run.
            let cues = CuePlayer::new(!no_sound, config.hooks.cue.clone());
            let options = RunOptions {
                auto,
                keep_awake: !no_keep_awake,
            };
            run_session(Session::new(sequence), &config, &guard, &cues, &options)
        }
    }
}

fn compute(timings: &Timings, config: &Config) -> Result<StageSequence> {
    timings
        .compute(&config.defaults)
        .context("Could not compute stage durations")
}

fn run_session(
    mut session: Session,
    config: &Config,
    guard: &UnloadGuard,
    cues: &CuePlayer,
    options: &RunOptions,
) -> Result<()> {
    while let Some(stage) = session.current().copied() {
        let (index, total) = session.position();
        if !options.auto {
            prompt(&format!(
                "▶️  Press Enter to start {} ({}/{}, {})",
                stage.process,
                index,
                total,
                format_duration(stage.duration)
            ))?;
        }

        let process = stage.process.as_str();
        let mut timer = StageTimer::new(stage);
        let _awake = if options.keep_awake {
            KeepAwake::acquire(&config.hooks.keep_awake)
        } else {
            KeepAwake::none()
        };

        guard.arm();
        execute_hook(&config.hooks.stage_start, &[("FILMDEV_PROCESS", process)]);
        let mut ticker = ThreadTicker::new(guard.cancel_flag());
        let mut view = TerminalView::new(cues);
        let outcome = run_stage(&mut timer, &mut ticker, &mut view);
        guard.disarm();
        timer.reset();
        execute_hook(&config.hooks.stage_end, &[("FILMDEV_PROCESS", process)]);

        match outcome.with_context(|| format!("{} timer failed", process))? {
            StageOutcome::Completed => println!("✅ {} complete.", process),
            StageOutcome::Cancelled => {
                println!(
                    "\n🛑 {} aborted at {}.",
                    process,
                    format_duration(timer.elapsed())
                );
                return Ok(());
            }
        }

        session.advance();
    }

    info!("All stages complete");
    println!("🎞️  All stages complete! Wash and dry your film.");
    Ok(())
}

/// Prints `message` and reads one line. EOF reads as an empty line.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().context("Could not write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Could not read from stdin")?;
    Ok(line.trim().to_lowercase())
}

fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(message)?;
    Ok(!answer.starts_with('n'))
}
