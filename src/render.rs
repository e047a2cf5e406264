/// Terminal presentation of a running stage
use std::io::{self, Write};

use log::debug;

use crate::calculator::StageSequence;
use crate::cue::CuePlayer;
use crate::driver::StageListener;
use crate::format::format_duration;
use crate::timer::{Action, Stage, StageTimer};

const BAR_WIDTH: usize = 20;

/// Progress line for a timer: process, action, clock, bar and percentage.
///
/// Idle timers show their full duration, running and finished timers show
/// the time elapsed so far.
pub fn render_line(timer: &StageTimer) -> String {
    let displayed = match timer.stage() {
        Stage::Idle => timer.duration(),
        Stage::Running | Stage::Finished => timer.elapsed(),
    };

    let progress_ratio = timer.progress().clamp(0.0, 1.0);
    let percentage = (progress_ratio * 100.0) as u8;
    let filled_blocks = (progress_ratio * BAR_WIDTH as f64) as usize;
    let empty_blocks = BAR_WIDTH - filled_blocks;

    format!(
        "{:<8} {:<8} {} [{}{}] {}%",
        timer.process().as_str(),
        timer.action().as_str(),
        format_duration(displayed),
        "█".repeat(filled_blocks),
        "░".repeat(empty_blocks),
        percentage
    )
}

/// Confirmation listing, one `Process: MM:SS` row per stage.
pub fn render_sequence(sequence: &StageSequence) -> String {
    sequence
        .stages()
        .iter()
        .map(|stage| format!("{}: {}", stage.process, format_duration(stage.duration)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Redraws the progress line on stdout and plays cues.
pub struct TerminalView<'a> {
    cues: &'a CuePlayer,
}

impl<'a> TerminalView<'a> {
    pub fn new(cues: &'a CuePlayer) -> Self {
        Self { cues }
    }

    fn draw(&self, timer: &StageTimer) {
        let mut stdout = io::stdout();
        // Trailing spaces wipe a longer action label from the previous frame.
        let _ = write!(stdout, "\r{}   ", render_line(timer));
        let _ = stdout.flush();
    }
}

impl StageListener for TerminalView<'_> {
    fn on_tick(&mut self, timer: &StageTimer) {
        self.draw(timer);
    }

    fn on_cue(&mut self, action: Action) {
        debug!("Cue: {}", action);
        self.cues.play(action);
    }

    fn on_finished(&mut self, timer: &StageTimer) {
        self.draw(timer);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::calculator::{Process, ProcessStage, compute_stages};

    fn fix_timer() -> StageTimer {
        StageTimer::new(ProcessStage {
            process: Process::Fix,
            duration: 300,
        })
    }

    #[test]
    fn idle_timer_shows_full_duration() {
        let line = render_line(&fix_timer());
        assert!(line.starts_with("Fix"));
        assert!(line.contains("05:00"));
        assert!(line.ends_with(&format!("[{}] 0%", "░".repeat(20))));
    }

    #[test]
    fn running_timer_shows_elapsed_and_progress() {
        let mut timer = fix_timer();
        let start = Instant::now();
        timer.start(start).unwrap();
        for second in 1..=75 {
            timer.tick(start + Duration::from_secs(second)).unwrap();
        }

        let line = render_line(&timer);
        assert!(line.contains("01:15"));
        assert!(line.contains(&format!("[{}{}] 25%", "█".repeat(5), "░".repeat(15))));
        assert!(!line.contains("Agitate"));
    }

    #[test]
    fn running_timer_shows_action() {
        let mut timer = fix_timer();
        timer.start(Instant::now()).unwrap();
        assert!(render_line(&timer).contains("Pour"));
    }

    #[test]
    fn sequence_lists_each_stage() {
        let sequence = compute_stages(17.0, 20.0, 20.0, 5.0).unwrap();
        assert_eq!(
            render_sequence(&sequence),
            "Develop: 17:00\nStop: 00:20\nFix: 05:00"
        );
    }
}
