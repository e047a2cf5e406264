/// Duration calculation for the Develop, Stop and Fix stages
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::format::MINUTE;

pub const BASE_TEMPERATURE: f64 = 20.0;
/// Each degree above base shortens developing by 10%.
pub const STEP_MODIFIER: f64 = 0.9;
/// Longest accepted stage, one day.
pub const MAX_STAGE_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Process {
    Develop,
    Stop,
    Fix,
}

impl Process {
    pub fn as_str(&self) -> &'static str {
        match self {
            Process::Develop => "Develop",
            Process::Stop => "Stop",
            Process::Fix => "Fix",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessStage {
    pub process: Process,
    /// Whole seconds, always greater than zero.
    pub duration: u64,
}

/// The three stages in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageSequence {
    stages: [ProcessStage; 3],
}

impl StageSequence {
    pub fn stages(&self) -> &[ProcessStage; 3] {
        &self.stages
    }

    pub fn get(&self, process: Process) -> &ProcessStage {
        match process {
            Process::Develop => &self.stages[0],
            Process::Stop => &self.stages[1],
            Process::Fix => &self.stages[2],
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.stages.iter().map(|s| s.duration).sum()
    }
}

/// Computes the stage durations from the user's developing time and temperature.
///
/// Developing time is scaled by `0.9 ^ (temperature - 20)`; stop and fix
/// times are converted to whole seconds. Inputs that are not finite, not
/// positive, or that give a stage of zero seconds or longer than
/// [`MAX_STAGE_SECONDS`] are rejected.
pub fn compute_stages(
    develop_minutes: f64,
    temperature_celsius: f64,
    stop_seconds: f64,
    fix_minutes: f64,
) -> Result<StageSequence> {
    require_positive("develop_minutes", develop_minutes)?;
    if !temperature_celsius.is_finite() {
        return Err(Error::invalid_input("temperature").with_reason("must be a number"));
    }
    require_positive("stop_seconds", stop_seconds)?;
    require_positive("fix_minutes", fix_minutes)?;

    let modifier = STEP_MODIFIER.powf(temperature_celsius - BASE_TEMPERATURE);
    let develop = to_seconds("develop_minutes", develop_minutes * MINUTE as f64 * modifier)?;
    let stop = to_seconds("stop_seconds", stop_seconds)?;
    let fix = to_seconds("fix_minutes", fix_minutes * MINUTE as f64)?;

    debug!(
        "Computed stages at {}C (modifier {:.3}): develop={}s stop={}s fix={}s",
        temperature_celsius, modifier, develop, stop, fix
    );

    Ok(StageSequence {
        stages: [
            ProcessStage { process: Process::Develop, duration: develop },
            ProcessStage { process: Process::Stop, duration: stop },
            ProcessStage { process: Process::Fix, duration: fix },
        ],
    })
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_input(field).with_reason("must be a number"));
    }
    if value <= 0.0 {
        return Err(Error::invalid_input(field).with_reason("must be greater than 0"));
    }
    Ok(())
}

fn to_seconds(field: &str, seconds: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds.round() > MAX_STAGE_SECONDS as f64 {
        return Err(Error::invalid_input(field).with_reason("stage would last longer than a day"));
    }
    // Positive inputs only, so round() is round-half-up here.
    let rounded = seconds.round() as u64;
    if rounded == 0 {
        return Err(Error::invalid_input(field).with_reason("rounds to zero seconds"));
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn develop_at(temperature: f64) -> u64 {
        compute_stages(17.0, temperature, 20.0, 5.0)
            .unwrap()
            .get(Process::Develop)
            .duration
    }

    #[test]
    fn default_inputs_produce_expected_stages() {
        let sequence = compute_stages(17.0, 20.0, 20.0, 5.0).unwrap();
        assert_eq!(
            sequence.stages(),
            &[
                ProcessStage { process: Process::Develop, duration: 1020 },
                ProcessStage { process: Process::Stop, duration: 20 },
                ProcessStage { process: Process::Fix, duration: 300 },
            ]
        );
        assert_eq!(sequence.total_seconds(), 1340);
    }

    #[test]
    fn base_temperature_leaves_developing_time_unchanged() {
        for minutes in [1.0, 6.5, 9.25, 17.0, 42.0] {
            let sequence = compute_stages(minutes, BASE_TEMPERATURE, 30.0, 4.0).unwrap();
            let expected = (minutes * 60.0_f64).round() as u64;
            assert_eq!(sequence.get(Process::Develop).duration, expected);
        }
    }

    #[test]
    fn warmer_develops_faster() {
        let mut previous = develop_at(20.0);
        for degrees in 21..=35 {
            let current = develop_at(degrees as f64);
            assert!(current < previous, "{}C gave {} >= {}", degrees, current, previous);
            previous = current;
        }
        assert_eq!(develop_at(21.0), 918);
    }

    #[test]
    fn colder_develops_slower() {
        let mut previous = develop_at(20.0);
        for degrees in (5..20).rev() {
            let current = develop_at(degrees as f64);
            assert!(current > previous, "{}C gave {} <= {}", degrees, current, previous);
            previous = current;
        }
        assert_eq!(develop_at(19.0), 1133);
    }

    #[test]
    fn always_three_stages_in_order() {
        let sequence = compute_stages(8.0, 24.5, 45.0, 3.0).unwrap();
        let order: Vec<Process> = sequence.stages().iter().map(|s| s.process).collect();
        assert_eq!(order, vec![Process::Develop, Process::Stop, Process::Fix]);
        assert_eq!(sequence.stages().len(), 3);
    }

    #[test]
    fn fractional_stop_and_fix_round_to_seconds() {
        let sequence = compute_stages(10.0, 20.0, 12.5, 2.51).unwrap();
        assert_eq!(sequence.get(Process::Stop).duration, 13);
        assert_eq!(sequence.get(Process::Fix).duration, 151);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let err = compute_stages(0.0, 20.0, 20.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "develop_minutes"));

        let err = compute_stages(17.0, 20.0, -1.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "stop_seconds"));

        let err = compute_stages(17.0, 20.0, 20.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "fix_minutes"));
    }

    #[test]
    fn rejects_non_numeric_inputs() {
        assert!(compute_stages(f64::NAN, 20.0, 20.0, 5.0).unwrap_err().is_invalid_input());
        assert!(compute_stages(17.0, f64::NAN, 20.0, 5.0).unwrap_err().is_invalid_input());
        assert!(compute_stages(17.0, 20.0, f64::INFINITY, 5.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn rejects_stages_longer_than_a_day() {
        let err = compute_stages(3e17, 20.0, 1.0, 3e17).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "develop_minutes"));

        let err = compute_stages(17.0, 20.0, 1.0, 3e17).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "fix_minutes"));

        // Very cold developer stretches a normal time past the limit too.
        assert!(compute_stages(17.0, -60.0, 20.0, 5.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn longest_accepted_stages_still_total() {
        let sequence = compute_stages(1440.0, 20.0, 86_400.0, 1440.0).unwrap();
        assert_eq!(sequence.total_seconds(), 3 * MAX_STAGE_SECONDS);
    }

    #[test]
    fn serializes_as_list_of_stages() {
        let sequence = compute_stages(17.0, 20.0, 20.0, 5.0).unwrap();
        let json = serde_json::to_value(&sequence).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"process": "Develop", "duration": 1020},
                {"process": "Stop", "duration": 20},
                {"process": "Fix", "duration": 300}
            ])
        );
    }

    #[test]
    fn rejects_durations_that_round_to_zero() {
        let err = compute_stages(17.0, 20.0, 0.2, 5.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'stop_seconds': rounds to zero seconds"
        );
    }
}
