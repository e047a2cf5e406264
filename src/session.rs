use crate::calculator::{ProcessStage, StageSequence};

/// Steps through a [`StageSequence`] one stage at a time.
#[derive(Debug, Clone)]
pub struct Session {
    sequence: StageSequence,
    index: usize,
}

impl Session {
    pub fn new(sequence: StageSequence) -> Self {
        Self { sequence, index: 0 }
    }

    /// The stage waiting to run, or `None` once every stage has finished.
    pub fn current(&self) -> Option<&ProcessStage> {
        self.sequence.stages().get(self.index)
    }

    /// Moves past the current stage and returns the next one.
    pub fn advance(&mut self) -> Option<&ProcessStage> {
        if self.index < self.sequence.stages().len() {
            self.index += 1;
        }
        self.current()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.sequence.stages().len()
    }

    /// 1-based position of the current stage and the total count.
    pub fn position(&self) -> (usize, usize) {
        let total = self.sequence.stages().len();
        ((self.index + 1).min(total), total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Process, compute_stages};

    #[test]
    fn walks_stages_in_order() {
        let mut session = Session::new(compute_stages(17.0, 20.0, 20.0, 5.0).unwrap());

        assert_eq!(session.current().map(|s| s.process), Some(Process::Develop));
        assert_eq!(session.position(), (1, 3));
        assert_eq!(session.advance().map(|s| s.process), Some(Process::Stop));
        assert_eq!(session.advance().map(|s| s.process), Some(Process::Fix));
        assert_eq!(session.position(), (3, 3));
        assert!(!session.is_complete());

        assert_eq!(session.advance(), None);
        assert!(session.is_complete());
    }

    #[test]
    fn advancing_past_the_end_stays_complete() {
        let mut session = Session::new(compute_stages(5.0, 22.0, 30.0, 3.0).unwrap());
        for _ in 0..5 {
            session.advance();
        }
        assert!(session.is_complete());
        assert_eq!(session.current(), None);
        assert_eq!(session.position(), (3, 3));
    }
}
