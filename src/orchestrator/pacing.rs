//! Observation windows before risky steps.
//!
//! A pause gives the operator time to read a warning and press Ctrl+C.
//! Pauses are not retries; nothing is re-checked afterwards.

use std::cell::RefCell;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::shell::check_interrupt;
use crate::ui::UserInterface;

/// Pause after an end-of-life warning.
pub const DEPRECATION_PAUSE: Duration = Duration::from_secs(10);

/// Pause after a WSL or existing-installation warning.
pub const WARNING_PAUSE: Duration = Duration::from_secs(20);

const TICK: Duration = Duration::from_millis(100);

/// Waits between a warning and the next step.
pub trait Pacer {
    /// Wait for `duration`, failing with `Interrupted` if Ctrl+C arrives.
    fn pause(&self, ui: &mut dyn UserInterface, duration: Duration) -> Result<()>;
}

/// Sleeps for real, showing a countdown spinner.
#[derive(Debug, Default)]
pub struct SystemPacer;

impl Pacer for SystemPacer {
    fn pause(&self, ui: &mut dyn UserInterface, duration: Duration) -> Result<()> {
        let mut spinner = ui.start_spinner(&countdown(duration));
        let start = Instant::now();

        while start.elapsed() < duration {
            if let Err(err) = check_interrupt() {
                spinner.finish_error("Aborted");
                return Err(err);
            }
            spinner.set_message(&countdown(duration.saturating_sub(start.elapsed())));
            thread::sleep(TICK);
        }

        spinner.finish_clear();
        check_interrupt()
    }
}

fn countdown(remaining: Duration) -> String {
    format!(
        "Continuing in {}s (press Ctrl+C to abort)",
        remaining.as_secs_f32().ceil() as u64
    )
}

/// Records requested pauses without waiting.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    /// Create a pacer with no recorded pauses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, _ui: &mut dyn UserInterface, duration: Duration) -> Result<()> {
        self.pauses.borrow_mut().push(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn system_pacer_waits_and_clears() {
        let mut ui = MockUI::new();
        let start = Instant::now();
        SystemPacer.pause(&mut ui, Duration::from_millis(150)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(150));
        assert_eq!(ui.spinners(), ["Continuing in 1s (press Ctrl+C to abort)"]);
    }

    #[test]
    fn recording_pacer_records() {
        let pacer = RecordingPacer::new();
        let mut ui = MockUI::new();
        pacer.pause(&mut ui, DEPRECATION_PAUSE).unwrap();
        pacer.pause(&mut ui, WARNING_PAUSE).unwrap();
        assert_eq!(pacer.pauses(), vec![DEPRECATION_PAUSE, WARNING_PAUSE]);
    }

    #[test]
    fn countdown_rounds_up() {
        assert_eq!(
            countdown(Duration::from_millis(9_100)),
            "Continuing in 10s (press Ctrl+C to abort)"
        );
    }
}
