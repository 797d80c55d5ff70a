//! Haptic and audio feedback.
//!
//! Both are best-effort: a device that cannot vibrate or play a tone says
//! so and the request is dropped.

use std::io::Write;
use std::time::Duration;

use tracing::trace;

use crate::calculator::Outcome;

/// Something that can buzz or beep.
pub trait FeedbackDevice: Send {
    /// Vibrate with alternating on/off durations in milliseconds.
    /// Returns `false` when vibration is unsupported.
    fn vibrate(&mut self, pattern: &[u64]) -> bool;

    /// Play a short tone. Returns `false` when audio is unsupported.
    fn tone(&mut self, frequency_hz: f32, duration: Duration) -> bool;
}

/// Kinds of feedback the calculator gives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Press,
    Result,
    Error,
}

impl Cue {
    pub fn for_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Evaluated(_) => Self::Result,
            Outcome::Failed(_) => Self::Error,
            Outcome::Updated | Outcome::Unchanged => Self::Press,
        }
    }

    fn vibration(self) -> &'static [u64] {
        match self {
            Self::Press => &[10],
            Self::Result => &[20, 10, 20],
            Self::Error => &[50, 50, 50],
        }
    }

    fn tone(self) -> (f32, Duration) {
        match self {
            Self::Press => (800.0, Duration::from_millis(50)),
            Self::Result => (1200.0, Duration::from_millis(100)),
            Self::Error => (200.0, Duration::from_millis(200)),
        }
    }
}

/// Routes cues to a device, honoring the sound preference.
pub struct Feedback {
    device: Box<dyn FeedbackDevice>,
    sound: bool,
}

impl Feedback {
    pub fn new(device: Box<dyn FeedbackDevice>, sound: bool) -> Self {
        Self { device, sound }
    }

    /// Feedback that does nothing.
    pub fn silent() -> Self {
        Self::new(Box::new(NoDevice), false)
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound = enabled;
    }

    pub fn play(&mut self, cue: Cue) {
        if !self.device.vibrate(cue.vibration()) {
            trace!(?cue, "Vibration unsupported");
        }

        if self.sound {
            let (frequency, duration) = cue.tone();
            if !self.device.tone(frequency, duration) {
                trace!(?cue, "Audio unsupported");
            }
        }
    }
}

/// A device with no capabilities.
pub struct NoDevice;

impl FeedbackDevice for NoDevice {
    fn vibrate(&mut self, _pattern: &[u64]) -> bool {
        false
    }

    fn tone(&mut self, _frequency_hz: f32, _duration: Duration) -> bool {
        false
    }
}

/// Rings the terminal bell for tones; cannot vibrate.
pub struct TerminalBell<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> FeedbackDevice for TerminalBell<W> {
    fn vibrate(&mut self, _pattern: &[u64]) -> bool {
        false
    }

    fn tone(&mut self, _frequency_hz: f32, _duration: Duration) -> bool {
        self.out.write_all(b"\x07").and_then(|()| self.out.flush()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::EvalError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl FeedbackDevice for Recorder {
        fn vibrate(&mut self, pattern: &[u64]) -> bool {
            self.events.lock().unwrap().push(format!("vibrate {:?}", pattern));
            true
        }

        fn tone(&mut self, frequency_hz: f32, duration: Duration) -> bool {
            self.events
                .lock()
                .unwrap()
                .push(format!("tone {} {}", frequency_hz, duration.as_millis()));
            true
        }
    }

    #[test]
    fn test_cue_for_outcome() {
        assert_eq!(Cue::for_outcome(&Outcome::Updated), Cue::Press);
        assert_eq!(
            Cue::for_outcome(&Outcome::Failed(EvalError::DivisionByZero)),
            Cue::Error
        );
    }

    #[test]
    fn test_plays_vibration_and_tone() {
        let recorder = Recorder::default();
        let mut feedback = Feedback::new(Box::new(recorder.clone()), true);
        feedback.play(Cue::Error);

        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, vec!["vibrate [50, 50, 50]", "tone 200 200"]);
    }

    #[test]
    fn test_sound_preference_suppresses_tone() {
        let recorder = Recorder::default();
        let mut feedback = Feedback::new(Box::new(recorder.clone()), false);
        feedback.play(Cue::Press);

        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, vec!["vibrate [10]"]);
    }

    #[test]
    fn test_unsupported_device_is_skipped() {
        let mut feedback = Feedback::silent();
        feedback.set_sound(true);
        feedback.play(Cue::Result);
        assert!(feedback.sound);
    }

    #[test]
    fn test_terminal_bell() {
        let mut bell = TerminalBell::new(Vec::new());
        assert!(!bell.vibrate(&[10]));
        assert!(bell.tone(440.0, Duration::from_millis(10)));
        assert_eq!(bell.out, b"\x07");
    }
}
