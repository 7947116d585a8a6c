//! Text-mode [`Feedback`] for the command-line host.
//!
//! Prompts are printed instead of spoken and the countdown tone is the
//! terminal bell. A terminal has no haptics and no audio player, so
//! vibration is a no-op and ambient tracks report as unavailable.

use std::io::{self, Write};

use crate::error::{FarsightError, Result};
use crate::feedback::{Feedback, SpeechOptions};

/// Feedback written to a terminal stream.
#[derive(Debug)]
pub struct TerminalFeedback<W: Write> {
    out: W,
}

impl TerminalFeedback<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, channel: &'static str, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| FarsightError::feedback(channel, e.to_string()))
    }
}

impl<W: Write> Feedback for TerminalFeedback<W> {
    fn speak(&mut self, text: &str, _options: &SpeechOptions) -> Result<()> {
        self.emit("speech", &format!("» {}\n", text))
    }

    fn vibrate(&mut self, pattern: &[u32]) -> Result<()> {
        tracing::trace!(?pattern, "vibration skipped in terminal");
        Ok(())
    }

    fn beep(&mut self, _frequency_hz: u32, _duration_ms: u32) -> Result<()> {
        self.emit("tone", "\x07")
    }

    fn request_screen_hold(&mut self) -> Result<()> {
        Ok(())
    }

    fn release_screen_hold(&mut self) -> Result<()> {
        Ok(())
    }

    fn play_ambient(&mut self, track: &str) -> Result<()> {
        Err(FarsightError::feedback(
            "ambient audio",
            format!("cannot play {} in a terminal", track),
        ))
    }

    fn stop_ambient(&mut self) -> Result<()> {
        Ok(())
    }
}
