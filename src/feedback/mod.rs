//! Session feedback: speech, vibration, tones, screen hold and ambience.
//!
//! The [`Feedback`] trait is the platform capability; the
//! [`FeedbackDispatcher`] turns timer events into calls on it.

pub mod dispatcher;
#[cfg(test)]
pub mod recording;
pub mod terminal;
pub mod traits;

pub use dispatcher::{
    completion_prompt, FeedbackDispatcher, FeedbackStatus, FAR_PROMPT, NEAR_PROMPT, START_PROMPT,
};
pub use terminal::TerminalFeedback;
pub use traits::{Feedback, SpeechOptions, SPEECH_PITCH};
