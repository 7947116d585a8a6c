//! Runs one training session against a trigger.
//!
//! The host owns the only source of ticks. It waits on its [`Trigger`],
//! ticks the timer once per [`Signal::Tick`], forwards the resulting events
//! to the feedback dispatcher and stops on completion or on
//! [`Signal::Exit`]. The trigger is consumed with the host, so both exit
//! paths release it.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::{CompletionSummary, SessionRecorder, SessionTimer, TimerEvent};
use crate::feedback::{Feedback, FeedbackDispatcher};

/// What the host should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// One second elapsed.
    Tick,
    /// The user asked to stop early.
    Exit,
    /// The user toggled mute.
    ToggleMute,
}

impl Signal {
    /// Parse a typed command. Unknown input yields `None`.
    pub fn from_command(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "q" | "quit" | "exit" => Some(Signal::Exit),
            "m" | "mute" => Some(Signal::ToggleMute),
            _ => None,
        }
    }
}

/// Source of host signals.
pub trait Trigger {
    /// Block until the next signal.
    fn next_signal(&mut self) -> Signal;
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Ran to the end and was recorded.
    Completed {
        cycles_completed: u32,
        summary: CompletionSummary,
    },
    /// Stopped early; nothing was recorded.
    Abandoned,
}

/// One-second trigger that also carries commands from a channel.
///
/// Commands arriving between ticks are returned immediately; ticks stay on
/// a fixed schedule. A zero interval ticks as fast as the host asks.
pub struct IntervalTrigger {
    interval: Duration,
    commands: Option<Receiver<Signal>>,
    next_tick: Instant,
}

impl IntervalTrigger {
    pub fn new(interval: Duration, commands: Option<Receiver<Signal>>) -> Self {
        Self {
            interval,
            commands,
            next_tick: Instant::now() + interval,
        }
    }

    /// A one-second trigger fed by commands typed on stdin.
    pub fn with_stdin(interval: Duration) -> Self {
        Self::new(interval, Some(spawn_stdin_commands()))
    }

    fn tick(&mut self) -> Signal {
        self.next_tick += self.interval;
        Signal::Tick
    }
}

impl Trigger for IntervalTrigger {
    fn next_signal(&mut self) -> Signal {
        let now = Instant::now();
        let wait = self.next_tick.saturating_duration_since(now);

        let Some(rx) = &self.commands else {
            thread::sleep(wait);
            return self.tick();
        };

        if wait.is_zero() {
            if let Ok(signal) = rx.try_recv() {
                return signal;
            }
            return self.tick();
        }

        match rx.recv_timeout(wait) {
            Ok(signal) => signal,
            Err(RecvTimeoutError::Timeout) => self.tick(),
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("command channel closed, ticking only");
                self.commands = None;
                thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.tick()
            }
        }
    }
}

/// Read commands from stdin on a helper thread.
///
/// The thread ends at end of input or once the receiver is dropped and the
/// next line arrives.
pub fn spawn_stdin_commands() -> Receiver<Signal> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if let Some(signal) = Signal::from_command(&line) {
                if tx.send(signal).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Replays a fixed list of signals, then exits.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrigger {
    signals: std::collections::VecDeque<Signal>,
}

impl ScriptedTrigger {
    pub fn new(signals: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            signals: signals.into_iter().collect(),
        }
    }

    /// `count` ticks followed by an exit.
    pub fn ticks(count: usize) -> Self {
        Self::new(std::iter::repeat(Signal::Tick).take(count))
    }
}

impl Trigger for ScriptedTrigger {
    fn next_signal(&mut self) -> Signal {
        self.signals.pop_front().unwrap_or(Signal::Exit)
    }
}

/// Drives one session.
pub struct SessionHost<T: Trigger> {
    trigger: T,
}

impl<T: Trigger> SessionHost<T> {
    pub fn new(trigger: T) -> Self {
        Self { trigger }
    }

    /// Run `timer` to completion or until an exit signal.
    ///
    /// `on_tick` sees the timer after every tick, for progress display.
    pub fn run<R, F>(
        mut self,
        mut timer: SessionTimer<R>,
        dispatcher: &mut FeedbackDispatcher<F>,
        mut on_tick: impl FnMut(&SessionTimer<R>),
    ) -> SessionOutcome
    where
        R: SessionRecorder,
        F: Feedback,
    {
        dispatcher.session_started();

        loop {
            match self.trigger.next_signal() {
                Signal::Tick => {
                    let events = timer.tick();
                    for event in &events {
                        dispatcher.handle(event);
                    }
                    on_tick(&timer);

                    for event in events {
                        if let TimerEvent::SessionComplete {
                            cycles_completed,
                            summary,
                        } = event
                        {
                            return SessionOutcome::Completed {
                                cycles_completed,
                                summary,
                            };
                        }
                    }
                }
                Signal::Exit => {
                    timer.abandon();
                    dispatcher.session_abandoned();
                    return SessionOutcome::Abandoned;
                }
                Signal::ToggleMute => {
                    dispatcher.toggle_mute();
                }
            }
        }
    }
}
