use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, InjectError};

/// Delivers one finished command to the target application.
pub trait Injector {
    fn send(&mut self, command: &str) -> Result<(), InjectError>;
}

impl<T: Injector + ?Sized> Injector for &mut T {
    fn send(&mut self, command: &str) -> Result<(), InjectError> {
        (**self).send(command)
    }
}

/// Pacing for the dispatcher and the writer injector, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Time given to bring the target window to the front.
    pub focus_wait_ms: u64,
    /// Pause after opening the input line, before typing.
    pub open_delay_ms: u64,
    pub char_delay_ms: u64,
    /// Pause after typing, before submitting.
    pub submit_delay_ms: u64,
    /// Pause after each submitted command.
    pub command_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            focus_wait_ms: 3000,
            open_delay_ms: 400,
            char_delay_ms: 5,
            submit_delay_ms: 100,
            command_delay_ms: 300,
        }
    }
}

impl DispatchConfig {
    /// No waiting at all.
    pub fn immediate() -> Self {
        DispatchConfig {
            focus_wait_ms: 0,
            open_delay_ms: 0,
            char_delay_ms: 0,
            submit_delay_ms: 0,
            command_delay_ms: 0,
        }
    }

    pub fn focus_wait(&self) -> Duration {
        Duration::from_millis(self.focus_wait_ms)
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// Shared stop request, set from a signal handler and polled by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    /// Stopped on request; the remaining commands were not sent.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub outcome: DispatchOutcome,
}

/// Feeds commands to an injector one at a time.
pub struct Dispatcher<I: Injector> {
    injector: I,
    config: DispatchConfig,
    cancel: CancelFlag,
}

impl<I: Injector> Dispatcher<I> {
    pub fn new(injector: I, config: DispatchConfig, cancel: CancelFlag) -> Self {
        Dispatcher {
            injector,
            config,
            cancel,
        }
    }

    /// Send `commands` in order.
    ///
    /// A failed send stops the run; commands that were already delivered are
    /// not retried.
    pub fn dispatch<S: AsRef<str>>(
        &mut self,
        commands: &[S],
    ) -> Result<DispatchReport, DispatchError> {
        let mut sent = 0;
        for command in commands {
            if self.cancel.is_cancelled() {
                tracing::info!(sent, remaining = commands.len() - sent, "dispatch interrupted");
                return Ok(DispatchReport {
                    sent,
                    outcome: DispatchOutcome::Interrupted,
                });
            }

            let command = command.as_ref();
            tracing::debug!(index = sent + 1, %command, "sending command");
            self.injector
                .send(command)
                .map_err(|source| DispatchError::Inject {
                    index: sent + 1,
                    command: command.to_string(),
                    source,
                })?;
            sent += 1;
            pause(self.config.command_delay());
        }

        Ok(DispatchReport {
            sent,
            outcome: DispatchOutcome::Completed,
        })
    }

    pub fn into_injector(self) -> I {
        self.injector
    }
}

/// Types commands into a writer: one character at a time, then a newline.
pub struct WriterInjector<W: Write> {
    writer: W,
    open_delay: Duration,
    char_delay: Duration,
    submit_delay: Duration,
}

impl<W: Write> WriterInjector<W> {
    pub fn new(writer: W, config: &DispatchConfig) -> Self {
        WriterInjector {
            writer,
            open_delay: Duration::from_millis(config.open_delay_ms),
            char_delay: Duration::from_millis(config.char_delay_ms),
            submit_delay: Duration::from_millis(config.submit_delay_ms),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Injector for WriterInjector<W> {
    fn send(&mut self, command: &str) -> Result<(), InjectError> {
        pause(self.open_delay);
        let mut buf = [0u8; 4];
        for c in command.chars() {
            self.writer.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            if !self.char_delay.is_zero() {
                self.writer.flush()?;
                thread::sleep(self.char_delay);
            }
        }
        pause(self.submit_delay);
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// The window-focus step: a fixed wait before anything is sent.
pub fn wait_for_focus(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    tracing::info!(
        seconds = delay.as_secs_f64(),
        "bring the target window to the foreground and open it for command input"
    );
    thread::sleep(delay);
}
