use std::io::{self, Write};

use placer::{
    CancelFlag, DispatchConfig, DispatchError, DispatchOutcome, Dispatcher, InjectError, Injector,
    WriterInjector,
};

#[derive(Default)]
struct Recorder {
    sent: Vec<String>,
    fail_on: Option<usize>,
    cancel_after: Option<(usize, CancelFlag)>,
}

impl Injector for Recorder {
    fn send(&mut self, command: &str) -> Result<(), InjectError> {
        if self.fail_on == Some(self.sent.len() + 1) {
            return Err(InjectError::Custom("target went away".into()));
        }
        self.sent.push(command.to_string());
        if let Some((after, flag)) = &self.cancel_after {
            if self.sent.len() == *after {
                flag.cancel();
            }
        }
        Ok(())
    }
}

#[test]
fn sends_every_command_in_order() {
    let mut recorder = Recorder::default();
    let report = {
        let mut dispatcher =
            Dispatcher::new(&mut recorder, DispatchConfig::immediate(), CancelFlag::new());
        dispatcher.dispatch(&["one", "two", "three"]).expect("dispatch failed")
    };

    assert_eq!(report.sent, 3);
    assert_eq!(report.outcome, DispatchOutcome::Completed);
    assert_eq!(recorder.sent, vec!["one", "two", "three"]);
}

#[test]
fn cancellation_stops_further_commands() {
    let cancel = CancelFlag::new();
    let recorder = Recorder {
        cancel_after: Some((2, cancel.clone())),
        ..Recorder::default()
    };
    let mut dispatcher = Dispatcher::new(recorder, DispatchConfig::immediate(), cancel);
    let report = dispatcher.dispatch(&["a", "b", "c", "d"]).expect("dispatch failed");

    assert_eq!(report.sent, 2);
    assert_eq!(report.outcome, DispatchOutcome::Interrupted);
    assert_eq!(dispatcher.into_injector().sent, vec!["a", "b"]);
}

#[test]
fn cancelled_before_start_sends_nothing() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let mut dispatcher = Dispatcher::new(Recorder::default(), DispatchConfig::immediate(), cancel);
    let report = dispatcher.dispatch(&["a"]).expect("dispatch failed");
    assert_eq!(report.sent, 0);
    assert_eq!(report.outcome, DispatchOutcome::Interrupted);
}

#[test]
fn injector_failure_aborts_without_retry() {
    let recorder = Recorder {
        fail_on: Some(2),
        ..Recorder::default()
    };
    let mut dispatcher = Dispatcher::new(recorder, DispatchConfig::immediate(), CancelFlag::new());
    let err = dispatcher.dispatch(&["a", "b", "c"]).unwrap_err();

    let DispatchError::Inject { index, command, .. } = &err;
    assert_eq!(*index, 2);
    assert_eq!(command, "b");
    assert!(err.to_string().contains("command 2"));
    assert_eq!(dispatcher.into_injector().sent, vec!["a"]);
}

#[test]
fn empty_dispatch_completes() {
    let mut dispatcher = Dispatcher::new(Recorder::default(), DispatchConfig::immediate(), CancelFlag::new());
    let report = dispatcher.dispatch::<&str>(&[]).expect("dispatch failed");
    assert_eq!(report.sent, 0);
    assert_eq!(report.outcome, DispatchOutcome::Completed);
}

#[test]
fn writer_injector_types_each_command_on_its_own_line() {
    let config = DispatchConfig::immediate();
    let mut dispatcher = Dispatcher::new(
        WriterInjector::new(Vec::new(), &config),
        config.clone(),
        CancelFlag::new(),
    );
    dispatcher
        .dispatch(&["say hi", "setblock 0 60 0 minecraft:stone replace"])
        .expect("dispatch failed");

    let written = String::from_utf8(dispatcher.into_injector().into_inner()).unwrap();
    assert_eq!(written, "say hi\nsetblock 0 60 0 minecraft:stone replace\n");
}

#[test]
fn writer_injector_keeps_multibyte_characters_intact() {
    let config = DispatchConfig {
        char_delay_ms: 1,
        ..DispatchConfig::immediate()
    };
    let mut injector = WriterInjector::new(Vec::new(), &config);
    injector.send("say ✓ 日本").expect("send failed");
    assert_eq!(String::from_utf8(injector.into_inner()).unwrap(), "say ✓ 日本\n");
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn writer_errors_surface_as_inject_errors() {
    let config = DispatchConfig::immediate();
    let mut injector = WriterInjector::new(BrokenPipe, &config);
    assert!(matches!(injector.send("say hi"), Err(InjectError::Io(_))));
}

#[test]
fn default_pacing_matches_interactive_use() {
    let config = DispatchConfig::default();
    assert_eq!(config.focus_wait().as_millis(), 3000);
    assert_eq!(config.command_delay().as_millis(), 300);
    assert_eq!(config.char_delay_ms, 5);
}
