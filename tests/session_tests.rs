// Integration tests for input editing on an open note

use algonote::errors::{InputError, NoteError};
use algonote::notes::{find, notebook};
use algonote::session::Session;
use proptest::prelude::*;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn open(id: &str) -> Session {
    Session::open(find(id).expect("note exists"), 100).expect("default input generates")
}

#[test]
fn test_every_note_opens_at_step_zero() {
    for note in notebook() {
        let session = Session::open(*note, 100).expect("default input generates");
        let step = session.current().expect("trace is never empty");
        assert!(step.is_first());
        assert!(!session.player.is_playing());
        assert!(session.trace().len() >= 2, "{} recorded too few steps", note.id());
    }
}

#[test]
fn test_input_change_while_playing_restarts() {
    let mut session = open("next-greater-element");
    let start = Instant::now();
    session.player.toggle_play(start);
    session.player.tick(start + Duration::from_millis(100));
    assert_eq!(session.player.index(), 1);

    session.set_input("nums", "5, 4, 3").expect("valid input");
    assert_eq!(session.player.index(), 0);
    assert!(!session.player.is_playing());
    assert!(session.player.next_tick().is_none());
    assert_eq!(session.player.len(), session.trace().len());
    assert_eq!(session.input().raw("nums"), "5, 4, 3");
}

#[test]
fn test_rejected_input_keeps_previous_trace() {
    let mut session = open("coin-change");
    session.player.step_forward();
    session.player.step_forward();
    let before = session.trace().to_json().expect("serializes");

    let err = session.set_input("amount", "many").unwrap_err();
    assert!(matches!(
        err,
        NoteError::Input(InputError::NotANumber { .. })
    ));
    assert_eq!(session.trace().to_json().expect("serializes"), before);
    assert_eq!(session.player.index(), 2);
    assert_eq!(session.input().raw("amount"), "11");
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut session = open("sql-join");
    let err = session.set_input("where", "1").unwrap_err();
    assert!(matches!(err, NoteError::Input(InputError::UnknownField { .. })));
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

fn warnings_while(run: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    logs.text()
}

#[test]
fn test_every_rejection_is_logged() {
    let mut session = open("sql-join");
    let unknown = warnings_while(|| {
        assert!(session.set_input("where", "1").is_err());
    });
    assert!(unknown.contains("input rejected"), "no warning in {:?}", unknown);
    assert!(unknown.contains("where"));

    let mut session = open("coin-change");
    let unparsable = warnings_while(|| {
        assert!(session.set_input("amount", "many").is_err());
    });
    assert!(unparsable.contains("input rejected"), "no warning in {:?}", unparsable);

    let accepted = warnings_while(|| {
        session.set_input("amount", "7").expect("valid input");
    });
    assert!(accepted.is_empty());
}

#[test]
fn test_lenient_parsing_drops_junk() {
    let mut session = open("max-sum-window");
    session
        .set_input("nums", "4, x, 7,, 1")
        .expect("junk tokens are skipped");
    let first = session.current().expect("step");
    assert!(first.is_first());
    assert_eq!(session.input().raw("nums"), "4, x, 7,, 1");
}

proptest! {
    #[test]
    fn any_accepted_numbers_regenerate(values in prop::collection::vec(-100i64..=100, 1..10)) {
        let mut session = open("next-greater-element");
        let text = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        session.set_input("nums", &text).expect("values within bounds");
        prop_assert_eq!(session.player.index(), 0);
        prop_assert!(session.trace().len() >= 2);
        let last = session.trace().step(session.trace().len() - 1).expect("last step");
        prop_assert!(last.is_last());
    }
}
