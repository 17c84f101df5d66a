//! One open note: its inputs, its current trace and the player over it

use crate::errors::NoteError;
use crate::input::InputSet;
use crate::notes::Note;
use crate::player::Player;
use crate::trace::{StepView, TraceView};
use std::fmt;

pub struct Session {
    note: &'static dyn Note,
    input: InputSet,
    trace: Box<dyn TraceView>,
    pub player: Player,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("note", &self.note.id())
            .field("input", &self.input)
            .field("steps", &self.trace.len())
            .field("player", &self.player)
            .finish()
    }
}

impl Session {
    /// Open a note with its default input
    pub fn open(note: &'static dyn Note, speed_ms: u64) -> Result<Self, NoteError> {
        Session::with_input(note, note.default_input(), speed_ms)
    }

    /// Open a note with a prepared input
    pub fn with_input(
        note: &'static dyn Note,
        input: InputSet,
        speed_ms: u64,
    ) -> Result<Self, NoteError> {
        let trace = note.generate(&input)?;
        tracing::info!(note = note.id(), steps = trace.len(), "note opened");
        let player = Player::new(trace.len(), speed_ms);
        Ok(Session {
            note,
            input,
            trace,
            player,
        })
    }

    pub fn note(&self) -> &'static dyn Note {
        self.note
    }

    pub fn input(&self) -> &InputSet {
        &self.input
    }

    pub fn trace(&self) -> &dyn TraceView {
        self.trace.as_ref()
    }

    /// Edit one field and regenerate.
    ///
    /// On failure nothing changes: the previous input, trace and player
    /// position stay as they were.
    pub fn set_input(&mut self, key: &str, text: &str) -> Result<(), NoteError> {
        let (input, trace) = match self.regenerate(key, text) {
            Ok(regenerated) => regenerated,
            Err(e) => {
                tracing::warn!(note = self.note.id(), field = key, error = %e, "input rejected");
                return Err(e);
            }
        };

        tracing::info!(note = self.note.id(), field = key, steps = trace.len(), "trace regenerated");
        self.input = input;
        self.trace = trace;
        self.player.load(self.trace.len());
        Ok(())
    }

    fn regenerate(
        &self,
        key: &str,
        text: &str,
    ) -> Result<(InputSet, Box<dyn TraceView>), NoteError> {
        let mut input = self.input.clone();
        input.set(key, text)?;
        let trace = self.note.generate(&input)?;
        Ok((input, trace))
    }

    /// The step under the player's index
    pub fn current(&self) -> Option<StepView<'_>> {
        self.trace.step(self.player.index())
    }
}
