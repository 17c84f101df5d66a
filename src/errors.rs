//! Error types for input parsing and trace generation
//!
//! None of these are fatal. A rejected edit leaves the previous trace on
//! screen; the binary only reports them.

use thiserror::Error;

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A scalar field did not parse as an integer
    #[error("{field}: '{text}' is not a number")]
    NotANumber { field: &'static str, text: String },

    /// A list field has fewer usable values than required
    #[error("{field}: expected at least {min} value(s), got {got}")]
    TooFew {
        field: &'static str,
        min: usize,
        got: usize,
    },

    /// A choice field got a value outside its option set
    #[error("{field}: '{text}' is not one of {options}")]
    UnknownChoice {
        field: &'static str,
        text: String,
        options: String,
    },

    /// No field with this key exists on the note
    #[error("unknown field '{key}'")]
    UnknownField { key: String },

    /// The field exists but holds a different kind of input
    #[error("{field}: field kind mismatch")]
    KindMismatch { field: &'static str },
}

/// Recorder failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// A generator finished without emitting its initial step
    #[error("generator emitted no steps")]
    Empty,

    /// Step history limit exceeded
    #[error("step limit exceeded: more than {limit} steps")]
    StepLimitExceeded { limit: usize },
}

/// Anything that can stop a note from producing a trace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Trace(#[from] TraceError),
}
