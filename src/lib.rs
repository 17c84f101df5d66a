//! # Introduction
//!
//! algonote is a notebook of algorithm visualizers. Each note runs an
//! instrumented algorithm over user-editable input, records a snapshot of its
//! state at every meaningful step, and lets the user scrub through the
//! resulting trace in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Input text → InputSet → Note::generate → Trace → Player → Scene → TUI
//! ```
//!
//! 1. [`input`]: field declarations and lenient parsing of the typed text.
//! 2. [`notes`]: the notebook. Every note owns a generator, reference code and
//!    its input fields.
//! 3. [`trace`]: the [`trace::Recorder`] the generators emit into and the
//!    immutable [`trace::Trace`] it produces.
//! 4. [`player`]: the scrubber state machine with its playback timer.
//! 5. [`scene`]: the renderer-neutral description of one step.
//! 6. [`session`]: one open note with its input, trace and player.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Topics
//!
//! Sliding window, monotonic stack, binary search on the answer, DP
//! tabulation, graphs, tree recursion and SQL joins.

pub mod errors;
pub mod input;
pub mod notes;
pub mod player;
pub mod scene;
pub mod session;
pub mod trace;
pub mod ui;
