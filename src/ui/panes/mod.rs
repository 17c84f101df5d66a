//! TUI pane rendering modules
//!
//! Each pane is a render function over the current step plus whatever static
//! data it needs. Scroll offsets and the edit buffer live in [`App`] and are
//! passed in.
//!
//! # Pane Modules
//!
//! - [`notes`]: Notebook index grouped by topic
//! - [`source`]: Reference code with the active lines highlighted
//! - [`scene`]: Visualization of the current step and its explanation
//! - [`inputs`]: Editable fields of the open note
//! - [`status`]: Status bar with keybindings and playback state
//!
//! [`App`]: crate::ui::App

pub mod inputs;
pub mod notes;
pub mod scene;
pub mod source;
pub mod status;

pub use inputs::{render_inputs_pane, EditBuffer};
pub use notes::{flat_notes, render_notes_pane};
pub use scene::{render_explanation, render_scene_pane};
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
