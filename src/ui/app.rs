//! Main TUI application state and logic

use crate::notes::Note;
use crate::session::Session;
use crate::ui::panes::{self, EditBuffer, SourceScrollState, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Speed change for one `+`/`-` press
const SPEED_STEP_MS: u64 = 100;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Notes,
    Source,
    Scene,
    Inputs,
}

impl FocusedPane {
    /// Move focus to the next pane (notes -> source -> inputs -> scene)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Notes => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Inputs,
            FocusedPane::Inputs => FocusedPane::Scene,
            FocusedPane::Scene => FocusedPane::Notes,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Notes => FocusedPane::Scene,
            FocusedPane::Source => FocusedPane::Notes,
            FocusedPane::Inputs => FocusedPane::Source,
            FocusedPane::Scene => FocusedPane::Inputs,
        }
    }
}

/// Keyboard mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a new value for `field`
    Editing { field: usize, buffer: String },
}

/// The main application state
pub struct App {
    /// The open note, its trace and the player
    pub session: Session,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub mode: Mode,

    /// Position in the notebook index
    pub note_cursor: usize,

    /// Selected input field
    pub field_cursor: usize,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub scene_scroll: usize,

    /// Last rejected edit, shown under the fields
    pub input_error: Option<String>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
    pub status_is_error: bool,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app around an opened session
    pub fn new(session: Session) -> Self {
        let note_cursor = panes::flat_notes()
            .iter()
            .position(|note| note.id() == session.note().id())
            .unwrap_or(0);

        App {
            session,
            focused_pane: FocusedPane::Notes,
            mode: Mode::Normal,
            note_cursor,
            field_cursor: 0,
            source_scroll: SourceScrollState::default(),
            scene_scroll: 0,
            input_error: None,
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Fire the playback timer if it is due
            if self.session.player.tick(Instant::now()) && !self.session.player.is_playing() {
                self.set_status("Playback complete");
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Notebook | Source + Inputs | Scene + Explanation
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(30),
                Constraint::Percentage(45),
                Constraint::Min(0),
            ])
            .split(pane_area);

        let middle_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(columns[2]);

        let note = self.session.note();

        panes::render_notes_pane(
            frame,
            columns[0],
            self.note_cursor,
            note.id(),
            self.focused_pane == FocusedPane::Notes,
        );

        let step = self.session.current();

        panes::render_source_pane(
            frame,
            middle_rows[0],
            note.title(),
            note.code(),
            step.as_ref().map_or("", |s| s.code_line),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let editing = match &self.mode {
            Mode::Editing { field, buffer } => Some(EditBuffer {
                field: *field,
                text: buffer,
            }),
            Mode::Normal => None,
        };
        panes::render_inputs_pane(
            frame,
            middle_rows[1],
            self.session.input(),
            self.field_cursor,
            editing,
            self.input_error.as_deref(),
            self.focused_pane == FocusedPane::Inputs,
        );

        if let Some(step) = &step {
            panes::render_scene_pane(
                frame,
                right_rows[0],
                step,
                self.focused_pane == FocusedPane::Scene,
                &mut self.scene_scroll,
            );
            panes::render_explanation(frame, right_rows[1], step);
        }

        panes::render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                is_error: self.status_is_error,
                current_step: self.session.player.index(),
                total_steps: self.session.player.len(),
                phase: step.as_ref().map_or("", |s| s.phase),
                speed_ms: self.session.player.speed_ms(),
                is_playing: self.session.player.is_playing(),
                is_editing: matches!(self.mode, Mode::Editing { .. }),
            },
        );
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if matches!(self.mode, Mode::Editing { .. }) {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if !self.session.player.step_forward() {
                        break;
                    }
                    stepped += 1;
                }
                self.set_status(format!("Stepped forward {} step(s)", stepped));
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                if self.session.player.step_back() {
                    self.set_status("Stepped backward");
                } else {
                    self.set_status("Already at the first step");
                }
            }
            KeyCode::Right => {
                if self.session.player.step_forward() {
                    self.set_status("Stepped forward");
                } else {
                    self.set_status("Already at the last step");
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Notes => {
                    self.note_cursor = self.note_cursor.saturating_sub(1);
                }
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Scene => {
                    self.scene_scroll = self.scene_scroll.saturating_sub(1);
                }
                FocusedPane::Inputs => {
                    self.field_cursor = self.field_cursor.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Notes => {
                    let last = panes::flat_notes().len().saturating_sub(1);
                    self.note_cursor = (self.note_cursor + 1).min(last);
                }
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Scene => {
                    self.scene_scroll = self.scene_scroll.saturating_add(1);
                }
                FocusedPane::Inputs => {
                    let last = self.session.input().fields().len().saturating_sub(1);
                    self.field_cursor = (self.field_cursor + 1).min(last);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.session.player.toggle_play(Instant::now());
                    if self.session.player.is_playing() {
                        self.set_status("Playing...");
                    } else {
                        self.set_status("Paused");
                    }
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self.session.player.speed_ms().saturating_sub(SPEED_STEP_MS);
                self.session.player.set_speed(speed);
                self.set_status(format!("Step every {}ms", self.session.player.speed_ms()));
            }
            KeyCode::Char('-') => {
                let speed = self.session.player.speed_ms() + SPEED_STEP_MS;
                self.session.player.set_speed(speed);
                self.set_status(format!("Step every {}ms", self.session.player.speed_ms()));
            }
            KeyCode::Char('e') => {
                self.focused_pane = FocusedPane::Inputs;
                self.begin_edit();
            }
            KeyCode::Enter => match self.focused_pane {
                FocusedPane::Notes => self.open_selected_note(),
                FocusedPane::Inputs => self.begin_edit(),
                FocusedPane::Source | FocusedPane::Scene => {
                    self.session.player.jump_to_end();
                    self.set_status("Jumped to end");
                }
            },
            KeyCode::Backspace => {
                self.session.player.reset();
                self.set_status("Jumped to start");
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Mode::Editing { field, buffer } = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.set_status("Edit cancelled");
            }
            KeyCode::Enter => {
                let field = *field;
                let text = std::mem::take(buffer);
                self.mode = Mode::Normal;
                self.commit_edit(field, &text);
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let Some(field) = self.session.input().fields().get(self.field_cursor) else {
            return;
        };
        self.mode = Mode::Editing {
            field: self.field_cursor,
            buffer: self.session.input().raw(field.key).to_string(),
        };
        self.set_status(format!("Editing {}", field.label));
    }

    fn commit_edit(&mut self, field: usize, text: &str) {
        let Some(key) = self.session.input().fields().get(field).map(|f| f.key) else {
            return;
        };

        match self.session.set_input(key, text) {
            Ok(()) => {
                self.input_error = None;
                self.scene_scroll = 0;
                self.set_status(format!(
                    "Regenerated {} steps",
                    self.session.trace().len()
                ));
            }
            Err(e) => {
                self.input_error = Some(e.to_string());
                self.set_error("Input rejected, previous trace kept");
            }
        }
    }

    fn open_selected_note(&mut self) {
        let Some(note) = panes::flat_notes().get(self.note_cursor).copied() else {
            return;
        };
        self.open_note(note);
    }

    fn open_note(&mut self, note: &'static dyn Note) {
        match Session::open(note, self.session.player.speed_ms()) {
            Ok(session) => {
                self.session = session;
                self.mode = Mode::Normal;
                self.field_cursor = 0;
                self.source_scroll = SourceScrollState::default();
                self.scene_scroll = 0;
                self.input_error = None;
                self.set_status(format!("Opened {}", note.title()));
            }
            Err(e) => {
                self.set_error(format!("Cannot open {}: {}", note.id(), e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::find;
    use crossterm::event::KeyModifiers;

    fn app(id: &str) -> App {
        let note = find(id).expect("note exists");
        App::new(Session::open(note, 500).expect("default input generates"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_arrow_keys_scrub() {
        let mut app = app("max-sum-window");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.player.index(), 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.session.player.index(), 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.player.index(), 0);
    }

    #[test]
    fn test_enter_on_notes_opens_selection() {
        let mut app = app("longest-unique-substring");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.note().id(), "max-sum-window");
    }

    #[test]
    fn test_edit_commit_and_rejection() {
        let mut app = app("coin-change");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Editing { field: 0, .. }));

        // replace "1, 2, 5" with "2"
        for _ in 0..16 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.session.input().raw("coins"), "2");
        assert_eq!(app.session.player.index(), 0);
        assert!(app.input_error.is_none());

        press(&mut app, KeyCode::Char('e'));
        for _ in 0..16 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.input_error.is_some());
        assert_eq!(app.session.input().raw("coins"), "2");
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = app("coin-change");
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.session.input().raw("coins"), "1, 2, 5");
    }
}
