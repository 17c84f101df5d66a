// algonote: step-by-step algorithm visualizers in the terminal

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;

use algonote::input::InputSet;
use algonote::notes::{self, Note};
use algonote::player::DEFAULT_SPEED_MS;
use algonote::session::Session;
use algonote::ui::App;

/// Step through classic algorithms one state change at a time.
#[derive(Parser, Debug)]
#[command(name = "algonote", version, about)]
struct Cli {
    /// Note to open (see --list); defaults to the first note
    note: Option<String>,

    /// Milliseconds between steps during playback
    #[arg(long, default_value_t = DEFAULT_SPEED_MS)]
    speed: u64,

    /// Override an input field, e.g. --set "nums=1, 2, 3"
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    /// Print the notebook and exit
    #[arg(long)]
    list: bool,

    /// Print the trace of the chosen note as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // The TUI owns the terminal, so logs only go to stderr in one-shot modes
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.list || cli.dump {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn print_notebook() {
    for (topic, notes) in notes::by_topic() {
        println!("{}", topic);
        for note in notes {
            println!("  {:<28} {}", note.id(), note.title());
        }
    }
}

/// Apply `--set` overrides; a note whose overridden input fails to generate
/// falls back to its defaults
fn open_session(
    note: &'static dyn Note,
    overrides: &[(String, String)],
    speed: u64,
) -> Result<Session, Box<dyn Error>> {
    let mut input: InputSet = note.default_input();
    for (key, value) in overrides {
        if let Err(e) = input.set(key, value.as_str()) {
            eprintln!("Warning: ignoring --set {}: {}", key, e);
        }
    }

    match Session::with_input(note, input, speed) {
        Ok(session) => Ok(session),
        Err(e) => {
            eprintln!("Warning: {}; using the default input", e);
            Ok(Session::open(note, speed)?)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.list {
        print_notebook();
        return Ok(());
    }

    let note = match &cli.note {
        Some(id) => match notes::find(id) {
            Some(note) => note,
            None => {
                eprintln!("Error: unknown note '{}'", id);
                eprintln!("Run `algonote --list` to see the available notes.");
                std::process::exit(1);
            }
        },
        None => notes::notebook()
            .first()
            .copied()
            .ok_or("the notebook is empty")?,
    };

    let session = open_session(note, &cli.overrides, cli.speed)?;

    if cli.dump {
        println!("{}", session.trace().to_json()?);
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
