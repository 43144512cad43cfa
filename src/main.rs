pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod feedback;
pub mod logger;
pub mod question;
pub mod quiz;
pub mod runtime;
pub mod ui;
pub mod util;

use crate::app_dirs::AppDirs;
use crate::celebration::Celebration;
use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::feedback::{notify, BellNotifier, Notifier, SilentNotifier};
use crate::quiz::{Phase, Quiz};
use crate::runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// sleek arithmetic quiz tui
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A sleek arithmetic quiz TUI: ten timed questions across six operation kinds, distractor answers tuned to common mistakes, and a scored results breakdown."
)]
pub struct Cli {
    /// disable the feedback bell for this run
    #[clap(short = 'q', long)]
    quiet: bool,

    /// skip the perfect-run celebration for this run
    #[clap(long)]
    no_celebration: bool,

    /// append game events to the log file
    #[clap(long)]
    log: bool,
}

#[derive(Debug)]
pub struct App {
    pub quiz: Quiz,
    pub celebration: Celebration,
    pub config: Config,
    store: FileConfigStore,
}

impl App {
    pub fn new(config: Config, store: FileConfigStore) -> Self {
        Self {
            quiz: Quiz::new(),
            celebration: Celebration::new(),
            config,
            store,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: Config) -> Self {
        let path = std::env::temp_dir().join("matho_test_config.json");
        Self::new(config, FileConfigStore::with_path(path))
    }

    pub fn notifier(&self) -> Box<dyn Notifier> {
        if self.config.bell {
            Box::new(BellNotifier)
        } else {
            Box::new(SilentNotifier)
        }
    }

    /// The session just reached Ended: log the outcome and, on a perfect
    /// run, kick off the celebration
    pub fn on_quiz_end(&mut self, width: u16, height: u16) {
        log::info!("quiz ended with score {}", self.quiz.score);
        if self.config.celebration && self.quiz.is_perfect() {
            self.celebration.start(width, height);
        }
    }
}

/// Whether the key handler wants the loop to keep going
#[derive(Debug, PartialEq, Eq)]
enum KeyFlow {
    Continue,
    Exit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if cli.log {
        match AppDirs::log_path() {
            Some(path) => {
                if let Err(e) = logger::init(&path) {
                    eprintln!("matho: could not open log file: {e}");
                }
            }
            None => eprintln!("matho: no usable log directory"),
        }
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if cli.quiet {
        config.bell = false;
    }
    if cli.no_celebration {
        config.celebration = false;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, store);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            QuizEvent::Tick => {
                let was_in_progress = app.quiz.phase == Phase::InProgress;

                if let Some(outcome) = app.quiz.on_tick() {
                    notify(app.notifier().as_ref(), outcome);
                    log::info!("time up on question {}", app.quiz.history.len());
                }

                if was_in_progress && app.quiz.has_ended() {
                    let size = terminal.size().unwrap_or_default();
                    app.on_quiz_end(size.width, size.height);
                }

                app.celebration.update();

                // only redraw when something on screen can change
                if app.celebration.is_active || app.quiz.phase == Phase::InProgress {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            QuizEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            QuizEvent::Key(key) => {
                if handle_key(app, key) == KeyFlow::Exit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyFlow {
    if key.code == KeyCode::Esc {
        return KeyFlow::Exit;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyFlow::Exit;
    }

    match app.quiz.phase {
        Phase::NotStarted => match key.code {
            KeyCode::Char('s') | KeyCode::Enter => {
                app.quiz.start();
                log::info!("quiz started");
            }
            KeyCode::Char('q') => return KeyFlow::Exit,
            _ => {}
        },
        Phase::InProgress => {
            if let KeyCode::Char(c @ '1'..='4') = key.code {
                let slot = c as usize - '1' as usize;
                let option = app
                    .quiz
                    .current_question()
                    .and_then(|q| q.options.get(slot))
                    .copied();
                if let Some(option) = option {
                    if let Some(outcome) = app.quiz.select_answer(option) {
                        notify(app.notifier().as_ref(), outcome);
                        log::info!(
                            "question {} resolved {:?}, score {}",
                            app.quiz.history.len(),
                            outcome,
                            app.quiz.score
                        );
                    }
                }
            }
        }
        Phase::Ended => match key.code {
            KeyCode::Char('r') => {
                app.quiz.restart();
                app.celebration.is_active = false;
                log::info!("quiz restarted");
            }
            KeyCode::Char('q') => return KeyFlow::Exit,
            KeyCode::Char('b') => {
                app.config.bell = !app.config.bell;
                if let Err(e) = app.store.save(&app.config) {
                    log::warn!("could not save config: {e}");
                }
            }
            KeyCode::Char('c') => {
                app.config.celebration = !app.config.celebration;
                if let Err(e) = app.store.save(&app.config) {
                    log::warn!("could not save config: {e}");
                }
            }
            _ => {}
        },
    }

    KeyFlow::Continue
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
