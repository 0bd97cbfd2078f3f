use clacker::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{
        ClackEvent, ClackEventSource, Command, CrosstermEventSource, FixedTicker, Runner, Ticker,
    },
    session::{SessionConfig, TypingSession},
    stats::Summary,
    ui::SessionView,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
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
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// timed typing practice: one passage, live wpm, accuracy and errors
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of seconds the test runs for
    #[clap(short = 's', long)]
    secs: Option<u64>,

    /// milliseconds between countdown refreshes
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// custom passage to type
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// enable strict mode: a wrong key does not advance until corrected
    #[clap(long)]
    strict: bool,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save: bool,

    /// write logs to a file (default location when no path is given)
    #[clap(long, num_args = 0..=1, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.secs {
            cfg.time_limit_secs = secs;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_interval_ms = ms;
        }
        if let Some(prompt) = &self.prompt {
            cfg.passage_text = Some(prompt.clone());
        }
        if self.strict {
            cfg.strict = true;
        }
        cfg
    }
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub session: TypingSession<C>,
    pub summary: Option<Summary>,
}

impl App<SystemClock> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_session(TypingSession::new(config))
    }
}

impl<C: Clock> App<C> {
    pub fn with_session(session: TypingSession<C>) -> Self {
        Self {
            session,
            summary: None,
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.summary = None;
    }

    /// Apply one event. Returns false when the user asked to quit.
    pub fn handle_event(&mut self, event: ClackEvent) -> bool {
        match event {
            ClackEvent::Tick => {
                let now = self.session.clock().now();
                self.session.tick(now);
            }
            ClackEvent::Resize => {}
            ClackEvent::Key(key) => match Command::from(&key) {
                Command::Quit => return false,
                Command::Reset => self.reset(),
                Command::Input(input) => self.session.handle_key(input),
            },
        }

        if let Some(summary) = self.session.take_summary() {
            self.summary = Some(summary);
        }
        true
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CLACKER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        let path = log_file
            .clone()
            .or_else(AppDirs::log_path)
            .unwrap_or_else(|| PathBuf::from("clacker.log"));
        init_logging(&path)?;
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load_or_default());
    if cli.save {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let session_config = SessionConfig::from(&config);
    let ticker = FixedTicker::new(session_config.tick_interval());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), ticker);
    let mut app = App::new(session_config);
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, C: Clock, E: ClackEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    // ticks are only requested while a session is running
    while let Some(event) = runner.step(app.session.is_running()) {
        if !app.handle_event(event) {
            break;
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui<C: Clock>(app: &App<C>, f: &mut Frame) {
    f.render_widget(
        SessionView::new(&app.session).with_summary(app.summary.as_ref()),
        f.area(),
    );
}
