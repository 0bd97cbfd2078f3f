use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::KeyInput;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum ClackEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// What the host should do with a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reset,
    Input(KeyInput),
}

impl From<&KeyEvent> for Command {
    fn from(key: &KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return Command::Input(KeyInput::Other);
        }
        match key.code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
            KeyCode::Tab => Command::Reset,
            KeyCode::Backspace => Command::Input(KeyInput::Backspace),
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Command::Input(KeyInput::Other)
            }
            KeyCode::Char(c) => Command::Input(KeyInput::Char(c)),
            _ => Command::Input(KeyInput::Other),
        }
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait ClackEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<ClackEvent, RecvTimeoutError>;

    /// Block until an event arrives.
    fn recv(&self) -> Result<ClackEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<ClackEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(ClackEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(ClackEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(%err, "terminal event stream closed");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ClackEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ClackEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<ClackEvent, RecvError> {
        self.rx.recv()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<ClackEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ClackEvent>) -> Self {
        Self { rx }
    }
}

impl ClackEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ClackEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<ClackEvent, RecvError> {
        self.rx.recv()
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are not a background timer: they are synthesized when waiting for
/// input times out, and only while the caller asks for them. Once a session
/// stops running, `step(false)` blocks on input alone, so nothing keeps
/// firing after finish.
pub struct Runner<E: ClackEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Option<Instant>>,
}

impl<E: ClackEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            next_tick: Cell::new(None),
        }
    }

    /// Returns the next event. While `ticking`, yields `Tick` whenever the
    /// interval elapses without input. `None` means the source is gone.
    pub fn step(&self, ticking: bool) -> Option<ClackEvent> {
        if !ticking {
            self.next_tick.set(None);
            return self.event_source.recv().ok();
        }

        let now = Instant::now();
        let deadline = match self.next_tick.get() {
            Some(d) => d,
            None => {
                let d = now + self.ticker.interval();
                self.next_tick.set(Some(d));
                d
            }
        };

        match self
            .event_source
            .recv_timeout(deadline.saturating_duration_since(now))
        {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.next_tick
                    .set(Some(Instant::now() + self.ticker.interval()));
                Some(ClackEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
