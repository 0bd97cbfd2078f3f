// Library surface for the binary and for headless/integration tests.
// The core (session, stats, normalize, passage) has no terminal dependency.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod normalize;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod ui;

pub use session::{AdvanceMode, CharResult, KeyInput, SessionConfig, TypingSession};
pub use stats::{FinishReason, StatsSnapshot, Summary};
