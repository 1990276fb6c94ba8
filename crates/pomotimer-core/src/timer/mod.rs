mod driver;
mod engine;
mod lifecycle;
mod mode;
mod session;
mod state;

pub use driver::{TimerDriver, DEFAULT_TICK_INTERVAL};
pub use engine::TimerEngine;
pub use lifecycle::{AppState, LifecycleTracker};
pub use mode::{AlertText, SessionMode, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};
pub use session::{SessionTimer, TimerSettings};
pub use state::{format_clock, seconds_until, TimerState};
