mod engine;
mod ticker;

pub use engine::{TimerEngine, TimerState};
pub use ticker::{Ticker, DEFAULT_TICK_INTERVAL};
