//! # Roomkeeper Core Library
//!
//! This library provides the core logic for Roomkeeper, a game master's aid
//! for in-person escape rooms: one countdown timer and a bank of hints gated
//! by a usage quota and a shared admin code. The `roomkeeper` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based countdown that derives remaining
//!   time from a persisted start timestamp; the caller invokes `tick()`
//! - **Hint Ledger**: Hint dictionary plus used/bonus counters and the quota rule
//! - **Admin Session**: Transient elevated mode with a one-shot add permit
//! - **Storage**: Named slots in a key-value store (SQLite or in-memory) and
//!   TOML configuration
//! - **Presentation**: Port through which granted hints are shown
//!
//! ## Key Components
//!
//! - [`GameMaster`]: Application state tying the components together
//! - [`TimerEngine`]: Countdown state machine
//! - [`HintLedger`]: Quota bookkeeping
//! - [`KeyValueStore`]: Persistence port
//! - [`PresentationPort`]: Hint display port

pub mod admin;
pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod hints;
pub mod presentation;
pub mod storage;
pub mod timer;

pub use admin::{AdminPolicy, AdminSession};
pub use app::GameMaster;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, GameError, SlotError, StorageError};
pub use events::Event;
pub use hints::{HintCode, HintDictionary, HintLedger, HintRecord, HintUse, QuotaStatus, RemoveOutcome};
pub use presentation::{
    render_document, resolve_link, DocumentPresenter, HintView, LinkPresenter, NullPresenter,
    PresentationPort,
};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, PresentationMode, Slot};
pub use timer::{Ticker, TimerEngine, TimerState};
