pub mod admin;
pub mod config;
pub mod console;
pub mod hint;
pub mod timer;

use roomkeeper_core::{Config, Database, Event, GameMaster, PresentationPort, SystemClock};

use crate::presenter;

pub type Game = GameMaster<Database, SystemClock, Box<dyn PresentationPort>>;
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load configuration and persisted state.
pub fn open_game() -> CliResult<(Game, Config)> {
    let config = Config::load()?;
    let db = Database::open()?;
    let presenter = presenter::build(&config)?;
    Ok((GameMaster::load(&config, db, SystemClock, presenter), config))
}

/// `MM:SS`, or `H:MM:SS` from one hour up. Partial seconds round up so the
/// display only reads 00:00 once time is really out.
pub fn format_remaining(ms: u64) -> String {
    let total = ms.div_ceil(1000);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// One-line human description of an event.
pub fn describe(event: &Event) -> String {
    match event {
        Event::TimerStarted { duration_secs, .. } => {
            format!("Timer started: {}", format_remaining(duration_secs.saturating_mul(1000)))
        }
        Event::TimerExpired { .. } => "*** TIME EXPIRED ***".to_string(),
        Event::TimerReset { duration_secs, .. } => {
            format!("Timer reset to {}", format_remaining(duration_secs.saturating_mul(1000)))
        }
        Event::TimerSnapshot {
            running,
            remaining_ms,
            ..
        } => {
            let state = if *running { "running" } else { "stopped" };
            format!("{} ({state})", format_remaining(*remaining_ms))
        }
        Event::HintUsed {
            code,
            free: true,
            ..
        } => format!("Hint {code} shown (free)"),
        Event::HintUsed {
            code,
            used,
            max_uses,
            ..
        } => format!("Hint {code} shown ({used}/{max_uses} uses)"),
        Event::HintAdded { code, .. } => format!("Hint {code} added"),
        Event::HintRemoved { code, .. } => format!("Hint {code} deleted"),
        Event::HintRemovalCancelled { code, .. } => format!("Kept hint {code}"),
        Event::HintUsesReset { previous, .. } => {
            format!("Hint uses reset (was {previous})")
        }
        Event::AdminLoggedIn {
            bonus_granted,
            bonus,
            ..
        } => {
            if *bonus_granted {
                format!("Admin mode on; bonus hint granted (bonus total {bonus})")
            } else {
                "Admin mode on".to_string()
            }
        }
        Event::BonusGranted {
            bonus, max_uses, ..
        } => format!("Bonus hint granted (bonus total {bonus}, max {max_uses})"),
        Event::AdminLoggedOut { .. } => "Admin mode off".to_string(),
    }
}

pub fn print_event(event: &Event, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(event)?);
    } else {
        println!("{}", describe(event));
    }
    Ok(())
}
