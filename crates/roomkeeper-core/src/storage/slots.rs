//! Persisted slot layout.
//!
//! | key          | value                                            |
//! |--------------|--------------------------------------------------|
//! | `hints`      | `{code: {title, body}, ...}`                     |
//! | `hint_uses`  | stringified non-negative integer                 |
//! | `hint_bonus` | stringified non-negative integer                 |
//! | `timer`      | `{durationSeconds, running, startEpochMs}`       |
//!
//! Loading never fails. A slot that cannot be read or parsed is logged and
//! replaced by its default; the other slots are unaffected.

use serde_json::Value;

use super::KeyValueStore;
use crate::error::{CoreError, SlotError};
use crate::hints::HintDictionary;
use crate::timer::TimerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Hints,
    HintUses,
    HintBonus,
    Timer,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Hints => "hints",
            Slot::HintUses => "hint_uses",
            Slot::HintBonus => "hint_bonus",
            Slot::Timer => "timer",
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────

pub fn load_hints<S: KeyValueStore + ?Sized>(store: &S) -> HintDictionary {
    load_or(store, Slot::Hints, HintDictionary::seeded, |raw| {
        serde_json::from_str(raw).map_err(|e| corrupt(Slot::Hints, e))
    })
}

pub fn load_counter<S: KeyValueStore + ?Sized>(store: &S, slot: Slot) -> u32 {
    load_or(store, slot, || 0, |raw| parse_counter(slot, raw))
}

pub fn load_timer<S: KeyValueStore + ?Sized>(store: &S, default_duration_secs: u64) -> TimerState {
    load_or(
        store,
        Slot::Timer,
        || TimerState::idle(default_duration_secs),
        |raw| parse_timer(raw, default_duration_secs),
    )
}

fn load_or<S, T, D, P>(store: &S, slot: Slot, default: D, parse: P) -> T
where
    S: KeyValueStore + ?Sized,
    D: FnOnce() -> T,
    P: FnOnce(&str) -> Result<T, SlotError>,
{
    let raw = match store.get(slot.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default(),
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "slot unreadable, using default");
            return default();
        }
    };
    match parse(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "slot corrupt, using default");
            default()
        }
    }
}

fn parse_counter(slot: Slot, raw: &str) -> Result<u32, SlotError> {
    raw.trim().parse::<u32>().map_err(|e| corrupt(slot, e))
}

/// Field-by-field: an absent or wrongly typed field keeps its default.
fn parse_timer(raw: &str, default_duration_secs: u64) -> Result<TimerState, SlotError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(Slot::Timer, e))?;
    let obj = value
        .as_object()
        .ok_or_else(|| corrupt(Slot::Timer, "not an object"))?;

    let mut state = TimerState::idle(default_duration_secs);
    if let Some(secs) = obj.get("durationSeconds").and_then(as_whole_number) {
        state.duration_seconds = secs;
    }
    if let Some(running) = obj.get("running").and_then(Value::as_bool) {
        state.running = running;
    }
    if let Some(start) = obj.get("startEpochMs").and_then(as_whole_number) {
        state.start_epoch_ms = Some(start);
    }
    Ok(state.repaired())
}

fn as_whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn corrupt(slot: Slot, e: impl std::fmt::Display) -> SlotError {
    SlotError::Corrupt {
        key: slot.key(),
        message: e.to_string(),
    }
}

// ── Saving ───────────────────────────────────────────────────────────

pub fn save_hints<S: KeyValueStore + ?Sized>(
    store: &mut S,
    dict: &HintDictionary,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(dict)?;
    store.set(Slot::Hints.key(), &json)?;
    Ok(())
}

pub fn save_counter<S: KeyValueStore + ?Sized>(
    store: &mut S,
    slot: Slot,
    value: u32,
) -> Result<(), CoreError> {
    store.set(slot.key(), &value.to_string())?;
    Ok(())
}

pub fn save_timer<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state: &TimerState,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(state)?;
    store.set(Slot::Timer.key(), &json)?;
    Ok(())
}
