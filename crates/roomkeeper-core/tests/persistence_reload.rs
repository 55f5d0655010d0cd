//! State must survive a restart: each test writes through one `GameMaster`,
//! drops it, and loads a fresh one from the same SQLite file.

use std::path::Path;

use roomkeeper_core::{
    Config, Database, GameMaster, KeyValueStore, ManualClock, NullPresenter, TimerState,
};
use tempfile::TempDir;

const T0: u64 = 1_700_000_000_000;

fn open(path: &Path, clock: &ManualClock) -> GameMaster<Database, ManualClock, NullPresenter> {
    let mut config = Config::default();
    config.timer.default_duration_secs = 600;
    let db = Database::open_at(path).unwrap();
    GameMaster::load(&config, db, clock.clone(), NullPresenter)
}

#[test]
fn elapsed_time_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roomkeeper.db");
    let clock = ManualClock::new(T0);

    let before = {
        let mut gm = open(&path, &clock);
        gm.start_timer().unwrap();
        clock.advance_secs(125);
        gm.remaining_ms()
    };

    let gm = open(&path, &clock);
    assert!(gm.timer().is_running());
    assert_eq!(gm.remaining_ms(), before);
    assert_eq!(before, 475_000);
}

#[test]
fn expiry_while_closed_is_detected_on_first_tick() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roomkeeper.db");
    let clock = ManualClock::new(T0);
    {
        let mut gm = open(&path, &clock);
        gm.start_timer().unwrap();
    }
    clock.advance_secs(3_600);

    let mut gm = open(&path, &clock);
    assert_eq!(gm.remaining_ms(), 0);
    assert!(gm.tick().unwrap().is_some());
    assert!(gm.tick().unwrap().is_none());

    let gm = open(&path, &clock);
    assert!(!gm.timer().is_running());
    assert_eq!(gm.remaining_ms(), 0);
}

#[test]
fn counters_and_hints_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roomkeeper.db");
    let clock = ManualClock::new(T0);
    {
        let mut gm = open(&path, &clock);
        gm.use_hint("E-01").unwrap();
        gm.login("GAMEMASTER").unwrap();
        gm.add_hint("R-1", "Reloaded", "Still here").unwrap();
        gm.grant_bonus("GAMEMASTER").unwrap();
    }

    let gm = open(&path, &clock);
    let quota = gm.quota();
    assert_eq!(quota.used, 1);
    assert_eq!(quota.bonus, 2);
    assert_eq!(quota.max_uses, 5);
    assert!(gm.hints().iter().any(|(c, _)| c.as_str() == "R-1"));
    assert!(!gm.session().is_active(), "admin session must not persist");
}

#[test]
fn corrupt_slot_only_resets_that_slot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roomkeeper.db");
    {
        let mut db = Database::open_at(&path).unwrap();
        db.set("hint_uses", "2").unwrap();
        db.set("hint_bonus", "lots").unwrap();
        let timer = TimerState {
            duration_seconds: 90,
            running: true,
            start_epoch_ms: Some(T0),
        };
        db.set("timer", &serde_json::to_string(&timer).unwrap()).unwrap();
        db.set("hints", "[]").unwrap();
    }

    let clock = ManualClock::new(T0 + 30_000);
    let gm = open(&path, &clock);
    assert_eq!(gm.quota().used, 2);
    assert_eq!(gm.quota().bonus, 0);
    assert_eq!(gm.remaining_ms(), 60_000);
    assert_eq!(gm.hints().len(), 4);
}
