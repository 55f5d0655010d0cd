//! End-to-end scenarios over the application state object.
//!
//! Each test drives a `GameMaster` with an in-memory store, a manual clock
//! and a presenter that records what it was asked to show.

use roomkeeper_core::{
    Config, CoreError, Event, GameError, GameMaster, HintView, KeyValueStore, ManualClock,
    MemoryStore, PresentationPort,
};

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Default)]
struct RecordingPresenter {
    shown: Vec<HintView>,
}

impl PresentationPort for RecordingPresenter {
    fn present(&mut self, view: &HintView) -> Result<(), CoreError> {
        self.shown.push(view.clone());
        Ok(())
    }
}

type Game = GameMaster<MemoryStore, ManualClock, RecordingPresenter>;

const SECRET: &str = "GAMEMASTER";

fn config(base_max_uses: u32, free: &[&str]) -> Config {
    let mut config = Config::default();
    config.hints.base_max_uses = base_max_uses;
    config.hints.free_codes = free.iter().map(|c| c.to_string()).collect();
    config.timer.default_duration_secs = 60;
    config
}

fn game(config: &Config) -> (Game, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let gm = GameMaster::load(
        config,
        MemoryStore::new(),
        clock.clone(),
        RecordingPresenter::default(),
    );
    (gm, clock)
}

fn game_error(result: Result<Event, CoreError>) -> GameError {
    match result {
        Err(CoreError::Game(e)) => e,
        other => panic!("expected a game error, got {other:?}"),
    }
}

// ============================================================================
// Hint quota
// ============================================================================

#[test]
fn three_uses_then_quota_exceeded() {
    let (mut gm, _) = game(&config(3, &[]));
    for expected in 1..=3 {
        let event = gm.use_hint("E-01").unwrap();
        assert!(matches!(event, Event::HintUsed { used, max_uses: 3, free: false, .. } if used == expected));
    }
    assert_eq!(
        game_error(gm.use_hint("E-02")),
        GameError::QuotaExceeded { max: 3 }
    );
    assert_eq!(gm.quota().used, 3);
    assert_eq!(gm.presenter().shown.len(), 3);
}

#[test]
fn unknown_code_is_not_found() {
    let (mut gm, _) = game(&config(3, &[]));
    assert_eq!(
        game_error(gm.use_hint("UNKNOWN-CODE")),
        GameError::NotFound {
            code: "UNKNOWN-CODE".into()
        }
    );
    assert_eq!(gm.quota().used, 0);
    assert!(gm.presenter().shown.is_empty());
}

#[test]
fn free_code_is_presented_without_consuming() {
    let (mut gm, _) = game(&config(1, &["e-00"]));
    for _ in 0..4 {
        gm.use_hint("E-00").unwrap();
    }
    assert_eq!(gm.quota().used, 0);
    match &gm.presenter().shown[0] {
        HintView::Found { code, record } => {
            assert_eq!(code.as_str(), "E-00");
            assert_eq!(record.title, "How hints work");
        }
        other => panic!("unexpected view {other:?}"),
    }
}

// ============================================================================
// Admin session
// ============================================================================

#[test]
fn login_then_top_up_grants_two_bonuses() {
    let (mut gm, _) = game(&config(3, &[]));

    let event = gm.login(SECRET).unwrap();
    assert!(matches!(event, Event::AdminLoggedIn { bonus_granted: true, bonus: 1, .. }));
    assert_eq!(gm.quota().max_uses, 4);
    assert!(gm.session().is_active());
    assert_eq!(gm.session().add_remaining(), 1);

    let event = gm.grant_bonus(SECRET).unwrap();
    assert!(matches!(event, Event::BonusGranted { bonus: 2, max_uses: 5, .. }));
    assert_eq!(gm.session().add_remaining(), 1);
    assert!(gm.session().is_active());
}

#[test]
fn wrong_secret_changes_nothing() {
    let (mut gm, _) = game(&config(3, &[]));
    assert_eq!(game_error(gm.login("gamemaster")), GameError::InvalidCode);
    assert_eq!(game_error(gm.grant_bonus("nope")), GameError::InvalidCode);
    assert!(!gm.session().is_active());
    assert_eq!(gm.quota().bonus, 0);
}

#[test]
fn exactly_one_add_per_session() {
    let (mut gm, _) = game(&config(3, &[]));
    assert_eq!(
        game_error(gm.add_hint("N-1", "Title", "Body")),
        GameError::Forbidden
    );

    gm.login(SECRET).unwrap();
    gm.add_hint("n-1", "Title", "Body").unwrap();
    let before = gm.hints().clone();
    assert_eq!(
        game_error(gm.add_hint("N-2", "Other", "Body")),
        GameError::AddQuotaExhausted
    );
    assert_eq!(gm.hints(), &before);

    gm.logout();
    gm.login(SECRET).unwrap();
    gm.add_hint("N-2", "Other", "Body").unwrap();
    assert_eq!(gm.hints().len(), before.len() + 1);
}

#[test]
fn duplicate_add_leaves_dictionary_unchanged() {
    let (mut gm, _) = game(&config(3, &[]));
    gm.login(SECRET).unwrap();
    let before = gm.hints().clone();
    assert_eq!(
        game_error(gm.add_hint(" e-01 ", "Again", "Again")),
        GameError::DuplicateCode {
            code: "E-01".into()
        }
    );
    assert_eq!(gm.hints(), &before);
}

#[test]
fn added_hint_is_persisted_and_usable() {
    let (mut gm, _) = game(&config(3, &[]));
    gm.login(SECRET).unwrap();
    gm.add_hint("z-9", "Under the rug", "Lift the\ncorner").unwrap();
    let stored = gm.store().get("hints").unwrap().unwrap();
    assert!(stored.contains("Z-9"));
    gm.logout();
    gm.use_hint("Z-9").unwrap();
    match gm.presenter().shown.last().unwrap() {
        HintView::Found { record, .. } => assert_eq!(record.body, "Lift the\ncorner"),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn remove_needs_admin_and_confirmation() {
    let (mut gm, _) = game(&config(3, &[]));
    assert_eq!(
        game_error(gm.remove_hint("E-03", |_, _| true)),
        GameError::Forbidden
    );
    gm.login(SECRET).unwrap();
    let event = gm.remove_hint("E-03", |_, _| false).unwrap();
    assert!(matches!(event, Event::HintRemovalCancelled { .. }));
    assert_eq!(gm.hints().len(), 4);

    let event = gm.remove_hint("e-03", |_, _| true).unwrap();
    assert!(matches!(event, Event::HintRemoved { .. }));
    assert_eq!(gm.hints().len(), 3);
    assert!(matches!(
        game_error(gm.use_hint("E-03")),
        GameError::NotFound { .. }
    ));
}

// ============================================================================
// Timer
// ============================================================================

#[test]
fn timer_expires_exactly_once() {
    let (mut gm, clock) = game(&config(3, &[]));
    assert_eq!(gm.remaining_ms(), 60_000);
    gm.start_timer().unwrap().unwrap();

    let mut expiries = 0;
    let mut last = gm.remaining_ms();
    for _ in 0..(61 * 4) {
        clock.advance_ms(250);
        let remaining = gm.remaining_ms();
        assert!(remaining <= last);
        last = remaining;
        if let Some(Event::TimerExpired { .. }) = gm.tick().unwrap() {
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
    assert!(!gm.timer().is_running());
    assert_eq!(gm.remaining_ms(), 0);
}

#[test]
fn admin_reset_returns_timer_to_idle() {
    let (mut gm, clock) = game(&config(3, &[]));
    gm.start_timer().unwrap();
    clock.advance_secs(20);
    gm.login(SECRET).unwrap();
    gm.reset_timer().unwrap();
    assert!(!gm.timer().is_running());
    assert_eq!(gm.remaining_ms(), 60_000);
}
