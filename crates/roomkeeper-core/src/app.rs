//! Application state.
//!
//! [`GameMaster`] owns the Timer Engine, the Hint Ledger and the Admin
//! Session together with the injected store, clock and presenter. It loads
//! every slot once at construction and writes the owning slot after each
//! mutation. Every operator action maps to one method here.

use crate::admin::{AdminPolicy, AdminSession};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, GameError, Result};
use crate::events::{at, Event};
use crate::hints::{HintDictionary, HintLedger, QuotaStatus, RemoveOutcome};
use crate::hints::{HintCode, HintRecord};
use crate::presentation::{resolve_link, HintView, PresentationPort};
use crate::storage::slots::{self, Slot};
use crate::storage::{Config, KeyValueStore};
use crate::timer::TimerEngine;

pub struct GameMaster<S, C = SystemClock, P = Box<dyn PresentationPort>>
where
    S: KeyValueStore,
    C: Clock,
    P: PresentationPort,
{
    timer: TimerEngine,
    ledger: HintLedger,
    admin: AdminSession,
    policy: AdminPolicy,
    store: S,
    clock: C,
    presenter: P,
}

impl<S, C, P> GameMaster<S, C, P>
where
    S: KeyValueStore,
    C: Clock,
    P: PresentationPort,
{
    /// Build from configuration and whatever the store already holds.
    pub fn load(config: &Config, store: S, clock: C, presenter: P) -> Self {
        let default_duration = config.timer.default_duration_secs;
        let timer = TimerEngine::restore(slots::load_timer(&store, default_duration), default_duration);
        let ledger = HintLedger::new(
            slots::load_hints(&store),
            config.hints.base_max_uses,
            config.free_codes(),
        )
        .with_counts(
            slots::load_counter(&store, Slot::HintUses),
            slots::load_counter(&store, Slot::HintBonus),
        );
        tracing::debug!(
            hints = ledger.dictionary().len(),
            used = ledger.used(),
            bonus = ledger.bonus(),
            running = timer.is_running(),
            "state loaded"
        );
        Self {
            timer,
            ledger,
            admin: AdminSession::new(config.admin.secret.clone()),
            policy: config.admin_policy(),
            store,
            clock,
            presenter,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn remaining_ms(&self) -> u64 {
        self.timer.remaining_ms(self.clock.now_ms())
    }

    pub fn timer_snapshot(&self) -> Event {
        self.timer.snapshot(self.clock.now_ms())
    }

    pub fn hints(&self) -> &HintDictionary {
        self.ledger.dictionary()
    }

    pub fn quota(&self) -> QuotaStatus {
        self.ledger.status()
    }

    pub fn session(&self) -> &AdminSession {
        &self.admin
    }

    pub fn policy(&self) -> AdminPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Re-derive a hint from a link without consuming anything.
    pub fn open_link(&mut self, link: &str) -> Result<HintView> {
        let view = resolve_link(link, self.ledger.dictionary());
        self.presenter.present(&view)?;
        Ok(view)
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start the countdown; `None` when it was already running.
    pub fn start_timer(&mut self) -> Result<Option<Event>> {
        let snapshot = self.snapshot();
        let event = self.timer.start(self.clock.now_ms());
        if event.is_some() {
            let saved = self.save_timer();
            self.keep_or_restore(snapshot, saved)?;
            tracing::info!(duration_secs = self.timer.state().duration_seconds, "timer started");
        }
        Ok(event)
    }

    /// Periodic refresh. Returns the one-shot expiry event.
    pub fn tick(&mut self) -> Result<Option<Event>> {
        let snapshot = self.snapshot();
        let event = self.timer.tick(self.clock.now_ms());
        if event.is_some() {
            let saved = self.save_timer();
            self.keep_or_restore(snapshot, saved)?;
            tracing::info!("time expired");
        }
        Ok(event)
    }

    pub fn reset_timer(&mut self) -> Result<Event> {
        self.admin.require_active()?;
        let snapshot = self.snapshot();
        let event = self.timer.reset(self.clock.now_ms());
        let saved = self.save_timer();
        self.keep_or_restore(snapshot, saved)?;
        Ok(event)
    }

    // ── Hints ────────────────────────────────────────────────────────

    /// Spend a hint use (free codes excepted) and present the hint.
    ///
    /// The use counts once it is stored. A presenter failure after that is
    /// logged and does not undo it.
    pub fn use_hint(&mut self, code: &str) -> Result<Event> {
        let snapshot = self.snapshot();
        let granted = self.ledger.use_hint(code)?;
        if !granted.free {
            let saved = self.save_counter(Slot::HintUses, self.ledger.used());
            self.keep_or_restore(snapshot, saved)?;
        }
        let view = HintView::found(granted.code.clone(), granted.record);
        if let Err(e) = self.presenter.present(&view) {
            tracing::warn!(code = %granted.code, error = %e, "hint could not be presented");
        }
        Ok(Event::HintUsed {
            code: granted.code,
            free: granted.free,
            used: self.ledger.used(),
            max_uses: self.ledger.max_uses(),
            at: self.now(),
        })
    }

    pub fn add_hint(&mut self, code: &str, title: &str, body: &str) -> Result<Event> {
        let snapshot = self.snapshot();
        let code = self.ledger.add(&mut self.admin, code, title, body)?;
        let saved = self.save_hints();
        self.keep_or_restore(snapshot, saved)?;
        Ok(Event::HintAdded {
            code,
            at: self.now(),
        })
    }

    /// Delete a hint once `confirm` approves it.
    pub fn remove_hint<F>(&mut self, code: &str, confirm: F) -> Result<Event>
    where
        F: FnOnce(&HintCode, &HintRecord) -> bool,
    {
        let snapshot = self.snapshot();
        let (code, outcome) = self.ledger.remove(&self.admin, code, confirm)?;
        match outcome {
            RemoveOutcome::Removed(_) => {
                let saved = self.save_hints();
                self.keep_or_restore(snapshot, saved)?;
                Ok(Event::HintRemoved {
                    code,
                    at: self.now(),
                })
            }
            RemoveOutcome::Cancelled => Ok(Event::HintRemovalCancelled {
                code,
                at: self.now(),
            }),
        }
    }

    pub fn reset_uses(&mut self) -> Result<Event> {
        if !self.policy.allow_use_reset {
            return Err(GameError::Disabled {
                action: "resetting hint uses",
            }
            .into());
        }
        let snapshot = self.snapshot();
        let previous = self.ledger.reset_uses(&self.admin)?;
        let saved = self.save_counter(Slot::HintUses, 0);
        self.keep_or_restore(snapshot, saved)?;
        Ok(Event::HintUsesReset {
            previous,
            at: self.now(),
        })
    }

    // ── Admin ────────────────────────────────────────────────────────

    pub fn login(&mut self, secret: &str) -> Result<Event> {
        let snapshot = self.snapshot();
        self.admin.login(secret)?;
        let bonus_granted = self.policy.bonus_on_login;
        if bonus_granted {
            self.ledger.grant_bonus();
            let saved = self.save_counter(Slot::HintBonus, self.ledger.bonus());
            self.keep_or_restore(snapshot, saved)?;
        }
        Ok(Event::AdminLoggedIn {
            bonus_granted,
            bonus: self.ledger.bonus(),
            at: self.now(),
        })
    }

    /// Top-up path: one more hint use, session untouched.
    pub fn grant_bonus(&mut self, secret: &str) -> Result<Event> {
        if !self.policy.repeatable_bonus {
            return Err(GameError::Disabled {
                action: "bonus top-up",
            }
            .into());
        }
        self.admin.verify(secret)?;
        let snapshot = self.snapshot();
        let bonus = self.ledger.grant_bonus();
        let saved = self.save_counter(Slot::HintBonus, bonus);
        self.keep_or_restore(snapshot, saved)?;
        Ok(Event::BonusGranted {
            bonus,
            max_uses: self.ledger.max_uses(),
            at: self.now(),
        })
    }

    pub fn logout(&mut self) -> Event {
        self.admin.logout();
        Event::AdminLoggedOut { at: self.now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        at(self.clock.now_ms())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            timer: self.timer.clone(),
            ledger: self.ledger.clone(),
            admin: self.admin.clone(),
        }
    }

    /// Memory only moves ahead of the store when the write went through.
    fn keep_or_restore(&mut self, snapshot: Snapshot, saved: Result<()>) -> Result<()> {
        if let Err(e) = saved {
            tracing::warn!(error = %e, "write failed, state rolled back");
            self.timer = snapshot.timer;
            self.ledger = snapshot.ledger;
            self.admin = snapshot.admin;
            return Err(e);
        }
        Ok(())
    }

    fn save_timer(&mut self) -> Result<(), CoreError> {
        slots::save_timer(&mut self.store, &self.timer.state())
    }

    fn save_hints(&mut self) -> Result<(), CoreError> {
        slots::save_hints(&mut self.store, self.ledger.dictionary())
    }

    fn save_counter(&mut self, slot: Slot, value: u32) -> Result<(), CoreError> {
        slots::save_counter(&mut self.store, slot, value)
    }
}

/// In-memory state taken before a mutation.
struct Snapshot {
    timer: TimerEngine,
    ledger: HintLedger,
    admin: AdminSession,
}
