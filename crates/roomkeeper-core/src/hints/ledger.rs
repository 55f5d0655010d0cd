//! Hint quota ledger.
//!
//! A team may consume `base_max_uses + bonus` hints. Codes in the free set
//! are always served and never counted. `used` only grows, except through an
//! explicit admin reset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::code::{HintCode, HintRecord};
use super::dictionary::HintDictionary;
use crate::admin::AdminSession;
use crate::error::GameError;

/// A hint that has been granted and may be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintUse {
    pub code: HintCode,
    pub record: HintRecord,
    pub free: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(HintRecord),
    /// The confirmation was declined; nothing changed.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub used: u32,
    pub bonus: u32,
    pub max_uses: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone)]
pub struct HintLedger {
    dictionary: HintDictionary,
    used: u32,
    bonus: u32,
    base_max_uses: u32,
    free_codes: BTreeSet<HintCode>,
}

impl HintLedger {
    pub fn new(
        dictionary: HintDictionary,
        base_max_uses: u32,
        free_codes: impl IntoIterator<Item = HintCode>,
    ) -> Self {
        Self {
            dictionary,
            used: 0,
            bonus: 0,
            base_max_uses,
            free_codes: free_codes.into_iter().collect(),
        }
    }

    /// Replace the counters with persisted values.
    pub fn with_counts(mut self, used: u32, bonus: u32) -> Self {
        self.used = used;
        self.bonus = bonus;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn dictionary(&self) -> &HintDictionary {
        &self.dictionary
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    pub fn max_uses(&self) -> u32 {
        self.base_max_uses.saturating_add(self.bonus)
    }

    pub fn remaining(&self) -> u32 {
        self.max_uses().saturating_sub(self.used)
    }

    pub fn status(&self) -> QuotaStatus {
        QuotaStatus {
            used: self.used,
            bonus: self.bonus,
            max_uses: self.max_uses(),
            remaining: self.remaining(),
        }
    }

    pub fn is_free(&self, code: &HintCode) -> bool {
        self.free_codes.contains(code)
    }

    /// Normalize and look up a code.
    pub fn resolve(&self, raw: &str) -> Result<(HintCode, &HintRecord), GameError> {
        let code = normalize(raw)?;
        match self.dictionary.get(&code) {
            Some(record) => Ok((code, record)),
            None => Err(GameError::NotFound {
                code: code.to_string(),
            }),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Consume one hint use (unless the code is free) and hand the record
    /// back for presentation. Nothing changes on failure.
    pub fn use_hint(&mut self, raw: &str) -> Result<HintUse, GameError> {
        let (code, record) = self.resolve(raw)?;
        let record = record.clone();
        if self.is_free(&code) {
            tracing::debug!(%code, "free hint served");
            return Ok(HintUse {
                code,
                record,
                free: true,
            });
        }
        if self.used >= self.max_uses() {
            return Err(GameError::QuotaExceeded {
                max: self.max_uses(),
            });
        }
        self.used += 1;
        tracing::debug!(%code, used = self.used, max = self.max_uses(), "hint use consumed");
        Ok(HintUse {
            code,
            record,
            free: false,
        })
    }

    /// Add a hint. Spends the session's add permit on success.
    pub fn add(
        &mut self,
        session: &mut AdminSession,
        code: &str,
        title: &str,
        body: &str,
    ) -> Result<HintCode, GameError> {
        session.check_add_permit()?;
        let code = HintCode::parse(code).ok_or(GameError::EmptyField { field: "code" })?;
        let title = title.trim();
        if title.is_empty() {
            return Err(GameError::EmptyField { field: "title" });
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(GameError::EmptyField { field: "body" });
        }
        if !self
            .dictionary
            .insert(code.clone(), HintRecord::new(title, body))
        {
            return Err(GameError::DuplicateCode {
                code: code.to_string(),
            });
        }
        session.spend_add_permit();
        tracing::info!(%code, "hint added");
        Ok(code)
    }

    /// Delete a hint after `confirm` approves it.
    pub fn remove<F>(
        &mut self,
        session: &AdminSession,
        raw: &str,
        confirm: F,
    ) -> Result<(HintCode, RemoveOutcome), GameError>
    where
        F: FnOnce(&HintCode, &HintRecord) -> bool,
    {
        session.require_active()?;
        let (code, record) = self.resolve(raw)?;
        if !confirm(&code, record) {
            return Ok((code, RemoveOutcome::Cancelled));
        }
        let removed = self
            .dictionary
            .remove(&code)
            .ok_or_else(|| GameError::NotFound {
                code: code.to_string(),
            })?;
        tracing::info!(%code, "hint removed");
        Ok((code, RemoveOutcome::Removed(removed)))
    }

    /// One more consumable use. Returns the new bonus count.
    pub fn grant_bonus(&mut self) -> u32 {
        self.bonus = self.bonus.saturating_add(1);
        tracing::info!(bonus = self.bonus, max = self.max_uses(), "bonus hint use granted");
        self.bonus
    }

    /// Zero the consumed counter. Returns the previous value.
    pub fn reset_uses(&mut self, session: &AdminSession) -> Result<u32, GameError> {
        session.require_active()?;
        let previous = std::mem::take(&mut self.used);
        tracing::info!(previous, "hint uses reset");
        Ok(previous)
    }
}

fn normalize(raw: &str) -> Result<HintCode, GameError> {
    HintCode::parse(raw).ok_or_else(|| GameError::NotFound {
        code: raw.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> HintCode {
        HintCode::parse(raw).unwrap()
    }

    fn ledger(max: u32, free: &[&str]) -> HintLedger {
        HintLedger::new(
            HintDictionary::seeded(),
            max,
            free.iter().map(|c| code(c)),
        )
    }

    fn admin() -> AdminSession {
        let mut session = AdminSession::new("gm");
        session.login("gm").unwrap();
        session
    }

    #[test]
    fn three_uses_then_quota_exceeded() {
        let mut ledger = ledger(3, &[]);
        for expected in 1..=3 {
            ledger.use_hint("e-01").unwrap();
            assert_eq!(ledger.used(), expected);
        }
        assert_eq!(
            ledger.use_hint("e-02"),
            Err(GameError::QuotaExceeded { max: 3 })
        );
        assert_eq!(ledger.used(), 3);
    }

    #[test]
    fn free_codes_never_consume() {
        let mut ledger = ledger(1, &["E-00"]);
        for _ in 0..5 {
            let granted = ledger.use_hint(" e-00 ").unwrap();
            assert!(granted.free);
        }
        assert_eq!(ledger.used(), 0);
        ledger.use_hint("E-01").unwrap();
        assert!(ledger.use_hint("E-00").is_ok());
    }

    #[test]
    fn unknown_code_is_not_found_and_free_of_charge() {
        let mut ledger = ledger(3, &[]);
        assert_eq!(
            ledger.use_hint("unknown-code"),
            Err(GameError::NotFound {
                code: "UNKNOWN-CODE".into()
            })
        );
        assert!(matches!(ledger.use_hint("  "), Err(GameError::NotFound { .. })));
        assert_eq!(ledger.used(), 0);
    }

    #[test]
    fn bonus_raises_max_uses() {
        let mut ledger = ledger(1, &[]);
        ledger.use_hint("E-01").unwrap();
        assert!(ledger.use_hint("E-01").is_err());
        assert_eq!(ledger.grant_bonus(), 1);
        assert_eq!(ledger.max_uses(), 2);
        assert!(ledger.use_hint("E-01").is_ok());
        assert_eq!(ledger.status().remaining, 0);
    }

    #[test]
    fn add_requires_admin() {
        let mut ledger = ledger(3, &[]);
        let mut session = AdminSession::new("gm");
        assert_eq!(
            ledger.add(&mut session, "N-1", "t", "b"),
            Err(GameError::Forbidden)
        );
        assert!(!ledger.dictionary().contains(&code("N-1")));
    }

    #[test]
    fn one_add_per_session() {
        let mut ledger = ledger(3, &[]);
        let mut session = admin();
        assert_eq!(ledger.add(&mut session, "n-1", " Title ", "Body"), Ok(code("N-1")));
        assert_eq!(session.add_remaining(), 0);
        let before = ledger.dictionary().clone();
        assert_eq!(
            ledger.add(&mut session, "N-2", "t", "b"),
            Err(GameError::AddQuotaExhausted)
        );
        assert_eq!(ledger.dictionary(), &before);
        assert_eq!(ledger.resolve("n-1").unwrap().1.title, "Title");
    }

    #[test]
    fn add_validates_fields_and_keeps_permit() {
        let mut ledger = ledger(3, &[]);
        let mut session = admin();
        assert_eq!(
            ledger.add(&mut session, " ", "t", "b"),
            Err(GameError::EmptyField { field: "code" })
        );
        assert_eq!(
            ledger.add(&mut session, "N-1", "\t", "b"),
            Err(GameError::EmptyField { field: "title" })
        );
        assert_eq!(
            ledger.add(&mut session, "N-1", "t", ""),
            Err(GameError::EmptyField { field: "body" })
        );
        assert_eq!(session.add_remaining(), 1);
    }

    #[test]
    fn duplicate_code_leaves_dictionary_unchanged() {
        let mut ledger = ledger(3, &[]);
        let mut session = admin();
        let before = ledger.dictionary().clone();
        assert_eq!(
            ledger.add(&mut session, "e-01", "new", "new"),
            Err(GameError::DuplicateCode {
                code: "E-01".into()
            })
        );
        assert_eq!(ledger.dictionary(), &before);
        assert_eq!(session.add_remaining(), 1);
    }

    #[test]
    fn remove_honours_confirmation() {
        let mut ledger = ledger(3, &[]);
        let session = admin();
        let (_, outcome) = ledger.remove(&session, "e-02", |_, _| false).unwrap();
        assert_eq!(outcome, RemoveOutcome::Cancelled);
        assert!(ledger.dictionary().contains(&code("E-02")));

        let (removed, outcome) = ledger
            .remove(&session, "e-02", |c, r| {
                c.as_str() == "E-02" && r.title == "The painting"
            })
            .unwrap();
        assert_eq!(removed, code("E-02"));
        assert!(matches!(outcome, RemoveOutcome::Removed(_)));
        assert!(!ledger.dictionary().contains(&code("E-02")));
    }

    #[test]
    fn remove_requires_admin_and_known_code() {
        let mut ledger = ledger(3, &[]);
        let logged_out = AdminSession::new("gm");
        assert_eq!(
            ledger.remove(&logged_out, "E-01", |_, _| true),
            Err(GameError::Forbidden)
        );
        let session = admin();
        assert!(matches!(
            ledger.remove(&session, "Z-99", |_, _| panic!("must not ask")),
            Err(GameError::NotFound { .. })
        ));
    }

    #[test]
    fn reset_uses_is_admin_only() {
        let mut ledger = ledger(3, &[]).with_counts(2, 0);
        assert_eq!(
            ledger.reset_uses(&AdminSession::new("gm")),
            Err(GameError::Forbidden)
        );
        assert_eq!(ledger.reset_uses(&admin()), Ok(2));
        assert_eq!(ledger.used(), 0);
    }
}
