//! Admin session.
//!
//! The admin secret is a shared, plain-text code compared verbatim. It keeps
//! players from wandering into admin actions; it is not an authentication
//! mechanism and must not be treated as one.
//!
//! ```text
//! LoggedOut --login(valid)--> LoggedIn      (add permit := 1)
//! LoggedIn  --add hint------> LoggedIn      (add permit -= 1)
//! LoggedIn  --logout--------> LoggedOut
//! ```
//!
//! Session state is transient and never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Policy switches covering the behaviours that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPolicy {
    /// Each successful login grants one bonus hint use.
    pub bonus_on_login: bool,
    /// The top-up path may grant further bonus uses independently of login.
    pub repeatable_bonus: bool,
    /// Admins may reset the consumed hint counter to zero.
    pub allow_use_reset: bool,
}

impl Default for AdminPolicy {
    fn default() -> Self {
        Self {
            bonus_on_login: true,
            repeatable_bonus: true,
            allow_use_reset: false,
        }
    }
}

#[derive(Clone)]
pub struct AdminSession {
    secret: String,
    active: bool,
    add_remaining: u8,
}

impl AdminSession {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            active: false,
            add_remaining: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Hint adds left in this session; always 0 while logged out.
    pub fn add_remaining(&self) -> u8 {
        if self.active {
            self.add_remaining
        } else {
            0
        }
    }

    /// Case-sensitive exact comparison against the shared secret.
    pub fn verify(&self, submitted: &str) -> Result<(), GameError> {
        if submitted == self.secret {
            Ok(())
        } else {
            Err(GameError::InvalidCode)
        }
    }

    /// Log in. Returns `true` when this opened a new session; the add permit
    /// is only refilled on that transition.
    pub fn login(&mut self, submitted: &str) -> Result<bool, GameError> {
        self.verify(submitted)?;
        if self.active {
            return Ok(false);
        }
        self.active = true;
        self.add_remaining = 1;
        tracing::info!("admin session opened");
        Ok(true)
    }

    /// Returns `true` when a session was actually closed.
    pub fn logout(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.add_remaining = 0;
        if was_active {
            tracing::info!("admin session closed");
        }
        was_active
    }

    pub fn require_active(&self) -> Result<(), GameError> {
        if self.active {
            Ok(())
        } else {
            Err(GameError::Forbidden)
        }
    }

    /// Check that an add is currently allowed without spending the permit.
    pub(crate) fn check_add_permit(&self) -> Result<(), GameError> {
        self.require_active()?;
        if self.add_remaining == 0 {
            return Err(GameError::AddQuotaExhausted);
        }
        Ok(())
    }

    pub(crate) fn spend_add_permit(&mut self) {
        self.add_remaining = self.add_remaining.saturating_sub(1);
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("secret", &"<redacted>")
            .field("active", &self.active)
            .field("add_remaining", &self.add_remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_secret_changes_nothing() {
        let mut session = AdminSession::new("Secret");
        assert_eq!(session.login("secret"), Err(GameError::InvalidCode));
        assert_eq!(session.login(" Secret"), Err(GameError::InvalidCode));
        assert!(!session.is_active());
        assert_eq!(session.add_remaining(), 0);
    }

    #[test]
    fn login_grants_one_add_permit() {
        let mut session = AdminSession::new("s3");
        assert_eq!(session.login("s3"), Ok(true));
        assert!(session.is_active());
        assert_eq!(session.add_remaining(), 1);
    }

    #[test]
    fn second_login_does_not_refill_permit() {
        let mut session = AdminSession::new("s3");
        session.login("s3").unwrap();
        session.spend_add_permit();
        assert_eq!(session.login("s3"), Ok(false));
        assert_eq!(session.add_remaining(), 0);
    }

    #[test]
    fn relogin_after_logout_refills_permit() {
        let mut session = AdminSession::new("s3");
        session.login("s3").unwrap();
        session.spend_add_permit();
        assert!(session.logout());
        assert!(!session.logout());
        session.login("s3").unwrap();
        assert_eq!(session.add_remaining(), 1);
    }

    #[test]
    fn permit_checks() {
        let mut session = AdminSession::new("s3");
        assert_eq!(session.check_add_permit(), Err(GameError::Forbidden));
        session.login("s3").unwrap();
        assert_eq!(session.check_add_permit(), Ok(()));
        session.spend_add_permit();
        session.spend_add_permit();
        assert_eq!(session.check_add_permit(), Err(GameError::AddQuotaExhausted));
    }

    #[test]
    fn debug_output_hides_secret() {
        let session = AdminSession::new("hunter2");
        assert!(!format!("{session:?}").contains("hunter2"));
    }
}
