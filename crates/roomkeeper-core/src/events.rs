use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hints::HintCode;

/// Every state change in the system produces an Event.
/// The operator surface renders them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        start_epoch_ms: u64,
        at: DateTime<Utc>,
    },
    /// Raised exactly once when a running countdown reaches zero.
    TimerExpired {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        running: bool,
        duration_secs: u64,
        remaining_ms: u64,
        start_epoch_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    HintUsed {
        code: HintCode,
        /// True when the code is in the free set and consumed nothing.
        free: bool,
        used: u32,
        max_uses: u32,
        at: DateTime<Utc>,
    },
    HintAdded {
        code: HintCode,
        at: DateTime<Utc>,
    },
    HintRemoved {
        code: HintCode,
        at: DateTime<Utc>,
    },
    /// Operator declined the removal confirmation.
    HintRemovalCancelled {
        code: HintCode,
        at: DateTime<Utc>,
    },
    HintUsesReset {
        previous: u32,
        at: DateTime<Utc>,
    },
    AdminLoggedIn {
        bonus_granted: bool,
        bonus: u32,
        at: DateTime<Utc>,
    },
    BonusGranted {
        bonus: u32,
        max_uses: u32,
        at: DateTime<Utc>,
    },
    AdminLoggedOut {
        at: DateTime<Utc>,
    },
}

/// Convert epoch milliseconds to a UTC timestamp, clamping out-of-range values.
pub(crate) fn at(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let event = Event::AdminLoggedOut { at: at(0) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "admin_logged_out");
    }

    #[test]
    fn at_converts_epoch_millis() {
        assert_eq!(at(1_500).timestamp_millis(), 1_500);
    }
}
