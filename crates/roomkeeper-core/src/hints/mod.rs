//! Hint bank and quota bookkeeping.

mod code;
mod dictionary;
mod ledger;

pub use code::{HintCode, HintRecord};
pub use dictionary::HintDictionary;
pub use ledger::{HintLedger, HintUse, QuotaStatus, RemoveOutcome};
