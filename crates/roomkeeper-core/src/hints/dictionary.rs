use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::code::{HintCode, HintRecord};

/// All known hints, keyed by normalized code and iterated in code order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HintDictionary {
    entries: BTreeMap<HintCode, HintRecord>,
}

impl HintDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder hints installed on first start.
    pub fn seeded() -> Self {
        let mut dict = Self::new();
        let seeds = [
            (
                "E-00",
                "How hints work",
                "Enter the code printed next to a puzzle to reveal its hint.\nThis code is free.",
            ),
            (
                "E-01",
                "The locked drawer",
                "Count the clocks in the room.\nTheir hands point to the digits.",
            ),
            (
                "E-02",
                "The painting",
                "Look at the painting under the blacklight.",
            ),
            (
                "E-03",
                "The final door",
                "Every answer so far spells a word.\nRead the first letters in order.",
            ),
        ];
        for (code, title, body) in seeds {
            if let Some(code) = HintCode::parse(code) {
                dict.entries.insert(code, HintRecord::new(title, body));
            }
        }
        dict
    }

    pub fn get(&self, code: &HintCode) -> Option<&HintRecord> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &HintCode) -> bool {
        self.entries.contains_key(code)
    }

    /// Insert a new entry. Returns `false` and leaves the dictionary alone
    /// when the code is already taken.
    pub fn insert(&mut self, code: HintCode, record: HintRecord) -> bool {
        if self.entries.contains_key(&code) {
            return false;
        }
        self.entries.insert(code, record);
        true
    }

    pub fn remove(&mut self, code: &HintCode) -> Option<HintRecord> {
        self.entries.remove(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HintCode, &HintRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
