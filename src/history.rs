use crate::color;
use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

pub const MAX_HISTORY: usize = 20;

/// Previously chosen colors, most recent first.
///
/// A color already present is left where it is; once full, the oldest entry
/// falls off the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History(Vec<String>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the color was added.
    pub fn push(&mut self, hex: &str) -> bool {
        if self.contains(hex) {
            return false;
        }
        self.0.insert(0, hex.to_string());
        self.0.truncate(MAX_HISTORY);
        true
    }

    pub fn contains(&self, hex: &str) -> bool {
        self.0.iter().any(|entry| entry == hex)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.0).context("Failed to serialize color history")
    }

    /// Parses a stored history, keeping the first `MAX_HISTORY` distinct colors.
    ///
    /// Entries are normalized to the uppercase `#RRGGBB` form `push` stores;
    /// anything that is not a hex color is dropped.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<String> =
            serde_json::from_str(content).context("Failed to parse color history JSON")?;
        let mut history = History::new();
        for entry in entries {
            if history.len() == MAX_HISTORY {
                break;
            }
            let Some(color) = color::convert(&entry) else {
                debug!("Dropping stored history entry {:?}", entry);
                continue;
            };
            if !history.contains(color.hex()) {
                history.0.push(color.hex().to_string());
            }
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first() {
        let mut history = History::new();
        assert!(history.push("#111111"));
        assert!(history.push("#222222"));
        assert_eq!(history.entries(), ["#222222", "#111111"]);
    }

    #[test]
    fn duplicate_is_not_added_or_moved() {
        let mut history = History::new();
        assert!(history.push("#1A2B3C"));
        assert!(!history.push("#1A2B3C"));
        assert_eq!(history.len(), 1);

        history.push("#000000");
        assert!(!history.push("#1A2B3C"));
        assert_eq!(history.entries(), ["#000000", "#1A2B3C"]);
    }

    #[test]
    fn evicts_oldest_past_the_bound() {
        let mut history = History::new();
        for i in 0..21 {
            history.push(&format!("#0000{:02X}", i));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.entries()[0], "#000014");
        assert!(!history.contains("#000000"));
        assert!(history.contains("#000001"));
    }

    #[test]
    fn json_round_trip() {
        let mut history = History::new();
        history.push("#AABBCC");
        history.push("#DDEEFF");
        let json = history.to_json().unwrap();
        assert_eq!(json, r##"["#DDEEFF","#AABBCC"]"##);
        assert_eq!(History::from_json(&json).unwrap(), history);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(History::from_json("not json").is_err());
        assert!(History::from_json(r#"{"colors": []}"#).is_err());
        assert!(History::from_json("[1, 2]").is_err());
    }

    #[test]
    fn from_json_enforces_bound_and_uniqueness() {
        let entries: Vec<String> = (0..30).map(|i| format!("#0000{:02X}", i % 25)).collect();
        let json = serde_json::to_string(&entries).unwrap();
        let history = History::from_json(&json).unwrap();
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.entries()[0], "#000000");
        assert_eq!(history.entries()[19], "#000013");
    }

    #[test]
    fn from_json_normalizes_case_and_drops_non_colors() {
        let history =
            History::from_json(r##"["#1a2b3c", "not a color", "#ABC", "1A2B3C", "ffeedd"]"##).unwrap();
        assert_eq!(history.entries(), ["#1A2B3C", "#FFEEDD"]);
    }

    #[test]
    fn clear_empties() {
        let mut history = History::new();
        history.push("#AABBCC");
        history.clear();
        assert!(history.is_empty());
    }
}
