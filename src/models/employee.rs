use serde::{Deserialize, Serialize};

/// Work-schedule classification. The directory reports free-form shift
/// strings; anything that isn't `"day"` collapses into `Other`, which is
/// all the event vocabulary distinguishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Day,
    #[serde(other)]
    Other,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "day",
            Shift::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub shift: Shift,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_shift_parses() {
        let shift: Shift = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(shift, Shift::Day);
    }

    #[test]
    fn unknown_shift_collapses_to_other() {
        for raw in ["\"night\"", "\"evening\"", "\"swing\""] {
            let shift: Shift = serde_json::from_str(raw).unwrap();
            assert_eq!(shift, Shift::Other);
        }
    }

    #[test]
    fn shift_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Shift::Day).unwrap(), "\"day\"");
        assert_eq!(serde_json::to_string(&Shift::Other).unwrap(), "\"other\"");
    }
}
