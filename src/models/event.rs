use serde::{Deserialize, Serialize};

use super::employee::Shift;

/// A discrete punch event reported to the remote sheet. `Idle` is never
/// rendered as a button; it is synthesized by the idle monitor while the
/// employee is punched in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PunchEvent {
    #[serde(rename = "punchin")]
    PunchIn,
    CoffeeBreak,
    TeaBreak,
    Meeting,
    Lunch,
    Dinner,
    #[serde(rename = "punchout")]
    PunchOut,
    Idle,
}

impl PunchEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchEvent::PunchIn => "punchin",
            PunchEvent::CoffeeBreak => "coffee-break",
            PunchEvent::TeaBreak => "tea-break",
            PunchEvent::Meeting => "meeting",
            PunchEvent::Lunch => "lunch",
            PunchEvent::Dinner => "dinner",
            PunchEvent::PunchOut => "punchout",
            PunchEvent::Idle => "idle",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "punchin" => Some(PunchEvent::PunchIn),
            "coffee-break" => Some(PunchEvent::CoffeeBreak),
            "tea-break" => Some(PunchEvent::TeaBreak),
            "meeting" => Some(PunchEvent::Meeting),
            "lunch" => Some(PunchEvent::Lunch),
            "dinner" => Some(PunchEvent::Dinner),
            "punchout" => Some(PunchEvent::PunchOut),
            "idle" => Some(PunchEvent::Idle),
            _ => None,
        }
    }
}

const DAY_VOCABULARY: &[PunchEvent] = &[
    PunchEvent::PunchIn,
    PunchEvent::CoffeeBreak,
    PunchEvent::TeaBreak,
    PunchEvent::Meeting,
    PunchEvent::Lunch,
    PunchEvent::PunchOut,
];

const OTHER_VOCABULARY: &[PunchEvent] = &[
    PunchEvent::PunchIn,
    PunchEvent::Dinner,
    PunchEvent::CoffeeBreak,
    PunchEvent::PunchOut,
];

/// The events rendered as buttons for a given shift.
pub fn vocabulary(shift: Shift) -> &'static [PunchEvent] {
    match shift {
        Shift::Day => DAY_VOCABULARY,
        Shift::Other => OTHER_VOCABULARY,
    }
}
