use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Employee, PunchEvent};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PunchPhase {
    NoEmployee,
    PunchedOut,
    PunchedIn,
}

impl Default for PunchPhase {
    fn default() -> Self {
        PunchPhase::NoEmployee
    }
}

/// The whole session: who is clocked in, whether they are punched in,
/// and when they last touched the machine. Reset only by process restart.
#[derive(Debug, Clone)]
pub struct PunchState {
    pub phase: PunchPhase,
    pub employee: Option<Employee>,
    /// Minted on punch-in, cleared on punch-out; labels one punched-in
    /// stretch in logs and frontend events.
    pub session_id: Option<String>,
    pub last_activity: DateTime<Utc>,
}

impl Default for PunchState {
    fn default() -> Self {
        Self {
            phase: PunchPhase::NoEmployee,
            employee: None,
            session_id: None,
            last_activity: Utc::now(),
        }
    }
}

impl PunchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn punched_in(&self) -> bool {
        self.phase == PunchPhase::PunchedIn
    }

    pub fn load_employee(&mut self, employee: Employee, now: DateTime<Utc>) {
        self.employee = Some(employee);
        self.phase = PunchPhase::PunchedOut;
        self.last_activity = now;
    }

    pub fn note_activity(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn idle_elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity).num_seconds()
    }

    /// Apply a dispatched event to the phase. Returns whether the phase
    /// changed. Punch-in and punch-out are the only transitions; every
    /// other event is a self-loop. The flip happens before the network
    /// report and a failed report does not undo it.
    pub fn apply(&mut self, event: PunchEvent) -> bool {
        match event {
            PunchEvent::PunchIn if self.phase == PunchPhase::PunchedOut => {
                self.phase = PunchPhase::PunchedIn;
                self.session_id = Some(Uuid::new_v4().to_string());
                true
            }
            PunchEvent::PunchOut if self.phase == PunchPhase::PunchedIn => {
                self.phase = PunchPhase::PunchedOut;
                self.session_id = None;
                true
            }
            _ => false,
        }
    }
}
