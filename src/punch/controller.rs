use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};
use tokio::sync::Mutex;

use crate::error::PunchError;
use crate::idle::IdleMonitor;
use crate::models::{vocabulary, Employee, PunchEvent};
use crate::reporter::{ReportSink, SheetEntry};

use super::{PunchPhase, PunchState};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PunchSnapshot {
    pub phase: PunchPhase,
    pub punched_in: bool,
    pub employee: Option<Employee>,
    pub session_id: Option<String>,
    /// Event tags to render as buttons, in display order. Empty until an
    /// employee is loaded.
    pub vocabulary: Vec<&'static str>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct EventReportedEvent {
    event_type: &'static str,
    response: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct ReportFailedEvent {
    event_type: &'static str,
    error: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct IdleDetectedEvent {
    idle_secs: i64,
}

/// Owns the session state machine and routes every event, button press
/// or synthesized idle, through the same dispatch path: apply the phase
/// transition first, then report best-effort.
pub struct PunchController<R: Runtime = tauri::Wry> {
    state: Arc<Mutex<PunchState>>,
    sink: Arc<dyn ReportSink>,
    app_handle: AppHandle<R>,
    username: String,
    idle: Arc<Mutex<IdleMonitor>>,
}

impl<R: Runtime> Clone for PunchController<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sink: Arc::clone(&self.sink),
            app_handle: self.app_handle.clone(),
            username: self.username.clone(),
            idle: Arc::clone(&self.idle),
        }
    }
}

impl<R: Runtime> PunchController<R> {
    pub fn new(app_handle: AppHandle<R>, sink: Arc<dyn ReportSink>, username: String) -> Self {
        Self {
            state: Arc::new(Mutex::new(PunchState::new())),
            sink,
            app_handle,
            username,
            idle: Arc::new(Mutex::new(IdleMonitor::new())),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn has_employee(&self) -> bool {
        self.state.lock().await.employee.is_some()
    }

    pub async fn get_snapshot(&self) -> PunchSnapshot {
        let state = self.state.lock().await;
        snapshot_of(&state)
    }

    pub async fn load_employee(&self, employee: Employee) {
        {
            let mut state = self.state.lock().await;
            info!(
                "employee {} resolved on {} shift for user {}",
                employee.id,
                employee.shift.as_str(),
                self.username
            );
            state.load_employee(employee, Utc::now());
        }
        self.emit_state_changed().await;
    }

    pub async fn start_idle_monitor(&self) -> Result<()> {
        self.idle.lock().await.start(self.clone())
    }

    pub async fn note_activity(&self) {
        self.state.lock().await.note_activity(Utc::now());
    }

    /// Periodic idle check: under the state lock, test whether the idle
    /// threshold has been crossed while punched in, and if so reset the
    /// activity clock so continued inactivity yields at most one idle
    /// event per threshold period. Returns the elapsed idle seconds when
    /// an idle event should fire.
    pub(crate) async fn take_idle_crossing(&self, threshold_secs: i64) -> Option<i64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let elapsed = state.idle_elapsed_secs(now);

        if state.punched_in() && elapsed > threshold_secs {
            state.note_activity(now);
            Some(elapsed)
        } else {
            None
        }
    }

    pub(crate) async fn notify_idle(&self, idle_secs: i64) {
        let _ = self
            .app_handle
            .emit("idle-detected", IdleDetectedEvent { idle_secs });
    }

    /// Dispatch one event: flip the phase (optimistically, before any
    /// network traffic), then submit the sheet entry. A failed submission
    /// surfaces an error; the flipped phase stays and the event is not
    /// resent or stored.
    pub async fn dispatch(&self, event: PunchEvent) -> Result<String, PunchError> {
        let (entry, phase_changed) = {
            let mut state = self.state.lock().await;
            let employee = state
                .employee
                .clone()
                .ok_or(PunchError::State("employee details are not loaded"))?;

            if event == PunchEvent::Idle && !state.punched_in() {
                return Err(PunchError::State(
                    "idle can only be reported while punched in",
                ));
            }

            let phase_changed = state.apply(event);
            let entry = SheetEntry {
                username: self.username.clone(),
                shift: employee.shift,
                employee_id: employee.id,
                event_type: event,
            };
            (entry, phase_changed)
        };

        if phase_changed {
            self.emit_state_changed().await;
        }

        info!("reporting {} for {}", event.as_str(), self.username);

        match self.sink.submit(&entry).await {
            Ok(body) => {
                let _ = self.app_handle.emit(
                    "event-reported",
                    EventReportedEvent {
                        event_type: event.as_str(),
                        response: body.clone(),
                    },
                );
                Ok(body)
            }
            Err(err) => {
                error!("failed to report {}: {err}", event.as_str());
                let _ = self.app_handle.emit(
                    "event-report-failed",
                    ReportFailedEvent {
                        event_type: event.as_str(),
                        error: err.to_string(),
                    },
                );
                Err(err)
            }
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.get_snapshot().await;
        let _ = self.app_handle.emit("punch-state-changed", snapshot);
    }

    /// Backdate the activity clock, as if the user had been away.
    #[cfg(test)]
    pub(crate) async fn rewind_activity(&self, by: chrono::Duration) {
        let mut state = self.state.lock().await;
        state.last_activity = Utc::now() - by;
    }
}

fn snapshot_of(state: &PunchState) -> PunchSnapshot {
    let vocabulary = state
        .employee
        .as_ref()
        .map(|employee| {
            vocabulary(employee.shift)
                .iter()
                .map(|event| event.as_str())
                .collect()
        })
        .unwrap_or_default();

    PunchSnapshot {
        phase: state.phase,
        punched_in: state.punched_in(),
        employee: state.employee.clone(),
        session_id: state.session_id.clone(),
        vocabulary,
    }
}
