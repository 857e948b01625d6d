use log::info;
use tauri::State;

use crate::models::PunchEvent;
use crate::punch::{PunchController, PunchSnapshot};

use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> PunchController {
    state.punch.clone()
}

#[tauri::command]
pub async fn get_punch_state(state: State<'_, AppState>) -> Result<PunchSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

/// Resolve the logged-in user's employee record, populate the session,
/// and start the idle monitor. Idempotent: a second invocation returns
/// the current snapshot without refetching.
#[tauri::command]
pub async fn initialize_session(state: State<'_, AppState>) -> Result<PunchSnapshot, String> {
    let controller = controller_from_state(&state);

    if controller.has_employee().await {
        return Ok(controller.get_snapshot().await);
    }

    let employee = state
        .directory
        .fetch_employee(controller.username())
        .await
        .map_err(|e| e.to_string())?;

    controller.load_employee(employee).await;
    controller
        .start_idle_monitor()
        .await
        .map_err(|e| e.to_string())?;
    info!("session initialized for {}", controller.username());

    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn punch_event(
    state: State<'_, AppState>,
    event_type: String,
) -> Result<String, String> {
    let controller = controller_from_state(&state);
    let event = PunchEvent::from_tag(&event_type)
        .ok_or_else(|| format!("unknown event type: {event_type}"))?;

    controller.dispatch(event).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn record_activity(state: State<'_, AppState>) -> Result<(), String> {
    let controller = controller_from_state(&state);
    controller.note_activity().await;
    Ok(())
}
