mod directory;
mod error;
mod identity;
mod idle;
mod models;
mod punch;
mod reporter;
mod settings;

use std::sync::Arc;

use directory::DirectoryClient;
use log::info;
use punch::{
    commands::{get_punch_state, initialize_session, punch_event, record_activity},
    PunchController,
};
use reporter::SheetReporter;
use settings::{ServerSettings, SettingsStore};
use tauri::{Emitter, Manager, State};

pub(crate) struct AppState {
    pub(crate) punch: PunchController,
    pub(crate) directory: DirectoryClient,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
fn toggle_fullscreen(window: tauri::WebviewWindow) -> Result<bool, String> {
    let fullscreen = window.is_fullscreen().map_err(|e| e.to_string())?;
    window
        .set_fullscreen(!fullscreen)
        .map_err(|e| e.to_string())?;
    Ok(!fullscreen)
}

#[tauri::command]
fn get_server_settings(state: State<AppState>) -> Result<ServerSettings, String> {
    Ok(state.settings.server())
}

#[tauri::command]
fn set_server_settings(
    settings: ServerSettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_server(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("server-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Punchclock starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;
                let server = settings_store.server();

                let username = identity::current_username()?;
                info!("resolved local user {username}");

                let directory = DirectoryClient::new(&server.base_url);
                let reporter = Arc::new(SheetReporter::new(&server.base_url));
                let punch = PunchController::new(app.handle().clone(), reporter, username);

                app.manage(AppState {
                    punch,
                    directory,
                    settings: settings_store,
                });

                // Kiosk chrome: the main window keeps its close and
                // minimize affordances disabled.
                if let Some(window) = app.get_webview_window("main") {
                    window.set_minimizable(false)?;
                    window.set_closable(false)?;
                }

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            initialize_session,
            get_punch_state,
            punch_event,
            record_activity,
            toggle_fullscreen,
            get_server_settings,
            set_server_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
