use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{error, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::models::PunchEvent;
use crate::punch::PunchController;

pub const CHECK_INTERVAL_SECS: u64 = 60;
pub const IDLE_THRESHOLD_SECS: i64 = 2 * 60;

/// Owns the periodic idle check. Started once the employee is loaded and
/// runs until the app exits; `stop` cancels the loop and joins the task.
pub struct IdleMonitor {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    check_interval: Duration,
    threshold_secs: i64,
}

impl IdleMonitor {
    pub fn new() -> Self {
        let debug_mode = std::env::var("PUNCHCLOCK_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let (check_interval, threshold_secs) = if debug_mode {
            (Duration::from_secs(5), 10)
        } else {
            (Duration::from_secs(CHECK_INTERVAL_SECS), IDLE_THRESHOLD_SECS)
        };

        Self {
            handle: None,
            cancel_token: None,
            check_interval,
            threshold_secs,
        }
    }

    #[cfg(test)]
    fn with_timing(check_interval: Duration, threshold_secs: i64) -> Self {
        Self {
            handle: None,
            cancel_token: None,
            check_interval,
            threshold_secs,
        }
    }

    pub fn start<R: tauri::Runtime>(&mut self, controller: PunchController<R>) -> Result<()> {
        if self.handle.is_some() {
            bail!("idle monitor already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(idle_loop(
            controller,
            token_clone,
            self.check_interval,
            self.threshold_secs,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("idle monitor task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

async fn idle_loop<R: tauri::Runtime>(
    controller: PunchController<R>,
    cancel_token: CancellationToken,
    check_interval: Duration,
    threshold_secs: i64,
) {
    let mut ticker = tokio::time::interval(check_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(idle_secs) = controller.take_idle_crossing(threshold_secs).await {
                    info!("no activity for {idle_secs}s; reporting idle event");
                    controller.notify_idle(idle_secs).await;

                    if let Err(err) = controller.dispatch(PunchEvent::Idle).await {
                        error!("idle report failed: {err}");
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("idle monitor shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Shift};
    use crate::reporter::testing::MockSink;
    use std::sync::Arc;

    async fn punched_in_controller(
        app: &tauri::App<tauri::test::MockRuntime>,
        sink: Arc<MockSink>,
    ) -> PunchController<tauri::test::MockRuntime> {
        let controller = PunchController::new(app.handle().clone(), sink, "jdoe".into());
        controller
            .load_employee(Employee {
                id: "E1".into(),
                shift: Shift::Day,
            })
            .await;
        controller.dispatch(PunchEvent::PunchIn).await.unwrap();
        controller
    }

    #[tokio::test]
    async fn monitor_reports_a_single_idle_event_for_continued_inactivity() {
        let app = tauri::test::mock_app();
        let sink = MockSink::new();
        let controller = punched_in_controller(&app, sink.clone()).await;

        controller.rewind_activity(chrono::Duration::seconds(180)).await;

        let mut monitor = IdleMonitor::with_timing(Duration::from_millis(20), 120);
        monitor.start(controller.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        monitor.stop().await.unwrap();

        let idle_reports = sink
            .captured()
            .into_iter()
            .filter(|entry| entry.event_type == PunchEvent::Idle)
            .count();
        assert_eq!(idle_reports, 1);
        assert!(controller.get_snapshot().await.punched_in);
    }

    #[tokio::test]
    async fn monitor_stays_quiet_while_punched_out() {
        let app = tauri::test::mock_app();
        let sink = MockSink::new();
        let controller = punched_in_controller(&app, sink.clone()).await;
        controller.dispatch(PunchEvent::PunchOut).await.unwrap();

        controller.rewind_activity(chrono::Duration::seconds(3600)).await;
        let reported_before = sink.captured().len();

        let mut monitor = IdleMonitor::with_timing(Duration::from_millis(20), 120);
        monitor.start(controller.clone()).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        monitor.stop().await.unwrap();

        assert_eq!(sink.captured().len(), reported_before);
    }

    #[tokio::test]
    async fn monitor_rejects_a_second_start() {
        let app = tauri::test::mock_app();
        let sink = MockSink::new();
        let controller = punched_in_controller(&app, sink.clone()).await;

        let mut monitor = IdleMonitor::with_timing(Duration::from_millis(20), 120);
        monitor.start(controller.clone()).unwrap();
        assert!(monitor.start(controller.clone()).is_err());
        monitor.stop().await.unwrap();
    }
}
