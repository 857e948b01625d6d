use async_trait::async_trait;
use serde::Serialize;

use crate::error::PunchError;
use crate::models::{PunchEvent, Shift};

/// One row of the remote employee sheet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SheetEntry {
    pub username: String,
    pub shift: Shift,
    pub employee_id: String,
    pub event_type: PunchEvent,
}

/// Destination for punch events.
///
/// Best-effort by contract: a single attempt per event, no retry, no
/// queueing, no offline buffering. A failed submission is surfaced to
/// the user and the event is dropped.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Returns the raw response body, which is shown to the user as-is.
    async fn submit(&self, entry: &SheetEntry) -> Result<String, PunchError>;
}

pub struct SheetReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl SheetReporter {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("punchclock/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: format!("{}/demo/employeeSheet", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ReportSink for SheetReporter {
    async fn submit(&self, entry: &SheetEntry) -> Result<String, PunchError> {
        let response = self.client.post(&self.endpoint).json(entry).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PunchError::Protocol(format!(
                "sheet endpoint returned HTTP {status}: {body}"
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    };

    use async_trait::async_trait;

    use super::{ReportSink, SheetEntry};
    use crate::error::PunchError;

    /// In-memory sink that captures submitted entries and can simulate a
    /// dead transport.
    pub struct MockSink {
        entries: Mutex<Vec<SheetEntry>>,
        should_fail: AtomicBool,
    }

    impl MockSink {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(Vec::new()),
                should_fail: AtomicBool::new(false),
            })
        }

        pub fn captured(&self) -> Vec<SheetEntry> {
            self.entries.lock().unwrap().clone()
        }

        pub fn set_should_fail(&self, fail: bool) {
            self.should_fail.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ReportSink for MockSink {
        async fn submit(&self, entry: &SheetEntry) -> Result<String, PunchError> {
            self.entries.lock().unwrap().push(entry.clone());
            if self.should_fail.load(Ordering::SeqCst) {
                Err(PunchError::Transport("mock transport offline".into()))
            } else {
                Ok(r#"{"ok":true}"#.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn entry() -> SheetEntry {
        SheetEntry {
            username: "jdoe".into(),
            shift: Shift::Day,
            employee_id: "E1".into(),
            event_type: PunchEvent::CoffeeBreak,
        }
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["username"], "jdoe");
        assert_eq!(json["shift"], "day");
        assert_eq!(json["employeeId"], "E1");
        assert_eq!(json["eventType"], "coffee-break");
    }

    #[tokio::test]
    async fn submit_returns_response_body_verbatim() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let body = r#"{"ok":true,"row":42}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        });

        let reporter = SheetReporter::new(&format!("http://{addr}"));
        let body = reporter.submit(&entry()).await.unwrap();
        assert_eq!(body, r#"{"ok":true,"row":42}"#);
    }

    #[tokio::test]
    async fn unreachable_sheet_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = SheetReporter::new(&format!("http://{addr}"));
        let err = reporter.submit(&entry()).await.unwrap_err();
        assert!(matches!(err, PunchError::Transport(_)));
    }
}
