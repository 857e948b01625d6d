use serde::{Deserialize, Serialize};

use crate::error::PunchError;
use crate::models::{Employee, Shift};

/// One-shot lookup of the logged-in user's employee record.
///
/// The directory wraps results in an application envelope; a lookup only
/// succeeds when the HTTP status is success, the envelope statusCode is
/// 200, and the employee payload is present. Failures are returned with
/// the server's own wording and are not retried.
pub struct DirectoryClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct DirectoryEnvelope {
    #[serde(rename = "statusCode")]
    status_code: i64,
    data: Option<EmployeeRecord>,
}

#[derive(Deserialize)]
struct EmployeeRecord {
    #[serde(rename = "_id")]
    id: String,
    shift: Shift,
}

impl DirectoryClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("punchclock/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: format!("{}/demo/findOneUserDetails", base_url.trim_end_matches('/')),
        }
    }

    pub async fn fetch_employee(&self, username: &str) -> Result<Employee, PunchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest { username })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PunchError::Protocol(format!(
                "directory lookup returned HTTP {status}"
            )));
        }

        parse_envelope(&body)
    }
}

fn parse_envelope(body: &str) -> Result<Employee, PunchError> {
    let envelope: DirectoryEnvelope = serde_json::from_str(body)
        .map_err(|err| PunchError::Protocol(format!("malformed directory response: {err}")))?;

    if envelope.status_code != 200 {
        return Err(PunchError::Protocol(format!(
            "directory lookup failed with status {}",
            envelope.status_code
        )));
    }

    let record = envelope
        .data
        .ok_or_else(|| PunchError::Protocol("directory response carried no employee".into()))?;

    Ok(Employee {
        id: record.id,
        shift: record.shift,
    })
}
