//! Client for the external transcription/alignment job service.
//!
//! The service receives the media payload (plus optional reference text for
//! alignment), works asynchronously, and is polled until it reports a
//! terminal state. Its output is plain subtitle text, consumed through the
//! codec decode path only; the caller applies the decoded cues with a single
//! atomic timeline replace, so a failed or empty result leaves the timeline
//! untouched.

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec;
use crate::constants::{JOB_POLL_ATTEMPTS, JOB_POLL_INTERVAL};
use crate::error::EditError;
use crate::state::CueSnapshot;

/// What to send the job service.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Media payload bytes.
    pub media: Vec<u8>,
    /// File name hint for the payload part.
    pub media_name: String,
    /// Optional reference text for alignment jobs.
    pub reference_text: Option<String>,
}

/// HTTP client for one job service endpoint.
#[derive(Debug, Clone)]
pub struct JobClient {
    client: reqwest::Client,
    base_url: String,
}

impl JobClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Submit a job. Returns the service-assigned job id.
    pub async fn submit(&self, request: JobRequest) -> Result<String, EditError> {
        let mut form = reqwest::multipart::Form::new().part(
            "media",
            reqwest::multipart::Part::bytes(request.media).file_name(request.media_name),
        );
        if let Some(reference) = request.reference_text {
            form = form.text("reference", reference);
        }

        let response = self
            .client
            .post(self.url("jobs"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| EditError::ExternalJob(format!("failed to submit job: {}", err)))?;
        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|err| EditError::ExternalJob(format!("failed to parse response: {}", err)))?;
        if !status.is_success() {
            return Err(EditError::ExternalJob(format!(
                "job service rejected submission ({}): {}",
                status, payload
            )));
        }
        payload
            .get("job_id")
            .and_then(|value| value.as_str())
            .map(|value| value.to_string())
            .ok_or_else(|| EditError::ExternalJob("response missing job_id".to_string()))
    }

    /// Poll a job until it reports `done` or `error`, then return its
    /// subtitle text.
    pub async fn poll(&self, job_id: &str) -> Result<String, EditError> {
        let url = self.url(&format!("jobs/{}", job_id));
        for _ in 0..JOB_POLL_ATTEMPTS {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|err| EditError::ExternalJob(format!("failed to query job: {}", err)))?;
            let payload: Value = response
                .json()
                .await
                .map_err(|err| EditError::ExternalJob(format!("failed to parse job: {}", err)))?;

            match payload.get("status").and_then(|value| value.as_str()) {
                Some("done") => {
                    return payload
                        .get("result")
                        .and_then(|value| value.as_str())
                        .map(|value| value.to_string())
                        .ok_or_else(|| {
                            EditError::ExternalJob("done job carried no result".to_string())
                        });
                }
                Some("error") => {
                    let message = payload
                        .get("message")
                        .and_then(|value| value.as_str())
                        .unwrap_or("job failed");
                    warn!(job_id, message, "job service reported failure");
                    return Err(EditError::ExternalJob(message.to_string()));
                }
                other => {
                    debug!(job_id, status = ?other, "job still pending");
                }
            }

            tokio::time::sleep(JOB_POLL_INTERVAL).await;
        }
        Err(EditError::ExternalJob(
            "timed out waiting for job result".to_string(),
        ))
    }

    /// Submit, wait, and decode in one step. An empty decode is treated as
    /// a job failure so the caller never swaps in a blank timeline.
    pub async fn transcribe(&self, request: JobRequest) -> Result<Vec<CueSnapshot>, EditError> {
        let job_id = self.submit(request).await?;
        let text = self.poll(&job_id).await?;
        let records = codec::decode(&text);
        if records.is_empty() {
            return Err(EditError::ExternalJob(
                "job result contained no usable cues".to_string(),
            ));
        }
        Ok(records)
    }
}
