//! Paper extraction job client
//!
//! Submits an analysis job to the extraction backend and polls its status
//! endpoint until the job completes, fails, or the poll budget runs out.

pub mod error;
pub mod normalize;
pub mod policy;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{
    ExtractionRequest, JobState, JobStatus, JobSubmission, NormalizedAnalysisResult,
    SubmitResponse,
};

pub use error::{BackendError, ExtractionError, ValidationError};
pub use policy::PollPolicy;

/// Job queue endpoints of the extraction backend
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    async fn submit(&self, job: &JobSubmission) -> Result<SubmitResponse, BackendError>;

    async fn status(&self, job_id: &str) -> Result<JobStatus, BackendError>;
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
}

/// HTTP implementation of the extraction backend
pub struct HttpExtractionBackend {
    client: Client,
    base_url: String,
}

impl HttpExtractionBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ExtractionBackend for HttpExtractionBackend {
    async fn submit(&self, job: &JobSubmission) -> Result<SubmitResponse, BackendError> {
        let url = super::endpoint(&self.base_url, &["api", "extract"])?;

        tracing::debug!(
            url = %url,
            extraction_type = %job.extraction_type,
            text_length = job.paper_text.len(),
            "Submitting extraction job"
        );

        let response = self.client.post(url).json(job).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .json::<BackendErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Backend service unavailable".to_string());
            return Err(BackendError::Status { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to deserialize job reply: {}", e)))
    }

    async fn status(&self, job_id: &str) -> Result<JobStatus, BackendError> {
        let url = super::endpoint(&self.base_url, &["api", "extract", "status", job_id])?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("Failed to deserialize job status: {}", e)))
    }
}

/// Client-side driver of the extraction job lifecycle
pub struct ExtractionJobClient {
    backend: Arc<dyn ExtractionBackend>,
    policy: PollPolicy,
}

impl ExtractionJobClient {
    pub fn new(backend: Arc<dyn ExtractionBackend>, policy: PollPolicy) -> Self {
        Self { backend, policy }
    }

    /// Validate, submit, and wait for an analysis
    pub async fn submit_and_await(
        &self,
        request: &ExtractionRequest,
    ) -> Result<NormalizedAnalysisResult, ExtractionError> {
        let submission = validation::validate_request(request)?;

        let job_id = self.submit(&submission).await?;
        tracing::info!(
            job_id = %job_id,
            extraction_type = %submission.extraction_type,
            text_length = submission.paper_text.chars().count(),
            "Extraction job created"
        );

        let result = self.await_job(&job_id).await?;
        tracing::info!(job_id = %job_id, "Extraction completed");

        Ok(normalize::normalize(result))
    }

    /// Run the pipeline, folding every post-validation failure into a degraded result
    pub async fn analyze(
        &self,
        request: &ExtractionRequest,
    ) -> Result<NormalizedAnalysisResult, ValidationError> {
        match self.submit_and_await(request).await {
            Ok(result) => Ok(result),
            Err(ExtractionError::Validation(e)) => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Extraction failed, returning degraded result");
                Ok(normalize::degraded(e.to_string()))
            }
        }
    }

    async fn submit(&self, submission: &JobSubmission) -> Result<String, ExtractionError> {
        let reply = self
            .backend
            .submit(submission)
            .await
            .map_err(|e| ExtractionError::Submission(e.to_string()))?;

        reply
            .job_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ExtractionError::Submission("Backend did not return job ID".to_string()))
    }

    async fn await_job(&self, job_id: &str) -> Result<crate::model::BackendAnalysis, ExtractionError> {
        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(self.policy.delay()).await;

            let status = match self.backend.status(job_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(job_id = %job_id, attempt, error = %e, "Status check failed");
                    continue;
                }
            };

            tracing::debug!(
                job_id = %job_id,
                attempt,
                state = ?status.state,
                progress = ?status.progress,
                "Polled extraction job"
            );

            match status.state {
                JobState::Completed => match status.result {
                    Some(result) => return Ok(result),
                    None => {
                        tracing::warn!(job_id = %job_id, attempt, "Job completed without a result");
                    }
                },
                JobState::Failed => {
                    let reason = status
                        .failed_reason
                        .filter(|r| !r.trim().is_empty())
                        .unwrap_or_else(|| "Unknown error".to_string());
                    tracing::warn!(job_id = %job_id, attempt, reason = %reason, "Extraction job failed");
                    return Err(ExtractionError::JobFailed(reason));
                }
                JobState::Queued | JobState::Processing | JobState::Unknown => {}
            }
        }

        tracing::warn!(
            job_id = %job_id,
            attempts = self.policy.max_attempts,
            "Extraction job did not reach a terminal state"
        );

        Err(ExtractionError::Timeout {
            attempts: self.policy.max_attempts,
            waited: self.policy.ceiling(),
        })
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::testing::{completed, failed, state, Poll, ScriptedBackend};
    use super::*;
    use crate::service::stub::StubServer;

    fn paper_request() -> ExtractionRequest {
        ExtractionRequest {
            paper_text: Some("The study enrolled volunteers. ".repeat(5)),
            ..Default::default()
        }
    }

    fn client(backend: Arc<ScriptedBackend>) -> ExtractionJobClient {
        ExtractionJobClient::new(backend, PollPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_polling_once_completed() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            state(JobState::Queued),
            state(JobState::Processing),
            completed(json!({"methods": "Survey", "reliability_score": 3.0})),
        ]));
        let started = tokio::time::Instant::now();

        let result = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap();

        assert_eq!(backend.submits(), 1);
        assert_eq!(backend.polls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        assert_eq!(result.methods, "Survey");
        assert_eq!(result.reliability_score, 1.0);
        assert_eq!(result.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_max_attempts() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));

        let err = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap_err();

        assert_eq!(backend.polls(), 60);
        assert!(matches!(err, ExtractionError::Timeout { attempts: 60, .. }));
        assert_eq!(
            err.to_string(),
            "Job did not complete within timeout (120 seconds)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_degraded_result() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));

        let result = client(backend.clone())
            .analyze(&paper_request())
            .await
            .unwrap();

        assert_eq!(backend.polls(), 60);
        assert_eq!(result.reliability_score, 0.0);
        assert!(result.error.unwrap().contains("timeout"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_ends_loop() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            state(JobState::Processing),
            failed("PDF could not be parsed"),
            completed(json!({})),
        ]));

        let err = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap_err();

        assert_eq!(backend.polls(), 2);
        assert_eq!(err.to_string(), "Job failed: PDF could not be parsed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_consume_attempts() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Poll::Error,
            Poll::Error,
            completed(json!({"conclusions": "Works"})),
        ]));
        let policy = PollPolicy {
            max_attempts: 3,
            ..PollPolicy::default()
        };

        let result = ExtractionJobClient::new(backend.clone(), policy)
            .submit_and_await(&paper_request())
            .await
            .unwrap();

        assert_eq!(backend.polls(), 3);
        assert_eq!(result.conclusions, "Works");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_can_exhaust_budget() {
        let backend = Arc::new(ScriptedBackend::new(vec![Poll::Error, Poll::Error]));
        let policy = PollPolicy {
            max_attempts: 2,
            ..PollPolicy::default()
        };

        let err = ExtractionJobClient::new(backend.clone(), policy)
            .submit_and_await(&paper_request())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Timeout { attempts: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_result_keeps_polling() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            state(JobState::Completed),
            completed(json!({"methods": "Meta-analysis"})),
        ]));

        let result = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap();

        assert_eq!(backend.polls(), 2);
        assert_eq!(result.methods, "Meta-analysis");
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_backend_call() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let client = client(backend.clone());

        let err = client
            .submit_and_await(&ExtractionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Validation(ValidationError::MissingInput)
        ));

        let short = ExtractionRequest {
            paper_text: Some("x".repeat(99)),
            ..Default::default()
        };
        let err = client.analyze(&short).await.unwrap_err();
        assert!(matches!(err, ValidationError::TextTooShort { .. }));

        assert_eq!(backend.submits(), 0);
        assert_eq!(backend.polls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hundred_characters_proceeds_to_submission() {
        let backend = Arc::new(ScriptedBackend::new(vec![completed(json!({}))]));
        let request = ExtractionRequest {
            paper_text: Some("x".repeat(100)),
            ..Default::default()
        };

        client(backend.clone()).submit_and_await(&request).await.unwrap();

        assert_eq!(backend.submits(), 1);
    }

    #[tokio::test]
    async fn test_missing_job_id_is_submission_error() {
        let backend = Arc::new(
            ScriptedBackend::new(vec![]).with_submit_reply(Ok(SubmitResponse { job_id: None })),
        );

        let err = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Submission(_)));
        assert_eq!(err.to_string(), "Backend did not return job ID");
        assert_eq!(backend.polls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_degraded() {
        let backend = Arc::new(ScriptedBackend::new(vec![]).with_submit_reply(Err(
            BackendError::Status {
                status: 500,
                message: "queue offline".to_string(),
            },
        )));

        let result = client(backend).analyze(&paper_request()).await.unwrap();

        assert_eq!(
            result.error.as_deref(),
            Some("Backend error: 500 - queue offline")
        );
        assert_eq!(result.methods, "Analysis failed due to technical error");
    }

    #[test]
    fn test_status_payload_parses_queue_aliases() {
        let status: JobStatus =
            serde_json::from_value(json!({"state": "active", "progress": 40})).unwrap();
        assert_eq!(status.state, JobState::Processing);

        let status: JobStatus = serde_json::from_value(json!({"state": "waiting"})).unwrap();
        assert_eq!(status.state, JobState::Queued);

        let status: JobStatus = serde_json::from_value(json!({
            "state": "failed",
            "failedReason": "boom"
        }))
        .unwrap();
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(status.failed_reason.as_deref(), Some("boom"));

        let status: JobStatus = serde_json::from_value(json!({"state": "stuck"})).unwrap();
        assert_eq!(status.state, JobState::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loosely_typed_result_completes_on_first_poll() {
        let status: JobStatus = serde_json::from_value(json!({
            "state": "completed",
            "result": {
                "methods": "RCT",
                "conclusions": ["A", "B"],
                "reliability_score": "0.9"
            }
        }))
        .unwrap();
        let backend = Arc::new(ScriptedBackend::new(vec![Poll::Status(status)]));

        let result = client(backend.clone())
            .submit_and_await(&paper_request())
            .await
            .unwrap();

        assert_eq!(backend.polls(), 1);
        assert_eq!(result.methods, "RCT");
        assert_eq!(result.conclusions, "A; B");
        assert_eq!(result.reliability_score, 0.9);
        assert_eq!(result.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_text_of_sufficient_length_is_submitted() {
        let backend = Arc::new(ScriptedBackend::new(vec![completed(json!({}))]));
        let request = ExtractionRequest {
            paper_text: Some(" ".repeat(150)),
            ..Default::default()
        };

        client(backend.clone()).submit_and_await(&request).await.unwrap();

        assert_eq!(backend.submits(), 1);
        assert_eq!(backend.polls(), 1);
    }

    fn submission() -> JobSubmission {
        JobSubmission {
            paper_url: String::new(),
            paper_text: "x".repeat(120),
            extraction_type: "numerical".to_string(),
            project_id: Some("proj-7".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_submit_request_on_the_wire() {
        let stub = StubServer::start(200, json!({"jobId": "job-42", "status": "queued"}));

        let reply = HttpExtractionBackend::new(&stub.url)
            .submit(&submission())
            .await
            .unwrap();

        assert_eq!(reply.job_id.as_deref(), Some("job-42"));

        let request = stub.single_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/extract");
        assert_eq!(
            request.json(),
            json!({
                "paper_url": "",
                "paper_text": "x".repeat(120),
                "extraction_type": "numerical",
                "project_id": "proj-7"
            })
        );
    }

    #[actix_web::test]
    async fn test_submit_error_uses_backend_message() {
        let stub = StubServer::start(500, json!({"error": "queue offline"}));

        let err = HttpExtractionBackend::new(&stub.url)
            .submit(&submission())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Backend error: 500 - queue offline");
    }

    #[actix_web::test]
    async fn test_submit_error_without_message_reports_unavailable() {
        let stub = StubServer::start(503, json!("Service Unavailable"));

        let err = HttpExtractionBackend::new(&stub.url)
            .submit(&submission())
            .await
            .unwrap_err();

        match err {
            BackendError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Backend service unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    async fn test_status_request_on_the_wire() {
        let stub = StubServer::start(
            200,
            json!({
                "state": "completed",
                "progress": 100,
                "result": {"methods": 3, "relevance_score": "0.4"}
            }),
        );

        let status = HttpExtractionBackend::new(&format!("{}/", stub.url))
            .status("job/7?x=1")
            .await
            .unwrap();

        assert_eq!(status.state, JobState::Completed);
        let result = normalize::normalize(status.result.unwrap());
        assert_eq!(result.methods, "3");
        assert_eq!(result.relevance_score, 0.4);

        let request = stub.single_request();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/extract/status/job%2F7%3Fx=1");
        assert_eq!(request.query, None);
    }

    #[actix_web::test]
    async fn test_status_error_keeps_body_text() {
        let stub = StubServer::start(404, json!("Job not found"));

        let err = HttpExtractionBackend::new(&stub.url)
            .status("job-9")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Backend error: 404 - Job not found");
    }
}
