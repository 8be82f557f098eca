//! Form controller state
//!
//! `FormState` is the whole of the application's domain state. Every
//! transition goes through one method:
//!
//! ```text
//! idle ──begin_submit──► submitting ──finish(Ok)──► idle (result set)
//!                              └──────finish(Err)─► idle (error set)
//! ```
//!
//! A failed request does not clear an earlier `result`, so a stale resume can
//! sit next to a fresh error message.

use crate::generator::{GenerateError, GenerateRequest, HttpGenerator};
use std::fmt;

/// The only error text the user ever sees for a failed generation
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to generate resume. Please try again.";

/// Why a submission was refused before any request went out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefusal {
    /// A request is already in flight (submit control is disabled)
    InFlight,
    MissingResumeUrl,
    /// Resume URL is not an absolute URL
    InvalidResumeUrl,
    MissingJobDescription,
}

impl fmt::Display for SubmitRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InFlight => write!(f, "A resume is already being generated"),
            Self::MissingResumeUrl => write!(f, "Please fill out the Resume URL field"),
            Self::InvalidResumeUrl => write!(f, "Please enter a valid URL"),
            Self::MissingJobDescription => write!(f, "Please fill out the Job Description field"),
        }
    }
}

impl std::error::Error for SubmitRefusal {}

/// Input fields and request lifecycle state
#[derive(Debug, Default, Clone)]
pub struct FormState {
    pub resume_url: String,
    pub job_description: String,
    loading: bool,
    result: String,
    error: String,
}

impl FormState {
    pub fn new(resume_url: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            resume_url: resume_url.into(),
            job_description: job_description.into(),
            ..Default::default()
        }
    }

    /// True exactly while a request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Last successfully generated text (empty until the first success)
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Current user-facing error (empty when there is none)
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Copy/download are offered only once there is something to export
    pub fn has_result(&self) -> bool {
        !self.result.is_empty()
    }

    /// Start a submission
    ///
    /// Runs the required-field checks, then marks the form as loading and
    /// clears the previous error. On success the returned request must be
    /// sent and its outcome handed to [`FormState::finish`].
    pub fn begin_submit(&mut self) -> Result<GenerateRequest, SubmitRefusal> {
        if self.loading {
            return Err(SubmitRefusal::InFlight);
        }

        // url inputs sanitize away surrounding whitespace
        let resume_url = self.resume_url.trim();
        if resume_url.is_empty() {
            return Err(SubmitRefusal::MissingResumeUrl);
        }
        if reqwest::Url::parse(resume_url).is_err() {
            return Err(SubmitRefusal::InvalidResumeUrl);
        }
        if self.job_description.is_empty() {
            return Err(SubmitRefusal::MissingJobDescription);
        }

        self.loading = true;
        self.error.clear();

        Ok(GenerateRequest {
            resume_url: resume_url.to_string(),
            job_description: self.job_description.clone(),
        })
    }

    /// Apply the outcome of the in-flight request
    ///
    /// Loading is cleared whatever the outcome.
    pub fn finish(&mut self, outcome: Result<String, GenerateError>) {
        match outcome {
            Ok(markdown) => {
                self.result = markdown;
            }
            Err(e) => {
                tracing::error!("Resume generation failed: {}", e);
                self.error = SUBMIT_FAILED_MESSAGE.to_string();
            }
        }
        self.loading = false;
    }
}

/// Run one full submission against `generator`
///
/// Used where nothing else needs to happen while the request is pending.
/// The TUI splits this into `begin_submit` and `finish` around a spawned task.
pub async fn submit(form: &mut FormState, generator: &HttpGenerator) -> Result<(), SubmitRefusal> {
    let request = form.begin_submit()?;
    let outcome = generator.generate(&request).await;
    form.finish(outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::{spawn_endpoint, spawn_slow_endpoint};
    use std::time::Duration;
    use axum::http::StatusCode;
    use serde_json::json;

    fn filled() -> FormState {
        FormState::new("https://example.com/resume.pdf", "Backend role")
    }

    #[test]
    fn test_begin_submit_sets_loading_and_clears_error() {
        let mut form = filled();
        form.error = "old".to_string();

        let request = form.begin_submit().unwrap();
        assert!(form.is_loading());
        assert!(!form.can_submit());
        assert!(form.error().is_empty());
        assert_eq!(request.resume_url, "https://example.com/resume.pdf");
        assert_eq!(request.job_description, "Backend role");
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let mut form = filled();
        form.begin_submit().unwrap();
        assert_eq!(form.begin_submit(), Err(SubmitRefusal::InFlight));
        assert!(form.is_loading());
    }

    #[test]
    fn test_required_fields() {
        let mut form = FormState::new("", "desc");
        assert_eq!(form.begin_submit(), Err(SubmitRefusal::MissingResumeUrl));

        let mut form = FormState::new("not a url", "desc");
        assert_eq!(form.begin_submit(), Err(SubmitRefusal::InvalidResumeUrl));

        let mut form = FormState::new("https://example.com/cv", "");
        assert_eq!(form.begin_submit(), Err(SubmitRefusal::MissingJobDescription));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_url_is_trimmed() {
        let mut form = FormState::new("  https://example.com/cv  ", "desc");
        let request = form.begin_submit().unwrap();
        assert_eq!(request.resume_url, "https://example.com/cv");
    }

    #[test]
    fn test_finish_success_stores_result() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish(Ok("Hello".to_string()));

        assert!(!form.is_loading());
        assert!(form.can_submit());
        assert_eq!(form.result(), "Hello");
        assert!(form.has_result());
        assert!(form.error().is_empty());
    }

    #[test]
    fn test_finish_failure_keeps_previous_result() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish(Ok("First".to_string()));

        form.begin_submit().unwrap();
        form.finish(Err(GenerateError::InvalidFormat));

        assert!(form.can_submit());
        assert_eq!(form.error(), SUBMIT_FAILED_MESSAGE);
        assert_eq!(form.result(), "First");
    }

    #[test]
    fn test_no_result_means_no_exports() {
        let mut form = filled();
        assert!(!form.has_result());
        form.begin_submit().unwrap();
        form.finish(Err(GenerateError::Network("refused".to_string())));
        assert!(!form.has_result());
    }

    #[tokio::test]
    async fn test_submit_round_trip_strips_fence() {
        let reply = json!({"markdown": "```markdown\nHello\n```"}).to_string();
        let (url, captured) = spawn_endpoint(StatusCode::OK, reply).await;
        let generator = HttpGenerator::new(url, None).unwrap();

        let mut form = filled();
        submit(&mut form, &generator).await.unwrap();

        assert_eq!(form.result(), "Hello");
        assert!(!form.is_loading());
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_missing_markdown_shows_fixed_error() {
        let (url, _) = spawn_endpoint(StatusCode::OK, r#"{"oops":true}"#).await;
        let generator = HttpGenerator::new(url, None).unwrap();

        let mut form = filled();
        submit(&mut form, &generator).await.unwrap();

        assert_eq!(form.error(), SUBMIT_FAILED_MESSAGE);
        assert!(form.result().is_empty());
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn test_submit_timeout_shows_fixed_error() {
        let reply = json!({"markdown": "# Too late"}).to_string();
        let (url, _) = spawn_slow_endpoint(StatusCode::OK, reply, Duration::from_secs(2)).await;
        let generator = HttpGenerator::new(url, Some(Duration::from_millis(100))).unwrap();

        let mut form = filled();
        submit(&mut form, &generator).await.unwrap();

        assert_eq!(form.error(), SUBMIT_FAILED_MESSAGE);
        assert!(!form.is_loading());
        assert!(form.result().is_empty());
    }

    #[tokio::test]
    async fn test_submit_refused_sends_nothing() {
        let (url, captured) = spawn_endpoint(StatusCode::OK, "{}").await;
        let generator = HttpGenerator::new(url, None).unwrap();

        let mut form = FormState::new("https://example.com/cv", "");
        assert_eq!(
            submit(&mut form, &generator).await,
            Err(SubmitRefusal::MissingJobDescription)
        );
        assert!(captured.lock().unwrap().is_empty());
    }
}
