use color_eyre::{eyre::eyre, Result};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::service::types::{ApplicationForm, ApplyReceipt, SaveReceipt};
use crate::service::MockService;
use crate::validation::{validate_form, Rule};

use super::request::RequestExecutor;

/// Save and apply. Results are never cached.
///
/// Callers own any optimistic display and the reporting of failures.
#[derive(Debug, Clone)]
pub struct JobActions {
  service: MockService,
  request: RequestExecutor,
}

impl JobActions {
  pub fn new(service: MockService, ttl: Duration) -> Self {
    Self {
      service,
      request: RequestExecutor::new(ttl),
    }
  }

  pub async fn save_job(&self, job_id: &str) -> Result<SaveReceipt> {
    let receipt = self
      .request
      .execute(|| self.service.save_job(job_id), None)
      .await
      .inspect_err(|e| error!(job_id, "Error saving job: {}", e))?;
    info!(job_id, "Job saved");
    Ok(receipt)
  }

  /// Apply with an optional cover letter and resume link. An invalid form is
  /// rejected before the service is called.
  pub async fn apply_to_job(
    &self,
    job_id: &str,
    application: Option<ApplicationForm>,
  ) -> Result<ApplyReceipt> {
    if let Some(form) = &application {
      check_application(form).inspect_err(|e| warn!(job_id, "Rejected application: {}", e))?;
    }

    let receipt = self
      .request
      .execute(
        || self.service.apply_to_job(job_id, application.as_ref()),
        None,
      )
      .await
      .inspect_err(|e| error!(job_id, "Error applying to job: {}", e))?;
    info!(job_id, application_id = %receipt.application_id, "Applied to job");
    Ok(receipt)
  }

  pub fn loading(&self) -> bool {
    self.request.loading()
  }

  #[cfg(test)]
  pub fn error(&self) -> Option<String> {
    self.request.error()
  }
}

const COVER_LETTER_LIMIT: usize = 2000;

fn check_application(form: &ApplicationForm) -> Result<()> {
  let rules = [
    (
      "coverLetter",
      vec![Rule::MaxLength(COVER_LETTER_LIMIT)
        .message("Cover letter must be 2000 characters or fewer")],
    ),
    (
      "resumeUrl",
      vec![Rule::Url.message("Please enter a valid resume URL")],
    ),
  ];
  let values: BTreeMap<String, String> = [
    ("coverLetter", &form.cover_letter),
    ("resumeUrl", &form.resume_url),
  ]
  .into_iter()
  .filter_map(|(key, value)| value.clone().map(|v| (key.to_string(), v)))
  .collect();

  let validation = validate_form(&rules, &values);
  match validation.errors.values().flatten().next() {
    Some(message) => Err(eyre!("{}", message)),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ServiceConfig;

  fn actions(failure_rate: f64) -> JobActions {
    let service = MockService::new(
      ServiceConfig {
        failure_rate,
        latency: true,
      },
      12,
    );
    JobActions::new(service, Duration::from_secs(300))
  }

  #[tokio::test(start_paused = true)]
  async fn test_save_job_echoes_id() {
    let receipt = actions(0.0).save_job("12").await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.data.job_id, "12");
  }

  #[tokio::test(start_paused = true)]
  async fn test_apply_returns_application_id() {
    let form = ApplicationForm {
      cover_letter: Some("Hello".to_string()),
      ..Default::default()
    };
    let receipt = actions(0.0).apply_to_job("4", Some(form)).await.unwrap();
    assert!(receipt.application_id.starts_with("app_"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_invalid_application_is_rejected_before_the_call() {
    let service = MockService::new(
      ServiceConfig {
        failure_rate: 0.0,
        latency: true,
      },
      12,
    );
    let actions = JobActions::new(service, Duration::from_secs(300));
    let form = ApplicationForm {
      resume_url: Some("my-resume.pdf".to_string()),
      ..Default::default()
    };

    let err = actions.apply_to_job("4", Some(form)).await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid resume URL");
    assert!(!actions.loading());
    assert_eq!(actions.error(), None);

    let form = ApplicationForm {
      cover_letter: Some("x".repeat(COVER_LETTER_LIMIT + 1)),
      resume_url: Some("https://example.com/resume.pdf".to_string()),
    };
    let err = actions.apply_to_job("4", Some(form)).await.unwrap_err();
    assert_eq!(err.to_string(), "Cover letter must be 2000 characters or fewer");
  }

  #[tokio::test(start_paused = true)]
  async fn test_actions_are_not_cached() {
    let service = MockService::new(
      ServiceConfig {
        failure_rate: 0.0,
        latency: true,
      },
      12,
    );
    let actions = JobActions::new(service.clone(), Duration::from_secs(300));
    actions.save_job("4").await.unwrap();

    service.set_failure_rate(1.0);
    assert!(actions.save_job("4").await.is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn test_failure_is_reported_to_caller() {
    let actions = actions(1.0);
    let err = actions.save_job("1").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to save job");
    assert_eq!(actions.error().as_deref(), Some("Failed to save job"));
  }
}
