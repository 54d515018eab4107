use color_eyre::Result;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::error;

use crate::cache::QueryKey;
use crate::service::types::Application;
use crate::service::MockService;

use super::keys::ResourceKey;
use super::request::RequestExecutor;

/// Applications the user has submitted
#[derive(Debug, Clone)]
pub struct ApplicationsResource {
  service: MockService,
  request: RequestExecutor,
  applications: Arc<Mutex<Vec<Application>>>,
}

impl ApplicationsResource {
  pub fn new(service: MockService, ttl: Duration) -> Self {
    Self {
      service,
      request: RequestExecutor::new(ttl),
      applications: Arc::default(),
    }
  }

  pub async fn fetch_applications(&self) -> Result<Vec<Application>> {
    let applications = self
      .request
      .execute(
        || async { self.service.get_applications().await.map(|found| found.data) },
        Some(&ResourceKey::Applications.cache_key()),
      )
      .await
      .inspect_err(|e| error!("Error fetching applications: {}", e))?;

    *self
      .applications
      .lock()
      .unwrap_or_else(PoisonError::into_inner) = applications.clone();
    Ok(applications)
  }

  pub fn applications(&self) -> Vec<Application> {
    self
      .applications
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn loading(&self) -> bool {
    self.request.loading()
  }

  pub fn error(&self) -> Option<String> {
    self.request.error()
  }

  pub fn clear_error(&self) {
    self.request.clear_error();
  }
}
