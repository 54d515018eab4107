use color_eyre::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error};

use crate::cache::QueryKey;
use crate::service::types::{Job, JobQuery, JobsPage, Pagination};
use crate::service::MockService;

use super::keys::ResourceKey;
use super::request::RequestExecutor;

#[derive(Debug, Default)]
struct JobsState {
  jobs: Vec<Job>,
  pagination: Option<Pagination>,
}

/// Job listings, search and single-job lookup.
///
/// Holds the last listing page that loaded successfully; a failed call leaves
/// it in place and surfaces through [`error`](Self::error).
#[derive(Debug, Clone)]
pub struct JobsResource {
  service: MockService,
  request: RequestExecutor,
  state: Arc<Mutex<JobsState>>,
}

impl JobsResource {
  pub fn new(service: MockService, ttl: Duration) -> Self {
    Self {
      service,
      request: RequestExecutor::new(ttl),
      state: Arc::default(),
    }
  }

  fn lock(&self) -> MutexGuard<'_, JobsState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub async fn fetch_jobs(&self, params: JobQuery) -> Result<JobsPage> {
    let key = ResourceKey::jobs(&params);
    debug!(query = %key.description(), "Fetching jobs");

    let result = self
      .request
      .execute(|| self.service.get_jobs(&params), Some(&key.cache_key()))
      .await;
    self.apply(result, "Error fetching jobs")
  }

  pub async fn search_jobs(&self, query: &str, filters: JobQuery) -> Result<JobsPage> {
    let key = ResourceKey::search(query, &filters);
    debug!(query = %key.description(), "Searching jobs");

    let result = self
      .request
      .execute(
        || self.service.search_jobs(query, &filters),
        Some(&key.cache_key()),
      )
      .await;
    self.apply(result, "Error searching jobs")
  }

  /// Look up one job. The listing state is left alone.
  pub async fn fetch_job(&self, id: &str) -> Result<Job> {
    let key = ResourceKey::Job(id.to_string());

    self
      .request
      .execute(
        || async { self.service.get_job_by_id(id).await.map(|found| found.data) },
        Some(&key.cache_key()),
      )
      .await
      .inspect_err(|e| error!(job_id = id, "Error fetching job: {}", e))
  }

  fn apply(&self, result: Result<JobsPage>, context: &str) -> Result<JobsPage> {
    match result {
      Ok(page) => {
        let mut state = self.lock();
        state.jobs = page.data.clone();
        state.pagination = Some(page.pagination);
        Ok(page)
      }
      Err(e) => {
        error!("{}: {}", context, e);
        Err(e)
      }
    }
  }

  pub fn jobs(&self) -> Vec<Job> {
    self.lock().jobs.clone()
  }

  pub fn pagination(&self) -> Option<Pagination> {
    self.lock().pagination
  }

  pub fn loading(&self) -> bool {
    self.request.loading()
  }

  pub fn error(&self) -> Option<String> {
    self.request.error()
  }

  pub fn clear_cache(&self) {
    self.request.clear_cache(None);
  }

  pub fn clear_error(&self) {
    self.request.clear_error();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ServiceConfig;
  use crate::service::types::JobType;

  const TTL: Duration = Duration::from_secs(300);

  fn resource() -> (MockService, JobsResource) {
    let service = MockService::new(
      ServiceConfig {
        failure_rate: 0.0,
        latency: true,
      },
      12,
    );
    (service.clone(), JobsResource::new(service, TTL))
  }

  #[tokio::test(start_paused = true)]
  async fn test_first_page_pagination() {
    let (_, jobs) = resource();

    jobs
      .fetch_jobs(JobQuery::default().page(1).limit(12))
      .await
      .unwrap();

    assert_eq!(jobs.jobs().len(), 12);
    assert_eq!(
      jobs.pagination(),
      Some(Pagination {
        page: 1,
        limit: 12,
        total: 30,
        total_pages: 3,
        has_next: true,
        has_prev: false,
      })
    );
    assert!(!jobs.loading());
  }

  #[tokio::test(start_paused = true)]
  async fn test_failure_keeps_previous_page() {
    let (service, jobs) = resource();
    jobs
      .fetch_jobs(JobQuery::default().page(1))
      .await
      .unwrap();
    let before = jobs.jobs();

    service.set_failure_rate(1.0);
    let err = jobs
      .fetch_jobs(JobQuery::default().page(2))
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch jobs");
    assert_eq!(jobs.jobs(), before);
    assert_eq!(jobs.pagination().map(|p| p.page), Some(1));
    assert_eq!(jobs.error().as_deref(), Some("Failed to fetch jobs"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_parameter_sets_cache_independently() {
    let (service, jobs) = resource();
    jobs.fetch_jobs(JobQuery::default().page(1)).await.unwrap();
    jobs.fetch_jobs(JobQuery::default().page(2)).await.unwrap();

    // Both pages are cached, so a broken service can't affect them
    service.set_failure_rate(1.0);
    let page_one = jobs.fetch_jobs(JobQuery::default().page(1)).await.unwrap();
    assert_eq!(page_one.pagination.page, 1);
    assert_eq!(jobs.pagination().map(|p| p.page), Some(1));

    let filtered = JobQuery {
      job_type: Some(JobType::Contract),
      ..JobQuery::default().page(1)
    };
    assert!(jobs.fetch_jobs(filtered).await.is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn test_search_replaces_listing() {
    let (_, jobs) = resource();
    jobs.fetch_jobs(JobQuery::default()).await.unwrap();

    let page = jobs
      .search_jobs("designer", JobQuery::default())
      .await
      .unwrap();

    assert_eq!(page.pagination.total, 2);
    assert_eq!(jobs.jobs().len(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_fetch_job_by_id() {
    let (_, jobs) = resource();

    let job = jobs.fetch_job("3").await.unwrap();
    assert_eq!(job.id, "3");
    assert!(jobs.jobs().is_empty());

    let err = jobs.fetch_job("404").await.unwrap_err();
    assert_eq!(err.to_string(), "Job not found");
    assert_eq!(jobs.error().as_deref(), Some("Job not found"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_clear_cache_forces_refetch() {
    let (service, jobs) = resource();
    jobs.fetch_jobs(JobQuery::default()).await.unwrap();

    service.set_failure_rate(1.0);
    assert!(jobs.fetch_jobs(JobQuery::default()).await.is_ok());

    jobs.clear_cache();
    assert!(jobs.fetch_jobs(JobQuery::default()).await.is_err());
  }
}
