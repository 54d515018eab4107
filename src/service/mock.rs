use chrono::Utc;
use color_eyre::{eyre::eyre, Result};
use rand::Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::config::ServiceConfig;

use super::chat::reply_for;
use super::data;
use super::types::{
  Application, ApplicationForm, ApplyReceipt, ChatReply, Envelope, Job, JobQuery, JobsPage,
  Pagination, Profile, ProfilePatch, ProfileUpdate, SaveReceipt, SavedJob, Stat,
};

/// Simulated latency per endpoint, in milliseconds
mod latency {
  pub const GET_JOBS: u64 = 800;
  pub const GET_JOB: u64 = 500;
  pub const SAVE_JOB: u64 = 300;
  pub const APPLY: u64 = 1000;
  pub const GET_PROFILE: u64 = 600;
  pub const UPDATE_PROFILE: u64 = 800;
  pub const PROFILE_STATS: u64 = 400;
  pub const APPLICATIONS: u64 = 700;
  pub const SEARCH: u64 = 900;
  pub const CHAT: u64 = 1200;
}

/// Mock job-board backend.
///
/// Cloning is cheap and clones share the same records, so a profile update made
/// through one handle is visible through every other.
#[derive(Debug, Clone)]
pub struct MockService {
  jobs: Arc<Vec<Job>>,
  profile: Arc<Mutex<Profile>>,
  config: Arc<Mutex<ServiceConfig>>,
  default_limit: u32,
}

impl MockService {
  pub fn new(config: ServiceConfig, default_limit: u32) -> Self {
    Self::with_jobs(config, default_limit, data::jobs())
  }

  /// Create a service over a custom job list.
  pub fn with_jobs(config: ServiceConfig, default_limit: u32, jobs: Vec<Job>) -> Self {
    Self {
      jobs: Arc::new(jobs),
      profile: Arc::new(Mutex::new(data::profile())),
      config: Arc::new(Mutex::new(config)),
      default_limit: default_limit.max(1),
    }
  }

  fn config(&self) -> ServiceConfig {
    *self.config.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Change how often calls fail, for every clone of this service.
  #[cfg(test)]
  pub fn set_failure_rate(&self, rate: f64) {
    self
      .config
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .failure_rate = rate;
  }

  /// Sleep for the endpoint latency, then maybe fail with `failure`.
  async fn simulate(&self, latency_ms: u64, failure: &str) -> Result<()> {
    let config = self.config();
    if config.latency {
      tokio::time::sleep(Duration::from_millis(latency_ms)).await;
    }

    // NaN counts as always failing
    let rate = if config.failure_rate.is_nan() {
      1.0
    } else {
      config.failure_rate.clamp(0.0, 1.0)
    };
    if rand::thread_rng().gen_bool(rate) {
      debug!(failure, "Simulated service failure");
      return Err(eyre!("{}", failure));
    }
    Ok(())
  }

  pub async fn get_jobs(&self, params: &JobQuery) -> Result<JobsPage> {
    self.simulate(latency::GET_JOBS, "Failed to fetch jobs").await?;
    Ok(list_jobs(&self.jobs, params, self.default_limit))
  }

  pub async fn get_job_by_id(&self, id: &str) -> Result<Envelope<Job>> {
    self
      .simulate(latency::GET_JOB, "Failed to fetch job details")
      .await?;

    let job = self
      .jobs
      .iter()
      .find(|job| job.id == id)
      .cloned()
      .ok_or_else(|| eyre!("Job not found"))?;

    Ok(Envelope { data: job })
  }

  pub async fn save_job(&self, job_id: &str) -> Result<SaveReceipt> {
    self.simulate(latency::SAVE_JOB, "Failed to save job").await?;

    Ok(SaveReceipt {
      success: true,
      message: "Job saved successfully".to_string(),
      data: SavedJob {
        job_id: job_id.to_string(),
        saved_at: Utc::now().to_rfc3339(),
      },
    })
  }

  pub async fn apply_to_job(
    &self,
    job_id: &str,
    _application: Option<&ApplicationForm>,
  ) -> Result<ApplyReceipt> {
    self.simulate(latency::APPLY, "Failed to apply to job").await?;

    let now = Utc::now();
    debug!(job_id, "Application submitted");
    Ok(ApplyReceipt {
      success: true,
      message: "Application submitted successfully".to_string(),
      application_id: format!("app_{}", now.timestamp_millis()),
      timestamp: now.to_rfc3339(),
    })
  }

  pub async fn get_profile(&self) -> Result<Envelope<Profile>> {
    self
      .simulate(latency::GET_PROFILE, "Failed to fetch profile")
      .await?;

    let profile = self
      .profile
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone();
    Ok(Envelope { data: profile })
  }

  pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<ProfileUpdate> {
    self
      .simulate(latency::UPDATE_PROFILE, "Failed to update profile")
      .await?;

    let mut current = self.profile.lock().unwrap_or_else(PoisonError::into_inner);
    *current = patch.merge_into(&current);

    Ok(ProfileUpdate {
      success: true,
      message: "Profile updated successfully".to_string(),
      data: current.clone(),
    })
  }

  pub async fn get_profile_stats(&self) -> Result<Envelope<Vec<Stat>>> {
    self
      .simulate(latency::PROFILE_STATS, "Failed to fetch profile stats")
      .await?;
    Ok(Envelope {
      data: data::profile_stats(),
    })
  }

  pub async fn get_applications(&self) -> Result<Envelope<Vec<Application>>> {
    self
      .simulate(latency::APPLICATIONS, "Failed to fetch applications")
      .await?;
    Ok(Envelope {
      data: data::applications(),
    })
  }

  /// Free-text search; `query` overrides any search term in `filters`.
  pub async fn search_jobs(&self, query: &str, filters: &JobQuery) -> Result<JobsPage> {
    self.simulate(latency::SEARCH, "Search failed").await?;

    // A search term already among the filters takes precedence over `query`
    let params = JobQuery {
      search: filters.search.clone().or_else(|| Some(query.to_string())),
      ..filters.clone()
    };
    self.get_jobs(&params).await
  }

  pub async fn send_chat_message(&self, message: &str) -> Result<Envelope<ChatReply>> {
    self.simulate(latency::CHAT, "Failed to send message").await?;

    Ok(Envelope {
      data: ChatReply {
        message: reply_for(message).to_string(),
        timestamp: Utc::now().to_rfc3339(),
      },
    })
  }
}

/// Filter and paginate `jobs` according to `params`.
fn list_jobs(jobs: &[Job], params: &JobQuery, default_limit: u32) -> JobsPage {
  let search = non_empty_lowercase(params.search.as_deref());
  let location = non_empty_lowercase(params.location.as_deref());

  let filtered: Vec<&Job> = jobs
    .iter()
    .filter(|job| match &search {
      Some(term) => {
        job.title.to_lowercase().contains(term)
          || job.company.to_lowercase().contains(term)
          || job.tags.iter().any(|tag| tag.to_lowercase().contains(term))
      }
      None => true,
    })
    .filter(|job| match &location {
      Some(term) => job.location.to_lowercase().contains(term),
      None => true,
    })
    .filter(|job| params.job_type.map_or(true, |t| job.job_type == t))
    .filter(|job| params.experience.map_or(true, |e| job.experience == e))
    .filter(|job| !params.remote || job.is_remote())
    .collect();

  let page = params.page.unwrap_or(1).max(1);
  let limit = params.limit.unwrap_or(default_limit).max(1);
  let total = filtered.len() as u32;
  let start = ((page - 1) as usize).saturating_mul(limit as usize);
  let end = start.saturating_add(limit as usize);

  let data = filtered
    .into_iter()
    .skip(start)
    .take(limit as usize)
    .cloned()
    .collect();

  JobsPage {
    data,
    pagination: Pagination {
      page,
      limit,
      total,
      total_pages: total.div_ceil(limit),
      has_next: end < total as usize,
      has_prev: page > 1,
    },
  }
}

fn non_empty_lowercase(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_lowercase)
}
