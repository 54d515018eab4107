//! Records returned by the mock job-board service.

use serde::{Deserialize, Serialize};

/// Employment type of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
  #[serde(rename = "Full-time")]
  FullTime,
  #[serde(rename = "Part-time")]
  PartTime,
  #[serde(rename = "Contract")]
  Contract,
  #[serde(rename = "Internship")]
  Internship,
}

impl JobType {
  pub const ALL: [JobType; 4] = [
    JobType::FullTime,
    JobType::PartTime,
    JobType::Contract,
    JobType::Internship,
  ];

  pub fn label(self) -> &'static str {
    match self {
      JobType::FullTime => "Full-time",
      JobType::PartTime => "Part-time",
      JobType::Contract => "Contract",
      JobType::Internship => "Internship",
    }
  }
}

/// Seniority a posting asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
  #[serde(rename = "Entry Level")]
  Entry,
  #[serde(rename = "Mid Level")]
  Mid,
  #[serde(rename = "Senior Level")]
  Senior,
  #[serde(rename = "Lead")]
  Lead,
}

impl ExperienceLevel {
  pub const ALL: [ExperienceLevel; 4] = [
    ExperienceLevel::Entry,
    ExperienceLevel::Mid,
    ExperienceLevel::Senior,
    ExperienceLevel::Lead,
  ];

  pub fn label(self) -> &'static str {
    match self {
      ExperienceLevel::Entry => "Entry Level",
      ExperienceLevel::Mid => "Mid Level",
      ExperienceLevel::Senior => "Senior Level",
      ExperienceLevel::Lead => "Lead",
    }
  }
}

/// A job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
  pub id: String,
  pub title: String,
  pub company: String,
  /// Short badge shown in place of a company logo
  pub logo: String,
  pub location: String,
  #[serde(rename = "type")]
  pub job_type: JobType,
  pub experience: ExperienceLevel,
  pub salary: String,
  pub posted: String,
  pub description: String,
  pub tags: Vec<String>,
  /// Match score against the current profile, in percent
  pub compatibility: u8,
}

impl Job {
  pub fn is_remote(&self) -> bool {
    self.location.to_lowercase().contains("remote")
  }
}

/// Listing parameters for job queries.
///
/// Every field is optional; `None` means "no constraint" except for `page`
/// (defaults to 1) and `limit` (defaults to the service's page limit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_type: Option<JobType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub experience: Option<ExperienceLevel>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub remote: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit: Option<u32>,
}

impl JobQuery {
  pub fn page(mut self, page: u32) -> Self {
    self.page = Some(page);
    self
  }

  #[cfg(test)]
  pub fn limit(mut self, limit: u32) -> Self {
    self.limit = Some(limit);
    self
  }
}

/// Paging metadata for a job listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page: u32,
  pub limit: u32,
  pub total: u32,
  pub total_pages: u32,
  pub has_next: bool,
  pub has_prev: bool,
}

/// One page of a job listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsPage {
  pub data: Vec<Job>,
  pub pagination: Pagination,
}

/// Single-record envelope used by most endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub data: T,
}

/// The user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub name: String,
  pub title: String,
  pub email: String,
  pub phone: String,
  pub location: String,
  pub experience: String,
  pub education: String,
  pub bio: String,
}

/// Partial profile update; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub experience: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub education: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,
}

impl ProfilePatch {
  /// Apply this patch over `profile`, returning the merged record
  pub fn merge_into(&self, profile: &Profile) -> Profile {
    let pick = |patched: &Option<String>, current: &String| {
      patched.clone().unwrap_or_else(|| current.clone())
    };

    Profile {
      name: pick(&self.name, &profile.name),
      title: pick(&self.title, &profile.title),
      email: pick(&self.email, &profile.email),
      phone: pick(&self.phone, &profile.phone),
      location: pick(&self.location, &profile.location),
      experience: pick(&self.experience, &profile.experience),
      education: pick(&self.education, &profile.education),
      bio: pick(&self.bio, &profile.bio),
    }
  }
}

/// Result of a profile update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
  pub success: bool,
  pub message: String,
  pub data: Profile,
}

/// Headline counter on the profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
  pub label: String,
  pub value: String,
  pub icon: String,
}

/// A submitted job application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
  pub id: String,
  pub company: String,
  pub position: String,
  pub status: String,
  pub date: String,
  pub status_color: String,
}

/// Optional details attached to an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cover_letter: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
  pub job_id: String,
  pub saved_at: String,
}

/// Acknowledgement for a saved job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
  pub success: bool,
  pub message: String,
  pub data: SavedJob,
}

/// Acknowledgement for a submitted application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReceipt {
  pub success: bool,
  pub message: String,
  pub application_id: String,
  pub timestamp: String,
}

/// Assistant reply to a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
  pub message: String,
  pub timestamp: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_patch_merge_keeps_untouched_fields() {
    let profile = crate::service::data::profile();
    let patch = ProfilePatch {
      name: Some("New Name".to_string()),
      ..Default::default()
    };

    let merged = patch.merge_into(&profile);
    assert_eq!(merged.name, "New Name");
    assert_eq!(merged.email, profile.email);
    assert_eq!(merged.bio, profile.bio);
  }

  #[test]
  fn test_job_query_serializes_only_set_fields() {
    let query = JobQuery {
      job_type: Some(JobType::FullTime),
      ..Default::default()
    }
    .page(2);

    let json = serde_json::to_string(&query).unwrap();
    assert_eq!(json, r#"{"jobType":"Full-time","page":2}"#);
  }

  #[test]
  fn test_pagination_uses_camel_case() {
    let pagination = Pagination {
      page: 1,
      limit: 12,
      total: 30,
      total_pages: 3,
      has_next: true,
      has_prev: false,
    };
    let value = serde_json::to_value(pagination).unwrap();
    assert_eq!(value["totalPages"], 3);
    assert_eq!(value["hasNext"], true);
  }
}
