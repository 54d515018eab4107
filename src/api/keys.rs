use crate::cache::{json_digest, QueryKey};
use crate::service::types::JobQuery;

/// Cache keys for the resources this client fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKey {
  Profile,
  ProfileStats,
  Applications,
  Job(String),
  /// One listing page for a parameter set
  Jobs(JobQuery),
  /// Free-text search on top of a parameter set
  Search { query: String, filters: JobQuery },
}

impl ResourceKey {
  /// Listing key with the search text trimmed, so "go " and "go" share a slot
  pub fn jobs(params: &JobQuery) -> Self {
    ResourceKey::Jobs(normalized(params))
  }

  pub fn search(query: &str, filters: &JobQuery) -> Self {
    ResourceKey::Search {
      query: query.trim().to_string(),
      filters: normalized(filters),
    }
  }
}

fn normalized(params: &JobQuery) -> JobQuery {
  JobQuery {
    search: params
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string),
    ..params.clone()
  }
}

impl QueryKey for ResourceKey {
  fn cache_key(&self) -> String {
    match self {
      ResourceKey::Profile => "profile".to_string(),
      ResourceKey::ProfileStats => "profile_stats".to_string(),
      ResourceKey::Applications => "applications".to_string(),
      ResourceKey::Job(id) => format!("job_{}", id),
      ResourceKey::Jobs(params) => format!("jobs_{}", json_digest(params)),
      ResourceKey::Search { query, filters } => {
        format!("search_{}", json_digest(&(query, filters)))
      }
    }
  }

  fn description(&self) -> String {
    match self {
      ResourceKey::Profile => "profile".to_string(),
      ResourceKey::ProfileStats => "profile stats".to_string(),
      ResourceKey::Applications => "applications".to_string(),
      ResourceKey::Job(id) => format!("job {}", id),
      ResourceKey::Jobs(params) => format!(
        "jobs page {} (limit {})",
        params.page.unwrap_or(1),
        params
          .limit
          .map_or_else(|| "default".to_string(), |l| l.to_string())
      ),
      ResourceKey::Search { query, .. } => format!("search '{}'", query),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::service::types::JobType;

  #[test]
  fn test_fixed_keys() {
    assert_eq!(ResourceKey::Profile.cache_key(), "profile");
    assert_eq!(ResourceKey::ProfileStats.cache_key(), "profile_stats");
    assert_eq!(ResourceKey::Applications.cache_key(), "applications");
    assert_eq!(ResourceKey::Job("7".to_string()).cache_key(), "job_7");
  }

  #[test]
  fn test_distinct_params_get_distinct_keys() {
    let first = JobQuery::default().page(1).limit(12);
    let second = JobQuery::default().page(2).limit(12);
    let filtered = JobQuery {
      job_type: Some(JobType::Contract),
      ..first.clone()
    };

    let keys = [
      ResourceKey::jobs(&first).cache_key(),
      ResourceKey::jobs(&second).cache_key(),
      ResourceKey::jobs(&filtered).cache_key(),
    ];
    assert_ne!(keys[0], keys[1]);
    assert_ne!(keys[0], keys[2]);
    assert!(keys.iter().all(|k| k.starts_with("jobs_")));
  }

  #[test]
  fn test_search_whitespace_is_ignored() {
    let filters = JobQuery::default();
    assert_eq!(
      ResourceKey::search("react ", &filters).cache_key(),
      ResourceKey::search("react", &filters).cache_key()
    );

    let padded = JobQuery {
      search: Some("  ".to_string()),
      ..Default::default()
    };
    assert_eq!(
      ResourceKey::jobs(&padded).cache_key(),
      ResourceKey::jobs(&JobQuery::default()).cache_key()
    );
  }

  #[test]
  fn test_search_and_listing_do_not_collide() {
    let params = JobQuery {
      search: Some("react".to_string()),
      ..Default::default()
    };
    assert_ne!(
      ResourceKey::jobs(&params).cache_key(),
      ResourceKey::search("react", &JobQuery::default()).cache_key()
    );
  }
}
