use color_eyre::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::cache::QueryKey;
use crate::service::types::{Profile, ProfilePatch, Stat};
use crate::service::MockService;

use super::broadcast::{ProfileChannel, Subscription};
use super::keys::ResourceKey;
use super::request::RequestExecutor;

#[derive(Debug, Default)]
struct ProfileState {
  profile: Option<Profile>,
  stats: Vec<Stat>,
}

struct Inner {
  service: MockService,
  request: RequestExecutor,
  channel: ProfileChannel,
  state: Arc<Mutex<ProfileState>>,
  _subscription: Subscription,
}

/// The user's profile and activity stats.
///
/// Every instance listens on the shared [`ProfileChannel`]: a profile loaded or
/// saved through any instance shows up in all of them. The subscription lasts
/// until the last clone is dropped.
#[derive(Clone)]
pub struct ProfileResource {
  inner: Arc<Inner>,
}

impl ProfileResource {
  /// Subscribe to `channel`, starting from its current profile if it has one.
  pub fn new(service: MockService, channel: ProfileChannel, ttl: Duration) -> Self {
    let state = Arc::new(Mutex::new(ProfileState::default()));

    let listener_state = Arc::clone(&state);
    let subscription = channel.subscribe(move |profile: &Profile| {
      lock(&listener_state).profile = Some(profile.clone());
    });

    // Read only after subscribing, so a concurrent publish is never missed
    if let Some(current) = channel.current() {
      let mut seeded = lock(&state);
      if seeded.profile.is_none() {
        seeded.profile = Some(current);
      }
    }
    debug!(listeners = channel.listener_count(), "Profile subscriber added");

    Self {
      inner: Arc::new(Inner {
        service,
        request: RequestExecutor::new(ttl),
        channel,
        state,
        _subscription: subscription,
      }),
    }
  }

  fn lock(&self) -> MutexGuard<'_, ProfileState> {
    lock(&self.inner.state)
  }

  pub async fn fetch_profile(&self) -> Result<Profile> {
    let inner = &self.inner;
    let profile = inner
      .request
      .execute(
        || async { inner.service.get_profile().await.map(|found| found.data) },
        Some(&ResourceKey::Profile.cache_key()),
      )
      .await
      .inspect_err(|e| error!("Error fetching profile: {}", e))?;

    self.adopt(profile.clone());
    Ok(profile)
  }

  pub async fn fetch_stats(&self) -> Result<Vec<Stat>> {
    let inner = &self.inner;
    let stats = inner
      .request
      .execute(
        || async { inner.service.get_profile_stats().await.map(|found| found.data) },
        Some(&ResourceKey::ProfileStats.cache_key()),
      )
      .await
      .inspect_err(|e| error!("Error fetching profile stats: {}", e))?;

    self.lock().stats = stats.clone();
    Ok(stats)
  }

  /// Save `patch` and share the merged profile. Never served from cache.
  pub async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile> {
    let inner = &self.inner;
    let profile = inner
      .request
      .execute(
        || async { inner.service.update_profile(&patch).await.map(|saved| saved.data) },
        None,
      )
      .await
      .inspect_err(|e| error!("Error updating profile: {}", e))?;

    inner
      .request
      .clear_cache(Some(&ResourceKey::Profile.cache_key()));
    info!(name = %profile.name, "Profile updated");

    self.adopt(profile.clone());
    Ok(profile)
  }

  /// Take `profile` locally, then hand it to every other instance.
  fn adopt(&self, profile: Profile) {
    self.lock().profile = Some(profile.clone());
    self.inner.channel.publish(profile);
  }

  pub fn profile(&self) -> Option<Profile> {
    self.lock().profile.clone()
  }

  /// When the shared profile last changed, from any instance
  pub fn synced_at(&self) -> Option<DateTime<Utc>> {
    self.inner.channel.updated_at()
  }

  pub fn stats(&self) -> Vec<Stat> {
    self.lock().stats.clone()
  }

  pub fn loading(&self) -> bool {
    self.inner.request.loading()
  }

  pub fn error(&self) -> Option<String> {
    self.inner.request.error()
  }

  pub fn clear_error(&self) {
    self.inner.request.clear_error();
  }
}

fn lock(state: &Mutex<ProfileState>) -> MutexGuard<'_, ProfileState> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ServiceConfig;
  use crate::service::data;
  use futures::FutureExt;

  const TTL: Duration = Duration::from_secs(300);

  fn service() -> MockService {
    MockService::new(
      ServiceConfig {
        failure_rate: 0.0,
        latency: true,
      },
      12,
    )
  }

  fn rename(name: &str) -> ProfilePatch {
    ProfilePatch {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_update_reaches_other_instance() {
    let service = service();
    let channel = ProfileChannel::new();
    let nav = ProfileResource::new(service.clone(), channel.clone(), TTL);
    let page = ProfileResource::new(service, channel, TTL);

    page.fetch_profile().await.unwrap();
    assert_eq!(nav.profile(), page.profile());

    let updated = page.update_profile(rename("Taylor Reed")).await.unwrap();

    assert_eq!(nav.profile(), Some(updated.clone()));
    assert_eq!(nav.profile().map(|p| p.name).as_deref(), Some("Taylor Reed"));
    assert!(!nav.loading());
  }

  #[tokio::test(start_paused = true)]
  async fn test_late_instance_adopts_shared_profile() {
    let service = service();
    let channel = ProfileChannel::new();
    let first = ProfileResource::new(service.clone(), channel.clone(), TTL);
    first.fetch_profile().await.unwrap();

    let second = ProfileResource::new(service, channel, TTL);
    assert_eq!(second.profile(), first.profile());
  }

  #[tokio::test(start_paused = true)]
  async fn test_update_merges_and_invalidates_cache() {
    let channel = ProfileChannel::new();
    let profile = ProfileResource::new(service(), channel, TTL);

    let original = profile.fetch_profile().await.unwrap();
    profile.update_profile(rename("New Name")).await.unwrap();

    let refetched = profile.fetch_profile().await.unwrap();
    assert_eq!(refetched.name, "New Name");
    assert_eq!(
      Profile {
        name: original.name.clone(),
        ..refetched.clone()
      },
      original
    );
  }

  #[tokio::test(start_paused = true)]
  async fn test_profile_fetch_is_cached() {
    let profile = ProfileResource::new(service(), ProfileChannel::new(), TTL);
    profile.fetch_profile().await.unwrap();

    let hit = profile
      .fetch_profile()
      .now_or_never()
      .expect("cached profile should be immediate")
      .unwrap();
    assert_eq!(hit, data::profile());
  }

  #[tokio::test(start_paused = true)]
  async fn test_stats_are_local() {
    let channel = ProfileChannel::new();
    let profile = ProfileResource::new(service(), channel.clone(), TTL);

    let stats = profile.fetch_stats().await.unwrap();

    assert_eq!(stats.len(), 4);
    assert_eq!(profile.stats(), stats);
    assert_eq!(channel.current(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_failed_update_keeps_profile() {
    let service = service();
    let profile = ProfileResource::new(service.clone(), ProfileChannel::new(), TTL);
    let loaded = profile.fetch_profile().await.unwrap();

    service.set_failure_rate(1.0);
    let err = profile.update_profile(rename("Nope")).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to update profile");
    assert_eq!(profile.profile(), Some(loaded));
    assert_eq!(profile.error().as_deref(), Some("Failed to update profile"));
  }

  #[test]
  fn test_publish_during_construction_is_kept() {
    for _ in 0..200 {
      let channel = ProfileChannel::new();
      let publisher = {
        let channel = channel.clone();
        std::thread::spawn(move || channel.publish(data::profile()))
      };
      let profile = ProfileResource::new(service(), channel.clone(), TTL);
      publisher.join().unwrap();

      assert_eq!(profile.profile(), channel.current());
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_synced_at_follows_channel() {
    let channel = ProfileChannel::new();
    let profile = ProfileResource::new(service(), channel.clone(), TTL);
    assert_eq!(profile.synced_at(), None);

    profile.fetch_profile().await.unwrap();
    assert!(profile.synced_at().is_some());
    assert_eq!(profile.synced_at(), channel.updated_at());
  }

  #[test]
  fn test_last_clone_drop_unsubscribes() {
    let channel = ProfileChannel::new();
    let profile = ProfileResource::new(service(), channel.clone(), TTL);
    let clone = profile.clone();
    assert_eq!(channel.listener_count(), 1);

    drop(profile);
    assert_eq!(channel.listener_count(), 1);
    drop(clone);
    assert_eq!(channel.listener_count(), 0);
  }
}
