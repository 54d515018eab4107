//! Client-side data layer over the job-board service.
//!
//! Each resource wraps its own [`RequestExecutor`](request::RequestExecutor)
//! (loading, error, cache) and keeps the collections it last loaded. Views
//! create the resources they need through [`Resources`]; profile resources
//! stay in sync via the shared [`ProfileChannel`].

mod actions;
mod applications;
mod broadcast;
mod jobs;
mod keys;
mod profile;
mod request;

pub use actions::JobActions;
pub use applications::ApplicationsResource;
pub use jobs::JobsResource;
pub use profile::ProfileResource;

use broadcast::ProfileChannel;

use std::time::Duration;

use crate::service::MockService;

/// Everything a view needs to build resources
#[derive(Debug, Clone)]
pub struct Resources {
  service: MockService,
  channel: ProfileChannel,
  ttl: Duration,
}

impl Resources {
  pub fn new(service: MockService, ttl: Duration) -> Self {
    Self {
      service,
      channel: ProfileChannel::new(),
      ttl,
    }
  }

  pub fn jobs(&self) -> JobsResource {
    JobsResource::new(self.service.clone(), self.ttl)
  }

  pub fn profile(&self) -> ProfileResource {
    ProfileResource::new(self.service.clone(), self.channel.clone(), self.ttl)
  }

  pub fn applications(&self) -> ApplicationsResource {
    ApplicationsResource::new(self.service.clone(), self.ttl)
  }

  pub fn actions(&self) -> JobActions {
    JobActions::new(self.service.clone(), self.ttl)
  }

  pub fn service(&self) -> &MockService {
    &self.service
  }
}
