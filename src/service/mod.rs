//! In-process stand-in for the job-board backend.
//!
//! Every call sleeps for a fixed per-endpoint latency and then fails with a
//! configurable probability, so the data layer sees realistic timing and
//! error paths without a network.

mod chat;
pub mod data;
mod mock;
pub mod types;

pub use mock::MockService;
