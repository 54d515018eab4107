//! One-shot background calls that views poll from their tick.
//!
//! A view starts a call with [`Query::run`], which spawns it on the tokio
//! runtime, and picks up the outcome with [`Query::poll`] on a later tick.
//!
//! ```ignore
//! let actions = self.actions.clone();
//! let id = job.id.clone();
//! self.save.run(async move { actions.save_job(&id).await });
//!
//! // In tick
//! if self.save.poll() {
//!     if let Some(error) = self.save.error() { /* revert */ }
//! }
//! ```

use color_eyre::Result;
use std::future::Future;
use tokio::sync::oneshot;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Nothing started, or the last outcome was consumed
  Idle,
  Loading,
  Success(T),
  Error(String),
}

impl<T> Default for QueryState<T> {
  fn default() -> Self {
    QueryState::Idle
  }
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// Handle to at most one in-flight background call.
#[derive(Debug)]
pub struct Query<T> {
  state: QueryState<T>,
  receiver: Option<oneshot::Receiver<Result<T>>>,
}

impl<T> Default for Query<T> {
  fn default() -> Self {
    Self {
      state: QueryState::Idle,
      receiver: None,
    }
  }
}

impl<T: Send + 'static> Query<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Spawn `future`. An outcome still pending from an earlier run is ignored.
  pub fn run<F>(&mut self, future: F)
  where
    F: Future<Output = Result<T>> + Send + 'static,
  {
    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    tokio::spawn(async move {
      // Receiver may have been dropped with its view
      let _ = tx.send(future.await);
    });
  }

  /// Pick up a finished outcome. Returns `true` when the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = self.receiver.as_mut() else {
      return false;
    };

    let state = match receiver.try_recv() {
      Ok(Ok(data)) => QueryState::Success(data),
      Ok(Err(e)) => QueryState::Error(e.to_string()),
      Err(oneshot::error::TryRecvError::Empty) => return false,
      Err(oneshot::error::TryRecvError::Closed) => {
        QueryState::Error("Request was cancelled".to_string())
      }
    };

    self.state = state;
    self.receiver = None;
    true
  }

  /// Hand over a finished outcome and go back to idle.
  pub fn take(&mut self) -> Option<std::result::Result<T, String>> {
    match std::mem::take(&mut self.state) {
      QueryState::Success(data) => Some(Ok(data)),
      QueryState::Error(e) => Some(Err(e)),
      other => {
        self.state = other;
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use color_eyre::eyre::eyre;
  use std::time::Duration;

  fn ok<T>(value: T) -> Result<T> {
    Ok(value)
  }

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new();
    assert!(matches!(query.state(), QueryState::Idle));

    query.run(async { ok(vec![1, 2, 3]) });
    assert!(query.is_loading());

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<i32> = Query::new();
    query.run(async { Err(eyre!("Failed to save job")) });
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.error(), Some("Failed to save job"));
  }

  #[tokio::test]
  async fn test_poll_before_completion_is_noop() {
    let mut query = Query::new();
    query.run(async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      ok(42)
    });

    assert!(!query.poll());
    assert!(query.is_loading());
  }

  #[tokio::test]
  async fn test_rerun_drops_earlier_outcome() {
    let mut query = Query::new();
    query.run(async {
      tokio::time::sleep(Duration::from_millis(50)).await;
      ok("first")
    });
    query.run(async { ok("second") });

    tokio::time::sleep(Duration::from_millis(100)).await;
    query.poll();
    assert_eq!(query.data(), Some(&"second"));
  }

  #[tokio::test]
  async fn test_take_resets_to_idle() {
    let mut query = Query::new();
    query.run(async { ok(5) });
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.poll();

    assert_eq!(query.take(), Some(Ok(5)));
    assert!(matches!(query.state(), QueryState::Idle));
    assert_eq!(query.take(), None);
  }
}
