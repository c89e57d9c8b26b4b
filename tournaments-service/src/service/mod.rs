pub mod game_service;
pub mod result_service;

use std::future::Future;
use std::time::Duration;

use shared::{Result, ServiceError};

pub use game_service::GameService;
pub use result_service::ResultService;

/// Deadline applied to every storage call unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `fut` under `after`. On expiry the future is dropped, abandoning any
/// in-flight statement, and a [`ServiceError::Timeout`] tagged with `op` is
/// returned.
pub(crate) async fn with_deadline<T, F>(op: &'static str, after: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(
                op = op,
                timeout_ms = after.as_millis() as u64,
                "Deadline exceeded, abandoning storage call"
            );
            Err(ServiceError::Timeout { op, after })
        }
    }
}
