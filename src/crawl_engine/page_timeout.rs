//! Timeout utilities for page operations
//!
//! Provides async timeout wrappers to prevent indefinite hangs during
//! page navigation. A timeout is the only interruption mechanism the engine
//! uses: the in-flight future is dropped and the step counts as failed.

use std::future::Future;
use std::time::Duration;

use super::crawl_types::NavigationError;

/// Run a navigation future under a deadline.
///
/// # Arguments
/// * `operation` - The navigation future; its error is a human-readable message
/// * `timeout` - Deadline for the whole operation
/// * `url` - Target URL, carried into the error for logging
///
/// # Returns
/// * `Ok(T)` - Navigation completed
/// * `Err(NavigationError::Timeout)` - Deadline hit, the future was abandoned
/// * `Err(NavigationError::Failed)` - The operation itself failed
pub async fn with_navigation_timeout<F, T, E>(
    operation: F,
    timeout: Duration,
    url: &str,
) -> Result<T, NavigationError>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(NavigationError::Failed {
            url: url.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(NavigationError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}
