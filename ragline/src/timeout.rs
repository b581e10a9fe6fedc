//! Deadline enforcement for calls to external services.

use std::future::Future;
use std::time::Duration;

use crate::error::{RagError, Result};

/// Run `fut`, failing with [`RagError::ServiceUnavailable`] if it does not
/// complete within `limit`. A `None` limit runs the future unbounded.
pub(crate) async fn bounded<T, F>(service: &str, limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(RagError::ServiceUnavailable {
                service: service.to_string(),
                timeout: limit,
            }),
        },
        None => fut.await,
    }
}
