pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;

use std::future::Future;

use devcamper_core::error::CoreError;
use devcamper_core::types::DbId;

use crate::error::{AppError, AppResult};

/// 404 for a well-formed id that matches nothing.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Trim a client-supplied string, keeping `None` as `None`.
pub(crate) fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

/// Run a child write together with the statistic refresh that follows it
/// on a task of its own.
///
/// The task runs to completion even if the request future is dropped
/// (client disconnect, request timeout), so a committed write is never left
/// without its refresh.
pub(crate) async fn write_then_refresh<T, F>(work: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Write task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn work_completes_after_the_caller_gives_up() {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let work = write_then_refresh(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = done_tx.send(());
            Ok(())
        });

        let timed_out = tokio::time::timeout(Duration::from_millis(5), work).await;
        assert!(timed_out.is_err());
        assert!(done_rx.await.is_ok(), "the write task must not be cancelled");
    }

    #[tokio::test]
    async fn errors_and_panics_surface_as_app_errors() {
        let result: AppResult<()> =
            write_then_refresh(async { Err(AppError::BadRequest("nope".into())) }).await;
        assert_matches!(result, Err(AppError::BadRequest(_)));

        let result: AppResult<()> = write_then_refresh(async { panic!("boom") }).await;
        assert_matches!(result, Err(AppError::InternalError(_)));
    }
}
