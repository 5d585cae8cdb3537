use std::future::Future;
use tracing::{debug, warn};

use crate::core::ScrapeError;

/// Runs a step whose failure must not abort the extraction (dismissing a
/// popup that may not be there, hiding automation flags, ...).
///
/// A missing or non-interactable element is expected and only logged at
/// debug level; any other error is logged as a warning. Either way the
/// caller gets `None` and carries on.
pub async fn best_effort<T, F>(step: &str, action: F) -> Option<T>
where
    F: Future<Output = Result<T, ScrapeError>>,
{
    match action.await {
        Ok(value) => Some(value),
        Err(e) if e.is_absent() => {
            debug!("Skipped optional step '{}': {}", step, e);
            None
        }
        Err(e) => {
            warn!("Optional step '{}' failed, continuing: {}", step, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_passes_value_through() {
        let result = best_effort("noop", async { Ok::<_, ScrapeError>(7) }).await;
        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn test_not_found_is_swallowed() {
        let result: Option<()> = best_effort("close dialog", async {
            Err(ScrapeError::NotFound(".bit-dialog__close".into()))
        })
        .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_other_errors_are_swallowed_too() {
        let result: Option<()> = best_effort("hide webdriver", async {
            Err(ScrapeError::MalformedResponse("unexpected".into()))
        })
        .await;
        assert_eq!(result, None);
    }
}
