//! Sequential bulk operations with per-item results.

use crate::CommerceError;
use serde::Serialize;
use std::future::Future;

/// One item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

/// Per-item outcome of a bulk admin operation.
///
/// Items run one at a time with no rollback: items listed in `succeeded`
/// stay changed even when later items fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// A single message describing every failure, if there were any.
    pub fn failure_summary(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        let ids: Vec<&str> = self.failed.iter().map(|f| f.id.as_str()).collect();
        Some(format!(
            "{} of {} items failed: {}",
            self.failed.len(),
            self.total(),
            ids.join(", ")
        ))
    }
}

/// Run `op` for every id, awaiting each call before starting the next.
pub async fn run_sequential<F, Fut>(action: &str, ids: &[String], mut op: F) -> BatchResult
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), CommerceError>>,
{
    let mut result = BatchResult::default();
    for id in ids {
        match op(id.clone()).await {
            Ok(()) => result.succeeded.push(id.clone()),
            Err(e) => result.failed.push(BatchFailure {
                id: id.clone(),
                error: e.to_string(),
            }),
        }
    }

    match result.failure_summary() {
        Some(summary) => tracing::warn!(action, %summary, "bulk operation incomplete"),
        None => tracing::info!(action, count = result.succeeded.len(), "bulk operation complete"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_continues_after_failure_without_rollback() {
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut seen = Vec::new();

        let result = run_sequential("test", &ids, |id| {
            seen.push(id.clone());
            async move {
                if id == "b" {
                    Err(CommerceError::OrderNotFound(id))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(result.succeeded, vec!["a", "c"]);
        assert_eq!(result.failed.len(), 1);
        assert!(!result.is_complete());
        assert_eq!(
            result.failure_summary().unwrap(),
            "1 of 3 items failed: b"
        );
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let result = BatchResult::default();
        assert!(result.is_complete());
        assert_eq!(result.failure_summary(), None);
    }
}
