//! Pipeline stage errors.
//!
//! Each stage reports failures through `anyhow`; the pipeline wraps them in
//! a [`StageError`] so the final message says which stage broke. The cause
//! stays reachable through `source()`, so `main` prints it once, as the
//! `Caused by:` chain.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("fetch failed")]
    Fetch(#[source] anyhow::Error),

    #[error("load failed (no rows were committed)")]
    Load(#[source] anyhow::Error),

    #[error("analytics failed")]
    Analytics(#[source] anyhow::Error),

    #[error("chart rendering failed")]
    Render(#[source] anyhow::Error),
}

impl StageError {
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Fetch(_) => "fetch",
            StageError::Load(_) => "load",
            StageError::Analytics(_) => "analytics",
            StageError::Render(_) => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_message_names_stage_and_cause() {
        let err = StageError::Fetch(
            anyhow::anyhow!("HTTP 503").context("Request to http://localhost/products failed"),
        );
        assert_eq!(err.to_string(), "fetch failed");
        assert_eq!(
            err.source().unwrap().to_string(),
            "Request to http://localhost/products failed"
        );
        assert_eq!(err.stage(), "fetch");

        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            chain,
            "fetch failed: Request to http://localhost/products failed: HTTP 503"
        );
    }

    #[test]
    fn test_cause_printed_once() {
        let err = StageError::Analytics(anyhow::anyhow!("no such table: products"));
        let report = format!("{:?}", anyhow::Error::from(err));
        assert!(report.starts_with("analytics failed"));
        assert_eq!(report.matches("no such table: products").count(), 1);
    }

    #[test]
    fn test_load_error_mentions_rollback() {
        let err = StageError::Load(anyhow::anyhow!("UNIQUE constraint failed: products.id"));
        assert!(err.to_string().contains("no rows were committed"));
        assert!(!err.to_string().contains("UNIQUE"));
        assert_eq!(err.stage(), "load");
    }
}
