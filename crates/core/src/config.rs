//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{ACCOUNTS_DIR_NAME, PLANS_DIR_NAME, PROFILES_DIR_NAME, TODOS_DIR_NAME};
use crate::{CoordResult, CoordinationError};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    dietgen_endpoint: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(data_dir: PathBuf, dietgen_endpoint: String) -> CoordResult<Self> {
        if dietgen_endpoint.trim().is_empty() {
            return Err(CoordinationError::InvalidInput(
                "dietgen_endpoint cannot be empty".into(),
            ));
        }
        if !dietgen_endpoint.starts_with("http://") && !dietgen_endpoint.starts_with("https://") {
            return Err(CoordinationError::InvalidInput(
                "dietgen_endpoint must be an http(s) URL".into(),
            ));
        }

        Ok(Self {
            data_dir,
            dietgen_endpoint,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn accounts_dir(&self) -> PathBuf {
        self.data_dir.join(ACCOUNTS_DIR_NAME)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join(PROFILES_DIR_NAME)
    }

    pub fn plans_dir(&self) -> PathBuf {
        self.data_dir.join(PLANS_DIR_NAME)
    }

    pub fn todos_dir(&self) -> PathBuf {
        self.data_dir.join(TODOS_DIR_NAME)
    }

    /// Endpoint of the external diet-generation service.
    pub fn dietgen_endpoint(&self) -> &str {
        &self.dietgen_endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_endpoint() {
        let err = CoreConfig::new(PathBuf::from("/tmp/data"), "   ".into())
            .expect_err("blank endpoint should be rejected");
        assert!(matches!(err, CoordinationError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = CoreConfig::new(PathBuf::from("/tmp/data"), "ftp://dietgen".into())
            .expect_err("non-http endpoint should be rejected");
        assert!(matches!(err, CoordinationError::InvalidInput(_)));
    }

    #[test]
    fn derives_subdirectories_from_data_dir() {
        let cfg = CoreConfig::new(
            PathBuf::from("/var/lib/aahara"),
            "http://localhost:8100/generate".into(),
        )
        .expect("config should build");

        assert_eq!(cfg.accounts_dir(), PathBuf::from("/var/lib/aahara/accounts"));
        assert_eq!(cfg.profiles_dir(), PathBuf::from("/var/lib/aahara/profiles"));
        assert_eq!(cfg.plans_dir(), PathBuf::from("/var/lib/aahara/plans"));
        assert_eq!(cfg.todos_dir(), PathBuf::from("/var/lib/aahara/todos"));
    }
}
