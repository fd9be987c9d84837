//! Runtime configuration shared by the hierarchy, work and sharing services.
//!
//! # Examples
//!
//! ```
//! use orgwork::config::OrgworkConfig;
//!
//! let config = OrgworkConfig::default();
//! assert_eq!(config.member_page_limit, 1000);
//!
//! let parsed = OrgworkConfig::from_json(r#"{"member_page_limit": 50}"#)
//!     .expect("valid configuration");
//! assert_eq!(parsed.member_page_limit, 50);
//! assert_eq!(parsed.draft_type_name, "草稿箱");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on member listings, matching the directory service page size.
pub const DEFAULT_MEMBER_PAGE_LIMIT: usize = 1000;

/// Default type name stamped on saved drafts.
pub const DEFAULT_DRAFT_TYPE_NAME: &str = "草稿箱";

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Error returned when a configuration document cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

/// Tunables for the orgwork services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgworkConfig {
    /// Upper bound applied to member page requests.
    pub member_page_limit: usize,
    /// Type name recorded on drafts saved from an edit session.
    pub draft_type_name: String,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for OrgworkConfig {
    fn default() -> Self {
        Self {
            member_page_limit: DEFAULT_MEMBER_PAGE_LIMIT,
            draft_type_name: DEFAULT_DRAFT_TYPE_NAME.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl OrgworkConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Sets the member page limit.
    #[must_use]
    pub const fn with_member_page_limit(mut self, limit: usize) -> Self {
        self.member_page_limit = limit;
        self
    }

    /// Sets the draft type name.
    #[must_use]
    pub fn with_draft_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.draft_type_name = type_name.into();
        self
    }

    /// Sets the fallback log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}
