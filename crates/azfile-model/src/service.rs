//! Service-wide configuration and stored access policies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether, and for how long, logs or metrics are retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    /// Whether the policy applies.
    pub enabled: bool,
    /// Retention in days; absent when the service keeps data indefinitely.
    pub days: Option<i32>,
}

/// Analytics logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Logging {
    /// Analytics version, e.g. `1.0`.
    pub version: String,
    /// Log delete requests.
    pub delete: bool,
    /// Log read requests.
    pub read: bool,
    /// Log write requests.
    pub write: bool,
    /// How long the data is kept.
    pub retention_policy: RetentionPolicy,
}

/// Hour or minute metrics settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Analytics version, e.g. `1.0`.
    pub version: String,
    /// Whether metrics are collected.
    pub enabled: bool,
    /// Whether per-API summaries are collected; absent when not reported.
    pub include_apis: Option<bool>,
    /// How long the data is kept.
    pub retention_policy: RetentionPolicy,
}

/// A single cross-origin resource sharing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorsRule {
    /// Origins allowed to make requests, or `*`.
    pub allowed_origins: Vec<String>,
    /// HTTP methods an origin may use.
    pub allowed_methods: Vec<String>,
    /// How long a browser may cache the preflight response.
    pub max_age_in_seconds: i32,
    /// Response headers exposed to the origin.
    pub exposed_headers: Option<Vec<String>>,
    /// Request headers the origin may send.
    pub allowed_headers: Option<Vec<String>>,
}

impl CorsRule {
    /// Create a rule with no exposed or allowed headers.
    #[must_use]
    pub fn new(
        allowed_origins: Vec<String>,
        allowed_methods: Vec<String>,
        max_age_in_seconds: i32,
    ) -> Self {
        Self {
            allowed_origins,
            allowed_methods,
            max_age_in_seconds,
            exposed_headers: None,
            allowed_headers: None,
        }
    }
}

/// Service-wide properties.
///
/// Each section is `None` when the service did not report it, which is
/// distinct from a section whose flags are all off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceProperties {
    /// Analytics logging.
    pub logging: Option<Logging>,
    /// Hourly aggregated metrics.
    pub hour_metrics: Option<Metrics>,
    /// Per-minute metrics.
    pub minute_metrics: Option<Metrics>,
    /// CORS rules; empty when the element is present but empty.
    pub cors: Option<Vec<CorsRule>>,
    /// The `DefaultServiceVersion` applied to unversioned requests.
    pub target_version: Option<String>,
}

/// A stored access policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessPolicy {
    /// When the policy becomes valid.
    pub start: Option<DateTime<Utc>>,
    /// When the policy expires.
    pub expiry: Option<DateTime<Utc>>,
    /// Permission letters, e.g. `rwd`.
    pub permission: Option<String>,
}

/// Stored access policies keyed by signed identifier.
pub type SignedIdentifiers = BTreeMap<String, AccessPolicy>;
