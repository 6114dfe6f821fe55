//! Service configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the Frankfurter API (no trailing slash).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How long a live response stays fresh in the cache.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Upper bound on a single upstream request.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Fallback dataset on disk. The bundled dataset is used when unset.
    #[serde(default)]
    pub fallback_path: Option<PathBuf>,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}
fn default_api_base_url() -> String {
    "https://api.frankfurter.dev/v1".into()
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_http_timeout() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_base_url: default_api_base_url(),
            cache_ttl_secs: default_cache_ttl(),
            http_timeout_secs: default_http_timeout(),
            fallback_path: None,
        }
    }
}
