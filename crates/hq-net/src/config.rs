//! Loader configuration

use std::collections::HashMap;

use serde::Deserialize;

/// Loader configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// User agent string
    pub user_agent: String,

    /// Whole-request timeout in milliseconds; 0 disables it
    pub timeout_ms: u64,

    /// Headers sent with every request
    pub headers: HashMap<String, String>,

    /// Proxy for every request made by the shared client
    pub proxy: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("htmlquery/{}", crate::VERSION),
            timeout_ms: 30_000,
            headers: HashMap::new(),
            proxy: None,
        }
    }
}
