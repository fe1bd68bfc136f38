//! Widget configuration

use crate::{ApiClientConfig, ChatMode};

/// Storage key for the session collection
pub const SESSIONS_STORAGE_KEY: &str = "chat_sessions";

/// Storage key for the collapsed sidebar flag
pub const SIDEBAR_COLLAPSED_STORAGE_KEY: &str = "chat_sidebar_collapsed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub sessions_key: String,
    pub sidebar_key: String,
    /// Mode preselected in the model dropdown on startup
    pub default_mode: ChatMode,
    pub api: ApiClientConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            sessions_key: SESSIONS_STORAGE_KEY.to_string(),
            sidebar_key: SIDEBAR_COLLAPSED_STORAGE_KEY.to_string(),
            default_mode: ChatMode::default(),
            api: ApiClientConfig::default(),
        }
    }
}

impl WidgetConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api = ApiClientConfig::new(base_url);
        self
    }
}
