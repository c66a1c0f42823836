//! List/pagination configuration for the operation surface.

use serde::{Deserialize, Serialize};

/// Default page size for list operations.
const fn default_page_size() -> u32 {
    20
}

/// Hard ceiling a caller-supplied page size is clamped to.
const fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl ApiConfig {
    /// Clamp a requested page size to the configured ceiling, falling back
    /// to the default when the caller did not ask for one.
    #[must_use]
    pub fn effective_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.page_size)
            .min(self.max_page_size)
            .max(1)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ApiConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn effective_page_size_clamps_to_ceiling() {
        let config = ApiConfig::default();
        assert_eq!(config.effective_page_size(None), 20);
        assert_eq!(config.effective_page_size(Some(50)), 50);
        assert_eq!(config.effective_page_size(Some(500)), 100);
        assert_eq!(config.effective_page_size(Some(0)), 1);
    }
}
