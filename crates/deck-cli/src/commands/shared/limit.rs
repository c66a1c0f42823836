use deck_config::ApiConfig;

/// Effective page size with precedence: local arg -> global flag -> config
/// default, clamped to the configured maximum.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, api: &ApiConfig) -> u32 {
    api.effective_page_size(local.or(global))
}

#[cfg(test)]
mod tests {
    use deck_config::ApiConfig;

    use super::effective_limit;

    #[test]
    fn local_takes_precedence() {
        let api = ApiConfig::default();
        assert_eq!(effective_limit(Some(5), Some(10), &api), 5);
    }

    #[test]
    fn global_used_when_local_missing() {
        let api = ApiConfig::default();
        assert_eq!(effective_limit(None, Some(10), &api), 10);
    }

    #[test]
    fn config_default_used_when_none_set() {
        let api = ApiConfig::default();
        assert_eq!(effective_limit(None, None, &api), api.page_size);
    }

    #[test]
    fn requests_are_clamped_to_the_maximum() {
        let api = ApiConfig::default();
        assert_eq!(effective_limit(Some(1000), None, &api), api.max_page_size);
    }
}
