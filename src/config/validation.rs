use crate::config::types::{Config, CrawlerConfig, StoreConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_store_config(&config.store)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;

    if config.blacklist.path.is_empty() {
        return Err(ConfigError::Validation(
            "blacklist path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates store endpoint and table names
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::Validation(format!("Invalid store endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Store endpoint must be an http(s) URL, got '{}'",
            config.endpoint
        )));
    }

    if config.main_table.is_empty() {
        return Err(ConfigError::Validation(
            "main-table cannot be empty".to_string(),
        ));
    }

    if config.queue_table.is_empty() {
        return Err(ConfigError::Validation(
            "queue-table cannot be empty".to_string(),
        ));
    }

    if config.main_table == config.queue_table {
        return Err(ConfigError::Validation(format!(
            "main-table and queue-table must differ, both are '{}'",
            config.main_table
        )));
    }

    Ok(())
}

/// Validates crawler limits and URLs
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > 64 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 64, got {}",
            config.parallelism
        )));
    }

    if config.max_rounds < 1 {
        return Err(ConfigError::Validation(format!(
            "max-rounds must be >= 1, got {}",
            config.max_rounds
        )));
    }

    if config.fetch_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch-timeout-ms must be >= 1, got {}",
            config.fetch_timeout_ms
        )));
    }

    validate_page_url("seed-url", &config.seed_url)?;

    if let Some(scope_root) = &config.scope_root {
        validate_page_url("scope-root", scope_root)?;
    }

    Ok(())
}

/// Validates that a configured URL parses and has a host
fn validate_page_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::Validation(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::BlacklistConfig;

    fn valid_config() -> Config {
        Config {
            store: StoreConfig {
                endpoint: "http://127.0.0.1:9035".to_string(),
                main_table: "pages".to_string(),
                queue_table: "crawl-queue".to_string(),
            },
            crawler: CrawlerConfig {
                seed_url: "https://en.wikipedia.org/wiki/Web_crawler".to_string(),
                scope_root: Some("https://en.wikipedia.org".to_string()),
                store_sub_pages: true,
                store_full_document: false,
                parallelism: 4,
                max_rounds: 50,
                fetch_timeout_ms: 5000,
            },
            user_agent: UserAgentConfig {
                crawler_name: "backmap".to_string(),
                crawler_version: "0.1.0".to_string(),
                contact_url: "https://example.com/crawler".to_string(),
                contact_email: "crawler@example.com".to_string(),
            },
            blacklist: BlacklistConfig {
                path: "./blacklist.txt".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let mut config = valid_config();
        config.crawler.parallelism = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut config = valid_config();
        config.crawler.max_rounds = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_seed_url_rejected() {
        let mut config = valid_config();
        config.crawler.seed_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_scope_root_rejected() {
        let mut config = valid_config();
        config.crawler.scope_root = Some("::::".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_scope_root_allowed() {
        let mut config = valid_config();
        config.crawler.scope_root = None;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = valid_config();
        config.store.endpoint = "ftp://store.example.com".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_same_table_names_rejected() {
        let mut config = valid_config();
        config.store.queue_table = config.store.main_table.clone();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut config = valid_config();
        config.user_agent.contact_email = "nope".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_with_spaces_rejected() {
        let mut config = valid_config();
        config.user_agent.crawler_name = "my crawler".to_string();
        assert!(validate(&config).is_err());
    }
}
