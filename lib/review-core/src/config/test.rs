use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;

use super::ConfigParsingError;
use super::core_config::{AppConfig, DEFAULT_GENERIC_ERROR_MESSAGE, NoCustomConfig};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliConfig {
    pub trace_level: Option<String>,
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_merges_in_order() {
    let base = indoc::indoc! {"
        app:
            traceLevel: 'info'
        api:
            baseUrl: 'https://backoffice.example.com/api/'
            timeout: 10
        review:
            perPage: 50
    "};

    let local = indoc::indoc! {"
        app:
            traceLevel: 'debug'
        api:
            bearerToken: 'token-123'
        review:
            genericErrorMessage: 'Request failed'
    "};

    let config = AppConfig::<CliConfig>::from_yaml([base, local]).unwrap();

    assert_eq!(
        config.core.api.base_url.as_str(),
        "https://backoffice.example.com/api/"
    );
    assert_eq!(config.core.api.timeout, Some(Duration::from_secs(10)));
    assert_eq!(
        config
            .core
            .api
            .bearer_token
            .as_ref()
            .map(|token| token.expose_secret().to_owned()),
        Some("token-123".to_owned())
    );
    assert_eq!(config.core.review.per_page, 50);
    assert_eq!(config.core.review.generic_error_message, "Request failed");
    assert_eq!(config.app.trace_level.as_deref(), Some("debug"));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_defaults() {
    let config = AppConfig::<NoCustomConfig>::from_yaml(["api:\n    baseUrl: 'http://localhost:8000'"]).unwrap();

    assert!(config.core.api.bearer_token.is_none());
    assert!(config.core.api.timeout.is_none());
    assert_eq!(config.core.review.per_page, 20);
    assert_eq!(
        config.core.review.generic_error_message,
        DEFAULT_GENERIC_ERROR_MESSAGE
    );
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_missing_base_url() {
    let result = AppConfig::<NoCustomConfig>::from_yaml(["review:\n    perPage: 10"]);

    assert!(matches!(
        result,
        Err(ConfigParsingError::GeneralParsingError(_))
    ));
}

#[test]
#[cfg(feature = "config_yaml")]
fn test_parse_config_rejects_zero_per_page() {
    let config = indoc::indoc! {"
        api:
            baseUrl: 'http://localhost:8000'
        review:
            perPage: 0
    "};

    let result = AppConfig::<NoCustomConfig>::from_yaml([config]);

    assert!(matches!(
        result,
        Err(ConfigParsingError::GeneralParsingError(message)) if message.contains("perPage")
    ));
}

#[test]
fn test_from_files_rejects_unknown_extension() {
    let result = AppConfig::<NoCustomConfig>::from_files(&["config.toml"]);

    assert!(matches!(
        result,
        Err(ConfigParsingError::GeneralParsingError(message)) if message.contains("Unsupported")
    ));
}

#[test]
#[cfg(all(feature = "config_yaml", feature = "config_env"))]
fn test_environment_overrides_files() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.yml",
            indoc::indoc! {"
                api:
                    baseUrl: 'http://localhost:8000'
            "},
        )?;
        jail.set_env("REVIEW_api__baseUrl", "https://staging.example.com");
        jail.set_env("REVIEW_review__perPage", "5");

        let config = AppConfig::<NoCustomConfig>::from_files(&["config.yml"])
            .map_err(|error| error.to_string())?;

        assert_eq!(config.core.api.base_url.as_str(), "https://staging.example.com/");
        assert_eq!(config.core.review.per_page, 5);
        Ok(())
    });
}
