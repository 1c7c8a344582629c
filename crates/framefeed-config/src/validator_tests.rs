use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.browser.debug_port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.debug_port"));
}

#[test]
fn test_validate_empty_url() {
    let mut config = Config::default();
    config.target.url = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "target.url"));
}

#[test]
fn test_validate_non_http_url_warning() {
    let mut config = Config::default();
    config.target.url = "file:///tmp/page.html".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "target.url"));
}

#[test]
fn test_validate_empty_cascade() {
    let mut config = Config::default();
    config.target.generate_button.strategies.clear();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "target.generate button"));
}

#[test]
fn test_validate_asset_template() {
    let mut config = Config::default();
    config.target.asset_item = "#grid > div".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "target.asset_item"));
}

#[test]
fn test_validate_zero_poll_interval() {
    let mut config = Config::default();
    config.timing.progress_poll_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "timing.progress_poll_ms"));
}

#[test]
fn test_validate_decreasing_retry_offsets_warning() {
    let mut config = Config::default();
    config.timing.prompt_retry_ms = vec![0, 2000, 1000];

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "timing.prompt_retry_ms"));
}

#[test]
fn test_validate_jpeg_quality() {
    let mut config = Config::default();
    config.ingest.jpeg_quality = 0;
    assert!(!ConfigValidator::validate(&config).is_valid());

    config.ingest.jpeg_quality = 101;
    assert!(!ConfigValidator::validate(&config).is_valid());

    config.ingest.jpeg_quality = 100;
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.browser.debug_port = 0;

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("browser.debug_port"));
}
