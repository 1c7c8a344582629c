//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_target(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_ingest(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }
    }

    fn validate_target(config: &Config, result: &mut ValidationResult) {
        let target = &config.target;

        if target.url.trim().is_empty() {
            result.add_error(ValidationError::new("target.url", "URL cannot be empty"));
        } else if !target.url.starts_with("http://") && !target.url.starts_with("https://") {
            result.add_warning(ValidationWarning::new(
                "target.url",
                format!("'{}' is not an http(s) URL", target.url),
            ));
        }

        for cascade in target.required_cascades() {
            if cascade.strategies.is_empty() {
                result.add_error(ValidationError::new(
                    format!("target.{}", cascade.name),
                    "Cascade has no strategies",
                ));
            }
        }

        if !target.asset_item.contains("{index}") {
            result.add_error(ValidationError::new(
                "target.asset_item",
                "Positional selector must contain {index}",
            ));
        }

        if target.progress_indicator.trim().is_empty() {
            result.add_error(ValidationError::new(
                "target.progress_indicator",
                "Selector cannot be empty",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;

        if timing.progress_poll_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.progress_poll_ms",
                "Poll interval cannot be 0",
            ));
        }

        if timing.prompt_retry_ms.is_empty() {
            result.add_error(ValidationError::new(
                "timing.prompt_retry_ms",
                "At least one prompt lookup attempt is required",
            ));
        } else if timing.prompt_retry_ms.windows(2).any(|w| w[1] < w[0]) {
            result.add_warning(ValidationWarning::new(
                "timing.prompt_retry_ms",
                "Offsets are not increasing; later attempts will run immediately",
            ));
        }

        if timing.progress_max_polls == Some(0) {
            result.add_warning(ValidationWarning::new(
                "timing.progress_max_polls",
                "0 polls skips waiting for generation to finish",
            ));
        }
    }

    fn validate_ingest(config: &Config, result: &mut ValidationResult) {
        let quality = config.ingest.jpeg_quality;
        if quality == 0 || quality > 100 {
            result.add_error(ValidationError::new(
                "ingest.jpeg_quality",
                "Quality must be between 1 and 100",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
