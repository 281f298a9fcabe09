//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Depth above which ancestor walks are considered suspiciously deep.
const DEEP_WALK_WARNING: usize = 100;

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

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
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
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_discovery(config, &mut result);
        Self::validate_platforms(config, &mut result);
        Self::validate_writer(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_discovery(config: &Config, result: &mut ValidationResult) {
        let discovery = &config.discovery;
        let depths = [
            ("discovery.container_depth", discovery.container_depth),
            ("discovery.nearby_text_depth", discovery.nearby_text_depth),
            ("discovery.ancestor_line_depth", discovery.ancestor_line_depth),
        ];
        for (path, depth) in depths {
            if depth == 0 {
                result.add_error(ValidationError::new(path, "depth must be greater than 0"));
            } else if depth > DEEP_WALK_WARNING {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!(
                        "depth is very high (>{}), label resolution may be slow on nested markup",
                        DEEP_WALK_WARNING
                    ),
                ));
            }
        }

        if !discovery.row_tolerance_px.is_finite() || discovery.row_tolerance_px < 0.0 {
            result.add_error(ValidationError::new(
                "discovery.row_tolerance_px",
                "row_tolerance_px must be a non-negative number",
            ));
        }

        if discovery.min_label_len > discovery.max_label_len {
            result.add_error(ValidationError::new(
                "discovery.min_label_len",
                format!(
                    "min_label_len ({}) exceeds max_label_len ({})",
                    discovery.min_label_len, discovery.max_label_len
                ),
            ));
        }

        for (i, phrase) in discovery.extra_boilerplate.iter().enumerate() {
            if phrase.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("discovery.extra_boilerplate[{}]", i),
                    "boilerplate phrase cannot be empty",
                ));
            }
        }
    }

    fn validate_platforms(config: &Config, result: &mut ValidationResult) {
        for (i, platform) in config.discovery.platforms.iter().enumerate() {
            let prefix = format!("discovery.platforms[{}]", i);

            if platform.name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.name", prefix),
                    "Platform name cannot be empty",
                ));
            }
            if platform.container_selector.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.container_selector", prefix),
                    "container_selector cannot be empty",
                ));
            }
            if platform.input_selector.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.input_selector", prefix),
                    "input_selector cannot be empty",
                ));
            }
            if platform.url_patterns.is_empty() && platform.fingerprint.trim().is_empty() {
                result.add_warning(ValidationWarning::new(
                    prefix.clone(),
                    format!(
                        "Platform '{}' has neither url_patterns nor a fingerprint and will never be detected",
                        platform.name
                    ),
                ));
            }
            if platform.title_selectors.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("{}.title_selectors", prefix),
                    "No title selectors, container fields will have no label",
                ));
            }
        }
    }

    fn validate_writer(config: &Config, result: &mut ValidationResult) {
        if config.writer.highlight && config.writer.highlight_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "writer.highlight_ms",
                "highlight_ms is 0, the highlight will not be visible",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.browser.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "ws" | "wss") => {}
            Ok(url) => result.add_error(ValidationError::new(
                "browser.endpoint",
                format!("Unsupported endpoint scheme '{}'", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(
                "browser.endpoint",
                format!("Invalid endpoint URL: {}", e),
            )),
        }

        if config.browser.command_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.command_timeout_secs",
                "command_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, valid_levels
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
