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

    /// Fail with the first error, keeping warnings on success.
    pub fn into_result(self) -> Result<Self, ConfigError> {
        if let Some(error) = self.errors.first() {
            return Err(ConfigError::InvalidValue {
                field: error.path.clone(),
                message: error.message.clone(),
            });
        }
        Ok(self)
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

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_platform(config, &mut result);
        Self::validate_destinations(config, &mut result);
        Self::validate_sticky(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_platform(config: &Config, result: &mut ValidationResult) {
        if config.destinations.save_to_drive_disabled && !config.platform.kind.is_chrome_os() {
            result.add_warning(ValidationWarning::new(
                "destinations.save_to_drive_disabled",
                format!(
                    "Save to Drive only exists on chromeos, setting has no effect on {}",
                    config.platform.kind
                ),
            ));
        }
    }

    fn validate_destinations(config: &Config, result: &mut ValidationResult) {
        let destinations = &config.destinations;

        if destinations.search_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "destinations.search_timeout_ms",
                "search_timeout_ms must be greater than 0",
            ));
        } else if destinations.search_timeout_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "destinations.search_timeout_ms",
                "search_timeout_ms is very high (>60s), initial selection may appear stuck",
            ));
        }

        if let Some(ref id) = destinations.system_default_printer {
            if id.is_empty() {
                result.add_error(ValidationError::new(
                    "destinations.system_default_printer",
                    "System default printer id cannot be empty",
                ));
            }
        } else if destinations.use_system_default_printer {
            result.add_warning(ValidationWarning::new(
                "destinations.use_system_default_printer",
                "use_system_default_printer is set but no system_default_printer is configured",
            ));
        }

        if let Some(ref rules) = destinations.default_destination_selection_rules {
            match serde_json::from_str::<serde_json::Value>(rules) {
                Ok(serde_json::Value::Object(_)) => {}
                Ok(_) => result.add_error(ValidationError::new(
                    "destinations.default_destination_selection_rules",
                    "Selection rules must be a JSON object",
                )),
                Err(e) => result.add_error(ValidationError::new(
                    "destinations.default_destination_selection_rules",
                    format!("Selection rules are not valid JSON: {}", e),
                )),
            }
        }
    }

    fn validate_sticky(config: &Config, result: &mut ValidationResult) {
        let Some(ref path) = config.sticky.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                result.add_warning(ValidationWarning::new(
                    "sticky.path",
                    format!("Sticky settings directory does not exist: {:?}", parent),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
