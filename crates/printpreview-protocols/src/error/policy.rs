//! Policy parsing errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid policy document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Invalid value for policy {policy}: {value}")]
    InvalidValue { policy: String, value: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_invalid_value() {
        let err = PolicyError::InvalidValue {
            policy: "duplex".to_string(),
            value: 9,
        };
        let display = err.to_string();
        assert!(display.contains("duplex"));
        assert!(display.contains('9'));
    }

    #[test]
    fn test_policy_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PolicyError::from(json_err);
        assert!(err.to_string().contains("Invalid policy document"));
    }
}
