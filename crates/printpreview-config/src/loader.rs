//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        if let Some(path) = config.sticky.path.take() {
            config.sticky.path = Some(PathBuf::from(Self::expand_path(&path.to_string_lossy())));
        }
        Ok(config)
    }

    /// Load the file at `path` when given, else the per-user default file
    /// when it exists, else built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Config::default()),
        }
    }

    /// `<config dir>/printpreview/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("printpreview").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Platform;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.destinations.search_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [platform]
            kind = "chromeos"

            [destinations]
            search_timeout_ms = 2500
            system_default_printer = "office-laser"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.platform.kind, Platform::ChromeOs);
        assert_eq!(config.destinations.search_timeout_ms, 2500);
        assert_eq!(
            config.destinations.system_default_printer.as_deref(),
            Some("office-laser")
        );
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [platform]
            kind = "windows"

            [destinations]
            pdf_printer_disabled = true
            use_system_default_printer = true
            default_destination_selection_rules = '{"kind": "local", "namePattern": ".*Color.*"}'

            [sticky]
            path = "/var/lib/printpreview/sticky.json"

            [logging]
            level = "debug"
            json = true
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.platform.kind, Platform::Windows);
        assert!(config.destinations.pdf_printer_disabled);
        assert!(config.destinations.use_system_default_printer);
        assert!(config
            .destinations
            .default_destination_selection_rules
            .unwrap()
            .contains("namePattern"));
        assert_eq!(
            config.sticky.path,
            Some(PathBuf::from("/var/lib/printpreview/sticky.json"))
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[destinations]").unwrap();
        writeln!(file, "search_timeout_ms = 500").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.destinations.search_timeout_ms, 500);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/printpreview.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();

        let config = ConfigLoader::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let result = ConfigLoader::load_str("[platform]\nkind = \"beos\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PRINTPREVIEW_TEST_PRINTER", "lab-inkjet");
        }
        let content = "system_default_printer = \"${PRINTPREVIEW_TEST_PRINTER}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("lab-inkjet"));
        unsafe {
            std::env::remove_var("PRINTPREVIEW_TEST_PRINTER");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_sticky_path_tilde_expanded() {
        let config = ConfigLoader::load_str("[sticky]\npath = \"~/sticky.json\"").unwrap();
        let path = config.sticky.path.unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("sticky.json"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/share";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }
}
