//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub destinations: DestinationsConfig,

    #[serde(default)]
    pub sticky: StickyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Operating system the engine behaves as.
///
/// Several rules are platform specific: Drive and enterprise color, duplex
/// and PIN policies exist only on ChromeOS; the print-PDF-as-image policy
/// gates rasterization on Windows and macOS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Linux,
    ChromeOs,
    Windows,
    MacOs,
}

impl Platform {
    pub fn is_chrome_os(&self) -> bool {
        matches!(self, Platform::ChromeOs)
    }

    pub fn is_windows_or_mac(&self) -> bool {
        matches!(self, Platform::Windows | Platform::MacOs)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::ChromeOs => write!(f, "chromeos"),
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
        }
    }
}

/// Platform configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub kind: Platform,
}

/// Destination discovery and initial selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationsConfig {
    /// Hard limit on how long initial selection waits for discovery.
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,

    #[serde(default)]
    pub pdf_printer_disabled: bool,

    #[serde(default)]
    pub save_to_drive_disabled: bool,

    /// Id of the operating system's default printer.
    #[serde(default)]
    pub system_default_printer: Option<String>,

    /// Prefer the system default printer over recent destinations.
    #[serde(default)]
    pub use_system_default_printer: bool,

    /// JSON rule object: `{"kind": "local", "idPattern": "...", "namePattern": "..."}`.
    #[serde(default)]
    pub default_destination_selection_rules: Option<String>,
}

impl Default for DestinationsConfig {
    fn default() -> Self {
        Self {
            search_timeout_ms: default_search_timeout_ms(),
            pdf_printer_disabled: false,
            save_to_drive_disabled: false,
            system_default_printer: None,
            use_system_default_printer: false,
            default_destination_selection_rules: None,
        }
    }
}

fn default_search_timeout_ms() -> u64 {
    10_000
}

/// Sticky settings persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StickyConfig {
    /// Where the sticky settings blob is stored.
    /// Defaults to `<config dir>/printpreview/sticky_settings.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StickyConfig {
    /// Configured path, or the per-user default location.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join("printpreview").join("sticky_settings.json"))
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
