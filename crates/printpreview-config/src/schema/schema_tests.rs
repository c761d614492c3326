use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.platform.kind, Platform::Linux);
    assert_eq!(config.destinations.search_timeout_ms, 10_000);
    assert!(!config.destinations.pdf_printer_disabled);
    assert!(config.destinations.system_default_printer.is_none());
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn test_destinations_config_default() {
    let destinations = DestinationsConfig::default();
    assert!(!destinations.save_to_drive_disabled);
    assert!(!destinations.use_system_default_printer);
    assert!(destinations.default_destination_selection_rules.is_none());
}

#[test]
fn test_platform_serde_names() {
    let platform: Platform = serde_json::from_str("\"chromeos\"").unwrap();
    assert_eq!(platform, Platform::ChromeOs);
    assert_eq!(serde_json::to_string(&Platform::MacOs).unwrap(), "\"macos\"");
    assert_eq!(Platform::Windows.to_string(), "windows");
}

#[test]
fn test_platform_predicates() {
    assert!(Platform::ChromeOs.is_chrome_os());
    assert!(!Platform::Linux.is_chrome_os());
    assert!(Platform::Windows.is_windows_or_mac());
    assert!(Platform::MacOs.is_windows_or_mac());
    assert!(!Platform::ChromeOs.is_windows_or_mac());
}

#[test]
fn test_sticky_resolved_path_prefers_configured() {
    let sticky = StickyConfig {
        path: Some(PathBuf::from("/tmp/sticky.json")),
    };
    assert_eq!(sticky.resolved_path(), Some(PathBuf::from("/tmp/sticky.json")));
}

#[test]
fn test_sticky_default_path_file_name() {
    let sticky = StickyConfig::default();
    if let Some(path) = sticky.resolved_path() {
        assert!(path.ends_with("printpreview/sticky_settings.json"));
    }
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("10000"));
    assert!(json.contains("linux"));
}
