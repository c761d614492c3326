//! The settings model.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::debug;

use printpreview_config::Platform;
use printpreview_observable::Observable;
use printpreview_protocols::Cdd;

use super::document::{DocumentSettings, Margins, Size};
use super::policy::PolicySettings;
use super::{create_settings, sticky_setting_names, Setting, SettingName, STICKY_SETTINGS_VERSION};
use crate::destination::Destination;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// US Letter in points, used until the preview reports the real page size.
const DEFAULT_PAGE_SIZE: Size = Size::new(612, 792);

/// Model notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A setting that affects the rendered preview changed its effective value.
    PreviewSettingChanged,
    /// The persisted form changed; carries the full serialized sticky state.
    StickySettingsChanged(String),
    SettingValidChanged(bool),
    SettingsManagedChanged(bool),
}

/// Keeps print settings consistent with the selected destination, the
/// document, enterprise policy and the restored sticky state.
///
/// The model is owned by one task. Reads and writes go through the
/// underlying [`Observable`], so UI bindings can observe setting paths
/// directly.
pub struct PrintPreviewModel {
    pub(super) observable: Observable,
    pub(super) platform: Platform,
    pub(super) destination: Option<Destination>,
    pub(super) document_settings: DocumentSettings,
    pub(super) margins: Option<Margins>,
    pub(super) page_size: Size,
    pub(super) last_destination_capabilities: Option<Arc<Cdd>>,
    pub(super) sticky_settings: Option<Map<String, Value>>,
    pub(super) policy_settings: PolicySettings,
    pub(super) initialized: bool,
    pub(super) settings_managed: bool,
    header_footer_dirty: Arc<AtomicBool>,
    sender: broadcast::Sender<ModelEvent>,
}

impl PrintPreviewModel {
    pub fn new(platform: Platform) -> Self {
        let observable = Observable::new(create_settings());
        let header_footer_dirty = Arc::new(AtomicBool::new(false));
        for path in ["margins.value", "mediaSize.value"] {
            let dirty = Arc::clone(&header_footer_dirty);
            observable.add_observer(path, move |_| dirty.store(true, Ordering::SeqCst));
        }
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut model = Self {
            observable,
            platform,
            destination: None,
            document_settings: DocumentSettings::default(),
            margins: None,
            page_size: DEFAULT_PAGE_SIZE,
            last_destination_capabilities: None,
            sticky_settings: None,
            policy_settings: PolicySettings::default(),
            initialized: false,
            settings_managed: false,
            header_footer_dirty,
            sender,
        };
        model.update_settings_availability_from_document_settings();
        model
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.sender.subscribe()
    }

    pub(super) fn emit(&self, event: ModelEvent) {
        let _ = self.sender.send(event);
    }

    /// The settings record, for observers.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn document_settings(&self) -> &DocumentSettings {
        &self.document_settings
    }

    pub fn margins(&self) -> Option<&Margins> {
        self.margins.as_ref()
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a policy currently locks a visible setting.
    pub fn settings_managed(&self) -> bool {
        self.settings_managed
    }

    /// Maximum sheet count allowed by policy.
    pub fn max_sheets(&self) -> Option<u32> {
        self.policy_settings.sheets
    }

    /// Switch destination and recompute everything derived from its
    /// capabilities.
    pub fn set_destination(&mut self, destination: Destination) {
        debug!("Model destination set to {}", destination.key());
        self.destination = Some(destination);
        self.update_settings_from_destination();
    }

    pub fn set_document_settings(&mut self, document_settings: DocumentSettings) {
        self.document_settings = document_settings;
        self.update_settings_availability_from_document_settings();
    }

    /// Document margins reported by the preview.
    pub fn set_margins(&mut self, margins: Option<Margins>) {
        self.margins = margins;
        self.update_header_footer_available();
    }

    pub fn set_page_size(&mut self, page_size: Size) {
        self.page_size = page_size;
    }

    /// Snapshot of one setting.
    ///
    /// # Panics
    ///
    /// Panics if the settings record lost the entry.
    pub fn get_setting(&self, name: SettingName) -> Setting {
        self.observable
            .get(name.as_str())
            .and_then(|entry| serde_json::from_value(entry).ok())
            .unwrap_or_else(|| panic!("Setting is missing: {}", name))
    }

    /// The effective value of a setting, accounting for availability.
    pub fn get_setting_value(&self, name: SettingName) -> Value {
        self.get_setting(name).effective_value().clone()
    }

    pub(super) fn is_available(&self, name: SettingName) -> bool {
        self.get_setting(name).available
    }

    pub(super) fn value_as_bool(&self, name: SettingName) -> bool {
        self.get_setting_value(name).as_bool().unwrap_or(false)
    }

    /// Write one field of a setting without the user-facing checks.
    ///
    /// Emits [`ModelEvent::PreviewSettingChanged`] when the setting updates
    /// the preview and its effective value changed.
    pub(super) fn set_setting_path(&mut self, name: SettingName, field: &str, value: Value) {
        let setting = self.get_setting(name);
        let old_value = setting.effective_value().clone();
        let path = format!("{}.{}", name, field);
        if let Err(e) = self.observable.set(&path, value) {
            panic!("Invalid setting path {}: {}", path, e);
        }
        let new_value = self.get_setting_value(name);
        if new_value != old_value && setting.updates_preview {
            self.emit(ModelEvent::PreviewSettingChanged);
        }
        self.flush_header_footer();
    }

    /// Mark a setting as locked by policy.
    pub(super) fn set_by_policy(&mut self, name: SettingName, managed: bool) {
        let path = format!("{}.setByPolicy", name);
        if let Err(e) = self.observable.set(&path, Value::Bool(managed)) {
            panic!("Invalid setting path {}: {}", path, e);
        }
    }

    fn flush_header_footer(&mut self) {
        if self.header_footer_dirty.swap(false, Ordering::SeqCst) {
            self.update_header_footer_available();
        }
    }

    /// Set a setting's value from the UI.
    ///
    /// Ignored for settings locked by policy. Unless `no_sticky` is set the
    /// setting is marked as chosen by the user, and a changed value of a
    /// persisted setting emits [`ModelEvent::StickySettingsChanged`] once the
    /// model is initialized.
    pub fn set_setting(&mut self, name: SettingName, value: Value, no_sticky: bool) {
        let setting = self.get_setting(name);
        if setting.set_by_policy {
            debug!("Ignoring write to policy managed setting {}", name);
            return;
        }
        let fire_sticky = !no_sticky && setting.value != value && !setting.key.is_empty();
        self.set_setting_path(name, "value", value);
        if !no_sticky {
            self.set_setting_path(name, "setFromUi", Value::Bool(true));
        }
        if fire_sticky && self.initialized {
            self.emit(ModelEvent::StickySettingsChanged(self.get_sticky_settings()));
        }
    }

    /// Record whether the current value of a setting is valid.
    ///
    /// # Panics
    ///
    /// Panics when invalidating an unavailable setting; the user has no
    /// way to fix it.
    pub fn set_setting_valid(&mut self, name: SettingName, valid: bool) {
        let setting = self.get_setting(name);
        if !valid {
            assert!(setting.available, "Setting is not available: {}", name);
        }
        if setting.valid == valid {
            return;
        }
        let path = format!("{}.valid", name);
        if let Err(e) = self.observable.set(&path, Value::Bool(valid)) {
            panic!("Invalid setting path {}: {}", path, e);
        }
        self.emit(ModelEvent::SettingValidChanged(valid));
    }

    /// Serialized sticky state: `{"version": 2, <key>: <value>, ...}` for
    /// every persisted setting the user has chosen.
    pub fn get_sticky_settings(&self) -> String {
        let mut serialization = Map::new();
        serialization.insert("version".to_string(), Value::from(STICKY_SETTINGS_VERSION));
        for name in sticky_setting_names(self.platform) {
            let setting = self.get_setting(name);
            if setting.set_from_ui {
                serialization.insert(setting.key, setting.value);
            }
        }
        Value::Object(serialization).to_string()
    }
}

impl std::fmt::Debug for PrintPreviewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintPreviewModel")
            .field("platform", &self.platform)
            .field("destination", &self.destination.as_ref().map(Destination::key))
            .field("initialized", &self.initialized)
            .field("settings_managed", &self.settings_managed)
            .finish()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
