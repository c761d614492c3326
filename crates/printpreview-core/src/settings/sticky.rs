//! Restoring persisted ("sticky") settings.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use printpreview_protocols::DestinationOrigin;

use super::document::{MarginsType, ScalingType};
use super::model::{ModelEvent, PrintPreviewModel};
use super::{sticky_setting_names, SettingName, STICKY_SETTINGS_VERSION};

const CUSTOM_MARGIN_KEYS: [&str; 4] = ["marginTop", "marginRight", "marginBottom", "marginLeft"];

/// Round half up, matching how the margins were rounded when saved.
fn round_margin(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round custom margins to whole points. Returns false when any margin is
/// missing or negative.
fn sanitize_custom_margins(margins: &mut Map<String, Value>) -> bool {
    for key in CUSTOM_MARGIN_KEYS {
        let Some(value) = margins.get(key).and_then(Value::as_f64) else {
            return false;
        };
        let rounded = round_margin(value);
        margins.insert(key.to_string(), Value::from(rounded));
        if rounded < 0 {
            return false;
        }
    }
    true
}

fn is_supported_recent(recent: &Value) -> bool {
    let origin = recent
        .get("origin")
        .and_then(|origin| serde_json::from_value::<DestinationOrigin>(origin.clone()).ok());
    !origin.is_some_and(|origin| origin.is_unsupported())
}

impl PrintPreviewModel {
    /// Parse and hold the persisted settings until capabilities arrive.
    ///
    /// Recent destinations are applied right away so destination discovery
    /// can start looking for them. Missing, malformed or wrong-version
    /// blobs are ignored.
    ///
    /// # Panics
    ///
    /// Panics if sticky settings were already set.
    pub fn set_sticky_settings(&mut self, saved: Option<&str>) {
        assert!(self.sticky_settings.is_none(), "Sticky settings already set");

        let Some(saved) = saved.filter(|s| !s.is_empty()) else {
            return;
        };
        let mut saved = match serde_json::from_str::<Value>(saved) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Ignoring sticky settings that are not an object");
                return;
            }
            Err(e) => {
                warn!("Unable to parse sticky settings: {}", e);
                return;
            }
        };

        if saved.get("version").and_then(Value::as_u64) != Some(STICKY_SETTINGS_VERSION) {
            debug!("Ignoring sticky settings with unsupported version");
            return;
        }

        let custom_margins = saved
            .get("marginsType")
            .and_then(MarginsType::from_value)
            == Some(MarginsType::Custom);
        if custom_margins {
            let valid = saved
                .get_mut("customMargins")
                .and_then(Value::as_object_mut)
                .is_some_and(sanitize_custom_margins);
            if !valid {
                warn!("Dropping invalid custom margins from sticky settings");
                saved.insert("marginsType".to_string(), Value::from(MarginsType::Default));
                saved.remove("customMargins");
            }
        }

        let recents = match saved.remove("recentDestinations") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(recents)) => recents,
            Some(single) => vec![single],
        };
        let recents: Vec<Value> = recents.into_iter().filter(is_supported_recent).collect();

        self.set_setting(
            SettingName::RecentDestinations,
            Value::Array(recents.clone()),
            false,
        );
        saved.insert("recentDestinations".to_string(), Value::Array(recents));

        self.sticky_settings = Some(saved);
    }

    /// Apply the held sticky settings, then reset-to-default options, then
    /// policies, and mark the model initialized.
    pub fn apply_sticky_settings(&mut self) {
        if let Some(sticky) = self.sticky_settings.clone() {
            for name in sticky_setting_names(self.platform) {
                let key = self.get_setting(name).key;
                match sticky.get(&key) {
                    Some(value) => self.set_setting(name, value.clone(), false),
                    None => self.apply_scaling_sticky_settings(name, &sticky),
                }
            }
        }
        self.apply_persistent_cdd_defaults();
        self.apply_policy_settings();
        self.initialized = true;
        self.update_managed();
        self.sticky_settings = None;
        info!("Print settings initialized");
        self.emit(ModelEvent::StickySettingsChanged(self.get_sticky_settings()));
    }

    /// Translate the retired `customScaling` and `isFitToPageEnabled` keys.
    fn apply_scaling_sticky_settings(&mut self, name: SettingName, sticky: &Map<String, Value>) {
        match name {
            SettingName::ScalingType => {
                if let Some(custom) = sticky.get("customScaling") {
                    let scaling_type = if custom.as_bool().unwrap_or(false) {
                        ScalingType::Custom
                    } else {
                        ScalingType::Default
                    };
                    self.set_setting(name, scaling_type.into(), false);
                }
            }
            SettingName::ScalingTypePdf => {
                let scaling_type = self.get_setting(SettingName::ScalingType).value;
                if let Some(fit_to_page) = sticky.get("isFitToPageEnabled") {
                    let value = if fit_to_page.as_bool().unwrap_or(false) {
                        ScalingType::FitToPage.into()
                    } else {
                        scaling_type
                    };
                    self.set_setting(name, value, false);
                } else if ScalingType::from_value(&scaling_type) == Some(ScalingType::Custom) {
                    self.set_setting(name, ScalingType::Custom.into(), false);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "sticky_tests.rs"]
mod tests;
