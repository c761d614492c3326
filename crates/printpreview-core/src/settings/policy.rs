//! Enterprise policy application.

use serde_json::Value;
use tracing::{debug, info};

use printpreview_protocols::{
    BackgroundGraphicsModeRestriction, ColorModeRestriction, DuplexModeRestriction,
    MediaSizePolicy, PinModeRestriction, Policies, Policy,
};

use super::availability::option_value;
use super::model::{ModelEvent, PrintPreviewModel};
use super::SettingName;

/// A policy value and whether it locks the setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PolicyEntry<T> {
    pub(super) value: T,
    pub(super) managed: bool,
}

impl<T> PolicyEntry<T> {
    /// Build an entry from the allowed and default modes. The allowed mode
    /// wins and makes the entry managed.
    fn from_modes(allowed_mode: Option<T>, default_mode: Option<T>) -> Option<Self> {
        let managed = allowed_mode.is_some();
        allowed_mode
            .or(default_mode)
            .map(|value| PolicyEntry { value, managed })
    }
}

/// Policies in effect, resolved to the values applied to settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PolicySettings {
    pub(super) header_footer: Option<PolicyEntry<bool>>,
    pub(super) css_background: Option<PolicyEntry<bool>>,
    pub(super) media_size: Option<MediaSizePolicy>,
    pub(super) print_pdf_as_image_availability: Option<bool>,
    pub(super) print_pdf_as_image: Option<bool>,
    pub(super) color: Option<PolicyEntry<ColorModeRestriction>>,
    pub(super) duplex: Option<PolicyEntry<DuplexModeRestriction>>,
    pub(super) pin: Option<PolicyEntry<PinModeRestriction>>,
    pub(super) sheets: Option<u32>,
}

/// Effective duplex default for a pair of policy modes.
///
/// When the allowed mode is anything but the "any two-sided" group the
/// allowed mode wins, falling back to the default. When two-sided printing
/// is required, a default naming a concrete two-sided mode is kept and
/// anything else collapses to the group.
pub fn resolve_duplex_policy(
    allowed_mode: Option<DuplexModeRestriction>,
    default_mode: Option<DuplexModeRestriction>,
) -> Option<DuplexModeRestriction> {
    if allowed_mode != Some(DuplexModeRestriction::Duplex) {
        return allowed_mode.or(default_mode);
    }
    match default_mode {
        Some(mode) if mode.is_two_sided_mode() => Some(mode),
        _ => Some(DuplexModeRestriction::Duplex),
    }
}

impl PrintPreviewModel {
    /// Record the policies in effect. They are applied by
    /// [`apply_sticky_settings`](Self::apply_sticky_settings) and
    /// [`apply_policies_on_destination_update`](Self::apply_policies_on_destination_update).
    pub fn set_policy_settings(&mut self, policies: &Policies) {
        let chrome_os = self.platform.is_chrome_os();
        let settings = &mut self.policy_settings;
        for policy in policies.iter() {
            match *policy {
                Policy::HeaderFooter {
                    allowed_mode,
                    default_mode,
                } => {
                    settings.header_footer = PolicyEntry::from_modes(allowed_mode, default_mode);
                }
                Policy::CssBackground {
                    allowed_mode,
                    default_mode,
                } => {
                    settings.css_background = PolicyEntry::from_modes(allowed_mode, default_mode)
                        .map(|entry| PolicyEntry {
                            value: entry.value == BackgroundGraphicsModeRestriction::Enabled,
                            managed: entry.managed,
                        });
                }
                Policy::MediaSize { default_mode } => {
                    settings.media_size = default_mode;
                }
                Policy::Sheets { value } => {
                    settings.sheets = value;
                }
                Policy::PrintPdfAsImageAvailability { allowed_mode } => {
                    if self.platform.is_windows_or_mac() {
                        settings.print_pdf_as_image_availability =
                            Some(allowed_mode.unwrap_or(false));
                    }
                }
                Policy::PrintPdfAsImage { default_mode } => {
                    settings.print_pdf_as_image = default_mode;
                }
                Policy::Color {
                    allowed_mode,
                    default_mode,
                } if chrome_os => {
                    settings.color = PolicyEntry::from_modes(allowed_mode, default_mode);
                }
                Policy::Duplex {
                    allowed_mode,
                    default_mode,
                } if chrome_os => {
                    settings.duplex = resolve_duplex_policy(allowed_mode, default_mode).map(
                        |value| PolicyEntry {
                            value,
                            managed: allowed_mode.is_some(),
                        },
                    );
                }
                Policy::Pin {
                    allowed_mode,
                    default_mode,
                } if chrome_os => {
                    settings.pin = PolicyEntry::from_modes(allowed_mode, default_mode);
                }
                Policy::Color { .. } | Policy::Duplex { .. } | Policy::Pin { .. } => {
                    debug!("Ignoring {} policy on {}", policy.name(), self.platform);
                }
            }
        }
        info!("Loaded {} printing policies", policies.len());
    }

    /// Layer document policies over the current values.
    pub(super) fn apply_policy_settings(&mut self) {
        let policies = self.policy_settings.clone();

        let locked = [
            (SettingName::HeaderFooter, policies.header_footer),
            (SettingName::CssBackground, policies.css_background),
        ];
        for (name, entry) in locked {
            let Some(entry) = entry else {
                continue;
            };
            self.set_setting(name, Value::Bool(entry.value), true);
            if entry.managed {
                self.set_by_policy(name, true);
            }
        }

        if self.platform.is_windows_or_mac() && policies.print_pdf_as_image_availability.is_some()
        {
            self.update_rasterize_available();
            if self.is_available(SettingName::Rasterize) {
                self.set_setting_path(SettingName::OtherOptions, "available", Value::Bool(true));
            }
        }

        if policies.print_pdf_as_image == Some(true) {
            self.set_setting(SettingName::Rasterize, Value::Bool(true), true);
        }
    }

    /// Re-apply policies whose effect depends on the destination's options.
    pub fn apply_policies_on_destination_update(&mut self) {
        let policies = self.policy_settings.clone();

        if let Some(media_size) = policies.media_size {
            if self.is_available(SettingName::MediaSize) {
                let matching = self
                    .destination
                    .as_ref()
                    .and_then(|d| d.get_media_size(media_size.width, media_size.height))
                    .map(option_value);
                if let Some(option) = matching {
                    self.set_setting_path(SettingName::MediaSize, "value", option);
                }
            }
        }

        if !self.platform.is_chrome_os() {
            return;
        }

        if let Some(entry) = policies.color {
            if self.is_available(SettingName::Color) {
                self.set_setting_path(
                    SettingName::Color,
                    "value",
                    Value::Bool(entry.value == ColorModeRestriction::Color),
                );
                self.set_by_policy(SettingName::Color, entry.managed);
            }
        }

        if let Some(entry) = policies.duplex {
            if self.is_available(SettingName::Duplex) {
                self.apply_duplex_policy(entry.value);
                self.set_by_policy(SettingName::Duplex, entry.managed);
                self.set_by_policy(SettingName::DuplexShortEdge, entry.managed);
            }
        }

        if let Some(entry) = policies.pin {
            if self.is_available(SettingName::Pin) {
                self.set_setting_path(
                    SettingName::Pin,
                    "value",
                    Value::Bool(entry.value == PinModeRestriction::Pin),
                );
                self.set_by_policy(SettingName::Pin, entry.managed);
            }
        }
    }

    fn apply_duplex_policy(&mut self, mode: DuplexModeRestriction) {
        let (duplex, short_edge) = match mode {
            DuplexModeRestriction::Simplex => (false, None),
            DuplexModeRestriction::LongEdge => (true, Some(false)),
            DuplexModeRestriction::ShortEdge => (true, Some(true)),
            DuplexModeRestriction::Duplex => (true, None),
            DuplexModeRestriction::Unset => return,
        };
        self.set_setting_path(SettingName::Duplex, "value", Value::Bool(duplex));
        if let Some(short_edge) = short_edge {
            self.set_setting_path(SettingName::DuplexShortEdge, "value", Value::Bool(short_edge));
        }
    }

    /// Recompute whether a visible setting is locked by policy.
    pub(super) fn update_managed(&mut self) {
        let managed = [SettingName::CssBackground, SettingName::HeaderFooter]
            .into_iter()
            .any(|name| {
                let setting = self.get_setting(name);
                setting.available && setting.set_by_policy
            });
        if managed != self.settings_managed {
            self.settings_managed = managed;
            self.emit(ModelEvent::SettingsManagedChanged(managed));
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
