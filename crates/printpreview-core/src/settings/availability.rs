//! Availability and default values derived from the destination and the
//! document.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use printpreview_protocols::{CddCapabilities, DuplexType, PrinterType};

use super::document::MarginsType;
use super::model::PrintPreviewModel;
use super::{SettingName, MINIMUM_HEIGHT_MICRONS};

pub(super) fn option_value<T: Serialize>(option: &T) -> Value {
    serde_json::to_value(option).unwrap_or_default()
}

impl PrintPreviewModel {
    /// Recompute capability driven availability and defaults.
    ///
    /// Does nothing while the destination's capability document is the same
    /// allocation as the one last processed.
    pub fn update_settings_from_destination(&mut self) {
        let Some(destination) = self.destination.as_ref() else {
            return;
        };
        let capabilities = destination.capabilities().cloned();
        let unchanged = match (&capabilities, &self.last_destination_capabilities) {
            (Some(current), Some(last)) => Arc::ptr_eq(current, last),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        self.last_destination_capabilities = capabilities.clone();

        self.update_settings_availability_from_destination();

        if capabilities.as_ref().and_then(|cdd| cdd.printer.as_ref()).is_none() {
            return;
        }
        self.update_settings_values();
        self.apply_persistent_cdd_defaults();
    }

    fn update_settings_availability_from_destination(&mut self) {
        let Some(destination) = self.destination.clone() else {
            return;
        };
        let cdd = destination.capabilities().cloned();
        let caps = cdd.as_deref().and_then(|cdd| cdd.printer.as_ref());

        self.set_setting_path(
            SettingName::Copies,
            "available",
            Value::Bool(destination.has_copies_capability()),
        );
        self.set_setting_path(
            SettingName::Collate,
            "available",
            Value::Bool(caps.is_some_and(|c| c.collate.is_some())),
        );
        self.set_setting_path(
            SettingName::Color,
            "available",
            Value::Bool(destination.has_color_capability()),
        );

        let duplex_options = caps
            .and_then(|c| c.duplex.as_ref())
            .map(|d| d.option.as_slice())
            .unwrap_or_default();
        let has_duplex = |t: DuplexType| duplex_options.iter().any(|o| o.r#type == t);
        let has_long_edge = has_duplex(DuplexType::LongEdge);
        let has_short_edge = has_duplex(DuplexType::ShortEdge);
        self.set_setting_path(
            SettingName::DuplexShortEdge,
            "available",
            Value::Bool(has_long_edge && has_short_edge),
        );
        self.set_setting_path(
            SettingName::Duplex,
            "available",
            Value::Bool((has_long_edge || has_short_edge) && has_duplex(DuplexType::NoDuplex)),
        );

        self.set_setting_path(
            SettingName::VendorItems,
            "available",
            Value::Bool(caps.is_some_and(|c| c.vendor_capability.is_some())),
        );

        if self.platform.is_chrome_os() {
            let has_pin = destination.has_pin_setting();
            self.set_setting_path(SettingName::Pin, "available", Value::Bool(has_pin));
            self.set_setting_path(SettingName::PinValue, "available", Value::Bool(has_pin));
        }

        self.update_settings_availability_from_destination_and_document_settings();
    }

    fn update_settings_availability_from_destination_and_document_settings(&mut self) {
        let Some(destination) = self.destination.clone() else {
            return;
        };
        let is_modifiable = self.document_settings.is_modifiable;
        let known_size_to_save_as_pdf = destination.printer_type() == PrinterType::Pdf
            && (!is_modifiable || self.document_settings.all_pages_have_custom_size);
        let scaling_available = !known_size_to_save_as_pdf;
        self.set_setting_path(SettingName::Scaling, "available", Value::Bool(scaling_available));
        self.set_setting_path(
            SettingName::ScalingType,
            "available",
            Value::Bool(scaling_available && is_modifiable),
        );
        self.set_setting_path(
            SettingName::ScalingTypePdf,
            "available",
            Value::Bool(scaling_available && !is_modifiable),
        );

        let cdd = destination.capabilities().cloned();
        let caps = cdd.as_deref().and_then(|cdd| cdd.printer.as_ref());
        self.set_setting_path(
            SettingName::MediaSize,
            "available",
            Value::Bool(caps.is_some_and(|c| c.media_size.is_some()) && !known_size_to_save_as_pdf),
        );
        self.set_setting_path(
            SettingName::Dpi,
            "available",
            Value::Bool(
                caps.and_then(|c| c.dpi.as_ref())
                    .is_some_and(|dpi| dpi.option.len() > 1),
            ),
        );
        let layout_available = self.is_layout_available(caps);
        self.set_setting_path(SettingName::Layout, "available", Value::Bool(layout_available));
    }

    pub(super) fn update_settings_availability_from_document_settings(&mut self) {
        let is_modifiable = self.document_settings.is_modifiable;
        self.set_setting_path(SettingName::Margins, "available", Value::Bool(is_modifiable));
        self.set_setting_path(
            SettingName::CustomMargins,
            "available",
            Value::Bool(is_modifiable),
        );
        self.set_setting_path(
            SettingName::CssBackground,
            "available",
            Value::Bool(is_modifiable),
        );
        self.set_setting_path(
            SettingName::SelectionOnly,
            "available",
            Value::Bool(is_modifiable && self.document_settings.has_selection),
        );
        let header_footer = self.is_header_footer_available();
        self.set_setting_path(SettingName::HeaderFooter, "available", Value::Bool(header_footer));
        let rasterize = self.is_rasterize_available();
        self.set_setting_path(SettingName::Rasterize, "available", Value::Bool(rasterize));

        let other_options = [
            SettingName::CssBackground,
            SettingName::SelectionOnly,
            SettingName::HeaderFooter,
            SettingName::Rasterize,
        ]
        .into_iter()
        .any(|name| self.is_available(name));
        self.set_setting_path(SettingName::OtherOptions, "available", Value::Bool(other_options));

        self.update_settings_availability_from_destination_and_document_settings();
    }

    pub(super) fn update_header_footer_available(&mut self) {
        let available = self.is_header_footer_available();
        self.set_setting_path(SettingName::HeaderFooter, "available", Value::Bool(available));
    }

    pub(super) fn update_rasterize_available(&mut self) {
        let available = self.is_rasterize_available();
        self.set_setting_path(SettingName::Rasterize, "available", Value::Bool(available));
    }

    fn is_header_footer_available(&self) -> bool {
        if !self.document_settings.is_modifiable {
            return false;
        }

        let dimension = if self.value_as_bool(SettingName::Layout) {
            "width_microns"
        } else {
            "height_microns"
        };
        let microns = self
            .get_setting_value(SettingName::MediaSize)
            .get(dimension)
            .and_then(Value::as_i64);
        if microns.is_some_and(|m| m < MINIMUM_HEIGHT_MICRONS) {
            return false;
        }

        match MarginsType::from_value(&self.get_setting_value(SettingName::Margins)) {
            Some(MarginsType::NoMargins) => return false,
            Some(MarginsType::Minimum) => return true,
            _ => {}
        }

        self.margins
            .map_or(true, |margins| margins.top > 0.0 || margins.bottom > 0.0)
    }

    /// Rasterizing only applies to PDF sources. Windows and macOS also gate
    /// it behind the `printPdfAsImageAvailability` policy.
    pub(super) fn is_rasterize_available(&self) -> bool {
        let available = !self.document_settings.is_modifiable;
        if !self.platform.is_windows_or_mac() {
            return available;
        }
        available && self.policy_settings.print_pdf_as_image_availability == Some(true)
    }

    fn is_layout_available(&self, caps: Option<&CddCapabilities>) -> bool {
        let Some(orientation) = caps.and_then(|c| c.page_orientation.as_ref()) else {
            return false;
        };
        if !self.document_settings.is_modifiable
            || self.document_settings.all_pages_have_custom_orientation
        {
            return false;
        }
        let has = |t: &str| orientation.option.iter().any(|o| o.r#type.as_deref() == Some(t));
        has("LANDSCAPE") && (has("AUTO") || has("PORTRAIT"))
    }

    fn update_settings_values(&mut self) {
        let Some(destination) = self.destination.clone() else {
            return;
        };
        let Some(cdd) = destination.capabilities().cloned() else {
            return;
        };
        let Some(caps) = cdd.printer.as_ref() else {
            return;
        };

        if self.is_available(SettingName::MediaSize) {
            if let Some(option) = caps.media_size.as_ref().and_then(|m| m.default_or_first()) {
                self.set_setting(SettingName::MediaSize, option_value(option), true);
            }
        }

        let dpi = self.get_setting(SettingName::Dpi);
        let default_dpi = caps.dpi.as_ref().and_then(|d| d.default_or_first());
        if dpi.available {
            let matching = if dpi.set_from_ui {
                let current = self.get_setting_value(SettingName::Dpi);
                let horizontal = current.get("horizontal_dpi").and_then(Value::as_u64);
                let vertical = current.get("vertical_dpi").and_then(Value::as_u64);
                match (horizontal, vertical) {
                    (Some(h), Some(v)) => destination.get_dpi(h as u32, v as u32),
                    _ => None,
                }
            } else {
                None
            };
            if let Some(option) = matching.or(default_dpi) {
                self.set_setting(SettingName::Dpi, option_value(option), true);
            }
        } else if let Some(option) = default_dpi {
            self.set_setting_path(SettingName::Dpi, "unavailableValue", option_value(option));
        }

        let color = self.get_setting(SettingName::Color);
        if !color.set_from_ui && color.available {
            if let Some(option) = destination.default_color_option() {
                self.set_setting(SettingName::Color, Value::Bool(!option.is_monochrome()), true);
            }
        } else if !color.available {
            // Without a color capability assume black and white.
            let unavailable = caps
                .color
                .as_ref()
                .and_then(|c| c.option.first())
                .is_some_and(|o| !o.is_monochrome());
            self.set_setting_path(SettingName::Color, "unavailableValue", Value::Bool(unavailable));
        }

        let duplex = self.get_setting(SettingName::Duplex);
        if !duplex.set_from_ui && duplex.available {
            let options = caps.duplex.as_ref();
            if let Some(option) = options.and_then(|d| d.default_option()) {
                let two_sided = option.r#type.is_two_sided();
                self.set_setting(SettingName::Duplex, Value::Bool(two_sided), true);
                if two_sided {
                    self.set_setting(
                        SettingName::DuplexShortEdge,
                        Value::Bool(option.r#type == DuplexType::ShortEdge),
                        true,
                    );
                }
                if !self.is_available(SettingName::DuplexShortEdge) {
                    // Only one two-sided mode exists.
                    let short_edge = options
                        .is_some_and(|d| d.option.iter().any(|o| o.r#type == DuplexType::ShortEdge));
                    self.set_setting_path(
                        SettingName::DuplexShortEdge,
                        "unavailableValue",
                        Value::Bool(short_edge),
                    );
                }
            }
        } else if !duplex.available {
            let (has_long_edge, has_short_edge) = match caps.duplex.as_ref() {
                Some(d) => (
                    d.option.iter().any(|o| o.r#type == DuplexType::LongEdge),
                    d.option.iter().any(|o| o.r#type == DuplexType::ShortEdge),
                ),
                None => (false, false),
            };
            self.set_setting_path(
                SettingName::Duplex,
                "unavailableValue",
                Value::Bool(has_long_edge || has_short_edge),
            );
            self.set_setting_path(
                SettingName::DuplexShortEdge,
                "unavailableValue",
                Value::Bool(has_short_edge),
            );
        }

        if self.is_available(SettingName::VendorItems) {
            let mut vendor_settings = Map::new();
            for item in caps.vendor_capability.iter().flatten() {
                if let Some(default_value) = item.default_value() {
                    vendor_settings.insert(item.id.clone(), Value::from(default_value));
                }
            }
            self.set_setting(SettingName::VendorItems, Value::Object(vendor_settings), true);
        }
    }

    /// Extension printers may ask for options to reset to their default on
    /// every selection.
    pub(super) fn apply_persistent_cdd_defaults(&mut self) {
        let Some(destination) = self.destination.clone() else {
            return;
        };
        if !destination.is_extension() {
            return;
        }
        let Some(cdd) = destination.capabilities().cloned() else {
            return;
        };
        let Some(caps) = cdd.printer.as_ref() else {
            return;
        };

        if self.is_available(SettingName::MediaSize) {
            if let Some(option) = caps.media_size.as_ref().and_then(|c| c.reset_value()) {
                self.set_setting_path(SettingName::MediaSize, "value", option_value(option));
            }
        }

        if self.is_available(SettingName::Color) {
            if let Some(option) = caps.color.as_ref().and_then(|c| c.reset_value()) {
                self.set_setting_path(
                    SettingName::Color,
                    "value",
                    Value::Bool(!option.is_monochrome()),
                );
            }
        }

        if self.is_available(SettingName::Duplex) {
            if let Some(option) = caps.duplex.as_ref().and_then(|c| c.reset_value()) {
                self.set_setting_path(
                    SettingName::Duplex,
                    "value",
                    Value::Bool(option.r#type.is_two_sided()),
                );
                if !self.is_available(SettingName::DuplexShortEdge) {
                    self.set_setting_path(
                        SettingName::DuplexShortEdge,
                        "value",
                        Value::Bool(option.r#type == DuplexType::ShortEdge),
                    );
                }
            }
        }

        if self.is_available(SettingName::Dpi) {
            if let Some(option) = caps.dpi.as_ref().and_then(|c| c.reset_value()) {
                self.set_setting_path(SettingName::Dpi, "value", option_value(option));
            }
        }
        debug!("Applied reset-to-default options for {}", destination.key());
    }
}
