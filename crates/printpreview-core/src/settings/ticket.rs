//! Print ticket serialization.
//!
//! The ticket is consumed by the native print pipeline, so field names,
//! field order and enum encodings are fixed.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use printpreview_protocols::{DestinationOrigin, PrinterType};

use super::document::{MarginsType, ScalingType};
use super::model::PrintPreviewModel;
use super::SettingName;
use crate::destination::Destination;

/// Duplex mode as numbered by the native printing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum DuplexMode {
    Simplex = 0,
    LongEdge = 1,
    ShortEdge = 2,
}

impl From<DuplexMode> for u8 {
    fn from(value: DuplexMode) -> Self {
        value as u8
    }
}

/// The flat job description sent to the native print pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintTicket {
    pub media_size: Value,
    pub page_count: usize,
    pub landscape: bool,
    pub color: i32,
    pub header_footer_enabled: bool,
    pub margins_type: MarginsType,
    pub duplex: DuplexMode,
    pub copies: u32,
    pub collate: bool,
    pub should_print_backgrounds: bool,
    pub should_print_selection_only: bool,
    pub preview_modifiable: bool,
    pub printer_type: PrinterType,
    #[serde(rename = "rasterizePDF")]
    pub rasterize_pdf: bool,
    pub scale_factor: i64,
    pub scaling_type: ScalingType,
    pub pages_per_sheet: u32,
    pub dpi_horizontal: u64,
    pub dpi_vertical: u64,
    pub dpi_default: bool,
    pub device_name: String,
    pub page_width: i64,
    pub page_height: i64,
    pub show_system_dialog: bool,
    #[serde(rename = "openPDFInPreview", skip_serializing_if = "Option::is_none")]
    pub open_pdf_in_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins_custom: Option<Value>,
    /// Cloud job ticket, for extension printers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    /// Raw capabilities JSON, for extension printers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_settings: Option<Value>,
}

impl PrintTicket {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Leading integer of a percentage string; `"90.5"` reads as 90.
fn parse_scale_factor(scaling: &str) -> Option<i64> {
    let trimmed = scaling.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..digits_end].parse().ok()
}

/// Copy the listed fields that are present and not null.
fn copy_fields(source: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            source
                .get(*field)
                .filter(|v| !v.is_null())
                .map(|v| (field.to_string(), v.clone()))
        })
        .collect()
}

impl PrintPreviewModel {
    fn duplex_mode(&self) -> DuplexMode {
        if !self.value_as_bool(SettingName::Duplex) {
            DuplexMode::Simplex
        } else if self.value_as_bool(SettingName::DuplexShortEdge) {
            DuplexMode::ShortEdge
        } else {
            DuplexMode::LongEdge
        }
    }

    fn cdd_duplex_type(&self) -> &'static str {
        match self.duplex_mode() {
            DuplexMode::Simplex => "NO_DUPLEX",
            DuplexMode::LongEdge => "LONG_EDGE",
            DuplexMode::ShortEdge => "SHORT_EDGE",
        }
    }

    /// Build the print ticket for `destination`.
    pub fn create_print_ticket(
        &self,
        destination: &Destination,
        open_pdf_in_preview: bool,
        show_system_dialog: bool,
    ) -> PrintTicket {
        let dpi = self.get_setting_value(SettingName::Dpi);
        let scaling_setting = if self.is_available(SettingName::ScalingTypePdf) {
            SettingName::ScalingTypePdf
        } else {
            SettingName::ScalingType
        };
        let scaling_type =
            ScalingType::from_value(&self.get_setting_value(scaling_setting)).unwrap_or_default();
        let scale_factor = if scaling_type == ScalingType::Custom {
            let scaling = self.get_setting_value(SettingName::Scaling);
            scaling.as_str().and_then(parse_scale_factor).unwrap_or_else(|| {
                warn!("Unparsable custom scaling {}, printing at 100%", scaling);
                100
            })
        } else {
            100
        };
        let margins_type =
            MarginsType::from_value(&self.get_setting_value(SettingName::Margins)).unwrap_or_default();

        let mut ticket = PrintTicket {
            media_size: self.get_setting_value(SettingName::MediaSize),
            page_count: self
                .get_setting_value(SettingName::Pages)
                .as_array()
                .map_or(0, Vec::len),
            landscape: self.value_as_bool(SettingName::Layout),
            color: destination.get_native_color_model(self.value_as_bool(SettingName::Color)),
            header_footer_enabled: false,
            margins_type,
            duplex: self.duplex_mode(),
            copies: self
                .get_setting_value(SettingName::Copies)
                .as_u64()
                .map_or(1, |copies| copies as u32),
            collate: self.value_as_bool(SettingName::Collate),
            should_print_backgrounds: self.value_as_bool(SettingName::CssBackground),
            should_print_selection_only: false,
            preview_modifiable: self.document_settings.is_modifiable,
            printer_type: destination.printer_type(),
            rasterize_pdf: self.value_as_bool(SettingName::Rasterize),
            scale_factor,
            scaling_type,
            pages_per_sheet: self
                .get_setting_value(SettingName::PagesPerSheet)
                .as_u64()
                .map_or(1, |pages| pages as u32),
            dpi_horizontal: dpi.get("horizontal_dpi").and_then(Value::as_u64).unwrap_or(0),
            dpi_vertical: dpi.get("vertical_dpi").and_then(Value::as_u64).unwrap_or(0),
            dpi_default: dpi.get("is_default").and_then(Value::as_bool).unwrap_or(false),
            device_name: destination.id().to_string(),
            page_width: self.page_size.width,
            page_height: self.page_size.height,
            show_system_dialog,
            open_pdf_in_preview: open_pdf_in_preview.then_some(true),
            margins_custom: (margins_type == MarginsType::Custom)
                .then(|| self.get_setting_value(SettingName::CustomMargins)),
            ticket: None,
            capabilities: None,
            pin_value: None,
            advanced_settings: None,
        };

        if destination.is_extension() {
            ticket.ticket = Some(self.create_cloud_job_ticket(destination));
            ticket.capabilities = destination
                .capabilities()
                .and_then(|cdd| serde_json::to_string(cdd.as_ref()).ok());
        }

        if self.platform.is_chrome_os() {
            if self.value_as_bool(SettingName::Pin) {
                ticket.pin_value = self
                    .get_setting_value(SettingName::PinValue)
                    .as_str()
                    .map(str::to_string);
            }
            if destination.origin() == DestinationOrigin::ChromeOs {
                ticket.advanced_settings = Some(self.get_setting_value(SettingName::VendorItems));
            }
        }

        ticket
    }

    /// Serialize the cloud job ticket embedded for extension printers.
    ///
    /// # Panics
    ///
    /// Panics if `destination` is not an extension printer or has no
    /// capabilities.
    pub fn create_cloud_job_ticket(&self, destination: &Destination) -> String {
        assert!(
            destination.is_extension(),
            "Trying to create a cloud job ticket for non-extension destination {}",
            destination.key()
        );
        let cdd = destination.capabilities().unwrap_or_else(|| {
            panic!(
                "Trying to create a cloud job ticket for destination {} with no capabilities",
                destination.key()
            )
        });

        let mut print = Map::new();

        let collate = self.get_setting(SettingName::Collate);
        if collate.available {
            print.insert("collate".to_string(), json!({ "collate": collate.value }));
        }

        let color = self.get_setting(SettingName::Color);
        let color_option = if color.available {
            let option = destination.get_color(color.value.as_bool().unwrap_or(false));
            if option.is_none() {
                warn!("Could not find correct color option for {}", destination.key());
            }
            option
        } else {
            // Always name a color so readers of the ticket need not guess.
            destination.default_color_option()
        };
        if let Some(option) = color_option {
            let mut item = Map::new();
            if let Some(ref color_type) = option.r#type {
                item.insert("type".to_string(), Value::from(color_type.as_str()));
            }
            if let Some(ref vendor_id) = option.vendor_id {
                item.insert("vendor_id".to_string(), Value::from(vendor_id.as_str()));
            }
            print.insert("color".to_string(), Value::Object(item));
        }

        if self.is_available(SettingName::Copies) {
            print.insert(
                "copies".to_string(),
                json!({ "copies": self.get_setting_value(SettingName::Copies) }),
            );
        }

        if self.is_available(SettingName::Duplex) {
            print.insert("duplex".to_string(), json!({ "type": self.cdd_duplex_type() }));
        }

        let media_size = self.get_setting(SettingName::MediaSize);
        if media_size.available {
            let item = copy_fields(
                &media_size.value,
                &["width_microns", "height_microns", "is_continuous_feed", "vendor_id"],
            );
            print.insert("media_size".to_string(), Value::Object(item));
        }

        let layout = self.get_setting(SettingName::Layout);
        if !layout.available {
            // The user cannot pick an orientation; let the printer decide.
            let has_auto = cdd
                .printer
                .as_ref()
                .and_then(|caps| caps.page_orientation.as_ref())
                .is_some_and(|o| o.option.iter().any(|o| o.r#type.as_deref() == Some("AUTO")));
            if has_auto {
                print.insert("page_orientation".to_string(), json!({ "type": "AUTO" }));
            }
        } else {
            let orientation = if layout.value.as_bool().unwrap_or(false) {
                "LANDSCAPE"
            } else {
                "PORTRAIT"
            };
            print.insert("page_orientation".to_string(), json!({ "type": orientation }));
        }

        let dpi = self.get_setting(SettingName::Dpi);
        if dpi.available {
            let item = copy_fields(&dpi.value, &["horizontal_dpi", "vertical_dpi", "vendor_id"]);
            print.insert("dpi".to_string(), Value::Object(item));
        }

        let vendor_items = self.get_setting(SettingName::VendorItems);
        if vendor_items.available {
            let items: Vec<Value> = vendor_items
                .value
                .as_object()
                .into_iter()
                .flatten()
                .map(|(id, value)| json!({ "id": id, "value": value }))
                .collect();
            print.insert("vendor_ticket_item".to_string(), Value::Array(items));
        }

        json!({ "version": "1.0", "print": print }).to_string()
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
