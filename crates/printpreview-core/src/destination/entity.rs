//! Print destinations and their capability queries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use printpreview_protocols::{
    Cdd, CddCapabilities, ColorOption, DestinationOrigin, DpiOption, DuplexType,
    MediaSizeOption, PrinterDescriptor, PrinterState, PrinterStatusReason, PrinterType,
    ProvisionalType,
};

use crate::printer_status::{
    compute_printer_state, get_status_reason_from_printer_status, printer_status_icon,
};

/// Id of the virtual "Save as PDF" destination.
pub const SAVE_AS_PDF_ID: &str = "Save as PDF";

/// Id of the virtual "Save to Drive" destination on ChromeOS.
pub const SAVE_TO_DRIVE_CROS_ID: &str = "Save to Drive CrOS";

pub const COLOR_TYPES: [&str; 2] = ["STANDARD_COLOR", "CUSTOM_COLOR"];
pub const MONOCHROME_TYPES: [&str; 2] = ["STANDARD_MONOCHROME", "CUSTOM_MONOCHROME"];

/// Native color model sent when a printer does not name its own.
pub const NATIVE_COLOR_MODEL_GRAY: i32 = 1;
pub const NATIVE_COLOR_MODEL_COLOR: i32 = 2;

pub fn create_destination_key(id: &str, origin: DestinationOrigin) -> String {
    format!("{}/{}/", id, origin)
}

/// Whether `id` names one of the virtual PDF destinations.
pub fn is_pdf_printer(id: &str) -> bool {
    id == SAVE_AS_PDF_ID || id == SAVE_TO_DRIVE_CROS_ID
}

/// Source type a destination with this identity is discovered through.
pub fn printer_type_for(id: &str, origin: DestinationOrigin) -> PrinterType {
    if is_pdf_printer(id) {
        PrinterType::Pdf
    } else if origin == DestinationOrigin::Extension {
        PrinterType::Extension
    } else {
        PrinterType::Local
    }
}

/// One print target.
#[derive(Debug, Clone)]
pub struct Destination {
    id: String,
    origin: DestinationOrigin,
    key: String,
    printer_type: PrinterType,
    display_name: String,
    location: String,
    description: String,
    extension_id: String,
    extension_name: String,
    is_enterprise_printer: bool,
    provisional_type: ProvisionalType,
    printer_status_reason: Option<PrinterStatusReason>,
    capabilities: Option<Arc<Cdd>>,
}

impl Destination {
    pub fn new(
        id: impl Into<String>,
        origin: DestinationOrigin,
        display_name: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            key: create_destination_key(&id, origin),
            printer_type: printer_type_for(&id, origin),
            id,
            origin,
            display_name: display_name.into(),
            location: String::new(),
            description: String::new(),
            extension_id: String::new(),
            extension_name: String::new(),
            is_enterprise_printer: false,
            provisional_type: ProvisionalType::None,
            printer_status_reason: None,
            capabilities: None,
        }
    }

    /// Build a destination from an enumeration record.
    ///
    /// Local printers on ChromeOS carry the `chrome_os` origin.
    pub fn from_descriptor(
        descriptor: &PrinterDescriptor,
        printer_type: PrinterType,
        chrome_os: bool,
    ) -> Self {
        let origin = match printer_type {
            PrinterType::Extension => DestinationOrigin::Extension,
            PrinterType::Local if chrome_os => DestinationOrigin::ChromeOs,
            _ => DestinationOrigin::Local,
        };
        let display_name = if descriptor.printer_name.is_empty() {
            descriptor.device_name.clone()
        } else {
            descriptor.printer_name.clone()
        };

        let mut destination = Self::new(descriptor.device_name.clone(), origin, display_name);
        destination.location = descriptor.location.clone().unwrap_or_default();
        destination.description = descriptor.printer_description.clone().unwrap_or_default();
        destination.extension_id = descriptor.extension_id.clone().unwrap_or_default();
        destination.extension_name = descriptor.extension_name.clone().unwrap_or_default();
        destination.is_enterprise_printer = descriptor.is_enterprise_printer;
        if descriptor.provisional {
            destination.provisional_type = ProvisionalType::NeedsUsbPermission;
        }
        destination.printer_status_reason = descriptor
            .printer_status
            .as_ref()
            .map(get_status_reason_from_printer_status);
        destination
    }

    pub fn with_capabilities(mut self, capabilities: Cdd) -> Self {
        self.capabilities = Some(Arc::new(capabilities));
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_extension(
        mut self,
        extension_id: impl Into<String>,
        extension_name: impl Into<String>,
    ) -> Self {
        self.extension_id = extension_id.into();
        self.extension_name = extension_name.into();
        self
    }

    pub fn with_provisional_type(mut self, provisional_type: ProvisionalType) -> Self {
        self.provisional_type = provisional_type;
        self
    }

    pub fn with_enterprise(mut self, is_enterprise_printer: bool) -> Self {
        self.is_enterprise_printer = is_enterprise_printer;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> DestinationOrigin {
        self.origin
    }

    /// `"{id}/{origin}/"`, unique within a store.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn printer_type(&self) -> PrinterType {
        self.printer_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }

    pub fn is_enterprise_printer(&self) -> bool {
        self.is_enterprise_printer
    }

    pub fn is_extension(&self) -> bool {
        self.origin == DestinationOrigin::Extension
    }

    pub fn provisional_type(&self) -> ProvisionalType {
        self.provisional_type
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional_type != ProvisionalType::None
    }

    pub fn printer_status_reason(&self) -> Option<PrinterStatusReason> {
        self.printer_status_reason
    }

    pub fn set_printer_status_reason(&mut self, reason: Option<PrinterStatusReason>) {
        self.printer_status_reason = reason;
    }

    pub fn printer_state(&self) -> PrinterState {
        compute_printer_state(self.printer_status_reason)
    }

    pub fn icon(&self) -> String {
        printer_status_icon(self.printer_state(), self.is_enterprise_printer)
    }

    pub fn capabilities(&self) -> Option<&Arc<Cdd>> {
        self.capabilities.as_ref()
    }

    /// Replace the capability document wholesale.
    pub fn set_capabilities(&mut self, capabilities: Option<Arc<Cdd>>) {
        self.capabilities = capabilities;
    }

    fn printer_caps(&self) -> Option<&CddCapabilities> {
        self.capabilities.as_ref().and_then(|cdd| cdd.printer.as_ref())
    }

    /// True when the printer can switch between color and monochrome.
    pub fn has_color_capability(&self) -> bool {
        let Some(color) = self.printer_caps().and_then(|caps| caps.color.as_ref()) else {
            return false;
        };
        let has_type = |types: &[&str]| {
            color
                .option
                .iter()
                .any(|o| o.r#type.as_deref().is_some_and(|t| types.contains(&t)))
        };
        has_type(&COLOR_TYPES) && has_type(&MONOCHROME_TYPES)
    }

    pub fn has_copies_capability(&self) -> bool {
        match self.printer_caps().and_then(|caps| caps.copies.as_ref()) {
            None => false,
            Some(copies) => copies.max.is_none_or(|max| max > 1),
        }
    }

    /// Whether the printer accepts a PIN with the job.
    pub fn has_pin_setting(&self) -> bool {
        self.printer_caps()
            .and_then(|caps| caps.pin.as_ref())
            .and_then(|pin| pin.supported)
            .unwrap_or(false)
    }

    /// The color option that implements `is_color`, preferring standard
    /// types over custom ones.
    pub fn get_color(&self, is_color: bool) -> Option<&ColorOption> {
        let color = self.printer_caps()?.color.as_ref()?;
        let types = if is_color { &COLOR_TYPES } else { &MONOCHROME_TYPES };
        types.iter().find_map(|wanted| {
            color
                .option
                .iter()
                .find(|o| o.r#type.as_deref() == Some(*wanted))
        })
    }

    pub fn default_color_option(&self) -> Option<&ColorOption> {
        self.printer_caps()?
            .color
            .as_ref()?
            .option
            .iter()
            .find(|o| o.is_default.unwrap_or(false))
    }

    /// Native color model for the ticket.
    pub fn get_native_color_model(&self, is_color: bool) -> i32 {
        let fallback = if is_color {
            NATIVE_COLOR_MODEL_COLOR
        } else {
            NATIVE_COLOR_MODEL_GRAY
        };
        let has_options = self
            .printer_caps()
            .and_then(|caps| caps.color.as_ref())
            .is_some_and(|color| !color.option.is_empty());
        if !has_options {
            return fallback;
        }
        self.get_color(is_color)
            .and_then(|option| option.vendor_id.as_deref())
            .and_then(|vendor_id| vendor_id.trim().parse::<i32>().ok())
            .unwrap_or(fallback)
    }

    pub fn supports_duplex(&self, duplex_type: DuplexType) -> bool {
        self.printer_caps()
            .and_then(|caps| caps.duplex.as_ref())
            .is_some_and(|duplex| duplex.option.iter().any(|o| o.r#type == duplex_type))
    }

    pub fn get_dpi(&self, horizontal_dpi: u32, vertical_dpi: u32) -> Option<&DpiOption> {
        self.printer_caps()?
            .dpi
            .as_ref()?
            .option
            .iter()
            .find(|o| o.horizontal_dpi == horizontal_dpi && o.vertical_dpi == vertical_dpi)
    }

    pub fn get_media_size(&self, width_microns: i64, height_microns: i64) -> Option<&MediaSizeOption> {
        self.printer_caps()?
            .media_size
            .as_ref()?
            .option
            .iter()
            .find(|o| o.width_microns == width_microns && o.height_microns == height_microns)
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Destination {}

/// Persisted form of a recently used destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDestination {
    pub id: String,
    pub origin: DestinationOrigin,
    #[serde(default)]
    pub capabilities: Option<Cdd>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub extension_id: String,
    #[serde(default)]
    pub extension_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

impl RecentDestination {
    pub fn key(&self) -> String {
        create_destination_key(&self.id, self.origin)
    }

    pub fn printer_type(&self) -> PrinterType {
        printer_type_for(&self.id, self.origin)
    }
}

pub fn make_recent_destination(destination: &Destination) -> RecentDestination {
    RecentDestination {
        id: destination.id.clone(),
        origin: destination.origin,
        capabilities: destination.capabilities.as_deref().cloned(),
        display_name: destination.display_name.clone(),
        extension_id: destination.extension_id.clone(),
        extension_name: destination.extension_name.clone(),
        icon: destination.icon(),
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
