//! Cloud Device Description (CDD) capability document.
//!
//! A CDD describes what a printer can do: color modes, duplex modes, media
//! sizes, resolutions, orientation and vendor specific options. Field names
//! follow the wire format, so documents round-trip through `serde_json`.

use serde::{Deserialize, Serialize};

/// Top level capability document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cdd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer: Option<CddCapabilities>,
}

impl Cdd {
    /// Wrap printer capabilities in a version 1.0 document.
    pub fn with_printer(printer: CddCapabilities) -> Self {
        Self {
            version: Some("1.0".to_string()),
            printer: Some(printer),
        }
    }
}

/// Printer section of a CDD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CddCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collate: Option<CollateCapability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<OptionsCapability<ColorOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies: Option<CopiesCapability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplex: Option<OptionsCapability<DuplexOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_orientation: Option<OptionsCapability<PageOrientationOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_size: Option<OptionsCapability<MediaSizeOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<OptionsCapability<DpiOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_capability: Option<Vec<VendorCapability>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<PinCapability>,
}

/// Capability expressed as a list of options.
///
/// `reset_to_default` is set by extension printers that want the default
/// option applied every time the printer is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct OptionsCapability<T> {
    #[serde(default)]
    pub option: Vec<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_to_default: Option<bool>,
}

impl<T> Default for OptionsCapability<T> {
    fn default() -> Self {
        Self {
            option: Vec::new(),
            reset_to_default: None,
        }
    }
}

impl<T: CddOption> OptionsCapability<T> {
    pub fn new(option: Vec<T>) -> Self {
        Self {
            option,
            reset_to_default: None,
        }
    }

    /// The option flagged `is_default`, if any.
    pub fn default_option(&self) -> Option<&T> {
        self.option.iter().find(|o| o.is_default())
    }

    /// The default option, or the first option when none is flagged.
    pub fn default_or_first(&self) -> Option<&T> {
        self.default_option().or_else(|| self.option.first())
    }

    /// The default option when `reset_to_default` is set.
    pub fn reset_value(&self) -> Option<&T> {
        if !self.reset_to_default.unwrap_or(false) {
            return None;
        }
        self.default_option()
    }
}

/// Common behaviour of capability options.
pub trait CddOption {
    fn is_default(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollateCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopiesCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorOption {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl ColorOption {
    pub fn of_type(color_type: &str) -> Self {
        Self {
            r#type: Some(color_type.to_string()),
            ..Self::default()
        }
    }

    /// Whether this option selects monochrome output.
    pub fn is_monochrome(&self) -> bool {
        matches!(
            self.r#type.as_deref(),
            Some("STANDARD_MONOCHROME") | Some("CUSTOM_MONOCHROME")
        )
    }
}

impl CddOption for ColorOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

/// Duplex mode names as they appear in CDDs and cloud job tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplexType {
    NoDuplex,
    LongEdge,
    ShortEdge,
}

impl DuplexType {
    pub fn is_two_sided(&self) -> bool {
        matches!(self, DuplexType::LongEdge | DuplexType::ShortEdge)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplexOption {
    #[serde(rename = "type")]
    pub r#type: DuplexType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl DuplexOption {
    pub fn new(duplex_type: DuplexType) -> Self {
        Self {
            r#type: duplex_type,
            is_default: None,
        }
    }
}

impl CddOption for DuplexOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageOrientationOption {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl CddOption for PageOrientationOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSizeOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub width_microns: i64,

    pub height_microns: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageable_area_left_microns: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageable_area_bottom_microns: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageable_area_right_microns: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageable_area_top_microns: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_continuous_feed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl MediaSizeOption {
    pub fn new(name: &str, width_microns: i64, height_microns: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            width_microns,
            height_microns,
            ..Self::default()
        }
    }
}

impl CddOption for MediaSizeOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DpiOption {
    pub horizontal_dpi: u32,

    pub vertical_dpi: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl DpiOption {
    pub fn new(horizontal_dpi: u32, vertical_dpi: u32) -> Self {
        Self {
            horizontal_dpi,
            vertical_dpi,
            ..Self::default()
        }
    }
}

impl CddOption for DpiOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorCapabilityType {
    Select,
    Range,
    TypedValue,
}

/// Vendor specific capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCapability {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "type")]
    pub r#type: VendorCapabilityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_cap: Option<SelectCapability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_cap: Option<ValueCapability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typed_value_cap: Option<ValueCapability>,
}

impl VendorCapability {
    /// The default value declared by this capability, if any.
    pub fn default_value(&self) -> Option<&str> {
        match self.r#type {
            VendorCapabilityType::Select => self
                .select_cap
                .as_ref()
                .and_then(|cap| cap.option.iter().find(|o| o.is_default()))
                .map(|o| o.value.as_str()),
            VendorCapabilityType::Range => self
                .range_cap
                .as_ref()
                .and_then(|cap| cap.default.as_deref())
                .filter(|v| !v.is_empty()),
            VendorCapabilityType::TypedValue => self
                .typed_value_cap
                .as_ref()
                .and_then(|cap| cap.default.as_deref())
                .filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectCapability {
    #[serde(default)]
    pub option: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl CddOption for SelectOption {
    fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }
}

/// Range or typed value capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[cfg(test)]
#[path = "cdd_tests.rs"]
mod tests;
