//! Printer identity and enumeration records.

use serde::{Deserialize, Serialize};

use crate::cdd::Cdd;
use crate::status::PrinterStatus;

/// Printer source type, matching the native printing layer's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PrinterType {
    Extension = 0,
    Pdf = 1,
    Local = 2,
}

impl PrinterType {
    pub const ALL: [PrinterType; 3] = [PrinterType::Extension, PrinterType::Pdf, PrinterType::Local];
}

impl From<PrinterType> for u8 {
    fn from(value: PrinterType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for PrinterType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PrinterType::Extension),
            1 => Ok(PrinterType::Pdf),
            2 => Ok(PrinterType::Local),
            other => Err(format!("unknown printer type: {}", other)),
        }
    }
}

impl std::fmt::Display for PrinterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrinterType::Extension => write!(f, "extension"),
            PrinterType::Pdf => write!(f, "pdf"),
            PrinterType::Local => write!(f, "local"),
        }
    }
}

/// Where a destination came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationOrigin {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "cookies")]
    Cookies,
    #[serde(rename = "privet")]
    Privet,
    #[serde(rename = "extension")]
    Extension,
    #[serde(rename = "chrome_os")]
    ChromeOs,
}

impl DestinationOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationOrigin::Local => "local",
            DestinationOrigin::Cookies => "cookies",
            DestinationOrigin::Privet => "privet",
            DestinationOrigin::Extension => "extension",
            DestinationOrigin::ChromeOs => "chrome_os",
        }
    }

    /// Origins of retired cloud printing backends.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DestinationOrigin::Cookies | DestinationOrigin::Privet)
    }
}

impl std::fmt::Display for DestinationOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a destination still needs a permission grant before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisionalType {
    #[default]
    None,
    NeedsUsbPermission,
}

/// Printer record produced by enumeration or an access grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterDescriptor {
    pub device_name: String,

    #[serde(default)]
    pub printer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub is_enterprise_printer: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_name: Option<String>,

    #[serde(default)]
    pub provisional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_status: Option<PrinterStatus>,
}

impl PrinterDescriptor {
    pub fn new(device_name: impl Into<String>, printer_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            printer_name: printer_name.into(),
            ..Self::default()
        }
    }
}

/// Response to a capability fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer: Option<PrinterDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Cdd>,
}
