//! Printer service backed by a JSON fixture file.
//!
//! The fixture is an object with a `printers` array. Each entry is a
//! printer descriptor plus its source `type` and an optional CDD:
//!
//! ```json
//! {"printers": [{"type": 2, "deviceName": "office", "printerName": "Office",
//!                "capabilities": {"version": "1.0", "printer": {}}}]}
//! ```
//!
//! Capabilities for the virtual PDF printer are built in unless the fixture
//! lists a PDF entry of its own.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use printpreview_protocols::{
    CapabilitiesResponse, Cdd, PrinterDescriptor, PrinterService, PrinterType, ServiceError,
};

/// Capabilities of the "Save as PDF" destination.
const PDF_CAPABILITIES: &str = r#"{
    "version": "1.0",
    "printer": {
        "color": {"option": [{"type": "STANDARD_COLOR", "is_default": true}]},
        "page_orientation": {"option": [
            {"type": "PORTRAIT", "is_default": true},
            {"type": "LANDSCAPE"},
            {"type": "AUTO"}
        ]},
        "media_size": {"option": [
            {"name": "NA_LETTER", "width_microns": 215900, "height_microns": 279400,
             "is_default": true},
            {"name": "NA_LEGAL", "width_microns": 215900, "height_microns": 355600},
            {"name": "ISO_A4", "width_microns": 210000, "height_microns": 297000},
            {"name": "ISO_A3", "width_microns": 297000, "height_microns": 420000}
        ]},
        "dpi": {"option": [{"horizontal_dpi": 300, "vertical_dpi": 300, "is_default": true}]}
    }
}"#;

#[derive(Debug, Clone, Deserialize)]
struct FixturePrinter {
    #[serde(rename = "type")]
    printer_type: PrinterType,

    #[serde(flatten)]
    descriptor: PrinterDescriptor,

    #[serde(default)]
    capabilities: Option<Cdd>,
}

#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    printers: Vec<FixturePrinter>,
}

/// [`PrinterService`] answering from a fixture loaded at startup.
#[derive(Debug)]
pub(crate) struct FixtureService {
    printers: Vec<FixturePrinter>,
    pdf_capabilities: Cdd,
}

impl FixtureService {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read printer fixture {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid printer fixture {}", path.display()))
    }

    pub(crate) fn from_json(content: &str) -> anyhow::Result<Self> {
        let fixture: Fixture = serde_json::from_str(content)?;
        debug!("Loaded {} fixture printers", fixture.printers.len());
        Ok(Self {
            printers: fixture.printers,
            pdf_capabilities: serde_json::from_str(PDF_CAPABILITIES)?,
        })
    }

    fn find(&self, device_name: &str, printer_type: PrinterType) -> Option<&FixturePrinter> {
        self.printers
            .iter()
            .find(|p| p.printer_type == printer_type && p.descriptor.device_name == device_name)
    }
}

#[async_trait]
impl PrinterService for FixtureService {
    async fn list_printers(
        &self,
        printer_type: PrinterType,
    ) -> Result<Vec<PrinterDescriptor>, ServiceError> {
        Ok(self
            .printers
            .iter()
            .filter(|p| p.printer_type == printer_type)
            .map(|p| p.descriptor.clone())
            .collect())
    }

    async fn get_capabilities(
        &self,
        destination_id: &str,
        printer_type: PrinterType,
    ) -> Result<CapabilitiesResponse, ServiceError> {
        let Some(printer) = self.find(destination_id, printer_type) else {
            if printer_type == PrinterType::Pdf {
                return Ok(CapabilitiesResponse {
                    printer: None,
                    capabilities: Some(self.pdf_capabilities.clone()),
                });
            }
            return Err(ServiceError::NotFound(destination_id.to_string()));
        };
        let capabilities = printer
            .capabilities
            .clone()
            .ok_or_else(|| ServiceError::CapabilitiesUnavailable(destination_id.to_string()))?;
        Ok(CapabilitiesResponse {
            printer: Some(printer.descriptor.clone()),
            capabilities: Some(capabilities),
        })
    }

    async fn grant_extension_printer_access(
        &self,
        provisional_id: &str,
    ) -> Result<PrinterDescriptor, ServiceError> {
        let printer = self
            .find(provisional_id, PrinterType::Extension)
            .ok_or_else(|| ServiceError::NotFound(provisional_id.to_string()))?;
        Ok(PrinterDescriptor {
            provisional: false,
            ..printer.descriptor.clone()
        })
    }
}
