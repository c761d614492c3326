//! Printer service trait definition.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::printer::{CapabilitiesResponse, PrinterDescriptor, PrinterType};

/// Async boundary to the component that enumerates printers and fetches
/// their capabilities.
///
/// Any transport can implement this (native bindings, HTTP+JSON, a fixture
/// file). Results of `list_printers` are treated as incremental: calling it
/// again for the same type may return printers that are already known.
#[async_trait]
pub trait PrinterService: Send + Sync {
    /// Enumerate the printers of one source type.
    async fn list_printers(
        &self,
        printer_type: PrinterType,
    ) -> Result<Vec<PrinterDescriptor>, ServiceError>;

    /// Fetch the capability document for one printer.
    async fn get_capabilities(
        &self,
        destination_id: &str,
        printer_type: PrinterType,
    ) -> Result<CapabilitiesResponse, ServiceError>;

    /// Ask for access to a provisional extension printer.
    async fn grant_extension_printer_access(
        &self,
        provisional_id: &str,
    ) -> Result<PrinterDescriptor, ServiceError> {
        Err(ServiceError::Unsupported(format!(
            "extension printer access for {}",
            provisional_id
        )))
    }
}
