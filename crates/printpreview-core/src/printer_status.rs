//! Printer status classification.
//!
//! Reduces the list of status reasons a printer reports to a single reason
//! and a three-way health state.

use printpreview_protocols::{
    PrinterState, PrinterStatus, PrinterStatusReason, PrinterStatusSeverity,
};

/// Pick the most relevant reason from a printer status.
///
/// An error beats any warning; among warnings the last one wins. Reports
/// and unknown severities are ignored.
pub fn get_status_reason_from_printer_status(status: &PrinterStatus) -> PrinterStatusReason {
    if status.printer_id.is_empty() {
        return PrinterStatusReason::UnknownReason;
    }

    let mut status_reason = PrinterStatusReason::NoError;
    for entry in &status.status_reasons {
        if !matches!(
            entry.severity,
            PrinterStatusSeverity::Warning | PrinterStatusSeverity::Error
        ) {
            continue;
        }
        if entry.reason == PrinterStatusReason::UnknownReason {
            continue;
        }
        if entry.severity == PrinterStatusSeverity::Error {
            return entry.reason;
        }
        status_reason = entry.reason;
    }
    status_reason
}

pub fn compute_printer_state(reason: Option<PrinterStatusReason>) -> PrinterState {
    match reason {
        None | Some(PrinterStatusReason::UnknownReason) => PrinterState::Unknown,
        Some(PrinterStatusReason::NoError) => PrinterState::Good,
        Some(_) => PrinterState::Error,
    }
}

/// Icon name for a printer in the given state.
pub fn printer_status_icon(state: PrinterState, is_enterprise: bool) -> String {
    let color = match state {
        PrinterState::Good => "green",
        PrinterState::Error => "red",
        PrinterState::Unknown => "grey",
    };
    let prefix = if is_enterprise { "business-" } else { "" };
    format!("print-preview:{}printer-status-{}", prefix, color)
}
