//! Raw printer status types reported by the native layer.

use serde::{Deserialize, Serialize};

/// Reason codes a printer can report, in native enum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrinterStatusReason {
    UnknownReason,
    DeviceError,
    DoorOpen,
    LowOnInk,
    LowOnPaper,
    NoError,
    OutOfInk,
    OutOfPaper,
    OutputAlmostFull,
    OutputFull,
    PaperJam,
    Paused,
    PrinterQueueFull,
    PrinterUnreachable,
    Stopped,
    TrayMissing,
    ExpiredCertificate,
}

/// Severity attached to a status reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrinterStatusSeverity {
    UnknownSeverity,
    Report,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReasonEntry {
    pub reason: PrinterStatusReason,
    pub severity: PrinterStatusSeverity,
}

impl StatusReasonEntry {
    pub fn new(reason: PrinterStatusReason, severity: PrinterStatusSeverity) -> Self {
        Self { reason, severity }
    }
}

/// Status snapshot for one printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStatus {
    #[serde(default)]
    pub printer_id: String,

    #[serde(default)]
    pub status_reasons: Vec<StatusReasonEntry>,

    #[serde(default)]
    pub timestamp: f64,
}

/// Coarse health of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    Good,
    Error,
    Unknown,
}

impl std::fmt::Display for PrinterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrinterState::Good => write!(f, "good"),
            PrinterState::Error => write!(f, "error"),
            PrinterState::Unknown => write!(f, "unknown"),
        }
    }
}
