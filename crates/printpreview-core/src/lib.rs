//! # PrintPreview Core
//!
//! The reconciliation engine behind print preview.
//!
//! ## Components
//!
//! - [`DestinationStore`] - Discovers printers and picks the initial destination
//! - [`Destination`] - One print target with capability queries over its CDD
//! - [`DestinationMatch`] - Policy driven auto-selection rule
//! - [`PrintPreviewModel`] - Settings model producing the print ticket
//! - [`PrintWorkflow`] - Preview/print lifecycle state machine
//! - [`printer_status`] - Printer health classification

pub mod destination;
pub mod printer_status;
pub mod settings;
pub mod state;

pub use destination::{
    Destination, DestinationErrorType, DestinationMatch, DestinationStore, DestinationStoreEvent,
    InitOptions, RecentDestination, SearchStatus,
};
pub use settings::{
    DocumentSettings, DuplexMode, Margins, MarginsType, ModelEvent, PrintPreviewModel,
    PrintTicket, ScalingType, Setting, SettingName, Size,
};
pub use state::{PrintError, PrintState, PrintWorkflow};
