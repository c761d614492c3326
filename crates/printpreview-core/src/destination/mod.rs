//! Print destinations: the entity, the auto-selection rule and the store.

pub mod entity;
mod matcher;
mod store;
mod store_selection;

pub use entity::{
    create_destination_key, is_pdf_printer, make_recent_destination, Destination,
    RecentDestination, NATIVE_COLOR_MODEL_COLOR, NATIVE_COLOR_MODEL_GRAY, SAVE_AS_PDF_ID,
    SAVE_TO_DRIVE_CROS_ID,
};
pub use matcher::{DestinationMatch, MatchRuleError};
pub use store::{
    DestinationErrorType, DestinationStore, DestinationStoreEvent, InitOptions, SearchStatus,
};
