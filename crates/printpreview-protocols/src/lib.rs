//! # PrintPreview Protocols
//!
//! Boundary definitions for the print preview engine.
//! Contains only interface and wire types - no implementations.
//!
//! ## Core Items
//!
//! - [`PrinterService`] - Async stand-in for the browser-side printing RPC
//! - [`Cdd`] - Cloud Device Description capability document
//! - [`PrinterDescriptor`] - Printer record returned by enumeration
//! - [`PrinterStatus`] - Raw printer status reported by the native layer
//! - [`Policies`] - Typed enterprise printing policies

pub mod cdd;
pub mod error;
pub mod policy;
pub mod printer;
pub mod service;
pub mod status;

pub use cdd::{
    Cdd, CddCapabilities, CddOption, CollateCapability, ColorOption, CopiesCapability, DpiOption,
    DuplexOption, DuplexType, MediaSizeOption, OptionsCapability, PageOrientationOption,
    PinCapability, SelectCapability, SelectOption, ValueCapability, VendorCapability,
    VendorCapabilityType,
};
pub use error::{PolicyError, ServiceError};
pub use policy::{
    BackgroundGraphicsModeRestriction, ColorModeRestriction, DuplexModeRestriction,
    MediaSizePolicy, PinModeRestriction, Policies, Policy,
};
pub use printer::{
    CapabilitiesResponse, DestinationOrigin, PrinterDescriptor, PrinterType, ProvisionalType,
};
pub use service::PrinterService;
pub use status::{
    PrinterState, PrinterStatus, PrinterStatusReason, PrinterStatusSeverity, StatusReasonEntry,
};
