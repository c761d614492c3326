//! Error types for the print preview protocol layer.

mod policy;
mod service;

pub use policy::*;
pub use service::*;
