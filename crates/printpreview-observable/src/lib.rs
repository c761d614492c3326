//! # PrintPreview Observable
//!
//! Deep change notification for a nested record.
//!
//! An [`Observable`] owns a `serde_json::Value` and a parallel tree of
//! observers keyed by dotted path. Every write through [`Observable::set`]
//! or a [`Proxy`] computes the dotted path of the written property and
//! notifies, synchronously and in a fixed order:
//!
//! 1. wildcard observers (`"a.*"`) on nodes strictly above the written path,
//!    root first, with the raw change;
//! 2. every observer on the written node and in its subtree, each receiving
//!    the new and previous values narrowed to its own path.
//!
//! ```
//! use printpreview_observable::{Notification, Observable};
//! use serde_json::json;
//!
//! let observable = Observable::new(json!({"margins": {"value": 0}}));
//! let id = observable.add_observer("margins.value", |n| {
//!     if let Notification::Value { value, .. } = n {
//!         assert_eq!(value, &json!(3));
//!     }
//! });
//! observable.set("margins.value", json!(3)).unwrap();
//! observable.remove_observer(id);
//! ```

mod error;
mod observable;
mod path;
mod proxy;

pub use error::ObservableError;
pub use observable::{Notification, Observable, ObserverId};
pub use path::{join_path, split_path, value_at};
pub use proxy::Proxy;
