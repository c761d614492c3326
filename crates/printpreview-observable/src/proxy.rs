//! Write-through views over nested records.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ObservableError;
use crate::observable::Observable;
use crate::path::join_path;

pub(crate) struct ProxyNode {
    segments: Vec<String>,
}

impl ProxyNode {
    pub(crate) fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

/// A view of one nested object or array inside an [`Observable`].
///
/// Proxies are cached per path: requesting the same path twice returns
/// handles that compare equal under [`Proxy::ptr_eq`]. Writes through a
/// proxy notify exactly like [`Observable::set`] on the full path.
#[derive(Clone)]
pub struct Proxy {
    observable: Observable,
    node: Arc<ProxyNode>,
}

impl Proxy {
    pub(crate) fn new(observable: Observable, node: Arc<ProxyNode>) -> Self {
        Self { observable, node }
    }

    /// Dotted path of this proxy relative to the record root.
    pub fn path(&self) -> String {
        join_path(&self.node.segments)
    }

    /// Current value under this proxy.
    pub fn value(&self) -> Option<Value> {
        self.observable.get(&self.path())
    }

    /// Read one property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.observable.get(&self.child_path(key))
    }

    /// Write one property.
    pub fn set(&self, key: &str, value: Value) -> Result<bool, ObservableError> {
        self.observable.set(&self.child_path(key), value)
    }

    /// Proxy for a nested container property.
    pub fn child(&self, key: &str) -> Option<Proxy> {
        self.observable.proxy_for(&self.child_path(key))
    }

    pub fn ptr_eq(a: &Proxy, b: &Proxy) -> bool {
        Arc::ptr_eq(&a.node, &b.node)
    }

    fn child_path(&self, key: &str) -> String {
        if self.node.segments.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path(), key)
        }
    }
}

impl std::fmt::Debug for Proxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy").field("path", &self.path()).finish()
    }
}
