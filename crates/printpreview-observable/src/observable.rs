//! Observable record and its observer tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::error::ObservableError;
use crate::path::{join_path, split_path, value_at};
use crate::proxy::{Proxy, ProxyNode};

/// Handle returned by [`Observable::add_observer`].
pub type ObserverId = u64;

/// What an observer callback receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification<'a> {
    /// Exact observer: values narrowed to the observer's own path.
    Value {
        value: &'a Value,
        previous: &'a Value,
        path: &'a str,
    },
    /// Wildcard observer: the full path of the write and the new value.
    Wildcard {
        path: &'a str,
        value: &'a Value,
        base: &'a Value,
    },
}

impl<'a> Notification<'a> {
    pub fn path(&self) -> &'a str {
        match self {
            Notification::Value { path, .. } | Notification::Wildcard { path, .. } => path,
        }
    }

    pub fn value(&self) -> &'a Value {
        match self {
            Notification::Value { value, .. } | Notification::Wildcard { value, .. } => value,
        }
    }
}

type Callback = Arc<dyn Fn(Notification<'_>) + Send + Sync>;

struct Registration {
    callback: Callback,
    wildcard: bool,
}

#[derive(Default)]
struct ObserverNode {
    children: BTreeMap<String, ObserverNode>,
    // Ids grow monotonically, so map order is registration order.
    observers: BTreeMap<ObserverId, Registration>,
}

impl ObserverNode {
    fn find(&self, segments: &[String]) -> Option<&ObserverNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    fn find_mut(&mut self, segments: &[String]) -> Option<&mut ObserverNode> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.children.get_mut(segment))
    }

    fn collect_ids(&self, out: &mut Vec<ObserverId>) {
        out.extend(self.observers.keys().copied());
        for child in self.children.values() {
            child.collect_ids(out);
        }
    }
}

struct State {
    target: Value,
    root: ObserverNode,
    index: HashMap<ObserverId, Vec<String>>,
    next_id: ObserverId,
}

struct Inner {
    state: Mutex<State>,
    proxies: Mutex<HashMap<String, Arc<ProxyNode>>>,
}

enum PendingKind {
    Value,
    Wildcard,
}

struct Pending {
    callback: Callback,
    kind: PendingKind,
    path: String,
    value: Value,
    previous: Value,
}

/// A nested record with path-scoped change notification.
///
/// Cloning an `Observable` yields another handle to the same record.
#[derive(Clone)]
pub struct Observable {
    inner: Arc<Inner>,
}

impl Observable {
    pub fn new(target: Value) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    target,
                    root: ObserverNode::default(),
                    index: HashMap::new(),
                    next_id: 1,
                }),
                proxies: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Snapshot of the whole record.
    pub fn target(&self) -> Value {
        self.inner.state.lock().target.clone()
    }

    /// Read the value at a dotted path.
    pub fn get(&self, path: &str) -> Option<Value> {
        let (segments, _) = split_path(path);
        let state = self.inner.state.lock();
        value_at(&state.target, &segments).cloned()
    }

    /// Borrow the record for the duration of `f`.
    ///
    /// `f` must not call back into this observable.
    pub fn with_target<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        let state = self.inner.state.lock();
        f(&state.target)
    }

    /// Write `value` at a dotted path and notify observers.
    ///
    /// Returns `Ok(false)` without notifying when the stored value already
    /// equals `value`. The parent of the path must exist.
    pub fn set(&self, path: &str, value: Value) -> Result<bool, ObservableError> {
        let (segments, _) = split_path(path);
        let pending = {
            let mut state = self.inner.state.lock();
            let previous = write_at(&mut state.target, &segments, value)?;
            let Some(previous) = previous else {
                return Ok(false);
            };
            let current = value_at(&state.target, &segments)
                .cloned()
                .unwrap_or(Value::Null);
            collect_pending(&state.root, &segments, &current, &previous)
        };

        trace!(path = %path, observers = pending.len(), "Observable write");
        dispatch(pending);
        Ok(true)
    }

    /// Register a callback for `path`. A path ending in `.*` (or `*` alone)
    /// registers a wildcard observer.
    pub fn add_observer<F>(&self, path: &str, callback: F) -> ObserverId
    where
        F: Fn(Notification<'_>) + Send + Sync + 'static,
    {
        let (segments, wildcard) = split_path(path);
        let mut state = self.inner.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let mut node = &mut state.root;
        for segment in &segments {
            node = node.children.entry(segment.clone()).or_default();
        }
        node.observers.insert(
            id,
            Registration {
                callback: Arc::new(callback),
                wildcard,
            },
        );
        state.index.insert(id, segments);
        id
    }

    /// Remove one observer. Returns whether it was registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut state = self.inner.state.lock();
        let Some(segments) = state.index.remove(&id) else {
            return false;
        };
        state
            .root
            .find_mut(&segments)
            .and_then(|node| node.observers.remove(&id))
            .is_some()
    }

    /// Remove every observer.
    pub fn remove_all_observers(&self) {
        let mut state = self.inner.state.lock();
        state.root = ObserverNode::default();
        state.index.clear();
    }

    /// Remove every observer registered at or below `path`.
    pub fn remove_observers_under(&self, path: &str) {
        let (segments, _) = split_path(path);
        let mut state = self.inner.state.lock();
        let mut ids = Vec::new();
        if let Some(node) = state.root.find_mut(&segments) {
            node.collect_ids(&mut ids);
            node.observers.clear();
            node.children.clear();
        }
        for id in ids {
            state.index.remove(&id);
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.state.lock().index.len()
    }

    /// Proxy for the record root.
    pub fn proxy(&self) -> Proxy {
        self.proxy_at(Vec::new())
    }

    /// Proxy for a nested object or array. `None` when the path does not
    /// lead to a container.
    pub fn proxy_for(&self, path: &str) -> Option<Proxy> {
        let (segments, _) = split_path(path);
        let is_container = self.with_target(|target| {
            matches!(
                value_at(target, &segments),
                Some(Value::Object(_)) | Some(Value::Array(_))
            )
        });
        is_container.then(|| self.proxy_at(segments))
    }

    pub(crate) fn proxy_at(&self, segments: Vec<String>) -> Proxy {
        let key = join_path(&segments);
        let node = self
            .inner
            .proxies
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(ProxyNode::new(segments)))
            .clone();
        Proxy::new(self.clone(), node)
    }
}

impl std::fmt::Debug for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Store `value` at `segments`. Returns `Some(previous)` when the stored
/// value changed, `None` when it was already equal.
fn write_at(
    target: &mut Value,
    segments: &[String],
    value: Value,
) -> Result<Option<Value>, ObservableError> {
    let Some((last, parents)) = segments.split_last() else {
        if *target == value {
            return Ok(None);
        }
        return Ok(Some(std::mem::replace(target, value)));
    };

    let mut parent = target;
    for (i, segment) in parents.iter().enumerate() {
        let next = match parent {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|n| items.get_mut(n)),
            _ => None,
        };
        parent = next.ok_or_else(|| ObservableError::PathNotFound(join_path(&parents[..=i])))?;
    }

    match parent {
        Value::Object(map) => {
            if map.get(last) == Some(&value) {
                return Ok(None);
            }
            Ok(Some(map.insert(last.clone(), value).unwrap_or(Value::Null)))
        }
        Value::Array(items) => {
            let index = last
                .parse::<usize>()
                .ok()
                .filter(|i| *i <= items.len())
                .ok_or_else(|| ObservableError::InvalidIndex {
                    path: join_path(parents),
                    index: last.clone(),
                })?;
            if index == items.len() {
                items.push(value);
                return Ok(Some(Value::Null));
            }
            if items[index] == value {
                return Ok(None);
            }
            Ok(Some(std::mem::replace(&mut items[index], value)))
        }
        _ => Err(ObservableError::NotAContainer(join_path(parents))),
    }
}

fn collect_pending(
    root: &ObserverNode,
    segments: &[String],
    current: &Value,
    previous: &Value,
) -> Vec<Pending> {
    let full_path = join_path(segments);
    let mut pending = Vec::new();

    // Wildcards strictly above the written node, root first.
    let mut node = Some(root);
    for depth in 0..segments.len() {
        let Some(n) = node else {
            break;
        };
        for registration in n.observers.values().filter(|r| r.wildcard) {
            pending.push(Pending {
                callback: registration.callback.clone(),
                kind: PendingKind::Wildcard,
                path: full_path.clone(),
                value: current.clone(),
                previous: previous.clone(),
            });
        }
        node = n.children.get(&segments[depth]);
    }

    if let Some(changed) = root.find(segments) {
        let mut relative = Vec::new();
        collect_subtree(changed, segments, &mut relative, current, previous, &mut pending);
    }
    pending
}

fn collect_subtree(
    node: &ObserverNode,
    base: &[String],
    relative: &mut Vec<String>,
    current: &Value,
    previous: &Value,
    pending: &mut Vec<Pending>,
) {
    if !node.observers.is_empty() {
        let path = join_path(&[base, relative.as_slice()].concat());
        let value = value_at(current, relative).cloned().unwrap_or(Value::Null);
        let old = value_at(previous, relative).cloned().unwrap_or(Value::Null);
        for registration in node.observers.values() {
            pending.push(Pending {
                callback: registration.callback.clone(),
                kind: if registration.wildcard {
                    PendingKind::Wildcard
                } else {
                    PendingKind::Value
                },
                path: path.clone(),
                value: value.clone(),
                previous: old.clone(),
            });
        }
    }
    for (key, child) in &node.children {
        relative.push(key.clone());
        collect_subtree(child, base, relative, current, previous, pending);
        relative.pop();
    }
}

fn dispatch(pending: Vec<Pending>) {
    for entry in &pending {
        let notification = match entry.kind {
            PendingKind::Value => Notification::Value {
                value: &entry.value,
                previous: &entry.previous,
                path: &entry.path,
            },
            PendingKind::Wildcard => Notification::Wildcard {
                path: &entry.path,
                value: &entry.value,
                base: &entry.value,
            },
        };
        (entry.callback)(notification);
    }
}

#[cfg(test)]
#[path = "observable_tests.rs"]
mod tests;
