use super::*;
use serde_json::json;

type Log = Arc<Mutex<Vec<(String, String, Value)>>>;

fn recorder(log: &Log, tag: &str) -> impl Fn(Notification<'_>) + Send + Sync + 'static {
    let log = log.clone();
    let tag = tag.to_string();
    move |n| {
        log.lock()
            .push((tag.clone(), n.path().to_string(), n.value().clone()));
    }
}

fn sample() -> Observable {
    Observable::new(json!({
        "a": {"b": {"c": 1, "d": 2}},
        "margins": {"value": 0, "available": true},
        "pages": [1, 2, 3]
    }))
}

#[test]
fn test_get_nested_values() {
    let observable = sample();
    assert_eq!(observable.get("a.b.c"), Some(json!(1)));
    assert_eq!(observable.get("pages.2"), Some(json!(3)));
    assert_eq!(observable.get("missing"), None);
}

#[test]
fn test_exact_observer_receives_new_and_previous() {
    let observable = sample();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    observable.add_observer("margins.value", move |n| {
        if let Notification::Value { value, previous, path } = n {
            sink.lock().push((path.to_string(), value.clone(), previous.clone()));
        }
    });

    assert!(observable.set("margins.value", json!(3)).unwrap());
    assert_eq!(
        *seen.lock(),
        vec![("margins.value".to_string(), json!(3), json!(0))]
    );
}

#[test]
fn test_equal_write_is_silent() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("margins.value", recorder(&log, "exact"));
    observable.add_observer("*", recorder(&log, "root"));

    assert!(!observable.set("margins.value", json!(0)).unwrap());
    assert!(log.lock().is_empty());
}

#[test]
fn test_sibling_write_does_not_notify() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("margins.value", recorder(&log, "exact"));

    observable.set("margins.available", json!(false)).unwrap();
    assert!(log.lock().is_empty());
}

#[test]
fn test_notification_order_wildcards_then_subtree() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("a.b.c", recorder(&log, "c"));
    observable.add_observer("a.*", recorder(&log, "a-star"));
    observable.add_observer("a.b", recorder(&log, "b"));
    observable.add_observer("*", recorder(&log, "root-star"));

    observable.set("a.b", json!({"c": 5, "d": 2})).unwrap();

    let tags: Vec<String> = log.lock().iter().map(|(t, _, _)| t.clone()).collect();
    assert_eq!(tags, vec!["root-star", "a-star", "b", "c"]);

    let entries = log.lock().clone();
    assert_eq!(entries[0].1, "a.b");
    assert_eq!(entries[1].1, "a.b");
    assert_eq!(entries[3], ("c".to_string(), "a.b.c".to_string(), json!(5)));
}

#[test]
fn test_ancestor_write_narrows_values() {
    let observable = sample();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    observable.add_observer("a.b.d", move |n| {
        if let Notification::Value { value, previous, .. } = n {
            sink.lock().push((value.clone(), previous.clone()));
        }
    });

    observable.set("a", json!({"x": 1})).unwrap();
    assert_eq!(*seen.lock(), vec![(Value::Null, json!(2))]);
}

#[test]
fn test_write_below_exact_observer_does_not_reach_it() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("a.b", recorder(&log, "exact"));
    observable.add_observer("a.b.*", recorder(&log, "wild"));

    observable.set("a.b.c", json!(9)).unwrap();

    let entries = log.lock().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], ("wild".to_string(), "a.b.c".to_string(), json!(9)));
}

#[test]
fn test_same_node_observers_fire_in_registration_order() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("margins.value", recorder(&log, "first"));
    observable.add_observer("margins.value", recorder(&log, "second"));
    observable.add_observer("margins.value", recorder(&log, "third"));

    observable.set("margins.value", json!(1)).unwrap();
    let tags: Vec<String> = log.lock().iter().map(|(t, _, _)| t.clone()).collect();
    assert_eq!(tags, vec!["first", "second", "third"]);
}

#[test]
fn test_missing_parent_is_error() {
    let observable = sample();
    let result = observable.set("nope.value", json!(1));
    assert_eq!(
        result,
        Err(ObservableError::PathNotFound("nope".to_string()))
    );
}

#[test]
fn test_scalar_parent_is_error() {
    let observable = sample();
    let result = observable.set("margins.value.inner", json!(1));
    assert!(matches!(result, Err(ObservableError::NotAContainer(_))));
}

#[test]
fn test_array_writes() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("pages.*", recorder(&log, "pages"));

    observable.set("pages.0", json!(7)).unwrap();
    observable.set("pages.3", json!(4)).unwrap();
    assert_eq!(observable.get("pages"), Some(json!([7, 2, 3, 4])));
    assert_eq!(log.lock().len(), 2);

    let result = observable.set("pages.9", json!(1));
    assert!(matches!(result, Err(ObservableError::InvalidIndex { .. })));
}

#[test]
fn test_new_key_on_existing_object() {
    let observable = sample();
    assert!(observable.set("margins.extra", json!("x")).unwrap());
    assert_eq!(observable.get("margins.extra"), Some(json!("x")));
}

#[test]
fn test_remove_observer() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let id = observable.add_observer("margins.value", recorder(&log, "exact"));

    assert!(observable.remove_observer(id));
    assert!(!observable.remove_observer(id));
    observable.set("margins.value", json!(2)).unwrap();
    assert!(log.lock().is_empty());
    assert_eq!(observable.observer_count(), 0);
}

#[test]
fn test_remove_observers_under() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("a.b.c", recorder(&log, "c"));
    observable.add_observer("a.*", recorder(&log, "a"));
    observable.add_observer("margins.value", recorder(&log, "m"));

    observable.remove_observers_under("a");
    assert_eq!(observable.observer_count(), 1);

    observable.set("a.b.c", json!(3)).unwrap();
    observable.set("margins.value", json!(3)).unwrap();
    let tags: Vec<String> = log.lock().iter().map(|(t, _, _)| t.clone()).collect();
    assert_eq!(tags, vec!["m"]);
}

#[test]
fn test_remove_all_observers() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("*", recorder(&log, "root"));
    observable.add_observer("a.b", recorder(&log, "b"));

    observable.remove_all_observers();
    observable.set("a.b.c", json!(3)).unwrap();
    assert!(log.lock().is_empty());
}

#[test]
fn test_observer_may_write_back() {
    let observable = sample();
    let handle = observable.clone();
    observable.add_observer("margins.value", move |n| {
        let enabled = n.value() == &json!(0);
        handle
            .set("margins.available", Value::Bool(enabled))
            .unwrap();
    });

    observable.set("margins.value", json!(2)).unwrap();
    assert_eq!(observable.get("margins.available"), Some(json!(false)));
}

#[test]
fn test_removal_during_dispatch_keeps_current_pass() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(None));

    let handle = observable.clone();
    let second_id = second.clone();
    observable.add_observer("margins.value", move |_| {
        if let Some(id) = *second_id.lock() {
            handle.remove_observer(id);
        }
    });
    let id = observable.add_observer("margins.value", recorder(&log, "second"));
    *second.lock() = Some(id);

    observable.set("margins.value", json!(1)).unwrap();
    assert_eq!(log.lock().len(), 1);

    observable.set("margins.value", json!(2)).unwrap();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_proxy_identity_and_write_through() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("margins.value", recorder(&log, "exact"));

    let root = observable.proxy();
    let margins = root.child("margins").unwrap();
    let again = observable.proxy_for("margins").unwrap();
    assert!(Proxy::ptr_eq(&margins, &again));
    assert!(!Proxy::ptr_eq(&margins, &root));
    assert_eq!(margins.path(), "margins");

    margins.set("value", json!(3)).unwrap();
    assert_eq!(margins.get("value"), Some(json!(3)));
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_proxy_for_scalar_is_none() {
    let observable = sample();
    assert!(observable.proxy_for("margins.value").is_none());
    assert!(observable.proxy().child("missing").is_none());
}

#[test]
fn test_root_replacement() {
    let observable = sample();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    observable.add_observer("margins.value", recorder(&log, "exact"));

    observable.set("", json!({"margins": {"value": 4}})).unwrap();
    assert_eq!(
        log.lock().clone(),
        vec![("exact".to_string(), "margins.value".to_string(), json!(4))]
    );
}
