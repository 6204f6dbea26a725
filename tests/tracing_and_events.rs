//! Integration tests for the trace callback.
//!
//! This test demonstrates how to use the tracing callback to monitor factory
//! operations, which is useful for debugging and logging.

use keyed_factory::{creator, FactoryEvent, KeyedFactory};
use std::sync::{Arc, Mutex};

fn recording(factory: &KeyedFactory<i32>) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    factory.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.to_string());
    });
    events
}

#[test]
fn test_basic_tracing() {
    let factory: KeyedFactory<i32> = KeyedFactory::new();
    let events = recording(&factory);

    factory.insert("n".to_string(), creator(|| Box::new(42)));
    let _ = factory.call(&"n".to_string());
    let _ = factory.exists(&"n".to_string());

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert!(captured[0].starts_with("insert"));
    assert!(captured[1].starts_with("create"));
    assert!(captured[2].starts_with("exists"));
}

#[test]
fn test_trace_found_and_not_found() {
    let factory: KeyedFactory<i32> = KeyedFactory::new();
    let events = recording(&factory);

    factory.insert("n".to_string(), creator(|| Box::new(1)));
    let _ = factory.creator(&"n".to_string());
    let _ = factory.creator(&"m".to_string());
    let _ = factory.call(&"m".to_string());

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 4);
    assert_eq!(captured[1], r#"creator { key: "n", found: true }"#);
    assert_eq!(captured[2], r#"creator { key: "m", found: false }"#);
    assert_eq!(captured[3], r#"create { key: "m", found: false }"#);
}

#[test]
fn test_callback_receives_typed_events() {
    let factory: KeyedFactory<i32> = KeyedFactory::new();
    let erased = Arc::new(Mutex::new(Vec::new()));
    let erased_clone = erased.clone();

    factory.set_trace_callback(move |event| {
        if let FactoryEvent::Erase { key, found } = event {
            erased_clone.lock().unwrap().push(((*key).clone(), *found));
        }
    });

    factory.insert("a".to_string(), creator(|| Box::new(1)));
    factory.erase(&"a".to_string());
    factory.erase(&"a".to_string());

    assert_eq!(
        *erased.lock().unwrap(),
        [("a".to_string(), true), ("a".to_string(), false)]
    );
}

#[test]
fn test_clear_event_and_callback_removal() {
    let factory: KeyedFactory<i32> = KeyedFactory::new();
    let events = recording(&factory);

    factory.insert("a".to_string(), creator(|| Box::new(1)));
    factory.insert("b".to_string(), creator(|| Box::new(2)));
    factory.clear();
    factory.clear_trace_callback();
    factory.insert("c".to_string(), creator(|| Box::new(3)));

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[2], "clear { removed: 2 }");
}
