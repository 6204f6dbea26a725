//! Integration tests for a process-wide factory declared with `define_factory!`.
//!
//! NOTE: All tests use #[serial] because they share the same static factory (SHAPES).

use keyed_factory::{creator, define_factory, FactoryError};
use serial_test::serial;

pub trait Shape: Send {
    fn name(&self) -> &'static str;
    fn corners(&self) -> u32;
}

struct Square;
impl Shape for Square {
    fn name(&self) -> &'static str {
        "square"
    }
    fn corners(&self) -> u32 {
        4
    }
}

struct Circle;
impl Shape for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }
    fn corners(&self) -> u32 {
        0
    }
}

fn make_a() -> Box<dyn Shape> {
    Box::new(Square)
}

fn make_b() -> Box<dyn Shape> {
    Box::new(Circle)
}

define_factory!(shapes, dyn Shape);

fn key(s: &str) -> String {
    s.to_string()
}

#[test]
#[serial]
fn test_register_create_and_erase() {
    shapes::instance().clear();

    shapes::insert(key("a"), creator(make_a));
    shapes::insert(key("b"), creator(make_b));
    assert_eq!(shapes::keys(), ["a", "b"]);

    let a = shapes::create(&key("a"), ()).expect("a is registered");
    assert_eq!(a.name(), "square");
    assert_eq!(a.corners(), 4);

    assert!(shapes::create(&key("c"), ()).is_none());

    shapes::erase(&key("a"));
    assert_eq!(shapes::keys(), ["b"]);

    let missing = shapes::creator(&key("a")).err();
    assert_eq!(
        missing,
        Some(FactoryError::NotFound {
            key: "\"a\"".to_string()
        })
    );
    assert_eq!(
        missing.unwrap().to_string(),
        "factory for key <\"a\"> is missing"
    );

    shapes::instance().clear();
}

#[test]
#[serial]
fn test_reinsert_replaces_creator_and_moves_key() {
    shapes::instance().clear();

    shapes::insert(key("a"), creator(make_a));
    shapes::insert(key("b"), creator(make_b));
    shapes::insert(key("a"), creator(make_b));

    assert!(shapes::exists(&key("a")));
    assert_eq!(shapes::keys(), ["b", "a"]);
    assert_eq!(shapes::instance().call(&key("a")).unwrap().name(), "circle");

    shapes::instance().clear();
}

#[test]
#[serial]
fn test_creator_copy_outlives_registration() {
    shapes::instance().clear();

    shapes::insert(key("a"), creator(make_a));
    let make = shapes::creator(&key("a")).unwrap();
    shapes::erase(&key("a"));

    assert!(!shapes::exists(&key("a")));
    assert_eq!(make().name(), "square");
}

#[test]
#[serial]
fn test_shared_across_threads() {
    shapes::instance().clear();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                shapes::insert(format!("t{i}"), creator(make_a));
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let mut keys = shapes::keys();
    keys.sort();
    assert_eq!(keys, ["t0", "t1", "t2", "t3"]);

    shapes::instance().clear();
}
