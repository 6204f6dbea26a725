//! Shape factory example for keyed-factory.
//!
//! Demonstrates:
//! - Declaring a process-wide factory with `define_factory!`
//! - Scoped registration with `Registrar`
//! - Creating by key, and the difference between `create()` and `creator()` on a miss
//! - Watching operations through the trace callback
//!
//! Run with: `cargo run --example shape_factory`

use keyed_factory::{creator, define_factory, Creator};

pub trait Shape: Send {
    fn describe(&self) -> String;
}

struct Square(f64);
impl Shape for Square {
    fn describe(&self) -> String {
        format!("square with area {}", self.0 * self.0)
    }
}

struct Circle(f64);
impl Shape for Circle {
    fn describe(&self) -> String {
        format!("circle with area {:.2}", std::f64::consts::PI * self.0 * self.0)
    }
}

define_factory!(shapes, dyn Shape);

fn square() -> Creator<dyn Shape> {
    creator(|| -> Box<dyn Shape> { Box::new(Square(2.0)) })
}

fn circle() -> Creator<dyn Shape> {
    creator(|| -> Box<dyn Shape> { Box::new(Circle(1.0)) })
}

fn main() {
    println!("=== keyed-factory: Shape Factory ===\n");

    // -------------------------------------------------------------------------
    // 1. Trace every operation
    // -------------------------------------------------------------------------
    shapes::set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 2. Register creators
    // -------------------------------------------------------------------------
    println!("1. Registering creators...");

    let _square = shapes::register("square".to_string(), square());
    {
        let _circle = shapes::register("circle".to_string(), circle());
        println!("   Registered keys: {:?}", shapes::keys());

        // ---------------------------------------------------------------------
        // 3. Create by key
        // ---------------------------------------------------------------------
        println!("\n2. Creating shapes...");
        for key in shapes::keys() {
            if let Some(shape) = shapes::create(&key, ()) {
                println!("   {key}: {}", shape.describe());
            }
        }
    }

    // -------------------------------------------------------------------------
    // 4. Registrar dropped, circle is gone
    // -------------------------------------------------------------------------
    println!("\n3. After the circle registrar went out of scope...");
    println!("   Registered keys: {:?}", shapes::keys());

    let missing = "circle".to_string();
    match shapes::create(&missing, ()) {
        Some(_) => println!("   unexpected circle"),
        None => println!("   create(\"circle\") returned nothing"),
    }
    if let Err(err) = shapes::creator(&missing) {
        println!("   creator(\"circle\") failed: {err}");
    }

    shapes::clear_trace_callback();
    println!("\n=== Done ===");
}
