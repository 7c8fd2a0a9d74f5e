//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic machine driven by a frame
//! loop.
//!
//! Key concepts:
//! - One composite region with three leaf states
//! - Transitions requested from the `transition` callback
//! - Context-driven timing (ticks spent in the current phase)
//! - Structure report introspection
//!
//! Run with: cargo run --example traffic_light

use canopy::{composite, leaf, Control, MachineBuilder, State};

struct Intersection {
    ticks_in_phase: u32,
}

canopy::bare_state! {
    struct Controller;
}

#[derive(Default)]
struct Red;

impl State<Intersection> for Red {
    fn enter(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase = 0;
        println!("  light: RED");
    }

    fn update(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase += 1;
    }

    fn transition(&mut self, control: &mut Control<'_>, intersection: &mut Intersection) {
        if intersection.ticks_in_phase >= 4 {
            control.change_to::<Green>();
        }
    }
}

#[derive(Default)]
struct Green;

impl State<Intersection> for Green {
    fn enter(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase = 0;
        println!("  light: GREEN");
    }

    fn update(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase += 1;
    }

    fn transition(&mut self, control: &mut Control<'_>, intersection: &mut Intersection) {
        if intersection.ticks_in_phase >= 3 {
            control.change_to::<Yellow>();
        }
    }
}

#[derive(Default)]
struct Yellow;

impl State<Intersection> for Yellow {
    fn enter(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase = 0;
        println!("  light: YELLOW");
    }

    fn update(&mut self, intersection: &mut Intersection) {
        intersection.ticks_in_phase += 1;
    }

    fn transition(&mut self, control: &mut Control<'_>, intersection: &mut Intersection) {
        if intersection.ticks_in_phase >= 1 {
            control.change_to::<Red>();
        }
    }
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine = MachineBuilder::<Intersection>::new()
        .root(composite(Controller, vec![leaf(Red), leaf(Green), leaf(Yellow)]))
        .build(Intersection { ticks_in_phase: 0 })
        .unwrap();

    println!("\nRunning 16 frames:");
    for _frame in 0..16 {
        machine.update();
    }

    println!("\nStructure at the end of the run:");
    for entry in machine.structure() {
        println!(
            "  {}{} {}",
            "  ".repeat(entry.depth),
            if entry.is_active { "*" } else { "-" },
            entry.name
        );
    }

    println!("\n=== Example Complete ===");
}
