//! Property-based tests for the transition engine.
//!
//! These tests use proptest to drive a fixed tree through random request
//! sequences and verify the configuration invariants after every tick.

use std::cell::RefCell;
use std::rc::Rc;

use canopy::{
    composite, leaf, orthogonal, Control, Logger, Machine, MachineBuilder, Method, State, StateId,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

canopy::bare_state! {
    struct R0;
    struct P0;
    struct A1;
    struct A2;
    struct O0;
    struct QA;
    struct X1;
    struct X2;
    struct Y;
    struct Z;
}

/// `R0[ P0[A1, A2], O0{ QA[X1, X2], Y }, Z ]`: a composite root holding a
/// nested composite, an orthogonal region with a composite inside, and a
/// plain leaf.
fn build() -> Machine<()> {
    MachineBuilder::<()>::new()
        .root(composite(
            R0,
            vec![
                composite(P0, vec![leaf(A1), leaf(A2)]),
                orthogonal(O0, vec![composite(QA, vec![leaf(X1), leaf(X2)]), leaf(Y)]),
                leaf(Z),
            ],
        ))
        .build(())
        .unwrap()
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Change(u8),
    Resume(u8),
    Schedule(u8),
    ScheduleThenChange(u8, u8),
}

fn change_to(machine: &mut Machine<()>, target: u8) {
    match target % 10 {
        0 => machine.change_to::<R0>(),
        1 => machine.change_to::<P0>(),
        2 => machine.change_to::<A1>(),
        3 => machine.change_to::<A2>(),
        4 => machine.change_to::<O0>(),
        5 => machine.change_to::<QA>(),
        6 => machine.change_to::<X1>(),
        7 => machine.change_to::<X2>(),
        8 => machine.change_to::<Y>(),
        _ => machine.change_to::<Z>(),
    }
}

fn resume(machine: &mut Machine<()>, target: u8) {
    match target % 10 {
        0 => machine.resume::<R0>(),
        1 => machine.resume::<P0>(),
        2 => machine.resume::<A1>(),
        3 => machine.resume::<A2>(),
        4 => machine.resume::<O0>(),
        5 => machine.resume::<QA>(),
        6 => machine.resume::<X1>(),
        7 => machine.resume::<X2>(),
        8 => machine.resume::<Y>(),
        _ => machine.resume::<Z>(),
    }
}

fn schedule(machine: &mut Machine<()>, target: u8) {
    match target % 10 {
        0 => machine.schedule::<R0>(),
        1 => machine.schedule::<P0>(),
        2 => machine.schedule::<A1>(),
        3 => machine.schedule::<A2>(),
        4 => machine.schedule::<O0>(),
        5 => machine.schedule::<QA>(),
        6 => machine.schedule::<X1>(),
        7 => machine.schedule::<X2>(),
        8 => machine.schedule::<Y>(),
        _ => machine.schedule::<Z>(),
    }
}

/// Every op ends with a tick, so invariants can be checked at every apply
/// point.
fn apply(machine: &mut Machine<()>, op: Op) {
    match op {
        Op::Change(target) => change_to(machine, target),
        Op::Resume(target) => resume(machine, target),
        Op::Schedule(target) => schedule(machine, target),
        Op::ScheduleThenChange(first, second) => {
            schedule(machine, first);
            change_to(machine, second);
        }
    }
    machine.update();
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..10).prop_map(Op::Change),
        (0u8..10).prop_map(Op::Resume),
        (0u8..10).prop_map(Op::Schedule),
        ((0u8..10), (0u8..10)).prop_map(|(first, second)| Op::ScheduleThenChange(first, second)),
    ]
}

fn check_invariants(machine: &Machine<()>) -> Result<(), TestCaseError> {
    let p0 = machine.is_active::<P0>();
    let a1 = machine.is_active::<A1>();
    let a2 = machine.is_active::<A2>();
    let o0 = machine.is_active::<O0>();
    let qa = machine.is_active::<QA>();
    let x1 = machine.is_active::<X1>();
    let x2 = machine.is_active::<X2>();
    let y = machine.is_active::<Y>();
    let z = machine.is_active::<Z>();

    // The root is always active and selects exactly one prong.
    prop_assert!(machine.is_active::<R0>());
    prop_assert_eq!([p0, o0, z].iter().filter(|on| **on).count(), 1);

    // Exclusivity within each composite.
    prop_assert!(!(a1 && a2));
    prop_assert!(!(x1 && x2));

    // A child is active iff its region is, and composites always have a
    // selection while active.
    prop_assert_eq!(a1 || a2, p0);
    prop_assert_eq!(x1 || x2, qa);

    // Conjunction across the orthogonal region.
    prop_assert_eq!(qa, o0);
    prop_assert_eq!(y, o0);

    // The structure report agrees with the queries.
    let flags: Vec<bool> = machine
        .structure()
        .iter()
        .map(|entry| entry.is_active)
        .collect();
    prop_assert_eq!(flags, vec![true, p0, a1, a2, o0, qa, x1, x2, y, z]);

    Ok(())
}

proptest! {
    #[test]
    fn active_configuration_invariants_hold(
        ops in prop::collection::vec(op_strategy(), 0..32)
    ) {
        let mut machine = build();
        check_invariants(&machine)?;
        for op in ops {
            apply(&mut machine, op);
            check_invariants(&machine)?;
        }
    }

    #[test]
    fn resume_restores_the_last_left_prong(
        ops in prop::collection::vec(op_strategy(), 0..24),
        pick in 0u8..2
    ) {
        let mut machine = build();
        for op in ops {
            apply(&mut machine, op);
        }

        // Force a known prong, leave the region, resume it.
        if pick == 0 {
            machine.change_to::<A1>();
        } else {
            machine.change_to::<A2>();
        }
        machine.update();
        machine.change_to::<Z>();
        machine.update();
        prop_assert!(!machine.is_active::<P0>());

        machine.resume::<P0>();
        machine.update();
        if pick == 0 {
            prop_assert!(machine.is_active::<A1>());
        } else {
            prop_assert!(machine.is_active::<A2>());
        }
    }

    #[test]
    fn schedule_never_changes_the_active_configuration(
        target in 0u8..10
    ) {
        let mut machine = build();
        let before: Vec<bool> = machine
            .structure()
            .iter()
            .map(|entry| entry.is_active)
            .collect();

        schedule(&mut machine, target);
        machine.update();

        let after: Vec<bool> = machine
            .structure()
            .iter()
            .map(|entry| entry.is_active)
            .collect();
        prop_assert_eq!(before, after);
    }
}

#[derive(Default)]
struct Ping;

impl State<()> for Ping {
    fn substitute(&mut self, control: &mut Control<'_>, _context: &mut ()) {
        control.change_to::<Pong>();
    }
}

#[derive(Default)]
struct Pong;

impl State<()> for Pong {
    fn substitute(&mut self, control: &mut Control<'_>, _context: &mut ()) {
        control.change_to::<Ping>();
    }
}

canopy::bare_state! {
    struct Rally;
}

#[derive(Clone, Default)]
struct SubstituteCounter(Rc<RefCell<usize>>);

impl Logger for SubstituteCounter {
    fn record(&mut self, _state: StateId, _name: &'static str, method: Method) {
        if method == Method::Substitute {
            *self.0.borrow_mut() += 1;
        }
    }
}

proptest! {
    #[test]
    fn substitution_work_is_bounded_by_the_budget(budget in 1usize..=6) {
        let counter = SubstituteCounter::default();
        let mut machine = MachineBuilder::<()>::new()
            .root(composite(Rally, vec![leaf(Ping), leaf(Pong)]))
            .max_substitutions(budget)
            .logger(Box::new(counter.clone()))
            .build(())
            .unwrap();

        machine.change_to::<Pong>();
        machine.update();

        // The redirect cycle is cut off at the budget and nothing applies.
        prop_assert_eq!(*counter.0.borrow(), budget);
        prop_assert!(machine.is_active::<Ping>());

        // Later ticks start with a fresh budget.
        *counter.0.borrow_mut() = 0;
        machine.update();
        prop_assert_eq!(*counter.0.borrow(), 0);
    }
}
