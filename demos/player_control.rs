//! Player Control State Machine
//!
//! This example demonstrates orthogonal regions and history-following
//! transitions in a typical game-loop setup.
//!
//! Key concepts:
//! - An orthogonal root: movement and stance run side by side
//! - Events dispatched with `react`
//! - `resume` restoring the movement mode after a stagger
//!
//! Run with: cargo run --example player_control

use canopy::{composite, leaf, orthogonal, Control, MachineBuilder, State};

struct Player {
    speed: f32,
    height: f32,
}

#[derive(Debug)]
enum Input {
    Move,
    Stop,
    ToggleCrouch,
    Stagger,
    Recover,
}

canopy::bare_state! {
    struct Avatar;
    struct Movement;
    struct Stance;
}

#[derive(Default)]
struct Idle;

impl State<Player, Input> for Idle {
    fn enter(&mut self, player: &mut Player) {
        player.speed = 0.0;
        println!("  movement: idle");
    }

    fn react(&mut self, input: &Input, control: &mut Control<'_>, _player: &mut Player) {
        match input {
            Input::Move => control.change_to::<Running>(),
            // Pick the movement mode back up where the stagger left it.
            Input::Recover => control.resume::<Movement>(),
            _ => {}
        }
    }
}

#[derive(Default)]
struct Running;

impl State<Player, Input> for Running {
    fn enter(&mut self, player: &mut Player) {
        player.speed = 6.0;
        println!("  movement: running");
    }

    fn react(&mut self, input: &Input, control: &mut Control<'_>, _player: &mut Player) {
        match input {
            Input::Stop | Input::Stagger => control.change_to::<Idle>(),
            _ => {}
        }
    }
}

#[derive(Default)]
struct Standing;

impl State<Player, Input> for Standing {
    fn enter(&mut self, player: &mut Player) {
        player.height = 1.8;
        println!("  stance:   standing");
    }

    fn react(&mut self, input: &Input, control: &mut Control<'_>, _player: &mut Player) {
        if matches!(input, Input::ToggleCrouch) {
            control.change_to::<Crouching>();
        }
    }
}

#[derive(Default)]
struct Crouching;

impl State<Player, Input> for Crouching {
    fn enter(&mut self, player: &mut Player) {
        player.height = 0.9;
        println!("  stance:   crouching");
    }

    fn react(&mut self, input: &Input, control: &mut Control<'_>, _player: &mut Player) {
        if matches!(input, Input::ToggleCrouch) {
            control.change_to::<Standing>();
        }
    }
}

fn main() {
    println!("=== Player Control State Machine ===\n");

    let mut machine = MachineBuilder::<Player, Input>::new()
        .root(orthogonal(
            Avatar,
            vec![
                composite(Movement, vec![leaf(Idle), leaf(Running)]),
                composite(Stance, vec![leaf(Standing), leaf(Crouching)]),
            ],
        ))
        .build(Player {
            speed: 0.0,
            height: 1.8,
        })
        .unwrap();

    for input in [Input::Move, Input::ToggleCrouch] {
        println!("\ninput: {input:?}");
        machine.react(&input);
        machine.update();
    }

    // A stagger knocks movement back to idle; stance is untouched because
    // the regions are orthogonal.
    println!("\ninput: Stagger");
    machine.react(&Input::Stagger);
    machine.update();
    assert!(machine.is_active::<Idle>());
    assert!(machine.is_active::<Crouching>());

    // Recovering resumes the movement region where it left off.
    println!("\ninput: Recover (resume movement)");
    machine.react(&Input::Recover);
    assert!(machine.is_active::<Running>());
    assert!(machine.is_active::<Crouching>());

    println!("\nFinal configuration:");
    for entry in machine.structure() {
        println!(
            "  {}{} {}",
            "  ".repeat(entry.depth),
            if entry.is_active { "*" } else { "-" },
            entry.name
        );
    }
    println!("  speed = {}, height = {}", machine.context().speed, machine.context().height);

    println!("\n=== Example Complete ===");
}
