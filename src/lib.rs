//! Canopy: hierarchical state machines for game loops
//!
//! Canopy runs a tree of states inside a host application, typically once per
//! frame. The tree is composed at build time from two kinds of regions:
//! *composite* regions keep exactly one child active at a time (UML-style
//! XOR), *orthogonal* regions keep all children active simultaneously (AND).
//! States receive lifecycle callbacks and may request transitions to any
//! state in the tree by type; requests are queued and resolved cooperatively
//! at a single apply point per tick, so every callback observes a consistent
//! active configuration.
//!
//! # Core Concepts
//!
//! - **State**: lifecycle callbacks via the [`State`] trait; all optional
//! - **Regions**: [`leaf`], [`composite`] and [`orthogonal`] shape builders
//! - **Requests**: `change_to` (fresh entry), `resume` (follow history),
//!   `schedule` (record history for a later resume)
//! - **Substitution**: a targeted state may redirect an incoming transition
//!   before it is applied, bounded per tick
//!
//! # Example
//!
//! ```rust
//! use canopy::{composite, leaf, MachineBuilder, State};
//!
//! struct World {
//!     frames: u32,
//! }
//!
//! canopy::bare_state! {
//!     pub struct Mode;
//! }
//!
//! #[derive(Default)]
//! struct Idle;
//!
//! impl State<World> for Idle {
//!     fn update(&mut self, world: &mut World) {
//!         world.frames += 1;
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Walk;
//!
//! impl State<World> for Walk {}
//!
//! let mut machine = MachineBuilder::<World>::new()
//!     .root(composite(Mode, vec![leaf(Idle), leaf(Walk)]))
//!     .build(World { frames: 0 })
//!     .unwrap();
//!
//! assert!(machine.is_active::<Idle>());
//!
//! machine.change_to::<Walk>();
//! machine.update();
//!
//! assert!(machine.is_active::<Walk>());
//! assert!(machine.is_resumable::<Idle>());
//! assert_eq!(machine.context().frames, 1);
//! ```

pub mod builder;
pub mod core;
pub mod log;
pub mod machine;
pub mod report;
pub mod snapshot;

mod tree;

// Re-export commonly used types
pub use builder::{composite, leaf, orthogonal, BuildError, MachineBuilder, Region};
pub use core::{Control, RequestKind, State, StateId};
pub use log::{Logger, Method};
pub use machine::Machine;
pub use report::{ShapeMetrics, StructureEntry};
pub use snapshot::{ForkSnapshot, Snapshot, SnapshotError, SNAPSHOT_VERSION};
