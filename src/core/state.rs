//! Core State trait for machine states.
//!
//! Every state in the tree, including the head state of a region, implements
//! this trait. All callbacks default to no-ops, so a state only writes the
//! lifecycle methods it cares about.

use crate::core::request::Control;
use serde::{Deserialize, Serialize};

/// Dense index of a state within one machine, assigned by the depth-first
/// build walk. Stable for the lifetime of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) u8);

impl StateId {
    /// Position of this state in build (enter) order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle callbacks for a state in the tree.
///
/// `C` is the host context passed by mutable reference to every callback;
/// `E` is the event type dispatched through [`react`](State::react).
///
/// Callbacks that take a [`Control`] may request transitions; the requests
/// are queued and applied at the end of the tick, never inline. The `pre_*`
/// and `post_leave` hooks run before/after the matching callback, are meant
/// for inspection and preparation only, and cannot request transitions.
///
/// # Example
///
/// ```rust
/// use canopy::{Control, State};
///
/// struct Player {
///     stamina: u32,
/// }
///
/// #[derive(Default)]
/// struct Sprinting;
///
/// #[derive(Default)]
/// struct Walking;
///
/// impl State<Player> for Walking {}
///
/// impl State<Player> for Sprinting {
///     fn enter(&mut self, player: &mut Player) {
///         player.stamina = player.stamina.saturating_sub(5);
///     }
///
///     fn transition(&mut self, control: &mut Control<'_>, player: &mut Player) {
///         if player.stamina == 0 {
///             control.change_to::<Walking>();
///         }
///     }
/// }
/// ```
pub trait State<C, E = ()>: 'static {
    /// Display name used by the logger and the structure report.
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Called when this state is the target of a pending transition, before
    /// the transition is applied. May redirect by requesting another
    /// transition through `control`.
    fn substitute(&mut self, _control: &mut Control<'_>, _context: &mut C) {}

    /// Called when this state becomes active.
    fn enter(&mut self, _context: &mut C) {}

    /// Called once per tick while this state is active.
    fn update(&mut self, _context: &mut C) {}

    /// Called once per tick after every active state has updated. The usual
    /// place to request transitions.
    fn transition(&mut self, _control: &mut Control<'_>, _context: &mut C) {}

    /// Called when the host dispatches an event while this state is active.
    fn react(&mut self, _event: &E, _control: &mut Control<'_>, _context: &mut C) {}

    /// Called when this state stops being active.
    fn leave(&mut self, _context: &mut C) {}

    /// Hook invoked immediately before [`substitute`](State::substitute).
    fn pre_substitute(&mut self, _context: &mut C) {}

    /// Hook invoked immediately before [`enter`](State::enter).
    fn pre_enter(&mut self, _context: &mut C) {}

    /// Hook invoked immediately before [`update`](State::update).
    fn pre_update(&mut self, _context: &mut C) {}

    /// Hook invoked immediately before [`transition`](State::transition).
    fn pre_transition(&mut self, _context: &mut C) {}

    /// Hook invoked immediately before [`react`](State::react).
    fn pre_react(&mut self, _event: &E, _context: &mut C) {}

    /// Hook invoked immediately after [`leave`](State::leave).
    fn post_leave(&mut self, _context: &mut C) {}
}

/// Strips the module path from a fully qualified type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}
