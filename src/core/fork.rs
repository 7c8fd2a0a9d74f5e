//! Fork activation records and parent links.
//!
//! A fork is the per-region activation record. Composite forks select one
//! prong through `active`, remember the last prong that was left through
//! `resumable`, and stage the next prong through `requested`. Orthogonal
//! regions keep all children active; their fork is a scalar slot used only
//! to route requests into the child subtree that contains the target.
//!
//! Parent links point upward: for every state and every fork, the enclosing
//! fork plus the child ordinal (prong) leading back down. The root region
//! has no parent link. Prong and fork indices fit in a byte; the builder
//! rejects trees with more than 255 states.

/// Child ordinal within a fork.
pub(crate) type Prong = u8;

/// Index of a fork in the machine's fork table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ForkId(pub(crate) u8);

impl ForkId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Upward link from a state or fork to its enclosing fork.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Parent {
    pub(crate) fork: ForkId,
    pub(crate) prong: Prong,
}

/// `None` for the root region and its head state.
pub(crate) type ParentLink = Option<Parent>;

/// Distinguishes how a fork's record is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ForkKind {
    /// XOR region: exactly one prong active while the region is active.
    Composite,
    /// AND region: all children active; the record only routes requests.
    Orthogonal,
}

/// Activation record of one region.
#[derive(Clone, Debug)]
pub(crate) struct Fork {
    pub(crate) kind: ForkKind,
    pub(crate) width: u8,
    /// Currently active prong. Always `None` for orthogonal forks.
    pub(crate) active: Option<Prong>,
    /// Prong that was active when this region last left. Written on leave
    /// and by `schedule` requests, consumed by `resume`.
    pub(crate) resumable: Option<Prong>,
    /// Prong staged by the resolution loop. Cleared on apply.
    pub(crate) requested: Option<Prong>,
}

impl Fork {
    pub(crate) fn new(kind: ForkKind, width: u8) -> Self {
        Self {
            kind,
            width,
            active: None,
            resumable: None,
            requested: None,
        }
    }
}
