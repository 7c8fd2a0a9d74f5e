//! Shape declaration and machine construction.
//!
//! A machine's tree is declared by composing three region shapes: a [`leaf`]
//! wrapping one state, a [`composite`] with a head state and XOR children,
//! and an [`orthogonal`] with a head state and AND children. The fluent
//! [`MachineBuilder`] validates the composition, sizes every storage from
//! it, and enters the initial configuration.
//!
//! The shape is fixed once built; all indices, parent links, and buffers are
//! derived from it here and never change afterwards.

pub mod error;
pub mod macros;

pub use error::BuildError;

use std::any::TypeId;

use crate::core::{Fork, ForkId, ForkKind, Parent, ParentLink, Registry, RequestQueue, State};
use crate::log::Logger;
use crate::machine::Machine;
use crate::report::{ShapeMetrics, StructureEntry};
use crate::tree::{Composite, Leaf, Node, Orthogonal};

/// Largest supported state count; prong and fork indices fit in a byte.
const MAX_STATES: usize = 255;

enum RegionShape {
    Leaf,
    Composite,
    Orthogonal,
}

/// One node of the declared tree shape. Created by [`leaf`], [`composite`]
/// or [`orthogonal`] and consumed by [`MachineBuilder::build`].
pub struct Region<C, E = ()> {
    shape: RegionShape,
    state: Box<dyn State<C, E>>,
    tag: TypeId,
    name: &'static str,
    children: Vec<Region<C, E>>,
}

/// Wraps a single state as a childless region.
pub fn leaf<S, C, E>(state: S) -> Region<C, E>
where
    S: State<C, E>,
{
    Region {
        shape: RegionShape::Leaf,
        name: state.name(),
        tag: TypeId::of::<S>(),
        state: Box::new(state),
        children: Vec::new(),
    }
}

/// Declares an XOR region: `head` plus children of which exactly one is
/// active at a time.
pub fn composite<S, C, E>(head: S, children: Vec<Region<C, E>>) -> Region<C, E>
where
    S: State<C, E>,
{
    Region {
        shape: RegionShape::Composite,
        name: head.name(),
        tag: TypeId::of::<S>(),
        state: Box::new(head),
        children,
    }
}

/// Declares an AND region: `head` plus children that are all active
/// whenever the region is.
pub fn orthogonal<S, C, E>(head: S, children: Vec<Region<C, E>>) -> Region<C, E>
where
    S: State<C, E>,
{
    Region {
        shape: RegionShape::Orthogonal,
        name: head.name(),
        tag: TypeId::of::<S>(),
        state: Box::new(head),
        children,
    }
}

fn count_states<C, E>(region: &Region<C, E>) -> usize {
    1 + region.children.iter().map(count_states).sum::<usize>()
}

/// Fluent builder for a [`Machine`].
///
/// # Example
///
/// ```rust
/// use canopy::{composite, leaf, MachineBuilder};
///
/// canopy::bare_state! {
///     struct Root;
///     struct On;
///     struct Off;
/// }
///
/// let machine = MachineBuilder::<()>::new()
///     .root(composite(Root, vec![leaf(Off), leaf(On)]))
///     .max_substitutions(2)
///     .build(())
///     .unwrap();
///
/// assert!(machine.is_active::<Off>());
/// ```
pub struct MachineBuilder<C, E = ()> {
    root: Option<Region<C, E>>,
    max_substitutions: usize,
    logger: Option<Box<dyn Logger>>,
}

impl<C: 'static, E: 'static> MachineBuilder<C, E> {
    pub fn new() -> Self {
        Self {
            root: None,
            max_substitutions: 4,
            logger: None,
        }
    }

    /// Set the outermost region (required).
    pub fn root(mut self, region: Region<C, E>) -> Self {
        self.root = Some(region);
        self
    }

    /// Cap on guard-redirect rounds per tick. Defaults to 4.
    pub fn max_substitutions(mut self, budget: usize) -> Self {
        self.max_substitutions = budget;
        self
    }

    /// Attach a lifecycle logger before construction, so the initial enter
    /// cascade is observed too.
    pub fn logger(mut self, logger: Box<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate the shape, size the storages, and enter the initial
    /// configuration.
    pub fn build(self, context: C) -> Result<Machine<C, E>, BuildError> {
        let root = self.root.ok_or(BuildError::MissingRoot)?;
        if matches!(root.shape, RegionShape::Leaf) {
            return Err(BuildError::LeafRoot);
        }

        let count = count_states(&root);
        if count > MAX_STATES {
            return Err(BuildError::TooManyStates { count });
        }

        let mut assembly = Assembly {
            registry: Registry::with_capacity(count),
            state_parents: Vec::with_capacity(count),
            fork_parents: Vec::new(),
            forks: Vec::new(),
            structure: Vec::with_capacity(count),
        };
        let (apex, sizes) = assemble(root, None, 0, &mut assembly)?;

        let metrics = ShapeMetrics {
            state_count: assembly.registry.len(),
            fork_count: assembly.forks.len(),
            deep_width: sizes.deep_width,
            reverse_depth: sizes.reverse_depth,
        };
        let requests = RequestQueue::with_capacity(assembly.forks.len());

        Ok(Machine::assemble(
            context,
            assembly.registry,
            assembly.state_parents,
            assembly.fork_parents,
            assembly.forks,
            requests,
            apex,
            self.logger,
            self.max_substitutions,
            metrics,
            assembly.structure,
        ))
    }
}

impl<C: 'static, E: 'static> Default for MachineBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

struct Assembly {
    registry: Registry,
    state_parents: Vec<ParentLink>,
    fork_parents: Vec<ParentLink>,
    forks: Vec<Fork>,
    structure: Vec<StructureEntry>,
}

struct SubtreeSizes {
    deep_width: usize,
    reverse_depth: usize,
}

/// Depth-first walk over the declared shape. Assigns dense state indices in
/// enter order, allocates fork records, and records parent links.
fn assemble<C: 'static, E: 'static>(
    region: Region<C, E>,
    parent: ParentLink,
    depth: usize,
    assembly: &mut Assembly,
) -> Result<(Node<C, E>, SubtreeSizes), BuildError> {
    let Region {
        shape,
        state,
        tag,
        name,
        children,
    } = region;

    let id = assembly
        .registry
        .insert(tag)
        .ok_or(BuildError::DuplicateState { name })?;
    assembly.state_parents.push(parent);
    assembly.structure.push(StructureEntry {
        depth,
        name,
        is_active: false,
    });
    let head = Leaf::new(id, name, state);

    match shape {
        RegionShape::Leaf => Ok((
            Node::Leaf(head),
            SubtreeSizes {
                deep_width: 1,
                reverse_depth: 1,
            },
        )),
        RegionShape::Composite | RegionShape::Orthogonal => {
            if children.is_empty() {
                return Err(BuildError::EmptyRegion { name });
            }
            let is_orthogonal = matches!(shape, RegionShape::Orthogonal);
            let fork = ForkId(assembly.forks.len() as u8);
            assembly.forks.push(Fork::new(
                if is_orthogonal {
                    ForkKind::Orthogonal
                } else {
                    ForkKind::Composite
                },
                children.len() as u8,
            ));
            assembly.fork_parents.push(parent);

            let mut nodes = Vec::with_capacity(children.len());
            let mut deep_width = 0;
            let mut reverse_depth = 0;
            for (prong, child) in children.into_iter().enumerate() {
                let link = Some(Parent {
                    fork,
                    prong: prong as u8,
                });
                let (node, sizes) = assemble(child, link, depth + 1, assembly)?;
                deep_width = if is_orthogonal {
                    deep_width + sizes.deep_width
                } else {
                    deep_width.max(sizes.deep_width)
                };
                reverse_depth = reverse_depth.max(sizes.reverse_depth);
                nodes.push(node);
            }

            let sizes = SubtreeSizes {
                deep_width,
                reverse_depth: reverse_depth + 1,
            };
            let node = if is_orthogonal {
                Node::Orthogonal(Orthogonal {
                    fork,
                    head,
                    children: nodes,
                })
            } else {
                Node::Composite(Composite {
                    fork,
                    head,
                    children: nodes,
                })
            };
            Ok((node, sizes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::bare_state! {
        struct Root;
        struct Alpha;
        struct Beta;
        struct Inner;
        struct Gamma;
    }

    #[test]
    fn builder_requires_a_root() {
        let result = MachineBuilder::<()>::new().build(());
        assert!(matches!(result, Err(BuildError::MissingRoot)));
    }

    #[test]
    fn builder_rejects_a_leaf_root() {
        let result = MachineBuilder::<()>::new().root(leaf(Alpha)).build(());
        assert!(matches!(result, Err(BuildError::LeafRoot)));
    }

    #[test]
    fn builder_rejects_empty_regions() {
        let result = MachineBuilder::<()>::new()
            .root(composite(Root, vec![leaf(Alpha), composite(Inner, vec![])]))
            .build(());
        assert!(matches!(result, Err(BuildError::EmptyRegion { name: "Inner" })));
    }

    #[test]
    fn builder_rejects_duplicate_state_types() {
        let result = MachineBuilder::<()>::new()
            .root(composite(Root, vec![leaf(Alpha), leaf(Alpha)]))
            .build(());
        assert!(matches!(result, Err(BuildError::DuplicateState { name: "Alpha" })));
    }

    #[test]
    fn fluent_api_builds_a_machine() {
        let machine = MachineBuilder::<()>::new()
            .root(composite(Root, vec![leaf(Alpha), leaf(Beta)]))
            .build(())
            .unwrap();

        assert!(machine.is_active::<Alpha>());
        assert!(!machine.is_active::<Beta>());

        let metrics = machine.metrics();
        assert_eq!(metrics.state_count, 3);
        assert_eq!(metrics.fork_count, 1);
        assert_eq!(metrics.reverse_depth, 2);
    }

    #[test]
    fn deep_width_sums_orthogonal_children_and_maxes_composite_prongs() {
        let machine = MachineBuilder::<()>::new()
            .root(orthogonal(
                Root,
                vec![
                    composite(Inner, vec![leaf(Alpha), leaf(Beta)]),
                    leaf(Gamma),
                ],
            ))
            .build(())
            .unwrap();

        let metrics = machine.metrics();
        assert_eq!(metrics.state_count, 5);
        assert_eq!(metrics.fork_count, 2);
        // One active leaf under the composite, plus the orthogonal sibling.
        assert_eq!(metrics.deep_width, 2);
        assert_eq!(metrics.reverse_depth, 3);
    }
}
