//! Root controller: owns the storages and drives each tick.
//!
//! A tick runs in two phases. First the whole active subtree updates and
//! collects transition requests; then the resolution loop consumes the
//! queue, runs the substitution (guard) protocol on newly targeted states,
//! and applies the resolved configuration at a single point. Callbacks
//! always observe the configuration of the previous tick; nothing mutates
//! `active` outside the apply step.

use std::any::TypeId;

use chrono::Utc;

use crate::core::{
    short_type_name, Control, Fork, ForkKind, ParentLink, Prong, Registry, Request, RequestKind,
    RequestQueue, StateId,
};
use crate::log::{Logger, Sink};
use crate::report::{advance_activity, ShapeMetrics, StructureEntry};
use crate::snapshot::{ForkSnapshot, Snapshot, SnapshotError, SNAPSHOT_VERSION};
use crate::tree::Node;

/// A built machine: the region tree plus every runtime storage, sized once
/// at construction. `C` is the host context, `E` the event type accepted by
/// [`react`](Machine::react).
///
/// Built through [`MachineBuilder`](crate::MachineBuilder); the initial
/// configuration is entered during construction and left when the machine
/// is dropped.
pub struct Machine<C: 'static, E: 'static = ()> {
    context: C,
    registry: Registry,
    state_parents: Vec<ParentLink>,
    fork_parents: Vec<ParentLink>,
    forks: Vec<Fork>,
    requests: RequestQueue,
    apex: Node<C, E>,
    logger: Option<Box<dyn Logger>>,
    max_substitutions: usize,
    metrics: ShapeMetrics,
    structure: Vec<StructureEntry>,
    activity: Vec<i8>,
}

impl<C: 'static, E: 'static> Machine<C, E> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        context: C,
        registry: Registry,
        state_parents: Vec<ParentLink>,
        fork_parents: Vec<ParentLink>,
        forks: Vec<Fork>,
        requests: RequestQueue,
        apex: Node<C, E>,
        logger: Option<Box<dyn Logger>>,
        max_substitutions: usize,
        metrics: ShapeMetrics,
        structure: Vec<StructureEntry>,
    ) -> Self {
        let activity = vec![0; structure.len()];
        let mut machine = Self {
            context,
            registry,
            state_parents,
            fork_parents,
            forks,
            requests,
            apex,
            logger,
            max_substitutions,
            metrics,
            structure,
            activity,
        };
        machine.enter_initial();
        machine
    }

    fn enter_initial(&mut self) {
        {
            let mut sink = Sink::new(self.logger.as_deref_mut());
            self.apex
                .deep_enter_initial(&mut self.forks, &mut self.context, &mut sink);
        }
        if !self.requests.is_empty() {
            self.process_transitions();
        }
        self.refresh_reports();
    }

    /// Runs one tick: the update/transition pass over the active subtree,
    /// then the resolution of every collected request.
    pub fn update(&mut self) {
        {
            let mut sink = Sink::new(self.logger.as_deref_mut());
            let mut control = Control::new(&mut self.requests);
            self.apex.deep_update_and_transition(
                &mut self.forks,
                &mut control,
                &mut self.context,
                &mut sink,
            );
        }
        if !self.requests.is_empty() {
            self.process_transitions();
        }
        self.refresh_reports();
    }

    /// Dispatches an event to every active state, then resolves any
    /// requests the handlers appended.
    pub fn react(&mut self, event: &E) {
        {
            let mut sink = Sink::new(self.logger.as_deref_mut());
            let mut control = Control::new(&mut self.requests);
            self.apex.deep_react(
                event,
                &mut self.forks,
                &mut control,
                &mut self.context,
                &mut sink,
            );
        }
        if !self.requests.is_empty() {
            self.process_transitions();
        }
        self.refresh_reports();
    }

    /// Enqueues a fresh transition to `T`, resolved on the next tick.
    pub fn change_to<T: 'static>(&mut self) {
        self.requests.push(Request::new::<T>(RequestKind::Restart));
    }

    /// Enqueues a history-following transition to `T`.
    pub fn resume<T: 'static>(&mut self) {
        self.requests.push(Request::new::<T>(RequestKind::Resume));
    }

    /// Records history toward `T` without activating it now.
    pub fn schedule<T: 'static>(&mut self) {
        self.requests.push(Request::new::<T>(RequestKind::Schedule));
    }

    /// Whether `T` is part of the current active configuration.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not a state of this machine.
    pub fn is_active<T: 'static>(&self) -> bool {
        let id = self.lookup::<T>();
        chain_matches(
            &self.forks,
            &self.state_parents,
            &self.fork_parents,
            id,
            |fork, prong| fork.active == Some(prong),
        )
    }

    /// Whether a `resume` of an enclosing region would select `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not a state of this machine.
    pub fn is_resumable<T: 'static>(&self) -> bool {
        let id = self.lookup::<T>();
        chain_matches(
            &self.forks,
            &self.state_parents,
            &self.fork_parents,
            id,
            |fork, prong| fork.resumable == Some(prong),
        )
    }

    /// Borrow the host context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutably borrow the host context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Every state in enter order with its activity flag as of the end of
    /// the last tick.
    pub fn structure(&self) -> &[StructureEntry] {
        &self.structure
    }

    /// Per-state rolling activity counters, indexed like
    /// [`structure`](Machine::structure).
    pub fn activity(&self) -> &[i8] {
        &self.activity
    }

    /// Sizes derived from the tree shape.
    pub fn metrics(&self) -> ShapeMetrics {
        self.metrics
    }

    /// Attach or replace the lifecycle logger.
    pub fn attach_logger(&mut self, logger: Box<dyn Logger>) {
        self.logger = Some(logger);
    }

    /// Captures the per-region history for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now(),
            forks: self
                .forks
                .iter()
                .map(|fork| ForkSnapshot {
                    active: fork.active,
                    resumable: fork.resumable,
                })
                .collect(),
        }
    }

    /// Restores a captured snapshot as history.
    ///
    /// Each region's `resumable` slot is set to the prong that was active
    /// at capture time (falling back to the captured history where the
    /// region was inactive). The active configuration is left untouched so
    /// no lifecycle callback is skipped; a subsequent `resume` request
    /// walks back into the captured configuration through the ordinary
    /// enter/leave protocol.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        if snapshot.forks.len() != self.forks.len() {
            return Err(SnapshotError::ShapeMismatch {
                expected: self.forks.len(),
                found: snapshot.forks.len(),
            });
        }
        for (index, (fork, captured)) in self.forks.iter().zip(&snapshot.forks).enumerate() {
            for prong in [captured.active, captured.resumable].into_iter().flatten() {
                if prong >= fork.width {
                    return Err(SnapshotError::InvalidProng { fork: index, prong });
                }
            }
        }
        for (fork, captured) in self.forks.iter_mut().zip(&snapshot.forks) {
            if let Some(prong) = captured.active.or(captured.resumable) {
                fork.resumable = Some(prong);
            }
        }
        Ok(())
    }

    fn lookup<T: 'static>(&self) -> StateId {
        self.registry
            .lookup(TypeId::of::<T>(), short_type_name(std::any::type_name::<T>()))
    }

    /// Bounded resolution loop: consume requests, run guards, repeat until
    /// quiet, then apply. Overflowing the substitution budget discards the
    /// pending set and keeps the pre-tick configuration.
    fn process_transitions(&mut self) {
        let mut rounds = 0;
        while !self.requests.is_empty() && rounds < self.max_substitutions {
            let mut changed = false;
            self.requests.begin_round();
            for index in 0..self.requests.round_len() {
                let request = self.requests.round(index);
                match request.kind {
                    RequestKind::Restart | RequestKind::Resume => {
                        self.mark_requested(request);
                        self.apex.deep_forward_request(&mut self.forks, request.kind);
                        changed = true;
                    }
                    RequestKind::Schedule => self.mark_scheduled(request),
                    RequestKind::Remain => {}
                }
            }
            self.requests.end_round();
            if changed {
                let mut sink = Sink::new(self.logger.as_deref_mut());
                let mut control = Control::new(&mut self.requests);
                self.apex.deep_forward_substitute(
                    &mut self.forks,
                    &mut control,
                    &mut self.context,
                    &mut sink,
                );
            }
            rounds += 1;
        }

        if !self.requests.is_empty() {
            tracing::warn!(
                rounds,
                pending = self.requests.len(),
                "substitution budget exhausted; discarding pending transitions"
            );
            self.requests.clear();
            for fork in &mut self.forks {
                fork.requested = None;
            }
            return;
        }

        {
            let mut sink = Sink::new(self.logger.as_deref_mut());
            self.apex
                .deep_change_to_requested(&mut self.forks, &mut self.context, &mut sink);
        }
        for fork in &mut self.forks {
            fork.requested = None;
        }
    }

    /// Stages `requested` on every fork from the target up to the root,
    /// then lets the tree carry the request kind below the target.
    fn mark_requested(&mut self, request: Request) {
        let id = self.registry.lookup(request.tag, request.name);
        let mut link = self.state_parents[id.index()];
        let mut hops = 0;
        while let Some(parent) = link {
            self.forks[parent.fork.index()].requested = Some(parent.prong);
            link = self.fork_parents[parent.fork.index()];
            hops += 1;
            assert!(hops <= self.forks.len(), "cycle detected in parent chain");
        }
    }

    /// Writes `resumable` along the same path, without staging anything.
    fn mark_scheduled(&mut self, request: Request) {
        let id = self.registry.lookup(request.tag, request.name);
        let mut link = self.state_parents[id.index()];
        let mut hops = 0;
        while let Some(parent) = link {
            self.forks[parent.fork.index()].resumable = Some(parent.prong);
            link = self.fork_parents[parent.fork.index()];
            hops += 1;
            assert!(hops <= self.forks.len(), "cycle detected in parent chain");
        }
    }

    fn refresh_reports(&mut self) {
        for index in 0..self.structure.len() {
            let active = chain_matches(
                &self.forks,
                &self.state_parents,
                &self.fork_parents,
                StateId(index as u8),
                |fork, prong| fork.active == Some(prong),
            );
            self.structure[index].is_active = active;
            self.activity[index] = advance_activity(self.activity[index], active);
        }
    }
}

impl<C: 'static, E: 'static> Drop for Machine<C, E> {
    fn drop(&mut self) {
        let mut sink = Sink::new(self.logger.as_deref_mut());
        self.apex
            .deep_leave(&mut self.forks, &mut self.context, &mut sink);
    }
}

/// Walks the parent chain of `id`, testing every composite fork against the
/// prong that leads toward the state. Orthogonal links always pass.
fn chain_matches(
    forks: &[Fork],
    state_parents: &[ParentLink],
    fork_parents: &[ParentLink],
    id: StateId,
    accepts: impl Fn(&Fork, Prong) -> bool,
) -> bool {
    let mut link = state_parents[id.index()];
    let mut hops = 0;
    while let Some(parent) = link {
        let fork = &forks[parent.fork.index()];
        if fork.kind == ForkKind::Composite && !accepts(fork, parent.prong) {
            return false;
        }
        link = fork_parents[parent.fork.index()];
        hops += 1;
        assert!(hops <= forks.len(), "cycle detected in parent chain");
    }
    true
}
