//! Composite node: XOR region with one active prong.

use crate::core::{Control, Fork, ForkId, Prong, RequestKind};
use crate::log::Sink;
use crate::tree::{Leaf, Node};

pub(crate) struct Composite<C, E> {
    pub(crate) fork: ForkId,
    pub(crate) head: Leaf<C, E>,
    pub(crate) children: Vec<Node<C, E>>,
}

impl<C: 'static, E: 'static> Composite<C, E> {
    fn selection(&self, forks: &[Fork]) -> (Option<Prong>, Option<Prong>) {
        let fork = &forks[self.fork.index()];
        (fork.requested, fork.active)
    }

    pub(crate) fn deep_enter_initial(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        forks[self.fork.index()].active = Some(0);
        self.head.enter(context, sink);
        self.children[0].deep_enter_initial(forks, context, sink);
    }

    pub(crate) fn deep_enter(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        let prong = {
            let fork = &mut forks[self.fork.index()];
            let requested = fork.requested.take();
            debug_assert!(
                requested.map_or(false, |prong| prong < fork.width),
                "composite entered without a staged prong"
            );
            let prong = requested.unwrap_or(0);
            fork.active = Some(prong);
            prong
        };
        self.head.enter(context, sink);
        self.children[prong as usize].deep_enter(forks, context, sink);
    }

    pub(crate) fn deep_forward_substitute(
        &mut self,
        forks: &mut [Fork],
        control: &mut Control<'_>,
        context: &mut C,
        sink: &mut Sink<'_>,
    ) {
        match self.selection(forks) {
            (Some(requested), Some(active)) if requested == active => {
                self.children[requested as usize].deep_forward_substitute(forks, control, context, sink);
            }
            (Some(requested), _) => {
                self.children[requested as usize].deep_substitute(forks, control, context, sink);
            }
            (None, _) => {}
        }
    }

    pub(crate) fn deep_substitute(
        &mut self,
        forks: &mut [Fork],
        control: &mut Control<'_>,
        context: &mut C,
        sink: &mut Sink<'_>,
    ) {
        self.head.substitute(control, context, sink);
        let requested = forks[self.fork.index()].requested;
        debug_assert!(requested.is_some(), "substitute ran on a composite with no staged prong");
        let prong = requested.unwrap_or(0);
        self.children[prong as usize].deep_substitute(forks, control, context, sink);
    }

    pub(crate) fn deep_update(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        self.head.update(context, sink);
        let active = forks[self.fork.index()].active;
        debug_assert!(active.is_some(), "update ran on a composite with no active prong");
        if let Some(prong) = active {
            self.children[prong as usize].deep_update(forks, context, sink);
        }
    }

    pub(crate) fn deep_transition(
        &mut self,
        forks: &mut [Fork],
        control: &mut Control<'_>,
        context: &mut C,
        sink: &mut Sink<'_>,
    ) {
        self.head.transition(control, context, sink);
        if let Some(prong) = forks[self.fork.index()].active {
            self.children[prong as usize].deep_transition(forks, control, context, sink);
        }
    }

    pub(crate) fn deep_react(
        &mut self,
        event: &E,
        forks: &mut [Fork],
        control: &mut Control<'_>,
        context: &mut C,
        sink: &mut Sink<'_>,
    ) {
        self.head.react(event, control, context, sink);
        if let Some(prong) = forks[self.fork.index()].active {
            self.children[prong as usize].deep_react(event, forks, control, context, sink);
        }
    }

    pub(crate) fn deep_leave(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        let active = forks[self.fork.index()].active;
        if let Some(prong) = active {
            self.children[prong as usize].deep_leave(forks, context, sink);
        }
        self.head.leave(context, sink);
        let fork = &mut forks[self.fork.index()];
        if let Some(prong) = active {
            fork.resumable = Some(prong);
        }
        fork.active = None;
    }

    pub(crate) fn deep_forward_request(&mut self, forks: &mut [Fork], kind: RequestKind) {
        match forks[self.fork.index()].requested {
            Some(prong) => self.children[prong as usize].deep_forward_request(forks, kind),
            None => match kind {
                RequestKind::Remain => self.deep_request_remain(forks),
                RequestKind::Restart => self.deep_request_restart(forks),
                RequestKind::Resume => self.deep_request_resume(forks),
                RequestKind::Schedule => debug_assert!(false, "schedule requests are never forwarded"),
            },
        }
    }

    pub(crate) fn deep_request_remain(&mut self, forks: &mut [Fork]) {
        match forks[self.fork.index()].active {
            Some(prong) => self.children[prong as usize].deep_request_remain(forks),
            None => {
                forks[self.fork.index()].requested = Some(0);
                self.children[0].deep_request_remain(forks);
            }
        }
    }

    pub(crate) fn deep_request_restart(&mut self, forks: &mut [Fork]) {
        forks[self.fork.index()].requested = Some(0);
        self.children[0].deep_request_restart(forks);
    }

    pub(crate) fn deep_request_resume(&mut self, forks: &mut [Fork]) {
        let prong = {
            let fork = &mut forks[self.fork.index()];
            let prong = fork.resumable.unwrap_or(0);
            fork.requested = Some(prong);
            prong
        };
        self.children[prong as usize].deep_request_resume(forks);
    }

    pub(crate) fn deep_change_to_requested(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        match self.selection(forks) {
            (None, _) => {}
            (Some(requested), Some(active)) if requested == active => {
                // In-place re-focus: the change, if any, is deeper down.
                forks[self.fork.index()].requested = None;
                self.children[active as usize].deep_change_to_requested(forks, context, sink);
            }
            (Some(requested), active) => {
                if let Some(prong) = active {
                    self.children[prong as usize].deep_leave(forks, context, sink);
                }
                {
                    let fork = &mut forks[self.fork.index()];
                    if let Some(prong) = active {
                        fork.resumable = Some(prong);
                    }
                    fork.active = Some(requested);
                    fork.requested = None;
                }
                self.children[requested as usize].deep_enter(forks, context, sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{composite, leaf, MachineBuilder};

    crate::bare_state! {
        struct R0;
        struct P0;
        struct Q0;
        struct A1;
        struct A2;
        struct B1;
        struct B2;
    }

    fn build() -> crate::Machine<()> {
        MachineBuilder::<()>::new()
            .root(composite(
                R0,
                vec![
                    composite(P0, vec![leaf(A1), leaf(A2)]),
                    composite(Q0, vec![leaf(B1), leaf(B2)]),
                ],
            ))
            .build(())
            .unwrap()
    }

    #[test]
    fn construction_selects_prong_zero_at_every_level() {
        let machine = build();
        assert!(machine.is_active::<R0>());
        assert!(machine.is_active::<P0>());
        assert!(machine.is_active::<A1>());
        assert!(!machine.is_active::<A2>());
        assert!(!machine.is_active::<Q0>());
    }

    #[test]
    fn schedule_records_history_without_activating() {
        let mut machine = build();
        machine.schedule::<B2>();
        machine.update();

        assert!(machine.is_active::<A1>());
        assert!(!machine.is_active::<Q0>());
        assert!(!machine.is_active::<B2>());
        assert!(machine.is_resumable::<B2>());
    }

    #[test]
    fn resume_reaches_a_scheduled_target() {
        let mut machine = build();
        machine.schedule::<B2>();
        machine.update();

        machine.resume::<Q0>();
        machine.update();
        assert!(machine.is_active::<Q0>());
        assert!(machine.is_active::<B2>());
        assert!(!machine.is_active::<B1>());
    }

    #[test]
    fn restart_wins_over_a_same_tick_schedule() {
        let mut machine = build();
        machine.schedule::<B2>();
        machine.change_to::<A2>();
        machine.update();
        assert!(machine.is_active::<A2>());

        // The scheduled history survives for a later resume.
        machine.resume::<Q0>();
        machine.update();
        assert!(machine.is_active::<B2>());
    }

    #[test]
    fn later_requests_override_earlier_ones_within_a_tick() {
        let mut machine = build();
        machine.change_to::<B1>();
        machine.change_to::<A2>();
        machine.update();

        assert!(machine.is_active::<A2>());
        assert!(!machine.is_active::<Q0>());
    }

    #[test]
    fn nested_history_is_per_region() {
        let mut machine = build();
        machine.change_to::<A2>();
        machine.update();
        machine.change_to::<B1>();
        machine.update();

        // Leaving the first region recorded A2; resuming from the root
        // selects that region and its remembered prong.
        machine.resume::<R0>();
        machine.update();
        assert!(machine.is_active::<P0>());
        assert!(machine.is_active::<A2>());
    }
}
