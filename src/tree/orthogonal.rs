//! Orthogonal node: AND region, all children active together.

use crate::core::{Control, Fork, ForkId, RequestKind};
use crate::log::Sink;
use crate::tree::{Leaf, Node};

pub(crate) struct Orthogonal<C, E> {
    pub(crate) fork: ForkId,
    pub(crate) head: Leaf<C, E>,
    pub(crate) children: Vec<Node<C, E>>,
}

impl<C: 'static, E: 'static> Orthogonal<C, E> {
    pub(crate) fn deep_enter_initial(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        self.head.enter(context, sink);
        for child in &mut self.children {
            child.deep_enter_initial(forks, context, sink);
        }
    }

    pub(crate) fn deep_enter(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        // The routing mark, if any, has served its purpose by now.
        forks[self.fork.index()].requested = None;
        self.head.enter(context, sink);
        for child in &mut self.children {
            child.deep_enter(forks, context, sink);
        }
    }

    pub(crate) fn deep_forward_substitute(
        &mut self,
        forks: &mut [Fork],
        control: &mut Control<'_>,
        context: &mut C,
        sink: &mut Sink<'_>,
    ) {
        if let Some(prong) = forks[self.fork.index()].requested {
            self.children[prong as usize].deep_forward_substitute(forks, control, context, sink);
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
        for child in &mut self.children {
            child.deep_substitute(forks, control, context, sink);
        }
    }

    pub(crate) fn deep_update(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        self.head.update(context, sink);
        for child in &mut self.children {
            child.deep_update(forks, context, sink);
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
        for child in &mut self.children {
            child.deep_transition(forks, control, context, sink);
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
        for child in &mut self.children {
            child.deep_react(event, forks, control, context, sink);
        }
    }

    pub(crate) fn deep_leave(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        for child in self.children.iter_mut().rev() {
            child.deep_leave(forks, context, sink);
        }
        self.head.leave(context, sink);
    }

    pub(crate) fn deep_forward_request(&mut self, forks: &mut [Fork], kind: RequestKind) {
        match forks[self.fork.index()].requested {
            Some(target) => {
                // Route into the child owning the target; siblings stage a
                // remain so a fresh entry of the whole region stays valid.
                for (index, child) in self.children.iter_mut().enumerate() {
                    if index == target as usize {
                        child.deep_forward_request(forks, kind);
                    } else {
                        child.deep_request_remain(forks);
                    }
                }
            }
            None => match kind {
                RequestKind::Remain => self.deep_request_remain(forks),
                RequestKind::Restart => self.deep_request_restart(forks),
                RequestKind::Resume => self.deep_request_resume(forks),
                RequestKind::Schedule => debug_assert!(false, "schedule requests are never forwarded"),
            },
        }
    }

    pub(crate) fn deep_request_remain(&mut self, forks: &mut [Fork]) {
        for child in &mut self.children {
            child.deep_request_remain(forks);
        }
    }

    pub(crate) fn deep_request_restart(&mut self, forks: &mut [Fork]) {
        for child in &mut self.children {
            child.deep_request_restart(forks);
        }
    }

    pub(crate) fn deep_request_resume(&mut self, forks: &mut [Fork]) {
        for child in &mut self.children {
            child.deep_request_resume(forks);
        }
    }

    pub(crate) fn deep_change_to_requested(&mut self, forks: &mut [Fork], context: &mut C, sink: &mut Sink<'_>) {
        forks[self.fork.index()].requested = None;
        for child in &mut self.children {
            child.deep_change_to_requested(forks, context, sink);
        }
    }
}
