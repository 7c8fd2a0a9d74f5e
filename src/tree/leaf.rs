//! Leaf node: wraps a single user state.
//!
//! Region heads reuse this wrapper, so every state in the tree funnels its
//! callbacks through one place: record to the logger, run the hook, run the
//! callback.

use crate::core::{Control, State, StateId};
use crate::log::{Method, Sink};

pub(crate) struct Leaf<C, E> {
    pub(crate) id: StateId,
    pub(crate) name: &'static str,
    state: Box<dyn State<C, E>>,
}

impl<C: 'static, E: 'static> Leaf<C, E> {
    pub(crate) fn new(id: StateId, name: &'static str, state: Box<dyn State<C, E>>) -> Self {
        Self { id, name, state }
    }

    pub(crate) fn substitute(&mut self, control: &mut Control<'_>, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::Substitute);
        self.state.pre_substitute(context);
        self.state.substitute(control, context);
    }

    pub(crate) fn enter(&mut self, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::Enter);
        self.state.pre_enter(context);
        self.state.enter(context);
    }

    pub(crate) fn update(&mut self, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::Update);
        self.state.pre_update(context);
        self.state.update(context);
    }

    pub(crate) fn transition(&mut self, control: &mut Control<'_>, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::Transition);
        self.state.pre_transition(context);
        self.state.transition(control, context);
    }

    pub(crate) fn react(&mut self, event: &E, control: &mut Control<'_>, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::React);
        self.state.pre_react(event, context);
        self.state.react(event, control, context);
    }

    pub(crate) fn leave(&mut self, context: &mut C, sink: &mut Sink<'_>) {
        sink.record(self.id, self.name, Method::Leave);
        self.state.leave(context);
        self.state.post_leave(context);
    }
}
