//! Structured logger sink for lifecycle callbacks.
//!
//! A logger observes every lifecycle invocation on every state, recorded
//! just before the callback runs. Attach one at build time through
//! [`MachineBuilder::logger`](crate::MachineBuilder::logger) or later with
//! [`Machine::attach_logger`](crate::Machine::attach_logger).

use serde::{Deserialize, Serialize};

use crate::core::StateId;

/// Which lifecycle callback is about to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Substitute,
    Enter,
    Update,
    Transition,
    React,
    Leave,
}

impl Method {
    /// Lowercase callback name, matching the `State` trait method.
    pub fn name(self) -> &'static str {
        match self {
            Method::Substitute => "substitute",
            Method::Enter => "enter",
            Method::Update => "update",
            Method::Transition => "transition",
            Method::React => "react",
            Method::Leave => "leave",
        }
    }
}

/// Sink receiving one record per lifecycle invocation.
pub trait Logger {
    /// Called at most once per callback invocation, before the callback.
    fn record(&mut self, state: StateId, state_name: &'static str, method: Method);
}

/// Nullable logger handle threaded through the tree traversal.
pub(crate) struct Sink<'a> {
    logger: Option<&'a mut (dyn Logger + 'static)>,
}

impl<'a> Sink<'a> {
    pub(crate) fn new(logger: Option<&'a mut (dyn Logger + 'static)>) -> Self {
        Self { logger }
    }

    pub(crate) fn record(&mut self, state: StateId, state_name: &'static str, method: Method) {
        if let Some(logger) = self.logger.as_mut() {
            logger.record(state, state_name, method);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_match_callbacks() {
        assert_eq!(Method::Substitute.name(), "substitute");
        assert_eq!(Method::Enter.name(), "enter");
        assert_eq!(Method::Update.name(), "update");
        assert_eq!(Method::Transition.name(), "transition");
        assert_eq!(Method::React.name(), "react");
        assert_eq!(Method::Leave.name(), "leave");
    }

    #[test]
    fn detached_sink_ignores_records() {
        let mut sink = Sink::new(None);
        sink.record(StateId(0), "Anything", Method::Enter);
    }

    #[test]
    fn attached_sink_forwards_records() {
        struct Recorder(Vec<(&'static str, Method)>);

        impl Logger for Recorder {
            fn record(&mut self, _state: StateId, state_name: &'static str, method: Method) {
                self.0.push((state_name, method));
            }
        }

        let mut recorder = Recorder(Vec::new());
        {
            let mut sink = Sink::new(Some(&mut recorder));
            sink.record(StateId(1), "Swimming", Method::Update);
        }
        assert_eq!(recorder.0, vec![("Swimming", Method::Update)]);
    }
}
