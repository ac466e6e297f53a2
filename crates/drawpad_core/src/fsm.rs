//! State Machine Runtime
//!
//! Flat state machines keyed by caller-defined state and event types. Each
//! `(state, event)` pair maps to at most one target state; events with no
//! entry for the current state are ignored. Taken transitions are kept as
//! history for debugging.

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Bound shared by state and event identifiers
pub trait FsmKey: Copy + Eq + Hash + Debug + Send + 'static {}

impl<T: Copy + Eq + Hash + Debug + Send + 'static> FsmKey for T {}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: FxHashMap<(S, E), S>,
}

impl<S: FsmKey, E: FsmKey> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: FxHashMap::default(),
        }
    }

    /// Add a transition (from, event, to). A later call for the same
    /// `(from, event)` replaces the earlier target.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.insert((from, event), to);
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: FxHashMap<(S, E), S>,
    /// History of state transitions (for debugging)
    history: Vec<(S, E, S)>,
}

impl<S: FsmKey, E: FsmKey> StateMachine<S, E> {
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    /// Send an event, returning the resulting state.
    ///
    /// Events with no matching transition leave the state unchanged.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;

        let Some(&to_state) = self.transitions.get(&(current, event)) else {
            tracing::trace!(?current, ?event, "fsm: event ignored");
            return current;
        };

        self.current_state = to_state;
        self.history.push((current, event, to_state));
        to_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Pen {
        Up,
        Down,
        Lifted,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Input {
        Press,
        Release,
    }

    fn pen_machine() -> StateMachine<Pen, Input> {
        StateMachine::builder(Pen::Up)
            .on(Pen::Up, Input::Press, Pen::Down)
            .on(Pen::Down, Input::Release, Pen::Up)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = pen_machine();
        assert_eq!(fsm.current_state(), Pen::Up);

        fsm.send(Input::Press);
        assert!(fsm.is_in(Pen::Down));

        fsm.send(Input::Release);
        assert!(fsm.is_in(Pen::Up));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = pen_machine();
        assert_eq!(fsm.send(Input::Release), Pen::Up);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_later_transition_replaces_earlier() {
        let mut fsm = StateMachine::builder(Pen::Down)
            .on(Pen::Down, Input::Release, Pen::Up)
            .on(Pen::Down, Input::Release, Pen::Lifted)
            .build();
        assert_eq!(fsm.send(Input::Release), Pen::Lifted);
    }

    #[test]
    fn test_history() {
        let mut fsm = pen_machine();
        fsm.send(Input::Press);
        fsm.send(Input::Press);
        fsm.send(Input::Release);

        assert_eq!(
            fsm.history(),
            &[
                (Pen::Up, Input::Press, Pen::Down),
                (Pen::Down, Input::Release, Pen::Up)
            ]
        );
    }
}
