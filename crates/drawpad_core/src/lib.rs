//! DrawPad Core Runtime
//!
//! Foundational primitives shared by the DrawPad crates:
//!
//! - **Reactive Signals**: typed mutable cells with synchronous change notification
//! - **State Machines**: small typed state machines for widget modes
//! - **Pointer Events**: platform-agnostic pointer input fed to the canvas
//!
//! # Example
//!
//! ```rust
//! use drawpad_core::reactive::ReactiveGraph;
//!
//! let mut graph = ReactiveGraph::new();
//!
//! // Create a signal
//! let length = graph.create_signal(0.0f32);
//!
//! // Create a derived value
//! let duration = graph.create_derived(move |g| g.get(length).unwrap_or(0.0) * 2.0);
//!
//! // Update the signal
//! graph.set(length, 120.0);
//! assert_eq!(graph.get_derived(duration), Some(240.0));
//! ```

pub mod events;
pub mod fsm;
pub mod reactive;

pub use events::{Event, EventData, EventType};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use reactive::{Derived, DerivedId, Effect, EffectId, ReactiveGraph, Signal, SignalId};
