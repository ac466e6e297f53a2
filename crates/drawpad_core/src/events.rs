//! Pointer events
//!
//! Platform-agnostic pointer input. Platform layers translate touch, pen and
//! mouse input into [`Event`]s and feed them to the canvas.

/// Event type identifier
pub type EventType = u32;

/// Pointer event types understood by the canvas
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Gesture interrupted by the platform (e.g. system gesture took over)
    pub const POINTER_CANCEL: EventType = 8;
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: u64, // Widget ID
    pub data: EventData,
    pub timestamp: u64,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        x: f32,
        y: f32,
        button: u8,
        pressure: f32,
    },
    None,
}

impl Event {
    /// Build a pointer event of the given type at `(x, y)` in canvas space
    pub fn pointer(event_type: EventType, x: f32, y: f32) -> Self {
        Self {
            event_type,
            target: 0,
            data: EventData::Pointer {
                x,
                y,
                button: 0,
                pressure: 1.0,
            },
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    pub fn with_target(mut self, target: u64) -> Self {
        self.target = target;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Pointer position, if this is a pointer event
    pub fn position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y, .. } => Some((x, y)),
            EventData::None => None,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_event_carries_position() {
        let event = Event::pointer(event_types::POINTER_MOVE, 4.0, 9.5).with_target(7);
        assert_eq!(event.position(), Some((4.0, 9.5)));
        assert_eq!(event.target, 7);
    }

    #[test]
    fn non_pointer_event_has_no_position() {
        let event = Event {
            event_type: event_types::POINTER_CANCEL,
            target: 0,
            data: EventData::None,
            timestamp: 0,
            propagation_stopped: false,
        };
        assert_eq!(event.position(), None);
    }
}
