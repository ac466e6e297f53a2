//! DrawPad Animation System
//!
//! Timed tweens and the frame-driven scheduler that advances them.
//!
//! # Features
//!
//! - **Easing**: CSS-compatible cubic bezier curves plus common presets
//! - **Interpolation**: range remapping with clamp/extend extrapolation
//! - **Timing**: duration-based tweens between two values
//! - **Scheduler**: cancellable one-shot timers and tweens advanced per frame

pub mod easing;
pub mod interpolate;
pub mod scheduler;
pub mod timing;

pub use easing::Easing;
pub use interpolate::{interpolate, Extrapolation};
pub use scheduler::{AnimationScheduler, FrameUpdate, TimerId, TweenId};
pub use timing::Timing;
