//! Animation scheduler
//!
//! Owns one-shot timers and tweens and advances them each frame. Time only
//! moves when the host calls [`AnimationScheduler::tick`] (or
//! [`AnimationScheduler::tick_now`]), which keeps playback deterministic
//! under test.

use crate::timing::Timing;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Instant;

new_key_type! {
    pub struct TimerId;
    pub struct TweenId;
}

/// A pending one-shot timer
struct Timer {
    due_ms: f64,
}

/// What happened during one [`AnimationScheduler::tick`]
#[derive(Debug, Default)]
pub struct FrameUpdate {
    /// Timers that reached their deadline (and were removed)
    pub fired: SmallVec<[TimerId; 2]>,
    /// Tweens that finished on this frame (they stay readable until removed)
    pub finished: SmallVec<[TweenId; 2]>,
}

impl FrameUpdate {
    pub fn timer_fired(&self, id: TimerId) -> bool {
        self.fired.contains(&id)
    }

    pub fn tween_finished(&self, id: TweenId) -> bool {
        self.finished.contains(&id)
    }
}

/// The animation scheduler that ticks all active timers and tweens
pub struct AnimationScheduler {
    timers: SlotMap<TimerId, Timer>,
    tweens: SlotMap<TweenId, Timing>,
    /// Scheduler-local clock in milliseconds
    clock_ms: f64,
    last_frame: Instant,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            tweens: SlotMap::with_key(),
            clock_ms: 0.0,
            last_frame: Instant::now(),
        }
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Schedule a timer that fires once `delay_ms` from now
    pub fn set_timeout(&mut self, delay_ms: f32) -> TimerId {
        let due_ms = self.clock_ms + delay_ms.max(0.0) as f64;
        self.timers.insert(Timer { due_ms })
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel_timeout(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // =========================================================================
    // Tweens
    // =========================================================================

    pub fn add_tween(&mut self, tween: Timing) -> TweenId {
        self.tweens.insert(tween)
    }

    pub fn tween(&self, id: TweenId) -> Option<&Timing> {
        self.tweens.get(id)
    }

    pub fn tween_value(&self, id: TweenId) -> Option<f32> {
        self.tweens.get(id).map(Timing::value)
    }

    pub fn remove_tween(&mut self, id: TweenId) -> Option<Timing> {
        self.tweens.remove(id)
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    // =========================================================================
    // Frame driving
    // =========================================================================

    /// Advance all tweens and timers by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) -> FrameUpdate {
        let dt_ms = dt_ms.max(0.0);
        self.clock_ms += dt_ms as f64;

        let mut update = FrameUpdate::default();

        for (id, tween) in self.tweens.iter_mut() {
            if tween.tick(dt_ms) {
                update.finished.push(id);
            }
        }

        let clock = self.clock_ms;
        self.timers.retain(|id, timer| {
            if timer.due_ms <= clock {
                update.fired.push(id);
                false
            } else {
                true
            }
        });

        if !update.fired.is_empty() {
            tracing::trace!(fired = update.fired.len(), clock_ms = clock, "timers fired");
        }

        update
    }

    /// Advance by the wall-clock time elapsed since the previous call
    pub fn tick_now(&mut self) -> FrameUpdate {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.tick(dt)
    }

    /// Check if any tween is still running or any timer is pending
    pub fn has_active_animations(&self) -> bool {
        !self.timers.is_empty() || self.tweens.iter().any(|(_, t)| !t.is_finished())
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
