//! Duration-based tweens

use crate::easing::Easing;

/// Animates a value from `from` to `to` over a fixed duration
#[derive(Clone, Debug)]
pub struct Timing {
    from: f32,
    to: f32,
    duration_ms: f32,
    easing: Easing,
    elapsed_ms: f32,
    /// Set once the finishing tick has been reported
    completed: bool,
}

impl Timing {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            easing,
            elapsed_ms: 0.0,
            completed: false,
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Linear time progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Advance by `dt_ms`. Returns true on the tick that finishes the tween.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.completed {
            return false;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.completed = self.is_finished();
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_tween_progresses() {
        let mut timing = Timing::new(0.0, 10.0, 100.0, Easing::Linear);
        assert_eq!(timing.value(), 0.0);

        assert!(!timing.tick(50.0));
        assert_eq!(timing.value(), 5.0);

        assert!(timing.tick(60.0));
        assert_eq!(timing.value(), 10.0);
        assert!(!timing.tick(10.0));
    }

    #[test]
    fn reverse_tween() {
        let mut timing = Timing::new(0.8, 0.0, 80.0, Easing::Linear);
        timing.tick(40.0);
        assert!((timing.value() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut timing = Timing::new(1.0, 0.0, 0.0, Easing::DRAW);
        assert_eq!(timing.value(), 0.0);
        assert!(timing.tick(16.0));
        assert!(!timing.tick(16.0));
    }
}
