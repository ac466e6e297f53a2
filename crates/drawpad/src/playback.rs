//! Replay state machine
//!
//! ```text
//!          Play              Stop
//!   Idle ───────▶ Playing ───────▶ Stopping
//!    ▲               ▲                 │
//!    │               └──── Play ───────┤
//!    └──────────── Finished ───────────┘
//! ```
//!
//! The `playing` signal is the source of truth. [`Playback::reconcile`] moves
//! the machine to match it, so writes from outside the widget drive the same
//! transitions as [`Playback::play`] and [`Playback::stop`].

use drawpad_animation::{AnimationScheduler, Easing, TimerId, Timing, TweenId};
use drawpad_core::{Derived, ReactiveGraph, Signal, StateMachine};

/// Positions above this are treated as already fully revealed when stopping
const FULLY_REVEALED: f32 = 0.999;

/// Duration of the snap back after a signed or complete playback
const SNAP_MS: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    Idle,
    Playing,
    Stopping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    Play,
    Stop,
    Finished,
}

/// Reactive inputs and outputs of playback
#[derive(Clone, Copy, Debug)]
pub struct PlaybackSignals {
    pub playing: Signal<bool>,
    pub signed: Signal<bool>,
    /// Reveal position, 1.0 when idle
    pub progress: Signal<f32>,
    /// Playback duration in milliseconds
    pub duration: Derived<f32>,
}

/// Drives the reveal position through play and stop
pub struct Playback {
    fsm: StateMachine<PlaybackState, PlaybackEvent>,
    scheduler: AnimationScheduler,
    easing: Easing,
    tween: Option<TweenId>,
    auto_stop: Option<TimerId>,
}

impl Playback {
    pub fn new(easing: Easing) -> Self {
        let fsm = StateMachine::builder(PlaybackState::Idle)
            .on(PlaybackState::Idle, PlaybackEvent::Play, PlaybackState::Playing)
            .on(PlaybackState::Stopping, PlaybackEvent::Play, PlaybackState::Playing)
            .on(PlaybackState::Playing, PlaybackEvent::Stop, PlaybackState::Stopping)
            .on(PlaybackState::Stopping, PlaybackEvent::Finished, PlaybackState::Idle)
            .build();

        Self {
            fsm,
            scheduler: AnimationScheduler::new(),
            easing,
            tween: None,
            auto_stop: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.fsm.current_state()
    }

    /// Transitions taken so far
    pub fn history(&self) -> &[(PlaybackState, PlaybackEvent, PlaybackState)] {
        self.fsm.history()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    pub fn auto_stop_pending(&self) -> bool {
        self.auto_stop
            .is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// A tween or timer still needs frames
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
    }

    /// Start playback. Returns false when already playing or there is nothing
    /// to play.
    pub fn play(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals) -> bool {
        if graph.get(signals.playing).unwrap_or(false) || self.auto_stop_pending() {
            return false;
        }
        let duration = graph.get_derived(signals.duration).unwrap_or(0.0);
        if !(duration.is_finite() && duration > 0.0) {
            tracing::debug!(duration, "play ignored: nothing to play");
            return false;
        }

        self.auto_stop = Some(self.scheduler.set_timeout(duration));
        graph.set(signals.playing, true);
        self.reconcile(graph, signals);
        true
    }

    /// Stop playback. Cancels the auto-stop before clearing `playing`.
    pub fn stop(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals) {
        self.cancel_auto_stop();
        graph.set(signals.playing, false);
        self.reconcile(graph, signals);
    }

    /// Bring the state machine in line with the `playing` signal
    pub fn reconcile(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals) {
        let playing = graph.get(signals.playing).unwrap_or(false);
        match (playing, self.state()) {
            (true, PlaybackState::Idle | PlaybackState::Stopping) => self.begin(graph, signals),
            (false, PlaybackState::Playing) => self.end(graph, signals),
            _ => {}
        }
    }

    /// Advance the reveal by `dt_ms`
    pub fn tick(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals, dt_ms: f32) {
        let update = self.scheduler.tick(dt_ms);

        if let Some(id) = self.tween {
            if let Some(value) = self.scheduler.tween_value(id) {
                graph.set(signals.progress, value);
            }
            if update.tween_finished(id) {
                self.scheduler.remove_tween(id);
                self.tween = None;
                if self.state() == PlaybackState::Stopping {
                    graph.set(signals.progress, 1.0);
                    self.fsm.send(PlaybackEvent::Finished);
                    tracing::debug!("playback finished");
                }
            }
        }

        if let Some(id) = self.auto_stop {
            if update.timer_fired(id) {
                self.auto_stop = None;
                tracing::debug!("auto-stop fired");
                graph.set(signals.playing, false);
            }
        }

        self.reconcile(graph, signals);
    }

    fn begin(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals) {
        let duration = graph.get_derived(signals.duration).unwrap_or(0.0).max(0.0);
        self.fsm.send(PlaybackEvent::Play);
        graph.set(signals.progress, 0.0);
        self.replace_tween(Timing::new(0.0, 1.0, duration, self.easing));
        tracing::debug!(duration, "playback started");
    }

    fn end(&mut self, graph: &mut ReactiveGraph, signals: &PlaybackSignals) {
        self.cancel_auto_stop();
        let position = graph.get(signals.progress).unwrap_or(1.0);
        let signed = graph.get(signals.signed).unwrap_or(false);
        let duration = if signed || position > FULLY_REVEALED {
            SNAP_MS
        } else {
            let total = graph.get_derived(signals.duration).unwrap_or(0.0);
            (position * total).max(SNAP_MS)
        };

        self.fsm.send(PlaybackEvent::Stop);
        self.replace_tween(Timing::new(position, 0.0, duration, self.easing));
        tracing::debug!(position, duration, signed, "playback stopping");
    }

    fn replace_tween(&mut self, timing: Timing) {
        if let Some(id) = self.tween.take() {
            self.scheduler.remove_tween(id);
        }
        self.tween = Some(self.scheduler.add_tween(timing));
    }

    fn cancel_auto_stop(&mut self) {
        if let Some(id) = self.auto_stop.take() {
            self.scheduler.cancel_timeout(id);
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Easing::DRAW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(length: f32) -> (ReactiveGraph, PlaybackSignals, Signal<f32>) {
        let mut g = ReactiveGraph::new();
        let length_signal = g.create_signal(length);
        let signals = PlaybackSignals {
            playing: g.create_signal(false),
            signed: g.create_signal(false),
            progress: g.create_signal(1.0_f32),
            duration: g.create_derived(move |g: &ReactiveGraph| {
                g.get(length_signal).unwrap_or(0.0) * 2.0
            }),
        };
        (g, signals, length_signal)
    }

    #[test]
    fn play_runs_to_completion_and_resets() {
        let (mut g, s, _) = setup(50.0);
        let mut playback = Playback::new(Easing::Linear);

        assert!(playback.play(&mut g, &s));
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(g.get(s.progress), Some(0.0));

        playback.tick(&mut g, &s, 50.0);
        assert!((g.get(s.progress).unwrap() - 0.5).abs() < 1e-5);

        // Tween and auto-stop both land at 100ms; stop snaps back in 1ms
        playback.tick(&mut g, &s, 50.0);
        assert_eq!(g.get(s.playing), Some(false));
        assert_eq!(playback.state(), PlaybackState::Stopping);

        playback.tick(&mut g, &s, 1.0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(g.get(s.progress), Some(1.0));
        assert!(!playback.is_animating());
    }

    #[test]
    fn double_play_schedules_one_timer() {
        let (mut g, s, _) = setup(10.0);
        let mut playback = Playback::default();
        assert!(playback.play(&mut g, &s));
        assert!(!playback.play(&mut g, &s));
        assert_eq!(playback.pending_timers(), 1);
    }

    #[test]
    fn play_without_length_is_noop() {
        let (mut g, s, _) = setup(0.0);
        let mut playback = Playback::default();
        assert!(!playback.play(&mut g, &s));
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(g.get(s.playing), Some(false));
    }

    #[test]
    fn stop_midway_rewinds_proportionally() {
        let (mut g, s, _) = setup(50.0);
        let mut playback = Playback::new(Easing::Linear);
        playback.play(&mut g, &s);
        playback.tick(&mut g, &s, 50.0);

        playback.stop(&mut g, &s);
        assert_eq!(playback.pending_timers(), 0);
        assert_eq!(playback.state(), PlaybackState::Stopping);

        // 0.5 * 100ms rewind
        playback.tick(&mut g, &s, 25.0);
        assert_eq!(playback.state(), PlaybackState::Stopping);
        playback.tick(&mut g, &s, 25.0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(g.get(s.progress), Some(1.0));
    }

    #[test]
    fn signed_stop_snaps() {
        let (mut g, s, _) = setup(50.0);
        let mut playback = Playback::new(Easing::Linear);
        playback.play(&mut g, &s);
        playback.tick(&mut g, &s, 20.0);

        g.set(s.signed, true);
        playback.stop(&mut g, &s);
        playback.tick(&mut g, &s, 1.0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(g.get(s.progress), Some(1.0));
    }

    #[test]
    fn external_playing_flag_is_reconciled() {
        let (mut g, s, _) = setup(50.0);
        let mut playback = Playback::new(Easing::Linear);

        g.set(s.playing, true);
        playback.tick(&mut g, &s, 0.0);
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(g.get(s.progress), Some(0.0));

        g.set(s.playing, false);
        playback.reconcile(&mut g, &s);
        assert_eq!(playback.state(), PlaybackState::Stopping);
    }

    #[test]
    fn replay_from_stopping() {
        let (mut g, s, _) = setup(50.0);
        let mut playback = Playback::new(Easing::Linear);
        playback.play(&mut g, &s);
        playback.tick(&mut g, &s, 40.0);
        playback.stop(&mut g, &s);

        assert!(playback.play(&mut g, &s));
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(g.get(s.progress), Some(0.0));
        let events: Vec<PlaybackEvent> = playback.history().iter().map(|(_, e, _)| *e).collect();
        assert_eq!(
            events,
            vec![PlaybackEvent::Play, PlaybackEvent::Stop, PlaybackEvent::Play]
        );
    }
}
