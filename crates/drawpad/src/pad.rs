//! The DrawPad widget handle
//!
//! Owns the reactive graph, the recorder and the playback machine, and exposes
//! the imperative operations a host binds to its toolbar (erase, undo, play,
//! stop, get/set/add paths, SVG export) plus the gesture and frame entry
//! points a host wires to its input and render loops.

use crate::config::DrawPadConfig;
use crate::error::{DrawPadError, Result};
use crate::export::export;
use crate::playback::{Playback, PlaybackSignals, PlaybackState};
use crate::recorder::PathRecorder;
use crate::reveal::{RevealFrame, StrokeReveal};
use crate::stroke::{Stroke, StrokeList};
use crate::style::{StrokeAppearance, StyleConfig};
use drawpad_animation::Easing;
use drawpad_core::events::event_types;
use drawpad_core::{Event, ReactiveGraph, Signal};
use drawpad_paint::{GradientSpec, Point};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Gesture start/end notification
pub type DrawCallback = Box<dyn FnMut() + Send>;

/// Runtime-only wiring: signals shared with the host, gesture callbacks, and
/// an easing curve that cannot be written in a config file.
///
/// Signals left unset are created locally. `easing` replaces the configured
/// curve when set.
#[derive(Default)]
pub struct DrawPadOptions {
    pub path_length: Option<Signal<f32>>,
    pub playing: Option<Signal<bool>>,
    pub signed: Option<Signal<bool>>,
    pub easing: Option<Easing>,
    pub on_draw_start: Option<DrawCallback>,
    pub on_draw_end: Option<DrawCallback>,
}

impl DrawPadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_length(mut self, signal: Signal<f32>) -> Self {
        self.path_length = Some(signal);
        self
    }

    pub fn playing(mut self, signal: Signal<bool>) -> Self {
        self.playing = Some(signal);
        self
    }

    pub fn signed(mut self, signal: Signal<bool>) -> Self {
        self.signed = Some(signal);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn on_draw_start<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_draw_start = Some(Box::new(callback));
        self
    }

    pub fn on_draw_end<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_draw_end = Some(Box::new(callback));
        self
    }
}

/// One committed stroke ready to draw
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStroke {
    pub data: String,
    pub reveal: RevealFrame,
}

/// Signature/annotation canvas
pub struct DrawPad {
    graph: ReactiveGraph,
    recorder: PathRecorder,
    playback: Playback,
    signals: PlaybackSignals,
    style: StyleConfig,
    gradient: Option<GradientSpec>,
    /// Set by the watcher effect when `playing` changes
    playing_changed: Arc<AtomicBool>,
    on_draw_start: Option<DrawCallback>,
    on_draw_end: Option<DrawCallback>,
}

impl DrawPad {
    pub fn new(config: DrawPadConfig) -> Self {
        Self::with_options(ReactiveGraph::new(), config, DrawPadOptions::default())
    }

    /// Build a pad on `graph`, which must own any signals passed in `options`
    pub fn with_options(
        mut graph: ReactiveGraph,
        config: DrawPadConfig,
        options: DrawPadOptions,
    ) -> Self {
        let path_length = options
            .path_length
            .unwrap_or_else(|| graph.create_signal(0.0_f32));
        let playing = options
            .playing
            .unwrap_or_else(|| graph.create_signal(false));
        let signed = options.signed.unwrap_or_else(|| graph.create_signal(false));
        let progress = graph.create_signal(1.0_f32);

        let fixed_duration = config.animation_duration_ms;
        let duration = graph.create_derived(move |g: &ReactiveGraph| {
            fixed_duration.unwrap_or_else(|| g.get(path_length).unwrap_or(0.0) * 2.0)
        });

        let playing_changed = Arc::new(AtomicBool::new(false));
        let flag = playing_changed.clone();
        let mut last: Option<bool> = None;
        graph.create_effect(move |g| {
            let now = g.get(playing).unwrap_or(false);
            if last.replace(now).is_some_and(|before| before != now) {
                flag.store(true, Ordering::Release);
            }
        });

        let recorder = PathRecorder::new(&mut graph, config.curve, path_length);
        let easing = options
            .easing
            .unwrap_or_else(|| config.easing.to_easing());

        Self {
            graph,
            recorder,
            playback: Playback::new(easing),
            signals: PlaybackSignals {
                playing,
                signed,
                progress,
                duration,
            },
            style: config.style(),
            gradient: config.gradient,
            playing_changed,
            on_draw_start: options.on_draw_start,
            on_draw_end: options.on_draw_end,
        }
    }

    // =========================================================================
    // Imperative handle
    // =========================================================================

    /// Clear every stroke, including one being drawn
    pub fn erase(&mut self) {
        self.recorder.erase(&mut self.graph);
        tracing::debug!("erased drawing");
    }

    /// Remove the most recent stroke. No-op when empty.
    pub fn undo(&mut self) {
        if let Some(data) = self.recorder.undo(&mut self.graph) {
            tracing::debug!("undid stroke {:?}", data);
        }
    }

    /// Replay the drawing stroke by stroke
    pub fn play(&mut self) {
        self.playback.play(&mut self.graph, &self.signals);
        self.sync();
    }

    pub fn stop(&mut self) {
        self.playback.stop(&mut self.graph, &self.signals);
        self.sync();
    }

    pub fn get_paths(&self) -> Vec<String> {
        self.recorder.paths(&self.graph)
    }

    /// Replace all strokes. Malformed entries are kept and measured as zero.
    pub fn set_paths<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strokes: Vec<Stroke> = paths.into_iter().map(Stroke::new).collect();
        tracing::debug!(count = strokes.len(), "set paths");
        self.recorder.set_strokes(&mut self.graph, strokes);
    }

    /// Replace all strokes, rejecting the input if any entry is malformed
    pub fn try_set_paths<I, S>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let strokes = paths
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                Stroke::parse(data).map_err(|source| DrawPadError::InvalidPath { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        self.recorder.set_strokes(&mut self.graph, strokes);
        Ok(())
    }

    pub fn add_path(&mut self, path: impl Into<String>) {
        self.recorder.add_stroke(&mut self.graph, Stroke::new(path));
    }

    /// Export the committed strokes as an SVG document
    pub fn get_svg(&self) -> String {
        export(&self.get_paths(), &self.style, self.gradient.as_ref())
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub fn pan_start(&mut self, x: f32, y: f32) {
        if let Some(callback) = self.on_draw_start.as_mut() {
            callback();
        }
        self.recorder.start(&mut self.graph, Point::new(x, y));
    }

    pub fn pan_update(&mut self, x: f32, y: f32) {
        if self.recorder.extend(&mut self.graph, Point::new(x, y)) {
            tracing::trace!(x, y, "extend stroke");
        }
    }

    pub fn pan_end(&mut self) {
        if let Some(callback) = self.on_draw_end.as_mut() {
            callback();
        }
        self.recorder.commit(&mut self.graph);
    }

    /// Route a pointer event to the gesture handlers. Returns true if consumed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match (event.event_type, event.position()) {
            (event_types::POINTER_DOWN, Some((x, y))) => {
                self.pan_start(x, y);
                true
            }
            (event_types::POINTER_MOVE, Some((x, y))) if self.recorder.is_active() => {
                self.pan_update(x, y);
                true
            }
            (event_types::POINTER_UP | event_types::POINTER_CANCEL, _)
                if self.recorder.is_active() =>
            {
                self.pan_end();
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Frame driving
    // =========================================================================

    /// Advance playback by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        self.playback.tick(&mut self.graph, &self.signals, dt_ms);
        self.sync();
    }

    /// Apply pending external changes to the `playing` signal
    pub fn sync(&mut self) {
        if self.playing_changed.swap(false, Ordering::AcqRel) {
            self.playback.reconcile(&mut self.graph, &self.signals);
        }
    }

    /// Playback still needs frames
    pub fn is_animating(&self) -> bool {
        self.playback.is_animating()
    }

    // =========================================================================
    // Render queries
    // =========================================================================

    /// Committed strokes with their reveal at the current position
    pub fn render_strokes(&self) -> Vec<RenderStroke> {
        self.render_strokes_at(self.progress())
    }

    /// Committed strokes with their reveal at an arbitrary position
    pub fn render_strokes_at(&self, position: f32) -> Vec<RenderStroke> {
        let reveal = StrokeReveal::new(self.total_length(), position);
        self.graph
            .with(self.recorder.strokes_signal(), |strokes: &StrokeList| {
                strokes
                    .iter()
                    .zip(reveal.frames(strokes, &self.style))
                    .map(|(stroke, frame)| RenderStroke {
                        data: stroke.data().to_string(),
                        reveal: frame,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cached length of each committed stroke
    pub fn stroke_lengths(&self) -> Vec<f32> {
        self.graph
            .with(self.recorder.strokes_signal(), |strokes: &StrokeList| {
                strokes.iter().map(Stroke::length).collect()
            })
            .unwrap_or_default()
    }

    /// Stroke currently being drawn, empty outside a gesture
    pub fn live_path(&self) -> String {
        self.recorder.live_path(&self.graph)
    }

    pub fn appearance(&self) -> StrokeAppearance {
        self.style.appearance(self.gradient.as_ref())
    }

    /// Reveal position in [0, 1]
    pub fn progress(&self) -> f32 {
        self.graph.get(self.signals.progress).unwrap_or(1.0)
    }

    pub fn total_length(&self) -> f32 {
        self.graph.get(self.recorder.total_length_signal()).unwrap_or(0.0)
    }

    /// Re-measure and publish the summed stroke length
    pub fn recompute_length(&mut self) -> f32 {
        self.recorder.recompute_length(&mut self.graph)
    }

    /// Playback duration in milliseconds
    pub fn duration_ms(&self) -> f32 {
        self.graph.get_derived(self.signals.duration).unwrap_or(0.0)
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn is_playing(&self) -> bool {
        self.graph.get(self.signals.playing).unwrap_or(false)
    }

    pub fn set_signed(&mut self, signed: bool) {
        self.graph.set(self.signals.signed, signed);
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn signals(&self) -> PlaybackSignals {
        self.signals
    }

    pub fn path_length_signal(&self) -> Signal<f32> {
        self.recorder.total_length_signal()
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn gradient(&self) -> Option<&GradientSpec> {
        self.gradient.as_ref()
    }

    pub fn graph(&self) -> &ReactiveGraph {
        &self.graph
    }

    /// Mutable graph access for host-owned signals and effects.
    ///
    /// Writes to `playing` take effect on the next [`DrawPad::tick`] or
    /// [`DrawPad::sync`].
    pub fn graph_mut(&mut self) -> &mut ReactiveGraph {
        &mut self.graph
    }
}

impl Default for DrawPad {
    fn default() -> Self {
        Self::new(DrawPadConfig::default())
    }
}
