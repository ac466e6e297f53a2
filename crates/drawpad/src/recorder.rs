//! Gesture to path recording
//!
//! A gesture starts a live stroke, extends it point by point, and on end
//! commits it to the stroke list. Commit is a single batched update: observers
//! never see the new stroke without the cleared live path and the new total
//! length.

use crate::stroke::{Stroke, StrokeList};
use drawpad_core::{ReactiveGraph, Signal};
use drawpad_paint::{format_number, Point};
use serde::{Deserialize, Serialize};

/// How successive gesture points are joined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    /// `L x y` per point
    #[default]
    Linear,
    /// `Q px py mx my`: quadratic through the previous point to the midpoint
    Smooth,
}

/// Records pointer gestures into committed strokes held in reactive signals
#[derive(Debug)]
pub struct PathRecorder {
    mode: CurveMode,
    strokes: Signal<StrokeList>,
    live: Signal<String>,
    total_length: Signal<f32>,
    previous: Option<Point>,
    active: bool,
}

impl PathRecorder {
    /// Create a recorder whose total stroke length is published to `total_length`
    pub fn new(graph: &mut ReactiveGraph, mode: CurveMode, total_length: Signal<f32>) -> Self {
        Self {
            mode,
            strokes: graph.create_signal(StrokeList::new()),
            live: graph.create_signal(String::new()),
            total_length,
            previous: None,
            active: false,
        }
    }

    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    pub fn strokes_signal(&self) -> Signal<StrokeList> {
        self.strokes
    }

    pub fn live_signal(&self) -> Signal<String> {
        self.live
    }

    pub fn total_length_signal(&self) -> Signal<f32> {
        self.total_length
    }

    /// A gesture is in progress
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a stroke at `point`, discarding any uncommitted live stroke
    pub fn start(&mut self, graph: &mut ReactiveGraph, point: Point) {
        self.active = true;
        self.previous = Some(point);
        graph.set(
            self.live,
            format!("M {} {}", format_number(point.x), format_number(point.y)),
        );
    }

    /// Append `point` to the live stroke. Ignored without an active gesture.
    pub fn extend(&mut self, graph: &mut ReactiveGraph, point: Point) -> bool {
        if !self.active {
            return false;
        }
        let segment = match (self.mode, self.previous) {
            (CurveMode::Smooth, Some(prev)) => {
                let mid = prev.midpoint(point);
                format!(
                    " Q {} {} {} {}",
                    format_number(prev.x),
                    format_number(prev.y),
                    format_number(mid.x),
                    format_number(mid.y)
                )
            }
            _ => format!(" L {} {}", format_number(point.x), format_number(point.y)),
        };
        self.previous = Some(point);
        graph.update(self.live, |live| {
            live.push_str(&segment);
        });
        true
    }

    /// End the gesture and commit the live stroke. Returns the committed data.
    pub fn commit(&mut self, graph: &mut ReactiveGraph) -> Option<String> {
        let was_active = std::mem::replace(&mut self.active, false);
        self.previous = None;
        if !was_active {
            return None;
        }

        let data = graph.get(self.live).unwrap_or_default();
        if data.is_empty() {
            return None;
        }

        let stroke = Stroke::new(data.clone());
        let live = self.live;
        self.mutate(graph, move |g, list| {
            list.push(stroke);
            g.set(live, String::new());
        });
        tracing::debug!("committed stroke {:?}", data);
        Some(data)
    }

    /// Remove every stroke and any live stroke
    pub fn erase(&mut self, graph: &mut ReactiveGraph) {
        self.active = false;
        self.previous = None;
        let live = self.live;
        self.mutate(graph, move |g, list| {
            list.clear();
            g.set(live, String::new());
        });
    }

    /// Remove the most recently committed stroke
    pub fn undo(&mut self, graph: &mut ReactiveGraph) -> Option<String> {
        self.mutate(graph, |_, list| list.pop())
            .flatten()
            .map(|stroke| stroke.data().to_string())
    }

    /// Replace all committed strokes
    pub fn set_strokes(&mut self, graph: &mut ReactiveGraph, strokes: Vec<Stroke>) {
        self.mutate(graph, move |_, list| list.replace(strokes));
    }

    /// Append one committed stroke
    pub fn add_stroke(&mut self, graph: &mut ReactiveGraph, stroke: Stroke) {
        self.mutate(graph, move |_, list| list.push(stroke));
    }

    /// Committed path data in order
    pub fn paths(&self, graph: &ReactiveGraph) -> Vec<String> {
        graph
            .with(self.strokes, StrokeList::paths)
            .unwrap_or_default()
    }

    /// The live stroke, empty when no gesture is recording
    pub fn live_path(&self, graph: &ReactiveGraph) -> String {
        graph.get(self.live).unwrap_or_default()
    }

    /// Re-publish the summed stroke length
    pub fn recompute_length(&self, graph: &mut ReactiveGraph) -> f32 {
        let total = graph
            .with(self.strokes, StrokeList::total_length)
            .unwrap_or(0.0);
        graph.set(self.total_length, total);
        total
    }

    /// Mutate the stroke list and publish the new total length as one update
    fn mutate<R>(
        &self,
        graph: &mut ReactiveGraph,
        f: impl FnOnce(&mut ReactiveGraph, &mut StrokeList) -> R,
    ) -> Option<R> {
        let strokes = self.strokes;
        let total_length = self.total_length;
        graph.batch(move |g| {
            let mut list = g.with(strokes, StrokeList::clone)?;
            let result = f(g, &mut list);
            let total = list.total_length();
            g.set(strokes, list);
            g.set(total_length, total);
            Some(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(mode: CurveMode) -> (ReactiveGraph, PathRecorder) {
        let mut graph = ReactiveGraph::new();
        let length = graph.create_signal(0.0_f32);
        let recorder = PathRecorder::new(&mut graph, mode, length);
        (graph, recorder)
    }

    #[test]
    fn linear_gesture_commits_one_stroke() {
        let (mut g, mut rec) = recorder(CurveMode::Linear);
        rec.start(&mut g, Point::new(0.0, 0.0));
        rec.extend(&mut g, Point::new(10.0, 0.0));
        assert_eq!(rec.live_path(&g), "M 0 0 L 10 0");

        assert_eq!(rec.commit(&mut g).as_deref(), Some("M 0 0 L 10 0"));
        assert_eq!(rec.paths(&g), vec!["M 0 0 L 10 0"]);
        assert_eq!(rec.live_path(&g), "");
        assert_eq!(g.get(rec.total_length_signal()), Some(10.0));
        assert!(!rec.is_active());
    }

    #[test]
    fn smooth_gesture_uses_quadratic_midpoints() {
        let (mut g, mut rec) = recorder(CurveMode::Smooth);
        rec.start(&mut g, Point::new(0.0, 0.0));
        rec.extend(&mut g, Point::new(10.0, 0.0));
        rec.extend(&mut g, Point::new(10.0, 10.0));
        assert_eq!(rec.live_path(&g), "M 0 0 Q 0 0 5 0 Q 10 0 10 5");
    }

    #[test]
    fn extend_without_start_is_ignored() {
        let (mut g, mut rec) = recorder(CurveMode::Linear);
        assert!(!rec.extend(&mut g, Point::new(1.0, 1.0)));
        assert_eq!(rec.commit(&mut g), None);
        assert!(rec.paths(&g).is_empty());
    }

    #[test]
    fn commit_is_a_single_update() {
        let (mut g, mut rec) = recorder(CurveMode::Linear);
        let strokes = rec.strokes_signal();
        let live = rec.live_signal();
        let length = rec.total_length_signal();

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        g.create_effect(move |g| {
            let count = g.with(strokes, StrokeList::len).unwrap_or(0);
            let live_empty = g.with(live, String::is_empty).unwrap_or(true);
            let total = g.get(length).unwrap_or(0.0);
            sink.lock().unwrap().push((count, live_empty, total));
        });

        rec.start(&mut g, Point::new(0.0, 0.0));
        rec.extend(&mut g, Point::new(10.0, 0.0));
        seen.lock().unwrap().clear();

        rec.commit(&mut g);
        assert_eq!(*seen.lock().unwrap(), vec![(1, true, 10.0)]);
    }

    #[test]
    fn erase_drops_live_stroke() {
        let (mut g, mut rec) = recorder(CurveMode::Linear);
        rec.add_stroke(&mut g, Stroke::new("M 0 0 L 5 0"));
        rec.start(&mut g, Point::new(1.0, 1.0));
        rec.extend(&mut g, Point::new(2.0, 2.0));

        rec.erase(&mut g);
        assert!(rec.paths(&g).is_empty());
        assert_eq!(rec.live_path(&g), "");
        assert_eq!(rec.commit(&mut g), None);
        assert_eq!(g.get(rec.total_length_signal()), Some(0.0));
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let (mut g, mut rec) = recorder(CurveMode::Linear);
        assert_eq!(rec.undo(&mut g), None);
        rec.set_strokes(&mut g, vec![Stroke::new("M 0 0 L 1 0"), Stroke::new("M 0 0 L 2 0")]);
        assert_eq!(rec.undo(&mut g).as_deref(), Some("M 0 0 L 2 0"));
        assert_eq!(g.get(rec.total_length_signal()), Some(1.0));
    }
}
