//! Reactive signals
//!
//! A small push-based reactive graph:
//!
//! - [`Signal`]: a typed mutable cell. Writes are synchronous and every read
//!   sees the latest value.
//! - [`Derived`]: a value computed from signals (or other derived values). It
//!   is recomputed eagerly whenever one of its sources changes, so a stale
//!   derived value is never observable.
//! - [`Effect`]: a side-effecting observer. Effects run once on creation and
//!   again after each change to a source they read. Inside [`ReactiveGraph::batch`]
//!   effects are deferred until the outermost batch ends and run at most once.
//!
//! Dependencies are tracked automatically: whatever a derived computation or an
//! effect reads through the graph becomes one of its sources.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

new_key_type! {
    /// Untyped identifier of a signal
    pub struct SignalId;
    /// Untyped identifier of a derived value
    pub struct DerivedId;
    /// Identifier of an effect
    pub struct EffectId;
}

type AnyValue = Box<dyn Any + Send>;
type ComputeFn = Arc<dyn Fn(&ReactiveGraph) -> AnyValue + Send + Sync>;
type EffectFn = Box<dyn FnMut(&ReactiveGraph) + Send>;

/// Typed handle to a signal stored in a [`ReactiveGraph`]
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Signal<T> {
    pub fn id(&self) -> SignalId {
        self.id
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Signal<T> {}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.id).finish()
    }
}

/// Typed handle to a derived value stored in a [`ReactiveGraph`]
pub struct Derived<T> {
    id: DerivedId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Derived<T> {
    pub fn id(&self) -> DerivedId {
        self.id
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Derived<T> {}

impl<T> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.id).finish()
    }
}

/// Handle to a registered effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn id(&self) -> EffectId {
        self.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Source {
    Signal(SignalId),
    Derived(DerivedId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Subscriber {
    Derived(DerivedId),
    Effect(EffectId),
}

type Sources = SmallVec<[Source; 4]>;
type Subscribers = SmallVec<[Subscriber; 4]>;

struct SignalNode {
    value: AnyValue,
    version: u64,
    subscribers: Subscribers,
}

struct DerivedNode {
    compute: ComputeFn,
    value: AnyValue,
    sources: Sources,
    subscribers: Subscribers,
    /// Creation order; sources are always created before their dependents
    order: u64,
}

struct EffectNode {
    /// Taken out while the effect runs
    run: Option<EffectFn>,
    sources: Sources,
}

/// The reactive graph owning all signals, derived values and effects
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    derived: SlotMap<DerivedId, DerivedNode>,
    effects: SlotMap<EffectId, EffectNode>,
    /// Sources read by the computation currently being tracked
    tracking: RefCell<Option<Sources>>,
    batch_depth: u32,
    pending_effects: Vec<EffectId>,
    next_order: u64,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            derived: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            tracking: RefCell::new(None),
            batch_depth: 0,
            pending_effects: Vec::new(),
            next_order: 0,
        }
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Create a new signal holding `value`
    pub fn create_signal<T: Send + 'static>(&mut self, value: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(value),
            version: 0,
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Read a signal, cloning its value
    ///
    /// Returns `None` if the signal has been disposed.
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.with(signal, T::clone)
    }

    /// Read a signal by reference
    pub fn with<T: 'static, R>(&self, signal: Signal<T>, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.record(Source::Signal(signal.id));
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>())
            .map(f)
    }

    /// Number of writes the signal has received
    pub fn version<T>(&self, signal: Signal<T>) -> Option<u64> {
        self.signals.get(signal.id).map(|node| node.version)
    }

    /// Write a signal and notify its subscribers
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return;
        };
        node.value = Box::new(value);
        node.version += 1;
        self.propagate(Source::Signal(signal.id));
    }

    /// Mutate a signal in place and notify its subscribers
    pub fn update<T: 'static, R>(
        &mut self,
        signal: Signal<T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let node = self.signals.get_mut(signal.id)?;
        let value = node.value.downcast_mut::<T>()?;
        let result = f(value);
        node.version += 1;
        self.propagate(Source::Signal(signal.id));
        Some(result)
    }

    /// Remove a signal. Readers get `None` afterwards.
    pub fn dispose_signal<T>(&mut self, signal: Signal<T>) {
        self.signals.remove(signal.id);
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Create a derived value computed from whatever `f` reads
    pub fn create_derived<T, F>(&mut self, f: F) -> Derived<T>
    where
        T: Clone + Send + 'static,
        F: Fn(&ReactiveGraph) -> T + Send + Sync + 'static,
    {
        let compute: ComputeFn = Arc::new(move |g: &ReactiveGraph| Box::new(f(g)) as AnyValue);
        let (value, sources) = self.tracked(|g| compute(g));

        let order = self.next_order;
        self.next_order += 1;

        let id = self.derived.insert(DerivedNode {
            compute,
            value,
            sources: SmallVec::new(),
            subscribers: SmallVec::new(),
            order,
        });
        self.resubscribe(Subscriber::Derived(id), sources);

        Derived {
            id,
            _marker: PhantomData,
        }
    }

    /// Read a derived value
    pub fn get_derived<T: Clone + 'static>(&self, derived: Derived<T>) -> Option<T> {
        self.record(Source::Derived(derived.id));
        self.derived
            .get(derived.id)
            .and_then(|node| node.value.downcast_ref::<T>())
            .cloned()
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Register an effect. It runs immediately, then after every change to a
    /// source it read during its previous run.
    pub fn create_effect<F>(&mut self, run: F) -> Effect
    where
        F: FnMut(&ReactiveGraph) + Send + 'static,
    {
        let id = self.effects.insert(EffectNode {
            run: Some(Box::new(run)),
            sources: SmallVec::new(),
        });
        self.run_effect(id);
        Effect { id }
    }

    /// Unregister an effect
    pub fn dispose_effect(&mut self, effect: Effect) {
        if let Some(node) = self.effects.remove(effect.id) {
            let subscriber = Subscriber::Effect(effect.id);
            for source in node.sources {
                self.unsubscribe(source, subscriber);
            }
        }
    }

    // =========================================================================
    // Batching
    // =========================================================================

    /// Apply several writes as one update. Effects observe only the final state
    /// and run at most once when the outermost batch finishes.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 {
            let pending = std::mem::take(&mut self.pending_effects);
            for id in pending {
                self.run_effect(id);
            }
        }

        result
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn record(&self, source: Source) {
        if let Some(sources) = self.tracking.borrow_mut().as_mut() {
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
    }

    /// Run `f` while recording every source it reads
    fn tracked<R>(&self, f: impl FnOnce(&Self) -> R) -> (R, Sources) {
        let outer = self.tracking.replace(Some(SmallVec::new()));
        let result = f(self);
        let sources = self.tracking.replace(outer).unwrap_or_default();
        (result, sources)
    }

    fn subscribers_of(&self, source: Source) -> Subscribers {
        match source {
            Source::Signal(id) => self.signals.get(id).map(|n| n.subscribers.clone()),
            Source::Derived(id) => self.derived.get(id).map(|n| n.subscribers.clone()),
        }
        .unwrap_or_default()
    }

    fn subscribe(&mut self, source: Source, subscriber: Subscriber) {
        let subscribers = match source {
            Source::Signal(id) => self.signals.get_mut(id).map(|n| &mut n.subscribers),
            Source::Derived(id) => self.derived.get_mut(id).map(|n| &mut n.subscribers),
        };
        if let Some(subscribers) = subscribers {
            if !subscribers.contains(&subscriber) {
                subscribers.push(subscriber);
            }
        }
    }

    fn unsubscribe(&mut self, source: Source, subscriber: Subscriber) {
        let subscribers = match source {
            Source::Signal(id) => self.signals.get_mut(id).map(|n| &mut n.subscribers),
            Source::Derived(id) => self.derived.get_mut(id).map(|n| &mut n.subscribers),
        };
        if let Some(subscribers) = subscribers {
            subscribers.retain(|s| *s != subscriber);
        }
    }

    /// Replace the recorded sources of a subscriber
    fn resubscribe(&mut self, subscriber: Subscriber, sources: Sources) {
        let previous = match subscriber {
            Subscriber::Derived(id) => self
                .derived
                .get_mut(id)
                .map(|n| std::mem::replace(&mut n.sources, sources.clone())),
            Subscriber::Effect(id) => self
                .effects
                .get_mut(id)
                .map(|n| std::mem::replace(&mut n.sources, sources.clone())),
        }
        .unwrap_or_default();

        for source in previous {
            if !sources.contains(&source) {
                self.unsubscribe(source, subscriber);
            }
        }
        for source in sources {
            self.subscribe(source, subscriber);
        }
    }

    /// Recompute everything downstream of `source` and run (or queue) effects
    fn propagate(&mut self, source: Source) {
        let mut dirty: Vec<DerivedId> = Vec::new();
        let mut effects: Vec<EffectId> = Vec::new();
        let mut visited: FxHashSet<Source> = FxHashSet::default();
        let mut stack = vec![source];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for subscriber in self.subscribers_of(current) {
                match subscriber {
                    Subscriber::Derived(id) => {
                        if !dirty.contains(&id) {
                            dirty.push(id);
                        }
                        stack.push(Source::Derived(id));
                    }
                    Subscriber::Effect(id) => {
                        if !effects.contains(&id) {
                            effects.push(id);
                        }
                    }
                }
            }
        }

        dirty.sort_by_key(|id| self.derived.get(*id).map(|n| n.order).unwrap_or(u64::MAX));
        for id in dirty {
            self.recompute_derived(id);
        }

        if self.batch_depth > 0 {
            for id in effects {
                if !self.pending_effects.contains(&id) {
                    self.pending_effects.push(id);
                }
            }
        } else {
            for id in effects {
                self.run_effect(id);
            }
        }
    }

    fn recompute_derived(&mut self, id: DerivedId) {
        let Some(compute) = self.derived.get(id).map(|n| n.compute.clone()) else {
            return;
        };
        let (value, sources) = self.tracked(|g| compute(g));
        if let Some(node) = self.derived.get_mut(id) {
            node.value = value;
        }
        self.resubscribe(Subscriber::Derived(id), sources);
    }

    fn run_effect(&mut self, id: EffectId) {
        let Some(mut run) = self.effects.get_mut(id).and_then(|n| n.run.take()) else {
            return;
        };
        let ((), sources) = self.tracked(|g| run(g));
        if let Some(node) = self.effects.get_mut(id) {
            node.run = Some(run);
        }
        self.resubscribe(Subscriber::Effect(id), sources);
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signal_read_write() {
        let mut graph = ReactiveGraph::new();
        let count = graph.create_signal(1i32);

        assert_eq!(graph.get(count), Some(1));
        graph.set(count, 7);
        assert_eq!(graph.get(count), Some(7));
        assert_eq!(graph.version(count), Some(1));
    }

    #[test]
    fn test_update_in_place() {
        let mut graph = ReactiveGraph::new();
        let items = graph.create_signal(vec![1, 2]);

        let len = graph.update(items, |v| {
            v.push(3);
            v.len()
        });

        assert_eq!(len, Some(3));
        assert_eq!(graph.with(items, |v| v.iter().sum::<i32>()), Some(6));
    }

    #[test]
    fn test_derived_recomputes_eagerly() {
        let mut graph = ReactiveGraph::new();
        let a = graph.create_signal(2.0f32);
        let b = graph.create_signal(3.0f32);
        let sum = graph.create_derived(move |g| g.get(a).unwrap_or(0.0) + g.get(b).unwrap_or(0.0));
        let doubled = graph.create_derived(move |g| g.get_derived(sum).unwrap_or(0.0) * 2.0);

        assert_eq!(graph.get_derived(doubled), Some(10.0));
        graph.set(a, 10.0);
        assert_eq!(graph.get_derived(sum), Some(13.0));
        assert_eq!(graph.get_derived(doubled), Some(26.0));
    }

    #[test]
    fn test_effect_runs_on_create_and_change() {
        let mut graph = ReactiveGraph::new();
        let flag = graph.create_signal(false);
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            let _ = g.get(flag);
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        graph.set(flag, true);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_effect_ignores_unread_signals() {
        let mut graph = ReactiveGraph::new();
        let watched = graph.create_signal(0);
        let other = graph.create_signal(0);
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            let _ = g.get(watched);
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });

        graph.set(other, 5);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_batch_runs_effect_once() {
        let mut graph = ReactiveGraph::new();
        let x = graph.create_signal(0);
        let y = graph.create_signal(0);
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let _effect = graph.create_effect(move |g| {
            let _ = (g.get(x), g.get(y));
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });

        graph.batch(|g| {
            g.set(x, 1);
            g.set(y, 2);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_derived_visible_inside_batch() {
        let mut graph = ReactiveGraph::new();
        let x = graph.create_signal(1);
        let plus_one = graph.create_derived(move |g| g.get(x).unwrap_or(0) + 1);

        let seen = graph.batch(|g| {
            g.set(x, 41);
            g.get_derived(plus_one)
        });
        assert_eq!(seen, Some(42));
    }

    #[test]
    fn test_dispose_effect_stops_notifications() {
        let mut graph = ReactiveGraph::new();
        let x = graph.create_signal(0);
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let effect = graph.create_effect(move |g| {
            let _ = g.get(x);
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        graph.dispose_effect(effect);
        graph.set(x, 3);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposed_signal_reads_none() {
        let mut graph = ReactiveGraph::new();
        let x = graph.create_signal(String::from("ink"));
        graph.dispose_signal(x);
        assert_eq!(graph.get(x), None);
        assert_eq!(graph.signal_count(), 0);
    }
}
