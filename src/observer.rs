//! Observers bind a property path to a pair of callbacks: one for the value
//! observed at registration time, one for every subsequent change of the
//! projected value.
//!
//! Delivery ordering is a hard contract: the initial callback fires exactly
//! once, strictly before any change callback. Violations are programmer
//! errors and panic.

use crate::change::Change;
use crate::path::PropertyPath;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback pair observing an optional value, enforcing "initial exactly
/// once, before any change".
pub struct ValueObserver<T> {
    initial: Box<dyn Fn(Option<&T>) + Send + Sync>,
    change: Box<dyn Fn(&Change<Option<T>>) + Send + Sync>,
    delivered_initial: AtomicBool,
}

impl<T> ValueObserver<T> {
    /// Create an observer from the two callbacks.
    pub fn new<I, F>(initial: I, change: F) -> Self
    where
        I: Fn(Option<&T>) + Send + Sync + 'static,
        F: Fn(&Change<Option<T>>) + Send + Sync + 'static,
    {
        ValueObserver {
            initial: Box::new(initial),
            change: Box::new(change),
            delivered_initial: AtomicBool::new(false),
        }
    }

    /// Deliver the initially observed value.
    ///
    /// # Panics
    ///
    /// Panics if the initial value was already delivered.
    pub fn observe_initial(&self, value: Option<&T>) {
        let already_delivered = self.delivered_initial.swap(true, Ordering::SeqCst);
        assert!(
            !already_delivered,
            "initial value delivered twice to the same observer"
        );
        (self.initial)(value);
    }

    /// Deliver a change of the observed value.
    ///
    /// # Panics
    ///
    /// Panics if the initial value has not been delivered yet.
    pub fn observe_change(&self, change: &Change<Option<T>>) {
        assert!(
            self.delivered_initial.load(Ordering::SeqCst),
            "change delivered before the initial value"
        );
        (self.change)(change);
    }
}

impl<T> fmt::Debug for ValueObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObserver")
            .field(
                "delivered_initial",
                &self.delivered_initial.load(Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}

/// A [`ValueObserver`] bound to the [`PropertyPath`] it observes through.
///
/// Projects both endpoints of every root-level change through the path and
/// forwards only projections that actually differ; equal (or equally absent)
/// projections deliver nothing.
pub struct PropertyPathObserver<R, V> {
    path: PropertyPath<R, V>,
    observer: ValueObserver<V>,
}

impl<R, V> PropertyPathObserver<R, V>
where
    R: 'static,
    V: PartialEq + fmt::Debug + 'static,
{
    /// Bind `observer` to `path`.
    pub fn new(path: PropertyPath<R, V>, observer: ValueObserver<V>) -> Self {
        PropertyPathObserver { path, observer }
    }

    /// The path this observer projects through.
    pub fn path(&self) -> &PropertyPath<R, V> {
        &self.path
    }

    /// Project `state` and deliver it as the initially observed value.
    pub fn observe_initial_state(&self, state: &R) {
        let value = self.path.value_in(state);
        self.observer.observe_initial(value.as_ref());
    }

    /// Project both endpoints of `change`; deliver the projected change if
    /// the projections differ, nothing otherwise.
    pub fn observe_state_change(&self, change: &Change<R>) {
        let previous = self.path.value_in(change.previous());
        let current = self.path.value_in(change.current());

        let Some(projected) = Change::safe_instance(previous, current) else {
            return;
        };

        self.observer.observe_change(&projected);
    }
}

/// The type-erased observer unit registered with a [`Model`](crate::Model).
///
/// Constructed through one of the typed constructors, which differ in how
/// they treat absence of the projected value:
///
/// - [`for_value`](ModelObserver::for_value) — the caller asserts the value
///   always exists (a total path); absence panics.
/// - [`for_optional_value`](ModelObserver::for_optional_value) — callbacks
///   receive `Option`s; absence is ordinary data.
/// - [`for_presence`](ModelObserver::for_presence) — callbacks receive only
///   whether the value exists.
///
/// A model holds its observers *weakly*: the `Arc` returned by the
/// constructors is the owning handle, and dropping it silences and
/// eventually removes the registration.
pub struct ModelObserver<S> {
    initial: Box<dyn Fn(&S) + Send + Sync>,
    change: Box<dyn Fn(&Change<S>) + Send + Sync>,
}

impl<S> fmt::Debug for ModelObserver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelObserver").finish_non_exhaustive()
    }
}

impl<S: 'static> ModelObserver<S> {
    /// Observer for a value the caller asserts to always exist.
    ///
    /// # Panics
    ///
    /// The delivery callbacks panic if the path ever projects to `None` —
    /// the caller asserted non-optionality.
    pub fn for_value<V, I, F>(path: PropertyPath<S, V>, initial: I, on_change: F) -> Arc<Self>
    where
        V: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
        I: Fn(&V) + Send + Sync + 'static,
        F: Fn(&Change<V>) + Send + Sync + 'static,
    {
        let observer = ValueObserver::new(
            move |value: Option<&V>| {
                let value = value.expect("value at a non-optional path must exist");
                initial(value);
            },
            move |change: &Change<Option<V>>| {
                let previous = change
                    .previous()
                    .clone()
                    .expect("previous value at a non-optional path must exist");
                let current = change
                    .current()
                    .clone()
                    .expect("current value at a non-optional path must exist");
                on_change(&Change::new(previous, current));
            },
        );

        Self::erased(PropertyPathObserver::new(path, observer))
    }

    /// Observer for a value that may be absent, such as one behind a case
    /// projection.
    pub fn for_optional_value<V, I, F>(
        path: PropertyPath<S, V>,
        initial: I,
        on_change: F,
    ) -> Arc<Self>
    where
        V: PartialEq + fmt::Debug + Send + Sync + 'static,
        I: Fn(Option<&V>) + Send + Sync + 'static,
        F: Fn(&Change<Option<V>>) + Send + Sync + 'static,
    {
        let observer = ValueObserver::new(
            move |value: Option<&V>| initial(value),
            move |change: &Change<Option<V>>| on_change(change),
        );

        Self::erased(PropertyPathObserver::new(path, observer))
    }

    /// Observer for the mere presence of a value, reported as `bool`.
    ///
    /// Changes of the projected value that do not change its presence
    /// deliver nothing.
    pub fn for_presence<V, I, F>(path: PropertyPath<S, V>, initial: I, on_change: F) -> Arc<Self>
    where
        V: PartialEq + fmt::Debug + Send + Sync + 'static,
        I: Fn(bool) + Send + Sync + 'static,
        F: Fn(&Change<bool>) + Send + Sync + 'static,
    {
        let observer = ValueObserver::new(
            move |value: Option<&V>| initial(value.is_some()),
            move |change: &Change<Option<V>>| {
                let previous = change.previous().is_some();
                let current = change.current().is_some();
                if let Some(presence_change) = Change::safe_instance(previous, current) {
                    on_change(&presence_change);
                }
            },
        );

        Self::erased(PropertyPathObserver::new(path, observer))
    }

    fn erased<V>(observer: PropertyPathObserver<S, V>) -> Arc<Self>
    where
        V: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        let observer = Arc::new(observer);
        let for_initial = Arc::clone(&observer);

        Arc::new(ModelObserver {
            initial: Box::new(move |state| for_initial.observe_initial_state(state)),
            change: Box::new(move |change| observer.observe_state_change(change)),
        })
    }

    pub(crate) fn observe_initial(&self, state: &S) {
        (self.initial)(state);
    }

    pub(crate) fn observe_change(&self, change: &Change<S>) {
        (self.change)(change);
    }
}
