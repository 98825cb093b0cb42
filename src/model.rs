use crate::change::Change;
use crate::observer::ModelObserver;
use crate::persist::ByteStore;
use crate::reducer::Reducer;
use crate::store::{Request, Store};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::io;
use std::sync::{Arc, Weak};

/// Registry of weakly held observers, pruned lazily on traversal.
struct ObserverRegistry<S> {
    slots: Mutex<Vec<Weak<ModelObserver<S>>>>,
}

impl<S: 'static> ObserverRegistry<S> {
    fn new() -> Self {
        ObserverRegistry {
            slots: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, observer: &Arc<ModelObserver<S>>) {
        self.slots.lock().push(Arc::downgrade(observer));
    }

    /// Upgrade all live observers, dropping dead slots in the same pass.
    fn live_observers(&self) -> Vec<Arc<ModelObserver<S>>> {
        let mut slots = self.slots.lock();
        let mut live = Vec::with_capacity(slots.len());
        slots.retain(|slot| match slot.upgrade() {
            Some(observer) => {
                live.push(observer);
                true
            }
            None => false,
        });
        live
    }

    fn notify(&self, change: &Change<S>) {
        for observer in self.live_observers() {
            observer.observe_change(change);
        }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Observable wrapper around a [`Store`].
///
/// A model serializes transactions through an internal lock and fans every
/// store-level [`Change`] out to its registered observers. Observers are held
/// *weakly*: the caller keeps the owning `Arc` returned by the
/// [`ModelObserver`] constructors, and once it is dropped the registration
/// goes silent; the dead slot is physically removed the next time the
/// registry is traversed.
///
/// Observer callbacks run synchronously within the model's transaction, so
/// they must not submit requests back into the same model.
///
/// # Examples
///
/// ```
/// use statefold::{Model, ModelObserver, PropertyPath, Reducer};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Request {
///     Increment,
/// }
///
/// impl statefold::Request for Request {}
///
/// let reducer = Reducer::new(|count: &mut u64, requests: &[Request], _: &()| {
///     *count += requests.len() as u64;
/// });
/// let model = Model::new(0, reducer);
///
/// let seen = Arc::new(AtomicU64::new(0));
/// let sink = Arc::clone(&seen);
/// let observer = ModelObserver::for_value(
///     PropertyPath::total(|count: &u64| *count),
///     move |initial| sink.store(*initial, Ordering::SeqCst),
///     {
///         let sink = Arc::clone(&seen);
///         move |change| sink.store(*change.current(), Ordering::SeqCst)
///     },
/// );
/// model.add(&observer);
///
/// model.handle_in_single_transaction(&[Request::Increment, Request::Increment], &());
/// assert_eq!(seen.load(Ordering::SeqCst), 2);
/// ```
pub struct Model<S, R, C> {
    store: Mutex<Store<S, R, C>>,
    registry: Arc<ObserverRegistry<S>>,
}

impl<S, R, C> Model<S, R, C>
where
    S: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
    R: Request,
    C: 'static,
{
    /// Create a model owning `state`, reduced by `reducer`.
    pub fn new(state: S, reducer: Reducer<S, R, C>) -> Self {
        let registry = Arc::new(ObserverRegistry::new());
        let mut store = Store::new(state, reducer);

        let notifying = Arc::clone(&registry);
        store.set_subscription(move |change| notifying.notify(change));

        Model {
            store: Mutex::new(store),
            registry,
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> S {
        self.store.lock().state().clone()
    }

    /// Handle `requests` as one transaction; see
    /// [`Store::handle_in_single_transaction`].
    pub fn handle_in_single_transaction(&self, requests: &[R], coeffects: &C) {
        self.store.lock().handle_in_single_transaction(requests, coeffects);
    }

    /// Register `observer` and immediately deliver the current state to its
    /// initial-value callback.
    ///
    /// Only a weak reference is retained; the caller owns the observer's
    /// lifetime through the `Arc`.
    pub fn add(&self, observer: &Arc<ModelObserver<S>>) {
        let store = self.store.lock();
        self.registry.add(observer);
        observer.observe_initial(store.state());
    }
}

impl<S, R, C> Model<S, R, C>
where
    S: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
    R: Request,
    C: 'static,
{
    /// Serialize the current state into `store` under `key`; see
    /// [`Store::save_to`].
    pub fn save_to(&self, store: &mut dyn ByteStore, key: &str) -> io::Result<()> {
        self.store.lock().save_to(store, key)
    }

    /// Load state from `store` under `key`, committing and notifying like a
    /// normal transaction; see [`Store::load_from`].
    pub fn load_from(&self, store: &dyn ByteStore, key: &str) -> io::Result<()> {
        self.store.lock().load_from(store, key)
    }
}
