use crate::change::{Change, PotentialChange};
use crate::persist::ByteStore;
use crate::reducer::Reducer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::io;

/// An immutable, equatable command value describing an intended state
/// mutation.
///
/// [`must_result_in_change`](Request::must_result_in_change) declares whether
/// handling the request is expected to change the state; it defaults to
/// `true` and is used only for a diagnostic warning when a transaction turns
/// out to be a no-op — it is never enforced. A request that legitimately may
/// leave the state untouched (say, setting a value that is often already set)
/// should override it to return `false`.
pub trait Request: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Whether handling this request must change the state. `true` by
    /// default.
    fn must_result_in_change(&self) -> bool {
        true
    }
}

/// The single-writer cell holding the authoritative application state.
///
/// A store owns one `State` value for its whole lifetime and replaces it in
/// place on every transaction. Mutation happens exclusively inside
/// [`handle_in_single_transaction`](Store::handle_in_single_transaction),
/// which applies the reducer to the *entire* request batch at once and
/// notifies the subscription closure at most once per transaction — never
/// once per request, and not at all when the reduction turned out to be a
/// no-op.
///
/// The store itself is not synchronized; its owner (typically a
/// [`Model`](crate::Model)) is responsible for serializing transactions.
///
/// # Examples
///
/// ```
/// use statefold::{Reducer, Store};
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
///
/// let mut store = Store::new(0, reducer);
/// store.handle_in_single_transaction(&[Request::Increment, Request::Increment], &());
/// assert_eq!(*store.state(), 2);
/// ```
pub struct Store<S, R, C> {
    state: S,
    reducer: Reducer<S, R, C>,
    subscription: Option<Box<dyn Fn(&Change<S>) + Send + Sync>>,
}

impl<S, R, C> Store<S, R, C>
where
    S: Clone + PartialEq + fmt::Debug + 'static,
    R: Request,
    C: 'static,
{
    /// Create a store owning `state`, reduced by `reducer`.
    pub fn new(state: S, reducer: Reducer<S, R, C>) -> Self {
        Store {
            state,
            reducer,
            subscription: None,
        }
    }

    /// Install the closure invoked with the [`Change`] of every transaction
    /// that actually changed the state.
    pub fn set_subscription<F>(&mut self, subscription: F)
    where
        F: Fn(&Change<S>) + Send + Sync + 'static,
    {
        self.subscription = Some(Box::new(subscription));
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Handle `requests` as one transaction.
    ///
    /// No-op if `requests` is empty. Otherwise the reducer is applied to a
    /// copy of the state with the whole batch; if the result differs from the
    /// state before, the new state is committed and the subscription is
    /// invoked exactly once with the change. A no-op reduction commits and
    /// notifies nothing; if any request in the batch declared it must result
    /// in a change, a warning is logged, but execution is never aborted.
    pub fn handle_in_single_transaction(&mut self, requests: &[R], coeffects: &C) {
        if requests.is_empty() {
            return;
        }

        let before = self.state.clone();
        let mut after = before.clone();
        self.reducer.reduce(&mut after, requests, coeffects);

        let Some(change) = Change::from_potential(PotentialChange::new(before, after)) else {
            if requests.iter().any(|request| request.must_result_in_change()) {
                log::warn!("no state change for requests {requests:?}");
            }
            return;
        };

        log::trace!("transaction committed: {requests:?}");
        self.state = change.current().clone();

        if let Some(subscription) = &self.subscription {
            subscription(&change);
        }
    }
}

impl<S, R, C> Store<S, R, C>
where
    S: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static,
    R: Request,
    C: 'static,
{
    /// Serialize the current state and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the byte store write fails.
    pub fn save_to(&self, store: &mut dyn ByteStore, key: &str) -> io::Result<()> {
        let bytes = serde_json::to_vec(&self.state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        store.put(key, &bytes)
    }

    /// Load a previously saved state from `key` and commit it as a normal
    /// transaction would.
    ///
    /// A missing blob is a silent no-op. A loaded state equal to the current
    /// one commits and notifies nothing; a differing one replaces the state
    /// and invokes the subscription exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte store read fails or the blob does not
    /// deserialize.
    pub fn load_from(&mut self, store: &dyn ByteStore, key: &str) -> io::Result<()> {
        let Some(bytes) = store.get(key)? else {
            return Ok(());
        };

        let loaded: S = serde_json::from_slice(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let potential = PotentialChange::new(self.state.clone(), loaded);
        let Some(change) = Change::from_potential(potential) else {
            return Ok(());
        };

        self.state = change.current().clone();

        if let Some(subscription) = &self.subscription {
            subscription(&change);
        }

        Ok(())
    }
}
