use std::sync::Arc;

/// A pure function folding a batch of requests into state, in place.
///
/// A reducer receives *all* requests of a transaction at once, mutates the
/// state through them, and must not perform any I/O; read-only environment
/// access goes through the injected coeffects value.
///
/// Reducers are cheap to clone (the closure is shared) and compose:
/// [`combined`](Reducer::combined) runs two reducers in sequence over the
/// same state, [`for_super_state`](Reducer::for_super_state) lifts a reducer
/// onto an enclosing state and request type.
///
/// # Examples
///
/// ```
/// use statefold::Reducer;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Request {
///     Increment,
/// }
///
/// let reducer: Reducer<u64, Request, ()> = Reducer::new(|count, requests, _coeffects| {
///     for request in requests {
///         match request {
///             Request::Increment => *count += 1,
///         }
///     }
/// });
///
/// let mut count = 0;
/// reducer.reduce(&mut count, &[Request::Increment, Request::Increment], &());
/// assert_eq!(count, 2);
/// ```
pub struct Reducer<S, R, C> {
    reduce: Arc<dyn Fn(&mut S, &[R], &C) + Send + Sync>,
}

impl<S, R, C> Clone for Reducer<S, R, C> {
    fn clone(&self) -> Self {
        Reducer {
            reduce: Arc::clone(&self.reduce),
        }
    }
}

impl<S: 'static, R: 'static, C: 'static> Reducer<S, R, C> {
    /// Wrap a closure as a reducer.
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(&mut S, &[R], &C) + Send + Sync + 'static,
    {
        Reducer {
            reduce: Arc::new(reduce),
        }
    }

    /// Apply the reducer to `state` with the full request batch.
    pub fn reduce(&self, state: &mut S, requests: &[R], coeffects: &C) {
        (self.reduce)(state, requests, coeffects);
    }

    /// A reducer that runs `self` and then `other` over the same state.
    pub fn combined(&self, other: &Reducer<S, R, C>) -> Reducer<S, R, C> {
        let first = Arc::clone(&self.reduce);
        let second = Arc::clone(&other.reduce);
        Reducer::new(move |state, requests, coeffects| {
            first(state, requests, coeffects);
            second(state, requests, coeffects);
        })
    }

    /// A reducer that invokes `inspect` with the state and requests before
    /// reducing. Useful for request tracing during development.
    pub fn inspected<F>(&self, inspect: F) -> Reducer<S, R, C>
    where
        F: Fn(&S, &[R]) + Send + Sync + 'static,
    {
        let reduce = Arc::clone(&self.reduce);
        Reducer::new(move |state, requests, coeffects| {
            inspect(state, requests);
            reduce(state, requests, coeffects);
        })
    }

    /// Lift this reducer onto an enclosing state and request type.
    ///
    /// `focus` borrows the sub-state out of the super-state; `project` maps a
    /// super-request to a sub-request, or `None` for requests this reducer
    /// does not care about — those are silently dropped for this sub-reducer.
    ///
    /// # Examples
    ///
    /// ```
    /// use statefold::Reducer;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// enum CounterRequest {
    ///     Increment,
    /// }
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// enum AppRequest {
    ///     Counter(CounterRequest),
    ///     Rename(String),
    /// }
    ///
    /// #[derive(Default)]
    /// struct AppState {
    ///     count: u64,
    ///     name: String,
    /// }
    ///
    /// let counter: Reducer<u64, CounterRequest, ()> =
    ///     Reducer::new(|count, requests, _| *count += requests.len() as u64);
    ///
    /// let lifted = counter.for_super_state(
    ///     |state: &mut AppState| &mut state.count,
    ///     |request: &AppRequest| match request {
    ///         AppRequest::Counter(inner) => Some(inner.clone()),
    ///         AppRequest::Rename(_) => None,
    ///     },
    /// );
    ///
    /// let mut state = AppState::default();
    /// let requests = [
    ///     AppRequest::Counter(CounterRequest::Increment),
    ///     AppRequest::Rename("ignored".into()),
    /// ];
    /// lifted.reduce(&mut state, &requests, &());
    /// assert_eq!(state.count, 1);
    /// ```
    pub fn for_super_state<SS, SR, Focus, Project>(
        &self,
        focus: Focus,
        project: Project,
    ) -> Reducer<SS, SR, C>
    where
        SS: 'static,
        SR: 'static,
        Focus: Fn(&mut SS) -> &mut S + Send + Sync + 'static,
        Project: Fn(&SR) -> Option<R> + Send + Sync + 'static,
    {
        let reduce = Arc::clone(&self.reduce);
        Reducer::new(move |super_state, super_requests, coeffects| {
            let requests: Vec<R> = super_requests.iter().filter_map(&project).collect();
            reduce(focus(super_state), &requests, coeffects);
        })
    }

    /// Lift this reducer onto an enclosing request type only, keeping the
    /// state type. Requests that do not project are silently dropped.
    pub fn for_super_request<SR, Project>(&self, project: Project) -> Reducer<S, SR, C>
    where
        SR: 'static,
        Project: Fn(&SR) -> Option<R> + Send + Sync + 'static,
    {
        let reduce = Arc::clone(&self.reduce);
        Reducer::new(move |state, super_requests, coeffects| {
            let requests: Vec<R> = super_requests.iter().filter_map(&project).collect();
            reduce(state, &requests, coeffects);
        })
    }
}
