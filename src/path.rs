use std::fmt;
use std::sync::Arc;

/// A composable, typed accessor from a root value to a possibly absent
/// sub-value.
///
/// A path is nothing more than a shared `Fn(&Root) -> Option<Value>`. Two
/// constructors cover the two shapes of projection: [`PropertyPath::total`]
/// for struct fields (always present, wrapped as always-`Some`) and
/// [`PropertyPath::case`] for one arm of an enum (present only while the root
/// holds that arm). Paths compose left to right with
/// [`then`](PropertyPath::then), short-circuiting to `None` as soon as a
/// stage is absent.
///
/// # Examples
///
/// ```
/// use statefold::PropertyPath;
///
/// #[derive(Clone, PartialEq)]
/// enum Session {
///     LoggedOut,
///     LoggedIn { name: String },
/// }
///
/// struct AppState {
///     session: Session,
/// }
///
/// let session = PropertyPath::total(|state: &AppState| state.session.clone());
/// let name = PropertyPath::case(|session: &Session| match session {
///     Session::LoggedIn { name } => Some(name.clone()),
///     Session::LoggedOut => None,
/// });
/// let path = session.then(&name);
///
/// let state = AppState {
///     session: Session::LoggedIn { name: "ada".into() },
/// };
/// assert_eq!(path.value_in(&state), Some("ada".to_string()));
///
/// let state = AppState { session: Session::LoggedOut };
/// assert_eq!(path.value_in(&state), None);
/// ```
pub struct PropertyPath<R, V> {
    extract: Arc<dyn Fn(&R) -> Option<V> + Send + Sync>,
}

impl<R, V> Clone for PropertyPath<R, V> {
    fn clone(&self) -> Self {
        PropertyPath {
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<R, V> fmt::Debug for PropertyPath<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyPath").finish_non_exhaustive()
    }
}

impl<R: 'static, V: 'static> PropertyPath<R, V> {
    /// A total field projection; the value always exists.
    pub fn total<F>(project: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
    {
        PropertyPath {
            extract: Arc::new(move |root| Some(project(root))),
        }
    }

    /// A case projection into one arm of a sum type; the value exists only
    /// while the root currently holds that arm.
    pub fn case<F>(project: F) -> Self
    where
        F: Fn(&R) -> Option<V> + Send + Sync + 'static,
    {
        PropertyPath {
            extract: Arc::new(project),
        }
    }

    /// The value this path projects out of `root`, if present.
    pub fn value_in(&self, root: &R) -> Option<V> {
        (self.extract)(root)
    }

    /// Compose with a path starting at this path's value type.
    ///
    /// The joined path yields `None` whenever either stage yields `None`.
    pub fn then<W: 'static>(&self, next: &PropertyPath<V, W>) -> PropertyPath<R, W> {
        let first = Arc::clone(&self.extract);
        let second = Arc::clone(&next.extract);
        PropertyPath {
            extract: Arc::new(move |root| first(root).and_then(|value| second(&value))),
        }
    }
}
