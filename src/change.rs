use serde::Serialize;
use std::fmt;

/// A transition from one value of `T` to a *different* value of `T`.
///
/// `Change` upholds the invariant that `previous != current`. The checked
/// constructor [`Change::new`] panics when handed equal values; use
/// [`Change::safe_instance`] when equality is a legitimate possibility.
///
/// # Examples
///
/// ```
/// use statefold::Change;
///
/// let change = Change::new(1, 2);
/// assert_eq!(*change.previous(), 1);
/// assert_eq!(*change.current(), 2);
///
/// // Equal endpoints are not a change.
/// assert!(Change::safe_instance(3, 3).is_none());
/// ```
// Serialize only: a deserialized change could carry equal endpoints,
// sidestepping the constructor checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change<T> {
    previous: T,
    current: T,
}

impl<T> Change<T> {
    /// The value before the change.
    pub fn previous(&self) -> &T {
        &self.previous
    }

    /// The value after the change.
    pub fn current(&self) -> &T {
        &self.current
    }
}

impl<T: PartialEq + fmt::Debug> Change<T> {
    /// Create a change from `previous` to `current`.
    ///
    /// # Panics
    ///
    /// Panics if `previous == current`. Constructing a change with equal
    /// endpoints is a programmer error, not a recoverable condition.
    pub fn new(previous: T, current: T) -> Self {
        assert!(
            previous != current,
            "previous {previous:?} must not equal current {current:?}"
        );
        Change { previous, current }
    }

    /// Create a change if the values differ, `None` otherwise.
    pub fn safe_instance(previous: T, current: T) -> Option<Self> {
        if previous == current {
            None
        } else {
            Some(Change { previous, current })
        }
    }

    /// Convert a [`PotentialChange`] into a `Change` if it is actual.
    ///
    /// The potential change already carries the comparison result, so no
    /// equality check is repeated here.
    pub fn from_potential(potential: PotentialChange<T>) -> Option<Self> {
        if potential.is_actual_change {
            Some(Change {
                previous: potential.previous,
                current: potential.current,
            })
        } else {
            None
        }
    }

    /// Whether the projected values of both endpoints differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use statefold::Change;
    ///
    /// let change = Change::new((1, "a"), (1, "b"));
    /// assert!(!change.has_change_at(|value| value.0));
    /// assert!(change.has_change_at(|value| value.1));
    /// ```
    pub fn has_change_at<V, F>(&self, project: F) -> bool
    where
        V: PartialEq,
        F: Fn(&T) -> V,
    {
        project(&self.previous) != project(&self.current)
    }

    /// Project both endpoints, keeping the result even if the projected
    /// values are equal.
    pub fn potential_change_for<V, F>(&self, project: F) -> PotentialChange<V>
    where
        V: PartialEq,
        F: Fn(&T) -> V,
    {
        PotentialChange::new(project(&self.previous), project(&self.current))
    }

    /// Project both endpoints into a sub-change, `None` if the projected
    /// values are equal.
    pub fn change_for<V, F>(&self, project: F) -> Option<Change<V>>
    where
        V: PartialEq + fmt::Debug,
        F: Fn(&T) -> V,
    {
        Change::from_potential(self.potential_change_for(project))
    }

    /// Run `action` with the projected sub-change if the projection differs
    /// between the endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use statefold::Change;
    ///
    /// let change = Change::new((0, false), (0, true));
    /// let mut seen = None;
    /// change.execute_if_change_of(|value| value.1, |sub| seen = Some(*sub.current()));
    /// assert_eq!(seen, Some(true));
    /// ```
    pub fn execute_if_change_of<V, F, A>(&self, project: F, action: A)
    where
        V: PartialEq + fmt::Debug,
        F: Fn(&T) -> V,
        A: FnOnce(&Change<V>),
    {
        if let Some(sub_change) = self.change_for(project) {
            action(&sub_change);
        }
    }
}

/// A pair of values of `T` that may or may not constitute an actual change.
///
/// Unlike [`Change`], equal `previous` and `current` values are allowed; the
/// comparison result is captured at construction in
/// [`is_actual_change`](PotentialChange::is_actual_change).
///
/// # Examples
///
/// ```
/// use statefold::{Change, PotentialChange};
///
/// let actual = PotentialChange::new("a", "b");
/// assert!(actual.is_actual_change());
/// assert!(Change::from_potential(actual).is_some());
///
/// let noop = PotentialChange::new("a", "a");
/// assert!(!noop.is_actual_change());
/// assert!(Change::from_potential(noop).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialChange<T> {
    previous: T,
    current: T,
    is_actual_change: bool,
}

impl<T: PartialEq> PotentialChange<T> {
    /// Create a potential change, recording whether the values differ.
    pub fn new(previous: T, current: T) -> Self {
        let is_actual_change = previous != current;
        PotentialChange {
            previous,
            current,
            is_actual_change,
        }
    }

    /// The value before the potential change.
    pub fn previous(&self) -> &T {
        &self.previous
    }

    /// The value after the potential change.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Whether the two values actually differ.
    pub fn is_actual_change(&self) -> bool {
        self.is_actual_change
    }
}
