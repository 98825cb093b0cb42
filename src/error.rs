//! Error composition: non-empty error lists, recursive error trees, and the
//! success/failure indication returned by effect execution.

use std::fmt;
use thiserror::Error;

/// A singly linked list guaranteed to hold at least one element.
///
/// Used to carry "at least one underlying error" collections inside
/// [`CompositeError`]; never mutated once built.
///
/// # Examples
///
/// ```
/// use statefold::NonEmptyList;
///
/// let list = NonEmptyList::from_vec(vec![1, 2, 3]);
/// assert_eq!(*list.head(), 1);
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.to_vec(), vec![1, 2, 3]);
/// assert!(list.contains(&2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonEmptyList<T> {
    /// A list of exactly one element.
    Single(T),
    /// A head element followed by a non-empty tail.
    Multiple(T, Box<NonEmptyList<T>>),
}

impl<T> NonEmptyList<T> {
    /// Build a list from a vector.
    ///
    /// # Panics
    ///
    /// Panics if `elements` is empty.
    pub fn from_vec(elements: Vec<T>) -> Self {
        let mut iter = elements.into_iter().rev();
        let last = iter
            .next()
            .expect("a non-empty list cannot be built from an empty collection");
        iter.fold(NonEmptyList::Single(last), |tail, head| {
            NonEmptyList::Multiple(head, Box::new(tail))
        })
    }

    /// The first element.
    pub fn head(&self) -> &T {
        match self {
            NonEmptyList::Single(head) => head,
            NonEmptyList::Multiple(head, _) => head,
        }
    }

    /// Number of elements, always at least 1.
    pub fn len(&self) -> usize {
        match self {
            NonEmptyList::Single(_) => 1,
            NonEmptyList::Multiple(_, tail) => 1 + tail.len(),
        }
    }

    /// Always `false`; present for clippy's sake next to [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the elements from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { next: Some(self) }
    }

    /// Return a new list with `head` prepended.
    pub fn with_appended_head(self, head: T) -> Self {
        NonEmptyList::Multiple(head, Box::new(self))
    }

    /// Map every element, preserving the structure.
    pub fn map<V, F: Fn(T) -> V>(self, f: F) -> NonEmptyList<V> {
        match self {
            NonEmptyList::Single(head) => NonEmptyList::Single(f(head)),
            NonEmptyList::Multiple(head, tail) => {
                NonEmptyList::Multiple(f(head), Box::new(tail.map_ref(&f)))
            }
        }
    }

    fn map_ref<V, F: Fn(T) -> V>(self, f: &F) -> NonEmptyList<V> {
        match self {
            NonEmptyList::Single(head) => NonEmptyList::Single(f(head)),
            NonEmptyList::Multiple(head, tail) => {
                NonEmptyList::Multiple(f(head), Box::new(tail.map_ref(f)))
            }
        }
    }

    /// Whether any element satisfies `predicate`.
    pub fn contains_where<F: Fn(&T) -> bool>(&self, predicate: F) -> bool {
        self.iter().any(|element| predicate(element))
    }
}

impl<T: PartialEq> NonEmptyList<T> {
    /// Whether the list contains an element equal to `element`.
    pub fn contains(&self, element: &T) -> bool {
        self.contains_where(|candidate| candidate == element)
    }
}

impl<T: Clone> NonEmptyList<T> {
    /// Collect the elements into a vector, head first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Borrowing iterator over a [`NonEmptyList`], head to tail.
pub struct Iter<'a, T> {
    next: Option<&'a NonEmptyList<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match self.next.take()? {
            NonEmptyList::Single(head) => Some(head),
            NonEmptyList::Multiple(head, tail) => {
                self.next = Some(tail);
                Some(head)
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a NonEmptyList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for NonEmptyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({element})")?;
        }
        Ok(())
    }
}

/// A rooted tree of errors preserving full causal history.
///
/// A leaf holds a single domain error; a composite node holds a root error
/// plus at least one underlying error tree that caused it.
///
/// # Examples
///
/// ```
/// use statefold::{CompositeError, NonEmptyList};
///
/// let original = CompositeError::simple("disk full");
/// let handler = CompositeError::simple("cleanup failed");
/// let error = CompositeError::composite(handler, NonEmptyList::Single(original));
///
/// // The root cause is the first leaf of the first underlying branch.
/// assert_eq!(*error.root_error(), "disk full");
/// assert!(error.contains(&"cleanup failed"));
/// assert!(!error.contains(&"unrelated"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeError<E> {
    /// A single domain error.
    Simple(E),
    /// An error caused by at least one underlying error.
    ///
    /// The list is boxed as well as the root; `NonEmptyList` stores its
    /// elements inline, so an unboxed list would make the type infinitely
    /// sized.
    Composite(
        Box<CompositeError<E>>,
        Box<NonEmptyList<CompositeError<E>>>,
    ),
}

impl<E> CompositeError<E> {
    /// A leaf error.
    pub fn simple(error: E) -> Self {
        CompositeError::Simple(error)
    }

    /// A composite node with the given root and underlying errors.
    pub fn composite(root: CompositeError<E>, underlying: NonEmptyList<CompositeError<E>>) -> Self {
        CompositeError::Composite(Box::new(root), Box::new(underlying))
    }

    /// Wrap `underlying` inside `wrapper` when one is given; otherwise return
    /// `underlying` unchanged.
    pub fn wrapped(wrapper: Option<E>, underlying: CompositeError<E>) -> Self {
        match wrapper {
            None => underlying,
            Some(error) => CompositeError::composite(
                CompositeError::Simple(error),
                NonEmptyList::Single(underlying),
            ),
        }
    }

    /// Descend to the root cause: the first leaf of the first underlying
    /// branch.
    pub fn root_error(&self) -> &E {
        match self {
            CompositeError::Simple(error) => error,
            CompositeError::Composite(_, underlying) => underlying.head().root_error(),
        }
    }

    /// Map every leaf error, preserving the tree structure.
    pub fn map<F, M: Fn(E) -> F>(self, f: M) -> CompositeError<F> {
        self.map_ref(&f)
    }

    fn map_ref<F, M: Fn(E) -> F>(self, f: &M) -> CompositeError<F> {
        match self {
            CompositeError::Simple(error) => CompositeError::Simple(f(error)),
            CompositeError::Composite(root, underlying) => CompositeError::Composite(
                Box::new(root.map_ref(f)),
                Box::new((*underlying).map(|branch| branch.map_ref(f))),
            ),
        }
    }
}

impl<E: PartialEq> CompositeError<E> {
    /// Search the whole tree for a leaf equal to `error`.
    pub fn contains(&self, error: &E) -> bool {
        match self {
            CompositeError::Simple(candidate) => candidate == error,
            CompositeError::Composite(root, underlying) => {
                root.contains(error) || underlying.contains_where(|branch| branch.contains(error))
            }
        }
    }
}

impl<E: fmt::Display> CompositeError<E> {
    fn fmt_with_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let inset = "  ".repeat(indent);
        match self {
            CompositeError::Simple(error) => write!(f, "{inset}- root error: {error}"),
            CompositeError::Composite(root, underlying) => {
                match root.as_ref() {
                    CompositeError::Simple(error) => writeln!(f, "{inset}- error: {error}")?,
                    nested => {
                        nested.fmt_with_indent(f, indent)?;
                        writeln!(f)?;
                    }
                }
                writeln!(f, "{inset}  - underlying errors:")?;
                for (index, branch) in underlying.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    branch.fmt_with_indent(f, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the tree with increasing indentation per nesting level; used for
/// diagnostics only, never parsed.
impl<E: fmt::Display> fmt::Display for CompositeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_indent(f, 0)
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for CompositeError<E> {}

/// Execution-level classification of a side-effect failure.
///
/// `Custom` carries a caller-defined error, either produced by a leaf effect
/// or installed by a sequence node's `wrap_error`; `BulkExecution` is the
/// synthetic tag marking an aggregated failure from concurrent fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SideEffectExecutionError<E> {
    /// A caller-defined error, opaque to the engine.
    #[error("{0}")]
    Custom(E),
    /// Summary tag for a failed concurrent batch; always paired with the
    /// list of actual underlying failures.
    #[error("side effect bulk execution error")]
    BulkExecution,
}

/// Success, or failure with an attached error.
///
/// Effect-execution failures are recoverable data and travel through this
/// type; precondition violations never do, they panic at the point of
/// detection.
///
/// # Examples
///
/// ```
/// use statefold::Completion;
///
/// let done: Completion<&str> = Completion::Success;
/// assert!(done.is_success());
///
/// let failed = Completion::Failure("boom");
/// assert!(failed.is_failure());
/// assert_eq!(failed.error(), Some(&"boom"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    /// The operation completed successfully.
    Success,
    /// The operation failed with the given error.
    Failure(E),
}

impl<E> Completion<E> {
    /// Whether this is `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Success)
    }

    /// Whether this is `Failure`.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The error if this is a failure.
    pub fn error(&self) -> Option<&E> {
        match self {
            Completion::Success => None,
            Completion::Failure(error) => Some(error),
        }
    }

    /// Consume self, returning the error if this is a failure.
    pub fn into_error(self) -> Option<E> {
        match self {
            Completion::Success => None,
            Completion::Failure(error) => Some(error),
        }
    }

    /// Map the failure value, leaving success untouched.
    pub fn map_failure<F, M: FnOnce(E) -> F>(self, f: M) -> Completion<F> {
        match self {
            Completion::Success => Completion::Success,
            Completion::Failure(error) => Completion::Failure(f(error)),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Completion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Success => write!(f, "success"),
            Completion::Failure(error) => write!(f, "failure: {error}"),
        }
    }
}
