/// Which branch of a sequenced side effect a follow-up effect attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpMode {
    /// Attach to the success branch only.
    Success,
    /// Attach to the failure branch only.
    Failure,
}

/// A tree describing side-effect execution, as pure data.
///
/// The tree carries no identity beyond structural equality and performs
/// nothing by itself — it is safe to construct, compare, and discard. A
/// [`SideEffectPerformer`](crate::SideEffectPerformer) interprets it:
///
/// - `DoNothing` — the identity element, immediate success.
/// - `Only` — a single opaque effect description, handed to the injected
///   leaf interpreter.
/// - `Sequenced` — run `first`, then `on_success` or `on_failure` depending
///   on its outcome; `wrap_error` optionally wraps whatever error results.
/// - `Concurrently` — run all children concurrently, succeed iff all do.
///
/// # Examples
///
/// ```
/// use statefold::CompositeSideEffect;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Effect {
///     Save,
///     Notify,
///     Rollback,
/// }
///
/// let effect: CompositeSideEffect<Effect, &str> = CompositeSideEffect::after(
///     Effect::Save,
///     CompositeSideEffect::only(Effect::Notify),
///     CompositeSideEffect::only(Effect::Rollback),
///     Some("saving failed"),
/// );
/// assert_ne!(effect, CompositeSideEffect::DoNothing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeSideEffect<SE, E> {
    /// Do nothing; succeeds immediately.
    DoNothing,
    /// A single leaf effect.
    Only(SE),
    /// Ordered composition with success/failure continuations.
    Sequenced {
        /// The effect executed first.
        first: Box<CompositeSideEffect<SE, E>>,
        /// Executed when `first` succeeds.
        on_success: Box<CompositeSideEffect<SE, E>>,
        /// Executed when `first` fails.
        on_failure: Box<CompositeSideEffect<SE, E>>,
        /// When set, wraps any error produced at this level.
        wrap_error: Option<E>,
    },
    /// Concurrent fan-out; succeeds iff every child succeeds.
    Concurrently(Vec<CompositeSideEffect<SE, E>>),
}

impl<SE, E> CompositeSideEffect<SE, E> {
    /// The identity effect.
    pub fn do_nothing() -> Self {
        CompositeSideEffect::DoNothing
    }

    /// A single leaf effect.
    pub fn only(effect: SE) -> Self {
        CompositeSideEffect::Only(effect)
    }

    /// Sequence `first` with outcome-dependent continuations.
    pub fn sequenced(
        first: CompositeSideEffect<SE, E>,
        on_success: CompositeSideEffect<SE, E>,
        on_failure: CompositeSideEffect<SE, E>,
        wrap_error: Option<E>,
    ) -> Self {
        CompositeSideEffect::Sequenced {
            first: Box::new(first),
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
            wrap_error,
        }
    }

    /// Sequence a leaf effect with outcome-dependent continuations.
    pub fn after(
        effect: SE,
        on_success: CompositeSideEffect<SE, E>,
        on_failure: CompositeSideEffect<SE, E>,
        wrap_error: Option<E>,
    ) -> Self {
        Self::sequenced(
            CompositeSideEffect::Only(effect),
            on_success,
            on_failure,
            wrap_error,
        )
    }

    /// A leaf effect whose error, if any, is wrapped inside `wrap_error`.
    pub fn wrapping(effect: SE, wrap_error: Option<E>) -> Self {
        Self::sequenced(
            CompositeSideEffect::Only(effect),
            CompositeSideEffect::DoNothing,
            CompositeSideEffect::DoNothing,
            wrap_error,
        )
    }

    /// Run `self`, then `effect` on the branch selected by `mode`.
    ///
    /// Attaching to `DoNothing` collapses to `effect` itself.
    pub fn and_in_case_of(self, mode: FollowUpMode, effect: CompositeSideEffect<SE, E>) -> Self {
        if matches!(self, CompositeSideEffect::DoNothing) {
            return effect;
        }

        let (on_success, on_failure) = match mode {
            FollowUpMode::Success => (effect, CompositeSideEffect::DoNothing),
            FollowUpMode::Failure => (CompositeSideEffect::DoNothing, effect),
        };

        Self::sequenced(self, on_success, on_failure, None)
    }

    /// Run `self`, then `effect`, regardless of whether `self` failed.
    ///
    /// Note that per the sequencing semantics, a failure of `self` still
    /// fails the whole composition even though `effect` runs.
    pub fn and_then_perform(self, effect: CompositeSideEffect<SE, E>) -> Self
    where
        SE: Clone,
        E: Clone,
    {
        self.and_in_case_of(FollowUpMode::Success, effect.clone())
            .and_in_case_of(FollowUpMode::Failure, effect)
    }
}
