//! Recursive interpreter for [`CompositeSideEffect`] trees.
//!
//! Leaf effects are opaque to the engine; the performer is constructed with
//! an async interpreter closure that gives them meaning. Everything else —
//! sequencing, branch selection, error wrapping, and concurrent fan-out with
//! failure aggregation — is handled here.

use crate::error::{Completion, CompositeError, NonEmptyList, SideEffectExecutionError};
use crate::side_effect::CompositeSideEffect;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinSet;

/// The error tree produced by effect execution: domain errors and
/// execution-level tags composed into a [`CompositeError`].
pub type EffectError<E> = CompositeError<SideEffectExecutionError<E>>;

/// The outcome of performing a composite side effect.
pub type EffectCompletion<E> = Completion<EffectError<E>>;

type Interpreter<SE, E, C> = dyn Fn(SE, C) -> BoxFuture<'static, EffectCompletion<E>> + Send + Sync;

/// Executor of [`CompositeSideEffect`] trees.
///
/// `perform` walks the tree recursively, awaiting every step:
///
/// - `DoNothing` succeeds immediately.
/// - `Only` delegates to the injected leaf interpreter and returns its
///   outcome verbatim.
/// - `Sequenced` executes `first`, then the branch matching its outcome.
///   Running a failure branch never erases the failure it reacts to: if
///   `first` failed and the branch succeeded, the overall result is still a
///   failure carrying `first`'s error. If the branch *also* failed, the
///   overall error is a two-level tree — the branch's error on top, the
///   original underneath. `wrap_error` wraps whichever error results.
/// - `Concurrently` spawns one task per child and joins on all of them; no
///   child is cancelled when a sibling fails. Every failing child's error is
///   collected, and a non-empty collection fails the node with a
///   [`BulkExecution`](SideEffectExecutionError::BulkExecution) summary on
///   top. The order of aggregated errors follows completion order and is
///   unspecified.
///
/// The performer is cheap to clone; clones share the leaf interpreter. There
/// is no cancellation or timeout: once `perform` is invoked, the tree runs
/// to completion.
pub struct SideEffectPerformer<SE, E, C> {
    interpreter: Arc<Interpreter<SE, E, C>>,
}

impl<SE, E, C> Clone for SideEffectPerformer<SE, E, C> {
    fn clone(&self) -> Self {
        SideEffectPerformer {
            interpreter: Arc::clone(&self.interpreter),
        }
    }
}

impl<SE, E, C> fmt::Debug for SideEffectPerformer<SE, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffectPerformer").finish_non_exhaustive()
    }
}

impl<SE, E, C> SideEffectPerformer<SE, E, C>
where
    SE: Send + 'static,
    E: Send + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Create a performer from an async leaf interpreter.
    pub fn new<F, Fut>(interpreter: F) -> Self
    where
        F: Fn(SE, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EffectCompletion<E>> + Send + 'static,
    {
        SideEffectPerformer {
            interpreter: Arc::new(move |effect, coeffects| Box::pin(interpreter(effect, coeffects))),
        }
    }

    /// Execute `side_effect` to completion, using `coeffects` for every leaf.
    pub fn perform(
        &self,
        side_effect: CompositeSideEffect<SE, E>,
        coeffects: C,
    ) -> BoxFuture<'static, EffectCompletion<E>> {
        let performer = self.clone();

        Box::pin(async move {
            match side_effect {
                CompositeSideEffect::DoNothing => Completion::Success,

                CompositeSideEffect::Only(effect) => {
                    (performer.interpreter)(effect, coeffects).await
                }

                CompositeSideEffect::Sequenced {
                    first,
                    on_success,
                    on_failure,
                    wrap_error,
                } => {
                    performer
                        .perform_sequenced(*first, *on_success, *on_failure, wrap_error, coeffects)
                        .await
                }

                CompositeSideEffect::Concurrently(children) => {
                    performer.perform_concurrently(children, coeffects).await
                }
            }
        })
    }

    async fn perform_sequenced(
        &self,
        first: CompositeSideEffect<SE, E>,
        on_success: CompositeSideEffect<SE, E>,
        on_failure: CompositeSideEffect<SE, E>,
        wrap_error: Option<E>,
        coeffects: C,
    ) -> EffectCompletion<E> {
        let wrapper = wrap_error.map(SideEffectExecutionError::Custom);

        match self.perform(first, coeffects.clone()).await {
            Completion::Success => match self.perform(on_success, coeffects).await {
                Completion::Success => Completion::Success,
                Completion::Failure(branch_error) => {
                    Completion::Failure(CompositeError::wrapped(wrapper, branch_error))
                }
            },
            Completion::Failure(first_error) => {
                match self.perform(on_failure, coeffects).await {
                    // The failure branch ran, but the original failure stands.
                    Completion::Success => {
                        Completion::Failure(CompositeError::wrapped(wrapper, first_error))
                    }
                    Completion::Failure(branch_error) => {
                        Completion::Failure(CompositeError::wrapped(
                            wrapper,
                            CompositeError::composite(
                                branch_error,
                                NonEmptyList::Single(first_error),
                            ),
                        ))
                    }
                }
            }
        }
    }

    async fn perform_concurrently(
        &self,
        children: Vec<CompositeSideEffect<SE, E>>,
        coeffects: C,
    ) -> EffectCompletion<E> {
        let mut tasks = JoinSet::new();

        for child in children {
            let performer = self.clone();
            let coeffects = coeffects.clone();
            tasks.spawn(async move { performer.perform(child, coeffects).await });
        }

        let mut errors = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Completion::Success) => {}
                Ok(Completion::Failure(error)) => errors.push(error),
                Err(join_error) => match join_error.try_into_panic() {
                    Ok(panic) => std::panic::resume_unwind(panic),
                    // Tasks are never aborted, so a non-panic join error
                    // cannot occur.
                    Err(join_error) => unreachable!("side effect task vanished: {join_error}"),
                },
            }
        }

        if errors.is_empty() {
            Completion::Success
        } else {
            Completion::Failure(CompositeError::composite(
                CompositeError::simple(SideEffectExecutionError::BulkExecution),
                NonEmptyList::from_vec(errors),
            ))
        }
    }
}
