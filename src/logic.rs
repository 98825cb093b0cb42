//! The orchestrator tying requests and side effects together.
//!
//! An [`Executable`] bundles the three phases of one unit of work: initial
//! requests applied to the model, a composite side effect, and a
//! [`FollowUp`] describing which requests to apply once the side effect's
//! outcome is known. A [`LogicModule`] executes them, serializing executions
//! so that each one fully resolves before the next begins.

use crate::error::Completion;
use crate::model::Model;
use crate::observer::ModelObserver;
use crate::performer::{EffectCompletion, SideEffectPerformer};
use crate::side_effect::CompositeSideEffect;
use crate::store::Request;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What happens after an executable's side effect resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp<R> {
    /// No further requests.
    Nothing,
    /// Abort the process if the side effect failed — a deliberate "this must
    /// never fail" assertion. On success, apply the given requests.
    CrashOnFailure(Vec<R>),
    /// Apply one request list on success, the other on failure. Both
    /// branches are always present by construction.
    Requests {
        /// Applied when the side effect succeeded.
        success: Vec<R>,
        /// Applied when the side effect failed.
        failure: Vec<R>,
    },
}

/// A unit of work: initial requests, one side effect, and outcome-dependent
/// follow-up requests.
///
/// # Examples
///
/// ```
/// use statefold::{CompositeSideEffect, Executable, FollowUp};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Request {
///     DismissError,
///     ShowFallback,
/// }
///
/// let executable: Executable<Request, (), &str> = Executable::request(Request::DismissError)
///     .with_side_effect(CompositeSideEffect::DoNothing)
///     .with_follow_up(FollowUp::Requests {
///         success: vec![],
///         failure: vec![Request::ShowFallback],
///     });
/// assert_eq!(executable.initial_requests(), &[Request::DismissError]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Executable<R, SE, E> {
    initial_requests: Vec<R>,
    side_effect: CompositeSideEffect<SE, E>,
    follow_up: FollowUp<R>,
}

impl<R, SE, E> Executable<R, SE, E> {
    /// An executable applying a single initial request.
    pub fn request(request: R) -> Self {
        Self::requests(vec![request])
    }

    /// An executable applying the given initial requests.
    pub fn requests(requests: Vec<R>) -> Self {
        Executable {
            initial_requests: requests,
            side_effect: CompositeSideEffect::DoNothing,
            follow_up: FollowUp::Nothing,
        }
    }

    /// An executable with no initial requests, only a side effect.
    pub fn side_effect(side_effect: CompositeSideEffect<SE, E>) -> Self {
        Self::requests(Vec::new()).with_side_effect(side_effect)
    }

    /// Replace the side effect.
    pub fn with_side_effect(mut self, side_effect: CompositeSideEffect<SE, E>) -> Self {
        self.side_effect = side_effect;
        self
    }

    /// Replace the follow-up behavior.
    pub fn with_follow_up(mut self, follow_up: FollowUp<R>) -> Self {
        self.follow_up = follow_up;
        self
    }

    /// The requests applied before the side effect runs.
    pub fn initial_requests(&self) -> &[R] {
        &self.initial_requests
    }

    /// Map every request into another request type, keeping the side effect.
    pub fn with_mapped_requests<R2, F: Fn(R) -> R2>(self, f: F) -> Executable<R2, SE, E> {
        let follow_up = match self.follow_up {
            FollowUp::Nothing => FollowUp::Nothing,
            FollowUp::CrashOnFailure(requests) => {
                FollowUp::CrashOnFailure(requests.into_iter().map(&f).collect())
            }
            FollowUp::Requests { success, failure } => FollowUp::Requests {
                success: success.into_iter().map(&f).collect(),
                failure: failure.into_iter().map(&f).collect(),
            },
        };

        Executable {
            initial_requests: self.initial_requests.into_iter().map(&f).collect(),
            side_effect: self.side_effect,
            follow_up,
        }
    }
}

/// Orchestrator owning a [`Model`], a [`SideEffectPerformer`], and the
/// coeffects handed to both. Typically an application holds a single logic
/// module.
///
/// Executions are serialized: at most one [`execute`](LogicModule::execute)
/// runs at a time, and queued executions proceed in submission order. Within
/// one execution the phases are strictly ordered — initial requests commit,
/// the side effect tree runs to completion, then the follow-up requests
/// commit.
pub struct LogicModule<S, R, SE, E, C> {
    model: Arc<Model<S, R, C>>,
    performer: SideEffectPerformer<SE, E, C>,
    coeffects: C,
    /// Keeps statically registered observers alive for the module's lifetime.
    _static_observers: Vec<Arc<ModelObserver<S>>>,
    execution: Mutex<()>,
}

impl<S, R, SE, E, C> LogicModule<S, R, SE, E, C>
where
    S: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
    R: Request,
    SE: Send + 'static,
    E: fmt::Display + Send + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Create a logic module.
    ///
    /// `static_observers` are registered immediately and held strongly until
    /// the module is dropped; observers with a shorter lifetime should be
    /// registered through [`add_observer`](LogicModule::add_observer)
    /// instead.
    pub fn new(
        model: Arc<Model<S, R, C>>,
        performer: SideEffectPerformer<SE, E, C>,
        coeffects: C,
        static_observers: Vec<Arc<ModelObserver<S>>>,
    ) -> Self {
        for observer in &static_observers {
            model.add(observer);
        }

        LogicModule {
            model,
            performer,
            coeffects,
            _static_observers: static_observers,
            execution: Mutex::new(()),
        }
    }

    /// Execute one executable: initial requests, side effect, follow-up.
    ///
    /// Returns the side effect's outcome.
    ///
    /// # Panics
    ///
    /// Panics if the follow-up is [`FollowUp::CrashOnFailure`] and the side
    /// effect failed.
    pub async fn execute(&self, executable: Executable<R, SE, E>) -> EffectCompletion<E> {
        let _guard = self.execution.lock().await;
        self.execute_locked(executable).await
    }

    /// Execute `executables` strictly in order, each one fully resolving —
    /// follow-up requests committed — before the next one's initial
    /// requests are applied.
    pub async fn execute_sequentially(
        &self,
        executables: Vec<Executable<R, SE, E>>,
    ) -> Vec<EffectCompletion<E>> {
        let _guard = self.execution.lock().await;

        let mut outcomes = Vec::with_capacity(executables.len());
        for executable in executables {
            outcomes.push(self.execute_locked(executable).await);
        }
        outcomes
    }

    async fn execute_locked(&self, executable: Executable<R, SE, E>) -> EffectCompletion<E> {
        let Executable {
            initial_requests,
            side_effect,
            follow_up,
        } = executable;

        self.model
            .handle_in_single_transaction(&initial_requests, &self.coeffects);

        let outcome = self
            .performer
            .perform(side_effect, self.coeffects.clone())
            .await;

        match follow_up {
            FollowUp::Nothing => {}
            FollowUp::CrashOnFailure(success_requests) => {
                if let Completion::Failure(error) = &outcome {
                    panic!("side effect declared infallible failed:\n{error}");
                }
                self.model
                    .handle_in_single_transaction(&success_requests, &self.coeffects);
            }
            FollowUp::Requests { success, failure } => {
                let requests = if outcome.is_success() { success } else { failure };
                self.model
                    .handle_in_single_transaction(&requests, &self.coeffects);
            }
        }

        outcome
    }

    /// Perform a composite side effect outside of any executable.
    pub async fn perform(&self, side_effect: CompositeSideEffect<SE, E>) -> EffectCompletion<E> {
        self.performer
            .perform(side_effect, self.coeffects.clone())
            .await
    }

    /// Perform a bare leaf effect.
    pub async fn perform_leaf(&self, effect: SE) -> EffectCompletion<E> {
        self.perform(CompositeSideEffect::Only(effect)).await
    }

    /// Submit requests for batched transactional handling.
    pub fn handle_in_single_transaction(&self, requests: &[R]) {
        self.model
            .handle_in_single_transaction(requests, &self.coeffects);
    }

    /// Register a weakly held observer; see [`Model::add`].
    pub fn add_observer(&self, observer: &Arc<ModelObserver<S>>) {
        self.model.add(observer);
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> S {
        self.model.state()
    }

    /// The coeffects handed to reducers and side effects.
    pub fn coeffects(&self) -> &C {
        &self.coeffects
    }
}
