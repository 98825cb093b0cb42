#![allow(dead_code)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use statefold::{
    Completion, CompositeError, DefaultCoeffects, EffectError, Reducer, Request,
    SideEffectExecutionError, SideEffectPerformer,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub count: u64,
    pub name: String,
    pub session: Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn {
        user: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRequest {
    Increment,
    SetName(String),
    LogIn(String),
    LogOut,
    /// Allowed to leave the state untouched.
    Touch,
}

impl Request for AppRequest {
    fn must_result_in_change(&self) -> bool {
        !matches!(self, AppRequest::Touch)
    }
}

pub fn app_reducer<C: 'static>() -> Reducer<AppState, AppRequest, C> {
    Reducer::new(|state: &mut AppState, requests: &[AppRequest], _coeffects: &C| {
        for request in requests {
            match request {
                AppRequest::Increment => state.count += 1,
                AppRequest::SetName(name) => state.name = name.clone(),
                AppRequest::LogIn(user) => {
                    state.session = Session::LoggedIn { user: user.clone() }
                }
                AppRequest::LogOut => state.session = Session::LoggedOut,
                AppRequest::Touch => {}
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TestError(pub &'static str);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSideEffect {
    Succeed,
    Fail(TestError),
    /// Record a label, then succeed.
    Record(&'static str),
    /// Record a label, then fail.
    RecordFail(&'static str, TestError),
}

pub type Recorded = Arc<Mutex<Vec<&'static str>>>;

/// A leaf error as it comes out of the performer.
pub fn custom(error: TestError) -> EffectError<TestError> {
    CompositeError::simple(SideEffectExecutionError::Custom(error))
}

pub fn test_coeffects() -> DefaultCoeffects {
    DefaultCoeffects::new()
}

/// A performer interpreting [`TestSideEffect`], appending labels to
/// `recorded` as leaves execute.
pub fn recording_performer(
    recorded: Recorded,
) -> SideEffectPerformer<TestSideEffect, TestError, DefaultCoeffects> {
    SideEffectPerformer::new(move |effect, _coeffects| {
        let recorded = Arc::clone(&recorded);
        async move {
            match effect {
                TestSideEffect::Succeed => Completion::Success,
                TestSideEffect::Fail(error) => Completion::Failure(custom(error)),
                TestSideEffect::Record(label) => {
                    recorded.lock().push(label);
                    Completion::Success
                }
                TestSideEffect::RecordFail(label, error) => {
                    recorded.lock().push(label);
                    Completion::Failure(custom(error))
                }
            }
        }
    })
}

pub fn performer() -> SideEffectPerformer<TestSideEffect, TestError, DefaultCoeffects> {
    recording_performer(Arc::new(Mutex::new(Vec::new())))
}
