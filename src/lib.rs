//! Unidirectional state management: immutable requests fold into a single
//! authoritative state through pure reducers, while side effects are
//! described as data, executed by a separate engine, and report their
//! outcomes back as further requests.
//!
//! The pieces:
//!
//! - [`Store`] — the single-writer state cell; one notification per
//!   transaction, none for no-op reductions.
//! - [`Reducer`] — the pure batch fold, with combinators for sequencing and
//!   lifting onto enclosing state/request types.
//! - [`Model`] — an observable store; observers bind a [`PropertyPath`] to
//!   callbacks and are held weakly.
//! - [`CompositeSideEffect`] / [`SideEffectPerformer`] — effect trees as
//!   pure data and their recursive async executor.
//! - [`LogicModule`] / [`Executable`] — the orchestrator running
//!   requests → side effect → follow-up requests as one serialized unit.
//! - [`Coeffects`] — injected read-only environment capabilities keeping
//!   reducers pure.

mod change;
mod coeffects;
mod error;
mod logic;
mod model;
mod observer;
mod path;
mod performer;
pub mod persist;
mod reducer;
mod side_effect;
mod store;

pub use change::{Change, PotentialChange};
pub use coeffects::{Coeffects, DefaultCoeffects};
pub use error::{Completion, CompositeError, NonEmptyList, SideEffectExecutionError};
pub use logic::{Executable, FollowUp, LogicModule};
pub use model::Model;
pub use observer::{ModelObserver, PropertyPathObserver, ValueObserver};
pub use path::PropertyPath;
pub use performer::{EffectCompletion, EffectError, SideEffectPerformer};
pub use persist::{ByteStore, FileByteStore, MemoryByteStore};
pub use reducer::Reducer;
pub use side_effect::{CompositeSideEffect, FollowUpMode};
pub use store::{Request, Store};
