mod common;

use common::{AppRequest, AppState, app_reducer};
use parking_lot::Mutex;
use statefold::{Change, Store};
use std::sync::Arc;

fn store() -> Store<AppState, AppRequest, ()> {
    Store::new(AppState::default(), app_reducer())
}

fn observed_changes(
    store: &mut Store<AppState, AppRequest, ()>,
) -> Arc<Mutex<Vec<Change<AppState>>>> {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    store.set_subscription(move |change| sink.lock().push(change.clone()));
    changes
}

#[test]
fn test_batch_commits_once_with_one_notification() {
    let mut store = store();
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(&[AppRequest::Increment, AppRequest::Increment], &());

    assert_eq!(store.state().count, 2);

    let changes = changes.lock();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous().count, 0);
    assert_eq!(changes[0].current().count, 2);
}

#[test]
fn test_empty_batch_is_a_no_op() {
    let mut store = store();
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(&[], &());

    assert_eq!(*store.state(), AppState::default());
    assert!(changes.lock().is_empty());
}

#[test]
fn test_no_op_reduction_notifies_nothing() {
    let mut store = store();
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(&[AppRequest::Touch], &());

    assert_eq!(*store.state(), AppState::default());
    assert!(changes.lock().is_empty());
}

#[test]
fn test_idempotent_request_notifies_only_the_first_time() {
    let mut store = store();
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(&[AppRequest::SetName("ada".into())], &());
    store.handle_in_single_transaction(&[AppRequest::SetName("ada".into())], &());

    assert_eq!(store.state().name, "ada");
    assert_eq!(changes.lock().len(), 1);
}

#[test]
fn test_requests_that_cancel_out_notify_nothing() {
    let mut store = store();
    store.handle_in_single_transaction(&[AppRequest::LogIn("ada".into())], &());
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(
        &[AppRequest::LogOut, AppRequest::LogIn("ada".into())],
        &(),
    );

    assert!(changes.lock().is_empty());
}

#[test]
fn test_transactions_accumulate() {
    let mut store = store();
    let changes = observed_changes(&mut store);

    store.handle_in_single_transaction(&[AppRequest::Increment], &());
    store.handle_in_single_transaction(&[AppRequest::Increment], &());

    assert_eq!(store.state().count, 2);

    let changes = changes.lock();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].previous().count, 1);
    assert_eq!(changes[1].current().count, 2);
}
