mod common;

use common::{AppState, Session};
use statefold::{Change, PotentialChange};

#[test]
fn test_change_holds_both_endpoints() {
    let change = Change::new(1, 2);
    assert_eq!(*change.previous(), 1);
    assert_eq!(*change.current(), 2);
}

#[test]
#[should_panic(expected = "must not equal")]
fn test_change_with_equal_endpoints_panics() {
    let _ = Change::new(7, 7);
}

#[test]
fn test_safe_instance_rejects_equal_endpoints() {
    assert!(Change::safe_instance(3, 3).is_none());
    assert_eq!(Change::safe_instance(3, 4), Some(Change::new(3, 4)));
}

#[test]
fn test_potential_change_records_comparison_at_construction() {
    let actual = PotentialChange::new("a", "b");
    assert!(actual.is_actual_change());
    assert_eq!(*actual.previous(), "a");
    assert_eq!(*actual.current(), "b");

    let noop = PotentialChange::new("a", "a");
    assert!(!noop.is_actual_change());
}

#[test]
fn test_from_potential_converts_only_actual_changes() {
    assert_eq!(
        Change::from_potential(PotentialChange::new(1, 2)),
        Some(Change::new(1, 2))
    );
    assert_eq!(Change::from_potential(PotentialChange::new(1, 1)), None);
}

#[test]
fn test_has_change_at_compares_projections() {
    let previous = AppState {
        count: 1,
        name: "ada".into(),
        session: Session::LoggedOut,
    };
    let mut current = previous.clone();
    current.count = 2;

    let change = Change::new(previous, current);
    assert!(change.has_change_at(|state| state.count));
    assert!(!change.has_change_at(|state| state.name.clone()));
}

#[test]
fn test_change_for_projects_into_sub_change() {
    let change = Change::new((1, "a"), (2, "a"));

    let projected = change.change_for(|pair| pair.0).unwrap();
    assert_eq!(*projected.previous(), 1);
    assert_eq!(*projected.current(), 2);

    assert!(change.change_for(|pair| pair.1).is_none());
}

#[test]
fn test_potential_change_for_keeps_equal_projections() {
    let change = Change::new((1, "a"), (2, "a"));

    let potential = change.potential_change_for(|pair| pair.1);
    assert!(!potential.is_actual_change());
    assert_eq!(*potential.previous(), "a");
}

#[test]
fn test_execute_if_change_of_runs_only_on_projected_change() {
    let change = Change::new((0, false), (0, true));

    let mut seen = None;
    change.execute_if_change_of(|pair| pair.1, |sub| seen = Some(*sub.current()));
    assert_eq!(seen, Some(true));

    let mut untouched = true;
    change.execute_if_change_of(|pair| pair.0, |_| untouched = false);
    assert!(untouched);
}

#[test]
fn test_change_serializes_both_endpoints() {
    let change = Change::new(
        AppState::default(),
        AppState {
            count: 3,
            name: "ada".into(),
            session: Session::LoggedIn { user: "ada".into() },
        },
    );

    let json = serde_json::to_value(&change).unwrap();
    assert_eq!(json["previous"]["count"], 0);
    assert_eq!(json["current"]["count"], 3);
    assert_eq!(json["current"]["name"], "ada");
}
