mod common;

use common::{AppState, Session};
use statefold::PropertyPath;

fn session_path() -> PropertyPath<AppState, Session> {
    PropertyPath::total(|state: &AppState| state.session.clone())
}

fn user_path() -> PropertyPath<Session, String> {
    PropertyPath::case(|session: &Session| match session {
        Session::LoggedIn { user } => Some(user.clone()),
        Session::LoggedOut => None,
    })
}

#[test]
fn test_total_path_always_projects() {
    let path = PropertyPath::total(|state: &AppState| state.count);

    let state = AppState {
        count: 42,
        ..AppState::default()
    };
    assert_eq!(path.value_in(&state), Some(42));
    assert_eq!(path.value_in(&AppState::default()), Some(0));
}

#[test]
fn test_case_path_projects_only_the_matching_arm() {
    let path = user_path();

    assert_eq!(
        path.value_in(&Session::LoggedIn { user: "ada".into() }),
        Some("ada".to_string())
    );
    assert_eq!(path.value_in(&Session::LoggedOut), None);
}

#[test]
fn test_then_composes_left_to_right() {
    let path = session_path().then(&user_path());

    let logged_in = AppState {
        session: Session::LoggedIn { user: "ada".into() },
        ..AppState::default()
    };
    assert_eq!(path.value_in(&logged_in), Some("ada".to_string()));
}

#[test]
fn test_then_short_circuits_on_absence() {
    let length = PropertyPath::total(|user: &String| user.len());
    let path = session_path().then(&user_path()).then(&length);

    assert_eq!(path.value_in(&AppState::default()), None);

    let logged_in = AppState {
        session: Session::LoggedIn { user: "ada".into() },
        ..AppState::default()
    };
    assert_eq!(path.value_in(&logged_in), Some(3));
}

#[test]
fn test_clones_share_the_projection() {
    let path = session_path().then(&user_path());
    let clone = path.clone();

    let state = AppState {
        session: Session::LoggedIn { user: "ada".into() },
        ..AppState::default()
    };
    assert_eq!(path.value_in(&state), clone.value_in(&state));
}
