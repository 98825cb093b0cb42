mod common;

use common::TestError;
use statefold::{Completion, CompositeError, NonEmptyList, SideEffectExecutionError};

#[test]
fn test_non_empty_list_from_vec_preserves_order() {
    let list = NonEmptyList::from_vec(vec![1, 2, 3]);
    assert_eq!(*list.head(), 1);
    assert_eq!(list.len(), 3);
    assert_eq!(list.to_vec(), vec![1, 2, 3]);
}

#[test]
#[should_panic(expected = "empty collection")]
fn test_non_empty_list_from_empty_vec_panics() {
    let _ = NonEmptyList::<u32>::from_vec(Vec::new());
}

#[test]
fn test_non_empty_list_is_never_empty() {
    let list = NonEmptyList::Single(1);
    assert!(!list.is_empty());
    assert_eq!(list.len(), 1);
}

#[test]
fn test_appended_head_becomes_the_new_head() {
    let list = NonEmptyList::Single(2).with_appended_head(1);
    assert_eq!(*list.head(), 1);
    assert_eq!(list.to_vec(), vec![1, 2]);
}

#[test]
fn test_non_empty_list_contains() {
    let list = NonEmptyList::from_vec(vec![1, 2, 3]);
    assert!(list.contains(&2));
    assert!(!list.contains(&4));
    assert!(list.contains_where(|element| element % 2 == 0));
}

#[test]
fn test_non_empty_list_map_preserves_structure() {
    let list = NonEmptyList::from_vec(vec![1, 2, 3]).map(|element| element * 10);
    assert_eq!(list.to_vec(), vec![10, 20, 30]);
}

#[test]
fn test_non_empty_list_display() {
    let list = NonEmptyList::from_vec(vec!["a", "b"]);
    assert_eq!(list.to_string(), "(a), (b)");
}

#[test]
fn test_root_error_descends_to_first_underlying_leaf() {
    let original = CompositeError::simple("disk full");
    let handler = CompositeError::simple("cleanup failed");
    let error = CompositeError::composite(handler, NonEmptyList::Single(original));

    assert_eq!(*error.root_error(), "disk full");
}

#[test]
fn test_contains_searches_the_whole_tree() {
    let error = CompositeError::composite(
        CompositeError::simple("top"),
        NonEmptyList::from_vec(vec![
            CompositeError::simple("left"),
            CompositeError::composite(
                CompositeError::simple("mid"),
                NonEmptyList::Single(CompositeError::simple("deep")),
            ),
        ]),
    );

    for leaf in ["top", "left", "mid", "deep"] {
        assert!(error.contains(&leaf), "missing {leaf}");
    }
    assert!(!error.contains(&"absent"));
}

#[test]
fn test_wrapped_without_wrapper_is_identity() {
    let underlying = CompositeError::simple("inner");
    assert_eq!(
        CompositeError::wrapped(None, underlying.clone()),
        underlying
    );
}

#[test]
fn test_wrapped_with_wrapper_adds_one_level() {
    let wrapped = CompositeError::wrapped(Some("outer"), CompositeError::simple("inner"));
    assert_eq!(
        wrapped,
        CompositeError::composite(
            CompositeError::simple("outer"),
            NonEmptyList::Single(CompositeError::simple("inner")),
        )
    );
    assert_eq!(*wrapped.root_error(), "inner");
}

#[test]
fn test_map_transforms_every_leaf() {
    let error = CompositeError::composite(
        CompositeError::simple(1),
        NonEmptyList::from_vec(vec![
            CompositeError::simple(2),
            CompositeError::simple(3),
        ]),
    );

    let mapped = error.map(|leaf| leaf * 10);
    assert!(mapped.contains(&10));
    assert!(mapped.contains(&20));
    assert!(mapped.contains(&30));
    assert_eq!(*mapped.root_error(), 20);
}

#[test]
fn test_deeply_nested_trees_build_and_traverse() {
    let mut error = CompositeError::simple(0u32);
    for wrapper in 1..=64 {
        error = CompositeError::wrapped(Some(wrapper), error);
    }

    assert_eq!(*error.root_error(), 0);
    assert!(error.contains(&64));
    assert!(error.contains(&1));

    let mapped = error.map(|leaf| leaf + 100);
    assert_eq!(*mapped.root_error(), 100);
}

#[test]
fn test_simple_error_display() {
    let error = CompositeError::simple(TestError("boom"));
    assert_eq!(error.to_string(), "- root error: boom");
}

#[test]
fn test_composite_error_display_indents_underlying_branches() {
    let error = CompositeError::composite(
        CompositeError::simple("cleanup failed"),
        NonEmptyList::Single(CompositeError::simple("disk full")),
    );

    let rendered = error.to_string();
    assert!(rendered.contains("- error: cleanup failed"));
    assert!(rendered.contains("- underlying errors:"));
    assert!(rendered.contains("    - root error: disk full"));
}

#[test]
fn test_side_effect_execution_error_display() {
    let custom: SideEffectExecutionError<TestError> =
        SideEffectExecutionError::Custom(TestError("boom"));
    assert_eq!(custom.to_string(), "boom");

    let bulk: SideEffectExecutionError<TestError> = SideEffectExecutionError::BulkExecution;
    assert_eq!(bulk.to_string(), "side effect bulk execution error");
}

#[test]
fn test_completion_accessors() {
    let done: Completion<&str> = Completion::Success;
    assert!(done.is_success());
    assert!(!done.is_failure());
    assert_eq!(done.error(), None);

    let failed = Completion::Failure("boom");
    assert!(failed.is_failure());
    assert_eq!(failed.error(), Some(&"boom"));
    assert_eq!(failed.clone().into_error(), Some("boom"));
    assert_eq!(failed.map_failure(str::len), Completion::Failure(4));
}
