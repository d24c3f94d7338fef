//! Tests for comparing two reports

use xml_report_diff::{compare_reports, Moves};
use xml_test_harness::{Category, Report};

fn report(entries: &[(Category, &str)]) -> Report {
    let mut report = Report::default();
    for (category, name) in entries {
        report.record(*category, *name);
    }
    report
}

#[test]
fn a_failing_test_is_reported_as_moved() {
    let old = report(&[(Category::Success, "t1"), (Category::Success, "t2")]);
    let new = report(&[(Category::Success, "t1"), (Category::Failed, "t2")]);

    let diff = compare_reports(&old, &new);
    let moved: Vec<_> = diff.moved().collect();
    assert_eq!(moved, [("t2", Category::Success, Category::Failed)]);
    assert!(diff.vanished.is_empty());

    let expected = "\
Summary of differences:
    status parse_error: no change
    status evaluate_error: no change
    status execute_error: no change
    status testcode_error: no change
    status success: -1
    status failed: +1

t2 was success, is now failed
";
    assert_eq!(diff.to_string(), expected);
}

#[test]
fn identical_reports_have_no_differences() {
    let old = report(&[(Category::Success, "t1"), (Category::ParseError, "t2")]);

    let diff = compare_reports(&old, &old.clone());
    assert!(diff.changes.iter().all(|change| change.delta() == 0));
    assert!(diff.moves.is_empty());
    assert_eq!(diff.moved().count(), 0);
}

#[test]
fn moves_are_grouped_by_category_pair() {
    let old = report(&[
        (Category::Failed, "a"),
        (Category::Success, "b"),
        (Category::Failed, "c"),
        (Category::Failed, "d"),
    ]);
    let new = report(&[
        (Category::Success, "a"),
        (Category::EvaluateError, "b"),
        (Category::Success, "c"),
        (Category::ParseError, "d"),
    ]);

    let diff = compare_reports(&old, &new);
    assert_eq!(
        diff.moves,
        [
            Moves {
                from: Category::Success,
                to: Category::EvaluateError,
                names: vec!["b".to_string()],
            },
            Moves {
                from: Category::Failed,
                to: Category::Success,
                names: vec!["a".to_string(), "c".to_string()],
            },
            Moves {
                from: Category::Failed,
                to: Category::ParseError,
                names: vec!["d".to_string()],
            },
        ]
    );
}

#[test]
fn count_changes_are_signed() {
    let old = report(&[(Category::Failed, "x")]);
    let new = report(&[(Category::ExecuteError, "x")]);

    let diff = compare_reports(&old, &new);
    let change = |category| {
        diff.changes
            .iter()
            .find(|change| change.category == category)
            .map(|change| change.to_string())
            .unwrap()
    };
    assert_eq!(change(Category::ExecuteError), "status execute_error: +1");
    assert_eq!(change(Category::Failed), "status failed: -1");
    assert_eq!(change(Category::Success), "status success: no change");
}

#[test]
fn vanished_names_are_not_reported_as_moves() {
    let old = report(&[(Category::Success, "t1"), (Category::Failed, "gone")]);
    let new = report(&[(Category::Success, "t1")]);

    let diff = compare_reports(&old, &new);
    assert!(diff.moves.is_empty());
    assert_eq!(diff.vanished, [("gone".to_string(), Category::Failed)]);
    assert!(!diff.to_string().contains("gone"));
}

#[test]
fn new_names_only_change_counts() {
    let old = report(&[(Category::Success, "t1")]);
    let new = report(&[(Category::Success, "t1"), (Category::Success, "t2")]);

    let diff = compare_reports(&old, &new);
    assert!(diff.moves.is_empty());
    let success = diff
        .changes
        .iter()
        .find(|change| change.category == Category::Success)
        .unwrap();
    assert_eq!((success.old, success.new, success.delta()), (1, 2, 1));
}
