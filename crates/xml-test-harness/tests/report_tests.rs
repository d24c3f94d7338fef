//! Tests for reports and exclusion policies

use xml_test_harness::{Category, ConfigError, Dependencies, ExclusionPolicy, Report, ReportError, Summary};

fn sample_report() -> Report {
    let mut report = Report::default();
    report.record(Category::Success, "set.t1");
    report.record(Category::Success, "set.t2");
    report.record(Category::Failed, "set.t3");
    report.record(Category::ParseError, "set.t4");
    report.summary.read = 6;
    report.summary.ignored = 1;
    report.summary.skipped = 1;
    report.summary.run = 3;
    report
}

#[test]
fn record_tracks_names_and_counts() {
    let report = sample_report();
    assert_eq!(report.names(Category::Success), ["set.t1", "set.t2"]);
    assert_eq!(report.summary.count(Category::Success), 2);
    assert_eq!(report.summary.count(Category::ParseError), 1);
    assert_eq!(report.category_of("set.t3"), Some(Category::Failed));
    assert_eq!(report.category_of("set.missing"), None);
}

#[test]
fn json_layout_matches_report_format() {
    let json = sample_report().to_json().unwrap();
    let expected = r#"{
  "parse_error": [
    "set.t4"
  ],
  "evaluate_error": [],
  "execute_error": [],
  "testcode_error": [],
  "success": [
    "set.t1",
    "set.t2"
  ],
  "failed": [
    "set.t3"
  ],
  "summary": {
    "read": 6,
    "ignored": 1,
    "skipped": 1,
    "run": 3,
    "parse_error": 1,
    "evaluate_error": 0,
    "execute_error": 0,
    "testcode_error": 0,
    "success": 2,
    "failed": 1
  }
}"#;
    assert_eq!(json, expected);
}

#[test]
fn reports_survive_a_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let report = sample_report();
    report.write_to(&path).unwrap();
    assert_eq!(Report::read_from(&path).unwrap(), report);
}

#[test]
fn unreadable_reports_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = Report::read_from(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ReportError::Io { .. })));

    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Report::read_from(&path), Err(ReportError::Json { .. })));
}

#[test]
fn summary_prints_one_line_per_count() {
    let summary = Summary {
        read: 10,
        ignored: 2,
        skipped: 1,
        run: 5,
        parse_error: 1,
        evaluate_error: 0,
        execute_error: 1,
        testcode_error: 0,
        success: 4,
        failed: 1,
    };
    let expected = "\
10 testcases read
2 testcases ignored
1 testcases skipped
5 testcases run

1 errors while parsing test statement
0 errors while evaluating test statement
1 other errors while executing testcase
0 errors from test code
4 success
1 failed";
    assert_eq!(summary.to_string(), expected);
}

#[test]
fn default_policy_excludes_newer_specs_and_higher_order_functions() {
    let policy = ExclusionPolicy::default();

    let spec = |tags: &[&str]| Dependencies {
        specs: tags.iter().map(|t| t.to_string()).collect(),
        ..Dependencies::default()
    };
    assert!(policy.excludes(&spec(&["XP31+"])));
    assert!(policy.excludes(&spec(&["XP20+", "XQ10+"])));
    assert!(!policy.excludes(&spec(&["XP20+"])));
    assert!(!policy.excludes(&Dependencies::default()));

    let feature = Dependencies {
        features: vec!["higherOrderFunctions".to_string()],
        ..Dependencies::default()
    };
    assert!(policy.excludes(&feature));

    assert!(policy.skips("prod-NameTest.NodeTest004"));
    assert!(policy.skips("fn-subsequence.cbcl-subsequence-012"));
    assert_eq!(policy.skip_tests.len(), 6);
}

#[test]
fn policy_files_override_built_in_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    std::fs::write(&path, r#"{ "skip_tests": ["set.slow"] }"#).unwrap();

    let policy = ExclusionPolicy::load(&path).unwrap();
    assert!(policy.skips("set.slow"));
    assert!(!policy.skips("prod-NameTest.NodeTest004"));
    assert_eq!(
        policy.disallowed_specs,
        ExclusionPolicy::default().disallowed_specs,
        "fields left out keep their defaults"
    );

    std::fs::write(&path, r#"{ "skip_tests": 3 }"#).unwrap();
    assert!(matches!(ExclusionPolicy::load(&path), Err(ConfigError::Policy { .. })));
}
