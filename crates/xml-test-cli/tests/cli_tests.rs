//! End to end tests of the two binaries

use std::path::Path;
use std::process::Command;

use xml_test_harness::{Category, Report};

const CATALOG: &str = r#"<catalog xmlns="http://www.w3.org/2010/09/qt-fots-catalog">
  <test-set name="basic" file="basic.xml"/>
</catalog>"#;

const BASIC_SET: &str = r#"<test-set xmlns="http://www.w3.org/2010/09/qt-fots-catalog" name="basic">
  <test-case name="true"><test>true()</test><result><assert-true/></result></test-case>
  <test-case name="concat"><test>concat('a', 'b')</test><result><assert-string-value>ab</assert-string-value></result></test-case>
  <test-case name="false"><test>false()</test><result><assert-true/></result></test-case>
  <test-case name="parse"><test>1 +</test><result><assert-true/></result></test-case>
  <test-case name="xq30">
    <dependency type="spec" value="XQ30"/>
    <test>true()</test><result><assert-true/></result>
  </test-case>
</test-set>"#;

fn write_suite(dir: &Path) {
    std::fs::write(dir.join("catalog.xml"), CATALOG).unwrap();
    std::fs::write(dir.join("basic.xml"), BASIC_SET).unwrap();
}

fn execute_tests() -> Command {
    Command::new(env!("CARGO_BIN_EXE_execute-tests"))
}

fn compare_results() -> Command {
    Command::new(env!("CARGO_BIN_EXE_compare-results"))
}

#[test]
fn missing_catalog_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = execute_tests()
        .arg(dir.path().join("catalog.xml"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn runner_prints_summary_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path());
    let report_path = dir.path().join("report.json");

    let output = execute_tests()
        .arg("-r")
        .arg(&report_path)
        .arg(dir.path().join("catalog.xml"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("5 testcases read"), "{stdout}");
    assert!(stdout.contains("1 testcases ignored"), "{stdout}");
    assert!(stdout.contains("2 success"), "{stdout}");

    let report = Report::read_from(&report_path).unwrap();
    assert_eq!(report.names(Category::Success), ["basic.true", "basic.concat"]);
    assert_eq!(report.names(Category::Failed), ["basic.false"]);
    assert_eq!(report.names(Category::ParseError), ["basic.parse"]);
    assert_eq!(report.category_of("basic.xq30"), None);
}

#[test]
fn silent_runs_print_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path());

    let output = execute_tests()
        .args(["-v", "0"])
        .arg(dir.path().join("catalog.xml"))
        .arg("concat")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn differ_requires_exactly_one_mode() {
    let neither = compare_results().args(["main", "next"]).output().unwrap();
    assert_eq!(neither.status.code(), Some(1));

    let both = compare_results()
        .args(["-r", "-g", ".", "main", "next"])
        .output()
        .unwrap();
    assert_eq!(both.status.code(), Some(1));
}

#[test]
fn differ_reports_moved_test_cases() {
    let dir = tempfile::tempdir().unwrap();
    let old_path = dir.path().join("old.json");
    let new_path = dir.path().join("new.json");

    let mut old = Report::default();
    old.record(Category::Success, "t1");
    old.record(Category::Success, "t2");
    old.write_to(&old_path).unwrap();

    let mut new = Report::default();
    new.record(Category::Success, "t1");
    new.record(Category::Failed, "t2");
    new.write_to(&new_path).unwrap();

    let output = compare_results()
        .arg("-r")
        .arg(&old_path)
        .arg(&new_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status failed: +1"), "{stdout}");
    assert!(stdout.contains("status success: -1"), "{stdout}");
    assert!(stdout.contains("t2 was success, is now failed"), "{stdout}");
}

#[test]
fn differ_exits_with_two_for_a_missing_repository() {
    let dir = tempfile::tempdir().unwrap();
    let output = compare_results()
        .arg("-g")
        .arg(dir.path().join("missing"))
        .args(["main", "next"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
