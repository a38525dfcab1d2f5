// The demo binary end to end: report text, exit status and diagnostics.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn demo() -> Command {
    Command::cargo_bin("soaper-demo").unwrap()
}

#[test]
fn all_suites_report_and_fail_the_process() {
    demo().assert().failure().stdout(
        contains(" MathTestSuite ")
            .and(contains("│ └─→ math utility"))
            .and(contains("├─ FAIL  addition"))
            .and(contains("├─ PASS  to_raise"))
            .and(contains("├─ SKIP  skipped"))
            .and(contains("expected maps to equal"))
            .and(contains("✓ 4 passes  ✗ 3 fails"))
            .and(contains("╰─ ! 1 test skipped"))
            .and(contains(" EdgeCases ")),
    );
}

#[test]
fn table_failure_points_at_the_demo_source() {
    demo().assert().stdout(
        contains("│ in file: ./src/bin/soaper_demo.rs:")
            .and(contains("given 1 and 1 as arguments, returns 3"))
            .and(contains("received: 2")),
    );
}

#[test]
fn single_suite_by_name() {
    demo()
        .args(["--suite", "EdgeCases"])
        .assert()
        .failure()
        .stdout(
            contains("├─ PASS  division \"integer division truncates\"")
                .and(contains("threw ParseIntError: invalid digit found in string"))
                .and(contains("! 1 test marked as failing"))
                .and(contains("MathTestSuite").not()),
        );
}

#[test]
fn unknown_suite_is_a_diagnostic() {
    demo()
        .args(["--suite", "Nope"])
        .assert()
        .failure()
        .stderr(contains("soaper::registry::unknown_suite"));
}
