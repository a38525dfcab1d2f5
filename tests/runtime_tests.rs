// Suite runtime behavior: outcomes, tallies, and the streamed report.

use std::sync::atomic::{AtomicUsize, Ordering};

use soaper::runtime::parse_summary;
use soaper::{call_with, Outcome, Procedure, RunTally, Suite};
use termcolor::NoColor;

static SKIPPED_CALLS: AtomicUsize = AtomicUsize::new(0);

soaper::test! {
    fn passes(ctx) {
        ctx.expect(2 + 2).equals(4)
    }
}

soaper::test! {
    /// one plus one is not three
    fn fails(ctx) {
        ctx.expect(1 + 1).equals(3)
    }
}

soaper::test! {
    skip fn never_runs(ctx) {
        SKIPPED_CALLS.fetch_add(1, Ordering::SeqCst);
        ctx.fail("skipped procedures must not run")
    }
}

soaper::test! {
    failing fn known_bug(ctx) {
        ctx.expect("bug").equals("feature")
    }
}

soaper::test! {
    failing fn fixed_bug(ctx) {
        ctx.expect(true).truthy()
    }
}

soaper::test! {
    fn close_enough(ctx) {
        ctx.expect(3.14).approximately_equals(std::f64::consts::PI, 2)
    }
}

soaper::test! {
    fn not_close_enough(ctx) {
        ctx.expect(3.1).approximately_equals(std::f64::consts::PI, 2)
    }
}

soaper::test! {
    fn greets(ctx) {
        ctx.with_stdin("Hello, world", |ctx| {
            let line = ctx.input()?;
            ctx.expect(format!("{line}!")).equals("Hello, world!".to_string())
        })
    }
}

fn add(a: i32, b: i32) -> i32 {
    a + b
}

soaper::test! {
    fn addition_table(ctx) {
        ctx.function(add)
            .describe("given {} and {}, returns {}")
            .run_with_cases([
                call_with((0, 0)).returns(0),
                call_with((1, 1)).returns(2),
                call_with((1, 1)).returns(3),
            ])
    }
}

soaper::test! {
    fn panics(ctx) {
        let empty: Vec<i32> = Vec::new();
        let first = empty.first().copied().unwrap();
        ctx.expect(first).equals(0)
    }
}

fn first_even(values: &[i32]) -> i32 {
    values.iter().copied().find(|v| v % 2 == 0).unwrap()
}

soaper::test! {
    fn helper_panics(ctx) {
        let even = first_even(&[1, 3, 5]);
        ctx.expect(even).equals(2)
    }
}

soaper::test! {
    fn propagates(ctx) {
        let n: u8 = "300".parse()?;
        ctx.expect(n).equals(44)
    }
}

fn suite(name: &str, procedures: Vec<Procedure>) -> Suite {
    Suite::builder(name)
        .description("runtime checks")
        .set("autorun_tests", false)
        .procedures(procedures)
        .build()
        .unwrap()
}

fn run(suite: &Suite) -> (RunTally, String) {
    let mut out = NoColor::new(Vec::new());
    let tally = suite.run_with(&mut out).unwrap();
    (tally, String::from_utf8(out.into_inner()).unwrap())
}

#[test]
fn every_tagged_test_is_counted_once() {
    let suite = suite(
        "Counting",
        vec![passes(), fails(), never_runs(), known_bug(), fixed_bug()],
    );
    let (tally, _) = run(&suite);
    assert_eq!(
        tally,
        RunTally {
            passes: 2,
            fails: 2,
            skips: 1,
            marked: 2
        }
    );
    assert_eq!(tally.total(), suite.tests().count());
}

#[test]
fn skipped_procedures_are_never_invoked() {
    let suite = suite("Skipping", vec![never_runs(), never_runs()]);
    let (tally, output) = run(&suite);
    assert_eq!(tally.skips, 2);
    assert_eq!(SKIPPED_CALLS.load(Ordering::SeqCst), 0);
    assert!(output.contains("├─ SKIP  never_runs"));
}

#[test]
fn expected_failures_invert_the_verdict() {
    let suite = suite("Inversion", vec![]);
    let palette = soaper::palette::Palette::PLAIN;

    let report = suite.execute(&known_bug(), palette);
    assert_eq!(report.outcome, Outcome::Pass);
    assert!(report.marked);

    let report = suite.execute(&fixed_bug(), palette);
    assert_eq!(report.outcome, Outcome::Fail);
    assert_eq!(report.failure.unwrap().message, "expected to fail");
}

#[test]
fn approximate_equality_scenarios() {
    let suite = suite("Approximate", vec![close_enough(), not_close_enough()]);
    let palette = soaper::palette::Palette::PLAIN;
    assert_eq!(suite.execute(&close_enough(), palette).outcome, Outcome::Pass);

    let report = suite.execute(&not_close_enough(), palette);
    assert_eq!(report.outcome, Outcome::Fail);
    let message = report.failure.unwrap().message;
    assert!(message.contains("received difference: 0.0415"), "{message}");
}

#[test]
fn substituted_input_reaches_the_body() {
    let suite = suite("Streams", vec![greets()]);
    let (tally, _) = run(&suite);
    assert_eq!(tally.passes, 1);
}

#[test]
fn table_failures_are_aggregated() {
    let suite = suite("Table", vec![addition_table()]);
    let report = suite.execute(&addition_table(), soaper::palette::Palette::PLAIN);
    assert_eq!(report.outcome, Outcome::Fail);
    let message = report.failure.unwrap().message;
    assert_eq!(message, "given 1 and 1, returns 3\n  received: 2");
}

#[test]
fn panics_and_errors_are_reported_as_thrown() {
    let suite = suite("Faults", vec![]);
    let palette = soaper::palette::Palette::PLAIN;

    let report = suite.execute(&panics(), palette);
    let failure = report.failure.unwrap();
    assert!(failure.message.starts_with("threw panic: called `Option::unwrap()`"));
    assert!(failure.context.line() > failure.context.first_line());

    let report = suite.execute(&helper_panics(), palette);
    let failure = report.failure.unwrap();
    assert!(failure.message.starts_with("threw panic: called `Option::unwrap()`"));
    assert_eq!(failure.context.line(), failure.context.first_line());
    assert_eq!(failure.context.span(), None);

    let report = suite.execute(&propagates(), palette);
    assert_eq!(
        report.failure.unwrap().message,
        "threw ParseIntError: number too large to fit in target type"
    );
}

#[test]
fn failure_report_shows_highlighted_source() {
    let suite = suite("Context", vec![fails()]);
    let (_, output) = run(&suite);
    assert!(output.contains("├─ FAIL  fails"), "{output}");
    assert!(output.contains("│ └─→ one plus one is not three"), "{output}");
    assert!(output.contains("│ in file: ./tests/runtime_tests.rs:"), "{output}");
    assert!(output.contains("equals(3)»"), "{output}");
    assert!(output.contains("│ expected values to equal"), "{output}");
    assert!(output.contains("│ - 3"), "{output}");
    assert!(output.contains("│ + 2"), "{output}");
}

#[test]
fn tests_run_in_declaration_order() {
    let suite = suite("Order", vec![passes(), close_enough(), greets()]);
    let (_, output) = run(&suite);
    let position = |name: &str| output.find(&format!("PASS  {name}")).unwrap();
    assert!(position("passes") < position("close_enough"));
    assert!(position("close_enough") < position("greets"));
}

#[test]
fn summary_round_trips() {
    let suite = suite(
        "Summary",
        vec![passes(), fails(), never_runs(), known_bug(), addition_table()],
    );
    let (tally, output) = run(&suite);
    assert_eq!(parse_summary(&output), Some(tally));
}

#[test]
fn hidden_summary() {
    let suite = Suite::builder("Quiet")
        .set("autorun_tests", false)
        .set("show_results", false)
        .set("show_suites", false)
        .procedure(passes())
        .build()
        .unwrap();
    let (_, output) = run(&suite);
    assert_eq!(output, "├─ PASS  passes\n");
}
