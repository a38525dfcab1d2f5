// The process-wide registry. Every test registers suites under its own
// names since the registry is shared by the whole test binary.

use soaper::{registry, SoaperError, Suite};
use termcolor::NoColor;

soaper::test! {
    fn trivially_true(ctx) {
        ctx.expect(true).truthy()
    }
}

fn quiet(name: &str) -> soaper::SuiteBuilder {
    Suite::builder(name)
        .set("autorun_tests", false)
        .procedure(trivially_true())
}

#[test]
fn registered_suites_can_be_found_by_name() {
    let suite = quiet("Registry.Find").register().unwrap();
    let found = registry::find("Registry.Find").unwrap();
    assert_eq!(found.name(), suite.name());
    assert!(registry::find("Registry.Missing").is_none());
}

#[test]
fn registration_order_is_kept() {
    quiet("Registry.First").register().unwrap();
    quiet("Registry.Second").register().unwrap();
    let names: Vec<String> = registry::suites()
        .iter()
        .map(|suite| suite.name().to_string())
        .filter(|name| name == "Registry.First" || name == "Registry.Second")
        .collect();
    assert_eq!(names, ["Registry.First", "Registry.Second"]);
}

#[test]
fn named_suite_runs_into_the_given_writer() {
    quiet("Registry.Named").register().unwrap();
    let mut out = NoColor::new(Vec::new());
    let tally = registry::run_suite_with("Registry.Named", &mut out).unwrap();
    assert_eq!(tally.passes, 1);

    let output = String::from_utf8(out.into_inner()).unwrap();
    assert!(output.starts_with(" Registry.Named \n"), "{output}");
    assert!(output.contains("├─ PASS  trivially_true"), "{output}");
}

#[test]
fn unknown_suite_is_an_error() {
    let mut out = NoColor::new(Vec::new());
    let err = registry::run_suite_with("Registry.Nope", &mut out).unwrap_err();
    assert!(matches!(err, SoaperError::UnknownSuite(ref name) if name == "Registry.Nope"));
    assert!(out.into_inner().is_empty());
}

#[test]
fn autorun_suites_run_on_registration() {
    let suite = Suite::builder("Registry.Autorun")
        .set("show_suites", false)
        .set("show_results", false)
        .set("show_passes", false)
        .procedure(trivially_true())
        .register()
        .unwrap();
    assert!(suite.is_done());

    let deferred = quiet("Registry.Deferred").register().unwrap();
    assert!(!deferred.is_done());
}
