// Soaper demo: registers two example suites and runs them.
// Usage: cargo run --bin soaper-demo [-- --suite NAME]

use std::collections::HashMap;
use std::num::ParseIntError;

use clap::Parser;
use soaper::{call_with, registry, Suite};

/// Runs the bundled demo suites and prints their report.
#[derive(Debug, Parser)]
#[command(name = "soaper-demo", version, about = "Runs the soaper demo suites.")]
struct DemoArgs {
    /// Run only the suite with this name.
    #[arg(long)]
    suite: Option<String>,
}

fn add(a: i32, b: i32) -> i32 {
    a + b
}

soaper::test! {
    /// add two numbers
    fn addition(ctx) {
        ctx.function(add)
            .describe("given {} and {} as arguments, returns {}")
            .run_with_cases([
                call_with((0, 0)).returns(0),
                call_with((1, 1)).returns(2),
                call_with((1, 1)).returns(3),
            ])
    }
}

soaper::test! {
    fn to_raise(ctx) {
        ctx.expect_raise::<ParseIntError>(|_| {
            "one".parse::<i32>()?;
            Ok(())
        })
    }
}

soaper::test! {
    fn stdin_stdout(ctx) {
        ctx.with_stdin("Hello, world", |ctx| {
            ctx.expect_stdout("Hello, world!\n", |_| {
                let mut line = String::new();
                std::io::stdin().read_line(&mut line)?;
                println!("{line}!");
                Ok(())
            })
        })
    }
}

soaper::test! {
    /// multiply two numbers
    fn close_to_pi(ctx) {
        ctx.expect(3.14).approximately_equals(std::f64::consts::PI, 2)
    }
}

soaper::test! {
    /// gets skipped
    skip fn skipped(ctx) {
        ctx.fail("Explicit failure")
    }
}

soaper::test! {
    /// Show the diff between two strings
    fn strings(ctx) {
        ctx.expect("Testing with Jest is good for you.\n")
            .equals("Testing your luck is bad for you.")
    }
}

soaper::test! {
    fn int_type(ctx) {
        ctx.expect(1i64).has_type::<i64>()
    }
}

soaper::test! {
    fn maps(ctx) {
        let actual = HashMap::from([("x", 1), ("y", 1)]);
        ctx.expect(actual).equals(HashMap::from([("x", 1), ("y", 1), ("z", 1)]))
    }
}

soaper::test! {
    /// integer division truncates
    failing fn division(ctx) {
        ctx.expect(7 / 2).equals(4)
    }
}

soaper::test! {
    fn parsing(ctx) {
        let n: i32 = "12x".parse()?;
        ctx.expect(n).greater_than(10)
    }
}

fn main() -> miette::Result<()> {
    let args = DemoArgs::parse();

    Suite::builder("MathTestSuite")
        .description("math utility")
        .config_yaml("autorun_tests: false\ntab_arrows: true\n")
        .procedures([
            addition(),
            to_raise(),
            stdin_stdout(),
            close_to_pi(),
            skipped(),
            strings(),
            int_type(),
            maps(),
        ])
        .register()?;

    Suite::builder("EdgeCases")
        .description("expected failures and propagated errors")
        .set("autorun_tests", false)
        .set("show_test_docstrings", true)
        .procedures([division(), parsing()])
        .register()?;

    let tallies = match &args.suite {
        Some(name) => vec![registry::run_suite(name)?],
        None => registry::run_all()?,
    };

    if tallies.iter().any(|tally| tally.fails > 0) {
        std::process::exit(1);
    }
    Ok(())
}
