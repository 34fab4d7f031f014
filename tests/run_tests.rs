//! Integration tests for full parsing runs.
//!
//! These drive the public API only: register parameters, run over an
//! explicit argument vector with in-memory sinks, and check the outcome,
//! the typed values, and the diagnostics.

use std::io::Write;

use cmdparse::{Based, CallbackArgs, CallbackError, Outcome, Parser};

fn run(parser: &mut Parser) -> (Outcome, String, String) {
    let mut output = Vec::new();
    let mut error = Vec::new();
    let outcome = parser.run_with(&mut output, &mut error);
    (
        outcome,
        String::from_utf8(output).expect("output sink is utf-8"),
        String::from_utf8(error).expect("error sink is utf-8"),
    )
}

// ============================================================================
// Typical invocations
// ============================================================================

#[test]
fn mixed_flags_and_positionals() {
    let mut parser = Parser::new(["prog", "in1.txt", "-o", "out.bin", "in2.txt", "-v"]);
    parser.set_default::<Vec<String>>(false, "input files", Vec::new());
    parser.set_optional::<String>("o", "output", "a.out".to_string(), "output file");
    parser.set_optional::<bool>("v", "verbose", false, "verbose output");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(
        parser.get_default::<Vec<String>>().unwrap(),
        vec!["in1.txt", "in2.txt"]
    );
    assert_eq!(parser.get::<String>("o").unwrap(), "out.bin");
    assert!(parser.get::<bool>("v").unwrap());
}

#[test]
fn long_flags_match_exactly() {
    let mut parser = Parser::new(["prog", "--output", "out.bin"]);
    parser.set_optional::<String>("o", "output", String::new(), "output file");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(parser.get::<String>("o").unwrap(), "out.bin");
}

#[test]
fn required_parameter_present_succeeds() {
    let mut parser = Parser::new(["prog", "-x", "0x10"]);
    parser.set_required::<i64>("x", "extra", "a number");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(parser.get::<i64>("x").unwrap(), 16);
}

#[test]
fn variadic_numbers_preserve_order() {
    let mut parser = Parser::new(["prog", "-n", "3", "1", "2"]);
    parser.set_optional::<Vec<i32>>("n", "numbers", Vec::new(), "some numbers");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(parser.get::<Vec<i32>>("n").unwrap(), vec![3, 1, 2]);
}

#[test]
fn based_parameter_round_trip() {
    let mut parser = Parser::new(["prog", "-m", "dead", "-p", "777"]);
    parser.set_optional::<Based<u64>>("m", "mask", Based::new(0, 16), "hex mask");
    parser.set_optional::<Based<u32>>("p", "perm", Based::new(0, 8), "octal permissions");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    assert_eq!(parser.get::<Based<u64>>("m").unwrap().value, 0xdead);
    assert_eq!(parser.get::<Based<u32>>("p").unwrap().value, 0o777);
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn missing_required_parameter_fails_with_usage_block() {
    let mut parser = Parser::new(["prog"]);
    parser.set_required::<String>("c", "config", "configuration file");

    let (outcome, _, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::Failure);
    assert!(error.contains("'c' is required"), "stderr: {error}");
    assert!(error.contains("--config"), "stderr: {error}");
}

#[test]
fn conversion_failure_names_the_parameter() {
    let mut parser = Parser::new(["prog", "-n", "many"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");

    let (outcome, _, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::Failure);
    assert!(error.contains("'n'"), "stderr: {error}");
    assert!(error.contains("many"), "stderr: {error}");
}

#[test]
fn second_value_for_scalar_default_parameter_fails() {
    let mut parser = Parser::new(["prog", "one", "two"]);
    parser.set_default::<String>(false, "single positional", String::new());

    let (outcome, _, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::Failure);
    assert!(error.contains("only one value"), "stderr: {error}");
}

#[test]
fn unknown_flag_is_rejected_with_help_pointer() {
    let mut parser = Parser::new(["prog", "--frobnicate"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");

    let (outcome, _, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::Failure);
    assert!(error.contains("--frobnicate"), "stderr: {error}");
    assert!(error.contains("--help"), "stderr: {error}");
}

#[test]
fn failed_run_reports_failure_even_with_converted_dominant_values() {
    let mut parser = Parser::new(["prog", "-d", "1"]);
    parser.set_optional_full::<i32>("d", "dominant", 0, "processed early", None, true);
    parser.set_required::<i32>("x", "extra", "never supplied");

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Failure);
    // The dominant value was converted before the required check aborted.
    assert_eq!(parser.get::<i32>("d").unwrap(), 1);
}

// ============================================================================
// Help and early exit
// ============================================================================

#[test]
fn help_prints_usage_and_exits_early() {
    let mut parser = Parser::with_description(["prog", "-h"], "does a thing");
    parser.set_required::<String>("c", "config", "configuration file");

    let (outcome, output, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::EarlyExit);
    assert!(output.contains("does a thing"), "stdout: {output}");
    assert!(output.contains("Available parameters:"), "stdout: {output}");
    assert!(output.contains("--config"), "stdout: {output}");
    assert!(!error.contains("required"), "stderr: {error}");
}

#[test]
fn help_callback_halts_before_remaining_parameters() {
    let mut parser = Parser::new(["prog", "--help", "-n", "not-a-number"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");

    // The dominant help pass halts the run before the remaining pass would
    // hit the conversion failure.
    let (outcome, _, error) = run(&mut parser);
    assert_eq!(outcome, Outcome::EarlyExit);
    assert!(!error.contains("not-a-number"), "stderr: {error}");
}

// ============================================================================
// Custom callbacks
// ============================================================================

#[test]
fn callback_parameter_halts_run_on_request() {
    let mut parser = Parser::new(["prog", "-V"]);
    parser.set_callback_dominant(
        "V",
        "version",
        |args: CallbackArgs<'_>| -> Result<(), CallbackError> {
            writeln!(&mut *args.output, "prog {}", cmdparse::VERSION)
                .map_err(|e| CallbackError::Failed(e.to_string()))?;
            Err(CallbackError::Halt)
        },
        "print the version and exit",
    );

    let (outcome, output, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::EarlyExit);
    assert!(output.starts_with("prog "), "stdout: {output}");
}

#[test]
fn callback_receives_accumulated_tokens() {
    let mut parser = Parser::new(["prog", "-k", "alpha=1"]);
    parser.set_callback(
        "k",
        "kv",
        |args: CallbackArgs<'_>| -> Result<(String, String), CallbackError> {
            let token = args
                .tokens
                .first()
                .ok_or_else(|| CallbackError::Failed("expected key=value".to_string()))?;
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| CallbackError::Failed(format!("'{token}' is not key=value")))?;
            Ok((key.to_string(), value.to_string()))
        },
        "a key=value pair",
    );

    let (outcome, _, _) = run(&mut parser);
    assert_eq!(outcome, Outcome::Success);
    let (key, value) = parser.get::<(String, String)>("k").unwrap();
    assert_eq!(key, "alpha");
    assert_eq!(value, "1");
}
