//! Integration tests for the typed retrieval API.

use cmdparse::{AccessError, Outcome, Parser};

fn run_quietly(parser: &mut Parser) -> Outcome {
    let mut output: Vec<u8> = Vec::new();
    let mut error: Vec<u8> = Vec::new();
    parser.run_with(&mut output, &mut error)
}

#[test]
fn get_returns_the_declared_type() {
    let mut parser = Parser::new(["prog", "-n", "12", "-s", "hello"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");
    parser.set_optional::<String>("s", "text", String::new(), "some text");

    assert_eq!(run_quietly(&mut parser), Outcome::Success);
    assert_eq!(parser.get::<i32>("n").unwrap(), 12);
    assert_eq!(parser.get::<String>("s").unwrap(), "hello");
}

#[test]
fn get_unknown_parameter_is_not_found() {
    let parser = Parser::new(["prog"]);
    let failure = parser.get::<i32>("missing").unwrap_err();
    assert!(matches!(failure, AccessError::NotFound(name) if name == "missing"));
}

#[test]
fn get_with_wrong_type_is_type_mismatch() {
    let mut parser = Parser::new(["prog", "-n", "12"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");

    assert_eq!(run_quietly(&mut parser), Outcome::Success);
    let failure = parser.get::<f64>("n").unwrap_err();
    assert!(matches!(failure, AccessError::TypeMismatch(name) if name == "n"));
}

#[test]
fn get_before_run_returns_the_default() {
    let mut parser = Parser::new(["prog"]);
    parser.set_optional::<i32>("n", "number", 41, "a number");

    assert_eq!(parser.get::<i32>("n").unwrap(), 41);
}

#[test]
fn get_default_reads_the_positional_parameter() {
    let mut parser = Parser::new(["prog", "input.txt"]);
    parser.set_default::<String>(false, "input file", String::new());

    assert_eq!(run_quietly(&mut parser), Outcome::Success);
    assert_eq!(parser.get_default::<String>().unwrap(), "input.txt");
}

#[test]
fn get_if_transforms_on_read() {
    let mut parser = Parser::new(["prog", "-n", "6"]);
    parser.set_optional::<i32>("n", "number", 0, "a number");

    assert_eq!(run_quietly(&mut parser), Outcome::Success);
    let doubled = parser.get_if::<i32, i32, _>("n", |n| n * 2).unwrap();
    assert_eq!(doubled, 12);
}

#[test]
fn duplicate_registration_resolves_to_first() {
    let mut parser = Parser::new(["prog", "-x", "1"]);
    parser.set_optional::<i32>("x", "extra", 10, "first registration");
    parser.set_optional::<String>("x", "extra", "ten".to_string(), "second registration");

    assert_eq!(run_quietly(&mut parser), Outcome::Success);
    assert_eq!(parser.get::<i32>("x").unwrap(), 1);
}
