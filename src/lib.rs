//! Declarative command line argument parsing.
//!
//! Callers register named parameters — short/long flags, required, dominant,
//! and variadic modifiers, default values, and optional validators — then run
//! the parser over the raw argument list. Tokens are routed to parameters,
//! converted into typed values, validated, and exposed through typed
//! accessors.
//!
//! ```
//! use cmdparse::Parser;
//!
//! let mut parser = Parser::new(["prog", "-n", "4", "input.txt"]);
//! parser.set_default::<String>(false, "input file", String::new());
//! parser.set_optional::<i32>("n", "number", 1, "how many times");
//!
//! let mut output: Vec<u8> = Vec::new();
//! let mut error: Vec<u8> = Vec::new();
//! assert!(parser.run_with(&mut output, &mut error).is_success());
//! assert_eq!(parser.get::<i32>("n").unwrap(), 4);
//! assert_eq!(parser.get_default::<String>().unwrap(), "input.txt");
//! ```

mod assigner;
mod convert;
mod error;
mod parameter;
mod parser;
mod registry;

pub use convert::{Based, FromTokens};
pub use error::{AccessError, CallbackError, ConversionError, ParseError};
pub use parameter::{CallbackArgs, Validator};
pub use parser::{Outcome, Parser};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
