//! Token assignment: routing raw tokens onto registered parameters.
//!
//! A single cursor tracks the parameter that currently receives bare
//! tokens. It starts at the default (positional) parameter, moves to
//! whichever registered flag appeared last, and falls back to the default
//! parameter once a single-value flag has claimed its one token.

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::registry::Registry;

/// Whether a token is flag shaped: non-empty with a leading `-`.
fn is_flag_shaped(token: &str) -> bool {
    token.starts_with('-')
}

/// Route `tokens` onto the registered parameters, in order.
///
/// Mutates each parameter's accumulated tokens and `handled` state. Flag
/// tokens that match a registered flag are never stored as values. An
/// unmatched flag-shaped token is absorbed as data by a variadic cursor or
/// by an empty single-value cursor, and rejected once a single-value cursor
/// is already satisfied.
pub(crate) fn assign(tokens: &[String], registry: &mut Registry) -> Result<(), ParseError> {
    let mut current = registry.find_default();

    for token in tokens {
        let flag_shaped = is_flag_shaped(token);
        let matched = if flag_shaped {
            registry.find_by_flag(token)
        } else {
            None
        };

        if let Some(index) = matched {
            let parameter = registry.get_mut(index);
            parameter.handled = true;
            trace!(flag = %token, parameter = %parameter.label(), "cursor moved to flag");
            current = Some(index);
            continue;
        }

        let Some(index) = current else {
            debug!(token = %token, "no parameter available to receive token");
            return Err(ParseError::UnrecognizedParameter(token.clone()));
        };

        let parameter = registry.get_mut(index);
        if parameter.variadic {
            parameter.tokens.push(token.clone());
            parameter.handled = true;
        } else if parameter.tokens.is_empty() {
            parameter.tokens.push(token.clone());
            parameter.handled = true;
            // A single-value parameter claims exactly one token; later bare
            // tokens belong to the positional parameter again. Without a
            // positional parameter the cursor stays put, so a further token
            // is reported against the parameter it would overflow.
            current = registry.find_default().or(Some(index));
        } else if flag_shaped {
            return Err(ParseError::UnrecognizedParameter(token.clone()));
        } else {
            return Err(ParseError::TooManyArguments {
                name: parameter.label().to_string(),
                token: token.clone(),
            });
        }
    }

    Ok(())
}
