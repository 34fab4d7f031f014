//! Parameter definitions and their processing behavior.
//!
//! A [`Parameter`] is one declared command line parameter: its flags,
//! modifiers, accumulated raw tokens, and the type-erased conversion and
//! validation logic bound at registration time. The concrete value type is
//! erased into closures here; `Parser::get` recovers it through the `Any`
//! type tag.

use std::any::Any;
use std::io::Write;

use crate::convert::FromTokens;
use crate::error::{CallbackError, ConversionError, ParseError};

/// Caller-supplied semantic check, run after conversion succeeds.
///
/// The two sinks are the output and error streams of the current run; any
/// diagnostic text written to them is surfaced to the caller. Returning
/// `false` fails the run for this parameter.
pub type Validator<T> = Box<dyn Fn(&T, &mut dyn Write, &mut dyn Write) -> bool>;

/// Arguments handed to a callback parameter when it is invoked.
pub struct CallbackArgs<'a> {
    /// Raw tokens accumulated for the parameter
    pub tokens: &'a [String],

    /// Output sink of the current run
    pub output: &'a mut dyn Write,

    /// Error sink of the current run
    pub error: &'a mut dyn Write,

    /// Full usage text of the owning parser
    pub usage: &'a str,
}

type ConvertFn = Box<dyn Fn(&[String], &mut Box<dyn Any>) -> Result<(), ConversionError>>;
type ValidateFn = Box<dyn Fn(&dyn Any, &mut dyn Write, &mut dyn Write) -> bool>;
type CallbackFn = Box<dyn FnMut(CallbackArgs<'_>) -> Result<Box<dyn Any>, CallbackError>>;
type RenderFn = Box<dyn Fn(&dyn Any) -> String>;

/// Behavior attached to a parameter: either the standard conversion and
/// validation pipeline, or a caller-supplied callback.
pub(crate) enum ParamKind {
    Value {
        convert: ConvertFn,
        validate: Option<ValidateFn>,
    },
    Callback {
        invoke: CallbackFn,
    },
}

/// Result of processing one handled parameter during a run pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Processed {
    /// Conversion (or callback) and validation completed
    Converted,
    /// The callback asked to stop the run without an error
    Halted,
}

/// One declared command line parameter.
pub(crate) struct Parameter {
    pub(crate) name: String,
    pub(crate) flag_short: String,
    pub(crate) flag_long: String,
    pub(crate) description: String,
    pub(crate) required: bool,
    pub(crate) dominant: bool,
    pub(crate) variadic: bool,
    pub(crate) handled: bool,
    pub(crate) tokens: Vec<String>,
    pub(crate) kind: ParamKind,
    pub(crate) value: Box<dyn Any>,
    render: RenderFn,
    takes_value: bool,
}

fn short_flag(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("-{name}")
    }
}

fn long_flag(alternative: &str) -> String {
    if alternative.is_empty() {
        String::new()
    } else {
        format!("--{alternative}")
    }
}

impl Parameter {
    /// Create a parameter backed by the standard conversion pipeline.
    pub(crate) fn standard<T: FromTokens>(
        name: &str,
        alternative: &str,
        description: &str,
        required: bool,
        dominant: bool,
        default: T,
        validator: Option<Validator<T>>,
    ) -> Self {
        let convert: ConvertFn = Box::new(|tokens, slot| {
            let parsed = {
                let default = slot
                    .downcast_ref::<T>()
                    .expect("parameter value slot holds the registered type");
                T::from_tokens(tokens, default)?
            };
            *slot = Box::new(parsed);
            Ok(())
        });

        let validate = validator.map(|check| -> ValidateFn {
            Box::new(move |value, output, error| match value.downcast_ref::<T>() {
                Some(typed) => check(typed, output, error),
                None => false,
            })
        });

        let render: RenderFn = Box::new(|value| {
            value
                .downcast_ref::<T>()
                .map(|typed| typed.describe())
                .unwrap_or_default()
        });

        Self {
            name: name.to_string(),
            flag_short: short_flag(name),
            flag_long: long_flag(alternative),
            description: description.to_string(),
            required,
            dominant,
            variadic: T::VARIADIC,
            handled: false,
            tokens: Vec::new(),
            kind: ParamKind::Value {
                convert,
                validate,
            },
            value: Box::new(default),
            render,
            takes_value: T::TAKES_VALUE,
        }
    }

    /// Create a parameter backed by a caller-supplied callback.
    pub(crate) fn callback<T, F>(
        name: &str,
        alternative: &str,
        description: &str,
        dominant: bool,
        callback: F,
    ) -> Self
    where
        T: 'static,
        F: Fn(CallbackArgs<'_>) -> Result<T, CallbackError> + 'static,
    {
        let invoke: CallbackFn = Box::new(move |args| {
            let value = callback(args)?;
            Ok(Box::new(value) as Box<dyn Any>)
        });

        Self {
            name: name.to_string(),
            flag_short: short_flag(name),
            flag_long: long_flag(alternative),
            description: description.to_string(),
            required: false,
            dominant,
            variadic: false,
            handled: false,
            tokens: Vec::new(),
            kind: ParamKind::Callback { invoke },
            // Replaced the first time the callback runs.
            value: Box::new(()),
            render: Box::new(|_| String::new()),
            takes_value: true,
        }
    }

    /// Whether `token` textually equals the short or long flag.
    pub(crate) fn matches(&self, token: &str) -> bool {
        (!self.flag_short.is_empty() && token == self.flag_short)
            || (!self.flag_long.is_empty() && token == self.flag_long)
    }

    /// The default (positional) parameter has no flags at all.
    pub(crate) fn is_default(&self) -> bool {
        self.flag_short.is_empty() && self.flag_long.is_empty()
    }

    /// Name used in diagnostics; the positional parameter reads "default".
    pub(crate) fn label(&self) -> &str {
        if self.name.is_empty() {
            "default"
        } else {
            &self.name
        }
    }

    /// Convert (or invoke the callback) and validate this parameter.
    ///
    /// A parameter that is not required, expects a value, and accumulated no
    /// tokens keeps its registered default; the validator still runs over it.
    pub(crate) fn process(
        &mut self,
        output: &mut dyn Write,
        error: &mut dyn Write,
        usage: &str,
    ) -> Result<Processed, ParseError> {
        let label = self.label().to_string();

        match &mut self.kind {
            ParamKind::Value { convert, validate } => {
                let keep_default =
                    !self.required && self.tokens.is_empty() && self.takes_value;

                if !keep_default {
                    convert(&self.tokens, &mut self.value).map_err(|source| {
                        ParseError::ConversionFailure {
                            name: label.clone(),
                            source,
                        }
                    })?;
                }

                if let Some(check) = validate {
                    if !check(self.value.as_ref(), output, error) {
                        return Err(ParseError::ValidationFailure(label));
                    }
                }

                Ok(Processed::Converted)
            }
            ParamKind::Callback { invoke } => {
                let args = CallbackArgs {
                    tokens: &self.tokens,
                    output,
                    error,
                    usage,
                };

                match invoke(args) {
                    Ok(value) => {
                        self.value = value;
                        Ok(Processed::Converted)
                    }
                    Err(CallbackError::Halt) => Ok(Processed::Halted),
                    Err(CallbackError::Failed(detail)) => {
                        Err(ParseError::CallbackFailure { name: label, detail })
                    }
                }
            }
        }
    }

    /// Usage block for this parameter: flags, required/default annotation,
    /// and description.
    pub(crate) fn usage(&self) -> String {
        let mut text = String::new();

        if self.is_default() {
            text.push_str("\tDEFAULT\n");
        } else {
            text.push_str(&format!("\t{},\t{}\n", self.flag_short, self.flag_long));
        }

        if self.required {
            text.push_str("\t\t(required) ");
        } else {
            text.push_str(&format!(
                "\t\tDefault:\t'{}'\n",
                (self.render)(self.value.as_ref())
            ));
            text.push_str("\t\t[optional] ");
        }

        text.push_str(&self.description);
        text.push_str("\n\n");
        text
    }
}
