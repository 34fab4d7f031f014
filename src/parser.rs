//! The parser: registration surface, the run passes, and typed retrieval.
//!
//! A `Parser` owns the raw argument list and the registry of declared
//! parameters. `run` assigns tokens to parameters, then drives three ordered
//! passes: dominant parameters first (so help can short-circuit a run with
//! missing required input), the required-presence check second, and the
//! remaining handled parameters last.

use std::io::{self, Write};

use tracing::debug;

use crate::assigner;
use crate::convert::FromTokens;
use crate::error::{AccessError, CallbackError, ParseError};
use crate::parameter::{CallbackArgs, Parameter, Processed, Validator};
use crate::registry::Registry;

/// Result of a full parsing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// Every pass completed; parsed values may be used
    Success,

    /// Token assignment, conversion, validation, or the required-parameter
    /// check failed; a diagnostic was written to the error sink
    Failure,

    /// A callback asked to stop the run without an error. The built-in help
    /// parameter does this after printing the usage screen.
    EarlyExit,
}

impl Outcome {
    /// Whether parsed values may be trusted.
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Declarative command line parser.
pub struct Parser {
    app_name: String,
    general_help_text: String,
    arguments: Vec<String>,
    registry: Registry,
}

impl Parser {
    /// Create a parser over an explicit argument vector. The first element is
    /// taken as the program name, the rest as the tokens to parse.
    ///
    /// `-h`/`--help` is registered automatically; call
    /// [`Parser::disable_help`] to remove it.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let app_name = argv.next().unwrap_or_default();
        let arguments: Vec<String> = argv.collect();

        let mut parser = Self {
            app_name,
            general_help_text: String::new(),
            arguments,
            registry: Registry::new(),
        };
        parser.enable_help();
        parser
    }

    /// Create a parser over the process argument list.
    pub fn from_env() -> Self {
        Self::new(std::env::args())
    }

    /// Same as [`Parser::new`], with a general description shown at the top
    /// of the help screen.
    pub fn with_description<I, S>(argv: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parser = Self::new(argv);
        parser.general_help_text = description.into();
        parser
    }

    /// Register the built-in `-h`/`--help` parameter. Constructors call this
    /// already; it only matters after [`Parser::disable_help`].
    pub fn enable_help(&mut self) {
        if self.has_help() {
            return;
        }
        self.set_callback_dominant(
            "h",
            "help",
            |args: CallbackArgs<'_>| -> Result<bool, CallbackError> {
                args.output
                    .write_all(args.usage.as_bytes())
                    .map_err(|e| CallbackError::Failed(e.to_string()))?;
                Err(CallbackError::Halt)
            },
            "print this help screen",
        );
    }

    /// Remove the built-in help parameter.
    pub fn disable_help(&mut self) {
        if let Some(index) = self.registry.find_by_flag("--help") {
            self.registry.remove(index);
        }
    }

    /// Whether a `-h`/`--help` parameter is registered.
    pub fn has_help(&self) -> bool {
        self.registry.find_by_flag("--help").is_some()
    }

    /// Register the default (positional) parameter. At most one parameter
    /// without flags should be registered.
    pub fn set_default<T: FromTokens>(&mut self, required: bool, description: &str, default: T) {
        self.registry.register(Parameter::standard(
            "",
            "",
            description,
            required,
            false,
            default,
            None,
        ));
    }

    /// Register the default parameter with a semantic validator.
    pub fn set_default_with_validator<T: FromTokens>(
        &mut self,
        required: bool,
        description: &str,
        default: T,
        validator: Validator<T>,
    ) {
        self.registry.register(Parameter::standard(
            "",
            "",
            description,
            required,
            false,
            default,
            Some(validator),
        ));
    }

    /// Register a required parameter under `-name` / `--alternative`.
    pub fn set_required<T: FromTokens + Default>(
        &mut self,
        name: &str,
        alternative: &str,
        description: &str,
    ) {
        self.set_required_full(name, alternative, description, T::default(), None, false);
    }

    /// Register a required parameter with full control: an explicit seed
    /// value (a [`crate::Based`] wrapper carries its base here), an optional
    /// validator, and the dominant modifier.
    pub fn set_required_full<T: FromTokens>(
        &mut self,
        name: &str,
        alternative: &str,
        description: &str,
        seed: T,
        validator: Option<Validator<T>>,
        dominant: bool,
    ) {
        self.registry.register(Parameter::standard(
            name,
            alternative,
            description,
            true,
            dominant,
            seed,
            validator,
        ));
    }

    /// Register an optional parameter with a default value.
    pub fn set_optional<T: FromTokens>(
        &mut self,
        name: &str,
        alternative: &str,
        default: T,
        description: &str,
    ) {
        self.set_optional_full(name, alternative, default, description, None, false);
    }

    /// Register an optional parameter with a validator and the dominant
    /// modifier.
    pub fn set_optional_full<T: FromTokens>(
        &mut self,
        name: &str,
        alternative: &str,
        default: T,
        description: &str,
        validator: Option<Validator<T>>,
        dominant: bool,
    ) {
        self.registry.register(Parameter::standard(
            name,
            alternative,
            description,
            false,
            dominant,
            default,
            validator,
        ));
    }

    /// Register a callback parameter: instead of the standard conversion
    /// pipeline, `callback` computes the value from the accumulated tokens.
    pub fn set_callback<T, F>(&mut self, name: &str, alternative: &str, callback: F, description: &str)
    where
        T: 'static,
        F: Fn(CallbackArgs<'_>) -> Result<T, CallbackError> + 'static,
    {
        self.registry
            .register(Parameter::callback(name, alternative, description, false, callback));
    }

    /// Register a dominant callback parameter, processed before the
    /// required-parameter check.
    pub fn set_callback_dominant<T, F>(
        &mut self,
        name: &str,
        alternative: &str,
        callback: F,
        description: &str,
    ) where
        T: 'static,
        F: Fn(CallbackArgs<'_>) -> Result<T, CallbackError> + 'static,
    {
        self.registry
            .register(Parameter::callback(name, alternative, description, true, callback));
    }

    /// Parse using stdout and stderr as sinks.
    pub fn run(&mut self) -> Outcome {
        let mut output = io::stdout();
        let mut error = io::stderr();
        self.run_with(&mut output, &mut error)
    }

    /// Parse with an explicit output sink; diagnostics still go to stderr.
    pub fn run_with_output(&mut self, output: &mut dyn Write) -> Outcome {
        let mut error = io::stderr();
        self.run_with(output, &mut error)
    }

    /// Parse, then exit the process unless the run fully succeeded.
    ///
    /// Boundary glue around [`Parser::run`]: an early exit (help) terminates
    /// with status 0, a failure with status 1.
    pub fn run_and_exit_if_error(&mut self) {
        match self.run() {
            Outcome::Success => {}
            Outcome::EarlyExit => std::process::exit(0),
            Outcome::Failure => std::process::exit(1),
        }
    }

    /// Parse the argument list: assign tokens, process dominant parameters,
    /// check required parameters, then process the rest.
    ///
    /// Anything but [`Outcome::Success`] means no parsed value should be
    /// trusted. Running the same parser twice is not supported; accumulated
    /// tokens are not reset between runs.
    pub fn run_with(&mut self, output: &mut dyn Write, error: &mut dyn Write) -> Outcome {
        debug!(
            parameters = self.registry.len(),
            tokens = self.arguments.len(),
            "starting parse run"
        );

        if let Err(failure) = assigner::assign(&self.arguments, &mut self.registry) {
            self.report_assignment_failure(&failure, error);
            return Outcome::Failure;
        }

        let usage = self.usage();

        // Dominant parameters go first: they must succeed even when required
        // parameters are missing.
        for index in 0..self.registry.len() {
            {
                let parameter = self.registry.get(index);
                if !parameter.handled || !parameter.dominant {
                    continue;
                }
            }
            match self.registry.get_mut(index).process(output, error, &usage) {
                Ok(Processed::Converted) => {}
                Ok(Processed::Halted) => return Outcome::EarlyExit,
                Err(failure) => {
                    self.report_parameter_failure(index, &failure, error);
                    return Outcome::Failure;
                }
            }
        }

        for index in 0..self.registry.len() {
            let parameter = self.registry.get(index);
            if parameter.required && !parameter.handled {
                let failure = ParseError::MissingRequiredParameter(parameter.label().to_string());
                self.report_parameter_failure(index, &failure, error);
                return Outcome::Failure;
            }
        }

        for index in 0..self.registry.len() {
            {
                let parameter = self.registry.get(index);
                if !parameter.handled || parameter.dominant {
                    continue;
                }
            }
            match self.registry.get_mut(index).process(output, error, &usage) {
                Ok(Processed::Converted) => {}
                Ok(Processed::Halted) => return Outcome::EarlyExit,
                Err(failure) => {
                    self.report_parameter_failure(index, &failure, error);
                    return Outcome::Failure;
                }
            }
        }

        Outcome::Success
    }

    /// Typed access to a parsed value.
    ///
    /// Fails with [`AccessError::NotFound`] when no parameter was registered
    /// under `name`, and with [`AccessError::TypeMismatch`] when the stored
    /// value is of a different type than `T`.
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Result<T, AccessError> {
        let parameter = self
            .registry
            .find_by_name(name)
            .ok_or_else(|| AccessError::NotFound(name.to_string()))?;

        parameter
            .value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| AccessError::TypeMismatch(name.to_string()))
    }

    /// Typed access to the default (positional) parameter's value.
    pub fn get_default<T: Clone + 'static>(&self) -> Result<T, AccessError> {
        self.get("")
    }

    /// Retrieve a value and transform it in one step.
    pub fn get_if<T, R, F>(&self, name: &str, transform: F) -> Result<R, AccessError>
    where
        T: Clone + 'static,
        F: FnOnce(T) -> R,
    {
        Ok(transform(self.get(name)?))
    }

    /// Probe the raw argument list for `-name` or the given alternative form,
    /// without running the parser.
    pub fn has_argument(&self, name: &str, alternative: &str) -> bool {
        let short = format!("-{name}");
        self.arguments
            .iter()
            .any(|argument| *argument == short || argument == alternative)
    }

    /// Full usage text: the general description followed by one block per
    /// parameter, in registration order.
    pub fn usage(&self) -> String {
        let mut text = String::new();
        if !self.general_help_text.is_empty() {
            text.push_str(&self.general_help_text);
            text.push_str("\n\n");
        }
        text.push_str("Available parameters:\n\n");
        for parameter in self.registry.iter() {
            text.push_str(&parameter.usage());
        }
        text
    }

    /// Program name taken from the first argv element.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Number of registered parameters that are required.
    pub fn requirements(&self) -> usize {
        self.registry.iter().filter(|p| p.required).count()
    }

    /// Number of registered parameters, the built-in help included.
    pub fn commands(&self) -> usize {
        self.registry.len()
    }

    /// General description shown at the top of the help screen.
    pub fn general_help_text(&self) -> &str {
        &self.general_help_text
    }

    pub fn set_general_help_text(&mut self, text: impl Into<String>) {
        self.general_help_text = text.into();
    }

    fn report_assignment_failure(&self, failure: &ParseError, error: &mut dyn Write) {
        debug!(%failure, "token assignment failed");
        let _ = writeln!(error, "ERROR: {failure}");
        if self.has_help() {
            let _ = writeln!(error, "For more help use --help or -h.");
        }
    }

    fn report_parameter_failure(&self, index: usize, failure: &ParseError, error: &mut dyn Write) {
        debug!(%failure, "parameter processing failed");
        let _ = writeln!(error, "ERROR: {failure}. Usage:");
        let _ = error.write_all(self.registry.get(index).usage().as_bytes());
    }
}
