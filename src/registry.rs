//! Ordered collection of declared parameters.

use crate::parameter::Parameter;

/// Registry of parameters, owned by the parser instance.
///
/// Registration order is preserved; it defines the iteration order of the
/// run passes and of the help text. Duplicate names or flags are accepted,
/// and lookups return the earliest registration.
#[derive(Default)]
pub(crate) struct Registry {
    parameters: Vec<Parameter>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub(crate) fn register(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    /// Index of the parameter whose short or long flag equals `token`.
    pub(crate) fn find_by_flag(&self, token: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.matches(token))
    }

    /// Index of the default (positional) parameter, if one is registered.
    pub(crate) fn find_default(&self) -> Option<usize> {
        self.parameters.iter().position(|p| p.is_default())
    }

    /// First parameter registered under `name`.
    pub(crate) fn find_by_name(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub(crate) fn get(&self, index: usize) -> &Parameter {
        &self.parameters[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Parameter {
        &mut self.parameters[index]
    }

    /// Parameters in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Remove the parameter at `index`, preserving the order of the rest.
    pub(crate) fn remove(&mut self, index: usize) -> Parameter {
        self.parameters.remove(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.parameters.len()
    }
}
