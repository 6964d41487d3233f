//! Client-side command schemas checked before any round trip.
//!
//! The backend still validates argument values, but shape mismatches (wrong
//! names, missing arguments, wrong JSON kinds) are rejected here without
//! crossing the IPC boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{descriptor::CommandDescriptor, error::CommandError};

/// JSON kind accepted for one command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgKind {
    /// JSON string.
    String,
    /// JSON boolean.
    Bool,
    /// JSON number.
    Number,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
}

impl ArgKind {
    /// Returns a stable label used in validation messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Named argument specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgSpec {
    /// Argument name as the backend expects it.
    pub name: String,
    /// Accepted JSON kind.
    pub kind: ArgKind,
    /// Whether the argument must be present.
    pub required: bool,
}

/// Declared shape of one backend command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Backend command name.
    pub name: String,
    /// Argument specifications.
    pub args: Vec<CommandArgSpec>,
}

impl CommandSpec {
    /// Creates a spec with no declared arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Adds a required argument of `kind`.
    pub fn required_arg(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        self.args.push(CommandArgSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Adds an optional argument of `kind`.
    pub fn optional_arg(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        self.args.push(CommandArgSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }
}

/// Registry of declared command shapes keyed by command name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    specs: HashMap<String, CommandSpec>,
}

impl CommandRegistry {
    /// Registers `spec`, replacing any declaration with the same name.
    pub fn register(&mut self, spec: CommandSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    /// Returns the declared spec for `name`.
    pub fn spec(&self, name: &str) -> Option<&CommandSpec> {
        self.specs.get(name)
    }

    /// Checks `descriptor` against its declared shape.
    ///
    /// # Errors
    ///
    /// Returns a validation error for undeclared commands, missing required
    /// arguments, undeclared arguments, and JSON-kind mismatches.
    pub fn validate(&self, descriptor: &CommandDescriptor) -> Result<(), CommandError> {
        let Some(spec) = self.specs.get(descriptor.name()) else {
            return Err(CommandError::validation(format!(
                "unknown command: {}",
                descriptor.name()
            )));
        };

        for arg in &spec.args {
            match descriptor.args().get(&arg.name) {
                Some(value) if !arg.kind.matches(value) => {
                    return Err(CommandError::validation(format!(
                        "argument `{}` of `{}` expects a {}",
                        arg.name,
                        spec.name,
                        arg.kind.as_str()
                    )));
                }
                None if arg.required => {
                    return Err(CommandError::validation(format!(
                        "missing required argument `{}` for `{}`",
                        arg.name, spec.name
                    )));
                }
                _ => {}
            }
        }

        for name in descriptor.args().keys() {
            if !spec.args.iter().any(|arg| &arg.name == name) {
                return Err(CommandError::validation(format!(
                    "unexpected argument `{name}` for `{}`",
                    spec.name
                )));
            }
        }

        Ok(())
    }
}
