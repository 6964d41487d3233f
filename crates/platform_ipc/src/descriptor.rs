//! Command descriptors and cache identities for backend IPC calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Invocation payload for one backend command: a name plus named arguments.
///
/// Descriptors are immutable once built. Arguments live in a `BTreeMap`, and
/// `serde_json` keeps object keys sorted, so the serialized form is canonical
/// regardless of construction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    name: String,
    args: BTreeMap<String, Value>,
}

impl CommandDescriptor {
    /// Creates a descriptor for `name` with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    /// Adds a named argument and returns the extended descriptor.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Returns the backend command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the named arguments in canonical order.
    pub fn args(&self) -> &BTreeMap<String, Value> {
        &self.args
    }

    /// Returns the arguments as the JSON object sent across the IPC boundary.
    pub fn wire_args(&self) -> Value {
        Value::Object(
            self.args
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    /// Returns the canonical `(name, arguments)` identity for this invocation.
    pub fn identity(&self) -> CommandIdentity {
        let args = serde_json::to_string(&self.args).unwrap_or_default();
        CommandIdentity(format!("{}:{args}", self.name))
    }
}

/// Canonical command identity used as a cache key.
///
/// Two descriptors share an identity exactly when they name the same command
/// with the same canonicalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommandIdentity(String);

impl CommandIdentity {
    /// Returns the identity text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
