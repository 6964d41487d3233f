//! Builtin backend command catalog declared client-side.
//!
//! The backend owns each command's implementation; this module mirrors its
//! contract (name and argument shape) so descriptors can be checked before
//! the round trip.

use crate::{
    descriptor::CommandDescriptor,
    schema::{ArgKind, CommandRegistry, CommandSpec},
};

/// Backend command returning a greeting string for a non-empty name.
pub const GREET_COMMAND: &str = "greet";

/// Returns a registry seeded with the backend's builtin command set.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::default();
    registry.register(CommandSpec::new(GREET_COMMAND).required_arg("name", ArgKind::String));
    registry
}

/// Builds the `greet` invocation for `name`.
pub fn greet(name: impl Into<String>) -> CommandDescriptor {
    CommandDescriptor::new(GREET_COMMAND).arg("name", name.into())
}
