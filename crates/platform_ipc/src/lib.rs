//! Typed IPC contracts shared between the client runtime and host transports.
//!
//! This crate is the API-first boundary for backend command dispatch. It
//! defines command descriptors and their cache identities, the command error
//! taxonomy, client-side command schemas, the transport contract with
//! memory/no-op adapters, and clock helpers, while concrete webview
//! transports live in `platform_ipc_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod schema;
pub mod time;
pub mod transport;

pub use catalog::{builtin_registry, greet, GREET_COMMAND};
pub use descriptor::{CommandDescriptor, CommandIdentity};
pub use error::{CommandError, CommandErrorKind};
pub use schema::{ArgKind, CommandArgSpec, CommandRegistry, CommandSpec};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
pub use transport::{
    CommandHandler, CommandTransport, CommandTransportFuture, MemoryCommandTransport,
    NoopCommandTransport,
};
