//! Command transport contracts and adapters for the host IPC boundary.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde_json::Value;

use crate::error::CommandError;

/// Object-safe boxed future used by [`CommandTransport`] async methods.
pub type CommandTransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Request/response channel carrying `{command, args}` across the IPC
/// boundary.
///
/// A transport performs exactly one round trip per call: no retries and no
/// timeout. Callers that need bounded latency layer their own timeout on top,
/// and callers that want retries re-invoke explicitly.
pub trait CommandTransport {
    /// Sends `command` with a JSON-object argument payload and awaits the
    /// backend's raw response.
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: &'a Value,
    ) -> CommandTransportFuture<'a, Result<Value, CommandError>>;
}

/// No-op transport for unsupported targets and baseline tests.
///
/// Every invocation fails with a transport error, matching a composition
/// where no IPC channel was wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCommandTransport;

impl CommandTransport for NoopCommandTransport {
    fn invoke<'a>(
        &'a self,
        _command: &'a str,
        _args: &'a Value,
    ) -> CommandTransportFuture<'a, Result<Value, CommandError>> {
        Box::pin(async { Err(CommandError::transport("no command transport is configured")) })
    }
}

/// Handler callback registered on a [`MemoryCommandTransport`].
pub type CommandHandler = Rc<dyn Fn(&Value) -> Result<Value, CommandError>>;

/// In-memory transport dispatching to handlers registered per command name.
///
/// Keeps a log of invoked command names so tests can count round trips.
#[derive(Clone, Default)]
pub struct MemoryCommandTransport {
    handlers: Rc<RefCell<HashMap<String, CommandHandler>>>,
    log: Rc<RefCell<Vec<String>>>,
}

impl MemoryCommandTransport {
    /// Registers `handler` for `command`, replacing any existing handler.
    pub fn register(
        &self,
        command: impl Into<String>,
        handler: impl Fn(&Value) -> Result<Value, CommandError> + 'static,
    ) {
        self.handlers
            .borrow_mut()
            .insert(command.into(), Rc::new(handler));
    }

    /// Returns the number of round trips performed for `command`.
    pub fn round_trips(&self, command: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|name| name.as_str() == command)
            .count()
    }

    /// Returns the total number of round trips performed.
    pub fn total_round_trips(&self) -> usize {
        self.log.borrow().len()
    }
}

impl CommandTransport for MemoryCommandTransport {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: &'a Value,
    ) -> CommandTransportFuture<'a, Result<Value, CommandError>> {
        Box::pin(async move {
            self.log.borrow_mut().push(command.to_string());
            let handler = self.handlers.borrow().get(command).cloned();
            match handler {
                Some(handler) => handler(args),
                None => Err(CommandError::execution(format!("unknown command: {command}"))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use crate::error::CommandErrorKind;

    use super::*;

    #[test]
    fn memory_transport_dispatches_to_registered_handler() {
        let transport = MemoryCommandTransport::default();
        transport.register("echo", |args| Ok(args.clone()));
        let transport_obj: &dyn CommandTransport = &transport;

        let result =
            block_on(transport_obj.invoke("echo", &json!({"text": "hi"}))).expect("invoke");
        assert_eq!(result, json!({"text": "hi"}));
        assert_eq!(transport.round_trips("echo"), 1);
        assert_eq!(transport.total_round_trips(), 1);
    }

    #[test]
    fn memory_transport_counts_each_round_trip() {
        let transport = MemoryCommandTransport::default();
        transport.register("ping", |_| Ok(json!("pong")));

        for _ in 0..3 {
            block_on(transport.invoke("ping", &json!({}))).expect("invoke");
        }
        assert_eq!(transport.round_trips("ping"), 3);
        assert_eq!(transport.round_trips("other"), 0);
    }

    #[test]
    fn memory_transport_rejects_unregistered_commands() {
        let transport = MemoryCommandTransport::default();
        let error = block_on(transport.invoke("missing", &json!({})))
            .expect_err("expected unknown command");
        assert_eq!(error.kind, CommandErrorKind::Execution);
        assert!(error.message.contains("missing"));
    }

    #[test]
    fn noop_transport_always_fails_with_a_transport_error() {
        let transport = NoopCommandTransport;
        let transport_obj: &dyn CommandTransport = &transport;
        let error = block_on(transport_obj.invoke("greet", &json!({"name": "Ada"})))
            .expect_err("expected transport error");
        assert_eq!(error.kind, CommandErrorKind::Transport);
    }
}
