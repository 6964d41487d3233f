//! Runtime bundle and context wiring for the client layer.
//!
//! This module owns the long-lived cache/gateway/store bundle: assembled once
//! at process start from a transport, provided to the render tree as Leptos
//! context, and torn down (all subscribers cleared) at process exit. There is
//! no hidden re-initialization in between.

use std::rc::Rc;

use leptos::{provide_context, use_context};
use platform_ipc::{builtin_registry, Clock, CommandRegistry, CommandTransport, SystemClock};

use crate::{
    mutation::MutationGateway,
    query::{QueryCache, QueryConfig},
    ui_store::UiStore,
};

#[derive(Clone)]
/// Process-wide client runtime bundle.
///
/// Clones share the same cache table, gateway, and UI store.
pub struct ClientRuntime {
    /// Session query cache over the command transport.
    pub queries: QueryCache,
    /// Gateway for write commands with cache reconciliation.
    pub mutations: MutationGateway,
    /// Transient UI state store.
    pub ui: UiStore,
}

impl ClientRuntime {
    /// Assembles the runtime over `transport` with the builtin command
    /// catalog, wall-clock time, and default freshness windows.
    pub fn new(transport: Rc<dyn CommandTransport>) -> Self {
        Self::with_parts(
            transport,
            builtin_registry(),
            Rc::new(SystemClock),
            QueryConfig::default(),
        )
    }

    /// Assembles the runtime from explicit parts.
    pub fn with_parts(
        transport: Rc<dyn CommandTransport>,
        registry: CommandRegistry,
        clock: Rc<dyn Clock>,
        config: QueryConfig,
    ) -> Self {
        let registry = Rc::new(registry);
        let queries = QueryCache::new(
            Rc::clone(&transport),
            Rc::clone(&registry),
            clock,
            Rc::new(config),
        );
        let mutations = MutationGateway::new(queries.clone(), transport, registry);
        Self {
            queries,
            mutations,
            ui: UiStore::default(),
        }
    }

    /// Tears the runtime down by detaching every subscriber.
    ///
    /// Cached data stays readable; retained subscription handles report a
    /// stale-subscriber error on use.
    pub fn shutdown(&self) {
        self.queries.clear_subscribers();
        self.ui.clear_subscribers();
    }
}

/// Provides `runtime` to descendant components.
pub fn provide_client_runtime(runtime: ClientRuntime) {
    provide_context(runtime);
}

/// Returns the current [`ClientRuntime`].
///
/// # Panics
///
/// Panics if called outside a tree wrapped by [`provide_client_runtime`].
pub fn use_client_runtime() -> ClientRuntime {
    use_context::<ClientRuntime>().expect("ClientRuntime not provided")
}
