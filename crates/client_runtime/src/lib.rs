//! Local client runtime for the desktop shell webview.
//!
//! This crate dispatches typed commands across the host IPC boundary, caches
//! command results per canonical identity, reconciles the cache after
//! mutations, and holds transient render-independent UI state. Subscriptions
//! carry change notifications into the render tree; view bindings in
//! [`bindings`] adapt them to Leptos signals.

pub mod bindings;
pub mod listeners;
pub mod mutation;
pub mod query;
pub mod runtime_context;
pub mod ui_store;

pub use bindings::{
    use_mutation, use_query, use_sidebar_open, use_theme, use_ui_state, MutationState,
};
pub use listeners::{ListenerHandle, ListenerSet};
pub use mutation::{CacheUpdateFn, MutationGateway, MutationPolicy};
pub use query::{
    QueryCache, QueryConfig, QuerySnapshot, QueryStatus, QuerySubscription, DEFAULT_STALE_AFTER_MS,
};
pub use runtime_context::{provide_client_runtime, use_client_runtime, ClientRuntime};
pub use ui_store::{ThemePreference, UiState, UiStore, UiSubscription};
