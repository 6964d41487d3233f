//! Leptos view bindings over the query cache and UI store.
//!
//! Bindings are thin adapters: they subscribe at mount, release on scope
//! cleanup, and re-render exactly on notification. They own no state and hold
//! no business logic; anything beyond mirroring runtime state into signals
//! belongs in the runtime components themselves.

use leptos::*;
use platform_ipc::{CommandDescriptor, CommandError};
use serde_json::Value;

use crate::{
    mutation::MutationPolicy,
    query::{QuerySnapshot, QueryStatus},
    runtime_context::use_client_runtime,
    ui_store::{ThemePreference, UiState},
};

/// Subscribes the calling scope to one cache entry and starts a fetch.
///
/// The subscription is released on scope cleanup. An in-flight fetch still
/// completes into the cache after unmount, so other subscribers benefit; the
/// unmounted binding just stops observing.
pub fn use_query(descriptor: CommandDescriptor) -> ReadSignal<QuerySnapshot> {
    let runtime = use_client_runtime();
    let cache = runtime.queries.clone();

    let (snapshot, set_snapshot) = create_signal(cache.peek(&descriptor));
    let subscription = cache.subscribe(&descriptor, move |next| set_snapshot.set(next.clone()));
    on_cleanup(move || drop(subscription));

    spawn_local(async move {
        cache.fetch(&descriptor).await;
    });

    snapshot
}

/// Reactive view of one mutation dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationState {
    /// Lifecycle state of the most recent dispatch.
    pub status: QueryStatus,
    /// Result payload of a successful dispatch.
    pub data: Option<Value>,
    /// Failure detail of a failed dispatch.
    pub error: Option<CommandError>,
}

impl Default for MutationState {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }
}

/// Returns a reactive mutation state plus a dispatch callback.
///
/// Dispatch runs the gateway with the given descriptor and policy; the
/// signal mirrors idle/loading/success/error. Failures surface in the state
/// and the warning log; they are never swallowed.
pub fn use_mutation() -> (
    ReadSignal<MutationState>,
    Callback<(CommandDescriptor, MutationPolicy)>,
) {
    let runtime = use_client_runtime();
    let (state, set_state) = create_signal(MutationState::default());

    let dispatch = Callback::new(move |(descriptor, policy): (CommandDescriptor, MutationPolicy)| {
        let gateway = runtime.mutations.clone();
        set_state.set(MutationState {
            status: QueryStatus::Loading,
            ..MutationState::default()
        });
        spawn_local(async move {
            match gateway.mutate(&descriptor, &policy).await {
                Ok(data) => set_state.set(MutationState {
                    status: QueryStatus::Success,
                    data: Some(data),
                    error: None,
                }),
                Err(error) => {
                    logging::warn!("mutation `{}` failed: {error}", descriptor.name());
                    set_state.set(MutationState {
                        status: QueryStatus::Error,
                        data: None,
                        error: Some(error),
                    });
                }
            }
        });
    });

    (state, dispatch)
}

/// Subscribes the calling scope to the UI store.
///
/// The subscription is released on scope cleanup; mutators stay available
/// through the runtime handle.
pub fn use_ui_state() -> ReadSignal<UiState> {
    let runtime = use_client_runtime();
    let (state, set_state) = create_signal(runtime.ui.state());
    let subscription = runtime.ui.subscribe(move |next| set_state.set(*next));
    on_cleanup(move || drop(subscription));
    state
}

/// Subscribes to the sidebar slice of the UI store; re-renders only when the
/// flag changes.
pub fn use_sidebar_open() -> Memo<bool> {
    let state = use_ui_state();
    create_memo(move |_| state.get().sidebar_open)
}

/// Subscribes to the theme slice of the UI store; re-renders only when the
/// preference changes.
pub fn use_theme() -> Memo<ThemePreference> {
    let state = use_ui_state();
    create_memo(move |_| state.get().theme)
}
