//! Mutation gateway wrapping write commands with cache reconciliation.

use std::rc::Rc;

use platform_ipc::{CommandDescriptor, CommandError, CommandRegistry, CommandTransport};
use serde_json::Value;

use crate::query::QueryCache;

/// Maps previous cached data plus the mutation result to new cached data.
pub type CacheUpdateFn = Rc<dyn Fn(Option<&Value>, &Value) -> Value>;

/// Cache reconciliation applied after a successful mutation.
///
/// Update targets are overwritten directly without a round trip; invalidated
/// targets are marked stale so the next read re-fetches. A failed mutation
/// applies neither.
#[derive(Clone, Default)]
pub struct MutationPolicy {
    invalidates: Vec<CommandDescriptor>,
    updates: Vec<(CommandDescriptor, CacheUpdateFn)>,
}

impl MutationPolicy {
    /// Creates an empty policy: the mutation touches no cached identities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entry for `target` stale on success.
    pub fn invalidates(mut self, target: CommandDescriptor) -> Self {
        self.invalidates.push(target);
        self
    }

    /// Overwrites the entry for `target` on success with the payload produced
    /// by `apply` from the previous cached data and the mutation result.
    pub fn updates(
        mut self,
        target: CommandDescriptor,
        apply: impl Fn(Option<&Value>, &Value) -> Value + 'static,
    ) -> Self {
        self.updates.push((target, Rc::new(apply)));
        self
    }
}

/// Gateway for commands with backend side effects.
///
/// Shares the query cache's entry table so successful writes become visible
/// to every subscriber; errors are always returned to the caller, never
/// swallowed here.
#[derive(Clone)]
pub struct MutationGateway {
    cache: QueryCache,
    transport: Rc<dyn CommandTransport>,
    registry: Rc<CommandRegistry>,
}

impl MutationGateway {
    /// Creates a gateway reconciling into `cache`.
    pub fn new(
        cache: QueryCache,
        transport: Rc<dyn CommandTransport>,
        registry: Rc<CommandRegistry>,
    ) -> Self {
        Self {
            cache,
            transport,
            registry,
        }
    }

    /// Runs a write command and applies `policy` on success.
    ///
    /// # Errors
    ///
    /// Returns the command error verbatim: schema rejection before the round
    /// trip, or the backend's failure after it. On failure no cache state
    /// changes and no subscriber is notified.
    pub async fn mutate(
        &self,
        descriptor: &CommandDescriptor,
        policy: &MutationPolicy,
    ) -> Result<Value, CommandError> {
        self.registry.validate(descriptor)?;

        let args = descriptor.wire_args();
        let result = self.transport.invoke(descriptor.name(), &args).await?;

        for (target, apply) in &policy.updates {
            let previous = self.cache.peek(target);
            let next = apply(previous.data.as_ref(), &result);
            self.cache.write_through(target, next);
        }
        for target in &policy.invalidates {
            self.cache.invalidate(target);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use platform_ipc::{
        builtin_registry, greet, ArgKind, CommandErrorKind, CommandSpec, ManualClock,
        MemoryCommandTransport,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::query::{QueryConfig, QueryStatus};

    use super::*;

    fn greeting_backend() -> MemoryCommandTransport {
        let transport = MemoryCommandTransport::default();
        transport.register("greet", |args| {
            let name = args.get("name").and_then(Value::as_str).unwrap_or_default();
            if name.is_empty() {
                return Err(CommandError::validation(
                    "Validation error: Name cannot be empty",
                ));
            }
            Ok(json!(format!("Hello, {name}! Welcome to your desktop app.")))
        });
        transport
    }

    fn runtime_parts(transport: MemoryCommandTransport) -> (QueryCache, MutationGateway) {
        let transport: Rc<dyn CommandTransport> = Rc::new(transport);
        let registry = Rc::new(builtin_registry());
        let cache = QueryCache::new(
            Rc::clone(&transport),
            Rc::clone(&registry),
            Rc::new(ManualClock::at(0)),
            Rc::new(QueryConfig::default()),
        );
        let gateway = MutationGateway::new(cache.clone(), transport, registry);
        (cache, gateway)
    }

    #[test]
    fn successful_mutation_with_update_policy_obeys_the_round_trip_law() {
        let transport = greeting_backend();
        let (cache, gateway) = runtime_parts(transport.clone());

        let policy =
            MutationPolicy::new().updates(greet("Ada"), |_previous, result| result.clone());
        let result =
            block_on(gateway.mutate(&greet("Ada"), &policy)).expect("mutation succeeds");
        assert_eq!(result, json!("Hello, Ada! Welcome to your desktop app."));

        // The mapped payload is served without a further round trip.
        let snapshot = block_on(cache.fetch(&greet("Ada")));
        assert_eq!(snapshot.status, QueryStatus::Success);
        assert_eq!(snapshot.data, Some(result));
        assert_eq!(transport.round_trips("greet"), 1);

        cache.invalidate(&greet("Ada"));
        block_on(cache.fetch(&greet("Ada")));
        assert_eq!(transport.round_trips("greet"), 2);
    }

    #[test]
    fn update_mapper_sees_the_previous_cached_payload() {
        let transport = greeting_backend();
        let (cache, gateway) = runtime_parts(transport.clone());

        block_on(cache.fetch(&greet("Ada")));
        let policy = MutationPolicy::new().updates(greet("Ada"), |previous, result| {
            json!({
                "previous": previous.cloned().unwrap_or(Value::Null),
                "latest": result.clone(),
            })
        });
        block_on(gateway.mutate(&greet("Ada"), &policy)).expect("mutation succeeds");

        let snapshot = cache.peek(&greet("Ada"));
        let data = snapshot.data.expect("updated payload");
        assert_eq!(
            data.get("previous"),
            Some(&json!("Hello, Ada! Welcome to your desktop app."))
        );
    }

    #[test]
    fn mutation_invalidates_marked_identities() {
        let transport = greeting_backend();
        transport.register("clear_greeting", |_| Ok(Value::Null));
        let transport_obj: Rc<dyn CommandTransport> = Rc::new(transport.clone());
        let mut registry = builtin_registry();
        registry.register(CommandSpec::new("clear_greeting").optional_arg("name", ArgKind::String));
        let registry = Rc::new(registry);
        let cache = QueryCache::new(
            Rc::clone(&transport_obj),
            Rc::clone(&registry),
            Rc::new(ManualClock::at(0)),
            Rc::new(QueryConfig::default()),
        );
        let gateway = MutationGateway::new(cache.clone(), transport_obj, registry);

        block_on(cache.fetch(&greet("Ada")));
        assert_eq!(transport.round_trips("greet"), 1);

        let policy = MutationPolicy::new().invalidates(greet("Ada"));
        block_on(gateway.mutate(&CommandDescriptor::new("clear_greeting"), &policy))
            .expect("mutation succeeds");

        block_on(cache.fetch(&greet("Ada")));
        assert_eq!(transport.round_trips("greet"), 2);
    }

    #[test]
    fn failed_mutation_changes_no_cache_state_and_notifies_no_subscriber() {
        let transport = greeting_backend();
        let (cache, gateway) = runtime_parts(transport.clone());

        let before = block_on(cache.fetch(&greet("Ada")));
        let notifications = Rc::new(RefCell::new(0_usize));
        let _subscription = cache.subscribe(&greet("Ada"), {
            let notifications = Rc::clone(&notifications);
            move |_| *notifications.borrow_mut() += 1
        });

        let policy = MutationPolicy::new()
            .updates(greet("Ada"), |_, result| result.clone())
            .invalidates(greet("Ada"));
        let error = block_on(gateway.mutate(&greet(""), &policy))
            .expect_err("backend rejects the empty name");

        assert_eq!(error.kind, CommandErrorKind::Validation);
        assert_eq!(error.message, "Validation error: Name cannot be empty");
        assert_eq!(*notifications.borrow(), 0);
        assert_eq!(cache.peek(&greet("Ada")), before);

        // Still fresh: the failed mutation did not invalidate the entry.
        block_on(cache.fetch(&greet("Ada")));
        assert_eq!(transport.round_trips("greet"), 2);
    }

    #[test]
    fn mutation_schema_mismatch_is_rejected_before_the_round_trip() {
        let transport = greeting_backend();
        let (_cache, gateway) = runtime_parts(transport.clone());

        let descriptor = CommandDescriptor::new("greet").arg("name", 42);
        let error = block_on(gateway.mutate(&descriptor, &MutationPolicy::new()))
            .expect_err("shape mismatch");

        assert_eq!(error.kind, CommandErrorKind::Validation);
        assert_eq!(transport.round_trips("greet"), 0);
    }
}
