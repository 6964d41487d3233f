//! Session-scoped query cache over the command transport.
//!
//! One entry exists per canonical command identity, created on first use and
//! kept for the session (no eviction). Entries move through
//! `idle -> loading -> {success | error}`; every notification fires after its
//! transition commits and outside the cache borrow, so callbacks may re-enter
//! the cache.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use platform_ipc::{
    Clock, CommandDescriptor, CommandError, CommandIdentity, CommandRegistry, CommandTransport,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::listeners::{ListenerHandle, ListenerSet};

/// Freshness window for local, low-latency IPC calls.
pub const DEFAULT_STALE_AFTER_MS: u64 = 60_000;

/// Lifecycle state of one cached command result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryStatus {
    /// No fetch has been issued for this identity yet.
    Idle,
    /// A round trip is in flight; concurrent fetches coalesce into it.
    Loading,
    /// The last round trip succeeded.
    Success,
    /// The last round trip failed.
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    /// Lifecycle state.
    pub status: QueryStatus,
    /// Last successful payload, retained across later failures.
    pub data: Option<Value>,
    /// Failure detail for the most recent fetch, when it failed.
    pub error: Option<CommandError>,
    /// Commit time of the last successful payload.
    pub updated_at_unix_ms: Option<u64>,
    /// Freshness window applied to this entry.
    pub stale_after_ms: u64,
}

impl QuerySnapshot {
    fn idle(stale_after_ms: u64) -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            updated_at_unix_ms: None,
            stale_after_ms,
        }
    }

    /// Returns whether the cached payload may be served at `now_unix_ms`
    /// without a round trip.
    pub fn is_fresh(&self, now_unix_ms: u64) -> bool {
        self.status == QueryStatus::Success
            && self
                .updated_at_unix_ms
                .is_some_and(|at| now_unix_ms.saturating_sub(at) < self.stale_after_ms)
    }

    /// Deserializes the cached payload into `T`.
    ///
    /// Typing the raw backend response is the caller's responsibility; a
    /// shape mismatch reads as `None`, same as an absent payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Freshness configuration keyed by command family.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    default_stale_after_ms: u64,
    overrides: HashMap<String, u64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_stale_after_ms: DEFAULT_STALE_AFTER_MS,
            overrides: HashMap::new(),
        }
    }
}

impl QueryConfig {
    /// Creates a config applying `default_stale_after_ms` to every command
    /// family.
    pub fn with_default_stale_after(default_stale_after_ms: u64) -> Self {
        Self {
            default_stale_after_ms,
            overrides: HashMap::new(),
        }
    }

    /// Overrides the freshness window for one command family.
    pub fn stale_after_for_command(
        mut self,
        command: impl Into<String>,
        stale_after_ms: u64,
    ) -> Self {
        self.overrides.insert(command.into(), stale_after_ms);
        self
    }

    /// Returns the freshness window for `command`.
    pub fn stale_after_ms(&self, command: &str) -> u64 {
        self.overrides
            .get(command)
            .copied()
            .unwrap_or(self.default_stale_after_ms)
    }
}

struct CacheEntry {
    snapshot: QuerySnapshot,
    invalidated: bool,
    listeners: ListenerSet<QuerySnapshot>,
}

type EntryTable = HashMap<CommandIdentity, Rc<RefCell<CacheEntry>>>;

/// Keyed store mapping command identities to their last known result.
///
/// Clones share the same entry table. All access happens on the rendering
/// thread; only the command round trip itself suspends, and only at its
/// awaiting call site.
#[derive(Clone)]
pub struct QueryCache {
    entries: Rc<RefCell<EntryTable>>,
    transport: Rc<dyn CommandTransport>,
    registry: Rc<CommandRegistry>,
    clock: Rc<dyn Clock>,
    config: Rc<QueryConfig>,
}

impl QueryCache {
    /// Creates a cache over `transport`, checking descriptors against
    /// `registry` before every round trip.
    pub fn new(
        transport: Rc<dyn CommandTransport>,
        registry: Rc<CommandRegistry>,
        clock: Rc<dyn Clock>,
        config: Rc<QueryConfig>,
    ) -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
            transport,
            registry,
            clock,
            config,
        }
    }

    fn ensure(&self, descriptor: &CommandDescriptor) -> Rc<RefCell<CacheEntry>> {
        let identity = descriptor.identity();
        let mut entries = self.entries.borrow_mut();
        Rc::clone(entries.entry(identity).or_insert_with(|| {
            Rc::new(RefCell::new(CacheEntry {
                snapshot: QuerySnapshot::idle(self.config.stale_after_ms(descriptor.name())),
                invalidated: false,
                listeners: ListenerSet::default(),
            }))
        }))
    }

    fn commit(
        entry: &Rc<RefCell<CacheEntry>>,
        apply: impl FnOnce(&mut CacheEntry),
    ) -> QuerySnapshot {
        let (snapshot, listeners) = {
            let mut entry = entry.borrow_mut();
            apply(&mut entry);
            (entry.snapshot.clone(), entry.listeners.clone())
        };
        listeners.emit(&snapshot);
        snapshot
    }

    /// Returns the current snapshot without creating an entry or issuing a
    /// round trip.
    pub fn peek(&self, descriptor: &CommandDescriptor) -> QuerySnapshot {
        let identity = descriptor.identity();
        self.entries
            .borrow()
            .get(&identity)
            .map(|entry| entry.borrow().snapshot.clone())
            .unwrap_or_else(|| {
                QuerySnapshot::idle(self.config.stale_after_ms(descriptor.name()))
            })
    }

    /// Registers `callback` for state-change notifications on the entry for
    /// `descriptor`, creating the entry when absent.
    pub fn subscribe(
        &self,
        descriptor: &CommandDescriptor,
        callback: impl Fn(&QuerySnapshot) + 'static,
    ) -> QuerySubscription {
        let entry = self.ensure(descriptor);
        let handle = entry.borrow().listeners.subscribe(callback);
        QuerySubscription {
            identity: descriptor.identity(),
            handle,
            entries: Rc::downgrade(&self.entries),
        }
    }

    /// Reads the entry for `descriptor` and refreshes it when needed.
    ///
    /// Fresh entries are served without a round trip. An entry already
    /// loading is returned as-is, coalescing concurrent fetches for the same
    /// identity into the in-flight round trip. Otherwise the descriptor is
    /// checked against the command registry (a shape mismatch commits an
    /// error without crossing the IPC boundary), the entry moves to loading,
    /// and the transport result is committed as success or error.
    pub async fn fetch(&self, descriptor: &CommandDescriptor) -> QuerySnapshot {
        let entry = self.ensure(descriptor);

        {
            let entry = entry.borrow();
            let now = self.clock.now_unix_ms();
            if !entry.invalidated && entry.snapshot.is_fresh(now) {
                return entry.snapshot.clone();
            }
            if entry.snapshot.status == QueryStatus::Loading {
                return entry.snapshot.clone();
            }
        }

        if let Err(error) = self.registry.validate(descriptor) {
            return Self::commit(&entry, |entry| {
                entry.snapshot.status = QueryStatus::Error;
                entry.snapshot.error = Some(error);
            });
        }

        Self::commit(&entry, |entry| {
            entry.snapshot.status = QueryStatus::Loading;
            entry.snapshot.error = None;
        });

        let args = descriptor.wire_args();
        let result = self.transport.invoke(descriptor.name(), &args).await;
        let now = self.clock.now_unix_ms();

        Self::commit(&entry, |entry| match result {
            Ok(data) => {
                entry.invalidated = false;
                entry.snapshot.status = QueryStatus::Success;
                entry.snapshot.data = Some(data);
                entry.snapshot.error = None;
                entry.snapshot.updated_at_unix_ms = Some(now);
            }
            Err(error) => {
                entry.snapshot.status = QueryStatus::Error;
                entry.snapshot.error = Some(error);
            }
        })
    }

    /// Marks the entry for `descriptor` so the next fetch bypasses the
    /// freshness check. A no-op for identities never fetched.
    pub fn invalidate(&self, descriptor: &CommandDescriptor) {
        let identity = descriptor.identity();
        if let Some(entry) = self.entries.borrow().get(&identity) {
            entry.borrow_mut().invalidated = true;
        }
    }

    /// Overwrites the entry for `descriptor` with `data` as a committed
    /// success, without a round trip. Used by the mutation gateway.
    pub(crate) fn write_through(
        &self,
        descriptor: &CommandDescriptor,
        data: Value,
    ) -> QuerySnapshot {
        let entry = self.ensure(descriptor);
        let now = self.clock.now_unix_ms();
        Self::commit(&entry, |entry| {
            entry.invalidated = false;
            entry.snapshot.status = QueryStatus::Success;
            entry.snapshot.data = Some(data);
            entry.snapshot.error = None;
            entry.snapshot.updated_at_unix_ms = Some(now);
        })
    }

    /// Detaches every subscriber from every entry. Cached data stays
    /// readable; retained subscription handles become stale.
    pub(crate) fn clear_subscribers(&self) {
        for entry in self.entries.borrow().values() {
            entry.borrow().listeners.clear();
        }
    }
}

/// Scoped cache subscription; dropping it releases the callback.
///
/// An unsubscribed binding receives no further notifications, while an
/// in-flight fetch still completes into the cache for other subscribers.
pub struct QuerySubscription {
    identity: CommandIdentity,
    handle: ListenerHandle<QuerySnapshot>,
    entries: Weak<RefCell<EntryTable>>,
}

impl QuerySubscription {
    /// Returns the subscribed command identity.
    pub fn identity(&self) -> &CommandIdentity {
        &self.identity
    }

    /// Returns whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Returns the live snapshot for the subscribed identity.
    ///
    /// # Errors
    ///
    /// Returns a stale-subscriber error once the subscription has been
    /// detached (dropped cache or runtime shutdown).
    pub fn current(&self) -> Result<QuerySnapshot, CommandError> {
        let stale = || {
            CommandError::stale_subscriber(format!(
                "subscription for `{}` is no longer registered",
                self.identity.as_str()
            ))
        };
        if !self.handle.is_active() {
            return Err(stale());
        }
        let entries = self.entries.upgrade().ok_or_else(stale)?;
        let snapshot = entries
            .borrow()
            .get(&self.identity)
            .map(|entry| entry.borrow().snapshot.clone());
        snapshot.ok_or_else(stale)
    }
}
