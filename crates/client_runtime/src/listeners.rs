//! Subscription registry primitives with scope-bound release.
//!
//! Every subscription in the runtime is represented by a handle whose `Drop`
//! releases the callback, so unsubscription is enforced by ownership rather
//! than caller discipline.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

/// Callback registry whose subscriptions are released by dropping the handle
/// returned from [`ListenerSet::subscribe`].
///
/// Clones share the same registry. All access happens on the rendering
/// thread.
pub struct ListenerSet<T> {
    inner: Rc<RefCell<ListenerSlots<T>>>,
}

struct ListenerSlots<T> {
    next_id: u64,
    callbacks: Vec<(u64, Rc<dyn Fn(&T)>)>,
}

impl<T> Default for ListenerSet<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerSlots {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }
}

impl<T> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> ListenerSet<T> {
    /// Registers `callback` and returns its releasing handle.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> ListenerHandle<T> {
        let mut slots = self.inner.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.callbacks.push((id, Rc::new(callback)));
        ListenerHandle {
            id,
            slots: Rc::downgrade(&self.inner),
        }
    }

    /// Invokes every live callback with `value`.
    ///
    /// The callback list is snapshotted before the calls, so callbacks may
    /// subscribe or unsubscribe during notification.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Rc<dyn Fn(&T)>> = self
            .inner
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    /// Returns the number of live subscriptions.
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Returns whether the set has no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detaches every subscription; retained handles become stale.
    pub fn clear(&self) {
        self.inner.borrow_mut().callbacks.clear();
    }
}

/// Scoped subscription handle; dropping it releases the callback.
pub struct ListenerHandle<T> {
    id: u64,
    slots: Weak<RefCell<ListenerSlots<T>>>,
}

impl<T> ListenerHandle<T> {
    /// Returns whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.slots.upgrade().is_some_and(|slots| {
            slots
                .borrow()
                .callbacks
                .iter()
                .any(|(id, _)| *id == self.id)
        })
    }
}

impl<T> Drop for ListenerHandle<T> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn recording_set() -> (ListenerSet<u32>, Rc<RefCell<Vec<u32>>>) {
        (ListenerSet::default(), Rc::new(RefCell::new(Vec::new())))
    }

    #[test]
    fn emit_reaches_every_live_subscription() {
        let (set, seen) = recording_set();
        let _first = set.subscribe({
            let seen = Rc::clone(&seen);
            move |value| seen.borrow_mut().push(*value)
        });
        let _second = set.subscribe({
            let seen = Rc::clone(&seen);
            move |value| seen.borrow_mut().push(*value * 10)
        });

        set.emit(&3);
        assert_eq!(*seen.borrow(), vec![3, 30]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn dropping_a_handle_releases_its_callback() {
        let (set, seen) = recording_set();
        let handle = set.subscribe({
            let seen = Rc::clone(&seen);
            move |value| seen.borrow_mut().push(*value)
        });

        set.emit(&1);
        drop(handle);
        set.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert!(set.is_empty());
    }

    #[test]
    fn clear_detaches_all_handles() {
        let (set, seen) = recording_set();
        let handle = set.subscribe({
            let seen = Rc::clone(&seen);
            move |value| seen.borrow_mut().push(*value)
        });

        set.clear();
        set.emit(&1);

        assert!(seen.borrow().is_empty());
        assert!(!handle.is_active());
    }

    #[test]
    fn callbacks_may_unsubscribe_during_notification() {
        let set: ListenerSet<u32> = ListenerSet::default();
        let parked: Rc<RefCell<Option<ListenerHandle<u32>>>> = Rc::new(RefCell::new(None));
        let handle = set.subscribe({
            let parked = Rc::clone(&parked);
            move |_| {
                parked.borrow_mut().take();
            }
        });
        *parked.borrow_mut() = Some(handle);

        set.emit(&1);
        assert!(set.is_empty());
    }

    #[test]
    fn handle_outliving_the_set_reports_inactive() {
        let set: ListenerSet<u32> = ListenerSet::default();
        let handle = set.subscribe(|_| {});
        drop(set);
        assert!(!handle.is_active());
    }
}
