//! Process-wide, render-independent UI state.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::listeners::{ListenerHandle, ListenerSet};

/// Theme preference applied by the shell chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    /// Fixed light palette.
    Light,
    /// Fixed dark palette.
    Dark,
    /// Follow the host OS preference.
    System,
}

/// Transient UI state that survives component remounts within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Whether the sidebar panel is open.
    pub sidebar_open: bool,
    /// Selected theme preference.
    pub theme: ThemePreference,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: ThemePreference::System,
        }
    }
}

/// Scoped UI-store subscription; dropping it releases the callback.
pub type UiSubscription = ListenerHandle<UiState>;

/// Owner of the process-wide [`UiState`] singleton.
///
/// State changes only through the named mutators; each one computes the next
/// state from the previous state and notifies all subscribers synchronously.
/// Nothing is persisted; state resets to defaults on process start. Clones
/// share the same state and subscriber set.
#[derive(Clone, Default)]
pub struct UiStore {
    state: Rc<RefCell<UiState>>,
    listeners: ListenerSet<UiState>,
}

impl UiStore {
    /// Returns a copy of the current state.
    pub fn state(&self) -> UiState {
        *self.state.borrow()
    }

    /// Registers `callback` for state-change notifications.
    pub fn subscribe(&self, callback: impl Fn(&UiState) + 'static) -> UiSubscription {
        self.listeners.subscribe(callback)
    }

    /// Flips the sidebar open/closed flag.
    pub fn toggle_sidebar(&self) {
        self.mutate(|state| state.sidebar_open = !state.sidebar_open);
    }

    /// Selects a theme preference.
    pub fn set_theme(&self, theme: ThemePreference) {
        self.mutate(|state| state.theme = theme);
    }

    fn mutate(&self, apply: impl FnOnce(&mut UiState)) {
        let next = {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            *state
        };
        // The mutation is committed before anyone is notified.
        self.listeners.emit(&next);
    }

    /// Detaches every subscriber; retained handles become stale.
    pub(crate) fn clear_subscribers(&self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn state_starts_at_the_template_defaults() {
        let store = UiStore::default();
        let state = store.state();
        assert!(state.sidebar_open);
        assert_eq!(state.theme, ThemePreference::System);
    }

    #[test]
    fn toggle_sidebar_notifies_every_subscriber_after_the_flip() {
        let store = UiStore::default();
        let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));

        let subscriptions: Vec<UiSubscription> = (0..3)
            .map(|_| {
                store.subscribe({
                    let seen = Rc::clone(&seen);
                    move |state| seen.borrow_mut().push(state.sidebar_open)
                })
            })
            .collect();

        store.toggle_sidebar();

        assert_eq!(*seen.borrow(), vec![false, false, false]);
        assert!(!store.state().sidebar_open);
        drop(subscriptions);
    }

    #[test]
    fn set_theme_is_idempotent_but_still_notifies() {
        let store = UiStore::default();
        let notifications = Rc::new(RefCell::new(0_usize));
        let _subscription = store.subscribe({
            let notifications = Rc::clone(&notifications);
            move |_| *notifications.borrow_mut() += 1
        });

        store.set_theme(ThemePreference::Dark);
        let after_first = store.state();
        store.set_theme(ThemePreference::Dark);

        assert_eq!(store.state(), after_first);
        assert_eq!(store.state().theme, ThemePreference::Dark);
        assert_eq!(*notifications.borrow(), 2);
    }

    #[test]
    fn dropped_subscriptions_stop_receiving_notifications() {
        let store = UiStore::default();
        let notifications = Rc::new(RefCell::new(0_usize));
        let subscription = store.subscribe({
            let notifications = Rc::clone(&notifications);
            move |_| *notifications.borrow_mut() += 1
        });

        store.toggle_sidebar();
        drop(subscription);
        store.toggle_sidebar();

        assert_eq!(*notifications.borrow(), 1);
    }

    #[test]
    fn clear_subscribers_makes_retained_handles_stale() {
        let store = UiStore::default();
        let subscription = store.subscribe(|_| {});
        store.clear_subscribers();
        assert!(!subscription.is_active());
    }

    #[test]
    fn theme_preference_serializes_kebab_case() {
        let value = serde_json::to_value(ThemePreference::System).expect("serialize theme");
        assert_eq!(value, serde_json::json!("system"));
    }
}
