//! Process-wide session state
//!
//! [`SessionStore`] is the single owner of the cross-cutting flags that the
//! orchestrator writes and views read: the current address, how the search
//! was started, whether a fetch cycle is running, and the active language.
//! Writes go through setter methods only; every effective change is
//! published on a broadcast channel so subscribers can re-render.

use crate::model::SearchMethod;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tokio::sync::broadcast;
use tracing::debug;

/// Value snapshot of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_address: Option<String>,
    pub last_search_method: Option<SearchMethod>,
    pub data_fetch_running: bool,
    pub address_search_running: bool,
    pub current_lang: Option<String>,
    pub current_topic: Option<String>,
    pub current_parcel_geocode_parameter: Option<String>,
    pub other_parcel_geocode_parameter: Option<String>,
    pub current_parcel_address: Option<String>,
    pub other_parcel_address: Option<String>,
    /// `(lng, lat)` of the last map click
    pub last_click_coords: Option<(f64, f64)>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_address: None,
            last_search_method: Some(SearchMethod::Address),
            data_fetch_running: false,
            address_search_running: false,
            current_lang: None,
            current_topic: None,
            current_parcel_geocode_parameter: None,
            other_parcel_geocode_parameter: None,
            current_parcel_address: None,
            other_parcel_address: None,
            last_click_coords: None,
        }
    }
}

/// Which part of the session changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionField {
    CurrentAddress,
    LastSearchMethod,
    DataFetchRunning,
    AddressSearchRunning,
    CurrentLang,
    CurrentTopic,
    ParcelGeocodeParameters,
    LastClickCoords,
}

/// Change notification for subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Changed(SessionField),
    /// Address and parcel fields cleared after a not-found navigation
    Cleared,
}

/// Shared, interior-mutable session store
pub struct SessionStore {
    state: RwLock<SessionState>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Default for SessionStore {
    fn default() -> Self {
        // Best-effort buffer; lagging subscribers re-read the snapshot.
        let (event_tx, _event_rx) = broadcast::channel(64);
        Self {
            state: RwLock::new(SessionState::default()),
            event_tx,
        }
    }
}

impl Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.read())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_address(&self) -> Option<String> {
        self.state.read().current_address.clone()
    }

    pub fn last_search_method(&self) -> Option<SearchMethod> {
        self.state.read().last_search_method
    }

    pub fn is_fetch_running(&self) -> bool {
        self.state.read().data_fetch_running
    }

    pub fn current_lang(&self) -> Option<String> {
        self.state.read().current_lang.clone()
    }

    fn update(&self, field: SessionField, f: impl FnOnce(&mut SessionState) -> bool) {
        let changed = f(&mut self.state.write());
        if changed {
            // No receivers is fine; nobody is watching yet.
            let _ = self.event_tx.send(SessionEvent::Changed(field));
        }
    }

    pub fn set_current_address(&self, address: Option<String>) {
        self.update(SessionField::CurrentAddress, |s| {
            replace_if_changed(&mut s.current_address, address)
        });
    }

    pub fn set_last_search_method(&self, method: Option<SearchMethod>) {
        self.update(SessionField::LastSearchMethod, |s| {
            replace_if_changed(&mut s.last_search_method, method)
        });
    }

    pub fn set_address_search_running(&self, running: bool) {
        self.update(SessionField::AddressSearchRunning, |s| {
            replace_if_changed(&mut s.address_search_running, running)
        });
    }

    pub fn set_current_lang(&self, lang: Option<String>) {
        self.update(SessionField::CurrentLang, |s| {
            replace_if_changed(&mut s.current_lang, lang)
        });
    }

    pub fn set_current_topic(&self, topic: Option<String>) {
        self.update(SessionField::CurrentTopic, |s| {
            replace_if_changed(&mut s.current_topic, topic)
        });
    }

    pub fn set_current_parcel_geocode_parameter(&self, value: Option<String>) {
        self.update(SessionField::ParcelGeocodeParameters, |s| {
            replace_if_changed(&mut s.current_parcel_geocode_parameter, value)
        });
    }

    pub fn set_current_parcel_address(&self, value: Option<String>) {
        self.update(SessionField::ParcelGeocodeParameters, |s| {
            replace_if_changed(&mut s.current_parcel_address, value)
        });
    }

    pub fn set_last_click_coords(&self, coords: Option<(f64, f64)>) {
        self.update(SessionField::LastClickCoords, |s| {
            replace_if_changed(&mut s.last_click_coords, coords)
        });
    }

    /// Null out the current address and all parcel-geocode parameters
    pub fn clear_for_not_found(&self) {
        {
            let mut s = self.state.write();
            s.current_address = None;
            s.current_parcel_geocode_parameter = None;
            s.current_parcel_address = None;
            s.other_parcel_address = None;
            s.other_parcel_geocode_parameter = None;
        }
        let _ = self.event_tx.send(SessionEvent::Cleared);
    }

    /// Claim the fetch-running flag.
    ///
    /// Returns `None` when a cycle is already running. The returned guard
    /// releases the flag when dropped, on every exit path.
    pub fn try_begin_fetch(&self) -> Option<FetchGuard<'_>> {
        {
            let mut s = self.state.write();
            if s.data_fetch_running {
                debug!("fetch already running; refusing new cycle");
                return None;
            }
            s.data_fetch_running = true;
        }
        let _ = self
            .event_tx
            .send(SessionEvent::Changed(SessionField::DataFetchRunning));
        Some(FetchGuard { store: self })
    }

    fn end_fetch(&self) {
        self.state.write().data_fetch_running = false;
        let _ = self
            .event_tx
            .send(SessionEvent::Changed(SessionField::DataFetchRunning));
    }
}

/// Holds `data_fetch_running == true` for as long as it lives
#[must_use = "the fetch flag is released as soon as the guard is dropped"]
pub struct FetchGuard<'a> {
    store: &'a SessionStore,
}

impl Debug for FetchGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchGuard").finish_non_exhaustive()
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.store.end_fetch();
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = SessionStore::new();
        let state = store.snapshot();
        assert_eq!(state.last_search_method, Some(SearchMethod::Address));
        assert!(!state.data_fetch_running);
        assert!(state.current_address.is_none());
    }

    #[test]
    fn test_guard_is_exclusive_and_released_on_drop() {
        let store = SessionStore::new();
        {
            let _guard = store.try_begin_fetch().unwrap();
            assert!(store.is_fetch_running());
            assert!(store.try_begin_fetch().is_none());
        }
        assert!(!store.is_fetch_running());
        assert!(store.try_begin_fetch().is_some());
    }

    #[test]
    fn test_setter_broadcasts_only_on_change() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_current_address(Some("1234 MARKET ST".to_string()));
        store.set_current_address(Some("1234 MARKET ST".to_string()));

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::Changed(SessionField::CurrentAddress)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clear_for_not_found() {
        let store = SessionStore::new();
        store.set_current_address(Some("1234 MARKET ST".to_string()));
        store.set_current_parcel_geocode_parameter(Some("001234000".to_string()));
        store.set_current_lang(Some("es".to_string()));

        store.clear_for_not_found();

        let state = store.snapshot();
        assert!(state.current_address.is_none());
        assert!(state.current_parcel_geocode_parameter.is_none());
        assert_eq!(state.current_lang.as_deref(), Some("es"));
    }
}
