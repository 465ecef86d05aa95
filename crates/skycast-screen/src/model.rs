//! The view-state coordinator.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use skycast_weather::{LocationResolver, PermissionGate, PermissionStatus, WeatherClient};

use crate::service::{self, CycleOutcome, ScreenServiceMessage};
use crate::view_state::{DisplayState, ViewState};

/// Owns the screen's view-state and sequences the asynchronous acquisition
/// paths. All mutation happens here, on the foreground loop, by applying
/// completion messages in arrival order - so when independent operations
/// race, the last one to complete determines the final state, irrespective
/// of which started first. Superseded in-flight work is never cancelled;
/// its result is simply overwritten when it arrives.
pub struct ScreenModel {
    state: ViewState,
    search: String,
    tx: Sender<ScreenServiceMessage>,
    rx: Receiver<ScreenServiceMessage>,
    runtime: tokio::runtime::Handle,
    gate: Arc<dyn PermissionGate>,
    resolver: Arc<LocationResolver>,
    client: Arc<WeatherClient>,
}

impl ScreenModel {
    pub fn new(
        runtime: tokio::runtime::Handle,
        gate: Arc<dyn PermissionGate>,
        resolver: Arc<LocationResolver>,
        client: Arc<WeatherClient>,
    ) -> Self {
        let (tx, rx) = channel();

        Self {
            state: ViewState::default(),
            search: String::new(),
            tx,
            rx,
            runtime,
            gate,
            resolver,
            client,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn display(&self) -> DisplayState {
        self.state.display()
    }

    /// Current search text, owned here until submitted.
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Mount: start the first resolution cycle.
    pub fn on_mount(&mut self) {
        self.start_cycle();
    }

    /// "Try again" from the permission-denied affordance.
    pub fn on_retry_location(&mut self) {
        self.start_cycle();
    }

    /// Pull-to-refresh. The indicator is cleared as soon as the cycle has
    /// been started, not when it completes - the refresh control's own
    /// spinner covers the gesture itself.
    pub fn on_refresh(&mut self) {
        self.state.is_refreshing = true;
        self.start_cycle();
        self.state.is_refreshing = false;
    }

    pub fn on_search_text_changed(&mut self, text: &str) {
        text.clone_into(&mut self.search);
    }

    /// Submit the current query. The query is cleared before the outcome is
    /// known; it is not retained as history. An empty query is still
    /// submitted - the provider rejects it like any unknown place.
    pub fn on_search_submit(&mut self) {
        let query = std::mem::take(&mut self.search);
        tracing::info!("Searching weather for {:?}", query);
        service::request_search(&self.tx, &self.runtime, self.client.clone(), query);
    }

    /// Drain and apply every pending completion message, in arrival order.
    /// Returns the number of messages applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    fn start_cycle(&self) {
        service::request_resolution_cycle(
            &self.tx,
            &self.runtime,
            self.gate.clone(),
            self.resolver.clone(),
            self.client.clone(),
        );
    }

    fn apply(&mut self, message: ScreenServiceMessage) {
        match message {
            ScreenServiceMessage::PermissionResolved(permission) => {
                self.state.permission = permission;
            }
            ScreenServiceMessage::CycleDone(CycleOutcome::Denied) => {
                // A fix failure lands here too; it displays identically to an
                // explicit refusal.
                self.state.permission = PermissionStatus::Denied;
            }
            ScreenServiceMessage::CycleDone(CycleOutcome::Lookup(result))
            | ScreenServiceMessage::SearchDone(result) => match result {
                Ok(snapshot) => {
                    self.state.snapshot = Some(snapshot);
                    self.state.lookup_found = true;
                }
                Err(_) => {
                    // The previous snapshot is retained; the display layer
                    // shows the not-found message instead of it.
                    self.state.lookup_found = false;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skycast_weather::{
        Coordinates, FixedLocationSource, NotFound, ResolveOptions, SourcePermissionGate,
        WeatherSnapshot,
    };
    use std::time::Duration;

    fn snapshot(region: &str, temperature_c: f64, condition: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            region_name: region.to_string(),
            temperature_c,
            condition_text: condition.to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn model() -> ScreenModel {
        let source = Arc::new(FixedLocationSource::new(Coordinates::new(10.0, 20.0)));
        let gate = Arc::new(SourcePermissionGate::new(source.clone()));
        let resolver = Arc::new(LocationResolver::new(source, ResolveOptions::default()));
        // Points at a closed port; unit tests never await the network.
        let client = Arc::new(
            WeatherClient::new("http://127.0.0.1:9", "test-key", Duration::from_secs(1)).unwrap(),
        );

        ScreenModel::new(tokio::runtime::Handle::current(), gate, resolver, client)
    }

    #[tokio::test]
    async fn mount_denied_scenario() {
        let mut m = model();
        m.apply(ScreenServiceMessage::PermissionResolved(
            PermissionStatus::Denied,
        ));
        m.apply(ScreenServiceMessage::CycleDone(CycleOutcome::Denied));

        assert_eq!(m.state().permission, PermissionStatus::Denied);
        assert!(m.state().snapshot.is_none());
        assert!(m.state().lookup_found);
        assert!(!m.state().is_refreshing);
        assert_eq!(m.display(), DisplayState::LocationDenied);
    }

    #[tokio::test]
    async fn mount_granted_success_scenario() {
        let mut m = model();
        m.apply(ScreenServiceMessage::PermissionResolved(
            PermissionStatus::Granted,
        ));
        m.apply(ScreenServiceMessage::CycleDone(CycleOutcome::Lookup(Ok(
            snapshot("Testland", 21.5, "Clear"),
        ))));

        let state = m.state();
        assert!(state.lookup_found);
        let snap = state.snapshot.as_ref().unwrap();
        assert_eq!(snap.region_name, "Testland");
        assert_eq!(snap.temperature_c, 21.5);
        assert_eq!(snap.condition_text, "Clear");
        assert_eq!(m.display(), DisplayState::Ready);
    }

    #[tokio::test]
    async fn fix_failure_collapses_to_denied() {
        let mut m = model();
        m.apply(ScreenServiceMessage::PermissionResolved(
            PermissionStatus::Granted,
        ));
        m.apply(ScreenServiceMessage::CycleDone(CycleOutcome::Denied));

        assert_eq!(m.state().permission, PermissionStatus::Denied);
        assert_eq!(m.display(), DisplayState::LocationDenied);
    }

    #[tokio::test]
    async fn later_completion_wins_over_earlier_one() {
        // A invoked first, B second; B completes first, A later - so A's
        // outcome must be the final state.
        let mut m = model();
        m.apply(ScreenServiceMessage::SearchDone(Ok(snapshot(
            "EarlyFinisher",
            5.0,
            "Rain",
        ))));
        m.apply(ScreenServiceMessage::CycleDone(CycleOutcome::Lookup(Ok(
            snapshot("LateFinisher", 30.0, "Sunny"),
        ))));

        let snap = m.state().snapshot.as_ref().unwrap();
        assert_eq!(snap.region_name, "LateFinisher");
    }

    #[tokio::test]
    async fn later_failure_supersedes_earlier_success() {
        let mut m = model();
        m.apply(ScreenServiceMessage::SearchDone(Ok(snapshot(
            "Testland", 21.5, "Clear",
        ))));
        m.apply(ScreenServiceMessage::SearchDone(Err(NotFound)));

        let state = m.state();
        assert!(!state.lookup_found);
        // The failure does not destroy the earlier snapshot.
        assert_eq!(
            state.snapshot.as_ref().unwrap().region_name,
            "Testland"
        );
        assert_eq!(m.display(), DisplayState::NotFound);
    }

    #[tokio::test]
    async fn failed_lookup_never_fabricates_a_snapshot() {
        let mut m = model();
        m.apply(ScreenServiceMessage::SearchDone(Err(NotFound)));

        assert!(m.state().snapshot.is_none());
        assert!(!m.state().lookup_found);
    }

    #[tokio::test]
    async fn search_text_is_cleared_on_submit() {
        let mut m = model();
        m.on_search_text_changed("Nowhereland");
        assert_eq!(m.search_text(), "Nowhereland");

        m.on_search_submit();
        assert_eq!(m.search_text(), "", "query must clear before the outcome");
    }

    #[tokio::test]
    async fn refresh_indicator_clears_on_invocation() {
        let mut m = model();
        m.on_refresh();
        assert!(
            !m.state().is_refreshing,
            "indicator is reset as soon as the cycle is started"
        );
    }

    #[tokio::test]
    async fn pump_applies_messages_in_arrival_order() {
        let mut m = model();
        m.tx.send(ScreenServiceMessage::SearchDone(Ok(snapshot(
            "First", 1.0, "Fog",
        ))))
        .unwrap();
        m.tx.send(ScreenServiceMessage::SearchDone(Ok(snapshot(
            "Second", 2.0, "Fog",
        ))))
        .unwrap();

        assert_eq!(m.pump(), 2);
        assert_eq!(
            m.state().snapshot.as_ref().unwrap().region_name,
            "Second"
        );
    }
}
