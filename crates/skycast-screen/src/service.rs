//! Screen backend: async resolution cycles and name searches.
//!
//! All I/O runs on spawned tasks; completions are sent over an mpsc channel
//! and applied by the model in arrival order. Nothing here is cancelled:
//! a superseded request still completes and is simply overwritten. Each
//! request carries a sequence number so overlapping requests can be told
//! apart in the logs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_weather::{
    LocationResolver, NotFound, PermissionGate, PermissionStatus, WeatherClient, WeatherSnapshot,
};

/// Outcome of one resolution cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Permission was refused, or no fix could be obtained. The two are
    /// displayed identically.
    Denied,
    /// The cycle reached the coordinate lookup.
    Lookup(Result<WeatherSnapshot, NotFound>),
}

/// Messages sent from async operations back to the screen model.
#[derive(Debug)]
pub enum ScreenServiceMessage {
    /// The permission gate answered for an in-flight cycle.
    PermissionResolved(PermissionStatus),
    /// A resolution cycle ran to completion.
    CycleDone(CycleOutcome),
    /// A name search ran to completion.
    SearchDone(Result<WeatherSnapshot, NotFound>),
}

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> u64 {
    NEXT_REQUEST.fetch_add(1, Ordering::Relaxed)
}

/// Request one full resolution cycle: permission gate, then location fix,
/// then coordinate lookup, strictly in that order within the cycle.
/// Emits `PermissionResolved` as soon as the gate answers, then `CycleDone`.
pub fn request_resolution_cycle(
    tx: &Sender<ScreenServiceMessage>,
    runtime: &tokio::runtime::Handle,
    gate: Arc<dyn PermissionGate>,
    resolver: Arc<LocationResolver>,
    client: Arc<WeatherClient>,
) {
    let tx = tx.clone();
    let request = next_request_id();

    runtime.spawn(async move {
        let permission = gate.request_permission().await;
        tracing::debug!(request, ?permission, "Permission gate answered");
        let _ = tx.send(ScreenServiceMessage::PermissionResolved(permission));

        if permission != PermissionStatus::Granted {
            let _ = tx.send(ScreenServiceMessage::CycleDone(CycleOutcome::Denied));
            return;
        }

        // Granted: the resolver may now run. Its failure collapses into the
        // same outcome as a refusal.
        let coordinates = match resolver.resolve().await {
            Ok(c) => c,
            Err(e) => {
                tracing::info!(request, "Location fix failed: {}", e);
                let _ = tx.send(ScreenServiceMessage::CycleDone(CycleOutcome::Denied));
                return;
            }
        };

        let result = client.lookup_by_coordinates(coordinates).await;
        tracing::debug!(request, found = result.is_ok(), "Resolution cycle finished");
        let _ = tx.send(ScreenServiceMessage::CycleDone(CycleOutcome::Lookup(result)));
    });
}

/// Request a lookup for a free-text place name, independent of any
/// resolution cycle that may be in flight.
pub fn request_search(
    tx: &Sender<ScreenServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<WeatherClient>,
    query: String,
) {
    let tx = tx.clone();
    let request = next_request_id();

    runtime.spawn(async move {
        let result = client.lookup_by_name(&query).await;
        tracing::debug!(request, found = result.is_ok(), "Search finished");
        let _ = tx.send(ScreenServiceMessage::SearchDone(result));
    });
}
