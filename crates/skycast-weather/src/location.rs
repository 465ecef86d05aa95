//! Single-shot location resolution.
//!
//! `LocationSource` is the platform geolocation seam; `LocationResolver`
//! turns one source into exactly one resolution attempt per call, applying
//! the accuracy/timeout/staleness options.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

/// A position fix and the instant it was taken.
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    pub coordinates: Coordinates,
    pub taken_at: Instant,
}

impl PositionFix {
    /// A fix taken right now.
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            taken_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.taken_at.elapsed()
    }
}

/// Platform geolocation seam.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Most recent fix the backend already holds, if any.
    async fn last_known(&self) -> Option<PositionFix>;

    /// Request one fresh fix from the backend.
    async fn request_fix(&self, high_accuracy: bool) -> Result<PositionFix, LocationError>;

    /// Whether a positioning backend exists at all.
    fn is_available(&self) -> bool;
}

/// Platform positioning backend.
///
/// No backend is wired on this target; requests report the provider as
/// unavailable.
pub struct SystemLocationSource;

#[async_trait]
impl LocationSource for SystemLocationSource {
    async fn last_known(&self) -> Option<PositionFix> {
        None
    }

    async fn request_fix(&self, _high_accuracy: bool) -> Result<PositionFix, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Coordinates pinned in configuration.
///
/// `last_known` reports the pinned position as of construction, so the
/// resolver's staleness handling applies to it like any cached fix.
pub struct FixedLocationSource {
    coordinates: Coordinates,
    pinned_at: Instant,
}

impl FixedLocationSource {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            pinned_at: Instant::now(),
        }
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    async fn last_known(&self) -> Option<PositionFix> {
        Some(PositionFix {
            coordinates: self.coordinates,
            taken_at: self.pinned_at,
        })
    }

    async fn request_fix(&self, _high_accuracy: bool) -> Result<PositionFix, LocationError> {
        Ok(PositionFix::new(self.coordinates))
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Parameters of one resolution attempt.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Trade latency for GPS precision
    pub high_accuracy: bool,
    /// Abandon and fail if no fix arrives within this window
    pub timeout: Duration,
    /// Accept a cached fix no older than this before forcing a fresh read
    pub max_age: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(15_000),
            max_age: Duration::from_millis(10_000),
        }
    }
}

/// Obtains a single current position fix.
///
/// Guarantees exactly one resolution attempt per `resolve` call and never
/// retries internally - retry policy belongs to the caller. Must only be
/// invoked after the permission gate reported `Granted`.
pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    options: ResolveOptions,
}

impl LocationResolver {
    pub fn new(source: Arc<dyn LocationSource>, options: ResolveOptions) -> Self {
        Self { source, options }
    }

    pub async fn resolve(&self) -> Result<Coordinates, LocationError> {
        if !self.source.is_available() {
            tracing::info!("No positioning backend available");
            return Err(LocationError::ServiceUnavailable);
        }

        // A young enough cached fix short-circuits the fresh read.
        if let Some(fix) = self.source.last_known().await {
            if fix.age() <= self.options.max_age {
                tracing::debug!(
                    "Using cached fix aged {:?}: {}, {}",
                    fix.age(),
                    fix.coordinates.latitude,
                    fix.coordinates.longitude
                );
                return Ok(fix.coordinates);
            }
        }

        match tokio::time::timeout(
            self.options.timeout,
            self.source.request_fix(self.options.high_accuracy),
        )
        .await
        {
            Ok(Ok(fix)) => {
                tracing::debug!(
                    "Got fix: {}, {}",
                    fix.coordinates.latitude,
                    fix.coordinates.longitude
                );
                Ok(fix.coordinates)
            }
            Ok(Err(e)) => {
                tracing::info!("Fix request failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::info!("Fix request timed out after {:?}", self.options.timeout);
                Err(LocationError::Timeout)
            }
        }
    }
}
