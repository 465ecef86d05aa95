//! Device location-permission gate.

use std::sync::Arc;

use async_trait::async_trait;

use crate::location::LocationSource;
use crate::types::PermissionStatus;

/// Requests location-access authorization.
///
/// Returns `Granted` only on explicit affirmative; rejection, dismissal and
/// OS-level errors are all reported as `Denied`. Implementations must be
/// idempotent - repeated calls are safe and return the current status.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;
}

/// Gate backed by the availability of a positioning backend.
///
/// Desktop targets have no interactive permission dialog; access is
/// considered granted exactly when a positioning backend is present.
pub struct SourcePermissionGate {
    source: Arc<dyn LocationSource>,
}

impl SourcePermissionGate {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PermissionGate for SourcePermissionGate {
    async fn request_permission(&self) -> PermissionStatus {
        if self.source.is_available() {
            tracing::debug!("Location access granted");
            PermissionStatus::Granted
        } else {
            tracing::info!("Location access denied: no positioning backend");
            PermissionStatus::Denied
        }
    }
}
