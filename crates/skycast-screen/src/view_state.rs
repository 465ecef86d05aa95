//! The aggregate state exposed to the rendering layer, and the display
//! derivation that turns it into one of four screens.

use skycast_weather::{PermissionStatus, WeatherSnapshot};

/// Single source of truth for the screen. Mutated only by the model, on the
/// foreground loop; rendering has read access.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Latest successful lookup, if any. A failed lookup never fabricates or
    /// destroys a snapshot; it is only ever replaced by a newer success.
    pub snapshot: Option<WeatherSnapshot>,
    /// False after a failed lookup, true after a successful one.
    /// True by default: no lookup has been attempted yet.
    pub lookup_found: bool,
    /// Location-access authorization, as last reported.
    pub permission: PermissionStatus,
    /// Pull-to-refresh indicator.
    pub is_refreshing: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            snapshot: None,
            lookup_found: true,
            permission: PermissionStatus::Unknown,
            is_refreshing: false,
        }
    }
}

/// What the screen should show. Derived from `ViewState` on every read,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    LocationDenied,
    Ready,
    NotFound,
}

impl DisplayState {
    /// Human-readable status line for the non-weather states.
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            DisplayState::LocationDenied => Some("Location permission not provided"),
            DisplayState::NotFound => {
                Some("The country was not found or the api has been disabled")
            }
            DisplayState::Loading | DisplayState::Ready => None,
        }
    }
}

impl ViewState {
    /// Derivation precedence: a denial always wins (weather from a previous
    /// grant must never show behind it), then the first-load spinner, then
    /// the failed-lookup message, then the weather itself.
    pub fn display(&self) -> DisplayState {
        if self.permission == PermissionStatus::Denied {
            DisplayState::LocationDenied
        } else if self.snapshot.is_none() && self.lookup_found {
            DisplayState::Loading
        } else if !self.lookup_found {
            DisplayState::NotFound
        } else {
            DisplayState::Ready
        }
    }
}
