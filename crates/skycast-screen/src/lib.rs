//! The weather screen's view-state coordinator.
//!
//! `ScreenModel` owns the single source of truth consumed by rendering and
//! sequences the asynchronous acquisition paths (permission gate, location
//! fix, weather lookups). Async work completes onto one message channel that
//! the model drains on the foreground loop, so racing operations reconcile
//! by completion order.

pub mod model;
pub mod service;
pub mod view_state;

pub use model::ScreenModel;
pub use service::{CycleOutcome, ScreenServiceMessage};
pub use view_state::{DisplayState, ViewState};
