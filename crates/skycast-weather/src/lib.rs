//! Weather data acquisition for Skycast
//!
//! Provides the permission gate, single-shot location resolution, and the
//! current-conditions lookup client. Everything here is one-shot and
//! retry-free; retry policy belongs to the screen coordinator.

pub mod client;
pub mod location;
pub mod permission;
pub mod types;

pub use client::WeatherClient;
pub use location::{
    FixedLocationSource, LocationResolver, LocationSource, PositionFix, ResolveOptions,
    SystemLocationSource,
};
pub use permission::{PermissionGate, SourcePermissionGate};
pub use types::*;
