//! # maplet-location
//!
//! User-location tracking and animation coordination for the maplet map engine.
//!
//! Location fixes and compass headings arrive from independent sources on any
//! thread. The component marshals them onto the frame loop, interpolates
//! position, bearings, accuracy, zoom and tilt, and hands the results to the
//! camera (according to the camera-follow mode) and to the on-screen marker
//! (according to the render mode). A single watchdog timer flags the location
//! as stale when fixes stop arriving.

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod sources;
pub mod tracking;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::LocationComponentBuilder,
    config::{LocationComponentOptions, TrackingProfile},
    geo::{LatLng, Point},
    viewport::Viewport,
};

pub use animation::{AnimationCoordinator, AnimationOutcome, Quantity, TrackedValue};

pub use rendering::{CameraPosition, CameraUpdate, HeadlessEngine, MapEngine};

pub use sources::{CompassEngine, Fix, Heading, HeadingSource, LocationSource, ManualLocationSource};

pub use tracking::{CameraMode, LocationComponent, LocationHandle, RenderMode, StaleWatchdog};

pub use input::CameraGesture;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, LocationError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),
}

/// Error type alias for convenience
pub type Error = LocationError;
