pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

// Re-export the essential types
pub use builder::LocationComponentBuilder;
pub use config::{
    AdaptiveDuration, AnimationOptions, CameraOptions, CompassOptions, FrameTiming,
    LocationComponentOptions, MarkerOptions, StaleOptions, TrackingProfile, TrackingTransition,
};
pub use geo::{LatLng, Point};
pub use viewport::Viewport;
