pub mod camera;
pub mod engine;
pub mod headless;
pub mod marker;

// Re-export main types
pub use camera::{CameraPosition, CameraUpdate};
pub use engine::{FeatureProperties, MapEngine, MarkerId, MarkerLayer};
pub use headless::{EngineCall, HeadlessEngine, MarkerFeature};
pub use marker::MarkerHandle;
