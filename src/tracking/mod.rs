//! Location tracking: staleness, camera follow, marker state and the component
//! that wires them to the sources and the engine

pub mod camera;
pub mod component;
pub mod events;
pub mod render;
pub mod stale;

pub use camera::{CameraController, CameraMode, CameraModeChange};
pub use component::{LocationComponent, LocationHandle};
pub use events::{
    ComponentEvent, OnCameraTrackingChangedListener, OnLocationClickListener,
    OnLocationLongClickListener, OnLocationStaleListener,
};
pub use render::{RenderMode, RenderState};
pub use stale::{StaleListener, StaleWatchdog};
