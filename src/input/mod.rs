pub mod events;

pub use events::CameraGesture;
