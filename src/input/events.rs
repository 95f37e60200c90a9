use serde::{Deserialize, Serialize};

/// A user camera gesture, already classified by the host's gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraGesture {
    /// Panning drag
    Move,
    /// Fling at the end of a pan
    Fling,
    /// Two-finger rotation
    Rotate,
    /// Pinch zoom
    Scale,
    /// Two-finger vertical drag changing tilt
    Shove,
}

impl CameraGesture {
    /// Whether the gesture moves the camera target.
    pub fn moves_target(self) -> bool {
        matches!(self, CameraGesture::Move | CameraGesture::Fling)
    }

    pub fn rotates(self) -> bool {
        matches!(self, CameraGesture::Rotate)
    }
}
