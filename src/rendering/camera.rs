use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Snapshot of the engine camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    /// Geographic center of the viewport
    pub target: LatLng,
    pub zoom: f64,
    /// Degrees clockwise from north, in [0, 360)
    pub bearing: f64,
    /// Degrees away from nadir
    pub tilt: f64,
}

impl CameraPosition {
    pub fn new(target: LatLng, zoom: f64, bearing: f64, tilt: f64) -> Self {
        Self {
            target,
            zoom,
            bearing,
            tilt,
        }
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self::new(LatLng::default(), 0.0, 0.0, 0.0)
    }
}

/// A partial camera change; unset fields are left as they are
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraUpdate {
    pub target: Option<LatLng>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub tilt: Option<f64>,
}

impl CameraUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: LatLng) -> Self {
        self.target = Some(target);
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn tilt(mut self, tilt: f64) -> Self {
        self.tilt = Some(tilt);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.zoom.is_none() && self.bearing.is_none() && self.tilt.is_none()
    }

    /// The camera position that results from applying this update to `position`.
    pub fn apply_to(&self, position: &CameraPosition) -> CameraPosition {
        CameraPosition {
            target: self.target.unwrap_or(position.target),
            zoom: self.zoom.unwrap_or(position.zoom),
            bearing: self.bearing.unwrap_or(position.bearing),
            tilt: self.tilt.unwrap_or(position.tilt),
        }
    }
}
