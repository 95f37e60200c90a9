use crate::core::constants::ENGINE_TILE_SIZE;
use crate::core::geo::{meters_per_pixel, LatLng, Point};
use crate::rendering::camera::CameraPosition;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The visible map area: camera plus screen dimensions.
///
/// Used by the headless engine to answer projection queries the way a real
/// engine would. Tilt is ignored by the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub camera: CameraPosition,
    /// The size of the viewport in pixels
    pub size: Point,
    pub tile_size: f64,
}

impl Viewport {
    pub fn new(camera: CameraPosition, size: Point) -> Self {
        Self {
            camera,
            size,
            tile_size: ENGINE_TILE_SIZE,
        }
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        self.tile_size * 2_f64.powf(self.camera.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (Web Mercator)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = (lat_lng.lng + 180.0) / 360.0;
        let y = (1.0 - ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) / PI) / 2.0;
        Point::new(x * self.scale(), y * self.scale())
    }

    /// Converts a geographical coordinate to screen pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let offset = self
            .project(lat_lng)
            .subtract(&self.project(&self.camera.target));
        // Screen rotates opposite to the camera bearing.
        let (sin, cos) = (-self.camera.bearing).to_radians().sin_cos();
        let rotated = Point::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos);
        rotated.add(&self.size.multiply(0.5))
    }

    /// Meters per screen pixel at `latitude`
    pub fn resolution(&self, latitude: f64) -> f64 {
        meters_per_pixel(latitude, self.camera.zoom, self.tile_size)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(CameraPosition::default(), Point::new(800.0, 600.0))
    }
}
