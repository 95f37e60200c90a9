//! Boundary to the external rendering engine
//!
//! Everything the tracking core needs from the native map engine goes through
//! [`MapEngine`]: camera moves and eases, screen projection, ground
//! resolution, and the marker's backing geometry feature.

use crate::core::geo::{LatLng, Point};
use crate::rendering::camera::{CameraPosition, CameraUpdate};
use crate::Result;
use serde_json::{Map, Value};
use std::time::Duration;

/// Opaque id of a marker feature inside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Style layers the location marker is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerLayer {
    Shadow,
    Background,
    Foreground,
    Bearing,
    Accuracy,
}

impl MarkerLayer {
    pub const ALL: [MarkerLayer; 5] = [
        MarkerLayer::Shadow,
        MarkerLayer::Background,
        MarkerLayer::Foreground,
        MarkerLayer::Bearing,
        MarkerLayer::Accuracy,
    ];

    /// Layers that respond to clicks on the marker.
    pub const CLICKABLE: [MarkerLayer; 3] = [
        MarkerLayer::Background,
        MarkerLayer::Foreground,
        MarkerLayer::Bearing,
    ];
}

/// Feature properties written onto the marker
pub type FeatureProperties = Map<String, Value>;

pub trait MapEngine: Send {
    fn camera_position(&self) -> CameraPosition;

    /// Apply `update` instantly.
    fn move_camera(&mut self, update: CameraUpdate);

    /// Animate towards `update` over `duration`.
    fn ease_camera(&mut self, update: CameraUpdate, duration: Duration);

    /// Stop any running engine-side camera transition.
    fn cancel_transitions(&mut self);

    fn to_screen_location(&self, lat_lng: LatLng) -> Point;

    /// Ground resolution at `latitude` for the current zoom.
    fn meters_per_pixel_at_latitude(&self, latitude: f64) -> f64;

    fn create_marker(&mut self, lat_lng: LatLng) -> Result<MarkerId>;

    fn update_marker(&mut self, id: MarkerId, lat_lng: LatLng, properties: &FeatureProperties);

    fn set_marker_layer_visibility(&mut self, id: MarkerId, layer: MarkerLayer, visible: bool);

    fn destroy_marker(&mut self, id: MarkerId);

    /// Whether the rendered marker covers `point` on any of `layers`.
    fn query_marker_at(&self, id: MarkerId, point: Point, layers: &[MarkerLayer]) -> bool;
}
