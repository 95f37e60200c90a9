//! In-memory [`MapEngine`] without any drawing.
//!
//! Keeps a camera and the marker features the way the native engine would and
//! records every call so hosts (the simulator, tests) can inspect what the
//! tracking core asked for. Eases jump straight to their end state.

use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;
use crate::prelude::{Arc, Duration, HashMap};
use crate::rendering::camera::{CameraPosition, CameraUpdate};
use crate::rendering::engine::{FeatureProperties, MapEngine, MarkerId, MarkerLayer};
use crate::Result;
use std::sync::{Mutex, MutexGuard};

/// Radius around the marker center that counts as a hit, in pixels
const MARKER_HIT_RADIUS_PX: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    MoveCamera(CameraUpdate),
    EaseCamera(CameraUpdate, Duration),
    CancelTransitions,
    CreateMarker(MarkerId),
    UpdateMarker(MarkerId),
    SetLayerVisibility(MarkerId, MarkerLayer, bool),
    DestroyMarker(MarkerId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFeature {
    pub lat_lng: LatLng,
    pub properties: FeatureProperties,
    pub visibility: HashMap<MarkerLayer, bool>,
}

impl MarkerFeature {
    pub fn is_layer_visible(&self, layer: MarkerLayer) -> bool {
        self.visibility.get(&layer).copied().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    viewport: Viewport,
    markers: HashMap<MarkerId, MarkerFeature>,
    next_marker: u64,
    calls: Vec<EngineCall>,
}

/// Cheap to clone; clones share the same engine state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                viewport,
                ..HeadlessState::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn viewport(&self) -> Viewport {
        self.state().viewport.clone()
    }

    /// Simulate the user (or anything outside the tracking core) moving the camera.
    pub fn set_camera(&self, camera: CameraPosition) {
        self.state().viewport.camera = camera;
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut self.state().calls)
    }

    pub fn marker(&self, id: MarkerId) -> Option<MarkerFeature> {
        self.state().markers.get(&id).cloned()
    }

    pub fn marker_count(&self) -> usize {
        self.state().markers.len()
    }

    /// The only marker feature, if exactly one exists.
    pub fn single_marker(&self) -> Option<MarkerFeature> {
        let state = self.state();
        match state.markers.len() {
            1 => state.markers.values().next().cloned(),
            _ => None,
        }
    }
}

impl MapEngine for HeadlessEngine {
    fn camera_position(&self) -> CameraPosition {
        self.state().viewport.camera
    }

    fn move_camera(&mut self, update: CameraUpdate) {
        let mut state = self.state();
        state.viewport.camera = update.apply_to(&state.viewport.camera);
        state.calls.push(EngineCall::MoveCamera(update));
    }

    fn ease_camera(&mut self, update: CameraUpdate, duration: Duration) {
        let mut state = self.state();
        state.viewport.camera = update.apply_to(&state.viewport.camera);
        state.calls.push(EngineCall::EaseCamera(update, duration));
    }

    fn cancel_transitions(&mut self) {
        self.state().calls.push(EngineCall::CancelTransitions);
    }

    fn to_screen_location(&self, lat_lng: LatLng) -> Point {
        self.state().viewport.lat_lng_to_pixel(&lat_lng)
    }

    fn meters_per_pixel_at_latitude(&self, latitude: f64) -> f64 {
        self.state().viewport.resolution(latitude)
    }

    fn create_marker(&mut self, lat_lng: LatLng) -> Result<MarkerId> {
        let mut state = self.state();
        state.next_marker += 1;
        let id = MarkerId(state.next_marker);
        state.markers.insert(
            id,
            MarkerFeature {
                lat_lng,
                properties: FeatureProperties::new(),
                visibility: HashMap::default(),
            },
        );
        state.calls.push(EngineCall::CreateMarker(id));
        Ok(id)
    }

    fn update_marker(&mut self, id: MarkerId, lat_lng: LatLng, properties: &FeatureProperties) {
        let mut state = self.state();
        if let Some(marker) = state.markers.get_mut(&id) {
            marker.lat_lng = lat_lng;
            marker.properties = properties.clone();
        }
        state.calls.push(EngineCall::UpdateMarker(id));
    }

    fn set_marker_layer_visibility(&mut self, id: MarkerId, layer: MarkerLayer, visible: bool) {
        let mut state = self.state();
        if let Some(marker) = state.markers.get_mut(&id) {
            marker.visibility.insert(layer, visible);
        }
        state
            .calls
            .push(EngineCall::SetLayerVisibility(id, layer, visible));
    }

    fn destroy_marker(&mut self, id: MarkerId) {
        let mut state = self.state();
        state.markers.remove(&id);
        state.calls.push(EngineCall::DestroyMarker(id));
    }

    fn query_marker_at(&self, id: MarkerId, point: Point, layers: &[MarkerLayer]) -> bool {
        let state = self.state();
        match state.markers.get(&id) {
            Some(marker) if layers.iter().any(|layer| marker.is_layer_visible(*layer)) => {
                let center = state.viewport.lat_lng_to_pixel(&marker.lat_lng);
                center.distance_to(&point) <= MARKER_HIT_RADIUS_PX
            }
            _ => false,
        }
    }
}
