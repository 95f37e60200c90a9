//! On-screen marker state
//!
//! Consumes the layer-group outputs of the coordinator and keeps the marker
//! feature in the engine up to date: its position, the bearing selected by the
//! render mode, the accuracy circle in pixels, the stale variant and the
//! per-layer visibility.

use crate::animation::coordinator::Quantity;
use crate::animation::interpolation::TrackedValue;
use crate::core::config::MarkerOptions;
use crate::core::constants::{icons, properties, TILT_ICON_OFFSET_FACTOR};
use crate::core::geo::{LatLng, Point};
use crate::rendering::camera::CameraPosition;
use crate::rendering::engine::{FeatureProperties, MapEngine, MarkerLayer};
use crate::rendering::marker::MarkerHandle;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Which bearing, if any, rotates the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RenderMode {
    /// No bearing shown
    #[default]
    Normal,
    /// Marker rotated by the compass heading, bearing arrow visible
    Compass,
    /// Navigation-style puck rotated by the GPS course
    Gps,
}

#[derive(Debug)]
pub struct RenderState {
    mode: RenderMode,
    options: MarkerOptions,
    marker: Option<MarkerHandle>,
    hidden: bool,
    stale: bool,
    position: Option<LatLng>,
    screen_position: Option<Point>,
    gps_bearing: f64,
    compass_bearing: f64,
    accuracy_meters: f64,
    accuracy_pixels: f64,
    zoom: Option<f64>,
    tilt: f64,
    dirty: bool,
}

impl RenderState {
    pub fn new(options: MarkerOptions) -> Self {
        Self {
            mode: RenderMode::default(),
            options,
            marker: None,
            hidden: false,
            stale: true,
            position: None,
            screen_position: None,
            gps_bearing: 0.0,
            compass_bearing: 0.0,
            accuracy_meters: 0.0,
            accuracy_pixels: 0.0,
            zoom: None,
            tilt: 0.0,
            dirty: false,
        }
    }

    /// Create the marker feature. A no-op when it already exists.
    pub fn attach(&mut self, engine: &mut dyn MapEngine) -> Result<()> {
        if self.marker.is_some() {
            return Ok(());
        }
        let position = self.position.unwrap_or_default();
        self.marker = Some(MarkerHandle::create(engine, position)?);
        let camera = engine.camera_position();
        self.zoom = Some(camera.zoom);
        self.tilt = camera.tilt;
        self.apply_visibility(engine);
        self.dirty = true;
        self.flush(engine);
        Ok(())
    }

    /// Release the marker feature.
    pub fn detach(&mut self, engine: &mut dyn MapEngine) {
        if let Some(marker) = self.marker.take() {
            marker.destroy(engine);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.marker.is_some()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_options(&mut self, options: MarkerOptions, engine: &mut dyn MapEngine) {
        self.options = options;
        self.apply_visibility(engine);
        self.dirty = true;
        self.flush(engine);
    }

    /// Switch render mode and re-snap the marker immediately.
    pub fn set_mode(&mut self, mode: RenderMode, engine: &mut dyn MapEngine) {
        if self.mode != mode {
            log::debug!("render mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.refresh_accuracy(engine);
        self.refresh_screen_position(engine);
        self.apply_visibility(engine);
        self.dirty = true;
        self.flush(engine);
    }

    /// Take one interpolated value from the layer consumer group.
    pub fn on_layer_value(&mut self, quantity: Quantity, value: TrackedValue, engine: &mut dyn MapEngine) {
        match (quantity, value) {
            (Quantity::Position, TrackedValue::Coordinate(position)) => {
                self.position = Some(position);
                self.refresh_accuracy(engine);
            }
            (Quantity::GpsBearing, TrackedValue::Scalar(bearing)) => self.gps_bearing = bearing,
            (Quantity::CompassBearing, TrackedValue::Scalar(bearing)) => {
                self.compass_bearing = bearing
            }
            (Quantity::AccuracyRadius, TrackedValue::Scalar(meters)) => {
                self.accuracy_meters = meters;
                self.refresh_accuracy(engine);
            }
            _ => return,
        }
        self.dirty = true;
    }

    pub fn set_stale(&mut self, stale: bool, engine: &mut dyn MapEngine) {
        if self.stale == stale {
            return;
        }
        self.stale = stale;
        if !self.hidden && self.mode != RenderMode::Gps {
            self.set_layer(engine, MarkerLayer::Accuracy, !stale);
        }
        self.dirty = true;
        self.flush(engine);
    }

    /// Track camera changes that alter the marker's screen footprint.
    pub fn on_camera_changed(&mut self, camera: &CameraPosition, engine: &mut dyn MapEngine) {
        if self.zoom != Some(camera.zoom) {
            self.zoom = Some(camera.zoom);
            self.refresh_accuracy(engine);
            self.dirty = true;
        }
        if self.tilt != camera.tilt {
            self.tilt = camera.tilt;
            self.dirty = true;
        }
    }

    pub fn show(&mut self, engine: &mut dyn MapEngine) {
        self.hidden = false;
        self.set_mode(self.mode, engine);
    }

    pub fn hide(&mut self, engine: &mut dyn MapEngine) {
        self.hidden = true;
        if let Some(marker) = &self.marker {
            for layer in MarkerLayer::ALL {
                marker.set_layer_visibility(engine, layer, false);
            }
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn position(&self) -> Option<LatLng> {
        self.position
    }

    pub fn screen_position(&self) -> Option<Point> {
        self.screen_position
    }

    pub fn accuracy_radius_px(&self) -> f64 {
        self.accuracy_pixels
    }

    /// Bearing the marker is rotated by, `None` when the mode shows no bearing.
    pub fn marker_bearing(&self) -> Option<f64> {
        match self.mode {
            RenderMode::Normal => None,
            RenderMode::Compass => Some(self.compass_bearing),
            RenderMode::Gps => Some(self.gps_bearing),
        }
    }

    /// Whether `lat_lng` lands on the visible marker.
    pub fn hit_test(&self, lat_lng: LatLng, engine: &dyn MapEngine) -> bool {
        if self.hidden || self.position.is_none() {
            return false;
        }
        match &self.marker {
            Some(marker) => marker.hit_test(engine, engine.to_screen_location(lat_lng)),
            None => false,
        }
    }

    /// Push pending changes to the marker feature.
    pub fn flush(&mut self, engine: &mut dyn MapEngine) {
        if !self.dirty {
            return;
        }
        self.refresh_screen_position(engine);
        if let (Some(marker), Some(position)) = (&self.marker, self.position) {
            let feature_properties = self.build_properties();
            marker.update(engine, position, &feature_properties);
            self.dirty = false;
        }
    }

    fn refresh_screen_position(&mut self, engine: &dyn MapEngine) {
        self.screen_position = self.position.map(|p| engine.to_screen_location(p));
    }

    fn refresh_accuracy(&mut self, engine: &dyn MapEngine) {
        let latitude = match self.position {
            Some(position) => position.lat,
            None => return,
        };
        let meters_per_pixel = engine.meters_per_pixel_at_latitude(latitude);
        self.accuracy_pixels = if meters_per_pixel > 0.0 && meters_per_pixel.is_finite() {
            self.accuracy_meters / meters_per_pixel
        } else {
            0.0
        };
    }

    fn layer_visible(&self, layer: MarkerLayer) -> bool {
        if self.hidden {
            return false;
        }
        let shadow = self.options.elevation > 0.0;
        match (self.mode, layer) {
            (_, MarkerLayer::Foreground) | (_, MarkerLayer::Background) => true,
            (RenderMode::Gps, _) => false,
            (_, MarkerLayer::Shadow) => shadow,
            (_, MarkerLayer::Accuracy) => !self.stale,
            (RenderMode::Compass, MarkerLayer::Bearing) => true,
            (RenderMode::Normal, MarkerLayer::Bearing) => false,
        }
    }

    fn apply_visibility(&self, engine: &mut dyn MapEngine) {
        for layer in MarkerLayer::ALL {
            self.set_layer(engine, layer, self.layer_visible(layer));
        }
    }

    fn set_layer(&self, engine: &mut dyn MapEngine, layer: MarkerLayer, visible: bool) {
        if let Some(marker) = &self.marker {
            marker.set_layer_visibility(engine, layer, visible);
        }
    }

    fn build_properties(&self) -> FeatureProperties {
        let options = &self.options;
        let icon = |name: &Option<String>, fallback: &str| -> Value {
            Value::String(name.clone().unwrap_or_else(|| fallback.to_string()))
        };
        let foreground = match self.mode {
            RenderMode::Gps => icon(&options.gps_icon, icons::GPS),
            _ => icon(&options.foreground_icon, icons::FOREGROUND),
        };
        let gps_bearing = match self.mode {
            RenderMode::Gps => self.gps_bearing,
            _ => 0.0,
        };
        let compass_bearing = match self.mode {
            RenderMode::Compass => self.compass_bearing,
            _ => 0.0,
        };
        let accuracy = match self.mode {
            RenderMode::Gps => 0.0,
            _ => self.accuracy_pixels,
        };
        let offset = TILT_ICON_OFFSET_FACTOR * self.tilt;

        let mut feature_properties = FeatureProperties::new();
        feature_properties.insert(properties::GPS_BEARING.into(), json!(gps_bearing));
        feature_properties.insert(properties::COMPASS_BEARING.into(), json!(compass_bearing));
        feature_properties.insert(properties::ACCURACY_RADIUS.into(), json!(accuracy));
        feature_properties.insert(properties::ACCURACY_ALPHA.into(), json!(options.accuracy_alpha));
        feature_properties.insert(properties::ACCURACY_COLOR.into(), json!(options.accuracy_color));
        feature_properties.insert(properties::LOCATION_STALE.into(), json!(self.stale));
        feature_properties.insert(properties::FOREGROUND_ICON.into(), foreground);
        feature_properties.insert(
            properties::BACKGROUND_ICON.into(),
            icon(&options.background_icon, icons::BACKGROUND),
        );
        feature_properties.insert(
            properties::FOREGROUND_STALE_ICON.into(),
            icon(&options.foreground_stale_icon, icons::FOREGROUND_STALE),
        );
        feature_properties.insert(
            properties::BACKGROUND_STALE_ICON.into(),
            icon(&options.background_stale_icon, icons::BACKGROUND_STALE),
        );
        feature_properties.insert(
            properties::BEARING_ICON.into(),
            icon(&options.bearing_icon, icons::BEARING),
        );
        feature_properties.insert(properties::FOREGROUND_ICON_OFFSET.into(), json!([0.0, -offset]));
        feature_properties.insert(properties::SHADOW_ICON_OFFSET.into(), json!([0.0, offset]));
        feature_properties
    }
}
