//! Location component builder for fluent API configuration
//!
//! This module provides a LocationComponentBuilder that assembles a component
//! from an engine, a tracking profile, optional sources and a spawner.

use crate::{
    core::config::{LocationComponentOptions, TrackingProfile, TrackingTransition},
    rendering::engine::MapEngine,
    runtime::{default_spawner, AsyncSpawner},
    sources::{
        compass::{CompassEngine, DisplayRotation, SensorAvailability},
        heading::HeadingSource,
        location::LocationSource,
    },
    tracking::{camera::CameraMode, component::LocationComponent, render::RenderMode},
    LocationError, Result,
};
use std::sync::Arc;

/// Builder for creating and configuring LocationComponent instances
pub struct LocationComponentBuilder {
    engine: Option<Box<dyn MapEngine>>,
    /// Tracking configuration
    profile: TrackingProfile,
    spawner: Option<Arc<dyn AsyncSpawner>>,
    location_source: Option<Arc<dyn LocationSource>>,
    heading_source: Option<Arc<dyn HeadingSource>>,
    compass: Option<(SensorAvailability, DisplayRotation)>,
    camera_mode: CameraMode,
    render_mode: RenderMode,
    start: bool,
}

impl LocationComponentBuilder {
    /// Create a new builder with the balanced profile
    pub fn new() -> Self {
        Self {
            engine: None,
            profile: TrackingProfile::default(),
            spawner: None,
            location_source: None,
            heading_source: None,
            compass: None,
            camera_mode: CameraMode::default(),
            render_mode: RenderMode::default(),
            start: false,
        }
    }

    /// Set the rendering engine the component drives. Required.
    pub fn with_engine(mut self, engine: Box<dyn MapEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_profile(mut self, profile: TrackingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set custom options
    pub fn with_options(mut self, options: LocationComponentOptions) -> Self {
        self.profile = TrackingProfile::Custom(options);
        self
    }

    /// Load custom options from JSON
    pub fn with_options_json(self, json: &str) -> Result<Self> {
        let options = LocationComponentOptions::from_json(json)?;
        Ok(self.with_options(options))
    }

    /// Set the spawner the stale timer runs on. Defaults to the current tokio runtime.
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn with_location_source(mut self, source: Arc<dyn LocationSource>) -> Self {
        self.location_source = Some(source);
        self
    }

    /// Use an external heading source. Overrides [`with_compass`](Self::with_compass).
    pub fn with_heading_source(mut self, source: Arc<dyn HeadingSource>) -> Self {
        self.heading_source = Some(source);
        self.compass = None;
        self
    }

    /// Derive headings from the device sensors through a [`CompassEngine`].
    pub fn with_compass(mut self, availability: SensorAvailability, rotation: DisplayRotation) -> Self {
        self.compass = Some((availability, rotation));
        self.heading_source = None;
        self
    }

    pub fn with_camera_mode(mut self, mode: CameraMode) -> Self {
        self.camera_mode = mode;
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Ease into tracking instead of snapping
    pub fn with_eased_tracking_transition(mut self, duration_ms: u64) -> Self {
        let mut options = self.profile.resolve();
        options.camera.tracking_transition = TrackingTransition::Ease { duration_ms };
        self.profile = TrackingProfile::Custom(options);
        self
    }

    /// Turn staleness detection off
    pub fn without_stale_detection(mut self) -> Self {
        let mut options = self.profile.resolve();
        options.stale.enabled = false;
        self.profile = TrackingProfile::Custom(options);
        self
    }

    /// Call `on_start` once the component is built
    pub fn started(mut self) -> Self {
        self.start = true;
        self
    }

    /// Build the component with the configured options
    pub fn build(self) -> Result<LocationComponent> {
        let engine = self
            .engine
            .ok_or(LocationError::MissingDependency("map engine"))?;

        let options = self.profile.resolve();
        options.validate()?;

        let spawner = match self.spawner {
            Some(spawner) => spawner,
            None => default_spawner()?,
        };

        let compass_options = options.compass.clone();
        let mut component = LocationComponent::new(engine, options, spawner)?;

        if let Some(source) = self.location_source {
            component.set_location_source(Some(source));
        }
        if let Some((availability, rotation)) = self.compass {
            let compass = CompassEngine::new(availability, compass_options);
            compass.set_display_rotation(rotation);
            component.set_compass_engine(compass);
        } else if let Some(source) = self.heading_source {
            component.set_heading_source(Some(source));
        }

        component.set_render_mode(self.render_mode);
        component.set_camera_mode(self.camera_mode);

        if self.start {
            component.on_start();
        }

        Ok(component)
    }
}

impl Default for LocationComponentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience presets for common tracking setups
impl LocationComponentBuilder {
    /// Turn-by-turn style: camera follows position and course, GPS puck
    pub fn navigation(engine: Box<dyn MapEngine>) -> Self {
        Self::new()
            .with_engine(engine)
            .with_profile(TrackingProfile::Navigation)
            .with_camera_mode(CameraMode::TrackingGps)
            .with_render_mode(RenderMode::Gps)
    }

    /// Camera follows position and compass, compass marker
    pub fn compass(engine: Box<dyn MapEngine>, availability: SensorAvailability) -> Self {
        Self::new()
            .with_engine(engine)
            .with_compass(availability, DisplayRotation::default())
            .with_camera_mode(CameraMode::TrackingCompass)
            .with_render_mode(RenderMode::Compass)
    }

    /// Marker only, camera left to the user
    pub fn passive(engine: Box<dyn MapEngine>) -> Self {
        Self::new()
            .with_engine(engine)
            .with_profile(TrackingProfile::BatterySaver)
    }
}
