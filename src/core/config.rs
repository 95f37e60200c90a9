//! Configuration system for location tracking behavior
//!
//! This module provides a hierarchical configuration system that allows users
//! to configure the stale timer, the interpolation durations, the compass
//! engine, camera limits and marker styling through presets or custom
//! configurations. Options are serde-serializable so they can be loaded from JSON.

use crate::core::constants::{
    COMPASS_LOW_PASS_ALPHA, COMPASS_UPDATE_RATE_MS, DEFAULT_ANIMATION_DURATION_MS,
    DEFAULT_TRACKING_TILT_DURATION_MS, DEFAULT_TRACKING_ZOOM_DURATION_MS, MAX_ANIMATION_DURATION_MS,
    MAX_TARGET_FPS, MAX_TILT, MAX_ZOOM, MIN_ZOOM, STALE_STATE_TIMEOUT_MS, TRACKING_DURATION_MULTIPLIER,
    TRANSITION_ANIMATION_DURATION_MS,
};
use crate::{LocationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackingProfile {
    Balanced,
    BatterySaver,
    Navigation,
    Custom(LocationComponentOptions),
}

impl TrackingProfile {
    pub fn resolve(&self) -> LocationComponentOptions {
        match self {
            Self::Balanced => LocationComponentOptions {
                stale: StaleOptions {
                    enabled: true,
                    timeout_ms: STALE_STATE_TIMEOUT_MS,
                },
                animation: AnimationOptions::default(),
                compass: CompassOptions::default(),
                camera: CameraOptions::default(),
                marker: MarkerOptions::default(),
                frame: FrameTiming { target_fps: 60 },
            },
            Self::BatterySaver => LocationComponentOptions {
                stale: StaleOptions {
                    enabled: true,
                    timeout_ms: 60_000,
                },
                animation: AnimationOptions {
                    location_duration_ms: 500,
                    bearing_duration_ms: 500,
                    compass_duration_ms: 500,
                    accuracy_duration_ms: 250,
                    adaptive_location: None,
                },
                compass: CompassOptions {
                    update_rate_ms: 1000,
                    ..CompassOptions::default()
                },
                camera: CameraOptions::default(),
                marker: MarkerOptions::default(),
                frame: FrameTiming { target_fps: 30 },
            },
            Self::Navigation => LocationComponentOptions {
                stale: StaleOptions {
                    enabled: true,
                    timeout_ms: 10_000,
                },
                animation: AnimationOptions {
                    adaptive_location: Some(AdaptiveDuration::default()),
                    ..AnimationOptions::default()
                },
                compass: CompassOptions::default(),
                camera: CameraOptions {
                    tracking_transition: TrackingTransition::Ease {
                        duration_ms: TRANSITION_ANIMATION_DURATION_MS,
                    },
                    ..CameraOptions::default()
                },
                marker: MarkerOptions::default(),
                frame: FrameTiming { target_fps: 60 },
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for TrackingProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationComponentOptions {
    pub stale: StaleOptions,
    pub animation: AnimationOptions,
    pub compass: CompassOptions,
    pub camera: CameraOptions,
    pub marker: MarkerOptions,
    pub frame: FrameTiming,
}

impl Default for LocationComponentOptions {
    fn default() -> Self {
        TrackingProfile::default().resolve()
    }
}

impl LocationComponentOptions {
    /// Parse options from JSON. Missing fields fall back to the balanced defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stale.enabled && self.stale.timeout_ms == 0 {
            return Err(LocationError::InvalidOptions(
                "stale.timeout_ms must be positive when staleness detection is enabled".into(),
            ));
        }

        let camera = &self.camera;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&camera.min_zoom)
            || !(MIN_ZOOM..=MAX_ZOOM).contains(&camera.max_zoom)
            || camera.min_zoom > camera.max_zoom
        {
            return Err(LocationError::InvalidOptions(format!(
                "zoom range [{}, {}] must lie within [{}, {}]",
                camera.min_zoom, camera.max_zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if !(0.0..=MAX_TILT).contains(&camera.max_tilt) {
            return Err(LocationError::InvalidOptions(format!(
                "camera.max_tilt {} must lie within [0, {}]",
                camera.max_tilt, MAX_TILT
            )));
        }

        if !(0.0..=1.0).contains(&self.marker.accuracy_alpha) {
            return Err(LocationError::InvalidOptions(
                "marker.accuracy_alpha must lie within [0, 1]".into(),
            ));
        }

        let alpha = self.compass.low_pass_alpha;
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(LocationError::InvalidOptions(
                "compass.low_pass_alpha must lie strictly between 0 and 1".into(),
            ));
        }

        if let Some(adaptive) = &self.animation.adaptive_location {
            if adaptive.multiplier <= 0.0 {
                return Err(LocationError::InvalidOptions(
                    "animation.adaptive_location.multiplier must be positive".into(),
                ));
            }
        }

        if self.frame.target_fps == 0 || self.frame.target_fps > MAX_TARGET_FPS {
            return Err(LocationError::InvalidOptions(format!(
                "frame.target_fps must be in 1..={}",
                MAX_TARGET_FPS
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaleOptions {
    pub enabled: bool,
    pub timeout_ms: u64,
}

impl StaleOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StaleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: STALE_STATE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub location_duration_ms: u64,
    pub bearing_duration_ms: u64,
    pub compass_duration_ms: u64,
    pub accuracy_duration_ms: u64,
    /// When set, location animations last as long as the gap between fixes
    /// (stretched by the multiplier) instead of the fixed duration.
    pub adaptive_location: Option<AdaptiveDuration>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            location_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            bearing_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            compass_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            accuracy_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            adaptive_location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveDuration {
    pub multiplier: f32,
    pub max_duration_ms: u64,
}

impl AdaptiveDuration {
    /// Duration for a fix arriving `since_previous` after the last one.
    pub fn duration_for(&self, since_previous: Duration) -> Duration {
        let stretched = (since_previous.as_millis() as f64 * self.multiplier as f64).round();
        Duration::from_millis(stretched as u64).min(Duration::from_millis(self.max_duration_ms))
    }
}

impl Default for AdaptiveDuration {
    fn default() -> Self {
        Self {
            multiplier: TRACKING_DURATION_MULTIPLIER,
            max_duration_ms: MAX_ANIMATION_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassOptions {
    pub update_rate_ms: u64,
    pub low_pass_alpha: f32,
    /// Added to magnetic headings to obtain true headings.
    pub declination_degrees: f32,
}

impl Default for CompassOptions {
    fn default() -> Self {
        Self {
            update_rate_ms: COMPASS_UPDATE_RATE_MS,
            low_pass_alpha: COMPASS_LOW_PASS_ALPHA,
            declination_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingTransition {
    /// Move the camera to the last known position instantly.
    Snap,
    /// Ease the camera and hold per-frame camera writes until the ease ends.
    Ease { duration_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_tilt: f64,
    pub tracking_transition: TrackingTransition,
    pub default_zoom_duration_ms: u64,
    pub default_tilt_duration_ms: u64,
}

impl CameraOptions {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn clamp_tilt(&self, tilt: f64) -> f64 {
        tilt.clamp(0.0, self.max_tilt)
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            max_tilt: MAX_TILT,
            tracking_transition: TrackingTransition::Snap,
            default_zoom_duration_ms: DEFAULT_TRACKING_ZOOM_DURATION_MS,
            default_tilt_duration_ms: DEFAULT_TRACKING_TILT_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerOptions {
    pub accuracy_alpha: f32,
    pub accuracy_color: String,
    /// Shadow layer is only drawn when elevation is positive.
    pub elevation: f32,
    pub foreground_icon: Option<String>,
    pub background_icon: Option<String>,
    pub foreground_stale_icon: Option<String>,
    pub background_stale_icon: Option<String>,
    pub bearing_icon: Option<String>,
    pub gps_icon: Option<String>,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            accuracy_alpha: 0.15,
            accuracy_color: "rgba(75, 125, 246, 1)".to_string(),
            elevation: 4.0,
            foreground_icon: None,
            background_icon: None,
            foreground_stale_icon: None,
            background_stale_icon: None,
            bearing_icon: None,
            gps_icon: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTiming {
    pub target_fps: u32,
}

impl FrameTiming {
    pub fn frame_interval(&self) -> Duration {
        let fps = self.target_fps.clamp(1, MAX_TARGET_FPS);
        Duration::from_secs_f64(1.0 / fps as f64)
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}
