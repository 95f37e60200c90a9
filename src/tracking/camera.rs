//! Camera-follow state machine
//!
//! The controller decides which coordinator outputs reach the engine camera.
//! It never produces values itself apart from the one-time snap (or ease) to
//! the last committed position when tracking is engaged.

use crate::animation::coordinator::Quantity;
use crate::animation::interpolation::TrackedValue;
use crate::core::config::{CameraOptions, TrackingTransition};
use crate::core::geo::LatLng;
use crate::input::events::CameraGesture;
use crate::prelude::{Duration, Instant};
use crate::rendering::camera::CameraUpdate;
use crate::rendering::engine::MapEngine;
use serde::{Deserialize, Serialize};

/// Camera-follow policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraMode {
    /// No tracking; the camera is left alone.
    #[default]
    None,
    /// Camera bearing follows the compass.
    NoneCompass,
    /// Camera bearing follows the GPS course.
    NoneGps,
    /// Camera target follows the position.
    Tracking,
    /// Target follows the position, bearing follows the compass.
    TrackingCompass,
    /// Target follows the position, bearing follows the GPS course.
    TrackingGps,
    /// Target follows the position, bearing pinned to north.
    TrackingGpsNorth,
}

impl CameraMode {
    pub fn is_location_tracking(self) -> bool {
        matches!(
            self,
            CameraMode::Tracking
                | CameraMode::TrackingCompass
                | CameraMode::TrackingGps
                | CameraMode::TrackingGpsNorth
        )
    }

    pub fn is_bearing_tracking(self) -> bool {
        matches!(
            self,
            CameraMode::NoneCompass
                | CameraMode::NoneGps
                | CameraMode::TrackingCompass
                | CameraMode::TrackingGps
                | CameraMode::TrackingGpsNorth
        )
    }

    pub fn consumes_compass(self) -> bool {
        matches!(self, CameraMode::TrackingCompass | CameraMode::NoneCompass)
    }

    pub fn consumes_gps_bearing(self) -> bool {
        matches!(self, CameraMode::TrackingGps | CameraMode::NoneGps)
    }

    /// Mode left behind when the user pans away from a tracking mode.
    pub fn dismissed(self) -> CameraMode {
        match self {
            CameraMode::TrackingCompass => CameraMode::NoneCompass,
            CameraMode::TrackingGps => CameraMode::NoneGps,
            CameraMode::Tracking | CameraMode::TrackingGpsNorth => CameraMode::None,
            other => other,
        }
    }
}

/// Result of a camera mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraModeChange {
    pub previous: CameraMode,
    pub current: CameraMode,
    /// Location tracking was left.
    pub dismissed: bool,
    /// Location tracking was entered.
    pub engaged: bool,
}

#[derive(Debug)]
pub struct CameraController {
    mode: CameraMode,
    options: CameraOptions,
    /// Camera writes are held until the entry ease finishes.
    transition_until: Option<Instant>,
}

impl CameraController {
    pub fn new(options: CameraOptions) -> Self {
        Self {
            mode: CameraMode::default(),
            options,
            transition_until: None,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn options(&self) -> &CameraOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CameraOptions) {
        self.options = options;
    }

    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.transition_until.map_or(false, |until| now < until)
    }

    /// Switch modes. On entering location tracking with a known position the
    /// camera jumps (or eases, if configured) to that position first.
    pub fn set_mode(
        &mut self,
        mode: CameraMode,
        last_position: Option<LatLng>,
        last_gps_bearing: Option<f64>,
        engine: &mut dyn MapEngine,
        now: Instant,
    ) -> CameraModeChange {
        let previous = self.mode;
        let was_tracking = previous.is_location_tracking();
        self.mode = mode;

        if mode != CameraMode::None {
            engine.cancel_transitions();
        }

        let engaged = !was_tracking && mode.is_location_tracking();
        let dismissed = was_tracking && !mode.is_location_tracking();

        if dismissed {
            self.transition_until = None;
        }

        if engaged {
            match last_position {
                Some(target) => self.transition_to(target, last_gps_bearing, engine, now),
                None => log::debug!("tracking engaged without a known position"),
            }
        }

        if previous != mode {
            log::debug!("camera mode {:?} -> {:?}", previous, mode);
        }

        CameraModeChange {
            previous,
            current: mode,
            dismissed,
            engaged,
        }
    }

    fn transition_to(
        &mut self,
        target: LatLng,
        gps_bearing: Option<f64>,
        engine: &mut dyn MapEngine,
        now: Instant,
    ) {
        let mut update = CameraUpdate::new().target(target);
        match self.mode {
            CameraMode::TrackingGpsNorth => update = update.bearing(0.0),
            CameraMode::TrackingGps => {
                if let Some(bearing) = gps_bearing {
                    update = update.bearing(bearing);
                }
            }
            _ => {}
        }

        match self.options.tracking_transition {
            TrackingTransition::Snap => {
                self.transition_until = None;
                engine.move_camera(update);
            }
            TrackingTransition::Ease { duration_ms } => {
                let duration = Duration::from_millis(duration_ms);
                self.transition_until = Some(now + duration);
                engine.ease_camera(update, duration);
            }
        }
    }

    /// Mode a user gesture moves the controller to, if it dismisses anything.
    pub fn mode_after_gesture(&self, gesture: CameraGesture) -> Option<CameraMode> {
        if gesture.moves_target() && self.mode.is_location_tracking() {
            Some(self.mode.dismissed())
        } else if gesture.rotates() && self.mode.is_bearing_tracking() {
            Some(CameraMode::None)
        } else {
            None
        }
    }

    /// Apply one interpolated value to the camera. Returns whether the camera moved.
    pub fn apply(
        &mut self,
        quantity: Quantity,
        value: TrackedValue,
        engine: &mut dyn MapEngine,
        now: Instant,
    ) -> bool {
        if self.is_transitioning(now) {
            return false;
        }
        self.transition_until = None;

        let update = match (quantity, value) {
            (Quantity::Position, TrackedValue::Coordinate(target)) => {
                if !self.mode.is_location_tracking() {
                    return false;
                }
                CameraUpdate::new().target(target)
            }
            (Quantity::GpsBearing, TrackedValue::Scalar(bearing)) => {
                if self.mode.consumes_gps_bearing() {
                    CameraUpdate::new().bearing(bearing)
                } else if self.mode == CameraMode::TrackingGpsNorth
                    && engine.camera_position().bearing != 0.0
                {
                    CameraUpdate::new().bearing(0.0)
                } else {
                    return false;
                }
            }
            (Quantity::CompassBearing, TrackedValue::Scalar(bearing)) => {
                if !self.mode.consumes_compass() {
                    return false;
                }
                CameraUpdate::new().bearing(bearing)
            }
            (Quantity::Zoom, TrackedValue::Scalar(zoom)) => CameraUpdate::new().zoom(zoom),
            (Quantity::Tilt, TrackedValue::Scalar(tilt)) => CameraUpdate::new().tilt(tilt),
            _ => return false,
        };

        engine.move_camera(update);
        true
    }
}
