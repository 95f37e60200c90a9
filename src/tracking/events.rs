//! Inputs marshaled onto the frame thread and the listeners notified from it

use crate::core::geo::LatLng;
use crate::input::events::CameraGesture;
use crate::sources::heading::{Heading, SensorAccuracy};
use crate::sources::location::Fix;
use crate::tracking::camera::CameraMode;

/// Everything that may arrive off the frame thread.
///
/// Sources, gesture recognizers and the stale timer post these into the
/// component's queue; `LocationComponent::on_frame` drains it before ticking.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    Fix(Fix),
    Heading(Heading),
    HeadingAccuracy(SensorAccuracy),
    Gesture(CameraGesture),
    StaleChanged(bool),
}

pub trait OnCameraTrackingChangedListener: Send + Sync {
    /// Location tracking was left, by a gesture or an explicit mode change.
    fn on_camera_tracking_dismissed(&self);

    /// The camera mode changed. Setting the mode already in effect is silent.
    fn on_camera_tracking_changed(&self, mode: CameraMode);
}

pub trait OnLocationStaleListener: Send + Sync {
    fn on_stale_state_change(&self, is_stale: bool);
}

impl<F> OnLocationStaleListener for F
where
    F: Fn(bool) + Send + Sync,
{
    fn on_stale_state_change(&self, is_stale: bool) {
        self(is_stale)
    }
}

pub trait OnLocationClickListener: Send + Sync {
    fn on_location_click(&self, lat_lng: LatLng);
}

impl<F> OnLocationClickListener for F
where
    F: Fn(LatLng) + Send + Sync,
{
    fn on_location_click(&self, lat_lng: LatLng) {
        self(lat_lng)
    }
}

pub trait OnLocationLongClickListener: Send + Sync {
    fn on_location_long_click(&self, lat_lng: LatLng);
}

impl<F> OnLocationLongClickListener for F
where
    F: Fn(LatLng) + Send + Sync,
{
    fn on_location_long_click(&self, lat_lng: LatLng) {
        self(lat_lng)
    }
}
