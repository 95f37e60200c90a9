//! Location fixes and the location source contract

use crate::core::geo::LatLng;
use crate::prelude::Arc;
use crate::sources::listeners::{ListenerId, ListenerSet};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A single reported device position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Course over ground in degrees clockwise from north
    #[serde(default)]
    pub bearing: Option<f64>,
    /// Horizontal accuracy radius in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Milliseconds on the source's clock
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            bearing: None,
            accuracy: None,
            timestamp_ms: 0,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// A fix is usable when its coordinates are in range and its optional
    /// fields, when present, are finite.
    pub fn is_valid(&self) -> bool {
        self.lat_lng().is_valid()
            && self.bearing.map_or(true, f64::is_finite)
            && self.accuracy.map_or(true, |a| a.is_finite() && a >= 0.0)
    }
}

pub trait LocationListener: Send + Sync {
    fn on_fix(&self, fix: &Fix);
}

impl<F> LocationListener for F
where
    F: Fn(&Fix) + Send + Sync,
{
    fn on_fix(&self, fix: &Fix) {
        self(fix)
    }
}

/// Delivers location fixes asynchronously, possibly on any thread
pub trait LocationSource: Send + Sync {
    fn add_listener(&self, listener: Arc<dyn LocationListener>) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Begin delivering fixes to listeners.
    fn request_updates(&self);

    fn remove_updates(&self);

    fn last_known_fix(&self) -> Option<Fix>;
}

/// A source fed by hand, e.g. from a replayed track or a test
#[derive(Default)]
pub struct ManualLocationSource {
    listeners: ListenerSet<dyn LocationListener>,
    last_fix: Mutex<Option<Fix>>,
    updating: AtomicBool,
}

impl ManualLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fix` and deliver it if updates were requested.
    pub fn push(&self, fix: Fix) {
        if !fix.is_valid() {
            log::warn!("dropping invalid fix {:?}", fix);
            return;
        }
        if let Ok(mut last) = self.last_fix.lock() {
            *last = Some(fix);
        }
        if !self.updating.load(Ordering::Acquire) {
            return;
        }
        for listener in self.listeners.snapshot() {
            listener.on_fix(&fix);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }
}

impl LocationSource for ManualLocationSource {
    fn add_listener(&self, listener: Arc<dyn LocationListener>) -> ListenerId {
        self.listeners.add(listener).0
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id).0
    }

    fn request_updates(&self) {
        self.updating.store(true, Ordering::Release);
    }

    fn remove_updates(&self) {
        self.updating.store(false, Ordering::Release);
    }

    fn last_known_fix(&self) -> Option<Fix> {
        self.last_fix.lock().ok().and_then(|last| *last)
    }
}
