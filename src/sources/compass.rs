//! Compass engine turning raw orientation sensor samples into headings
//!
//! Three sensor setups are supported, in order of preference: a fused
//! rotation-vector sensor, a legacy orientation sensor, and an
//! accelerometer/magnetometer pair whose samples are low-pass filtered before
//! the rotation matrix is derived. The rotation matrix is remapped for the
//! current display rotation so the heading follows the top of the screen.
//!
//! Emitted headings are corrected by the configured magnetic declination,
//! normalized into [0, 360) and rate limited.

use crate::animation::interpolation::normalize_bearing;
use crate::core::config::CompassOptions;
use crate::prelude::{Arc, Duration, Instant};
use crate::sources::heading::{Heading, HeadingListener, HeadingSource, SensorAccuracy};
use crate::sources::listeners::{ListenerId, ListenerSet};
use std::sync::Mutex;

/// Standard gravity, used for free-fall detection
const GRAVITY_EARTH: f32 = 9.80665;
const MIN_MAGNETIC_NORM: f32 = 0.1;

/// Which sensors the device offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorAvailability {
    RotationVector,
    Orientation,
    AccelerometerMagnetometer,
    /// No usable sensor; the engine never emits.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    RotationVector,
    Orientation,
    Accelerometer,
    MagneticField,
}

/// Rotation of the display relative to the device's natural orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
    MinusX,
    MinusZ,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X | Axis::MinusX => 0,
            Axis::Z | Axis::MinusZ => 2,
        }
    }

    fn negated(self) -> bool {
        matches!(self, Axis::MinusX | Axis::MinusZ)
    }
}

impl DisplayRotation {
    /// World axes the device X and Y axes are mapped onto.
    fn remap_axes(self) -> (Axis, Axis) {
        match self {
            DisplayRotation::Rotation0 => (Axis::X, Axis::Z),
            DisplayRotation::Rotation90 => (Axis::Z, Axis::MinusX),
            DisplayRotation::Rotation180 => (Axis::MinusX, Axis::MinusZ),
            DisplayRotation::Rotation270 => (Axis::MinusZ, Axis::X),
        }
    }
}

/// Row-major 3x3 rotation matrix from a unit quaternion rotation vector
/// `[x, y, z, w?]`. A missing `w` is reconstructed.
pub fn rotation_matrix_from_vector(rotation_vector: &[f32]) -> Option<[f32; 9]> {
    if rotation_vector.len() < 3 {
        return None;
    }
    let (q1, q2, q3) = (rotation_vector[0], rotation_vector[1], rotation_vector[2]);
    let q0 = match rotation_vector.get(3) {
        Some(w) => *w,
        None => {
            let w = 1.0 - q1 * q1 - q2 * q2 - q3 * q3;
            if w > 0.0 {
                w.sqrt()
            } else {
                0.0
            }
        }
    };

    let sq_q1 = 2.0 * q1 * q1;
    let sq_q2 = 2.0 * q2 * q2;
    let sq_q3 = 2.0 * q3 * q3;
    let q1_q2 = 2.0 * q1 * q2;
    let q3_q0 = 2.0 * q3 * q0;
    let q1_q3 = 2.0 * q1 * q3;
    let q2_q0 = 2.0 * q2 * q0;
    let q2_q3 = 2.0 * q2 * q3;
    let q1_q0 = 2.0 * q1 * q0;

    Some([
        1.0 - sq_q2 - sq_q3,
        q1_q2 - q3_q0,
        q1_q3 + q2_q0,
        q1_q2 + q3_q0,
        1.0 - sq_q1 - sq_q3,
        q2_q3 - q1_q0,
        q1_q3 - q2_q0,
        q2_q3 + q1_q0,
        1.0 - sq_q1 - sq_q2,
    ])
}

/// Rotation matrix from gravity and geomagnetic field vectors.
///
/// Returns `None` in free fall or when the field is parallel to gravity.
pub fn rotation_matrix_from_gravity(gravity: &[f32; 3], geomagnetic: &[f32; 3]) -> Option<[f32; 9]> {
    let [mut ax, mut ay, mut az] = *gravity;
    let norm_sq_a = ax * ax + ay * ay + az * az;
    let free_fall = GRAVITY_EARTH * GRAVITY_EARTH * 0.01;
    if norm_sq_a < free_fall {
        return None;
    }

    let [ex, ey, ez] = *geomagnetic;
    let mut hx = ey * az - ez * ay;
    let mut hy = ez * ax - ex * az;
    let mut hz = ex * ay - ey * ax;
    let norm_h = (hx * hx + hy * hy + hz * hz).sqrt();
    if norm_h < MIN_MAGNETIC_NORM {
        return None;
    }

    let inv_h = 1.0 / norm_h;
    hx *= inv_h;
    hy *= inv_h;
    hz *= inv_h;
    let inv_a = 1.0 / norm_sq_a.sqrt();
    ax *= inv_a;
    ay *= inv_a;
    az *= inv_a;
    let mx = ay * hz - az * hy;
    let my = az * hx - ax * hz;
    let mz = ax * hy - ay * hx;

    Some([hx, hy, hz, mx, my, mz, ax, ay, az])
}

fn remap_coordinate_system(r: &[f32; 9], x_axis: Axis, y_axis: Axis) -> Option<[f32; 9]> {
    let (x, y) = (x_axis.index(), y_axis.index());
    if x == y {
        return None;
    }
    let z = 3 - x - y;

    // Keep the remapped frame right-handed.
    let axis_y = (z + 1) % 3;
    let axis_z = (z + 2) % 3;
    let sz = x_axis.negated() ^ y_axis.negated() ^ (x != axis_y || y != axis_z);
    let sx = x_axis.negated();
    let sy = y_axis.negated();

    let signed = |value: f32, negate: bool| if negate { -value } else { value };
    let mut out = [0.0f32; 9];
    for row in 0..3 {
        let offset = row * 3;
        out[offset + x] = signed(r[offset], sx);
        out[offset + y] = signed(r[offset + 1], sy);
        out[offset + z] = signed(r[offset + 2], sz);
    }
    Some(out)
}

/// Azimuth in degrees (-180, 180] of `rotation` seen from a display at `display_rotation`.
pub fn azimuth_degrees(rotation: &[f32; 9], display_rotation: DisplayRotation) -> Option<f32> {
    let (x_axis, y_axis) = display_rotation.remap_axes();
    let adjusted = remap_coordinate_system(rotation, x_axis, y_axis)?;
    Some(adjusted[1].atan2(adjusted[4]).to_degrees())
}

fn low_pass(sample: &[f32], previous: Option<[f32; 3]>, alpha: f32) -> Option<[f32; 3]> {
    if sample.len() < 3 {
        return None;
    }
    let sample = [sample[0], sample[1], sample[2]];
    Some(match previous {
        None => sample,
        Some(smoothed) => [
            smoothed[0] + alpha * (sample[0] - smoothed[0]),
            smoothed[1] + alpha * (sample[1] - smoothed[1]),
            smoothed[2] + alpha * (sample[2] - smoothed[2]),
        ],
    })
}

struct CompassState {
    active: bool,
    options: CompassOptions,
    display_rotation: DisplayRotation,
    accuracy: SensorAccuracy,
    last_heading: Heading,
    next_emit_at: Option<Instant>,
    gravity: Option<[f32; 3]>,
    magnetic: Option<[f32; 3]>,
}

impl CompassState {
    fn raw_azimuth(&mut self, kind: SensorKind, values: &[f32]) -> Option<f32> {
        let alpha = self.options.low_pass_alpha;
        match kind {
            SensorKind::RotationVector => {
                // Some devices report more than four components; the first four suffice.
                let len = values.len().min(4);
                let rotation = rotation_matrix_from_vector(&values[..len])?;
                azimuth_degrees(&rotation, self.display_rotation)
            }
            SensorKind::Orientation => values.first().copied(),
            SensorKind::Accelerometer => {
                self.gravity = low_pass(values, self.gravity, alpha);
                self.fused_azimuth()
            }
            SensorKind::MagneticField => {
                self.magnetic = low_pass(values, self.magnetic, alpha);
                self.fused_azimuth()
            }
        }
    }

    fn fused_azimuth(&self) -> Option<f32> {
        let rotation = rotation_matrix_from_gravity(self.gravity.as_ref()?, self.magnetic.as_ref()?)?;
        azimuth_degrees(&rotation, self.display_rotation)
    }
}

struct CompassInner {
    availability: SensorAvailability,
    state: Mutex<CompassState>,
    listeners: ListenerSet<dyn HeadingListener>,
}

/// Heading source backed by device orientation sensors.
///
/// The host forwards raw sensor callbacks to [`CompassEngine::on_sensor_changed`]
/// from whatever thread they arrive on.
#[derive(Clone)]
pub struct CompassEngine {
    inner: Arc<CompassInner>,
}

impl CompassEngine {
    pub fn new(availability: SensorAvailability, options: CompassOptions) -> Self {
        if availability == SensorAvailability::None {
            log::info!("no compass sensor available, headings will not be reported");
        }
        Self {
            inner: Arc::new(CompassInner {
                availability,
                state: Mutex::new(CompassState {
                    active: false,
                    options,
                    display_rotation: DisplayRotation::default(),
                    accuracy: SensorAccuracy::default(),
                    last_heading: Heading::default(),
                    next_emit_at: None,
                    gravity: None,
                    magnetic: None,
                }),
                listeners: ListenerSet::new(),
            }),
        }
    }

    pub fn availability(&self) -> SensorAvailability {
        self.inner.availability
    }

    pub fn is_active(&self) -> bool {
        self.inner
            .state
            .lock()
            .map(|state| state.active)
            .unwrap_or(false)
    }

    pub fn set_options(&self, options: CompassOptions) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.options = options;
        }
    }

    pub fn set_display_rotation(&self, rotation: DisplayRotation) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.display_rotation = rotation;
        }
    }

    /// Feed one raw sensor sample taken at `now`. Returns the heading emitted, if any.
    pub fn on_sensor_changed(&self, kind: SensorKind, values: &[f32], now: Instant) -> Option<Heading> {
        if self.inner.availability == SensorAvailability::None {
            return None;
        }

        let heading = {
            let mut state = self.inner.state.lock().ok()?;
            if !state.active {
                return None;
            }
            if state.accuracy.is_unreliable() {
                log::debug!("compass sensor is unreliable, calibration is needed");
                return None;
            }

            let azimuth = state.raw_azimuth(kind, values)?;
            if !azimuth.is_finite() {
                return None;
            }
            if let Some(next) = state.next_emit_at {
                if now < next {
                    return None;
                }
            }
            state.next_emit_at = Some(now + Duration::from_millis(state.options.update_rate_ms));

            let degrees =
                normalize_bearing(azimuth as f64 + state.options.declination_degrees as f64);
            let heading = Heading::new(degrees, state.accuracy);
            state.last_heading = heading;
            heading
        };

        for listener in self.inner.listeners.snapshot() {
            listener.on_heading(heading);
        }
        Some(heading)
    }

    pub fn on_accuracy_changed(&self, accuracy: SensorAccuracy) {
        let changed = match self.inner.state.lock() {
            Ok(mut state) if state.accuracy != accuracy => {
                state.accuracy = accuracy;
                true
            }
            _ => false,
        };
        if changed {
            log::debug!("compass accuracy changed to {:?}", accuracy);
            for listener in self.inner.listeners.snapshot() {
                listener.on_accuracy_changed(accuracy);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl HeadingSource for CompassEngine {
    fn add_listener(&self, listener: Arc<dyn HeadingListener>) -> ListenerId {
        let (id, first) = self.inner.listeners.add(listener);
        if first {
            self.start();
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let (removed, now_empty) = self.inner.listeners.remove(id);
        if now_empty {
            self.stop();
        }
        removed
    }

    fn start(&self) {
        if self.inner.availability == SensorAvailability::None {
            return;
        }
        if let Ok(mut state) = self.inner.state.lock() {
            if !state.active {
                log::debug!("compass engine started ({:?})", self.inner.availability);
            }
            state.active = true;
        }
    }

    fn stop(&self) {
        if let Ok(mut state) = self.inner.state.lock() {
            if state.active {
                log::debug!("compass engine stopped");
            }
            state.active = false;
            state.next_emit_at = None;
            state.gravity = None;
            state.magnetic = None;
        }
    }

    fn last_heading(&self) -> Heading {
        self.inner
            .state
            .lock()
            .map(|state| state.last_heading)
            .unwrap_or_default()
    }

    fn last_accuracy(&self) -> SensorAccuracy {
        self.inner
            .state
            .lock()
            .map(|state| state.accuracy)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EPS: f64 = 1e-3;

    fn engine(availability: SensorAvailability) -> CompassEngine {
        let engine = CompassEngine::new(availability, CompassOptions::default());
        engine.start();
        engine
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_rotation_vector_heading() {
        let compass = engine(SensorAvailability::RotationVector);
        let now = Instant::now();

        let north = compass
            .on_sensor_changed(SensorKind::RotationVector, &[FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2], now)
            .unwrap();
        assert!(north.degrees.abs() < EPS || (north.degrees - 360.0).abs() < EPS);

        let east = compass
            .on_sensor_changed(SensorKind::RotationVector, &[0.5, -0.5, -0.5, 0.5], now + ms(300))
            .unwrap();
        assert!((east.degrees - 90.0).abs() < EPS, "{}", east.degrees);
    }

    #[test]
    fn test_rotation_vector_without_scalar_part() {
        let full = rotation_matrix_from_vector(&[0.5, -0.5, -0.5, 0.5]).unwrap();
        let reconstructed = rotation_matrix_from_vector(&[0.5, -0.5, -0.5]).unwrap();
        for (a, b) in full.iter().zip(reconstructed.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!(rotation_matrix_from_vector(&[0.5]).is_none());
    }

    #[test]
    fn test_accelerometer_magnetometer_heading() {
        let compass = engine(SensorAvailability::AccelerometerMagnetometer);
        let now = Instant::now();

        assert!(compass
            .on_sensor_changed(SensorKind::Accelerometer, &[0.0, 9.81, 0.0], now)
            .is_none());
        let heading = compass
            .on_sensor_changed(SensorKind::MagneticField, &[0.0, -40.0, -20.0], now)
            .unwrap();
        assert!(heading.degrees.abs() < EPS || (heading.degrees - 360.0).abs() < EPS);
    }

    #[test]
    fn test_free_fall_yields_no_matrix() {
        assert!(rotation_matrix_from_gravity(&[0.0, 0.1, 0.0], &[0.0, -40.0, -20.0]).is_none());
        assert!(rotation_matrix_from_gravity(&[0.0, 9.81, 0.0], &[0.0, 9.81, 0.0]).is_none());
    }

    #[test]
    fn test_low_pass_seeds_with_first_sample() {
        let seeded = low_pass(&[1.0, 2.0, 3.0], None, 0.45).unwrap();
        assert_eq!(seeded, [1.0, 2.0, 3.0]);
        let smoothed = low_pass(&[2.0, 2.0, 3.0], Some(seeded), 0.45).unwrap();
        assert!((smoothed[0] - 1.45).abs() < 1e-6);
        assert!(low_pass(&[1.0], None, 0.45).is_none());
    }

    #[test]
    fn test_declination_and_normalization() {
        let compass = CompassEngine::new(
            SensorAvailability::Orientation,
            CompassOptions {
                declination_degrees: 15.0,
                ..CompassOptions::default()
            },
        );
        compass.start();
        let heading = compass
            .on_sensor_changed(SensorKind::Orientation, &[350.0, 0.0, 0.0], Instant::now())
            .unwrap();
        assert!((heading.degrees - 5.0).abs() < EPS);
    }

    #[test]
    fn test_rate_limited() {
        let compass = engine(SensorAvailability::Orientation);
        let now = Instant::now();
        assert!(compass.on_sensor_changed(SensorKind::Orientation, &[10.0], now).is_some());
        assert!(compass
            .on_sensor_changed(SensorKind::Orientation, &[20.0], now + ms(100))
            .is_none());
        assert!(compass
            .on_sensor_changed(SensorKind::Orientation, &[30.0], now + ms(300))
            .is_some());
        assert!((compass.last_heading().degrees - 30.0).abs() < EPS);
    }

    #[test]
    fn test_unreliable_samples_rejected() {
        let compass = engine(SensorAvailability::Orientation);
        compass.on_accuracy_changed(SensorAccuracy::Unreliable);
        assert_eq!(compass.last_accuracy(), SensorAccuracy::Unreliable);
        assert!(compass
            .on_sensor_changed(SensorKind::Orientation, &[10.0], Instant::now())
            .is_none());

        compass.on_accuracy_changed(SensorAccuracy::Medium);
        let heading = compass
            .on_sensor_changed(SensorKind::Orientation, &[10.0], Instant::now())
            .unwrap();
        assert_eq!(heading.accuracy, SensorAccuracy::Medium);
    }

    #[test]
    fn test_starts_on_first_listener_and_stops_on_last() {
        let compass = CompassEngine::new(SensorAvailability::Orientation, CompassOptions::default());
        assert!(!compass.is_active());
        assert!(compass
            .on_sensor_changed(SensorKind::Orientation, &[10.0], Instant::now())
            .is_none());

        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();
        let id = compass.add_listener(Arc::new(move |_heading: Heading| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(compass.is_active());

        compass.on_sensor_changed(SensorKind::Orientation, &[10.0], Instant::now());
        assert_eq!(received.load(Ordering::SeqCst), 1);

        assert!(compass.remove_listener(id));
        assert!(!compass.is_active());
    }

    #[test]
    fn test_missing_sensor_is_inert() {
        let compass = engine(SensorAvailability::None);
        assert!(!compass.is_active());
        assert!(compass
            .on_sensor_changed(SensorKind::Orientation, &[10.0], Instant::now())
            .is_none());
        assert_eq!(compass.last_heading().degrees, 0.0);
    }
}
