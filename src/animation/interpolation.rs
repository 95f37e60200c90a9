use crate::core::geo::LatLng;
use std::time::{Duration, Instant};

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Interpolatable for LatLng {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        LatLng::new(self.lat.lerp(&other.lat, t), self.lng.lerp(&other.lng, t))
    }
}

/// Easing applied to the normalized progress of an interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingType {
    Linear,
    EaseInOut,
}

impl EasingType {
    /// Apply easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Normalize any bearing into [0, 360).
pub fn normalize_bearing(bearing: f64) -> f64 {
    let wrapped = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Unwrap `target` so that moving from `current` to it never crosses more than 180 degrees.
///
/// Both inputs are expected in [0, 360); the result may fall outside that range
/// and must be normalized again before it is delivered.
pub fn shortest_rotation(target: f64, current: f64) -> f64 {
    let diff = target - current;
    if diff > 180.0 {
        target - 360.0
    } else if diff < -180.0 {
        target + 360.0
    } else {
        target
    }
}

/// A value carried by one tracked quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackedValue {
    Coordinate(LatLng),
    Scalar(f64),
}

impl TrackedValue {
    pub fn as_coordinate(&self) -> Option<LatLng> {
        match self {
            TrackedValue::Coordinate(lat_lng) => Some(*lat_lng),
            TrackedValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            TrackedValue::Scalar(value) => Some(*value),
            TrackedValue::Coordinate(_) => None,
        }
    }
}

/// Strategy used to evaluate an interpolation between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluator {
    /// Plain scalar lerp
    Linear,
    /// Angular lerp along the shorter arc, delivered modulo 360
    ShortestArc,
    /// Component-wise lat/lng lerp
    Coordinate,
}

impl Evaluator {
    /// Compute the end value actually interpolated towards.
    pub fn resolve_target(self, from: TrackedValue, to: TrackedValue) -> TrackedValue {
        match (self, from, to) {
            (Evaluator::ShortestArc, TrackedValue::Scalar(a), TrackedValue::Scalar(b)) => {
                TrackedValue::Scalar(shortest_rotation(normalize_bearing(b), normalize_bearing(a)))
            }
            _ => to,
        }
    }

    pub fn evaluate(self, from: TrackedValue, to: TrackedValue, t: f64) -> TrackedValue {
        match (from, to) {
            (TrackedValue::Coordinate(a), TrackedValue::Coordinate(b)) => {
                TrackedValue::Coordinate(a.lerp(&b, t))
            }
            (TrackedValue::Scalar(a), TrackedValue::Scalar(b)) => {
                let value = a.lerp(&b, t);
                match self {
                    Evaluator::ShortestArc => TrackedValue::Scalar(normalize_bearing(value)),
                    _ => TrackedValue::Scalar(value),
                }
            }
            // Mismatched kinds cannot be blended; jump to the target.
            (_, to) => to,
        }
    }
}

/// One in-flight interpolation from a committed value to a target
#[derive(Debug, Clone)]
pub struct Interpolation {
    from: TrackedValue,
    to: TrackedValue,
    started_at: Instant,
    duration: Duration,
    evaluator: Evaluator,
    easing: EasingType,
}

impl Interpolation {
    pub fn new(
        from: TrackedValue,
        to: TrackedValue,
        started_at: Instant,
        duration: Duration,
        evaluator: Evaluator,
        easing: EasingType,
    ) -> Self {
        let from = match (evaluator, from) {
            (Evaluator::ShortestArc, TrackedValue::Scalar(a)) => {
                TrackedValue::Scalar(normalize_bearing(a))
            }
            _ => from,
        };
        let to = evaluator.resolve_target(from, to);
        Self {
            from,
            to,
            started_at,
            duration,
            evaluator,
            easing,
        }
    }

    pub fn from(&self) -> TrackedValue {
        self.from
    }

    /// The unwrapped end value (bearings may lie outside [0, 360)).
    pub fn target(&self) -> TrackedValue {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress in [0, 1] at `now`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Value delivered at `now`.
    pub fn value_at(&self, now: Instant) -> TrackedValue {
        let t = self.easing.apply(self.progress(now));
        self.evaluator.evaluate(self.from, self.to, t)
    }
}
