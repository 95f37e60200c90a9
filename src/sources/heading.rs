//! Compass headings and the heading source contract

use crate::prelude::Arc;
use crate::sources::listeners::ListenerId;
use serde::{Deserialize, Serialize};

/// Sensor accuracy status, numbered as the platform reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorAccuracy {
    NoContact = -1,
    Unreliable = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl SensorAccuracy {
    pub fn from_status(status: i32) -> Option<Self> {
        match status {
            -1 => Some(Self::NoContact),
            0 => Some(Self::Unreliable),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn status(self) -> i32 {
        self as i32
    }

    /// Readings reported under this status are discarded.
    pub fn is_unreliable(self) -> bool {
        matches!(self, Self::Unreliable | Self::NoContact)
    }
}

impl Default for SensorAccuracy {
    fn default() -> Self {
        Self::High
    }
}

/// A declination-corrected compass heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Degrees clockwise from true north, in [0, 360)
    pub degrees: f64,
    pub accuracy: SensorAccuracy,
}

impl Heading {
    pub fn new(degrees: f64, accuracy: SensorAccuracy) -> Self {
        Self { degrees, accuracy }
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::new(0.0, SensorAccuracy::default())
    }
}

pub trait HeadingListener: Send + Sync {
    fn on_heading(&self, heading: Heading);

    fn on_accuracy_changed(&self, _accuracy: SensorAccuracy) {}
}

impl<F> HeadingListener for F
where
    F: Fn(Heading) + Send + Sync,
{
    fn on_heading(&self, heading: Heading) {
        self(heading)
    }
}

/// Delivers compass headings on its own cadence, independent of location fixes.
///
/// Implementations start sensing when the first listener registers and stop
/// when the last one leaves.
pub trait HeadingSource: Send + Sync {
    fn add_listener(&self, listener: Arc<dyn HeadingListener>) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;

    fn start(&self);

    fn stop(&self);

    fn last_heading(&self) -> Heading;

    fn last_accuracy(&self) -> SensorAccuracy;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_status_numbers() {
        for accuracy in [
            SensorAccuracy::NoContact,
            SensorAccuracy::Unreliable,
            SensorAccuracy::Low,
            SensorAccuracy::Medium,
            SensorAccuracy::High,
        ] {
            assert_eq!(SensorAccuracy::from_status(accuracy.status()), Some(accuracy));
        }
        assert_eq!(SensorAccuracy::from_status(7), None);
        assert!(SensorAccuracy::Unreliable.is_unreliable());
        assert!(!SensorAccuracy::Low.is_unreliable());
    }
}
