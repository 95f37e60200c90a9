//! Upstream producers: location fixes and compass headings

pub mod compass;
pub mod heading;
pub mod listeners;
pub mod location;

pub use compass::{CompassEngine, DisplayRotation, SensorAvailability, SensorKind};
pub use heading::{Heading, HeadingListener, HeadingSource, SensorAccuracy};
pub use listeners::{ListenerId, ListenerSet};
pub use location::{Fix, LocationListener, LocationSource, ManualLocationSource};
