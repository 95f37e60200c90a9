//! Prelude module for common maplet-location types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_location::prelude::*;`

pub use crate::core::{
    builder::LocationComponentBuilder,
    config::{
        AdaptiveDuration, AnimationOptions, CameraOptions, CompassOptions, FrameTiming,
        LocationComponentOptions, MarkerOptions, StaleOptions, TrackingProfile,
        TrackingTransition,
    },
    geo::{LatLng, Point},
    viewport::Viewport,
};

pub use crate::animation::{
    AnimationCallback, AnimationCoordinator, AnimationOutcome, AnimationSink, ConsumerGroup,
    EasingType, Evaluator, FeedContext, Interpolation, Quantity, TrackedValue,
};

pub use crate::rendering::{
    CameraPosition, CameraUpdate, EngineCall, FeatureProperties, HeadlessEngine, MapEngine,
    MarkerId, MarkerLayer,
};

pub use crate::sources::{
    CompassEngine, DisplayRotation, Fix, Heading, HeadingListener, HeadingSource, ListenerId,
    LocationListener, LocationSource, ManualLocationSource, SensorAccuracy, SensorAvailability,
    SensorKind,
};

pub use crate::tracking::{
    CameraMode, LocationComponent, LocationHandle, OnCameraTrackingChangedListener,
    OnLocationClickListener, OnLocationLongClickListener, OnLocationStaleListener, RenderMode,
    StaleWatchdog,
};

pub use crate::input::CameraGesture;

pub use crate::runtime::{default_spawner, AsyncHandle, AsyncSpawner};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::TokioSpawner;

pub use crate::{Error as LocationError, Result};

pub use std::{
    pin::Pin,
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
