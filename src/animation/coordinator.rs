//! Per-quantity animation coordination
//!
//! The coordinator owns at most one in-flight [`Interpolation`] per
//! [`Quantity`]. Feeding a new target cancels the running interpolation for
//! that quantity and starts a fresh one from the last delivered (committed)
//! value. Ticks are driven by the frame loop and fan out to the camera and
//! layer consumer groups through an [`AnimationSink`].
//!
//! The coordinator is thread-confined: it is owned by the frame loop and
//! off-thread producers reach it through the component's event channel.

use crate::animation::interpolation::{EasingType, Evaluator, Interpolation, TrackedValue};
use crate::core::config::AnimationOptions;
use crate::core::geo::LatLng;
use crate::prelude::HashMap;
use crate::sources::location::Fix;
use std::fmt;
use std::time::{Duration, Instant};

/// A quantity tracked by the location component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Position,
    GpsBearing,
    CompassBearing,
    AccuracyRadius,
    Zoom,
    Tilt,
}

impl Quantity {
    /// Iteration order used for ticks.
    pub const ALL: [Quantity; 6] = [
        Quantity::Position,
        Quantity::GpsBearing,
        Quantity::CompassBearing,
        Quantity::AccuracyRadius,
        Quantity::Zoom,
        Quantity::Tilt,
    ];

    pub fn evaluator(self) -> Evaluator {
        match self {
            Quantity::Position => Evaluator::Coordinate,
            Quantity::GpsBearing | Quantity::CompassBearing => Evaluator::ShortestArc,
            Quantity::AccuracyRadius | Quantity::Zoom | Quantity::Tilt => Evaluator::Linear,
        }
    }

    pub fn easing(self) -> EasingType {
        match self {
            Quantity::Zoom | Quantity::Tilt => EasingType::EaseInOut,
            _ => EasingType::Linear,
        }
    }

    /// Consumer groups a fresh interpolation of this quantity delivers to.
    pub fn default_groups(self) -> ConsumerGroups {
        match self {
            Quantity::Position | Quantity::GpsBearing | Quantity::CompassBearing => {
                ConsumerGroups::BOTH
            }
            Quantity::AccuracyRadius => ConsumerGroups::LAYER,
            Quantity::Zoom | Quantity::Tilt => ConsumerGroups::CAMERA,
        }
    }
}

/// Listener groups receiving interpolated values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerGroup {
    Camera,
    Layer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerGroups {
    pub camera: bool,
    pub layer: bool,
}

impl ConsumerGroups {
    pub const BOTH: Self = Self {
        camera: true,
        layer: true,
    };
    pub const CAMERA: Self = Self {
        camera: true,
        layer: false,
    };
    pub const LAYER: Self = Self {
        camera: false,
        layer: true,
    };

    pub fn contains(&self, group: ConsumerGroup) -> bool {
        match group {
            ConsumerGroup::Camera => self.camera,
            ConsumerGroup::Layer => self.layer,
        }
    }

    fn remove(&mut self, group: ConsumerGroup) {
        match group {
            ConsumerGroup::Camera => self.camera = false,
            ConsumerGroup::Layer => self.layer = false,
        }
    }

    fn is_empty(&self) -> bool {
        !self.camera && !self.layer
    }
}

/// How an interpolation with a completion callback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Finished,
    Cancelled,
}

pub type AnimationCallback = Box<dyn FnOnce(AnimationOutcome) + Send>;

/// Per-feed parameters
pub struct FeedContext {
    pub now: Instant,
    /// Overrides the quantity's configured duration.
    pub duration: Option<Duration>,
    /// Starting value used when nothing has been committed yet.
    pub seed: Option<TrackedValue>,
    pub on_complete: Option<AnimationCallback>,
}

impl FeedContext {
    pub fn at(now: Instant) -> Self {
        Self {
            now,
            duration: None,
            seed: None,
            on_complete: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_seed(mut self, seed: TrackedValue) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn on_complete(mut self, callback: Option<AnimationCallback>) -> Self {
        self.on_complete = callback;
        self
    }
}

/// Receives interpolated values on every tick
pub trait AnimationSink {
    fn on_camera_value(&mut self, quantity: Quantity, value: TrackedValue, now: Instant);
    fn on_layer_value(&mut self, quantity: Quantity, value: TrackedValue, now: Instant);
}

struct ActiveAnimation {
    interpolation: Interpolation,
    groups: ConsumerGroups,
    on_complete: Option<AnimationCallback>,
}

impl ActiveAnimation {
    fn cancel(mut self) {
        if let Some(callback) = self.on_complete.take() {
            callback(AnimationOutcome::Cancelled);
        }
    }
}

pub struct AnimationCoordinator {
    options: AnimationOptions,
    active: HashMap<Quantity, ActiveAnimation>,
    committed: HashMap<Quantity, TrackedValue>,
    last_fix_at: Option<Instant>,
}

impl AnimationCoordinator {
    pub fn new(options: AnimationOptions) -> Self {
        Self {
            options,
            active: HashMap::default(),
            committed: HashMap::default(),
            last_fix_at: None,
        }
    }

    pub fn set_options(&mut self, options: AnimationOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    fn default_duration(&self, quantity: Quantity) -> Duration {
        let ms = match quantity {
            Quantity::Position => self.options.location_duration_ms,
            Quantity::GpsBearing => self.options.bearing_duration_ms,
            Quantity::CompassBearing => self.options.compass_duration_ms,
            Quantity::AccuracyRadius => self.options.accuracy_duration_ms,
            // Zoom and tilt always come with an explicit duration.
            Quantity::Zoom | Quantity::Tilt => 0,
        };
        Duration::from_millis(ms)
    }

    /// Single entry point for every upstream update.
    ///
    /// Cancels the in-flight interpolation for `quantity` (the committed value
    /// stays at whatever was last delivered) and starts a new one from the
    /// committed value to `value`.
    pub fn feed(&mut self, quantity: Quantity, value: TrackedValue, ctx: FeedContext) {
        if let Some(previous) = self.active.remove(&quantity) {
            previous.cancel();
        }

        let from = self
            .committed
            .get(&quantity)
            .copied()
            .or(ctx.seed)
            .unwrap_or(value);
        let duration = ctx
            .duration
            .unwrap_or_else(|| self.default_duration(quantity));

        let interpolation = Interpolation::new(
            from,
            value,
            ctx.now,
            duration,
            quantity.evaluator(),
            quantity.easing(),
        );
        // Bearings are committed normalized so the next feed unwraps from [0, 360).
        self.committed.entry(quantity).or_insert(interpolation.from());

        log::debug!(
            "animating {:?} from {:?} to {:?} over {:?}",
            quantity,
            interpolation.from(),
            interpolation.target(),
            duration
        );

        self.active.insert(
            quantity,
            ActiveAnimation {
                interpolation,
                groups: quantity.default_groups(),
                on_complete: ctx.on_complete,
            },
        );
    }

    /// Feed position, GPS bearing and accuracy from one fix.
    ///
    /// Absent optional fields leave their quantity untouched.
    pub fn feed_fix(&mut self, fix: &Fix, now: Instant) {
        let location_duration = match &self.options.adaptive_location {
            Some(adaptive) => match self.last_fix_at {
                Some(previous) => adaptive.duration_for(now.saturating_duration_since(previous)),
                None => Duration::ZERO,
            },
            None => self.default_duration(Quantity::Position),
        };
        let bearing_duration = if self.options.adaptive_location.is_some() {
            location_duration
        } else {
            self.default_duration(Quantity::GpsBearing)
        };
        self.last_fix_at = Some(now);

        self.feed(
            Quantity::Position,
            TrackedValue::Coordinate(fix.lat_lng()),
            FeedContext::at(now).with_duration(location_duration),
        );
        if let Some(bearing) = fix.bearing {
            self.feed(
                Quantity::GpsBearing,
                TrackedValue::Scalar(bearing),
                FeedContext::at(now).with_duration(bearing_duration),
            );
        }
        if let Some(accuracy) = fix.accuracy {
            self.feed(
                Quantity::AccuracyRadius,
                TrackedValue::Scalar(accuracy),
                FeedContext::at(now),
            );
        }
    }

    pub fn feed_compass(&mut self, degrees: f64, now: Instant) {
        self.feed(
            Quantity::CompassBearing,
            TrackedValue::Scalar(degrees),
            FeedContext::at(now),
        );
    }

    pub fn feed_zoom(
        &mut self,
        zoom: f64,
        current_zoom: f64,
        duration: Duration,
        now: Instant,
        on_complete: Option<AnimationCallback>,
    ) {
        // Between animations the camera's own zoom is authoritative.
        if !self.is_animating(Quantity::Zoom) {
            self.committed.remove(&Quantity::Zoom);
        }
        self.feed(
            Quantity::Zoom,
            TrackedValue::Scalar(zoom),
            FeedContext::at(now)
                .with_duration(duration)
                .with_seed(TrackedValue::Scalar(current_zoom))
                .on_complete(on_complete),
        );
    }

    pub fn feed_tilt(
        &mut self,
        tilt: f64,
        current_tilt: f64,
        duration: Duration,
        now: Instant,
        on_complete: Option<AnimationCallback>,
    ) {
        // Between animations the camera's own tilt is authoritative.
        if !self.is_animating(Quantity::Tilt) {
            self.committed.remove(&Quantity::Tilt);
        }
        self.feed(
            Quantity::Tilt,
            TrackedValue::Scalar(tilt),
            FeedContext::at(now)
                .with_duration(duration)
                .with_seed(TrackedValue::Scalar(current_tilt))
                .on_complete(on_complete),
        );
    }

    /// Advance every in-flight interpolation to `now` and deliver the values.
    pub fn tick<S: AnimationSink + ?Sized>(&mut self, now: Instant, sink: &mut S) {
        for quantity in Quantity::ALL {
            let (value, groups, finished) = match self.active.get(&quantity) {
                Some(active) => (
                    active.interpolation.value_at(now),
                    active.groups,
                    active.interpolation.is_finished(now),
                ),
                None => continue,
            };

            self.committed.insert(quantity, value);
            if groups.camera {
                sink.on_camera_value(quantity, value, now);
            }
            if groups.layer {
                sink.on_layer_value(quantity, value, now);
            }

            if finished {
                if let Some(mut done) = self.active.remove(&quantity) {
                    if let Some(callback) = done.on_complete.take() {
                        callback(AnimationOutcome::Finished);
                    }
                }
            }
        }
    }

    /// Cancel one interpolation. Returns whether one was in flight.
    pub fn cancel(&mut self, quantity: Quantity) -> bool {
        match self.active.remove(&quantity) {
            Some(active) => {
                active.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every in-flight interpolation; committed values are kept.
    pub fn cancel_all(&mut self) {
        for quantity in Quantity::ALL {
            self.cancel(quantity);
        }
    }

    /// Stop delivering the listed quantities to `group`.
    ///
    /// Interpolations left with no consumer group are cancelled.
    pub fn detach(&mut self, group: ConsumerGroup, quantities: &[Quantity]) {
        for quantity in quantities {
            let now_empty = match self.active.get_mut(quantity) {
                Some(active) => {
                    active.groups.remove(group);
                    active.groups.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.cancel(*quantity);
            }
        }
    }

    /// Resume delivering the listed in-flight quantities to `group`.
    pub fn attach(&mut self, group: ConsumerGroup, quantities: &[Quantity]) {
        for quantity in quantities {
            if let Some(active) = self.active.get_mut(quantity) {
                if quantity.default_groups().contains(group) {
                    match group {
                        ConsumerGroup::Camera => active.groups.camera = true,
                        ConsumerGroup::Layer => active.groups.layer = true,
                    }
                }
            }
        }
    }

    pub fn is_animating(&self, quantity: Quantity) -> bool {
        self.active.contains_key(&quantity)
    }

    pub fn delivers_to(&self, quantity: Quantity, group: ConsumerGroup) -> bool {
        self.active
            .get(&quantity)
            .map(|active| active.groups.contains(group))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn committed(&self, quantity: Quantity) -> Option<TrackedValue> {
        self.committed.get(&quantity).copied()
    }

    pub fn committed_position(&self) -> Option<LatLng> {
        self.committed(Quantity::Position)
            .and_then(|value| value.as_coordinate())
    }

    pub fn committed_scalar(&self, quantity: Quantity) -> Option<f64> {
        self.committed(quantity).and_then(|value| value.as_scalar())
    }

    /// Origin of the in-flight interpolation, if any.
    pub fn animation_origin(&self, quantity: Quantity) -> Option<TrackedValue> {
        self.active
            .get(&quantity)
            .map(|active| active.interpolation.from())
    }

    /// Unwrapped end value of the in-flight interpolation, if any.
    pub fn animation_target(&self, quantity: Quantity) -> Option<TrackedValue> {
        self.active
            .get(&quantity)
            .map(|active| active.interpolation.target())
    }

    /// Drop all animation state, as after a style reload.
    pub fn reset(&mut self) {
        self.cancel_all();
        self.committed.clear();
        self.last_fix_at = None;
    }
}

impl fmt::Debug for AnimationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationCoordinator")
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .field("committed", &self.committed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        camera: Vec<(Quantity, TrackedValue)>,
        layer: Vec<(Quantity, TrackedValue)>,
    }

    impl AnimationSink for RecordingSink {
        fn on_camera_value(&mut self, quantity: Quantity, value: TrackedValue, _now: Instant) {
            self.camera.push((quantity, value));
        }

        fn on_layer_value(&mut self, quantity: Quantity, value: TrackedValue, _now: Instant) {
            self.layer.push((quantity, value));
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn scalar(value: f64) -> TrackedValue {
        TrackedValue::Scalar(value)
    }

    #[test]
    fn test_first_feed_is_degenerate() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        coordinator.feed(Quantity::AccuracyRadius, scalar(5.0), FeedContext::at(t0));

        assert_eq!(coordinator.animation_origin(Quantity::AccuracyRadius), Some(scalar(5.0)));
        assert_eq!(coordinator.committed(Quantity::AccuracyRadius), Some(scalar(5.0)));
    }

    #[test]
    fn test_second_feed_starts_from_last_delivered_value() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        coordinator.feed(Quantity::AccuracyRadius, scalar(0.0), FeedContext::at(t0));
        coordinator.tick(t0 + ms(1000), &mut sink);
        assert!(!coordinator.is_animating(Quantity::AccuracyRadius));

        coordinator.feed(Quantity::AccuracyRadius, scalar(100.0), FeedContext::at(t0 + ms(1000)));
        coordinator.tick(t0 + ms(1250), &mut sink);
        assert_eq!(coordinator.committed(Quantity::AccuracyRadius), Some(scalar(25.0)));

        // Superseded before finishing: restart from 25, not from 0.
        coordinator.feed(Quantity::AccuracyRadius, scalar(50.0), FeedContext::at(t0 + ms(1250)));
        assert_eq!(coordinator.active_count(), 1);
        assert_eq!(coordinator.animation_origin(Quantity::AccuracyRadius), Some(scalar(25.0)));
        assert_eq!(coordinator.animation_target(Quantity::AccuracyRadius), Some(scalar(50.0)));
    }

    #[test]
    fn test_feed_without_tick_keeps_committed_value() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        coordinator.feed(Quantity::AccuracyRadius, scalar(10.0), FeedContext::at(t0));
        coordinator.feed(Quantity::AccuracyRadius, scalar(20.0), FeedContext::at(t0));
        coordinator.feed(Quantity::AccuracyRadius, scalar(30.0), FeedContext::at(t0));

        assert_eq!(coordinator.active_count(), 1);
        assert_eq!(coordinator.animation_origin(Quantity::AccuracyRadius), Some(scalar(10.0)));
    }

    #[test]
    fn test_equal_value_still_starts_interpolation() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();
        coordinator.feed(Quantity::AccuracyRadius, scalar(3.0), FeedContext::at(t0));
        coordinator.tick(t0 + ms(1000), &mut sink);

        coordinator.feed(Quantity::AccuracyRadius, scalar(3.0), FeedContext::at(t0 + ms(1000)));
        assert!(coordinator.is_animating(Quantity::AccuracyRadius));
    }

    #[test]
    fn test_bearing_feed_uses_shortest_arc() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        coordinator.feed(Quantity::GpsBearing, scalar(350.0), FeedContext::at(t0));
        coordinator.tick(t0, &mut sink);
        coordinator.feed(Quantity::GpsBearing, scalar(10.0), FeedContext::at(t0));
        assert_eq!(coordinator.animation_target(Quantity::GpsBearing), Some(scalar(370.0)));

        coordinator.tick(t0 + ms(500), &mut sink);
        let delivered = coordinator.committed_scalar(Quantity::GpsBearing).unwrap();
        assert!(delivered.abs() < 1e-9);

        coordinator.tick(t0 + ms(1000), &mut sink);
        let delivered = coordinator.committed_scalar(Quantity::GpsBearing).unwrap();
        assert!((delivered - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_groups_fan_out() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        coordinator.feed(
            Quantity::Position,
            TrackedValue::Coordinate(LatLng::new(1.0, 2.0)),
            FeedContext::at(t0),
        );
        coordinator.feed(Quantity::AccuracyRadius, scalar(4.0), FeedContext::at(t0));
        coordinator.feed_zoom(15.0, 12.0, ms(750), t0, None);
        coordinator.tick(t0, &mut sink);

        let camera: Vec<_> = sink.camera.iter().map(|(q, _)| *q).collect();
        let layer: Vec<_> = sink.layer.iter().map(|(q, _)| *q).collect();
        assert_eq!(camera, vec![Quantity::Position, Quantity::Zoom]);
        assert_eq!(layer, vec![Quantity::Position, Quantity::AccuracyRadius]);
        // Zoom starts from the seeded camera zoom.
        assert_eq!(sink.camera[1].1, scalar(12.0));
    }

    #[test]
    fn test_feed_fix_skips_absent_fields() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        let fix = Fix::new(10.0, 20.0).with_bearing(90.0).with_accuracy(5.0);
        coordinator.feed_fix(&fix, t0);
        coordinator.tick(t0 + ms(1000), &mut sink);

        coordinator.feed_fix(&Fix::new(11.0, 21.0), t0 + ms(1000));
        assert!(coordinator.is_animating(Quantity::Position));
        assert!(!coordinator.is_animating(Quantity::GpsBearing));
        assert!(!coordinator.is_animating(Quantity::AccuracyRadius));
        assert_eq!(coordinator.committed_scalar(Quantity::GpsBearing), Some(90.0));
        assert_eq!(coordinator.committed_scalar(Quantity::AccuracyRadius), Some(5.0));
    }

    #[test]
    fn test_adaptive_location_duration() {
        let t0 = Instant::now();
        let options = AnimationOptions {
            adaptive_location: Some(Default::default()),
            ..AnimationOptions::default()
        };
        let mut coordinator = AnimationCoordinator::new(options);
        let mut sink = RecordingSink::default();

        coordinator.feed_fix(&Fix::new(0.0, 0.0), t0);
        coordinator.tick(t0, &mut sink);
        assert!(!coordinator.is_animating(Quantity::Position));

        coordinator.feed_fix(&Fix::new(1.0, 0.0), t0 + ms(1000));
        coordinator.tick(t0 + ms(2050), &mut sink);
        assert!(coordinator.is_animating(Quantity::Position));
        coordinator.tick(t0 + ms(2100), &mut sink);
        assert!(!coordinator.is_animating(Quantity::Position));
    }

    #[test]
    fn test_cancel_all_keeps_committed_values() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        coordinator.feed(Quantity::AccuracyRadius, scalar(0.0), FeedContext::at(t0));
        coordinator.tick(t0, &mut sink);
        coordinator.feed(Quantity::AccuracyRadius, scalar(10.0), FeedContext::at(t0));
        coordinator.tick(t0 + ms(500), &mut sink);

        coordinator.cancel_all();
        coordinator.cancel_all();
        assert_eq!(coordinator.active_count(), 0);
        assert_eq!(coordinator.committed(Quantity::AccuracyRadius), Some(scalar(5.0)));
        assert!(!coordinator.cancel(Quantity::AccuracyRadius));
    }

    #[test]
    fn test_detach_camera_keeps_layer_animation() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();

        coordinator.feed(
            Quantity::Position,
            TrackedValue::Coordinate(LatLng::new(1.0, 2.0)),
            FeedContext::at(t0),
        );
        coordinator.feed_zoom(15.0, 12.0, ms(750), t0, None);
        coordinator.detach(ConsumerGroup::Camera, &[Quantity::Position, Quantity::Zoom]);

        // Zoom had only the camera group and is gone; position keeps feeding the layer.
        assert!(!coordinator.is_animating(Quantity::Zoom));
        assert!(coordinator.delivers_to(Quantity::Position, ConsumerGroup::Layer));
        assert!(!coordinator.delivers_to(Quantity::Position, ConsumerGroup::Camera));

        coordinator.tick(t0 + ms(10), &mut sink);
        assert!(sink.camera.is_empty());
        assert_eq!(sink.layer.len(), 1);

        coordinator.attach(ConsumerGroup::Camera, &[Quantity::Position]);
        coordinator.tick(t0 + ms(20), &mut sink);
        assert_eq!(sink.camera.len(), 1);
    }

    #[test]
    fn test_completion_callbacks() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut sink = RecordingSink::default();
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let record = |outcomes: &Arc<Mutex<Vec<AnimationOutcome>>>| -> Option<AnimationCallback> {
            let outcomes = Arc::clone(outcomes);
            Some(Box::new(move |outcome: AnimationOutcome| outcomes.lock().unwrap().push(outcome)))
        };

        coordinator.feed_zoom(14.0, 10.0, ms(100), t0, record(&outcomes));
        coordinator.feed_zoom(16.0, 10.0, ms(100), t0, record(&outcomes));
        coordinator.tick(t0 + ms(100), &mut sink);

        coordinator.feed_tilt(30.0, 0.0, ms(100), t0, record(&outcomes));
        coordinator.cancel(Quantity::Tilt);

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![
                AnimationOutcome::Cancelled,
                AnimationOutcome::Finished,
                AnimationOutcome::Cancelled
            ]
        );
    }
}
