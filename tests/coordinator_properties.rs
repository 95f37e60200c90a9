use maplet_location::prelude::*;

/// Properties of the animation coordinator that hold for any input order.
#[cfg(test)]
mod coordinator_properties {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        camera: Vec<(Quantity, TrackedValue)>,
    }

    impl AnimationSink for Recorder {
        fn on_camera_value(&mut self, quantity: Quantity, value: TrackedValue, _now: Instant) {
            self.camera.push((quantity, value));
        }

        fn on_layer_value(&mut self, _quantity: Quantity, _value: TrackedValue, _now: Instant) {}
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn scalar(value: TrackedValue) -> f64 {
        value.as_scalar().unwrap()
    }

    fn angular_step(a: f64, b: f64) -> f64 {
        let diff = (b - a).rem_euclid(360.0);
        diff.min(360.0 - diff)
    }

    #[test]
    fn test_bearing_path_never_exceeds_half_turn() {
        let t0 = Instant::now();
        let bearings: Vec<f64> = (0..24).map(|i| i as f64 * 15.0 + 0.5).collect();

        for &a in &bearings {
            for &b in &bearings {
                let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
                let mut recorder = Recorder::default();
                coordinator.feed(
                    Quantity::CompassBearing,
                    TrackedValue::Scalar(a),
                    FeedContext::at(t0),
                );
                coordinator.tick(t0, &mut recorder);
                coordinator.feed(
                    Quantity::CompassBearing,
                    TrackedValue::Scalar(b),
                    FeedContext::at(t0),
                );

                let mut traversed = 0.0;
                let mut previous = a;
                for step in 0..=10 {
                    coordinator.tick(t0 + ms(step * 100), &mut recorder);
                    let value = scalar(recorder.camera.last().unwrap().1);
                    assert!((0.0..360.0).contains(&value));
                    traversed += angular_step(previous, value);
                    previous = value;
                }

                assert!(traversed <= 180.0 + 1e-6, "{} -> {} traversed {}", a, b, traversed);
                assert!(angular_step(previous, b) < 1e-9, "{} -> {} ended at {}", a, b, previous);
            }
        }
    }

    #[test]
    fn test_superseding_feed_starts_from_last_delivered_value() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut recorder = Recorder::default();

        coordinator.feed(Quantity::AccuracyRadius, TrackedValue::Scalar(0.0), FeedContext::at(t0));
        coordinator.tick(t0, &mut recorder);
        coordinator.feed(Quantity::AccuracyRadius, TrackedValue::Scalar(100.0), FeedContext::at(t0));
        coordinator.tick(t0 + ms(300), &mut recorder);

        coordinator.feed(
            Quantity::AccuracyRadius,
            TrackedValue::Scalar(50.0),
            FeedContext::at(t0 + ms(300)),
        );

        assert_eq!(coordinator.active_count(), 1);
        let origin = scalar(coordinator.animation_origin(Quantity::AccuracyRadius).unwrap());
        assert!((origin - 30.0).abs() < 1e-9);
        assert_eq!(coordinator.committed_scalar(Quantity::AccuracyRadius), Some(origin));
    }

    #[test]
    fn test_equal_feed_still_animates() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut recorder = Recorder::default();

        coordinator.feed(Quantity::GpsBearing, TrackedValue::Scalar(42.0), FeedContext::at(t0));
        coordinator.tick(t0 + ms(1000), &mut recorder);
        assert!(!coordinator.is_animating(Quantity::GpsBearing));

        coordinator.feed(Quantity::GpsBearing, TrackedValue::Scalar(42.0), FeedContext::at(t0 + ms(1000)));
        assert!(coordinator.is_animating(Quantity::GpsBearing));
        coordinator.tick(t0 + ms(1500), &mut recorder);
        assert_eq!(recorder.camera.last().unwrap().1, TrackedValue::Scalar(42.0));
    }

    #[test]
    fn test_cancel_all_keeps_committed_values() {
        let t0 = Instant::now();
        let mut coordinator = AnimationCoordinator::new(AnimationOptions::default());
        let mut recorder = Recorder::default();

        coordinator.feed_fix(&Fix::new(1.0, 1.0).with_bearing(10.0), t0);
        coordinator.tick(t0, &mut recorder);
        coordinator.feed_fix(&Fix::new(2.0, 2.0).with_bearing(20.0), t0);
        coordinator.tick(t0 + ms(500), &mut recorder);
        coordinator.cancel_all();
        coordinator.cancel_all();

        assert_eq!(coordinator.active_count(), 0);
        assert_eq!(coordinator.committed_position(), Some(LatLng::new(1.5, 1.5)));
        assert_eq!(coordinator.committed_scalar(Quantity::GpsBearing), Some(15.0));
        assert!(!coordinator.cancel(Quantity::Position));
    }
}
