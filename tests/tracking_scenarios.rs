use maplet_location::prelude::*;
use std::sync::Mutex;

/// End-to-end tracking scenarios driven on tokio's paused clock.
///
/// Animations are stepped with explicit `Instant`s while the stale timer runs
/// on tokio time, so both clocks are advanced by hand.
#[cfg(test)]
mod tracking_scenarios {
    use super::*;
    use tokio::time::sleep;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Let spawned timer tasks observe the advanced clock.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn options(stale_timeout_ms: u64) -> LocationComponentOptions {
        let mut options = LocationComponentOptions::default();
        options.stale.timeout_ms = stale_timeout_ms;
        options
    }

    fn component(options: LocationComponentOptions) -> (LocationComponent, HeadlessEngine) {
        let _ = env_logger::builder().is_test(true).try_init();
        let engine = HeadlessEngine::default();
        engine.set_camera(CameraPosition::new(LatLng::new(0.0, 0.0), 15.0, 0.0, 0.0));
        let component = LocationComponentBuilder::new()
            .with_engine(Box::new(engine.clone()))
            .with_options(options)
            .with_spawner(Arc::new(TokioSpawner::current().unwrap()))
            .build()
            .unwrap();
        (component, engine)
    }

    fn bearing_distance(a: f64, b: f64) -> f64 {
        let diff = (a - b).rem_euclid(360.0);
        diff.min(360.0 - diff)
    }

    #[derive(Default)]
    struct TrackingRecorder {
        dismissed: Mutex<usize>,
        modes: Mutex<Vec<CameraMode>>,
    }

    impl OnCameraTrackingChangedListener for TrackingRecorder {
        fn on_camera_tracking_dismissed(&self) {
            *self.dismissed.lock().unwrap() += 1;
        }

        fn on_camera_tracking_changed(&self, mode: CameraMode) {
            self.modes.lock().unwrap().push(mode);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_gps_tracking_wraps_bearing_through_north() {
        let (mut component, engine) = component(options(1000));
        component.set_camera_mode(CameraMode::TrackingGps);
        component.on_start();
        let handle = component.handle();
        let t0 = Instant::now();

        handle.push_fix(
            Fix::new(10.0, 20.0)
                .with_bearing(350.0)
                .with_accuracy(5.0)
                .with_timestamp(0),
        );
        component.on_frame(t0);
        assert_eq!(engine.camera_position().target, LatLng::new(10.0, 20.0));
        assert!((engine.camera_position().bearing - 350.0).abs() < 1e-9);

        sleep(ms(500)).await;
        settle().await;
        handle.push_fix(
            Fix::new(10.0, 20.0)
                .with_bearing(10.0)
                .with_accuracy(5.0)
                .with_timestamp(500),
        );

        let checkpoints = [(750, 355.0), (1000, 0.0), (1500, 10.0)];
        let mut previous = 350.0;
        for step in 0..=20 {
            let offset = 500 + step * 50;
            component.on_frame(t0 + ms(offset));
            let bearing = engine.camera_position().bearing;
            assert!((0.0..360.0).contains(&bearing));
            // Each 50ms step moves 1 degree clockwise, never the long way round.
            assert!(bearing_distance(bearing, previous) <= 1.0 + 1e-9);
            assert!(!component.is_stale());
            for (at, expected) in checkpoints {
                if at == offset {
                    assert!(bearing_distance(bearing, expected) < 1e-6);
                }
            }
            previous = bearing;
        }
        assert!(!component.coordinator().is_animating(Quantity::GpsBearing));

        // The second fix arrived at 500ms on the timer clock.
        sleep(ms(999)).await;
        settle().await;
        assert!(!component.is_stale());
        sleep(ms(1)).await;
        settle().await;
        assert!(component.is_stale());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_marker_follows_watchdog() {
        let (mut component, engine) = component(options(1000));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        component.add_on_location_stale_listener(Arc::new(move |stale: bool| {
            sink.lock().unwrap().push(stale)
        }));
        component.on_start();
        let t0 = Instant::now();

        component.force_location_update(Some(Fix::new(1.0, 1.0).with_accuracy(10.0)));
        component.on_frame(t0);
        let marker = engine.single_marker().unwrap();
        assert_eq!(marker.properties["location-stale"], serde_json::json!(false));
        assert!(marker.is_layer_visible(MarkerLayer::Accuracy));

        sleep(ms(1000)).await;
        settle().await;
        component.on_frame(t0 + ms(1000));

        let marker = engine.single_marker().unwrap();
        assert_eq!(marker.properties["location-stale"], serde_json::json!(true));
        assert!(!marker.is_layer_visible(MarkerLayer::Accuracy));
        assert_eq!(*events.lock().unwrap(), vec![false, true]);

        // A fresh fix reverts immediately.
        component.force_location_update(Some(Fix::new(1.0, 1.0)));
        assert!(!component.is_stale());
        component.on_frame(t0 + ms(1016));
        assert_eq!(*events.lock().unwrap(), vec![false, true, false]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fixes_from_foreign_threads_keep_watchdog_alive() {
        let (mut component, _engine) = component(options(100));
        component.on_start();

        let handle = component.handle();
        let delivered = std::thread::spawn(move || handle.push_fix(Fix::new(10.0, 20.0)))
            .join()
            .unwrap();
        assert!(delivered);
        assert!(!component.is_stale());

        component.on_frame(Instant::now());
        assert_eq!(
            component.last_known_fix().map(|fix| fix.lat_lng()),
            Some(LatLng::new(10.0, 20.0))
        );

        // The timer armed from the foreign thread still fires.
        sleep(ms(400)).await;
        assert!(component.is_stale());

        component.handle().push_fix(Fix::new(10.5, 20.0));
        assert!(!component.is_stale());
        sleep(ms(400)).await;
        assert!(component.is_stale());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_start_cycles_keep_one_timer() {
        let (mut component, _engine) = component(options(1000));
        component.on_start();
        component.force_location_update(Some(Fix::new(1.0, 1.0)));
        for _ in 0..20 {
            component.on_stop();
            component.on_start();
        }
        component.on_stop();

        sleep(ms(10_000)).await;
        settle().await;
        assert!(!component.is_stale());

        component.on_start();
        sleep(ms(999)).await;
        settle().await;
        assert!(!component.is_stale());
        sleep(ms(1)).await;
        settle().await;
        assert!(component.is_stale());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gps_north_pins_camera_but_rotates_marker() {
        let (mut component, engine) = component(options(30_000));
        engine.set_camera(CameraPosition::new(LatLng::new(0.0, 0.0), 15.0, 45.0, 0.0));
        component.set_render_mode(RenderMode::Gps);
        let handle = component.handle();
        let t0 = Instant::now();

        handle.push_fix(Fix::new(5.0, 5.0).with_bearing(90.0));
        component.on_frame(t0);
        component.set_camera_mode(CameraMode::TrackingGpsNorth);
        assert_eq!(engine.camera_position().bearing, 0.0);
        assert_eq!(engine.camera_position().target, LatLng::new(5.0, 5.0));

        let mut marker_bearings = vec![component.render_state().marker_bearing()];
        for (i, bearing) in [180.0, 270.0].into_iter().enumerate() {
            let start = t0 + ms((i as u64 + 1) * 1000);
            handle.push_fix(Fix::new(5.0, 5.0).with_bearing(bearing));
            for step in 0..=4 {
                component.on_frame(start + ms(step * 250));
                assert_eq!(engine.camera_position().bearing, 0.0);
            }
            marker_bearings.push(component.render_state().marker_bearing());
        }

        assert_eq!(marker_bearings, vec![Some(90.0), Some(180.0), Some(270.0)]);
        let marker = engine.single_marker().unwrap();
        assert_eq!(marker.properties["gps-bearing"].as_f64(), Some(270.0));
        assert!(engine.calls().iter().all(|call| match call {
            EngineCall::MoveCamera(update) | EngineCall::EaseCamera(update, _) =>
                update.bearing.map_or(true, |bearing| bearing == 0.0),
            _ => true,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_gestures_dismiss_once() {
        let (mut component, engine) = component(options(30_000));
        let recorder = Arc::new(TrackingRecorder::default());
        component.add_on_camera_tracking_changed_listener(recorder.clone());
        let handle = component.handle();
        let t0 = Instant::now();

        handle.push_fix(Fix::new(3.0, 4.0).with_bearing(30.0));
        component.on_frame(t0);
        component.set_camera_mode(CameraMode::TrackingCompass);
        assert_eq!(engine.camera_position().target, LatLng::new(3.0, 4.0));

        for _ in 0..10 {
            handle.push_gesture(CameraGesture::Move);
        }
        handle.push_gesture(CameraGesture::Fling);
        component.on_frame(t0 + ms(16));

        assert_eq!(component.camera_mode(), CameraMode::NoneCompass);
        assert_eq!(*recorder.dismissed.lock().unwrap(), 1);
        assert_eq!(
            *recorder.modes.lock().unwrap(),
            vec![CameraMode::TrackingCompass, CameraMode::NoneCompass]
        );

        // The user pans; new fixes no longer move the camera.
        engine.set_camera(CameraPosition::new(LatLng::new(-3.0, -4.0), 15.0, 0.0, 0.0));
        handle.push_fix(Fix::new(3.5, 4.5));
        component.on_frame(t0 + ms(500));
        component.on_frame(t0 + ms(1500));
        assert_eq!(engine.camera_position().target, LatLng::new(-3.0, -4.0));
        assert_eq!(component.render_state().position(), Some(LatLng::new(3.5, 4.5)));

        // Re-engaging snaps back to the marker and is reported again.
        component.set_camera_mode(CameraMode::Tracking);
        assert_eq!(engine.camera_position().target, LatLng::new(3.5, 4.5));
        handle.push_gesture(CameraGesture::Scale);
        component.on_frame(t0 + ms(1516));
        assert_eq!(component.camera_mode(), CameraMode::Tracking);
        assert_eq!(*recorder.dismissed.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zoom_while_tracking_callbacks() {
        let (mut component, engine) = component(options(30_000));
        let t0 = Instant::now();
        component.on_frame(t0);

        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let record = |outcomes: &Arc<Mutex<Vec<AnimationOutcome>>>| -> Option<AnimationCallback> {
            let outcomes = outcomes.clone();
            Some(Box::new(move |outcome: AnimationOutcome| outcomes.lock().unwrap().push(outcome)))
        };

        // Rejected without tracking: no state change and no callback.
        assert!(!component.zoom_while_tracking(18.0, None, record(&outcomes)));
        component.on_frame(t0 + ms(1000));
        assert_eq!(engine.camera_position().zoom, 15.0);
        assert!(outcomes.lock().unwrap().is_empty());

        component.set_camera_mode(CameraMode::Tracking);
        assert!(component.zoom_while_tracking(18.0, Some(ms(400)), record(&outcomes)));
        component.on_frame(t0 + ms(1200));
        let partial = engine.camera_position().zoom;
        assert!(partial > 15.0 && partial < 18.0);

        // Superseded from the partial zoom, not from 15.
        assert!(component.zoom_while_tracking(12.0, Some(ms(400)), record(&outcomes)));
        assert_eq!(
            component.coordinator().animation_origin(Quantity::Zoom),
            Some(TrackedValue::Scalar(partial))
        );
        component.on_frame(t0 + ms(1600));
        assert_eq!(engine.camera_position().zoom, 12.0);

        assert!(component.tilt_while_tracking(45.0, None, record(&outcomes)));
        assert!(component.cancel_tilt_while_tracking());
        assert!(!component.cancel_tilt_while_tracking());

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![
                AnimationOutcome::Cancelled,
                AnimationOutcome::Finished,
                AnimationOutcome::Cancelled
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zoom_animation_survives_dismissal() {
        let (mut component, engine) = component(options(30_000));
        let t0 = Instant::now();
        component.on_frame(t0);
        component.set_camera_mode(CameraMode::TrackingGps);
        assert!(component.zoom_while_tracking(17.0, Some(ms(1000)), None));

        component.on_camera_gesture(CameraGesture::Move);
        assert_eq!(component.camera_mode(), CameraMode::NoneGps);
        assert!(component.coordinator().is_animating(Quantity::Zoom));

        component.on_frame(t0 + ms(1000));
        assert_eq!(engine.camera_position().zoom, 17.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_eased_tracking_transition_holds_frames() {
        let mut options = options(30_000);
        options.camera.tracking_transition = TrackingTransition::Ease { duration_ms: 750 };
        let (mut component, engine) = component(options);
        let handle = component.handle();
        let t0 = Instant::now();

        handle.push_fix(Fix::new(2.0, 2.0));
        component.on_frame(t0);
        component.set_camera_mode(CameraMode::Tracking);
        assert!(matches!(
            engine.calls().last(),
            Some(EngineCall::EaseCamera(_, duration)) if *duration == ms(750)
        ));

        handle.push_fix(Fix::new(2.5, 2.0));
        component.on_frame(t0 + ms(100));
        engine.take_calls();
        component.on_frame(t0 + ms(500));
        assert!(engine
            .calls()
            .iter()
            .all(|call| !matches!(call, EngineCall::MoveCamera(_))));

        component.on_frame(t0 + ms(1100));
        assert_eq!(engine.camera_position().target, LatLng::new(2.5, 2.0));
    }
}
