use maplet_location::prelude::*;

/// A short walk around the Ferry Building, one fix per second
const TRACK: &[(f64, f64, f64)] = &[
    (37.79550, -122.39360, 45.0),
    (37.79570, -122.39330, 50.0),
    (37.79590, -122.39300, 55.0),
    (37.79600, -122.39270, 80.0),
    (37.79600, -122.39240, 95.0),
    (37.79590, -122.39210, 120.0),
    (37.79570, -122.39195, 160.0),
    (37.79545, -122.39200, 200.0),
    (37.79525, -122.39225, 235.0),
    (37.79515, -122.39260, 265.0),
    (37.79520, -122.39300, 300.0),
    (37.79535, -122.39335, 330.0),
    (37.79550, -122.39360, 355.0),
    (37.79570, -122.39365, 10.0),
];

struct TrackingLogger;

impl OnCameraTrackingChangedListener for TrackingLogger {
    fn on_camera_tracking_dismissed(&self) {
        log::info!("camera tracking dismissed");
    }

    fn on_camera_tracking_changed(&self, mode: CameraMode) {
        log::info!("camera mode is now {:?}", mode);
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let engine = HeadlessEngine::new(Viewport::new(
        CameraPosition::new(LatLng::new(37.7955, -122.3937), 16.0, 0.0, 0.0),
        Point::new(1080.0, 1920.0),
    ));
    let source = Arc::new(ManualLocationSource::new());

    let mut component = LocationComponentBuilder::navigation(Box::new(engine.clone()))
        .with_location_source(source.clone())
        .started()
        .build()?;

    component.add_on_camera_tracking_changed_listener(Arc::new(TrackingLogger));
    component.add_on_location_stale_listener(Arc::new(|stale: bool| {
        log::info!("location stale: {}", stale);
    }));

    let producer = {
        let source = source.clone();
        tokio::spawn(async move {
            for (index, (lat, lng, bearing)) in TRACK.iter().enumerate() {
                source.push(
                    Fix::new(*lat, *lng)
                        .with_bearing(*bearing)
                        .with_accuracy(8.0 + index as f64)
                        .with_timestamp(index as u64 * 1000),
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        })
    };

    let mut frames = tokio::time::interval(component.frame_interval());
    let mut frame_count: u64 = 0;
    let run_for = Duration::from_secs(TRACK.len() as u64 + 2);
    let started = Instant::now();

    loop {
        tokio::select! {
            _ = frames.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupted");
                break;
            }
        }

        component.on_frame(Instant::now());
        frame_count += 1;

        if frame_count % 30 == 0 {
            let camera = component.engine().camera_position();
            let render = component.render_state();
            log::info!(
                "camera ({:.5}, {:.5}) bearing {:.1} zoom {:.1} | marker {:?} bearing {:?} accuracy {:.1}px stale {}",
                camera.target.lat,
                camera.target.lng,
                camera.bearing,
                camera.zoom,
                render.position(),
                render.marker_bearing(),
                render.accuracy_radius_px(),
                render.is_stale(),
            );
        }

        if frame_count == 150 {
            component.zoom_while_tracking(18.0, None, None);
        }
        if frame_count == 300 {
            component.on_camera_gesture(CameraGesture::Move);
        }

        if started.elapsed() >= run_for {
            break;
        }
    }

    producer.abort();
    component.on_stop();
    log::info!("ran {} frames", frame_count);

    Ok(())
}
