//! The location component
//!
//! Owns the engine boundary and every piece of tracking state. Inputs from
//! sources, gestures and the stale timer may arrive on any thread; they are
//! posted through a [`LocationHandle`] into a single-consumer queue that
//! [`LocationComponent::on_frame`] drains before advancing the animations.

use crate::animation::coordinator::{
    AnimationCallback, AnimationCoordinator, AnimationSink, ConsumerGroup, Quantity,
};
use crate::animation::interpolation::TrackedValue;
use crate::core::config::LocationComponentOptions;
use crate::core::geo::LatLng;
use crate::input::events::CameraGesture;
use crate::prelude::{Arc, Duration, Instant};
use crate::rendering::engine::MapEngine;
use crate::runtime::AsyncSpawner;
use crate::sources::compass::CompassEngine;
use crate::sources::heading::{Heading, HeadingListener, HeadingSource, SensorAccuracy};
use crate::sources::listeners::{ListenerId, ListenerSet};
use crate::sources::location::{Fix, LocationListener, LocationSource};
use crate::tracking::camera::{CameraController, CameraMode};
use crate::tracking::events::{
    ComponentEvent, OnCameraTrackingChangedListener, OnLocationClickListener,
    OnLocationLongClickListener, OnLocationStaleListener,
};
use crate::tracking::render::{RenderMode, RenderState};
use crate::tracking::stale::StaleWatchdog;
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;

/// Posts inputs into a [`LocationComponent`] from any thread.
///
/// Every `push_*` returns `false` when the input was dropped, either because
/// it was invalid or because the component is gone.
#[derive(Debug, Clone)]
pub struct LocationHandle {
    events: Sender<ComponentEvent>,
    watchdog: StaleWatchdog,
}

impl LocationHandle {
    pub fn push_fix(&self, fix: Fix) -> bool {
        if !fix.is_valid() {
            log::warn!("ignoring invalid fix {:?}", fix);
            return false;
        }
        // Staleness is measured from arrival, not from the frame that drains the fix.
        self.watchdog.on_fix_received();
        self.send(ComponentEvent::Fix(fix))
    }

    pub fn push_heading(&self, heading: Heading) -> bool {
        self.send(ComponentEvent::Heading(heading))
    }

    pub fn push_heading_accuracy(&self, accuracy: SensorAccuracy) -> bool {
        self.send(ComponentEvent::HeadingAccuracy(accuracy))
    }

    pub fn push_gesture(&self, gesture: CameraGesture) -> bool {
        self.send(ComponentEvent::Gesture(gesture))
    }

    fn send(&self, event: ComponentEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

struct HeadingForwarder(LocationHandle);

impl HeadingListener for HeadingForwarder {
    fn on_heading(&self, heading: Heading) {
        self.0.push_heading(heading);
    }

    fn on_accuracy_changed(&self, accuracy: SensorAccuracy) {
        self.0.push_heading_accuracy(accuracy);
    }
}

/// Routes one tick's values to the camera and the marker.
struct FrameSink<'a> {
    camera: &'a mut CameraController,
    render: &'a mut RenderState,
    engine: &'a mut dyn MapEngine,
}

impl AnimationSink for FrameSink<'_> {
    fn on_camera_value(&mut self, quantity: Quantity, value: TrackedValue, now: Instant) {
        self.camera.apply(quantity, value, &mut *self.engine, now);
    }

    fn on_layer_value(&mut self, quantity: Quantity, value: TrackedValue, _now: Instant) {
        self.render.on_layer_value(quantity, value, &mut *self.engine);
    }
}

pub struct LocationComponent {
    engine: Box<dyn MapEngine>,
    options: LocationComponentOptions,
    coordinator: AnimationCoordinator,
    camera: CameraController,
    render: RenderState,
    watchdog: StaleWatchdog,
    events: Receiver<ComponentEvent>,
    handle: LocationHandle,
    location_source: Option<(Arc<dyn LocationSource>, ListenerId)>,
    heading_source: Option<Arc<dyn HeadingSource>>,
    heading_subscription: Option<ListenerId>,
    compass: Option<CompassEngine>,
    last_fix: Option<Fix>,
    last_heading: Option<Heading>,
    heading_accuracy: SensorAccuracy,
    last_frame: Option<Instant>,
    started: bool,
    tracking_listeners: ListenerSet<dyn OnCameraTrackingChangedListener>,
    stale_listeners: ListenerSet<dyn OnLocationStaleListener>,
    click_listeners: ListenerSet<dyn OnLocationClickListener>,
    long_click_listeners: ListenerSet<dyn OnLocationLongClickListener>,
}

impl LocationComponent {
    /// Create the component and its marker feature.
    ///
    /// Nothing is tracked until [`on_start`](Self::on_start) is called.
    pub fn new(
        mut engine: Box<dyn MapEngine>,
        options: LocationComponentOptions,
        spawner: Arc<dyn AsyncSpawner>,
    ) -> Result<Self> {
        options.validate()?;

        let (sender, events) = unbounded();
        let watchdog = StaleWatchdog::new(spawner, options.stale.timeout());
        let stale_sender = sender.clone();
        watchdog.set_listener(Some(Arc::new(move |stale: bool| {
            let _ = stale_sender.send(ComponentEvent::StaleChanged(stale));
        })));
        watchdog.set_enabled(options.stale.enabled);

        let mut render = RenderState::new(options.marker.clone());
        render.attach(engine.as_mut())?;
        render.set_stale(watchdog.is_stale(), engine.as_mut());

        log::info!("location component created");

        Ok(Self {
            engine,
            coordinator: AnimationCoordinator::new(options.animation.clone()),
            camera: CameraController::new(options.camera.clone()),
            render,
            handle: LocationHandle {
                events: sender,
                watchdog: watchdog.clone(),
            },
            watchdog,
            events,
            options,
            location_source: None,
            heading_source: None,
            heading_subscription: None,
            compass: None,
            last_fix: None,
            last_heading: None,
            heading_accuracy: SensorAccuracy::default(),
            last_frame: None,
            started: false,
            tracking_listeners: ListenerSet::new(),
            stale_listeners: ListenerSet::new(),
            click_listeners: ListenerSet::new(),
            long_click_listeners: ListenerSet::new(),
        })
    }

    /// A sendable handle for posting fixes, headings and gestures.
    pub fn handle(&self) -> LocationHandle {
        self.handle.clone()
    }

    fn now(&self) -> Instant {
        self.last_frame.unwrap_or_else(Instant::now)
    }

    /// Drain queued inputs, advance every animation to `now` and push the
    /// resulting state to the engine.
    pub fn on_frame(&mut self, now: Instant) {
        self.last_frame = Some(now);

        let pending = self.events.len();
        let events: Vec<ComponentEvent> = self.events.try_iter().take(pending).collect();
        for event in events {
            self.handle_event(event, now);
        }

        let mut sink = FrameSink {
            camera: &mut self.camera,
            render: &mut self.render,
            engine: self.engine.as_mut(),
        };
        self.coordinator.tick(now, &mut sink);

        let camera = self.engine.camera_position();
        self.render.on_camera_changed(&camera, self.engine.as_mut());
        self.render.flush(self.engine.as_mut());
    }

    fn handle_event(&mut self, event: ComponentEvent, now: Instant) {
        match event {
            ComponentEvent::Fix(fix) => {
                self.coordinator.feed_fix(&fix, now);
                self.last_fix = Some(fix);
            }
            ComponentEvent::Heading(heading) => {
                if heading.accuracy.is_unreliable() {
                    log::debug!("dropping heading with {:?} accuracy", heading.accuracy);
                    return;
                }
                self.coordinator.feed_compass(heading.degrees, now);
                self.last_heading = Some(heading);
            }
            ComponentEvent::HeadingAccuracy(accuracy) => {
                if accuracy != self.heading_accuracy {
                    log::debug!("compass accuracy {:?}", accuracy);
                }
                self.heading_accuracy = accuracy;
            }
            ComponentEvent::Gesture(gesture) => self.on_camera_gesture(gesture),
            ComponentEvent::StaleChanged(stale) => {
                if self.render.is_stale() == stale {
                    return;
                }
                self.render.set_stale(stale, self.engine.as_mut());
                for listener in self.stale_listeners.snapshot() {
                    listener.on_stale_state_change(stale);
                }
            }
        }
    }

    // Modes

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        let now = self.now();
        let change = self.camera.set_mode(
            mode,
            self.coordinator.committed_position(),
            self.coordinator.committed_scalar(Quantity::GpsBearing),
            self.engine.as_mut(),
            now,
        );
        self.sync_camera_consumers();

        if change.dismissed {
            log::debug!("camera tracking dismissed");
            for listener in self.tracking_listeners.snapshot() {
                listener.on_camera_tracking_dismissed();
            }
        }
        if change.previous != change.current {
            for listener in self.tracking_listeners.snapshot() {
                listener.on_camera_tracking_changed(change.current);
            }
        }
        self.sync_heading_subscription();
    }

    /// Stop feeding the camera the quantities the current mode ignores.
    fn sync_camera_consumers(&mut self) {
        let mode = self.camera.mode();
        let wiring = [
            (Quantity::Position, mode.is_location_tracking()),
            (
                Quantity::GpsBearing,
                mode.consumes_gps_bearing() || mode == CameraMode::TrackingGpsNorth,
            ),
            (Quantity::CompassBearing, mode.consumes_compass()),
        ];
        for (quantity, wanted) in wiring {
            if wanted {
                self.coordinator.attach(ConsumerGroup::Camera, &[quantity]);
            } else {
                self.coordinator.detach(ConsumerGroup::Camera, &[quantity]);
            }
        }
    }

    /// A user gesture moved the camera.
    pub fn on_camera_gesture(&mut self, gesture: CameraGesture) {
        if let Some(mode) = self.camera.mode_after_gesture(gesture) {
            log::debug!("{:?} gesture leaves {:?}", gesture, self.camera.mode());
            self.set_camera_mode(mode);
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render.mode()
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render.set_mode(mode, self.engine.as_mut());
        self.sync_heading_subscription();
    }

    // Tracking-only camera animations

    /// Animate the camera zoom while a tracking mode is active.
    ///
    /// Rejected with a warning in [`CameraMode::None`] or for a non-finite
    /// zoom. Returns whether the animation was started.
    pub fn zoom_while_tracking(
        &mut self,
        zoom: f64,
        duration: Option<Duration>,
        on_complete: Option<AnimationCallback>,
    ) -> bool {
        if self.camera.mode() == CameraMode::None {
            log::warn!("zoom_while_tracking ignored, camera mode is None");
            return false;
        }
        if !zoom.is_finite() {
            log::warn!("zoom_while_tracking ignored, zoom {} is not finite", zoom);
            return false;
        }
        let options = self.camera.options();
        let zoom = options.clamp_zoom(zoom);
        let duration =
            duration.unwrap_or_else(|| Duration::from_millis(options.default_zoom_duration_ms));
        let current = self.engine.camera_position().zoom;
        let now = self.now();
        self.coordinator
            .feed_zoom(zoom, current, duration, now, on_complete);
        true
    }

    /// Animate the camera tilt while a tracking mode is active.
    pub fn tilt_while_tracking(
        &mut self,
        tilt: f64,
        duration: Option<Duration>,
        on_complete: Option<AnimationCallback>,
    ) -> bool {
        if self.camera.mode() == CameraMode::None {
            log::warn!("tilt_while_tracking ignored, camera mode is None");
            return false;
        }
        if !tilt.is_finite() {
            log::warn!("tilt_while_tracking ignored, tilt {} is not finite", tilt);
            return false;
        }
        let options = self.camera.options();
        let tilt = options.clamp_tilt(tilt);
        let duration =
            duration.unwrap_or_else(|| Duration::from_millis(options.default_tilt_duration_ms));
        let current = self.engine.camera_position().tilt;
        let now = self.now();
        self.coordinator
            .feed_tilt(tilt, current, duration, now, on_complete);
        true
    }

    pub fn cancel_zoom_while_tracking(&mut self) -> bool {
        self.coordinator.cancel(Quantity::Zoom)
    }

    pub fn cancel_tilt_while_tracking(&mut self) -> bool {
        self.coordinator.cancel(Quantity::Tilt)
    }

    // Sources

    /// Feed a fix by hand. `None` is ignored.
    pub fn force_location_update(&mut self, fix: Option<Fix>) {
        match fix {
            Some(fix) => {
                self.handle.push_fix(fix);
            }
            None => log::debug!("ignoring empty location update"),
        }
    }

    /// Replace the location source. `None` leaves only manual updates.
    pub fn set_location_source(&mut self, source: Option<Arc<dyn LocationSource>>) {
        if let Some((previous, id)) = self.location_source.take() {
            previous.remove_listener(id);
            if self.started {
                previous.remove_updates();
            }
        }

        let source = match source {
            Some(source) => source,
            None => {
                log::info!("no location source, updates are manual");
                return;
            }
        };

        let handle = self.handle.clone();
        let listener: Arc<dyn LocationListener> = Arc::new(move |fix: &Fix| {
            handle.push_fix(*fix);
        });
        let id = source.add_listener(listener);
        if self.started {
            source.request_updates();
        }
        if let Some(fix) = source.last_known_fix() {
            self.handle.push_fix(fix);
        }
        self.location_source = Some((source, id));
    }

    /// Replace the heading source. The component subscribes only while a
    /// mode needs compass headings.
    pub fn set_heading_source(&mut self, source: Option<Arc<dyn HeadingSource>>) {
        self.unsubscribe_heading();
        self.compass = None;
        self.heading_source = source;
        self.sync_heading_subscription();
    }

    /// Use `compass` as heading source and keep it in step with the options.
    pub fn set_compass_engine(&mut self, compass: CompassEngine) {
        compass.set_options(self.options.compass.clone());
        self.set_heading_source(Some(Arc::new(compass.clone())));
        self.compass = Some(compass);
    }

    pub fn compass_engine(&self) -> Option<&CompassEngine> {
        self.compass.as_ref()
    }

    fn wants_heading(&self) -> bool {
        self.started
            && (self.render.mode() == RenderMode::Compass || self.camera.mode().consumes_compass())
    }

    fn sync_heading_subscription(&mut self) {
        let source = match &self.heading_source {
            Some(source) => Arc::clone(source),
            None => return,
        };
        match (self.wants_heading(), self.heading_subscription) {
            (true, None) => {
                let listener: Arc<dyn HeadingListener> =
                    Arc::new(HeadingForwarder(self.handle.clone()));
                self.heading_subscription = Some(source.add_listener(listener));
                log::debug!("subscribed to compass headings");
            }
            (false, Some(_)) => self.unsubscribe_heading(),
            _ => {}
        }
    }

    fn unsubscribe_heading(&mut self) {
        if let (Some(source), Some(id)) = (&self.heading_source, self.heading_subscription.take()) {
            source.remove_listener(id);
            log::debug!("unsubscribed from compass headings");
        }
    }

    // Lifecycle

    pub fn on_start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.watchdog.start();
        if let Some((source, _)) = &self.location_source {
            source.request_updates();
        }
        self.sync_heading_subscription();
        log::info!("location component started");
    }

    pub fn on_stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.watchdog.stop();
        if let Some((source, _)) = &self.location_source {
            source.remove_updates();
        }
        self.sync_heading_subscription();
        self.coordinator.cancel_all();
        log::info!("location component stopped");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The style is about to be replaced; the marker feature goes with it.
    pub fn on_style_loading(&mut self) {
        self.coordinator.cancel_all();
        self.render.detach(self.engine.as_mut());
    }

    /// Recreate the marker on the new style and reset both modes.
    pub fn on_style_loaded(&mut self) -> Result<()> {
        self.render.attach(self.engine.as_mut())?;
        self.set_camera_mode(CameraMode::default());
        self.set_render_mode(RenderMode::default());
        self.render
            .set_stale(self.watchdog.is_stale(), self.engine.as_mut());
        Ok(())
    }

    /// Swap the options at runtime.
    pub fn apply_options(&mut self, options: LocationComponentOptions) -> Result<()> {
        options.validate()?;
        self.coordinator.set_options(options.animation.clone());
        self.camera.set_options(options.camera.clone());
        self.render
            .set_options(options.marker.clone(), self.engine.as_mut());
        self.watchdog.set_timeout(options.stale.timeout());
        self.watchdog.set_enabled(options.stale.enabled);
        if let Some(compass) = &self.compass {
            compass.set_options(options.compass.clone());
        }
        self.options = options;
        Ok(())
    }

    pub fn options(&self) -> &LocationComponentOptions {
        &self.options
    }

    /// Interval the host should call [`on_frame`](Self::on_frame) at.
    pub fn frame_interval(&self) -> Duration {
        self.options.frame.frame_interval()
    }

    // Marker

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.render.show(self.engine.as_mut());
        } else {
            self.render.hide(self.engine.as_mut());
        }
    }

    /// Returns whether the click landed on the marker.
    pub fn on_map_click(&mut self, lat_lng: LatLng) -> bool {
        if !self.render.hit_test(lat_lng, self.engine.as_ref()) {
            return false;
        }
        for listener in self.click_listeners.snapshot() {
            listener.on_location_click(lat_lng);
        }
        true
    }

    pub fn on_map_long_click(&mut self, lat_lng: LatLng) -> bool {
        if !self.render.hit_test(lat_lng, self.engine.as_ref()) {
            return false;
        }
        for listener in self.long_click_listeners.snapshot() {
            listener.on_location_long_click(lat_lng);
        }
        true
    }

    // Listeners

    pub fn add_on_camera_tracking_changed_listener(
        &self,
        listener: Arc<dyn OnCameraTrackingChangedListener>,
    ) -> ListenerId {
        self.tracking_listeners.add(listener).0
    }

    pub fn remove_on_camera_tracking_changed_listener(&self, id: ListenerId) -> bool {
        self.tracking_listeners.remove(id).0
    }

    pub fn add_on_location_stale_listener(
        &self,
        listener: Arc<dyn OnLocationStaleListener>,
    ) -> ListenerId {
        self.stale_listeners.add(listener).0
    }

    pub fn remove_on_location_stale_listener(&self, id: ListenerId) -> bool {
        self.stale_listeners.remove(id).0
    }

    pub fn add_on_location_click_listener(
        &self,
        listener: Arc<dyn OnLocationClickListener>,
    ) -> ListenerId {
        self.click_listeners.add(listener).0
    }

    pub fn remove_on_location_click_listener(&self, id: ListenerId) -> bool {
        self.click_listeners.remove(id).0
    }

    pub fn add_on_location_long_click_listener(
        &self,
        listener: Arc<dyn OnLocationLongClickListener>,
    ) -> ListenerId {
        self.long_click_listeners.add(listener).0
    }

    pub fn remove_on_location_long_click_listener(&self, id: ListenerId) -> bool {
        self.long_click_listeners.remove(id).0
    }

    // State

    pub fn is_stale(&self) -> bool {
        self.watchdog.is_stale()
    }

    /// The last fix taken in, falling back to the source's cached fix.
    pub fn last_known_fix(&self) -> Option<Fix> {
        self.last_fix.or_else(|| {
            self.location_source
                .as_ref()
                .and_then(|(source, _)| source.last_known_fix())
        })
    }

    pub fn last_heading(&self) -> Option<Heading> {
        self.last_heading
    }

    pub fn heading_accuracy(&self) -> SensorAccuracy {
        self.heading_accuracy
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn coordinator(&self) -> &AnimationCoordinator {
        &self.coordinator
    }

    pub fn engine(&self) -> &dyn MapEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn MapEngine {
        self.engine.as_mut()
    }
}

impl Drop for LocationComponent {
    fn drop(&mut self) {
        self.watchdog.stop();
        self.watchdog.set_listener(None);
        self.unsubscribe_heading();
        if let Some((source, id)) = self.location_source.take() {
            source.remove_listener(id);
            if self.started {
                source.remove_updates();
            }
        }
        self.render.detach(self.engine.as_mut());
    }
}

impl fmt::Debug for LocationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationComponent")
            .field("camera_mode", &self.camera.mode())
            .field("render_mode", &self.render.mode())
            .field("stale", &self.watchdog.is_stale())
            .field("started", &self.started)
            .field("last_fix", &self.last_fix)
            .finish()
    }
}
