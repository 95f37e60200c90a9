//! Core constants for the location component.
//! Keeping them in a single place makes it easier to tweak component-wide magic numbers.

/// Interpolation duration for position, GPS bearing, compass bearing and accuracy.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 1000;

/// Fallback duration for `zoom_while_tracking` when the caller gives none.
pub const DEFAULT_TRACKING_ZOOM_DURATION_MS: u64 = 750;

/// Fallback duration for `tilt_while_tracking` when the caller gives none.
pub const DEFAULT_TRACKING_TILT_DURATION_MS: u64 = 1250;

/// Duration of an eased camera transition into tracking.
pub const TRANSITION_ANIMATION_DURATION_MS: u64 = 750;

/// Adaptive location animations stretch the fix interval by this factor.
pub const TRACKING_DURATION_MULTIPLIER: f32 = 1.1;

/// Upper bound for adaptive location animations.
pub const MAX_ANIMATION_DURATION_MS: u64 = 2000;

/// Time without a fix before the location is considered stale.
pub const STALE_STATE_TIMEOUT_MS: u64 = 30_000;

/// Minimum spacing between two emitted compass headings.
pub const COMPASS_UPDATE_RATE_MS: u64 = 300;

/// Low-pass filter coefficient for accelerometer/magnetometer samples (0 < alpha < 1).
pub const COMPASS_LOW_PASS_ALPHA: f32 = 0.45;

/// Tile size the engine's meters-per-pixel figures refer to.
pub const ENGINE_TILE_SIZE: f64 = 512.0;

/// Icon offset per degree of camera tilt.
pub const TILT_ICON_OFFSET_FACTOR: f64 = 0.05;

/// Highest frame rate the options accept.
pub const MAX_TARGET_FPS: u32 = 240;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 25.5;
pub const MAX_TILT: f64 = 60.0;

/// Feature properties written onto the marker's backing geometry.
pub mod properties {
    pub const GPS_BEARING: &str = "gps-bearing";
    pub const COMPASS_BEARING: &str = "compass-bearing";
    pub const ACCURACY_RADIUS: &str = "accuracy-radius";
    pub const ACCURACY_ALPHA: &str = "accuracy-alpha";
    pub const ACCURACY_COLOR: &str = "accuracy-color";
    pub const LOCATION_STALE: &str = "location-stale";
    pub const FOREGROUND_ICON: &str = "foreground-icon";
    pub const BACKGROUND_ICON: &str = "background-icon";
    pub const FOREGROUND_STALE_ICON: &str = "foreground-stale-icon";
    pub const BACKGROUND_STALE_ICON: &str = "background-stale-icon";
    pub const BEARING_ICON: &str = "bearing-icon";
    pub const FOREGROUND_ICON_OFFSET: &str = "foreground-icon-offset";
    pub const SHADOW_ICON_OFFSET: &str = "shadow-icon-offset";
}

/// Icon image names used when the options name none.
pub mod icons {
    pub const FOREGROUND: &str = "location-foreground";
    pub const BACKGROUND: &str = "location-background";
    pub const FOREGROUND_STALE: &str = "location-foreground-stale";
    pub const BACKGROUND_STALE: &str = "location-background-stale";
    pub const BEARING: &str = "location-bearing";
    pub const GPS: &str = "location-gps";
}
