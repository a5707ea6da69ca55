//! Host chrome — the Telegram Mini App surface and the page around the disk.
//!
//! `Host` is the slice of `Telegram.WebApp` the player calls into;
//! `Surface` is the slice of the DOM it mutates. Both are implemented
//! over wasm-bindgen in `web`, and by recording fakes in tests.

use crate::deck::PlaybackState;
use crate::error::VinylError;
use crate::gesture::Point;

pub const PLAY_LABEL: &str = "Play";
pub const STOP_LABEL: &str = "Stop";

/// `HapticFeedback.impactOccurred` styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
}

impl ImpactStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
        }
    }
}

/// `HapticFeedback.notificationOccurred` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Error => "error",
        }
    }
}

/// Colors pushed by the host. Missing entries leave the page style alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// Every call may throw on the JS side; implementations surface that as
/// `VinylError::Host`.
pub trait Host {
    fn expand(&mut self) -> Result<(), VinylError>;
    fn set_button_label(&mut self, label: &str) -> Result<(), VinylError>;
    fn show_button(&mut self) -> Result<(), VinylError>;
    fn impact(&mut self, style: ImpactStyle) -> Result<(), VinylError>;
    fn notify(&mut self, kind: NotificationType) -> Result<(), VinylError>;
    fn theme(&self) -> Result<Theme, VinylError>;
}

pub trait Surface {
    /// Center of the disk element, in client coordinates.
    fn disk_center(&self) -> Point;
    /// Rotate the disk, or clear the rotation with `None`.
    fn rotate_disk(&mut self, degrees: Option<f64>);
    fn set_disk_paused(&mut self, paused: bool);
    /// Set the disk's edge length in CSS pixels (it is always square).
    fn set_disk_size(&mut self, px: f64);
    fn viewport_width(&self) -> f64;
    fn apply_theme(&mut self, theme: &Theme);
}

/// Button label for a playback state: the action the button will take.
pub fn button_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => PLAY_LABEL,
        PlaybackState::Playing => STOP_LABEL,
    }
}

/// Disk edge length for a viewport: a fraction of its width, capped.
pub fn disk_size(viewport_width: f64, fraction: f64, max: f64) -> f64 {
    (viewport_width * fraction).min(max).max(0.0)
}
