//! Gesture tracker — turns touch coordinates into disk angles.
//!
//! Angles are measured with `atan2(dy, dx)` around the disk center, so
//! they live in (-π, π] with y growing downwards as in screen space.
//! Consecutive angles are differenced and the delta wrapped back into
//! (-π, π], which makes a drag across the ±π seam read as a small
//! movement instead of a full turn.

use std::f64::consts::{PI, TAU};

/// A point in client (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Wrap any finite angle into (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Angle of `point` around `center`, in radians.
pub fn angle_around(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

/// Radians to the degrees used by a CSS `rotate()` transform.
pub fn to_degrees(angle: f64) -> f64 {
    angle * 180.0 / PI
}

/// Scratch state between touch-start and touch-end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScratchState {
    pub active: bool,
    pub previous_angle: f64,
}

/// One step of a scratch gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchMotion {
    /// Signed angular delta since the previous event, in (-π, π].
    pub delta: f64,
    /// Absolute angle of the finger.
    pub angle: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    state: ScratchState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScratchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Touch-down: start tracking from `angle`.
    pub fn begin(&mut self, angle: f64) {
        self.state = ScratchState {
            active: true,
            previous_angle: angle,
        };
    }

    /// Touch-move. Returns `None` when no gesture is in progress.
    pub fn update(&mut self, angle: f64) -> Option<ScratchMotion> {
        if !self.state.active {
            return None;
        }
        let delta = wrap_angle(angle - self.state.previous_angle);
        self.state.previous_angle = angle;
        Some(ScratchMotion { delta, angle })
    }

    /// Touch-up. Returns whether a gesture was in progress.
    pub fn end(&mut self) -> bool {
        let was_active = self.state.active;
        self.state.active = false;
        was_active
    }
}
