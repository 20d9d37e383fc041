//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in scene space (world units).
/// x grows rightward, y grows downward (screen convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in scene space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulation tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Squared distance — avoids the square root in pairwise range tests.
    pub fn distance_squared_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Bearing to another position in radians, mathematical convention
    /// (atan2 of the offset), in (−π, π].
    pub fn bearing_to(&self, other: &Position) -> f64 {
        normalize_angle((other.y - self.y).atan2(other.x - self.x))
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Advance by one simulation tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += crate::constants::DT;
    }
}

/// Normalize an angle to (−π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle.rem_euclid(std::f64::consts::TAU);
    if a > std::f64::consts::PI {
        a -= std::f64::consts::TAU;
    }
    a
}

/// Turn `current` toward `desired` by at most `max_step` radians along the
/// shorter arc. Headings are never snapped across large errors.
pub fn turn_toward(current: f64, desired: f64, max_step: f64) -> f64 {
    let diff = normalize_angle(desired - current);
    if diff.abs() <= max_step {
        normalize_angle(desired)
    } else {
        normalize_angle(current + max_step.copysign(diff))
    }
}
