//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz) — physics integration.
pub const SIM_TICK_RATE: u32 = 20;

/// Seconds per simulation tick.
pub const DT: f64 = 1.0 / SIM_TICK_RATE as f64;

/// Snapshot cadence: one interest-management pass every N simulation ticks
/// (10 Hz at the default rates).
pub const SNAPSHOT_EVERY: u64 = 2;

/// World cadence: one spawner/respawn pass every N simulation ticks
/// (1 Hz at the default rates).
pub const WORLD_TICK_EVERY: u64 = 20;

// --- Movement ---

/// Maximum entity speed (units/s). Enforced by uniform rescaling.
pub const MAX_SPEED: f64 = 160.0;

/// Thrust acceleration (units/s²) applied along the current heading.
pub const THRUST_ACCEL: f64 = 300.0;

/// Per-tick velocity retention factor.
pub const DRAG: f64 = 0.95;

/// Maximum heading change rate (rad/s).
pub const TURN_RATE: f64 = 3.0 * std::f64::consts::PI;

/// Manual intent older than this is treated as "no thrust, hold heading".
pub const INTENT_STALENESS_SECS: f64 = 0.5;

// --- Autopilot ---

/// Arrival radius: within this distance the entity snaps exactly onto its
/// move target. Arrival is decided by distance alone, never by speed.
pub const ARRIVE_RADIUS: f64 = 2.0;

/// Inside this radius the approach controller throttles closing speed.
pub const SLOWDOWN_RADIUS: f64 = 60.0;

/// Inside this radius the heading holds instead of re-aiming at the target.
pub const FACE_LOCK_RADIUS: f64 = 8.0;

/// Cap on the desired closing speed during approach (units/s).
pub const MAX_APPROACH_SPEED: f64 = 120.0;

/// Extra per-tick damping applied when closing faster than desired.
pub const BRAKE_DAMPING: f64 = 0.8;

/// Small isotropic per-tick damping inside the slow-down band; suppresses
/// lateral drift.
pub const APPROACH_DAMPING: f64 = 0.95;

// --- Interest management ---

/// View radius (units). The inclusion boundary is inclusive: an entity at
/// exactly this distance is visible.
pub const VIEW_RADIUS: f64 = 320.0;

// --- Scenes and spawning ---

/// Fallback scene dimensions when a scene config omits them.
pub const DEFAULT_SCENE_WIDTH: f64 = 800.0;
pub const DEFAULT_SCENE_HEIGHT: f64 = 450.0;

/// Horizontal margin kept free at the right scene edge so a spawned sprite
/// footprint stays inside the scene.
pub const SPRITE_MARGIN: f64 = 64.0;

/// Respawn delay when a spawner config omits one (seconds).
pub const DEFAULT_RESPAWN_SECS: f64 = 30.0;

// --- Classification bands ---
// Vertical placement bands as fractions of scene height (y grows downward,
// so ground creatures get the larger fractions).

/// Band for ground vermin (rats and similar).
pub const VERMIN_BAND: (f64, f64) = (0.70, 0.95);

/// Band for larger ground beasts.
pub const BEAST_BAND: (f64, f64) = (0.55, 0.90);

/// Band for flying creatures.
pub const FLYER_BAND: (f64, f64) = (0.10, 0.45);
