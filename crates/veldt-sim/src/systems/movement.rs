//! Movement and autopilot system.
//!
//! Advances every entity's kinematic state by one fixed time step,
//! reconciling manual control and travel-to-point behavior. Each entity is
//! integrated independently from its own start-of-tick state; intent slots
//! are read-only here.

use std::collections::HashMap;

use glam::DVec2;
use hecs::World;

use veldt_core::commands::IntentRecord;
use veldt_core::components::{Activity, Autopilot, Profile, Transform};
use veldt_core::constants::{
    APPROACH_DAMPING, ARRIVE_RADIUS, BRAKE_DAMPING, DRAG, DT, FACE_LOCK_RADIUS,
    MAX_APPROACH_SPEED, MAX_SPEED, SLOWDOWN_RADIUS, THRUST_ACCEL, TURN_RATE,
};
use veldt_core::types::{turn_toward, Position, Velocity};

/// An entity whose autopilot settled this tick. Arrivals are handed back so
/// the engine can issue the opportunistic location write outside this path.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub character_id: String,
    pub scene_id: String,
    pub position: Position,
}

/// Integrate one simulation tick for every registered entity.
pub fn run(
    world: &mut World,
    intents: &HashMap<String, IntentRecord>,
    now_secs: f64,
) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for (_entity, (transform, velocity, autopilot, activity, profile)) in world.query_mut::<(
        &mut Transform,
        &mut Velocity,
        &mut Autopilot,
        &mut Activity,
        &Profile,
    )>() {
        let (desired_heading, thrust) = match autopilot.target {
            Some(target) => resolve_autopilot(
                transform, velocity, autopilot, profile, target, &mut arrivals,
            ),
            // Manual mode: a stale or missing intent means no thrust and no
            // forced rotation.
            None => match intents.get(&profile.session_id) {
                Some(intent) if intent.is_fresh(now_secs) => (intent.heading, intent.thrust),
                _ => (transform.heading, false),
            },
        };

        integrate(transform, velocity, desired_heading, thrust);

        if velocity.speed() > 1e-9 {
            activity.last_active_secs = now_secs;
        }
    }

    arrivals
}

/// Autopilot state machine for one entity. Returns (desired heading, thrust).
fn resolve_autopilot(
    transform: &mut Transform,
    velocity: &mut Velocity,
    autopilot: &mut Autopilot,
    profile: &Profile,
    target: Position,
    arrivals: &mut Vec<Arrival>,
) -> (f64, bool) {
    let distance = transform.position.distance_to(&target);

    // Arrival is decided purely by distance — a speed condition would fight
    // the minimum-speed floor and oscillate.
    if distance <= ARRIVE_RADIUS {
        transform.position = target;
        *velocity = Velocity::default();
        autopilot.target = None;
        arrivals.push(Arrival {
            character_id: profile.character_id.clone(),
            scene_id: profile.scene_id.clone(),
            position: target,
        });
        return (transform.heading, false);
    }

    // Hold heading near the target so numerical noise cannot flip the
    // facing at the last instant.
    let desired_heading = if distance > FACE_LOCK_RADIUS {
        transform.position.bearing_to(&target)
    } else {
        transform.heading
    };

    if distance > SLOWDOWN_RADIUS {
        return (desired_heading, true);
    }

    // Approach band: throttle the velocity component directed at the target.
    let to_target: DVec2 = (target.to_dvec2() - transform.position.to_dvec2()) / distance;
    let closing_speed = velocity.to_dvec2().dot(to_target);
    let desired_closing = (MAX_APPROACH_SPEED * distance / SLOWDOWN_RADIUS).min(MAX_APPROACH_SPEED);
    let thrust = closing_speed < desired_closing;
    if !thrust {
        *velocity = Velocity::from_dvec2(velocity.to_dvec2() * BRAKE_DAMPING);
    }
    *velocity = Velocity::from_dvec2(velocity.to_dvec2() * APPROACH_DAMPING);

    (desired_heading, thrust)
}

/// Common integration step: bounded turn, thrust impulse, drag, speed clamp,
/// explicit Euler position update.
fn integrate(
    transform: &mut Transform,
    velocity: &mut Velocity,
    desired_heading: f64,
    thrust: bool,
) {
    transform.heading = turn_toward(transform.heading, desired_heading, TURN_RATE * DT);

    if thrust {
        velocity.x += THRUST_ACCEL * DT * transform.heading.cos();
        velocity.y += THRUST_ACCEL * DT * transform.heading.sin();
    }

    velocity.x *= DRAG;
    velocity.y *= DRAG;

    let speed = velocity.speed();
    if speed > MAX_SPEED {
        // Uniform rescale preserves direction.
        let scale = MAX_SPEED / speed;
        velocity.x *= scale;
        velocity.y *= scale;
    }

    transform.position.x += velocity.x * DT;
    transform.position.y += velocity.y * DT;
}
