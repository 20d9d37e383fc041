//! Interest management: per-observer filtered views of world state.
//!
//! This system is read-only — it never modifies the world. Everything in the
//! published records was resolved at identification time, so building a
//! snapshot touches no store and stays allocation-light.

use std::collections::BTreeMap;

use hecs::World;

use veldt_core::components::{Profile, Transform};
use veldt_core::constants::VIEW_RADIUS;
use veldt_core::state::{EntityView, WorldSnapshot};
use veldt_core::types::{Position, SimTime, Velocity};

struct Entry {
    session_id: String,
    scene_id: String,
    entity_id: u64,
    position: Position,
    view: EntityView,
}

/// Build one snapshot per observer.
///
/// An observer always sees itself; any other entity is visible when it is in
/// the same scene and its squared distance is at most the squared view
/// radius (inclusive boundary). Observers with no registered entity simply
/// do not appear here.
pub fn run(world: &World, time: SimTime) -> Vec<(String, WorldSnapshot)> {
    let mut entries: Vec<Entry> = Vec::new();
    {
        let mut query = world.query::<(&Transform, &Velocity, &Profile)>();
        for (_entity, (transform, velocity, profile)) in query.iter() {
            entries.push(Entry {
                session_id: profile.session_id.clone(),
                scene_id: profile.scene_id.clone(),
                entity_id: profile.entity_id,
                position: transform.position,
                view: EntityView {
                    entity_id: profile.entity_id,
                    display_name: profile.display_name.clone(),
                    position: transform.position,
                    velocity: *velocity,
                    heading: transform.heading,
                },
            });
        }
    }

    let radius_sq = VIEW_RADIUS * VIEW_RADIUS;
    entries
        .iter()
        .map(|observer| {
            let mut entities = BTreeMap::new();
            for other in &entries {
                let visible = other.entity_id == observer.entity_id
                    || (other.scene_id == observer.scene_id
                        && observer.position.distance_squared_to(&other.position) <= radius_sq);
                if visible {
                    entities.insert(other.entity_id, other.view.clone());
                }
            }
            (
                observer.session_id.clone(),
                WorldSnapshot { time, entities },
            )
        })
        .collect()
}
