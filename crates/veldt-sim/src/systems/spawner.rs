//! Spawner and respawn engine.
//!
//! Once per world tick, per scene: top up each spawner to its configured
//! alive count and revive dead creatures whose schedule has elapsed. Death
//! itself is driven by an external combat collaborator; this system only
//! observes and advances the already-set state.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use veldt_core::bestiary::{CreatureClass, Facing, TemplateRegistry};
use veldt_core::constants::SPRITE_MARGIN;
use veldt_core::events::OutboundEvent;
use veldt_core::store::{SceneConfig, SpawnerConfig};
use veldt_core::types::Position;

use crate::scene::{Creature, SceneState};

/// Run one spawner pass over a scene. Returns the lifecycle events to
/// broadcast to the scene's occupants.
pub fn run(
    scene: &mut SceneState,
    registry: &TemplateRegistry,
    rng: &mut ChaCha8Rng,
    now_secs: f64,
    next_instance_id: &mut u64,
) -> Vec<OutboundEvent> {
    let SceneState {
        scene_id,
        config,
        creatures,
        ..
    } = scene;
    let Some(cfg) = config.as_ref() else {
        return Vec::new();
    };

    let mut events = Vec::new();

    for spawner in &cfg.spawners {
        // An unknown template is unrecoverable for this spawner only: skip
        // it this cycle and continue with the rest of the scene.
        let Some(template) = registry.get(&spawner.creature_id) else {
            tracing::warn!(
                scene = %scene_id,
                spawner = %spawner.id,
                creature = %spawner.creature_id,
                "unknown creature template, skipping spawner this cycle"
            );
            continue;
        };

        // A dead instance awaiting revival holds its population slot;
        // otherwise a top-up here plus the later revival would push the
        // spawner past max_alive.
        let held = creatures
            .iter()
            .filter(|c| {
                c.spawner_id == spawner.id
                    && c.creature_id == spawner.creature_id
                    && (c.alive || c.respawn_at_secs.is_some())
            })
            .count();
        let missing = (spawner.max_alive as usize).saturating_sub(held);

        for _ in 0..missing {
            let (position, facing) = sample_placement(cfg, spawner, template.class, rng);
            let creature = Creature {
                instance_id: *next_instance_id,
                creature_id: template.id.clone(),
                spawner_id: spawner.id.clone(),
                alive: true,
                respawn_at_secs: None,
                position,
                facing,
                current_hp: template.stats.map(|s| s.max_hp),
            };
            *next_instance_id += 1;

            tracing::debug!(
                scene = %scene_id,
                instance = creature.instance_id,
                creature = %creature.creature_id,
                x = position.x,
                y = position.y,
                "spawned creature"
            );

            events.push(OutboundEvent::CreatureSpawned {
                scene_id: scene_id.clone(),
                creature: creature.view(registry),
                entrance_desc: template.entrance_desc.clone(),
            });
            creatures.push(creature);
        }
    }

    events.extend(process_respawns(
        scene_id, cfg, creatures, registry, rng, now_secs,
    ));
    events
}

/// Revive dead creatures whose scheduled time has elapsed. Position and
/// facing are re-sampled — restoring the death location would invite camping.
fn process_respawns(
    scene_id: &str,
    cfg: &SceneConfig,
    creatures: &mut [Creature],
    registry: &TemplateRegistry,
    rng: &mut ChaCha8Rng,
    now_secs: f64,
) -> Vec<OutboundEvent> {
    let mut events = Vec::new();

    for creature in creatures.iter_mut() {
        if creature.alive {
            continue;
        }
        let Some(respawn_at) = creature.respawn_at_secs else {
            continue;
        };
        if now_secs < respawn_at {
            continue;
        }
        let Some(template) = registry.get(&creature.creature_id) else {
            tracing::warn!(
                scene = %scene_id,
                instance = creature.instance_id,
                creature = %creature.creature_id,
                "unknown creature template, deferring respawn"
            );
            continue;
        };

        let spawner = cfg.spawners.iter().find(|s| s.id == creature.spawner_id);
        let (position, facing) = match spawner {
            Some(spawner) => sample_placement(cfg, spawner, template.class, rng),
            // Spawner dropped from a refreshed config: free placement.
            None => sample_free_placement(cfg, template.class, rng),
        };

        creature.alive = true;
        creature.respawn_at_secs = None;
        creature.current_hp = template.stats.map(|s| s.max_hp);
        creature.position = position;
        creature.facing = facing;

        tracing::debug!(
            scene = %scene_id,
            instance = creature.instance_id,
            x = position.x,
            y = position.y,
            "respawned creature"
        );

        events.push(OutboundEvent::CreatureRespawned {
            scene_id: scene_id.to_owned(),
            creature: creature.view(registry),
        });
    }

    events
}

/// Server-assigned placement: fixed coordinates when the spawner pins them,
/// otherwise sampled.
fn sample_placement(
    cfg: &SceneConfig,
    spawner: &SpawnerConfig,
    class: CreatureClass,
    rng: &mut ChaCha8Rng,
) -> (Position, Facing) {
    let (free_position, facing) = sample_free_placement(cfg, class, rng);
    let position = Position::new(
        spawner.spawn_x.unwrap_or(free_position.x),
        spawner.spawn_y.unwrap_or(free_position.y),
    );
    (position, facing)
}

/// Uniform x inside the scene (minus the sprite footprint margin); y drawn
/// from the class's vertical band; facing uniform between the two
/// horizontal directions.
fn sample_free_placement(
    cfg: &SceneConfig,
    class: CreatureClass,
    rng: &mut ChaCha8Rng,
) -> (Position, Facing) {
    let max_x = (cfg.width - SPRITE_MARGIN).max(1.0);
    let x = rng.gen_range(0.0..max_x);
    let (band_lo, band_hi) = class.vertical_band();
    let y = cfg.height * rng.gen_range(band_lo..band_hi);
    let facing = if rng.gen_bool(0.5) {
        Facing::Right
    } else {
        Facing::Left
    };
    (Position::new(x, y), facing)
}
