//! Per-tick accumulation of confirmed deaths among interacted actors.
//!
//! Death is reported over two unreliable channels. Some compositions
//! play a known death animation before their model despawns; everything
//! else is judged at despawn time by comparing the reported health
//! ratio against a per-composition death threshold.

use dropwatch_grid::WorldPoint;
use dropwatch_npcs::{DropRule, NpcRegistry};

use crate::tracker::{ActorId, ActorKind, InteractionTracker, MemorizedActor};

/// One confirmed kill. Never survives past the tick it was recorded in.
#[derive(Clone, Debug)]
pub struct DeathRecord {
    pub actor: MemorizedActor,
    pub death_tick: u64,
}

/// Ordered set of this tick's dead actors. Insertion order is kept; it
/// is the tie-break rank for splitting shared-tile drops later.
#[derive(Default)]
pub struct DeathCollector {
    dead: Vec<DeathRecord>,
}

impl DeathCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animation trigger. When a memorized NPC's current animation is
    /// its composition's configured death animation, the kill is
    /// confirmed now. Compositions whose drop tile is decided at
    /// animation start only get the observer's last-tick location
    /// stored as an override here; their loot waits for the animation
    /// to finish, so the despawn trigger records the death.
    pub fn animation_changed(
        &mut self,
        tracker: &mut InteractionTracker,
        registry: &NpcRegistry,
        actor_id: ActorId,
        animation_id: u32,
        observer_last_tick: Option<WorldPoint>,
        tick: u64,
    ) {
        let Some(composition_id) = tracker.get(actor_id).and_then(|a| a.kind.composition_id())
        else {
            return;
        };
        if registry.death_animation(composition_id) != Some(animation_id) {
            return;
        }

        if registry.drop_rule(composition_id) == DropRule::Precomputed {
            if let Some(point) = observer_last_tick {
                tracker.set_drop_override(actor_id, point);
            }
            return;
        }

        // Confirmed kill. Removing the actor here makes the later
        // despawn trigger a no-op for the same kill.
        if let Some(actor) = tracker.remove(actor_id) {
            log::debug!(target: "deaths", "[tick {}] death by animation: {:?}", tick, actor.kind);
            self.dead.push(DeathRecord {
                actor,
                death_tick: tick,
            });
        }
    }

    /// Despawn trigger. A memorized actor that despawned is dead iff
    /// its health ratio sits at or below its composition's death
    /// threshold. The threshold is zero for players and for every
    /// composition without a configured readout quirk.
    pub fn despawned(
        &mut self,
        tracker: &mut InteractionTracker,
        registry: &NpcRegistry,
        actor_id: ActorId,
        health_ratio: f32,
        tick: u64,
    ) {
        let Some(actor) = tracker.remove(actor_id) else {
            return;
        };
        let threshold = match &actor.kind {
            ActorKind::Npc(snap) => registry.death_health_percent(snap.composition_id),
            ActorKind::Player { .. } => 0.0,
        };
        if health_ratio <= threshold {
            log::debug!(
                target: "deaths",
                "[tick {}] death by despawn ({:.2} <= {:.2}): {:?}",
                tick, health_ratio, threshold, actor.kind
            );
            self.dead.push(DeathRecord {
                actor,
                death_tick: tick,
            });
        }
    }

    /// Drain this tick's records in insertion order.
    pub fn take(&mut self) -> Vec<DeathRecord> {
        std::mem::take(&mut self.dead)
    }

    pub fn len(&self) -> usize {
        self.dead.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dead.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::NpcSnapshot;

    fn registry() -> NpcRegistry {
        NpcRegistry::from_toml_str(
            r#"
            [[npcs]]
            name = "bound_elemental"
            ids = [5601]
            death_animation = 2553

            [[npcs]]
            name = "cavern_maw"
            ids = [4210]
            death_animation = 3993
            drop = { rule = "precomputed" }

            [[npcs]]
            name = "stone_sentinel"
            ids = [412]
            death_health_percent = 0.07
        "#,
        )
        .expect("registry")
    }

    fn memorize(tracker: &mut InteractionTracker, id: ActorId, composition: u32) {
        tracker.interaction_changed(
            id,
            ActorKind::Npc(NpcSnapshot {
                composition_id: composition,
                name: "test".into(),
                size: 1,
            }),
            Some(WorldPoint::new(5, 5, 0)),
            0,
        );
    }

    #[test]
    fn animation_death_removes_actor_and_despawn_is_noop() {
        let reg = registry();
        let mut tracker = InteractionTracker::new();
        let mut deaths = DeathCollector::new();
        memorize(&mut tracker, 1, 5601);

        deaths.animation_changed(&mut tracker, &reg, 1, 2553, None, 10);
        assert_eq!(deaths.len(), 1);
        assert!(tracker.is_empty());

        // The model despawns later the same tick; no double count.
        deaths.despawned(&mut tracker, &reg, 1, 0.0, 10);
        assert_eq!(deaths.len(), 1);
    }

    #[test]
    fn non_death_animation_is_ignored() {
        let reg = registry();
        let mut tracker = InteractionTracker::new();
        let mut deaths = DeathCollector::new();
        memorize(&mut tracker, 1, 5601);

        deaths.animation_changed(&mut tracker, &reg, 1, 9999, None, 10);
        assert!(deaths.is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn precomputed_rule_stores_override_and_defers_to_despawn() {
        let reg = registry();
        let mut tracker = InteractionTracker::new();
        let mut deaths = DeathCollector::new();
        memorize(&mut tracker, 2, 4210);

        let observer = WorldPoint::new(30, 31, 0);
        deaths.animation_changed(&mut tracker, &reg, 2, 3993, Some(observer), 4);
        assert!(deaths.is_empty());
        assert_eq!(tracker.get(2).unwrap().drop_override, Some(observer));

        deaths.despawned(&mut tracker, &reg, 2, 0.0, 5);
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths.dead[0].actor.drop_override, Some(observer));
    }

    #[test]
    fn despawn_uses_per_composition_threshold() {
        let reg = registry();
        let mut tracker = InteractionTracker::new();
        let mut deaths = DeathCollector::new();

        // Sentinel reads 0.05 at its true death point; threshold 0.07.
        memorize(&mut tracker, 3, 412);
        deaths.despawned(&mut tracker, &reg, 3, 0.05, 1);
        assert_eq!(deaths.len(), 1);

        // A plain monster despawning while healthy did not die.
        memorize(&mut tracker, 4, 777);
        deaths.despawned(&mut tracker, &reg, 4, 0.4, 1);
        assert_eq!(deaths.len(), 1);
    }

    #[test]
    fn never_interacted_actors_are_invisible() {
        let reg = registry();
        let mut tracker = InteractionTracker::new();
        let mut deaths = DeathCollector::new();
        deaths.despawned(&mut tracker, &reg, 99, 0.0, 1);
        deaths.animation_changed(&mut tracker, &reg, 99, 2553, None, 1);
        assert!(deaths.is_empty());
    }
}
