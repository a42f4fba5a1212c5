//! Host-facing event surface.
//!
//! The engine exposes explicit entry points; this enum is a thin
//! adapter for hosts (and the replay binary) that already batch their
//! per-tick signals into a single feed.

use dropwatch_grid::WorldPoint;

use crate::engine::AttributionEngine;
use crate::records::{ItemStack, LootAttribution};
use crate::tracker::{ActorId, ActorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionChange {
    /// Scene/region reloaded; ground snapshots are stale.
    RegionLoaded,
    /// Observer logged out; forget actors too.
    LoggedOut,
}

/// One host signal, in arrival order within a tick.
#[derive(Clone, Debug)]
pub enum WorldEvent {
    InteractionChanged {
        target: Option<(ActorId, ActorKind, Option<WorldPoint>)>,
    },
    AnimationChanged {
        actor: ActorId,
        animation_id: u32,
        location: Option<WorldPoint>,
    },
    ActorDespawned {
        actor: ActorId,
        location: Option<WorldPoint>,
        health_ratio: f32,
    },
    ItemSpawned {
        tile: WorldPoint,
        item_id: u32,
        quantity: u32,
    },
    ItemQuantityChanged {
        tile: WorldPoint,
        item_id: u32,
        old_quantity: u32,
        new_quantity: u32,
    },
    TileRefreshed {
        tile: WorldPoint,
        contents: Vec<ItemStack>,
    },
    PlayerLootSuppressed {
        suppressed: bool,
    },
    Session {
        change: SessionChange,
    },
    /// Tick boundary; carries the observer's current location.
    EndTick {
        observer: Option<WorldPoint>,
    },
}

impl WorldEvent {
    /// Dispatch to the engine's entry points. Only `EndTick` produces
    /// output.
    pub fn apply(self, engine: &mut AttributionEngine) -> Vec<LootAttribution> {
        match self {
            WorldEvent::InteractionChanged { target } => {
                engine.interaction_changed(target);
                Vec::new()
            }
            WorldEvent::AnimationChanged {
                actor,
                animation_id,
                location,
            } => {
                engine.animation_changed(actor, animation_id, location);
                Vec::new()
            }
            WorldEvent::ActorDespawned {
                actor,
                location,
                health_ratio,
            } => {
                engine.actor_despawned(actor, location, health_ratio);
                Vec::new()
            }
            WorldEvent::ItemSpawned {
                tile,
                item_id,
                quantity,
            } => {
                engine.item_spawned(tile, item_id, quantity);
                Vec::new()
            }
            WorldEvent::ItemQuantityChanged {
                tile,
                item_id,
                old_quantity,
                new_quantity,
            } => {
                engine.item_quantity_changed(tile, item_id, old_quantity, new_quantity);
                Vec::new()
            }
            WorldEvent::TileRefreshed { tile, contents } => {
                engine.tile_refreshed(tile, contents);
                Vec::new()
            }
            WorldEvent::PlayerLootSuppressed { suppressed } => {
                engine.set_player_loot_suppressed(suppressed);
                Vec::new()
            }
            WorldEvent::Session { change } => {
                engine.session_changed(change);
                Vec::new()
            }
            WorldEvent::EndTick { observer } => engine.end_tick(observer),
        }
    }
}
