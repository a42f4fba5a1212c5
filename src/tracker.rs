//! Actors the observed player has recently fought, and what we knew
//! about them at interaction time.

use std::collections::HashMap;

use dropwatch_grid::WorldPoint;

/// Opaque, stable actor identity provided by the host simulation. The
/// engine never holds a live reference into host state.
pub type ActorId = u64;

/// Static NPC template data captured when the interaction started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSnapshot {
    pub composition_id: u32,
    pub name: String,
    /// Footprint edge length in tiles (1 for normal monsters).
    pub size: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Npc(NpcSnapshot),
    Player { name: String },
}

impl ActorKind {
    pub fn composition_id(&self) -> Option<u32> {
        match self {
            ActorKind::Npc(snap) => Some(snap.composition_id),
            ActorKind::Player { .. } => None,
        }
    }
}

/// Snapshot of an interacted actor. Created when the observer's
/// interaction target changes, destroyed on despawn or overwritten on
/// re-interaction.
#[derive(Clone, Debug)]
pub struct MemorizedActor {
    pub id: ActorId,
    pub kind: ActorKind,
    /// Last tile the actor was seen on; events refresh it. May be
    /// unknown when the actor left the loaded region.
    pub last_location: Option<WorldPoint>,
    pub interaction_tick: u64,
    /// Tile some compositions decide on before they visually die.
    pub drop_override: Option<WorldPoint>,
}

/// Live table of interacted actors, keyed by identity.
///
/// Other players may be fighting monsters nearby, and loot can appear
/// on the same tick their kill lands; restricting attribution to
/// actors the observer actually interacted with filters those out.
#[derive(Default)]
pub struct InteractionTracker {
    actors: HashMap<ActorId, MemorizedActor>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The observer's interaction target changed; memorize it.
    pub fn interaction_changed(
        &mut self,
        id: ActorId,
        kind: ActorKind,
        location: Option<WorldPoint>,
        tick: u64,
    ) {
        self.actors.insert(
            id,
            MemorizedActor {
                id,
                kind,
                last_location: location,
                interaction_tick: tick,
                drop_override: None,
            },
        );
    }

    pub fn get(&self, id: ActorId) -> Option<&MemorizedActor> {
        self.actors.get(&id)
    }

    /// Remove on despawn (or on animation-confirmed death) and hand the
    /// snapshot to the caller so it can decide whether the actor died.
    pub fn remove(&mut self, id: ActorId) -> Option<MemorizedActor> {
        self.actors.remove(&id)
    }

    pub fn set_drop_override(&mut self, id: ActorId, location: WorldPoint) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.drop_override = Some(location);
        }
    }

    pub fn update_location(&mut self, id: ActorId, location: WorldPoint) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.last_location = Some(location);
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn reset(&mut self) {
        self.actors.clear();
    }
}
