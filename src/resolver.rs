//! Maps a dead actor to the tiles its loot may have materialized on.

use dropwatch_grid::WorldPoint;
use dropwatch_npcs::{DropRule, NpcRegistry};

use crate::ledger::GroundLedger;
use crate::tracker::{ActorKind, MemorizedActor};

/// Tick-local inputs the spatial rules read from.
pub struct ResolveCtx<'a> {
    pub ledger: &'a GroundLedger,
    /// Observing player's location as of the previous tick boundary.
    pub observer_last_tick: Option<WorldPoint>,
}

/// Candidate drop tiles for a dead actor, best guesses first. Empty
/// when the required spatial data is missing, which skips attribution
/// for this actor this tick without error.
pub fn candidates(
    actor: &MemorizedActor,
    registry: &NpcRegistry,
    ctx: &ResolveCtx<'_>,
) -> Vec<WorldPoint> {
    let snap = match &actor.kind {
        ActorKind::Npc(snap) => snap,
        ActorKind::Player { .. } => return default_candidates(actor, 1),
    };

    match registry.drop_rule(snap.composition_id) {
        DropRule::Default => default_candidates(actor, snap.size),
        DropRule::ObserverTile => match ctx.observer_last_tick {
            Some(point) => vec![point],
            None => {
                log::debug!(target: "resolver", "no observer tile for {:?}", actor.kind);
                Vec::new()
            }
        },
        DropRule::Precomputed => match actor.drop_override {
            Some(point) => vec![point],
            // Animation was never seen; fall back to the death tile.
            None => default_candidates(actor, snap.size),
        },
        DropRule::FixedOffset { dx, dy } => match actor.last_location {
            Some(point) => vec![point.offset(dx, dy)],
            None => missing_location(actor),
        },
        DropRule::MarkerItem { item_id } => marker_tile(item_id, ctx)
            .map(|point| vec![point])
            .unwrap_or_default(),
        DropRule::TowardObserver { dx, dy, nudge } => match actor.last_location {
            Some(point) => vec![nudged(point.offset(dx, dy), ctx.observer_last_tick, nudge)],
            None => missing_location(actor),
        },
    }
}

fn default_candidates(actor: &MemorizedActor, size: i32) -> Vec<WorldPoint> {
    let Some(anchor) = actor.last_location else {
        return missing_location(actor);
    };
    if size >= 3 {
        // Large creatures sometimes drop centered on their footprint
        // rather than on the southwest anchor; check both tiles.
        let half = (size - 1) / 2;
        vec![anchor, anchor.offset(half, half)]
    } else {
        vec![anchor]
    }
}

/// The drop appears wherever the marker item landed this tick. If the
/// observer shed some of the marker item themselves on the same tick,
/// the tile farther away wins. Equidistant tiles tie-break on first
/// encounter; the flag-set iteration order carries no meaning.
fn marker_tile(item_id: u32, ctx: &ResolveCtx<'_>) -> Option<WorldPoint> {
    let observer = ctx.observer_last_tick?;
    let mut best: Option<(WorldPoint, i32)> = None;
    for tile in ctx.ledger.changed_tiles() {
        if !ctx
            .ledger
            .contents(tile)
            .iter()
            .any(|s| s.item_id == item_id)
        {
            continue;
        }
        let d = tile.distance_to(observer);
        if best.map(|(_, bd)| d > bd).unwrap_or(true) {
            best = Some((tile, d));
        }
    }
    best.map(|(tile, _)| tile)
}

/// Shift each axis of the base tile by `nudge` toward the observer.
fn nudged(base: WorldPoint, observer: Option<WorldPoint>, nudge: i32) -> WorldPoint {
    let Some(observer) = observer else {
        return base;
    };
    let mut out = base;
    if observer.x < base.x {
        out.x -= nudge;
    } else if observer.x > base.x {
        out.x += nudge;
    }
    if observer.y < base.y {
        out.y -= nudge;
    } else if observer.y > base.y {
        out.y += nudge;
    }
    out
}

fn missing_location(actor: &MemorizedActor) -> Vec<WorldPoint> {
    log::debug!(target: "resolver", "no known location for {:?}", actor.kind);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{ActorId, NpcSnapshot};

    fn registry() -> NpcRegistry {
        NpcRegistry::builtin().expect("builtin profiles")
    }

    fn npc(id: ActorId, composition: u32, size: i32, at: Option<WorldPoint>) -> MemorizedActor {
        MemorizedActor {
            id,
            kind: ActorKind::Npc(NpcSnapshot {
                composition_id: composition,
                name: "test".into(),
                size,
            }),
            last_location: at,
            interaction_tick: 0,
            drop_override: None,
        }
    }

    fn ctx<'a>(ledger: &'a GroundLedger, observer: Option<WorldPoint>) -> ResolveCtx<'a> {
        ResolveCtx {
            ledger,
            observer_last_tick: observer,
        }
    }

    #[test]
    fn unknown_composition_uses_death_tile() {
        let ledger = GroundLedger::new();
        let at = WorldPoint::new(12, 12, 0);
        let actor = npc(1, 999_999, 1, Some(at));
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, None)),
            vec![at]
        );
    }

    #[test]
    fn large_footprint_adds_center_candidate() {
        let ledger = GroundLedger::new();
        let at = WorldPoint::new(20, 20, 0);
        let actor = npc(1, 999_999, 5, Some(at));
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, None)),
            vec![at, at.offset(2, 2)]
        );
    }

    #[test]
    fn observer_tile_rule_ignores_death_tile() {
        let ledger = GroundLedger::new();
        let observer = WorldPoint::new(3, 4, 0);
        // tide_wraith
        let actor = npc(1, 4201, 4, Some(WorldPoint::new(50, 50, 0)));
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, Some(observer))),
            vec![observer]
        );
        // Without an observer fix there is nowhere to look.
        assert!(candidates(&actor, &registry(), &ctx(&ledger, None)).is_empty());
    }

    #[test]
    fn fixed_offset_applies_per_composition_vector() {
        let ledger = GroundLedger::new();
        let at = WorldPoint::new(10, 10, 0);
        // shardhide_alpha: +3/+3
        let actor = npc(1, 7850, 2, Some(at));
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, None)),
            vec![at.offset(3, 3)]
        );
    }

    #[test]
    fn marker_rule_picks_farthest_marker_tile() {
        let mut ledger = GroundLedger::new();
        let observer = WorldPoint::new(0, 0, 0);
        ledger.item_spawned(WorldPoint::new(2, 2, 0), 6211, 100);
        ledger.item_spawned(WorldPoint::new(9, 9, 0), 6211, 120);
        ledger.item_spawned(WorldPoint::new(30, 30, 0), 555, 1);

        // serpent_matriarch
        let actor = npc(1, 2042, 3, Some(WorldPoint::new(5, 5, 0)));
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, Some(observer))),
            vec![WorldPoint::new(9, 9, 0)]
        );
    }

    #[test]
    fn marker_rule_resolves_nothing_without_marker() {
        let ledger = GroundLedger::new();
        let actor = npc(1, 2042, 3, Some(WorldPoint::new(5, 5, 0)));
        let got = candidates(
            &actor,
            &registry(),
            &ctx(&ledger, Some(WorldPoint::new(0, 0, 0))),
        );
        assert!(got.is_empty());
    }

    #[test]
    fn toward_observer_nudges_each_axis_independently() {
        let ledger = GroundLedger::new();
        let at = WorldPoint::new(100, 100, 0);
        // frost_wyrm: base +3/+3, nudge 4
        let actor = npc(1, 8059, 7, Some(at));

        // Observer southwest of the base tile: both axes pull back.
        let got = candidates(
            &actor,
            &registry(),
            &ctx(&ledger, Some(WorldPoint::new(95, 95, 0))),
        );
        assert_eq!(got, vec![WorldPoint::new(99, 99, 0)]);

        // Observer due north: only the y axis pushes out.
        let got = candidates(
            &actor,
            &registry(),
            &ctx(&ledger, Some(WorldPoint::new(103, 120, 0))),
        );
        assert_eq!(got, vec![WorldPoint::new(103, 107, 0)]);
    }

    #[test]
    fn precomputed_override_wins_over_death_tile() {
        let ledger = GroundLedger::new();
        let over = WorldPoint::new(44, 44, 0);
        // cavern_maw
        let mut actor = npc(1, 4210, 1, Some(WorldPoint::new(1, 1, 0)));
        actor.drop_override = Some(over);
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, None)),
            vec![over]
        );

        actor.drop_override = None;
        assert_eq!(
            candidates(&actor, &registry(), &ctx(&ledger, None)),
            vec![WorldPoint::new(1, 1, 0)]
        );
    }
}
