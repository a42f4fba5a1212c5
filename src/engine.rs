//! Tick orchestration: ingestion entry points and end-of-tick
//! attribution, including the multi-kill fair split.

use std::collections::BTreeMap;

use dropwatch_grid::WorldPoint;
use dropwatch_npcs::NpcRegistry;

use crate::deaths::{DeathCollector, DeathRecord};
use crate::event::SessionChange;
use crate::ledger::GroundLedger;
use crate::records::{ItemStack, LootAttribution, LootSource};
use crate::resolver::{self, ResolveCtx};
use crate::tracker::{ActorId, ActorKind, InteractionTracker};

/// Single-owner, single-threaded attribution state for one observing
/// session. The host's tick loop calls the ingestion methods in event
/// arrival order and `end_tick` once per tick boundary.
pub struct AttributionEngine {
    registry: NpcRegistry,
    ledger: GroundLedger,
    tracker: InteractionTracker,
    deaths: DeathCollector,
    tick: u64,
    observer_last_tick: Option<WorldPoint>,
    /// Zone context: inside some instances player kills drop session
    /// consumables, not loot worth attributing.
    suppress_player_loot: bool,
}

impl AttributionEngine {
    pub fn new(registry: NpcRegistry) -> Self {
        Self {
            registry,
            ledger: GroundLedger::new(),
            tracker: InteractionTracker::new(),
            deaths: DeathCollector::new(),
            tick: 0,
            observer_last_tick: None,
            suppress_player_loot: false,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The observer's interaction target changed. `None` (stopped
    /// interacting) leaves existing memorized actors untouched.
    pub fn interaction_changed(
        &mut self,
        target: Option<(ActorId, ActorKind, Option<WorldPoint>)>,
    ) {
        if let Some((id, kind, location)) = target {
            log::trace!(target: "attribution", "[tick {}] interacting with {:?}", self.tick, kind);
            self.tracker.interaction_changed(id, kind, location, self.tick);
        }
    }

    /// An actor's animation changed. Location rides along so the
    /// memorized snapshot stays current without live references.
    pub fn animation_changed(
        &mut self,
        actor_id: ActorId,
        animation_id: u32,
        location: Option<WorldPoint>,
    ) {
        if let Some(point) = location {
            self.tracker.update_location(actor_id, point);
        }
        self.deaths.animation_changed(
            &mut self.tracker,
            &self.registry,
            actor_id,
            animation_id,
            self.observer_last_tick,
            self.tick,
        );
    }

    /// An actor despawned, dead or not; the health ratio decides.
    pub fn actor_despawned(
        &mut self,
        actor_id: ActorId,
        location: Option<WorldPoint>,
        health_ratio: f32,
    ) {
        if let Some(point) = location {
            self.tracker.update_location(actor_id, point);
        }
        self.deaths.despawned(
            &mut self.tracker,
            &self.registry,
            actor_id,
            health_ratio,
            self.tick,
        );
    }

    pub fn item_spawned(&mut self, tile: WorldPoint, item_id: u32, quantity: u32) {
        self.ledger.item_spawned(tile, item_id, quantity);
    }

    pub fn item_quantity_changed(
        &mut self,
        tile: WorldPoint,
        item_id: u32,
        old_quantity: u32,
        new_quantity: u32,
    ) {
        self.ledger
            .item_quantity_changed(tile, item_id, old_quantity, new_quantity);
    }

    pub fn tile_refreshed(&mut self, tile: WorldPoint, contents: Vec<ItemStack>) {
        self.ledger.refresh_tile(tile, contents);
    }

    /// Zone context flag from the host: suppress player-kill loot.
    pub fn set_player_loot_suppressed(&mut self, suppressed: bool) {
        self.suppress_player_loot = suppressed;
    }

    /// Session boundary housekeeping (login, region reload).
    pub fn session_changed(&mut self, change: SessionChange) {
        match change {
            SessionChange::RegionLoaded => self.ledger.reset(),
            SessionChange::LoggedOut => {
                self.ledger.reset();
                self.tracker.reset();
            }
        }
    }

    /// Tick boundary. Resolves every death collected this tick into
    /// loot records, rolls the ledger, and stores the observer's
    /// current location for next tick's spatial rules.
    pub fn end_tick(&mut self, observer_location: Option<WorldPoint>) -> Vec<LootAttribution> {
        let records = self.deaths.take();
        let out = self.attribute(records);
        self.ledger.end_tick();
        self.observer_last_tick = observer_location;
        self.tick += 1;
        out
    }

    fn attribute(&mut self, records: Vec<DeathRecord>) -> Vec<LootAttribution> {
        // Pass 1: per record, the positive delta it can claim at each
        // of its candidate tiles.
        let mut claims: Vec<Option<BTreeMap<WorldPoint, BTreeMap<u32, u32>>>> =
            Vec::with_capacity(records.len());
        let mut actors_at_tile: BTreeMap<WorldPoint, u32> = BTreeMap::new();

        for record in &records {
            if matches!(record.actor.kind, ActorKind::Player { .. }) && self.suppress_player_loot {
                log::debug!(
                    target: "attribution",
                    "[tick {}] player kill suppressed in this zone", self.tick
                );
                claims.push(None);
                continue;
            }

            let ctx = ResolveCtx {
                ledger: &self.ledger,
                observer_last_tick: self.observer_last_tick,
            };
            let mut tiles: BTreeMap<WorldPoint, BTreeMap<u32, u32>> = BTreeMap::new();
            for tile in resolver::candidates(&record.actor, &self.registry, &ctx) {
                if tiles.contains_key(&tile) {
                    continue;
                }
                let delta = self.ledger.diff(tile);
                if delta.is_empty() {
                    continue;
                }
                let mut by_id = BTreeMap::new();
                for stack in delta {
                    *by_id.entry(stack.item_id).or_insert(0) += stack.quantity;
                }
                tiles.insert(tile, by_id);
            }

            if tiles.is_empty() {
                // Absence of loot is a normal outcome, not an error.
                log::debug!(
                    target: "attribution",
                    "[tick {}] no loot found for {:?}", self.tick, record.actor.kind
                );
                claims.push(None);
                continue;
            }

            for tile in tiles.keys() {
                *actors_at_tile.entry(*tile).or_insert(0) += 1;
            }
            claims.push(Some(tiles));
        }

        // Pass 2: rank same-tile claimants in death order and hand out
        // fair-split shares of each tile's delta.
        let mut seen_at_tile: BTreeMap<WorldPoint, u32> = BTreeMap::new();
        let mut out = Vec::new();

        for (record, claim) in records.into_iter().zip(claims) {
            let Some(tiles) = claim else {
                continue;
            };
            let mut items: BTreeMap<u32, u32> = BTreeMap::new();
            let mut first_tile = None;
            for (tile, by_id) in tiles {
                first_tile.get_or_insert(tile);
                let kills = actors_at_tile[&tile];
                let rank = {
                    let seen = seen_at_tile.entry(tile).or_insert(0);
                    *seen += 1;
                    *seen
                };
                for (item_id, quantity) in by_id {
                    let share = fair_share(quantity, rank, kills);
                    if share > 0 {
                        *items.entry(item_id).or_insert(0) += share;
                    }
                }
            }
            if items.is_empty() {
                continue;
            }

            let location = record
                .actor
                .last_location
                .or(first_tile)
                .unwrap_or_default();
            let source = match record.actor.kind {
                ActorKind::Npc(snap) => LootSource::Npc(snap),
                ActorKind::Player { name } => LootSource::Player { name },
            };
            log::debug!(
                target: "attribution",
                "[tick {}] {:?} dropped {} stack(s) at {:?}",
                self.tick, source, items.len(), location
            );
            out.push(LootAttribution {
                source,
                location,
                tick: record.death_tick,
                items: items
                    .into_iter()
                    .map(|(id, q)| ItemStack::new(id, q))
                    .collect(),
            });
        }
        out
    }
}

/// Integer partition of `quantity` across `kills` ranks: rank `i` of
/// `k` receives `floor(q*i/k) - floor(q*(i-1)/k)`. Shares sum exactly
/// to `q` and any two differ by at most one.
#[inline]
fn fair_share(quantity: u32, rank: u32, kills: u32) -> u32 {
    let q = quantity as u64;
    let i = rank as u64;
    let k = kills as u64;
    (q * i / k - q * (i - 1) / k) as u32
}
