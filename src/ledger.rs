//! Per-tile ground inventory, diffed tick-over-tick.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};

use dropwatch_grid::WorldPoint;

use crate::records::ItemStack;

/// Tracks ground contents per tile and answers "what appeared here
/// this tick". Only tiles flagged changed are ever diffed: a full
/// region reload touches every tile in the scene, and coalescing those
/// touches into a flag set keeps the tick boundary cheap.
#[derive(Default)]
pub struct GroundLedger {
    /// Contents as of the end of last tick, for tiles seen so far.
    previous: HashMap<WorldPoint, Vec<ItemStack>>,
    /// Contents as events have reported them this tick.
    current: HashMap<WorldPoint, Vec<ItemStack>>,
    changed: HashSet<WorldPoint>,
}

impl GroundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new stack appeared on the tile.
    pub fn item_spawned(&mut self, tile: WorldPoint, item_id: u32, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.touch(tile).push(ItemStack::new(item_id, quantity));
        self.changed.insert(tile);
        log::trace!(target: "ledger", "spawn {}x {} at {:?}", quantity, item_id, tile);
    }

    /// An existing stack changed size (partial pickup, stack growth).
    pub fn item_quantity_changed(
        &mut self,
        tile: WorldPoint,
        item_id: u32,
        old_quantity: u32,
        new_quantity: u32,
    ) {
        let stacks = self.touch(tile);
        let pos = stacks
            .iter()
            .position(|s| s.item_id == item_id && s.quantity == old_quantity);
        match pos {
            Some(i) if new_quantity > 0 => stacks[i].quantity = new_quantity,
            Some(i) => {
                stacks.remove(i);
            }
            // Missed the spawn event; record what we know now.
            None if new_quantity > 0 => stacks.push(ItemStack::new(item_id, new_quantity)),
            None => {}
        }
        self.changed.insert(tile);
    }

    /// The host re-reported the tile's full item layer.
    pub fn refresh_tile(&mut self, tile: WorldPoint, contents: Vec<ItemStack>) {
        self.current.insert(tile, contents);
        self.changed.insert(tile);
    }

    /// Positive per-item delta of this tick's contents against last
    /// tick's, sorted by item id. Empty for tiles not flagged changed.
    /// Pure: repeated calls without intervening mutation agree.
    pub fn diff(&self, tile: WorldPoint) -> Vec<ItemStack> {
        if !self.changed.contains(&tile) {
            return Vec::new();
        }
        let mut by_id: BTreeMap<u32, i64> = BTreeMap::new();
        if let Some(prev) = self.previous.get(&tile) {
            for s in prev {
                *by_id.entry(s.item_id).or_insert(0) -= s.quantity as i64;
            }
        }
        if let Some(curr) = self.current.get(&tile) {
            for s in curr {
                *by_id.entry(s.item_id).or_insert(0) += s.quantity as i64;
            }
        }
        by_id
            .into_iter()
            .filter(|&(_, q)| q > 0)
            .map(|(id, q)| ItemStack::new(id, q as u32))
            .collect()
    }

    /// Tiles flagged changed this tick, in unspecified order.
    pub fn changed_tiles(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.changed.iter().copied()
    }

    /// Current contents of a tile as reported this tick.
    pub fn contents(&self, tile: WorldPoint) -> &[ItemStack] {
        self.current.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roll current snapshots over previous ones and clear the flag
    /// set. Tiles left empty are dropped from both maps.
    pub fn end_tick(&mut self) {
        for tile in self.changed.drain() {
            match self.current.get(&tile) {
                Some(stacks) if !stacks.is_empty() => {
                    self.previous.insert(tile, stacks.clone());
                }
                _ => {
                    self.previous.remove(&tile);
                    self.current.remove(&tile);
                }
            }
        }
    }

    /// Forget everything (region reload, logout).
    pub fn reset(&mut self) {
        self.previous.clear();
        self.current.clear();
        self.changed.clear();
    }

    fn touch(&mut self, tile: WorldPoint) -> &mut Vec<ItemStack> {
        // First touch this tick starts from last tick's contents so a
        // lone quantity-change event still sees the old stack.
        self.current.entry(tile).or_insert_with(|| {
            self.previous.get(&tile).cloned().unwrap_or_default()
        })
    }
}
