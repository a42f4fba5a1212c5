use dropwatch_grid::WorldPoint;

use crate::tracker::NpcSnapshot;

/// One kind of item with a positive count. Emitted stacks of the same
/// item id at the same tile/tick are summed before the record leaves
/// the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: u32,
    pub quantity: u32,
}

impl ItemStack {
    #[inline]
    pub const fn new(item_id: u32, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}

/// Who the loot is attributed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LootSource {
    Npc(NpcSnapshot),
    Player { name: String },
}

/// The engine's sole output: one resolved kill with its drop. Handed
/// off to persistence/notification collaborators as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LootAttribution {
    pub source: LootSource,
    pub location: WorldPoint,
    pub tick: u64,
    /// Sorted by item id, every quantity strictly positive.
    pub items: Vec<ItemStack>,
}

impl LootAttribution {
    pub fn quantity_of(&self, item_id: u32) -> u32 {
        self.items
            .iter()
            .find(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|s| s.quantity as u64).sum()
    }
}
