//! Tick-synchronous loot attribution for an observed game simulation.
//!
//! Every tick the host feeds actor and ground-item events into an
//! [`AttributionEngine`]; at the tick boundary the engine decides which
//! freshly appeared ground items belong to which actor that just died,
//! splitting shared tiles fairly between simultaneous kills.
#![forbid(unsafe_code)]

pub mod deaths;
pub mod engine;
pub mod event;
pub mod ledger;
pub mod records;
pub mod resolver;
pub mod tracker;

pub use engine::AttributionEngine;
pub use event::{SessionChange, WorldEvent};
pub use records::{ItemStack, LootAttribution, LootSource};
pub use tracker::{ActorId, ActorKind, MemorizedActor, NpcSnapshot};
