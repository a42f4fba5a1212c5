//! Replay a recorded event trace through the attribution engine and
//! print what each kill dropped.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use dropwatch::{
    ActorKind, AttributionEngine, ItemStack, LootSource, NpcSnapshot, SessionChange, WorldEvent,
};
use dropwatch_grid::WorldPoint;
use dropwatch_npcs::NpcRegistry;

#[derive(Parser)]
#[command(name = "dropwatch", about = "Replay a simulation trace and attribute loot")]
struct Args {
    /// TOML event trace to replay
    trace: PathBuf,
    /// NPC profile registry (defaults to the built-in profiles)
    #[arg(long)]
    npcs: Option<PathBuf>,
}

#[derive(Deserialize)]
struct Trace {
    ticks: Vec<TraceTick>,
}

#[derive(Deserialize)]
struct TraceTick {
    /// Observer location at this tick's boundary, `[x, y, plane]`.
    #[serde(default)]
    observer: Option<[i32; 3]>,
    #[serde(default)]
    events: Vec<TraceEvent>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TraceEvent {
    Interaction {
        actor: u64,
        #[serde(default)]
        npc: Option<u32>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        size: Option<i32>,
        #[serde(default)]
        at: Option<[i32; 3]>,
    },
    Animation {
        actor: u64,
        animation: u32,
        #[serde(default)]
        at: Option<[i32; 3]>,
    },
    Despawn {
        actor: u64,
        health_ratio: f32,
        #[serde(default)]
        at: Option<[i32; 3]>,
    },
    ItemSpawned {
        at: [i32; 3],
        item: u32,
        qty: u32,
    },
    QuantityChanged {
        at: [i32; 3],
        item: u32,
        old: u32,
        new: u32,
    },
    TileRefreshed {
        at: [i32; 3],
        items: Vec<[u32; 2]>,
    },
    SuppressPlayerLoot {
        on: bool,
    },
    RegionLoaded,
    LoggedOut,
}

fn point(p: [i32; 3]) -> WorldPoint {
    WorldPoint::new(p[0], p[1], p[2])
}

impl TraceEvent {
    fn into_event(self) -> WorldEvent {
        match self {
            TraceEvent::Interaction {
                actor,
                npc,
                name,
                size,
                at,
            } => {
                let kind = match npc {
                    Some(composition_id) => ActorKind::Npc(NpcSnapshot {
                        composition_id,
                        name: name.unwrap_or_default(),
                        size: size.unwrap_or(1),
                    }),
                    None => ActorKind::Player {
                        name: name.unwrap_or_default(),
                    },
                };
                WorldEvent::InteractionChanged {
                    target: Some((actor, kind, at.map(point))),
                }
            }
            TraceEvent::Animation {
                actor,
                animation,
                at,
            } => WorldEvent::AnimationChanged {
                actor,
                animation_id: animation,
                location: at.map(point),
            },
            TraceEvent::Despawn {
                actor,
                health_ratio,
                at,
            } => WorldEvent::ActorDespawned {
                actor,
                location: at.map(point),
                health_ratio,
            },
            TraceEvent::ItemSpawned { at, item, qty } => WorldEvent::ItemSpawned {
                tile: point(at),
                item_id: item,
                quantity: qty,
            },
            TraceEvent::QuantityChanged { at, item, old, new } => {
                WorldEvent::ItemQuantityChanged {
                    tile: point(at),
                    item_id: item,
                    old_quantity: old,
                    new_quantity: new,
                }
            }
            TraceEvent::TileRefreshed { at, items } => WorldEvent::TileRefreshed {
                tile: point(at),
                contents: items
                    .into_iter()
                    .map(|[id, qty]| ItemStack::new(id, qty))
                    .collect(),
            },
            TraceEvent::SuppressPlayerLoot { on } => {
                WorldEvent::PlayerLootSuppressed { suppressed: on }
            }
            TraceEvent::RegionLoaded => WorldEvent::Session {
                change: SessionChange::RegionLoaded,
            },
            TraceEvent::LoggedOut => WorldEvent::Session {
                change: SessionChange::LoggedOut,
            },
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let registry = match &args.npcs {
        Some(path) => NpcRegistry::from_path(path)?,
        None => NpcRegistry::builtin()?,
    };
    let trace: Trace = toml::from_str(&std::fs::read_to_string(&args.trace)?)?;

    let mut engine = AttributionEngine::new(registry);
    for tick in trace.ticks {
        let now = engine.tick();
        for event in tick.events {
            event.into_event().apply(&mut engine);
        }
        let records = engine.end_tick(tick.observer.map(point));
        for record in records {
            let who = match &record.source {
                LootSource::Npc(snap) => format!("{} (composition {})", snap.name, snap.composition_id),
                LootSource::Player { name } => format!("player {name}"),
            };
            println!(
                "tick {now}: {who} at ({}, {}, {})",
                record.location.x, record.location.y, record.location.plane
            );
            for stack in &record.items {
                println!("  {}x item {}", stack.quantity, stack.item_id);
            }
        }
    }
    Ok(())
}
