use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::NpcsConfig;

/// Where a composition materializes its drop relative to where it died.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DropRule {
    /// Drop lands on the death tile (large footprints also check a
    /// center-offset tile; the resolver handles that).
    Default,
    /// Drop lands on the observing player's last-tick tile.
    ObserverTile,
    /// Drop tile is decided at death-animation start and stored on the
    /// memorized actor; the despawn tile is misleading.
    Precomputed,
    /// Drop lands a fixed vector away from the death tile.
    FixedOffset { dx: i32, dy: i32 },
    /// Drop lands on whichever changed tile holds this marker item,
    /// preferring the tile farthest from the observer.
    MarkerItem { item_id: u32 },
    /// Base offset nudged toward the observer on each axis independently.
    TowardObserver { dx: i32, dy: i32, nudge: i32 },
}

impl Default for DropRule {
    fn default() -> Self {
        DropRule::Default
    }
}

#[derive(Clone, Debug)]
pub struct NpcProfile {
    pub name: String,
    pub ids: Vec<u32>,
    pub death_animation: Option<u32>,
    pub death_health_percent: f32,
    pub drop_rule: DropRule,
}

/// Lookup table from composition id to profile. Compositions absent
/// from the table fall through to default behavior everywhere.
#[derive(Default)]
pub struct NpcRegistry {
    profiles: Vec<NpcProfile>,
    by_id: HashMap<u32, usize>,
}

impl NpcRegistry {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: NpcsConfig = toml::from_str(toml_str)?;
        let mut reg = NpcRegistry::default();
        for def in cfg.npcs {
            let idx = reg.profiles.len();
            for &id in &def.ids {
                reg.by_id.insert(id, idx);
            }
            reg.profiles.push(NpcProfile {
                name: def.name,
                ids: def.ids,
                death_animation: def.death_animation,
                death_health_percent: def.death_health_percent.unwrap_or(0.0),
                drop_rule: def.drop.unwrap_or_default(),
            });
        }
        Ok(reg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Registry built from the profiles shipped with the crate.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(crate::DEFAULT_PROFILES)
    }

    pub fn profile(&self, composition_id: u32) -> Option<&NpcProfile> {
        self.by_id
            .get(&composition_id)
            .map(|&idx| &self.profiles[idx])
    }

    /// Death animation id for this composition, if it signals death
    /// through an animation rather than a despawn.
    pub fn death_animation(&self, composition_id: u32) -> Option<u32> {
        self.profile(composition_id).and_then(|p| p.death_animation)
    }

    /// Health ratio at or below which a despawned NPC counts as dead.
    /// Zero for every composition without a configured readout quirk.
    pub fn death_health_percent(&self, composition_id: u32) -> f32 {
        self.profile(composition_id)
            .map(|p| p.death_health_percent)
            .unwrap_or(0.0)
    }

    pub fn drop_rule(&self, composition_id: u32) -> DropRule {
        self.profile(composition_id)
            .map(|p| p.drop_rule)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
