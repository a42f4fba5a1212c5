use serde::Deserialize;

use crate::registry::DropRule;

/// On-disk shape of a profile entry. One entry may cover several
/// composition ids (recolors and phase variants share behavior).
#[derive(Deserialize)]
pub struct NpcDef {
    pub name: String,
    pub ids: Vec<u32>,
    #[serde(default)]
    pub death_animation: Option<u32>,
    /// Health ratio this NPC reports at its true zero-health point.
    #[serde(default)]
    pub death_health_percent: Option<f32>,
    #[serde(default)]
    pub drop: Option<DropRule>,
}

#[derive(Deserialize)]
pub struct NpcsConfig {
    pub npcs: Vec<NpcDef>,
}
