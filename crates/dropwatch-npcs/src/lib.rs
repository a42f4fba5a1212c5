//! NPC profile registry: death signals and drop-location rules, loaded from TOML.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;

pub use config::{NpcDef, NpcsConfig};
pub use registry::{DropRule, NpcProfile, NpcRegistry};

/// Profiles shipped with the crate. Covers the bosses with special
/// drop behavior plus the NPC families that signal death through an
/// animation or a non-zero health readout.
pub const DEFAULT_PROFILES: &str = include_str!("../profiles.toml");
