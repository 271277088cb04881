//! Scripted pilots and the roster that names them.

use arena_core::{FrameInput, GameMode, WorldSnapshot};
use arena_core::player::Lifecycle;
use serde::Serialize;

mod hunter;
mod simple;

pub use hunter::{HunterBot, HunterConfig};
pub use simple::{IdleBot, SpinnerBot};

/// A pilot sees one snapshot per frame and answers with held keys.
///
/// Bots must be deterministic given `reset(seed)` and the snapshot
/// sequence, or recorded runs stop replaying.
pub trait AutopilotBot: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, world: &WorldSnapshot) -> FrameInput;
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

pub(crate) fn no_input() -> FrameInput {
    FrameInput::default()
}

/// True when the ship can take orders this frame.
pub(crate) fn can_control(world: &WorldSnapshot) -> bool {
    world.mode == GameMode::Playing && world.player.lifecycle == Lifecycle::Active
}

pub fn bot_ids() -> Vec<&'static str> {
    describe_bots().into_iter().map(|(id, _)| id).collect()
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    let mut out = vec![
        (IdleBot::ID, IdleBot::DESCRIPTION),
        (SpinnerBot::ID, SpinnerBot::DESCRIPTION),
    ];
    out.extend(
        hunter::hunter_configs()
            .iter()
            .map(|cfg| (cfg.id, cfg.description)),
    );
    out
}

pub fn create_bot(id: &str) -> Option<Box<dyn AutopilotBot>> {
    match id {
        IdleBot::ID => return Some(Box::new(IdleBot)),
        SpinnerBot::ID => return Some(Box::new(SpinnerBot::default())),
        _ => {}
    }
    hunter::hunter_configs()
        .iter()
        .find(|cfg| cfg.id == id)
        .map(|cfg| Box::new(HunterBot::new(*cfg)) as Box<dyn AutopilotBot>)
}

/// FNV-1a over the canonical JSON encoding of a bot's tuning.
fn hash_json(value: &serde_json::Value) -> String {
    let encoded = value.to_string().into_bytes();
    let digest = encoded
        .iter()
        .fold(0x811c_9dc5u32, |acc, b| (acc ^ u32::from(*b)).wrapping_mul(0x0100_0193));
    format!("fnv1a:{digest:08x}:len:{}", encoded.len())
}

pub fn bot_manifest_entries() -> Vec<BotManifestEntry> {
    let mut out = Vec::new();

    for (id, description) in [
        (IdleBot::ID, IdleBot::DESCRIPTION),
        (SpinnerBot::ID, SpinnerBot::DESCRIPTION),
    ] {
        let config = serde_json::json!({ "id": id });
        out.push(BotManifestEntry {
            id: id.to_string(),
            family: "scripted".to_string(),
            description: description.to_string(),
            config_hash: hash_json(&config),
            config,
        });
    }

    for cfg in hunter::hunter_configs() {
        let Ok(config) = serde_json::to_value(cfg) else {
            continue;
        };
        out.push(BotManifestEntry {
            id: cfg.id.to_string(),
            family: "hunter".to_string(),
            description: cfg.description.to_string(),
            config_hash: hash_json(&config),
            config,
        });
    }

    out
}

pub fn bot_fingerprint(id: &str) -> Option<String> {
    bot_manifest_entries()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.config_hash)
}
