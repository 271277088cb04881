//! Drives one bot through one seeded game and records what it pressed.

use crate::bots::{bot_fingerprint, create_bot, AutopilotBot};
use crate::util::{decode_inputs, encode_inputs, seed_to_hex};
use anyhow::{anyhow, Context, Result};
use arena_core::{encode_input_byte, replay_strict, Command, ReplayResult, SimConfig, Simulation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Record files carry this so stale formats are rejected loudly.
pub const RECORD_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_rng_state: u32,
    pub final_lives: i32,
    pub final_wave: u32,
    pub game_over: bool,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
    pub hyperspace_frames: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub config: SimConfig,
    pub frame_dt: f32,
    pub inputs: Vec<u8>,
    pub result: ReplayResult,
}

/// On-disk form of a run: enough to re-simulate it and check the outcome.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub version: u32,
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed_hex: String,
    pub config: SimConfig,
    pub frame_dt: f32,
    pub inputs_b64: String,
    pub result: ReplayResult,
}

impl RunArtifact {
    pub fn to_record(&self) -> RunRecord {
        RunRecord {
            version: RECORD_VERSION,
            bot_id: self.metrics.bot_id.clone(),
            bot_fingerprint: self.metrics.bot_fingerprint.clone(),
            seed_hex: seed_to_hex(self.config.seed),
            config: self.config,
            frame_dt: self.frame_dt,
            inputs_b64: encode_inputs(&self.inputs),
            result: self.result,
        }
    }
}

pub fn run_named_bot(
    bot_id: &str,
    config: SimConfig,
    max_frames: u32,
    frame_dt: f32,
) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot(bot.as_mut(), config, max_frames, frame_dt)
}

/// Plays until game over or `max_frames`, then replays the recorded inputs
/// in strict mode and insists on the same outcome.
pub fn run_bot(
    bot: &mut dyn AutopilotBot,
    config: SimConfig,
    max_frames: u32,
    frame_dt: f32,
) -> Result<RunArtifact> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }
    if !frame_dt.is_finite() || frame_dt <= 0.0 {
        return Err(anyhow!("frame dt must be finite and positive: got {frame_dt}"));
    }

    let mut game = Simulation::new(config).context("invalid arena configuration")?;
    game.handle_command(Command::StartGame);
    game.validate_invariants()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;
    bot.reset(config.seed);

    let mut snapshot = game.snapshot();
    let mut inputs = Vec::with_capacity(max_frames as usize);
    while snapshot.frame_count < max_frames && !snapshot.is_game_over() {
        let input = bot.next_input(&snapshot);
        inputs.push(encode_input_byte(input));
        game.step(input, frame_dt);
        snapshot = game.snapshot();
    }

    let result = game.result();
    let replayed = replay_strict(config, &inputs, frame_dt)
        .map_err(|err| anyhow!("recorded run failed strict replay: {err}"))?;
    if replayed != result {
        return Err(anyhow!(
            "strict replay diverged: live={result:?} replay={replayed:?}"
        ));
    }

    tracing::debug!(
        bot = bot.id(),
        seed = %seed_to_hex(config.seed),
        frames = result.frame_count,
        score = result.final_score,
        "run finished"
    );

    let mut metrics = RunMetrics {
        bot_id: bot.id().to_string(),
        bot_fingerprint: bot_fingerprint(bot.id()).unwrap_or_else(|| "unknown".to_string()),
        seed: config.seed,
        max_frames,
        frame_count: result.frame_count,
        final_score: result.final_score,
        final_rng_state: result.final_rng_state,
        final_lives: result.final_lives,
        final_wave: result.final_wave,
        game_over: snapshot.is_game_over(),
        action_frames: 0,
        turn_frames: 0,
        thrust_frames: 0,
        fire_frames: 0,
        hyperspace_frames: 0,
    };
    for byte in &inputs {
        if *byte != 0 {
            metrics.action_frames += 1;
        }
        if (*byte & 0x03) != 0 {
            metrics.turn_frames += 1;
        }
        if (*byte & 0x04) != 0 {
            metrics.thrust_frames += 1;
        }
        if (*byte & 0x08) != 0 {
            metrics.fire_frames += 1;
        }
        if (*byte & 0x10) != 0 {
            metrics.hyperspace_frames += 1;
        }
    }

    Ok(RunArtifact {
        metrics,
        config,
        frame_dt,
        inputs,
        result,
    })
}

pub fn write_record(path: &Path, record: &RunRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(record).context("failed to serialize run record")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}

pub fn read_record(path: &Path) -> Result<RunRecord> {
    let raw = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    let record: RunRecord = serde_json::from_slice(&raw)
        .with_context(|| format!("invalid run record json: {}", path.display()))?;
    if record.version != RECORD_VERSION {
        return Err(anyhow!(
            "unsupported run record version {} (expected {RECORD_VERSION})",
            record.version
        ));
    }
    Ok(record)
}

/// Re-simulates a record in strict mode. Errors if the replay is rejected
/// or lands on a different result than the one recorded.
pub fn verify_record(record: &RunRecord) -> Result<ReplayResult> {
    let inputs = decode_inputs(&record.inputs_b64)?;
    let replayed = replay_strict(record.config, &inputs, record.frame_dt)
        .map_err(|err| anyhow!("strict replay rejected run: {err}"))?;
    if replayed != record.result {
        return Err(anyhow!(
            "replay mismatch: recorded={:?} replayed={replayed:?}",
            record.result
        ));
    }
    Ok(replayed)
}
