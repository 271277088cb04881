//! Many seeds, many bots, in parallel. Writes `summary.json`, CSV tables,
//! and replayable records for the best runs.

use crate::bots::bot_ids;
use crate::config::ArenaSettings;
use crate::runner::{run_named_bot, write_record, RunArtifact, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Score,
    Survival,
    Hybrid,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let score = f64::from(metrics.final_score);
        let frames = f64::from(metrics.frame_count);
        let lives = f64::from(metrics.final_lives.max(0));
        match self {
            Self::Score => score + frames * 0.05 + lives * 100.0,
            Self::Survival => frames + lives * 600.0 + score * 0.1,
            Self::Hybrid => score * 0.7 + frames * 0.5 + lives * 250.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Survival => "survival",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u32,
    pub arena: ArenaSettings,
    pub objective: Objective,
    pub out_dir: PathBuf,
    pub save_top: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRow {
    pub bot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_lives: i32,
    pub final_wave: u32,
    pub game_over: bool,
    pub objective_value: f64,
    pub fire_frames: u32,
    pub hyperspace_frames: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub max_frames: u32,
    pub avg_wave: f64,
    /// Share of runs that reached the frame cap without a game over.
    pub survival_rate: f64,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedRun {
    pub rank: usize,
    pub bot_id: String,
    pub seed_hex: String,
    pub score: u32,
    pub frames: u32,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub max_frames: u32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub frame_dt: f32,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRow>,
    pub saved_runs: Vec<SavedRun>,
}

struct ScoredRun {
    artifact: RunArtifact,
    objective_value: f64,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(bot_ids().iter().map(|id| (*id).to_string()).collect());
    };
    let bots: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if bots.is_empty() {
        return Err(anyhow!("--bots resolved to empty list"));
    }
    let known = bot_ids();
    if let Some(unknown) = bots.iter().find(|id| !known.iter().any(|k| *k == id.as_str())) {
        return Err(anyhow!(
            "unknown bot '{unknown}'. available: {}",
            known.join(", ")
        ));
    }
    Ok(bots)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();
    tracing::info!(
        runs = run_jobs.len(),
        objective = config.objective.as_str(),
        "starting benchmark"
    );

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<ScoredRun> {
        let artifact = run_named_bot(
            bot_id,
            config.arena.sim_config(*seed),
            config.max_frames,
            config.arena.frame_dt,
        )
        .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))?;
        let objective_value = config.objective.run_value(&artifact.metrics);
        Ok(ScoredRun {
            artifact,
            objective_value,
        })
    };

    let results: Vec<Result<ScoredRun>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };
    let mut runs = results.into_iter().collect::<Result<Vec<_>>>()?;

    runs.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.artifact.metrics.final_score.cmp(&a.artifact.metrics.final_score))
            .then_with(|| b.artifact.metrics.frame_count.cmp(&a.artifact.metrics.frame_count))
            .then_with(|| a.artifact.metrics.bot_id.cmp(&b.artifact.metrics.bot_id))
            .then_with(|| a.artifact.metrics.seed.cmp(&b.artifact.metrics.seed))
    });

    let rankings = rank_bots(&runs, config.max_frames);
    let rows: Vec<RunRow> = runs.iter().map(run_row).collect();
    let saved_runs = save_top_runs(&config.out_dir, &runs, config.save_top)?;

    write_runs_csv(&config.out_dir.join("runs.csv"), &rows)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        max_frames: config.max_frames,
        arena_width: config.arena.width,
        arena_height: config.arena.height,
        frame_dt: config.arena.frame_dt,
        jobs: config.jobs,
        bots: config.bots,
        seeds: config.seeds,
        run_count: rows.len(),
        bot_rankings: rankings,
        runs: rows,
        saved_runs,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn run_row(run: &ScoredRun) -> RunRow {
    let m = &run.artifact.metrics;
    RunRow {
        bot_id: m.bot_id.clone(),
        seed: m.seed,
        seed_hex: seed_to_hex(m.seed),
        frame_count: m.frame_count,
        final_score: m.final_score,
        final_lives: m.final_lives,
        final_wave: m.final_wave,
        game_over: m.game_over,
        objective_value: run.objective_value,
        fire_frames: m.fire_frames,
        hyperspace_frames: m.hyperspace_frames,
    }
}

/// Best objective first; ties fall back to score, then id.
fn rank_bots(runs: &[ScoredRun], frame_cap: u32) -> Vec<BotAggregate> {
    let mut grouped: BTreeMap<&str, Vec<&ScoredRun>> = BTreeMap::new();
    for run in runs {
        grouped
            .entry(run.artifact.metrics.bot_id.as_str())
            .or_default()
            .push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| {
            let n = bot_runs.len() as f64;
            let metrics = || bot_runs.iter().map(|r| &r.artifact.metrics);
            let survived = metrics()
                .filter(|m| !m.game_over && m.frame_count >= frame_cap)
                .count();
            BotAggregate {
                bot_id: bot_id.to_string(),
                bot_fingerprint: metrics()
                    .next()
                    .map(|m| m.bot_fingerprint.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                runs: bot_runs.len(),
                avg_score: metrics().map(|m| f64::from(m.final_score)).sum::<f64>() / n,
                max_score: metrics().map(|m| m.final_score).max().unwrap_or_default(),
                avg_frames: metrics().map(|m| f64::from(m.frame_count)).sum::<f64>() / n,
                max_frames: metrics().map(|m| m.frame_count).max().unwrap_or_default(),
                avg_wave: metrics().map(|m| f64::from(m.final_wave)).sum::<f64>() / n,
                survival_rate: survived as f64 / n,
                objective_value: bot_runs.iter().map(|r| r.objective_value).sum::<f64>() / n,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

/// `runs` must already be sorted best first.
fn save_top_runs(out_dir: &Path, runs: &[ScoredRun], count: usize) -> Result<Vec<SavedRun>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let save_dir = out_dir.join("top-runs");
    let mut saved = Vec::new();
    for (idx, run) in runs.iter().take(count).enumerate() {
        let rank = idx + 1;
        let m = &run.artifact.metrics;
        let path = save_dir.join(format!(
            "rank{rank:02}-{}-seed{:08x}-score{}-frames{}.json",
            m.bot_id, m.seed, m.final_score, m.frame_count
        ));
        write_record(&path, &run.artifact.to_record())?;
        saved.push(SavedRun {
            rank,
            bot_id: m.bot_id.clone(),
            seed_hex: seed_to_hex(m.seed),
            score: m.final_score,
            frames: m.frame_count,
            path: path.to_string_lossy().into_owned(),
        });
    }
    Ok(saved)
}

fn write_runs_csv(path: &Path, rows: &[RunRow]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,seed_hex,frame_count,final_score,final_lives,final_wave,game_over,objective_value,fire_frames,hyperspace_frames\n",
    );
    for row in rows {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{:.2},{},{}",
            row.bot_id,
            row.seed_hex,
            row.frame_count,
            row.final_score,
            row.final_lives,
            row.final_wave,
            row.game_over,
            row.objective_value,
            row.fire_frames,
            row.hyperspace_frames
        );
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,runs,avg_score,max_score,avg_frames,max_frames,avg_wave,survival_rate,objective_value\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        let _ = writeln!(
            csv,
            "{},{},{},{:.2},{},{:.2},{},{:.2},{:.4},{:.2}",
            idx + 1,
            row.bot_id,
            row.runs,
            row.avg_score,
            row.max_score,
            row.avg_frames,
            row.max_frames,
            row.avg_wave,
            row.survival_rate,
            row.objective_value
        );
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
