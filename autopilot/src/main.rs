use anyhow::{anyhow, Context, Result};
use arena_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, Objective};
use arena_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use arena_autopilot::config::ArenaSettings;
use arena_autopilot::runner::{read_record, run_named_bot, verify_record, write_record};
use arena_autopilot::util::{
    parse_seed, parse_seed_csv, parse_seed_file, seed_sequence, seed_to_hex, DEFAULT_SEED_START,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "arena-autopilot")]
#[command(about = "Headless pilots for the arena shooter: play, benchmark, and re-verify runs")]
struct Cli {
    #[command(flatten)]
    arena: ArenaArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for `ARENA_WIDTH`, `ARENA_HEIGHT` and `ARENA_FRAME_DT`.
#[derive(Args, Debug)]
struct ArenaArgs {
    #[arg(long, global = true)]
    width: Option<f32>,
    #[arg(long, global = true)]
    height: Option<f32>,
    #[arg(long, global = true)]
    frame_dt: Option<f32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots {
        /// Print the full manifest (tuning + fingerprints) as JSON
        #[arg(long)]
        manifest: bool,
    },
    /// Play one seeded game with a bot and save the run record
    Run {
        #[arg(long)]
        bot: String,
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 18_000)]
        max_frames: u32,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Verify a saved run record by strict re-simulation
    VerifyRun {
        #[arg(long)]
        input: PathBuf,
    },
    /// Run many seeds across one or more bots in parallel
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 18_000)]
        max_frames: u32,
        #[arg(long, value_enum, default_value_t = CliObjective::Score)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Score,
    Survival,
    Hybrid,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Score => Objective::Score,
            CliObjective::Survival => Objective::Survival,
            CliObjective::Hybrid => Objective::Hybrid,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { arena, command } = Cli::parse();
    let settings =
        ArenaSettings::from_env().with_overrides(arena.width, arena.height, arena.frame_dt);

    match command {
        Commands::ListBots { manifest } => {
            if manifest {
                let encoded = serde_json::to_vec_pretty(&bot_manifest_entries())?;
                println!("{}", String::from_utf8_lossy(&encoded));
            } else {
                for (id, description) in describe_bots() {
                    println!("{id:18} {description}");
                }
            }
        }
        Commands::Run {
            bot,
            seed,
            max_frames,
            output,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let seed = parse_seed(&seed)?;
            let artifact =
                run_named_bot(&bot, settings.sim_config(seed), max_frames, settings.frame_dt)?;
            let m = &artifact.metrics;
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "runs/{}-{}-score{}-frames{}.json",
                    bot,
                    seed_to_hex(seed).replace("0x", "seed"),
                    m.final_score,
                    m.frame_count
                ))
            });
            write_record(&output_path, &artifact.to_record())?;

            println!("bot={}", m.bot_id);
            println!("bot_fingerprint={}", m.bot_fingerprint);
            println!("seed={}", seed_to_hex(seed));
            println!("arena={}x{}", settings.width, settings.height);
            println!("frame_dt={}", settings.frame_dt);
            println!("frames={}", m.frame_count);
            println!("score={}", m.final_score);
            println!("lives={}", m.final_lives);
            println!("wave={}", m.final_wave);
            println!("game_over={}", m.game_over);
            println!("rng={:#010x}", m.final_rng_state);
            println!("output={}", output_path.display());
        }
        Commands::VerifyRun { input } => {
            let record = read_record(&input)?;
            let result = verify_record(&record)
                .with_context(|| format!("verification failed for {}", input.display()))?;
            println!("input={}", input.display());
            println!("bot={}", record.bot_id);
            println!("seed={}", record.seed_hex);
            println!("frame_count={}", result.frame_count);
            println!("final_score={}", result.final_score);
            println!("final_wave={}", result.final_wave);
            println!("final_rng_state={:#010x}", result.final_rng_state);
            println!("verified=true");
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_frames,
            objective,
            out_dir,
            save_top,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let objective: Objective = objective.into();
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "benchmarks/{}-{}",
                    objective.as_str(),
                    timestamp_suffix()
                ))
            });

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_frames,
                arena: settings,
                objective,
                out_dir: out_dir.clone(),
                save_top,
                jobs,
            })?;

            println!("objective={}", objective.as_str());
            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("rankings:");
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "  {}. {:18} objective={:.1} avg_score={:.1} max_score={} avg_frames={:.1} survival={:.0}%",
                    idx + 1,
                    bot.bot_id,
                    bot.objective_value,
                    bot.avg_score,
                    bot.max_score,
                    bot.avg_frames,
                    bot.survival_rate * 100.0,
                );
            }
            if !report.saved_runs.is_empty() {
                println!("saved runs:");
                for run in &report.saved_runs {
                    println!(
                        "  #{:02} {} {} score={} frames={} {}",
                        run.rank, run.bot_id, run.seed_hex, run.score, run.frames, run.path
                    );
                }
            }
        }
    }

    Ok(())
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => DEFAULT_SEED_START,
    };
    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    Ok(seed_sequence(start, seed_count))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
