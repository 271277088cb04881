use anyhow::Result;
use arena_autopilot::benchmark::{run_benchmark, BenchmarkConfig, BenchmarkReport, Objective};
use arena_autopilot::bots::bot_ids;
use arena_autopilot::config::ArenaSettings;
use arena_autopilot::runner::{read_record, run_named_bot, verify_record, write_record, RunRecord};
use arena_core::constants::FIXED_FRAME_DT;
use arena_core::{replay, SimConfig};
use std::fs;

#[test]
fn every_bot_produces_a_strictly_replayable_run() -> Result<()> {
    for bot in bot_ids() {
        let artifact = run_named_bot(bot, SimConfig::with_seed(0x5EED_0001), 900, FIXED_FRAME_DT)?;
        assert!(artifact.metrics.frame_count <= 900);
        assert_eq!(artifact.inputs.len() as u32, artifact.metrics.frame_count);

        let lenient = replay(artifact.config, &artifact.inputs, artifact.frame_dt)?;
        assert_eq!(lenient, artifact.result, "bot {bot}");
    }
    Ok(())
}

#[test]
fn same_bot_same_seed_same_inputs() -> Result<()> {
    let config = SimConfig::with_seed(0xC0FF_EE00);
    let a = run_named_bot("hunter", config, 1_200, FIXED_FRAME_DT)?;
    let b = run_named_bot("hunter", config, 1_200, FIXED_FRAME_DT)?;
    assert_eq!(a.inputs, b.inputs);
    assert_eq!(a.metrics, b.metrics);
    Ok(())
}

#[test]
fn idle_bot_runs_to_game_over_or_cap() -> Result<()> {
    let artifact = run_named_bot("idle", SimConfig::with_seed(3), 36_000, FIXED_FRAME_DT)?;
    let m = &artifact.metrics;
    assert_eq!(m.action_frames, 0);
    assert_eq!(m.final_score, 0);
    assert!(m.game_over || m.frame_count == 36_000);
    if m.game_over {
        assert_eq!(m.final_lives, 0);
    }
    Ok(())
}

#[test]
fn record_round_trips_through_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = run_named_bot("spinner", SimConfig::with_seed(21), 600, FIXED_FRAME_DT)?;
    let record = artifact.to_record();
    let path = dir.path().join("nested").join("run.json");

    write_record(&path, &record)?;
    let loaded = read_record(&path)?;
    assert_eq!(loaded, record);
    assert_eq!(verify_record(&loaded)?, artifact.result);

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;
    assert_eq!(json["bot_id"], "spinner");
    assert_eq!(json["seed_hex"], "0x00000015");
    assert_eq!(json["result"]["frame_count"], artifact.result.frame_count);
    assert!(json["inputs_b64"].is_string());
    Ok(())
}

#[test]
fn unknown_record_version_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = run_named_bot("idle", SimConfig::with_seed(5), 30, FIXED_FRAME_DT)?;
    let record = RunRecord {
        version: 99,
        ..artifact.to_record()
    };
    let path = dir.path().join("future.json");
    write_record(&path, &record)?;
    let err = read_record(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported run record version 99"));

    fs::write(&path, b"{ not json")?;
    assert!(read_record(&path).is_err());
    Ok(())
}

#[test]
fn benchmark_writes_summary_and_replayable_top_runs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("bench");
    let report = run_benchmark(BenchmarkConfig {
        bots: vec!["idle".to_string(), "hunter".to_string()],
        seeds: vec![1, 2, 3],
        max_frames: 600,
        arena: ArenaSettings::default(),
        objective: Objective::Hybrid,
        out_dir: out_dir.clone(),
        save_top: 2,
        jobs: Some(2),
    })?;

    assert_eq!(report.run_count, 6);
    assert_eq!(report.bot_rankings.len(), 2);
    for aggregate in &report.bot_rankings {
        assert_eq!(aggregate.runs, 3);
        assert!(aggregate.avg_score <= f64::from(aggregate.max_score));
        assert!((0.0..=1.0).contains(&aggregate.survival_rate));
    }
    let ranked: Vec<f64> = report
        .bot_rankings
        .iter()
        .map(|bot| bot.objective_value)
        .collect();
    assert!(ranked.windows(2).all(|pair| pair[0] >= pair[1]));

    let summary: BenchmarkReport =
        serde_json::from_slice(&fs::read(out_dir.join("summary.json"))?)?;
    assert_eq!(summary.run_count, 6);
    assert_eq!(summary.objective, Objective::Hybrid);
    assert!(out_dir.join("runs.csv").exists());
    assert!(out_dir.join("rankings.csv").exists());

    assert_eq!(report.saved_runs.len(), 2);
    for saved in &report.saved_runs {
        let record = read_record(std::path::Path::new(&saved.path))?;
        let result = verify_record(&record)?;
        assert_eq!(result.final_score, saved.score);
        assert_eq!(result.frame_count, saved.frames);
    }
    Ok(())
}

#[test]
fn benchmark_parallelism_does_not_change_results() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let run = |jobs: Option<usize>, name: &str| {
        run_benchmark(BenchmarkConfig {
            bots: vec!["spinner".to_string()],
            seeds: vec![10, 20, 30, 40],
            max_frames: 300,
            arena: ArenaSettings::default(),
            objective: Objective::Score,
            out_dir: dir.path().join(name),
            save_top: 0,
            jobs,
        })
    };
    let serial = run(Some(1), "serial")?;
    let parallel = run(None, "parallel")?;
    let key = |report: &BenchmarkReport| -> Vec<(u32, u32, u32)> {
        report
            .runs
            .iter()
            .map(|row| (row.seed, row.final_score, row.frame_count))
            .collect()
    };
    assert_eq!(key(&serial), key(&parallel));
    assert!(serial.saved_runs.is_empty());
    Ok(())
}

#[test]
fn benchmark_rejects_empty_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let base = BenchmarkConfig {
        bots: vec!["idle".to_string()],
        seeds: vec![1],
        max_frames: 10,
        arena: ArenaSettings::default(),
        objective: Objective::Score,
        out_dir: dir.path().to_path_buf(),
        save_top: 0,
        jobs: None,
    };
    assert!(run_benchmark(BenchmarkConfig {
        seeds: Vec::new(),
        ..base.clone()
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        bots: Vec::new(),
        ..base.clone()
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        jobs: Some(0),
        ..base
    })
    .is_err());
}

#[test]
fn custom_arena_runs_replay() -> Result<()> {
    let arena = ArenaSettings {
        width: 1024.0,
        height: 768.0,
        frame_dt: 1.0 / 30.0,
    };
    let artifact = run_named_bot("hunter", arena.sim_config(77), 600, arena.frame_dt)?;
    let record = artifact.to_record();
    assert_eq!(record.config.width, 1024.0);
    assert_eq!(verify_record(&record)?, artifact.result);
    Ok(())
}
