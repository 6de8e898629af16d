use chrono::{SecondsFormat, Utc};
use clap::Parser;
use pellet_chase::config::GameConfig;
use pellet_chase::engine::GameEngine;
use pellet_chase::types::{Direction, MatchOutcome, RuntimeEvent, Snapshot, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long, default_value_t = 1)]
    matches: u32,
    #[arg(long, default_value_t = 3)]
    minutes: u32,
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    lives: Option<u32>,
    #[arg(long)]
    power_ms: Option<u64>,
    #[arg(long)]
    player_interval_ms: Option<u64>,
    #[arg(long)]
    ghost_interval_ms: Option<u64>,
}

#[derive(Clone, Debug)]
struct Scenario {
    name: String,
    seed: u32,
    time_cap_ms: u64,
    frame_ms: u64,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    outcome: String,
    score: u32,
    lives: u32,
    #[serde(rename = "collectiblesEaten")]
    collectibles_eaten: u32,
    #[serde(rename = "collectiblesTotal")]
    collectibles_total: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    #[serde(rename = "powerModes")]
    power_modes: u32,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    finished_tick: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "averageDurationMs")]
    average_duration_ms: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

/// Random walker that only re-decides at junctions or when stuck.
struct Autopilot {
    rng: StdRng,
    last_cell: Option<Vec2>,
}

impl Autopilot {
    fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed as u64),
            last_cell: None,
        }
    }

    fn next_heading(&mut self, engine: &GameEngine) -> Option<Direction> {
        let maze = engine.maze();
        let pos = engine.player().position();
        let heading = engine.player().heading();
        let blocked = heading.is_none() || !maze.is_walkable_at(pos + heading.delta());
        if self.last_cell == Some(pos) && !blocked {
            return None;
        }
        self.last_cell = Some(pos);

        let ahead = maze.available_directions(pos.x, pos.y, heading);
        if !blocked && ahead.len() < 2 {
            return None;
        }
        let options = if ahead.is_empty() {
            maze.available_directions(pos.x, pos.y, Direction::None)
        } else {
            ahead
        };
        if options.is_empty() {
            return None;
        }
        Some(options[self.rng.random_range(0..options.len())])
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(mut config) => {
            apply_overrides(&mut config, &cli);
            config
        }
        Err(error) => {
            error!(event = "config_rejected", error = %error);
            std::process::exit(1);
        }
    };

    let scenarios = resolve_scenarios(&cli);
    let run_started_at = timestamp();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(seed_hint, Utc::now().timestamp_millis()));
    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        info!(
            event = "scenario_started",
            match_id = %match_id,
            scenario = %scenario.name,
            seed = scenario.seed,
            time_cap_ms = scenario.time_cap_ms
        );
        let scenario_run = match run_scenario(&scenario, &config) {
            Ok(run) => run,
            Err(error) => {
                error!(event = "config_rejected", match_id = %match_id, error = %error);
                std::process::exit(1);
            }
        };

        for anomaly in &scenario_run.anomaly_records {
            warn!(
                event = "anomaly_detected",
                match_id = %match_id,
                scenario = %scenario.name,
                seed = scenario.seed,
                tick = anomaly.tick,
                message = %anomaly.message
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        *outcome_counts
            .entry(scenario_run.result.outcome.clone())
            .or_insert(0) += 1;

        info!(
            event = "scenario_finished",
            match_id = %match_id,
            scenario = %scenario.name,
            seed = scenario.seed,
            tick = scenario_run.finished_tick,
            outcome = %scenario_run.result.outcome,
            score = scenario_run.result.score,
            duration_ms = scenario_run.result.duration_ms,
            anomaly_count = scenario_run.anomaly_records.len()
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => warn!(event = "result_encode_failed", error = %error),
        }
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        run_started_at,
        timestamp(),
        scenario_results,
        outcome_counts,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            error!(
                event = "summary_write_failed",
                match_id = %match_id,
                path = %path.display(),
                error = %error
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    info!(
        event = "run_finished",
        match_id = %match_id,
        scenario_count = summary.scenario_count,
        anomaly_count = summary.anomaly_count,
        average_score = summary.average_score,
        average_duration_ms = summary.average_duration_ms,
        summary_out = ?summary_out_written
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> pellet_chase::error::GameResult<GameConfig> {
    match path {
        Some(path) => GameConfig::from_json_file(path),
        None => Ok(GameConfig::default()),
    }
}

fn apply_overrides(config: &mut GameConfig, cli: &Cli) {
    if let Some(lives) = cli.lives {
        config.starting_lives = lives;
    }
    if let Some(power_ms) = cli.power_ms {
        config.power_duration_ms = power_ms;
    }
    if let Some(interval) = cli.player_interval_ms {
        config.player_interval_ms = interval;
    }
    if let Some(interval) = cli.ghost_interval_ms {
        config.ghost_interval_ms = interval;
    }
}

fn run_scenario(
    scenario: &Scenario,
    config: &GameConfig,
) -> pellet_chase::error::GameResult<ScenarioRunResult> {
    let mut engine = GameEngine::new(config.clone())?;
    let mut autopilot = Autopilot::new(scenario.seed);
    let starting_lives = config.starting_lives;

    let mut power_modes = 0u32;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut last_tick = 0u64;

    engine.start();
    while !engine.is_ended() && engine.now_ms() < scenario.time_cap_ms {
        if let Some(dir) = autopilot.next_heading(&engine) {
            engine.request_heading(dir);
        }
        engine.step(scenario.frame_ms);

        let snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;
        for message in collect_snapshot_anomalies(&snapshot, starting_lives) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        power_modes += snapshot
            .events
            .iter()
            .filter(|event| matches!(event, RuntimeEvent::PowerModeStarted { .. }))
            .count() as u32;
    }

    let summary = engine.build_summary();
    Ok(ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            outcome: outcome_key(summary.outcome),
            score: summary.score,
            lives: summary.lives,
            collectibles_eaten: summary.collectibles_eaten,
            collectibles_total: summary.collectibles_total,
            ghosts_eaten: summary.ghosts_eaten,
            deaths: summary.deaths,
            power_modes,
            duration_ms: summary.duration_ms,
            anomalies,
        },
        anomaly_records,
        finished_tick: last_tick,
    })
}

fn collect_snapshot_anomalies(snapshot: &Snapshot, starting_lives: u32) -> Vec<String> {
    let mut anomalies = Vec::new();
    if snapshot.collectibles_eaten > snapshot.collectibles_total {
        anomalies.push(format!(
            "collectibles eaten exceeds total: {}/{}",
            snapshot.collectibles_eaten, snapshot.collectibles_total
        ));
    }

    let player = Vec2::new(snapshot.player.x, snapshot.player.y);
    if snapshot.maze.walls.contains(&player) {
        anomalies.push(format!("player inside wall at ({},{})", player.x, player.y));
    }

    if snapshot.lives > starting_lives {
        anomalies.push(format!(
            "lives above starting value: {}/{}",
            snapshot.lives, starting_lives
        ));
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = cli.seed.unwrap_or_else(rand::random::<u32>);
    let time_cap_ms = u64::from(cli.minutes.max(1)) * 60_000;
    let frame_ms = cli.frame_ms.max(1);

    (0..cli.matches.max(1))
        .map(|idx| Scenario {
            name: format!("autopilot-{}", idx + 1),
            seed: seed.wrapping_add(idx),
            time_cap_ms,
            frame_ms,
        })
        .collect()
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_match_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn build_run_summary(
    match_id: String,
    started_at: String,
    finished_at: String,
    scenarios: Vec<ScenarioResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let (average_score, average_duration_ms) = if scenario_count == 0 {
        (0, 0)
    } else {
        let total_score: u64 = scenarios.iter().map(|s| u64::from(s.score)).sum();
        let total_duration: u64 = scenarios.iter().map(|s| s.duration_ms).sum();
        (
            (total_score / scenario_count as u64) as u32,
            total_duration / scenario_count as u64,
        )
    };
    RunSummary {
        match_id,
        started_at,
        finished_at,
        scenario_count,
        anomaly_count,
        average_score,
        average_duration_ms,
        outcome_counts,
        scenarios,
    }
}

fn outcome_key(outcome: Option<MatchOutcome>) -> String {
    match outcome {
        Some(MatchOutcome::Won) => "won",
        Some(MatchOutcome::Lost) => "lost",
        None => "timeout",
    }
    .to_string()
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scenario_result(outcome: &str, score: u32, duration_ms: u64) -> ScenarioResultLine {
        ScenarioResultLine {
            scenario: "test".to_string(),
            seed: 42,
            outcome: outcome.to_string(),
            score,
            lives: 0,
            collectibles_eaten: 10,
            collectibles_total: 176,
            ghosts_eaten: 0,
            deaths: 3,
            power_modes: 0,
            duration_ms,
            anomalies: Vec::new(),
        }
    }

    fn short_scenario(seed: u32) -> Scenario {
        Scenario {
            name: "short".to_string(),
            seed,
            time_cap_ms: 20_000,
            frame_ms: 16,
        }
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_calculates_averages() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            "2026-01-01T00:00:00.000Z".to_string(),
            "2026-01-01T00:00:01.000Z".to_string(),
            vec![
                make_scenario_result("lost", 300, 60_000),
                make_scenario_result("timeout", 500, 90_000),
            ],
            BTreeMap::from([("lost".to_string(), 1usize), ("timeout".to_string(), 1usize)]),
            0,
        );
        assert_eq!(summary.average_duration_ms, 75_000);
        assert_eq!(summary.average_score, 400);
        assert_eq!(summary.scenario_count, 2);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("pellet-chase-missing-{}", Utc::now().timestamp_millis()))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            timestamp(),
            timestamp(),
            vec![make_scenario_result("won", 1_000, 60_000)],
            BTreeMap::from([("won".to_string(), 1usize)]),
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_summary_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(&mut anomalies, &mut records, &mut seen, 10, "same".to_string());
        push_anomaly(&mut anomalies, &mut records, &mut seen, 11, "same".to_string());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tick, 11);
    }

    #[test]
    fn same_seed_produces_same_run() {
        let config = GameConfig::default();
        let first = run_scenario(&short_scenario(7), &config).expect("default config");
        let second = run_scenario(&short_scenario(7), &config).expect("default config");
        assert_eq!(first.result.score, second.result.score);
        assert_eq!(first.result.collectibles_eaten, second.result.collectibles_eaten);
        assert_eq!(first.result.deaths, second.result.deaths);
        assert_eq!(first.finished_tick, second.finished_tick);
    }

    #[test]
    fn autopilot_run_is_free_of_anomalies_and_makes_progress() {
        let run = run_scenario(&short_scenario(11), &GameConfig::default()).expect("default config");
        assert!(run.result.anomalies.is_empty(), "{:?}", run.result.anomalies);
        assert!(run.result.collectibles_eaten > 0);
        assert!(run.result.collectibles_eaten <= run.result.collectibles_total);
    }

    #[test]
    fn snapshot_anomalies_flag_lives_above_start() {
        let mut engine = GameEngine::new(GameConfig::default()).expect("default config");
        let mut snapshot = engine.build_snapshot(false);
        assert!(collect_snapshot_anomalies(&snapshot, 3).is_empty());
        snapshot.lives = 4;
        assert_eq!(collect_snapshot_anomalies(&snapshot, 3).len(), 1);
    }

    #[test]
    fn cli_overrides_replace_config_values() {
        let cli = Cli::parse_from(["simulate", "--lives", "5", "--power-ms", "8000"]);
        let mut config = GameConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.power_duration_ms, 8_000);
        assert_eq!(config.player_interval_ms, 150);
        assert_eq!(config.ghost_interval_ms, 200);
    }

    #[test]
    fn invalid_override_is_rejected_when_the_match_is_built() {
        let cli = Cli::parse_from(["simulate", "--ghost-interval-ms", "0"]);
        let mut config = GameConfig::default();
        apply_overrides(&mut config, &cli);
        assert!(run_scenario(&short_scenario(1), &config).is_err());
    }

    #[test]
    fn outcome_key_maps_unfinished_match_to_timeout() {
        assert_eq!(outcome_key(None), "timeout");
        assert_eq!(outcome_key(Some(MatchOutcome::Won)), "won");
    }
}
