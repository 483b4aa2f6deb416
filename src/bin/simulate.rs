use chase_engine::constants::{DEFAULT_LEVEL, TICK_RATE};
use chase_engine::engine::{EngineOptions, GameEngine, OptionsError};
use chase_engine::maze::{Maze, Walls};
use chase_engine::rng::Rng;
use chase_engine::types::{Cell, Direction, GhostMode, RuntimeEvent, Snapshot};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

const MIN_TURN_INTERVAL: u64 = 15;
const MAX_TURN_INTERVAL: u64 = 45;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Level file; the bundled level is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
    #[arg(long, default_value_t = u64::from(TICK_RATE) * 60 * 5)]
    ticks: u64,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// Leader cell assumed by the flanker when no leader is present, as `x,y`.
    #[arg(long, value_parser = parse_cell)]
    leader_fallback: Option<Cell>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunEnd {
    GameOver,
    TickLimit,
}

#[derive(Clone, Debug, Serialize)]
struct RunResultLine {
    seed: u32,
    reason: RunEnd,
    #[serde(rename = "finishedTick")]
    finished_tick: u64,
    score: u32,
    #[serde(rename = "livesLeft")]
    lives_left: u32,
    #[serde(rename = "livesLost")]
    lives_lost: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    #[serde(rename = "dotsEaten")]
    dots_eaten: u32,
    #[serde(rename = "powerItemsTaken")]
    power_items_taken: u32,
    #[serde(rename = "ghostsCaptured")]
    ghosts_captured: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum MilestoneKind {
    LifeLost,
    LevelCleared,
}

#[derive(Clone, Debug, Serialize)]
struct Milestone {
    tick: u64,
    kind: MilestoneKind,
    score: u32,
    lives: u32,
}

#[derive(Clone, Debug)]
struct RunOutcome {
    result: RunResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    milestones: Vec<Milestone>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "tickLimit")]
    tick_limit: u64,
    result: RunResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    timestamp: String,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

/// Wandering input source: a random turn every 15 to 45 ticks.
#[derive(Clone, Debug)]
struct Autopilot {
    rng: Rng,
    next_turn_at: u64,
}

impl Autopilot {
    fn new(seed: u32) -> Self {
        Self {
            rng: Rng::new(seed ^ 0x9e37_79b9),
            next_turn_at: 0,
        }
    }

    fn poll(&mut self, tick: u64) -> Option<Direction> {
        if tick < self.next_turn_at {
            return None;
        }
        let spread = (MAX_TURN_INTERVAL - MIN_TURN_INTERVAL + 1) as usize;
        self.next_turn_at = tick + MIN_TURN_INTERVAL + self.rng.pick_index(spread) as u64;
        Some(Direction::STEERING_ORDER[self.rng.pick_index(Direction::STEERING_ORDER.len())])
    }
}

fn main() {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let started_at = timestamp();
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed, Utc::now().timestamp_millis()));

    let maze = match load_level(cli.level.as_deref()) {
        Ok(maze) => maze,
        Err(error) => {
            emit_log(
                "error",
                "level_load_failed",
                &run_id,
                None,
                json!({
                    "path": cli.level.as_ref().map(|path| path.to_string_lossy().to_string()),
                    "error": error,
                }),
            );
            std::process::exit(2);
        }
    };

    let mut options = EngineOptions::default();
    if let Some(cell) = cli.leader_fallback {
        options.leader_fallback = cell;
    }

    emit_log(
        "info",
        "run_started",
        &run_id,
        None,
        json!({
            "seed": seed,
            "tickLimit": cli.ticks,
            "width": maze.width(),
            "height": maze.height(),
            "dots": maze.remaining_dots(),
            "powerItems": maze.remaining_power_items(),
            "leaderFallback": options.leader_fallback,
        }),
    );

    let outcome = match run_simulation(maze, seed, cli.ticks, options) {
        Ok(outcome) => outcome,
        Err(error) => {
            emit_log(
                "error",
                "invalid_options",
                &run_id,
                None,
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    for milestone in &outcome.milestones {
        let event = match milestone.kind {
            MilestoneKind::LifeLost => "life_lost",
            MilestoneKind::LevelCleared => "level_cleared",
        };
        emit_log(
            "info",
            event,
            &run_id,
            Some(milestone.tick),
            json!({
                "score": milestone.score,
                "lives": milestone.lives,
            }),
        );
    }
    for anomaly in &outcome.anomaly_records {
        emit_log(
            "warn",
            "anomaly_detected",
            &run_id,
            Some(anomaly.tick),
            json!({ "message": anomaly.message }),
        );
    }

    match serde_json::to_string(&outcome.result) {
        Ok(line) => println!("{line}"),
        Err(error) => {
            emit_log(
                "error",
                "result_encode_failed",
                &run_id,
                None,
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    }

    let has_anomaly = !outcome.result.anomalies.is_empty();
    let summary = RunSummary {
        run_id: run_id.clone(),
        started_at,
        finished_at: timestamp(),
        tick_limit: cli.ticks,
        result: outcome.result,
        anomaly_records: outcome.anomaly_records,
    };

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        Some(summary.result.finished_tick),
        json!({
            "reason": summary.result.reason,
            "score": summary.result.score,
            "levelsCleared": summary.result.levels_cleared,
            "anomalyCount": summary.anomaly_records.len(),
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn load_level(path: Option<&Path>) -> Result<Maze, String> {
    let Some(path) = path else {
        return Maze::parse(DEFAULT_LEVEL).map_err(|error| error.to_string());
    };
    let source = std::fs::read_to_string(path).map_err(|error| error.to_string())?;
    Maze::parse(&source).map_err(|error| error.to_string())
}

fn run_simulation(
    maze: Maze,
    seed: u32,
    tick_limit: u64,
    options: EngineOptions,
) -> Result<RunOutcome, OptionsError> {
    let cell_size = options.cell_size;
    let vulnerable_ticks = options.vulnerable_ticks;
    let mut engine = GameEngine::new(maze, seed, options)?;
    let mut autopilot = Autopilot::new(seed);

    let mut reason = RunEnd::TickLimit;
    let mut lives_lost = 0;
    let mut levels_cleared = 0;
    let mut dots_eaten = 0;
    let mut power_items_taken = 0;
    let mut ghosts_captured = 0;
    let mut milestones = Vec::new();
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    while engine.tick() < tick_limit {
        if let Some(dir) = autopilot.poll(engine.tick()) {
            engine.queue_turn(dir);
        }
        engine.step();
        let snapshot = engine.build_snapshot(true);

        let found =
            collect_snapshot_anomalies(&snapshot, engine.maze(), cell_size, vulnerable_ticks);
        for message in found {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }

        for event in &snapshot.events {
            match event {
                RuntimeEvent::DotEaten { .. } => dots_eaten += 1,
                RuntimeEvent::PowerItemTaken { .. } => power_items_taken += 1,
                RuntimeEvent::GhostCaptured { .. } => ghosts_captured += 1,
                _ => {}
            }
        }

        if !engine.is_player_alive() {
            lives_lost += 1;
            let continues = engine.respawn_after_death();
            milestones.push(Milestone {
                tick: snapshot.tick,
                kind: MilestoneKind::LifeLost,
                score: engine.player().score,
                lives: engine.lives(),
            });
            if !continues {
                reason = RunEnd::GameOver;
                break;
            }
        }

        if engine.is_level_complete() {
            levels_cleared += 1;
            milestones.push(Milestone {
                tick: snapshot.tick,
                kind: MilestoneKind::LevelCleared,
                score: engine.player().score,
                lives: engine.lives(),
            });
            engine.restart_level();
        }
    }

    let player = engine.player();
    Ok(RunOutcome {
        result: RunResultLine {
            seed,
            reason,
            finished_tick: engine.tick(),
            score: player.score,
            lives_left: player.lives,
            lives_lost,
            levels_cleared,
            dots_eaten,
            power_items_taken,
            ghosts_captured,
            anomalies,
        },
        anomaly_records,
        milestones,
    })
}

fn collect_snapshot_anomalies(
    snapshot: &Snapshot,
    maze: &Maze,
    cell_size: i32,
    vulnerable_ticks: u32,
) -> Vec<String> {
    let mut anomalies = Vec::new();

    let player = &snapshot.player;
    let player_offset = check_position(
        "player",
        player.x,
        player.y,
        player.sub_x,
        player.sub_y,
        cell_size,
    );
    if let Some(message) = player_offset {
        anomalies.push(message);
    }
    if maze.is_blocked(Cell::new(player.x, player.y)) {
        anomalies.push(format!("player on wall: ({}, {})", player.x, player.y));
    }

    for ghost in &snapshot.ghosts {
        let label = format!("{:?}", ghost.kind).to_lowercase();
        let ghost_offset = check_position(
            &label,
            ghost.x,
            ghost.y,
            ghost.sub_x,
            ghost.sub_y,
            cell_size,
        );
        if let Some(message) = ghost_offset {
            anomalies.push(message);
        }
        if maze.is_blocked(Cell::new(ghost.x, ghost.y)) {
            anomalies.push(format!("{label} on wall: ({}, {})", ghost.x, ghost.y));
        }
        if ghost.mode != GhostMode::Vulnerable && ghost.vulnerable_ticks != 0 {
            anomalies.push(format!(
                "{label} has countdown {} outside vulnerable mode",
                ghost.vulnerable_ticks
            ));
        }
        if ghost.vulnerable_ticks > vulnerable_ticks {
            anomalies.push(format!(
                "{label} countdown {} exceeds {vulnerable_ticks}",
                ghost.vulnerable_ticks
            ));
        }
        if ghost.mode == GhostMode::Returning && maze.is_blocked(ghost.home) {
            anomalies.push(format!(
                "{label} returning to walled home ({}, {})",
                ghost.home.x, ghost.home.y
            ));
        }
    }
    anomalies
}

fn check_position(
    label: &str,
    x: i32,
    y: i32,
    sub_x: i32,
    sub_y: i32,
    cell_size: i32,
) -> Option<String> {
    let ox = sub_x - x * cell_size;
    let oy = sub_y - y * cell_size;
    let range = 0..cell_size;
    if !range.contains(&ox) || !range.contains(&oy) {
        return Some(format!("{label} sub-cell offset out of range: ({ox}, {oy})"));
    }
    if ox != 0 && oy != 0 {
        return Some(format!("{label} off both grid axes: ({ox}, {oy})"));
    }
    None
}

fn parse_cell(value: &str) -> Result<Cell, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("bad x `{x}`: {error}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("bad y `{y}`: {error}"))?;
    Ok(Cell::new(x, y))
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

fn default_run_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn emit_log(level: &str, event: &str, run_id: &str, tick: Option<u64>, details: Value) {
    let log_line = StructuredLogLine {
        timestamp: timestamp(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        tick,
        details,
    };
    if let Ok(line) = serde_json::to_string(&log_line) {
        eprintln!("{line}");
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)
}
