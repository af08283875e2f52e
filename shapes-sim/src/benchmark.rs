use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Scenario;
use crate::pilot::pilot_ids;
use crate::runner::{run_pilot, write_json, RunMetrics};
use crate::util::seed_to_hex;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Rocks destroyed first, health as a tiebreaker.
    Score,
    /// Frames survived and health left.
    Survival,
    Hybrid,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        let health = metrics.final_health.max(0) as f64;
        let frames = metrics.frame_count as f64;
        let score = metrics.score as f64;
        match self {
            Self::Score => score * 100.0 + health,
            Self::Survival => frames + health * 10.0,
            Self::Hybrid => score * 40.0 + frames * 0.5 + health * 4.0,
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
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_frames: u32,
    pub objective: Objective,
    pub scenario: Scenario,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub pilot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub score: u32,
    pub final_health: i32,
    pub bullets_fired: u32,
    pub ship_hits: u32,
    pub rock_respawns: u32,
    pub game_over: bool,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PilotAggregate {
    pub pilot_id: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub avg_health: f64,
    pub survival_rate: f64,
    pub avg_ship_hits: f64,
    /// Rocks destroyed per bullet fired.
    pub accuracy: f64,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub max_frames: u32,
    pub jobs: Option<usize>,
    pub pilots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub pilot_rankings: Vec<PilotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_pilots(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(pilot_ids().iter().map(|id| (*id).to_string()).collect());
    };
    let pilots: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if pilots.is_empty() {
        return Err(anyhow!("--pilots resolved to empty list"));
    }
    Ok(pilots)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.pilots.is_empty() {
        return Err(anyhow!("benchmark requires at least one pilot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    config.scenario.validate()?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .pilots
        .iter()
        .flat_map(|pilot| config.seeds.iter().map(move |seed| (pilot.clone(), *seed)))
        .collect();

    let run_one = |(pilot_id, seed): &(String, u32)| -> Result<RunRecord> {
        let artifact = run_pilot(pilot_id, *seed, config.max_frames, &config.scenario)
            .with_context(|| format!("benchmark run failed for pilot={pilot_id} seed={seed:#x}"))?;
        Ok(record(&artifact.metrics, config.objective))
    };

    let results: Vec<Result<RunRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };
    let mut runs = results.into_iter().collect::<Result<Vec<_>>>()?;

    let rankings = rank_pilots(&runs, config.max_frames);

    runs.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &runs)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        max_frames: config.max_frames,
        jobs: config.jobs,
        pilots: config.pilots,
        seeds: config.seeds,
        run_count: runs.len(),
        pilot_rankings: rankings,
        runs,
    };
    write_json(&config.out_dir.join("summary.json"), &report)?;
    tracing::info!(
        runs = report.run_count,
        objective = report.objective.as_str(),
        out_dir = %config.out_dir.display(),
        "benchmark finished"
    );
    Ok(report)
}

fn record(metrics: &RunMetrics, objective: Objective) -> RunRecord {
    RunRecord {
        pilot_id: metrics.pilot_id.clone(),
        seed: metrics.seed,
        seed_hex: seed_to_hex(metrics.seed),
        frame_count: metrics.frame_count,
        score: metrics.score,
        final_health: metrics.final_health,
        bullets_fired: metrics.bullets_fired,
        ship_hits: metrics.ship_hits,
        rock_respawns: metrics.rock_respawns,
        game_over: metrics.game_over,
        objective_value: objective.run_value(metrics),
    }
}

fn rank_pilots(runs: &[RunRecord], max_frames: u32) -> Vec<PilotAggregate> {
    let mut grouped: BTreeMap<&str, Vec<&RunRecord>> = BTreeMap::new();
    for run in runs {
        grouped.entry(run.pilot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<PilotAggregate> = grouped
        .into_iter()
        .map(|(pilot_id, pilot_runs)| {
            let count = pilot_runs.len() as f64;
            let mean = |value: fn(&RunRecord) -> f64| {
                pilot_runs.iter().map(|run| value(run)).sum::<f64>() / count
            };
            let fired: u64 = pilot_runs.iter().map(|run| run.bullets_fired as u64).sum();
            let hits: u64 = pilot_runs.iter().map(|run| run.score as u64).sum();
            let survived = pilot_runs
                .iter()
                .filter(|run| !run.game_over && run.frame_count >= max_frames)
                .count();
            PilotAggregate {
                pilot_id: pilot_id.to_string(),
                runs: pilot_runs.len(),
                avg_score: mean(|run| run.score as f64),
                max_score: pilot_runs.iter().map(|run| run.score).max().unwrap_or_default(),
                avg_frames: mean(|run| run.frame_count as f64),
                avg_health: mean(|run| run.final_health as f64),
                survival_rate: survived as f64 / count,
                avg_ship_hits: mean(|run| run.ship_hits as f64),
                accuracy: if fired == 0 {
                    0.0
                } else {
                    hits as f64 / fired as f64
                },
                objective_value: mean(|run| run.objective_value),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| a.pilot_id.cmp(&b.pilot_id))
    });
    rankings
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "pilot_id,seed_hex,seed,frame_count,score,final_health,bullets_fired,ship_hits,rock_respawns,game_over,objective_value\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{:.2}\n",
            row.pilot_id,
            row.seed_hex,
            row.seed,
            row.frame_count,
            row.score,
            row.final_health,
            row.bullets_fired,
            row.ship_hits,
            row.rock_respawns,
            row.game_over,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[PilotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,pilot_id,runs,avg_score,max_score,avg_frames,avg_health,survival_rate,avg_ship_hits,accuracy,objective_value\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{:.2},{:.4},{:.2},{:.4},{:.2}\n",
            idx + 1,
            row.pilot_id,
            row.runs,
            row.avg_score,
            row.max_score,
            row.avg_frames,
            row.avg_health,
            row.survival_rate,
            row.avg_ship_hits,
            row.accuracy,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
