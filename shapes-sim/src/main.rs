use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shapes_sim::benchmark::{resolve_pilots, run_benchmark, BenchmarkConfig, Objective};
use shapes_sim::config::{max_frames_from_env, Scenario, DEFAULT_MAX_FRAMES};
use shapes_sim::pilot::describe_pilots;
use shapes_sim::runner::{capture_frames, replay, run_pilot, write_json};
use shapes_sim::util::{parse_seed, parse_seed_csv, seed_range, seed_to_hex};

#[derive(Parser, Debug)]
#[command(name = "shapes-sim")]
#[command(about = "Headless polygon sandbox: scripted runs, replays, frame export and benchmarks")]
struct Cli {
    /// Scenario JSON; missing fields take their defaults
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available pilots
    ListPilots,
    /// Print the effective scenario as JSON
    Scenario,
    /// Run one pilot for one seed
    Run {
        #[arg(long, default_value = "hunter")]
        pilot: String,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        max_frames: Option<u32>,
        /// Write the metrics here as JSON
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the recorded input bytes here, one per frame
        #[arg(long)]
        inputs_out: Option<PathBuf>,
    },
    /// Replay recorded input bytes and report the final state
    Replay {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        inputs: PathBuf,
    },
    /// Export sampled screen-space frames for one run
    Frames {
        #[arg(long, default_value = "hunter")]
        pilot: String,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        max_frames: Option<u32>,
        #[arg(long, default_value_t = 10)]
        every: u32,
        #[arg(long)]
        output: PathBuf,
    },
    /// Run every pilot over many seeds in parallel
    Benchmark {
        #[arg(long)]
        pilots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        max_frames: Option<u32>,
        #[arg(long, value_enum, default_value_t = CliObjective::Hybrid)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
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

    let Cli { scenario, command } = Cli::parse();
    let scenario = Scenario::load_or_default(scenario.as_deref())?.with_env_overrides();
    let frames_or_default =
        |value: Option<u32>| value.unwrap_or_else(|| max_frames_from_env(DEFAULT_MAX_FRAMES));

    match command {
        Commands::ListPilots => {
            for (id, description) in describe_pilots() {
                println!("{id:10} {description}");
            }
        }
        Commands::Scenario => {
            let encoded =
                serde_json::to_string_pretty(&scenario).context("failed to serialize scenario")?;
            println!("{encoded}");
        }
        Commands::Run {
            pilot,
            seed,
            max_frames,
            output,
            inputs_out,
        } => {
            let seed = parse_seed(&seed)?;
            let artifact = run_pilot(&pilot, seed, frames_or_default(max_frames), &scenario)?;
            let metrics = &artifact.metrics;

            println!("pilot={}", metrics.pilot_id);
            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", metrics.frame_count);
            println!("score={}", metrics.score);
            println!("health={}", metrics.final_health);
            println!("bullets_fired={}", metrics.bullets_fired);
            println!("ship_hits={}", metrics.ship_hits);
            println!("rock_respawns={}", metrics.rock_respawns);
            println!("ship_recenters={}", metrics.ship_recenters);
            println!("rng={:#010x}", metrics.final_rng_state);
            println!("game_over={}", metrics.game_over);
            if let Some(path) = output {
                write_json(&path, metrics)?;
                println!("output={}", path.display());
            }
            if let Some(path) = inputs_out {
                write_bytes(&path, &artifact.inputs)?;
                println!("inputs={}", path.display());
            }
        }
        Commands::Replay { seed, inputs } => {
            let seed = parse_seed(&seed)?;
            let bytes =
                fs::read(&inputs).with_context(|| format!("failed reading {}", inputs.display()))?;
            let session = replay(seed, &scenario, &bytes)?;

            println!("input={}", inputs.display());
            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", session.frame_count());
            println!("score={}", session.score());
            println!("health={}", session.ship().state.health);
            println!("rng={:#010x}", session.rng_state());
            println!("game_over={}", session.is_game_over());
        }
        Commands::Frames {
            pilot,
            seed,
            max_frames,
            every,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let frames = capture_frames(
                &pilot,
                seed,
                frames_or_default(max_frames),
                every,
                &scenario,
            )?;
            write_json(&output, &frames)?;
            println!("pilot={pilot}");
            println!("seed={}", seed_to_hex(seed));
            println!("snapshots={}", frames.len());
            println!("output={}", output.display());
        }
        Commands::Benchmark {
            pilots,
            seeds,
            seed_start,
            seed_count,
            max_frames,
            objective,
            out_dir,
            jobs,
        } => {
            let pilots = resolve_pilots(pilots.as_deref())?;
            let seeds = resolve_seeds(seeds.as_deref(), seed_start.as_deref(), seed_count)?;
            let objective: Objective = objective.into();
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "benchmarks/{}-{}",
                    objective.as_str(),
                    timestamp_suffix()
                ))
            });

            let report = run_benchmark(BenchmarkConfig {
                pilots,
                seeds,
                max_frames: frames_or_default(max_frames),
                objective,
                scenario,
                out_dir: out_dir.clone(),
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
            for (idx, pilot) in report.pilot_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  objective={:.2} avg_score={:.1} avg_frames={:.1} avg_health={:.1} accuracy={:.0}% survival={:.0}%",
                    idx + 1,
                    pilot.pilot_id,
                    pilot.objective_value,
                    pilot.avg_score,
                    pilot.avg_frames,
                    pilot.avg_health,
                    pilot.accuracy * 100.0,
                    pilot.survival_rate * 100.0,
                );
            }
        }
    }

    Ok(())
}

fn resolve_seeds(seeds: Option<&str>, seed_start: Option<&str>, seed_count: u32) -> Result<Vec<u32>> {
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => 0x5EED_0001,
    };
    seed_range(start, seed_count)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
