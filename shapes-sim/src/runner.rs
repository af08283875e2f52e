use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::config::Scenario;
use crate::input::{encode_input_byte, validate_input_byte};
use crate::pilot::{create_pilot, pilot_ids, Pilot};
use crate::session::{FrameSnapshot, Session};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunMetrics {
    pub pilot_id: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub score: u32,
    pub final_health: i32,
    pub bullets_fired: u32,
    pub ship_hits: u32,
    pub rock_respawns: u32,
    pub ship_recenters: u32,
    pub final_rng_state: u32,
    pub game_over: bool,
}

impl RunMetrics {
    fn from_session(pilot_id: &str, seed: u32, max_frames: u32, session: &Session) -> Self {
        Self {
            pilot_id: pilot_id.to_string(),
            seed,
            max_frames,
            frame_count: session.frame_count(),
            score: session.score(),
            final_health: session.ship().state.health,
            bullets_fired: session.bullets_fired(),
            ship_hits: session.ship_hits(),
            rock_respawns: session.rock_respawns(),
            ship_recenters: session.ship_recenters(),
            final_rng_state: session.rng_state(),
            game_over: session.is_game_over(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    /// One encoded input byte per frame played.
    pub inputs: Vec<u8>,
}

fn lookup_pilot(pilot_id: &str) -> Result<Box<dyn Pilot>> {
    create_pilot(pilot_id).ok_or_else(|| {
        let available = pilot_ids().join(", ");
        anyhow!("unknown pilot '{pilot_id}'. available: {available}")
    })
}

pub fn run_pilot(
    pilot_id: &str,
    seed: u32,
    max_frames: u32,
    scenario: &Scenario,
) -> Result<RunArtifact> {
    let mut pilot = lookup_pilot(pilot_id)?;
    run_pilot_instance(pilot.as_mut(), seed, max_frames, scenario)
}

pub fn run_pilot_instance(
    pilot: &mut dyn Pilot,
    seed: u32,
    max_frames: u32,
    scenario: &Scenario,
) -> Result<RunArtifact> {
    if max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }

    pilot.reset(seed);
    let mut session = Session::new(seed, scenario.clone())?;
    let mut inputs = Vec::with_capacity(max_frames as usize);

    while session.frame_count() < max_frames && !session.is_game_over() {
        let frame = session.frame_count();
        let input = pilot.next_input(&session);
        inputs.push(encode_input_byte(input));
        session
            .step(input)
            .with_context(|| format!("step failed at frame {frame}"))?;
    }

    let metrics = RunMetrics::from_session(pilot.id(), seed, max_frames, &session);
    tracing::info!(
        pilot = %metrics.pilot_id,
        seed = metrics.seed,
        frames = metrics.frame_count,
        score = metrics.score,
        health = metrics.final_health,
        game_over = metrics.game_over,
        "run finished"
    );
    Ok(RunArtifact { metrics, inputs })
}

/// Plays recorded input bytes back into a fresh session. Stops early if the
/// session ends before the inputs run out.
pub fn replay(seed: u32, scenario: &Scenario, inputs: &[u8]) -> Result<Session> {
    let mut session = Session::new(seed, scenario.clone())?;
    for byte in inputs {
        if session.is_game_over() {
            break;
        }
        let frame = session.frame_count();
        let input = validate_input_byte(frame, *byte)?;
        session
            .step(input)
            .with_context(|| format!("replay step failed at frame {frame}"))?;
    }
    Ok(session)
}

/// Runs a pilot and keeps a screen-space snapshot every `every` frames,
/// starting with the initial frame.
pub fn capture_frames(
    pilot_id: &str,
    seed: u32,
    max_frames: u32,
    every: u32,
    scenario: &Scenario,
) -> Result<Vec<FrameSnapshot>> {
    if every == 0 {
        return Err(anyhow!("--every must be >= 1"));
    }
    let mut pilot = lookup_pilot(pilot_id)?;
    pilot.reset(seed);
    let mut session = Session::new(seed, scenario.clone())?;

    let mut frames = vec![session.snapshot()?];
    while session.frame_count() < max_frames && !session.is_game_over() {
        let input = pilot.next_input(&session);
        session.step(input)?;
        if session.frame_count() % every == 0 || session.is_game_over() {
            frames.push(session.snapshot()?);
        }
    }
    Ok(frames)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(value).context("failed to serialize json")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
