use std::{env, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use shapes_core::{Point, VertexTemplate, Viewport};

pub const DEFAULT_MAX_FRAMES: u32 = 3_600;

pub const ENV_VIEWPORT_WIDTH: &str = "SHAPES_VIEWPORT_WIDTH";
pub const ENV_VIEWPORT_HEIGHT: &str = "SHAPES_VIEWPORT_HEIGHT";
pub const ENV_MAX_FRAMES: &str = "SHAPES_MAX_FRAMES";

pub const MAX_ROCK_VERTICES: usize = 64;
pub const MAX_ROCK_COUNT: usize = 256;
pub const MAX_BULLET_LIMIT: usize = 256;

/// Everything a session needs besides its seed and inputs. Angles are in
/// radians except where a field name says otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub viewport: Viewport,
    pub ship_outline: Vec<Point>,
    pub ship_scale: f64,
    pub ship_speed: f64,
    pub ship_turn_speed: f64,
    pub ship_health: i32,
    pub ship_bullets: u32,
    pub fire_cooldown_frames: u32,
    pub collision_damage: i32,
    pub rock_count: usize,
    pub rock_min_vertices: usize,
    pub rock_max_vertices: usize,
    pub rock_min_width: f64,
    pub rock_max_width: f64,
    /// Maximum self-rotation per frame, in degrees.
    pub rock_spin_degrees: f64,
    pub rock_min_drift: f64,
    pub rock_max_drift: f64,
    /// Authored rock outlines picked alongside the regular polygons.
    pub rock_outlines: Vec<Vec<Point>>,
    pub bullet_width: f64,
    pub bullet_length: f64,
    pub bullet_speed: f64,
    pub bullet_ttl_frames: u32,
    pub bullet_limit: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            ship_outline: vec![
                Point::new(0.0, 150.0),
                Point::new(-30.0, 0.0),
                Point::new(0.0, -50.0),
                Point::new(30.0, 0.0),
            ],
            ship_scale: 0.25,
            ship_speed: 9.0,
            ship_turn_speed: 0.08,
            ship_health: 100,
            ship_bullets: 50,
            // 200 ms at 60 fps.
            fire_cooldown_frames: 12,
            collision_damage: 10,
            rock_count: 5,
            rock_min_vertices: 5,
            rock_max_vertices: 9,
            rock_min_width: 40.0,
            rock_max_width: 120.0,
            rock_spin_degrees: 1.15,
            rock_min_drift: 0.5,
            rock_max_drift: 2.0,
            rock_outlines: vec![vec![
                Point::new(0.0, 36.0),
                Point::new(-6.0, 30.0),
                Point::new(-9.0, 0.0),
                Point::new(0.0, -15.0),
                Point::new(15.0, 0.0),
                Point::new(21.0, 45.0),
            ]],
            bullet_width: 6.0,
            bullet_length: 9.0,
            bullet_speed: 14.0,
            bullet_ttl_frames: 90,
            bullet_limit: 6,
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing scenario {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Refuses scenarios whose bodies could not be built, before any session
    /// starts.
    pub fn validate(&self) -> Result<()> {
        Viewport::new(self.viewport.width, self.viewport.height)
            .context("scenario viewport is invalid")?;
        self.ship_template().context("scenario ship outline is invalid")?;
        if self.rock_min_vertices > self.rock_max_vertices {
            return Err(anyhow!(
                "rock_min_vertices ({}) > rock_max_vertices ({})",
                self.rock_min_vertices,
                self.rock_max_vertices
            ));
        }
        ensure_at_most("rock_max_vertices", self.rock_max_vertices, MAX_ROCK_VERTICES)?;
        ensure_at_most("rock_count", self.rock_count, MAX_ROCK_COUNT)?;
        ensure_at_most("bullet_limit", self.bullet_limit, MAX_BULLET_LIMIT)?;
        VertexTemplate::regular(self.rock_min_vertices, self.rock_min_width)
            .context("scenario rock polygon is invalid")?;
        VertexTemplate::regular(self.rock_max_vertices, self.rock_max_width)
            .context("scenario rock polygon is invalid")?;
        ensure_finite_range("rock width", self.rock_min_width, self.rock_max_width)?;
        ensure_finite_range("rock drift", self.rock_min_drift, self.rock_max_drift)?;
        let spin = self.rock_spin_radians().abs();
        ensure_finite_range("rock spin", -spin, spin)?;
        for (index, outline) in self.rock_outlines.iter().enumerate() {
            VertexTemplate::custom(outline)
                .with_context(|| format!("scenario rock outline {index} is invalid"))?;
        }
        VertexTemplate::rectangle(self.bullet_width, self.bullet_length)
            .context("scenario bullet size is invalid")?;
        let speeds = [
            self.ship_speed,
            self.ship_turn_speed,
            self.rock_spin_degrees,
            self.bullet_speed,
        ];
        if speeds.iter().any(|value| !value.is_finite()) {
            return Err(anyhow!("scenario speeds must be finite"));
        }
        if self.ship_health <= 0 {
            return Err(anyhow!("ship_health must be positive"));
        }
        Ok(())
    }

    pub fn ship_template(&self) -> Result<VertexTemplate> {
        let scaled: Vec<Point> = self
            .ship_outline
            .iter()
            .map(|offset| *offset * self.ship_scale)
            .collect();
        Ok(VertexTemplate::custom(&scaled)?)
    }

    pub fn rock_spin_radians(&self) -> f64 {
        self.rock_spin_degrees.to_radians()
    }

    /// Applies `SHAPES_VIEWPORT_*` overrides. Bad values are ignored with a
    /// warning.
    pub fn with_env_overrides(mut self) -> Self {
        let width = read_env_f64(ENV_VIEWPORT_WIDTH, self.viewport.width);
        let height = read_env_f64(ENV_VIEWPORT_HEIGHT, self.viewport.height);
        match Viewport::new(width, height) {
            Ok(viewport) => self.viewport = viewport,
            Err(err) => tracing::warn!(
                "{}/{} override rejected ({}). Keeping {}x{}.",
                ENV_VIEWPORT_WIDTH,
                ENV_VIEWPORT_HEIGHT,
                err,
                self.viewport.width,
                self.viewport.height
            ),
        }
        self
    }
}

fn ensure_at_most(name: &str, value: usize, cap: usize) -> Result<()> {
    if value > cap {
        return Err(anyhow!("{name} ({value}) exceeds {cap}"));
    }
    Ok(())
}

/// Both ends finite, ordered, and `max - min` representable.
fn ensure_finite_range(name: &str, min: f64, max: f64) -> Result<()> {
    if !(min.is_finite() && max.is_finite() && (max - min).is_finite()) {
        return Err(anyhow!("{name} range [{min}, {max}] must be finite"));
    }
    if min > max {
        return Err(anyhow!("{name} minimum {min} exceeds maximum {max}"));
    }
    Ok(())
}

pub fn max_frames_from_env(default: u32) -> u32 {
    read_env_u32(ENV_MAX_FRAMES, default)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_f64(name: &str, default: f64) -> f64 {
    match env::var(name) {
        Ok(value) => match value.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => parsed,
            _ => {
                tracing::warn!("{} has invalid value {:?}. Using {}.", name, value, default);
                default
            }
        },
        Err(_) => default,
    }
}
