use serde::{Deserialize, Serialize};
use shapes_core::PolygonBody;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ship,
    Rock,
    Bullet,
}

/// Per-entity gameplay state, kept outside the body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EntityState {
    pub is_live: bool,
    pub health: i32,
    /// Radians of self-rotation applied every frame.
    pub spin_velocity: f64,
    /// Distance walked along the heading every frame.
    pub drift_speed: f64,
    /// Frames left before a bullet expires. Unused for other kinds.
    pub ttl: u32,
    pub colliding: bool,
}

impl EntityState {
    pub fn live() -> Self {
        Self {
            is_live: true,
            health: 0,
            spin_velocity: 0.0,
            drift_speed: 0.0,
            ttl: 0,
            colliding: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub body: PolygonBody,
    pub state: EntityState,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, body: PolygonBody) -> Self {
        Self {
            id,
            kind,
            body,
            state: EntityState::live(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.state.is_live
    }
}
