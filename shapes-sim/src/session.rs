use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use shapes_core::{Point, PolygonBody, Segment, ShapeError, VertexTemplate, Viewport};

use crate::config::Scenario;
use crate::entity::{Entity, EntityKind};
use crate::input::FrameInput;
use crate::rng::SeededRng;

/// One ship, a field of drifting rocks and the ship's bullets, advanced one
/// frame per [`Session::step`]. Deterministic for a given seed, scenario and
/// input sequence.
#[derive(Clone, Debug)]
pub struct Session {
    scenario: Scenario,
    rng: SeededRng,
    frame_count: u32,
    next_id: u32,
    ship: Entity,
    rocks: Vec<Entity>,
    bullets: Vec<Entity>,
    score: u32,
    bullets_left: u32,
    bullets_fired: u32,
    fire_cooldown: u32,
    ship_hits: u32,
    rock_respawns: u32,
    ship_recenters: u32,
    game_over: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: EntityKind,
    pub is_live: bool,
    pub colliding: bool,
    pub screen_vertices: Vec<Point>,
}

/// Screen-space picture of a frame, ready to be drawn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u32,
    pub score: u32,
    pub health: i32,
    pub bullets_left: u32,
    pub game_over: bool,
    pub entities: Vec<EntitySnapshot>,
    pub sight: [Point; 2],
}

impl Session {
    pub fn new(seed: u32, scenario: Scenario) -> Result<Self> {
        scenario.validate()?;
        let ship_body = PolygonBody::new(Point::ORIGIN, scenario.ship_template()?)
            .context("failed to build ship")?;
        let mut ship = Entity::new(0, EntityKind::Ship, ship_body);
        ship.state.health = scenario.ship_health;

        let mut session = Self {
            rng: SeededRng::new(seed),
            frame_count: 0,
            next_id: 1,
            ship,
            rocks: Vec::with_capacity(scenario.rock_count),
            bullets: Vec::with_capacity(scenario.bullet_limit),
            score: 0,
            bullets_left: scenario.ship_bullets,
            bullets_fired: 0,
            fire_cooldown: 0,
            ship_hits: 0,
            rock_respawns: 0,
            ship_recenters: 0,
            game_over: false,
            scenario,
        };
        for _ in 0..session.scenario.rock_count {
            let rock = session.spawn_rock().context("failed to spawn rock")?;
            session.rocks.push(rock);
        }
        Ok(session)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn viewport(&self) -> &Viewport {
        &self.scenario.viewport
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn ship(&self) -> &Entity {
        &self.ship
    }

    pub fn rocks(&self) -> &[Entity] {
        &self.rocks
    }

    pub fn bullets(&self) -> &[Entity] {
        &self.bullets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bullets_left(&self) -> u32 {
        self.bullets_left
    }

    pub fn bullets_fired(&self) -> u32 {
        self.bullets_fired
    }

    pub fn ship_hits(&self) -> u32 {
        self.ship_hits
    }

    pub fn rock_respawns(&self) -> u32 {
        self.rock_respawns
    }

    pub fn ship_recenters(&self) -> u32 {
        self.ship_recenters
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// True when a bullet would leave the ship if fire were held this frame.
    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
            && self.bullets_left > 0
            && self.bullets.len() < self.scenario.bullet_limit
    }

    /// Line from the ship along its heading, long enough to cross the viewport.
    pub fn ship_sight(&self) -> Result<Segment, ShapeError> {
        let viewport = self.viewport();
        let reach = viewport.width.hypot(viewport.height);
        Segment::from_vector(*self.ship.body.orientation(), reach)
    }

    /// Advances one frame. A frame that fails part way is discarded, so the
    /// session is left exactly as it was before the call.
    pub fn step(&mut self, input: FrameInput) -> Result<()> {
        if self.game_over {
            return Ok(());
        }
        let mut next = self.clone();
        next.advance(input)?;
        *self = next;
        Ok(())
    }

    fn advance(&mut self, input: FrameInput) -> Result<()> {
        self.control_ship(input)?;
        self.advance_rocks()?;
        self.advance_bullets()?;
        self.resolve_bullet_hits()?;
        self.resolve_ship_contacts();

        if self.ship.state.health <= 0 {
            self.game_over = true;
            self.ship.state.is_live = false;
            tracing::debug!(frame = self.frame_count, "ship destroyed");
        }
        self.frame_count += 1;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<FrameSnapshot, ShapeError> {
        let viewport = self.viewport();
        let entities = std::iter::once(&self.ship)
            .chain(&self.rocks)
            .chain(&self.bullets)
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind,
                is_live: entity.state.is_live,
                colliding: entity.state.colliding,
                screen_vertices: entity
                    .body
                    .vertices()
                    .iter()
                    .map(|vertex| viewport.world_to_screen(*vertex))
                    .collect(),
            })
            .collect();
        let sight = self.ship_sight()?;
        Ok(FrameSnapshot {
            frame: self.frame_count,
            score: self.score,
            health: self.ship.state.health,
            bullets_left: self.bullets_left,
            game_over: self.game_over,
            entities,
            sight: [
                viewport.world_to_screen(sight.tail()),
                viewport.world_to_screen(sight.head()),
            ],
        })
    }

    fn control_ship(&mut self, input: FrameInput) -> Result<(), ShapeError> {
        let turn = self.scenario.ship_turn_speed;
        let speed = self.scenario.ship_speed;
        let body = &mut self.ship.body;
        if input.left {
            body.rotate(turn)?;
        }
        if input.right {
            body.rotate(-turn)?;
        }
        if input.thrust {
            body.walk(speed)?;
        }
        if input.reverse {
            body.walk(-speed)?;
        }

        if input.fire && self.can_fire() {
            let bullet = self.spawn_bullet()?;
            self.bullets.push(bullet);
            self.bullets_left -= 1;
            self.bullets_fired += 1;
            self.fire_cooldown = self.scenario.fire_cooldown_frames;
        } else {
            self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        }

        if !self.ship.body.is_inside_viewport(&self.scenario.viewport) {
            self.ship.body.move_to(0.0, 0.0)?;
            self.ship_recenters += 1;
        }
        Ok(())
    }

    fn advance_rocks(&mut self) -> Result<()> {
        for index in 0..self.rocks.len() {
            let rock = &mut self.rocks[index];
            rock.body.spin(rock.state.spin_velocity)?;
            rock.body.walk(rock.state.drift_speed)?;
            if !rock.body.is_inside_viewport(&self.scenario.viewport) {
                self.respawn_rock(index)?;
            }
        }
        Ok(())
    }

    fn advance_bullets(&mut self) -> Result<(), ShapeError> {
        for bullet in &mut self.bullets {
            bullet.body.walk(bullet.state.drift_speed)?;
            bullet.state.ttl = bullet.state.ttl.saturating_sub(1);
            if bullet.state.ttl == 0 || !bullet.body.is_inside_viewport(&self.scenario.viewport) {
                bullet.state.is_live = false;
            }
        }
        self.bullets.retain(Entity::is_live);
        Ok(())
    }

    fn resolve_bullet_hits(&mut self) -> Result<()> {
        for bullet_index in 0..self.bullets.len() {
            let hit = self
                .rocks
                .iter()
                .position(|rock| self.bullets[bullet_index].body.is_colliding(&rock.body));
            if let Some(rock_index) = hit {
                self.bullets[bullet_index].state.is_live = false;
                self.score += 1;
                self.respawn_rock(rock_index)?;
            }
        }
        self.bullets.retain(Entity::is_live);
        Ok(())
    }

    fn resolve_ship_contacts(&mut self) {
        let mut touching = false;
        for rock in &mut self.rocks {
            rock.state.colliding = self.ship.body.is_colliding(&rock.body);
            touching |= rock.state.colliding;
        }
        if touching && !self.ship.state.colliding {
            self.ship.state.health -= self.scenario.collision_damage;
            self.ship_hits += 1;
        }
        self.ship.state.colliding = touching;
    }

    fn spawn_bullet(&mut self) -> Result<Entity, ShapeError> {
        let ship = &self.ship.body;
        let mut body = PolygonBody::rectangle(
            ship.position(),
            self.scenario.bullet_width,
            self.scenario.bullet_length,
        )?;
        body.set_rotation(ship.heading())?;
        // Start at the nose rather than the ship's center.
        body.walk(ship.height() / 2.0)?;

        let mut bullet = Entity::new(self.take_id(), EntityKind::Bullet, body);
        bullet.state.drift_speed = self.scenario.bullet_speed;
        bullet.state.ttl = self.scenario.bullet_ttl_frames.max(1);
        Ok(bullet)
    }

    fn respawn_rock(&mut self, index: usize) -> Result<()> {
        let rock = self.spawn_rock()?;
        tracing::debug!(
            frame = self.frame_count,
            old_id = self.rocks[index].id,
            new_id = rock.id,
            x = rock.body.position().x,
            y = rock.body.position().y,
            "rock respawned"
        );
        self.rocks[index] = rock;
        self.rock_respawns += 1;
        Ok(())
    }

    /// New rock on a random viewport edge, heading for the world origin.
    fn spawn_rock(&mut self) -> Result<Entity> {
        let template = self.random_rock_template()?;
        let position = self.random_edge_point();
        let mut body = PolygonBody::new(position, template)?;
        body.look_at(0.0, 0.0)?;

        let max_spin = self.scenario.rock_spin_radians();
        let mut rock = Entity::new(self.take_id(), EntityKind::Rock, body);
        rock.state.spin_velocity = self.rng.next_range_f64(-max_spin, max_spin);
        rock.state.drift_speed = self
            .rng
            .next_range_f64(self.scenario.rock_min_drift, self.scenario.rock_max_drift);
        Ok(rock)
    }

    fn random_rock_template(&mut self) -> Result<VertexTemplate> {
        let outlines = self.scenario.rock_outlines.len();
        let pick = self
            .rng
            .next_between(0, outlines)
            .ok_or_else(|| anyhow!("{outlines} rock outlines is too many to pick from"))?;
        if let Some(outline) = self.scenario.rock_outlines.get(pick) {
            return Ok(VertexTemplate::custom(outline)?);
        }
        let (min, max) = (
            self.scenario.rock_min_vertices,
            self.scenario.rock_max_vertices,
        );
        let vertex_count = self
            .rng
            .next_between(min, max)
            .ok_or_else(|| anyhow!("rock vertex range {min}..={max} cannot be drawn from"))?;
        let width = self
            .rng
            .next_range_f64(self.scenario.rock_min_width, self.scenario.rock_max_width);
        Ok(VertexTemplate::regular(vertex_count, width)?)
    }

    fn random_edge_point(&mut self) -> Point {
        let half_width = self.scenario.viewport.half_width();
        let half_height = self.scenario.viewport.half_height();
        let along = self.rng.next_unit() * 2.0 - 1.0;
        match self.rng.next_below(4) {
            Some(0) => Point::new(-half_width, along * half_height),
            Some(1) => Point::new(half_width, along * half_height),
            Some(2) => Point::new(along * half_width, half_height),
            _ => Point::new(along * half_width, -half_height),
        }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
