use std::f64::consts::{PI, TAU};

use shapes_core::Point;

use crate::entity::Entity;
use crate::input::FrameInput;
use crate::session::Session;

/// Heading error below which the ship counts as aimed.
const AIM_TOLERANCE: f64 = 0.06;
/// Heading error below which a shot is worth taking.
const FIRE_TOLERANCE: f64 = 0.15;
/// Clearance beyond touching at which the evader starts running.
const EVADE_MARGIN: f64 = 60.0;

pub trait Pilot: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_input(&mut self, session: &Session) -> FrameInput;
}

pub fn pilot_ids() -> &'static [&'static str] {
    &["idle", "spinner", "hunter", "evader"]
}

pub fn create_pilot(id: &str) -> Option<Box<dyn Pilot>> {
    match id {
        "idle" => Some(Box::new(IdlePilot)),
        "spinner" => Some(Box::new(SpinnerPilot::default())),
        "hunter" => Some(Box::new(HunterPilot)),
        "evader" => Some(Box::new(EvaderPilot)),
        _ => None,
    }
}

pub fn describe_pilots() -> Vec<(&'static str, &'static str)> {
    pilot_ids()
        .iter()
        .filter_map(|id| create_pilot(id))
        .map(|pilot| (pilot.id(), pilot.description()))
        .collect()
}

/// Signed heading change in `[-π, π)` that turns `from` onto `to`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

fn nearest_rock(session: &Session) -> Option<&Entity> {
    let ship = session.ship().body.position();
    session
        .rocks()
        .iter()
        .filter(|rock| rock.is_live())
        .min_by(|a, b| {
            ship.distance(a.body.position())
                .total_cmp(&ship.distance(b.body.position()))
        })
}

fn bearing(from: Point, to: Point) -> f64 {
    (to - from).angle()
}

/// Turn toward `target` and fire once roughly lined up.
fn aim_at(session: &Session, target: Point) -> FrameInput {
    let ship = &session.ship().body;
    let error = angle_diff(ship.heading(), bearing(ship.position(), target));
    FrameInput {
        left: error > AIM_TOLERANCE,
        right: error < -AIM_TOLERANCE,
        fire: error.abs() < FIRE_TOLERANCE && session.can_fire(),
        ..FrameInput::IDLE
    }
}

struct IdlePilot;

impl Pilot for IdlePilot {
    fn id(&self) -> &'static str {
        "idle"
    }

    fn description(&self) -> &'static str {
        "holds no controls"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, _session: &Session) -> FrameInput {
        FrameInput::IDLE
    }
}

#[derive(Default)]
struct SpinnerPilot {
    clockwise: bool,
}

impl Pilot for SpinnerPilot {
    fn id(&self) -> &'static str {
        "spinner"
    }

    fn description(&self) -> &'static str {
        "turns in place and fires whenever it can; direction picked from the seed"
    }

    fn reset(&mut self, seed: u32) {
        self.clockwise = seed & 1 == 1;
    }

    fn next_input(&mut self, session: &Session) -> FrameInput {
        FrameInput {
            left: !self.clockwise,
            right: self.clockwise,
            fire: session.can_fire(),
            ..FrameInput::IDLE
        }
    }
}

struct HunterPilot;

impl Pilot for HunterPilot {
    fn id(&self) -> &'static str {
        "hunter"
    }

    fn description(&self) -> &'static str {
        "looks at the nearest rock and fires when aligned"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, session: &Session) -> FrameInput {
        match nearest_rock(session) {
            Some(rock) => aim_at(session, rock.body.position()),
            None => FrameInput::IDLE,
        }
    }
}

struct EvaderPilot;

impl Pilot for EvaderPilot {
    fn id(&self) -> &'static str {
        "evader"
    }

    fn description(&self) -> &'static str {
        "hunts like `hunter` but turns tail and thrusts when a rock closes in"
    }

    fn reset(&mut self, _seed: u32) {}

    fn next_input(&mut self, session: &Session) -> FrameInput {
        let Some(rock) = nearest_rock(session) else {
            return FrameInput::IDLE;
        };
        let ship = &session.ship().body;
        let reach = (ship.max_extent() + rock.body.max_extent()) / 2.0 + EVADE_MARGIN;
        if ship.position().distance(rock.body.position()) > reach {
            return aim_at(session, rock.body.position());
        }

        let away = bearing(rock.body.position(), ship.position());
        let error = angle_diff(ship.heading(), away);
        FrameInput {
            left: error > AIM_TOLERANCE,
            right: error < -AIM_TOLERANCE,
            thrust: true,
            ..FrameInput::IDLE
        }
    }
}
