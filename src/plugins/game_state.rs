// Gameplay events, session scorecard and hole progression scheduling.
//
// The session is the one piece of round-wide mutable state. It is created
// when the course definition loads, reset on restart, and written only by
// the systems in this module.

use bevy::prelude::*;

use crate::plugins::club::Club;
use crate::plugins::core_sim::SimState;

// Events emitted by gameplay code, consumed here and by a host layer.

#[derive(Event, Debug)]
pub struct BallHitEvent {
    pub pos: Vec2,
    pub club: Club,
    pub charge: f32,
}

#[derive(Event, Debug)]
pub struct BallGroundImpactEvent {
    pub pos: Vec2,
    pub intensity: f32,
}

#[derive(Event, Debug)]
pub struct WaterPenaltyEvent {
    pub drop_pos: Vec2,
}

#[derive(Event, Debug)]
pub struct BunkerEvent {
    pub entered: bool,
    pub pos: Vec2,
}

#[derive(Event, Debug)]
pub struct HoleCompletedEvent {
    pub hole_in_one: bool,
}

/// Ticks between holing out and the next tee-off.
pub const HOLE_TRANSITION_TICKS: u64 = 180;

/// Round-wide scorecard. Stroke history is in-memory only and lives exactly
/// as long as the session.
#[derive(Resource, Debug)]
pub struct Session {
    pub current_hole: usize,
    pub hole_count: usize,
    strokes: Vec<u32>,
    pars: Vec<u32>,
    pub round_over: bool,
}

impl Session {
    pub fn new(pars: Vec<u32>) -> Self {
        let hole_count = pars.len();
        Self {
            current_hole: 0,
            hole_count,
            strokes: vec![0; hole_count],
            pars,
            round_over: false,
        }
    }

    pub fn reset(&mut self) {
        self.current_hole = 0;
        self.strokes.fill(0);
        self.round_over = false;
    }

    pub fn record_stroke(&mut self) {
        self.strokes[self.current_hole] += 1;
    }

    /// Water carries a one-stroke penalty.
    pub fn add_penalty_stroke(&mut self) {
        self.strokes[self.current_hole] += 1;
    }

    pub fn current_strokes(&self) -> u32 {
        self.strokes[self.current_hole]
    }

    pub fn current_par(&self) -> u32 {
        self.pars[self.current_hole]
    }

    pub fn total_strokes(&self) -> u32 {
        self.strokes.iter().sum()
    }

    pub fn total_par(&self) -> u32 {
        self.pars.iter().sum()
    }

    pub fn hole_strokes(&self) -> &[u32] {
        &self.strokes
    }

    pub fn on_last_hole(&self) -> bool {
        self.current_hole + 1 >= self.hole_count
    }
}

/// Deferred hole change, fired against the fixed tick rather than a real
/// timer so tests and the headless runner stay deterministic.
#[derive(Resource, Default, Debug)]
pub struct HoleTransition {
    pub pending: Option<PendingHole>,
}

#[derive(Clone, Copy, Debug)]
pub struct PendingHole {
    pub hole: usize,
    pub at_tick: u64,
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BallHitEvent>()
            .add_event::<BallGroundImpactEvent>()
            .add_event::<WaterPenaltyEvent>()
            .add_event::<BunkerEvent>()
            .add_event::<HoleCompletedEvent>()
            .insert_resource(HoleTransition::default())
            .add_systems(
                FixedUpdate,
                (apply_water_penalty, handle_hole_completion, log_bunker_crossings)
                    .after(crate::plugins::ball::ball_physics),
            );
    }
}

fn apply_water_penalty(
    mut ev_water: EventReader<WaterPenaltyEvent>,
    mut session: Option<ResMut<Session>>,
) {
    for ev in ev_water.read() {
        if let Some(session) = session.as_mut() {
            session.add_penalty_stroke();
            info!(
                "SPLASH hole={} penalty stroke, now {} — drop at {:.0} yd",
                session.current_hole + 1,
                session.current_strokes(),
                crate::plugins::core_sim::to_yards(ev.drop_pos.x),
            );
        }
    }
}

fn handle_hole_completion(
    mut ev_hole: EventReader<HoleCompletedEvent>,
    mut session: Option<ResMut<Session>>,
    mut transition: ResMut<HoleTransition>,
    sim: Res<SimState>,
) {
    for ev in ev_hole.read() {
        let Some(session) = session.as_mut() else { continue; };
        if ev.hole_in_one {
            info!("HOLE IN ONE on hole {}", session.current_hole + 1);
        } else {
            info!(
                "Hole {} complete in {} strokes (par {})",
                session.current_hole + 1,
                session.current_strokes(),
                session.current_par(),
            );
        }
        if session.on_last_hole() {
            session.round_over = true;
            info!(
                "Round complete: {} strokes against par {} — card {:?}",
                session.total_strokes(),
                session.total_par(),
                session.hole_strokes(),
            );
        } else if transition.pending.is_none() {
            transition.pending = Some(PendingHole {
                hole: session.current_hole + 1,
                at_tick: sim.tick + HOLE_TRANSITION_TICKS,
            });
        }
    }
}

fn log_bunker_crossings(mut ev_bunker: EventReader<BunkerEvent>) {
    for ev in ev_bunker.read() {
        if ev.entered {
            info!("Bunker at {:.0} yd", crate::plugins::core_sim::to_yards(ev.pos.x));
        }
    }
}
