// Course definitions (RON) & per-hole world setup.
//
// A course is a list of hole definitions authored in yards; hole setup
// converts to world units, generates the terrain and places the ball on the
// tee. A read or parse failure falls back to the built-in nine so a bad
// file produces a playable (if wrong-looking) course rather than a crash.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use rand::Rng;

use crate::plugins::ball::{Ball, BallConfig, BallMotion};
use crate::plugins::core_sim::{yards, SimState};
use crate::plugins::course::{Course, CourseParams, GreenZone};
use crate::plugins::game_state::{HoleTransition, Session};
use crate::plugins::hazard::{HazardArea, HazardKind};

// ----------------------- Course Definition (RON) -----------------------

#[derive(Debug, Deserialize, Clone, Resource)]
pub struct CourseDef {
    pub holes: Vec<HoleDef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HoleDef {
    pub par: u32,
    pub width_yards: f32,
    /// Fairway baseline in screen units (+y down).
    pub base_height: f32,
    pub hill_amplitude: f32,
    pub tee_yards: f32,
    pub green: GreenDef,
    pub hazards: Vec<HazardDef>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GreenDef {
    pub start_yards: f32,
    pub width_yards: f32,
    /// Height of the putting surface above the fairway baseline.
    pub elevation: f32,
    pub transition_yards: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct HazardDef {
    pub kind: HazardKind,
    pub start_yards: f32,
    pub width_yards: f32,
    /// Surface level relative to the fairway baseline; positive sits lower.
    pub surface_offset: f32,
}

// ----------------------- Plugin -----------------------

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_course)
            .add_systems(
                FixedUpdate,
                advance_hole.after(crate::plugins::ball::ball_physics),
            )
            .add_systems(Update, reset_round);
    }
}

// ----------------------- Systems -----------------------

const COURSE_PATH: &str = "assets/courses/course1.ron";

fn load_course(mut commands: Commands, ball_cfg: Res<BallConfig>) {
    let def = match fs::read_to_string(COURSE_PATH) {
        Ok(data) => match ron::from_str::<CourseDef>(&data) {
            Ok(def) if !def.holes.is_empty() => def,
            Ok(_) => {
                error!("{COURSE_PATH} defines no holes, using built-in course");
                builtin_course()
            }
            Err(e) => {
                error!("Failed to parse {COURSE_PATH}: {e}, using built-in course");
                builtin_course()
            }
        },
        Err(e) => {
            error!("Failed to read {COURSE_PATH}: {e}, using built-in course");
            builtin_course()
        }
    };

    let pars = def.holes.iter().map(|h| h.par).collect();
    let course = build_course(&def.holes[0]);
    let tee = tee_position(&course, &ball_cfg);

    info!(
        "Course loaded: {} holes — hole 1 par {} ({:.0} yd)",
        def.holes.len(),
        def.holes[0].par,
        def.holes[0].width_yards,
    );

    commands.spawn((
        Ball,
        BallMotion::at_rest(tee),
        TransformBundle::from_transform(Transform::from_xyz(tee.x, tee.y, 0.0)),
    ));
    commands.insert_resource(Session::new(pars));
    commands.insert_resource(course);
    commands.insert_resource(def);
}

/// Deferred hole change scheduled by the completion handler.
fn advance_hole(
    mut commands: Commands,
    sim: Res<SimState>,
    mut transition: ResMut<HoleTransition>,
    def: Option<Res<CourseDef>>,
    mut session: Option<ResMut<Session>>,
    ball_cfg: Res<BallConfig>,
    mut q_ball: Query<(&mut Transform, &mut BallMotion), With<Ball>>,
) {
    let Some(pending) = transition.pending else { return; };
    if sim.tick < pending.at_tick {
        return;
    }
    transition.pending = None;
    let (Some(def), Some(session)) = (def, session.as_mut()) else { return; };
    let Some(hole) = def.holes.get(pending.hole) else { return; };

    session.current_hole = pending.hole;
    let course = build_course(hole);
    let tee = tee_position(&course, &ball_cfg);

    if let Ok((mut t, mut motion)) = q_ball.get_single_mut() {
        *motion = BallMotion::at_rest(tee);
        t.translation = Vec3::new(tee.x, tee.y, 0.0);
    }
    info!(
        "Hole {} — par {} ({:.0} yd)",
        pending.hole + 1,
        hole.par,
        hole.width_yards,
    );
    commands.insert_resource(course);
}

/// Restart the round once it is over.
fn reset_round(
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut sim: ResMut<SimState>,
    def: Option<Res<CourseDef>>,
    mut session: Option<ResMut<Session>>,
    mut transition: ResMut<HoleTransition>,
    ball_cfg: Res<BallConfig>,
    mut q_ball: Query<(&mut Transform, &mut BallMotion), With<Ball>>,
) {
    let Some(session) = session.as_mut() else { return; };
    if !(session.round_over && keys.just_pressed(KeyCode::KeyR)) {
        return;
    }
    let Some(def) = def else { return; };

    sim.tick = 0;
    sim.elapsed_seconds = 0.0;
    session.reset();
    transition.pending = None;

    let course = build_course(&def.holes[0]);
    let tee = tee_position(&course, &ball_cfg);
    if let Ok((mut t, mut motion)) = q_ball.get_single_mut() {
        *motion = BallMotion::at_rest(tee);
        t.translation = Vec3::new(tee.x, tee.y, 0.0);
    }
    info!("Round restarted");
    commands.insert_resource(course);
}

// ----------------------- Construction -----------------------

/// Generate the terrain for one hole, with fresh random sine phases.
pub fn build_course(hole: &HoleDef) -> Course {
    let mut rng = rand::thread_rng();
    let params = CourseParams {
        width: yards(hole.width_yards),
        base_height: hole.base_height,
        hill_amplitude: hole.hill_amplitude,
        wave_phases: [
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
        ],
        detail_seed: rng.gen(),
        tee_x: yards(hole.tee_yards),
        ..CourseParams::default()
    };

    let green_start = yards(hole.green.start_yards);
    let green = GreenZone {
        start_x: green_start,
        end_x: green_start + yards(hole.green.width_yards),
        surface_y: hole.base_height - hole.green.elevation,
        transition: yards(hole.green.transition_yards),
    };

    let hazards = hole
        .hazards
        .iter()
        .map(|h| {
            HazardArea::new(
                h.kind,
                yards(h.start_yards),
                yards(h.width_yards),
                hole.base_height + h.surface_offset,
            )
        })
        .collect();

    Course::generate(&params, green, hazards)
}

pub fn tee_position(course: &Course, cfg: &BallConfig) -> Vec2 {
    let x = course.tee_x();
    Vec2::new(x, course.height_at(x) - cfg.radius)
}

/// Fallback layout used when the course file is missing or malformed.
pub fn builtin_course() -> CourseDef {
    let hole = |par, width, tee, green_start, hazards: Vec<HazardDef>| HoleDef {
        par,
        width_yards: width,
        base_height: 600.0,
        hill_amplitude: 110.0,
        tee_yards: tee,
        green: GreenDef {
            start_yards: green_start,
            width_yards: 30.0,
            elevation: 35.0,
            transition_yards: 12.0,
        },
        hazards,
    };
    let water = |start, width| HazardDef {
        kind: HazardKind::Water,
        start_yards: start,
        width_yards: width,
        surface_offset: 14.0,
    };
    let bunker = |start, width| HazardDef {
        kind: HazardKind::Bunker,
        start_yards: start,
        width_yards: width,
        surface_offset: 4.0,
    };

    CourseDef {
        holes: vec![
            hole(4, 320.0, 15.0, 270.0, vec![bunker(240.0, 18.0)]),
            hole(3, 180.0, 12.0, 140.0, vec![water(80.0, 35.0)]),
            hole(5, 420.0, 15.0, 370.0, vec![water(180.0, 40.0), bunker(340.0, 20.0)]),
            hole(4, 300.0, 12.0, 250.0, vec![bunker(120.0, 22.0), bunker(225.0, 15.0)]),
            hole(3, 160.0, 10.0, 125.0, vec![]),
            hole(4, 350.0, 15.0, 300.0, vec![water(150.0, 45.0)]),
            hole(5, 440.0, 15.0, 390.0, vec![bunker(200.0, 25.0), water(290.0, 38.0)]),
            hole(4, 310.0, 12.0, 260.0, vec![bunker(235.0, 16.0)]),
            hole(4, 330.0, 15.0, 280.0, vec![water(110.0, 30.0), bunker(255.0, 14.0)]),
        ],
    }
}
