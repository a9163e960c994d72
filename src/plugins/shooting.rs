// Shot charging & swing handling.
//
// Power oscillates as a triangle wave while the swing key is held; release
// fires. The same `fire_shot` entry point serves keyboard play and the
// scripted autoplay driver.

use bevy::prelude::*;

use crate::plugins::ball::{Ball, BallConfig, BallMotion};
use crate::plugins::club::{Club, ClubProperties, ClubSelection, ClubTable};
use crate::plugins::core_sim::to_yards;
use crate::plugins::game_state::{BallHitEvent, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMode {
    Idle,
    Charging,
}

#[derive(Resource, Debug)]
pub struct ShotState {
    pub mode: ShotMode,
    pub power: f32,   // 0..1 (oscillating)
    pub rising: bool, // triangle wave direction
    pub backspin: bool,
    /// +1 faces the green, -1 faces back toward the tee.
    pub facing: f32,
}
impl Default for ShotState {
    fn default() -> Self {
        Self { mode: ShotMode::Idle, power: 0.0, rising: true, backspin: false, facing: 1.0 }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct ShotConfig {
    /// Triangle wave edge speed, power units per second.
    pub osc_speed: f32,
}
impl Default for ShotConfig {
    fn default() -> Self {
        Self { osc_speed: 1.6 }
    }
}

pub struct ShootingPlugin;
impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ShotState::default())
            .insert_resource(ShotConfig::default())
            .add_systems(Update, (update_shot_charge, handle_swing_input));
    }
}

// Shot charging (triangle wave)
fn update_shot_charge(time: Res<Time>, mut state: ResMut<ShotState>, cfg: Res<ShotConfig>) {
    if state.mode != ShotMode::Charging {
        return;
    }
    let delta = cfg.osc_speed * time.delta_seconds();

    if state.rising {
        state.power += delta;
        if state.power >= 1.0 {
            state.power = 1.0;
            state.rising = false;
        }
    } else {
        state.power -= delta;
        if state.power <= 0.0 {
            state.power = 0.0;
            state.rising = true;
        }
    }
}

fn handle_swing_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<ShotState>,
    mut selection: ResMut<ClubSelection>,
    clubs: Res<ClubTable>,
    cfg: Res<BallConfig>,
    mut session: Option<ResMut<Session>>,
    mut q_ball: Query<(&Transform, &mut BallMotion), With<Ball>>,
    mut ev_hit: EventWriter<BallHitEvent>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let club = selection.cycle_next();
        info!("Club: {}", club.name());
    }
    if keys.just_pressed(KeyCode::KeyB) {
        state.backspin = !state.backspin;
        info!("Backspin {}", if state.backspin { "on" } else { "off" });
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        state.facing = -1.0;
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        state.facing = 1.0;
    }

    let Ok((t, mut ball)) = q_ball.get_single_mut() else { return; };
    // Swings only from a settled ball on an open hole.
    let ready = ball.is_stabilized() && !ball.is_hole_completed();

    if keys.just_pressed(KeyCode::Space) && state.mode == ShotMode::Idle && ready {
        state.mode = ShotMode::Charging;
        state.power = 0.0;
        state.rising = true;
    }

    if keys.just_released(KeyCode::Space) && state.mode == ShotMode::Charging {
        state.mode = ShotMode::Idle;
        if ready {
            let club = selection.current();
            fire_shot(
                t.translation.truncate(),
                &mut ball,
                club,
                clubs.get(club),
                state.power,
                state.backspin,
                state.facing,
                &cfg,
                session.as_deref_mut(),
                &mut ev_hit,
            );
        }
        state.power = 0.0;
    }
}

/// Launch the ball and account the stroke. Shared by input handling and the
/// autoplay driver.
#[allow(clippy::too_many_arguments)]
pub fn fire_shot(
    pos: Vec2,
    ball: &mut BallMotion,
    club: Club,
    props: &ClubProperties,
    charge: f32,
    backspin: bool,
    facing: f32,
    cfg: &BallConfig,
    session: Option<&mut Session>,
    ev_hit: &mut EventWriter<BallHitEvent>,
) {
    ball.hit(pos, club, props, charge, backspin, facing, cfg, &mut rand::thread_rng());
    if let Some(session) = session {
        session.record_stroke();
        info!(
            "Shot {} on hole {}: {} at {:.0}% charge from {:.0} yd",
            session.current_strokes(),
            session.current_hole + 1,
            club.name(),
            charge * 100.0,
            to_yards(pos.x),
        );
    }
    ev_hit.send(BallHitEvent { pos, club, charge });
}
