// Scripted autoplay: plays the round headlessly, picking clubs by remaining
// distance and logging ball state each second.

use bevy::prelude::*;
use bevy::app::AppExit;

use crate::plugins::ball::{Ball, BallConfig, BallMotion};
use crate::plugins::club::{Club, ClubSelection, ClubTable};
use crate::plugins::core_sim::{to_yards, AutoConfig, AutoRuntime, ExitState, LogState, SimState};
use crate::plugins::course::Course;
use crate::plugins::game_state::{BallHitEvent, HoleTransition, Session};
use crate::plugins::shooting::fire_shot;
use crate::plugins::wind::WindState;

/// Approximate full-charge carry per club, used to scale the charge to the
/// remaining distance.
fn full_carry_yards(club: Club) -> f32 {
    match club {
        Club::Driver => 230.0,
        Club::Iron => 160.0,
        Club::Wedge => 90.0,
        Club::Putter => 40.0,
    }
}

pub struct AutoplayPlugin;
impl Plugin for AutoplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (scripted_autoplay, debug_log_each_second, exit_when_round_over),
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn scripted_autoplay(
    sim: Res<SimState>,
    mut runtime: ResMut<AutoRuntime>,
    cfg: Res<AutoConfig>,
    course: Option<Res<Course>>,
    clubs: Res<ClubTable>,
    ball_cfg: Res<BallConfig>,
    mut selection: ResMut<ClubSelection>,
    mut session: Option<ResMut<Session>>,
    transition: Res<HoleTransition>,
    mut q_ball: Query<(&Transform, &mut BallMotion), With<Ball>>,
    mut ev_hit: EventWriter<BallHitEvent>,
) {
    if sim.tick < runtime.next_swing_tick {
        return;
    }
    if transition.pending.is_some() {
        return; // between holes
    }
    let Some(course) = course else { return; };
    let Ok((t, mut ball)) = q_ball.get_single_mut() else { return; };
    if !ball.is_stabilized() || ball.is_hole_completed() {
        return;
    }
    if let Some(session) = session.as_ref() {
        if session.round_over {
            return;
        }
    }

    let pos = t.translation.truncate();
    let to_pin = course.pin().x - pos.x;
    let dist_yd = to_yards(to_pin.abs());

    let club = if course.green().contains(pos.x) || dist_yd < 25.0 {
        Club::Putter
    } else if ball.is_in_bunker() {
        Club::Wedge
    } else if dist_yd > 150.0 {
        Club::Driver
    } else if dist_yd > 70.0 {
        Club::Iron
    } else {
        Club::Wedge
    };
    selection.select(club);
    let charge = (dist_yd / full_carry_yards(club)).clamp(0.2, 1.0);

    fire_shot(
        pos,
        &mut ball,
        club,
        clubs.get(club),
        charge,
        false,
        to_pin.signum(),
        &ball_cfg,
        session.as_deref_mut(),
        &mut ev_hit,
    );

    let interval_ticks = (cfg.swing_interval_seconds * 60.0) as u64;
    runtime.next_swing_tick = sim.tick + interval_ticks.max(1);
}

fn debug_log_each_second(
    sim: Res<SimState>,
    mut log_state: ResMut<LogState>,
    wind: Res<WindState>,
    session: Option<Res<Session>>,
    q_ball: Query<(&Transform, &BallMotion), With<Ball>>,
) {
    if sim.tick == 0 || sim.tick % 60 != 0 {
        return;
    }
    let current_second = sim.tick / 60;
    if current_second == log_state.last_logged_second {
        return;
    }
    log_state.last_logged_second = current_second;
    if let Ok((t, ball)) = q_ball.get_single() {
        let hole = session.map(|s| s.current_hole + 1).unwrap_or(0);
        info!(
            "T+{}s hole={} ball=({:.0} yd, {:.0}) speed={:.0} shot={:.0} yd wind={:.1}@{:.0}°",
            current_second,
            hole,
            to_yards(t.translation.x),
            t.translation.y,
            ball.vel.length(),
            ball.shot_distance_yards(),
            wind.speed,
            wind.direction_deg,
        );
    }
}

fn exit_when_round_over(
    session: Option<Res<Session>>,
    mut exit_state: ResMut<ExitState>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if exit_state.triggered {
        return;
    }
    let Some(session) = session else { return; };
    if session.round_over {
        info!("EXIT round complete, total {} strokes", session.total_strokes());
        exit_state.triggered = true;
        ev_exit.send(AppExit::Success);
    }
}
