// Ball components & custom kinematic shot physics: flight, bounce, roll,
// hazards, hole capture and stabilization, advanced on the fixed tick.

use bevy::prelude::*;
use rand::Rng;

use crate::plugins::club::{Club, ClubProperties, ClubTable};
use crate::plugins::core_sim::{GRAVITY, TICK_DT, to_yards};
use crate::plugins::course::Course;
use crate::plugins::game_state::{
    BallGroundImpactEvent, BunkerEvent, HoleCompletedEvent, Session, WaterPenaltyEvent,
};
use crate::plugins::hazard::HazardKind;
use crate::plugins::wind::{WindConfig, WindState};

#[derive(Component)]
pub struct Ball;

/// Shared (club-independent) integration constants. Slope thresholds are
/// rise/run magnitudes; the bands must stay ordered flat < steep < very
/// steep even if individual magnitudes are re-tuned.
#[derive(Resource, Clone, Copy, Debug)]
pub struct BallConfig {
    pub radius: f32,
    /// Seconds under the stop speed before the ball is frozen.
    pub stop_grace_seconds: f32,
    pub steep_slope_min: f32,
    pub very_steep_slope_min: f32,
    /// Steeper than this and the ball is pushed on down-slope instead of
    /// being allowed to rest.
    pub rest_slope_max: f32,
    /// Down-slope acceleration applied instead of freezing, units/s².
    pub downslope_push: f32,
    /// Collision detection band above the surface.
    pub penetration_tolerance: f32,
    /// Widened band on steep ground so a fast ball cannot tunnel through a
    /// rise between two ticks.
    pub steep_penetration_tolerance: f32,
    /// Default restitution on ground impact.
    pub bounce: f32,
    /// Restitution when the shot carried backspin.
    pub backspin_bounce: f32,
    /// Energy kept by each successive bounce.
    pub bounce_decay: f32,
    /// Horizontal velocity fraction reversed by the backspin bite.
    pub backspin_reversal: f32,
    /// Vertical impact speed under which the ball settles instead of bouncing.
    pub bounce_rest_speed: f32,
    /// Extra per-tick roll retention multiplier on the green.
    pub green_friction: f32,
    /// Converts ball speed into wind coupling, saturating at 1.
    pub wind_speed_scale: f32,
    /// Horizontal shove away from a very steep face.
    pub anti_uphill_push: f32,
    /// Restitution of the very-steep bounce-back.
    pub steep_bounce: f32,
    /// Down-slope drift coefficient on gentle inclines.
    pub flat_nudge: f32,
    /// Minimum ground impact speed worth reporting to the host.
    pub impact_event_min: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 6.0,
            stop_grace_seconds: 0.25,
            steep_slope_min: 0.85,
            very_steep_slope_min: 1.6,
            rest_slope_max: 0.35,
            downslope_push: 650.0,
            penetration_tolerance: 2.0,
            steep_penetration_tolerance: 14.0,
            bounce: 0.48,
            backspin_bounce: 0.30,
            bounce_decay: 0.72,
            backspin_reversal: 0.45,
            bounce_rest_speed: 55.0,
            green_friction: 0.975,
            wind_speed_scale: 0.0015,
            anti_uphill_push: 220.0,
            steep_bounce: 0.55,
            flat_nudge: 90.0,
            impact_event_min: 60.0,
        }
    }
}

/// Per-ball motion state. Position lives on the `Transform`; everything the
/// state machine tracks between ticks lives here.
#[derive(Component, Debug)]
pub struct BallMotion {
    pub vel: Vec2,
    /// Club of the current shot; rolling friction reads it back.
    pub club: Club,
    bounce: f32,
    tracking: bool,
    stabilized: bool,
    rest_pos: Vec2,
    backspin_pending: bool,
    in_bunker: bool,
    hole_completed: bool,
    shot_origin: Vec2,
    shot_distance: f32,
    last_shot_distance: f32,
    stop_timer: f32,
}

impl BallMotion {
    /// A ball sitting stabilized at `pos` (tee placement, hole reset).
    pub fn at_rest(pos: Vec2) -> Self {
        Self {
            vel: Vec2::ZERO,
            club: Club::Driver,
            bounce: 0.0,
            tracking: false,
            stabilized: true,
            rest_pos: pos,
            backspin_pending: false,
            in_bunker: false,
            hole_completed: false,
            shot_origin: pos,
            shot_distance: 0.0,
            last_shot_distance: 0.0,
            stop_timer: 0.0,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_stabilized(&self) -> bool {
        self.stabilized
    }

    pub fn is_in_bunker(&self) -> bool {
        self.in_bunker
    }

    pub fn is_hole_completed(&self) -> bool {
        self.hole_completed
    }

    pub fn shot_distance_yards(&self) -> f32 {
        to_yards(self.shot_distance)
    }

    pub fn last_shot_distance_yards(&self) -> f32 {
        to_yards(self.last_shot_distance)
    }

    /// Launch the ball. Velocity is facing × horizontal power × (club power ×
    /// charge) with a small per-club dispersion; the vertical component uses
    /// the club loft and is zero for clubs that cannot fly.
    pub fn hit(
        &mut self,
        pos: Vec2,
        club: Club,
        props: &ClubProperties,
        charge: f32,
        backspin: bool,
        facing: f32,
        cfg: &BallConfig,
        rng: &mut impl Rng,
    ) {
        let charge_scale = 0.25 + charge.clamp(0.0, 1.0) * (2.0 - 0.25);
        let dispersion = rng.gen_range(1.0 - props.variance..1.0 + props.variance);
        let speed = props.power * charge_scale * dispersion;

        self.vel.x = facing.signum() * speed * props.horizontal_power;
        self.vel.y = if props.can_fly {
            -speed * props.launch_angle_deg.to_radians().sin()
        } else {
            0.0
        };
        self.club = club;
        self.bounce = if backspin { cfg.backspin_bounce } else { cfg.bounce };
        self.backspin_pending = backspin;
        self.stabilized = false;
        self.tracking = true;
        self.stop_timer = 0.0;
        self.shot_origin = pos;
        self.shot_distance = 0.0;
    }

    fn stabilize(&mut self, pos: Vec2) {
        self.stabilized = true;
        self.tracking = false;
        self.rest_pos = pos;
        self.vel = Vec2::ZERO;
        self.stop_timer = 0.0;
        self.last_shot_distance = self.shot_distance;
    }
}

pub struct BallPlugin;
impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BallConfig::default())
            .add_systems(
                FixedUpdate,
                ball_physics.after(crate::plugins::wind::update_wind),
            );
    }
}

pub fn ball_physics(
    mut q: Query<(&mut Transform, &mut BallMotion), With<Ball>>,
    course: Option<Res<Course>>,
    cfg: Res<BallConfig>,
    clubs: Res<ClubTable>,
    wind: Res<WindState>,
    wind_cfg: Res<WindConfig>,
    session: Option<Res<Session>>,
    mut ev_impact: EventWriter<BallGroundImpactEvent>,
    mut ev_water: EventWriter<WaterPenaltyEvent>,
    mut ev_bunker: EventWriter<BunkerEvent>,
    mut ev_hole: EventWriter<HoleCompletedEvent>,
) {
    let Ok((mut t, mut ball)) = q.get_single_mut() else { return; };
    // Terrain not attached yet: nothing sensible to integrate against.
    let Some(course) = course else { return; };
    let dt = TICK_DT;

    // Stabilized balls are pinned; residual jitter never reaches them.
    if ball.stabilized {
        ball.vel = Vec2::ZERO;
        t.translation.x = ball.rest_pos.x;
        t.translation.y = ball.rest_pos.y;
        return;
    }

    let mut pos = t.translation.truncate();
    let props = *clubs.get(ball.club);

    // Gravity always pulls; wind only couples while airborne, growing with
    // ball speed up to full strength.
    ball.vel.y += GRAVITY * dt;
    let airborne = pos.y + cfg.radius < course.height_at(pos.x);
    if airborne {
        let coupling = (ball.vel.length() * cfg.wind_speed_scale).min(1.0);
        ball.vel += wind.force_vector(&wind_cfg) * coupling * dt;
    }

    pos += ball.vel * dt;

    // Terrain collision. The detection band widens on steep ground so the
    // ball cannot tunnel through a sharp rise between ticks.
    let ground_y = course.height_at(pos.x);
    let slope = course.slope_at(pos.x);
    let band = if slope.abs() >= cfg.steep_slope_min {
        cfg.steep_penetration_tolerance
    } else {
        cfg.penetration_tolerance
    };
    let mut grounded = false;
    if pos.y + cfg.radius >= ground_y - band {
        grounded = true;
        pos.y = ground_y - cfg.radius;

        let impact_speed = ball.vel.y.max(0.0);
        if impact_speed > cfg.impact_event_min {
            ev_impact.send(BallGroundImpactEvent { pos, intensity: impact_speed });
        }

        // Backspin bites once, on the first ground contact after the shot.
        if ball.backspin_pending {
            ball.backspin_pending = false;
            ball.vel.x = -ball.vel.x * cfg.backspin_reversal;
        }

        let steepness = slope.abs();
        // Down-slope is the x direction in which the ground falls away
        // (y grows), i.e. the sign of the slope.
        let downhill = slope.signum();
        if steepness >= cfg.very_steep_slope_min {
            // A wall in all but name: kick the ball back out and down-slope
            // so it cannot climb the face.
            ball.vel.y = -impact_speed * cfg.steep_bounce;
            if ball.vel.x * downhill < 0.0 {
                ball.vel.x = -ball.vel.x * 0.5;
            }
            ball.vel.x += downhill * cfg.anti_uphill_push;
            ball.bounce *= cfg.bounce_decay;
        } else if steepness >= cfg.steep_slope_min {
            // Redirect off the surface normal with reduced restitution.
            let n = course.normal_at(pos.x);
            let vn = ball.vel.dot(n);
            if vn < 0.0 {
                let e = ball.bounce * 0.6;
                ball.vel -= (1.0 + e) * vn * n;
                ball.bounce *= cfg.bounce_decay;
            }
        } else {
            // Flat-ish ground: damped vertical bounce until the ball settles,
            // plus a gentle drift toward down-slope.
            if impact_speed > cfg.bounce_rest_speed {
                ball.vel.y = -impact_speed * ball.bounce;
                ball.bounce *= cfg.bounce_decay;
            } else {
                ball.vel.y = 0.0;
            }
            ball.vel.x += slope * cfg.flat_nudge * dt;
        }
    }

    // Rolling friction, tuned per club and tightened on the green.
    if grounded && ball.vel.x.abs() > 1.0 {
        let mut retain = props.friction;
        if course.green().contains(pos.x) {
            retain *= cfg.green_friction;
        }
        ball.vel.x *= retain;
    }

    // Hazards.
    let mut relocated = false;
    if let Some(hazard) = course.hazard_containing(pos).copied() {
        match hazard.kind {
            HazardKind::Water => {
                let drop = course.drop_position(&hazard, ball.vel.x);
                pos = Vec2::new(drop.x, drop.y - cfg.radius);
                ball.stabilize(pos);
                ball.in_bunker = false;
                relocated = true;
                ev_water.send(WaterPenaltyEvent { drop_pos: drop });
            }
            HazardKind::Bunker => {
                if !ball.in_bunker {
                    ball.in_bunker = true;
                    ball.vel *= props.bunker_dampening;
                    ev_bunker.send(BunkerEvent { entered: true, pos });
                }
            }
        }
    } else if ball.in_bunker
        && !course
            .hazards()
            .iter()
            .any(|h| h.kind == HazardKind::Bunker && h.span_contains(pos.x))
    {
        // Exit is judged on the horizontal span alone so a bounce inside the
        // sand does not read as leaving and re-entering.
        ball.in_bunker = false;
        ev_bunker.send(BunkerEvent { entered: false, pos });
    }

    // Hole capture, latched so it fires exactly once.
    if !relocated && !ball.hole_completed && course.is_at_pin(pos) {
        ball.hole_completed = true;
        let strokes = session.map(|s| s.current_strokes()).unwrap_or(0);
        ball.stabilize(course.pin());
        ev_hole.send(HoleCompletedEvent { hole_in_one: strokes == 1 });
        t.translation.x = ball.rest_pos.x;
        t.translation.y = ball.rest_pos.y;
        return;
    }

    // Stable-stop evaluation: slow enough for long enough freezes the ball,
    // unless it sits on an incline it should roll off of.
    if grounded && !ball.stabilized {
        let slow = ball.vel.x.abs() < props.stop_speed && ball.vel.y.abs() < cfg.bounce_rest_speed;
        if slow {
            if slope.abs() > cfg.rest_slope_max {
                ball.vel.x += slope.signum() * cfg.downslope_push * dt;
                ball.stop_timer = 0.0;
            } else {
                ball.stop_timer += dt;
                if ball.stop_timer >= cfg.stop_grace_seconds {
                    ball.stabilize(pos);
                }
            }
        } else {
            ball.stop_timer = 0.0;
        }
    }

    // Shot distance only ever grows while tracking; it freezes with the ball.
    if ball.tracking {
        let origin = ball.shot_origin;
        ball.shot_distance = ball.shot_distance.max(pos.distance(origin));
    }

    t.translation.x = pos.x;
    t.translation.y = pos.y;
}
