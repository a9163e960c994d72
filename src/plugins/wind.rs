// Wind random walk feeding a mid-flight force into the ball physics.

use bevy::prelude::*;
use rand::Rng;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WindConfig {
    /// Seconds between random perturbations.
    pub interval_seconds: f32,
    pub max_speed: f32,
    /// Largest single speed perturbation, either direction.
    pub speed_step: f32,
    /// Largest single direction perturbation, degrees either way.
    pub direction_step_deg: f32,
    /// Converts wind speed to a force magnitude on the ball.
    pub force_scale: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3.0,
            max_speed: 30.0,
            speed_step: 6.0,
            direction_step_deg: 25.0,
            force_scale: 4.0,
        }
    }
}

#[derive(Resource, Clone, Copy, Debug)]
pub struct WindState {
    /// Always within [0, max_speed].
    pub speed: f32,
    /// Degrees, wraps mod 360. 0° blows toward +x.
    pub direction_deg: f32,
    timer: f32,
}

impl Default for WindState {
    fn default() -> Self {
        Self { speed: 8.0, direction_deg: 0.0, timer: 0.0 }
    }
}

impl WindState {
    pub fn new(speed: f32, direction_deg: f32) -> Self {
        Self { speed, direction_deg, timer: 0.0 }
    }

    pub fn update(&mut self, dt: f32, cfg: &WindConfig, rng: &mut impl Rng) {
        self.timer += dt;
        while self.timer >= cfg.interval_seconds {
            self.timer -= cfg.interval_seconds;
            let dv = rng.gen_range(-cfg.speed_step..cfg.speed_step);
            let da = rng.gen_range(-cfg.direction_step_deg..cfg.direction_step_deg);
            self.speed = (self.speed + dv).clamp(0.0, cfg.max_speed);
            self.direction_deg = (self.direction_deg + da).rem_euclid(360.0);
        }
    }

    /// Cartesian force for the current wind. The vertical sign flips to the
    /// screen convention (+y down), so a 90° wind pushes the ball upward.
    pub fn force_vector(&self, cfg: &WindConfig) -> Vec2 {
        let r = self.direction_deg.to_radians();
        Vec2::new(r.cos(), -r.sin()) * self.speed * cfg.force_scale
    }
}

pub struct WindPlugin;
impl Plugin for WindPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WindConfig::default())
            .insert_resource(WindState::default())
            .add_systems(FixedUpdate, update_wind);
    }
}

pub fn update_wind(mut wind: ResMut<WindState>, cfg: Res<WindConfig>) {
    wind.update(crate::plugins::core_sim::TICK_DT, &cfg, &mut rand::thread_rng());
}
