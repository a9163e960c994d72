use bevy::prelude::*;
use bevy::app::AppExit;
use bevy::time::Fixed;
use crate::plugins::game_state::Session;

// Core simulation timing & shared gameplay configuration/types.
//
// World coordinates are screen-space: +y points DOWN, so "above the terrain"
// means a smaller y and gravity is a positive acceleration.

/// Internal distance units per yard. Every distance-facing output (shot
/// distances, logs) converts through this single ratio.
pub const UNITS_PER_YARD: f32 = 20.0;

/// Downward gravity acceleration in units/s².
pub const GRAVITY: f32 = 1500.0;

/// Fixed gameplay tick length (60 Hz).
pub const TICK_DT: f32 = 1.0 / 60.0;

pub fn to_yards(units: f32) -> f32 {
    units / UNITS_PER_YARD
}

pub fn yards(y: f32) -> f32 {
    y * UNITS_PER_YARD
}

#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / 60.0;
    }
}

#[derive(Resource)]
pub struct AutoConfig {
    pub run_duration_seconds: f32,
    pub swing_interval_seconds: f32,
}
impl Default for AutoConfig {
    fn default() -> Self {
        Self { run_duration_seconds: 600.0, swing_interval_seconds: 2.0 }
    }
}

#[derive(Resource, Default)]
pub struct AutoRuntime { pub next_swing_tick: u64 }
#[derive(Resource, Default)]
pub struct LogState { pub last_logged_second: u64 }

#[derive(Resource, Default)]
pub struct ExitState { pub triggered: bool }

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .init_resource::<AutoConfig>() // respect pre-inserted AutoConfig (e.g. from --runtime flag)
            .insert_resource(AutoRuntime::default())
            .insert_resource(LogState::default())
            .insert_resource(ExitState::default())
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_systems(FixedUpdate, tick_state)
            .add_systems(Update, exit_after_runtime);
    }
}

pub fn tick_state(mut sim: ResMut<SimState>, session: Option<Res<Session>>) {
    if let Some(session) = session {
        if session.round_over {
            return; // freeze simulation timing once the round is finished
        }
    }
    sim.advance_fixed();
}

fn exit_after_runtime(
    sim: Res<SimState>,
    auto: Res<AutoConfig>,
    mut exit_state: ResMut<ExitState>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if exit_state.triggered { return; }
    if sim.elapsed_seconds >= auto.run_duration_seconds {
        info!("EXIT runtime reached seconds={}", sim.elapsed_seconds);
        exit_state.triggered = true;
        ev_exit.send(AppExit::Success);
    }
}
