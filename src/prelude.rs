//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::core_sim::{
    to_yards, yards, AutoConfig, AutoRuntime, CoreSimPlugin, SimState, GRAVITY, TICK_DT,
    UNITS_PER_YARD,
};
pub use crate::plugins::ball::{Ball, BallConfig, BallMotion, BallPlugin};
pub use crate::plugins::club::{Club, ClubPlugin, ClubProperties, ClubSelection, ClubTable};
pub use crate::plugins::course::{Course, CourseParams, GreenZone, HeightSample, HOLE_RADIUS};
pub use crate::plugins::hazard::{HazardArea, HazardKind};
pub use crate::plugins::wind::{WindConfig, WindPlugin, WindState};
pub use crate::plugins::shooting::{fire_shot, ShootingPlugin, ShotConfig, ShotMode, ShotState};
pub use crate::plugins::game_state::{
    BallGroundImpactEvent, BallHitEvent, BunkerEvent, GameStatePlugin, HoleCompletedEvent,
    HoleTransition, Session, WaterPenaltyEvent,
};
pub use crate::plugins::level::{builtin_course, build_course, CourseDef, HoleDef, LevelPlugin};
pub use crate::plugins::autoplay::AutoplayPlugin;
