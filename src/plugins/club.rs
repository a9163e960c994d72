// Club lookup table & selection cursor.
//
// Every per-club tuning constant lives here in one place: launch parameters
// consumed on a swing, plus the rolling/bunker coefficients the ball physics
// reads back for the club the shot was made with. Magnitudes are empirical;
// the relative ordering between clubs is the actual contract (the putter
// always retains the most roll, the wedge escapes sand the best, the driver
// suffers the most in it).

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Club {
    Driver,
    Iron,
    Wedge,
    Putter,
}

/// Cycling order, tee-to-green.
pub const CLUB_ORDER: [Club; 4] = [Club::Driver, Club::Iron, Club::Wedge, Club::Putter];

impl Club {
    pub fn name(&self) -> &'static str {
        match self {
            Club::Driver => "Driver",
            Club::Iron => "Iron",
            Club::Wedge => "Wedge",
            Club::Putter => "Putter",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ClubProperties {
    /// Base launch speed at nominal charge, units/s.
    pub power: f32,
    /// Loft: vertical launch component is power * sin(launch_angle).
    pub launch_angle_deg: f32,
    /// Horizontal launch multiplier.
    pub horizontal_power: f32,
    /// Putter stays on the ground.
    pub can_fly: bool,
    /// Shot dispersion, applied as a ±fraction of launch speed.
    pub variance: f32,
    /// Per-tick horizontal velocity retention while rolling (closer to 1.0
    /// rolls longer).
    pub friction: f32,
    /// Horizontal speed under which the ball is a candidate to stop, units/s.
    pub stop_speed: f32,
    /// Velocity fraction retained when the ball enters a bunker.
    pub bunker_dampening: f32,
}

/// Static per-club tuning table.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ClubTable {
    pub driver: ClubProperties,
    pub iron: ClubProperties,
    pub wedge: ClubProperties,
    pub putter: ClubProperties,
}

impl Default for ClubTable {
    fn default() -> Self {
        Self {
            driver: ClubProperties {
                power: 1700.0,
                launch_angle_deg: 18.0,
                horizontal_power: 0.95,
                can_fly: true,
                variance: 0.08,
                friction: 0.965,
                stop_speed: 30.0,
                bunker_dampening: 0.20,
            },
            iron: ClubProperties {
                power: 1250.0,
                launch_angle_deg: 28.0,
                horizontal_power: 0.88,
                can_fly: true,
                variance: 0.06,
                friction: 0.945,
                stop_speed: 28.0,
                bunker_dampening: 0.40,
            },
            wedge: ClubProperties {
                power: 850.0,
                launch_angle_deg: 50.0,
                horizontal_power: 0.64,
                can_fly: true,
                variance: 0.05,
                friction: 0.905,
                stop_speed: 26.0,
                bunker_dampening: 0.55,
            },
            putter: ClubProperties {
                power: 450.0,
                launch_angle_deg: 0.0,
                horizontal_power: 1.0,
                can_fly: false,
                variance: 0.04,
                friction: 0.988,
                stop_speed: 16.0,
                bunker_dampening: 0.30,
            },
        }
    }
}

impl ClubTable {
    pub fn get(&self, club: Club) -> &ClubProperties {
        match club {
            Club::Driver => &self.driver,
            Club::Iron => &self.iron,
            Club::Wedge => &self.wedge,
            Club::Putter => &self.putter,
        }
    }
}

/// Index cursor over [`CLUB_ORDER`].
#[derive(Resource, Debug)]
pub struct ClubSelection {
    index: usize,
}

impl Default for ClubSelection {
    fn default() -> Self {
        Self { index: 0 }
    }
}

impl ClubSelection {
    pub fn current(&self) -> Club {
        CLUB_ORDER[self.index]
    }

    pub fn select(&mut self, club: Club) {
        if let Some(i) = CLUB_ORDER.iter().position(|c| *c == club) {
            self.index = i;
        }
    }

    pub fn cycle_next(&mut self) -> Club {
        self.index = (self.index + 1) % CLUB_ORDER.len();
        self.current()
    }
}

pub struct ClubPlugin;
impl Plugin for ClubPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClubTable::default())
            .insert_resource(ClubSelection::default());
    }
}
