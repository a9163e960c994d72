use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use fairway::prelude::*;

fn main() {
    let autoplay_enabled = !std::env::args().any(|a| a == "--no-autoplay");

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
    )
    .add_plugins(bevy::log::LogPlugin::default())
    .add_plugins(bevy::input::InputPlugin)
    .add_plugins(CoreSimPlugin)      // timing + shared resources
    .add_plugins(ClubPlugin)         // club table & selection
    .add_plugins(WindPlugin)         // wind random walk
    .add_plugins(GameStatePlugin)    // events + scorecard (register events before gameplay systems)
    .add_plugins(LevelPlugin)        // course defs & hole setup
    .add_plugins(BallPlugin)         // ball physics
    .add_plugins(ShootingPlugin);    // charge + swing input
    if autoplay_enabled {
        app.add_plugins(AutoplayPlugin); // scripted headless round
    }
    app.run();
}
