// Hazard, hole-out and stabilization flow driven through the real
// FixedUpdate schedule.

use fairway::prelude::*;
use bevy::prelude::*;

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoreSimPlugin)
        .add_plugins(ClubPlugin)
        .add_plugins(WindPlugin)
        .add_plugins(GameStatePlugin)
        .add_plugins(BallPlugin);
    // Calm the wind so trajectories stay deterministic.
    app.insert_resource(WindConfig { force_scale: 0.0, ..WindConfig::default() });
    app
}

fn flat_course_with(hazards: Vec<HazardArea>) -> Course {
    let params = CourseParams {
        hill_amplitude: 0.0,
        detail_amplitude: 0.0,
        ..CourseParams::default()
    };
    let green = GreenZone {
        start_x: 5000.0,
        end_x: 5600.0,
        surface_y: params.base_height - 35.0,
        transition: 240.0,
    };
    Course::generate(&params, green, hazards)
}

fn spawn_resting_ball(app: &mut App, course: &Course, x: f32) -> (Entity, Vec2) {
    let radius = BallConfig::default().radius;
    let pos = Vec2::new(x, course.height_at(x) - radius);
    let id = app
        .world_mut()
        .spawn((Ball, BallMotion::at_rest(pos), Transform::from_xyz(pos.x, pos.y, 0.0)))
        .id();
    (id, pos)
}

fn hit_ball(app: &mut App, entity: Entity, pos: Vec2, club: Club, charge: f32) {
    let clubs = ClubTable::default();
    let cfg = BallConfig::default();
    let mut motion = app.world_mut().get_mut::<BallMotion>(entity).unwrap();
    motion.hit(pos, club, clubs.get(club), charge, false, 1.0, &cfg, &mut rand::thread_rng());
    app.world_mut().resource_mut::<Session>().record_stroke();
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

#[test]
fn water_penalty_fires_once_and_relocates_the_ball() {
    let mut app = build_app();
    let water = HazardArea::new(HazardKind::Water, 1000.0, 400.0, 614.0);
    let course = flat_course_with(vec![water]);
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4, 4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, 500.0);

    // An iron at partial charge carries into the pond.
    hit_ball(&mut app, ball, pos, Club::Iron, 0.37);

    let mut penalties = 0;
    for _ in 0..600 {
        app.world_mut().run_schedule(FixedUpdate);
        penalties += drain::<WaterPenaltyEvent>(&mut app).len();
    }
    assert_eq!(penalties, 1, "the splash must be penalized exactly once");

    let motion = app.world().get::<BallMotion>(ball).unwrap();
    assert!(motion.is_stabilized(), "a dropped ball is stabilized");
    let t = app.world().get::<Transform>(ball).unwrap();
    assert!(
        !water.span_contains(t.translation.x),
        "drop at x={} must be outside the hazard span",
        t.translation.x
    );

    let session = app.world().resource::<Session>();
    assert_eq!(session.current_strokes(), 2, "one swing plus the penalty stroke");
}

#[test]
fn hole_completion_is_latched_and_flags_the_ace() {
    let mut app = build_app();
    let course = flat_course_with(Vec::new());
    let pin = course.pin();
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![3]));
    // Tap-in distance from the cup.
    let (ball, pos) = spawn_resting_ball(&mut app, &course, pin.x - 10.0);
    hit_ball(&mut app, ball, pos, Club::Putter, 0.0);

    let mut completions = Vec::new();
    for _ in 0..180 {
        app.world_mut().run_schedule(FixedUpdate);
        completions.extend(drain::<HoleCompletedEvent>(&mut app));
    }
    assert_eq!(completions.len(), 1, "completion must fire exactly once");
    assert!(completions[0].hole_in_one, "a single-stroke hole is an ace");

    let motion = app.world().get::<BallMotion>(ball).unwrap();
    assert!(motion.is_hole_completed());
    assert!(motion.is_stabilized());

    // Only hole of the card, so the round is over.
    assert!(app.world().resource::<Session>().round_over);
}

#[test]
fn completing_a_middle_hole_schedules_the_next_tee() {
    let mut app = build_app();
    let course = flat_course_with(Vec::new());
    let pin = course.pin();
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4, 4, 4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, pin.x - 10.0);
    hit_ball(&mut app, ball, pos, Club::Putter, 0.0);

    for _ in 0..60 {
        app.world_mut().run_schedule(FixedUpdate);
    }

    let session = app.world().resource::<Session>();
    assert!(!session.round_over);
    let transition = app.world().resource::<HoleTransition>();
    let pending = transition.pending.expect("next hole must be scheduled");
    assert_eq!(pending.hole, 1);
    assert!(pending.at_tick > app.world().resource::<SimState>().tick);
    let _ = ball;
}

#[test]
fn putt_rolls_out_monotonically_then_freezes() {
    let mut app = build_app();
    let course = flat_course_with(Vec::new());
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, 500.0);
    hit_ball(&mut app, ball, pos, Club::Putter, 0.5);

    let mut last_distance = 0.0_f32;
    for _ in 0..600 {
        app.world_mut().run_schedule(FixedUpdate);
        let motion = app.world().get::<BallMotion>(ball).unwrap();
        let d = motion.shot_distance_yards();
        assert!(d >= last_distance - 1e-4, "shot distance must never shrink");
        last_distance = d;
    }

    let motion = app.world().get::<BallMotion>(ball).unwrap();
    assert!(motion.is_stabilized(), "a putt on flat ground must settle");
    assert!(!motion.is_tracking());
    assert!(last_distance > 0.0);
    assert_eq!(motion.last_shot_distance_yards(), last_distance);

    // Pinned: further ticks leave the ball exactly where it froze.
    let frozen = app.world().get::<Transform>(ball).unwrap().translation;
    for _ in 0..120 {
        app.world_mut().run_schedule(FixedUpdate);
    }
    assert_eq!(app.world().get::<Transform>(ball).unwrap().translation, frozen);
}

#[test]
fn backspin_bites_on_first_touchdown() {
    let mut app = build_app();
    let course = flat_course_with(Vec::new());
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, 500.0);

    let clubs = ClubTable::default();
    let cfg = BallConfig::default();
    {
        let mut motion = app.world_mut().get_mut::<BallMotion>(ball).unwrap();
        motion.hit(pos, Club::Wedge, clubs.get(Club::Wedge), 0.5, true, 1.0, &cfg, &mut rand::thread_rng());
    }
    app.world_mut().resource_mut::<Session>().record_stroke();

    let mut max_x = pos.x;
    for _ in 0..900 {
        app.world_mut().run_schedule(FixedUpdate);
        max_x = max_x.max(app.world().get::<Transform>(ball).unwrap().translation.x);
    }
    let motion = app.world().get::<BallMotion>(ball).unwrap();
    assert!(motion.is_stabilized());
    let final_x = app.world().get::<Transform>(ball).unwrap().translation.x;
    assert!(
        final_x < max_x - 10.0,
        "backspin must pull the ball back off its pitch mark (final {final_x}, max {max_x})"
    );
}

#[test]
fn ball_never_freezes_on_a_steep_face() {
    // Exaggerated hills: the clamp band turns the tallest waves into plateaus
    // joined by steep faces.
    let params = CourseParams {
        hill_amplitude: 2000.0,
        detail_amplitude: 0.0,
        ..CourseParams::default()
    };
    let green = GreenZone {
        start_x: 5000.0,
        end_x: 5600.0,
        surface_y: params.base_height - 35.0,
        transition: 240.0,
    };
    let course = Course::generate(&params, green, Vec::new());
    let rest_slope_max = BallConfig::default().rest_slope_max;
    let x_steep = (0..280)
        .map(|i| i as f32 * 20.0 + 10.0)
        .find(|&x| course.slope_at(x).abs() > rest_slope_max && !course.green().complex_contains(x))
        .expect("amplified terrain must contain a steep segment");

    let mut app = build_app();
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, x_steep);
    hit_ball(&mut app, ball, pos, Club::Putter, 0.0);

    for _ in 0..1800 {
        app.world_mut().run_schedule(FixedUpdate);
    }
    let motion = app.world().get::<BallMotion>(ball).unwrap();
    if motion.is_stabilized() {
        let x = app.world().get::<Transform>(ball).unwrap().translation.x;
        assert!(
            course.slope_at(x).abs() <= rest_slope_max + 1e-3,
            "a stabilized ball must not be resting on a steep incline (x={x})"
        );
    }
}

#[test]
fn bunker_entry_dampens_and_reports_once() {
    let mut app = build_app();
    let bunker = HazardArea::new(HazardKind::Bunker, 900.0, 360.0, 604.0);
    let course = flat_course_with(vec![bunker]);
    app.insert_resource(course.clone());
    app.insert_resource(Session::new(vec![4]));
    let (ball, pos) = spawn_resting_ball(&mut app, &course, 500.0);
    hit_ball(&mut app, ball, pos, Club::Iron, 0.30);

    let mut entries = 0;
    for _ in 0..600 {
        app.world_mut().run_schedule(FixedUpdate);
        entries += drain::<BunkerEvent>(&mut app).iter().filter(|e| e.entered).count();
    }
    assert_eq!(entries, 1, "a single visit reports a single entry");
    let motion = app.world().get::<BallMotion>(ball).unwrap();
    assert!(motion.is_in_bunker(), "the damped ball settles in the sand");
    assert!(motion.is_stabilized());
}
