// Terrain generation & query properties.

use fairway::prelude::*;
use bevy::math::Vec2;
use proptest::prelude::*;

fn rolling_params() -> CourseParams {
    CourseParams {
        width: 6000.0,
        hill_amplitude: 110.0,
        wave_phases: [0.7, 1.9, 4.2],
        ..CourseParams::default()
    }
}

fn mid_green(params: &CourseParams) -> GreenZone {
    GreenZone {
        start_x: 5000.0,
        end_x: 5600.0,
        surface_y: params.base_height - 35.0,
        transition: 240.0,
    }
}

fn rolling_course() -> Course {
    let params = rolling_params();
    let green = mid_green(&params);
    Course::generate(&params, green, Vec::new())
}

fn flat_course_with(hazards: Vec<HazardArea>) -> Course {
    let params = CourseParams {
        hill_amplitude: 0.0,
        detail_amplitude: 0.0,
        ..rolling_params()
    };
    let green = mid_green(&params);
    Course::generate(&params, green, hazards)
}

#[test]
fn height_queries_clamp_out_of_range() {
    let course = rolling_course();
    assert_eq!(course.height_at(-500.0), course.height_at(0.0));
    assert_eq!(course.height_at(course.width() + 500.0), course.height_at(course.width()));
    assert_eq!(course.slope_at(-1.0), 0.0);
    assert_eq!(course.slope_at(course.width() + 1.0), 0.0);
}

#[test]
fn green_surface_is_exactly_flat() {
    let course = rolling_course();
    let green = *course.green();
    let mut x = green.start_x;
    while x <= green.end_x {
        assert_eq!(course.slope_at(x), 0.0, "green must be flat at x={x}");
        assert!(
            (course.height_at(x) - green.surface_y).abs() < 1e-3,
            "green height must be the authored surface at x={x}"
        );
        x += 35.0;
    }
}

#[test]
fn slope_matches_height_finite_difference() {
    let course = rolling_course();
    // Segment midpoints, away from the green complex and domain edges.
    for i in 5..240 {
        let x = (i as f32 + 0.5) * 20.0;
        if course.green().complex_contains(x) {
            continue;
        }
        let slope = course.slope_at(x);
        if slope.abs() >= 0.6 {
            continue; // look-ahead segments intentionally diverge from local FD
        }
        let e = 4.0;
        let fd = (course.height_at(x + e) - course.height_at(x - e)) / (2.0 * e);
        assert!(
            (fd - slope).abs() < 1e-3,
            "slope {slope} disagrees with finite difference {fd} at x={x}"
        );
    }
}

#[test]
fn normals_are_unit_length_and_point_up() {
    let course = rolling_course();
    for i in 0..120 {
        let x = i as f32 * 50.0;
        let n = course.normal_at(x);
        assert!((n.length() - 1.0).abs() < 1e-4);
        assert!(n.y < 0.0, "normal must point away from the ground (-y is up)");
    }
}

#[test]
fn pin_sits_at_green_center_on_its_surface() {
    let course = rolling_course();
    let green = course.green();
    assert_eq!(course.pin().x, green.center());
    assert_eq!(course.pin().y, green.surface_y);
    assert!(course.is_at_pin(course.pin()));
    assert!(!course.is_at_pin(course.pin() + Vec2::new(HOLE_RADIUS + 1.0, 0.0)));
}

#[test]
fn hazard_containment_is_reflexive_at_its_corner() {
    let water = HazardArea::new(HazardKind::Water, 1000.0, 400.0, 614.0);
    assert!(water.contains(1000.0, 614.0));
    assert!(!water.contains(999.0, 614.0));
    assert!(!water.contains(1401.0, 614.0));
    // Slightly above the surface still counts; far above does not.
    assert!(water.contains(1200.0, 610.0));
    assert!(!water.contains(1200.0, 560.0));
}

#[test]
fn course_reports_membership_across_all_hazards() {
    let water = HazardArea::new(HazardKind::Water, 1000.0, 400.0, 614.0);
    let bunker = HazardArea::new(HazardKind::Bunker, 3000.0, 300.0, 604.0);
    let course = flat_course_with(vec![water, bunker]);
    assert!(course.is_in_water(Vec2::new(1200.0, 630.0)));
    assert!(!course.is_in_water(Vec2::new(3100.0, 630.0)));
    assert!(course.is_in_bunker(Vec2::new(3100.0, 610.0)));
    assert!(course.hazard_containing(Vec2::new(200.0, 600.0)).is_none());
}

#[test]
fn drop_position_lands_on_the_approach_side() {
    let water = HazardArea::new(HazardKind::Water, 1000.0, 400.0, 614.0);
    let course = flat_course_with(vec![water]);
    let toward_green = course.drop_position(&water, 250.0);
    assert!(toward_green.x < water.start_x);
    let toward_tee = course.drop_position(&water, -250.0);
    assert!(toward_tee.x > water.end_x());
    // Ground-resolved y.
    assert!((toward_green.y - course.height_at(toward_green.x)).abs() < 1e-3);
}

#[test]
fn drop_position_never_lands_inside_or_out_of_bounds() {
    // Hazard spanning the tee: the near-side candidate clamps into the span,
    // so the far side must be used.
    let water = HazardArea::new(HazardKind::Water, 250.0, 500.0, 614.0);
    let course = flat_course_with(vec![water]);
    for approach in [250.0_f32, -250.0] {
        let drop = course.drop_position(&water, approach);
        assert!(!water.span_contains(drop.x), "drop at {} is inside the hazard", drop.x);
        assert!(drop.x >= course.tee_x());
        assert!(drop.x <= course.green().end_x);
    }
}

proptest! {
    #[test]
    fn height_stays_within_the_configured_band(x in -500.0f32..7500.0) {
        let params = rolling_params();
        let green = mid_green(&params);
        let course = Course::generate(&params, green, Vec::new());
        let y = course.height_at(x);
        prop_assert!(y >= params.ceiling_y - 1e-3);
        prop_assert!(y <= params.floor_y + 1e-3);
    }

    #[test]
    fn height_band_holds_for_any_phases(
        p0 in 0.0f32..std::f32::consts::TAU,
        p1 in 0.0f32..std::f32::consts::TAU,
        p2 in 0.0f32..std::f32::consts::TAU,
    ) {
        let params = CourseParams { wave_phases: [p0, p1, p2], ..rolling_params() };
        let green = mid_green(&params);
        let course = Course::generate(&params, green, Vec::new());
        for sample in course.height_samples() {
            prop_assert!(sample.y >= params.ceiling_y - 1e-3);
            prop_assert!(sample.y <= params.floor_y + 1e-3);
        }
    }
}
