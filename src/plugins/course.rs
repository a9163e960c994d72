// Procedural hole terrain: 1-D height-field generation, smoothing and the
// query surface the ball physics and a host renderer consume.
//
// Heights are screen-space (+y down): a smaller y is higher ground. Samples
// are laid out at a fixed horizontal spacing, built once per hole and never
// mutated afterwards. All queries are total over the real line; x outside
// the course clamps to the boundary samples.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};

use crate::plugins::hazard::{HazardArea, HazardKind};

/// Radius around the pin that counts as holing out.
pub const HOLE_RADIUS: f32 = 15.0;

/// Local slope magnitude above which `slope_at` consults a farther sample
/// instead of the immediate segment.
const SLOPE_LOOKAHEAD_MIN: f32 = 0.6;
/// Even steeper local readings look farther still.
const SLOPE_LOOKAHEAD_FAR_MIN: f32 = 1.4;

/// One sample of the height-field.
#[derive(Clone, Copy, Debug)]
pub struct HeightSample {
    pub x: f32,
    pub y: f32,
    pub is_green: bool,
}

/// Green placement and authored elevation for one hole.
#[derive(Clone, Copy, Debug)]
pub struct GreenZone {
    pub start_x: f32,
    pub end_x: f32,
    /// Flat putting-surface elevation.
    pub surface_y: f32,
    /// Width of the slope-transition zone on each side.
    pub transition: f32,
}

impl GreenZone {
    pub fn center(&self) -> f32 {
        (self.start_x + self.end_x) * 0.5
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.start_x && x <= self.end_x
    }

    /// Green complex: the putting surface plus its transition aprons.
    pub fn complex_contains(&self, x: f32) -> bool {
        x >= self.start_x - self.transition && x <= self.end_x + self.transition
    }
}

/// Everything `Course::generate` needs for one hole.
#[derive(Clone, Debug)]
pub struct CourseParams {
    pub width: f32,
    pub segment_width: f32,
    /// Baseline fairway elevation the sine hills carve into.
    pub base_height: f32,
    pub hill_amplitude: f32,
    /// Phase offsets for the three superposed waves; randomized per hole.
    pub wave_phases: [f32; 3],
    /// Small Perlin layer on top of the sines; the smoothing passes exist to
    /// keep this from making a resting ball vibrate.
    pub detail_seed: u32,
    pub detail_amplitude: f32,
    pub detail_frequency: f64,
    /// Terrain never rises above this y (screen-space ceiling).
    pub ceiling_y: f32,
    /// ...and never sinks below this one.
    pub floor_y: f32,
    pub tee_x: f32,
}

impl Default for CourseParams {
    fn default() -> Self {
        Self {
            width: 6000.0,
            segment_width: 20.0,
            base_height: 600.0,
            hill_amplitude: 110.0,
            wave_phases: [0.0, 1.3, 2.9],
            detail_seed: 1337,
            detail_amplitude: 6.0,
            detail_frequency: 0.015,
            ceiling_y: 150.0,
            floor_y: 720.0,
            tee_x: 300.0,
        }
    }
}

/// Immutable per-hole terrain plus its hazards and pin.
#[derive(Resource, Clone)]
pub struct Course {
    samples: Vec<HeightSample>,
    segment_width: f32,
    width: f32,
    green: GreenZone,
    hazards: Vec<HazardArea>,
    pin: Vec2,
    tee_x: f32,
}

impl Course {
    /// Build and smooth the height-field for one hole.
    pub fn generate(params: &CourseParams, green: GreenZone, hazards: Vec<HazardArea>) -> Self {
        let segment_count = (params.width / params.segment_width).round().max(1.0) as usize;
        let perlin = Perlin::new(params.detail_seed);

        let mut samples = Vec::with_capacity(segment_count + 1);
        for i in 0..=segment_count {
            let x = i as f32 * params.segment_width;
            let mut y = raw_height(params, &perlin, x);
            y = blend_green(&green, x, y);
            y = carve_hazards(&hazards, x, y);
            y = y.clamp(params.ceiling_y, params.floor_y);
            samples.push(HeightSample { x, y, is_green: green.contains(x) });
        }

        let mut course = Self {
            samples,
            segment_width: params.segment_width,
            width: params.width,
            green,
            hazards,
            pin: Vec2::new(green.center(), green.surface_y),
            tee_x: params.tee_x,
        };
        course.smooth();
        course
    }

    /// Repeated weighted local averaging with widening kernels. The green
    /// complex keeps its authored elevation and is skipped entirely.
    fn smooth(&mut self) {
        for kernel in [3usize, 5, 7] {
            let half = kernel / 2;
            let source: Vec<f32> = self.samples.iter().map(|s| s.y).collect();
            let len = source.len();
            for (i, sample) in self.samples.iter_mut().enumerate() {
                if self.green.complex_contains(sample.x) {
                    continue;
                }
                let mut sum = 0.0;
                let mut weight_sum = 0.0;
                for k in 0..kernel {
                    let offset = k as isize - half as isize;
                    let j = (i as isize + offset).clamp(0, len as isize - 1) as usize;
                    let w = (half + 1 - offset.unsigned_abs()) as f32;
                    sum += source[j] * w;
                    weight_sum += w;
                }
                sample.y = sum / weight_sum;
            }
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn tee_x(&self) -> f32 {
        self.tee_x
    }

    pub fn green(&self) -> &GreenZone {
        &self.green
    }

    /// Pin sits at the green's horizontal center, on its authored surface.
    pub fn pin(&self) -> Vec2 {
        self.pin
    }

    /// Raw samples, for the host's terrain drawing.
    pub fn height_samples(&self) -> &[HeightSample] {
        &self.samples
    }

    pub fn hazards(&self) -> &[HazardArea] {
        &self.hazards
    }

    /// First hazard of the hole, if it has any.
    pub fn first_hazard(&self) -> Option<&HazardArea> {
        self.hazards.first()
    }

    /// Ground height at x, linearly interpolated between bracketing samples.
    pub fn height_at(&self, x: f32) -> f32 {
        let last = self.samples.len() - 1;
        if x <= 0.0 {
            return self.samples[0].y;
        }
        if x >= self.width {
            return self.samples[last].y;
        }
        let i = ((x / self.segment_width) as usize).min(last - 1);
        let a = &self.samples[i];
        let b = &self.samples[i + 1];
        let t = (x - a.x) / self.segment_width;
        a.y + (b.y - a.y) * t
    }

    /// Rise/run between bracketing samples. Forced flat on the green (ball
    /// stability) and at the domain edges. Where the immediate segment reads
    /// steep, a farther sample is consulted so single-segment artifacts do
    /// not masquerade as cliffs; the look-ahead widens with the steepness.
    pub fn slope_at(&self, x: f32) -> f32 {
        if self.green.contains(x) {
            return 0.0;
        }
        if x <= 0.0 || x >= self.width {
            return 0.0;
        }
        let last = self.samples.len() - 1;
        let i = ((x / self.segment_width) as usize).min(last - 1);
        let local = (self.samples[i + 1].y - self.samples[i].y) / self.segment_width;

        let magnitude = local.abs();
        if magnitude < SLOPE_LOOKAHEAD_MIN {
            return local;
        }
        let reach = if magnitude >= SLOPE_LOOKAHEAD_FAR_MIN { 4 } else { 2 };
        let j = (i + reach).min(last);
        (self.samples[j].y - self.samples[i].y) / (self.samples[j].x - self.samples[i].x)
    }

    /// Unit surface normal; points away from the ground (−y is up).
    pub fn normal_at(&self, x: f32) -> Vec2 {
        let s = self.slope_at(x);
        Vec2::new(-s, -1.0) / (1.0 + s * s).sqrt()
    }

    /// Any hazard containing the point.
    pub fn hazard_containing(&self, pos: Vec2) -> Option<&HazardArea> {
        self.hazards.iter().find(|h| h.contains(pos.x, pos.y))
    }

    pub fn is_in_water(&self, pos: Vec2) -> bool {
        self.hazards
            .iter()
            .any(|h| h.kind == HazardKind::Water && h.contains(pos.x, pos.y))
    }

    pub fn is_in_bunker(&self, pos: Vec2) -> bool {
        self.hazards
            .iter()
            .any(|h| h.kind == HazardKind::Bunker && h.contains(pos.x, pos.y))
    }

    pub fn is_at_pin(&self, pos: Vec2) -> bool {
        pos.distance(self.pin) <= HOLE_RADIUS
    }

    /// Ground point where a penalized ball is placed: the hazard picks the
    /// approach side, the course clamps between the tee and the far edge of
    /// the green and resolves y from the terrain. If clamping would land the
    /// drop back inside the hazard the far side is used instead.
    pub fn drop_position(&self, hazard: &HazardArea, approach_vx: f32) -> Vec2 {
        let min_x = self.tee_x;
        let max_x = self.green.end_x;
        let mut x = hazard.drop_x(approach_vx).clamp(min_x, max_x);
        if hazard.span_contains(x) {
            x = hazard.drop_x_opposite(approach_vx).clamp(min_x, max_x);
        }
        Vec2::new(x, self.height_at(x))
    }
}

/// Two long sine waves and a shorter third, plus a whisper of Perlin detail.
fn raw_height(params: &CourseParams, perlin: &Perlin, x: f32) -> f32 {
    let t = x / params.width;
    let [p0, p1, p2] = params.wave_phases;
    let rolling = (t * std::f32::consts::TAU + p0).sin()
        + (t * std::f32::consts::TAU * 2.6 + p1).sin() * 0.5
        + (t * std::f32::consts::TAU * 6.3 + p2).sin() * 0.22;
    let hills = (rolling * 0.5 + 0.5) * params.hill_amplitude;
    let detail = perlin.get([x as f64 * params.detail_frequency, 0.5]) as f32
        * params.detail_amplitude;
    params.base_height - hills - detail
}

/// Smoothstep the terrain into the green's authored elevation across the
/// transition aprons; exactly flat on the surface itself.
fn blend_green(green: &GreenZone, x: f32, y: f32) -> f32 {
    if green.contains(x) {
        return green.surface_y;
    }
    if !green.complex_contains(x) {
        return y;
    }
    let edge_distance = if x < green.start_x {
        green.start_x - x
    } else {
        x - green.end_x
    };
    let t = smoothstep(edge_distance / green.transition);
    green.surface_y + (y - green.surface_y) * t
}

/// Depress the terrain into a basin under each hazard so the containment
/// band actually sits below the surrounding ground.
fn carve_hazards(hazards: &[HazardArea], x: f32, y: f32) -> f32 {
    let mut carved = y;
    for h in hazards {
        if !h.span_contains(x) {
            continue;
        }
        let depth = match h.kind {
            HazardKind::Water => 40.0,
            HazardKind::Bunker => 12.0,
        };
        let frac = (x - h.start_x) / h.width;
        // Parabolic basin profile, zero at the edges.
        let profile = (4.0 * frac * (1.0 - frac)).clamp(0.0, 1.0);
        let target = h.level + depth * profile;
        if target > carved {
            carved += (target - carved) * profile;
        }
    }
    carved
}

fn smoothstep(v: f32) -> f32 {
    let t = v.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
