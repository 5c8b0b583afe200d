//! Frame-driven local physics shared by pointer-reactive effects.
//!
//! A [`Swarm`] owns a flat buffer of [`Body`] values. Each call to [`Swarm::step`] advances every
//! body by one frame:
//!
//! 1. sample the pointer (inactive pointers contribute nothing)
//! 2. inside the influence radius, push or pull with strength `(radius - d) / radius`
//! 3. spring back towards the body's home position
//! 4. multiply velocity by the damping factor
//! 5. integrate position
//! 6. apply the edge policy
//!
//! [`Swarm::intensity`] derives a [0, 1] brightness from speed and displacement for painting.
//! The spring is under-damped, so bodies overshoot home slightly before settling.

use crate::math;
use crate::math::Vec2;
use crate::props;
use crate::props::Props;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceMode {
    #[default]
    Repel,
    Attract,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Leaving one side re-enters from the opposite side.
    Wrap,
    /// Positions are clamped to the bounds and the outward velocity is dropped.
    #[default]
    Clamp,
    /// No edge handling (bodies tethered to home positions).
    Free,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsParams {
    /// Maximum pointer distance at which a force is applied.
    pub radius: f32,
    /// Velocity added per frame at zero distance.
    pub strength: f32,
    /// Spring coefficient pulling bodies home, in [0, 1). Zero leaves bodies drifting freely.
    pub return_speed: f32,
    /// Per-frame velocity multiplier in (0, 1).
    pub damping: f32,
    pub mode: ForceMode,
    pub edge: EdgePolicy,
    /// Scales row deltas when measuring pointer distance (see [`math::CELL_ASPECT`]).
    pub aspect: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            strength: 0.6,
            return_speed: 0.05,
            damping: 0.88,
            mode: ForceMode::Repel,
            edge: EdgePolicy::Clamp,
            aspect: 1.0,
        }
    }
}

impl PhysicsParams {
    /// Replaces non-finite or out-of-range tunables with the defaults.
    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            radius: props::positive_or(self.radius, d.radius),
            strength: props::non_negative_or(self.strength, d.strength),
            return_speed: spring_or(self.return_speed, d.return_speed),
            damping: props::unit_or(self.damping, d.damping),
            aspect: props::positive_or(self.aspect, d.aspect),
            ..self
        }
    }

    /// Reads `radius`, `strength`, `returnSpeed` and `damping` from props on top of `base`.
    ///
    /// Zero is rejected for every key. `returnSpeed` and `damping` must also stay below 1.
    pub fn from_props(props: &Props, base: PhysicsParams) -> Self {
        let base = base.normalized();
        Self {
            radius: props.positive_f32("radius", base.radius),
            strength: props.positive_f32("strength", base.strength),
            return_speed: props.unit_f32("returnSpeed", base.return_speed),
            damping: props.unit_f32("damping", base.damping),
            ..base
        }
    }
}

/// With damping in (0, 1) the spring settles for any coefficient in [0, 1); past that it can
/// diverge.
fn spring_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        value
    } else {
        default
    }
}

/// Last known pointer location in local coordinates. `None` means the pointer left the area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub pressed: bool,
}

impl PointerState {
    pub fn move_to(&mut self, at: Vec2) {
        self.position = Some(at);
    }

    pub fn leave(&mut self) {
        self.position = None;
        self.pressed = false;
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }
}

/// Linear falloff `(radius - d) / radius` inside the radius, exactly zero at or beyond it.
pub fn pointer_falloff(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() || distance >= radius {
        return 0.0;
    }
    math::clamp01((radius - distance.max(0.0)) / radius)
}

/// Displacement magnitude for lattice effects: `falloff * max_displacement`.
pub fn displacement_toward(distance: f32, radius: f32, max_displacement: f32) -> f32 {
    pointer_falloff(distance, radius) * max_displacement.max(0.0)
}

/// One simulated entity: a particle, a lattice point or a glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub home: Vec2,
    pub size: f32,
    /// Seconds (or frames, effect-defined) since spawn.
    pub age: f32,
    /// Zero means immortal.
    pub lifetime: f32,
}

impl Body {
    pub fn at(home: Vec2) -> Self {
        Self {
            pos: home,
            home,
            size: 1.0,
            ..Self::default()
        }
    }

    pub fn displacement(&self) -> f32 {
        (self.pos - self.home).length()
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime > 0.0 && self.age >= self.lifetime
    }

    /// Remaining life in [0, 1]; immortal bodies are always 1.
    pub fn life_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        math::clamp01(1.0 - self.age / self.lifetime)
    }
}

/// Velocity change the pointer applies to a body at `pos` this frame.
///
/// Distance and direction are taken in aspect-corrected space, where the push has magnitude
/// `falloff * strength` in every direction. The result is converted back to cells, so a vertical
/// push covers `1 / aspect` as many rows as a horizontal one covers columns.
pub fn pointer_force(pos: Vec2, pointer: &PointerState, params: &PhysicsParams) -> Vec2 {
    let Some(target) = pointer.position else {
        return Vec2::ZERO;
    };
    let aspect = props::positive_or(params.aspect, 1.0);
    let delta = pos - target;
    let measured = Vec2::new(delta.x, delta.y * aspect);
    let distance = measured.length();
    let falloff = pointer_falloff(distance, params.radius);
    if falloff == 0.0 || distance < math::MIN_DISTANCE {
        return Vec2::ZERO;
    }
    let away = measured * distance.recip();
    let push = away * (falloff * params.strength);
    let push = Vec2::new(push.x, push.y / aspect);
    match params.mode {
        ForceMode::Repel => push,
        ForceMode::Attract => -push,
    }
}

/// Owned body buffer plus the bounds its edge policy applies to.
#[derive(Clone, Debug, Default)]
pub struct Swarm {
    pub bodies: Vec<Body>,
    width: f32,
    height: f32,
}

impl Swarm {
    pub fn new(width: f32, height: f32) -> Self {
        let mut s = Self::default();
        s.resize_bounds(width, height);
        s
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    fn resize_bounds(&mut self, width: f32, height: f32) {
        self.width = props::non_negative_or(width, 0.0);
        self.height = props::non_negative_or(height, 0.0);
    }

    /// Replaces the buffer with `count` bodies at random positions inside the bounds. Home is the
    /// spawn position. A zero-sized area places every body at the origin.
    pub fn populate_random<R: Rng>(&mut self, count: usize, size: f32, rng: &mut R) {
        self.bodies.clear();
        self.bodies.reserve(count);
        for _ in 0..count {
            let home = self.random_point(rng);
            self.bodies.push(Body {
                size,
                ..Body::at(home)
            });
        }
    }

    /// Replaces the buffer with a `cols` x `rows` lattice spanning the bounds, cell-centered.
    pub fn populate_lattice(&mut self, cols: usize, rows: usize, size: f32) {
        self.bodies.clear();
        if cols == 0 || rows == 0 {
            return;
        }
        let cell_w = self.width / cols as f32;
        let cell_h = self.height / rows as f32;
        self.bodies.reserve(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let home = Vec2::new((col as f32 + 0.5) * cell_w, (row as f32 + 0.5) * cell_h);
                self.bodies.push(Body {
                    size,
                    ..Body::at(home)
                });
            }
        }
    }

    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let x = if self.width > 0.0 {
            rng.random_range(0.0..self.width)
        } else {
            0.0
        };
        let y = if self.height > 0.0 {
            rng.random_range(0.0..self.height)
        } else {
            0.0
        };
        Vec2::new(x, y)
    }

    /// Advances every body by one frame.
    pub fn step(&mut self, pointer: &PointerState, params: &PhysicsParams) {
        for body in &mut self.bodies {
            step_body(body, pointer, params);
            apply_edge(body, params.edge, self.width, self.height);
        }
    }

    /// Visual intensity for `body`: the larger of normalized speed and normalized displacement.
    pub fn intensity(body: &Body, params: &PhysicsParams) -> f32 {
        let speed_scale = params.strength.max(math::MIN_DISTANCE);
        let speed = body.speed() / speed_scale;
        let displaced = body.displacement() / params.radius.max(math::MIN_DISTANCE);
        math::clamp01(speed.max(displaced))
    }

    pub fn max_speed(&self) -> f32 {
        self.bodies.iter().map(Body::speed).fold(0.0, f32::max)
    }

    pub fn max_displacement(&self) -> f32 {
        self.bodies.iter().map(Body::displacement).fold(0.0, f32::max)
    }

    /// `true` when every body is within `eps` of home and nearly at rest.
    pub fn is_at_rest(&self, eps: f32) -> bool {
        self.bodies
            .iter()
            .all(|b| b.displacement() <= eps && b.speed() <= eps)
    }

    /// Snaps every body to its home position with zero velocity.
    pub fn settle(&mut self) {
        for body in &mut self.bodies {
            body.pos = body.home;
            body.vel = Vec2::ZERO;
        }
    }
}

/// Steps 1 through 5 for one body.
pub fn step_body(body: &mut Body, pointer: &PointerState, params: &PhysicsParams) {
    body.vel += pointer_force(body.pos, pointer, params);
    body.vel += (body.home - body.pos) * params.return_speed;
    body.vel *= params.damping;
    body.pos += body.vel;
    if !body.pos.is_finite() || !body.vel.is_finite() {
        body.pos = body.home;
        body.vel = Vec2::ZERO;
    }
}

pub fn apply_edge(body: &mut Body, edge: EdgePolicy, width: f32, height: f32) {
    match edge {
        EdgePolicy::Free => {}
        EdgePolicy::Wrap => {
            body.pos.x = math::wrap(body.pos.x, width);
            body.pos.y = math::wrap(body.pos.y, height);
        }
        EdgePolicy::Clamp => {
            let max_x = (width - f32::EPSILON).max(0.0);
            let max_y = (height - f32::EPSILON).max(0.0);
            if body.pos.x < 0.0 || body.pos.x > max_x {
                body.pos.x = body.pos.x.clamp(0.0, max_x);
                body.vel.x = 0.0;
            }
            if body.pos.y < 0.0 || body.pos.y > max_y {
                body.pos.y = body.pos.y.clamp(0.0, max_y);
                body.vel.y = 0.0;
            }
        }
    }
}

/// Damped spring chasing a moving target. Used for smoothed pointer follow, tilt and
/// magnification where a whole [`Swarm`] would be overkill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub value: Vec2,
    pub velocity: Vec2,
    pub stiffness: f32,
    pub damping: f32,
}

impl Spring {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            value: Vec2::ZERO,
            velocity: Vec2::ZERO,
            stiffness: props::unit_or(stiffness, 0.15),
            damping: props::unit_or(damping, 0.75),
        }
    }

    /// One step toward `target`. Non-finite results snap to the target.
    pub fn step(&mut self, target: Vec2) {
        self.velocity += (target - self.value) * self.stiffness;
        self.velocity *= self.damping;
        self.value += self.velocity;
        if !self.value.is_finite() || !self.velocity.is_finite() {
            self.snap(target);
        }
    }

    pub fn snap(&mut self, target: Vec2) {
        self.value = if target.is_finite() { target } else { Vec2::ZERO };
        self.velocity = Vec2::ZERO;
    }

    pub fn is_resting_at(&self, target: Vec2, eps: f32) -> bool {
        (self.value - target).length() <= eps && self.velocity.length() <= eps
    }
}

/// Accumulates frame deltas into fixed simulation steps.
///
/// Bursts are capped so a stalled frame never triggers a spiral of catch-up work.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub step_seconds: f32,
    accumulator: f32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl FixedClock {
    pub const MAX_STEPS: u32 = 8;

    pub fn new(step_seconds: f32) -> Self {
        Self {
            step_seconds: props::positive_or(step_seconds, 1.0 / 60.0),
            accumulator: 0.0,
        }
    }

    pub fn consume(&mut self, frame_seconds: f32) -> u32 {
        if frame_seconds.is_finite() {
            self.accumulator += frame_seconds.max(0.0);
        }
        let mut steps = 0u32;
        while self.accumulator >= self.step_seconds {
            self.accumulator -= self.step_seconds;
            steps += 1;
            if steps >= Self::MAX_STEPS {
                self.accumulator = 0.0;
                break;
            }
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pointer_at(x: f32, y: f32) -> PointerState {
        PointerState {
            position: Some(Vec2::new(x, y)),
            pressed: false,
        }
    }

    #[test]
    fn falloff_matches_linear_formula() {
        assert!((pointer_falloff(50.0, 100.0) - 0.5).abs() < 1e-6);
        assert_eq!(pointer_falloff(100.0, 100.0), 0.0);
        assert_eq!(pointer_falloff(150.0, 100.0), 0.0);
        assert_eq!(pointer_falloff(0.0, 100.0), 1.0);
        assert_eq!(pointer_falloff(10.0, 0.0), 0.0);
    }

    #[test]
    fn grid_displacement_example() {
        let d = displacement_toward(50.0, 100.0, 15.0);
        assert!((d - 7.5).abs() < 1e-5);
        assert!(d > 0.0 && d < 15.0);
    }

    #[test]
    fn pointer_at_radius_contributes_nothing() {
        let params = PhysicsParams {
            radius: 5.0,
            ..PhysicsParams::default()
        };
        let f = pointer_force(Vec2::new(5.0, 0.0), &pointer_at(0.0, 0.0), &params);
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn pointer_on_top_of_body_does_not_divide_by_zero() {
        let params = PhysicsParams::default();
        let f = pointer_force(Vec2::new(3.0, 3.0), &pointer_at(3.0, 3.0), &params);
        assert_eq!(f, Vec2::ZERO);
    }

    #[test]
    fn repel_and_attract_point_opposite_ways() {
        let mut params = PhysicsParams::default();
        let p = pointer_at(0.0, 0.0);
        let repel = pointer_force(Vec2::new(2.0, 0.0), &p, &params);
        params.mode = ForceMode::Attract;
        let attract = pointer_force(Vec2::new(2.0, 0.0), &p, &params);
        assert!(repel.x > 0.0);
        assert!(attract.x < 0.0);
    }

    #[test]
    fn push_is_round_in_aspect_corrected_space() {
        let params = PhysicsParams {
            aspect: 2.0,
            ..PhysicsParams::default()
        };
        let p = pointer_at(0.0, 0.0);
        let sideways = pointer_force(Vec2::new(4.0, 0.0), &p, &params);
        let downward = pointer_force(Vec2::new(0.0, 2.0), &p, &params);
        let diagonal = pointer_force(Vec2::new(3.0, 2.0), &p, &params);
        let visual = |f: Vec2| Vec2::new(f.x, f.y * params.aspect).length();
        assert!((visual(sideways) - visual(downward)).abs() < 1e-6);
        assert!((downward.y * params.aspect - sideways.x).abs() < 1e-6);
        let expected = pointer_falloff(5.0, params.radius) * params.strength;
        assert!((visual(diagonal) - expected).abs() < 1e-5);
    }

    #[test]
    fn spring_props_outside_unit_interval_fall_back() {
        let base = PhysicsParams::default();
        for bad in [0.0, 1.0, 5.0, -0.1] {
            let props = Props::new().with("returnSpeed", bad).with("strength", 0.0);
            let p = PhysicsParams::from_props(&props, base);
            assert_eq!(p.return_speed, base.return_speed);
            assert_eq!(p.strength, base.strength);
        }
        let p = PhysicsParams::from_props(&Props::new().with("returnSpeed", 0.3), base);
        assert_eq!(p.return_speed, 0.3);
    }

    #[test]
    fn free_drifting_base_keeps_zero_spring() {
        let base = PhysicsParams {
            return_speed: 0.0,
            strength: 0.0,
            ..PhysicsParams::default()
        };
        let p = PhysicsParams::from_props(&Props::new(), base);
        assert_eq!(p.return_speed, 0.0);
        assert_eq!(p.strength, 0.0);
        let runaway = PhysicsParams {
            return_speed: 5.0,
            ..PhysicsParams::default()
        };
        assert_eq!(runaway.normalized().return_speed, PhysicsParams::default().return_speed);
    }

    #[test]
    fn oversized_spring_prop_still_settles() {
        let params = PhysicsParams::from_props(
            &Props::new().with("returnSpeed", 5.0),
            PhysicsParams {
                edge: EdgePolicy::Free,
                ..PhysicsParams::default()
            },
        );
        let mut swarm = Swarm::new(40.0, 20.0);
        swarm.populate_lattice(4, 4, 1.0);
        for b in &mut swarm.bodies {
            b.pos += Vec2::new(72.0, 0.0);
        }
        let pointer = PointerState::default();
        for _ in 0..40 {
            swarm.step(&pointer, &params);
            assert!(swarm.max_displacement() <= 72.0 + 1e-3);
        }
        for _ in 0..800 {
            swarm.step(&pointer, &params);
        }
        assert!(swarm.is_at_rest(1e-2), "max disp {}", swarm.max_displacement());
    }

    #[test]
    fn inactive_pointer_converges_home() {
        let mut swarm = Swarm::new(40.0, 20.0);
        swarm.populate_lattice(8, 4, 1.0);
        for b in &mut swarm.bodies {
            b.pos += Vec2::new(3.0, -2.0);
        }
        let params = PhysicsParams {
            edge: EdgePolicy::Free,
            ..PhysicsParams::default()
        };
        let pointer = PointerState::default();
        for _ in 0..600 {
            swarm.step(&pointer, &params);
        }
        assert!(swarm.is_at_rest(1e-2), "max disp {}", swarm.max_displacement());
    }

    #[test]
    fn zero_sized_bounds_stay_finite() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut swarm = Swarm::new(0.0, 0.0);
        swarm.populate_random(50, 1.0, &mut rng);
        assert_eq!(swarm.len(), 50);
        let params = PhysicsParams {
            edge: EdgePolicy::Wrap,
            ..PhysicsParams::default()
        };
        swarm.step(&pointer_at(0.0, 0.0), &params);
        assert!(swarm.bodies.iter().all(|b| b.pos.is_finite() && b.vel.is_finite()));

        swarm.populate_lattice(4, 4, 1.0);
        assert!(swarm.bodies.iter().all(|b| b.pos.is_finite()));
    }

    #[test]
    fn wrap_re_enters_opposite_side() {
        let mut body = Body::at(Vec2::new(9.5, 1.0));
        body.pos.x = 10.5;
        apply_edge(&mut body, EdgePolicy::Wrap, 10.0, 5.0);
        assert!((body.pos.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn clamp_stops_outward_velocity() {
        let mut body = Body::at(Vec2::new(1.0, 1.0));
        body.pos = Vec2::new(-2.0, 1.0);
        body.vel = Vec2::new(-1.0, 0.5);
        apply_edge(&mut body, EdgePolicy::Clamp, 10.0, 5.0);
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.vel.y, 0.5);
    }

    #[test]
    fn intensity_is_bounded() {
        let params = PhysicsParams::default();
        let mut body = Body::at(Vec2::ZERO);
        assert_eq!(Swarm::intensity(&body, &params), 0.0);
        body.vel = Vec2::new(1e6, 0.0);
        assert_eq!(Swarm::intensity(&body, &params), 1.0);
    }

    #[test]
    fn normalized_params_reject_bad_damping() {
        let p = PhysicsParams {
            damping: 1.5,
            radius: -1.0,
            ..PhysicsParams::default()
        }
        .normalized();
        assert_eq!(p.damping, PhysicsParams::default().damping);
        assert_eq!(p.radius, PhysicsParams::default().radius);
    }

    #[test]
    fn fixed_clock_caps_steps() {
        let mut clock = FixedClock::new(1.0 / 120.0);
        assert_eq!(clock.consume(0.5), FixedClock::MAX_STEPS);
        assert_eq!(clock.consume(1.0 / 120.0), 1);
    }

    #[test]
    fn spring_overshoots_then_rests() {
        let mut s = Spring::new(0.2, 0.7);
        let target = Vec2::new(10.0, 0.0);
        let mut peak = 0.0f32;
        for _ in 0..200 {
            s.step(target);
            peak = peak.max(s.value.x);
        }
        assert!(peak > 10.0);
        assert!(s.is_resting_at(target, 1e-3));
    }
}
