//! Slowly drifting stars that link up with faint lines, brightest around the pointer.

use crate::effects;
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::Swarm;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct ConstellationOptions {
    pub count: usize,
    /// Maximum aspect-corrected distance at which two stars are linked.
    pub link_distance: f32,
    /// Drift speed in cells per step.
    pub drift: f32,
    pub physics: PhysicsParams,
    pub color: Rgb,
    pub seed: u64,
}

impl Default for ConstellationOptions {
    fn default() -> Self {
        Self {
            count: 60,
            link_distance: 10.0,
            drift: 0.03,
            physics: PhysicsParams {
                radius: 12.0,
                strength: 0.08,
                return_speed: 0.0,
                damping: 0.92,
                edge: EdgePolicy::Wrap,
                aspect: math::CELL_ASPECT,
                ..PhysicsParams::default()
            },
            color: Rgb::new(200, 220, 255),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl ConstellationOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            count: p.count("count", d.count),
            link_distance: p.positive_f32("linkDistance", d.link_distance),
            drift: p.positive_f32("drift", d.drift),
            physics: PhysicsParams::from_props(p, d.physics),
            color: p.color("color", d.color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            count: props::count_or(self.count, d.count),
            link_distance: props::positive_or(self.link_distance, d.link_distance),
            drift: props::positive_or(self.drift, d.drift),
            physics: self.physics.normalized(),
            ..self
        }
    }
}

pub struct Constellation {
    options: ConstellationOptions,
    swarm: Swarm,
    drift: Vec<Vec2>,
    canvas: FxCanvas,
    rng: StdRng,
}

impl Constellation {
    pub fn new(options: ConstellationOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            swarm: Swarm::default(),
            drift: Vec::new(),
            canvas: FxCanvas::default(),
            rng,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(ConstellationOptions::from_props(props))
    }

    pub fn star_count(&self) -> usize {
        self.swarm.len()
    }

    /// Link strength between stars `a` and `b`, in [0, 1].
    pub fn link_alpha(&self, a: Vec2, b: Vec2) -> f32 {
        let d = (b - a).aspect_corrected().length();
        physics::pointer_falloff(d, self.options.link_distance)
    }

    fn paint(&mut self, pointer: Option<Vec2>) {
        self.canvas.clear();
        let color = self.options.color;
        let n = self.swarm.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.swarm.bodies[i].pos;
                let b = self.swarm.bodies[j].pos;
                let link = self.link_alpha(a, b);
                if link <= 0.0 {
                    continue;
                }
                let near = pointer
                    .map(|p| {
                        let mid = a.lerp(b, 0.5);
                        let d = (mid - p).aspect_corrected().length();
                        physics::pointer_falloff(d, self.options.physics.radius)
                    })
                    .unwrap_or(0.0);
                self.canvas.line(a, b, link * (0.15 + 0.6 * near), color);
            }
        }
        for body in &self.swarm.bodies {
            self.canvas.plot_glyph(body.pos.x, body.pos.y, '✦', 1.0, color);
        }
    }
}

impl Effect for Constellation {
    fn rebuild(&mut self, size: Size) {
        self.swarm = Swarm::new(size.width as f32, size.height as f32);
        self.swarm
            .populate_random(self.options.count, 1.0, &mut self.rng);
        let speed = self.options.drift;
        self.drift = (0..self.swarm.len())
            .map(|_| {
                let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                Vec2::from_angle(angle) * speed
            })
            .collect();
        self.canvas.resize(size.width, size.height);
        self.paint(None);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let params = self.options.physics;
        let (w, h) = (self.swarm.width(), self.swarm.height());
        for (body, drift) in self.swarm.bodies.iter_mut().zip(&self.drift) {
            let push = physics::pointer_force(body.pos, ctx.pointer, &params);
            let excess = (body.vel - *drift) * params.damping;
            body.vel = *drift + excess + push;
            body.pos += body.vel;
            physics::apply_edge(body, params.edge, w, h);
        }
        self.paint(ctx.pointer.position);
    }

    fn settle(&mut self) {
        for body in &mut self.swarm.bodies {
            body.vel = Vec2::ZERO;
        }
        self.paint(None);
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::DOTS, theme.base_style());
    }
}
