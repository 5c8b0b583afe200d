//! Fireflies that wander on a noise field, pulse in and out over their lifetime and drift toward
//! the pointer.

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
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::ForceMode;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct FirefliesOptions {
    pub count: usize,
    /// Average lifetime in seconds.
    pub lifetime: f32,
    pub wander: f32,
    pub physics: PhysicsParams,
    pub color: Rgb,
    pub seed: u64,
}

impl Default for FirefliesOptions {
    fn default() -> Self {
        Self {
            count: 40,
            lifetime: 4.0,
            wander: 0.02,
            physics: PhysicsParams {
                radius: 18.0,
                strength: 0.015,
                return_speed: 0.0,
                damping: 0.95,
                mode: ForceMode::Attract,
                edge: EdgePolicy::Wrap,
                aspect: math::CELL_ASPECT,
            },
            color: Rgb::new(214, 255, 120),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl FirefliesOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            count: p.count("count", d.count),
            lifetime: p.positive_f32("lifetime", d.lifetime),
            wander: p.positive_f32("wander", d.wander),
            physics: PhysicsParams::from_props(p, d.physics),
            color: p.color("color", d.color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            count: props::count_or(self.count, d.count),
            lifetime: props::positive_or(self.lifetime, d.lifetime),
            wander: props::positive_or(self.wander, d.wander),
            physics: self.physics.normalized(),
            ..self
        }
    }
}

pub struct Fireflies {
    options: FirefliesOptions,
    flies: Vec<Body>,
    size: Size,
    canvas: FxCanvas,
    rng: StdRng,
    seed: u32,
}

impl Fireflies {
    pub fn new(options: FirefliesOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        let seed = options.seed as u32;
        Self {
            options,
            flies: Vec::new(),
            size: Size::new(0, 0),
            canvas: FxCanvas::default(),
            rng,
            seed,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(FirefliesOptions::from_props(props))
    }

    pub fn flies(&self) -> &[Body] {
        &self.flies
    }

    /// Brightness over a fly's life: fades in, peaks midway, fades out.
    pub fn glow(body: &Body) -> f32 {
        if body.lifetime <= 0.0 {
            return 1.0;
        }
        let t = math::clamp01(body.age / body.lifetime);
        math::clamp01((t * std::f32::consts::PI).sin())
    }

    fn spawn(&mut self, stagger: bool) -> Body {
        let pos = Vec2::new(
            self.rng.random_range(0.0..self.size.width.max(1) as f32),
            self.rng.random_range(0.0..self.size.height.max(1) as f32),
        );
        let lifetime = self.options.lifetime * self.rng.random_range(0.6..1.4f32);
        let age = if stagger {
            self.rng.random_range(0.0..lifetime)
        } else {
            0.0
        };
        Body {
            pos,
            home: pos,
            age,
            lifetime,
            ..Body::default()
        }
    }

    fn paint(&mut self) {
        self.canvas.clear();
        for fly in &self.flies {
            let glow = Self::glow(fly);
            self.canvas.plot(fly.pos.x, fly.pos.y, glow, self.options.color);
        }
    }
}

impl Effect for Fireflies {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.canvas.resize(size.width, size.height);
        self.flies.clear();
        if effects::is_empty(size) {
            return;
        }
        for _ in 0..self.options.count {
            let fly = self.spawn(true);
            self.flies.push(fly);
        }
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let params = self.options.physics;
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        let wander = self.options.wander;
        for i in 0..self.flies.len() {
            let fly = &mut self.flies[i];
            let n = math::value_noise(
                fly.pos.x * 0.15,
                fly.pos.y * 0.3 + ctx.time * 0.2,
                self.seed.wrapping_add(i as u32),
            );
            let heading = Vec2::from_angle(n * std::f32::consts::TAU * 2.0);
            fly.vel += heading * wander;
            fly.vel += physics::pointer_force(fly.pos, ctx.pointer, &params);
            fly.vel *= params.damping;
            fly.pos += fly.vel;
            physics::apply_edge(fly, params.edge, w, h);
            fly.age += ctx.dt;
            if fly.is_expired() {
                let fresh = self.spawn(false);
                self.flies[i] = fresh;
            }
        }
        self.paint();
    }

    fn settle(&mut self) {
        for fly in &mut self.flies {
            fly.vel = Vec2::ZERO;
            fly.age = fly.lifetime / 2.0;
        }
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::DOTS, theme.base_style());
    }
}
