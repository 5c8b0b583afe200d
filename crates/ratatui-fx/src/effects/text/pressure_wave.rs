//! Pressure wave: every click sends out a ring that shoves the letters it crosses. Letters spring
//! back to their slots, and any number of waves may be in flight at once.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math;
use ratatui_fx_core::math::CELL_ASPECT;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::PointerState;
use ratatui_fx_core::physics::Swarm;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::render::Glyph;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct PressureWaveOptions {
    pub text: String,
    /// Ring growth in cells per second (aspect corrected).
    pub speed: f32,
    /// Radius at which a wave dies out.
    pub reach: f32,
    /// Push given to a letter hit at the start of a wave.
    pub force: f32,
    /// Distance within which letters are drawn bold.
    pub hover_radius: f32,
    pub physics: PhysicsParams,
    pub ring_color: Rgb,
}

impl Default for PressureWaveOptions {
    fn default() -> Self {
        Self {
            text: "Click anywhere".to_string(),
            speed: 40.0,
            reach: 30.0,
            force: 1.6,
            hover_radius: 6.0,
            physics: PhysicsParams {
                strength: 0.0,
                return_speed: 0.08,
                damping: 0.8,
                edge: EdgePolicy::Free,
                aspect: CELL_ASPECT,
                ..PhysicsParams::default()
            },
            ring_color: Rgb::new(90, 110, 160),
        }
    }
}

impl PressureWaveOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: p.text("text", &d.text),
            speed: p.positive_f32("speed", d.speed),
            reach: p.positive_f32("reach", d.reach),
            force: p.positive_f32("force", d.force),
            hover_radius: p.non_negative_f32("hoverRadius", d.hover_radius),
            physics: PhysicsParams::from_props(p, d.physics),
            ring_color: p.color("ringColor", d.ring_color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            text: text::single_line(&self.text),
            speed: props::positive_or(self.speed, d.speed),
            reach: props::positive_or(self.reach, d.reach),
            force: props::positive_or(self.force, d.force),
            hover_radius: props::non_negative_or(self.hover_radius, d.hover_radius),
            physics: self.physics.normalized(),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    pub center: Vec2,
    pub radius: f32,
    /// Letters this wave already pushed; a letter is hit at most once per wave.
    hit: Vec<bool>,
}

const REST_EPSILON: f32 = 0.02;

pub struct PressureWave {
    options: PressureWaveOptions,
    chars: Vec<char>,
    swarm: Swarm,
    waves: Vec<Wave>,
    origin: (u16, u16),
    pointer: Option<Vec2>,
    canvas: FxCanvas,
}

impl PressureWave {
    pub fn new(options: PressureWaveOptions) -> Self {
        let options = options.normalized();
        let chars = options.text.chars().collect();
        Self {
            options,
            chars,
            swarm: Swarm::default(),
            waves: Vec::new(),
            origin: (0, 0),
            pointer: None,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(PressureWaveOptions::from_props(props))
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn emit(&mut self, center: Vec2) {
        if !center.is_finite() {
            return;
        }
        self.waves.push(Wave {
            center,
            radius: 0.0,
            hit: vec![false; self.swarm.len()],
        });
    }

    /// Grows every wave by `growth` and pushes the letters its front passed over.
    fn propagate(&mut self, growth: f32) {
        let reach = self.options.reach;
        for wave in &mut self.waves {
            let inner = wave.radius;
            let outer = wave.radius + growth;
            // weaker the further the ring has travelled
            let push = self.options.force * (1.0 - math::clamp01(inner / reach));
            for (i, body) in self.swarm.bodies.iter_mut().enumerate() {
                if wave.hit.get(i).copied().unwrap_or(true) {
                    continue;
                }
                let center = body.pos + Vec2::new(0.5, 0.5);
                let delta = (center - wave.center).aspect_corrected();
                let d = delta.length();
                // letters that drifted inside the ring without being hit stay untouched
                if d >= outer || (d < inner && inner > 0.0) {
                    continue;
                }
                wave.hit[i] = true;
                let dir = delta.normalize_or_zero();
                body.vel += Vec2::new(dir.x, dir.y / CELL_ASPECT) * push;
            }
            wave.radius = outer;
        }
        self.waves.retain(|w| w.radius < reach);
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let reach = self.options.reach;
        for wave in &self.waves {
            let alpha = 0.6 * (1.0 - math::clamp01(wave.radius / reach));
            self.canvas
                .ring(wave.center, wave.radius, alpha, self.options.ring_color);
        }
    }
}

impl Effect for PressureWave {
    fn rebuild(&mut self, size: Size) {
        self.swarm = Swarm::new(size.width as f32, size.height as f32);
        self.origin = text::origin(size, &self.options.text);
        self.swarm.bodies = text::slots(&self.options.text, self.origin)
            .into_iter()
            .map(Body::at)
            .collect();
        self.waves.clear();
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.pointer = ctx.pointer.position;
        self.propagate(self.options.speed * ctx.dt);
        // letters only answer waves, never the pointer directly
        self.swarm
            .step(&PointerState::default(), &self.options.physics);
        for body in &mut self.swarm.bodies {
            if body.displacement() <= REST_EPSILON * 0.5 && body.speed() <= REST_EPSILON * 0.5 {
                body.pos = body.home;
                body.vel = Vec2::ZERO;
            }
        }
        self.paint();
    }

    fn settle(&mut self) {
        self.waves.clear();
        self.swarm.settle();
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.canvas.flush(area, buf, ramp::DOTS, theme.muted_style());
        let hover = self.options.hover_radius;
        let glyphs: Vec<Glyph> = self
            .swarm
            .bodies
            .iter()
            .zip(&self.chars)
            .map(|(b, &ch)| {
                let near = self.pointer.map_or(0.0, |p| {
                    let d = (b.pos + Vec2::new(0.5, 0.5) - p).aspect_corrected().length();
                    physics::pointer_falloff(d, hover)
                });
                let moving = math::clamp01(b.displacement() / 2.0);
                Glyph {
                    ch,
                    offset: b.pos - b.home,
                    opacity: 1.0,
                    color: theme
                        .foreground
                        .lerp(theme.accent, near.max(moving)),
                    bold: near > 0.0,
                }
            })
            .collect();
        let origin = (area.x + self.origin.0, area.y + self.origin.1);
        render::render_glyphs(area, buf, origin, &glyphs, theme.background);
    }

    fn press(&mut self, at: Vec2) {
        self.emit(at);
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if text::is_replay(key) {
            let slots = text::slots(&self.options.text, self.origin);
            let mid = slots
                .get(slots.len() / 2)
                .copied()
                .unwrap_or(Vec2::new(self.origin.0 as f32, self.origin.1 as f32));
            self.emit(mid + Vec2::new(0.5, 0.5));
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.waves.clear();
    }

    fn is_idle(&self) -> bool {
        self.waves.is_empty() && self.swarm.is_at_rest(REST_EPSILON)
    }
}
