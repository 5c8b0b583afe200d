//! Connect text: letters start scattered over the area, threads link neighbours while they are
//! pulled into line, and the resolved word still shies away from the pointer.

use crate::effects;
use crate::effects::text;
use rand::rngs::StdRng;
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
use ratatui_fx_core::timer::Timers;

#[derive(Clone, Debug)]
pub struct ConnectOptions {
    pub text: String,
    /// Seconds the letters stay scattered.
    pub hold: f32,
    pub physics: PhysicsParams,
    pub thread_color: Rgb,
    pub seed: u64,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            text: "CONNECT".to_string(),
            hold: 0.6,
            physics: PhysicsParams {
                radius: 5.0,
                strength: 0.5,
                return_speed: 0.06,
                damping: 0.82,
                edge: EdgePolicy::Free,
                aspect: CELL_ASPECT,
                ..PhysicsParams::default()
            },
            thread_color: Rgb::new(120, 140, 200),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl ConnectOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: p.text("text", &d.text),
            hold: p.non_negative_f32("hold", d.hold),
            physics: PhysicsParams::from_props(p, d.physics),
            thread_color: p.color("threadColor", d.thread_color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            text: text::single_line(&self.text),
            hold: props::non_negative_or(self.hold, d.hold),
            physics: self.physics.normalized(),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectPhase {
    Scattered,
    Connecting,
    Resolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConnectEvent {
    StartConnecting,
}

const REST_EPSILON: f32 = 0.05;

pub struct ConnectText {
    options: ConnectOptions,
    chars: Vec<char>,
    /// One body per character; home is the character's slot.
    swarm: Swarm,
    phase: ConnectPhase,
    timers: Timers<ConnectEvent>,
    /// Largest displacement when connecting started, for thread fading.
    spread: f32,
    origin: (u16, u16),
    pointer_near: bool,
    canvas: FxCanvas,
    rng: StdRng,
}

impl ConnectText {
    pub fn new(options: ConnectOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        let chars = options.text.chars().collect();
        Self {
            options,
            chars,
            swarm: Swarm::default(),
            phase: ConnectPhase::Scattered,
            timers: Timers::new(),
            spread: 0.0,
            origin: (0, 0),
            pointer_near: false,
            canvas: FxCanvas::default(),
            rng,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(ConnectOptions::from_props(props))
    }

    pub fn phase(&self) -> ConnectPhase {
        self.phase
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    /// Scatters every letter to a random spot and restarts the sequence.
    pub fn scatter(&mut self) {
        self.timers.reset();
        let spots: Vec<Vec2> = (0..self.swarm.len())
            .map(|_| self.swarm.random_point(&mut self.rng))
            .collect();
        for (body, spot) in self.swarm.bodies.iter_mut().zip(spots) {
            body.pos = spot;
            body.vel = Vec2::ZERO;
        }
        self.phase = ConnectPhase::Scattered;
        self.spread = 0.0;
        self.timers
            .schedule(self.options.hold, ConnectEvent::StartConnecting);
        self.paint();
    }

    /// Thread strength in [0, 1]: full when scattered, fading out as letters arrive.
    fn thread_alpha(&self) -> f32 {
        match self.phase {
            ConnectPhase::Scattered => 0.25,
            ConnectPhase::Connecting => {
                if self.spread <= 0.0 {
                    return 0.0;
                }
                let left = self.swarm.max_displacement() / self.spread;
                math::clamp01(left.sqrt())
            }
            ConnectPhase::Resolved => 0.0,
        }
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let alpha = self.thread_alpha();
        if alpha <= 0.0 {
            return;
        }
        let centers: Vec<Vec2> = self
            .swarm
            .bodies
            .iter()
            .zip(&self.chars)
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(b, _)| b.pos + Vec2::new(0.5, 0.5))
            .collect();
        for pair in centers.windows(2) {
            self.canvas
                .line(pair[0], pair[1], alpha, self.options.thread_color);
        }
    }
}

impl Effect for ConnectText {
    fn rebuild(&mut self, size: Size) {
        self.swarm = Swarm::new(size.width as f32, size.height as f32);
        self.origin = text::origin(size, &self.options.text);
        self.swarm.bodies = text::slots(&self.options.text, self.origin)
            .into_iter()
            .map(Body::at)
            .collect();
        self.canvas.resize(size.width, size.height);
        self.scatter();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        if self.phase == ConnectPhase::Scattered {
            for event in self.timers.advance(ctx.dt) {
                match event {
                    ConnectEvent::StartConnecting => {
                        self.phase = ConnectPhase::Connecting;
                        self.spread = self.swarm.max_displacement();
                    }
                }
            }
        }
        if self.phase == ConnectPhase::Scattered {
            self.paint();
            return;
        }

        // the pointer only disturbs letters once they have found their places
        let idle = PointerState::default();
        let pointer = if self.phase == ConnectPhase::Resolved {
            ctx.pointer
        } else {
            &idle
        };
        self.pointer_near = pointer.position.is_some_and(|p| {
            self.swarm.bodies.iter().any(|b| {
                (b.pos - p).aspect_corrected().length() < self.options.physics.radius
            })
        });
        self.swarm.step(pointer, &self.options.physics);

        if self.phase == ConnectPhase::Connecting && self.swarm.is_at_rest(REST_EPSILON) {
            self.swarm.settle();
            self.phase = ConnectPhase::Resolved;
        }
        self.paint();
    }

    fn settle(&mut self) {
        self.timers.cancel_all();
        self.swarm.settle();
        self.phase = ConnectPhase::Resolved;
        self.pointer_near = false;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.canvas.flush(area, buf, ramp::DOTS, theme.muted_style());
        let resolved = self.phase == ConnectPhase::Resolved;
        let glyphs: Vec<Glyph> = self
            .swarm
            .bodies
            .iter()
            .zip(&self.chars)
            .map(|(b, &ch)| Glyph {
                ch,
                offset: b.pos - b.home,
                opacity: if resolved { 1.0 } else { 0.8 },
                color: if resolved {
                    theme.foreground
                } else {
                    theme.accent
                },
                bold: resolved,
            })
            .collect();
        let origin = (area.x + self.origin.0, area.y + self.origin.1);
        render::render_glyphs(area, buf, origin, &glyphs, theme.background);
    }

    fn press(&mut self, _at: Vec2) {
        self.scatter();
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if text::is_replay(key) {
            self.scatter();
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
    }

    fn is_idle(&self) -> bool {
        self.phase == ConnectPhase::Resolved
            && !self.pointer_near
            && self.swarm.is_at_rest(REST_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fx: &mut ConnectText, pointer: &PointerState, frames: usize) {
        for _ in 0..frames {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer,
                size: Size::new(40, 12),
            });
        }
    }

    #[test]
    fn scattered_then_connecting_then_resolved() {
        let mut fx = ConnectText::from_props(&Props::new().with("text", "link"));
        fx.rebuild(Size::new(40, 12));
        assert_eq!(fx.phase(), ConnectPhase::Scattered);
        assert!(fx.swarm().max_displacement() > 0.0);

        let idle = PointerState::default();
        run(&mut fx, &idle, 40);
        assert_eq!(fx.phase(), ConnectPhase::Connecting);
        run(&mut fx, &idle, 600);
        assert_eq!(fx.phase(), ConnectPhase::Resolved);
        assert_eq!(fx.swarm().max_displacement(), 0.0);
        assert!(fx.is_idle());
    }

    #[test]
    fn threads_are_drawn_while_scattered() {
        let mut fx = ConnectText::from_props(&Props::new().with("text", "abc"));
        fx.rebuild(Size::new(40, 12));
        let lit = (0..12u16)
            .flat_map(|y| (0..40u16).map(move |x| (x, y)))
            .filter(|&(x, y)| fx.canvas.alpha_at(x, y) > 0.0)
            .count();
        assert!(lit > 0);
        fx.settle();
        assert_eq!(fx.canvas.alpha_at(20, 6), 0.0);
    }

    #[test]
    fn resolved_letters_dodge_the_pointer_and_return() {
        let mut fx = ConnectText::from_props(&Props::new().with("text", "word"));
        fx.rebuild(Size::new(40, 12));
        fx.settle();
        let home = fx.swarm().bodies[1].home;
        let pointer = PointerState {
            position: Some(home + Vec2::new(0.5, 0.5)),
            pressed: false,
        };
        run(&mut fx, &pointer, 5);
        assert!(fx.swarm().max_displacement() > 0.0);
        assert!(!fx.is_idle());
        run(&mut fx, &PointerState::default(), 600);
        assert!(fx.swarm().is_at_rest(REST_EPSILON));
    }
}
