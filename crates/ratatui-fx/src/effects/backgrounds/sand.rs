//! Grains of sand scattered over the area that scatter away from the pointer and drift back.

use crate::effects;
use rand::rngs::StdRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math::CELL_ASPECT;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::Swarm;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct SandOptions {
    /// Number of grains. Default 500.
    pub count: usize,
    pub physics: PhysicsParams,
    pub color: Rgb,
    /// Color of grains in fast motion.
    pub hot_color: Rgb,
    pub seed: u64,
}

impl Default for SandOptions {
    fn default() -> Self {
        Self {
            count: 500,
            physics: PhysicsParams {
                radius: 8.0,
                strength: 0.9,
                return_speed: 0.04,
                damping: 0.86,
                edge: EdgePolicy::Clamp,
                aspect: CELL_ASPECT,
                ..PhysicsParams::default()
            },
            color: Rgb::new(232, 192, 125),
            hot_color: Rgb::new(255, 245, 220),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl SandOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            count: p.count("count", d.count),
            physics: PhysicsParams::from_props(p, d.physics),
            color: p.color("color", d.color),
            hot_color: p.color("hotColor", d.hot_color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            count: props::count_or(self.count, d.count),
            physics: self.physics.normalized(),
            ..self
        }
    }
}

pub struct SandParticles {
    options: SandOptions,
    swarm: Swarm,
    canvas: FxCanvas,
    rng: StdRng,
}

impl SandParticles {
    pub fn new(options: SandOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            swarm: Swarm::default(),
            canvas: FxCanvas::default(),
            rng,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(SandOptions::from_props(props))
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let params = &self.options.physics;
        for body in &self.swarm.bodies {
            let heat = Swarm::intensity(body, params);
            let color = self.options.color.lerp(self.options.hot_color, heat);
            self.canvas
                .plot(body.pos.x, body.pos.y, 0.35 + 0.65 * heat, color);
        }
    }
}

impl Effect for SandParticles {
    fn rebuild(&mut self, size: Size) {
        self.swarm = Swarm::new(size.width as f32, size.height as f32);
        self.swarm
            .populate_random(self.options.count, 1.0, &mut self.rng);
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.swarm.step(ctx.pointer, &self.options.physics);
        self.paint();
    }

    fn settle(&mut self) {
        self.swarm.settle();
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::DOTS, theme.base_style());
    }

    fn is_idle(&self) -> bool {
        self.swarm.is_at_rest(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::math::Vec2;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn non_positive_count_falls_back_to_default() {
        for bad in [0, -5] {
            let mut fx = SandParticles::from_props(&Props::new().with("count", bad));
            fx.rebuild(Size::new(40, 10));
            assert_eq!(fx.swarm().len(), 500);
        }
    }

    #[test]
    fn grains_flee_the_pointer() {
        let mut fx = SandParticles::new(SandOptions {
            count: 200,
            ..SandOptions::default()
        });
        fx.rebuild(Size::new(40, 10));
        let pointer = PointerState {
            position: Some(Vec2::new(20.0, 5.0)),
            pressed: false,
        };
        let ctx = FrameCtx {
            dt: 1.0 / 60.0,
            time: 0.0,
            pointer: &pointer,
            size: Size::new(40, 10),
        };
        fx.update(&ctx);
        assert!(fx.swarm().max_speed() > 0.0);
        assert!(!fx.is_idle());
    }

    #[test]
    fn zero_area_is_harmless() {
        let mut fx = SandParticles::from_props(&Props::new());
        fx.rebuild(Size::new(0, 0));
        fx.settle();
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        fx.render(Rect::new(0, 0, 0, 0), &mut buf, &FxTheme::default());
        assert!(fx.swarm().bodies.iter().all(|b| b.pos.is_finite()));
    }
}
