//! A still surface where clicks (and the occasional raindrop) spread rings that fade as they grow.

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
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct RipplePondOptions {
    /// Ring growth in columns per second.
    pub speed: f32,
    /// Radius at which a ring has fully faded.
    pub max_radius: f32,
    /// Raindrops per second. Zero disables ambient drops.
    pub rain: f32,
    pub max_ripples: usize,
    pub color: Rgb,
    pub seed: u64,
}

impl Default for RipplePondOptions {
    fn default() -> Self {
        Self {
            speed: 14.0,
            max_radius: 24.0,
            rain: 0.6,
            max_ripples: 24,
            color: Rgb::new(120, 200, 255),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl RipplePondOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            speed: p.positive_f32("speed", d.speed),
            max_radius: p.positive_f32("maxRadius", d.max_radius),
            rain: p.non_negative_f32("rain", d.rain),
            max_ripples: p.count("maxRipples", d.max_ripples),
            color: p.color("color", d.color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            speed: props::positive_or(self.speed, d.speed),
            max_radius: props::positive_or(self.max_radius, d.max_radius),
            rain: props::non_negative_or(self.rain, d.rain),
            max_ripples: props::count_or(self.max_ripples, d.max_ripples),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub radius: f32,
    /// Peak brightness, 1 for clicks and less for rain.
    pub strength: f32,
}

pub struct RipplePond {
    options: RipplePondOptions,
    ripples: Vec<Ripple>,
    size: Size,
    canvas: FxCanvas,
    rng: StdRng,
}

impl RipplePond {
    pub fn new(options: RipplePondOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            ripples: Vec::new(),
            size: Size::new(0, 0),
            canvas: FxCanvas::default(),
            rng,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(RipplePondOptions::from_props(props))
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    fn spawn(&mut self, center: Vec2, strength: f32) {
        if self.ripples.len() >= self.options.max_ripples {
            self.ripples.remove(0);
        }
        self.ripples.push(Ripple {
            center,
            radius: 0.0,
            strength,
        });
    }

    fn fade(&self, ripple: &Ripple) -> f32 {
        let t = math::clamp01(ripple.radius / self.options.max_radius);
        ripple.strength * (1.0 - t)
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let color = self.options.color;
        for i in 0..self.ripples.len() {
            let r = self.ripples[i];
            let alpha = self.fade(&r);
            self.canvas.ring(r.center, r.radius, alpha, color);
            // trailing echo
            if r.radius > 2.0 {
                self.canvas
                    .ring(r.center, r.radius - 2.0, alpha * 0.4, color.scale(0.7));
            }
        }
    }
}

impl Effect for RipplePond {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.ripples.clear();
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let grow = self.options.speed * ctx.dt;
        let max = self.options.max_radius;
        for r in &mut self.ripples {
            r.radius += grow;
        }
        self.ripples.retain(|r| r.radius < max);

        if !effects::is_empty(self.size) && self.options.rain > 0.0 {
            let chance = math::clamp01(self.options.rain * ctx.dt);
            if self.rng.random_bool(chance as f64) {
                let at = Vec2::new(
                    self.rng.random_range(0.0..self.size.width as f32),
                    self.rng.random_range(0.0..self.size.height as f32),
                );
                self.spawn(at, 0.5);
            }
        }
        self.paint();
    }

    fn press(&mut self, at: Vec2) {
        self.spawn(at, 1.0);
    }

    fn settle(&mut self) {
        self.ripples.clear();
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::ASCII, theme.base_style());
    }

    fn teardown(&mut self) {
        self.ripples.clear();
    }

    fn is_idle(&self) -> bool {
        self.options.rain == 0.0 && self.ripples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    fn run(fx: &mut RipplePond, size: Size, steps: usize) {
        let pointer = PointerState::default();
        for _ in 0..steps {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
    }

    #[test]
    fn click_ripple_grows_and_expires() {
        let mut fx = RipplePond::from_props(&Props::new().with("rain", 0));
        let size = Size::new(40, 12);
        fx.rebuild(size);
        fx.press(Vec2::new(20.0, 6.0));
        run(&mut fx, size, 10);
        assert_eq!(fx.ripples().len(), 1);
        assert!(fx.ripples()[0].radius > 0.0);
        run(&mut fx, size, 600);
        assert!(fx.is_idle());
    }

    #[test]
    fn ripple_count_is_capped() {
        let mut fx = RipplePond::from_props(&Props::new().with("maxRipples", 3).with("rain", 0));
        fx.rebuild(Size::new(10, 4));
        for i in 0..10 {
            fx.press(Vec2::new(i as f32, 1.0));
        }
        assert_eq!(fx.ripples().len(), 3);
        assert_eq!(fx.ripples()[0].center.x, 7.0);
    }

    #[test]
    fn rain_falls_without_input() {
        let mut fx = RipplePond::from_props(&Props::new().with("rain", 30));
        let size = Size::new(30, 10);
        fx.rebuild(size);
        run(&mut fx, size, 30);
        assert!(!fx.ripples().is_empty());
    }
}
