//! Warp-speed starfield. Stars stream out of a vanishing point that leans toward the pointer and
//! are recycled once they leave the area.

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
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct StarfieldOptions {
    pub count: usize,
    /// Radial acceleration per step.
    pub acceleration: f32,
    /// How far (0..1) the vanishing point leans toward the pointer.
    pub follow: f32,
    pub color: Rgb,
    pub seed: u64,
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        Self {
            count: 160,
            acceleration: 0.012,
            follow: 0.35,
            color: Rgb::new(235, 240, 255),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl StarfieldOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            count: p.count("count", d.count),
            acceleration: p.positive_f32("acceleration", d.acceleration),
            follow: p.unit_f32("follow", d.follow),
            color: p.color("color", d.color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            count: props::count_or(self.count, d.count),
            acceleration: props::positive_or(self.acceleration, d.acceleration),
            follow: props::unit_or(self.follow, d.follow),
            ..self
        }
    }
}

pub struct Starfield {
    options: StarfieldOptions,
    stars: Vec<Body>,
    size: Size,
    focus: Vec2,
    canvas: FxCanvas,
    rng: StdRng,
    recycled: u64,
}

impl Starfield {
    pub fn new(options: StarfieldOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            stars: Vec::new(),
            size: Size::new(0, 0),
            focus: Vec2::ZERO,
            canvas: FxCanvas::default(),
            rng,
            recycled: 0,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(StarfieldOptions::from_props(props))
    }

    pub fn stars(&self) -> &[Body] {
        &self.stars
    }

    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.size.width as f32 / 2.0, self.size.height as f32 / 2.0)
    }

    fn spawn(&mut self, anywhere: bool) -> Body {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let max_r = (self.size.width.max(self.size.height) as f32 / 2.0).max(1.0);
        let r = if anywhere {
            self.rng.random_range(0.0..max_r)
        } else {
            self.rng.random_range(0.0..1.5f32)
        };
        let dir = Vec2::from_angle(angle);
        let offset = Vec2::new(dir.x * r, dir.y * r / math::CELL_ASPECT);
        Body {
            pos: self.focus + offset,
            vel: Vec2::new(dir.x, dir.y / math::CELL_ASPECT) * (0.02 + r * 0.004),
            home: self.focus,
            size: 1.0,
            age: 0.0,
            lifetime: 0.0,
        }
    }

    fn out_of_bounds(&self, p: Vec2) -> bool {
        p.x < 0.0 || p.y < 0.0 || p.x >= self.size.width as f32 || p.y >= self.size.height as f32
    }

    fn paint(&mut self) {
        self.canvas.clear();
        for star in &self.stars {
            let speed = math::clamp01(star.speed() * 2.0);
            let tail = star.pos - star.vel * 3.0;
            if speed > 0.2 {
                self.canvas
                    .line(tail, star.pos, 0.25 * speed, self.options.color.scale(0.6));
            }
            self.canvas
                .plot(star.pos.x, star.pos.y, 0.3 + 0.7 * speed, self.options.color);
        }
    }
}

impl Effect for Starfield {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.focus = self.center();
        self.canvas.resize(size.width, size.height);
        self.stars.clear();
        if !effects::is_empty(size) {
            for _ in 0..self.options.count {
                let star = self.spawn(true);
                self.stars.push(star);
            }
        }
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let center = self.center();
        let goal = match ctx.pointer.position {
            Some(p) => center.lerp(p, self.options.follow),
            None => center,
        };
        self.focus = self.focus.lerp(goal, 0.05);

        let accel = self.options.acceleration;
        for i in 0..self.stars.len() {
            let star = &mut self.stars[i];
            let outward = (star.pos - star.home).normalize_or_zero();
            star.vel += Vec2::new(outward.x, outward.y / math::CELL_ASPECT) * accel;
            star.pos += star.vel;
            star.age += ctx.dt;
            let pos = star.pos;
            if self.out_of_bounds(pos) {
                let fresh = self.spawn(false);
                self.stars[i] = fresh;
                self.recycled += 1;
            }
        }
        self.paint();
    }

    fn settle(&mut self) {
        for star in &mut self.stars {
            star.vel = Vec2::ZERO;
        }
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::SPARKS, theme.base_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn stars_are_recycled_and_count_is_stable() {
        let mut fx = Starfield::from_props(&Props::new().with("count", 50));
        let size = Size::new(40, 12);
        fx.rebuild(size);
        let pointer = PointerState::default();
        for _ in 0..400 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
        assert_eq!(fx.stars().len(), 50);
        assert!(fx.recycled() > 0);
        assert!(fx.stars().iter().all(|s| s.pos.is_finite()));
    }

    #[test]
    fn empty_area_spawns_nothing() {
        let mut fx = Starfield::from_props(&Props::new());
        fx.rebuild(Size::new(0, 5));
        assert!(fx.stars().is_empty());
    }
}
