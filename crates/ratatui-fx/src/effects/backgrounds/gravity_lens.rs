//! A dot lattice that bends toward the pointer like light around a mass. Holding the button
//! deepens the well.

use crate::effects;
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
use ratatui_fx_core::physics::ForceMode;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::Swarm;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct GravityLensOptions {
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub physics: PhysicsParams,
    /// Strength multiplier while the pointer is pressed.
    pub press_boost: f32,
    pub color: Rgb,
    pub core_color: Rgb,
}

impl Default for GravityLensOptions {
    fn default() -> Self {
        Self {
            spacing_x: 3.0,
            spacing_y: 1.5,
            physics: PhysicsParams {
                radius: 16.0,
                strength: 0.35,
                return_speed: 0.06,
                damping: 0.82,
                mode: ForceMode::Attract,
                edge: EdgePolicy::Free,
                aspect: CELL_ASPECT,
            },
            press_boost: 2.5,
            color: Rgb::new(150, 120, 255),
            core_color: Rgb::new(255, 210, 120),
        }
    }
}

impl GravityLensOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            spacing_x: p.positive_f32("spacingX", d.spacing_x),
            spacing_y: p.positive_f32("spacingY", d.spacing_y),
            physics: PhysicsParams::from_props(p, d.physics),
            press_boost: p.positive_f32("pressBoost", d.press_boost),
            color: p.color("color", d.color),
            core_color: p.color("coreColor", d.core_color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            spacing_x: props::positive_or(self.spacing_x, d.spacing_x),
            spacing_y: props::positive_or(self.spacing_y, d.spacing_y),
            physics: self.physics.normalized(),
            press_boost: props::positive_or(self.press_boost, d.press_boost),
            ..self
        }
    }
}

pub struct GravityLens {
    options: GravityLensOptions,
    swarm: Swarm,
    canvas: FxCanvas,
    pressed: bool,
}

impl GravityLens {
    pub fn new(options: GravityLensOptions) -> Self {
        Self {
            options: options.normalized(),
            swarm: Swarm::default(),
            canvas: FxCanvas::default(),
            pressed: false,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(GravityLensOptions::from_props(props))
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    fn params(&self) -> PhysicsParams {
        let mut params = self.options.physics;
        if self.pressed {
            params.strength *= self.options.press_boost;
        }
        params
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let params = self.params();
        for body in &self.swarm.bodies {
            let pull = Swarm::intensity(body, &params);
            let color = self.options.color.lerp(self.options.core_color, pull);
            self.canvas.plot(body.pos.x, body.pos.y, 0.3 + 0.7 * pull, color);
        }
    }
}

impl Effect for GravityLens {
    fn rebuild(&mut self, size: Size) {
        self.swarm = Swarm::new(size.width as f32, size.height as f32);
        self.canvas.resize(size.width, size.height);
        if !effects::is_empty(size) {
            // at most one lattice point per cell
            let cols = (size.width as f32 / self.options.spacing_x.max(1.0)).ceil() as usize;
            let rows = (size.height as f32 / self.options.spacing_y.max(1.0)).ceil() as usize;
            self.swarm.populate_lattice(cols, rows, 1.0);
        }
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.pressed = ctx.pointer.pressed;
        let params = self.params();
        self.swarm.step(ctx.pointer, &params);
        self.paint();
    }

    fn settle(&mut self) {
        self.swarm.settle();
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::DOTS, theme.base_style());
    }

    fn release(&mut self) {
        self.pressed = false;
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
    fn points_are_pulled_toward_pointer() {
        let mut fx = GravityLens::from_props(&Props::new());
        let size = Size::new(30, 12);
        fx.rebuild(size);
        let target = Vec2::new(15.0, 6.0);
        let before: f32 = fx
            .swarm()
            .bodies
            .iter()
            .map(|b| b.pos.distance(target))
            .sum();
        let pointer = PointerState {
            position: Some(target),
            pressed: false,
        };
        for _ in 0..10 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
        let after: f32 = fx
            .swarm()
            .bodies
            .iter()
            .map(|b| b.pos.distance(target))
            .sum();
        assert!(after < before);
    }

    #[test]
    fn pressing_boosts_strength() {
        let mut fx = GravityLens::from_props(&Props::new());
        let base = fx.params().strength;
        fx.pressed = true;
        assert!(fx.params().strength > base);
        fx.release();
        assert_eq!(fx.params().strength, base);
    }

    #[test]
    fn tiny_spacing_keeps_one_point_per_cell() {
        let props = Props::from_json(r#"{"spacingX": 1e-6, "spacingY": 1e-6}"#).unwrap();
        let mut fx = GravityLens::from_props(&props);
        fx.rebuild(Size::new(80, 24));
        assert_eq!(fx.swarm().len(), 80 * 24);
    }
}
