use crate::input::KeyEvent;
use crate::math::Vec2;
use crate::physics::PointerState;
use crate::theme::FxTheme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;

/// Everything an effect may read during one simulation step.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx<'a> {
    /// Seconds covered by this step.
    pub dt: f32,
    /// Seconds of simulated time since activation.
    pub time: f32,
    pub pointer: &'a PointerState,
    pub size: Size,
}

/// Host environment flags, read once when an effect is activated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FxEnv {
    /// Accessibility preference: render a single static frame and never animate.
    pub reduced_motion: bool,
    /// Simulation step length in seconds.
    pub step_seconds: f32,
    /// Quiet period before a resize rebuilds effect state.
    pub resize_debounce: f32,
}

impl Default for FxEnv {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            step_seconds: 1.0 / 60.0,
            resize_debounce: 0.15,
        }
    }
}

impl FxEnv {
    pub fn reduced_motion() -> Self {
        Self {
            reduced_motion: true,
            ..Self::default()
        }
    }
}

/// One self-contained visual effect bound to a rectangle of cells.
///
/// Simulation state lives in the effect and is mutated only by [`rebuild`](Effect::rebuild),
/// [`update`](Effect::update) and input hooks; [`render`](Effect::render) only reads it. Effects
/// are driven by an [`EffectHost`](crate::host::EffectHost), which owns the pointer, the frame
/// schedule and the reduced-motion decision.
pub trait Effect {
    /// (Re)initializes state for an area of `size` cells. Called on activation and after resizes.
    /// A zero-sized area must be accepted.
    fn rebuild(&mut self, size: Size);

    /// Advances state by one step.
    fn update(&mut self, ctx: &FrameCtx<'_>);

    /// Jumps to the final, static look. Used instead of animating under reduced motion.
    fn settle(&mut self);

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme);

    /// Primary pointer press at local cell coordinates.
    fn press(&mut self, _at: Vec2) {}

    fn release(&mut self) {}

    /// Returns `true` if the key was consumed.
    fn key(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    /// Cancels timers and drops transient state. Called on deactivation and drop.
    fn teardown(&mut self) {}

    /// `true` when further updates would not change anything until new input arrives.
    fn is_idle(&self) -> bool {
        false
    }
}
