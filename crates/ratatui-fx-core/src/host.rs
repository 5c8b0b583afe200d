//! Lifecycle guard around one [`Effect`].
//!
//! The host plays the role of the mount/unmount machinery: it decides once per activation whether
//! the effect animates or renders a single static frame, owns the pointer sample, filters mouse
//! events to its own rectangle, rebuilds state (rather than resuming) after a resize and cancels
//! everything the effect scheduled when it is torn down.

use crate::effect::Effect;
use crate::effect::FrameCtx;
use crate::effect::FxEnv;
use crate::input::InputEvent;
use crate::physics::FixedClock;
use crate::physics::PointerState;
use crate::theme::FxTheme;
use crate::timer::Debounce;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Not mounted; events and frames are ignored.
    Inactive,
    /// Animating; a frame is requested after every update.
    Running,
    /// Reduced motion: state was settled once and no frame loop exists.
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAction {
    None,
    Redraw,
}

pub struct EffectHost {
    effect: Box<dyn Effect>,
    mode: Mode,
    area: Rect,
    pending_area: Option<Rect>,
    pointer: PointerState,
    clock: FixedClock,
    resize: Debounce,
    frame_requested: bool,
    time: f32,
}

impl EffectHost {
    pub fn new(effect: Box<dyn Effect>) -> Self {
        let env = FxEnv::default();
        Self {
            effect,
            mode: Mode::Inactive,
            area: Rect::default(),
            pending_area: None,
            pointer: PointerState::default(),
            clock: FixedClock::new(env.step_seconds),
            resize: Debounce::new(env.resize_debounce),
            frame_requested: false,
            time: 0.0,
        }
    }

    /// Mounts the effect in `area`. The reduced-motion flag is read here and nowhere else.
    pub fn activate(&mut self, area: Rect, env: &FxEnv) {
        if self.mode != Mode::Inactive {
            self.deactivate();
        }
        self.area = area;
        self.pending_area = None;
        self.pointer = PointerState::default();
        self.clock = FixedClock::new(env.step_seconds);
        self.resize = Debounce::new(env.resize_debounce);
        self.time = 0.0;
        self.effect.rebuild(size_of(area));

        if env.reduced_motion {
            self.effect.settle();
            self.mode = Mode::Static;
            self.frame_requested = false;
            tracing::debug!(?area, "effect activated in static mode");
        } else {
            self.mode = Mode::Running;
            self.frame_requested = true;
            tracing::debug!(?area, "effect activated");
        }
    }

    /// Unmounts the effect: cancels its timers, the pending frame and the pointer sample.
    pub fn deactivate(&mut self) {
        if self.mode == Mode::Inactive {
            return;
        }
        self.effect.teardown();
        self.mode = Mode::Inactive;
        self.frame_requested = false;
        self.pending_area = None;
        self.resize.cancel();
        self.pointer.leave();
        tracing::debug!("effect deactivated");
    }

    /// Tells the host where it is laid out this frame.
    ///
    /// Running effects rebuild after the resize debounce settles; static effects rebuild and
    /// settle immediately. Growing from an empty area (first real measurement) is immediate too.
    pub fn set_area(&mut self, area: Rect) {
        if self.mode == Mode::Inactive || (area == self.area && self.pending_area.is_none()) {
            return;
        }
        if self.pending_area == Some(area) {
            return;
        }
        let first_measure = self.area.width == 0 || self.area.height == 0;
        match self.mode {
            Mode::Static => {
                self.area = area;
                self.effect.rebuild(size_of(area));
                self.effect.settle();
            }
            Mode::Running if first_measure => {
                self.area = area;
                self.pending_area = None;
                self.resize.cancel();
                self.effect.rebuild(size_of(area));
                self.frame_requested = true;
            }
            Mode::Running => {
                self.pending_area = Some(area);
                self.resize.poke();
                self.frame_requested = true;
            }
            Mode::Inactive => {}
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> HostAction {
        if self.mode == Mode::Inactive {
            return HostAction::None;
        }
        let action = match event {
            InputEvent::Mouse(m) => match m.local_to(self.area) {
                Some(local) => {
                    self.pointer.move_to(local);
                    if m.is_press() {
                        self.pointer.pressed = true;
                        self.effect.press(local);
                    } else if m.is_release() {
                        self.pointer.pressed = false;
                        self.effect.release();
                    }
                    HostAction::Redraw
                }
                None if self.pointer.is_active() => {
                    self.pointer.leave();
                    self.effect.release();
                    HostAction::Redraw
                }
                None => HostAction::None,
            },
            InputEvent::FocusLost => {
                self.pointer.leave();
                self.effect.release();
                HostAction::Redraw
            }
            InputEvent::Key(key) => {
                if self.effect.key(key) {
                    HostAction::Redraw
                } else {
                    HostAction::None
                }
            }
            InputEvent::Resize(..) => HostAction::None,
        };

        if action == HostAction::Redraw {
            match self.mode {
                Mode::Running => self.frame_requested = true,
                Mode::Static => self.effect.settle(),
                Mode::Inactive => {}
            }
        }
        action
    }

    /// Runs the simulation for a frame that took `dt` seconds. Returns `true` if state changed.
    ///
    /// Does nothing unless the host is running and a frame was requested.
    pub fn frame(&mut self, dt: f32) -> bool {
        if self.mode != Mode::Running || !self.frame_requested {
            return false;
        }

        let mut changed = false;
        if self.resize.advance(dt) {
            if let Some(area) = self.pending_area.take() {
                tracing::debug!(?area, "rebuilding effect after resize");
                self.area = area;
                self.effect.rebuild(size_of(area));
                self.clock.reset();
                changed = true;
            }
        }

        let steps = self.clock.consume(dt);
        let size = size_of(self.area);
        for _ in 0..steps {
            self.time += self.clock.step_seconds;
            let ctx = FrameCtx {
                dt: self.clock.step_seconds,
                time: self.time,
                pointer: &self.pointer,
                size,
            };
            self.effect.update(&ctx);
        }
        changed |= steps > 0;

        self.frame_requested =
            self.resize.is_armed() || self.pointer.is_active() || !self.effect.is_idle();
        changed
    }

    pub fn render(&self, buf: &mut Buffer, theme: &FxTheme) {
        if self.mode == Mode::Inactive || self.area.width == 0 || self.area.height == 0 {
            return;
        }
        let area = self.area.intersection(buf.area);
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.effect.render(area, buf, theme);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Whether the next display refresh should call [`frame`](Self::frame).
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    pub fn effect_mut(&mut self) -> &mut dyn Effect {
        self.effect.as_mut()
    }
}

impl Drop for EffectHost {
    fn drop(&mut self) {
        self.deactivate();
    }
}

fn size_of(area: Rect) -> Size {
    Size::new(area.width, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::input::MouseEvent;
    use crate::input::MouseEventKind;
    use crate::math::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Debug)]
    struct Log {
        rebuilds: Vec<Size>,
        updates: usize,
        settles: usize,
        teardowns: usize,
        presses: Vec<Vec2>,
        last_pointer: Option<Vec2>,
    }

    struct Probe(Rc<RefCell<Log>>);

    impl Effect for Probe {
        fn rebuild(&mut self, size: Size) {
            self.0.borrow_mut().rebuilds.push(size);
        }
        fn update(&mut self, ctx: &FrameCtx<'_>) {
            let mut log = self.0.borrow_mut();
            log.updates += 1;
            log.last_pointer = ctx.pointer.position;
        }
        fn settle(&mut self) {
            self.0.borrow_mut().settles += 1;
        }
        fn render(&self, _area: Rect, _buf: &mut Buffer, _theme: &FxTheme) {}
        fn press(&mut self, at: Vec2) {
            self.0.borrow_mut().presses.push(at);
        }
        fn teardown(&mut self) {
            self.0.borrow_mut().teardowns += 1;
        }
    }

    fn host() -> (EffectHost, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (EffectHost::new(Box::new(Probe(log.clone()))), log)
    }

    fn mouse(x: u16, y: u16, kind: MouseEventKind) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(x, y, kind))
    }

    #[test]
    fn reduced_motion_never_schedules_frames() {
        let (mut h, log) = host();
        h.activate(Rect::new(0, 0, 10, 5), &FxEnv::reduced_motion());
        assert_eq!(h.mode(), Mode::Static);
        assert!(!h.frame_requested());
        assert!(!h.frame(1.0));
        assert_eq!(log.borrow().updates, 0);
        assert_eq!(log.borrow().settles, 1);
    }

    #[test]
    fn running_host_updates_on_fixed_steps() {
        let (mut h, log) = host();
        h.activate(Rect::new(0, 0, 10, 5), &FxEnv::default());
        assert!(h.frame_requested());
        assert!(h.frame(1.0 / 30.0 + 1e-4));
        assert_eq!(log.borrow().updates, 2);
    }

    #[test]
    fn pointer_is_local_and_leaves_outside_area() {
        let (mut h, log) = host();
        h.activate(Rect::new(5, 2, 10, 5), &FxEnv::default());
        h.handle_event(&mouse(6, 3, MouseEventKind::Moved));
        assert_eq!(h.pointer().position, Some(Vec2::new(1.5, 1.5)));
        h.handle_event(&mouse(6, 3, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(log.borrow().presses, vec![Vec2::new(1.5, 1.5)]);
        h.handle_event(&mouse(40, 3, MouseEventKind::Moved));
        assert!(!h.pointer().is_active());
        h.frame(0.02);
        assert_eq!(log.borrow().last_pointer, None);
    }

    #[test]
    fn resize_rebuilds_after_debounce() {
        let (mut h, log) = host();
        h.activate(Rect::new(0, 0, 10, 5), &FxEnv::default());
        h.set_area(Rect::new(0, 0, 20, 8));
        assert_eq!(log.borrow().rebuilds.len(), 1);
        h.frame(0.05);
        assert_eq!(log.borrow().rebuilds.len(), 1);
        h.frame(0.2);
        assert_eq!(log.borrow().rebuilds.last(), Some(&Size::new(20, 8)));
        assert_eq!(h.area(), Rect::new(0, 0, 20, 8));
    }

    #[test]
    fn first_measure_rebuilds_immediately() {
        let (mut h, log) = host();
        h.activate(Rect::default(), &FxEnv::default());
        h.set_area(Rect::new(0, 0, 4, 4));
        assert_eq!(log.borrow().rebuilds, vec![Size::new(0, 0), Size::new(4, 4)]);
    }

    #[test]
    fn deactivate_and_drop_tear_down_once_each_mount() {
        let (mut h, log) = host();
        h.activate(Rect::new(0, 0, 3, 3), &FxEnv::default());
        h.deactivate();
        h.deactivate();
        assert_eq!(log.borrow().teardowns, 1);
        assert!(!h.frame_requested());
        h.activate(Rect::new(0, 0, 3, 3), &FxEnv::default());
        drop(h);
        assert_eq!(log.borrow().teardowns, 2);
    }

    #[test]
    fn inactive_host_ignores_input() {
        let (mut h, _log) = host();
        assert_eq!(
            h.handle_event(&mouse(0, 0, MouseEventKind::Moved)),
            HostAction::None
        );
        assert!(!h.frame(1.0));
    }
}
