//! Typewriter: types a list of phrases one character at a time, holds, deletes and moves on.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::theme::FxTheme;
use ratatui_fx_core::timer::Timers;

#[derive(Clone, Debug)]
pub struct TypewriterOptions {
    pub words: Vec<String>,
    /// Characters typed per second.
    pub type_speed: f32,
    /// Characters deleted per second.
    pub delete_speed: f32,
    /// Seconds a finished phrase stays on screen.
    pub hold: f32,
    /// Start over after the last phrase instead of stopping on it.
    pub looping: bool,
    pub cursor: char,
    /// Full blink period of the cursor in seconds.
    pub blink: f32,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            words: vec![
                "Build terminal apps".to_string(),
                "that feel alive".to_string(),
                "one frame at a time".to_string(),
            ],
            type_speed: 14.0,
            delete_speed: 30.0,
            hold: 1.4,
            looping: true,
            cursor: '▌',
            blink: 1.0,
        }
    }
}

impl TypewriterOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let defaults: Vec<&str> = d.words.iter().map(String::as_str).collect();
        let words = match p.get("text") {
            Some(_) if p.get("words").is_none() => vec![p.text("text", "")],
            _ => p.string_list("words", &defaults),
        };
        Self {
            words,
            type_speed: p.positive_f32("typeSpeed", d.type_speed),
            delete_speed: p.positive_f32("deleteSpeed", d.delete_speed),
            hold: p.non_negative_f32("hold", d.hold),
            looping: p.flag("loop", d.looping),
            cursor: p.text("cursor", "").chars().next().unwrap_or(d.cursor),
            blink: p.positive_f32("blink", d.blink),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        let words: Vec<String> = self
            .words
            .iter()
            .map(|w| text::single_line(w))
            .filter(|w| !w.trim().is_empty())
            .collect();
        Self {
            words: if words.is_empty() { d.words } else { words },
            type_speed: props::positive_or(self.type_speed, d.type_speed),
            delete_speed: props::positive_or(self.delete_speed, d.delete_speed),
            hold: props::non_negative_or(self.hold, d.hold),
            blink: props::positive_or(self.blink, d.blink),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypePhase {
    Typing,
    Holding,
    Deleting,
    /// Last phrase typed with looping off, or settled.
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeEvent {
    StartDeleting,
}

pub struct Typewriter {
    options: TypewriterOptions,
    word: usize,
    /// Characters of the current phrase on screen.
    shown: usize,
    phase: TypePhase,
    acc: f32,
    blink: f32,
    timers: Timers<TypeEvent>,
    origin: (u16, u16),
}

impl Typewriter {
    pub fn new(options: TypewriterOptions) -> Self {
        Self {
            options: options.normalized(),
            word: 0,
            shown: 0,
            phase: TypePhase::Typing,
            acc: 0.0,
            blink: 0.0,
            timers: Timers::new(),
            origin: (0, 0),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(TypewriterOptions::from_props(props))
    }

    pub fn phase(&self) -> TypePhase {
        self.phase
    }

    pub fn word_index(&self) -> usize {
        self.word
    }

    /// The part of the current phrase on screen.
    pub fn visible(&self) -> String {
        self.current().chars().take(self.shown).collect()
    }

    fn current(&self) -> &str {
        self.options
            .words
            .get(self.word)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn current_len(&self) -> usize {
        self.current().chars().count()
    }

    fn is_last_word(&self) -> bool {
        self.word + 1 >= self.options.words.len()
    }

    fn restart(&mut self) {
        self.timers.reset();
        self.word = 0;
        self.shown = 0;
        self.acc = 0.0;
        self.blink = 0.0;
        self.phase = TypePhase::Typing;
    }

    fn cursor_visible(&self) -> bool {
        match self.phase {
            TypePhase::Typing | TypePhase::Deleting | TypePhase::Done => true,
            TypePhase::Holding => self.blink % self.options.blink < self.options.blink / 2.0,
        }
    }
}

impl Effect for Typewriter {
    fn rebuild(&mut self, size: Size) {
        // anchor on the longest phrase so the line does not jump between phrases
        let longest = self
            .options
            .words
            .iter()
            .max_by_key(|w| render::text_width(w))
            .map(String::as_str)
            .unwrap_or("");
        self.origin = text::origin(size, longest);
        self.restart();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.blink += ctx.dt;
        match self.phase {
            TypePhase::Typing => {
                self.acc += ctx.dt * self.options.type_speed;
                let len = self.current_len();
                while self.acc >= 1.0 && self.shown < len {
                    self.acc -= 1.0;
                    self.shown += 1;
                }
                if self.shown >= len {
                    self.acc = 0.0;
                    self.blink = 0.0;
                    if self.is_last_word() && !self.options.looping {
                        self.phase = TypePhase::Done;
                    } else {
                        self.phase = TypePhase::Holding;
                        self.timers
                            .schedule(self.options.hold, TypeEvent::StartDeleting);
                    }
                }
            }
            TypePhase::Holding => {
                for event in self.timers.advance(ctx.dt) {
                    match event {
                        TypeEvent::StartDeleting => self.phase = TypePhase::Deleting,
                    }
                }
            }
            TypePhase::Deleting => {
                self.acc += ctx.dt * self.options.delete_speed;
                while self.acc >= 1.0 && self.shown > 0 {
                    self.acc -= 1.0;
                    self.shown -= 1;
                }
                if self.shown == 0 {
                    self.acc = 0.0;
                    self.word = (self.word + 1) % self.options.words.len();
                    self.phase = TypePhase::Typing;
                }
            }
            TypePhase::Done => {}
        }
    }

    fn settle(&mut self) {
        self.timers.cancel_all();
        self.shown = self.current_len();
        self.phase = TypePhase::Done;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (ox, oy) = self.origin;
        if oy >= area.height || ox >= area.width {
            return;
        }
        let visible = self.visible();
        let max_cols = area.width - ox;
        render::render_str_clipped(
            area.x + ox,
            area.y + oy,
            0,
            max_cols,
            buf,
            &visible,
            theme.base_style(),
        );
        if !self.cursor_visible() {
            return;
        }
        let cx = ox.saturating_add(render::text_width(&visible));
        if cx >= area.width {
            return;
        }
        if let Some(cell) = buf.cell_mut((area.x + cx, area.y + oy)) {
            let mut tmp = [0u8; 4];
            cell.set_symbol(self.options.cursor.encode_utf8(&mut tmp));
            cell.set_style(Style::default().fg(theme.accent.to_color()));
        }
    }

    fn press(&mut self, _at: Vec2) {
        self.restart();
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if text::is_replay(key) {
            self.restart();
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
    }

    fn is_idle(&self) -> bool {
        self.phase == TypePhase::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    fn run(fx: &mut Typewriter, seconds: f32) {
        let pointer = PointerState::default();
        let steps = (seconds * 60.0).round() as usize;
        for _ in 0..steps {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size: Size::new(40, 3),
            });
        }
    }

    fn props() -> Props {
        Props::from_json(r#"{"words": ["hi", "yo"], "typeSpeed": 10, "deleteSpeed": 5, "hold": 0.5}"#)
            .unwrap()
    }

    #[test]
    fn types_holds_deletes_and_advances() {
        let mut fx = Typewriter::from_props(&props());
        fx.rebuild(Size::new(40, 3));
        run(&mut fx, 0.15);
        assert_eq!(fx.visible(), "h");
        run(&mut fx, 0.1);
        assert_eq!(fx.visible(), "hi");
        assert_eq!(fx.phase(), TypePhase::Holding);
        run(&mut fx, 0.6);
        assert_eq!(fx.phase(), TypePhase::Deleting);
        run(&mut fx, 0.5);
        assert_eq!(fx.word_index(), 1);
        assert!("yo".starts_with(&fx.visible()));
    }

    #[test]
    fn stops_on_last_word_without_loop() {
        let p = Props::from_json(r#"{"words": ["one"], "typeSpeed": 10, "loop": false}"#).unwrap();
        let mut fx = Typewriter::from_props(&p);
        fx.rebuild(Size::new(40, 3));
        run(&mut fx, 1.0);
        assert_eq!(fx.visible(), "one");
        assert!(fx.is_idle());
    }

    #[test]
    fn settle_shows_whole_phrase_with_cursor() {
        let mut fx = Typewriter::from_props(&props());
        let area = Rect::new(0, 0, 6, 1);
        fx.rebuild(Size::new(6, 1));
        fx.settle();
        let mut buf = Buffer::empty(area);
        fx.render(area, &mut buf, &FxTheme::default());
        assert_eq!(render::row_text(&buf, area, 0), "  hi▌ ");
    }

    #[test]
    fn blank_words_fall_back_to_defaults() {
        let p = Props::from_json(r#"{"words": ["", "\n"]}"#).unwrap();
        let fx = Typewriter::from_props(&p);
        assert_eq!(fx.options.words.len(), 3);
    }
}
