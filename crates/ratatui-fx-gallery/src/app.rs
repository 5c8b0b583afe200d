use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui_fx::EffectHost;
use ratatui_fx::FxEnv;
use ratatui_fx::FxTheme;
use ratatui_fx::Mode;
use ratatui_fx::Props;
use ratatui_fx::core::input::InputEvent;
use ratatui_fx::core::input::KeyCode;
use ratatui_fx::core::input::KeyEvent;
use ratatui_fx::core::keymap;
use ratatui_fx::core::keymap::Binding;
use ratatui_fx::registry::Catalog;
use ratatui_fx::registry::CatalogEntry;
use std::time::Duration;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Next,
    Prev,
    ToggleReducedMotion,
    ToggleSource,
    ScrollDown,
    ScrollUp,
}

pub struct BindingAction {
    pub binding: Binding,
    pub action: Action,
}

pub fn build_keymap() -> Vec<BindingAction> {
    vec![
        BindingAction {
            binding: Binding::new("n/p", "effect", vec![keymap::key_char('n')]),
            action: Action::Next,
        },
        BindingAction {
            binding: Binding::new("", "", vec![keymap::key_char('p')]),
            action: Action::Prev,
        },
        BindingAction {
            binding: Binding::new("m", "reduced motion", vec![keymap::key_char('m')]),
            action: Action::ToggleReducedMotion,
        },
        BindingAction {
            binding: Binding::new("s", "source", vec![keymap::key_char('s')]),
            action: Action::ToggleSource,
        },
        BindingAction {
            binding: Binding::new(
                "q",
                "quit",
                vec![
                    keymap::key_char('q'),
                    keymap::key_code(KeyCode::Esc),
                    keymap::key_ctrl('c'),
                ],
            ),
            action: Action::Quit,
        },
    ]
}

/// Keys that only apply while the source view is open.
fn source_keymap() -> Vec<BindingAction> {
    vec![
        BindingAction {
            binding: Binding::new(
                "j/k",
                "scroll",
                vec![keymap::key_char('j'), keymap::key_code(KeyCode::Down)],
            ),
            action: Action::ScrollDown,
        },
        BindingAction {
            binding: Binding::new(
                "",
                "",
                vec![keymap::key_char('k'), keymap::key_code(KeyCode::Up)],
            ),
            action: Action::ScrollUp,
        },
    ]
}

fn map_action(keymap: &[BindingAction], key: &KeyEvent) -> Option<Action> {
    keymap
        .iter()
        .find(|b| b.binding.matches(key))
        .map(|b| b.action)
}

fn hint(keymap: &[BindingAction]) -> String {
    let shown: Vec<Binding> = keymap
        .iter()
        .filter(|b| !b.binding.help_key.is_empty())
        .map(|b| b.binding.clone())
        .collect();
    keymap::hint_line(&shown)
}

/// Frames per second, measured over a rolling one-second window.
#[derive(Debug)]
struct FpsMeter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsMeter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
    }

    fn idle(&mut self, now: Instant) {
        self.fps = 0.0;
        self.frames = 0;
        self.window_start = now;
    }
}

pub struct App {
    catalog: Catalog,
    index: usize,
    /// Props for the effect picked on the command line; other effects use defaults.
    initial: Option<(usize, Props)>,
    host: EffectHost,
    env: FxEnv,
    theme: FxTheme,
    show_source: bool,
    source_scroll: u16,
    keymap: Vec<BindingAction>,
    source_keys: Vec<BindingAction>,
    fps: FpsMeter,
    activated: bool,
}

impl App {
    pub fn new(catalog: Catalog, index: usize, props: Props, env: FxEnv) -> anyhow::Result<Self> {
        let slug = catalog
            .iter()
            .nth(index)
            .map(|e| e.slug)
            .unwrap_or_default();
        let host = EffectHost::new(catalog.instantiate(slug, &props)?);
        Ok(Self {
            catalog,
            index,
            initial: Some((index, props)),
            host,
            env,
            theme: FxTheme::default(),
            show_source: false,
            source_scroll: 0,
            keymap: build_keymap(),
            source_keys: source_keymap(),
            fps: FpsMeter::new(),
            activated: false,
        })
    }

    fn entry(&self) -> Option<&CatalogEntry> {
        self.catalog.iter().nth(self.index)
    }

    pub fn frame_requested(&self) -> bool {
        self.host.frame_requested()
    }

    /// Advances the running effect. `dt` is the wall time since the previous frame.
    pub fn tick(&mut self, dt: Duration, now: Instant) {
        if self.host.frame_requested() {
            self.host.frame(dt.as_secs_f32().min(0.25));
            self.fps.tick(now);
        } else {
            self.fps.idle(now);
        }
    }

    /// Returns `false` when the app should exit.
    pub fn handle_event(&mut self, event: &InputEvent) -> anyhow::Result<bool> {
        if let InputEvent::Key(key) = event {
            let action = map_action(&self.keymap, key).or_else(|| {
                self.show_source
                    .then(|| map_action(&self.source_keys, key))
                    .flatten()
            });
            if let Some(action) = action {
                return self.apply(action);
            }
        }
        self.host.handle_event(event);
        Ok(true)
    }

    fn apply(&mut self, action: Action) -> anyhow::Result<bool> {
        match action {
            Action::Quit => return Ok(false),
            Action::Next => self.select((self.index + 1) % self.catalog.len().max(1))?,
            Action::Prev => {
                let len = self.catalog.len().max(1);
                self.select((self.index + len - 1) % len)?
            }
            Action::ToggleReducedMotion => {
                self.env.reduced_motion = !self.env.reduced_motion;
                tracing::info!(reduced_motion = self.env.reduced_motion, "toggled reduced motion");
                self.activated = false;
            }
            Action::ToggleSource => {
                self.show_source = !self.show_source;
                self.source_scroll = 0;
                self.activated = false;
            }
            Action::ScrollDown => self.source_scroll = self.source_scroll.saturating_add(1),
            Action::ScrollUp => self.source_scroll = self.source_scroll.saturating_sub(1),
        }
        Ok(true)
    }

    fn select(&mut self, index: usize) -> anyhow::Result<()> {
        let Some(slug) = self.catalog.iter().nth(index).map(|e| e.slug) else {
            return Ok(());
        };
        let props = match &self.initial {
            Some((i, props)) if *i == index => props.clone(),
            _ => Props::new(),
        };
        self.host.deactivate();
        self.host = EffectHost::new(self.catalog.instantiate(slug, &props)?);
        self.index = index;
        self.source_scroll = 0;
        self.activated = false;
        tracing::info!(slug, "switched effect");
        Ok(())
    }

    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let [title, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(f.area());

        let (name, category, description, source) = match self.entry() {
            Some(e) => (e.name, e.category.label(), e.description, e.source),
            None => ("", "", "", ""),
        };

        let accent = Style::default().fg(self.theme.accent.to_color());
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {name} "), accent.add_modifier(Modifier::BOLD)),
                Span::styled(format!("{category} · "), self.theme.muted_style()),
                Span::styled(description, self.theme.base_style()),
            ]))
            .style(self.theme.base_style()),
            title,
        );

        let (stage, code) = if self.show_source {
            let [stage, code] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(body);
            (stage, Some(code))
        } else {
            (body, None)
        };

        let block = Block::bordered()
            .border_style(self.theme.muted_style())
            .style(self.theme.base_style());
        let inner = block.inner(stage);
        f.render_widget(block, stage);
        self.place(inner);
        self.host.render(f.buffer_mut(), &self.theme);

        if let Some(code) = code {
            let block = Block::bordered()
                .title(" source ")
                .border_style(self.theme.muted_style())
                .style(self.theme.base_style());
            f.render_widget(
                Paragraph::new(source)
                    .block(block)
                    .scroll((self.source_scroll, 0)),
                code,
            );
        }

        f.render_widget(
            Paragraph::new(self.status_line()).style(self.theme.muted_style()),
            status,
        );
    }

    /// Activates the host on first layout (or after a mode change) and reports later moves.
    fn place(&mut self, area: Rect) {
        if self.activated {
            self.host.set_area(area);
        } else {
            self.host.activate(area, &self.env);
            self.activated = true;
        }
    }

    fn status_line(&self) -> String {
        let slug = self.entry().map_or("", |e| e.slug);
        let mode = match self.host.mode() {
            Mode::Running if self.host.frame_requested() => "running",
            Mode::Running => "idle",
            Mode::Static => "static",
            Mode::Inactive => "inactive",
        };
        let mut hints = hint(&self.keymap);
        if self.show_source {
            hints = format!("{hints} • {}", hint(&self.source_keys));
        }
        format!(
            " {slug} [{}/{}] {mode} {:>4.0} fps │ {hints}",
            self.index + 1,
            self.catalog.len(),
            self.fps.fps,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Catalog::builtin(), 0, Props::new(), FxEnv::default()).unwrap()
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut app = app();
        let len = app.catalog.len();
        app.handle_event(&InputEvent::Key(keymap::key_char('p')))
            .unwrap();
        assert_eq!(app.index, len - 1);
        app.handle_event(&InputEvent::Key(keymap::key_char('n')))
            .unwrap();
        assert_eq!(app.index, 0);
    }

    #[test]
    fn quit_keys_stop_the_app() {
        let mut app = app();
        let quit = app
            .handle_event(&InputEvent::Key(keymap::key_code(KeyCode::Esc)))
            .unwrap();
        assert!(!quit);
    }

    #[test]
    fn reduced_motion_toggle_reactivates_static() {
        let mut app = app();
        app.place(Rect::new(0, 0, 20, 6));
        assert_eq!(app.host.mode(), Mode::Running);
        app.handle_event(&InputEvent::Key(keymap::key_char('m')))
            .unwrap();
        app.place(Rect::new(0, 0, 20, 6));
        assert_eq!(app.host.mode(), Mode::Static);
        assert!(!app.frame_requested());
    }

    #[test]
    fn command_line_props_stick_to_their_effect() {
        let props = Props::new().with("text", "hi");
        let catalog = Catalog::builtin();
        let index = catalog.position("scramble-text").unwrap();
        let mut app = App::new(catalog, index, props, FxEnv::default()).unwrap();
        app.select(0).unwrap();
        app.select(index).unwrap();
        assert!(matches!(&app.initial, Some((i, _)) if *i == index));
    }
}
