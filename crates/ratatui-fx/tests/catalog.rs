use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx::Effect;
use ratatui_fx::EffectHost;
use ratatui_fx::FxEnv;
use ratatui_fx::FxError;
use ratatui_fx::FxTheme;
use ratatui_fx::Mode;
use ratatui_fx::Props;
use ratatui_fx::core::input::InputEvent;
use ratatui_fx::core::input::KeyCode;
use ratatui_fx::core::input::MouseButton;
use ratatui_fx::core::input::MouseEvent;
use ratatui_fx::core::input::MouseEventKind;
use ratatui_fx::core::keymap;
use ratatui_fx::core::render;
use ratatui_fx::effects::backgrounds::SandParticles;
use ratatui_fx::registry::Catalog;
use ratatui_fx::registry::Category;

fn mouse(x: u16, y: u16, kind: MouseEventKind) -> InputEvent {
    InputEvent::Mouse(MouseEvent::new(x, y, kind))
}

fn run(host: &mut EffectHost, seconds: f32) {
    let frames = (seconds * 60.0).round() as usize;
    for _ in 0..frames {
        host.frame(1.0 / 60.0);
    }
}

#[test]
fn builtin_catalog_lists_every_effect() {
    let catalog = Catalog::builtin();
    assert_eq!(catalog.len(), 30);
    assert_eq!(catalog.by_category(Category::Background).count(), 11);
    assert_eq!(catalog.by_category(Category::Text).count(), 7);
    assert_eq!(
        catalog.get("tab-indicator").map(|e| e.category),
        Some(Category::Navigation)
    );
}

#[test]
fn every_effect_survives_degenerate_and_normal_areas() {
    let catalog = Catalog::builtin();
    let theme = FxTheme::default();
    for entry in catalog.iter() {
        let effect = (entry.build)(&Props::new());
        let mut host = EffectHost::new(effect);

        host.activate(Rect::new(0, 0, 0, 0), &FxEnv::default());
        run(&mut host, 0.1);
        let mut empty = Buffer::empty(Rect::new(0, 0, 0, 0));
        host.render(&mut empty, &theme);

        host.set_area(Rect::new(2, 1, 1, 1));
        run(&mut host, 0.1);

        let area = Rect::new(0, 0, 60, 16);
        host.activate(area, &FxEnv::default());
        host.handle_event(&mouse(30, 8, MouseEventKind::Moved));
        host.handle_event(&mouse(30, 8, MouseEventKind::Down(MouseButton::Left)));
        host.handle_event(&mouse(30, 8, MouseEventKind::Up(MouseButton::Left)));
        host.handle_event(&InputEvent::Key(keymap::key_code(KeyCode::Right)));
        run(&mut host, 0.5);
        host.handle_event(&mouse(200, 200, MouseEventKind::Moved));
        run(&mut host, 0.25);

        let mut buf = Buffer::empty(area);
        host.render(&mut buf, &theme);
        host.deactivate();
        assert_eq!(host.mode(), Mode::Inactive, "{}", entry.slug);
    }
}

#[test]
fn reduced_motion_renders_one_static_frame() {
    let catalog = Catalog::builtin();
    for entry in catalog.iter() {
        let mut host = EffectHost::new((entry.build)(&Props::new()));
        let area = Rect::new(0, 0, 40, 10);
        host.activate(area, &FxEnv::reduced_motion());
        assert_eq!(host.mode(), Mode::Static, "{}", entry.slug);
        assert!(!host.frame_requested(), "{}", entry.slug);

        host.handle_event(&mouse(5, 5, MouseEventKind::Moved));
        assert!(!host.frame_requested(), "{}", entry.slug);
        assert!(!host.frame(1.0), "{}", entry.slug);

        let mut buf = Buffer::empty(area);
        host.render(&mut buf, &FxTheme::default());
    }
}

#[test]
fn invalid_grain_count_falls_back_to_default() {
    let mut sand = SandParticles::from_props(&Props::new().with("count", -5));
    sand.rebuild(Size::new(40, 12));
    assert_eq!(sand.swarm().len(), 500);
}

#[test]
fn scramble_settles_through_the_host() {
    let catalog = Catalog::builtin();
    let props = Props::new().with("text", "AB").with("scrambleCycles", 6);
    let mut host = EffectHost::new(catalog.instantiate("scramble-text", &props).unwrap());
    let area = Rect::new(0, 0, 10, 1);
    host.activate(area, &FxEnv::default());
    run(&mut host, 2.0);
    assert!(!host.frame_requested());

    let mut buf = Buffer::empty(area);
    host.render(&mut buf, &FxTheme::default());
    assert_eq!(render::row_text(&buf, area, 0), "    AB    ");
}

#[test]
fn double_click_pressure_wave_returns_to_rest() {
    let catalog = Catalog::builtin();
    let props = Props::new().with("text", "pressure");
    let mut host = EffectHost::new(catalog.instantiate("pressure-wave", &props).unwrap());
    let area = Rect::new(0, 0, 40, 9);
    host.activate(area, &FxEnv::default());
    let press = mouse(18, 4, MouseEventKind::Down(MouseButton::Left));
    host.handle_event(&press);
    run(&mut host, 0.05);
    host.handle_event(&press);
    host.handle_event(&mouse(100, 100, MouseEventKind::Moved));
    run(&mut host, 15.0);
    assert!(!host.frame_requested());
    assert!(host.effect().is_idle());
}

#[test]
fn text_reveals_finish_after_remount() {
    let catalog = Catalog::builtin();
    let cases = [
        ("decrypt-text", Props::new()),
        ("shatter-text", Props::new()),
        ("scramble-text", Props::new()),
        ("connect-text", Props::new()),
        ("typewriter", Props::from_json(r#"{"words": ["hi"], "loop": false}"#).unwrap()),
    ];
    for (slug, props) in cases {
        let mut host = EffectHost::new(catalog.instantiate(slug, &props).unwrap());
        let area = Rect::new(0, 0, 40, 12);
        host.activate(area, &FxEnv::default());
        host.frame(0.1);
        host.deactivate();
        host.activate(area, &FxEnv::default());
        assert!(host.frame_requested(), "{slug} restarts on remount");
        run(&mut host, 12.0);
        assert!(!host.frame_requested(), "{slug}");
        assert!(host.effect().is_idle(), "{slug}");
    }
}

#[test]
fn zero_spring_prop_still_lets_letters_settle() {
    let catalog = Catalog::builtin();
    let props = Props::new().with("text", "pressure").with("returnSpeed", 0);
    let mut host = EffectHost::new(catalog.instantiate("pressure-wave", &props).unwrap());
    host.activate(Rect::new(0, 0, 40, 9), &FxEnv::default());
    host.handle_event(&mouse(18, 4, MouseEventKind::Down(MouseButton::Left)));
    host.handle_event(&mouse(100, 100, MouseEventKind::Moved));
    run(&mut host, 15.0);
    assert!(!host.frame_requested());
    assert!(host.effect().is_idle());
}

#[test]
fn oversized_counts_and_lattices_stay_bounded() {
    let catalog = Catalog::builtin();
    let cases = [
        ("liquid-grid", r#"{"spacingX": 1e-6, "spacingY": 1e-6}"#),
        ("gravity-lens", r#"{"spacingX": 1e-6, "spacingY": 1e-6}"#),
        ("sand-particles", r#"{"count": 1e12}"#),
        ("constellation", r#"{"count": 1e12}"#),
        ("starfield", r#"{"count": 1e12}"#),
        ("fireflies", r#"{"count": 1e12}"#),
        ("pulse-bars", r#"{"bars": 1e12}"#),
    ];
    for (slug, json) in cases {
        let props = Props::from_json(json).unwrap();
        let mut host = EffectHost::new(catalog.instantiate(slug, &props).unwrap());
        let area = Rect::new(0, 0, 80, 24);
        host.activate(area, &FxEnv::default());
        host.frame(1.0 / 60.0);
        let mut buf = Buffer::empty(area);
        host.render(&mut buf, &FxTheme::default());
    }
}

#[test]
fn unknown_slug_is_reported() {
    let catalog = Catalog::builtin();
    match catalog.instantiate("nope", &Props::new()) {
        Err(FxError::UnknownEffect(slug)) => assert_eq!(slug, "nope"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unknown slug instantiated"),
    }
}
