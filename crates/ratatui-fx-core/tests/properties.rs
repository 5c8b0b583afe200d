use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::PointerState;
use ratatui_fx_core::physics::Swarm;
use ratatui_fx_core::physics::pointer_falloff;
use ratatui_fx_core::physics::pointer_force;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::reveal::RevealMachine;
use ratatui_fx_core::reveal::RevealOptions;
use ratatui_fx_core::reveal::RevealOrder;

fn params(damping: f32, return_speed: f32) -> PhysicsParams {
    PhysicsParams {
        damping,
        return_speed,
        edge: EdgePolicy::Free,
        ..PhysicsParams::default()
    }
}

/// Spectral radius of one inactive-pointer step, `v' = d (v - k x)` then `x' = x + v'`.
fn spring_decay(damping: f32, return_speed: f32) -> f64 {
    let (d, k) = (f64::from(damping), f64::from(return_speed));
    let trace = 1.0 + d - d * k;
    let disc = trace * trace - 4.0 * d;
    if disc < 0.0 {
        d.sqrt()
    } else {
        (trace.abs() + disc.sqrt()) / 2.0
    }
}

proptest! {
    #[test]
    fn population_matches_requested_count(
        count in 0usize..400,
        w in 0.0f32..200.0,
        h in 0.0f32..100.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = Swarm::new(w, h);
        swarm.populate_random(count, 1.0, &mut rng);
        prop_assert_eq!(swarm.len(), count);
        prop_assert!(swarm.bodies.iter().all(|b| b.pos.is_finite()));
    }

    #[test]
    fn intensity_stays_in_unit_range(
        vx in -1e4f32..1e4,
        vy in -1e4f32..1e4,
        dx in -1e3f32..1e3,
        dy in -1e3f32..1e3,
    ) {
        let body = Body {
            pos: Vec2::new(dx, dy),
            vel: Vec2::new(vx, vy),
            ..Body::default()
        };
        let i = Swarm::intensity(&body, &PhysicsParams::default());
        prop_assert!((0.0..=1.0).contains(&i));
    }

    #[test]
    fn pointer_outside_radius_adds_no_force(
        radius in 0.5f32..50.0,
        extra in 0.0f32..100.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let params = PhysicsParams { radius, ..PhysicsParams::default() };
        let pointer = PointerState { position: Some(Vec2::ZERO), pressed: false };
        let pos = Vec2::from_angle(angle) * (radius + extra);
        // Rounding can put a point that should sit exactly on the circle just inside it.
        prop_assume!(pos.length() >= radius);
        prop_assert_eq!(pointer_force(pos, &pointer, &params), Vec2::ZERO);
        prop_assert_eq!(pointer_falloff(radius + extra, radius), 0.0);
    }

    #[test]
    fn inactive_pointer_converges_for_any_accepted_props(
        damping in prop_oneof![0.0f64..1.0, -2.0f64..2.0, any::<f64>()],
        return_speed in prop_oneof![0.0f64..1.0, -10.0f64..10.0, any::<f64>()],
        ox in -20.0f32..20.0,
        oy in -20.0f32..20.0,
    ) {
        let props = Props::new()
            .with("damping", damping)
            .with("returnSpeed", return_speed);
        let p = PhysicsParams::from_props(&props, params(0.88, 0.05)).normalized();
        prop_assert!(p.damping > 0.0 && p.damping < 1.0);
        prop_assert!(p.return_speed > 0.0 && p.return_speed < 1.0);

        let mut swarm = Swarm::new(10.0, 10.0);
        swarm.populate_lattice(1, 1, 1.0);
        for b in &mut swarm.bodies {
            b.pos += Vec2::new(ox, oy);
        }
        let start = swarm.max_displacement();
        let rho = spring_decay(p.damping, p.return_speed);
        // creeping corners (damping near 0 or 1 with a weak spring) only get the bound check
        let converges_quickly = rho < 0.9995;
        let steps = if converges_quickly {
            (2.0 * 1e-4f64.ln() / rho.ln()).ceil() as usize + 100
        } else {
            2000
        };
        let pointer = PointerState::default();
        for _ in 0..steps {
            swarm.step(&pointer, &p);
            prop_assert!(swarm.max_displacement() <= start * 1.5 + 1e-3);
        }
        if converges_quickly {
            prop_assert!(swarm.max_displacement() <= start.max(1e-3) * 0.01 + 1e-3);
        }
    }

    #[test]
    fn reveal_terminal_state_equals_source(
        text in "[ -~]{0,40}",
        stagger in 0.0f32..0.2,
        base in 0.0f32..0.5,
        seed in any::<u64>(),
        order in prop_oneof![
            Just(RevealOrder::Forward),
            Just(RevealOrder::Reverse),
            Just(RevealOrder::Random),
            Just(RevealOrder::CenterOut),
        ],
    ) {
        let mut m = RevealMachine::new(RevealOptions {
            stagger,
            base_duration: base,
            scatter: 4.0,
            order,
            seed,
            ..RevealOptions::default()
        });
        m.trigger(&text);
        let steps = ((m.deadline() + 0.1) * 60.0).ceil() as usize;
        for _ in 0..steps {
            m.advance(1.0 / 60.0);
        }
        prop_assert!(m.is_settled());
        prop_assert_eq!(m.displayed(), text);
        prop_assert!(m.cells().iter().all(|c| c.opacity == 1.0 && c.offset == Vec2::ZERO));
    }

    #[test]
    fn latest_trigger_wins(
        first in "[a-z ]{1,20}",
        second in "[A-Z ]{1,20}",
        interrupt_after in 0usize..30,
    ) {
        let mut m = RevealMachine::new(RevealOptions::default());
        m.trigger(&first);
        for _ in 0..interrupt_after {
            m.advance(1.0 / 60.0);
        }
        m.trigger(&second);
        let steps = ((m.deadline() + 0.1) * 60.0).ceil() as usize;
        for _ in 0..steps {
            m.advance(1.0 / 60.0);
        }
        prop_assert_eq!(m.displayed(), second);
        prop_assert_eq!(m.pending_timers(), 0);
    }
}
