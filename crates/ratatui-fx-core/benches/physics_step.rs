use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics::EdgePolicy;
use ratatui_fx_core::physics::PhysicsParams;
use ratatui_fx_core::physics::PointerState;
use ratatui_fx_core::physics::Swarm;

fn bench_swarm(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm_step");
    for &count in &[500usize, 5_000, 50_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let mut swarm = Swarm::new(200.0, 60.0);
        swarm.populate_random(count, 1.0, &mut rng);
        let params = PhysicsParams {
            edge: EdgePolicy::Wrap,
            ..PhysicsParams::default()
        };
        let pointer = PointerState {
            position: Some(Vec2::new(100.0, 30.0)),
            pressed: false,
        };
        group.bench_function(format!("{count}"), |b| {
            b.iter(|| {
                swarm.step(black_box(&pointer), black_box(&params));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_swarm);
criterion_main!(benches);
