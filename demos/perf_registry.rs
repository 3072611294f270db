use glam::Vec2;
use scuff2d::*;
use std::time::Instant;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn main() {
    env_logger::init();

    let bounds = Aabb::new(Vec2::splat(-100.0), Vec2::splat(100.0));
    let mut reg = CollisionRegistry::new(HashConfig::covering(bounds, 4.0)).unwrap();

    let n = 5_000usize; // number of colliders
    let mut seed = 1u32;
    for i in 0..n {
        let p = Vec2::new(unit(&mut seed) * 200.0 - 100.0, unit(&mut seed) * 200.0 - 100.0);
        let v = Vec2::new(unit(&mut seed) * 4.0 - 2.0, unit(&mut seed) * 4.0 - 2.0);
        let shape = if i % 2 == 0 {
            Primitive::rect(p, Vec2::splat(1.0), Alignment::Center)
        } else {
            Primitive::circle(p, 0.5)
        };
        reg.add(Collider::new(shape).with_velocity(v));
    }

    let dt = 1.0 / 60.0;
    let frames = 60;
    let mut events = 0;
    let t0 = Instant::now();
    for _ in 0..frames {
        reg.tick();
        events += reg.drain_events().len();
        let ids: Vec<ColliderId> = reg.iter().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(c) = reg.get_mut(id) {
                c.integrate(dt);
            }
        }
    }
    let elapsed = t0.elapsed();

    let s = reg.stats();
    println!(
        "N={} frames={} total={:?} per_tick={:.3}ms tests={} overlapping={} occupied_cells={} candidate_pairs={} events={}",
        n,
        frames,
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / frames as f64,
        s.tests,
        s.overlapping,
        s.hash.occupied_cells,
        s.hash.candidate_pairs,
        events
    );
}
