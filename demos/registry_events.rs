use glam::Vec2;
use scuff2d::*;

struct Body {
    name: &'static str,
    collider: Collider,
}

impl Collidable for Body {
    fn collider(&self) -> &Collider {
        &self.collider
    }

    fn on_collision(&mut self, event: &CollisionEvent, _commands: &mut RegistryCommands<Self>) {
        match &event.manifold {
            Some(m) => println!(
                "{}: hit {:?} at ({:.2},{:.2}) n=({:.2},{:.2})",
                self.name, event.other, m.point.x, m.point.y, m.normal.x, m.normal.y
            ),
            None => println!("{}: hit {:?}", self.name, event.other),
        }
    }

    fn on_overlap_ended(&mut self, other: ColliderId, _commands: &mut RegistryCommands<Self>) {
        println!("{}: left {:?}", self.name, other);
    }
}

fn main() {
    env_logger::init();

    let bounds = Aabb::new(Vec2::splat(-20.0), Vec2::splat(20.0));
    let mut reg = CollisionRegistry::new(HashConfig::covering(bounds, 2.0)).unwrap();
    let all = QueryFlags {
        intersection: true,
        closest_point: true,
    };

    let ball = reg.add(Body {
        name: "ball",
        collider: Collider::new(Primitive::circle(Vec2::new(-6.0, 0.0), 0.5))
            .with_velocity(Vec2::new(5.0, 0.0))
            .with_layer(Layer(1))
            .with_mask(LayerMask::of(&[Layer(2)]))
            .with_queries(all),
    });
    let wall = reg.add(Body {
        name: "wall",
        collider: Collider::new(Primitive::rect(Vec2::ZERO, Vec2::new(1.0, 4.0), Alignment::Center))
            .with_layer(Layer(2))
            .with_mask(LayerMask::of(&[Layer(1)])),
    });
    println!("Inserted ball={:?} wall={:?}", ball, wall);

    // Additions land on the first tick.
    reg.tick();
    if let (Some(b), Some(w)) = (reg.get(ball), reg.get(wall)) {
        if let SweepOutcome::Impact(hit) = Sweep::cast(&b.collider, &w.collider, 2.0) {
            println!(
                "Sweep: toi={:.3} at ({:.2},{:.2}) n=({:.2},{:.2})",
                hit.toi, hit.intersection_point.x, hit.intersection_point.y, hit.normal.x, hit.normal.y
            );
        }
    }

    let dt = 1.0 / 10.0;
    for _ in 0..40 {
        reg.tick();
        let events = reg.drain_events();
        if !events.is_empty() {
            let s = reg.stats();
            println!("tick {}: tests={} overlapping={} events={}", s.tick, s.tests, s.overlapping, s.events);
        }
        if let Some(b) = reg.get_mut(ball) {
            b.collider.integrate(dt);
        }
    }

    if let Some((id, hit)) = reg.linecast(Vec2::new(-15.0, 0.0), Vec2::new(15.0, 0.0), LayerMask::EMPTY) {
        println!("Linecast: first {:?} at ({:.2},{:.2})", id, hit.point.x, hit.point.y);
    }
}
