use glam::Vec2;
use scuff2d::*;

/// Walks in a straight line at constant speed.
struct Mover {
    kind: u32,
    layer: Layer,
    pos: Vec2,
    vel: Vec2,
}

impl CellCollider for Mover {
    fn type_tag(&self) -> u32 {
        self.kind
    }

    fn collision_layer(&self) -> Layer {
        self.layer
    }

    fn collision_mask(&self) -> LayerMask {
        LayerMask::EMPTY
    }

    fn update(&mut self, dt: f32) -> Vec2 {
        self.pos += self.vel * dt;
        self.pos
    }
}

struct Cells(usize);

impl DebugDraw for Cells {
    fn draw_cell(&mut self, bounds: Aabb, occupants: usize) {
        self.0 += 1;
        println!(
            "  cell ({:.0},{:.0})..({:.0},{:.0}) holds {}",
            bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y, occupants
        );
    }
}

fn main() {
    env_logger::init();

    let mut grid = GridCollisionSystem::new(GridConfig::new(32.0)).unwrap();
    let player = grid.add(Mover {
        kind: 1,
        layer: Layer(0),
        pos: Vec2::new(4.0, 16.0),
        vel: Vec2::new(40.0, 0.0),
    });
    for i in 0..3 {
        grid.add(Mover {
            kind: 2,
            layer: Layer(1),
            pos: Vec2::new(48.0 + 64.0 * i as f32, 16.0),
            vel: Vec2::ZERO,
        });
    }
    println!("Inserted player={:?}", player);

    let dt = 1.0 / 4.0;
    for _ in 0..24 {
        grid.tick(dt);
        for ev in grid.drain_events() {
            println!("tick {} {:?} (tag {}): {:?}", grid.stats().tick, ev.id, ev.type_tag, ev.kind);
        }
    }

    let s = grid.stats();
    println!(
        "objects={} live_cells={} free_cells={} capacity={}",
        s.objects,
        s.live_cells,
        s.free_cells,
        grid.pool().capacity()
    );
    let mut cells = Cells(0);
    grid.debug_draw(&mut cells);
    println!("{} cells drawn", cells.0);
}
