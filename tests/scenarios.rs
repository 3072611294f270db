use approx::assert_abs_diff_eq;
use glam::Vec2;
use rstest::rstest;

use scuff2d::*;

#[test]
fn two_circles_cross_at_two_mirrored_points() {
    let a = Primitive::circle(Vec2::ZERO, 5.0);
    let b = Primitive::circle(Vec2::new(8.0, 0.0), 5.0);
    assert!(Narrowphase::overlap(&a, &b));

    let m = Narrowphase::intersect(&a, &b).unwrap();
    assert_eq!(m.len(), 2);
    let (p0, p1) = (m.contacts[0].point, m.contacts[1].point);
    assert_abs_diff_eq!(p0.x, 4.0, epsilon = 1e-4);
    assert_abs_diff_eq!(p1.x, 4.0, epsilon = 1e-4);
    assert_abs_diff_eq!(p0.y, -p1.y, epsilon = 1e-4);
    assert_abs_diff_eq!(p0.y.abs(), 3.0, epsilon = 1e-4);
}

#[test]
fn circle_short_of_segment_does_not_overlap() {
    let c = Primitive::circle(Vec2::ZERO, 5.0);
    let wall = Primitive::segment(Vec2::new(10.0, -20.0), Vec2::new(10.0, 20.0));
    assert!(!Narrowphase::overlap(&c, &wall));
    assert!(!Narrowphase::overlap(&wall, &c));
    assert!(Narrowphase::intersect(&c, &wall).is_none());
    let p = Narrowphase::closest_point(&c, &wall).unwrap();
    assert_eq!(p, Vec2::new(10.0, 0.0));
}

#[rstest]
#[case::tangent(10.0, 5.0, 1)]
#[case::crossing(8.0, 5.0, 2)]
#[case::apart(10.5, 5.0, 0)]
#[case::nested(0.5, 2.0, 0)]
fn circle_intersection_counts(#[case] distance: f32, #[case] radius: f32, #[case] expected: usize) {
    let a = Primitive::circle(Vec2::ZERO, 5.0);
    let b = Primitive::circle(Vec2::new(distance, 0.0), radius);
    let count = Narrowphase::intersect(&a, &b).map_or(0, |m| m.len());
    assert_eq!(count, expected);
}

#[rstest]
fn cast_time_stays_in_unit_range(
    #[values(0, 1, 2, 3, 4)] shape: usize,
    #[values(Vec2::new(30.0, 0.0), Vec2::new(30.0, 12.0), Vec2::new(0.0, -40.0), Vec2::new(-25.0, 25.0))] vel: Vec2,
    #[values(1.0, 0.5, 0.1)] dt: f32,
) {
    let movers = [
        Primitive::point(Vec2::ZERO),
        Primitive::circle(Vec2::ZERO, 1.5),
        Primitive::segment(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0)),
        Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::Center),
        Primitive::polygon(vec![Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(0.0, 1.5)]),
    ];
    let targets = [
        Primitive::circle(Vec2::new(10.0, 0.0), 2.0),
        Primitive::rect(Vec2::new(0.0, -20.0), Vec2::splat(4.0), Alignment::Center),
        Primitive::segment(Vec2::new(-12.0, 8.0), Vec2::new(-8.0, 12.0)),
    ];
    for target in &targets {
        if let SweepOutcome::Impact(hit) = Sweep::cast_shapes(&movers[shape], vel, target, Vec2::ZERO, dt) {
            assert!((0.0..=1.0).contains(&hit.toi), "toi {} out of range", hit.toi);
            // The mover sits on the target's boundary at impact.
            let mut at_impact = movers[shape].clone();
            at_impact.translate(vel * dt * hit.toi);
            let gap = Narrowphase::closest_point(&at_impact, target)
                .zip(Narrowphase::closest_point(target, &at_impact))
                .map(|(on_target, on_mover)| on_target.distance(on_mover));
            assert!(gap.is_some_and(|g| g < 1e-2), "gap {gap:?} for {:?} -> {target:?}", movers[shape]);
        }
    }
}

#[test]
fn shorter_tick_never_moves_contact_further() {
    let a = Primitive::rect(Vec2::ZERO, Vec2::splat(2.0), Alignment::Center);
    let b = Primitive::circle(Vec2::new(6.0, 1.0), 1.0);
    let vel = Vec2::new(10.0, 0.0);
    let mut last = f32::INFINITY;
    for dt in [1.0, 0.8, 0.6, 0.45] {
        if let SweepOutcome::Impact(hit) = Sweep::cast_shapes(&a, vel, &b, Vec2::ZERO, dt) {
            let travelled = hit.intersection_point.distance(a.center());
            assert!(travelled <= last + 1e-4);
            last = travelled;
        }
    }
    assert!(last.is_finite());
}

struct Walker {
    path: Vec<Vec2>,
    step: usize,
    seen: Vec<GridEventKind>,
}

impl CellCollider for Walker {
    fn type_tag(&self) -> u32 {
        7
    }

    fn collision_layer(&self) -> Layer {
        Layer(1)
    }

    fn collision_mask(&self) -> LayerMask {
        LayerMask::EMPTY
    }

    fn update(&mut self, _dt: f32) -> Vec2 {
        let p = self.path[self.step.min(self.path.len() - 1)];
        self.step += 1;
        p
    }

    fn on_enter_cell(&mut self, coord: CellCoord) {
        self.seen.push(GridEventKind::EnteredCell(coord));
    }

    fn on_exit_cell(&mut self, coord: CellCoord) {
        self.seen.push(GridEventKind::ExitedCell(coord));
    }
}

#[test]
fn grid_object_crossing_one_cell_boundary() {
    let mut grid = GridCollisionSystem::new(GridConfig::new(100.0)).unwrap();
    let id = grid.add(Walker {
        path: vec![Vec2::new(50.0, 50.0), Vec2::new(150.0, 50.0)],
        step: 0,
        seen: Vec::new(),
    });
    grid.tick(1.0 / 60.0);
    grid.get_mut(id).unwrap().seen.clear();
    grid.tick(1.0 / 60.0);

    assert_eq!(
        grid.get(id).unwrap().seen,
        vec![
            GridEventKind::ExitedCell(CellCoord::new(0, 0)),
            GridEventKind::EnteredCell(CellCoord::new(1, 0)),
        ]
    );
    let events = grid.drain_events();
    assert!(events.iter().all(|e| e.type_tag == 7));
}

#[test]
fn registry_reports_one_episode() {
    let bounds = Aabb::new(Vec2::splat(-50.0), Vec2::splat(50.0));
    let mut reg = CollisionRegistry::new(HashConfig::covering(bounds, 8.0)).unwrap();
    let a = reg.add(Collider::new(Primitive::circle(Vec2::new(-8.5, 0.0), 3.0)).with_velocity(Vec2::new(2.0, 0.0)));
    let b = reg.add(Collider::new(Primitive::circle(Vec2::new(8.5, 0.0), 3.0)).with_velocity(Vec2::new(-2.0, 0.0)));

    // Approach, hold still for two ticks, then back off.
    let schedule = [1.0, 1.0, 1.0, 0.0, 0.0, -1.0, -1.0, -1.0];
    let mut phases = Vec::new();
    for dt in schedule {
        reg.tick();
        phases.extend(
            reg.drain_events()
                .into_iter()
                .filter(|e| e.this == a && e.other == b)
                .map(|e| e.phase),
        );
        for id in [a, b] {
            reg.get_mut(id).unwrap().integrate(dt);
        }
    }

    assert_eq!(
        phases,
        vec![
            CollisionPhase::Started,
            CollisionPhase::Ongoing,
            CollisionPhase::Ongoing,
            CollisionPhase::Ended,
        ]
    );
}
