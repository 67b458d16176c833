use loose_quadtree::collision_detection::rectangle_rectangle;
use loose_quadtree::shapes::{Circle, OrientedRect, Rectangle, Shape, ShapeEnum};
use loose_quadtree::{BufferPool, Config, QuadTree, QuadtreeError, Yield};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_4;

fn tree(width: f32, height: f32, capacity: usize) -> QuadTree {
    QuadTree::new(Rectangle::new(0.0, 0.0, width, height), capacity).unwrap()
}

fn sorted(result: &Yield) -> Vec<u32> {
    let mut ids = result.to_vec();
    ids.sort_unstable();
    ids
}

#[test]
fn test_single_collision() {
    let mut qt = tree(100.0, 100.0, 4);
    qt.relocate(0, Rectangle::new(0.0, 15.0, 100.0, 50.0));
    qt.update();
    let result = qt.query_rect(Rectangle::new(0.0, 0.0, 20.0, 20.0));
    assert_eq!(result.as_slice(), &[0]);
}

#[test]
fn test_insert_query_delete() {
    let config = Config {
        max_depth: 4,
        ..Config::default()
    };
    let mut qt =
        QuadTree::new_with_config(Rectangle::new(0.0, 0.0, 100.0, 100.0), 16, config).unwrap();
    qt.relocate_raw(0, 10.0, 10.0, 5.0, 5.0);
    qt.update();
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 20.0, 20.0).as_slice(), &[0]);

    qt.delete(0);
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 20.0, 20.0).count(), 0);
    assert!(qt.is_empty());
}

#[test]
fn test_adjacent_quadrants_stay_apart() {
    let mut qt = tree(100.0, 100.0, 64);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 5.0, 5.0));
    qt.relocate(1, Rectangle::new(60.0, 10.0, 5.0, 5.0));
    qt.update();
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 50.0, 50.0).as_slice(), &[0]);

    // Crowd the south-east quadrant so the tree splits.
    for id in 2..40 {
        let offset = (id - 2) as f32;
        qt.relocate(id, Rectangle::new(55.0 + offset, 55.0 + offset, 2.0, 2.0));
    }
    qt.update();
    assert!(qt.node_count() > 1);
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 50.0, 50.0).as_slice(), &[0]);
    assert_eq!(qt.query_rect_raw(50.0, 0.0, 50.0, 50.0).as_slice(), &[1]);
}

#[test]
fn test_huge_bounds() {
    let bounds = Rectangle::new(-1000000.0, -1000000.0, 2000000.0, 2000000.0);
    let mut qt = QuadTree::new(bounds, 2).unwrap();
    qt.relocate(0, Rectangle::new(16000.0, -355.0, 60.0, 60.0));
    qt.relocate(1, Rectangle::new(15980.0, -350.0, 60.0, 60.0));
    qt.update();
    let result = qt.query_rect(Rectangle::new(15980.0, -350.0, 60.0, 60.0));
    assert_eq!(sorted(&result), vec![0, 1]);
}

#[test]
fn test_no_collision() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 20.0, 20.0));
    qt.relocate(1, Rectangle::new(50.0, 50.0, 20.0, 20.0));
    qt.update();
    assert!(qt.query_rect_raw(80.0, 80.0, 10.0, 10.0).is_empty());
}

#[test]
fn test_multiple_collisions() {
    let mut qt = tree(100.0, 100.0, 3);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 20.0, 20.0));
    qt.relocate(1, Rectangle::new(20.0, 20.0, 30.0, 30.0));
    qt.relocate(2, Rectangle::new(15.0, 15.0, 15.0, 15.0));
    qt.update();
    let result = qt.query_rect_raw(15.0, 15.0, 20.0, 20.0);
    assert_eq!(sorted(&result), vec![0, 1, 2]);
}

#[test]
fn test_shared_edge_is_not_a_collision() {
    let mut qt = tree(100.0, 100.0, 1);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 10.0, 10.0));
    qt.update();
    assert!(qt.query_rect_raw(20.0, 10.0, 10.0, 10.0).is_empty());
    assert!(qt.query_rect_raw(10.0, 0.0, 10.0, 10.0).is_empty());
    assert_eq!(qt.query_rect_raw(19.5, 10.0, 10.0, 10.0).as_slice(), &[0]);
}

#[test]
fn test_object_relocation() {
    let mut qt = tree(100.0, 100.0, 1);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 10.0, 10.0));
    qt.update();
    qt.relocate(0, Rectangle::new(60.0, 60.0, 10.0, 10.0));
    qt.update();
    assert_eq!(qt.query_rect_raw(60.0, 60.0, 10.0, 10.0).as_slice(), &[0]);
    assert!(qt.query_rect_raw(10.0, 10.0, 10.0, 10.0).is_empty());
    assert_eq!(qt.len(), 1);
}

#[test]
fn test_relocate_stores_exact_bounds() {
    let mut qt = tree(100.0, 100.0, 4);
    let first = Rectangle::new(10.25, 10.5, 3.0, 4.0);
    qt.relocate(3, first);
    assert_eq!(qt.get(3), Some(first));
    assert_eq!(qt[3], first);

    // Same leaf, bounds overwritten in place.
    let second = Rectangle::new(11.0, 12.0, 1.0, 1.0);
    qt.relocate(3, second);
    assert_eq!(qt.get(3), Some(second));
    assert_eq!(qt.len(), 1);
}

#[test]
fn test_contains_and_get() {
    let mut qt = tree(100.0, 100.0, 4);
    assert!(!qt.contains(0));
    assert!(!qt.contains(100));
    assert_eq!(qt.get(100), None);

    qt.relocate(1, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    assert!(qt.contains(1));
    qt.delete(1);
    assert!(!qt.contains(1));
    assert_eq!(qt.get(1), None);
}

#[test]
fn test_delete_untracked_is_ignored() {
    let mut qt = tree(100.0, 100.0, 4);
    qt.relocate(0, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    qt.delete(2);
    qt.delete(40);
    qt.delete(0);
    qt.delete(0);
    assert_eq!(qt.len(), 0);
    assert!(qt.all().is_empty());
}

#[test]
fn test_delete_with_hint() {
    let mut qt = tree(100.0, 100.0, 32);
    for id in 0..32 {
        let offset = id as f32 * 3.0;
        qt.relocate(id, Rectangle::new(offset, offset, 2.0, 2.0));
    }
    qt.update();

    let hint = qt.locate(5).unwrap();
    qt.delete_with_hint(5, hint);
    assert!(!qt.contains(5));

    // Hint pointing at an unrelated leaf.
    let wrong_hint = qt.locate(31).unwrap();
    qt.delete_with_hint(0, wrong_hint);
    assert!(!qt.contains(0));

    qt.delete_with_hint(1, u32::MAX);
    assert!(!qt.contains(1));

    assert_eq!(qt.len(), 29);
    qt.update();
    let result = qt.query_rect_raw(0.0, 0.0, 100.0, 100.0);
    assert_eq!(sorted(&result), (2..32).filter(|&id| id != 5).collect::<Vec<_>>());
}

#[test]
fn test_world_grows_on_update() {
    let mut qt = tree(100.0, 100.0, 8);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 4.0, 4.0));
    qt.relocate(1, Rectangle::new(80.0, 20.0, 4.0, 4.0));
    qt.update();

    let far = Rectangle::new(500.0, 500.0, 10.0, 10.0);
    qt.relocate(2, far);
    assert_eq!(qt.bounds(), Rectangle::new(0.0, 0.0, 100.0, 100.0));

    qt.update();
    assert_eq!(qt.bounds(), Rectangle::new(0.0, 0.0, 505.0, 505.0));
    assert_eq!(qt.get(0), Some(Rectangle::new(10.0, 10.0, 4.0, 4.0)));
    assert_eq!(qt.get(1), Some(Rectangle::new(80.0, 20.0, 4.0, 4.0)));
    assert_eq!(qt.get(2), Some(far));
    assert_eq!(qt.len(), 3);
    assert_eq!(qt.query_rect(far).as_slice(), &[2]);
    assert_eq!(sorted(&qt.query_rect_raw(0.0, 0.0, 100.0, 100.0)), vec![0, 1]);

    // Nothing new outside: the bounds stay put.
    qt.relocate(0, Rectangle::new(20.0, 20.0, 4.0, 4.0));
    qt.update();
    assert_eq!(qt.bounds(), Rectangle::new(0.0, 0.0, 505.0, 505.0));
}

#[test]
fn test_world_grows_towards_negative() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(50.0, 50.0, 2.0, 2.0));
    qt.relocate(1, Rectangle::new(-201.0, -101.0, 2.0, 2.0));
    qt.update();
    assert_eq!(qt.bounds(), Rectangle::new(-200.0, -100.0, 300.0, 200.0));
    assert_eq!(qt.query_rect_raw(-300.0, -300.0, 200.0, 400.0).as_slice(), &[1]);
}

#[test]
fn test_capacity_shrink_removes_ids() {
    let mut qt = tree(100.0, 100.0, 10);
    for id in 0..10 {
        qt.relocate(id, Rectangle::new(id as f32 * 10.0, 5.0, 5.0, 5.0));
    }
    qt.update();

    qt.set_capacity(5);
    assert_eq!(qt.capacity(), 5);
    assert_eq!(qt.len(), 5);
    assert!(!qt.contains(7));
    assert_eq!(qt.all().as_slice(), &[0, 1, 2, 3, 4]);
    qt.update();
    assert_eq!(sorted(&qt.query_rect_raw(0.0, 0.0, 100.0, 100.0)), vec![0, 1, 2, 3, 4]);

    qt.set_capacity(8);
    assert_eq!(qt.capacity(), 8);
    assert!(!qt.contains(7));
    qt.relocate(7, Rectangle::new(70.0, 70.0, 5.0, 5.0));
    assert!(qt.contains(7));
}

#[test]
#[should_panic]
fn test_relocate_out_of_range_panics() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(2, Rectangle::new(1.0, 1.0, 1.0, 1.0));
}

#[test]
fn test_clear() {
    let mut qt = tree(100.0, 100.0, 64);
    for id in 0..64 {
        qt.relocate(id, Rectangle::new((id % 8) as f32 * 12.0, (id / 8) as f32 * 12.0, 2.0, 2.0));
    }
    qt.update();
    assert!(qt.node_count() > 1);

    qt.clear();
    assert!(qt.is_empty());
    assert_eq!(qt.node_count(), 1);
    assert!(qt.all().is_empty());
    assert!(qt.query_rect_raw(0.0, 0.0, 100.0, 100.0).is_empty());

    qt.relocate(3, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    qt.update();
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 100.0, 100.0).as_slice(), &[3]);
}

#[test]
fn test_subdivision_threshold() {
    let mut qt = tree(100.0, 100.0, 8);
    for id in 0..7 {
        qt.relocate(id, Rectangle::new(id as f32 * 12.0, 10.0, 2.0, 2.0));
    }
    qt.update();
    assert_eq!(qt.node_count(), 1);

    qt.relocate(7, Rectangle::new(90.0, 90.0, 2.0, 2.0));
    qt.update();
    assert_eq!(qt.node_count(), 5);
    assert_eq!(qt.all().count(), 8);
}

#[test]
fn test_max_depth_stops_subdivision() {
    let config = Config {
        max_depth: 3,
        ..Config::default()
    };
    let mut qt =
        QuadTree::new_with_config(Rectangle::new(0.0, 0.0, 100.0, 100.0), 20, config).unwrap();
    for id in 0..20 {
        qt.relocate(id, Rectangle::new(30.0, 30.0, 1.0, 1.0));
    }
    qt.update();
    assert_eq!(qt.node_count(), 13);
    assert_eq!(qt.query_rect_raw(29.0, 29.0, 3.0, 3.0).count(), 20);

    qt.update();
    assert_eq!(qt.node_count(), 13);
}

#[test]
fn test_all_node_bounding_boxes() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 5.0, 5.0));
    qt.relocate(1, Rectangle::new(30.0, 40.0, 5.0, 10.0));
    qt.update();

    let mut bounding_boxes = Vec::new();
    qt.all_node_bounding_boxes(&mut bounding_boxes);
    assert_eq!(bounding_boxes, vec![Rectangle::new(10.0, 10.0, 25.0, 40.0)]);
}

#[test]
fn test_circle_query() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 10.0, 10.0));
    qt.relocate(1, Rectangle::new(70.0, 70.0, 10.0, 10.0));
    qt.update();

    // Diagonal from the corner (20, 20) is about 7.07.
    assert!(qt.query_circle_raw(25.0, 25.0, 4.0).is_empty());
    assert_eq!(qt.query_circle_raw(25.0, 25.0, 8.0).as_slice(), &[0]);
    assert_eq!(qt.query_circle(Circle::new(15.0, 30.0, 10.0)).as_slice(), &[0]);
    assert_eq!(
        sorted(&qt.query_circle(Circle::new(50.0, 50.0, 45.0))),
        vec![0, 1]
    );
}

#[test]
fn test_oriented_query() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(0.0, 0.0, 10.0, 10.0));
    qt.relocate(1, Rectangle::new(40.0, 40.0, 10.0, 10.0));
    qt.update();

    // A diamond whose bounding box overlaps item 0 but whose body does not.
    let diamond = OrientedRect::centered(&Rectangle::new(9.0, 9.0, 10.0, 10.0), FRAC_PI_4);
    assert!(qt.query_oriented(diamond).is_empty());
    assert_eq!(qt.query_rect(diamond.bounding_box()).as_slice(), &[0]);

    let small = qt.query_oriented_raw(45.0, 45.0, 4.0, 4.0, FRAC_PI_4, 2.0, 2.0);
    assert_eq!(small.as_slice(), &[1]);

    let covering = qt.query_oriented_raw(0.0, 0.0, 200.0, 200.0, 0.0, 50.0, 50.0);
    assert_eq!(sorted(&covering), vec![0, 1]);
}

#[test]
fn test_oriented_query_counts_touching_edges() {
    let mut qt = tree(100.0, 100.0, 1);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 10.0, 10.0));
    qt.update();
    let touching = OrientedRect::new(20.0, 10.0, 10.0, 10.0, 0.0, 0.0, 0.0);
    assert_eq!(qt.query_oriented(touching).as_slice(), &[0]);
    assert!(qt.query_rect_raw(20.0, 10.0, 10.0, 10.0).is_empty());
}

#[test]
fn test_raycast() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(50.0, 48.0, 4.0, 4.0));
    qt.relocate(1, Rectangle::new(50.0, 10.0, 4.0, 4.0));
    qt.update();

    assert_eq!(qt.raycast(0.0, 50.0, 1.0, 0.0, 1.0).as_slice(), &[0]);
    assert_eq!(qt.raycast_angle(0.0, 50.0, 0.0, 1.0).as_slice(), &[0]);
    assert_eq!(sorted(&qt.raycast(52.0, 90.0, 0.0, -1.0, 1.0)), vec![0, 1]);
    assert!(qt.raycast(80.0, 50.0, 1.0, 0.0, 1.0).is_empty());
}

#[test]
fn test_linecast() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(4.5, 14.5, 1.0, 1.0));
    qt.relocate(1, Rectangle::new(8.0, 9.0, 1.0, 2.0));
    qt.update();
    assert_eq!(qt.linecast(0.0, 10.0, 10.0, 10.0, 2.0).as_slice(), &[0]);
}

#[test]
fn test_query_shape() {
    let mut qt = tree(100.0, 100.0, 2);
    qt.relocate(0, Rectangle::new(10.0, 10.0, 10.0, 10.0));
    qt.relocate(1, Rectangle::new(70.0, 70.0, 10.0, 10.0));
    qt.update();

    let rect = ShapeEnum::Rectangle(Rectangle::new(0.0, 0.0, 15.0, 15.0));
    let circle = ShapeEnum::Circle(Circle::new(75.0, 75.0, 1.0));
    assert_eq!(qt.query_shape(&rect).as_slice(), &[0]);
    assert_eq!(qt.query_shape(&circle).as_slice(), &[1]);
}

#[test]
fn test_visitors_match_yields() {
    let mut rng = StdRng::seed_from_u64(11);
    let world = Rectangle::new(0.0, 0.0, 200.0, 200.0);
    let mut qt = QuadTree::new(world, 300).unwrap();
    for id in 0..300 {
        qt.relocate(id, world.random_rect_inside(10.0, 10.0, &mut rng));
    }
    qt.update();

    let area = Rectangle::new(40.0, 40.0, 80.0, 60.0);
    let mut visited = Vec::new();
    qt.query_rect_with(area, |id| visited.push(id));
    assert_eq!(visited.as_slice(), qt.query_rect(area).as_slice());

    let mut visited = Vec::new();
    qt.query_circle_raw_with(100.0, 100.0, 30.0, |id| visited.push(id));
    assert_eq!(visited.as_slice(), qt.query_circle_raw(100.0, 100.0, 30.0).as_slice());

    let mut visited = Vec::new();
    qt.raycast_with(0.0, 0.0, 1.0, 1.0, 2.0, |id| visited.push(id));
    assert_eq!(visited.as_slice(), qt.raycast(0.0, 0.0, 1.0, 1.0, 2.0).as_slice());

    let mut count = 0;
    qt.all_with(|_| count += 1);
    assert_eq!(count, 300);
    assert_eq!(qt.all().as_slice(), (0..300).collect::<Vec<_>>().as_slice());
}

#[test]
fn test_pool_reuses_buffers() {
    let pool = BufferPool::new(8, 4);
    let mut qt = QuadTree::new_with_pool(
        Rectangle::new(0.0, 0.0, 100.0, 100.0),
        8,
        Config::default(),
        pool.clone(),
    )
    .unwrap();
    qt.relocate(0, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    qt.update();

    for _ in 0..10 {
        let result = qt.query_rect_raw(0.0, 0.0, 10.0, 10.0);
        assert_eq!(result.as_slice(), &[0]);
    }
    assert_eq!(pool.allocations(), 1);
    assert_eq!(pool.pooled(), 1);

    let first = qt.all();
    let second = qt.all();
    assert_eq!(pool.pooled(), 0);
    drop(first);
    drop(second);
    assert_eq!(pool.allocations(), 2);
    assert_eq!(pool.pooled(), 2);
}

#[test]
fn test_pool_retains_at_most_max_pooled() {
    let pool = BufferPool::new(4, 2);
    let held: Vec<Yield> = (0..5).map(|_| pool.rent()).collect();
    assert_eq!(pool.allocations(), 5);
    drop(held);
    assert_eq!(pool.pooled(), 2);
}

#[test]
fn test_leaked_yields_starve_pool_only() {
    let pool = BufferPool::new(8, 4);
    let mut qt = QuadTree::new_with_pool(
        Rectangle::new(0.0, 0.0, 100.0, 100.0),
        8,
        Config::default(),
        pool.clone(),
    )
    .unwrap();
    qt.relocate(0, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    qt.update();

    for _ in 0..3 {
        std::mem::forget(qt.query_rect_raw(0.0, 0.0, 10.0, 10.0));
    }
    assert_eq!(pool.allocations(), 3);
    assert_eq!(pool.pooled(), 0);
    assert_eq!(qt.query_rect_raw(0.0, 0.0, 10.0, 10.0).as_slice(), &[0]);
    assert_eq!(pool.allocations(), 4);
}

#[test]
fn test_pool_shared_between_trees() {
    let pool = BufferPool::new(8, 4);
    let bounds = Rectangle::new(0.0, 0.0, 100.0, 100.0);
    let mut a = QuadTree::new_with_pool(bounds, 8, Config::default(), pool.clone()).unwrap();
    let mut b = QuadTree::new_with_pool(bounds, 8, Config::default(), pool.clone()).unwrap();
    a.relocate(0, Rectangle::new(1.0, 1.0, 1.0, 1.0));
    b.relocate(5, Rectangle::new(1.0, 1.0, 1.0, 1.0));

    drop(a.all());
    assert_eq!(b.all().as_slice(), &[5]);
    assert_eq!(pool.allocations(), 1);
}

#[test]
fn test_invalid_construction() {
    let bounds = Rectangle::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(
        QuadTree::new(Rectangle::new(0.0, 0.0, -1.0, 10.0), 4).unwrap_err(),
        QuadtreeError::InvalidRectangleDims {
            width: -1.0,
            height: 10.0
        }
    );
    assert!(matches!(
        QuadTree::new(Rectangle::new(f32::NAN, 0.0, 1.0, 1.0), 4),
        Err(QuadtreeError::InvalidRectExtent { .. })
    ));

    let zero_capacity = Config {
        node_capacity: 0,
        ..Config::default()
    };
    assert_eq!(
        QuadTree::new_with_config(bounds, 4, zero_capacity).unwrap_err(),
        QuadtreeError::InvalidNodeCapacity { node_capacity: 0 }
    );

    let too_deep = Config {
        max_depth: 25,
        ..Config::default()
    };
    assert_eq!(
        QuadTree::new_with_config(bounds, 4, too_deep).unwrap_err(),
        QuadtreeError::InvalidMaxDepth {
            max_depth: 25,
            limit: 24
        }
    );
}

#[test]
fn test_randomized_against_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    let capacity = 256u32;
    let mut qt = tree(1000.0, 1000.0, capacity as usize);
    let mut shadow: HashMap<u32, Rectangle> = HashMap::new();

    for round in 0..200 {
        for _ in 0..25 {
            let id = rng.gen_range(0..capacity);
            if rng.gen_bool(0.2) {
                qt.delete(id);
                shadow.remove(&id);
            } else {
                // Mostly inside the world, occasionally past its edges.
                let rect = Rectangle::new(
                    rng.gen_range(-100.0..1050.0),
                    rng.gen_range(-100.0..1050.0),
                    rng.gen_range(0.0..40.0),
                    rng.gen_range(0.0..40.0),
                );
                qt.relocate(id, rect);
                shadow.insert(id, rect);
            }
        }
        qt.update();
        assert_eq!(qt.len(), shadow.len(), "round {round}");

        for _ in 0..5 {
            let area = Rectangle::new(
                rng.gen_range(-150.0..1100.0),
                rng.gen_range(-150.0..1100.0),
                rng.gen_range(0.0..300.0),
                rng.gen_range(0.0..300.0),
            );
            let mut expected: Vec<u32> = shadow
                .iter()
                .filter(|(_, rect)| rectangle_rectangle(rect, &area))
                .map(|(&id, _)| id)
                .collect();
            expected.sort_unstable();
            assert_eq!(sorted(&qt.query_rect(area)), expected, "round {round}");
        }
    }

    for id in 0..capacity {
        assert_eq!(qt.contains(id), shadow.contains_key(&id));
        assert_eq!(qt.get(id), shadow.get(&id).copied());
    }
}
