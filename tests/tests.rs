use cspace_planning::*;
use glam::Vec2;
use smallvec::smallvec;

fn bounds() -> [Limit; 2] {
    [Limit::new(0.0, 10.0), Limit::new(0.0, 10.0)]
}

#[test]
fn grid_straight_line() {
    let world = World::new(bounds(), vec![]);
    let planner = GridAStar::new(&world);

    let start: GridConfiguration = smallvec![0, 0];
    let goal: GridConfiguration = smallvec![3, 0];

    let plan = planner
        .plan_path(
            &[start.clone()],
            &[goal.clone()],
            &AStarConfig::new(0.5, Heuristic::Manhattan),
        )
        .expect("Failed to find a path");

    dbg!(&plan.path);

    assert_eq!(plan.path.len(), 4);
    assert_eq!(plan.path.start(), Some(&start));
    assert_eq!(plan.path.goal(), Some(&goal));

    // g counts hops from the start
    for (i, pos) in plan.path.iter().enumerate() {
        let (_, node) = plan
            .graph
            .iter()
            .find(|(_, node)| node.pos() == pos)
            .unwrap();
        assert_eq!(node.g(), i as u32);
    }
}

#[test]
fn grid_start_in_collision() {
    let world = World::new(
        bounds(),
        vec![Shape::rect(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0))],
    );
    let planner = GridAStar::new(&world);

    let map = config_map([("w", ConfigValue::from(0.5)), ("heuristic", "manhattan".into())]);
    let path = planner.find_path_with(&[smallvec![0, 0]], &[smallvec![3, 0]], &map);

    assert_eq!(path, None);
}

#[test]
fn grid_first_free_candidate() {
    let world = World::new(
        bounds(),
        vec![Shape::rect(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0))],
    );
    let planner = GridAStar::new(&world);

    // Only the first collision free start and goal are used
    let path = planner
        .find_path(
            &[smallvec![0, 0], smallvec![0, 2], smallvec![5, 5]],
            &[smallvec![3, 2]],
            &AStarConfig::default(),
        )
        .unwrap();

    assert_eq!(path.start(), Some(&smallvec![0, 2]));
    assert_eq!(path.len(), 4);
}

#[test]
fn rrt_direct_connection() {
    let world = World::new(bounds(), vec![]);
    let mut rrt = Rrt::new(&world, UniformSampler::seeded(42));

    let start: Configuration = smallvec![0.5, 0.5];
    let goal: Configuration = smallvec![9.5, 4.0];

    let map = config_map([
        ("numberOfGeneratedNodes", ConfigValue::from(1i64)),
        ("testGoalAfterNumberOfNodes", 1i64.into()),
    ]);
    let path = rrt
        .find_path_with(&[start.clone()], &[goal.clone()], &map)
        .expect("Failed to find a path");

    assert_eq!(path.points(), &[start, goal]);
}

#[test]
fn rrt_separated_regions() {
    // Wall spanning the full height of the world
    let world = World::new(
        bounds(),
        vec![Shape::rect(Vec2::new(2.0, 20.0), Vec2::new(5.0, 5.0))],
    );

    for extension in [Extension::Simple, Extension::StepLimited] {
        let mut rrt = Rrt::new(&world, UniformSampler::seeded(7));
        let config = RrtConfig::new(100, 10).with_extension(extension);

        let path = rrt.find_path(&[smallvec![1.0, 1.0]], &[smallvec![9.0, 9.0]], &config);
        assert_eq!(path, None);

        let err = rrt
            .plan_path(&[smallvec![1.0, 1.0]], &[smallvec![9.0, 9.0]], &config)
            .unwrap_err();
        assert!(matches!(err, PlanError::SearchExhausted { .. }));
    }
}

#[test]
fn rrt_goal_in_collision() {
    let world = World::new(
        bounds(),
        vec![Shape::rect(Vec2::new(2.0, 2.0), Vec2::new(8.0, 8.0))],
    );
    let mut rrt = Rrt::new(&world, UniformSampler::seeded(0));

    let err = rrt
        .plan_path(
            &[smallvec![1.0, 1.0]],
            &[smallvec![8.0, 8.0]],
            &RrtConfig::default(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        PlanError::InvalidStartOrGoal {
            endpoint: Endpoint::Goal
        }
    );
}

#[test]
fn rrt_reaches_goal() {
    // Pillar in the middle of the world
    let world = World::new(
        bounds(),
        vec![Shape::rect(Vec2::new(3.0, 3.0), Vec2::new(5.0, 5.0))],
    );
    let mut rrt = Rrt::new(&world, UniformSampler::seeded(11));

    let plan = rrt
        .plan_path(
            &[smallvec![2.0, 2.0]],
            &[smallvec![8.0, 8.0]],
            &RrtConfig::new(1000, 5),
        )
        .expect("Failed to find a path");

    assert!(plan.graph.len() <= 1001);
    assert_eq!(plan.graph.roots().count(), 1);
    assert!(plan
        .path
        .windows(2)
        .all(|pair| !world.line_in_collision(&pair[0], &pair[1])));
    assert!(plan.path.length() >= 72f64.sqrt());
}
