//! Rapidly exploring random tree.
//!
//! The tree grows from the start by connecting random free samples to their
//! nearest tree node. Every `test_goal_after_number_of_nodes` nodes the goal
//! is tried as a direct connection from its nearest tree node.
//!
//! The outcome depends on the sampler; seed it for reproducible plans.

use tracing::{debug, trace, warn};

use crate::{
    config::{self, ConfigMap},
    validate::check_start_goal,
    CollisionChecker, Configuration, FreeSampler, KdTree, NodeIndex, Path, Plan, PlanError,
    Result, SearchGraph,
};

/// How a sample is connected to its nearest tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Extension {
    /// Connect the sample itself
    #[default]
    Simple,
    /// Connect the point halfway between the nearest node and the sample
    StepLimited,
}

impl Extension {
    /// `"step"` selects [`Extension::StepLimited`], anything else
    /// [`Extension::Simple`]
    pub fn from_name(name: &str) -> Self {
        if name == "step" {
            Self::StepLimited
        } else {
            Self::Simple
        }
    }

    /// Returns the point to connect to the tree
    fn extend(&self, from: &[f32], sample: Configuration) -> Configuration {
        match self {
            Self::Simple => sample,
            Self::StepLimited => from
                .iter()
                .zip(&sample)
                .map(|(a, b)| a + 0.5 * (b - a))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RrtConfig {
    /// Tree size, including the root, after which planning gives up
    pub number_of_generated_nodes: usize,
    /// Cadence of goal connection attempts, in tree nodes
    pub test_goal_after_number_of_nodes: usize,
    pub extension: Extension,
    /// Cap on random draws, defaults to a hundred per node
    pub max_samples: Option<usize>,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            number_of_generated_nodes: 500,
            test_goal_after_number_of_nodes: 10,
            extension: Extension::Simple,
            max_samples: None,
        }
    }
}

impl RrtConfig {
    pub fn new(number_of_generated_nodes: usize, test_goal_after_number_of_nodes: usize) -> Self {
        Self {
            number_of_generated_nodes,
            test_goal_after_number_of_nodes,
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
            .unwrap_or_else(|| self.number_of_generated_nodes.saturating_mul(100))
    }

    /// Reads `numberOfGeneratedNodes` and `testGoalAfterNumberOfNodes`, and
    /// optionally `extension` and `maxSamples`.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        let required = |key: &str| -> Result<usize> {
            config::require(map, key)?;
            config::count(map, key)?
                .ok_or_else(|| PlanError::Configuration(format!("missing option `{key}`")))
        };

        let config = Self {
            number_of_generated_nodes: required("numberOfGeneratedNodes")?,
            test_goal_after_number_of_nodes: required("testGoalAfterNumberOfNodes")?,
            extension: config::text(map, "extension")?
                .map(Extension::from_name)
                .unwrap_or_default(),
            max_samples: config::count(map, "maxSamples")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_generated_nodes == 0 {
            return Err(PlanError::Configuration(
                "number_of_generated_nodes must be positive".into(),
            ));
        }

        if self.test_goal_after_number_of_nodes == 0 {
            return Err(PlanError::Configuration(
                "test_goal_after_number_of_nodes must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Tree planner over continuous configurations
pub struct Rrt<C, S> {
    checker: C,
    sampler: S,
}

impl<C: CollisionChecker, S: FreeSampler> Rrt<C, S> {
    pub fn new(checker: C, sampler: S) -> Self {
        Self { checker, sampler }
    }

    /// Get a reference to the planner's collision checker.
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Get a mutable reference to the planner's sampler.
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Plans from the first free start to the first free goal.
    pub fn plan_path(
        &mut self,
        starts: &[Configuration],
        goals: &[Configuration],
        config: &RrtConfig,
    ) -> Result<Plan<Configuration>> {
        config.validate()?;

        let (starts, goals) = check_start_goal(&self.checker, starts, goals)?;
        let start = starts[0].clone();
        let goal = goals[0].clone();

        debug!(?start, ?goal, ?config, "planning rrt");

        let result = Growth::new(&self.checker, &mut self.sampler, config, goal).run(start);
        match &result {
            Ok(plan) => debug!(
                samples = plan.iterations,
                nodes = plan.graph.len(),
                len = plan.path.len(),
                "found path"
            ),
            Err(err) => debug!(%err, "rrt failed"),
        }

        result
    }

    /// Like [`Self::plan_path`], but reports every failure as None.
    pub fn find_path(
        &mut self,
        starts: &[Configuration],
        goals: &[Configuration],
        config: &RrtConfig,
    ) -> Option<Path<Configuration>> {
        match self.plan_path(starts, goals, config) {
            Ok(plan) => Some(plan.path),
            Err(err) => {
                warn!(%err, "planning failed");
                None
            }
        }
    }

    /// Plans with options read from an untyped [`ConfigMap`]
    pub fn find_path_with(
        &mut self,
        starts: &[Configuration],
        goals: &[Configuration],
        config: &ConfigMap,
    ) -> Option<Path<Configuration>> {
        match RrtConfig::from_map(config) {
            Ok(config) => self.find_path(starts, goals, &config),
            Err(err) => {
                warn!(%err, "planning failed");
                None
            }
        }
    }
}

/// State of a single planning query
struct Growth<'a, C, S> {
    checker: &'a C,
    sampler: &'a mut S,
    config: &'a RrtConfig,
    goal: Configuration,

    graph: SearchGraph<Configuration>,
    index: KdTree<NodeIndex>,
    samples: usize,
}

impl<'a, C: CollisionChecker, S: FreeSampler> Growth<'a, C, S> {
    fn new(checker: &'a C, sampler: &'a mut S, config: &'a RrtConfig, goal: Configuration) -> Self {
        Self {
            checker,
            sampler,
            config,
            index: KdTree::new(goal.len()),
            goal,
            graph: SearchGraph::new(),
            samples: 0,
        }
    }

    fn nearest(&self, query: &[f32]) -> Result<(NodeIndex, Configuration)> {
        let nearest = self.index.nearest(query).ok_or_else(|| {
            PlanError::InternalInconsistency("nearest neighbour query returned nothing".into())
        })?;

        let node = self.graph.node(nearest.value).ok_or_else(|| {
            PlanError::InternalInconsistency("spatial index refers to a missing node".into())
        })?;

        Ok((nearest.value, node.pos().clone()))
    }

    fn insert(&mut self, parent: NodeIndex, pos: Configuration) -> Result<()> {
        let child = self.graph.add_child(parent, pos.clone())?;
        self.index.insert(pos, child)?;

        if self.index.is_unbalanced() {
            self.index.rebuild();
        }

        Ok(())
    }

    /// Connects the goal if it is directly visible from its nearest node
    fn try_goal(&mut self) -> Result<Option<NodeIndex>> {
        let (nearest, from) = self.nearest(&self.goal)?;
        if self.checker.line_in_collision(&from, &self.goal) {
            return Ok(None);
        }

        let goal = self.graph.add_child(nearest, self.goal.clone())?;
        Ok(Some(goal))
    }

    fn run(mut self, start: Configuration) -> Result<Plan<Configuration>> {
        let root = self.graph.add_root(start.clone());
        self.index.insert(start, root)?;

        let mut last_goal_test = None;

        loop {
            let nodes = self.graph.len();

            // The tree only changes when a node is added
            if nodes % self.config.test_goal_after_number_of_nodes == 0
                && last_goal_test != Some(nodes)
            {
                last_goal_test = Some(nodes);
                if let Some(goal) = self.try_goal()? {
                    let path = self.graph.path_to(goal)?;
                    return Ok(Plan {
                        path,
                        graph: self.graph,
                        iterations: self.samples,
                    });
                }
            }

            if nodes >= self.config.number_of_generated_nodes
                || self.samples >= self.config.max_samples()
            {
                return Err(PlanError::SearchExhausted {
                    iterations: self.samples,
                });
            }

            self.samples += 1;
            let sample = self
                .sampler
                .sample_free(self.checker)
                .ok_or_else(|| PlanError::SamplerExhausted {
                    attempts: self.sampler.max_attempts(),
                })?;

            let (nearest, from) = self.nearest(&sample)?;
            let pos = self.config.extension.extend(&from, sample);

            if self.checker.line_in_collision(&from, &pos) {
                trace!(?pos, "discarding sample");
                continue;
            }

            trace!(?pos, "extending tree");
            self.insert(nearest, pos)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use glam::Vec2;
    use smallvec::smallvec;

    use crate::{config::config_map, ConfigValue, Limit, Shape, UniformSampler, World};

    use super::*;

    /// Replays a fixed list of samples
    struct Scripted(VecDeque<Configuration>);

    impl FreeSampler for Scripted {
        fn sample_free<C: CollisionChecker + ?Sized>(&mut self, _: &C) -> Option<Configuration> {
            self.0.pop_front()
        }

        fn max_attempts(&self) -> usize {
            1
        }
    }

    fn open_world() -> World {
        World::new([Limit::new(0.0, 10.0), Limit::new(0.0, 10.0)], vec![])
    }

    /// Wall at x = 5 leaving a gap at the top
    fn wall_world() -> World {
        World::new(
            [Limit::new(0.0, 10.0), Limit::new(0.0, 10.0)],
            vec![Shape::rect(Vec2::new(1.0, 8.0), Vec2::new(5.0, 3.0))],
        )
    }

    fn check_plan(plan: &Plan<Configuration>, world: &World) {
        let graph = &plan.graph;

        // A single tree
        assert_eq!(graph.roots().count(), 1);
        assert_eq!(graph.edges().len(), graph.len() - 1);

        for (parent, child) in graph.edges().iter() {
            let a = graph.node(parent).unwrap().pos();
            let b = graph.node(child).unwrap().pos();
            assert!(!world.line_in_collision(a, b), "{:?} -> {:?}", a, b);
        }

        // The path walks tree edges from the root
        let path = &plan.path;
        for pair in path.windows(2) {
            assert!(!world.line_in_collision(&pair[0], &pair[1]));
            assert!(graph.iter().any(|(index, node)| node.pos() == &pair[1]
                && graph
                    .parent(index)
                    .unwrap()
                    .map_or(false, |parent| graph.node(parent).unwrap().pos() == &pair[0])));
        }
    }

    #[test]
    fn direct_connection() {
        let world = open_world();
        let mut rrt = Rrt::new(&world, UniformSampler::seeded(0));

        let start: Configuration = smallvec![1.0, 1.0];
        let goal: Configuration = smallvec![8.0, 9.0];

        let plan = rrt
            .plan_path(&[start.clone()], &[goal.clone()], &RrtConfig::new(1, 1))
            .expect("Failed to find a path");

        assert_eq!(plan.path.points(), &[start, goal]);
        assert_eq!(plan.iterations, 0);
        check_plan(&plan, &world);
    }

    #[test]
    fn around_wall() {
        let world = wall_world();
        let start: Configuration = smallvec![1.0, 1.0];
        let goal: Configuration = smallvec![9.0, 1.0];

        for (seed, extension) in [
            (1, Extension::Simple),
            (2, Extension::Simple),
            (1, Extension::StepLimited),
            (2, Extension::StepLimited),
        ] {
            let mut rrt = Rrt::new(&world, UniformSampler::seeded(seed));
            let config = RrtConfig::new(500, 10).with_extension(extension);

            let plan = rrt
                .plan_path(&[start.clone()], &[goal.clone()], &config)
                .expect("Failed to find a path");

            dbg!(plan.path.len(), plan.graph.len());

            assert_eq!(plan.path.start(), Some(&start));
            assert_eq!(plan.path.goal(), Some(&goal));
            assert!(plan.path.length() > 8.0);
            check_plan(&plan, &world);
        }
    }

    #[test]
    fn separated_regions_exhaust() {
        // Wall spanning the whole height
        let world = World::new(
            [Limit::new(0.0, 10.0), Limit::new(0.0, 10.0)],
            vec![Shape::rect(Vec2::new(1.0, 12.0), Vec2::new(5.0, 5.0))],
        );
        let mut rrt = Rrt::new(&world, UniformSampler::seeded(5));

        let start: Configuration = smallvec![1.0, 1.0];
        let goal: Configuration = smallvec![9.0, 9.0];
        let config = RrtConfig::new(50, 5);

        assert!(matches!(
            rrt.plan_path(&[start.clone()], &[goal.clone()], &config),
            Err(PlanError::SearchExhausted { .. })
        ));
        assert_eq!(rrt.find_path(&[start], &[goal], &config), None);
    }

    #[test]
    fn max_samples_bounds_rejections() {
        let world = wall_world();
        // Every sample lies behind the wall
        let samples = (0..10).map(|i| smallvec![9.0, i as f32 * 0.5]).collect();
        let mut rrt = Rrt::new(&world, Scripted(samples));

        let config = RrtConfig::new(100, 50).with_max_samples(10);
        let err = rrt
            .plan_path(&[smallvec![1.0, 1.0]], &[smallvec![9.0, 1.0]], &config)
            .unwrap_err();

        assert_eq!(err, PlanError::SearchExhausted { iterations: 10 });
    }

    #[test]
    fn step_limited_connects_midpoint() {
        let world = wall_world();
        let samples = [smallvec![3.0, 1.0], smallvec![3.0, 9.0]].into_iter().collect();
        let mut rrt = Rrt::new(&world, Scripted(samples));

        let config = RrtConfig::new(3, 10).with_extension(Extension::StepLimited);
        let err = rrt
            .plan_path(&[smallvec![1.0, 1.0]], &[smallvec![9.0, 1.0]], &config)
            .unwrap_err();
        assert_eq!(err, PlanError::SearchExhausted { iterations: 2 });

        // Rerun with the goal test enabled to inspect the tree
        let samples = [smallvec![3.0, 1.0], smallvec![3.0, 9.0], smallvec![2.0, 9.5]]
            .into_iter()
            .collect();
        *rrt.sampler_mut() = Scripted(samples);

        let config = RrtConfig::new(10, 4).with_extension(Extension::StepLimited);
        let plan = rrt
            .plan_path(&[smallvec![1.0, 1.0]], &[smallvec![9.0, 9.5]], &config)
            .unwrap();

        // (1, 1) -> (2, 1) -> (2.5, 5) -> (2.25, 7.25), then the goal is visible
        let expected: Vec<Configuration> = vec![
            smallvec![1.0, 1.0],
            smallvec![2.0, 1.0],
            smallvec![2.5, 5.0],
            smallvec![2.25, 7.25],
            smallvec![9.0, 9.5],
        ];
        assert_eq!(plan.path.points(), &expected[..]);
        check_plan(&plan, &world);
    }

    #[test]
    fn sampler_failures() {
        let world = wall_world();
        let start: Configuration = smallvec![1.0, 1.0];
        let goal: Configuration = smallvec![9.0, 1.0];
        let config = RrtConfig::new(10, 5);

        let mut rrt = Rrt::new(&world, Scripted(VecDeque::new()));
        assert_eq!(
            rrt.plan_path(&[start.clone()], &[goal.clone()], &config)
                .unwrap_err(),
            PlanError::SamplerExhausted { attempts: 1 }
        );

        // A sample of the wrong dimension has no nearest neighbour
        let mut rrt = Rrt::new(&world, Scripted([smallvec![1.0]].into_iter().collect()));
        assert!(matches!(
            rrt.plan_path(&[start], &[goal], &config),
            Err(PlanError::InternalInconsistency(_))
        ));
    }

    #[test]
    fn from_map() {
        let map = config_map([
            ("numberOfGeneratedNodes", ConfigValue::from(300i64)),
            ("testGoalAfterNumberOfNodes", 7i64.into()),
        ]);
        assert_eq!(RrtConfig::from_map(&map), Ok(RrtConfig::new(300, 7)));

        let map = config_map([
            ("numberOfGeneratedNodes", ConfigValue::from(300i64)),
            ("testGoalAfterNumberOfNodes", 7i64.into()),
            ("extension", "step".into()),
            ("maxSamples", 1000i64.into()),
        ]);
        let config = RrtConfig::from_map(&map).unwrap();
        assert_eq!(config.extension, Extension::StepLimited);
        assert_eq!(config.max_samples(), 1000);

        for map in [
            config_map([("numberOfGeneratedNodes", ConfigValue::from(300i64))]),
            config_map([
                ("numberOfGeneratedNodes", ConfigValue::from(300i64)),
                ("testGoalAfterNumberOfNodes", 0i64.into()),
            ]),
            config_map([
                ("numberOfGeneratedNodes", ConfigValue::from(2.5)),
                ("testGoalAfterNumberOfNodes", 1i64.into()),
            ]),
        ] {
            assert!(matches!(
                RrtConfig::from_map(&map),
                Err(PlanError::Configuration(_))
            ));
        }

        let world = open_world();
        let mut rrt = Rrt::new(&world, UniformSampler::seeded(3));
        let map = config_map([
            ("numberOfGeneratedNodes", ConfigValue::from(1i64)),
            ("testGoalAfterNumberOfNodes", 1i64.into()),
        ]);
        let path = rrt
            .find_path_with(&[smallvec![0.0, 0.0]], &[smallvec![5.0, 5.0]], &map)
            .unwrap();
        assert_eq!(path.len(), 2);
    }
}
