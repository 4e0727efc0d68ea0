//! Weighted informed search over unit grid moves.
//!
//! Nodes are scored with `f = w * h + (1 - w) * g`, a convex blend between a
//! greedy and a uniform cost search. Once a position has been admitted to the
//! graph it is never reopened, even if a cheaper route to it is found later,
//! so returned paths are not necessarily shortest.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::{
    config::{self, ConfigMap},
    validate::check_start_goal,
    Collision, CollisionChecker, Frontier, GridConfiguration, Heuristic, Node, NodeIndex, Path,
    Plan, PlanError, Position, Result, SearchGraph, Status,
};

pub use neighbors::*;

mod neighbors;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AStarConfig {
    /// Blend factor in `[0, 1]` between heuristic and accumulated cost
    pub w: f64,
    pub heuristic: Heuristic,
    pub neighborhood: Neighborhood,
    /// Number of nodes popped from the frontier before giving up
    pub max_iterations: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            w: 0.5,
            heuristic: Heuristic::Manhattan,
            neighborhood: Neighborhood::Axis,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl AStarConfig {
    pub fn new(w: f64, heuristic: Heuristic) -> Self {
        Self {
            w,
            heuristic,
            ..Default::default()
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reads `w` and `heuristic`, and optionally `neighborhood` and
    /// `maxIterations`.
    ///
    /// Any `heuristic` other than `"euclidean"`, including non text values,
    /// selects manhattan.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        let w = config::float(map, "w")?
            .ok_or_else(|| PlanError::Configuration("missing option `w`".into()))?;

        let heuristic = config::require(map, "heuristic")?;
        let heuristic = Heuristic::from_name(heuristic.as_str().unwrap_or_default());

        let neighborhood = config::text(map, "neighborhood")?
            .map(Neighborhood::from_name)
            .unwrap_or_default();

        let max_iterations =
            config::count(map, "maxIterations")?.unwrap_or(DEFAULT_MAX_ITERATIONS);

        let config = Self {
            w,
            heuristic,
            neighborhood,
            max_iterations,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.w) {
            return Err(PlanError::Configuration(format!(
                "w must be within [0, 1], got {}",
                self.w
            )));
        }

        if self.max_iterations == 0 {
            return Err(PlanError::Configuration(
                "max_iterations must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Grid planner taking unit steps through the configuration space.
///
/// Positions are integer configurations; bounds and collisions are checked by
/// the wrapped [`CollisionChecker`].
pub struct GridAStar<C> {
    checker: C,
}

impl<C: CollisionChecker> GridAStar<C> {
    pub fn new(checker: C) -> Self {
        Self { checker }
    }

    /// Get a reference to the planner's collision checker.
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Plans from the first free start to the first free goal.
    pub fn plan_path(
        &self,
        starts: &[GridConfiguration],
        goals: &[GridConfiguration],
        config: &AStarConfig,
    ) -> Result<Plan<GridConfiguration>> {
        config.validate()?;

        let (starts, goals) = check_start_goal(&self.checker, starts, goals)?;
        let start = starts[0].clone();
        let goal = goals[0].clone();

        debug!(?start, ?goal, ?config, "planning grid search");

        let result = Search::new(&self.checker, config, goal).run(start);
        match &result {
            Ok(plan) => debug!(
                iterations = plan.iterations,
                nodes = plan.graph.len(),
                len = plan.path.len(),
                "found path"
            ),
            Err(err) => debug!(%err, "grid search failed"),
        }

        result
    }

    /// Like [`Self::plan_path`], but reports every failure as None.
    pub fn find_path(
        &self,
        starts: &[GridConfiguration],
        goals: &[GridConfiguration],
        config: &AStarConfig,
    ) -> Option<Path<GridConfiguration>> {
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
        &self,
        starts: &[GridConfiguration],
        goals: &[GridConfiguration],
        config: &ConfigMap,
    ) -> Option<Path<GridConfiguration>> {
        match AStarConfig::from_map(config) {
            Ok(config) => self.find_path(starts, goals, &config),
            Err(err) => {
                warn!(%err, "planning failed");
                None
            }
        }
    }
}

/// State of a single planning query
struct Search<'a, C> {
    checker: &'a C,
    config: &'a AStarConfig,
    goal: GridConfiguration,

    graph: SearchGraph<GridConfiguration>,
    // Every position ever admitted, open or closed
    ids: HashMap<GridConfiguration, NodeIndex>,
    open: Frontier<NodeIndex>,
}

impl<'a, C: CollisionChecker> Search<'a, C> {
    fn new(checker: &'a C, config: &'a AStarConfig, goal: GridConfiguration) -> Self {
        Self {
            checker,
            config,
            goal,
            graph: SearchGraph::new(),
            ids: HashMap::new(),
            open: Frontier::new(),
        }
    }

    fn evaluate(&self, index: NodeIndex) -> Result<f64> {
        let node = self.node(index)?;
        let h = self.config.heuristic.evaluate(node.pos(), &self.goal);
        let w = self.config.w;
        Ok(w * h + (1.0 - w) * node.g() as f64)
    }

    fn node(&self, index: NodeIndex) -> Result<&Node<GridConfiguration>> {
        self.graph.node(index).ok_or_else(|| {
            PlanError::InternalInconsistency("frontier refers to a missing node".into())
        })
    }

    fn admit(&mut self, index: NodeIndex) -> Result<()> {
        let pos = self.node(index)?.pos().clone();
        self.ids.insert(pos, index);
        let score = self.evaluate(index)?;
        self.open.push(score, index)
    }

    fn run(mut self, start: GridConfiguration) -> Result<Plan<GridConfiguration>> {
        let root = self.graph.add_root(start);
        self.admit(root)?;

        for iteration in 0..self.config.max_iterations {
            let (score, current) = match self.open.pop() {
                Some(val) => val,
                None => {
                    return Err(PlanError::SearchExhausted {
                        iterations: iteration,
                    })
                }
            };

            if self.node(current)?.pos() == &self.goal {
                let path = self.graph.path_to(current)?;
                return Ok(Plan {
                    path,
                    graph: self.graph,
                    iterations: iteration + 1,
                });
            }

            let pos = self.node(current)?.pos().to_configuration();
            let blocked = self.checker.point_in_collision(&pos);

            if let Some(node) = self.graph.node_mut(current) {
                node.status = Status::Closed;
                node.collision = if blocked {
                    Collision::Blocked
                } else {
                    Collision::Free
                };
            }

            if blocked {
                trace!(?pos, "discarding blocked node");
                continue;
            }

            trace!(?pos, score, "expanding");
            self.expand(current)?;
        }

        Err(PlanError::SearchExhausted {
            iterations: self.config.max_iterations,
        })
    }

    fn expand(&mut self, index: NodeIndex) -> Result<()> {
        let neighbors = self.config.neighborhood.neighbors(self.node(index)?.pos());

        for pos in neighbors {
            if !self.checker.in_limits(&pos.to_configuration()) {
                continue;
            }

            // No reopening
            if self.ids.contains_key(&pos) {
                continue;
            }

            let child = self.graph.add_child(index, pos)?;
            self.admit(child)?;
        }

        Ok(())
    }
}
