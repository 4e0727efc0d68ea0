use tracing::debug;

use crate::{CollisionChecker, Endpoint, PlanError, Position, Result};

/// Filters the start and goal candidates down to the collision free ones.
///
/// Fails if a candidate has the wrong dimension or if no candidate of either
/// endpoint is free.
pub fn check_start_goal<C, P>(checker: &C, starts: &[P], goals: &[P]) -> Result<(Vec<P>, Vec<P>)>
where
    C: CollisionChecker + ?Sized,
    P: Position,
{
    let starts = free_candidates(checker, starts, Endpoint::Start)?;
    let goals = free_candidates(checker, goals, Endpoint::Goal)?;
    Ok((starts, goals))
}

fn free_candidates<C, P>(checker: &C, candidates: &[P], endpoint: Endpoint) -> Result<Vec<P>>
where
    C: CollisionChecker + ?Sized,
    P: Position,
{
    let dim = checker.dim();
    let mut free = Vec::with_capacity(candidates.len());
    for pos in candidates {
        let point = pos.to_configuration();
        if point.len() != dim {
            return Err(PlanError::Configuration(format!(
                "{endpoint} has {} dimensions, environment has {dim}",
                point.len()
            )));
        }

        if !checker.point_in_collision(&point) {
            free.push(pos.clone());
        }
    }

    if free.is_empty() {
        debug!(%endpoint, candidates = candidates.len(), "no free candidate");
        return Err(PlanError::InvalidStartOrGoal { endpoint });
    }

    Ok(free)
}
