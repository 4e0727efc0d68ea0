use std::collections::BinaryHeap;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use slotmap::*;

use crate::{Configuration, PlanError, Result};

pub use node::*;

mod node;

type Nodes<T> = SlotMap<KdIndex, KdNode<T>>;

new_key_type! {
    pub struct KdIndex;
}

/// A point found by a nearest neighbour query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<T> {
    pub index: KdIndex,
    pub value: T,
    pub distance: f32,
}

/// k-d tree over configurations, each carrying a value.
///
/// Supports incremental insertion. Insertion does not rebalance; call
/// [`KdTree::rebuild`] when [`KdTree::is_unbalanced`] reports a degenerate tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct KdTree<T> {
    nodes: Nodes<T>,
    root: Option<KdIndex>,
    dim: usize,
    depth: usize,
}

impl<T: Copy> KdTree<T> {
    /// Constructs an empty tree over `dim` dimensional points
    pub fn new(dim: usize) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            dim,
            depth: 0,
        }
    }

    /// Constructs a balanced tree.
    /// Fails if any point does not have `dim` coordinates.
    pub fn build(dim: usize, items: impl IntoIterator<Item = (Configuration, T)>) -> Result<Self> {
        let mut items = items.into_iter().collect_vec();
        if dim == 0 {
            return Err(PlanError::Configuration("k-d tree needs at least one dimension".into()));
        }
        if let Some((point, _)) = items.iter().find(|(point, _)| point.len() != dim) {
            return Err(Self::dim_error(dim, point));
        }

        let mut nodes = SlotMap::with_key();
        let root = KdNode::new(&mut nodes, &mut items, 0, dim);
        let depth = nodes.values().map(KdNode::depth).max().unwrap_or_default();

        Ok(Self {
            nodes,
            root,
            dim,
            depth,
        })
    }

    fn dim_error(dim: usize, point: &Configuration) -> PlanError {
        PlanError::Configuration(format!(
            "point has {} dimensions, k-d tree has {dim}",
            point.len()
        ))
    }

    /// Inserts a point below the leaf it falls into
    pub fn insert(&mut self, point: Configuration, value: T) -> Result<KdIndex> {
        if self.dim == 0 || point.len() != self.dim {
            return Err(Self::dim_error(self.dim, &point));
        }

        let mut index = match self.root {
            Some(val) => val,
            None => {
                let root = self.nodes.insert(KdNode::leaf(point, value, 0, self.dim));
                self.root = Some(root);
                return Ok(root);
            }
        };

        loop {
            let node = &self.nodes[index];
            let front = point[node.axis()] >= node.point()[node.axis()];
            let next = if front { node.front() } else { node.back() };

            match next {
                Some(val) => index = val,
                None => {
                    let depth = node.depth() + 1;
                    let child = self
                        .nodes
                        .insert(KdNode::leaf(point, value, depth, self.dim));

                    let node = &mut self.nodes[index];
                    if front {
                        node.front = Some(child);
                    } else {
                        node.back = Some(child);
                    }

                    self.depth = self.depth.max(depth);
                    return Ok(child);
                }
            }
        }
    }

    /// Returns true if the tree is much deeper than a balanced one would be
    pub fn is_unbalanced(&self) -> bool {
        let balanced = usize::BITS - self.nodes.len().leading_zeros();
        self.depth > 2 * balanced as usize + 8
    }

    /// Rebuilds the tree balanced. Node indices are invalidated.
    pub fn rebuild(&mut self) {
        let mut items = self
            .nodes
            .drain()
            .map(|(_, node)| (node.point().clone(), node.value()))
            .collect_vec();

        self.root = KdNode::new(&mut self.nodes, &mut items, 0, self.dim);
        self.depth = self
            .nodes
            .values()
            .map(KdNode::depth)
            .max()
            .unwrap_or_default();
    }

    /// Returns the closest point to `query`.
    /// Returns None if the tree is empty or `query` has the wrong dimension
    pub fn nearest(&self, query: &[f32]) -> Option<Neighbor<T>> {
        self.k_nearest(query, 1).into_iter().next()
    }

    /// Returns up to `k` points closest to `query`, nearest first
    pub fn k_nearest(&self, query: &[f32], k: usize) -> Vec<Neighbor<T>> {
        let root = match self.root {
            Some(root) if k > 0 && query.len() == self.dim => root,
            _ => return Vec::new(),
        };

        let mut best = BinaryHeap::with_capacity(k + 1);
        self.search(root, query, k, &mut best);

        best.into_sorted_vec()
            .into_iter()
            .map(|(distance, index)| {
                let node = &self.nodes[index];
                Neighbor {
                    index,
                    value: node.value(),
                    distance: distance.0.sqrt(),
                }
            })
            .collect_vec()
    }

    fn search(
        &self,
        index: KdIndex,
        query: &[f32],
        k: usize,
        best: &mut BinaryHeap<(OrderedFloat<f32>, KdIndex)>,
    ) {
        let node = &self.nodes[index];
        let distance = OrderedFloat(distance_squared(node.point(), query));

        if best.len() < k {
            best.push((distance, index));
        } else if best.peek().map_or(false, |worst| distance < worst.0) {
            best.pop();
            best.push((distance, index));
        }

        let diff = query[node.axis()] - node.point()[node.axis()];
        let (near, far) = if diff >= 0.0 {
            (node.front(), node.back())
        } else {
            (node.back(), node.front())
        };

        if let Some(near) = near {
            self.search(near, query, k, best);
        }

        // The splitting plane is closer than the current worst candidate
        if let Some(far) = far {
            let plane = OrderedFloat(diff * diff);
            if best.len() < k || best.peek().map_or(false, |worst| plane < worst.0) {
                self.search(far, query, k, best);
            }
        }
    }

    pub fn node(&self, index: KdIndex) -> Option<&KdNode<T>> {
        self.nodes.get(index)
    }

    /// Returns the root index
    pub fn root(&self) -> Option<KdIndex> {
        self.root
    }

    pub fn descendants(&self) -> impl Iterator<Item = (KdIndex, &KdNode<T>)> {
        self.root
            .into_iter()
            .flat_map(move |root| KdNode::descendants(root, &self.nodes))
    }

    /// Depth of the deepest node, the root has depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.depth = 0;
    }
}

fn distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(a, b)| (a - b) * (a - b)).sum()
}
