use ordered_float::OrderedFloat;

use crate::Configuration;

use super::{KdIndex, Nodes};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct KdNode<T> {
    point: Configuration,
    value: T,

    /// Splitting axis, `depth % dim`
    axis: usize,

    /// Points with a coordinate along `axis` greater or equal to this node
    pub(super) front: Option<KdIndex>,
    /// Points with a coordinate along `axis` less or equal to this node
    pub(super) back: Option<KdIndex>,

    depth: usize,
}

impl<T: Copy> KdNode<T> {
    pub(super) fn leaf(point: Configuration, value: T, depth: usize, dim: usize) -> Self {
        Self {
            point,
            value,
            axis: depth % dim,
            front: None,
            back: None,
            depth,
        }
    }

    /// Creates a balanced subtree by splitting at the median and inserts it
    /// into nodes.
    /// Returns None if there were no points to create a node from
    pub(super) fn new(
        nodes: &mut Nodes<T>,
        items: &mut [(Configuration, T)],
        depth: usize,
        dim: usize,
    ) -> Option<KdIndex> {
        if items.is_empty() {
            return None;
        }

        let axis = depth % dim;
        items.sort_unstable_by_key(|(point, _)| OrderedFloat(point[axis]));

        let mid = items.len() / 2;
        let (back, rest) = items.split_at_mut(mid);
        let (current, front) = rest.split_first_mut()?;

        let back = Self::new(nodes, back, depth + 1, dim);
        let front = Self::new(nodes, front, depth + 1, dim);

        let node = Self {
            point: current.0.clone(),
            value: current.1,
            axis,
            front,
            back,
            depth,
        };

        Some(nodes.insert(node))
    }

    /// Get a reference to the node's point.
    pub fn point(&self) -> &Configuration {
        &self.point
    }

    /// Get the node's value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Get the node's axis.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Get the node's front.
    pub fn front(&self) -> Option<KdIndex> {
        self.front
    }

    /// Get the node's back.
    pub fn back(&self) -> Option<KdIndex> {
        self.back
    }

    /// Get the node's depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn descendants<'a>(index: KdIndex, nodes: &'a Nodes<T>) -> DescendantsIter<'a, T> {
        DescendantsIter {
            nodes,
            stack: vec![index],
        }
    }
}

pub struct DescendantsIter<'a, T> {
    nodes: &'a Nodes<T>,

    stack: Vec<KdIndex>,
}

impl<'a, T> Iterator for DescendantsIter<'a, T> {
    type Item = (KdIndex, &'a KdNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;

        let node = &self.nodes[index];
        if let Some(front) = node.front {
            self.stack.push(front)
        }
        if let Some(back) = node.back {
            self.stack.push(back)
        }

        Some((index, node))
    }
}
