use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::{PlanError, Result};

pub use edges::*;
pub use path::*;

mod edges;
mod path;

new_key_type! {
    pub struct NodeIndex;
}

type Nodes<P> = SlotMap<NodeIndex, Node<P>>;

/// Expansion state of a grid search node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Open,
    Closed,
}

/// Collision state, evaluated lazily when a node is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Collision {
    Unknown,
    Free,
    Blocked,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<P> {
    pos: P,
    g: u32,
    pub status: Status,
    pub collision: Collision,
}

impl<P> Node<P> {
    fn new(pos: P, g: u32) -> Self {
        Self {
            pos,
            g,
            status: Status::Open,
            collision: Collision::Unknown,
        }
    }

    /// Get a reference to the node's position.
    pub fn pos(&self) -> &P {
        &self.pos
    }

    /// Number of edges between the root and this node.
    pub fn g(&self) -> u32 {
        self.g
    }
}

/// A successful planning result
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan<P> {
    pub path: Path<P>,
    /// The graph the path was found in
    pub graph: SearchGraph<P>,
    /// Frontier pops for the grid search, random draws for the RRT
    pub iterations: usize,
}

/// Node and edge store of a single planning query.
///
/// Every node except the roots is created through [`SearchGraph::add_child`],
/// so the graph forms a tree as long as [`SearchGraph::add_edge`] is not used
/// to attach a second parent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchGraph<P> {
    nodes: Nodes<P>,
    edges: Edges,
}

impl<P> Default for SearchGraph<P> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            edges: Edges::new(),
        }
    }
}

impl<P> SearchGraph<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, pos: P) -> NodeIndex {
        self.nodes.insert(Node::new(pos, 0))
    }

    /// Adds a node discovered from `parent`, one step further from the root.
    pub fn add_child(&mut self, parent: NodeIndex, pos: P) -> Result<NodeIndex> {
        let g = self
            .nodes
            .get(parent)
            .ok_or_else(|| PlanError::InternalInconsistency("parent node does not exist".into()))?
            .g
            + 1;

        let index = self.nodes.insert(Node::new(pos, g));
        self.edges.add(parent, index);
        Ok(index)
    }

    /// Adds a raw edge between two existing nodes without touching `g`.
    pub fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<()> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(PlanError::InternalInconsistency(
                "edge endpoint does not exist".into(),
            ));
        }

        self.edges.add(parent, child);
        Ok(())
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node<P>> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node<P>> {
        self.nodes.get_mut(index)
    }

    /// Returns the single parent of a node, None for a root.
    pub fn parent(&self, index: NodeIndex) -> Result<Option<NodeIndex>> {
        match self.edges.parents(index) {
            [] => Ok(None),
            [parent] => Ok(Some(*parent)),
            parents => Err(PlanError::InternalInconsistency(format!(
                "node has {} parents",
                parents.len()
            ))),
        }
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.edges.children(index)
    }

    /// Nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .keys()
            .filter(move |&index| self.edges.parents(index).is_empty())
    }

    /// Get a reference to the graph's edges.
    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node<P>)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Walks the parent relation from `index` up to the root and returns the
    /// node indices in root to `index` order.
    pub fn backtrace(&self, index: NodeIndex) -> Result<SmallVec<[NodeIndex; 16]>> {
        let mut current = index;
        let mut trace = SmallVec::new();

        loop {
            if !self.nodes.contains_key(current) {
                return Err(PlanError::InternalInconsistency(
                    "backtrace reached a removed node".into(),
                ));
            }

            trace.push(current);

            // Longer than the graph itself means there is a cycle
            if trace.len() > self.nodes.len() {
                return Err(PlanError::InternalInconsistency(
                    "cycle in parent relation".into(),
                ));
            }

            match self.parent(current)? {
                Some(parent) => current = parent,
                None => break,
            }
        }

        trace.reverse();
        Ok(trace)
    }
}

impl<P: Clone> SearchGraph<P> {
    /// Reconstructs the path from the root to `index`.
    pub fn path_to(&self, index: NodeIndex) -> Result<Path<P>> {
        Ok(self
            .backtrace(index)?
            .into_iter()
            .map(|index| self.nodes[index].pos.clone())
            .collect())
    }
}
