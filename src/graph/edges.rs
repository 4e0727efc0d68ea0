use slotmap::{secondary::Iter, SecondaryMap};
use smallvec::SmallVec;

use super::NodeIndex;

pub(crate) type NodeEdges = SmallVec<[NodeIndex; 4]>;

/// Parent to child relations of a [`SearchGraph`](super::SearchGraph).
///
/// Both directions are stored so that children can be enumerated and the
/// number of parents of a node can be checked during reconstruction.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Edges {
    children: SecondaryMap<NodeIndex, NodeEdges>,
    parents: SecondaryMap<NodeIndex, NodeEdges>,
}

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directed edge from `parent` to `child`.
    /// Returns false if either node no longer exists.
    pub fn add(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        let (children, parents) = match (self.children.entry(parent), self.parents.entry(child)) {
            (Some(children), Some(parents)) => (children, parents),
            _ => return false,
        };

        children.or_default().push(child);
        parents.or_default().push(parent);
        true
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.children
            .get(index)
            .map(|val| val.as_ref())
            .unwrap_or_default()
    }

    pub fn parents(&self, index: NodeIndex) -> &[NodeIndex] {
        self.parents
            .get(index)
            .map(|val| val.as_ref())
            .unwrap_or_default()
    }

    /// Iterate all edges as `(parent, child)`
    pub fn iter(&self) -> EdgesIter {
        EdgesIter {
            inner: self.children.iter(),
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.children.values().map(|val| val.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.children.clear();
        self.parents.clear();
    }
}

pub struct EdgesIter<'a> {
    inner: Iter<'a, NodeIndex, NodeEdges>,
    current: Option<(NodeIndex, std::slice::Iter<'a, NodeIndex>)>,
}

impl<'a> Iterator for EdgesIter<'a> {
    type Item = (NodeIndex, NodeIndex);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((parent, children)) = self.current.as_mut() {
                if let Some(child) = children.next() {
                    return Some((*parent, *child));
                }
            }

            let (parent, children) = self.inner.next()?;
            self.current = Some((parent, children.iter()));
        }
    }
}
