use std::fmt;

use tracing::trace;

use crate::config::{RadiusSearch, TreeConfig};
use crate::geometry::{Point, Quadrant, Rect};
use crate::list::List;
use crate::member::{Member, MemberId};

/// Index of a node in the tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Children in NW, NE, SW, SE order.
    Internal { children: [NodeId; 4] },
    Leaf { members: Vec<MemberId> },
}

#[derive(Clone, Debug)]
pub struct Node {
    rect: Rect,
    depth: u8,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn children(&self) -> Option<[NodeId; 4]> {
        match self.kind {
            NodeKind::Internal { children } => Some(children),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Members listed in this node; empty for internal nodes.
    pub fn members(&self) -> &[MemberId] {
        match &self.kind {
            NodeKind::Leaf { members } => members,
            NodeKind::Internal { .. } => &[],
        }
    }

    pub fn contains(&self, location: Point) -> bool {
        self.rect.contains(location)
    }

    /// The child whose quadrant holds `location`, `None` for leaves.
    pub fn select_child(&self, location: Point) -> Option<NodeId> {
        self.children()
            .map(|children| children[self.rect.quadrant_of(location).index()])
    }
}

/// Flat storage for the node hierarchy. Parent and child links are indices
/// into `nodes`, the root sits at index 0.
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    /// Builds the complete hierarchy for an already validated config.
    pub fn build(config: &TreeConfig) -> Self {
        let grid = Rect::new(Point::default(), config.grid_extent());
        let mut nodes = Vec::with_capacity(config.node_count());
        nodes.push(Node {
            rect: grid,
            depth: 0,
            parent: None,
            kind: NodeKind::Leaf {
                members: Vec::new(),
            },
        });

        // Breadth-first: every node pushed is split in turn until the leaf
        // depth is reached.
        let mut next = 0;
        while next < nodes.len() {
            let (rect, depth) = (nodes[next].rect, nodes[next].depth);
            if depth < config.max_depth {
                let first = nodes.len() as u32;
                let children = [
                    NodeId(first),
                    NodeId(first + 1),
                    NodeId(first + 2),
                    NodeId(first + 3),
                ];
                for quadrant in Quadrant::ALL {
                    nodes.push(Node {
                        rect: rect.quadrant(quadrant),
                        depth: depth + 1,
                        parent: Some(NodeId(next as u32)),
                        kind: NodeKind::Leaf {
                            members: Vec::new(),
                        },
                    });
                }
                nodes[next].kind = NodeKind::Internal { children };
            }
            next += 1;
        }
        debug_assert_eq!(nodes.len(), config.node_count());

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Follows quadrant selection from `from` down to a leaf.
    pub fn leaf_for(&self, from: NodeId, location: Point) -> NodeId {
        let mut current = from;
        while let Some(child) = self.get(current).select_child(location) {
            current = child;
        }
        current
    }

    /// Nearest node at or above `from` whose rect holds `location`, falling
    /// back to the root.
    pub fn enclosing(&self, from: NodeId, location: Point) -> NodeId {
        let mut current = from;
        loop {
            let node = self.get(current);
            match node.parent {
                Some(parent) if !node.contains(location) => {
                    trace!(node = %current, parent = %parent, "ascending");
                    current = parent;
                }
                _ => return current,
            }
        }
    }

    /// Appends `member` to the leaf under `from` selected by `location`.
    pub fn insert(&mut self, from: NodeId, member: MemberId, location: Point) -> NodeId {
        let leaf = self.leaf_for(from, location);
        if let NodeKind::Leaf { members } = &mut self.nodes[leaf.index()].kind {
            members.push(member);
        }
        trace!(member = %member, leaf = %leaf, "inserted");
        leaf
    }

    /// Erases `member` from the leaf under `from` selected by `location`.
    /// Returns whether it was listed there.
    pub fn remove(&mut self, from: NodeId, member: MemberId, location: Point) -> bool {
        let leaf = self.leaf_for(from, location);
        let NodeKind::Leaf { members } = &mut self.nodes[leaf.index()].kind else {
            return false;
        };
        match members.iter().position(|m| *m == member) {
            Some(position) => {
                members.remove(position);
                trace!(member = %member, leaf = %leaf, "removed");
                true
            }
            None => false,
        }
    }

    pub fn clear_members(&mut self) {
        for node in &mut self.nodes {
            if let NodeKind::Leaf { members } = &mut node.kind {
                members.clear();
            }
        }
    }

    /// Depth-first, NW/NE/SW/SE, leaf lists in insertion order.
    pub fn collect(&self, from: NodeId, out: &mut Vec<MemberId>) {
        match &self.get(from).kind {
            NodeKind::Leaf { members } => out.extend_from_slice(members),
            NodeKind::Internal { children } => {
                for child in children {
                    self.collect(*child, out);
                }
            }
        }
    }

    /// Members within `radius` of `center`, starting the search at `start`.
    pub fn search_radius<E>(
        &self,
        start: NodeId,
        center: Point,
        radius: f64,
        mode: RadiusSearch,
        members: &List<Member<E>>,
        out: &mut Vec<MemberId>,
    ) {
        match mode {
            RadiusSearch::LeafLocal => {
                let leaf = self.leaf_for(start, center);
                self.scan_leaf(leaf, center, radius, members, out);
            }
            RadiusSearch::Escalating => {
                let mut top = start;
                loop {
                    let node = self.get(top);
                    match node.parent {
                        Some(parent) if !node.rect.encloses_circle(center, radius) => {
                            trace!(node = %top, parent = %parent, "query escalating");
                            top = parent;
                        }
                        _ => break,
                    }
                }
                self.descend_radius(top, center, radius, members, out);
            }
        }
    }

    fn descend_radius<E>(
        &self,
        from: NodeId,
        center: Point,
        radius: f64,
        members: &List<Member<E>>,
        out: &mut Vec<MemberId>,
    ) {
        match self.get(from).kind {
            NodeKind::Leaf { .. } => self.scan_leaf(from, center, radius, members, out),
            NodeKind::Internal { children } => {
                for child in children {
                    if self.get(child).rect.intersects_circle(center, radius) {
                        self.descend_radius(child, center, radius, members, out);
                    }
                }
            }
        }
    }

    fn scan_leaf<E>(
        &self,
        leaf: NodeId,
        center: Point,
        radius: f64,
        members: &List<Member<E>>,
        out: &mut Vec<MemberId>,
    ) {
        for id in self.get(leaf).members() {
            if let Some(member) = members.get(id.0) {
                if member.location().distance(center) <= radius {
                    out.push(*id);
                }
            }
        }
    }
}
