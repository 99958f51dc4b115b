use std::fmt;

use tracing::{debug, trace};

use crate::config::{RadiusSearch, TreeConfig};
use crate::error::TreeError;
use crate::geometry::{Extent, Point, Rect};
use crate::list::List;
use crate::member::{Member, MemberId};
use crate::node::{Arena, Node, NodeId, NodeKind};
use crate::TreeVisitor;

/// Fixed-depth quadtree holding movable members.
///
/// The whole node hierarchy is built up front; afterwards only the leaf
/// membership changes. The grid starts at `(0, 0)` and spans
/// [`grid_extent`](Self::grid_extent).
pub struct CollisionTree<E> {
    config: TreeConfig,
    nodes: Arena,
    members: List<Member<E>>,
}

impl<E> CollisionTree<E> {
    pub fn new(config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        let nodes = Arena::build(&config);
        debug!(
            max_depth = config.max_depth,
            leaf_width = config.leaf_width,
            leaf_height = config.leaf_height,
            nodes = nodes.len(),
            "built collision tree"
        );
        Ok(Self {
            config,
            nodes,
            members: List::new(),
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn max_depth(&self) -> u8 {
        self.config.max_depth
    }

    pub fn leaf_width(&self) -> f64 {
        self.config.leaf_width
    }

    pub fn leaf_height(&self) -> f64 {
        self.config.leaf_height
    }

    pub fn grid_extent(&self) -> Extent {
        self.config.grid_extent()
    }

    pub fn grid_area(&self) -> f64 {
        self.grid_extent().area()
    }

    pub fn bounds(&self) -> Rect {
        self.root().rect()
    }

    pub fn len(&self) -> usize {
        self.members.size()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.members.contains(id.0)
    }

    pub fn get(&self, id: MemberId) -> Option<&Member<E>> {
        self.members.get(id.0)
    }

    pub fn payload_mut(&mut self, id: MemberId) -> Option<&mut E> {
        self.members.get_mut(id.0).map(Member::payload_mut)
    }

    /// The leaf currently listing `id`.
    pub fn leaf_of(&self, id: MemberId) -> Option<NodeId> {
        self.get(id).and_then(Member::owner)
    }

    pub fn root(&self) -> &Node {
        self.nodes.get(NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        (id.index() < self.nodes.len()).then(|| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter()
    }

    /// Members in storage order. See [`all_members`](Self::all_members) for
    /// spatial order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &Member<E>)> + '_ {
        self.members.iter().map(|(key, member)| (MemberId(key), member))
    }

    /// Stores `member` in the leaf containing its location.
    pub fn insert(&mut self, member: Member<E>) -> Result<MemberId, TreeError> {
        let location = member.location();
        self.check_bounds(location)?;

        let id = MemberId(self.members.insert(member));
        let leaf = self.nodes.insert(NodeId::ROOT, id, location);
        if let Some(member) = self.members.get_mut(id.0) {
            member.attach(leaf);
        }
        Ok(id)
    }

    pub fn add(&mut self, payload: E, location: impl Into<Point>) -> Result<MemberId, TreeError> {
        self.insert(Member::new(payload, location))
    }

    /// Takes a member out of the tree. Unknown or already removed ids are
    /// ignored.
    pub fn remove(&mut self, id: MemberId) -> Option<Member<E>> {
        let location = self.members.get(id.0)?.location();
        let listed = self.nodes.remove(NodeId::ROOT, id, location);
        debug_assert!(listed, "member {} missing from its leaf", id);

        let mut member = self.members.erase(id.0)?;
        member.detach();
        Some(member)
    }

    /// Moves a member, climbing only as far as the first node that contains
    /// the destination before re-descending. Out of grid destinations are
    /// rejected and leave the member where it was.
    pub fn relocate(&mut self, id: MemberId, destination: impl Into<Point>) -> Result<(), TreeError> {
        let destination = destination.into();
        let member = self.members.get(id.0).ok_or(TreeError::UnknownMember(id))?;
        self.check_bounds(destination)?;

        let origin = member.location();
        let leaf = member
            .owner()
            .unwrap_or_else(|| self.nodes.leaf_for(NodeId::ROOT, origin));

        let owner = if self.nodes.get(leaf).contains(destination) {
            leaf
        } else {
            let top = self.nodes.enclosing(leaf, destination);
            let listed = self.nodes.remove(top, id, origin);
            debug_assert!(listed, "member {} missing below {}", id, top);
            let owner = self.nodes.insert(top, id, destination);
            trace!(member = %id, from = %leaf, to = %owner, via = %top, "relocated");
            owner
        };

        if let Some(member) = self.members.get_mut(id.0) {
            member.place(destination);
            member.attach(owner);
        }
        Ok(())
    }

    /// Other members within `radius` of member `id`.
    pub fn neighbors(&self, id: MemberId, radius: f64) -> Result<Vec<MemberId>, TreeError> {
        let member = self.get(id).ok_or(TreeError::UnknownMember(id))?;
        let mut found = Vec::new();
        if radius >= 0.0 {
            let center = member.location();
            let start = member
                .owner()
                .unwrap_or_else(|| self.nodes.leaf_for(NodeId::ROOT, center));
            self.nodes.search_radius(
                start,
                center,
                radius,
                self.config.radius_search,
                &self.members,
                &mut found,
            );
        }
        found.retain(|other| *other != id);
        Ok(found)
    }

    /// Members within `radius` of an arbitrary point.
    pub fn members_in_radius(&self, center: impl Into<Point>, radius: f64) -> Vec<MemberId> {
        let center = center.into();
        let mut found = Vec::new();
        if radius.is_nan() || radius < 0.0 || !center.is_finite() {
            return found;
        }

        let start = if self.bounds().contains(center) {
            self.nodes.leaf_for(NodeId::ROOT, center)
        } else if self.config.radius_search == RadiusSearch::LeafLocal {
            return found;
        } else {
            NodeId::ROOT
        };
        self.nodes.search_radius(
            start,
            center,
            radius,
            self.config.radius_search,
            &self.members,
            &mut found,
        );
        found
    }

    /// Every member, leaf by leaf: depth-first, NW/NE/SW/SE.
    pub fn all_members(&self) -> Vec<MemberId> {
        let mut out = Vec::with_capacity(self.len());
        self.nodes.collect(NodeId::ROOT, &mut out);
        out
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.nodes.clear_members();
    }

    /// Rebuilds the hierarchy with a new shape and reinserts every member.
    /// Member ids stay valid. Fails without changes if the config is invalid
    /// or a member would fall outside the new grid.
    pub fn reconfigure(&mut self, config: TreeConfig) -> Result<(), TreeError> {
        config.validate()?;
        let bounds = Rect::new(Point::default(), config.grid_extent());
        if let Some((_, outside)) = self
            .members
            .iter()
            .find(|(_, member)| !bounds.contains(member.location()))
        {
            let Point { x, y } = outside.location();
            debug!(x, y, "member outside reconfigured grid");
            return Err(TreeError::OutOfBounds { x, y });
        }

        let mut nodes = Arena::build(&config);
        for id in self.all_members() {
            if let Some(member) = self.members.get_mut(id.0) {
                let leaf = nodes.insert(NodeId::ROOT, id, member.location());
                member.attach(leaf);
            }
        }
        debug!(
            max_depth = config.max_depth,
            members = self.len(),
            "reconfigured collision tree"
        );
        self.nodes = nodes;
        self.config = config;
        Ok(())
    }

    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: TreeVisitor<E>,
    {
        let mut to_process = vec![NodeId::ROOT];

        while let Some(id) = to_process.pop() {
            let node = self.nodes.get(id);
            match node.kind() {
                NodeKind::Internal { children } => {
                    visitor.branch(id, node);
                    // Reversed so the north-west child is popped first.
                    to_process.extend(children.iter().rev());
                }
                NodeKind::Leaf { members } => {
                    visitor.leaf(id, node);
                    for member_id in members {
                        if let Some(member) = self.members.get(member_id.0) {
                            visitor.member(*member_id, member);
                        }
                    }
                }
            }
        }
    }

    fn check_bounds(&self, location: Point) -> Result<(), TreeError> {
        if self.bounds().contains(location) {
            return Ok(());
        }
        debug!(x = location.x, y = location.y, "location outside grid");
        Err(TreeError::OutOfBounds {
            x: location.x,
            y: location.y,
        })
    }
}

impl<E> fmt::Debug for CollisionTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionTree")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .field("members", &self.members.size())
            .finish()
    }
}
