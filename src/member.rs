use std::fmt;

use crate::error::TreeError;
use crate::geometry::Point;
use crate::list::Key;
use crate::node::NodeId;

/// Handle to a member stored in a [`CollisionTree`](crate::CollisionTree).
///
/// Handles of removed members never resolve again, even once their storage
/// slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub(crate) Key);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A payload placed somewhere in the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Member<E> {
    location: Point,
    payload: E,
    owner: Option<NodeId>,
}

impl<E> Member<E> {
    pub fn new(payload: E, location: impl Into<Point>) -> Self {
        Self {
            location: location.into(),
            payload,
            owner: None,
        }
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut E {
        &mut self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }

    /// The leaf currently holding this member, `None` while detached.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Only a detached member may be moved freely; once stored, locations
    /// change through [`CollisionTree::relocate`](crate::CollisionTree::relocate).
    pub fn set_location(&mut self, location: impl Into<Point>) -> Result<(), TreeError> {
        if let Some(leaf) = self.owner {
            return Err(TreeError::Attached(leaf));
        }
        self.location = location.into();
        Ok(())
    }

    pub(crate) fn place(&mut self, location: Point) {
        self.location = location;
    }

    pub(crate) fn attach(&mut self, leaf: NodeId) {
        self.owner = Some(leaf);
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }
}
