//! A fixed-depth quadtree for collision candidate lookup.
//!
//! The grid is split into `4^max_depth` equally sized leaf cells when the
//! tree is built. Members live in the leaf containing their location, move
//! with [`CollisionTree::relocate`] and are found again with
//! [`CollisionTree::neighbors`] or [`CollisionTree::members_in_radius`].
//!
//! ```
//! use collision_tree::{CollisionTree, TreeConfig};
//!
//! let mut tree = CollisionTree::new(TreeConfig::new(2, 16.0, 9.0))?;
//! let ship = tree.add("ship", (1.0, 1.0))?;
//! let rock = tree.add("rock", (4.0, 5.0))?;
//!
//! assert_eq!(tree.neighbors(ship, 5.0)?, vec![rock]);
//! tree.relocate(rock, (60.0, 30.0))?;
//! assert!(tree.neighbors(ship, 5.0)?.is_empty());
//! # Ok::<(), collision_tree::TreeError>(())
//! ```

mod config;
mod error;
mod geometry;
mod list;
mod member;
mod node;
mod tree;

/// Callbacks for [`CollisionTree::traverse`]. Nodes are visited depth-first,
/// children in NW, NE, SW, SE order, each leaf followed by its members.
pub trait TreeVisitor<E> {
    fn member(&mut self, id: MemberId, member: &Member<E>);
    fn leaf(&mut self, id: NodeId, node: &Node);
    fn branch(&mut self, id: NodeId, node: &Node);
}

pub use config::{RadiusSearch, TreeConfig, MAX_DEPTH};
pub use error::TreeError;
pub use geometry::{Extent, Point, Quadrant, Rect};
pub use member::{Member, MemberId};
pub use node::{Node, NodeId, NodeKind};
pub use tree::CollisionTree;
