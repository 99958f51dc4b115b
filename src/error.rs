use thiserror::Error;

use crate::member::MemberId;
use crate::node::NodeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("location ({x}, {y}) is outside the grid")]
    OutOfBounds { x: f64, y: f64 },

    #[error("no member with id {0}")]
    UnknownMember(MemberId),

    #[error("member is held by leaf {0}; move it with relocate")]
    Attached(NodeId),

    #[error("invalid tree configuration: {0}")]
    InvalidConfig(String),
}
