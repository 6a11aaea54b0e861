//! Errors raised by tree mutation and style accessors.
//!
//! The layout pass itself never fails: malformed style combinations are
//! resolved by clamping. Only calls that would corrupt the tree, reference a
//! node that no longer exists, or pass a value outside a property's domain
//! are rejected, and they are rejected before anything is mutated.

use std::fmt;

use crate::node::NodeId;
use crate::style::Edge;

/// Why a structural edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralViolation {
    /// A node cannot become its own child.
    SelfInsertion,
    /// The child is an ancestor of the parent; inserting it would create a cycle.
    WouldCreateCycle,
    /// Nodes with a measurement hook are leaves.
    MeasuredNodeCannotHaveChildren,
    /// A hook cannot be attached to a node that already has children.
    NodeWithChildrenCannotMeasure,
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfInsertion => write!(f, "a node cannot be inserted into itself"),
            Self::WouldCreateCycle => {
                write!(f, "inserting an ancestor as a child would create a cycle")
            }
            Self::MeasuredNodeCannotHaveChildren => {
                write!(f, "nodes with a measure function cannot have children")
            }
            Self::NodeWithChildrenCannotMeasure => {
                write!(f, "cannot set a measure function on a node with children")
            }
        }
    }
}

/// Error type for all fallible tree and style operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The handle is stale (node removed) or belongs to another tree.
    UnknownNode { node: NodeId },
    /// A value outside the property's domain.
    InvalidArgument {
        property: &'static str,
        reason: String,
    },
    /// Child insertion index past the end of the child list.
    InvalidIndex {
        parent: NodeId,
        index: usize,
        len: usize,
    },
    /// `remove_child` with a node that is not a direct child.
    NotAChild { parent: NodeId, child: NodeId },
    /// The edit would break the tree's shape invariants.
    StructuralViolation {
        node: NodeId,
        violation: StructuralViolation,
    },
}

impl LayoutError {
    pub(crate) fn invalid(property: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            property,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node } => write!(f, "unknown layout node {node}"),
            Self::InvalidArgument { property, reason } => {
                write!(f, "invalid argument for {property}: {reason}")
            }
            Self::InvalidIndex { parent, index, len } => write!(
                f,
                "child index {index} out of range for node {parent} with {len} children"
            ),
            Self::NotAChild { parent, child } => {
                write!(f, "node {child} is not a child of node {parent}")
            }
            Self::StructuralViolation { node, violation } => {
                write!(f, "structural violation at node {node}: {violation}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Compound edges (`horizontal`, `vertical`, `all`) have no single computed value.
pub(crate) fn invalid_edge(property: &'static str, edge: Edge) -> LayoutError {
    LayoutError::invalid(property, format!("`{edge}` does not name a single edge"))
}

/// Standard result type for layout APIs.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Reject NaN and infinities for properties that need a concrete number.
pub(crate) fn finite(property: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::invalid(
            property,
            format!("expected a finite number, got {value}"),
        ))
    }
}
