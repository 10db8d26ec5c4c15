//! Derived graph types
//!
//! Everything here is ephemeral: rebuilt from scratch on every builder
//! call, never mutated in place. The rendering layer consumes these as
//! JSON; `position` values are an advisory zig-zag layout it may replace.

use serde::Serialize;

use super::classify::NodeKind;
use crate::vellum::workflow::types::{DefinitionNode, Step};

/// Advisory canvas position for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// One renderable node of a reconciled graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Stable render identity: the authoritative step id when one exists,
    /// otherwise a deterministic synthetic id
    pub id: String,
    /// Render order
    pub index: usize,
    /// Identity from the definition or the step, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub node_type: String,
    pub label: String,
    pub kind: NodeKind,
    /// Raw status string; `"pending"` when nothing has executed yet
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    pub position: Position,
    /// Source records for inspection and debugging
    pub raw: NodeRaw,
}

/// The records a graph node was derived from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeRaw {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<DefinitionNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
}

/// One directed connection between graph nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    /// `GraphNode::id` of the upstream node
    pub from: String,
    /// `GraphNode::id` of the downstream node
    pub to: String,
    /// True iff the upstream node is terminal and the downstream node is
    /// running or waiting
    pub active: bool,
}

/// A reconciled, renderable workflow graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
