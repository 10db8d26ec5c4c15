// SPDX-License-Identifier: MIT

//! Workflow execution graph reconciliation
//!
//! This module merges a static workflow definition with a run's live step
//! records into a renderable directed graph. It is a pure function of its
//! inputs: no I/O, no retained state, and repeated calls over the same
//! input return identical graphs, which is what keeps a polling UI free
//! of flicker.

pub mod builder;
pub mod classify;
mod normalizer;
mod reconcile;
pub mod types;

pub use builder::{build_definition_graph, build_live_run_graph, build_run_graph};
pub use classify::{classify, kind_of, Classification, NodeKind};
pub use normalizer::{normalize, NormalizedDefinition, SchemaVersion};
pub use reconcile::{resolve_latest, ResolvedSteps};
pub use types::{GraphEdge, GraphNode, NodeRaw, Position, WorkflowGraph};
