// SPDX-License-Identifier: MIT

//! Definition normalization - folds both schema generations into one shape
//!
//! Accepts either the legacy bare node list (v1) or the versioned object
//! with explicit nodes and edges (v2) and produces a uniform
//! `NormalizedDefinition`. Total: malformed or missing pieces degrade to
//! empty collections, never an error. Missing node ids are filled here
//! with positional `step_<n>` fallbacks so every downstream consumer sees
//! a stable identity.

use crate::vellum::workflow::types::{DefinitionEdge, DefinitionInput, DefinitionNode};

/// Definition schema generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Node list only, edges implied by array order
    V1,
    /// Explicit node and edge lists
    V2,
}

/// Uniform definition shape consumed by the graph builder
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDefinition {
    pub schema_version: SchemaVersion,
    /// Every node carries a non-empty id after normalization
    pub nodes: Vec<DefinitionNode>,
    /// Empty for v1
    pub edges: Vec<DefinitionEdge>,
}

/// Normalize a raw definition payload
pub fn normalize(input: &DefinitionInput) -> NormalizedDefinition {
    match input {
        DefinitionInput::Nodes(nodes) => NormalizedDefinition {
            schema_version: SchemaVersion::V1,
            nodes: assign_ids(nodes),
            edges: Vec::new(),
        },
        DefinitionInput::Definition(def) => {
            // v2 iff the marker is exactly the integer 2; strings, floats
            // and absence all mean v1
            let schema_version = match def.schema_version.as_ref().and_then(|v| v.as_i64()) {
                Some(2) => SchemaVersion::V2,
                _ => SchemaVersion::V1,
            };
            let edges = match schema_version {
                SchemaVersion::V2 => def.edges.clone(),
                SchemaVersion::V1 => Vec::new(),
            };
            NormalizedDefinition {
                schema_version,
                nodes: assign_ids(&def.nodes),
                edges,
            }
        }
    }
}

/// Fill missing/blank node ids with the positional `step_<n>` fallback
fn assign_ids(nodes: &[DefinitionNode]) -> Vec<DefinitionNode> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let mut node = node.clone();
            let blank = node.id.as_deref().map(str::trim).unwrap_or("").is_empty();
            if blank {
                log::debug!("definition node {} has no id, synthesizing step_{}", i, i);
                node.id = Some(format!("step_{}", i));
            }
            node
        })
        .collect()
}
