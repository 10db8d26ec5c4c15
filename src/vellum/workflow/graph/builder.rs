// SPDX-License-Identifier: MIT

//! Graph construction - the three rendering entry points
//!
//! `build_definition_graph` renders the template alone,
//! `build_run_graph` renders a run's raw step records alone, and
//! `build_live_run_graph` merges both into the polled live view. All
//! three are pure: same input, element-for-element identical output on
//! every call. The caller re-renders from this output on each poll tick
//! and relies on stable ids for animation continuity, so nothing here may
//! leak map iteration order into the result.

use std::collections::{HashMap, HashSet};

use super::classify::classify;
use super::normalizer::{normalize, NormalizedDefinition, SchemaVersion};
use super::reconcile::resolve_latest;
use super::types::{GraphEdge, GraphNode, NodeRaw, Position, WorkflowGraph};
use crate::vellum::workflow::types::{DefinitionEdge, DefinitionInput, Step, StepStatus};

const PENDING_STATUS: &str = "pending";

/// Run markers shown by the UI chrome, never as runtime-only graph nodes
const HIDDEN_RUNTIME_TYPES: [&str; 2] = ["manual.trigger", "chat.trigger"];

const LAYOUT_X_ORIGIN: i64 = 80;
const LAYOUT_X_STEP: i64 = 290;
const LAYOUT_Y_EVEN: i64 = 90;
const LAYOUT_Y_ODD: i64 = 290;

/// Template-only graph: no execution state, nothing `active`.
pub fn build_definition_graph(input: &DefinitionInput) -> WorkflowGraph {
    let def = normalize(input);

    let nodes: Vec<GraphNode> = def
        .nodes
        .iter()
        .enumerate()
        .map(|(index, dnode)| {
            let node_id = dnode.id.clone().unwrap_or_default();
            let verdict = classify(&dnode.node_type);
            let label = dnode
                .explicit_title()
                .map(str::to_string)
                .unwrap_or(verdict.label);
            GraphNode {
                id: format!("{}__{}", node_id, index),
                index,
                node_id: Some(node_id),
                node_type: dnode.node_type.clone(),
                label,
                kind: verdict.kind,
                status: PENDING_STATUS.to_string(),
                duration_ms: None,
                position: zigzag(index),
                raw: NodeRaw {
                    definition: Some(dnode.clone()),
                    step: None,
                },
            }
        })
        .collect();

    let edges = edges_for(&def, &nodes);
    WorkflowGraph { nodes, edges }
}

/// Run-only graph: one node per step record, every attempt visible, in
/// start-time order.
pub fn build_run_graph(steps: &[Step]) -> WorkflowGraph {
    let mut ordered: Vec<&Step> = steps.iter().collect();
    // Stable sort; records without any usable timestamp cluster first
    ordered.sort_by_key(|s| s.started().or_else(|| s.created()));

    let nodes: Vec<GraphNode> = ordered
        .iter()
        .enumerate()
        .map(|(index, step)| step_node(step, index))
        .collect();

    let edges = chain_edges(&nodes);
    WorkflowGraph { nodes, edges }
}

/// Live merged graph: the primary entry point, invoked on every poll
/// tick. Reconciles the run's step records against the template,
/// classifies every node, and appends runtime-only steps the template
/// never declared.
pub fn build_live_run_graph(input: &DefinitionInput, steps: &[Step]) -> WorkflowGraph {
    let def = normalize(input);
    let resolved = resolve_latest(steps);

    let mut nodes: Vec<GraphNode> = Vec::with_capacity(def.nodes.len());
    let mut matched_node_ids: HashSet<String> = HashSet::new();

    for (index, dnode) in def.nodes.iter().enumerate() {
        let node_id = dnode.id.clone().unwrap_or_default();
        // Primary identity match, then the by-type fallback for backends
        // that only tagged steps by type
        let step = resolved
            .by_node_id(&node_id)
            .or_else(|| resolved.by_node_type(dnode.node_type.trim()));
        if let Some(matched) = step.and_then(Step::identity) {
            matched_node_ids.insert(matched.to_string());
        }

        // The executed step may report a more specific type than the
        // template declared
        let node_type = step
            .map(|s| s.node_type.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| dnode.node_type.trim())
            .to_string();
        let verdict = classify(&node_type);
        let label = dnode
            .explicit_title()
            .or_else(|| step.and_then(Step::display_title))
            .map(str::to_string)
            .unwrap_or(verdict.label);

        nodes.push(GraphNode {
            id: step
                .and_then(|s| s.id.clone())
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("def:{}:{}", node_id, index)),
            index,
            node_id: Some(node_id),
            node_type,
            label,
            kind: verdict.kind,
            status: status_of(step),
            duration_ms: step.and_then(Step::duration_ms),
            position: zigzag(index),
            raw: NodeRaw {
                definition: Some(dnode.clone()),
                step: step.cloned(),
            },
        });
    }

    // Runtime-only nodes: authoritative steps whose identity matched no
    // definition node, e.g. a dynamically inserted legal-review task
    let mut runtime: Vec<&Step> = Vec::new();
    let mut seen_runtime: HashSet<&str> = HashSet::new();
    for step in steps {
        let Some(node_id) = step.identity() else {
            continue;
        };
        if matched_node_ids.contains(node_id) || !seen_runtime.insert(node_id) {
            continue;
        }
        let Some(authoritative) = resolved.by_node_id(node_id) else {
            continue;
        };
        if HIDDEN_RUNTIME_TYPES.contains(&authoritative.node_type.trim()) {
            continue;
        }
        runtime.push(authoritative);
    }
    runtime.sort_by_key(|s| (s.started(), s.completed()));
    if !runtime.is_empty() {
        log::debug!("appending {} runtime-only node(s)", runtime.len());
    }
    for step in runtime {
        let index = nodes.len();
        nodes.push(step_node(step, index));
    }

    let edges = edges_for(&def, &nodes);
    WorkflowGraph { nodes, edges }
}

/// Build a graph node straight from a step record
fn step_node(step: &Step, index: usize) -> GraphNode {
    let verdict = classify(&step.node_type);
    let label = step
        .display_title()
        .map(str::to_string)
        .unwrap_or(verdict.label);
    GraphNode {
        id: step
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("runtime:{}", index)),
        index,
        node_id: step.identity().map(str::to_string),
        node_type: step.node_type.clone(),
        label,
        kind: verdict.kind,
        status: status_of(Some(step)),
        duration_ms: step.duration_ms(),
        position: zigzag(index),
        raw: NodeRaw {
            definition: None,
            step: Some(step.clone()),
        },
    }
}

fn status_of(step: Option<&Step>) -> String {
    step.map(|s| s.status.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(PENDING_STATUS)
        .to_string()
}

/// Deterministic zig-zag layout
fn zigzag(index: usize) -> Position {
    Position {
        x: LAYOUT_X_ORIGIN + LAYOUT_X_STEP * index as i64,
        y: if index % 2 == 0 {
            LAYOUT_Y_EVEN
        } else {
            LAYOUT_Y_ODD
        },
    }
}

/// v2 definitions connect by their explicit edge list; v1 definitions
/// chain every emitted node in order, runtime-only nodes included.
fn edges_for(def: &NormalizedDefinition, nodes: &[GraphNode]) -> Vec<GraphEdge> {
    match def.schema_version {
        SchemaVersion::V2 => definition_edges(&def.edges, nodes),
        SchemaVersion::V1 => chain_edges(nodes),
    }
}

/// Map a v2 edge list onto graph node ids. Edges referencing unknown
/// nodes are dropped; duplicate edge ids get a numeric suffix. Runtime-
/// only nodes have no declared position in the template graph, so no
/// explicit edge ever reaches them.
fn definition_edges(edges: &[DefinitionEdge], nodes: &[GraphNode]) -> Vec<GraphEdge> {
    let mut by_node_id: HashMap<&str, &GraphNode> = HashMap::new();
    for node in nodes.iter().filter(|n| n.raw.definition.is_some()) {
        if let Some(node_id) = node.node_id.as_deref() {
            by_node_id.entry(node_id).or_insert(node);
        }
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(edges.len());
    for (ordinal, edge) in edges.iter().enumerate() {
        let endpoints = (
            by_node_id.get(edge.from.trim()),
            by_node_id.get(edge.to.trim()),
        );
        let (Some(upstream), Some(downstream)) = endpoints else {
            log::debug!(
                "dropping edge {:?} -> {:?}: unknown endpoint",
                edge.from,
                edge.to
            );
            continue;
        };
        let base = edge
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{}->{}#{}", edge.from, edge.to, ordinal));
        out.push(GraphEdge {
            id: dedup_id(base, &mut seen_ids),
            from: upstream.id.clone(),
            to: downstream.id.clone(),
            active: edge_active(upstream, downstream),
        });
    }
    out
}

/// Linear chain across the given nodes in order
fn chain_edges(nodes: &[GraphNode]) -> Vec<GraphEdge> {
    nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (upstream, downstream) = (&pair[0], &pair[1]);
            GraphEdge {
                id: format!("{}->{}#{}", upstream.id, downstream.id, i),
                from: upstream.id.clone(),
                to: downstream.id.clone(),
                active: edge_active(upstream, downstream),
            }
        })
        .collect()
}

/// An edge is active while the handoff it represents is in flight
fn edge_active(upstream: &GraphNode, downstream: &GraphNode) -> bool {
    StepStatus::parse(&upstream.status).is_terminal()
        && StepStatus::parse(&downstream.status).is_in_flight()
}

fn dedup_id(base: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
