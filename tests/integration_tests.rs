//! Integration tests for graph reconciliation
//!
//! These tests exercise the public crate API end-to-end: loading
//! definitions and step records, building graphs, and the determinism
//! guarantees a polling UI depends on.

use serde_json::json;

use vellum_rs::vellum::workflow::format::format_duration_ms;
use vellum_rs::vellum::workflow::graph::{
    build_definition_graph, build_live_run_graph, build_run_graph, NodeKind,
};
use vellum_rs::vellum::workflow::loader::WorkflowLoader;
use vellum_rs::vellum::workflow::types::{DefinitionInput, Step};

// ============================================================================
// Fixtures
// ============================================================================

fn definition(payload: serde_json::Value) -> DefinitionInput {
    serde_json::from_value(payload).unwrap()
}

fn steps(payload: serde_json::Value) -> Vec<Step> {
    serde_json::from_value(payload).unwrap()
}

fn review_pipeline_v2() -> DefinitionInput {
    definition(json!({
        "schema_version": 2,
        "nodes": [
            {"id": "start", "type": "manual.trigger"},
            {"id": "draft", "type": "ai.prompt", "title": "Draft summary"},
            {"id": "check", "type": "system.validate"},
            {"id": "signoff", "type": "human.approval"}
        ],
        "edges": [
            {"from": "start", "to": "draft"},
            {"from": "draft", "to": "check"},
            {"from": "check", "to": "signoff"}
        ]
    }))
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_live_graph_deep_equal_across_calls() {
    let def = review_pipeline_v2();
    let run = steps(json!([
        {"id": "s1", "node_id": "start", "node_type": "manual.trigger",
         "status": "succeeded", "started_at": "2024-03-01T09:00:00Z",
         "completed_at": "2024-03-01T09:00:00Z"},
        {"id": "s2", "node_id": "draft", "node_type": "ai.prompt",
         "status": "succeeded", "attempt": 1,
         "started_at": "2024-03-01T09:00:01Z",
         "completed_at": "2024-03-01T09:00:14Z"},
        {"id": "s3", "node_id": "draft", "node_type": "ai.prompt",
         "status": "succeeded", "attempt": 2,
         "started_at": "2024-03-01T09:01:00Z",
         "completed_at": "2024-03-01T09:01:09Z"},
        {"id": "s4", "node_id": "check", "node_type": "system.validate",
         "status": "running", "started_at": "2024-03-01T09:01:10Z"},
        {"id": "s5", "node_id": "redline", "node_type": "human.legal_review",
         "status": "waiting", "started_at": "2024-03-01T09:01:20Z"}
    ]));

    let first = build_live_run_graph(&def, &run);
    let second = build_live_run_graph(&def, &run);
    assert_eq!(first, second);

    // ids and order are stable element-for-element
    let ids: Vec<&str> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3", "s4", "def:signoff:3", "s5"]);
}

// ============================================================================
// Retry resolution
// ============================================================================

#[test]
fn test_highest_attempt_is_authoritative_in_any_order() {
    let def = definition(json!([{"id": "a", "type": "ai.prompt"}]));
    let forward = steps(json!([
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "status": "failed", "attempt": 1},
        {"id": "s2", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded", "attempt": 2}
    ]));
    let mut backward = forward.clone();
    backward.reverse();

    assert_eq!(build_live_run_graph(&def, &forward).nodes[0].id, "s2");
    assert_eq!(build_live_run_graph(&def, &backward).nodes[0].id, "s2");
}

#[test]
fn test_equal_attempts_tie_break_on_time() {
    let def = definition(json!([{"id": "a", "type": "ai.prompt"}]));
    let run = steps(json!([
        {"id": "late", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded",
         "attempt": 1, "started_at": "2024-03-01T10:30:00Z"},
        {"id": "early", "node_id": "a", "node_type": "ai.prompt", "status": "failed",
         "attempt": 1, "started_at": "2024-03-01T10:00:00Z"}
    ]));
    let graph = build_live_run_graph(&def, &run);
    assert_eq!(graph.nodes[0].id, "late");
    assert_eq!(graph.nodes[0].status, "succeeded");
}

// ============================================================================
// Edge synthesis
// ============================================================================

#[test]
fn test_v1_definition_builds_linear_chain() {
    let graph = build_definition_graph(&definition(json!([
        {"id": "a", "type": "manual.trigger"},
        {"id": "b", "type": "ai.prompt"},
        {"id": "c", "type": "human.approval"}
    ])));
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(
        (graph.edges[0].from.as_str(), graph.edges[0].to.as_str()),
        ("a__0", "b__1")
    );
    assert_eq!(
        (graph.edges[1].from.as_str(), graph.edges[1].to.as_str()),
        ("b__1", "c__2")
    );
    assert!(graph.edges.iter().all(|edge| !edge.active));
}

#[test]
fn test_v2_definition_keeps_branches_and_drops_dangling_edges() {
    let graph = build_definition_graph(&definition(json!({
        "schema_version": 2,
        "nodes": [
            {"id": "a", "type": "manual.trigger"},
            {"id": "b", "type": "ai.prompt"},
            {"id": "c", "type": "notify.email"}
        ],
        "edges": [
            {"from": "a", "to": "b"},
            {"from": "a", "to": "c"},
            {"from": "a", "to": "z"}
        ]
    })));
    assert_eq!(graph.edges.len(), 2);
    let targets: Vec<&str> = graph.edges.iter().map(|e| e.to.as_str()).collect();
    assert_eq!(targets, vec!["b__1", "c__2"]);
}

// ============================================================================
// Runtime-only nodes
// ============================================================================

#[test]
fn test_runtime_only_step_appended_after_template_nodes() {
    let def = definition(json!([{"id": "a", "type": "ai.prompt"}]));
    let run = steps(json!([
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded"},
        {"id": "s2", "node_id": "b", "node_type": "human.legal_review", "status": "waiting"}
    ]));
    let graph = build_live_run_graph(&def, &run);
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[0].node_id.as_deref(), Some("a"));
    assert_eq!(graph.nodes[1].node_id.as_deref(), Some("b"));
    assert_eq!(graph.nodes[1].kind, NodeKind::Human);
}

#[test]
fn test_unmapped_trigger_marker_is_excluded() {
    let def = definition(json!([{"id": "a", "type": "ai.prompt"}]));
    let run = steps(json!([
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded"},
        {"id": "s2", "node_id": "boot", "node_type": "manual.trigger", "status": "succeeded"}
    ]));
    let graph = build_live_run_graph(&def, &run);
    assert_eq!(graph.nodes.len(), 1);
}

#[test]
fn test_runtime_only_nodes_sorted_by_start_time() {
    let def = definition(json!([{"id": "a", "type": "ai.prompt"}]));
    let run = steps(json!([
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded"},
        {"id": "later", "node_id": "y", "node_type": "transform.map", "status": "running",
         "started_at": "2024-03-01T11:00:00Z"},
        {"id": "earlier", "node_id": "x", "node_type": "human.legal_review", "status": "waiting",
         "started_at": "2024-03-01T10:00:00Z"}
    ]));
    let graph = build_live_run_graph(&def, &run);
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "earlier", "later"]);
}

// ============================================================================
// Edge activation
// ============================================================================

#[test]
fn test_edge_active_only_between_terminal_and_in_flight() {
    let def = definition(json!([
        {"id": "a", "type": "ai.prompt"},
        {"id": "b", "type": "human.approval"},
        {"id": "c", "type": "dms.publish"}
    ]));
    let run = steps(json!([
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "status": "succeeded"},
        {"id": "s2", "node_id": "b", "node_type": "human.approval", "status": "waiting"}
    ]));
    let graph = build_live_run_graph(&def, &run);
    assert_eq!(graph.edges.len(), 2);
    // succeeded -> waiting is in flight
    assert!(graph.edges[0].active);
    // waiting -> pending is not
    assert!(!graph.edges[1].active);
}

// ============================================================================
// Run-only graphs
// ============================================================================

#[test]
fn test_run_graph_renders_every_attempt() {
    let graph = build_run_graph(&steps(json!([
        {"id": "s2", "node_id": "a", "node_type": "ai.prompt", "attempt": 2,
         "status": "succeeded", "started_at": "2024-03-01T10:05:00Z",
         "completed_at": "2024-03-01T10:05:30Z"},
        {"id": "s1", "node_id": "a", "node_type": "ai.prompt", "attempt": 1,
         "status": "failed", "started_at": "2024-03-01T10:00:00Z"}
    ])));
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[0].id, "s1");
    assert_eq!(graph.nodes[1].id, "s2");
    assert_eq!(graph.nodes[1].duration_ms, Some(30_000));
}

// ============================================================================
// Formatting and loading
// ============================================================================

#[test]
fn test_duration_formatting_contract() {
    assert_eq!(format_duration_ms(Some(500)), "500ms");
    assert_eq!(format_duration_ms(Some(61_000)), "1m 1s");
    assert_eq!(format_duration_ms(None), "n/a");
}

#[test]
fn test_yaml_definition_round_trip_through_builder() {
    let yaml = r#"
schema_version: 2
nodes:
  - id: start
    type: manual.trigger
  - id: review
    type: human.approval
    title: "Contract sign-off"
edges:
  - from: start
    to: review
"#;
    let def = WorkflowLoader::parse_definition_yaml(yaml).unwrap();
    let graph = build_definition_graph(&def);
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[1].label, "Contract sign-off");
    assert_eq!(graph.edges.len(), 1);
}

#[test]
fn test_graph_serializes_for_the_rendering_layer() {
    let graph = build_live_run_graph(
        &review_pipeline_v2(),
        &steps(json!([
            {"id": "s1", "node_id": "start", "node_type": "manual.trigger", "status": "succeeded"}
        ])),
    );
    let rendered = serde_json::to_value(&graph).unwrap();
    assert_eq!(rendered["nodes"][0]["id"], "s1");
    assert_eq!(rendered["nodes"][0]["kind"], "trigger");
    assert_eq!(rendered["nodes"][1]["status"], "pending");
    assert_eq!(rendered["nodes"][0]["position"]["x"], 80);
}
