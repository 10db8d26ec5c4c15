// SPDX-License-Identifier: MIT

//! Node type classification for rendering
//!
//! Maps a raw dotted type string (`ai.prompt`, `human.approval`, ...) to a
//! semantic kind, a display label, and a one-line execution description.
//! Rule order encodes real precedence: `human.approval` must hit the human
//! rule before any generic system rule, and `manual.trigger` is a trigger
//! before it is manual.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic category of a workflow node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Trigger,
    Manual,
    Human,
    Ai,
    System,
    Condition,
    Transform,
    Notification,
    Unknown,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Manual => "manual",
            NodeKind::Human => "human",
            NodeKind::Ai => "ai",
            NodeKind::System => "system",
            NodeKind::Condition => "condition",
            NodeKind::Transform => "transform",
            NodeKind::Notification => "notification",
            NodeKind::Unknown => "unknown",
        }
    }
}

/// Classifier verdict for one node type string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: NodeKind,
    pub label: String,
    pub description: &'static str,
}

/// Display labels for well-known node types
static KNOWN_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("manual.trigger", "Manual Trigger"),
        ("chat.trigger", "Chat Trigger"),
        ("schedule.trigger", "Scheduled Trigger"),
        ("webhook.trigger", "Webhook Trigger"),
        ("document.trigger", "Document Trigger"),
        ("human.approval", "Human Approval"),
        ("human.review", "Human Review"),
        ("human.input", "Human Input"),
        ("human.legal_review", "Legal Review"),
        ("ai.prompt", "AI Prompt"),
        ("ai.classify", "AI Classification"),
        ("ai.extract", "AI Extraction"),
        ("ai.summarize", "AI Summary"),
        ("ai.translate", "AI Translation"),
        ("ai.agent", "AI Agent"),
        ("dms.upload", "Document Upload"),
        ("dms.archive", "Document Archive"),
        ("dms.publish", "Document Publish"),
        ("dms.convert", "Document Conversion"),
        ("artifact.store", "Artifact Store"),
        ("artifact.fetch", "Artifact Fetch"),
        ("system.evaluate", "System Evaluation"),
        ("system.validate", "System Validation"),
        ("system.reconcile", "System Reconciliation"),
        ("condition.branch", "Condition Branch"),
        ("condition.route", "Router"),
        ("transform.map", "Data Mapping"),
        ("transform.aggregate", "Aggregation"),
        ("transform.for_each", "For Each"),
        ("notify.email", "Email Notification"),
        ("notify.slack", "Slack Notification"),
    ])
});

/// Execution descriptions for types that warrant a specific sentence
static KNOWN_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "manual.trigger",
            "Marks a run started by hand; the node itself does not process anything.",
        ),
        (
            "chat.trigger",
            "Marks a run started from a chat session; the node itself does not process anything.",
        ),
        (
            "human.approval",
            "Pauses the run until an approver signs off on the document.",
        ),
        (
            "human.review",
            "Pauses the run until a reviewer finishes their pass.",
        ),
        (
            "ai.prompt",
            "Sends the configured prompt through the shared automation path.",
        ),
    ])
});

/// Vendor and model markers that classify a type as AI even without the
/// `ai.` prefix
const AI_MARKERS: [&str; 7] = [
    "llm",
    "openai",
    "anthropic",
    "claude",
    "gpt",
    "gemini",
    "mistral",
];

const SYSTEM_MARKERS: [&str; 3] = ["evaluate", "validate", "reconcile"];
const CONDITION_MARKERS: [&str; 3] = ["condition", "branch", "route"];
const TRANSFORM_MARKERS: [&str; 5] = ["transform", "map", "convert", "aggregate", "for_each"];
const NOTIFICATION_MARKERS: [&str; 3] = ["notify", "email", "slack"];

/// Classify a raw node type string. Pure and total: any input produces a
/// verdict.
pub fn classify(node_type: &str) -> Classification {
    let kind = kind_of(node_type);
    let label = label_for(node_type);
    let normalized = node_type.trim().to_ascii_lowercase();
    let description = KNOWN_DESCRIPTIONS
        .get(normalized.as_str())
        .copied()
        .unwrap_or_else(|| describe(kind));
    Classification {
        kind,
        label,
        description,
    }
}

/// Ordered first-match-wins kind rules
pub fn kind_of(node_type: &str) -> NodeKind {
    let t = node_type.trim().to_ascii_lowercase();
    if t.is_empty() {
        return NodeKind::Unknown;
    }
    if t.contains("trigger") {
        return NodeKind::Trigger;
    }
    if t.contains("manual") {
        return NodeKind::Manual;
    }
    if t.starts_with("human.") || t.contains("approval") || t.contains("review") {
        return NodeKind::Human;
    }
    if t.starts_with("ai.") || AI_MARKERS.iter().any(|m| t.contains(m)) {
        return NodeKind::Ai;
    }
    if t.starts_with("dms.")
        || t.starts_with("artifact.")
        || t.starts_with("system.")
        || SYSTEM_MARKERS.iter().any(|m| t.contains(m))
    {
        return NodeKind::System;
    }
    if CONDITION_MARKERS.iter().any(|m| t.contains(m)) {
        return NodeKind::Condition;
    }
    if TRANSFORM_MARKERS.iter().any(|m| t.contains(m)) {
        return NodeKind::Transform;
    }
    if NOTIFICATION_MARKERS.iter().any(|m| t.contains(m)) {
        return NodeKind::Notification;
    }
    NodeKind::Unknown
}

fn label_for(node_type: &str) -> String {
    let t = node_type.trim();
    if t.is_empty() {
        return "Workflow Step".to_string();
    }
    if let Some(label) = KNOWN_LABELS.get(t.to_ascii_lowercase().as_str()) {
        return (*label).to_string();
    }
    let generic = title_case(t);
    if generic.is_empty() {
        "Workflow Step".to_string()
    } else {
        generic
    }
}

/// `foo.bar_baz` -> `Foo Bar Baz`
fn title_case(node_type: &str) -> String {
    node_type
        .split(['.', '_', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Trigger => {
            "Marks where the run was initiated; the node itself does not process anything."
        }
        NodeKind::Manual => "Records a manually initiated action against the run.",
        NodeKind::Human => "Pauses the run until a person signs off.",
        NodeKind::Ai | NodeKind::System => "Runs through the shared automation path.",
        NodeKind::Condition => "Evaluates its inputs and picks the branch the run continues on.",
        NodeKind::Transform => "Reshapes data flowing between steps.",
        NodeKind::Notification => "Sends an outbound notification; the run does not wait on it.",
        NodeKind::Unknown => "Behavior depends on the node contract configured for this type.",
    }
}
