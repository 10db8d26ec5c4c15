// SPDX-License-Identifier: MIT

//! Schema types for workflow definitions and run execution records
//!
//! These are the wire shapes the host application fetches for a workflow
//! template and its run steps. Two generations of the definition schema
//! are in circulation: the legacy bare node list (v1, implicit linear
//! chain) and the versioned object with explicit nodes and edges (v2).
//! Every field tolerates absence so partial or legacy records still
//! deserialize.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A workflow definition as fetched from the template store - either a
/// legacy bare node list or a versioned definition object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DefinitionInput {
    /// Legacy v1 payload: just the nodes, edges implied by array order
    Nodes(Vec<DefinitionNode>),
    /// Versioned payload with explicit nodes and (in v2) edges
    Definition(WorkflowDefinition),
}

/// Versioned workflow definition object
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WorkflowDefinition {
    /// Schema generation marker; v2 iff this is exactly the integer 2
    #[serde(default)]
    pub schema_version: Option<Value>,
    #[serde(default)]
    pub nodes: Vec<DefinitionNode>,
    /// Explicit connections, only meaningful for v2
    #[serde(default)]
    pub edges: Vec<DefinitionEdge>,
}

/// One template step in a workflow definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DefinitionNode {
    /// Unique within a definition; legacy payloads may omit it, in which
    /// case a positional `step_<n>` id is synthesized during
    /// normalization
    #[serde(default)]
    pub id: Option<String>,
    /// Dotted-namespace type string, e.g. `ai.prompt`, `human.approval`
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Key the step writes its result under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Free-form assignee descriptor (user, group, or routing rule)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Value>,
}

impl DefinitionNode {
    /// Explicit display title, if the template carries one
    pub fn explicit_title(&self) -> Option<&str> {
        non_empty(self.title.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }
}

/// One explicit connection in a v2 definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DefinitionEdge {
    /// Optional; a stable fallback id is derived from `(from, to, ordinal)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// One observed execution attempt of a node during a run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Step {
    #[serde(default)]
    pub id: Option<String>,
    /// Identity link back to the definition node; absent for legacy and
    /// synthetic records
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub node_type: String,
    /// Free-form; canonical values are
    /// `pending|running|waiting|succeeded|failed|skipped|cancelled`
    #[serde(default)]
    pub status: String,
    /// Retry counter; the highest attempt is authoritative
    #[serde(default)]
    pub attempt: i64,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Captured input payload; legacy records carry the original
    /// title/name in here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl Step {
    /// Identity key, if the record carries a usable one
    pub fn identity(&self) -> Option<&str> {
        non_empty(self.node_id.as_deref())
    }

    pub fn started(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.started_at.as_deref())
    }

    pub fn completed(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.completed_at.as_deref())
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref())
    }

    /// Latest observed activity on this record, used for retry
    /// tie-breaks
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.started().max(self.completed())
    }

    /// Wall-clock duration in milliseconds, when both timestamps parse
    pub fn duration_ms(&self) -> Option<i64> {
        let started = self.started()?;
        let completed = self.completed()?;
        Some((completed - started).num_milliseconds())
    }

    /// Display title captured in the step input (legacy compatibility)
    pub fn display_title(&self) -> Option<&str> {
        let input = self.input.as_ref()?;
        for key in ["title", "name"] {
            if let Some(value) = input.get(key).and_then(Value::as_str) {
                if let Some(value) = non_empty(Some(value)) {
                    return Some(value);
                }
            }
        }
        None
    }
}

/// Canonical step statuses; anything unrecognized parses to `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Waiting,
    Succeeded,
    Failed,
    Skipped,
    Cancelled,
    Unknown,
}

impl StepStatus {
    /// Lossy parse of a free-form status string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => StepStatus::Pending,
            "running" => StepStatus::Running,
            "waiting" => StepStatus::Waiting,
            "succeeded" => StepStatus::Succeeded,
            "failed" => StepStatus::Failed,
            "skipped" => StepStatus::Skipped,
            "cancelled" => StepStatus::Cancelled,
            _ => StepStatus::Unknown,
        }
    }

    /// The run is finished with this node, one way or another
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped | StepStatus::Cancelled
        )
    }

    /// The node is currently executing or parked on a signal
    pub fn is_in_flight(self) -> bool {
        matches!(self, StepStatus::Running | StepStatus::Waiting)
    }
}

/// Lenient timestamp parsing; anything unparseable is `None`, never an
/// error
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Backends without offset discipline send bare local-less timestamps
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    None
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
