// SPDX-License-Identifier: MIT

//! Step reconciliation - resolves one authoritative record per node
//!
//! A polled run can report several records for the same node (retries,
//! duplicated deliveries, out-of-order arrival). This pass folds the raw
//! list left-to-right into exactly one authoritative record per node
//! identity, plus a first-seen index by node type used when the backend
//! only tagged steps by type.

use std::collections::HashMap;

use crate::vellum::workflow::types::Step;

/// Authoritative step indexes for one run snapshot
#[derive(Debug, Default)]
pub struct ResolvedSteps<'a> {
    by_node_id: HashMap<String, &'a Step>,
    by_node_type: HashMap<String, &'a Step>,
}

impl<'a> ResolvedSteps<'a> {
    /// Authoritative record for a node identity
    pub fn by_node_id(&self, node_id: &str) -> Option<&'a Step> {
        self.by_node_id.get(node_id.trim()).copied()
    }

    /// First-seen record for a node type; only a fallback for definition
    /// nodes with no `node_id` match
    pub fn by_node_type(&self, node_type: &str) -> Option<&'a Step> {
        self.by_node_type.get(node_type.trim()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node_id.is_empty() && self.by_node_type.is_empty()
    }
}

/// Fold a raw step list into authoritative indexes. Never errors; an
/// empty input yields empty maps.
pub fn resolve_latest(steps: &[Step]) -> ResolvedSteps<'_> {
    let mut resolved = ResolvedSteps::default();
    for step in steps {
        if let Some(node_id) = step.identity() {
            let keep_new = match resolved.by_node_id.get(node_id) {
                Some(current) => supersedes(step, current),
                None => true,
            };
            if keep_new {
                resolved.by_node_id.insert(node_id.to_string(), step);
            }
        }
        let node_type = step.node_type.trim();
        if !node_type.is_empty() {
            resolved
                .by_node_type
                .entry(node_type.to_string())
                .or_insert(step);
        }
    }
    resolved
}

/// Retry resolution: higher attempt wins; on equal attempts the newer
/// record wins when its latest timestamp is `>=` the holder's. This is a
/// left fold, not a sort: with equal attempts and equal timestamps the
/// last record processed wins, which keeps iteration-order behavior
/// observable and stable across recomputations of the same input.
fn supersedes(candidate: &Step, current: &Step) -> bool {
    if candidate.attempt != current.attempt {
        return candidate.attempt > current.attempt;
    }
    // Option ordering treats a missing timestamp as the minimum
    candidate.last_activity() >= current.last_activity()
}
