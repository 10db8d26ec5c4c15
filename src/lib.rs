// SPDX-License-Identifier: MIT

//! Workflow graph reconciliation for the vellum document platform.
//!
//! The core of this crate is a pure, deterministic engine that merges a
//! static workflow definition with a run's execution records into a
//! renderable node/edge graph. The three entry points live in
//! [`vellum::workflow::graph`].

pub mod vellum;
