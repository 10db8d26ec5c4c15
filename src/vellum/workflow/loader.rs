//! Definition and step-list loading
//!
//! The host application fetches these shapes over REST; the CLI loads the
//! same payloads from JSON or YAML files on disk. This is the only layer
//! with a failure mode - the graph engine itself is total.

use std::fs;
use std::path::Path;

use crate::vellum::error::VellumError;

use super::types::{DefinitionInput, Step};

/// Loads workflow definitions and run step lists from files
pub struct WorkflowLoader;

impl WorkflowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a workflow definition from a JSON or YAML file
    pub fn load_definition<P: AsRef<Path>>(&self, path: P) -> Result<DefinitionInput, VellumError> {
        let path = path.as_ref();
        let content = read(path)?;
        if is_yaml(path) {
            Self::parse_definition_yaml(&content)
        } else {
            Self::parse_definition_json(&content)
        }
    }

    /// Load a run's step records from a JSON or YAML file
    pub fn load_steps<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Step>, VellumError> {
        let path = path.as_ref();
        let content = read(path)?;
        if is_yaml(path) {
            Self::parse_steps_yaml(&content)
        } else {
            Self::parse_steps_json(&content)
        }
    }

    pub fn parse_definition_json(content: &str) -> Result<DefinitionInput, VellumError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn parse_definition_yaml(content: &str) -> Result<DefinitionInput, VellumError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn parse_steps_json(content: &str) -> Result<Vec<Step>, VellumError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn parse_steps_yaml(content: &str) -> Result<Vec<Step>, VellumError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Default for WorkflowLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read(path: &Path) -> Result<String, VellumError> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            VellumError::FileNotFound(path.display().to_string())
        } else {
            err.into()
        }
    })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
