//! Loading policies, workloads and candidate lists from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use enforcer_core::{Candidate, Policy, Workload};

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Json,
    Yaml,
}

impl Syntax {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Syntax::Json,
            _ => Syntax::Yaml,
        }
    }
}

pub fn load_policy(path: &Path) -> Result<Policy> {
    let contents = read(path)?;
    let policy = parse_policy(&contents, Syntax::from_path(path))
        .with_context(|| format!("invalid policy {}", path.display()))?;
    debug!(path = %path.display(), policy = %policy.name(), "policy loaded");
    Ok(policy)
}

pub fn load_workload(path: &Path) -> Result<Workload> {
    let contents = read(path)?;
    parse_document(&contents, Syntax::from_path(path))
        .with_context(|| format!("invalid workload {}", path.display()))
}

pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let contents = read(path)?;
    let candidates: Vec<Candidate> = parse_document(&contents, Syntax::from_path(path))
        .with_context(|| format!("invalid workload list {}", path.display()))?;
    debug!(path = %path.display(), count = candidates.len(), "candidates loaded");
    Ok(candidates)
}

pub fn parse_policy(contents: &str, syntax: Syntax) -> Result<Policy> {
    let policy = match syntax {
        Syntax::Json => Policy::from_json(contents)?,
        Syntax::Yaml => Policy::from_yaml(contents)?,
    };
    Ok(policy)
}

pub fn parse_document<T: DeserializeOwned>(contents: &str, syntax: Syntax) -> Result<T> {
    let value = match syntax {
        Syntax::Json => serde_json::from_str(contents)?,
        Syntax::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(value)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
