//! Maps raw records into the canonical entities. Local and remote shapes get
//! separate mapping functions so each alias list stays auditable.

pub mod local;
pub mod remote;

use serde::{Deserialize, Serialize};

/// Summary truncation maxima (characters) applied to remote records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryLimits {
    pub blog: usize,
    pub blog_body: usize,
    pub project: usize,
    pub service: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            blog: 180,
            blog_body: 500,
            project: 260,
            service: 220,
        }
    }
}

fn records(items: Option<&serde_json::Value>) -> &[serde_json::Value] {
    match items {
        Some(serde_json::Value::Array(items)) => items,
        _ => &[],
    }
}
