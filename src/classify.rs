//! Snapshot content-type detection
//!
//! Classifies raw captured CLI output into one of the snapshot types the
//! renderer understands. Detection is a pure function over the content: an
//! ordered rule table evaluated top to bottom, first match wins. Earlier
//! rules are more specific and pre-empt later ones even when both would
//! match (JSON scanner output can coincidentally contain the word "added").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Snapshot content types known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotType {
    /// Trivy JSON vulnerability report
    #[serde(rename = "trivy")]
    Trivy,

    /// `npm audit` report
    #[serde(rename = "npm-audit")]
    NpmAudit,

    /// `npm install` summary
    #[serde(rename = "npm")]
    Npm,

    /// Terraform plan output (also the fallback for unrecognized content)
    #[serde(rename = "terraform")]
    Terraform,
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SnapshotType::Trivy => "trivy",
            SnapshotType::NpmAudit => "npm-audit",
            SnapshotType::Npm => "npm",
            SnapshotType::Terraform => "terraform",
        };
        f.write_str(s)
    }
}

impl FromStr for SnapshotType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "trivy" => Ok(SnapshotType::Trivy),
            "npm-audit" => Ok(SnapshotType::NpmAudit),
            "npm" => Ok(SnapshotType::Npm),
            "terraform" => Ok(SnapshotType::Terraform),
            other => Err(format!(
                "unknown snapshot type '{other}' (expected trivy, npm-audit, npm, or terraform)"
            )),
        }
    }
}

/// Detection rules in priority order. First match wins.
const DETECTION_RULES: &[(fn(&str) -> bool, SnapshotType)] = &[
    (is_trivy_report, SnapshotType::Trivy),
    (is_npm_audit_report, SnapshotType::NpmAudit),
    (is_npm_install_summary, SnapshotType::Npm),
    (is_terraform_plan, SnapshotType::Terraform),
];

/// Detect the snapshot type of captured CLI output.
///
/// Total and deterministic: always returns a type, defaulting to
/// [`SnapshotType::Terraform`] when nothing matches. Malformed JSON is
/// treated as "not a scanner report", never as an error.
pub fn detect_snapshot_type(content: &str) -> SnapshotType {
    for (matches, snapshot_type) in DETECTION_RULES {
        if matches(content) {
            return *snapshot_type;
        }
    }
    SnapshotType::Terraform
}

/// Trivy emits a single JSON object with a fixed set of top-level keys.
/// Checked first: it is the most specific rule and the least likely to
/// false-positive against free text.
fn is_trivy_report(content: &str) -> bool {
    let trimmed = content.trim();
    if !trimmed.starts_with('{') {
        return false;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return false;
    };
    let Some(map) = value.as_object() else {
        return false;
    };

    ["SchemaVersion", "ArtifactType", "Metadata", "Results"]
        .iter()
        .all(|key| map.contains_key(*key))
}

/// `npm audit` prints a literal markdown header line.
fn is_npm_audit_report(content: &str) -> bool {
    content
        .lines()
        .any(|line| line.trim() == "# npm audit report")
}

/// `npm install` summaries read like "added 12 packages, and audited 200
/// packages in 3s". The outer keyword check can pass without any line
/// carrying both "added" and "packages"; in that case this rule does not
/// match and the content falls through to the terraform default. That gap
/// is preserved intentionally (see DESIGN.md).
fn is_npm_install_summary(content: &str) -> bool {
    let keyword_hit = content.contains("added")
        || content.contains("changed")
        || (content.contains("audited") && content.contains("packages"));
    if !keyword_hit {
        return false;
    }

    content
        .lines()
        .any(|line| line.contains("added") && line.contains("packages"))
}

/// Terraform plan output, matched loosely on its action-summary phrasing.
fn is_terraform_plan(content: &str) -> bool {
    content.contains("Terraform will perform")
        || (content.contains("Plan:")
            && (content.contains("to add")
                || content.contains("to change")
                || content.contains("to destroy")))
}
