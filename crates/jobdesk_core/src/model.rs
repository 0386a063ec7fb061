//! Wire-level records exchanged with the backend.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ApplicationStatus;

/// Identifier owned by the backend. Some endpoints use integers, others
/// strings; the wire form is preserved either way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueId {
    Int(i64),
    Text(String),
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueId::Int(value) => write!(f, "{value}"),
            OpaqueId::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for OpaqueId {
    /// Numeric text becomes [`OpaqueId::Int`] so ids typed on a command line
    /// match the backend's integer ids.
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(number) => OpaqueId::Int(number),
            Err(_) => OpaqueId::Text(value.to_string()),
        }
    }
}

impl From<i64> for OpaqueId {
    fn from(value: i64) -> Self {
        OpaqueId::Int(value)
    }
}

/// Links to artifacts captured while applying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_url: Option<String>,
}

impl ArtifactLinks {
    pub fn is_empty(&self) -> bool {
        self.screenshot_url.is_none() && self.snapshot_url.is_none()
    }
}

/// One queued or processed job application, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: OpaqueId,
    /// Natural key used to reconcile with job listings. Empty when missing.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub portal: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attempts: u32,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Snapshot of the job posting the application was created from.
    #[serde(default)]
    pub job: Option<ArtifactLinks>,
    /// Artifacts recorded by the latest task.
    #[serde(default)]
    pub artifacts: Option<ArtifactLinks>,
}

impl ApplicationRecord {
    pub fn new(id: impl Into<OpaqueId>, url: impl Into<String>, status: ApplicationStatus) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            company: None,
            title: None,
            portal: None,
            status,
            attempts: 0,
            error: None,
            created_at: None,
            updated_at: None,
            job: None,
            artifacts: None,
        }
    }

    /// Artifact links from the job snapshot, falling back to the latest task.
    pub fn artifact_links(&self) -> ArtifactLinks {
        let from_job = self.job.clone().unwrap_or_default();
        let from_task = self.artifacts.clone().unwrap_or_default();
        ArtifactLinks {
            screenshot_url: from_job.screenshot_url.or(from_task.screenshot_url),
            snapshot_url: from_job.snapshot_url.or(from_task.snapshot_url),
        }
    }
}

/// A job posting returned by search, also used as the descriptor for
/// tailor/draft/apply requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OpaqueId>,
    pub title: String,
    pub company: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Source portal (greenhouse, lever, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jd_text: Option<String>,
    /// Fit score in `0.0..=1.0`.
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            company: company.into(),
            url: url.into(),
            location: None,
            source: None,
            jd_text: None,
            score: 0.0,
            created_at: None,
        }
    }
}

/// Payload entry for `POST /apply`: the job plus the portal it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyJob {
    #[serde(flatten)]
    pub job: JobPosting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<String>,
}

impl From<JobPosting> for ApplyJob {
    fn from(job: JobPosting) -> Self {
        let portal = job.source.clone();
        Self { job, portal }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplyReceipt {
    #[serde(default)]
    pub application_ids: Vec<OpaqueId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub roles: Vec<String>,
    pub locations: Vec<String>,
    pub keywords: Vec<String>,
    /// Threshold in percent, `0..=100`.
    pub min_score: u8,
}

/// Tailored application materials for one job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TailorResult {
    #[serde(default)]
    pub revised_bullets: Vec<String>,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_docx_url: Option<String>,
    #[serde(default)]
    pub cover_letter_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_skills: Vec<String>,
    #[serde(default)]
    pub ats_score: Option<u8>,
    #[serde(default)]
    pub role_detected: Option<String>,
}

/// A draft or stuck application awaiting manual follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: OpaqueId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub snapshot_url: Option<String>,
    /// Either an ISO timestamp or epoch seconds depending on the backend store.
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub gh_boards: Vec<String>,
    #[serde(default)]
    pub lever_companies: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn application_record_tolerates_sparse_rows() {
        let record: ApplicationRecord = serde_json::from_value(json!({
            "id": 7,
            "url": null,
            "status": null,
            "attempts": null
        }))
        .unwrap();
        assert_eq!(record.id, OpaqueId::Int(7));
        assert_eq!(record.url, "");
        assert_eq!(record.status, ApplicationStatus::Queued);
        assert_eq!(record.attempts, 0);
        assert!(record.job.is_none());
    }

    #[test]
    fn artifact_links_prefer_job_snapshot() {
        let record: ApplicationRecord = serde_json::from_value(json!({
            "id": "a1",
            "url": "https://jobs.example.com/1",
            "status": "SUBMITTED",
            "job": {"title": "ignored", "screenshot_url": "/files/job.png"},
            "artifacts": {"screenshot_url": "/files/task.png", "snapshot_url": "/files/task.html"}
        }))
        .unwrap();
        let links = record.artifact_links();
        assert_eq!(links.screenshot_url.as_deref(), Some("/files/job.png"));
        assert_eq!(links.snapshot_url.as_deref(), Some("/files/task.html"));
    }

    #[test]
    fn apply_job_copies_source_into_portal() {
        let mut job = JobPosting::new("Engineer", "Acme", "https://acme.example/jobs/1");
        job.source = Some("greenhouse".into());
        let value = serde_json::to_value(ApplyJob::from(job)).unwrap();
        assert_eq!(value["portal"], "greenhouse");
        assert_eq!(value["source"], "greenhouse");
        assert_eq!(value["url"], "https://acme.example/jobs/1");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn opaque_id_parses_numeric_text() {
        assert_eq!(OpaqueId::from("42"), OpaqueId::Int(42));
        assert_eq!(OpaqueId::from("draft-9"), OpaqueId::Text("draft-9".into()));
        assert_eq!(OpaqueId::Text("x".into()).to_string(), "x");
    }
}
