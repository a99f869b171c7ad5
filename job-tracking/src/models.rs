use serde::{Deserialize, Serialize};
use std::fmt;

/// Status written locally once an application upload went through.
/// The backend reports its own statuses afterwards ("Round 1", "Accepted", ...).
pub const SUBMITTED_STATUS: &str = "Poslano";

/// A job offer as surfaced by the portal's aggregate listing.
///
/// Field names on the wire match the layout the browser client kept in
/// local storage, so states written by either side stay readable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPosting {
    #[serde(rename = "name", default)]
    pub company_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub pay: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "faculty", default)]
    pub faculty_hint: String,
    #[serde(rename = "logo", default)]
    pub logo_ref: Option<String>,
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub company_username: Option<String>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl JobPosting {
    pub fn new(company_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_job_id(mut self, job_id: i64) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn identity(&self) -> JobIdentity {
        JobIdentity::of(self)
    }
}

/// A posting the user keeps track of, annotated with the application status
/// once one exists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    #[serde(default)]
    pub status: Option<String>,
}

impl SavedJob {
    pub fn new(posting: JobPosting) -> Self {
        Self {
            posting,
            status: None,
        }
    }

    pub fn identity(&self) -> JobIdentity {
        self.posting.identity()
    }
}

/// Authoritative application record reported by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApplicationRecord {
    pub fn new(job_name: &str, company_name: &str, status: &str) -> Self {
        Self {
            job_name: Some(job_name.to_owned()),
            company_name: Some(company_name.to_owned()),
            status: Some(status.to_owned()),
        }
    }

    /// Case-insensitive match on (role, company name).
    pub fn describes(&self, posting: &JobPosting) -> bool {
        let job_name = self.job_name.as_deref().unwrap_or_default();
        let company_name = self.company_name.as_deref().unwrap_or_default();
        job_name.to_lowercase() == posting.role.to_lowercase()
            && company_name.to_lowercase() == posting.company_name.to_lowercase()
    }
}

/// Payload of a withdrawal sent to the backend.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRequest {
    pub username: String,
    pub job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
}

impl WithdrawRequest {
    pub fn new(username: &str, posting: &JobPosting) -> Self {
        Self {
            username: username.to_owned(),
            job_name: posting.role.clone(),
            job_id: posting.job_id,
        }
    }
}

/// Identity of a posting inside the tracking state.
///
/// Backend postings are keyed `id:{job_id}`. Postings without a backend id
/// fall back to `demo:{company}|{role}`, which is not unique: two postings
/// sharing company name and role collide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct JobIdentity(String);

impl JobIdentity {
    pub fn of(posting: &JobPosting) -> Self {
        match posting.job_id {
            Some(job_id) => Self(format!("id:{}", job_id)),
            None => Self::composite(&posting.company_name, &posting.role),
        }
    }

    pub fn composite(company_name: &str, role: &str) -> Self {
        Self(format!("demo:{}|{}", company_name, role))
    }

    /// True for the posting's own identity. Company and role only address
    /// postings without a backend id.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        match posting.job_id {
            Some(_) => *self == Self::of(posting),
            None => *self == Self::composite(&posting.company_name, &posting.role),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity_prefers_backend_id() {
        let posting = JobPosting::new("Acme", "Intern").with_job_id(1);
        assert_eq!(posting.identity().as_str(), "id:1");
        assert_eq!(posting.identity(), posting.clone().identity());
    }

    #[test]
    fn test_identity_falls_back_to_company_and_role() {
        let posting = JobPosting::new("X", "Y");
        assert_eq!(posting.identity().as_str(), "demo:X|Y");
    }

    #[test]
    fn test_identity_ignores_display_fields() {
        let mut a = JobPosting::new("Acme", "Intern").with_job_id(7);
        let b = a.clone();
        a.details = "changed".to_owned();
        a.pay = "1000".to_owned();
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_composite_identity_only_matches_postings_without_id() {
        let posting = JobPosting::new("Acme", "Intern").with_job_id(3);
        assert!(JobIdentity::from("id:3").matches(&posting));
        assert!(!JobIdentity::from("id:4").matches(&posting));
        assert!(!JobIdentity::composite("Acme", "Intern").matches(&posting));

        let legacy = JobPosting::new("Acme", "Intern");
        assert!(JobIdentity::composite("Acme", "Intern").matches(&legacy));
        assert!(!JobIdentity::composite("Acme", "Senior").matches(&legacy));
        assert!(!JobIdentity::from("id:3").matches(&legacy));
    }

    #[test]
    fn test_application_record_matches_case_insensitively() {
        let posting = JobPosting::new("Acme", "Intern");
        assert!(ApplicationRecord::new("INTERN", "acme", "Round 1").describes(&posting));
        assert!(!ApplicationRecord::new("Intern", "Other", "Round 1").describes(&posting));
        assert!(!ApplicationRecord::default().describes(&posting));
    }

    #[test]
    fn test_saved_job_reads_browser_layout() {
        let raw = r#"{"name":"Acme","role":"Intern","details":"d","pay":"-","location":"Zagreb",
            "faculty":"FER","logo":null,"job_id":12,"company_username":"acme",
            "posted_at":null,"category":"IT","status":"Round 2"}"#;
        let saved: SavedJob = serde_json::from_str(raw).expect("Failed to parse saved job");
        assert_eq!(saved.posting.company_name, "Acme");
        assert_eq!(saved.posting.faculty_hint, "FER");
        assert_eq!(saved.status.as_deref(), Some("Round 2"));
        assert_eq!(saved.identity().as_str(), "id:12");
    }

    #[test]
    fn test_saved_job_tolerates_missing_fields() {
        let saved: SavedJob =
            serde_json::from_str(r#"{"name":"X","role":"Y"}"#).expect("Failed to parse saved job");
        assert_eq!(saved.status, None);
        assert_eq!(saved.posting.job_id, None);
        assert_eq!(saved.identity().as_str(), "demo:X|Y");
    }
}
